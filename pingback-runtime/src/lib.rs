/// Layers are the protocol handlers of pingback. Each one parses the part of the frame it owns, decides whether
/// the packet is of interest, and hands the rest upward or builds a reply and pushes it back down. The Ethernet layer
/// owns the ARP and IPv4 layers, the IPv4 layer owns the ICMP layer, and lower layers are passed upward as borrows so
/// that replies can travel back down without any layer holding a reference to another.
pub mod layer;

/// The stack wires the layers together around a single identity, a log and an optional transmit sink, and is the only
/// entry point for inbound frames.
pub mod stack;

/// Events are the semantic records the layers emit as traffic is observed and answered. They say what happened and
/// leave rendering to whoever implements `EventLog`.
pub mod event;

/// Writers that render events as human-readable lines or CSV records.
pub mod log;

/// Sinks accept complete outbound Ethernet frames.
pub mod sink;

/// Utility module
pub mod utils;

pub use crate::event::{Event, EventLog};
pub use crate::log::{Log, LogFormat};
pub use crate::sink::{ChannelSink, FrameSink, SinkError};
pub use crate::stack::{Identity, Stack, StackBuilder};
