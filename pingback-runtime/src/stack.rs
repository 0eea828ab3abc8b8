use crate::event::{EventLog, NullLog};
use crate::layer::{ArpLayer, EthernetLayer, IcmpLayer, Ipv4Layer};
use crate::sink::{FrameSink, SinkError};
use pingback_packets::MacAddr;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::debug;

/// The single hardware and protocol address the stack answers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub mac: MacAddr,
    pub ip: Ipv4Addr,
}

impl Identity {
    pub fn new(mac: MacAddr, ip: Ipv4Addr) -> Self {
        Identity { mac, ip }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity {
            mac: MacAddr::ZERO,
            ip: Ipv4Addr::LOCALHOST,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.ip, self.mac)
    }
}

/// Wires the layers together. Anything left unset falls back to the default identity, a log that
/// discards events and no sink.
#[derive(Default)]
pub struct StackBuilder {
    identity: Identity,
    log: Option<Arc<dyn EventLog>>,
    sink: Option<Box<dyn FrameSink>>,
}

impl StackBuilder {
    pub fn new() -> Self {
        StackBuilder::default()
    }

    pub fn identity(self, identity: Identity) -> Self {
        StackBuilder { identity, ..self }
    }

    pub fn log(self, log: Arc<dyn EventLog>) -> Self {
        StackBuilder {
            log: Some(log),
            ..self
        }
    }

    pub fn sink(self, sink: Box<dyn FrameSink>) -> Self {
        StackBuilder {
            sink: Some(sink),
            ..self
        }
    }

    pub fn build(self) -> Stack {
        let log = self.log.unwrap_or_else(|| Arc::new(NullLog));
        let icmp = IcmpLayer::new(Arc::clone(&log));
        let ipv4 = Ipv4Layer::new(self.identity.ip, Arc::clone(&log), icmp);
        let arp = ArpLayer::new(Arc::clone(&log));
        let ethernet = EthernetLayer::new(self.identity.mac, log, self.sink, arp, ipv4);
        Stack {
            identity: self.identity,
            ethernet,
        }
    }
}

/// The complete Ethernet/ARP/IPv4/ICMP stack. Frames go in through `handle_frame`; replies come
/// out of the sink it was built with.
pub struct Stack {
    identity: Identity,
    ethernet: EthernetLayer,
}

impl Stack {
    pub fn builder() -> StackBuilder {
        StackBuilder::new()
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn ethernet(&self) -> &EthernetLayer {
        &self.ethernet
    }

    /// Processes one inbound frame to completion, including any reply. Malformed or uninteresting
    /// frames are dropped and still return `Ok`; only a failing sink is reported.
    pub fn handle_frame(&self, frame: &[u8]) -> Result<(), SinkError> {
        self.ethernet.handle(frame)
    }

    /// Feeds every frame through `handle_frame` in order, stopping at the first sink failure.
    /// Returns the number of frames processed.
    pub fn run<I>(&self, frames: I) -> Result<usize, SinkError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut count = 0;
        for frame in frames {
            self.handle_frame(frame.as_ref())?;
            count += 1;
        }
        debug!(frames = count, "frame source exhausted");
        Ok(count)
    }
}
