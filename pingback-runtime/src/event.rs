use pingback_packets::MacAddr;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// An Ethernet frame was received, or built for transmission.
    EthernetFrame { src: MacAddr, dst: MacAddr },
    /// An IPv4 packet was received, or built for transmission.
    Ipv4Packet { src: Ipv4Addr, dst: Ipv4Addr },
    ArpRequest {
        sender_mac: MacAddr,
        sender_ip: Ipv4Addr,
        target_mac: MacAddr,
        target_ip: Ipv4Addr,
    },
    /// A reply to an ARP request for our own address. The sender fields carry our identity.
    ArpReply {
        sender_mac: MacAddr,
        sender_ip: Ipv4Addr,
        target_mac: MacAddr,
        target_ip: Ipv4Addr,
    },
    /// An ICMP echo request addressed to us.
    IcmpPing,
    /// The echo reply for the last `IcmpPing`.
    IcmpPong,
}

/// Receives events from the layers. Implementations choose how to render them and must not fail
/// the packet being processed.
pub trait EventLog {
    fn log(&self, event: &Event);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl EventLog for NullLog {
    fn log(&self, _event: &Event) {}
}
