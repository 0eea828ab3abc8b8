use crate::event::{Event, EventLog};
use crate::layer::{EthernetLayer, IcmpLayer};
use crate::sink::SinkError;
use pingback_packets::{IpProtocol, Ipv4Packet, MacAddr, IPV4_ETHER_TYPE};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{trace, warn};

/// Accepts IPv4 packets addressed to our single address and passes ICMP on to the ICMP layer.
/// Everything else is logged and dropped; there is no routing, fragmentation or reassembly.
pub struct Ipv4Layer {
    addr: Ipv4Addr,
    log: Arc<dyn EventLog>,
    icmp: IcmpLayer,
}

impl Ipv4Layer {
    pub fn new(addr: Ipv4Addr, log: Arc<dyn EventLog>, icmp: IcmpLayer) -> Self {
        Ipv4Layer { addr, log, icmp }
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    /// Own-address filter: plain equality with the configured address.
    pub fn owns(&self, addr: Ipv4Addr) -> bool {
        self.addr == addr
    }

    pub fn icmp(&self) -> &IcmpLayer {
        &self.icmp
    }

    pub fn handle(
        &self,
        ethernet: &EthernetLayer,
        src_mac: MacAddr,
        buffer: &[u8],
    ) -> Result<(), SinkError> {
        let packet = match Ipv4Packet::new_checked(buffer) {
            Ok(packet) => packet,
            Err(reason) => {
                trace!(len = buffer.len(), reason, "dropping ipv4 packet");
                return Ok(());
            }
        };
        if packet.version() != 4 {
            trace!(version = packet.version(), "dropping packet with wrong ip version");
            return Ok(());
        }

        let src_ip = packet.src_addr();
        let dest_ip = packet.dest_addr();
        self.log.log(&Event::Ipv4Packet {
            src: src_ip,
            dst: dest_ip,
        });

        if !self.owns(dest_ip) {
            trace!(dest = %dest_ip, "ipv4 packet is not for us");
            return Ok(());
        }
        if packet.protocol() != IpProtocol::ICMP {
            trace!(protocol = ?packet.protocol(), "dropping ipv4 packet with unsupported protocol");
            return Ok(());
        }

        // IHL is not checked against the fixed header: below 5 the payload starts inside it
        match packet.payload() {
            Some(payload) => self
                .icmp
                .handle(ethernet, self, src_mac, src_ip, dest_ip, payload),
            None => {
                trace!(
                    header_len = packet.header_len(),
                    len = buffer.len(),
                    "ipv4 header length exceeds packet"
                );
                Ok(())
            }
        }
    }

    /// Wraps `payload` in a 20 byte header from our address to `dest_ip` and sends it to
    /// `dest_mac`.
    pub fn send(
        &self,
        ethernet: &EthernetLayer,
        dest_mac: MacAddr,
        dest_ip: Ipv4Addr,
        protocol: IpProtocol,
        payload: &[u8],
    ) -> Result<(), SinkError> {
        let packet = match Ipv4Packet::encap(self.addr, dest_ip, protocol, payload) {
            Ok(packet) => packet,
            Err(reason) => {
                warn!(len = payload.len(), reason, "not sending ipv4 packet");
                return Ok(());
            }
        };

        self.log.log(&Event::Ipv4Packet {
            src: self.addr,
            dst: dest_ip,
        });
        ethernet.send(dest_mac, IPV4_ETHER_TYPE, &packet.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use crate::stack::{Identity, Stack};
    use crate::utils::test::collectors::{channel_sink, RecordingLog};
    use crate::utils::test::packet_generators::echo_request_packet;
    use crate::Event;
    use pingback_packets::{IpProtocol, Ipv4Packet, MacAddr, ICMP_HEADER_LEN};
    use std::net::Ipv4Addr;
    use std::sync::Arc;

    const OWN_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const PEER_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);
    const PEER_MAC: MacAddr = MacAddr {
        bytes: [0x02, 0, 0, 0, 0, 0x02],
    };

    fn stack(log: &Arc<RecordingLog>) -> (Stack, crossbeam::crossbeam_channel::Receiver<Vec<u8>>) {
        let (sink, frames) = channel_sink();
        let stack = Stack::builder()
            .identity(Identity::new(MacAddr::new([0x02, 0, 0, 0, 0, 0x01]), OWN_IP))
            .log(log.clone())
            .sink(Box::new(sink))
            .build();
        (stack, frames)
    }

    fn handle(stack: &Stack, buffer: &[u8]) {
        let ethernet = stack.ethernet();
        ethernet.ipv4().handle(ethernet, PEER_MAC, buffer).unwrap();
    }

    #[test]
    fn echo_for_us_is_answered() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);

        let packet = echo_request_packet(PEER_IP, OWN_IP, 1, 1, b"abcdefgh").unwrap();
        handle(&stack, &packet);

        let frame = frames.try_recv().unwrap();
        assert!(frames.try_recv().is_err());
        assert_eq!(&frame[..6], &PEER_MAC.bytes);

        let reply = Ipv4Packet::new_checked(&frame[14..]).unwrap();
        assert_eq!(reply.src_addr(), OWN_IP);
        assert_eq!(reply.dest_addr(), PEER_IP);
        assert_eq!(reply.protocol(), IpProtocol::ICMP);
        assert_eq!(reply.ttl(), 64);
        assert_eq!(usize::from(reply.total_len()), packet.len());
        assert!(reply.verify_checksum());

        assert_eq!(
            log.events()[0],
            Event::Ipv4Packet {
                src: PEER_IP,
                dst: OWN_IP
            }
        );
    }

    #[test]
    fn foreign_destination_is_logged_but_not_answered() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);

        let packet =
            echo_request_packet(PEER_IP, Ipv4Addr::new(10, 0, 0, 3), 1, 1, b"abcd").unwrap();
        handle(&stack, &packet);

        assert!(frames.try_recv().is_err());
        assert_eq!(
            log.events(),
            vec![Event::Ipv4Packet {
                src: PEER_IP,
                dst: Ipv4Addr::new(10, 0, 0, 3)
            }]
        );
    }

    #[test]
    fn other_protocols_are_dropped() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);

        let udp = Ipv4Packet::encap(PEER_IP, OWN_IP, IpProtocol::UDP, &[0; 8])
            .unwrap()
            .into_inner();
        handle(&stack, &udp);

        assert!(frames.try_recv().is_err());
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn malformed_packets_are_dropped() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);
        let packet = echo_request_packet(PEER_IP, OWN_IP, 1, 1, &[]).unwrap();

        for len in 0..20 {
            handle(&stack, &packet[..len]);
        }

        let mut ipv6 = packet.clone();
        ipv6[0] = 0x65;
        handle(&stack, &ipv6);

        assert!(frames.try_recv().is_err());
        assert!(log.events().is_empty());
    }

    #[test]
    fn header_length_past_end_is_dropped() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);

        // IHL of 15 claims a 60 byte header in a 28 byte packet
        let mut packet = echo_request_packet(PEER_IP, OWN_IP, 1, 1, &[]).unwrap();
        packet[0] = 0x4f;
        handle(&stack, &packet);

        assert!(frames.try_recv().is_err());
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn short_header_length_hands_header_bytes_to_icmp() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);

        // IHL of 1: the ICMP message starts at the identification field, set here to type 8 code 0
        let mut packet = echo_request_packet(PEER_IP, OWN_IP, 1, 1, &[]).unwrap();
        packet[0] = 0x41;
        packet[4] = 8;
        packet[5] = 0;
        handle(&stack, &packet);

        let frame = frames.try_recv().unwrap();
        assert_eq!(frame.len(), 14 + 20 + packet.len() - 4);
        assert_eq!(frame[34], 0);
        assert_eq!(&frame[38..], &packet[8..]);
        assert_eq!(log.events()[1], Event::IcmpPing);
    }

    #[test]
    fn options_are_skipped() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);

        // IHL of 6: one word of options (four NOPs) before the ICMP message
        let plain = echo_request_packet(PEER_IP, OWN_IP, 7, 9, b"xy").unwrap();
        let mut packet = plain[..20].to_vec();
        packet[0] = 0x46;
        packet.extend_from_slice(&[1, 1, 1, 1]);
        packet.extend_from_slice(&plain[20..]);
        handle(&stack, &packet);

        let frame = frames.try_recv().unwrap();
        assert_eq!(frame.len(), 14 + 20 + ICMP_HEADER_LEN + 2);
    }

    #[test]
    fn send_builds_header() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);
        let ethernet = stack.ethernet();

        ethernet
            .ipv4()
            .send(ethernet, PEER_MAC, PEER_IP, IpProtocol::ICMP, &[1, 2, 3])
            .unwrap();

        let frame = frames.try_recv().unwrap();
        assert_eq!(&frame[12..14], &[0x08, 0x00]);
        let packet = Ipv4Packet::new_checked(&frame[14..]).unwrap();
        assert_eq!(packet.version(), 4);
        assert_eq!(packet.ihl(), 5);
        assert_eq!(packet.total_len(), 23);
        assert_eq!(packet.identification(), 0);
        assert_eq!(packet.flags(), (false, false));
        assert_eq!(packet.fragment_offset(), 0);
        assert_eq!(packet.src_addr(), OWN_IP);
        assert!(packet.verify_checksum());
        assert_eq!(packet.payload(), Some(&[1u8, 2, 3][..]));

        assert_eq!(
            log.events()[0],
            Event::Ipv4Packet {
                src: OWN_IP,
                dst: PEER_IP
            }
        );
    }

    #[test]
    fn oversized_send_is_dropped() {
        let log = Arc::new(RecordingLog::new());
        let (stack, frames) = stack(&log);
        let ethernet = stack.ethernet();

        ethernet
            .ipv4()
            .send(ethernet, PEER_MAC, PEER_IP, IpProtocol::ICMP, &vec![0; 65516])
            .unwrap();

        assert!(frames.try_recv().is_err());
        assert!(log.events().is_empty());
    }
}
