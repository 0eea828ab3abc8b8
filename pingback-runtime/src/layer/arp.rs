use crate::event::{Event, EventLog};
use crate::layer::{EthernetLayer, Ipv4Layer};
use crate::sink::SinkError;
use pingback_packets::{ArpHardwareType, ArpOp, ArpPacket, ARP_ETHER_TYPE, IPV4_ETHER_TYPE};
use std::convert::TryFrom;
use std::sync::Arc;
use tracing::{debug, trace};

/// Answers ARP requests for our own IPv4 address.
///
/// Nothing is cached and no request is ever originated: replies and requests for other hosts are
/// logged (requests only) and otherwise ignored.
pub struct ArpLayer {
    log: Arc<dyn EventLog>,
}

impl ArpLayer {
    pub fn new(log: Arc<dyn EventLog>) -> Self {
        ArpLayer { log }
    }

    pub fn handle(
        &self,
        ethernet: &EthernetLayer,
        ipv4: &Ipv4Layer,
        buffer: &[u8],
    ) -> Result<(), SinkError> {
        let request = match ArpPacket::new_checked(buffer) {
            Ok(packet) => packet,
            Err(reason) => {
                trace!(len = buffer.len(), reason, "dropping arp packet");
                return Ok(());
            }
        };

        if request.hardware_type() != ArpHardwareType::Ethernet as u16 {
            trace!(
                hardware_type = request.hardware_type(),
                "dropping arp packet for non-ethernet hardware"
            );
            return Ok(());
        }
        if request.protocol_type() != IPV4_ETHER_TYPE {
            trace!(
                protocol_type = request.protocol_type(),
                "dropping arp packet for non-ipv4 protocol"
            );
            return Ok(());
        }
        match ArpOp::try_from(request.opcode()) {
            Ok(ArpOp::Request) => {}
            _ => {
                trace!(opcode = request.opcode(), "ignoring arp packet that is not a request");
                return Ok(());
            }
        }

        let requester_mac = request.sender_mac_addr();
        let requester_ip = request.sender_ipv4_addr();
        self.log.log(&Event::ArpRequest {
            sender_mac: requester_mac,
            sender_ip: requester_ip,
            target_mac: request.target_mac_addr(),
            target_ip: request.target_ipv4_addr(),
        });

        if !ipv4.owns(request.target_ipv4_addr()) {
            trace!(target_ip = %request.target_ipv4_addr(), "arp request is not for us");
            return Ok(());
        }

        let mut reply = ArpPacket::empty();
        reply.set_hardware_type(request.hardware_type());
        reply.set_protocol_type(request.protocol_type());
        reply.set_hardware_addr_len(request.hardware_addr_len());
        reply.set_protocol_addr_len(request.protocol_addr_len());
        reply.set_opcode(ArpOp::Reply as u16);
        reply.set_sender_mac_addr(ethernet.mac());
        reply.set_sender_ipv4_addr(ipv4.addr());
        reply.set_target_mac_addr(requester_mac);
        reply.set_target_ipv4_addr(requester_ip);

        self.log.log(&Event::ArpReply {
            sender_mac: ethernet.mac(),
            sender_ip: ipv4.addr(),
            target_mac: requester_mac,
            target_ip: requester_ip,
        });
        debug!(to = %requester_ip, "sending arp reply");
        ethernet.send(requester_mac, ARP_ETHER_TYPE, &reply.into_inner())
    }
}
