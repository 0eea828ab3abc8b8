use crate::event::{Event, EventLog};
use crate::layer::{EthernetLayer, Ipv4Layer};
use crate::sink::SinkError;
use pingback_packets::{IcmpPacket, IpProtocol, MacAddr};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, trace};

/// Answers ICMP echo requests. No other ICMP message is acted on.
pub struct IcmpLayer {
    log: Arc<dyn EventLog>,
}

impl IcmpLayer {
    pub fn new(log: Arc<dyn EventLog>) -> Self {
        IcmpLayer { log }
    }

    pub fn handle(
        &self,
        ethernet: &EthernetLayer,
        ipv4: &Ipv4Layer,
        src_mac: MacAddr,
        src_ip: Ipv4Addr,
        dest_ip: Ipv4Addr,
        buffer: &[u8],
    ) -> Result<(), SinkError> {
        let request = match IcmpPacket::new_checked(buffer) {
            Ok(packet) => packet,
            Err(reason) => {
                trace!(len = buffer.len(), reason, "dropping icmp message");
                return Ok(());
            }
        };
        if !request.is_echo_request() {
            trace!(
                msg_type = request.msg_type(),
                code = request.code(),
                "ignoring icmp message that is not an echo request"
            );
            return Ok(());
        }
        self.log.log(&Event::IcmpPing);

        let reply = IcmpPacket::echo_reply_to(&request);
        self.log.log(&Event::IcmpPong);
        debug!(
            from = %dest_ip,
            to = %src_ip,
            identifier = reply.identifier(),
            sequence = reply.sequence(),
            "sending echo reply"
        );
        ipv4.send(
            ethernet,
            src_mac,
            src_ip,
            IpProtocol::ICMP,
            &reply.into_inner(),
        )
    }
}
