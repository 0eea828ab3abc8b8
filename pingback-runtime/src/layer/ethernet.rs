use crate::event::{Event, EventLog};
use crate::layer::{ArpLayer, Ipv4Layer};
use crate::sink::{FrameSink, SinkError};
use pingback_packets::{EthernetFrame, MacAddr, ARP_ETHER_TYPE, IPV4_ETHER_TYPE};
use std::sync::Arc;
use tracing::trace;

/// Bottom of the stack. Receives raw frames, dispatches their payload by ether type, and frames
/// everything the upper layers send before handing it to the sink.
pub struct EthernetLayer {
    mac: MacAddr,
    log: Arc<dyn EventLog>,
    sink: Option<Box<dyn FrameSink>>,
    arp: ArpLayer,
    ipv4: Ipv4Layer,
}

impl EthernetLayer {
    pub fn new(
        mac: MacAddr,
        log: Arc<dyn EventLog>,
        sink: Option<Box<dyn FrameSink>>,
        arp: ArpLayer,
        ipv4: Ipv4Layer,
    ) -> Self {
        EthernetLayer {
            mac,
            log,
            sink,
            arp,
            ipv4,
        }
    }

    /// Our own hardware address, used as the source of every frame we send.
    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    pub fn arp(&self) -> &ArpLayer {
        &self.arp
    }

    pub fn ipv4(&self) -> &Ipv4Layer {
        &self.ipv4
    }

    /// True when frames passed to `send` actually leave the stack.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub fn handle(&self, buffer: &[u8]) -> Result<(), SinkError> {
        let frame = match EthernetFrame::new_checked(buffer) {
            Ok(frame) => frame,
            Err(reason) => {
                trace!(len = buffer.len(), reason, "dropping ethernet frame");
                return Ok(());
            }
        };

        let src_mac = frame.src_mac();
        self.log.log(&Event::EthernetFrame {
            src: src_mac,
            dst: frame.dest_mac(),
        });

        match frame.ether_type() {
            IPV4_ETHER_TYPE => self.ipv4.handle(self, src_mac, frame.payload()),
            ARP_ETHER_TYPE => self.arp.handle(self, &self.ipv4, frame.payload()),
            ether_type => {
                trace!(ether_type, "dropping frame with unsupported ether type");
                Ok(())
            }
        }
    }

    pub fn send(&self, dest: MacAddr, ether_type: u16, payload: &[u8]) -> Result<(), SinkError> {
        let frame = EthernetFrame::encap(dest, self.mac, ether_type, payload);
        self.log.log(&Event::EthernetFrame {
            src: self.mac,
            dst: dest,
        });

        match &self.sink {
            Some(sink) => sink.transmit(frame.into_inner().as_slice()),
            None => {
                trace!(%dest, ether_type, "no sink attached, frame not transmitted");
                Ok(())
            }
        }
    }
}
