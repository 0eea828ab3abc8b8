use crate::{Error, SNAPLEN};
use pcap::{Active, Capture, Linktype, Packet, PacketHeader, Savefile};
use pingback_runtime::{FrameSink, SinkError};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// DLT_EN10MB
const ETHERNET_LINKTYPE: Linktype = Linktype(1);

/// Writes every frame into an Ethernet savefile, stamped with the time it was sent.
pub struct PcapDumpSink {
    savefile: Mutex<Savefile>,
}

impl PcapDumpSink {
    /// Creates (or truncates) the savefile at `path`. The file is complete once the sink is
    /// dropped.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let savefile = Capture::dead(ETHERNET_LINKTYPE)?.savefile(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "writing replies to capture file");
        Ok(PcapDumpSink {
            savefile: Mutex::new(savefile),
        })
    }
}

fn timestamp() -> libc::timeval {
    // A clock before 1970 only costs us the timestamp
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    libc::timeval {
        tv_sec: now.as_secs() as libc::time_t,
        tv_usec: now.subsec_micros() as libc::suseconds_t,
    }
}

impl FrameSink for PcapDumpSink {
    fn transmit(&self, frame: &[u8]) -> Result<(), SinkError> {
        let header = PacketHeader {
            ts: timestamp(),
            caplen: frame.len() as u32,
            len: frame.len() as u32,
        };
        let mut savefile = self.savefile.lock().map_err(|_| Error::Poisoned)?;
        savefile.write(&Packet {
            header: &header,
            data: frame,
        });
        Ok(())
    }
}

/// Injects every frame on a live device.
pub struct PcapInjectSink {
    capture: Mutex<Capture<Active>>,
}

impl PcapInjectSink {
    /// Opens `device` for injection. This handle is separate from any capture on the same device.
    pub fn open(device: &str) -> Result<Self, Error> {
        let capture = Capture::from_device(device)?.snaplen(SNAPLEN).open()?;
        debug!(device, "injecting replies on live device");
        Ok(PcapInjectSink {
            capture: Mutex::new(capture),
        })
    }
}

impl FrameSink for PcapInjectSink {
    fn transmit(&self, frame: &[u8]) -> Result<(), SinkError> {
        let mut capture = self.capture.lock().map_err(|_| Error::Poisoned)?;
        capture.sendpacket(frame).map_err(Error::from)?;
        Ok(())
    }
}
