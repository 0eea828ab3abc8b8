use crate::{Error, READ_TIMEOUT_MS, SNAPLEN};
use pcap::{Active, Capture, Offline};
use std::path::Path;
use tracing::debug;

enum Handle {
    Offline(Capture<Offline>),
    Live(Capture<Active>),
}

/// Delivers captured frames one at a time, either from a savefile or a live device.
pub struct PcapSource {
    handle: Handle,
}

impl PcapSource {
    /// Replays the frames stored in the savefile at `path`.
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let capture = Capture::from_file(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened capture file");
        Ok(PcapSource {
            handle: Handle::Offline(capture),
        })
    }

    /// Captures promiscuously on `device` until the process exits.
    pub fn open_device(device: &str) -> Result<Self, Error> {
        let capture = Capture::from_device(device)?
            .promisc(true)
            .snaplen(SNAPLEN)
            .timeout(READ_TIMEOUT_MS)
            .open()?;
        debug!(device, "opened live capture");
        Ok(PcapSource {
            handle: Handle::Live(capture),
        })
    }

    /// Returns the bytes of the next frame, or `None` once a savefile is exhausted. Live captures
    /// block until a frame arrives.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, Error> {
        loop {
            // pcap::Packet only borrows the capture buffer, so copy the frame out
            let result = match &mut self.handle {
                Handle::Offline(capture) => capture.next().map(|packet| packet.data.to_vec()),
                Handle::Live(capture) => capture.next().map(|packet| packet.data.to_vec()),
            };
            match result {
                Ok(frame) => return Ok(Some(frame)),
                Err(pcap::Error::NoMorePackets) => return Ok(None),
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Iterator for PcapSource {
    type Item = Result<Vec<u8>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
