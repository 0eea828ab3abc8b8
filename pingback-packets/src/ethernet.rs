use crate::*;

pub const ETHERNET_HEADER_LEN: usize = 14;

/// Ethernet II frame view over any byte buffer.
///
/// ```text
/// 0                    6                    12                     14
/// |---6 byte Dest_MAC--|---6 byte Src_MAC---|--2 Byte EtherType---|--payload--
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EthernetFrame<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> EthernetFrame<T> {
    pub fn new_checked(buffer: T) -> Result<EthernetFrame<T>, &'static str> {
        // We could support other formats for the frames, but IP sits atop Ethernet II
        if buffer.as_ref().len() < ETHERNET_HEADER_LEN {
            return Err("Frame is less than the minimum of 14 bytes");
        }
        Ok(EthernetFrame { buffer })
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }

    pub fn dest_mac(&self) -> MacAddr {
        MacAddr::from_slice(&self.buffer.as_ref()[0..6])
    }

    pub fn src_mac(&self) -> MacAddr {
        MacAddr::from_slice(&self.buffer.as_ref()[6..12])
    }

    pub fn ether_type(&self) -> u16 {
        let data = self.buffer.as_ref();
        u16::from_be_bytes([data[12], data[13]])
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[ETHERNET_HEADER_LEN..]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> EthernetFrame<T> {
    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        self.buffer.as_mut()[..6].copy_from_slice(&mac.bytes);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        self.buffer.as_mut()[6..12].copy_from_slice(&mac.bytes);
    }

    pub fn set_ether_type(&mut self, ether_type: u16) {
        self.buffer.as_mut()[12..=13].copy_from_slice(&ether_type.to_be_bytes());
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[ETHERNET_HEADER_LEN..]
    }
}

impl EthernetFrame<Vec<u8>> {
    /// Returns an empty EthernetFrame where all header values are zero. This function allocates a
    /// new buffer to hold the header.
    pub fn empty() -> EthernetFrame<Vec<u8>> {
        EthernetFrame {
            buffer: vec![0; ETHERNET_HEADER_LEN],
        }
    }

    /// Builds a complete frame: header followed by a copy of `payload`.
    pub fn encap(dest: MacAddr, src: MacAddr, ether_type: u16, payload: &[u8]) -> Self {
        let mut frame = EthernetFrame::empty();
        frame.set_dest_mac(dest);
        frame.set_src_mac(src);
        frame.set_ether_type(ether_type);
        frame.set_payload(payload);
        frame
    }

    pub fn set_payload(&mut self, payload: &[u8]) {
        self.buffer.truncate(ETHERNET_HEADER_LEN);
        self.buffer.reserve_exact(payload.len());
        self.buffer.extend_from_slice(payload);
    }
}
