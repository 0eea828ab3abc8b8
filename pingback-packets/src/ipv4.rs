use crate::*;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

/// Size of the fixed IPv4 header, which is also the only size this crate emits.
pub const IPV4_HEADER_LEN: usize = 20;
pub const DEFAULT_TTL: u8 = 64;

/// IPv4 packet view (RFC 791). Only the fixed 20 byte header is guaranteed to be present;
/// `payload()` starts after `IHL * 4` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ipv4Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Ipv4Packet<T> {
    /// Checks only that the fixed header fits in the buffer. The version and header length
    /// fields are left to the caller.
    pub fn new_checked(buffer: T) -> Result<Ipv4Packet<T>, &'static str> {
        if buffer.as_ref().len() < IPV4_HEADER_LEN {
            return Err("Data is too short to be an IPv4 Packet");
        }
        Ok(Ipv4Packet { buffer })
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }

    pub fn version(&self) -> u8 {
        (self.buffer.as_ref()[0] & 0xF0) >> 4
    }

    /// Header length in 32 bit words
    pub fn ihl(&self) -> u8 {
        self.buffer.as_ref()[0] & 0x0F
    }

    /// Header length in bytes
    pub fn header_len(&self) -> usize {
        usize::from(self.ihl()) * 4
    }

    pub fn dscp(&self) -> u8 {
        self.buffer.as_ref()[1] >> 2
    }

    pub fn ecn(&self) -> u8 {
        self.buffer.as_ref()[1] & 0x03
    }

    pub fn total_len(&self) -> u16 {
        self.read_u16(2)
    }

    pub fn identification(&self) -> u16 {
        self.read_u16(4)
    }

    /// Returns tuple of (Don't Fragment, More Fragments)
    pub fn flags(&self) -> (bool, bool) {
        let data = self.buffer.as_ref();
        let df = (data[6] & 0x40) != 0;
        let mf = (data[6] & 0x20) != 0;
        (df, mf)
    }

    pub fn fragment_offset(&self) -> u16 {
        self.read_u16(6) & 0x1FFF
    }

    pub fn ttl(&self) -> u8 {
        self.buffer.as_ref()[8]
    }

    pub fn protocol(&self) -> IpProtocol {
        IpProtocol::from(self.buffer.as_ref()[9])
    }

    pub fn checksum(&self) -> u16 {
        self.read_u16(10)
    }

    pub fn src_addr(&self) -> Ipv4Addr {
        self.read_addr(12)
    }

    pub fn dest_addr(&self) -> Ipv4Addr {
        self.read_addr(16)
    }

    /// Bytes after the header, up to the end of the buffer. `None` when the header length
    /// field points past the end of the buffer.
    pub fn payload(&self) -> Option<&[u8]> {
        self.buffer.as_ref().get(self.header_len()..)
    }

    /// True when the header (options included) sums to zero with its checksum field.
    pub fn verify_checksum(&self) -> bool {
        match self.buffer.as_ref().get(..self.header_len()) {
            Some(header) if header.len() >= IPV4_HEADER_LEN => checksum(header) == 0,
            _ => false,
        }
    }

    fn read_u16(&self, offset: usize) -> u16 {
        let data = self.buffer.as_ref();
        u16::from_be_bytes([data[offset], data[offset + 1]])
    }

    fn read_addr(&self, offset: usize) -> Ipv4Addr {
        let data = self.buffer.as_ref();
        Ipv4Addr::new(
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        )
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Ipv4Packet<T> {
    pub fn set_version_and_ihl(&mut self, version: u8, ihl: u8) {
        self.buffer.as_mut()[0] = (version << 4) | (ihl & 0x0F);
    }

    pub fn set_total_len(&mut self, total_len: u16) {
        self.buffer.as_mut()[2..4].copy_from_slice(&total_len.to_be_bytes());
    }

    pub fn set_identification(&mut self, identification: u16) {
        self.buffer.as_mut()[4..6].copy_from_slice(&identification.to_be_bytes());
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.buffer.as_mut()[8] = ttl;
    }

    pub fn set_protocol(&mut self, protocol: IpProtocol) {
        self.buffer.as_mut()[9] = u8::from(protocol);
    }

    pub fn set_src_addr(&mut self, addr: Ipv4Addr) {
        self.buffer.as_mut()[12..16].copy_from_slice(&addr.octets());
    }

    pub fn set_dest_addr(&mut self, addr: Ipv4Addr) {
        self.buffer.as_mut()[16..20].copy_from_slice(&addr.octets());
    }

    /// Zeroes the checksum field, then stores the checksum of the first `IPV4_HEADER_LEN`
    /// bytes. Emitted headers never carry options, so this covers the whole header.
    pub fn fill_checksum(&mut self) {
        self.buffer.as_mut()[10..12].copy_from_slice(&[0, 0]);
        let sum = checksum(&self.buffer.as_ref()[..IPV4_HEADER_LEN]);
        self.buffer.as_mut()[10..12].copy_from_slice(&sum.to_be_bytes());
    }
}

impl Ipv4Packet<Vec<u8>> {
    /// Builds a packet with a 20 byte header, no options, identification 0, no fragmentation,
    /// TTL 64 and a filled in header checksum, followed by a copy of `payload`.
    pub fn encap(
        src: Ipv4Addr,
        dest: Ipv4Addr,
        protocol: IpProtocol,
        payload: &[u8],
    ) -> Result<Ipv4Packet<Vec<u8>>, &'static str> {
        let total_len = u16::try_from(IPV4_HEADER_LEN + payload.len())
            .map_err(|_| "Payload does not fit in an IPv4 Packet")?;

        let mut data = Vec::with_capacity(usize::from(total_len));
        data.resize(IPV4_HEADER_LEN, 0);
        let mut packet = Ipv4Packet { buffer: data };
        packet.set_version_and_ihl(4, (IPV4_HEADER_LEN / 4) as u8);
        packet.set_total_len(total_len);
        packet.set_identification(0);
        packet.set_ttl(DEFAULT_TTL);
        packet.set_protocol(protocol);
        packet.set_src_addr(src);
        packet.set_dest_addr(dest);
        packet.fill_checksum();
        packet.buffer.extend_from_slice(payload);
        Ok(packet)
    }
}
