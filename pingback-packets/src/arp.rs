use crate::MacAddr;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

impl TryFrom<u16> for ArpOp {
    type Error = &'static str;

    fn try_from(opcode: u16) -> Result<Self, Self::Error> {
        match opcode {
            1 => Ok(ArpOp::Request),
            2 => Ok(ArpOp::Reply),
            _ => Err("Unknown ARP opcode"),
        }
    }
}

pub enum ArpHardwareType {
    Ethernet = 1,
}

/// Size of an ARP packet mapping 6 byte MAC addresses to 4 byte IPv4 addresses.
pub const ARP_PACKET_LEN: usize = 28;

const HARDWARE_TYPE_RANGE: (usize, usize) = (0, 2);
const PROTOCOL_TYPE_RANGE: (usize, usize) = (2, 4);
const HARDWARE_ADDR_LEN_OFFSET: usize = 4;
const PROTOCOL_ADDR_LEN_OFFSET: usize = 5;
const OPCODE_RANGE: (usize, usize) = (6, 8);
const SENDER_HARDWARE_ADDR_RANGE: (usize, usize) = (8, 14);
const SENDER_PROTOCOL_ADDR_RANGE: (usize, usize) = (14, 18);
const TARGET_HARDWARE_ADDR_RANGE: (usize, usize) = (18, 24);
const TARGET_PROTOCOL_ADDR_RANGE: (usize, usize) = (24, 28);

///
/// View of an Ethernet/IPv4 ARP packet as described in RFC 826
/// https://tools.ietf.org/html/rfc826
///
/// The address fields sit at fixed offsets for 6 byte hardware and 4 byte protocol addresses,
/// which is the only combination this crate reads or writes.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArpPacket<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> ArpPacket<T> {
    /// Validates that the buffer holds all 28 bytes of the packet. Trailing bytes, such as
    /// Ethernet padding, are ignored.
    pub fn new_checked(buffer: T) -> Result<ArpPacket<T>, &'static str> {
        if buffer.as_ref().len() < ARP_PACKET_LEN {
            return Err("Packet is less than the minimum of 28 bytes");
        }
        Ok(ArpPacket { buffer })
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }

    pub fn hardware_type(&self) -> u16 {
        self.read_u16(HARDWARE_TYPE_RANGE)
    }

    pub fn protocol_type(&self) -> u16 {
        self.read_u16(PROTOCOL_TYPE_RANGE)
    }

    pub fn hardware_addr_len(&self) -> u8 {
        self.buffer.as_ref()[HARDWARE_ADDR_LEN_OFFSET]
    }

    pub fn protocol_addr_len(&self) -> u8 {
        self.buffer.as_ref()[PROTOCOL_ADDR_LEN_OFFSET]
    }

    pub fn opcode(&self) -> u16 {
        self.read_u16(OPCODE_RANGE)
    }

    pub fn sender_mac_addr(&self) -> MacAddr {
        let (start, end) = SENDER_HARDWARE_ADDR_RANGE;
        MacAddr::from_slice(&self.buffer.as_ref()[start..end])
    }

    pub fn sender_ipv4_addr(&self) -> Ipv4Addr {
        self.read_ipv4(SENDER_PROTOCOL_ADDR_RANGE)
    }

    pub fn target_mac_addr(&self) -> MacAddr {
        let (start, end) = TARGET_HARDWARE_ADDR_RANGE;
        MacAddr::from_slice(&self.buffer.as_ref()[start..end])
    }

    pub fn target_ipv4_addr(&self) -> Ipv4Addr {
        self.read_ipv4(TARGET_PROTOCOL_ADDR_RANGE)
    }

    fn read_u16(&self, (start, _): (usize, usize)) -> u16 {
        let data = self.buffer.as_ref();
        u16::from_be_bytes([data[start], data[start + 1]])
    }

    fn read_ipv4(&self, (start, _): (usize, usize)) -> Ipv4Addr {
        let data = self.buffer.as_ref();
        Ipv4Addr::new(data[start], data[start + 1], data[start + 2], data[start + 3])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> ArpPacket<T> {
    pub fn set_hardware_type(&mut self, htype: u16) {
        self.set_arp_data(&htype.to_be_bytes(), HARDWARE_TYPE_RANGE);
    }

    pub fn set_protocol_type(&mut self, ptype: u16) {
        self.set_arp_data(&ptype.to_be_bytes(), PROTOCOL_TYPE_RANGE);
    }

    pub fn set_hardware_addr_len(&mut self, len: u8) {
        self.buffer.as_mut()[HARDWARE_ADDR_LEN_OFFSET] = len;
    }

    pub fn set_protocol_addr_len(&mut self, len: u8) {
        self.buffer.as_mut()[PROTOCOL_ADDR_LEN_OFFSET] = len;
    }

    pub fn set_opcode(&mut self, code: u16) {
        self.set_arp_data(&code.to_be_bytes(), OPCODE_RANGE);
    }

    pub fn set_sender_mac_addr(&mut self, addr: MacAddr) {
        self.set_arp_data(&addr.bytes, SENDER_HARDWARE_ADDR_RANGE);
    }

    pub fn set_sender_ipv4_addr(&mut self, addr: Ipv4Addr) {
        self.set_arp_data(&addr.octets(), SENDER_PROTOCOL_ADDR_RANGE);
    }

    pub fn set_target_mac_addr(&mut self, addr: MacAddr) {
        self.set_arp_data(&addr.bytes, TARGET_HARDWARE_ADDR_RANGE);
    }

    pub fn set_target_ipv4_addr(&mut self, addr: Ipv4Addr) {
        self.set_arp_data(&addr.octets(), TARGET_PROTOCOL_ADDR_RANGE);
    }

    fn set_arp_data(&mut self, bytes: &[u8], (start, end): (usize, usize)) {
        self.buffer.as_mut()[start..end].copy_from_slice(bytes);
    }
}

impl ArpPacket<Vec<u8>> {
    /// Constructs a zeroed 28 byte packet with the Ethernet/IPv4 address lengths filled in.
    pub fn empty() -> ArpPacket<Vec<u8>> {
        let mut packet = ArpPacket {
            buffer: vec![0; ARP_PACKET_LEN],
        };
        packet.set_hardware_addr_len(6);
        packet.set_protocol_addr_len(4);
        packet
    }
}
