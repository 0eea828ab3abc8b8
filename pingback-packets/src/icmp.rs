use crate::checksum;

pub const ICMP_HEADER_LEN: usize = 8;

pub const ICMP_ECHO_REPLY: u8 = 0;
pub const ICMP_ECHO: u8 = 8;

/// ICMP echo / echo reply message view (RFC 792).
///
/// ```text
/// 0        1        2                 4                 6                 8
/// |--type--|--code--|----checksum-----|---identifier----|----sequence-----|--data--
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IcmpPacket<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> IcmpPacket<T> {
    pub fn new_checked(buffer: T) -> Result<IcmpPacket<T>, &'static str> {
        if buffer.as_ref().len() < ICMP_HEADER_LEN {
            return Err("Data is too short to be an ICMP Packet");
        }
        Ok(IcmpPacket { buffer })
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }

    pub fn msg_type(&self) -> u8 {
        self.buffer.as_ref()[0]
    }

    pub fn code(&self) -> u8 {
        self.buffer.as_ref()[1]
    }

    pub fn checksum(&self) -> u16 {
        self.read_u16(2)
    }

    pub fn identifier(&self) -> u16 {
        self.read_u16(4)
    }

    pub fn sequence(&self) -> u16 {
        self.read_u16(6)
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer.as_ref()[ICMP_HEADER_LEN..]
    }

    pub fn is_echo_request(&self) -> bool {
        self.msg_type() == ICMP_ECHO && self.code() == 0
    }

    /// The checksum covers the whole message, data included.
    pub fn verify_checksum(&self) -> bool {
        checksum(self.buffer.as_ref()) == 0
    }

    fn read_u16(&self, offset: usize) -> u16 {
        let data = self.buffer.as_ref();
        u16::from_be_bytes([data[offset], data[offset + 1]])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> IcmpPacket<T> {
    pub fn set_msg_type(&mut self, msg_type: u8) {
        self.buffer.as_mut()[0] = msg_type;
    }

    pub fn set_code(&mut self, code: u8) {
        self.buffer.as_mut()[1] = code;
    }

    pub fn set_identifier(&mut self, identifier: u16) {
        self.buffer.as_mut()[4..6].copy_from_slice(&identifier.to_be_bytes());
    }

    pub fn set_sequence(&mut self, sequence: u16) {
        self.buffer.as_mut()[6..8].copy_from_slice(&sequence.to_be_bytes());
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[ICMP_HEADER_LEN..]
    }

    /// Zeroes the checksum field and recomputes it over the entire message.
    pub fn fill_checksum(&mut self) {
        self.buffer.as_mut()[2..4].copy_from_slice(&[0, 0]);
        let sum = checksum(self.buffer.as_ref());
        self.buffer.as_mut()[2..4].copy_from_slice(&sum.to_be_bytes());
    }
}

impl IcmpPacket<Vec<u8>> {
    /// Builds an echo request carrying `data`, checksum filled in.
    pub fn echo_request(identifier: u16, sequence: u16, data: &[u8]) -> IcmpPacket<Vec<u8>> {
        let mut buffer = vec![0; ICMP_HEADER_LEN];
        buffer.extend_from_slice(data);
        let mut packet = IcmpPacket { buffer };
        packet.set_msg_type(ICMP_ECHO);
        packet.set_identifier(identifier);
        packet.set_sequence(sequence);
        packet.fill_checksum();
        packet
    }

    /// Copies the request verbatim and turns it into its echo reply: type 0, code 0 and a
    /// recomputed checksum. Identifier, sequence and data are untouched.
    pub fn echo_reply_to<U: AsRef<[u8]>>(request: &IcmpPacket<U>) -> IcmpPacket<Vec<u8>> {
        let mut reply = IcmpPacket {
            buffer: request.buffer.as_ref().to_vec(),
        };
        reply.set_msg_type(ICMP_ECHO_REPLY);
        reply.set_code(0);
        reply.fill_checksum();
        reply
    }
}
