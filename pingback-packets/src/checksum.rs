/// Computes the Internet checksum of RFC 1071 over `data`.
///
/// The buffer is summed as big-endian 16 bit words, folding the carry back into the low 16 bits
/// after every addition. A trailing odd byte is summed as a word padded with a zero byte. The
/// result is the one's complement of the folded sum and belongs in the packet in network order,
/// e.g. `data[10..12].copy_from_slice(&checksum(header).to_be_bytes())`.
///
/// Running it over a buffer whose checksum field is already filled in yields zero.
pub fn checksum(data: &[u8]) -> u16 {
    let mut chunks = data.chunks_exact(2);
    let mut sum = chunks.by_ref().fold(0u32, |acc, word| {
        fold_carry(acc + u32::from(u16::from_be_bytes([word[0], word[1]])))
    });
    if let [last] = chunks.remainder() {
        sum = fold_carry(sum + (u32::from(*last) << 8));
    }
    !(sum as u16)
}

fn fold_carry(sum: u32) -> u32 {
    (sum >> 16) + (sum & 0xFFFF)
}
