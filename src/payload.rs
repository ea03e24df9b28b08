/// Size of every record the server sends.
pub const SENTINEL_LEN: usize = 10296;

/// Value of the first byte of every record.
pub const SENTINEL_MARKER: u8 = 0xAF;

/// The record written to every connected peer: the marker byte followed by zeros.
pub static SENTINEL: [u8; SENTINEL_LEN] = sentinel();

const fn sentinel() -> [u8; SENTINEL_LEN] {
    let mut buf = [0u8; SENTINEL_LEN];
    buf[0] = SENTINEL_MARKER;
    buf
}

/// Returns true if `buf` is exactly one sentinel record.
pub fn is_sentinel(buf: &[u8]) -> bool {
    buf.len() == SENTINEL_LEN && buf[0] == SENTINEL_MARKER && buf[1..].iter().all(|b| *b == 0)
}
