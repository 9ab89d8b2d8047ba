//! Length-prefixed frame codec
//!
//! Every request and response is a 4-byte little-endian u32 length
//! followed by exactly that many payload bytes. The byte order is part of
//! the wire contract with the client and must not vary. A zero-length
//! payload is valid and writes only the prefix.

use crate::{Result, TtsdError};
use std::io::{ErrorKind, Read, Write};

/// Maximum declared request length in bytes.
///
/// Guards against unbounded allocation from a malformed or hostile length
/// prefix. Enforced by the daemon loop between the header and payload
/// reads, not by the codec itself.
pub const MAX_REQUEST_LEN: u32 = 100_000;

/// Read a 4-byte frame header.
///
/// Returns `Ok(None)` when the stream is closed before a complete header
/// arrives (including a clean zero-byte read), which the caller treats as
/// normal termination. EINTR is propagated as [`TtsdError::Interrupted`]
/// rather than retried internally; only the shutdown signals are installed
/// without restart, so the caller can decide whether to exit or re-enter
/// the read.
pub fn read_header<R: Read>(input: &mut R) -> Result<Option<u32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;

    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => return Ok(None),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {
                return Err(TtsdError::Interrupted)
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Some(u32::from_le_bytes(buf)))
}

/// Read exactly `len` payload bytes, blocking until available.
///
/// Returns `Ok(None)` if the peer closes the stream mid-payload.
pub fn read_payload<R: Read>(input: &mut R, len: usize) -> Result<Option<Vec<u8>>> {
    let mut payload = vec![0u8; len];
    let mut filled = 0;

    while filled < len {
        match input.read(&mut payload[filled..]) {
            Ok(0) => return Ok(None),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {
                return Err(TtsdError::Interrupted)
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Some(payload))
}

/// Write one response frame and flush.
///
/// The flush is required so the client observes the complete frame
/// without additional buffering delay.
pub fn write_frame<W: Write>(output: &mut W, payload: &[u8]) -> Result<()> {
    output.write_all(&(payload.len() as u32).to_le_bytes())?;
    output.write_all(payload)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_roundtrip() {
        let mut input = Cursor::new(vec![0x39, 0x05, 0x00, 0x00]);
        let len = read_header(&mut input).unwrap();
        assert_eq!(len, Some(1337));
    }

    #[test]
    fn test_header_eof() {
        let mut input = Cursor::new(vec![]);
        assert_eq!(read_header(&mut input).unwrap(), None);
    }

    #[test]
    fn test_partial_header_is_eof() {
        // Stream closed after two of the four header bytes
        let mut input = Cursor::new(vec![0x01, 0x02]);
        assert_eq!(read_header(&mut input).unwrap(), None);
    }

    #[test]
    fn test_payload_read() {
        let mut input = Cursor::new(b"hello".to_vec());
        let payload = read_payload(&mut input, 5).unwrap().unwrap();
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn test_payload_truncated() {
        let mut input = Cursor::new(b"hel".to_vec());
        assert_eq!(read_payload(&mut input, 5).unwrap(), None);
    }

    #[test]
    fn test_write_frame() {
        let mut out = Vec::new();
        write_frame(&mut out, b"abc").unwrap();
        assert_eq!(out, vec![3, 0, 0, 0, b'a', b'b', b'c']);
    }

    #[test]
    fn test_write_empty_frame() {
        let mut out = Vec::new();
        write_frame(&mut out, &[]).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0]);
    }
}
