//! Variable-length integers as used on the Bitmessage wire.
//!
//! Values below `0xfd` take one byte. Larger values carry a one-byte marker
//! (`0xfd`, `0xfe`, `0xff`) followed by a big-endian `u16`, `u32` or `u64`.

use bytes::{Buf, BufMut};

use crate::error::{WireError, WireResult};

/// Read a varint, advancing `buf` past it.
pub fn read_varint(buf: &mut &[u8]) -> WireResult<u64> {
    ensure(buf, 1, "varint")?;
    let marker = buf.get_u8();
    match marker {
        0xfd => {
            ensure(buf, 2, "varint")?;
            Ok(u64::from(buf.get_u16()))
        }
        0xfe => {
            ensure(buf, 4, "varint")?;
            Ok(u64::from(buf.get_u32()))
        }
        0xff => {
            ensure(buf, 8, "varint")?;
            Ok(buf.get_u64())
        }
        small => Ok(u64::from(small)),
    }
}

/// Append the shortest encoding of `value`.
pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    if value < 0xfd {
        out.put_u8(value as u8);
    } else if value <= u64::from(u16::MAX) {
        out.put_u8(0xfd);
        out.put_u16(value as u16);
    } else if value <= u64::from(u32::MAX) {
        out.put_u8(0xfe);
        out.put_u32(value as u32);
    } else {
        out.put_u8(0xff);
        out.put_u64(value);
    }
}

/// Encoded size of `value` in bytes.
pub fn varint_len(value: u64) -> usize {
    if value < 0xfd {
        1
    } else if value <= u64::from(u16::MAX) {
        3
    } else if value <= u64::from(u32::MAX) {
        5
    } else {
        9
    }
}

/// Fail with [`WireError::Truncated`] unless `buf` holds `needed` more bytes.
pub(crate) fn ensure(buf: &[u8], needed: usize, what: &'static str) -> WireResult<()> {
    if buf.remaining() < needed {
        return Err(WireError::Truncated {
            what,
            needed,
            available: buf.remaining(),
        });
    }
    Ok(())
}

/// Read exactly `N` bytes into an array.
pub(crate) fn read_array<const N: usize>(buf: &mut &[u8], what: &'static str) -> WireResult<[u8; N]> {
    ensure(buf, N, what)?;
    let mut arr = [0u8; N];
    buf.copy_to_slice(&mut arr);
    Ok(arr)
}

/// Read a varint length prefix followed by that many bytes.
pub(crate) fn read_var_bytes(buf: &mut &[u8], max: usize, what: &'static str) -> WireResult<Vec<u8>> {
    let len = read_varint(buf)?;
    if len > max as u64 {
        return Err(WireError::FieldTooLarge { what, size: len, max });
    }
    let len = len as usize;
    ensure(buf, len, what)?;
    let out = buf[..len].to_vec();
    buf.advance(len);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_varint(&mut out, value);
        out
    }

    #[test]
    fn encoding_boundaries() {
        assert_eq!(encode(0xfc), vec![0xfc]);
        assert_eq!(encode(0xfd), vec![0xfd, 0x00, 0xfd]);
        assert_eq!(encode(0x1_0000), vec![0xfe, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(encode(u64::MAX).len(), 9);
    }

    #[test]
    fn len_matches_encoding() {
        for value in [0, 1, 0xfc, 0xfd, 0xffff, 0x1_0000, 0xffff_ffff, 1 << 40] {
            assert_eq!(varint_len(value), encode(value).len(), "value {value}");
        }
    }

    #[test]
    fn read_advances_past_value() {
        let data = [0xfd, 0x01, 0x00, 0x07];
        let mut buf = &data[..];
        assert_eq!(read_varint(&mut buf).unwrap(), 256);
        assert_eq!(buf, &[0x07]);
    }

    #[test]
    fn read_truncated() {
        let mut buf: &[u8] = &[0xfe, 0x00, 0x01];
        let err = read_varint(&mut buf).unwrap_err();
        assert!(matches!(err, WireError::Truncated { what: "varint", .. }));
    }

    #[test]
    fn read_empty() {
        let mut buf: &[u8] = &[];
        assert!(read_varint(&mut buf).is_err());
    }

    #[test]
    fn var_bytes_respects_max() {
        let mut data = Vec::new();
        write_varint(&mut data, 10);
        data.extend_from_slice(&[0u8; 10]);
        let mut buf = &data[..];
        let err = read_var_bytes(&mut buf, 4, "signature").unwrap_err();
        assert!(matches!(err, WireError::FieldTooLarge { size: 10, .. }));
    }
}
