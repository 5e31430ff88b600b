use crate::encoding::{reader::Reader, tag::Tag, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Writes `value` big-endian in the smallest of 1, 2, 3 or 4 octets and
/// returns the width used.
pub fn encode_unsigned(w: &mut Writer<'_>, value: u32) -> Result<usize, EncodeError> {
    let len = if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFF_FFFF {
        3
    } else {
        4
    };
    for i in (0..len).rev() {
        w.write_u8((value >> (i * 8)) as u8)?;
    }
    Ok(len)
}

/// Reads a big-endian unsigned value of `len` octets (1..=4).
pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    if len == 0 || len > 4 {
        return Err(DecodeError::InvalidLength);
    }
    let mut value = 0u32;
    for &b in r.read_exact(len)? {
        value = (value << 8) | b as u32;
    }
    Ok(value)
}

/// Writes the low `width` octets of `value` big-endian.
///
/// The width is explicit and checked: a value wider than the slot is an
/// error, never a silent truncation.
pub fn encode_be_uint(w: &mut Writer<'_>, value: u64, width: usize) -> Result<(), EncodeError> {
    if width == 0 || width > 8 {
        return Err(EncodeError::InvalidLength);
    }
    if width < 8 && value >> (width * 8) != 0 {
        return Err(EncodeError::ValueOutOfRange);
    }
    for i in (0..width).rev() {
        w.write_u8((value >> (i * 8)) as u8)?;
    }
    Ok(())
}

/// Reads a big-endian unsigned value of `len` octets (1..=8).
pub fn decode_be_uint(r: &mut Reader<'_>, len: usize) -> Result<u64, DecodeError> {
    if len == 0 || len > 8 {
        return Err(DecodeError::InvalidLength);
    }
    let mut value = 0u64;
    for &b in r.read_exact(len)? {
        value = (value << 8) | b as u64;
    }
    Ok(value)
}

/// Context-tagged unsigned value using the minimal width.
pub fn encode_ctx_unsigned(w: &mut Writer<'_>, tag_num: u8, value: u32) -> Result<(), EncodeError> {
    let mut scratch = [0u8; 4];
    let mut tw = Writer::new(&mut scratch);
    let len = encode_unsigned(&mut tw, value)? as u32;
    Tag::Context { tag_num, len }.encode(w)?;
    w.write_all(&scratch[..len as usize])
}

/// Context-tagged unsigned value at a caller-fixed width.
///
/// Used where the peer expects a fixed field regardless of the value, such
/// as the three-octet Who-Is range bounds.
pub fn encode_ctx_unsigned_fixed(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: u32,
    width: usize,
) -> Result<(), EncodeError> {
    if width == 0 || width > 4 {
        return Err(EncodeError::InvalidLength);
    }
    Tag::Context {
        tag_num,
        len: width as u32,
    }
    .encode(w)?;
    encode_be_uint(w, value as u64, width)
}

/// Context-tagged packed object identifier (always four octets).
pub fn encode_ctx_object_id(
    w: &mut Writer<'_>,
    tag_num: u8,
    object_id_raw: u32,
) -> Result<(), EncodeError> {
    Tag::Context { tag_num, len: 4 }.encode(w)?;
    w.write_be_u32(object_id_raw)
}

pub fn encode_opening_tag(w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
    Tag::Opening { tag_num }.encode(w)
}

pub fn encode_closing_tag(w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
    Tag::Closing { tag_num }.encode(w)
}

#[cfg(test)]
mod tests {
    use super::{
        decode_be_uint, decode_unsigned, encode_be_uint, encode_ctx_unsigned,
        encode_ctx_unsigned_fixed, encode_unsigned,
    };
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::EncodeError;
    use proptest::prelude::*;

    #[test]
    fn unsigned_width_ladder() {
        for (value, width) in [
            (0u32, 1),
            (255, 1),
            (256, 2),
            (65535, 2),
            (65536, 3),
            (16_777_215, 3),
            (16_777_216, 4),
            (u32::MAX, 4),
        ] {
            let mut buf = [0u8; 4];
            let mut w = Writer::new(&mut buf);
            assert_eq!(encode_unsigned(&mut w, value).unwrap(), width);
            let mut r = Reader::new(w.as_written());
            assert_eq!(decode_unsigned(&mut r, width).unwrap(), value);
        }
    }

    #[test]
    fn fixed_width_refuses_overflow() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        assert_eq!(
            encode_be_uint(&mut w, 0x1_0000, 2).unwrap_err(),
            EncodeError::ValueOutOfRange
        );
        encode_be_uint(&mut w, 0xFFFF, 2).unwrap();
        assert_eq!(w.as_written(), &[0xFF, 0xFF]);
    }

    #[test]
    fn ctx_unsigned_fixed_pads_high_octets() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        encode_ctx_unsigned_fixed(&mut w, 0, 9, 3).unwrap();
        assert_eq!(w.as_written(), &[0x0B, 0x00, 0x00, 0x09]);
    }

    #[test]
    fn ctx_unsigned_minimal_width() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        encode_ctx_unsigned(&mut w, 1, 85).unwrap();
        assert_eq!(w.as_written(), &[0x19, 0x55]);
    }

    proptest! {
        #[test]
        fn unsigned_roundtrip(v in any::<u32>()) {
            let mut buf = [0u8; 4];
            let mut w = Writer::new(&mut buf);
            let len = encode_unsigned(&mut w, v).unwrap();
            let mut r = Reader::new(w.as_written());
            prop_assert_eq!(decode_unsigned(&mut r, len).unwrap(), v);
        }

        #[test]
        fn wide_uint_roundtrip(v in any::<u64>(), extra in 0usize..3) {
            // Any width that can hold the value round-trips it.
            let needed = (8 - v.leading_zeros() as usize / 8).max(1);
            let width = (needed + extra).min(8);
            let mut buf = [0u8; 8];
            let mut w = Writer::new(&mut buf);
            encode_be_uint(&mut w, v, width).unwrap();
            let mut r = Reader::new(w.as_written());
            prop_assert_eq!(decode_be_uint(&mut r, width).unwrap(), v);
        }
    }
}
