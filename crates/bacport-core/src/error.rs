use core::fmt;

/// Errors raised while encoding a frame into a caller-owned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The destination buffer has no room for the next field.
    BufferTooSmall,
    /// A value does not fit the width the wire format allows for it
    /// (priority outside 1..=16, string longer than one length octet can
    /// carry, MAC wider than its declared length, instance above 22 bits).
    ValueOutOfRange,
    /// A declared length is not one the encoder can produce.
    InvalidLength,
    /// The value kind has no representation in this narrow codec.
    Unsupported,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("buffer too small"),
            Self::ValueOutOfRange => f.write_str("value out of range"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::Unsupported => f.write_str("unsupported value kind"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Errors raised while decoding a received frame.
///
/// Every variant corresponds to a malformed or out-of-scope frame; decoders
/// never read past the end of the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The buffer ended before the field it declares.
    UnexpectedEof,
    /// A tag octet does not parse as the structure the frame requires here.
    InvalidTag,
    /// A length field holds a value outside what the format allows.
    InvalidLength,
    /// A fixed field (protocol version, charset octet) holds a bad value.
    InvalidValue,
    /// The frame is well-formed BACnet but outside this codec's narrow
    /// tag set (segmented APDUs, network-layer messages, foreign tags).
    Unsupported,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::InvalidTag => f.write_str("invalid tag"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::InvalidValue => f.write_str("invalid value"),
            Self::Unsupported => f.write_str("unsupported frame"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
