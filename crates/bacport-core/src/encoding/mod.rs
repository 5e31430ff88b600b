/// Shared encode helpers: unsigned width ladders and context-tagged fields.
pub mod primitives;
/// Bounds-checked zero-copy reader for decoding received frames.
pub mod reader;
/// BACnet tag octets (application, context, opening/closing delimiters).
pub mod tag;
/// Writer that encodes frames into a caller-owned buffer.
pub mod writer;
