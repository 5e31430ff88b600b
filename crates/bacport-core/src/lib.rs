//! BACnet present-value wire model in pure Rust.
//!
//! `bacport-core` encodes and decodes the frames a building-automation
//! client exchanges when discovering devices and reading or commanding
//! present values: NPDU headers, the confirmed/unconfirmed APDU shapes,
//! and the Who-Is, I-Am, ReadProperty and WriteProperty payloads. All
//! codecs are zero-copy over caller buffers and `no_std`-compatible, so
//! the crate can sit under an async client on a workstation or inside a
//! constrained controller alike.
//!
//! # Feature flags
//!
//! - **`std`** (default) — enables `std::error::Error` implementations.
//! - **`serde`** — derives `Serialize`/`Deserialize` on addressing types.
//! - **`defmt`** — derives `defmt::Format` for embedded logging.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

/// APDU (Application Protocol Data Unit) headers for requests and acks.
pub mod apdu;
/// Binary encoding primitives, tag system, and zero-copy reader/writer.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// NPDU (Network Protocol Data Unit) encoding and decoding.
pub mod npdu;
/// BACnet service request and response codecs.
pub mod services;
/// Core BACnet data types: object and property identifiers, tagged values.
pub mod types;

pub use error::{DecodeError, EncodeError};
