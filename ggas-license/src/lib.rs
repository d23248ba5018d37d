//! License key codec for GGAS.
//!
//! This module handles:
//! - Encoding a license descriptor into a 24-character key
//! - Format and checksum validation of keys supplied by users
//! - Decoding keys back into their structured metadata
//! - Expiration checks with a fail-closed policy
//!
//! # Design Principles
//!
//! - **Stateless**: every operation is a pure computation; concurrent
//!   callers need no coordination
//! - **Fail-closed**: a key that does not validate or decode is treated
//!   the same as no license at all
//! - **One-way customer binding**: only a 4-hex-character fingerprint of
//!   the customer id is embedded; the id itself is never recoverable
//! - **Injected entropy and clock**: [`encode_with`] takes the RNG and
//!   issue instant explicitly so tests can pin exact output
//!
//! # Key Format
//!
//! 24 uppercase alphanumeric characters, displayed as six hyphen-joined
//! groups of four. The first 22 characters carry the fields (product,
//! version, type, customer fingerprint, feature bitmask, expiration day
//! count, random salt); the last 2 are a SHA-256-prefix checksum over
//! those 22.

mod descriptor;
mod error;
mod features;
mod key;

pub use descriptor::{LicenseDescriptor, LicenseType};
pub use error::{LicenseError, LicenseResult};
pub use features::{Feature, FeatureSet};
pub use key::{
    decode, decode_expiration, decode_features, encode, encode_with, is_expired, is_expired_at,
    validate_format, LicenseInfo, LicenseKey, KEY_LEN, PRODUCT_CODE, VERSION_CODE,
};
