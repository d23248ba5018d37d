//! License key encoding, checksum validation, and decoding.
//!
//! An encoded key is 24 uppercase alphanumeric characters:
//!
//! | offset | len | field | encoding |
//! |--------|-----|-------|----------|
//! | 0  | 2 | product code         | literal `GG` |
//! | 2  | 2 | version code         | literal `01` |
//! | 4  | 2 | type code            | `TR` / `ST` / `EN` |
//! | 6  | 4 | customer fingerprint | first 4 hex chars of SHA-256(customer id) |
//! | 10 | 4 | feature bitmask      | 16-bit mask, zero-padded hex |
//! | 14 | 4 | expiration           | `FFFF` = never, else days since 2000-01-01 UTC |
//! | 18 | 4 | salt                 | random characters from `0-9A-Z` |
//! | 22 | 2 | checksum             | first 2 hex chars of SHA-256(chars 0..22) |
//!
//! The checksum is a 1-byte integrity check against transcription errors
//! and casual tampering, not a forgery barrier: anyone who knows the
//! layout can mint a checksum-valid key. Display grouping (hyphens every
//! 4 characters) is purely cosmetic and does not follow field boundaries.

use crate::descriptor::{LicenseDescriptor, LicenseType};
use crate::error::{LicenseError, LicenseResult};
use crate::features::FeatureSet;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Product family identifier, the first two key characters.
pub const PRODUCT_CODE: &str = "GG";

/// Key format version, key characters 2..4.
pub const VERSION_CODE: &str = "01";

/// Canonical key length after hyphen stripping.
pub const KEY_LEN: usize = 24;

/// Length of the checksummed prefix (everything before the checksum).
const BASE_LEN: usize = 22;

/// Expiration field value reserved for keys that never expire.
const NEVER_EXPIRES: &str = "FFFF";

/// Unix timestamp of the day-count epoch, 2000-01-01T00:00:00Z.
const EPOCH_UNIX: i64 = 946_684_800;

const SECS_PER_DAY: i64 = 86_400;

/// Salt alphabet. A random byte reduced mod 36 indexes into this; the
/// reduction is slightly biased toward the low end, which is acceptable
/// for an opaque, unverified salt.
const SALT_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A checksum-valid license key in canonical (24-char, unhyphenated) form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Parses and fully validates a key from user input. Hyphens are
    /// optional and letters may be any case.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is malformed, fails its checksum, or
    /// carries an unknown type code or unparseable field.
    pub fn parse(key: &str) -> LicenseResult<Self> {
        let normalized = normalize(key);
        decode(&normalized)?;
        Ok(Self(normalized))
    }

    /// The 24-character canonical form, no hyphens.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.0
    }

    /// Decodes the structured view of this key.
    pub fn info(&self) -> LicenseResult<LicenseInfo> {
        decode(&self.0)
    }
}

impl fmt::Display for LicenseKey {
    /// Formats as six hyphen-joined groups of four characters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.0.as_bytes().chunks(4).enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            f.write_str(std::str::from_utf8(chunk).map_err(|_| fmt::Error)?)?;
        }
        Ok(())
    }
}

impl FromStr for LicenseKey {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Structured, read-only view of a decoded key.
///
/// This is key metadata, not the original descriptor: the customer id
/// cannot be recovered from its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Product family code (characters 0..2).
    pub product_code: String,
    /// Key format version (characters 2..4).
    pub version_code: String,
    /// Resolved license tier.
    pub license_type: LicenseType,
    /// One-way 4-hex-character customer fingerprint.
    pub customer_fingerprint: String,
    /// Raw feature bitmask field as it appears in the key.
    pub feature_hex: String,
    /// Decoded feature set.
    pub features: FeatureSet,
    /// Expiration instant, or `None` for a key that never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Encodes a descriptor into a license key using the OS random source
/// and the current time.
///
/// Two calls with the same descriptor produce different keys (the salt
/// differs), which keeps issued keys non-enumerable from guessed
/// descriptors.
///
/// # Errors
///
/// Returns [`LicenseError::ExpirationOutOfRange`] if the requested
/// expiration does not fit the 4-hex-digit day count.
pub fn encode(descriptor: &LicenseDescriptor) -> LicenseResult<LicenseKey> {
    encode_with(descriptor, Utc::now(), &mut OsRng)
}

/// Encodes a descriptor with an explicit issue instant and RNG.
///
/// Production callers use [`encode`]; this entry point exists so tests
/// can substitute a seeded RNG and a fixed clock to pin exact output.
pub fn encode_with(
    descriptor: &LicenseDescriptor,
    issued_at: DateTime<Utc>,
    rng: &mut impl RngCore,
) -> LicenseResult<LicenseKey> {
    let mut base = String::with_capacity(KEY_LEN);
    base.push_str(PRODUCT_CODE);
    base.push_str(VERSION_CODE);
    base.push_str(descriptor.license_type.code());
    base.push_str(&customer_fingerprint(&descriptor.customer_id));
    base.push_str(&descriptor.features.to_hex());
    base.push_str(&expiration_code(descriptor.expiration_days, issued_at)?);
    base.push_str(&salt(rng));
    debug_assert_eq!(base.len(), BASE_LEN);

    let check = checksum(&base);
    Ok(LicenseKey(format!("{base}{check}")))
}

/// Checks length, alphabet, and checksum of a key string.
///
/// Hyphens are stripped and letters uppercased first. Never panics;
/// malformed input simply yields `false`.
#[must_use]
pub fn validate_format(key: &str) -> bool {
    let normalized = normalize(key);
    if normalized.len() != KEY_LEN || !normalized.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return false;
    }
    let (base, check) = normalized.split_at(BASE_LEN);
    checksum(base) == check
}

/// Decodes a key into its structured metadata.
///
/// # Errors
///
/// Fails on wrong length or alphabet, checksum mismatch, an unknown
/// type code (a checksum-valid key is necessary but not sufficient), or
/// unparseable hex fields.
pub fn decode(key: &str) -> LicenseResult<LicenseInfo> {
    let normalized = normalize(key);
    if normalized.len() != KEY_LEN {
        return Err(LicenseError::MalformedKey(format!(
            "expected {KEY_LEN} characters after stripping hyphens, got {}",
            normalized.len()
        )));
    }
    if !normalized.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(LicenseError::MalformedKey(
            "non-alphanumeric character".to_string(),
        ));
    }

    let (base, check) = normalized.split_at(BASE_LEN);
    if checksum(base) != check {
        return Err(LicenseError::ChecksumMismatch);
    }

    let type_code = &base[4..6];
    let license_type = LicenseType::from_code(type_code)
        .ok_or_else(|| LicenseError::UnknownTypeCode(type_code.to_string()))?;

    let feature_hex = &base[10..14];
    let features = decode_features(feature_hex)?;
    let expires_at = decode_expiration(&base[14..18])?;

    Ok(LicenseInfo {
        product_code: base[0..2].to_string(),
        version_code: base[2..4].to_string(),
        license_type,
        customer_fingerprint: base[6..10].to_string(),
        feature_hex: feature_hex.to_string(),
        features,
        expires_at,
    })
}

/// Parses a 4-hex-digit feature bitmask field. Reserved bits (6..16)
/// are discarded.
pub fn decode_features(feature_hex: &str) -> LicenseResult<FeatureSet> {
    let mask = parse_hex_field(feature_hex, "features")?;
    Ok(FeatureSet::from_mask(mask))
}

/// Parses a 4-hex-digit expiration field.
///
/// Returns `Ok(None)` for the reserved `FFFF` value, meaning the key
/// never expires. Callers must treat `None` as "no expiration", not as
/// an error.
pub fn decode_expiration(expiration_hex: &str) -> LicenseResult<Option<DateTime<Utc>>> {
    if expiration_hex.eq_ignore_ascii_case(NEVER_EXPIRES) {
        return Ok(None);
    }
    let days = i64::from(parse_hex_field(expiration_hex, "expiration")?);
    let expires_at = DateTime::from_timestamp(EPOCH_UNIX + days * SECS_PER_DAY, 0).ok_or(
        LicenseError::InvalidField {
            field: "expiration",
            value: expiration_hex.to_string(),
        },
    )?;
    Ok(Some(expires_at))
}

/// Returns true if the key is expired as of now.
///
/// Fail-closed: a key that does not decode is reported as expired, so
/// tampered or malformed keys are never treated as valid-and-unexpired.
#[must_use]
pub fn is_expired(key: &str) -> bool {
    is_expired_at(key, Utc::now())
}

/// Expiration check against an explicit instant, for callers (and
/// tests) that need a simulated clock.
#[must_use]
pub fn is_expired_at(key: &str, now: DateTime<Utc>) -> bool {
    match decode(key) {
        Ok(info) => match info.expires_at {
            None => false,
            Some(expires_at) => now > expires_at,
        },
        Err(_) => true,
    }
}

/// Strips hyphens and surrounding whitespace, uppercases the rest.
fn normalize(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// First 4 hex characters of SHA-256 over the UTF-8 customer id.
fn customer_fingerprint(customer_id: &str) -> String {
    let digest = Sha256::digest(customer_id.as_bytes());
    format!("{:02X}{:02X}", digest[0], digest[1])
}

/// First 2 hex characters of SHA-256 over the 22-character base.
fn checksum(base: &str) -> String {
    let digest = Sha256::digest(base.as_bytes());
    format!("{:02X}", digest[0])
}

/// Renders the expiration field: `FFFF` for no expiration, otherwise
/// whole days between 2000-01-01T00:00:00Z and the target instant.
///
/// Day counts that reach `0xFFFF` are rejected rather than truncated,
/// so the reserved value can never collide with a real date.
fn expiration_code(expiration_days: Option<u32>, issued_at: DateTime<Utc>) -> LicenseResult<String> {
    let Some(days) = expiration_days.filter(|d| *d > 0) else {
        return Ok(NEVER_EXPIRES.to_string());
    };
    let target = issued_at.timestamp() + i64::from(days) * SECS_PER_DAY;
    let day_count = (target - EPOCH_UNIX).div_euclid(SECS_PER_DAY);
    if !(0..0xFFFF).contains(&day_count) {
        return Err(LicenseError::ExpirationOutOfRange(day_count));
    }
    Ok(format!("{day_count:04X}"))
}

/// Draws 4 salt characters from the secure random source.
fn salt(rng: &mut impl RngCore) -> String {
    let mut bytes = [0u8; 4];
    rng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| SALT_ALPHABET[usize::from(b % 36)] as char)
        .collect()
}

/// Parses a 4-hex-digit positional field.
fn parse_hex_field(hex: &str, field: &'static str) -> LicenseResult<u16> {
    if hex.len() != 4 {
        return Err(LicenseError::InvalidField {
            field,
            value: hex.to_string(),
        });
    }
    u16::from_str_radix(hex, 16).map_err(|_| LicenseError::InvalidField {
        field,
        value: hex.to_string(),
    })
}
