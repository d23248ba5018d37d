//! Shared test helpers for license codec tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use ggas_license::{encode_with, Feature, FeatureSet, LicenseDescriptor, LicenseKey, LicenseType};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

/// Returns a deterministic RNG so encoded keys are reproducible.
pub fn fixed_rng() -> StdRng {
    StdRng::seed_from_u64(0x5EED_CAFE)
}

/// A fixed issue instant, mid-day so day-count flooring is exercised.
pub fn issue_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Enterprise descriptor: non-expiring, all features.
pub fn enterprise_descriptor() -> LicenseDescriptor {
    LicenseDescriptor {
        customer_id: "dev-0001".to_string(),
        license_type: LicenseType::Enterprise,
        features: FeatureSet::all(),
        expiration_days: None,
    }
}

/// Trial descriptor: 30 days, basic reporting only.
pub fn trial_descriptor() -> LicenseDescriptor {
    LicenseDescriptor {
        customer_id: "trial-0001".to_string(),
        license_type: LicenseType::Trial,
        features: FeatureSet::empty().with(Feature::BasicReporting),
        expiration_days: Some(30),
    }
}

/// Encodes a descriptor with the fixed clock and RNG.
pub fn make_key(descriptor: &LicenseDescriptor) -> LicenseKey {
    encode_with(descriptor, issue_instant(), &mut fixed_rng()).unwrap()
}

/// Recomputes the 2-hex-char checksum for an arbitrary 22-char base,
/// mirroring the codec's published rule. Used to build keys with a
/// valid checksum but otherwise corrupted fields.
pub fn checksum_of(base: &str) -> String {
    let digest = Sha256::digest(base.as_bytes());
    format!("{:02X}", digest[0])
}

/// Replaces the field at `offset..offset + value.len()` in a canonical
/// key's base and re-checksums, producing a checksum-valid mutant.
pub fn splice_field(key: &LicenseKey, offset: usize, value: &str) -> String {
    let canonical = key.canonical();
    let mut base = canonical[..22].to_string();
    base.replace_range(offset..offset + value.len(), value);
    let check = checksum_of(&base);
    format!("{base}{check}")
}
