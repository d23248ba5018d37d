mod common;

use common::{enterprise_descriptor, fixed_rng, issue_instant, make_key, splice_field};
use ggas_license::{decode, decode_features, encode_with, LicenseError};

#[test]
fn error_display_malformed_key() {
    let err = LicenseError::MalformedKey("expected 24 characters, got 3".into());
    let msg = format!("{err}");
    assert!(msg.contains("malformed license key"));
    assert!(msg.contains("24"));
}

#[test]
fn error_display_checksum_mismatch() {
    let err = LicenseError::ChecksumMismatch;
    assert!(format!("{err}").contains("checksum"));
}

#[test]
fn error_display_unknown_type_code() {
    let err = LicenseError::UnknownTypeCode("ZZ".into());
    let msg = format!("{err}");
    assert!(msg.contains("unknown license type code"));
    assert!(msg.contains("ZZ"));
}

#[test]
fn error_display_invalid_field() {
    let err = LicenseError::InvalidField {
        field: "expiration",
        value: "XY12".into(),
    };
    let msg = format!("{err}");
    assert!(msg.contains("expiration"));
    assert!(msg.contains("XY12"));
}

#[test]
fn error_display_expiration_out_of_range() {
    let err = LicenseError::ExpirationOutOfRange(109_588);
    let msg = format!("{err}");
    assert!(msg.contains("109588"));
    assert!(msg.contains("2000-01-01"));
}

#[test]
fn errors_implement_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<LicenseError>();
}

#[test]
fn every_variant_is_producible_through_the_public_api() {
    let key = make_key(&enterprise_descriptor());

    let tampered_check = {
        let replacement = if &key.canonical()[22..] == "00" { "11" } else { "00" };
        let mut tampered = key.canonical().to_string();
        tampered.replace_range(22..24, replacement);
        tampered
    };
    let mut far_future = enterprise_descriptor();
    far_future.expiration_days = Some(100_000);

    let produced = [
        decode("GG01").unwrap_err(),
        decode(&tampered_check).unwrap_err(),
        decode(&splice_field(&key, 4, "ZZ")).unwrap_err(),
        decode_features("WXYZ").unwrap_err(),
        encode_with(&far_future, issue_instant(), &mut fixed_rng()).unwrap_err(),
    ];

    // Exhaustive on purpose: a variant with no construction site in the
    // codec cannot be matched here without someone noticing.
    for err in produced {
        match err {
            LicenseError::MalformedKey(_)
            | LicenseError::ChecksumMismatch
            | LicenseError::UnknownTypeCode(_)
            | LicenseError::InvalidField { .. }
            | LicenseError::ExpirationOutOfRange(_) => {}
        }
    }
}
