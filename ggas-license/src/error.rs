//! Error types for the license codec.

use thiserror::Error;

/// License-codec-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Key is not 24 alphanumeric characters after hyphen stripping.
    #[error("malformed license key: {0}")]
    MalformedKey(String),

    /// Embedded checksum does not match the key body.
    #[error("license key checksum mismatch")]
    ChecksumMismatch,

    /// Checksum passed but the type code maps to no known license type.
    #[error("unknown license type code: {0}")]
    UnknownTypeCode(String),

    /// A positional field could not be parsed.
    #[error("invalid {field} field: {value}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// Requested expiration does not fit the 4-hex-digit day count.
    #[error("expiration of {0} days since 2000-01-01 does not fit the key format")]
    ExpirationOutOfRange(i64),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
