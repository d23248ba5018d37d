//! License descriptors: what an issuer specifies before encoding.

use crate::error::LicenseError;
use crate::features::FeatureSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The commercial license tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    /// Limited-time evaluation.
    Trial,
    /// Single-site standard deployment.
    Standard,
    /// Full enterprise deployment.
    Enterprise,
}

impl LicenseType {
    /// The two-character code embedded in the key at offset 4.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            LicenseType::Trial => "TR",
            LicenseType::Standard => "ST",
            LicenseType::Enterprise => "EN",
        }
    }

    /// Reverse lookup from an embedded type code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TR" => Some(LicenseType::Trial),
            "ST" => Some(LicenseType::Standard),
            "EN" => Some(LicenseType::Enterprise),
            _ => None,
        }
    }

    /// Lowercase name, matching the serde representation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            LicenseType::Trial => "trial",
            LicenseType::Standard => "standard",
            LicenseType::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LicenseType {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(LicenseType::Trial),
            "standard" => Ok(LicenseType::Standard),
            "enterprise" => Ok(LicenseType::Enterprise),
            other => Err(LicenseError::InvalidField {
                field: "license type",
                value: other.to_string(),
            }),
        }
    }
}

/// Everything an issuer specifies when minting a key.
///
/// Descriptors are transient: they exist to be encoded once and are
/// never reconstructed from a key (the customer id in particular is
/// reduced to a one-way fingerprint).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDescriptor {
    /// Issuer-side customer identifier. Only its fingerprint is embedded.
    pub customer_id: String,
    /// Commercial tier.
    pub license_type: LicenseType,
    /// Enabled capabilities.
    #[serde(default)]
    pub features: FeatureSet,
    /// Days until expiration, counted from the issue instant.
    /// `None` (or zero) means the license never expires.
    #[serde(default)]
    pub expiration_days: Option<u32>,
}

impl LicenseDescriptor {
    /// Creates a non-expiring descriptor with no features enabled.
    #[must_use]
    pub fn new(customer_id: impl Into<String>, license_type: LicenseType) -> Self {
        Self {
            customer_id: customer_id.into(),
            license_type,
            features: FeatureSet::empty(),
            expiration_days: None,
        }
    }
}
