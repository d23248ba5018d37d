//! Feature capability flags and their bitmask encoding.
//!
//! Each feature occupies a fixed bit position in a 16-bit mask that is
//! rendered as four uppercase hex characters inside the license key.
//! Bit order is part of the key format: changing it invalidates every
//! issued key. Bits 6..16 are reserved for future features and are
//! ignored when reading a mask back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A licensable product capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Core emissions reports.
    BasicReporting,
    /// Trend and scenario analytics.
    AdvancedAnalytics,
    /// REST API access for integrations.
    ApiAccess,
    /// Multiple operator accounts.
    MultiUser,
    /// Live sensor/meter monitoring.
    RealTimeMonitoring,
    /// ML-assisted forecasting and anomaly detection.
    AiFeatures,
}

impl Feature {
    /// All features in bit order. The index in this array is the bit
    /// position in the encoded mask.
    pub const ALL: [Feature; 6] = [
        Feature::BasicReporting,
        Feature::AdvancedAnalytics,
        Feature::ApiAccess,
        Feature::MultiUser,
        Feature::RealTimeMonitoring,
        Feature::AiFeatures,
    ];

    /// Bit position of this feature in the mask.
    #[must_use]
    pub const fn bit(self) -> u16 {
        match self {
            Feature::BasicReporting => 0,
            Feature::AdvancedAnalytics => 1,
            Feature::ApiAccess => 2,
            Feature::MultiUser => 3,
            Feature::RealTimeMonitoring => 4,
            Feature::AiFeatures => 5,
        }
    }

    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Feature::BasicReporting => "basic_reporting",
            Feature::AdvancedAnalytics => "advanced_analytics",
            Feature::ApiAccess => "api_access",
            Feature::MultiUser => "multi_user",
            Feature::RealTimeMonitoring => "real_time_monitoring",
            Feature::AiFeatures => "ai_features",
        }
    }

    /// Parses a feature from its snake_case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mask covering the bits of all currently defined features.
const KNOWN_BITS: u16 = (1 << Feature::ALL.len()) - 1;

/// A set of enabled [`Feature`]s, stored as the encoded 16-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(u16);

impl FeatureSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All currently defined features.
    #[must_use]
    pub const fn all() -> Self {
        Self(KNOWN_BITS)
    }

    /// Builds a set from a raw mask, discarding reserved bits.
    #[must_use]
    pub const fn from_mask(mask: u16) -> Self {
        Self(mask & KNOWN_BITS)
    }

    /// The raw 16-bit mask.
    #[must_use]
    pub const fn mask(self) -> u16 {
        self.0
    }

    /// Returns this set with `feature` enabled.
    #[must_use]
    pub const fn with(self, feature: Feature) -> Self {
        Self(self.0 | (1 << feature.bit()))
    }

    /// Enables `feature` in place.
    pub fn insert(&mut self, feature: Feature) {
        self.0 |= 1 << feature.bit();
    }

    /// Returns true if `feature` is enabled.
    #[must_use]
    pub const fn contains(self, feature: Feature) -> bool {
        self.0 & (1 << feature.bit()) != 0
    }

    /// Returns true if no feature is enabled.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of enabled features.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The mask as four zero-padded uppercase hex characters, exactly as
    /// it appears in an encoded key.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:04X}", self.0)
    }

    /// Iterates over the enabled features in bit order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = Self::empty();
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for feature in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(feature.name())?;
            first = false;
        }
        Ok(())
    }
}
