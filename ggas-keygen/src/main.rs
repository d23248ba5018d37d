//! GGAS license key issuance and verification CLI.
//!
//! Usage:
//!   ggas-keygen generate --customer acme-0042 --type enterprise --features all
//!   ggas-keygen generate --customer eval-17 --type trial --expires-days 30
//!   ggas-keygen verify GG01-EN4A-7F00-3FFF-FFK3-Q9A1
//!
//! `verify` exits nonzero for any key that fails validation, fails to
//! decode, or is expired, so it can gate scripted activation flows.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ggas_license::{
    encode, is_expired, validate_format, Feature, FeatureSet, LicenseDescriptor, LicenseKey,
    LicenseType,
};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "ggas-keygen")]
#[command(about = "Issue and verify GGAS license keys")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new license key
    Generate {
        /// Customer identifier (only a one-way fingerprint is embedded)
        #[arg(long)]
        customer: String,

        /// License type: trial, standard, or enterprise
        #[arg(long = "type", value_name = "TYPE")]
        license_type: LicenseType,

        /// Comma-separated feature names, or "all"
        #[arg(long, default_value = "basic_reporting")]
        features: String,

        /// Days until expiration (omit for a key that never expires)
        #[arg(long)]
        expires_days: Option<u32>,

        /// Print the key and its decoded fields as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate, decode, and expiry-check an existing key
    Verify {
        /// The license key (hyphens optional, case-insensitive)
        key: String,

        /// Print the decoded fields as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Generate {
            customer,
            license_type,
            features,
            expires_days,
            json,
        } => generate(customer, license_type, &features, expires_days, json),
        Command::Verify { key, json } => verify(&key, json),
    }
}

fn generate(
    customer: String,
    license_type: LicenseType,
    features: &str,
    expires_days: Option<u32>,
    json: bool,
) -> Result<()> {
    let features = parse_features(features)?;
    let descriptor = LicenseDescriptor {
        customer_id: customer,
        license_type,
        features,
        expiration_days: expires_days,
    };
    let key = encode(&descriptor).context("failed to encode license key")?;
    debug!(%key, "issued license key");

    if json {
        let info = key.info()?;
        let out = serde_json::json!({
            "key": key.to_string(),
            "canonical": key.canonical(),
            "info": info,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{key}");
    }
    Ok(())
}

fn verify(key: &str, json: bool) -> Result<()> {
    if !validate_format(key) {
        bail!("license key failed format/checksum validation");
    }
    let parsed = LicenseKey::parse(key).context("license key did not decode")?;
    let info = parsed.info()?;
    let expired = is_expired(parsed.canonical());

    if json {
        let out = serde_json::json!({
            "key": parsed.to_string(),
            "info": info,
            "expired": expired,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("key:          {parsed}");
        println!("type:         {}", info.license_type);
        println!("fingerprint:  {}", info.customer_fingerprint);
        println!("features:     {}", info.features);
        match info.expires_at {
            Some(at) => println!("expires:      {}", at.to_rfc3339()),
            None => println!("expires:      never"),
        }
    }

    if expired {
        bail!("license key is expired");
    }
    info!("license key is valid");
    Ok(())
}

/// Parses the --features argument: "all", empty, or a comma list of
/// snake_case feature names.
fn parse_features(spec: &str) -> Result<FeatureSet> {
    let spec = spec.trim();
    if spec.eq_ignore_ascii_case("all") {
        return Ok(FeatureSet::all());
    }
    if spec.is_empty() || spec.eq_ignore_ascii_case("none") {
        return Ok(FeatureSet::empty());
    }
    let mut set = FeatureSet::empty();
    for name in spec.split(',') {
        let name = name.trim();
        let feature = Feature::from_name(name)
            .with_context(|| format!("unknown feature {name:?}"))?;
        set.insert(feature);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::parse_features;
    use ggas_license::{Feature, FeatureSet};

    #[test]
    fn parse_all_and_none() {
        assert_eq!(parse_features("all").unwrap(), FeatureSet::all());
        assert_eq!(parse_features("ALL").unwrap(), FeatureSet::all());
        assert_eq!(parse_features("").unwrap(), FeatureSet::empty());
        assert_eq!(parse_features("none").unwrap(), FeatureSet::empty());
    }

    #[test]
    fn parse_comma_list() {
        let set = parse_features("basic_reporting, api_access").unwrap();
        assert!(set.contains(Feature::BasicReporting));
        assert!(set.contains(Feature::ApiAccess));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn parse_unknown_feature_fails() {
        assert!(parse_features("warp_drive").is_err());
        assert!(parse_features("basic_reporting,warp_drive").is_err());
    }
}
