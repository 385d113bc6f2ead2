//! Zone locator
//!
//! Resolves a fully-qualified zone name to the provider's zone identifier
//! using a listing that has already been fetched. No I/O happens here.

use crate::error::{Error, Result};
use crate::types::{HostedZone, ZoneListing};

/// Find the zone named exactly `target_name` and return its identifier suffix
///
/// `target_name` must be fully qualified (`nuk9.com.`); the comparison is an
/// exact string match, trailing dot included. Provider identifiers such as
/// `/hostedzone/Z123` are reduced to the part after the last `/` (`Z123`).
///
/// # Errors
///
/// - `InvalidArgument`: `target_name` is empty
/// - `ProviderResponse`: the listing is missing its zone wrapper, or the
///   matching zone has an empty identifier
/// - `NotFound`: no zones, or none named `target_name`
pub fn find_zone(listing: &ZoneListing, target_name: &str) -> Result<String> {
    if target_name.is_empty() {
        return Err(Error::invalid_argument("Zone name cannot be empty"));
    }

    let zones = listing.hosted_zones.as_ref().ok_or_else(|| {
        Error::ProviderResponse("Hosted zone listing is missing its zone wrapper".to_string())
    })?;

    if zones.is_empty() {
        return Err(Error::not_found("No hosted zones were found"));
    }

    let zone = zones
        .iter()
        .find(|zone| zone.name == target_name)
        .ok_or_else(|| Error::not_found(format!("Hosted zone {} not found", target_name)))?;

    zone_id_suffix(zone)
}

/// Caller-facing identifier: the raw id after its last path separator
pub fn zone_id_suffix(zone: &HostedZone) -> Result<String> {
    let suffix = zone.id.rsplit('/').next().unwrap_or_default();
    if suffix.is_empty() {
        return Err(Error::ProviderResponse(format!(
            "Hosted zone {} has an empty identifier ({:?})",
            zone.name, zone.id
        )));
    }
    Ok(suffix.to_string())
}
