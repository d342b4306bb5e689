//! Availability-zone query against the provider CLI.

use super::cli;
use crate::error::ZoneLookupError;
use crate::models::ZoneId;
use serde::Deserialize;

/// Zone entry as returned by `describe-availability-zones`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ZoneRecord {
    zone_name: String,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeZonesResponse {
    availability_zones: Vec<ZoneRecord>,
}

/// Parse CLI output into the list of available zones, in provider order.
pub fn parse_zones(json: &str) -> Result<Vec<ZoneId>, ZoneLookupError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let response: DescribeZonesResponse = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| ZoneLookupError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })?;

    let zones: Vec<ZoneId> = response
        .availability_zones
        .into_iter()
        .filter(|z| match z.state.as_deref() {
            None | Some("available") => true,
            Some(state) => {
                log::warn!("Skipping zone {} in state {state}", z.zone_name);
                false
            }
        })
        .map(|z| ZoneId(z.zone_name))
        .collect();
    Ok(zones)
}

/// Query the provider for the available zones of `region`.
pub fn describe_zones(region: &str) -> Result<Vec<ZoneId>, ZoneLookupError> {
    let cmd = format!("aws ec2 describe-availability-zones --region {region} --output json");
    let output = cli::run(&cmd)?;
    let zones = parse_zones(&output).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        e
    })?;
    if zones.is_empty() {
        return Err(ZoneLookupError::NoZones(region.to_string()));
    }
    log::info!("Got {} zones for region {region}", zones.len());
    Ok(zones)
}
