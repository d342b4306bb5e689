// cargo watch -x 'fmt' -x 'run'

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod provision;
pub mod zones;

use config::Config;
use error::{ConfigError, PlanError, ZoneLookupError};
use models::{AssignmentPolicy, NetworkBlock, SubnetPlan, ZoneAssignment, ZoneId};
use std::error::Error;

/// Partition result together with its zone assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPlan {
    pub plan: SubnetPlan,
    pub assignment: ZoneAssignment,
}

impl NetworkPlan {
    pub fn vpc_block(&self) -> NetworkBlock {
        self.plan.source()
    }
}

/// Zones from the config if listed there, otherwise from the zone cache
/// or the provider CLI.
pub fn resolve_zones(config: &Config) -> Result<Vec<ZoneId>, ZoneLookupError> {
    if let Some(zones) = config.zones.as_ref().filter(|z| !z.is_empty()) {
        log::info!("Using {} zones from config", zones.len());
        return Ok(zones.clone());
    }
    let cache = zones::read_zone_cache(config.zone_cache_file.as_deref(), &config.region)?;
    Ok(cache.zones)
}

/// Partition the VPC block and assign the subnets to `zones`.
pub fn plan_network(config: &Config, zones: &[ZoneId]) -> Result<NetworkPlan, Box<dyn Error>> {
    let block = NetworkBlock::new(config.vpc_cidr_block()?)?;
    if zones.is_empty() {
        return Err(PlanError::ZoneListEmpty.into());
    }
    let policy = config.assignment_policy;
    let configured = config.subnet_count()?;
    let count = match (configured, policy) {
        (Some(count), _) => processing::required_subnet_count(policy, zones, count),
        (None, AssignmentPolicy::PairedPerZone) => zones.len() * 2,
        (None, AssignmentPolicy::Interleaved) => {
            return Err(ConfigError::Missing("numberOfSubnets").into())
        }
    };
    if let Some(configured) = configured.filter(|&c| c != count) {
        log::warn!(
            "{policy} policy needs {count} subnets, ignoring configured count {configured}"
        );
    }

    let plan = processing::partition(block, count)?;
    let assignment = processing::assign(&plan, zones, policy)?;
    Ok(NetworkPlan { plan, assignment })
}
