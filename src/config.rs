//! Planner configuration.
//!
//! A JSON file describes one stack; a handful of environment variables
//! (also read from `.env`) override the network settings.

use crate::error::{ConfigError, PlanError};
use crate::models::{subnet_count_from_number, AssignmentPolicy, ZoneId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SUBNET_PLANNER_CONFIG";
/// Config file used when [`CONFIG_ENV`] is not set.
pub const DEFAULT_CONFIG_FILE: &str = "subnet-planner.json";

const DEFAULT_REGION: &str = "us-east-1";

fn default_name() -> String {
    "my".to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Instance sizing for the load-balanced auto-scaling group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputeConfig {
    pub instance_type: String,
    #[serde(default = "ComputeConfig::default_min")]
    pub min_size: u32,
    #[serde(default = "ComputeConfig::default_max")]
    pub max_size: u32,
    #[serde(default)]
    pub desired_capacity: Option<u32>,
    #[serde(default = "ComputeConfig::default_port")]
    pub port: u16,
}

impl ComputeConfig {
    fn default_min() -> u32 {
        1
    }
    fn default_max() -> u32 {
        3
    }
    fn default_port() -> u16 {
        80
    }
}

/// Managed database placed in the private subnets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub engine: String,
    #[serde(default)]
    pub engine_version: Option<String>,
    pub instance_class: String,
    #[serde(default = "DatabaseConfig::default_storage")]
    pub allocated_storage_gib: u32,
}

impl DatabaseConfig {
    fn default_storage() -> u32 {
        20
    }
}

/// DNS record pointing at the load balancer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
    pub zone_name: String,
    pub record_name: String,
    #[serde(default = "DnsConfig::default_ttl")]
    pub ttl: u32,
}

impl DnsConfig {
    fn default_ttl() -> u32 {
        300
    }
}

/// One stack's settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Prefix for resource names.
    #[serde(default = "default_name")]
    pub name: String,
    /// VPC block, validated by the partitioner.
    #[serde(default)]
    pub vpc_cidr_block: Option<String>,
    #[serde(default)]
    pub number_of_subnets: Option<serde_json::Number>,
    #[serde(default)]
    pub assignment_policy: AssignmentPolicy,
    #[serde(default = "default_region")]
    pub region: String,
    /// Static zone list, skips the provider lookup.
    #[serde(default)]
    pub zones: Option<Vec<ZoneId>>,
    #[serde(default)]
    pub zone_cache_file: Option<String>,
    #[serde(default)]
    pub compute: Option<ComputeConfig>,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub dns: Option<DnsConfig>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: default_name(),
            vpc_cidr_block: None,
            number_of_subnets: None,
            assignment_policy: AssignmentPolicy::default(),
            region: default_region(),
            zones: None,
            zone_cache_file: None,
            compute: None,
            database: None,
            dns: None,
            tags: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parse a config from JSON text; `path` is only used in messages.
    pub fn from_json(json: &str, path: &str) -> Result<Config, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            field: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }

    /// Read a config file.
    pub fn load(path: &str) -> Result<Config, ConfigError> {
        log::info!("Reading config file: {path}");
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Config::from_json(&json, path)
    }

    /// Load `.env`, the config file named by [`CONFIG_ENV`], then apply
    /// environment overrides.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        let mut config = Config::load_or_default(std::env::var(CONFIG_ENV).ok().as_deref())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read `path`, or [`DEFAULT_CONFIG_FILE`] when no path was given.
    ///
    /// Only a missing default file falls back to [`Config::default`]; a
    /// named file has to exist.
    pub fn load_or_default(path: Option<&str>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::load(path),
            None if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Config::load(DEFAULT_CONFIG_FILE)
            }
            None => {
                log::warn!("Config file {DEFAULT_CONFIG_FILE} not found, using environment only");
                Ok(Config::default())
            }
        }
    }

    /// Override settings from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cidr) = lookup("VPC_CIDR_BLOCK") {
            log::debug!("VPC_CIDR_BLOCK override: {cidr}");
            self.vpc_cidr_block = Some(cidr);
        }
        if let Some(count) = lookup("NUMBER_OF_SUBNETS") {
            let number = serde_json::from_str::<serde_json::Number>(count.trim())
                .map_err(|_| PlanError::InvalidSubnetCount(count.clone()))?;
            subnet_count_from_number(&number)?;
            self.number_of_subnets = Some(number);
        }
        if let Some(region) = lookup("AWS_REGION") {
            self.region = region;
        }
        if let Some(policy) = lookup("ASSIGNMENT_POLICY") {
            self.assignment_policy = policy.parse::<AssignmentPolicy>().map_err(|_| {
                ConfigError::InvalidOverride {
                    key: "ASSIGNMENT_POLICY".to_string(),
                    value: policy.clone(),
                }
            })?;
        }
        if let Some(cache) = lookup("ZONE_CACHE_FILE") {
            self.zone_cache_file = Some(cache);
        }
        Ok(())
    }

    /// The VPC block string, required for every run.
    pub fn vpc_cidr_block(&self) -> Result<&str, ConfigError> {
        self.vpc_cidr_block
            .as_deref()
            .ok_or(ConfigError::Missing("vpcCidrBlock"))
    }

    /// Configured subnet count, if any.
    pub fn subnet_count(&self) -> Result<Option<usize>, PlanError> {
        self.number_of_subnets
            .as_ref()
            .map(subnet_count_from_number)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"{
        "name": "shop",
        "vpcCidrBlock": "10.0.0.0/16",
        "numberOfSubnets": 4,
        "assignmentPolicy": "paired-per-zone",
        "zones": ["us-east-1a", "us-east-1b"],
        "compute": {"instanceType": "t3.small", "maxSize": 4},
        "database": {"engine": "postgres", "instanceClass": "db.t3.micro"},
        "dns": {"zoneName": "example.com", "recordName": "shop"}
    }"#;

    #[test]
    fn test_from_json() {
        let config = Config::from_json(SAMPLE, "sample.json").unwrap();
        assert_eq!(config.name, "shop");
        assert_eq!(config.vpc_cidr_block().unwrap(), "10.0.0.0/16");
        assert_eq!(config.subnet_count().unwrap(), Some(4));
        assert_eq!(config.assignment_policy, AssignmentPolicy::PairedPerZone);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.zones.as_ref().unwrap().len(), 2);

        let compute = config.compute.unwrap();
        assert_eq!(compute.min_size, 1);
        assert_eq!(compute.max_size, 4);
        assert_eq!(compute.port, 80);
        assert_eq!(config.database.unwrap().allocated_storage_gib, 20);
        assert_eq!(config.dns.unwrap().ttl, 300);
    }

    #[test]
    fn test_from_json_reports_field() {
        let err = Config::from_json(r#"{"assignmentPolicy": "random"}"#, "bad.json").unwrap_err();
        match err {
            ConfigError::Parse { path, field, .. } => {
                assert_eq!(path, "bad.json");
                assert_eq!(field, "assignmentPolicy");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_cidr() {
        let config = Config::default();
        assert!(matches!(
            config.vpc_cidr_block(),
            Err(ConfigError::Missing("vpcCidrBlock"))
        ));
        assert_eq!(config.subnet_count().unwrap(), None);
    }

    #[test]
    fn test_invalid_counts() {
        for bad in ["0", "-1", "2.5"] {
            let json = format!(r#"{{"numberOfSubnets": {bad}}}"#);
            let config = Config::from_json(&json, "count.json").unwrap();
            assert!(
                matches!(config.subnet_count(), Err(PlanError::InvalidSubnetCount(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("VPC_CIDR_BLOCK", "172.16.0.0/16"),
            ("NUMBER_OF_SUBNETS", "6"),
            ("AWS_REGION", "eu-west-1"),
            ("ASSIGNMENT_POLICY", "interleaved"),
        ]);
        let mut config = Config::from_json(SAMPLE, "sample.json").unwrap();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.vpc_cidr_block().unwrap(), "172.16.0.0/16");
        assert_eq!(config.subnet_count().unwrap(), Some(6));
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.assignment_policy, AssignmentPolicy::Interleaved);
    }

    #[test]
    fn test_apply_overrides_invalid() {
        for bad in ["six", "-1", "2.5", "0"] {
            let mut config = Config::default();
            let err = config
                .apply_overrides(|k| (k == "NUMBER_OF_SUBNETS").then(|| bad.to_string()))
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::Plan(PlanError::InvalidSubnetCount(_))),
                "{bad}: {err:?}"
            );
            assert_eq!(config.number_of_subnets, None);
        }

        let mut config = Config::default();
        let err = config
            .apply_overrides(|k| (k == "ASSIGNMENT_POLICY").then(|| "random".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { .. }));
    }

    #[test]
    fn test_named_config_file_must_exist() {
        let err = Config::load_or_default(Some("/nonexistent/planner.json")).unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, "/nonexistent/planner.json"),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_named_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = Config::load_or_default(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.name, "shop");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("src/tests/test_data/no_such_config.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
