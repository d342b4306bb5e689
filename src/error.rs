//! Error types for subnet planning and provisioning.

use thiserror::Error;

/// Validation failures of the partitioner and the sequencer.
///
/// All of these are caller input errors: nothing is retried and no
/// resource is declared once one of them is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid network block: {0}")]
    InvalidNetworkBlock(String),

    #[error("Invalid subnet count: {0} (must be a positive integer)")]
    InvalidSubnetCount(String),

    #[error("Infeasible subnetting: {count} subnets need prefix /{prefix}, longest allowed is /30")]
    InfeasibleSubnetting { count: usize, prefix: u32 },

    #[error("Zone list is empty")]
    ZoneListEmpty,

    #[error("Plan has {plan_len} subnets but {zones} zones need exactly {}", .zones * 2)]
    PlanZoneMismatch { plan_len: usize, zones: usize },
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Config file {path}: error at {field}: {message}")]
    Parse {
        path: String,
        field: String,
        message: String,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },

    #[error("Missing required config value: {0}")]
    Missing(&'static str),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Availability-zone lookup errors.
#[derive(Debug, Error)]
pub enum ZoneLookupError {
    #[error("Command failed: {0}")]
    Command(String),

    #[error("Error parsing zone JSON: path={path} error={message}")]
    Parse { path: String, message: String },

    #[error("Zone cache {path}: {source}")]
    Cache {
        path: String,
        source: std::io::Error,
    },

    #[error("Cache file does not exist: {0}")]
    MissingCache(String),

    #[error("No available zones in region {0}")]
    NoZones(String),
}

/// Errors raised while declaring the stack.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Provisioning client rejected {resource}: {message}")]
    Client { resource: String, message: String },

    #[error("Stack configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Plan(#[from] PlanError),
}
