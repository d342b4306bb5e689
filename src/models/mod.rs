//! Domain models for subnet planning.
//!
//! This module contains the core data structures used throughout the application:
//! - [`NetworkBlock`] - IPv4 network in CIDR notation
//! - [`SubnetRequest`] and [`SubnetPlan`] - partitioner input and output
//! - [`ZoneAssignment`] - subnets mapped onto zones and roles

mod ipv4;
mod plan;
mod zone;

// Re-export public types
pub use ipv4::{
    cut_addr, get_cidr_mask, num_usable_hosts, NetworkBlock, MAX_LENGTH,
    MAX_SUBNET_PREFIX,
};
pub use plan::{subnet_count_from_number, SubnetPlan, SubnetRequest};
pub use zone::{AssignmentPolicy, Role, ZoneAssignment, ZoneAssignmentEntry, ZoneId};
