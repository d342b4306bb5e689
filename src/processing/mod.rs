//! Subnet planning logic.
//!
//! This module contains the pure planning steps:
//! - [`partition`] - carve a block into equal subnets
//! - [`assign`] - spread the subnets over zones and roles

mod assign;
mod partition;

// Re-export public functions
pub use assign::{assign, required_subnet_count};
pub use partition::{partition, partition_cidr, partition_request};
