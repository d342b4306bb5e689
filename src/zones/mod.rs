//! Availability-zone lookup.
//!
//! This module resolves the zone list a plan is spread over:
//! - [`cli`] - Command execution for the provider CLI
//! - [`query`] - Availability-zone query and parsing
//! - [`cache`] - Caching of zone lookups

mod cache;
mod cli;
mod query;

// Re-export public types and functions
pub use cache::{default_cache_file, read_zone_cache, write_zone_cache, ZoneCache};
pub use cli::run;
pub use query::{describe_zones, parse_zones};
