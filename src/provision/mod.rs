//! Stack provisioning.
//!
//! The planner never talks to a cloud API itself. It declares resources
//! through a [`ProvisioningClient`]:
//! - [`resource`] - the resource declarations
//! - [`template`] - the parameterized network stack
//! - [`dry_run`] - a client that records declarations

mod dry_run;
mod resource;
mod template;

use crate::error::ProvisionError;

pub use dry_run::DryRunClient;
pub use resource::{Resource, ResourceId, Tags};
pub use template::{StackOutputs, StackTemplate};

/// External provisioning API.
///
/// `declare` is called once per resource, in dependency order, and
/// returns the identifier later declarations refer to.
pub trait ProvisioningClient {
    fn declare(&mut self, resource: &Resource) -> Result<ResourceId, ProvisionError>;
}
