//! Recording provisioning client.

use super::{ProvisioningClient, Resource, ResourceId};
use crate::error::ProvisionError;
use std::collections::HashMap;

/// Client that records every declaration and hands out `<kind>-<n>` ids.
#[derive(Debug, Default)]
pub struct DryRunClient {
    counters: HashMap<&'static str, usize>,
    declared: Vec<(ResourceId, Resource)>,
}

impl DryRunClient {
    pub fn new() -> DryRunClient {
        DryRunClient::default()
    }

    /// Declarations in the order they were made.
    pub fn declared(&self) -> &[(ResourceId, Resource)] {
        &self.declared
    }

    pub fn find(&self, name: &str) -> Option<&(ResourceId, Resource)> {
        self.declared.iter().find(|(_, r)| r.name() == name)
    }
}

impl ProvisioningClient for DryRunClient {
    fn declare(&mut self, resource: &Resource) -> Result<ResourceId, ProvisionError> {
        let counter = self.counters.entry(resource.kind()).or_insert(0);
        let id = ResourceId(format!("{}-{}", resource.kind(), counter));
        *counter += 1;
        log::debug!("declare {resource} -> {id}");
        self.declared.push((id.clone(), resource.clone()));
        Ok(id)
    }
}
