//! Availability zones, subnet roles and zone assignments.

use super::NetworkBlock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque availability-zone identifier, e.g. `us-east-1a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> ZoneId {
        ZoneId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(s: &str) -> Self {
        ZoneId::new(s)
    }
}

/// Whether a subnet routes through the internet gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Public,
    Private,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Public => "public",
            Role::Private => "private",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Role::Public)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How planned subnets are spread over zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentPolicy {
    /// Round-robin zones by index; even index public, odd private.
    #[default]
    Interleaved,
    /// One public then one private subnet per zone, in zone order.
    PairedPerZone,
}

impl FromStr for AssignmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interleaved" => Ok(AssignmentPolicy::Interleaved),
            "paired-per-zone" | "paired_per_zone" | "paired" => Ok(AssignmentPolicy::PairedPerZone),
            other => Err(format!("unknown assignment policy: {other}")),
        }
    }
}

impl fmt::Display for AssignmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentPolicy::Interleaved => f.write_str("interleaved"),
            AssignmentPolicy::PairedPerZone => f.write_str("paired-per-zone"),
        }
    }
}

/// One planned subnet with its zone and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneAssignmentEntry {
    pub index: usize,
    pub block: NetworkBlock,
    pub zone: ZoneId,
    pub role: Role,
}

impl ZoneAssignmentEntry {
    /// Resource name used for this subnet, e.g. `publicSubnet0`.
    pub fn subnet_name(&self) -> String {
        format!("{}Subnet{}", self.role, self.index)
    }
}

/// Subnet index to (zone, role) mapping, ordered by index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ZoneAssignment {
    pub policy: AssignmentPolicy,
    /// Every zone the plan was spread over, in provider order, including
    /// zones no subnet landed in.
    pub zones: Vec<ZoneId>,
    pub entries: Vec<ZoneAssignmentEntry>,
}

impl ZoneAssignment {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ZoneAssignmentEntry> {
        self.entries.iter()
    }

    /// Entries with the given role, in index order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &ZoneAssignmentEntry> {
        self.entries.iter().filter(move |e| e.role == role)
    }

    pub fn roles(&self) -> Vec<Role> {
        self.entries.iter().map(|e| e.role).collect()
    }
}
