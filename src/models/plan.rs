//! Subnet request and the resulting plan.

use super::NetworkBlock;
use crate::error::PlanError;
use serde::Serialize;

/// A request to carve `count` equal subnets out of `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetRequest {
    pub block: NetworkBlock,
    pub count: usize,
}

impl SubnetRequest {
    pub fn new(block: NetworkBlock, count: usize) -> Result<SubnetRequest, PlanError> {
        if count == 0 {
            return Err(PlanError::InvalidSubnetCount(count.to_string()));
        }
        Ok(SubnetRequest { block, count })
    }
}

/// Parse a subnet count from a JSON number.
///
/// Zero, negative and fractional numbers are rejected.
pub fn subnet_count_from_number(n: &serde_json::Number) -> Result<usize, PlanError> {
    n.as_u64()
        .filter(|&c| c > 0)
        .and_then(|c| usize::try_from(c).ok())
        .ok_or_else(|| PlanError::InvalidSubnetCount(n.to_string()))
}

/// Ordered, equally sized, non-overlapping subnets of a source block.
///
/// Index `i` is always the i-th block by ascending address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetPlan {
    source: NetworkBlock,
    prefix: u8,
    blocks: Vec<NetworkBlock>,
}

impl SubnetPlan {
    pub(crate) fn new(source: NetworkBlock, prefix: u8, blocks: Vec<NetworkBlock>) -> SubnetPlan {
        SubnetPlan {
            source,
            prefix,
            blocks,
        }
    }

    /// The block that was partitioned.
    pub fn source(&self) -> NetworkBlock {
        self.source
    }

    /// Prefix length shared by every planned subnet.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn blocks(&self) -> &[NetworkBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NetworkBlock> {
        self.blocks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NetworkBlock> {
        self.blocks.iter()
    }

    /// Slots reserved by rounding the count up to a power of two but not
    /// handed out. They stay free so that a subnet's index alone fixes
    /// its address.
    pub fn unallocated(&self) -> Vec<NetworkBlock> {
        let slots = 1usize << (self.prefix - self.source.prefix);
        let step = 1u64 << (super::MAX_LENGTH - self.prefix);
        let base = u32::from(self.source.addr) as u64;
        (self.blocks.len()..slots)
            .map(|i| NetworkBlock {
                addr: ((base + i as u64 * step) as u32).into(),
                prefix: self.prefix,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a SubnetPlan {
    type Item = &'a NetworkBlock;
    type IntoIter = std::slice::Iter<'a, NetworkBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
