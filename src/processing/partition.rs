//! CIDR partitioning.
//!
//! Splits a block into `count` equal subnets. The count is rounded up to
//! a power of two to size the subnets; the subnet at index `i` always
//! starts at `base + i * subnet_size`, and slots past `count` are left
//! unallocated.

use crate::error::PlanError;
use crate::models::{NetworkBlock, SubnetPlan, SubnetRequest, MAX_LENGTH, MAX_SUBNET_PREFIX};
use std::net::Ipv4Addr;

/// Number of selector bits needed to address `count` subnets.
fn subnet_bits(count: usize) -> Option<u32> {
    count.checked_next_power_of_two().map(|p| p.trailing_zeros())
}

/// Partition `block` into `count` equal, non-overlapping subnets.
///
/// # Examples
/// ```
/// use subnet_planner::models::NetworkBlock;
/// use subnet_planner::processing::partition;
///
/// let plan = partition(NetworkBlock::new("10.0.0.0/16").unwrap(), 3).unwrap();
/// let cidrs: Vec<String> = plan.iter().map(|b| b.to_string()).collect();
/// assert_eq!(cidrs, ["10.0.0.0/18", "10.0.64.0/18", "10.0.128.0/18"]);
/// ```
pub fn partition(block: NetworkBlock, count: usize) -> Result<SubnetPlan, PlanError> {
    let request = SubnetRequest::new(block, count)?;
    partition_request(&request)
}

/// Parse `cidr` and partition it.
pub fn partition_cidr(cidr: &str, count: usize) -> Result<SubnetPlan, PlanError> {
    partition(NetworkBlock::new(cidr)?, count)
}

/// Partition a validated [`SubnetRequest`].
pub fn partition_request(request: &SubnetRequest) -> Result<SubnetPlan, PlanError> {
    let SubnetRequest { block, count } = *request;
    let infeasible = |prefix: u32| PlanError::InfeasibleSubnetting { count, prefix };

    // counts past the largest power of two can never fit anyway
    let bits = subnet_bits(count).unwrap_or(usize::BITS);
    if bits == 0 {
        // nothing to split, the source block is returned as is
        return Ok(SubnetPlan::new(block, block.prefix, vec![block]));
    }
    let new_prefix = u32::from(block.prefix) + bits;
    if new_prefix > u32::from(MAX_SUBNET_PREFIX) {
        log::debug!("partition({block}, {count}) needs /{new_prefix}");
        return Err(infeasible(new_prefix));
    }
    // new_prefix <= 30 from here on
    let new_prefix_u8 = new_prefix as u8;
    let shift = u32::from(MAX_LENGTH) - new_prefix;
    let base = u32::from(block.addr);

    let mut blocks = Vec::with_capacity(count);
    for i in 0..count {
        let offset = u32::try_from(i)
            .ok()
            .and_then(|i| i.checked_shl(shift))
            .ok_or_else(|| infeasible(new_prefix))?;
        let child_base = base
            .checked_add(offset)
            .ok_or_else(|| infeasible(new_prefix))?;
        blocks.push(NetworkBlock {
            addr: Ipv4Addr::from(child_base),
            prefix: new_prefix_u8,
        });
    }

    log::debug!(
        "partition({block}, {count}) -> {} x /{new_prefix_u8}",
        blocks.len()
    );
    Ok(SubnetPlan::new(block, new_prefix_u8, blocks))
}
