//! Zone and role assignment for planned subnets.

use crate::error::PlanError;
use crate::models::{AssignmentPolicy, Role, SubnetPlan, ZoneAssignment, ZoneAssignmentEntry, ZoneId};

/// Number of subnets to request from the partitioner for `policy`.
///
/// Paired-per-zone always needs one public and one private subnet per
/// zone, whatever count was configured.
pub fn required_subnet_count(policy: AssignmentPolicy, zones: &[ZoneId], configured: usize) -> usize {
    match policy {
        AssignmentPolicy::Interleaved => configured,
        AssignmentPolicy::PairedPerZone => zones.len() * 2,
    }
}

/// Map every subnet of `plan` onto a zone and a role.
///
/// Zones are used in the order given; they are never re-sorted.
pub fn assign(
    plan: &SubnetPlan,
    zones: &[ZoneId],
    policy: AssignmentPolicy,
) -> Result<ZoneAssignment, PlanError> {
    if zones.is_empty() {
        return Err(PlanError::ZoneListEmpty);
    }

    let entries = match policy {
        AssignmentPolicy::Interleaved => plan
            .iter()
            .enumerate()
            .map(|(i, block)| ZoneAssignmentEntry {
                index: i,
                block: *block,
                zone: zones[i % zones.len()].clone(),
                role: if i % 2 == 0 { Role::Public } else { Role::Private },
            })
            .collect(),
        AssignmentPolicy::PairedPerZone => {
            if plan.len() != zones.len() * 2 {
                return Err(PlanError::PlanZoneMismatch {
                    plan_len: plan.len(),
                    zones: zones.len(),
                });
            }
            let roles = [Role::Public, Role::Private];
            zones
                .iter()
                .flat_map(|zone| roles.iter().map(move |role| (zone, *role)))
                .zip(plan.iter())
                .enumerate()
                .map(|(i, ((zone, role), block))| ZoneAssignmentEntry {
                    index: i,
                    block: *block,
                    zone: zone.clone(),
                    role,
                })
                .collect()
        }
    };

    log::debug!(
        "assign({} subnets, {} zones, {policy}) done",
        plan.len(),
        zones.len()
    );
    Ok(ZoneAssignment {
        policy,
        zones: zones.to_vec(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::partition_cidr;

    fn zones(names: &[&str]) -> Vec<ZoneId> {
        names.iter().map(|&n| ZoneId::from(n)).collect()
    }

    #[test]
    fn test_interleaved() {
        let plan = partition_cidr("10.0.0.0/16", 4).unwrap();
        let result = assign(&plan, &zones(&["a", "b"]), AssignmentPolicy::Interleaved).unwrap();

        let zone_names: Vec<&str> = result.iter().map(|e| e.zone.as_str()).collect();
        assert_eq!(zone_names, ["a", "b", "a", "b"]);
        assert_eq!(
            result.roles(),
            [Role::Public, Role::Private, Role::Public, Role::Private]
        );
        assert_eq!(result.entries[2].block.to_string(), "10.0.128.0/18");
        assert_eq!(result.entries[2].index, 2);
    }

    #[test]
    fn test_interleaved_odd_zone_count() {
        // three zones, parity and zone cycle drift apart
        let plan = partition_cidr("10.0.0.0/16", 4).unwrap();
        let result = assign(&plan, &zones(&["z1", "z2", "z3"]), AssignmentPolicy::Interleaved)
            .unwrap();
        let zone_names: Vec<&str> = result.iter().map(|e| e.zone.as_str()).collect();
        assert_eq!(zone_names, ["z1", "z2", "z3", "z1"]);
        assert_eq!(result.entries[3].role, Role::Private);
    }

    #[test]
    fn test_paired_per_zone() {
        let plan = partition_cidr("10.0.0.0/16", 4).unwrap();
        let result = assign(&plan, &zones(&["a", "b"]), AssignmentPolicy::PairedPerZone).unwrap();

        let zone_names: Vec<&str> = result.iter().map(|e| e.zone.as_str()).collect();
        assert_eq!(zone_names, ["a", "a", "b", "b"]);
        assert_eq!(
            result.roles(),
            [Role::Public, Role::Private, Role::Public, Role::Private]
        );
        assert_eq!(result.with_role(Role::Private).count(), 2);
    }

    #[test]
    fn test_paired_per_zone_mismatch() {
        let plan = partition_cidr("10.0.0.0/16", 3).unwrap();
        assert_eq!(
            assign(&plan, &zones(&["a", "b"]), AssignmentPolicy::PairedPerZone),
            Err(PlanError::PlanZoneMismatch {
                plan_len: 3,
                zones: 2
            })
        );
    }

    #[test]
    fn test_empty_zones() {
        let plan = partition_cidr("10.0.0.0/16", 2).unwrap();
        for policy in [AssignmentPolicy::Interleaved, AssignmentPolicy::PairedPerZone] {
            assert_eq!(assign(&plan, &[], policy), Err(PlanError::ZoneListEmpty));
        }
    }

    #[test]
    fn test_zone_order_is_kept() {
        let plan = partition_cidr("10.0.0.0/16", 2).unwrap();
        let result = assign(&plan, &zones(&["c", "a"]), AssignmentPolicy::Interleaved).unwrap();
        assert_eq!(result.entries[0].zone.as_str(), "c");
        assert_eq!(result.zones, zones(&["c", "a"]));
    }

    #[test]
    fn test_unused_zones_are_kept() {
        let plan = partition_cidr("10.0.0.0/16", 2).unwrap();
        let result = assign(&plan, &zones(&["a", "b", "c"]), AssignmentPolicy::Interleaved).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.zones, zones(&["a", "b", "c"]));
    }

    #[test]
    fn test_required_subnet_count() {
        let z = zones(&["a", "b", "c"]);
        assert_eq!(required_subnet_count(AssignmentPolicy::Interleaved, &z, 5), 5);
        assert_eq!(required_subnet_count(AssignmentPolicy::PairedPerZone, &z, 5), 6);
    }
}
