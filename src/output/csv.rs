//! CSV output of a subnet plan.

use crate::models::{SubnetPlan, ZoneAssignment};
use std::error::Error;

use super::terminal::format_field;

/// One printed line of the plan table.
#[derive(Debug, PartialEq)]
pub struct PlanPrintRow {
    /// Subnet index, `None` for unallocated slots.
    pub index: Option<usize>,
    pub name: String,
    pub subnet_cidr: String,
    pub broadcast: String,
    pub usable_hosts: u64,
    pub zone: String,
    pub role: String,
}

/// Build the table rows: assigned subnets in index order, then the
/// reserved but unallocated slots.
pub fn plan_rows(plan: &SubnetPlan, assignment: &ZoneAssignment) -> Vec<PlanPrintRow> {
    let assigned = assignment.iter().map(|e| PlanPrintRow {
        index: Some(e.index),
        name: e.subnet_name(),
        subnet_cidr: e.block.to_string(),
        broadcast: e.block.hi().to_string(),
        usable_hosts: e.block.usable_hosts().unwrap_or(0),
        zone: e.zone.to_string(),
        role: e.role.to_string(),
    });
    let free = plan.unallocated().into_iter().map(|block| PlanPrintRow {
        index: None,
        name: "-free-".to_string(),
        subnet_cidr: block.to_string(),
        broadcast: block.hi().to_string(),
        usable_hosts: block.usable_hosts().unwrap_or(0),
        zone: "None".to_string(),
        role: "None".to_string(),
    });
    assigned.chain(free).collect()
}

/// Print the plan as CSV to stdout.
pub fn plan_print(plan: &SubnetPlan, assignment: &ZoneAssignment) -> Result<(), Box<dyn Error>> {
    log::info!(
        "#Start plan_print() {} subnets of /{} in {} policy={}",
        plan.len(),
        plan.prefix(),
        plan.source(),
        assignment.policy
    );

    println!(
        r#" "idx",            "name",       "subnet_cidr",       "broadcast",    "hosts",          "zone",   "role""#
    );
    for row in plan_rows(plan, assignment) {
        print_csv_row(&row);
    }
    Ok(())
}

fn print_csv_row(row: &PlanPrintRow) {
    let index = row
        .index
        .map(|i| i.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{index},{name},{subnet_cidr},{broadcast},{hosts},{zone},{role}",
        index = format_field(index, 6),
        name = format_field(&row.name, 18),
        subnet_cidr = format_field(&row.subnet_cidr, 18),
        broadcast = format_field(format!("{}_br", row.broadcast), 19),
        hosts = format_field(row.usable_hosts, 9),
        zone = format_field(&row.zone, 16),
        role = format_field(&row.role, 9),
    );
}
