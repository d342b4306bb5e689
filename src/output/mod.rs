//! Output formatting for subnet plans.
//!
//! - [`csv`] - CSV table of planned subnets
//! - [`terminal`] - field formatting and stack outputs

mod csv;
mod terminal;

pub use csv::{plan_print, plan_rows, PlanPrintRow};
pub use terminal::{format_field, print_outputs};
