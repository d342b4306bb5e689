//! Terminal output utilities.

use crate::provision::StackOutputs;
use colored::Colorize;
use std::error::Error;

/// Format a value as a quoted, right-aligned field.
///
/// Values wider than `width` are printed in full.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

/// Print the stack outputs as pretty JSON.
pub fn print_outputs(outputs: &StackOutputs) -> Result<(), Box<dyn Error>> {
    println!("#{}#", "OUTPUTS".on_blue());
    println!("{}", serde_json::to_string_pretty(outputs)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("zone", 10), "    \"zone\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("10.0.0.0/18", 5), "\"10.0.0.0/18\"");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(62, 6), "  \"62\"");
    }
}
