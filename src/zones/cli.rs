//! Cloud provider CLI command execution.
//!
//! Provides utilities for running provider CLI commands and capturing their output.

use crate::error::ZoneLookupError;
use colored::Colorize;
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Largest stdout accepted from a single command.
const MAX_OUTPUT_BYTES: usize = 500_000;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a shell command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If the command fails, is empty or produces too much output
pub fn run(cmd: &str) -> Result<String, ZoneLookupError> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);

    let (program, args) = cmds
        .split_first()
        .ok_or_else(|| ZoneLookupError::Command("empty command".to_string()))?;

    let output = Command::new(program).args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        ZoneLookupError::Command(format!("failed to execute {program}: {e}"))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(ZoneLookupError::Command(format!("ERROR running: {stderr}")));
    }

    log::debug!("Success cmd: {cmd}");
    log::debug!("Success output.stdout.len(): {}", output.stdout.len());

    if output.stdout.len() > MAX_OUTPUT_BYTES {
        return Err(ZoneLookupError::Command(format!(
            "Response too large: {} bytes for command: {:?}",
            output.stdout.len(),
            cmds
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| ZoneLookupError::Command(format!("Invalid UTF-8: {e}")))
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}
