//! Audits a device's console/async lines from captured command output.
//!
//! Usage:
//!   cargo run --example line_audit -- show_line.txt running_config.txt [platform] [hostname]
//!
//! Reads a "show line" capture and a running configuration, extracts the
//! per-line configuration blocks, and prints the full audit report as JSON.

use std::env;
use std::fs;

use anyhow::{Context, Result};
use rlinesec::lines::{audit_named_device, extract_line_blocks};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let show_line_path = args
        .next()
        .context("usage: line_audit <show-line-file> <running-config-file> [platform] [hostname]")?;
    let config_path = args.next().context("missing running-config file argument")?;
    let platform = args.next().unwrap_or_else(|| "ios".to_string());
    let hostname = args.next().unwrap_or_default();

    let show_line_output = fs::read_to_string(&show_line_path)
        .with_context(|| format!("reading show line capture {show_line_path}"))?;
    let running_config = fs::read_to_string(&config_path)
        .with_context(|| format!("reading running config {config_path}"))?;

    let blocks = extract_line_blocks(&running_config);
    let audit = audit_named_device(&hostname, &show_line_output, &blocks, &platform);

    eprintln!(
        "{} lines discovered, {} configured, {} telnet-enabled",
        audit.discovered.len(),
        audit.configured.len(),
        audit.telnet_enabled.len()
    );
    println!("{}", audit.to_json_pretty()?);
    Ok(())
}
