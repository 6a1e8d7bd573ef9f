//! Parses a captured command output file and prints the structured result.
//!
//! Usage:
//!   cargo run --example parse_output -- "show version" capture.txt [platform]
//!
//! The platform defaults to `ios`; pass `iosxe` or `iosxr` to change command
//! resolution. The parse never fails: degraded inputs come back through the
//! pattern or tabular tiers, visible in the printed `parser_used` field.

use std::env;
use std::fs;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let command = args.next().context("usage: parse_output <command> <capture-file> [platform]")?;
    let capture_path = args.next().context("missing capture file argument")?;
    let platform = args.next().unwrap_or_else(|| "ios".to_string());

    let raw_output = fs::read_to_string(&capture_path)
        .with_context(|| format!("reading capture file {capture_path}"))?;

    let result = rlinesec::parser::parse(&command, &raw_output, &platform);

    println!("parser used: {:?}", result.parser_used);
    println!("parse time:  {:.6}s", result.parsing_time);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
