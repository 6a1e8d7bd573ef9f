//! Tiered command-output parsing.
//!
//! This module converts raw CLI output captured from a device into structured
//! data. Parsing is organized as an ordered chain of strategies that degrade
//! gracefully: a schema-aware structured parse (optional capability), partial
//! key/value extraction, command-specific text patterns, and finally a generic
//! tabular fallback that always yields something usable. The public contract
//! is total: [`CommandParser::parse`] returns a well-formed [`ParseResult`]
//! for every input and never propagates an error or panic to the caller.
//!
//! # Main Components
//!
//! - [`CommandParser`] - The tiered parsing engine
//! - [`ParseResult`] - Uniform result of one parse invocation
//! - [`StructuredParser`] - Pluggable schema-aware parsing capability
//! - [`TextFsmCatalog`] - TextFSM-backed [`StructuredParser`] (feature `textfsm`)

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::platform::{CommandKind, Platform, resolve_command};

pub use engine::CommandParser;
pub use structured::{SchemaError, StructuredParser};
#[cfg(feature = "textfsm")]
pub use textfsm::TextFsmCatalog;

/// Which tier of the parsing chain produced the result.
///
/// Downstream reporting uses this to flag reduced-confidence data without
/// failing the overall run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParserUsed {
    /// Schema-aware parse succeeded (or recognized valid-but-empty output).
    Structured,
    /// Schema parse partially matched; key/value and tabular scraps recovered.
    StructuredPartial,
    /// A command-specific regex extractor matched.
    TextPattern,
    /// Generic tabular fallback; the guaranteed-success tier.
    Raw,
    /// The defensive outer boundary converted a failure into a result.
    ErrorFallback,
}

/// The uniform result of parsing one command's output.
///
/// `success` is `true` unless the invocation itself was structurally invalid
/// (blank command text); a degraded parse is still a success, distinguishable
/// via [`ParseResult::parser_used`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParseResult {
    /// The command as supplied by the caller (before platform resolution).
    pub command: String,
    /// Whether the invocation produced usable data.
    pub success: bool,
    /// Structured output of whichever tier matched.
    pub parsed_data: Map<String, Value>,
    /// The raw text the parse ran over, unmodified.
    pub raw_output: String,
    /// Tier that produced `parsed_data`.
    pub parser_used: ParserUsed,
    /// Recovered error message, when the outer boundary fired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// End-to-end parse duration in seconds, across whichever tiers ran.
    pub parsing_time: f64,
}

/// Parses one command's output with a default engine (no structured capability).
///
/// Convenience wrapper over [`CommandParser::parse`] for one-shot callers.
pub fn parse(command: &str, raw_output: &str, platform: &str) -> ParseResult {
    CommandParser::new().parse(command, raw_output, platform)
}

mod engine;
mod patterns;
mod structured;
mod tabular;
#[cfg(feature = "textfsm")]
mod textfsm;
