//! Console/async line discovery, configuration parsing, and telnet-exposure
//! auditing.
//!
//! Lines are addressed as `slot/subslot/channel` (the `x/y/z` grammar, slot
//! and subslot in `{0,1}`, channel in `0..=22`). Discovery scans "show line"
//! output into candidate [`LineRecord`]s, per-line configuration blocks parse
//! into [`LineConfig`]s with security posture computed once at construction,
//! and the aggregator compiles device- and fleet-level audit reports.
//!
//! # Main Components
//!
//! - [`LineAddress`] - Validated `x/y/z` line address
//! - [`discover_lines`] - "show line" scanner with range expansion
//! - [`LineConfig`] - Parsed per-line configuration with derived risk fields
//! - [`audit_lines`] / [`DeviceLineAudit`] - Per-device audit entry point
//! - [`FleetAuditCollector`] - Thread-safe multi-device accumulator

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AuditError;
use crate::platform::Platform;

pub use audit::{
    AuditSummary, DeviceLineAudit, FleetAuditCollector, FleetLineAuditReport, FleetSupportData,
    audit_lines, audit_named_device, audit_report_schema_json,
};
pub use config::{LineConfig, LoginMethod, extract_line_blocks};
pub use discovery::discover_lines;
pub use security::{DetectionMethod, RiskLevel};

/// Highest channel number a line address may carry.
pub const MAX_CHANNEL: u8 = 22;

/// A validated console/async line address (`slot/subslot/channel`).
///
/// Construction always enforces the grammar: slot and subslot in `{0,1}`,
/// channel in `0..=22`. Serializes as the `"slot/subslot/channel"` string,
/// which also makes it usable as a JSON map key. Ordering is by slot, then
/// subslot, then channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineAddress {
    /// Slot number, `0` or `1`.
    pub slot: u8,
    /// Sub-slot number, `0` or `1`.
    pub subslot: u8,
    /// Channel number, `0..=22`.
    pub channel: u8,
}

impl LineAddress {
    /// Builds an address, rejecting out-of-bounds components.
    pub fn new(slot: u8, subslot: u8, channel: u8) -> Result<Self, AuditError> {
        if slot > 1 || subslot > 1 || channel > MAX_CHANNEL {
            return Err(AuditError::InvalidLineAddress(format!(
                "{slot}/{subslot}/{channel}"
            )));
        }
        Ok(Self {
            slot,
            subslot,
            channel,
        })
    }

    /// The `(slot, subslot)` group this address belongs to.
    pub fn group(&self) -> (u8, u8) {
        (self.slot, self.subslot)
    }
}

impl fmt::Display for LineAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.slot, self.subslot, self.channel)
    }
}

impl FromStr for LineAddress {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Plain decimal digits only, no sign or whitespace. Leading zeros
        // are fine ("0/0/05" names channel 5); Display always renders the
        // canonical form.
        fn component(part: &str) -> Option<u8> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse().ok()
        }

        let invalid = || AuditError::InvalidLineAddress(s.to_string());
        let mut parts = s.split('/');
        let slot = parts.next().and_then(component).ok_or_else(invalid)?;
        let subslot = parts.next().and_then(component).ok_or_else(invalid)?;
        let channel = parts.next().and_then(component).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Self::new(slot, subslot, channel).map_err(|_| invalid())
    }
}

impl Serialize for LineAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LineAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for LineAddress {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("LineAddress")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^[01]/[01]/([0-9]|1[0-9]|2[0-2])$",
            "description": "Console/async line address as slot/subslot/channel",
        })
    }
}

/// Returns `true` iff `s` satisfies the `x/y/z` line address grammar.
pub fn validate_line_format(s: &str) -> bool {
    s.parse::<LineAddress>().is_ok()
}

/// The line type reported by the "Typ" column (or inferred from a name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Tty,
    Aux,
    Con,
    Vty,
    Unknown,
}

impl LineType {
    pub(crate) fn from_token(token: &str) -> LineType {
        match token.to_ascii_lowercase().as_str() {
            "tty" => LineType::Tty,
            "aux" => LineType::Aux,
            "con" | "cty" => LineType::Con,
            "vty" => LineType::Vty,
            _ => LineType::Unknown,
        }
    }
}

/// How a discovered line record was obtained.
///
/// `last_token` marks the lower-confidence fallback that takes the final
/// whitespace-delimited token of an irregularly spaced row; consumers may
/// discount such records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LineSource {
    /// Matched directly by a row pattern.
    Parsed,
    /// Derived by expanding a `start-end` range summary.
    RangeExpanded,
    /// Recovered by the last-token heuristic on a wide row.
    LastToken,
}

/// One line discovered in "show line" output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LineRecord {
    pub address: LineAddress,
    pub line_type: LineType,
    pub source: LineSource,
}

mod audit;
mod config;
mod discovery;
mod security;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_grammar_accepts_in_bounds_triples() {
        assert!(validate_line_format("0/0/0"));
        assert!(validate_line_format("1/0/22"));
        assert!(validate_line_format("0/1/13"));
    }

    #[test]
    fn address_grammar_rejects_out_of_bounds_components() {
        assert!(!validate_line_format("2/0/0"));
        assert!(!validate_line_format("0/2/0"));
        assert!(!validate_line_format("0/0/23"));
    }

    #[test]
    fn address_grammar_rejects_malformed_strings() {
        assert!(!validate_line_format(""));
        assert!(!validate_line_format("0/0"));
        assert!(!validate_line_format("0/0/0/0"));
        assert!(!validate_line_format("con0"));
        assert!(!validate_line_format("a/b/c"));
    }

    #[test]
    fn address_grammar_accepts_leading_zeros_in_channel() {
        assert!(validate_line_format("0/0/05"));
        assert!(validate_line_format("1/1/022"));
        let address: LineAddress = "0/0/05".parse().expect("leading zero channel");
        assert_eq!(address.channel, 5);
        assert_eq!(address.to_string(), "0/0/5");
    }

    #[test]
    fn address_grammar_rejects_surrounding_whitespace() {
        assert!(!validate_line_format(" 1/0/3"));
        assert!(!validate_line_format("1/0/3 "));
        assert!(!validate_line_format("0/ 1/5"));
    }

    #[test]
    fn address_round_trips_through_display_and_from_str() {
        let address: LineAddress = "1/0/3".parse().expect("valid address");
        assert_eq!(address.to_string(), "1/0/3");
        assert_eq!(address.group(), (1, 0));
    }

    #[test]
    fn address_ordering_is_slot_subslot_channel() {
        let mut addresses = vec![
            "1/0/0".parse::<LineAddress>().expect("addr"),
            "0/1/22".parse::<LineAddress>().expect("addr"),
            "0/0/5".parse::<LineAddress>().expect("addr"),
        ];
        addresses.sort();
        let rendered: Vec<String> = addresses.iter().map(|a| a.to_string()).collect();
        assert_eq!(rendered, ["0/0/5", "0/1/22", "1/0/0"]);
    }

    #[test]
    fn address_serializes_as_string() {
        let address: LineAddress = "0/1/5".parse().expect("valid address");
        let json = serde_json::to_string(&address).expect("encode");
        assert_eq!(json, "\"0/1/5\"");
        let back: LineAddress = serde_json::from_str(&json).expect("decode");
        assert_eq!(back, address);
    }

    #[test]
    fn line_type_token_mapping_includes_console_aliases() {
        assert_eq!(LineType::from_token("TTY"), LineType::Tty);
        assert_eq!(LineType::from_token("CTY"), LineType::Con);
        assert_eq!(LineType::from_token("con"), LineType::Con);
        assert_eq!(LineType::from_token("???"), LineType::Unknown);
    }
}
