//! Platform identification and command resolution.
//!
//! This module canonicalizes free-form platform strings into the supported
//! Cisco families and resolves platform-specific spellings of logical
//! commands (e.g. `show ip interface brief` becomes
//! `show ipv4 interface brief` on IOS-XR). Both operations are total: any
//! input yields a usable answer, with unknown platforms defaulting to
//! classic IOS.

use std::collections::HashMap;
use std::fmt;

use log::warn;
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical platform tags supported by this crate.
pub const SUPPORTED_PLATFORMS: &[&str] = &["ios", "iosxe", "iosxr"];

/// Canonical Cisco platform family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Classic IOS (also the fallback for unrecognized platform strings).
    #[default]
    Ios,
    /// IOS-XE.
    IosXe,
    /// IOS-XR.
    IosXr,
}

impl Platform {
    /// Canonicalizes a free-form platform string.
    ///
    /// Accepts the common spellings seen in inventories (`"cisco_ios"`,
    /// `"IOS-XE"`, `"iosxr"`, `"cisco_xr"`, ...). Unrecognized or empty
    /// input falls back to [`Platform::Ios`] and logs a warning; the
    /// substitution is never an error.
    pub fn normalize(raw: &str) -> Platform {
        let compact: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let trimmed = compact.strip_prefix("cisco").unwrap_or(&compact);

        if trimmed.contains("xr") {
            Platform::IosXr
        } else if trimmed.contains("xe") {
            Platform::IosXe
        } else if trimmed.contains("ios") {
            Platform::Ios
        } else {
            warn!("unrecognized platform '{}', defaulting to ios", raw);
            Platform::Ios
        }
    }

    /// Canonical tag for this platform (`ios`, `iosxe`, `iosxr`).
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::IosXe => "iosxe",
            Platform::IosXr => "iosxr",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Per-platform spellings of logical commands.
///
/// Keys are `(platform, normalized command)`; absent entries mean the
/// command text is identical on that platform. IOS-XE shares the classic
/// IOS spellings for everything this crate parses, so only IOS-XR rows are
/// registered.
static COMMAND_VARIANTS: Lazy<HashMap<(Platform, &'static str), &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            (Platform::IosXr, "show ip interface brief"),
            "show ipv4 interface brief",
        ),
        ((Platform::IosXr, "show ip route"), "show route"),
        ((Platform::IosXr, "show ip bgp summary"), "show bgp summary"),
        ((Platform::IosXr, "show bgp summary"), "show bgp summary"),
        ((Platform::IosXr, "show ip ospf neighbor"), "show ospf neighbor"),
        ((Platform::IosXr, "show ip access-lists"), "show access-lists ipv4"),
        ((Platform::IosXr, "show arp"), "show arp vrf default"),
    ])
});

/// Collapses repeated whitespace and lowercases for table lookups.
pub(crate) fn normalize_command(command: &str) -> String {
    command
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Resolves the platform-specific spelling of a command.
///
/// Returns the registered variant when one exists, otherwise the original
/// command unchanged. Total and side-effect free.
pub fn resolve_command(command: &str, platform: Platform) -> String {
    let key = normalize_command(command);
    match COMMAND_VARIANTS.get(&(platform, key.as_str())) {
        Some(variant) => (*variant).to_string(),
        None => command.to_string(),
    }
}

/// Canonical parser key for a logical command.
///
/// The text-pattern tier selects its extractor from this key; commands
/// without a dedicated extractor classify as [`CommandKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// `show version` and variants.
    Version,
    /// `show ip interface brief` / `show ipv4 interface brief`.
    InterfaceBrief,
    /// `show bgp summary` family.
    BgpSummary,
    /// `show ospf neighbor` family.
    OspfNeighbors,
    /// `show line` (console/async line discovery input).
    ShowLine,
    /// Everything else.
    Other,
}

impl CommandKind {
    /// Classifies a command string into its canonical parser key.
    ///
    /// Matching is case-insensitive and tolerant of platform spelling
    /// differences (the IOS-XR `ipv4` forms classify the same as the
    /// classic IOS forms).
    pub fn classify(command: &str) -> CommandKind {
        let cmd = normalize_command(command);

        if cmd.starts_with("show version") {
            CommandKind::Version
        } else if cmd.contains("interface brief") {
            CommandKind::InterfaceBrief
        } else if cmd.contains("bgp") && cmd.contains("summary") {
            CommandKind::BgpSummary
        } else if cmd.contains("ospf") && cmd.contains("neighbor") {
            CommandKind::OspfNeighbors
        } else if cmd == "show line" || cmd.starts_with("show line ") {
            CommandKind::ShowLine
        } else {
            CommandKind::Other
        }
    }
}
