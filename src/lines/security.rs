use super::*;
use std::collections::BTreeSet;

use super::config::LoginMethod;

/// Telnet-exposure risk of one line, lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Telnet not enabled.
    Low,
    /// Telnet enabled, authenticated, with an access-class.
    Medium,
    /// Telnet enabled without an access-class restriction.
    High,
    /// Telnet enabled with no login required.
    Critical,
}

/// Which classification clause fired for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// `transport input none`: all transports explicitly disabled.
    TransportInputNone,
    /// `transport input telnet` (telnet alone).
    TransportInputTelnet,
    /// `transport input ssh telnet`: both protocols allowed.
    TransportInputSshTelnet,
    /// `transport input all`.
    TransportInputAll,
    /// `transport preferred telnet`.
    TransportPreferredTelnet,
    /// `transport input ssh` without telnet.
    TransportInputSshOnly,
    /// No `transport input` directive at all: telnet cannot be ruled out.
    ImplicitDefault,
    /// An explicit protocol set naming neither telnet, ssh nor all.
    TransportInputRestricted,
}

/// Parsed fields the classifier reads.
pub(super) struct SecurityInputs<'a> {
    pub transport_input: &'a BTreeSet<String>,
    pub transport_preferred: Option<&'a str>,
    pub login_method: LoginMethod,
    pub access_class: Option<&'a str>,
    pub exec_enabled: bool,
    pub rotary: Option<u32>,
}

/// Derived security posture, computed once per line at construction.
pub(super) struct SecurityPosture {
    pub telnet_explicit: bool,
    pub telnet_implicit: bool,
    pub telnet_enabled: bool,
    pub detection_method: DetectionMethod,
    pub risk_level: RiskLevel,
    pub is_console_server_port: bool,
}

/// Deterministic, pure classification of a line's telnet exposure.
///
/// Clause order for overlapping directives: `none` disables everything and
/// wins outright; explicit telnet clauses come next; then ssh-only; an empty
/// set means the line never restricted transport, so telnet is implicitly
/// assumed reachable; any other explicit set counts as restricted.
pub(super) fn classify(inputs: SecurityInputs<'_>) -> SecurityPosture {
    let ti = inputs.transport_input;
    let has = |proto: &str| ti.contains(proto);

    let mut telnet_explicit = false;
    let mut telnet_implicit = false;

    let detection_method = if has("none") {
        DetectionMethod::TransportInputNone
    } else if has("telnet") {
        telnet_explicit = true;
        if has("ssh") {
            DetectionMethod::TransportInputSshTelnet
        } else {
            DetectionMethod::TransportInputTelnet
        }
    } else if has("all") {
        telnet_explicit = true;
        DetectionMethod::TransportInputAll
    } else if inputs.transport_preferred == Some("telnet") {
        telnet_explicit = true;
        DetectionMethod::TransportPreferredTelnet
    } else if has("ssh") {
        DetectionMethod::TransportInputSshOnly
    } else if ti.is_empty() {
        telnet_implicit = true;
        DetectionMethod::ImplicitDefault
    } else {
        DetectionMethod::TransportInputRestricted
    };

    let telnet_enabled = telnet_explicit || telnet_implicit;

    // Missing-ACL exposure only escalates lines authenticating against a
    // user database or AAA list; a plain line password classifies medium
    // without an access-class check.
    let risk_level = if !telnet_enabled {
        RiskLevel::Low
    } else if inputs.login_method == LoginMethod::None {
        RiskLevel::Critical
    } else if inputs.access_class.is_none() && inputs.login_method != LoginMethod::Password {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    };

    SecurityPosture {
        telnet_explicit,
        telnet_implicit,
        telnet_enabled,
        detection_method,
        risk_level,
        is_console_server_port: !inputs.exec_enabled && inputs.rotary.is_some(),
    }
}
