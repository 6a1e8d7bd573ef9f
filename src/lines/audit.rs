use super::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

/// Count summary of one audit (or of a merged fleet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuditSummary {
    pub total_lines: usize,
    pub telnet_count: usize,
    pub risk_breakdown: BTreeMap<RiskLevel, usize>,
}

impl AuditSummary {
    fn merge(&mut self, other: &AuditSummary) {
        self.total_lines += other.total_lines;
        self.telnet_count += other.telnet_count;
        for (risk, count) in &other.risk_breakdown {
            *self.risk_breakdown.entry(*risk).or_insert(0) += count;
        }
    }
}

/// Complete line-security audit of one device.
///
/// Immutable once built; downstream consumers treat it as finalized data.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeviceLineAudit {
    /// Device name, empty when audited anonymously via [`audit_lines`].
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    pub platform: Platform,
    /// Lines found in "show line" output, sorted by address.
    pub discovered: Vec<LineRecord>,
    /// Parsed configuration per line, with derived security posture.
    pub configured: BTreeMap<LineAddress, LineConfig>,
    /// Addresses of telnet-enabled lines, sorted.
    pub telnet_enabled: Vec<LineAddress>,
    pub compliance_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: AuditSummary,
}

impl DeviceLineAudit {
    /// Serializes the audit as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Audits one device's console/async lines.
///
/// `config_blocks` maps line address text to the configuration block for
/// that line (as produced by a `section`-style extraction, see
/// [`extract_line_blocks`]). Blocks keyed by text failing the `x/y/z`
/// grammar are skipped with a warning; everything else always yields a
/// well-formed report.
pub fn audit_lines(
    show_line_output: &str,
    config_blocks: &BTreeMap<String, String>,
    platform: &str,
) -> DeviceLineAudit {
    audit_named_device("", show_line_output, config_blocks, platform)
}

/// [`audit_lines`] with the device name recorded in the report.
pub fn audit_named_device(
    hostname: &str,
    show_line_output: &str,
    config_blocks: &BTreeMap<String, String>,
    platform: &str,
) -> DeviceLineAudit {
    let platform = Platform::normalize(platform);
    let discovered = discover_lines(show_line_output, platform);

    let mut configured = BTreeMap::new();
    for (address_text, block) in config_blocks {
        match address_text.parse::<LineAddress>() {
            Ok(address) => {
                configured.insert(address, LineConfig::parse(address, block));
            }
            Err(_) => warn!(
                "skipping config block with invalid line address '{}'",
                address_text
            ),
        }
    }

    let telnet_enabled: Vec<LineAddress> = configured
        .values()
        .filter(|config| config.telnet_enabled)
        .map(|config| config.address)
        .collect();

    let mut risk_breakdown = BTreeMap::new();
    for config in configured.values() {
        *risk_breakdown.entry(config.risk_level).or_insert(0) += 1;
    }
    let summary = AuditSummary {
        total_lines: configured.len(),
        telnet_count: telnet_enabled.len(),
        risk_breakdown,
    };

    let compliance_issues = compliance_issues(&discovered, &configured);
    let recommendations = recommendations(&configured);

    DeviceLineAudit {
        hostname: hostname.to_string(),
        platform,
        discovered,
        configured,
        telnet_enabled,
        compliance_issues,
        recommendations,
        summary,
    }
}

/// Channel-coverage and rotary-consistency checks.
///
/// Every `(slot, subslot)` group seen in discovery or configuration is
/// expected to carry the full `0..=22` channel set; a rotary id must not
/// span multiple groups.
fn compliance_issues(
    discovered: &[LineRecord],
    configured: &BTreeMap<LineAddress, LineConfig>,
) -> Vec<String> {
    let mut issues = Vec::new();

    let mut groups: BTreeSet<(u8, u8)> = BTreeSet::new();
    groups.extend(discovered.iter().map(|record| record.address.group()));
    groups.extend(configured.keys().map(LineAddress::group));

    for (slot, subslot) in groups {
        let configured_channels: BTreeSet<u8> = configured
            .keys()
            .filter(|address| address.group() == (slot, subslot))
            .map(|address| address.channel)
            .collect();
        let discovered_channels: BTreeSet<u8> = discovered
            .iter()
            .filter(|record| record.address.group() == (slot, subslot))
            .map(|record| record.address.channel)
            .collect();

        let missing: Vec<String> = (0..=MAX_CHANNEL)
            .filter(|channel| !configured_channels.contains(channel))
            .map(|channel| channel.to_string())
            .collect();
        if !missing.is_empty() {
            issues.push(format!(
                "line group {}/{}: missing configuration for channels {}",
                slot,
                subslot,
                missing.join(",")
            ));
        }

        if !discovered_channels.is_empty() {
            let unexpected: Vec<String> = configured_channels
                .iter()
                .filter(|channel| !discovered_channels.contains(channel))
                .map(|channel| channel.to_string())
                .collect();
            if !unexpected.is_empty() {
                issues.push(format!(
                    "line group {}/{}: channels {} configured but absent from show line output",
                    slot,
                    subslot,
                    unexpected.join(",")
                ));
            }
        }
    }

    let mut rotary_groups: BTreeMap<u32, BTreeSet<(u8, u8)>> = BTreeMap::new();
    for config in configured.values() {
        if let Some(id) = config.rotary {
            rotary_groups
                .entry(id)
                .or_default()
                .insert(config.address.group());
        }
    }
    for (id, spans) in rotary_groups {
        if spans.len() > 1 {
            let rendered: Vec<String> = spans
                .iter()
                .map(|(slot, subslot)| format!("{slot}/{subslot}"))
                .collect();
            issues.push(format!(
                "rotary group {} spans multiple slot/subslot groups: {}",
                id,
                rendered.join(", ")
            ));
        }
    }

    issues
}

/// Ordered remediation list: unauthenticated telnet first, then missing
/// ACLs, then implicit-telnet lines needing review, then a positive
/// confirmation when nothing is telnet-enabled.
fn recommendations(configured: &BTreeMap<LineAddress, LineConfig>) -> Vec<String> {
    let mut recommendations = Vec::new();

    let render = |filter: &dyn Fn(&LineConfig) -> bool| -> Vec<String> {
        configured
            .values()
            .filter(|config| filter(config))
            .map(|config| config.address.to_string())
            .collect()
    };

    let critical = render(&|config| config.risk_level == RiskLevel::Critical);
    if !critical.is_empty() {
        recommendations.push(format!(
            "CRITICAL: disable telnet or require login on lines {}",
            critical.join(", ")
        ));
    }

    let missing_acl = render(&|config| config.risk_level == RiskLevel::High);
    if !missing_acl.is_empty() {
        recommendations.push(format!(
            "HIGH: apply an access-class to telnet-enabled lines {}",
            missing_acl.join(", ")
        ));
    }

    let implicit = render(&|config| config.telnet_implicit);
    if !implicit.is_empty() {
        recommendations.push(format!(
            "review lines {} with no transport input directive: telnet may be allowed by default",
            implicit.join(", ")
        ));
    }

    if configured.values().all(|config| !config.telnet_enabled) {
        recommendations
            .push("no telnet-enabled lines detected: transport configuration is compliant".to_string());
    }

    recommendations
}

/// Per-device detail payload of a fleet report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FleetSupportData {
    /// Every parsed line configuration, keyed by hostname then address.
    pub detailed_configs: BTreeMap<String, BTreeMap<LineAddress, LineConfig>>,
}

/// Merged line-security report across many devices.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FleetLineAuditReport {
    pub device_count: usize,
    /// Hostnames with at least one telnet-enabled line, sorted.
    pub telnet_enabled_devices: Vec<String>,
    pub summary: AuditSummary,
    /// Per-device issues, prefixed with the hostname.
    pub compliance_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub support_data: FleetSupportData,
}

impl FleetLineAuditReport {
    /// Serializes the report as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Exports the fleet report JSON schema (for downstream consumers).
pub fn audit_report_schema_json() -> Result<String, AuditError> {
    let schema = schemars::schema_for!(FleetLineAuditReport);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Thread-safe accumulator merging per-device audits into one fleet report.
///
/// Parsing and classification stay pure and lock-free; this is the single
/// shared-mutation point, so many worker threads can each audit a device
/// and record the result here.
#[derive(Debug, Clone, Default)]
pub struct FleetAuditCollector {
    devices: Arc<Mutex<BTreeMap<String, DeviceLineAudit>>>,
}

impl FleetAuditCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one device's audit, replacing any earlier entry for the host.
    pub fn record(&self, hostname: &str, mut audit: DeviceLineAudit) -> Result<(), AuditError> {
        audit.hostname = hostname.to_string();
        let mut guard = self
            .devices
            .lock()
            .map_err(|e| AuditError::InternalError(format!("collector lock error: {e}")))?;
        guard.insert(hostname.to_string(), audit);
        Ok(())
    }

    /// Number of devices recorded so far.
    pub fn device_count(&self) -> Result<usize, AuditError> {
        let guard = self
            .devices
            .lock()
            .map_err(|e| AuditError::InternalError(format!("collector lock error: {e}")))?;
        Ok(guard.len())
    }

    /// Builds the merged fleet report from everything recorded so far.
    pub fn report(&self) -> Result<FleetLineAuditReport, AuditError> {
        let guard = self
            .devices
            .lock()
            .map_err(|e| AuditError::InternalError(format!("collector lock error: {e}")))?;

        let mut summary = AuditSummary::default();
        let mut telnet_enabled_devices = Vec::new();
        let mut compliance_issues = Vec::new();
        let mut recommendations = Vec::new();
        let mut detailed_configs = BTreeMap::new();

        for (hostname, audit) in guard.iter() {
            summary.merge(&audit.summary);
            if audit.summary.telnet_count > 0 {
                telnet_enabled_devices.push(hostname.clone());
            }
            compliance_issues.extend(
                audit
                    .compliance_issues
                    .iter()
                    .map(|issue| format!("{hostname}: {issue}")),
            );
            recommendations.extend(
                audit
                    .recommendations
                    .iter()
                    .filter(|rec| !rec.starts_with("no telnet-enabled lines"))
                    .map(|rec| format!("{hostname}: {rec}")),
            );
            detailed_configs.insert(hostname.clone(), audit.configured.clone());
        }

        if telnet_enabled_devices.is_empty() {
            recommendations.push(
                "no telnet-enabled lines detected on any device: fleet transport configuration is compliant"
                    .to_string(),
            );
        }

        Ok(FleetLineAuditReport {
            device_count: guard.len(),
            telnet_enabled_devices,
            summary,
            compliance_issues,
            recommendations,
            support_data: FleetSupportData { detailed_configs },
        })
    }
}
