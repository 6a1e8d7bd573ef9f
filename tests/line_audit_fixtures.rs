use std::collections::BTreeMap;

use rlinesec::lines::{
    DetectionMethod, FleetAuditCollector, LineSource, RiskLevel, audit_named_device,
    audit_report_schema_json, discover_lines, extract_line_blocks,
};
use rlinesec::platform::Platform;

const IOS_SHOW_LINE: &str = include_str!("fixtures/ios_show_line.txt");
const IOS_RUNNING_CONFIG: &str = include_str!("fixtures/ios_running_config.txt");
const IOSXR_SHOW_LINE: &str = include_str!("fixtures/iosxr_show_line.txt");
const EXPECTED_SNAPSHOT: &str = include_str!("fixtures/ios_audit_expected_snapshot.txt");

fn ios_blocks() -> BTreeMap<String, String> {
    extract_line_blocks(IOS_RUNNING_CONFIG)
}

#[test]
fn fixture_discovery_combines_rows_and_range_summary() {
    let records = discover_lines(IOS_SHOW_LINE, Platform::Ios);

    // Direct rows 0/1/0-0/1/2 plus the 0/1/3-0/1/22 range summary.
    assert_eq!(records.len(), 23);
    assert!(records.iter().all(|r| r.address.group() == (0, 1)));

    for record in &records {
        let expected = if record.address.channel <= 2 {
            LineSource::Parsed
        } else {
            LineSource::RangeExpanded
        };
        assert_eq!(record.source, expected, "channel {}", record.address.channel);
    }
}

#[test]
fn fixture_iosxr_discovery_reads_first_column_and_drops_named_lines() {
    let records = discover_lines(IOSXR_SHOW_LINE, Platform::IosXr);
    let rendered: Vec<String> = records.iter().map(|r| r.address.to_string()).collect();
    assert_eq!(rendered, ["0/0/0", "0/0/1", "0/0/2"]);
}

#[test]
fn fixture_config_extraction_keeps_only_async_line_blocks() {
    let blocks = ios_blocks();
    let keys: Vec<&String> = blocks.keys().collect();
    assert_eq!(keys, ["0/1/0", "0/1/1", "0/1/2"]);
    assert!(blocks["0/1/0"].contains("rotary 1"));
    assert!(blocks["0/1/1"].contains("access-class MGMT in"));
}

#[test]
fn fixture_audit_classifies_each_line() {
    let audit = audit_named_device("term-server-01", IOS_SHOW_LINE, &ios_blocks(), "ios");

    assert_eq!(audit.platform, Platform::Ios);
    assert_eq!(audit.summary.total_lines, 3);
    assert_eq!(audit.summary.telnet_count, 2);
    assert_eq!(audit.summary.risk_breakdown[&RiskLevel::Critical], 1);
    assert_eq!(audit.summary.risk_breakdown[&RiskLevel::High], 1);
    assert_eq!(audit.summary.risk_breakdown[&RiskLevel::Low], 1);

    let rendered: Vec<String> = audit.telnet_enabled.iter().map(|a| a.to_string()).collect();
    assert_eq!(rendered, ["0/1/0", "0/1/2"]);

    let port = &audit.configured[&"0/1/0".parse().expect("address")];
    assert!(port.is_console_server_port);
    assert_eq!(port.detection_method, DetectionMethod::TransportInputTelnet);
    assert_eq!(port.risk_level, RiskLevel::Critical);

    let ssh_line = &audit.configured[&"0/1/1".parse().expect("address")];
    assert_eq!(ssh_line.detection_method, DetectionMethod::TransportInputSshOnly);
    assert_eq!(ssh_line.risk_level, RiskLevel::Low);

    let implicit = &audit.configured[&"0/1/2".parse().expect("address")];
    assert_eq!(implicit.detection_method, DetectionMethod::ImplicitDefault);
    assert!(implicit.telnet_implicit);
    assert_eq!(implicit.risk_level, RiskLevel::High);
}

#[test]
fn fixture_audit_reports_unconfigured_channels() {
    let audit = audit_named_device("term-server-01", IOS_SHOW_LINE, &ios_blocks(), "ios");

    let issue = audit
        .compliance_issues
        .iter()
        .find(|issue| issue.starts_with("line group 0/1"))
        .expect("coverage issue");
    assert!(issue.contains("missing configuration"));
    assert!(issue.contains("3,4"));
    assert!(issue.contains("22"));

    // Every configured channel is also discovered, so nothing is flagged
    // as configured-but-absent.
    assert!(
        !audit
            .compliance_issues
            .iter()
            .any(|issue| issue.contains("configured but absent"))
    );
}

#[test]
fn fixture_audit_orders_recommendations_by_severity() {
    let audit = audit_named_device("term-server-01", IOS_SHOW_LINE, &ios_blocks(), "ios");

    assert_eq!(audit.recommendations.len(), 3);
    assert!(audit.recommendations[0].starts_with("CRITICAL"));
    assert!(audit.recommendations[0].contains("0/1/0"));
    assert!(audit.recommendations[1].starts_with("HIGH"));
    assert!(audit.recommendations[1].contains("0/1/2"));
    assert!(audit.recommendations[2].contains("transport input directive"));
    assert!(audit.recommendations[2].contains("0/1/2"));
}

#[test]
fn fixture_audit_serializes_with_string_address_keys() {
    let audit = audit_named_device("term-server-01", IOS_SHOW_LINE, &ios_blocks(), "ios");
    let json = audit.to_json_pretty().expect("encode");
    let value: serde_json::Value = serde_json::from_str(&json).expect("decode");

    assert_eq!(value["hostname"], "term-server-01");
    assert_eq!(value["platform"], "ios");
    assert_eq!(value["configured"]["0/1/0"]["risk_level"], "CRITICAL");
    assert_eq!(
        value["configured"]["0/1/0"]["detection_method"],
        "transport_input_telnet"
    );
    assert_eq!(value["telnet_enabled"][0], "0/1/0");
}

#[test]
fn fixture_audit_snapshot_matches_expected_postures() {
    let audit = audit_named_device("term-server-01", IOS_SHOW_LINE, &ios_blocks(), "ios");

    let actual = audit
        .configured
        .values()
        .map(|config| {
            let risk = serde_json::to_value(config.risk_level).expect("risk");
            let method = serde_json::to_value(config.detection_method).expect("method");
            format!(
                "{}|{}|{}|{}",
                config.address,
                risk.as_str().expect("risk string"),
                method.as_str().expect("method string"),
                config.telnet_enabled
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(actual, EXPECTED_SNAPSHOT.trim());
}

#[test]
fn fixture_fleet_report_merges_both_platforms() {
    let collector = FleetAuditCollector::new();
    collector
        .record(
            "term-server-01",
            audit_named_device("term-server-01", IOS_SHOW_LINE, &ios_blocks(), "ios"),
        )
        .expect("record ios device");
    collector
        .record(
            "xr-edge-02",
            audit_named_device("xr-edge-02", IOSXR_SHOW_LINE, &BTreeMap::new(), "iosxr"),
        )
        .expect("record xr device");

    let report = collector.report().expect("report");
    assert_eq!(report.device_count, 2);
    assert_eq!(report.telnet_enabled_devices, ["term-server-01"]);
    assert_eq!(report.summary.total_lines, 3);
    assert_eq!(report.summary.telnet_count, 2);
    assert!(report.support_data.detailed_configs.contains_key("xr-edge-02"));
    assert!(
        report
            .recommendations
            .iter()
            .any(|rec| rec.starts_with("term-server-01: CRITICAL"))
    );
}

#[test]
fn fleet_report_schema_is_well_formed_json() {
    let schema = audit_report_schema_json().expect("schema");
    let value: serde_json::Value = serde_json::from_str(&schema).expect("decode");
    assert!(value.is_object());
}
