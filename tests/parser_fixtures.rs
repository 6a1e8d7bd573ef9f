use rlinesec::parser::{CommandParser, ParserUsed, parse};

const SHOW_VERSION: &str = include_str!("fixtures/ios_show_version.txt");
const SHOW_IP_INT_BRIEF: &str = include_str!("fixtures/ios_show_ip_int_brief.txt");
const SHOW_BGP_SUMMARY: &str = include_str!("fixtures/ios_show_bgp_summary.txt");
const SHOW_OSPF_NEIGHBOR: &str = include_str!("fixtures/ios_show_ospf_neighbor.txt");
const SHOW_LINE: &str = include_str!("fixtures/ios_show_line.txt");

#[test]
fn fixture_show_version_parses_via_text_patterns() {
    let result = parse("show version", SHOW_VERSION, "ios");

    assert!(result.success);
    assert_eq!(result.parser_used, ParserUsed::TextPattern);
    assert_eq!(result.parsed_data["version"], "15.2(4)M7");
    assert_eq!(result.parsed_data["hostname"], "term-server-01");
    assert_eq!(
        result.parsed_data["uptime"],
        "4 weeks, 2 days, 1 hour, 37 minutes"
    );
    assert_eq!(result.parsed_data["model"], "CISCO2911/K9");
    assert_eq!(result.parsed_data["serial_number"], "FTX1840ABCD");
}

#[test]
fn fixture_interface_brief_parses_all_rows() {
    let result = parse("show ip interface brief", SHOW_IP_INT_BRIEF, "ios");

    assert_eq!(result.parser_used, ParserUsed::TextPattern);
    assert_eq!(result.parsed_data["interface_count"], 4);
    let rows = result.parsed_data["interfaces"].as_array().expect("rows");
    assert_eq!(rows[0]["interface"], "GigabitEthernet0/0");
    assert_eq!(rows[0]["ip_address"], "192.0.2.1");
    assert_eq!(rows[2]["status"], "administratively down");
    assert_eq!(rows[3]["interface"], "Loopback0");
}

#[test]
fn fixture_interface_brief_parses_under_iosxr_spelling() {
    let result = parse("show ipv4 interface brief", SHOW_IP_INT_BRIEF, "iosxr");
    assert_eq!(result.parser_used, ParserUsed::TextPattern);
    assert_eq!(result.parsed_data["interface_count"], 4);
}

#[test]
fn fixture_bgp_summary_parses_identity_and_neighbors() {
    let result = parse("show ip bgp summary", SHOW_BGP_SUMMARY, "ios");

    assert_eq!(result.parser_used, ParserUsed::TextPattern);
    assert_eq!(result.parsed_data["router_id"], "192.0.2.1");
    assert_eq!(result.parsed_data["local_as"], "65001");
    assert_eq!(result.parsed_data["neighbor_count"], 3);
    let rows = result.parsed_data["neighbors"].as_array().expect("rows");
    assert_eq!(rows[0]["neighbor"], "198.51.100.2");
    assert_eq!(rows[0]["state_pfxrcd"], "42");
    assert_eq!(rows[1]["state_pfxrcd"], "Idle");
}

#[test]
fn fixture_ospf_neighbors_parse_with_states() {
    let result = parse("show ip ospf neighbor", SHOW_OSPF_NEIGHBOR, "ios");

    assert_eq!(result.parser_used, ParserUsed::TextPattern);
    assert_eq!(result.parsed_data["neighbor_count"], 3);
    let rows = result.parsed_data["neighbors"].as_array().expect("rows");
    assert_eq!(rows[0]["state"], "FULL/DR");
    assert_eq!(rows[2]["state"], "2WAY/DROTHER");
    assert_eq!(rows[2]["interface"], "Serial0/0/0");
}

#[test]
fn show_line_output_falls_back_to_generic_tabular() {
    let result = parse("show line", SHOW_LINE, "ios");

    assert!(result.success);
    assert_eq!(result.parser_used, ParserUsed::Raw);
    assert_eq!(result.parsed_data["line_count"], 8);
}

#[test]
fn parse_never_fails_on_garbage_or_mismatched_output() {
    let parser = CommandParser::new();
    let cases = [
        ("show version", "% Invalid input detected at '^' marker."),
        ("show ip bgp summary", SHOW_VERSION),
        ("show widgets", "\u{0}\u{1}\u{2} binary noise"),
        ("show clock", ""),
    ];
    for (command, output) in cases {
        let result = parser.parse(command, output, "ios");
        assert!(result.success, "parse failed for '{command}'");
        assert!(result.error.is_none());
    }
}

#[test]
fn blank_command_is_reported_as_invocation_failure() {
    let result = parse("", SHOW_VERSION, "ios");
    assert!(!result.success);
    assert_eq!(result.parser_used, ParserUsed::ErrorFallback);
    assert!(result.error.is_some());
}

#[test]
fn parse_result_serializes_with_snake_case_tier_names() {
    let result = parse("show version", SHOW_VERSION, "ios");
    let json = serde_json::to_value(&result).expect("encode");

    assert_eq!(json["parser_used"], "text_pattern");
    assert_eq!(json["success"], true);
    assert_eq!(json["command"], "show version");
    assert!(json.get("error").is_none());
    assert!(json["parsing_time"].as_f64().expect("time") >= 0.0);
}

#[test]
fn raw_output_is_preserved_verbatim_in_results() {
    let result = parse("show version", SHOW_VERSION, "ios");
    assert_eq!(result.raw_output, SHOW_VERSION);
}
