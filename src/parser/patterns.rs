use super::*;

// "show version" extractors.
static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Version\s+([^,\s]+)").expect("version regex"));
static HOSTNAME_UPTIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\S+)\s+uptime is\s+(.+?)\s*$").expect("uptime regex"));
static MODEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^cisco\s+([\w/().+-]+)\s.*\b(?:processor|chassis)\b").expect("model regex")
});
static SERIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Processor board ID\s+(\S+)").expect("serial regex"));

// "show ip interface brief" data row: interface, address, OK?, method,
// status (may be multi-word, e.g. "administratively down"), protocol.
static INTERFACE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^([A-Za-z][\w/.:-]*)\s+(\d{1,3}(?:\.\d{1,3}){3}|unassigned)\s+(\S+)\s+(\S+)\s+(.+?)\s+(up|down)\s*$",
    )
    .expect("interface row regex")
});

// "show bgp summary" header facts and neighbor rows.
static BGP_IDENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"BGP router identifier (\d{1,3}(?:\.\d{1,3}){3}), local AS number (\d+)")
        .expect("bgp identity regex")
});
static BGP_NEIGHBOR_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(\d{1,3}(?:\.\d{1,3}){3})\s+(\d+)\s+(\d+)\s+\d+\s+\d+\s+\d+\s+\d+\s+\d+\s+(\S+)\s+(\S+)\s*$",
    )
    .expect("bgp neighbor regex")
});

// "show ip ospf neighbor" data row.
static OSPF_NEIGHBOR_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(\d{1,3}(?:\.\d{1,3}){3})\s+(\d+)\s+(\S+)\s+(\S+)\s+(\d{1,3}(?:\.\d{1,3}){3})\s+(\S+)\s*$",
    )
    .expect("ospf neighbor regex")
});

/// Extracts `{version, hostname, uptime, model, serial_number}` from
/// "show version" output. Declines when no field matches.
pub(super) fn extract_version(raw_output: &str) -> Option<Map<String, Value>> {
    let mut data = Map::new();

    if let Some(caps) = VERSION.captures(raw_output) {
        data.insert("version".to_string(), Value::String(caps[1].to_string()));
    }
    if let Some(caps) = HOSTNAME_UPTIME.captures(raw_output) {
        data.insert("hostname".to_string(), Value::String(caps[1].to_string()));
        data.insert("uptime".to_string(), Value::String(caps[2].to_string()));
    }
    if let Some(caps) = MODEL.captures(raw_output) {
        data.insert("model".to_string(), Value::String(caps[1].to_string()));
    }
    if let Some(caps) = SERIAL.captures(raw_output) {
        data.insert(
            "serial_number".to_string(),
            Value::String(caps[1].to_string()),
        );
    }

    if data.is_empty() { None } else { Some(data) }
}

/// Extracts interface rows from "show ip interface brief" output.
pub(super) fn extract_interface_brief(raw_output: &str) -> Option<Map<String, Value>> {
    let interfaces: Vec<Value> = INTERFACE_ROW
        .captures_iter(raw_output)
        .filter(|caps| !caps[1].eq_ignore_ascii_case("interface"))
        .map(|caps| {
            let mut row = Map::new();
            row.insert("interface".to_string(), Value::String(caps[1].to_string()));
            row.insert("ip_address".to_string(), Value::String(caps[2].to_string()));
            row.insert("ok".to_string(), Value::String(caps[3].to_string()));
            row.insert("method".to_string(), Value::String(caps[4].to_string()));
            row.insert("status".to_string(), Value::String(caps[5].to_string()));
            row.insert("protocol".to_string(), Value::String(caps[6].to_string()));
            Value::Object(row)
        })
        .collect();

    if interfaces.is_empty() {
        return None;
    }
    let mut data = Map::new();
    data.insert(
        "interface_count".to_string(),
        Value::Number(interfaces.len().into()),
    );
    data.insert("interfaces".to_string(), Value::Array(interfaces));
    Some(data)
}

/// Extracts router identity and neighbor rows from "show bgp summary" output.
pub(super) fn extract_bgp_summary(raw_output: &str) -> Option<Map<String, Value>> {
    let mut data = Map::new();

    if let Some(caps) = BGP_IDENTITY.captures(raw_output) {
        data.insert("router_id".to_string(), Value::String(caps[1].to_string()));
        data.insert("local_as".to_string(), Value::String(caps[2].to_string()));
    }

    let neighbors: Vec<Value> = BGP_NEIGHBOR_ROW
        .captures_iter(raw_output)
        .map(|caps| {
            let mut row = Map::new();
            row.insert("neighbor".to_string(), Value::String(caps[1].to_string()));
            row.insert("version".to_string(), Value::String(caps[2].to_string()));
            row.insert("remote_as".to_string(), Value::String(caps[3].to_string()));
            row.insert("up_down".to_string(), Value::String(caps[4].to_string()));
            row.insert(
                "state_pfxrcd".to_string(),
                Value::String(caps[5].to_string()),
            );
            Value::Object(row)
        })
        .collect();
    if !neighbors.is_empty() {
        data.insert(
            "neighbor_count".to_string(),
            Value::Number(neighbors.len().into()),
        );
        data.insert("neighbors".to_string(), Value::Array(neighbors));
    }

    if data.is_empty() { None } else { Some(data) }
}

/// Extracts neighbor rows from "show ip ospf neighbor" output.
pub(super) fn extract_ospf_neighbors(raw_output: &str) -> Option<Map<String, Value>> {
    let neighbors: Vec<Value> = OSPF_NEIGHBOR_ROW
        .captures_iter(raw_output)
        .map(|caps| {
            let mut row = Map::new();
            row.insert(
                "neighbor_id".to_string(),
                Value::String(caps[1].to_string()),
            );
            row.insert("priority".to_string(), Value::String(caps[2].to_string()));
            row.insert("state".to_string(), Value::String(caps[3].to_string()));
            row.insert("dead_time".to_string(), Value::String(caps[4].to_string()));
            row.insert("address".to_string(), Value::String(caps[5].to_string()));
            row.insert("interface".to_string(), Value::String(caps[6].to_string()));
            Value::Object(row)
        })
        .collect();

    if neighbors.is_empty() {
        return None;
    }
    let mut data = Map::new();
    data.insert(
        "neighbor_count".to_string(),
        Value::Number(neighbors.len().into()),
    );
    data.insert("neighbors".to_string(), Value::Array(neighbors));
    Some(data)
}
