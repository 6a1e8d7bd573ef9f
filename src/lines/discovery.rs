use super::*;
use std::collections::BTreeMap;

/// Column-header tokens of "show line" output (case-sensitive: data rows
/// carry the uppercase forms `TTY`, `VTY`, ... which must not match).
static HEADER_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(Tty|Line|Typ|Modem|Roty|AccO|AccI|Uses|Noise|Overruns|Int|Speed)\b")
        .expect("header regex")
});

/// Separator / ruling lines.
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-=*]+\s*$").expect("separator regex"));

/// A `start-end` address range pair inside a summary line.
static RANGE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+/\d+/\d+)\s*-\s*(\d+/\d+/\d+)").expect("range regex"));

/// IOS/IOS-XE data row with the address in the trailing "Int" column.
static IOS_ROW_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\*?\s*\d+\s+\d+\s+[A-Z]{3}\b.*\s(\d+/\d+/\d+)\s*$").expect("ios row regex")
});

/// Looser IOS row variant tolerating irregular columns and extra whitespace.
static IOS_ROW_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*?\s*\d+\s.*\s(\d+/\d+/\d+)\s*$").expect("ios loose regex"));

/// IOS-XR data row with the address in the leading "Tty" column.
static XR_ROW_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*?\s*(\d+/\d+/\d+)\s").expect("xr row regex"));

/// IOS-XR named line (`con0`, `aux0`, `vty4`, ...).
static XR_NAMED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*?\s*((con|aux|vty)\d+)\s").expect("xr named regex"));

/// Whole-token address grammar candidate.
static ADDR_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+/\d+/\d+$").expect("address token regex"));

/// Line type token inside a data row.
static TYPE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(TTY|AUX|CON|CTY|VTY)\b").expect("type token regex"));

/// Scans "show line" output into validated, deduplicated line records.
///
/// IOS/IOS-XE rows carry the address in the last ("Int") column; IOS-XR rows
/// carry it in the first ("Tty") column or as a named line (named lines are
/// consumed but dropped at address validation). Range summaries such as
/// `0/0/0-0/0/22, 0/1/0-0/1/22` expand into every address of the inclusive
/// cross-product. Candidates failing the `x/y/z` grammar are dropped and
/// logged, never surfaced as errors. Output is sorted by address.
pub fn discover_lines(show_line_output: &str, platform: Platform) -> Vec<LineRecord> {
    let mut found: BTreeMap<LineAddress, LineRecord> = BTreeMap::new();

    for row in show_line_output.lines() {
        let row = row.trim_end();
        if row.trim().is_empty() {
            continue;
        }
        if SEPARATOR.is_match(row) || HEADER_TOKENS.is_match(row) {
            trace!("skipping header/separator row: {}", row);
            continue;
        }

        if RANGE_PAIR.is_match(row) {
            for caps in RANGE_PAIR.captures_iter(row) {
                match (
                    caps[1].parse::<LineAddress>(),
                    caps[2].parse::<LineAddress>(),
                ) {
                    (Ok(start), Ok(end)) => {
                        for address in expand_range(start, end) {
                            insert_record(
                                &mut found,
                                LineRecord {
                                    address,
                                    line_type: LineType::Tty,
                                    source: LineSource::RangeExpanded,
                                },
                            );
                        }
                    }
                    _ => debug!("dropping malformed range summary '{}'", &caps[0]),
                }
            }
            continue;
        }

        let candidate = match platform {
            Platform::IosXr => scan_iosxr_row(row),
            Platform::Ios | Platform::IosXe => scan_ios_row(row),
        };
        let Some((raw_address, line_type, source)) = candidate else {
            trace!("no line candidate in row: {}", row);
            continue;
        };

        match raw_address.parse::<LineAddress>() {
            Ok(address) => insert_record(
                &mut found,
                LineRecord {
                    address,
                    line_type,
                    source,
                },
            ),
            Err(_) => debug!(
                "dropping candidate '{}' failing the x/y/z address grammar",
                raw_address
            ),
        }
    }

    found.into_values().collect()
}

/// Deduplication: directly parsed rows take precedence over range expansion.
fn insert_record(found: &mut BTreeMap<LineAddress, LineRecord>, record: LineRecord) {
    match found.get(&record.address) {
        Some(existing)
            if existing.source == LineSource::RangeExpanded
                && record.source != LineSource::RangeExpanded =>
        {
            found.insert(record.address, record);
        }
        Some(_) => {}
        None => {
            found.insert(record.address, record);
        }
    }
}

/// Expands an inclusive `start-end` range into individual addresses.
///
/// Only the first and last `(slot, subslot)` group bound their channels to
/// the stated start/end; intermediate groups span the full `0..=22` range.
fn expand_range(start: LineAddress, end: LineAddress) -> Vec<LineAddress> {
    let first = start.group();
    let last = end.group();
    if first > last || (first == last && start.channel > end.channel) {
        debug!("ignoring inverted range {}-{}", start, end);
        return Vec::new();
    }

    let mut expanded = Vec::new();
    for slot in 0..=1u8 {
        for subslot in 0..=1u8 {
            let group = (slot, subslot);
            if group < first || group > last {
                continue;
            }
            let low = if group == first { start.channel } else { 0 };
            let high = if group == last { end.channel } else { MAX_CHANNEL };
            for channel in low..=high {
                expanded.push(LineAddress {
                    slot,
                    subslot,
                    channel,
                });
            }
        }
    }
    expanded
}

fn row_line_type(row: &str) -> LineType {
    TYPE_TOKEN
        .captures(row)
        .map(|caps| LineType::from_token(&caps[1]))
        .unwrap_or(LineType::Unknown)
}

/// IOS/IOS-XE: full pattern, then the loose variant, then the last-token
/// heuristic on rows with more than ten columns.
fn scan_ios_row(row: &str) -> Option<(String, LineType, LineSource)> {
    let line_type = row_line_type(row);
    if let Some(caps) = IOS_ROW_FULL.captures(row) {
        return Some((caps[1].to_string(), line_type, LineSource::Parsed));
    }
    if let Some(caps) = IOS_ROW_LOOSE.captures(row) {
        return Some((caps[1].to_string(), line_type, LineSource::Parsed));
    }

    let tokens: Vec<&str> = row.split_whitespace().collect();
    if tokens.len() > 10 {
        let last = tokens[tokens.len() - 1];
        if ADDR_TOKEN.is_match(last) {
            return Some((last.to_string(), line_type, LineSource::LastToken));
        }
    }
    None
}

/// IOS-XR: address in the first column, or a named line which is consumed
/// here and rejected later by address validation.
fn scan_iosxr_row(row: &str) -> Option<(String, LineType, LineSource)> {
    if let Some(caps) = XR_ROW_FIRST.captures(row) {
        let line_type = match row_line_type(row) {
            LineType::Unknown => LineType::Tty,
            other => other,
        };
        return Some((caps[1].to_string(), line_type, LineSource::Parsed));
    }
    if let Some(caps) = XR_NAMED_LINE.captures(row) {
        return Some((
            caps[1].to_string(),
            LineType::from_token(&caps[2]),
            LineSource::Parsed,
        ));
    }
    None
}
