use super::*;

/// Keywords marking a line as a probable table header.
static HEADER_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(interface|neighbor|route|address)\b").expect("header regex"));

/// The guaranteed-success fallback tier.
///
/// Splits output into non-blank lines and flags probable header lines via a
/// keyword heuristic. Never declines: any input, including the empty string,
/// yields a `{lines, line_count, potential_headers}` map.
pub(super) fn generic_tabular(raw_output: &str) -> Map<String, Value> {
    let lines: Vec<&str> = raw_output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let potential_headers: Vec<Value> = lines
        .iter()
        .filter(|line| HEADER_HINT.is_match(line))
        .map(|line| Value::String((*line).to_string()))
        .collect();

    let mut data = Map::new();
    data.insert("line_count".to_string(), Value::Number(lines.len().into()));
    data.insert(
        "lines".to_string(),
        Value::Array(
            lines
                .into_iter()
                .map(|line| Value::String(line.to_string()))
                .collect(),
        ),
    );
    data.insert(
        "potential_headers".to_string(),
        Value::Array(potential_headers),
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabular_keeps_non_blank_lines_and_counts_them() {
        let data = generic_tabular("first\n\n  \nsecond\n");
        assert_eq!(data["line_count"], 2);
        assert_eq!(data["lines"].as_array().expect("lines").len(), 2);
    }

    #[test]
    fn tabular_flags_header_lines_by_keyword() {
        let data = generic_tabular("Interface  Status\nGi0/0  up\ntotally unrelated\n");
        let headers = data["potential_headers"].as_array().expect("headers");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0], "Interface  Status");
    }

    #[test]
    fn tabular_never_declines_on_empty_input() {
        let data = generic_tabular("");
        assert_eq!(data["line_count"], 0);
        assert!(data["lines"].as_array().expect("lines").is_empty());
    }
}
