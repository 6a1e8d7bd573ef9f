use super::*;
use std::collections::{BTreeMap, BTreeSet};

use super::security::{self, SecurityInputs};

/// How a line authenticates incoming sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoginMethod {
    /// No login required (`no login`, or no directive at all).
    #[default]
    None,
    /// Local user database (`login local`).
    Local,
    /// Line password (`login`).
    Password,
    /// Named AAA list (`login authentication NAME`).
    AuthenticationList,
}

/// Structured configuration of one console/async line.
///
/// Parsed directive-by-directive from the block between `!` delimiters,
/// order-independent with last-write-wins for repeated directives. The
/// security fields (`telnet_*`, `risk_level`, `detection_method`,
/// `is_console_server_port`) are derived once by [`LineConfig::parse`] and
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineConfig {
    pub address: LineAddress,
    pub login_method: LoginMethod,
    /// AAA list name when `login_method` is `authentication_list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_list: Option<String>,
    /// `false` once `no exec` is seen.
    pub exec_enabled: bool,
    /// `exec-timeout` arguments, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    /// Protocols listed by `transport input`, lowercased. Empty when the
    /// directive is absent.
    pub transport_input: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_preferred: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotary: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flowcontrol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocommand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape_char: Option<String>,
    /// The configuration block verbatim, in order; unrecognized directives
    /// live only here.
    pub raw_lines: Vec<String>,

    // Derived security posture, computed at construction.
    pub telnet_explicit: bool,
    pub telnet_implicit: bool,
    pub telnet_enabled: bool,
    pub risk_level: RiskLevel,
    pub detection_method: DetectionMethod,
    pub is_console_server_port: bool,
}

impl LineConfig {
    /// Parses one line's configuration block and computes its security
    /// posture. Total: unrecognized directives are preserved in `raw_lines`
    /// without affecting structured fields.
    pub fn parse(address: LineAddress, block: &str) -> LineConfig {
        let mut login_method = LoginMethod::None;
        let mut authentication_list = None;
        let mut exec_enabled = true;
        let mut timeout = None;
        let mut transport_input: BTreeSet<String> = BTreeSet::new();
        let mut transport_preferred = None;
        let mut access_class = None;
        let mut rotary = None;
        let mut speed = None;
        let mut flowcontrol = None;
        let mut autocommand = None;
        let mut privilege_level = None;
        let mut escape_char = None;
        let mut raw_lines = Vec::new();

        for raw in block.lines() {
            raw_lines.push(raw.to_string());
            let line = raw.trim();
            if line.is_empty() || line == "!" {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };

            match keyword.to_ascii_lowercase().as_str() {
                // Block header, not a directive.
                "line" => {}
                "no" => match tokens.next().map(str::to_ascii_lowercase).as_deref() {
                    Some("login") => {
                        login_method = LoginMethod::None;
                        authentication_list = None;
                    }
                    Some("exec") => exec_enabled = false,
                    _ => trace!("unrecognized negated directive on {}: {}", address, line),
                },
                "login" => match tokens.next().map(str::to_ascii_lowercase).as_deref() {
                    None => login_method = LoginMethod::Password,
                    Some("local") => login_method = LoginMethod::Local,
                    Some("authentication") => {
                        login_method = LoginMethod::AuthenticationList;
                        authentication_list = tokens.next().map(str::to_string);
                    }
                    Some(_) => trace!("unrecognized login form on {}: {}", address, line),
                },
                "exec-timeout" => {
                    timeout = rest_of(line, keyword);
                }
                "transport" => match tokens.next().map(str::to_ascii_lowercase).as_deref() {
                    Some("input") => {
                        // Replaces any earlier directive wholesale.
                        transport_input = tokens.map(str::to_ascii_lowercase).collect();
                    }
                    Some("preferred") => {
                        transport_preferred = tokens.next().map(str::to_ascii_lowercase);
                    }
                    _ => trace!("unrecognized transport directive on {}: {}", address, line),
                },
                "access-class" => {
                    access_class = tokens.next().map(str::to_string);
                }
                "rotary" => {
                    rotary = tokens.next().and_then(|t| t.parse().ok());
                }
                "speed" => {
                    speed = tokens.next().and_then(|t| t.parse().ok());
                }
                "flowcontrol" => {
                    flowcontrol = rest_of(line, keyword).map(|v| v.to_ascii_lowercase());
                }
                "autocommand" => {
                    autocommand = rest_of(line, keyword);
                }
                "privilege" => {
                    if tokens.next().map(str::to_ascii_lowercase).as_deref() == Some("level") {
                        privilege_level = tokens.next().and_then(|t| t.parse().ok());
                    }
                }
                "escape-character" => {
                    escape_char = rest_of(line, keyword);
                }
                _ => trace!("preserving unrecognized directive on {}: {}", address, line),
            }
        }

        let posture = security::classify(SecurityInputs {
            transport_input: &transport_input,
            transport_preferred: transport_preferred.as_deref(),
            login_method,
            access_class: access_class.as_deref(),
            exec_enabled,
            rotary,
        });

        LineConfig {
            address,
            login_method,
            authentication_list,
            exec_enabled,
            timeout,
            transport_input,
            transport_preferred,
            access_class,
            rotary,
            speed,
            flowcontrol,
            autocommand,
            privilege_level,
            escape_char,
            raw_lines,
            telnet_explicit: posture.telnet_explicit,
            telnet_implicit: posture.telnet_implicit,
            telnet_enabled: posture.telnet_enabled,
            risk_level: posture.risk_level,
            detection_method: posture.detection_method,
            is_console_server_port: posture.is_console_server_port,
        }
    }
}

/// Everything after the leading keyword, verbatim.
fn rest_of(line: &str, keyword: &str) -> Option<String> {
    let rest = line[keyword.len()..].trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Header of a per-line configuration section in a running config.
static LINE_BLOCK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^line\s+(?:tty\s+)?(\d+/\d+/\d+)\s*$").expect("line header regex"));

/// Splits a running configuration into per-line blocks keyed by address
/// text, the way a `section line` style extraction would.
///
/// Each block runs from its `line x/y/z` header to the next `!` delimiter or
/// the next `line` header. Addresses are kept as raw text here; validation
/// happens when the blocks are audited.
pub fn extract_line_blocks(running_config: &str) -> BTreeMap<String, String> {
    let mut blocks = BTreeMap::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in running_config.lines() {
        let trimmed = line.trim();
        if let Some(caps) = LINE_BLOCK_HEADER.captures(trimmed) {
            if let Some((address, body)) = current.take() {
                blocks.insert(address, body.join("\n"));
            }
            current = Some((caps[1].to_string(), vec![line.to_string()]));
        } else if trimmed == "!" {
            if let Some((address, mut body)) = current.take() {
                body.push(line.to_string());
                blocks.insert(address, body.join("\n"));
            }
        } else if let Some((_, body)) = &mut current {
            body.push(line.to_string());
        }
    }

    if let Some((address, body)) = current.take() {
        blocks.insert(address, body.join("\n"));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> LineAddress {
        s.parse().expect("valid address")
    }

    #[test]
    fn telnet_with_plain_login_parses_per_contract() {
        let config = LineConfig::parse(
            addr("0/1/5"),
            "line 0/1/5\n transport input telnet\n login\n!",
        );
        assert_eq!(config.address.to_string(), "0/1/5");
        assert_eq!(config.login_method, LoginMethod::Password);
        assert!(config.telnet_enabled);
        assert_eq!(config.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn directives_populate_structured_fields() {
        let block = "\
line 1/0/3
 login authentication CONSOLE
 exec-timeout 10 0
 transport input ssh
 transport preferred none
 access-class MGMT in
 rotary 7
 speed 115200
 flowcontrol hardware
 autocommand telnet 10.0.0.1 2003
 privilege level 15
 escape-character 3
!";
        let config = LineConfig::parse(addr("1/0/3"), block);
        assert_eq!(config.login_method, LoginMethod::AuthenticationList);
        assert_eq!(config.authentication_list.as_deref(), Some("CONSOLE"));
        assert_eq!(config.timeout.as_deref(), Some("10 0"));
        assert!(config.transport_input.contains("ssh"));
        assert_eq!(config.transport_preferred.as_deref(), Some("none"));
        assert_eq!(config.access_class.as_deref(), Some("MGMT"));
        assert_eq!(config.rotary, Some(7));
        assert_eq!(config.speed, Some(115_200));
        assert_eq!(config.flowcontrol.as_deref(), Some("hardware"));
        assert_eq!(config.autocommand.as_deref(), Some("telnet 10.0.0.1 2003"));
        assert_eq!(config.privilege_level, Some(15));
        assert_eq!(config.escape_char.as_deref(), Some("3"));
    }

    #[test]
    fn no_exec_and_no_login_are_recognized() {
        let config = LineConfig::parse(addr("0/1/0"), " no exec\n rotary 1\n no login\n");
        assert!(!config.exec_enabled);
        assert_eq!(config.login_method, LoginMethod::None);
        assert!(config.is_console_server_port);
    }

    #[test]
    fn repeated_directives_are_last_write_wins() {
        let block = " transport input telnet\n transport input ssh\n login\n login local\n";
        let config = LineConfig::parse(addr("0/0/1"), block);
        assert_eq!(
            config.transport_input.iter().collect::<Vec<_>>(),
            vec!["ssh"]
        );
        assert_eq!(config.login_method, LoginMethod::Local);
    }

    #[test]
    fn unrecognized_directives_only_reach_raw_lines() {
        let block = " transport input ssh\n monitor\n databits 8\n";
        let config = LineConfig::parse(addr("0/0/2"), block);
        assert!(config.raw_lines.iter().any(|l| l.trim() == "monitor"));
        assert!(config.raw_lines.iter().any(|l| l.trim() == "databits 8"));
        assert_eq!(config.transport_input.len(), 1);
    }

    #[test]
    fn raw_lines_preserve_the_block_verbatim() {
        let block = "line 0/1/5\n transport input telnet\n login\n!";
        let config = LineConfig::parse(addr("0/1/5"), block);
        assert_eq!(config.raw_lines.join("\n"), block);
    }

    #[test]
    fn transport_input_accepts_multiple_protocols() {
        let config = LineConfig::parse(addr("0/0/3"), " transport input ssh telnet\n login\n");
        assert!(config.transport_input.contains("ssh"));
        assert!(config.transport_input.contains("telnet"));
        assert_eq!(config.detection_method, DetectionMethod::TransportInputSshTelnet);
    }

    #[test]
    fn extract_line_blocks_splits_on_bang_delimiters() {
        let running = "\
hostname edge-router-01
!
line con 0
 login local
!
line 0/1/5
 transport input telnet
 login
!
line 0/1/6
 no exec
 rotary 1
!
end
";
        let blocks = extract_line_blocks(running);
        assert_eq!(blocks.len(), 2);
        assert!(blocks["0/1/5"].contains("transport input telnet"));
        assert!(blocks["0/1/6"].contains("rotary 1"));
        assert!(!blocks["0/1/5"].contains("rotary"));
    }
}
