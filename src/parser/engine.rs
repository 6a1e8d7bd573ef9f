use super::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// One strategy in the ordered parsing chain.
///
/// A tier either produces data or declines by returning `None`; no error
/// crosses a tier boundary. The final tier never declines.
trait ParseTier: Send + Sync {
    fn attempt(
        &self,
        command: &str,
        platform: Platform,
        raw_output: &str,
    ) -> Option<(Map<String, Value>, ParserUsed)>;
}

/// Schema-aware parsing via the pluggable [`StructuredParser`] capability.
struct StructuredTier {
    parser: Arc<dyn StructuredParser>,
}

impl ParseTier for StructuredTier {
    fn attempt(
        &self,
        command: &str,
        platform: Platform,
        raw_output: &str,
    ) -> Option<(Map<String, Value>, ParserUsed)> {
        match self.parser.parse(command, platform, raw_output) {
            Ok(data) => Some((data, ParserUsed::Structured)),
            Err(SchemaError::Empty) => {
                debug!("structured parser reports empty output for '{}'", command);
                let mut data = Map::new();
                data.insert("status".to_string(), Value::String("empty".to_string()));
                data.insert(
                    "raw_output".to_string(),
                    Value::String(raw_output.to_string()),
                );
                Some((data, ParserUsed::Structured))
            }
            Err(SchemaError::MissingKey(key)) => {
                debug!(
                    "structured schema for '{}' missing key '{}', attempting partial extraction",
                    command, key
                );
                structured::extract_partial(raw_output)
                    .map(|data| (data, ParserUsed::StructuredPartial))
            }
            Err(err) => {
                debug!("structured tier declined for '{}': {}", command, err);
                None
            }
        }
    }
}

/// Command-specific regex extractors.
struct PatternTier;

impl ParseTier for PatternTier {
    fn attempt(
        &self,
        command: &str,
        _platform: Platform,
        raw_output: &str,
    ) -> Option<(Map<String, Value>, ParserUsed)> {
        let data = match CommandKind::classify(command) {
            CommandKind::Version => patterns::extract_version(raw_output),
            CommandKind::InterfaceBrief => patterns::extract_interface_brief(raw_output),
            CommandKind::BgpSummary => patterns::extract_bgp_summary(raw_output),
            CommandKind::OspfNeighbors => patterns::extract_ospf_neighbors(raw_output),
            CommandKind::ShowLine | CommandKind::Other => None,
        };
        data.map(|data| (data, ParserUsed::TextPattern))
    }
}

/// Generic tabular fallback; never declines.
struct TabularTier;

impl ParseTier for TabularTier {
    fn attempt(
        &self,
        _command: &str,
        _platform: Platform,
        raw_output: &str,
    ) -> Option<(Map<String, Value>, ParserUsed)> {
        Some((tabular::generic_tabular(raw_output), ParserUsed::Raw))
    }
}

/// The tiered command-output parsing engine.
///
/// Holds an ordered chain of strategies, richest first. The optional
/// structured capability is checked once here at construction; when absent
/// the chain starts at the text-pattern tier.
pub struct CommandParser {
    tiers: Vec<Box<dyn ParseTier>>,
    has_structured: bool,
}

impl CommandParser {
    /// Builds an engine without the structured capability.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Builds an engine with a pluggable structured parser as its first tier.
    pub fn with_structured(parser: Arc<dyn StructuredParser>) -> Self {
        Self::build(Some(parser))
    }

    fn build(structured: Option<Arc<dyn StructuredParser>>) -> Self {
        let has_structured = structured.is_some();
        let mut tiers: Vec<Box<dyn ParseTier>> = Vec::new();
        if let Some(parser) = structured {
            tiers.push(Box::new(StructuredTier { parser }));
        }
        tiers.push(Box::new(PatternTier));
        tiers.push(Box::new(TabularTier));
        Self {
            tiers,
            has_structured,
        }
    }

    /// Whether the structured capability is present.
    pub fn has_structured(&self) -> bool {
        self.has_structured
    }

    /// Parses one command's output, degrading through the tier chain.
    ///
    /// Total over all inputs: the returned [`ParseResult`] has
    /// `success == true` unless the command text itself is blank, and no
    /// error or panic ever reaches the caller. A panic escaping the chain
    /// is converted into an `error_fallback` result carrying the raw text
    /// and message.
    pub fn parse(&self, command: &str, raw_output: &str, platform: &str) -> ParseResult {
        let started = Instant::now();

        if command.trim().is_empty() {
            warn!("refusing to parse blank command text");
            return ParseResult {
                command: command.to_string(),
                success: false,
                parsed_data: Map::new(),
                raw_output: raw_output.to_string(),
                parser_used: ParserUsed::ErrorFallback,
                error: Some("command text is blank".to_string()),
                parsing_time: started.elapsed().as_secs_f64(),
            };
        }

        let platform = Platform::normalize(platform);
        let resolved = resolve_command(command, platform);

        let attempt =
            panic::catch_unwind(AssertUnwindSafe(|| {
                self.run_chain(&resolved, platform, raw_output)
            }));

        match attempt {
            Ok((parsed_data, parser_used)) => ParseResult {
                command: command.to_string(),
                success: true,
                parsed_data,
                raw_output: raw_output.to_string(),
                parser_used,
                error: None,
                parsing_time: started.elapsed().as_secs_f64(),
            },
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("parser chain panicked for '{}': {}", resolved, message);
                let mut parsed_data = Map::new();
                parsed_data.insert(
                    "raw_output".to_string(),
                    Value::String(raw_output.to_string()),
                );
                parsed_data.insert("error".to_string(), Value::String(message.clone()));
                ParseResult {
                    command: command.to_string(),
                    success: true,
                    parsed_data,
                    raw_output: raw_output.to_string(),
                    parser_used: ParserUsed::ErrorFallback,
                    error: Some(message),
                    parsing_time: started.elapsed().as_secs_f64(),
                }
            }
        }
    }

    fn run_chain(
        &self,
        command: &str,
        platform: Platform,
        raw_output: &str,
    ) -> (Map<String, Value>, ParserUsed) {
        for tier in &self.tiers {
            if let Some((data, used)) = tier.attempt(command, platform, raw_output) {
                return (data, used);
            }
        }
        // The tabular tier never declines, so the chain cannot fall through.
        (tabular::generic_tabular(raw_output), ParserUsed::Raw)
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "parser panicked".to_string()
    }
}
