use super::*;
use std::collections::HashMap;

use textfsm_rust::Template;

use crate::error::AuditError;
use crate::platform::normalize_command;

/// A registry of TextFSM templates implementing [`StructuredParser`].
///
/// Template sources are keyed by `(platform, command)`; each source is
/// validated at registration and compiled again per parse so the catalog
/// stays cheap to clone and share across threads. An empty catalog is valid
/// and simply declines every command.
#[derive(Debug, Clone, Default)]
pub struct TextFsmCatalog {
    templates: HashMap<(Platform, String), String>,
}

impl TextFsmCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template source for a command on one platform.
    ///
    /// The source is compiled once here to reject malformed templates early.
    pub fn with_template(
        mut self,
        platform: Platform,
        command: &str,
        source: &str,
    ) -> Result<Self, AuditError> {
        Template::parse_str(source).map_err(|e| AuditError::InvalidTemplate {
            command: command.to_string(),
            reason: e.to_string(),
        })?;
        self.templates
            .insert((platform, normalize_command(command)), source.to_string());
        Ok(self)
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl StructuredParser for TextFsmCatalog {
    fn parse(
        &self,
        command: &str,
        platform: Platform,
        raw_output: &str,
    ) -> Result<Map<String, Value>, SchemaError> {
        let source = self
            .templates
            .get(&(platform, normalize_command(command)))
            .ok_or(SchemaError::NoTemplate)?;

        if raw_output.trim().is_empty() {
            return Err(SchemaError::Empty);
        }

        // Sources were validated at registration; a compile failure here
        // still only makes the tier decline.
        let template =
            Template::parse_str(source).map_err(|e| SchemaError::Failed(e.to_string()))?;
        let mut parser = template.parser();
        let records = parser
            .parse_text_to_dicts(raw_output)
            .map_err(|e| SchemaError::Failed(e.to_string()))?;

        if records.is_empty() {
            return Err(SchemaError::MissingKey(
                "no records matched template".to_string(),
            ));
        }

        let rows = serde_json::to_value(&records).map_err(|e| SchemaError::Failed(e.to_string()))?;
        let mut data = Map::new();
        data.insert("record_count".to_string(), Value::Number(records.len().into()));
        data.insert("records".to_string(), rows);
        Ok(data)
    }
}
