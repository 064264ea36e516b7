//! Marker configuration: the literal syntax of the date, section and tag markers.
//!
//! The JSON shape matches what the editor front end reads and writes:
//!
//! ```json
//! {
//!   "date":    { "linePrefix": ":::date {DD/MM/YYYY}" },
//!   "section": { "startPrefix": "__/@@ {name}", "endLine": "@@/" },
//!   "tags":    { "open": "<{name}>", "close": "<{name}/>" }
//! }
//! ```
//!
//! Missing fields fall back to their defaults so that older or partial
//! configuration files keep loading.

use crate::core::template::{Placeholder, Template};
use crate::domain::model::MarkerClass;
use crate::utils::error::{MarkerError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_single_line, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_LINE: &str = ":::date {DD/MM/YYYY}";
pub const DEFAULT_SECTION_START: &str = "__/@@ {name}";
pub const DEFAULT_SECTION_END: &str = "@@/";
pub const DEFAULT_TAG_OPEN: &str = "<{name}>";
pub const DEFAULT_TAG_CLOSE: &str = "<{name}/>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MarkerConfig {
    pub date: DateMarkers,
    pub section: SectionMarkers,
    pub tags: TagMarkers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateMarkers {
    pub line_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionMarkers {
    pub start_prefix: String,
    pub end_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagMarkers {
    pub open: String,
    pub close: String,
}

impl Default for DateMarkers {
    fn default() -> Self {
        Self {
            line_prefix: DEFAULT_DATE_LINE.to_string(),
        }
    }
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            start_prefix: DEFAULT_SECTION_START.to_string(),
            end_line: DEFAULT_SECTION_END.to_string(),
        }
    }
}

impl Default for TagMarkers {
    fn default() -> Self {
        Self {
            open: DEFAULT_TAG_OPEN.to_string(),
            close: DEFAULT_TAG_CLOSE.to_string(),
        }
    }
}

impl MarkerConfig {
    /// Parses a configuration from an arbitrary JSON value.
    ///
    /// Anything other than a JSON object is rejected as an invalid request.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(MarkerError::invalid_request(
                "marker configuration must be a JSON object",
            ));
        }
        serde_json::from_value(value.clone()).map_err(|e| {
            MarkerError::invalid_request(format!("malformed marker configuration: {}", e))
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }

    /// Raw template text for one marker class.
    pub fn raw(&self, class: MarkerClass) -> &str {
        match class {
            MarkerClass::Date => &self.date.line_prefix,
            MarkerClass::SectionStart => &self.section.start_prefix,
            MarkerClass::SectionEnd => &self.section.end_line,
            MarkerClass::TagOpen => &self.tags.open,
            MarkerClass::TagClose => &self.tags.close,
        }
    }

    /// Structured template for a placeholder-bearing class.
    ///
    /// `section.end` carries no placeholder; asking for its template is a
    /// configuration error.
    pub fn template(&self, class: MarkerClass) -> Result<Template> {
        let placeholder = class.placeholder().ok_or_else(|| {
            MarkerError::config(format!("{} is a literal marker with no template", class))
        })?;
        Template::parse(class, self.raw(class), placeholder)
    }

    fn validate_class(&self, class: MarkerClass) -> Result<()> {
        let raw = self.raw(class);
        validate_single_line(class.config_key(), raw)?;

        match class.placeholder() {
            None => validate_non_empty_string(class.config_key(), raw),
            Some(Placeholder::Date) => self.template(class).map(|_| ()),
            Some(Placeholder::Name) => {
                let template = self.template(class)?;
                let reason = match class {
                    MarkerClass::SectionStart if template.before().is_empty() => {
                        Some("the text before {name} cannot be empty, it would match every line")
                    }
                    MarkerClass::TagOpen | MarkerClass::TagClose if template.is_bare() => {
                        Some("a tag template needs literal text around {name}")
                    }
                    _ => None,
                };
                match reason {
                    Some(reason) => Err(MarkerError::TemplateError {
                        class: class.to_string(),
                        template: raw.to_string(),
                        reason: reason.to_string(),
                    }),
                    None => Ok(()),
                }
            }
        }
    }
}

impl Validate for MarkerConfig {
    fn validate(&self) -> Result<()> {
        MarkerClass::ORDER
            .iter()
            .try_for_each(|class| self.validate_class(*class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_json_shape() {
        let value = serde_json::to_value(MarkerConfig::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "date": {"linePrefix": ":::date {DD/MM/YYYY}"},
                "section": {"startPrefix": "__/@@ {name}", "endLine": "@@/"},
                "tags": {"open": "<{name}>", "close": "<{name}/>"}
            })
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = MarkerConfig::from_value(&json!({
            "date": {"linePrefix": "DATE: {DD/MM/YYYY}"},
            "tags": {"open": "[[{name}]]"}
        }))
        .unwrap();

        assert_eq!(config.date.line_prefix, "DATE: {DD/MM/YYYY}");
        assert_eq!(config.section, SectionMarkers::default());
        assert_eq!(config.tags.open, "[[{name}]]");
        assert_eq!(config.tags.close, DEFAULT_TAG_CLOSE);
    }

    #[test]
    fn test_non_object_is_invalid_request() {
        let err = MarkerConfig::from_value(&json!("not a config")).unwrap_err();
        assert!(matches!(err, MarkerError::InvalidRequest { .. }));
        assert!(MarkerConfig::from_value(&json!(null)).is_err());

        let err = MarkerConfig::from_value(&json!({"date": "DATE: {DD/MM/YYYY}"})).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(MarkerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let mut config = MarkerConfig::default();
        config.tags.close = "</>".to_string();

        let err = config.validate().unwrap_err();
        match err {
            MarkerError::TemplateError { class, .. } => assert_eq!(class, "tag.close"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_section_end_is_rejected() {
        let mut config = MarkerConfig::default();
        config.section.end_line = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bare_templates_are_rejected() {
        let mut config = MarkerConfig::default();
        config.section.start_prefix = "{name}".to_string();
        assert!(config.validate().is_err());

        let mut config = MarkerConfig::default();
        config.tags.open = "{name}".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multi_line_template_is_rejected() {
        let mut config = MarkerConfig::default();
        config.date.line_prefix = ":::date\n{DD/MM/YYYY}".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, MarkerError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_section_end_has_no_template() {
        assert!(MarkerConfig::default()
            .template(MarkerClass::SectionEnd)
            .is_err());
    }
}
