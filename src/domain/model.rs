use crate::core::template::Placeholder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five marker classes, in the order the engine applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerClass {
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "section.start")]
    SectionStart,
    #[serde(rename = "section.end")]
    SectionEnd,
    #[serde(rename = "tag.open")]
    TagOpen,
    #[serde(rename = "tag.close")]
    TagClose,
}

impl MarkerClass {
    /// Migration order. Each stage sees the output of the stages before it,
    /// so reordering this list changes results when syntaxes collide.
    pub const ORDER: [MarkerClass; 5] = [
        MarkerClass::Date,
        MarkerClass::SectionStart,
        MarkerClass::SectionEnd,
        MarkerClass::TagOpen,
        MarkerClass::TagClose,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MarkerClass::Date => "date",
            MarkerClass::SectionStart => "section.start",
            MarkerClass::SectionEnd => "section.end",
            MarkerClass::TagOpen => "tag.open",
            MarkerClass::TagClose => "tag.close",
        }
    }

    /// Path of the field holding this class in the persisted JSON.
    pub fn config_key(&self) -> &'static str {
        match self {
            MarkerClass::Date => "date.linePrefix",
            MarkerClass::SectionStart => "section.startPrefix",
            MarkerClass::SectionEnd => "section.endLine",
            MarkerClass::TagOpen => "tags.open",
            MarkerClass::TagClose => "tags.close",
        }
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            MarkerClass::Date => Some(Placeholder::Date),
            MarkerClass::SectionEnd => None,
            MarkerClass::SectionStart | MarkerClass::TagOpen | MarkerClass::TagClose => {
                Some(Placeholder::Name)
            }
        }
    }

    /// Line-anchored classes match whole lines; tags match anywhere.
    pub fn is_line_anchored(&self) -> bool {
        !matches!(self, MarkerClass::TagOpen | MarkerClass::TagClose)
    }
}

impl fmt::Display for MarkerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a requested project name onto a safe document identifier.
///
/// Anything other than ASCII letters, digits, `_`, `-` and space becomes `_`;
/// surrounding spaces are trimmed. Returns `None` when nothing usable is left.
pub fn sanitize_document_name(name: &str) -> Option<String> {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = safe.trim();
    if safe.is_empty() {
        None
    } else {
        Some(safe.to_string())
    }
}

/// One document's planned rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRewrite {
    pub name: String,
    pub original: String,
    pub migrated: String,
}

impl DocumentRewrite {
    pub fn is_changed(&self) -> bool {
        self.original != self.migrated
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Documents written back, in corpus order. Empty for a dry run.
    pub migrated: Vec<String>,
    /// Documents whose text differs after migration.
    pub changed: Vec<String>,
    pub dry_run: bool,
}
