//! Source buffers for the three editing panes.
//!
//! A session holds exactly one buffer per pane. Buffers are plain strings;
//! the composer decides how they combine into a preview document.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::compose::template::{DEFAULT_MARKUP, DEFAULT_SCRIPT, DEFAULT_STYLE};
use crate::error::{Result, TriptychError};

/// Identifies one of the three editable panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferKind {
    /// The HTML pane.
    Markup,
    /// The CSS pane.
    Style,
    /// The JavaScript pane.
    Script,
}

impl BufferKind {
    /// All pane kinds in pane order.
    pub const ALL: [BufferKind; 3] = [BufferKind::Markup, BufferKind::Style, BufferKind::Script];

    /// Engine-side name for this pane.
    pub fn as_str(&self) -> &'static str {
        match self {
            BufferKind::Markup => "markup",
            BufferKind::Style => "style",
            BufferKind::Script => "script",
        }
    }

    /// Short language tag used in prompts and code fences.
    pub fn language_tag(&self) -> &'static str {
        match self {
            BufferKind::Markup => "html",
            BufferKind::Style => "css",
            BufferKind::Script => "js",
        }
    }

    /// Parses a pane name. Accepts both the pane names and the
    /// language names users actually type.
    pub fn parse(s: &str) -> Result<BufferKind> {
        match s.trim().to_lowercase().as_str() {
            "markup" | "html" => Ok(BufferKind::Markup),
            "style" | "css" => Ok(BufferKind::Style),
            "script" | "js" | "javascript" => Ok(BufferKind::Script),
            other => Err(TriptychError::InvalidTarget {
                target: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BufferKind {
    type Err = TriptychError;

    fn from_str(s: &str) -> Result<BufferKind> {
        BufferKind::parse(s)
    }
}

/// The three source buffers of a session.
///
/// `new()` seeds the starter project so a fresh session previews something
/// visible; `empty()` starts from blank panes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBuffers {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl SourceBuffers {
    /// Creates buffers seeded with the starter templates.
    pub fn new() -> Self {
        SourceBuffers {
            markup: DEFAULT_MARKUP.to_string(),
            style: DEFAULT_STYLE.to_string(),
            script: DEFAULT_SCRIPT.to_string(),
        }
    }

    /// Creates three empty buffers.
    pub fn empty() -> Self {
        SourceBuffers {
            markup: String::new(),
            style: String::new(),
            script: String::new(),
        }
    }

    /// Creates buffers from explicit pane contents.
    pub fn from_parts(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        SourceBuffers {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    /// Returns the contents of one pane.
    pub fn get(&self, kind: BufferKind) -> &str {
        match kind {
            BufferKind::Markup => &self.markup,
            BufferKind::Style => &self.style,
            BufferKind::Script => &self.script,
        }
    }

    /// Replaces the contents of one pane.
    pub fn set(&mut self, kind: BufferKind, text: impl Into<String>) {
        let slot = match kind {
            BufferKind::Markup => &mut self.markup,
            BufferKind::Style => &mut self.style,
            BufferKind::Script => &mut self.script,
        };
        *slot = text.into();
    }

    /// Restores all three panes to the starter templates.
    pub fn reset(&mut self) {
        *self = SourceBuffers::new();
    }

    /// True when every pane is empty.
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.style.is_empty() && self.script.is_empty()
    }
}

impl Default for SourceBuffers {
    fn default() -> Self {
        SourceBuffers::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_pane_and_language_names() {
        assert_eq!(BufferKind::parse("markup").unwrap(), BufferKind::Markup);
        assert_eq!(BufferKind::parse("HTML").unwrap(), BufferKind::Markup);
        assert_eq!(BufferKind::parse("css").unwrap(), BufferKind::Style);
        assert_eq!(BufferKind::parse(" js ").unwrap(), BufferKind::Script);
        assert_eq!(
            BufferKind::parse("javascript").unwrap(),
            BufferKind::Script
        );
        assert!(BufferKind::parse("python").is_err());
    }

    #[test]
    fn test_new_seeds_starter_templates() {
        let buffers = SourceBuffers::new();
        assert!(buffers.markup.contains("<!DOCTYPE html>"));
        assert!(buffers.style.contains(".container"));
        assert!(buffers.script.contains("function greet()"));
        assert!(!buffers.is_empty());
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut buffers = SourceBuffers::empty();
        assert!(buffers.is_empty());

        buffers.set(BufferKind::Style, "body { margin: 0; }");
        assert_eq!(buffers.get(BufferKind::Style), "body { margin: 0; }");
        assert_eq!(buffers.get(BufferKind::Markup), "");

        buffers.reset();
        assert_eq!(buffers, SourceBuffers::new());
    }

    #[test]
    fn test_language_tags() {
        assert_eq!(BufferKind::Markup.language_tag(), "html");
        assert_eq!(BufferKind::Style.language_tag(), "css");
        assert_eq!(BufferKind::Script.language_tag(), "js");
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&BufferKind::Style).unwrap();
        assert_eq!(json, "\"style\"");
        let kind: BufferKind = serde_json::from_str("\"script\"").unwrap();
        assert_eq!(kind, BufferKind::Script);
    }
}
