//! Pattern builder: turns an (old, new) template pair of one marker class
//! into a matcher for the old syntax and a rewriter producing the new one.

use crate::config::markers::MarkerConfig;
use crate::core::template::{Placeholder, Template};
use crate::domain::model::MarkerClass;
use crate::utils::error::{MarkerError, Result};
use regex::{Captures, NoExpand, Regex};
use std::borrow::Cow;

/// Strict `DD/MM/YYYY`, ASCII digits only.
const DATE_SHAPE: &str = r"[0-9]{2}/[0-9]{2}/[0-9]{4}";

/// Characters a tag name may contain: no whitespace and none of `< > /`,
/// so an opening-tag pattern never consumes a closing tag.
const TAG_NAME: &str = r"([^\s<>/]+?)";

/// Multi-line anchors with CRLF awareness: `^`/`$` match at `\n` and `\r\n`
/// boundaries and `.` never crosses either.
const LINE_FLAGS: &str = "(?mR)";

#[derive(Debug, Clone)]
enum Rewrite {
    /// Re-locates the date inside the matched line and renders it into the new template.
    Date { token: Regex, new: Template },
    /// Renders capture group 1 into the new template.
    Payload(Template),
    /// Replaces the whole match with a fixed string.
    Literal(String),
}

/// Matcher/rewriter pair for one marker class.
#[derive(Debug, Clone)]
pub struct MarkerRule {
    class: MarkerClass,
    matcher: Regex,
    rewrite: Rewrite,
}

impl MarkerRule {
    pub fn compile(class: MarkerClass, old: &MarkerConfig, new: &MarkerConfig) -> Result<Self> {
        let (pattern, rewrite) = match class {
            MarkerClass::Date => {
                let old_t = old.template(class)?;
                let pattern = format!(
                    "^{}{}{}$",
                    regex::escape(old_t.before()),
                    DATE_SHAPE,
                    regex::escape(old_t.after())
                );
                let token = build_regex(class, old.raw(class), DATE_SHAPE)?;
                (
                    pattern,
                    Rewrite::Date {
                        token,
                        new: new.template(class)?,
                    },
                )
            }
            MarkerClass::SectionStart => {
                // Only the literal prefix identifies the line; the rest of the
                // line, old suffix included, is the payload.
                let old_t = old.template(class)?;
                let pattern = format!("^{}(.+)$", regex::escape(old_t.before()));
                (pattern, Rewrite::Payload(new.template(class)?))
            }
            MarkerClass::SectionEnd => {
                let pattern = format!("^{}$", regex::escape(old.raw(class)));
                (pattern, Rewrite::Literal(new.raw(class).to_string()))
            }
            MarkerClass::TagOpen | MarkerClass::TagClose => {
                let old_t = old.template(class)?;
                let pattern = format!(
                    "{}{}{}",
                    regex::escape(old_t.before()),
                    TAG_NAME,
                    regex::escape(old_t.after())
                );
                (pattern, Rewrite::Payload(new.template(class)?))
            }
        };

        let flags = if class.is_line_anchored() { LINE_FLAGS } else { "" };
        let matcher = build_regex(class, old.raw(class), &format!("{}{}", flags, pattern))?;
        Ok(Self {
            class,
            matcher,
            rewrite,
        })
    }

    pub fn class(&self) -> MarkerClass {
        self.class
    }

    pub fn count_matches(&self, text: &str) -> usize {
        self.matcher.find_iter(text).count()
    }

    /// Rewrites every old-syntax occurrence in `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.rewrite {
            Rewrite::Literal(replacement) => {
                self.matcher.replace_all(text, NoExpand(replacement.as_str()))
            }
            Rewrite::Payload(new) => self
                .matcher
                .replace_all(text, |caps: &Captures| new.render(&caps[1])),
            Rewrite::Date { token, new } => self.matcher.replace_all(text, |caps: &Captures| {
                let line = &caps[0];
                let payload = match token.find(line) {
                    Some(m) => m.as_str(),
                    None => {
                        tracing::warn!(
                            "No date found in marker line '{}', keeping placeholder",
                            line
                        );
                        Placeholder::Date.token()
                    }
                };
                new.render(payload)
            }),
        }
    }
}

fn build_regex(class: MarkerClass, template: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| MarkerError::TemplateError {
        class: class.to_string(),
        template: template.to_string(),
        reason: format!("cannot build matcher: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(class: MarkerClass, old: &MarkerConfig, new: &MarkerConfig) -> MarkerRule {
        MarkerRule::compile(class, old, new).unwrap()
    }

    #[test]
    fn test_date_rewrite_keeps_value() {
        let old = MarkerConfig::default();
        let mut new = MarkerConfig::default();
        new.date.line_prefix = "DATE: {DD/MM/YYYY}".to_string();

        let r = rule(MarkerClass::Date, &old, &new);
        assert_eq!(r.apply(":::date 05/03/2024"), "DATE: 05/03/2024");
        assert_eq!(
            r.apply("intro\n:::date 05/03/2024\n:::date 06/03/2024\n"),
            "intro\nDATE: 05/03/2024\nDATE: 06/03/2024\n"
        );
    }

    #[test]
    fn test_date_requires_whole_line_and_strict_shape() {
        let old = MarkerConfig::default();
        let mut new = MarkerConfig::default();
        new.date.line_prefix = "@ {DD/MM/YYYY}".to_string();

        let r = rule(MarkerClass::Date, &old, &new);
        assert_eq!(r.apply("see :::date 05/03/2024"), "see :::date 05/03/2024");
        assert_eq!(r.apply(":::date 05/03/2024 late"), ":::date 05/03/2024 late");
        assert_eq!(r.apply(":::date 5/3/2024"), ":::date 5/3/2024");
        assert_eq!(r.apply(":::date 05-03-2024"), ":::date 05-03-2024");
    }

    #[test]
    fn test_date_handles_crlf_lines() {
        let old = MarkerConfig::default();
        let mut new = MarkerConfig::default();
        new.date.line_prefix = "DATE: {DD/MM/YYYY}".to_string();

        let r = rule(MarkerClass::Date, &old, &new);
        assert_eq!(r.apply(":::date 05/03/2024\r\nx"), "DATE: 05/03/2024\r\nx");
    }

    #[test]
    fn test_date_template_with_suffix() {
        let mut old = MarkerConfig::default();
        old.date.line_prefix = "[{DD/MM/YYYY}]".to_string();
        let mut new = MarkerConfig::default();
        new.date.line_prefix = "== {DD/MM/YYYY} ==".to_string();

        let r = rule(MarkerClass::Date, &old, &new);
        assert_eq!(r.apply("[31/12/1999]"), "== 31/12/1999 ==");
    }

    #[test]
    fn test_regex_meta_characters_match_literally() {
        let mut old = MarkerConfig::default();
        old.date.line_prefix = "(.*) {DD/MM/YYYY}".to_string();
        let new = MarkerConfig::default();

        let r = rule(MarkerClass::Date, &old, &new);
        assert_eq!(r.apply("(.*) 01/02/2003"), ":::date 01/02/2003");
        assert_eq!(r.apply("xyz 01/02/2003"), "xyz 01/02/2003");
    }

    #[test]
    fn test_section_start_carries_rest_of_line() {
        let old = MarkerConfig::default();
        let mut new = MarkerConfig::default();
        new.section.start_prefix = "### {name}".to_string();

        let r = rule(MarkerClass::SectionStart, &old, &new);
        assert_eq!(r.apply("__/@@ Plan"), "### Plan");
        assert_eq!(r.apply("__/@@ Plan urgent ops"), "### Plan urgent ops");
        assert_eq!(r.apply("  __/@@ Plan"), "  __/@@ Plan");
        // nothing after the prefix: no name to carry
        assert_eq!(r.apply("__/@@ "), "__/@@ ");
    }

    #[test]
    fn test_section_start_old_suffix_stays_in_payload() {
        let mut old = MarkerConfig::default();
        old.section.start_prefix = "<< {name} >>".to_string();
        let mut new = MarkerConfig::default();
        new.section.start_prefix = "## {name}".to_string();

        let r = rule(MarkerClass::SectionStart, &old, &new);
        assert_eq!(r.apply("<< Plan >>"), "## Plan >>");
    }

    #[test]
    fn test_section_end_is_literal_whole_line() {
        let old = MarkerConfig::default();
        let mut new = MarkerConfig::default();
        new.section.end_line = "$0 end".to_string();

        let r = rule(MarkerClass::SectionEnd, &old, &new);
        assert_eq!(r.apply("a\n@@/\nb"), "a\n$0 end\nb");
        assert_eq!(r.apply("@@/ trailing"), "@@/ trailing");
    }

    #[test]
    fn test_tags_match_anywhere_and_independently() {
        let old = MarkerConfig::default();
        let mut new = MarkerConfig::default();
        new.tags.open = "[[{name}]]".to_string();

        let r = rule(MarkerClass::TagOpen, &old, &new);
        assert_eq!(r.apply("a <x> b <y>\n<z>"), "a [[x]] b [[y]]\n[[z]]");
    }

    #[test]
    fn test_line_markers_ignore_mid_line_text_but_tags_do_not() {
        let config = MarkerConfig::default();
        let mut new = MarkerConfig::default();
        new.section.end_line = "---".to_string();
        new.tags.close = "[[/{name}]]".to_string();

        let end = rule(MarkerClass::SectionEnd, &config, &new);
        assert_eq!(end.apply("text @@/"), "text @@/");
        assert_eq!(end.apply("text\n@@/"), "text\n---");

        let close = rule(MarkerClass::TagClose, &config, &new);
        assert_eq!(close.apply("text <a/>"), "text [[/a]]");
    }

    #[test]
    fn test_open_tag_does_not_swallow_close_tag() {
        let old = MarkerConfig::default();
        let mut new = MarkerConfig::default();
        new.tags.open = "[[{name}]]".to_string();

        let r = rule(MarkerClass::TagOpen, &old, &new);
        assert_eq!(r.apply("<note>hello<note/>"), "[[note]]hello<note/>");
    }

    #[test]
    fn test_missing_placeholder_fails_compilation() {
        let mut old = MarkerConfig::default();
        old.tags.open = "<>".to_string();
        let new = MarkerConfig::default();

        let err = MarkerRule::compile(MarkerClass::TagOpen, &old, &new).unwrap_err();
        assert!(matches!(err, MarkerError::TemplateError { .. }));

        // the new side is checked too
        let err = MarkerRule::compile(MarkerClass::TagOpen, &new, &old).unwrap_err();
        assert!(matches!(err, MarkerError::TemplateError { .. }));
    }

    #[test]
    fn test_count_matches() {
        let config = MarkerConfig::default();
        let r = rule(MarkerClass::TagClose, &config, &config);
        assert_eq!(r.count_matches("<a/> <b/> <c>"), 2);
    }
}
