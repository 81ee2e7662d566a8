//! Line-oriented model of a git config file.
//!
//! Only `[includeIf "gitdir:..."]` headers and the `path = ...` line directly
//! after them are interpreted; every other line is kept verbatim.

use std::path::Path;

use ghid_core::{read_text_if_exists, write_text_atomic, Result};

pub const MANAGED_MARKER: &str = "# managed by gh-identity";

const HEADER_PREFIX: &str = "[includeIf \"gitdir:";
const HEADER_SUFFIX: &str = "\"]";
const PATH_INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitConfigLine {
    Plain(String),
    IncludeIfHeader {
        dir: String,
        managed: bool,
        raw: String,
    },
    PathRef {
        value: String,
        raw: String,
    },
}

impl GitConfigLine {
    pub fn raw(&self) -> &str {
        match self {
            Self::Plain(raw) | Self::IncludeIfHeader { raw, .. } | Self::PathRef { raw, .. } => raw,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Plain(raw) if raw.trim().is_empty())
    }

    /// Marker-tagged header for `dir`, which must already end with `/`.
    pub fn managed_header(dir: &str) -> Self {
        Self::IncludeIfHeader {
            dir: dir.to_string(),
            managed: true,
            raw: format!("{} {MANAGED_MARKER}", render_header(dir)),
        }
    }

    pub fn path_ref(value: &str) -> Self {
        Self::PathRef {
            value: value.to_string(),
            raw: format!("{PATH_INDENT}path = {}", quote_config_value(value)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfigDocument {
    lines: Vec<GitConfigLine>,
}

impl GitConfigDocument {
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();
        for raw in content.lines() {
            let after_header = matches!(lines.last(), Some(GitConfigLine::IncludeIfHeader { .. }));
            lines.push(classify_line(raw, after_header));
        }
        Self { lines }
    }

    /// Missing file parses as an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(read_text_if_exists(path)?
            .map(|content| Self::parse(&content))
            .unwrap_or_default())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_text_atomic(path, &self.render())
    }

    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut rendered = self
            .lines
            .iter()
            .map(GitConfigLine::raw)
            .collect::<Vec<_>>()
            .join("\n");
        rendered.push('\n');
        rendered
    }

    pub fn lines(&self) -> &[GitConfigLine] {
        &self.lines
    }

    pub(crate) fn lines_mut(&mut self) -> &mut Vec<GitConfigLine> {
        &mut self.lines
    }

    pub fn managed_dirs(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                GitConfigLine::IncludeIfHeader {
                    dir, managed: true, ..
                } => Some(dir.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn trim_trailing_blank_lines(&mut self) {
        while self.lines.last().is_some_and(GitConfigLine::is_blank) {
            self.lines.pop();
        }
    }
}

fn classify_line(raw: &str, after_header: bool) -> GitConfigLine {
    let trimmed = raw.trim();
    if let Some((dir, managed)) = parse_header(trimmed) {
        return GitConfigLine::IncludeIfHeader {
            dir,
            managed,
            raw: raw.to_string(),
        };
    }
    if after_header {
        if let Some(value) = parse_path_value(trimmed) {
            return GitConfigLine::PathRef {
                value,
                raw: raw.to_string(),
            };
        }
    }
    GitConfigLine::Plain(raw.to_string())
}

/// Matches a complete trimmed line, with or without the trailing marker.
fn parse_header(trimmed: &str) -> Option<(String, bool)> {
    let (bare, managed) = match trimmed.strip_suffix(MANAGED_MARKER) {
        Some(rest) if rest.ends_with(char::is_whitespace) => (rest.trim_end(), true),
        Some(_) => return None,
        None => (trimmed, false),
    };
    let escaped = bare.strip_prefix(HEADER_PREFIX)?.strip_suffix(HEADER_SUFFIX)?;
    let dir = unescape_subsection(escaped)?;
    if dir.is_empty() {
        return None;
    }
    Some((dir, managed))
}

fn parse_path_value(trimmed: &str) -> Option<String> {
    let rest = trimmed.strip_prefix("path")?.trim_start();
    let value = rest.strip_prefix('=')?.trim();
    Some(unquote_config_value(value))
}

pub(crate) fn render_header(dir: &str) -> String {
    format!("{HEADER_PREFIX}{}{HEADER_SUFFIX}", escape_subsection(dir))
}

fn escape_subsection(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape_subsection(value: &str) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push(chars.next()?),
            '"' => return None,
            other => out.push(other),
        }
    }
    Some(out)
}

/// Quotes a git config value when it would otherwise be misread.
pub fn quote_config_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value
            .chars()
            .any(|ch| matches!(ch, '#' | ';' | '"' | '\\' | '\n' | '\t' | '\r'));
    if !needs_quotes {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => {}
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn unquote_config_value(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
