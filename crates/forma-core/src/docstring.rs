//! # Doc-Comment Parsing
//!
//! Extracts a short description and per-parameter descriptions from the
//! free-text documentation attached to a constructor. Two layouts are
//! understood:
//!
//! ```text
//! Create a weapon based on the role.
//!
//! Args:
//!     role: The role of the hero. Only 'tank' is supported.
//! ```
//!
//! ```text
//! Create a weapon based on the role.
//!
//! # Arguments
//!
//! * `role` - The role of the hero.
//! ```
//!
//! Anything else is ignored. Parsing never fails: text without a recognised
//! section produces a description and no parameters.

/// Result of parsing a doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    /// First line of the comment, if any.
    pub short_description: Option<String>,
    /// `(parameter, description)` pairs in documentation order.
    pub params: Vec<(String, String)>,
}

impl ParsedDoc {
    /// Description of a parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_str())
    }
}

const PARAM_HEADERS: &[&str] = &[
    "args:",
    "arguments:",
    "parameters:",
    "params:",
    "# arguments",
    "# parameters",
];

/// Parse a doc comment.
pub fn parse_doc(doc: &str) -> ParsedDoc {
    let lines: Vec<&str> = doc.lines().collect();
    let mut parsed = ParsedDoc {
        short_description: lines
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .filter(|l| !is_header(l))
            .map(str::to_string),
        params: Vec::new(),
    };

    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();
        if PARAM_HEADERS.contains(&trimmed.to_ascii_lowercase().as_str()) {
            i = parse_section(&lines, i + 1, &mut parsed.params);
        } else {
            i += 1;
        }
    }
    parsed
}

/// Consume one parameter section starting at `start`; returns the index of
/// the first line after it.
fn parse_section(lines: &[&str], start: usize, params: &mut Vec<(String, String)>) -> usize {
    let mut entry_indent: Option<usize> = None;
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if entry_indent.is_some() {
                return i;
            }
            i += 1;
            continue;
        }
        if is_header(trimmed) {
            return i;
        }
        let indent = line.len() - line.trim_start().len();
        match entry_indent {
            Some(base) if indent > base => {
                if let Some((_, desc)) = params.last_mut() {
                    if !desc.is_empty() {
                        desc.push(' ');
                    }
                    desc.push_str(trimmed);
                }
            }
            _ => match parse_entry(trimmed) {
                Some(entry) => {
                    entry_indent = Some(indent);
                    params.push(entry);
                }
                None => return i,
            },
        }
        i += 1;
    }
    i
}

/// Parse `name: desc`, `name (type): desc`, `* `name` - desc` and friends.
fn parse_entry(text: &str) -> Option<(String, String)> {
    let text = text
        .strip_prefix("* ")
        .or_else(|| text.strip_prefix("- "))
        .unwrap_or(text)
        .trim_start();

    let (name, rest) = if let Some(quoted) = text.strip_prefix('`') {
        let end = quoted.find('`')?;
        (&quoted[..end], &quoted[end + 1..])
    } else {
        let end = text
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(text.len());
        (&text[..end], &text[end..])
    };
    if !is_identifier(name) {
        return None;
    }

    let mut rest = rest.trim_start();
    if let Some(typed) = rest.strip_prefix('(') {
        let end = typed.find(')')?;
        rest = typed[end + 1..].trim_start();
    }
    let desc = rest
        .strip_prefix(':')
        .or_else(|| rest.strip_prefix('-'))
        .or_else(|| rest.strip_prefix('\u{2014}'))?;
    Some((name.to_string(), desc.trim().to_string()))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_header(trimmed: &str) -> bool {
    if trimmed.starts_with('#') {
        return true;
    }
    match trimmed.strip_suffix(':') {
        Some(word) => !word.is_empty() && word.chars().all(|c| c.is_alphabetic() || c == ' '),
        None => false,
    }
}
