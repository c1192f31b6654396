use lazy_static::lazy_static;
use regex::Regex;

use crate::error::GenError;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").unwrap();
}

const RUST_KEYWORDS: [&str; 51] = [
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen",
    "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
    "priv", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while",
];

/// Converts `snake_case` to `CamelCase`, one dot-separated segment at a time.
///
/// Every `_`-separated word gets its first character upper-cased; runs of
/// underscores collapse, so `a__b` and `a_b` both give `AB`. A segment with
/// nothing but separators in it is an error.
pub fn camelize(input: &str) -> Result<String, GenError> {
    let mut parts = Vec::new();

    for part in input.split('.') {
        let mut segment = String::with_capacity(part.len());
        for word in part.split('_') {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                segment.extend(first.to_uppercase());
                segment.push_str(chars.as_str());
            }
        }
        if segment.is_empty() {
            return Err(GenError::EmptyIdentifier(input.to_string()));
        }
        parts.push(segment);
    }

    Ok(parts.join("."))
}

/// Converts `CamelCase` to `snake_case`.
///
/// Lower-cases everything and adds an underscore before any upper-case
/// character that is not the first, so acronyms split letter by letter.
pub fn underscore(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, c) in input.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Last `.`-separated segment of a qualified name.
pub fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Re-indents a comment block: drops one trailing newline, then emits every
/// line behind `prefix` with at most one leading space removed.
pub fn reformat_comment(text: &str, prefix: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.strip_suffix('\n')
        .unwrap_or(text)
        .split('\n')
        .map(|line| format!("{}{}", prefix, line.strip_prefix(' ').unwrap_or(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// [`reformat_comment`] for rustdoc. Code blocks are tagged `text` so the
/// crate including the generated file never runs them as doctests: fences
/// without a language (or marked `rust`) are retagged, and indented blocks
/// are turned into fenced ones. Blank lines carry no trailing space.
pub fn doc_comment(text: &str, prefix: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut fenced = false;
    let mut indented = false;
    let mut after_blank = true;

    for raw in text.strip_suffix('\n').unwrap_or(text).split('\n') {
        let line = raw.strip_prefix(' ').unwrap_or(raw);
        let trimmed = line.trim_start();

        if indented && !is_indented_code(line) {
            lines.push("```".to_string());
            indented = false;
        }

        if fenced {
            if trimmed.starts_with("```") {
                fenced = false;
            }
            lines.push(line.to_string());
        } else if let Some(info) = trimmed.strip_prefix("```") {
            fenced = true;
            match info.trim() {
                "" | "rust" => lines.push("```text".to_string()),
                _ => lines.push(trimmed.to_string()),
            }
        } else if indented {
            lines.push(dedent_code(line).to_string());
        } else if after_blank && is_indented_code(line) {
            lines.push("```text".to_string());
            lines.push(dedent_code(line).to_string());
            indented = true;
        } else {
            lines.push(line.to_string());
        }

        after_blank = line.trim().is_empty();
    }
    if fenced || indented {
        lines.push("```".to_string());
    }

    lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_indented_code(line: &str) -> bool {
    (line.starts_with("    ") || line.starts_with('\t')) && !line.trim().is_empty()
}

fn dedent_code(line: &str) -> &str {
    line.strip_prefix("    ")
        .or_else(|| line.strip_prefix('\t'))
        .unwrap_or(line)
}

pub fn validate_identifier(name: &str) -> Result<(), GenError> {
    if name.is_empty() {
        return Err(GenError::EmptyIdentifier(name.to_string()));
    }
    if !IDENTIFIER.is_match(name) {
        return Err(GenError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Checks a dotted name segment by segment. A single leading `.` (descriptor
/// form) is accepted.
pub fn validate_full_name(name: &str) -> Result<(), GenError> {
    let trimmed = name.strip_prefix('.').unwrap_or(name);
    if trimmed.is_empty() {
        return Err(GenError::EmptyIdentifier(name.to_string()));
    }
    for segment in trimmed.split('.') {
        if segment.is_empty() || !IDENTIFIER.is_match(segment) {
            return Err(GenError::InvalidIdentifier(name.to_string()));
        }
    }
    Ok(())
}

/// Escapes Rust reserved keywords by suffixing with an underscore.
pub fn escape_rust_keyword(s: &str) -> String {
    if RUST_KEYWORDS.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

/// Raw identifier form for path segments, matching how `prost-build` names
/// modules. `self`, `super`, `crate` and `Self` cannot be raw and get a `_`.
pub fn raw_rust_ident(s: &str) -> String {
    match s {
        "self" | "super" | "crate" | "Self" => format!("{}_", s),
        _ if RUST_KEYWORDS.contains(&s) => format!("r#{}", s),
        _ => s.to_string(),
    }
}

pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{:?}", text))
}
