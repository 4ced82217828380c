//! In-place edits of `server.toml` that leave every unrelated byte alone.
//!
//! The file is hand-authored, so it is never parsed and re-serialized for writing.
//! Instead [`ConfigPatcher`] scans the raw text line by line, tracking which table
//! it is in, and splices a new value into exactly one string field. Indentation,
//! spacing around `=`, quote style, trailing comments and line endings survive.
//!
//! Block tracking resets at every table header. A field is only considered once
//! the scan is inside a `[[mods]]` table whose `type` is `"modrinth"`, and a version
//! field is only patched when it appears *after* the matching `id` line of the same
//! table. Tables with any other source tag are never touched.

use crate::models::server::REGISTRY_SOURCE_TAG;
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;

/// Key holding a declared mod's registry identifier.
pub const ID_KEY: &str = "id";

/// Key holding a declared mod's pinned version id.
pub const VERSION_KEY: &str = "version";

/// Key holding a declared mod's source tag.
pub const TYPE_KEY: &str = "type";

/// Result of a text patch.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The full rewritten text, differing from the input in one value only.
    Patched(String),
    /// No matching table/field; the input should be kept as is.
    NotFound,
}

impl PatchOutcome {
    pub fn is_patched(&self) -> bool {
        matches!(self, PatchOutcome::Patched(_))
    }

    pub fn into_patched(self) -> Option<String> {
        match self {
            PatchOutcome::Patched(text) => Some(text),
            PatchOutcome::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Basic,
    Literal,
}

/// A `key = "value"` line.
#[derive(Debug)]
struct StringField<'a> {
    key: &'a str,
    value: Cow<'a, str>,
    quote: Quote,
    /// Byte range of the quoted token (quotes included) within the line.
    token: Range<usize>,
}

/// State of the `[[mods]]` table currently being scanned.
#[derive(Debug, Default)]
struct ModsBlock {
    registry_managed: bool,
    id_matched: bool,
    /// Absolute byte range of the quoted token to replace, and its quote style.
    candidate: Option<(Range<usize>, Quote)>,
}

impl ModsBlock {
    fn take_match(&mut self) -> Option<(Range<usize>, Quote)> {
        if self.registry_managed {
            self.candidate.take()
        } else {
            None
        }
    }
}

/// Raw-text patcher for `[[mods]]` entries.
#[derive(Debug, Clone)]
pub struct ConfigPatcher {
    /// Any `[table]` or `[[array.of.tables]]` header line
    header_pattern: Regex,

    /// The `[[mods]]` header specifically
    mods_header_pattern: Regex,

    /// `key = "basic"` or `key = 'literal'`, with optional trailing content
    field_pattern: Regex,
}

impl ConfigPatcher {
    pub fn new() -> Self {
        Self {
            header_pattern: Regex::new(r#"^\s*\[\[?\s*[A-Za-z0-9_.\-" ]+\s*\]\]?\s*(?:#.*)?$"#)
                .expect("Invalid header regex"),
            mods_header_pattern: Regex::new(r"^\s*\[\[\s*mods\s*\]\]\s*(?:#.*)?$")
                .expect("Invalid mods header regex"),
            field_pattern: Regex::new(
                r#"^\s*(?P<key>[A-Za-z0-9_\-]+)\s*=\s*(?:"(?P<basic>(?:[^"\\]|\\.)*)"|'(?P<literal>[^']*)')"#,
            )
            .expect("Invalid field regex"),
        }
    }

    /// Rewrites the `version` of the registry-managed `[[mods]]` entry whose `id` is
    /// exactly `identifier`.
    pub fn rewrite_version(&self, text: &str, identifier: &str, new_version: &str) -> PatchOutcome {
        tracing::debug!(
            "Looking for mod with ID '{}' to update version to {}",
            identifier,
            new_version
        );

        let found = self.scan_mods(text, |block, field, token| {
            if field.key == ID_KEY && field.value == identifier {
                block.id_matched = true;
            } else if field.key == VERSION_KEY && block.id_matched && block.candidate.is_none() {
                block.candidate = Some((token, field.quote));
            }
        });

        match found {
            Some((token, quote)) => {
                PatchOutcome::Patched(splice(text, token, quote, new_version))
            }
            None => {
                tracing::debug!("Failed to find version line for mod '{}'", identifier);
                PatchOutcome::NotFound
            }
        }
    }

    /// Rewrites the `id` of the first registry-managed `[[mods]]` entry whose value is
    /// exactly `old_identifier`.
    pub fn rewrite_identifier(
        &self,
        text: &str,
        old_identifier: &str,
        new_identifier: &str,
    ) -> PatchOutcome {
        let found = self.scan_mods(text, |block, field, token| {
            if field.key == ID_KEY && field.value == old_identifier && block.candidate.is_none() {
                block.candidate = Some((token, field.quote));
            }
        });

        match found {
            Some((token, quote)) => {
                tracing::debug!("Renaming ID '{}' to '{}'", old_identifier, new_identifier);
                PatchOutcome::Patched(splice(text, token, quote, new_identifier))
            }
            None => {
                tracing::debug!("No ID line matching '{}'", old_identifier);
                PatchOutcome::NotFound
            }
        }
    }

    /// Walks every `[[mods]]` table, handing each string field to `visit`.
    ///
    /// A candidate recorded by `visit` is only returned once its table has ended and
    /// the table's `type` turned out to be the registry tag, so `type` may appear
    /// before or after the other fields.
    fn scan_mods<F>(&self, text: &str, mut visit: F) -> Option<(Range<usize>, Quote)>
    where
        F: FnMut(&mut ModsBlock, &StringField<'_>, Range<usize>),
    {
        let mut block: Option<ModsBlock> = None;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let content = strip_line_ending(line);

            if self.header_pattern.is_match(content) {
                if let Some(found) = block.as_mut().and_then(ModsBlock::take_match) {
                    return Some(found);
                }
                block = self
                    .mods_header_pattern
                    .is_match(content)
                    .then(ModsBlock::default);
            } else if let Some(current) = block.as_mut() {
                if let Some(field) = self.string_field(content) {
                    if field.key == TYPE_KEY {
                        current.registry_managed = field.value == REGISTRY_SOURCE_TAG;
                    }
                    let token = offset + field.token.start..offset + field.token.end;
                    visit(current, &field, token);
                }
            }

            offset += line.len();
        }

        block.as_mut().and_then(ModsBlock::take_match)
    }

    fn string_field<'a>(&self, line: &'a str) -> Option<StringField<'a>> {
        let captures = self.field_pattern.captures(line)?;
        let key = captures.name("key")?.as_str();

        let (value, quote, inner) = if let Some(basic) = captures.name("basic") {
            (unescape_basic(basic.as_str()), Quote::Basic, basic.range())
        } else {
            let literal = captures.name("literal")?;
            (Cow::Borrowed(literal.as_str()), Quote::Literal, literal.range())
        };

        Some(StringField {
            key,
            value,
            quote,
            token: inner.start - 1..inner.end + 1,
        })
    }
}

impl Default for ConfigPatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Replaces the quoted token at `token` with `new_value` in the same quote style.
fn splice(text: &str, token: Range<usize>, quote: Quote, new_value: &str) -> String {
    let mut out = String::with_capacity(text.len() + new_value.len());
    out.push_str(&text[..token.start]);
    out.push_str(&encode(quote, new_value));
    out.push_str(&text[token.end..]);
    out
}

/// Quotes `value` in the field's existing style, falling back to an escaped basic
/// string when a literal string cannot hold it.
fn encode(quote: Quote, value: &str) -> String {
    if quote == Quote::Literal && !value.contains(['\'', '\n', '\r']) {
        return format!("'{value}'");
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unescape_basic(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
