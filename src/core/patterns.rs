//! Pattern library: named sub-patterns, placeholder expansion, and the
//! compiled pattern set shared by every scanning pass.
//!
//! Templates reference sub-patterns as `{NAME}` tokens (for example
//! `{ALNUM}`); expansion happens once, before compilation. Unknown tokens
//! and regex repetitions such as `{2,3}` pass through untouched.
//!
//! All patterns run over raw bytes with Unicode disabled, so headers in any
//! single-byte encoding are scanned without decoding. They are compiled
//! multi-line and CRLF-aware: `^`/`$` anchor at line boundaries of either
//! ending style.

use indexmap::IndexMap;
use regex::bytes::{Regex, RegexBuilder};

use crate::core::error::ExtractError;

/// Identifier run: letters, digits, underscore.
pub const ALNUM: &str = r"[A-Za-z0-9_]+";

/// Return-type token run, reluctant so it stops before the calling
/// convention keyword.
pub const RET: &str = r"[A-Za-z0-9_ \t*&]+?";

/// Argument type tokens, reluctant so the trailing identifier is left for
/// the name capture.
pub const ARG: &str = r"[A-Za-z0-9_][A-Za-z0-9_ \t*&]*?";

/// Everything up to (excluding) the next `)`.
pub const TO_RPAREN: &str = r"[^)]*";

/// Everything up to (excluding) the next `,`.
pub const TO_COMMA: &str = r"[^,]*";

const PROTOTYPE: &str = r"^[ \t]*(?:{LINKAGE})\s+(?P<ret>{RET})\s*(?:{CALLCONV})\s+(?P<name>{ALNUM})\s*\((?P<args>{TO_RPAREN})\)";

const ARGUMENT: &str = r"\s*(?P<type>{ARG}[\s*&]+)(?P<name>{ALNUM})\s*(?:,|\z)";

const CONSTANT: &str = r"^[ \t]*#[ \t]*define[ \t]+(?P<name>{ALNUM})[ \t]+0[xX](?P<hex>{ALNUM})";

const EMITTED_DECLARATION: &str = r"^[ \t]*GLDEFINE\(\s*(?P<name>{ALNUM})";

const EMITTED_METHOD: &str = r"^[ \t]*DEF_GLMETHOD\({TO_COMMA},{TO_COMMA},\s*(?P<name>{ALNUM})";

const EMITTED_CONSTANT: &str = r"^[ \t]*DEF_GLCONST\(\s*(?P<name>{ALNUM})";

/// Keywords recognized around a prototype's return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords
{
    /// Linkage markers that open a prototype line (`GLAPI`, ...)
    pub linkage: Vec<String>,

    /// Calling-convention markers between return type and name
    pub calling_conventions: Vec<String>,
}

impl Default for Keywords
{
    fn default() -> Self
    {
        Self {
            linkage: vec!["WINGDIAPI".into(), "GLAPI".into(), "GL_APICALL".into()],
            calling_conventions: vec![
                "APIENTRY".into(),
                "GL_APIENTRY".into(),
                "GLAPIENTRY".into(),
            ],
        }
    }
}

impl Keywords
{
    /// Escaped alternation body; an empty list falls back to `fallback`.
    fn alternation(
        words: &[String],
        fallback: &[String],
    ) -> String
    {
        let words: Vec<&String> = words
            .iter()
            .filter(|w| {
                !w.trim()
                    .is_empty()
            })
            .collect();

        if words.is_empty()
        {
            return Self::alternation(fallback, &[]);
        }

        words
            .iter()
            .map(|w| regex::escape(w.trim()))
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Placeholder table used for template expansion.
#[derive(Debug, Clone)]
pub struct Placeholders
{
    table: IndexMap<&'static str, String>,
}

impl Placeholders
{
    /// Base sub-patterns plus the keyword alternations.
    pub fn new(keywords: &Keywords) -> Self
    {
        let defaults = Keywords::default();

        let mut table = IndexMap::new();
        table.insert("ALNUM", ALNUM.to_string());
        table.insert("RET", RET.to_string());
        table.insert("ARG", ARG.to_string());
        table.insert("TO_RPAREN", TO_RPAREN.to_string());
        table.insert("TO_COMMA", TO_COMMA.to_string());
        table.insert(
            "LINKAGE",
            Keywords::alternation(&keywords.linkage, &defaults.linkage),
        );
        table.insert(
            "CALLCONV",
            Keywords::alternation(&keywords.calling_conventions, &defaults.calling_conventions),
        );

        Self { table }
    }

    /// Replace every known `{NAME}` token in `template`.
    pub fn expand(
        &self,
        template: &str,
    ) -> String
    {
        let mut out = String::with_capacity(template.len() * 2);
        let mut rest = template;

        while let Some(open) = rest.find('{')
        {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            // Token body is upper-case letters and underscores up to '}'
            let body_len = after
                .bytes()
                .take_while(|b| b.is_ascii_uppercase() || *b == b'_')
                .count();

            let replacement = match after
                .as_bytes()
                .get(body_len)
            {
                Some(b'}') if body_len > 0 => self
                    .table
                    .get(&after[..body_len]),
                _ => None,
            };

            match replacement
            {
                Some(sub) =>
                {
                    out.push_str(sub);
                    rest = &after[body_len + 1..];
                }
                None =>
                {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Expand then compile a template with the shared builder settings.
    pub fn compile(
        &self,
        template: &str,
    ) -> Result<Regex, ExtractError>
    {
        compile_raw(&self.expand(template))
    }
}

/// Compile an already-expanded pattern over bytes.
fn compile_raw(pattern: &str) -> Result<Regex, ExtractError>
{
    RegexBuilder::new(pattern)
        .unicode(false)
        .multi_line(true)
        .crlf(true)
        .build()
        .map_err(|source| ExtractError::InvalidPattern { pattern: pattern.to_string(), source })
}

/// Every fixed pattern, compiled once and shared read-only by all passes.
#[derive(Debug, Clone)]
pub struct PatternSet
{
    pub prototype: Regex,
    pub argument: Regex,
    pub constant: Regex,
    pub emitted_declaration: Regex,
    pub emitted_method: Regex,
    pub emitted_constant: Regex,
    placeholders: Placeholders,
}

impl PatternSet
{
    pub fn new(keywords: &Keywords) -> Result<Self, ExtractError>
    {
        let placeholders = Placeholders::new(keywords);

        Ok(Self {
            prototype: placeholders.compile(PROTOTYPE)?,
            argument: placeholders.compile(ARGUMENT)?,
            constant: placeholders.compile(CONSTANT)?,
            emitted_declaration: placeholders.compile(EMITTED_DECLARATION)?,
            emitted_method: placeholders.compile(EMITTED_METHOD)?,
            emitted_constant: placeholders.compile(EMITTED_CONSTANT)?,
            placeholders,
        })
    }

    /// Compile a user-supplied template (rule begin/end markers).
    pub fn compile_template(
        &self,
        template: &str,
    ) -> Result<Regex, ExtractError>
    {
        self.placeholders
            .compile(template)
    }
}
