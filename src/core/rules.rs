//! Rule stream: line triples of (guard name, begin pattern, end pattern).
//!
//! A blank line or end of stream terminates the list. A triple cut short
//! by either is an `IncompleteRule` error.

use std::io::BufRead;

use regex::bytes::Regex;
use tracing::debug;

use crate::core::{error::ExtractError, patterns::PatternSet};

/// One scan boundary plus the guard wrapping its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRule
{
    pub macro_guard_name: String,
    pub begin_pattern: String,
    pub end_pattern: String,
}

impl ExtractionRule
{
    pub fn new(
        macro_guard_name: impl Into<String>,
        begin_pattern: impl Into<String>,
        end_pattern: impl Into<String>,
    ) -> Self
    {
        Self {
            macro_guard_name: macro_guard_name.into(),
            begin_pattern: begin_pattern.into(),
            end_pattern: end_pattern.into(),
        }
    }

    /// Expand placeholders in both markers and compile them.
    pub fn compile(
        &self,
        patterns: &PatternSet,
    ) -> Result<CompiledRule<'_>, ExtractError>
    {
        Ok(CompiledRule {
            rule: self,
            begin: patterns.compile_template(&self.begin_pattern)?,
            end: patterns.compile_template(&self.end_pattern)?,
        })
    }
}

/// A rule with its markers ready for scanning.
#[derive(Debug, Clone)]
pub struct CompiledRule<'r>
{
    pub rule: &'r ExtractionRule,
    pub begin: Regex,
    pub end: Regex,
}

/// Compile every rule up front; the first bad marker fails the whole list.
pub fn compile_rules<'r>(
    patterns: &PatternSet,
    rules: &'r [ExtractionRule],
) -> Result<Vec<CompiledRule<'r>>, ExtractError>
{
    rules
        .iter()
        .map(|r| r.compile(patterns))
        .collect()
}

/// Read every rule from a line-oriented stream.
pub fn read_rules<R: BufRead>(reader: R) -> Result<Vec<ExtractionRule>, ExtractError>
{
    let mut rules = Vec::new();
    let mut pending: Vec<String> = Vec::with_capacity(3);
    let mut start_line = 1usize;

    for (idx, line) in reader
        .lines()
        .enumerate()
    {
        let line = line.map_err(|source| ExtractError::ReadRules { line: idx + 1, source })?;
        let line = line.trim_end_matches('\r');

        if line
            .trim()
            .is_empty()
        {
            break;
        }

        if pending.is_empty()
        {
            start_line = idx + 1;
            pending.push(
                line.trim()
                    .to_string(),
            );
        }
        else
        {
            pending.push(line.to_string());
        }

        if pending.len() == 3
        {
            let mut it = pending.drain(..);
            // Three elements are guaranteed by the length check above
            if let (Some(guard), Some(begin), Some(end)) = (it.next(), it.next(), it.next())
            {
                debug!(guard = %guard, line = start_line, "rule read");
                rules.push(ExtractionRule::new(guard, begin, end));
            }
        }
    }

    if !pending.is_empty()
    {
        return Err(ExtractError::IncompleteRule { line: start_line });
    }

    Ok(rules)
}
