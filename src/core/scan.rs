//! Range scanner: locates the next begin/end bounded region of the input.

use std::ops::Range;

use tracing::trace;

use crate::{
    core::{error::ExtractError, rules::CompiledRule},
    infra::line_index::NewlineIndex,
};

/// A bounded region plus where the outer cursor resumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region
{
    /// Half-open span from just after the begin match to the end match.
    pub span: Range<usize>,

    /// Byte offset just past the end match.
    pub resume_at: usize,
}

/// Find the next region for `rule` at or after `cursor`.
///
/// Returns `Ok(None)` when the begin marker no longer matches; that is the
/// normal way a rule runs out of regions.
///
/// # Errors
///
/// `UnterminatedRegion` when begin matches but end never follows it.
pub fn next_region(
    text: &[u8],
    cursor: usize,
    rule: &CompiledRule<'_>,
) -> Result<Option<Region>, ExtractError>
{
    let Some(begin) = rule
        .begin
        .find_at(text, cursor)
    else
    {
        return Ok(None);
    };

    let after_begin = begin.end();

    let Some(end) = rule
        .end
        .find_at(text, after_begin)
    else
    {
        let line = NewlineIndex::build(text).line_of_byte(begin.start());
        return Err(ExtractError::UnterminatedRegion {
            guard: rule
                .rule
                .macro_guard_name
                .clone(),
            begin: rule
                .rule
                .begin_pattern
                .clone(),
            line,
        });
    };

    trace!(start = after_begin, end = end.start(), "region located");

    Ok(Some(Region { span: after_begin..end.start(), resume_at: end.end() }))
}
