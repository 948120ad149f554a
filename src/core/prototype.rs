//! Prototype extraction: walks a region and yields one `FunctionRecord` per
//! matched declaration.

use std::ops::Range;

use bstr::ByteSlice;
use regex::bytes::Regex;
use tracing::{debug, trace};

/// One parameter of a function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgPair
{
    /// Type tokens including any trailing `*`/`&` sigils
    pub type_name: String,
    pub name: String,
}

/// A fully parsed prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord
{
    pub name: String,
    pub return_type: String,
    pub arguments: Vec<ArgPair>,
}

impl FunctionRecord
{
    /// True when the declared return type is exactly `void`.
    pub fn returns_void(&self) -> bool
    {
        self.return_type == "void"
    }
}

fn lossy(bytes: &[u8]) -> String
{
    bytes
        .to_str_lossy()
        .into_owned()
}

/// Split a raw argument list into ordered pairs.
///
/// An empty list, or one whose first type is exactly `void`, yields no
/// pairs. Returns `None` when some parameter cannot be parsed (unnamed,
/// array declarator, function pointer), since a partial list would render
/// a wrapper with the wrong arity.
pub fn parse_arguments(
    argument: &Regex,
    raw: &[u8],
) -> Option<Vec<ArgPair>>
{
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == b"void"
    {
        return Some(Vec::new());
    }

    let mut args = Vec::new();
    let mut covered = 0usize;

    for caps in argument.captures_iter(raw)
    {
        let whole = caps.get_match();

        // Every byte between matches must be whitespace
        if !raw[covered..whole.start()]
            .trim()
            .is_empty()
        {
            return None;
        }
        covered = whole.end();

        args.push(ArgPair {
            type_name: lossy(caps["type"].trim_end()),
            name: lossy(&caps["name"]),
        });
    }

    if !raw[covered..]
        .trim()
        .is_empty()
    {
        return None;
    }

    match args.first()
    {
        Some(first) if first.type_name == "void" => Some(Vec::new()),
        _ => Some(args),
    }
}

/// Iterator over the prototypes inside one region.
///
/// The cursor only moves forward; each yielded record begins after the end
/// of the previous match.
pub struct Prototypes<'a>
{
    prototype: &'a Regex,
    argument: &'a Regex,
    /// Input truncated at the region end, so matches cannot cross it
    haystack: &'a [u8],
    cursor: usize,
}

impl<'a> Prototypes<'a>
{
    pub fn new(
        prototype: &'a Regex,
        argument: &'a Regex,
        text: &'a [u8],
        region: Range<usize>,
    ) -> Self
    {
        Self { prototype, argument, haystack: &text[..region.end], cursor: region.start }
    }
}

impl Iterator for Prototypes<'_>
{
    type Item = FunctionRecord;

    fn next(&mut self) -> Option<Self::Item>
    {
        loop
        {
            if self.cursor > self.haystack.len()
            {
                return None;
            }

            let caps = self
                .prototype
                .captures_at(self.haystack, self.cursor)?;

            // Group 0 always participates in a match
            let whole = caps.get_match();
            self.cursor = whole
                .end()
                .max(self.cursor + 1);

            let name = lossy(&caps["name"]);
            let Some(arguments) = parse_arguments(self.argument, &caps["args"])
            else
            {
                debug!(name = %name, "argument list not understood, prototype skipped");
                continue;
            };

            trace!(name = %name, args = arguments.len(), "prototype matched");

            return Some(FunctionRecord { name, return_type: lossy(caps["ret"].trim()), arguments });
        }
    }
}
