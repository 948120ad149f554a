//! Hexadecimal `#define` extraction over the whole input.

use bstr::ByteSlice;
use regex::bytes::Regex;

/// A preprocessor constant with its digits kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantRecord
{
    pub name: String,
    /// Digit text after the `0x` prefix, never parsed
    pub hex_value: String,
}

/// All constant definitions in `text`, in input order.
pub fn constants<'a>(
    pattern: &'a Regex,
    text: &'a [u8],
) -> impl Iterator<Item = ConstantRecord> + 'a
{
    pattern
        .captures_iter(text)
        .map(|caps| ConstantRecord {
            name: caps["name"]
                .to_str_lossy()
                .into_owned(),
            hex_value: caps["hex"]
                .to_str_lossy()
                .into_owned(),
        })
}
