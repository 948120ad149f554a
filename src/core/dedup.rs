//! Dedup/merge controller: remembers every emitted name and gates new
//! candidates against it.
//!
//! In append mode the sets are rebuilt from the existing artifact by
//! re-matching the emitted macro syntax (`GLDEFINE`, `DEF_GLMETHOD`,
//! `DEF_GLCONST`). Changing how those macros are rendered breaks dedup
//! against artifacts written by older versions.

use bstr::ByteSlice;
use indexmap::IndexSet;
use regex::bytes::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::core::patterns::PatternSet;

/// Which name set a candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind
{
    Function,
    Constant,
}

/// Accepted/skipped counters for one record kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally
{
    pub accepted: usize,
    pub skipped: usize,
}

impl Tally
{
    /// Total candidates seen.
    pub fn seen(&self) -> usize
    {
        self.accepted + self.skipped
    }

    fn record(
        &mut self,
        accepted: bool,
    )
    {
        if accepted
        {
            self.accepted += 1;
        }
        else
        {
            self.skipped += 1;
        }
    }
}

/// Names already present in the artifact lineage. Names are only ever
/// added.
#[derive(Debug, Clone, Default)]
pub struct EmittedNames
{
    functions: IndexSet<String>,
    constants: IndexSet<String>,
}

impl EmittedNames
{
    /// Rebuild the sets from previously generated output.
    pub fn prescan(
        patterns: &PatternSet,
        existing: &[u8],
    ) -> Self
    {
        let mut names = Self::default();

        for re in [&patterns.emitted_declaration, &patterns.emitted_method]
        {
            collect_names(re, existing, &mut names.functions);
        }
        collect_names(&patterns.emitted_constant, existing, &mut names.constants);

        debug!(
            functions = names.len(NameKind::Function),
            constants = names.len(NameKind::Constant),
            "existing output scanned"
        );

        names
    }

    fn set(
        &self,
        kind: NameKind,
    ) -> &IndexSet<String>
    {
        match kind
        {
            NameKind::Function => &self.functions,
            NameKind::Constant => &self.constants,
        }
    }

    pub fn contains(
        &self,
        kind: NameKind,
        name: &str,
    ) -> bool
    {
        self.set(kind)
            .contains(name)
    }

    pub fn len(
        &self,
        kind: NameKind,
    ) -> usize
    {
        self.set(kind)
            .len()
    }

    /// Insert `name`; false if it was already present.
    fn insert(
        &mut self,
        kind: NameKind,
        name: &str,
    ) -> bool
    {
        let set = match kind
        {
            NameKind::Function => &mut self.functions,
            NameKind::Constant => &mut self.constants,
        };

        if set.contains(name)
        {
            return false;
        }

        set.insert(name.to_string())
    }
}

fn collect_names(
    re: &Regex,
    text: &[u8],
    into: &mut IndexSet<String>,
)
{
    for caps in re.captures_iter(text)
    {
        into.insert(
            caps["name"]
                .to_str_lossy()
                .into_owned(),
        );
    }
}

/// Gate every candidate through the name sets and count the outcome.
#[derive(Debug, Clone, Default)]
pub struct DedupGate
{
    names: EmittedNames,
    functions: Tally,
    constants: Tally,
}

impl DedupGate
{
    pub fn new(names: EmittedNames) -> Self
    {
        Self { names, ..Self::default() }
    }

    /// Accept `name` if it has never been emitted, recording it either way.
    pub fn admit(
        &mut self,
        kind: NameKind,
        name: &str,
    ) -> bool
    {
        let accepted = self
            .names
            .insert(kind, name);

        if !accepted
        {
            trace!(name, ?kind, "already emitted, skipping");
        }

        match kind
        {
            NameKind::Function => self
                .functions
                .record(accepted),
            NameKind::Constant => self
                .constants
                .record(accepted),
        }

        accepted
    }

    pub fn functions(&self) -> Tally
    {
        self.functions
    }

    pub fn constants(&self) -> Tally
    {
        self.constants
    }

    pub fn names(&self) -> &EmittedNames
    {
        &self.names
    }
}
