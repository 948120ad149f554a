//! Rule-driven driver over in-memory buffers.
//!
//! The input is scanned with a single outer cursor that only moves forward:
//! rules are applied in stream order, each one repeating region scans until
//! its begin marker stops matching. Constants are scanned over the whole
//! buffer independently of any region.

use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::core::{
    constant::constants,
    dedup::{DedupGate, NameKind, Tally},
    emit::{EmitKinds, Emitter, GuardedSection},
    error::ExtractError,
    patterns::PatternSet,
    prototype::Prototypes,
    rules::{CompiledRule, ExtractionRule, compile_rules},
    scan::next_region,
};

/// Where constant lines go relative to declaration output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ConstantPlacement
{
    /// Constants first, then every rule's declarations
    #[default]
    Before,
    /// Declarations first, constants last
    After,
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport
{
    pub functions: Tally,
    pub constants: Tally,
    /// Rules read from the definition stream
    pub rules: usize,
    /// Regions located across all rules
    pub regions: usize,
}

impl ExtractReport
{
    pub fn accepted(&self) -> usize
    {
        self.functions
            .accepted
            + self
                .constants
                .accepted
    }

    pub fn skipped(&self) -> usize
    {
        self.functions
            .skipped
            + self
                .constants
                .skipped
    }
}

/// Applies rules and the constant scan to one input buffer.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'p>
{
    patterns: &'p PatternSet,
    emitter: Emitter,
    placement: ConstantPlacement,
}

impl<'p> Engine<'p>
{
    pub fn new(
        patterns: &'p PatternSet,
        kinds: EmitKinds,
        placement: ConstantPlacement,
    ) -> Self
    {
        Self { patterns, emitter: Emitter::new(kinds), placement }
    }

    /// Run every enabled pass over `input`, writing accepted lines to `out`.
    ///
    /// All rule markers are compiled before anything is written.
    pub fn run<W: Write>(
        &self,
        input: &[u8],
        rules: &[ExtractionRule],
        gate: &mut DedupGate,
        out: &mut W,
    ) -> Result<ExtractReport, ExtractError>
    {
        let compiled = compile_rules(self.patterns, rules)?;
        self.run_compiled(input, &compiled, gate, out)
    }

    /// Same as [`Engine::run`] with markers compiled by the caller.
    ///
    /// Regions are located for every rule even when no function kind is
    /// enabled, so an unterminated region is always fatal. Output of a rule
    /// is staged and written only once the rule completes, so an
    /// unterminated region leaves nothing from that rule onward.
    #[instrument(skip_all, fields(input_len = input.len(), rules = rules.len()))]
    pub fn run_compiled<W: Write>(
        &self,
        input: &[u8],
        rules: &[CompiledRule<'_>],
        gate: &mut DedupGate,
        out: &mut W,
    ) -> Result<ExtractReport, ExtractError>
    {
        let kinds = self
            .emitter
            .kinds();
        let mut report = ExtractReport { rules: rules.len(), ..ExtractReport::default() };

        if kinds.constant && self.placement == ConstantPlacement::Before
        {
            self.run_constants(input, gate, out)?;
        }

        let mut cursor = 0usize;
        for rule in rules
        {
            report.regions += self.run_rule(input, &mut cursor, rule, gate, out)?;
        }

        if kinds.constant && self.placement == ConstantPlacement::After
        {
            self.run_constants(input, gate, out)?;
        }

        report.functions = gate.functions();
        report.constants = gate.constants();

        info!(
            accepted = report.accepted(),
            skipped = report.skipped(),
            regions = report.regions,
            "extraction finished"
        );

        Ok(report)
    }

    /// Scan every region of one rule; returns how many regions were found.
    fn run_rule<W: Write>(
        &self,
        input: &[u8],
        cursor: &mut usize,
        rule: &CompiledRule<'_>,
        gate: &mut DedupGate,
        out: &mut W,
    ) -> Result<usize, ExtractError>
    {
        let guard = rule
            .rule
            .macro_guard_name
            .as_str();
        let mut staged = Vec::new();
        let mut regions = 0usize;

        while let Some(region) = next_region(input, *cursor, rule)?
        {
            regions += 1;
            let mut section = GuardedSection::new(guard);

            // Regions are still walked for constant-only runs; only the
            // prototype pass is skipped
            if self
                .emitter
                .kinds()
                .any_function()
            {
                let prototypes = Prototypes::new(
                    &self
                        .patterns
                        .prototype,
                    &self
                        .patterns
                        .argument,
                    input,
                    region
                        .span
                        .clone(),
                );

                for record in prototypes
                {
                    if gate.admit(NameKind::Function, &record.name)
                    {
                        section.push(&self.emitter, &record)?;
                    }
                }
            }

            debug!(guard, accepted = section.records(), "region scanned");
            section.finish(&mut staged)?;

            // Zero-width markers at the same spot would never advance
            let stalled = region.resume_at <= *cursor;
            *cursor = region
                .resume_at
                .max(*cursor);
            if stalled
            {
                break;
            }
        }

        debug!(guard, regions, "rule finished");
        out.write_all(&staged)?;

        Ok(regions)
    }

    fn run_constants<W: Write>(
        &self,
        input: &[u8],
        gate: &mut DedupGate,
        out: &mut W,
    ) -> Result<(), ExtractError>
    {
        for record in constants(&self.patterns.constant, input)
        {
            if gate.admit(NameKind::Constant, &record.name)
            {
                self.emitter
                    .constant(out, &record)?;
            }
        }

        Ok(())
    }
}
