//! Emission formatter: renders accepted records as macro-invocation lines.
//!
//! ```text
//! GLDEFINE(glFoo,PFNGLFOOPROC)
//! DEF_GLMETHOD(void, 0, glFoo, (GLint)(GLfloat *), (a)(b))
//! DEF_GLCONST(GL_ONE, 0x1)
//! ```
//!
//! The dedup pre-scan re-reads these exact shapes; see `core::dedup`.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::{constant::ConstantRecord, prototype::FunctionRecord};

/// One selectable kind of output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EmitKind
{
    /// `GLDEFINE(name,PFNNAMEPROC)` type declarations
    Declaration,
    /// `DEF_GLMETHOD(...)` wrapper definitions
    Method,
    /// `DEF_GLCONST(name, 0x..)` constants
    Constant,
}

/// Which kinds of lines are written. Defaults to all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitKinds
{
    pub declaration: bool,
    pub method: bool,
    pub constant: bool,
}

impl Default for EmitKinds
{
    fn default() -> Self
    {
        Self { declaration: true, method: true, constant: true }
    }
}

impl EmitKinds
{
    /// Only the listed kinds; an empty list means all.
    pub fn from_list(kinds: &[EmitKind]) -> Self
    {
        if kinds.is_empty()
        {
            return Self::default();
        }

        Self {
            declaration: kinds.contains(&EmitKind::Declaration),
            method: kinds.contains(&EmitKind::Method),
            constant: kinds.contains(&EmitKind::Constant),
        }
    }

    /// True when prototypes produce any output at all.
    pub fn any_function(&self) -> bool
    {
        self.declaration || self.method
    }
}

pub fn declaration_line(name: &str) -> String
{
    format!("GLDEFINE({name},PFN{}PROC)", name.to_ascii_uppercase())
}

pub fn method_line(record: &FunctionRecord) -> String
{
    let flag = if record.returns_void() { 0 } else { 1 };

    let (types, names) = if record
        .arguments
        .is_empty()
    {
        ("()".to_string(), "()".to_string())
    }
    else
    {
        record
            .arguments
            .iter()
            .fold((String::new(), String::new()), |(mut t, mut n), arg| {
                t.push_str(&format!("({})", arg.type_name));
                n.push_str(&format!("({})", arg.name));
                (t, n)
            })
    };

    format!(
        "DEF_GLMETHOD({}, {flag}, {}, {types}, {names})",
        record.return_type, record.name
    )
}

pub fn constant_line(record: &ConstantRecord) -> String
{
    format!("DEF_GLCONST({}, 0x{})", record.name, record.hex_value)
}

/// Writes lines for the enabled kinds.
#[derive(Debug, Clone, Copy)]
pub struct Emitter
{
    kinds: EmitKinds,
}

impl Emitter
{
    pub fn new(kinds: EmitKinds) -> Self
    {
        Self { kinds }
    }

    pub fn kinds(&self) -> EmitKinds
    {
        self.kinds
    }

    pub fn function<W: Write>(
        &self,
        out: &mut W,
        record: &FunctionRecord,
    ) -> io::Result<()>
    {
        if self
            .kinds
            .declaration
        {
            writeln!(out, "{}", declaration_line(&record.name))?;
        }

        if self
            .kinds
            .method
        {
            writeln!(out, "{}", method_line(record))?;
        }

        Ok(())
    }

    pub fn constant<W: Write>(
        &self,
        out: &mut W,
        record: &ConstantRecord,
    ) -> io::Result<()>
    {
        if self
            .kinds
            .constant
        {
            writeln!(out, "{}", constant_line(record))?;
        }

        Ok(())
    }
}

/// Output of one region, framed by `#ifdef`/`#endif` only when non-empty.
#[derive(Debug)]
pub struct GuardedSection<'g>
{
    guard: &'g str,
    body: Vec<u8>,
    records: usize,
}

impl<'g> GuardedSection<'g>
{
    pub fn new(guard: &'g str) -> Self
    {
        Self { guard, body: Vec::new(), records: 0 }
    }

    pub fn push(
        &mut self,
        emitter: &Emitter,
        record: &FunctionRecord,
    ) -> io::Result<()>
    {
        self.records += 1;
        emitter.function(&mut self.body, record)
    }

    pub fn records(&self) -> usize
    {
        self.records
    }

    /// Write the framed section; nothing at all when no record was pushed.
    pub fn finish<W: Write>(
        self,
        out: &mut W,
    ) -> io::Result<()>
    {
        if self.records == 0
        {
            return Ok(());
        }

        writeln!(out, "#ifdef {}", self.guard)?;
        out.write_all(&self.body)?;
        writeln!(out, "#endif")
    }
}
