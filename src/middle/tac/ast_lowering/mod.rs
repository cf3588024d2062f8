//! This module contains all the code related to lowering a parsed program into
//! TAC
//!
//! Lowering is a single recursive walk over the tree. Instructions are handed
//! to an [`IrSink`] the moment they are produced, so emission order is the
//! order of the walk.

use hashbrown::HashSet;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    frontend::{ast, lexer::Span, parser::DEFAULT_MAX_DEPTH},
    middle::tac::{Instruction, names::NameAllocator, sink::IrSink},
};

mod expression;
mod statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoweringOptions {
    /// Deepest statement or expression nesting that will be lowered
    pub max_depth: usize,
}

impl LoweringOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoweringError {
    #[error("nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep { limit: usize, span: Span },
}

impl LoweringError {
    pub fn span(&self) -> Span {
        match self {
            LoweringError::NestingTooDeep { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UndeclaredVariable,
}

/// A problem found while lowering that does not stop generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub name: String,
    pub span: Span,
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            DiagnosticKind::UndeclaredVariable => {
                write!(f, "use of undeclared variable `{}`", self.name)
            }
        }
    }
}

/// Result of lowering a whole program into memory
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Generation {
    pub instructions: Vec<Instruction>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lowers `program` with the default options
pub fn generate(program: &ast::Program) -> Result<Generation, LoweringError> {
    generate_with_options(program, LoweringOptions::default())
}

pub fn generate_with_options(
    program: &ast::Program,
    options: LoweringOptions,
) -> Result<Generation, LoweringError> {
    let mut instructions = Vec::new();
    let diagnostics = generate_into(program, options, &mut instructions)?;

    Ok(Generation {
        instructions,
        diagnostics,
    })
}

/// Lowers every top level statement of `program` in source order into `sink`.
///
/// Temporaries and labels are numbered from scratch on every call. On error
/// the sink may already hold a prefix of the output.
pub fn generate_into<S: IrSink>(
    program: &ast::Program,
    options: LoweringOptions,
    sink: &mut S,
) -> Result<Vec<Diagnostic>, LoweringError> {
    let mut context = LoweringContext::new(sink, options);

    for statement in &program.statements {
        context.lower_statement(statement)?;
    }

    debug!(
        statements = program.statements.len(),
        instructions = context.emitted,
        temporaries = context.names.temps_allocated(),
        labels = context.names.labels_allocated(),
        diagnostics = context.diagnostics.len(),
        "lowered program"
    );

    Ok(context.diagnostics)
}

struct LoweringContext<'sink, S: IrSink> {
    sink: &'sink mut S,
    names: NameAllocator,
    /// Names seen in a declaration so far, in emission order
    declared: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
    emitted: usize,
    depth: usize,
    options: LoweringOptions,
}

impl<'sink, S: IrSink> LoweringContext<'sink, S> {
    fn new(sink: &'sink mut S, options: LoweringOptions) -> Self {
        Self {
            sink,
            names: NameAllocator::new(),
            declared: HashSet::new(),
            diagnostics: Vec::new(),
            emitted: 0,
            depth: 0,
            options,
        }
    }

    fn push_instruction(&mut self, instruction: Instruction) {
        trace!(?instruction, "emit");

        self.emitted += 1;
        self.sink.emit(instruction);
    }

    fn declare(&mut self, name: &ast::Identifier) {
        self.declared.insert(name.name.clone());
    }

    /// Records a diagnostic when `name` has not been declared yet
    fn check_declared(&mut self, name: &ast::Identifier) {
        if self.declared.contains(&name.name) {
            return;
        }

        debug!(name = %name.name, "undeclared variable");

        self.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::UndeclaredVariable,
            name: name.name.clone(),
            span: name.span,
        });
    }

    /// Runs `f` one nesting level deeper, failing once the limit is reached
    fn nested<T>(
        &mut self,
        span: Span,
        f: impl FnOnce(&mut Self) -> Result<T, LoweringError>,
    ) -> Result<T, LoweringError> {
        if self.depth >= self.options.max_depth {
            return Err(LoweringError::NestingTooDeep {
                limit: self.options.max_depth,
                span,
            });
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        result
    }
}
