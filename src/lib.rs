//! Front end and three-address code generator for the calc scripting
//! language.
//!
//! Source text is tokenized by [`frontend::lexer`], parsed into the tree in
//! [`frontend::ast`] and lowered into the flat, jump based instruction list in
//! [`middle::tac`].

use itertools::Itertools;
use thiserror::Error;

use crate::{
    frontend::{SourceFile, lexer::Span, parser::Parser},
    middle::tac::{
        ast_lowering::{self, LoweringError},
        pretty_print::render_plain,
    },
};

pub mod frontend;
pub mod index;
pub mod middle;

pub use crate::middle::tac::{
    Instruction,
    ast_lowering::{Diagnostic, DiagnosticKind, Generation, LoweringOptions, generate},
    sink::{IrSink, TextSink},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] frontend::parser::SyntaxError),
    #[error(transparent)]
    Lowering(#[from] LoweringError),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Syntax(error) => error.span(),
            CompileError::Lowering(error) => error.span(),
        }
    }
}

/// Parses and lowers `source` with the default nesting limit
pub fn compile_to_tac(source: &SourceFile) -> Result<Generation, CompileError> {
    let program = Parser::parse_program(source)?;
    Ok(ast_lowering::generate(&program)?)
}

/// Plain text IR for `source`, one instruction per line
pub fn compile_to_text(source: &SourceFile) -> Result<String, CompileError> {
    let generation = compile_to_tac(source)?;

    Ok(generation.instructions.iter().map(render_plain).join("\n"))
}
