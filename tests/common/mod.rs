#![allow(dead_code)]

use calcc::{
    Generation, Instruction, compile_to_tac,
    frontend::SourceFile,
    middle::tac::pretty_print::render_plain,
};

pub fn compile(source: &str) -> Generation {
    compile_to_tac(&SourceFile::memory(source)).unwrap()
}

/// Plain text IR, one entry per instruction
pub fn lines(source: &str) -> Vec<String> {
    compile(source).instructions.iter().map(render_plain).collect()
}

pub fn instructions(source: &str) -> Vec<Instruction> {
    compile(source).instructions
}
