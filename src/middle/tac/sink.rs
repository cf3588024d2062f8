use std::io::{self, Write};

use crate::middle::tac::{Instruction, pretty_print::render_plain};

/// Append-only destination for generated instructions. Instructions arrive in
/// execution order and must be kept in that order.
pub trait IrSink {
    fn emit(&mut self, instruction: Instruction);
}

impl IrSink for Vec<Instruction> {
    fn emit(&mut self, instruction: Instruction) {
        self.push(instruction);
    }
}

/// Streams the plain text form of each instruction to a writer, one per line.
///
/// The first write failure is kept and every later instruction is dropped;
/// it is reported by [`TextSink::finish`].
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
    written: usize,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
            written: 0,
        }
    }

    /// Number of instructions written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> IrSink for TextSink<W> {
    fn emit(&mut self, instruction: Instruction) {
        if self.error.is_some() {
            return;
        }

        match writeln!(self.writer, "{}", render_plain(&instruction)) {
            Ok(()) => self.written += 1,
            Err(error) => self.error = Some(error),
        }
    }
}
