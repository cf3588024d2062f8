use std::io::{self, Write};

use colored::Colorize;

use crate::{frontend::ast::BinaryOperatorClass, middle::tac};

/// Writes one instruction per line, colored when colorization is enabled
pub fn pretty_print_tac(out: &mut impl Write, instructions: &[tac::Instruction]) -> io::Result<()> {
    for instruction in instructions {
        writeln!(out, "{instruction}")?;
    }

    Ok(())
}

/// Textual form of an instruction with any color escapes removed
pub fn render_plain(instruction: &tac::Instruction) -> String {
    strip_ansi_escapes::strip_str(instruction.to_string())
}

impl core::fmt::Display for tac::Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            tac::Instruction::DeclareType { ty, name } => {
                write!(f, "{} {name}", ty.to_string().magenta())
            }
            tac::Instruction::Assign { destination, value } => {
                write!(f, "{destination} {} {value}", "=".white())
            }
            tac::Instruction::Print { operand } => write!(f, "{} {operand}", "print".cyan()),
            tac::Instruction::Label(label) => write!(f, "{} {label}", "label".cyan()),
            tac::Instruction::Goto { destination } => {
                write!(f, "{} {destination}", "go to".cyan())
            }
            tac::Instruction::GotoIfFalse {
                condition,
                destination,
            } => write!(
                f,
                "{} {condition} {} {destination}",
                "if".cyan(),
                "fails, go to".cyan()
            ),
        }
    }
}

impl core::fmt::Display for tac::Rvalue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            tac::Rvalue::Use(operand) => write!(f, "{operand}"),
            tac::Rvalue::Negate(operand) => write!(f, "{}{operand}", "-".white()),
            tac::Rvalue::Binary { operator, lhs, rhs } => {
                let symbol = match operator.class() {
                    BinaryOperatorClass::Logical => operator.to_string().bright_green(),
                    BinaryOperatorClass::Comparison => operator.to_string().bright_white(),
                    BinaryOperatorClass::Arithmetic => operator.to_string().white(),
                };

                write!(f, "{lhs} {symbol} {rhs}")
            }
        }
    }
}

impl core::fmt::Display for tac::Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            tac::Place::Variable(name) => write!(f, "{name}"),
            tac::Place::Temporary(temp) => write!(f, "{temp}"),
        }
    }
}

impl core::fmt::Display for tac::Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            tac::Operand::Immediate(immediate) => write!(f, "{}", immediate.to_string().purple()),
            tac::Operand::Variable(name) => write!(f, "{name}"),
            tac::Operand::Temporary(temp) => write!(f, "{temp}"),
        }
    }
}

impl core::fmt::Display for tac::Immediate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            tac::Immediate::Int(value) => write!(f, "{value}"),
            // Debug formatting keeps the decimal point on whole floats
            tac::Immediate::Float(value) => write!(f, "{value:?}"),
            tac::Immediate::Bool(value) => write!(f, "{value}"),
            tac::Immediate::String(value) => write!(f, "\"{value}\""),
        }
    }
}

impl core::fmt::Display for tac::TempId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().yellow())
    }
}

impl core::fmt::Display for tac::LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().blue())
    }
}
