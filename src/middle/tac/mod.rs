//! TAC (three-address code). Every instruction has at most one destination
//! and two source operands; control flow is expressed with labels and jumps
//! and emission order is execution order.

use crate::{
    frontend::ast::{BinaryOperatorKind, PrimitiveType},
    index::simple_index,
};

pub mod ast_lowering;
pub mod names;
pub mod pretty_print;
pub mod sink;

simple_index! {
    /// Identifies a generator-introduced temporary
    pub struct TempId = "V";
}

simple_index! {
    /// Identifies a jump target
    pub struct LabelId = "L";
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Records the declared type of a source variable
    DeclareType {
        ty: PrimitiveType,
        name: String,
    },
    Assign {
        destination: Place,
        value: Rvalue,
    },
    Print {
        operand: Operand,
    },
    Label(LabelId),
    Goto {
        destination: LabelId,
    },
    /// Jumps when `condition` is false or zero, falls through otherwise
    GotoIfFalse {
        condition: Operand,
        destination: LabelId,
    },
}

impl Instruction {
    pub fn jump_target(&self) -> Option<LabelId> {
        match self {
            Instruction::Goto { destination } | Instruction::GotoIfFalse { destination, .. } => {
                Some(*destination)
            }
            _ => None,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }
}

/// Destination of an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Place {
    Variable(String),
    Temporary(TempId),
}

/// Right hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Rvalue {
    Use(Operand),
    Negate(Operand),
    Binary {
        operator: BinaryOperatorKind,
        lhs: Operand,
        rhs: Operand,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Immediate {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Immediate(Immediate),
    Variable(String),
    Temporary(TempId),
}

impl From<TempId> for Operand {
    fn from(value: TempId) -> Self {
        Operand::Temporary(value)
    }
}

impl From<TempId> for Place {
    fn from(value: TempId) -> Self {
        Place::Temporary(value)
    }
}
