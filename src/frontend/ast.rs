//! Parse tree produced by [`Parser`](super::parser::Parser). The tree is owned,
//! immutable once built, and never shares nodes between bodies.

use strum::Display;

use crate::frontend::lexer::Span;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top level statements in execution order
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub span: Span,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Print(Box<Expression>),
    // Declaration without an initial value
    Declare {
        ty: PrimitiveType,
        name: Identifier,
    },
    DeclareAssign(Box<Initialization>),
    Assign(Box<Assignment>),
    Condition(Box<Condition>),
    While {
        condition: Box<Expression>,
        body: Block,
    },
    /// Body runs once before the condition is first tested
    DoWhile {
        body: Block,
        condition: Box<Expression>,
    },
    For(Box<ForLoop>),
}

/// `type name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Initialization {
    pub span: Span,
    pub ty: PrimitiveType,
    pub name: Identifier,
    pub value: Expression,
}

/// `name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub span: Span,
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub if_branch: ConditionalBranch,
    pub elif_branches: Vec<ConditionalBranch>,
    pub else_branch: Option<Block>,
}

impl Condition {
    /// Branches that carry a test, in source order
    pub fn tested_branches(&self) -> impl Iterator<Item = &ConditionalBranch> {
        std::iter::once(&self.if_branch).chain(self.elif_branches.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub span: Span,
    pub condition: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub init: Initialization,
    pub condition: Expression,
    pub step: Assignment,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub span: Span,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub span: Span,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveType {
    Int,
    Float,
    String,
    Bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub span: Span,
    pub kind: ExpressionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Literal(Literal),
    Name(Identifier),
    Binary {
        lhs: Box<Expression>,
        operator: BinaryOperator,
        rhs: Box<Expression>,
    },
    /// Unary minus
    Negate(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    /// Contents without the surrounding quotes
    String(String),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOperator {
    pub span: Span,
    pub kind: BinaryOperatorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BinaryOperatorKind {
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Subtract,
    #[strum(to_string = "*")]
    Multiply,
    #[strum(to_string = "/")]
    Divide,
    #[strum(to_string = "^")]
    Power,
    #[strum(to_string = "==")]
    Equals,
    #[strum(to_string = "!=")]
    NotEquals,
    #[strum(to_string = "<")]
    LessThan,
    #[strum(to_string = "<=")]
    LessThanOrEqualTo,
    #[strum(to_string = ">")]
    GreaterThan,
    #[strum(to_string = ">=")]
    GreaterThanOrEqualTo,
    #[strum(to_string = "and")]
    LogicalAnd,
    #[strum(to_string = "or")]
    LogicalOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorClass {
    Arithmetic,
    Comparison,
    Logical,
}

impl BinaryOperatorKind {
    pub fn class(self) -> BinaryOperatorClass {
        match self {
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Power => {
                BinaryOperatorClass::Arithmetic
            }
            Self::Equals
            | Self::NotEquals
            | Self::LessThan
            | Self::LessThanOrEqualTo
            | Self::GreaterThan
            | Self::GreaterThanOrEqualTo => BinaryOperatorClass::Comparison,
            Self::LogicalAnd | Self::LogicalOr => BinaryOperatorClass::Logical,
        }
    }
}
