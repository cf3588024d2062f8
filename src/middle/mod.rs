//! The parse tree is lowered here into three-address code (TAC). In this form
//! conditionals and loops are simplified to labels and jumps and expression
//! trees are flattened into assignments to numbered temporaries.

pub mod tac;
