use super::{LoweringContext, LoweringError};
use crate::{
    frontend::ast,
    middle::tac::{Instruction, Place, Rvalue, sink::IrSink},
};

impl<S: IrSink> LoweringContext<'_, S> {
    pub(super) fn lower_statement(
        &mut self,
        statement: &ast::Statement,
    ) -> Result<(), LoweringError> {
        self.nested(statement.span, |this| match &statement.kind {
            ast::StatementKind::Print(expression) => {
                let operand = this.lower_expression(expression)?;
                this.push_instruction(Instruction::Print { operand });
                Ok(())
            }
            ast::StatementKind::Declare { ty, name } => {
                this.push_instruction(Instruction::DeclareType {
                    ty: *ty,
                    name: name.name.clone(),
                });
                this.declare(name);
                Ok(())
            }
            ast::StatementKind::DeclareAssign(initialization) => {
                this.lower_initialization(initialization)
            }
            ast::StatementKind::Assign(assignment) => this.lower_assignment(assignment),
            ast::StatementKind::Condition(condition) => this.lower_condition(condition),
            ast::StatementKind::While { condition, body } => this.lower_while(condition, body),
            ast::StatementKind::DoWhile { body, condition } => {
                this.lower_do_while(body, condition)
            }
            ast::StatementKind::For(for_loop) => this.lower_for(for_loop),
        })
    }

    fn lower_block(&mut self, block: &ast::Block) -> Result<(), LoweringError> {
        for statement in &block.statements {
            self.lower_statement(statement)?;
        }

        Ok(())
    }

    fn lower_initialization(
        &mut self,
        initialization: &ast::Initialization,
    ) -> Result<(), LoweringError> {
        let name = &initialization.name;

        self.push_instruction(Instruction::DeclareType {
            ty: initialization.ty,
            name: name.name.clone(),
        });

        // The name only becomes visible once its initializer has been lowered,
        // so `int x = x;` still reports `x`
        let operand = self.lower_expression(&initialization.value)?;
        self.declare(name);

        self.push_instruction(Instruction::Assign {
            destination: Place::Variable(name.name.clone()),
            value: Rvalue::Use(operand),
        });

        Ok(())
    }

    fn lower_assignment(&mut self, assignment: &ast::Assignment) -> Result<(), LoweringError> {
        let operand = self.lower_expression(&assignment.value)?;
        self.check_declared(&assignment.name);

        self.push_instruction(Instruction::Assign {
            destination: Place::Variable(assignment.name.name.clone()),
            value: Rvalue::Use(operand),
        });

        Ok(())
    }

    /// Every tested branch jumps past its body when its test fails and jumps
    /// to the shared end label when its body finishes. An `else` body is the
    /// fall through after the last skip label.
    fn lower_condition(&mut self, condition: &ast::Condition) -> Result<(), LoweringError> {
        let mut end_label = None;

        for branch in condition.tested_branches() {
            let test = self.lower_expression(&branch.condition)?;
            let skip = self.names.new_label();

            // Allocated right after the first skip label
            let end = *end_label.get_or_insert_with(|| self.names.new_label());

            self.push_instruction(Instruction::GotoIfFalse {
                condition: test,
                destination: skip,
            });
            self.lower_block(&branch.body)?;
            self.push_instruction(Instruction::Goto { destination: end });
            self.push_instruction(Instruction::Label(skip));
        }

        if let Some(else_branch) = &condition.else_branch {
            self.lower_block(else_branch)?;
        }

        if let Some(end) = end_label {
            self.push_instruction(Instruction::Label(end));
        }

        Ok(())
    }

    fn lower_while(
        &mut self,
        condition: &ast::Expression,
        body: &ast::Block,
    ) -> Result<(), LoweringError> {
        let start = self.names.new_label();
        let end = self.names.new_label();

        self.push_instruction(Instruction::Label(start));
        let test = self.lower_expression(condition)?;
        self.push_instruction(Instruction::GotoIfFalse {
            condition: test,
            destination: end,
        });
        self.lower_block(body)?;
        self.push_instruction(Instruction::Goto { destination: start });
        self.push_instruction(Instruction::Label(end));

        Ok(())
    }

    /// The body runs before the first test. The back edge is the only jump.
    fn lower_do_while(
        &mut self,
        body: &ast::Block,
        condition: &ast::Expression,
    ) -> Result<(), LoweringError> {
        let start = self.names.new_label();

        self.push_instruction(Instruction::Label(start));
        self.lower_block(body)?;
        let test = self.lower_expression(condition)?;
        self.push_instruction(Instruction::GotoIfFalse {
            condition: test,
            destination: start,
        });

        Ok(())
    }

    /// The initializer runs once before the loop label. The step is lowered
    /// after the body and before the back edge.
    fn lower_for(&mut self, for_loop: &ast::ForLoop) -> Result<(), LoweringError> {
        self.lower_initialization(&for_loop.init)?;

        let start = self.names.new_label();
        let end = self.names.new_label();

        self.push_instruction(Instruction::Label(start));
        let test = self.lower_expression(&for_loop.condition)?;
        self.push_instruction(Instruction::GotoIfFalse {
            condition: test,
            destination: end,
        });
        self.lower_block(&for_loop.body)?;
        self.lower_assignment(&for_loop.step)?;
        self.push_instruction(Instruction::Goto { destination: start });
        self.push_instruction(Instruction::Label(end));

        Ok(())
    }
}
