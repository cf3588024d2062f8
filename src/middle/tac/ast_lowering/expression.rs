use super::{LoweringContext, LoweringError};
use crate::{
    frontend::ast,
    middle::tac::{Immediate, Instruction, Operand, Place, Rvalue, sink::IrSink},
};

impl<S: IrSink> LoweringContext<'_, S> {
    /// Lowers `expression` and returns the operand holding its value.
    ///
    /// Literals and names need no computation and emit nothing. Every operator
    /// application gets a fresh temporary, allocated after both operands are
    /// lowered.
    pub(super) fn lower_expression(
        &mut self,
        expression: &ast::Expression,
    ) -> Result<Operand, LoweringError> {
        self.nested(expression.span, |this| match &expression.kind {
            ast::ExpressionKind::Literal(literal) => Ok(Operand::Immediate(lower_literal(literal))),
            ast::ExpressionKind::Name(identifier) => {
                this.check_declared(identifier);
                Ok(Operand::Variable(identifier.name.clone()))
            }
            ast::ExpressionKind::Negate(operand) => this.lower_negation(operand),
            ast::ExpressionKind::Binary { lhs, operator, rhs } => {
                let lhs = this.lower_expression(lhs)?;
                let rhs = this.lower_expression(rhs)?;

                let temp = this.names.new_temp();
                this.push_instruction(Instruction::Assign {
                    destination: Place::Temporary(temp),
                    value: Rvalue::Binary {
                        operator: operator.kind,
                        lhs,
                        rhs,
                    },
                });

                Ok(temp.into())
            }
        })
    }

    fn lower_negation(&mut self, operand: &ast::Expression) -> Result<Operand, LoweringError> {
        let operand = self.lower_expression(operand)?;

        // Numeric literals are negated in place
        let folded = match &operand {
            Operand::Immediate(Immediate::Int(value)) => value.checked_neg().map(Immediate::Int),
            Operand::Immediate(Immediate::Float(value)) => Some(Immediate::Float(-value)),
            _ => None,
        };

        if let Some(immediate) = folded {
            return Ok(Operand::Immediate(immediate));
        }

        let temp = self.names.new_temp();
        self.push_instruction(Instruction::Assign {
            destination: Place::Temporary(temp),
            value: Rvalue::Negate(operand),
        });

        Ok(temp.into())
    }
}

fn lower_literal(literal: &ast::Literal) -> Immediate {
    match literal {
        ast::Literal::Integer(value) => Immediate::Int(*value),
        ast::Literal::Float(value) => Immediate::Float(*value),
        ast::Literal::String(value) => Immediate::String(value.clone()),
        ast::Literal::Boolean(value) => Immediate::Bool(*value),
    }
}
