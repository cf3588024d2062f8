use thiserror::Error;
use tracing::debug;

use crate::frontend::{
    SourceFile,
    ast::{
        Assignment, BinaryOperator, BinaryOperatorKind, Block, Condition, ConditionalBranch,
        Expression, ExpressionKind, ForLoop, Identifier, Initialization, Literal, PrimitiveType,
        Program, Statement, StatementKind,
    },
    lexer::{Keyword, LexError, Lexer, Span, Token, TokenKind},
};

/// Nesting limit shared by the parser and the lowering pass.
///
/// One level of parenthesized expression costs roughly ten parser frames, so
/// the limit is kept low enough for a 2 MiB thread stack in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("{message} at {line}:{column}")]
    UnexpectedToken {
        message: String,
        span: Span,
        line: usize,
        column: usize,
    },
    #[error("expected {expected} but reached end of file")]
    UnexpectedEof { expected: String, span: Span },
    #[error("nesting exceeds the maximum depth of {limit} at {line}:{column}")]
    NestingTooDeep {
        limit: usize,
        span: Span,
        line: usize,
        column: usize,
    },
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(error) => error.span(),
            SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::UnexpectedEof { span, .. }
            | SyntaxError::NestingTooDeep { span, .. } => *span,
        }
    }
}

type ParseResult<T> = Result<T, SyntaxError>;

/// An expression together with the height of its tree, counted in nodes
struct Subtree {
    expression: Expression,
    height: usize,
}

/// Nesting is tracked twice. `depth` counts every recursive descent the
/// parser makes (statements, groups and negations) and bounds its own stack.
/// Expression trees are measured by height, so a program is accepted exactly
/// when no node sits more than `max_depth` levels deep, which is the bound
/// lowering enforces on the same tree.
#[derive(Debug)]
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    depth: usize,
    statement_depth: usize,
    max_depth: usize,
}

impl<'source> Parser<'source> {
    pub fn new(source_file: &'source SourceFile) -> Self {
        Self {
            lexer: Lexer::new(source_file),
            depth: 0,
            statement_depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses a whole source file with the default nesting limit
    pub fn parse_program(source_file: &'source SourceFile) -> ParseResult<Program> {
        Self::new(source_file).parse()
    }

    pub fn parse(mut self) -> ParseResult<Program> {
        let mut program = Program::default();

        while self.lexer.peek()?.is_some() {
            program.statements.push(self.parse_statement()?);
        }

        debug!(
            statements = program.statements.len(),
            origin = %self.lexer.source().origin,
            "parsed program"
        );

        Ok(program)
    }

    fn unexpected(&self, token: Token, expecting: &str) -> SyntaxError {
        let source = self.lexer.source();

        SyntaxError::UnexpectedToken {
            message: format!(
                "Expected {expecting} but found {:?} ({})",
                token.kind,
                source.value_of_span(token.span)
            ),
            span: token.span,
            line: source.row_for_position(token.span.start),
            column: source.column_for_position(token.span.start),
        }
    }

    fn eof(&self, expecting: &str) -> SyntaxError {
        let end = self.lexer.source().contents.len();

        SyntaxError::UnexpectedEof {
            expected: expecting.to_owned(),
            span: Span::new(end, end),
        }
    }

    fn expect_peek(&mut self, expecting: &str) -> ParseResult<Token> {
        match self.lexer.peek()? {
            Some(token) => Ok(token),
            None => Err(self.eof(expecting)),
        }
    }

    fn expect_next(&mut self, expecting: &str) -> ParseResult<Token> {
        match self.lexer.next()? {
            Some(token) => Ok(token),
            None => Err(self.eof(expecting)),
        }
    }

    fn expect_next_to_be(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.expect_next(&format!("{kind:?}"))?;

        if token.kind != kind {
            return Err(self.unexpected(token, &format!("{kind:?}")));
        }

        Ok(token)
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<Token> {
        self.expect_next_to_be(TokenKind::Keyword(keyword))
    }

    fn next_is(&mut self, kind: TokenKind) -> ParseResult<bool> {
        Ok(self.lexer.peek()?.is_some_and(|t| t.kind == kind))
    }

    fn nesting_too_deep(&self, span: Span) -> SyntaxError {
        let source = self.lexer.source();

        SyntaxError::NestingTooDeep {
            limit: self.max_depth,
            span,
            line: source.row_for_position(span.start),
            column: source.column_for_position(span.start),
        }
    }

    /// Runs `f` one nesting level deeper, failing once the limit is reached
    fn nested<T>(
        &mut self,
        span: Span,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(self.nesting_too_deep(span));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        result
    }

    /// Fails when an expression of `height` below the enclosing statements
    /// would reach past the limit
    fn check_height(&self, span: Span, height: usize) -> ParseResult<()> {
        if self.statement_depth + height > self.max_depth {
            return Err(self.nesting_too_deep(span));
        }

        Ok(())
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let peeked = self.expect_peek("statement")?;

        self.statement_depth += 1;
        let statement = self.nested(peeked.span, |this| this.parse_statement_kind(peeked));
        self.statement_depth -= 1;

        statement
    }

    fn parse_statement_kind(&mut self, peeked: Token) -> ParseResult<Statement> {
        match peeked.kind {
            TokenKind::Keyword(Keyword::Print) => {
                let print_keyword = self.expect_keyword(Keyword::Print)?;
                let expression = self.parse_expression()?;
                let semicolon = self.expect_next_to_be(TokenKind::Semicolon)?;

                Ok(Statement {
                    span: print_keyword.span.to(semicolon.span),
                    kind: StatementKind::Print(Box::new(expression)),
                })
            }
            kind if kind.is_type_keyword() => {
                let statement = self.parse_declaration()?;
                let semicolon = self.expect_next_to_be(TokenKind::Semicolon)?;

                Ok(Statement {
                    span: statement.span.to(semicolon.span),
                    ..statement
                })
            }
            TokenKind::Identifier => {
                let assignment = self.parse_assignment()?;
                let semicolon = self.expect_next_to_be(TokenKind::Semicolon)?;

                Ok(Statement {
                    span: assignment.span.to(semicolon.span),
                    kind: StatementKind::Assign(Box::new(assignment)),
                })
            }
            TokenKind::Keyword(Keyword::If) => self.parse_condition(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            _ => Err(self.unexpected(peeked, "statement")),
        }
    }

    fn parse_type(&mut self) -> ParseResult<(PrimitiveType, Span)> {
        let token = self.expect_next("type")?;

        let ty = match token.kind {
            TokenKind::Keyword(Keyword::Int) => PrimitiveType::Int,
            TokenKind::Keyword(Keyword::Float) => PrimitiveType::Float,
            TokenKind::Keyword(Keyword::String) => PrimitiveType::String,
            TokenKind::Keyword(Keyword::Bool) => PrimitiveType::Bool,
            _ => return Err(self.unexpected(token, "type")),
        };

        Ok((ty, token.span))
    }

    fn parse_identifier(&mut self) -> ParseResult<Identifier> {
        let token = self.expect_next_to_be(TokenKind::Identifier)?;

        Ok(Identifier {
            span: token.span,
            name: self.lexer.source().value_of_span(token.span).to_owned(),
        })
    }

    // type IDENT ( "=" expression )?
    fn parse_declaration(&mut self) -> ParseResult<Statement> {
        let (ty, type_span) = self.parse_type()?;
        let name = self.parse_identifier()?;

        if !self.next_is(TokenKind::Equals)? {
            return Ok(Statement {
                span: type_span.to(name.span),
                kind: StatementKind::Declare { ty, name },
            });
        }

        self.expect_next_to_be(TokenKind::Equals)?;
        let value = self.parse_expression()?;
        let span = type_span.to(value.span);

        Ok(Statement {
            span,
            kind: StatementKind::DeclareAssign(Box::new(Initialization {
                span,
                ty,
                name,
                value,
            })),
        })
    }

    // type IDENT "=" expression
    fn parse_initialization(&mut self) -> ParseResult<Initialization> {
        let declaration = self.parse_declaration()?;

        match declaration.kind {
            StatementKind::DeclareAssign(initialization) => Ok(*initialization),
            _ => {
                let token = self.expect_peek("equals")?;
                Err(self.unexpected(token, "Equals"))
            }
        }
    }

    // IDENT "=" expression
    fn parse_assignment(&mut self) -> ParseResult<Assignment> {
        let name = self.parse_identifier()?;
        self.expect_next_to_be(TokenKind::Equals)?;
        let value = self.parse_expression()?;

        Ok(Assignment {
            span: name.span.to(value.span),
            name,
            value,
        })
    }

    // "{" ( statement )* "}"
    fn parse_block(&mut self) -> ParseResult<Block> {
        let mut statements = Vec::new();

        let open_brace = self.expect_next_to_be(TokenKind::OpenBrace)?;

        while self.expect_peek("statement or closing brace")?.kind != TokenKind::CloseBrace {
            statements.push(self.parse_statement()?);
        }

        let close_brace = self.expect_next_to_be(TokenKind::CloseBrace)?;

        Ok(Block {
            span: open_brace.span.to(close_brace.span),
            statements,
        })
    }

    // "(" expression ")"
    fn parse_parenthesized_condition(&mut self) -> ParseResult<Expression> {
        self.expect_next_to_be(TokenKind::OpenParen)?;
        let condition = self.parse_expression()?;
        self.expect_next_to_be(TokenKind::CloseParen)?;

        Ok(condition)
    }

    // keyword "(" expression ")" BLOCK
    fn parse_conditional_branch(&mut self, keyword: Keyword) -> ParseResult<ConditionalBranch> {
        let keyword = self.expect_keyword(keyword)?;
        let condition = self.parse_parenthesized_condition()?;
        let body = self.parse_block()?;

        Ok(ConditionalBranch {
            span: keyword.span.to(body.span),
            condition,
            body,
        })
    }

    /// "if" "(" expression ")" BLOCK
    /// ( "elif" "(" expression ")" BLOCK )*
    /// ( "else" BLOCK )?
    fn parse_condition(&mut self) -> ParseResult<Statement> {
        let if_branch = self.parse_conditional_branch(Keyword::If)?;
        let mut span = if_branch.span;

        let mut elif_branches = Vec::new();
        while self.next_is(TokenKind::Keyword(Keyword::Elif))? {
            let branch = self.parse_conditional_branch(Keyword::Elif)?;
            span = span.to(branch.span);
            elif_branches.push(branch);
        }

        let else_branch = if self.next_is(TokenKind::Keyword(Keyword::Else))? {
            self.expect_keyword(Keyword::Else)?;
            let block = self.parse_block()?;
            span = span.to(block.span);
            Some(block)
        } else {
            None
        };

        Ok(Statement {
            span,
            kind: StatementKind::Condition(Box::new(Condition {
                if_branch,
                elif_branches,
                else_branch,
            })),
        })
    }

    /// "while" "(" expression ")" BLOCK
    fn parse_while(&mut self) -> ParseResult<Statement> {
        let while_keyword = self.expect_keyword(Keyword::While)?;
        let condition = self.parse_parenthesized_condition()?;
        let body = self.parse_block()?;

        Ok(Statement {
            span: while_keyword.span.to(body.span),
            kind: StatementKind::While {
                condition: Box::new(condition),
                body,
            },
        })
    }

    /// "do" BLOCK "while" "(" expression ")" ";"
    fn parse_do_while(&mut self) -> ParseResult<Statement> {
        let do_keyword = self.expect_keyword(Keyword::Do)?;
        let body = self.parse_block()?;
        self.expect_keyword(Keyword::While)?;
        let condition = self.parse_parenthesized_condition()?;
        let semicolon = self.expect_next_to_be(TokenKind::Semicolon)?;

        Ok(Statement {
            span: do_keyword.span.to(semicolon.span),
            kind: StatementKind::DoWhile {
                body,
                condition: Box::new(condition),
            },
        })
    }

    /// "for" "(" initialization ";" expression ";" assignment ")" BLOCK
    fn parse_for(&mut self) -> ParseResult<Statement> {
        let for_keyword = self.expect_keyword(Keyword::For)?;

        self.expect_next_to_be(TokenKind::OpenParen)?;
        let init = self.parse_initialization()?;
        self.expect_next_to_be(TokenKind::Semicolon)?;
        let condition = self.parse_expression()?;
        self.expect_next_to_be(TokenKind::Semicolon)?;
        let step = self.parse_assignment()?;
        self.expect_next_to_be(TokenKind::CloseParen)?;

        let body = self.parse_block()?;

        Ok(Statement {
            span: for_keyword.span.to(body.span),
            kind: StatementKind::For(Box::new(ForLoop {
                init,
                condition,
                step,
                body,
            })),
        })
    }

    /// expression     -> logical
    /// logical        -> comparison ( ( "and" | "or" ) comparison )*
    /// comparison     -> term ( ( "==" | "!=" | ">=" | "<=" | ">" | "<" ) term )?
    /// term           -> factor ( ( "+" | "-" ) factor )*
    /// factor         -> power ( ( "*" | "/" ) power )*
    /// power          -> unary ( "^" unary )*
    /// unary          -> "-" unary
    ///                   | atom
    /// atom           -> IDENTIFIER | INTEGER | FLOAT | STRING | BOOL
    ///                   | "(" expression ")"
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        Ok(self.parse_logical_expression()?.expression)
    }

    fn binary(
        &self,
        lhs: Subtree,
        operator: BinaryOperator,
        rhs: Subtree,
    ) -> ParseResult<Subtree> {
        let height = lhs.height.max(rhs.height) + 1;
        self.check_height(operator.span, height)?;

        Ok(Subtree {
            expression: Expression {
                span: lhs.expression.span.to(rhs.expression.span),
                kind: ExpressionKind::Binary {
                    lhs: Box::new(lhs.expression),
                    operator,
                    rhs: Box::new(rhs.expression),
                },
            },
            height,
        })
    }

    fn parse_logical_expression(&mut self) -> ParseResult<Subtree> {
        let mut expression = self.parse_comparison_expression()?;

        while self.lexer.peek()?.is_some_and(|t| t.kind.is_logical_operator()) {
            let operator = self.expect_next("logical operator")?;

            let kind = match operator.kind {
                TokenKind::Keyword(Keyword::And) => BinaryOperatorKind::LogicalAnd,
                TokenKind::Keyword(Keyword::Or) => BinaryOperatorKind::LogicalOr,
                _ => unreachable!(),
            };

            let rhs = self.parse_comparison_expression()?;
            expression = self.binary(
                expression,
                BinaryOperator {
                    span: operator.span,
                    kind,
                },
                rhs,
            )?;
        }

        Ok(expression)
    }

    fn parse_comparison_expression(&mut self) -> ParseResult<Subtree> {
        let expression = self.parse_term_expression()?;

        if !self
            .lexer
            .peek()?
            .is_some_and(|t| t.kind.is_comparison_operator())
        {
            return Ok(expression);
        }

        let operator = self.parse_comparison_operator()?;
        let rhs = self.parse_term_expression()?;

        // Comparisons are non-associative: `a < b < c` is rejected
        match self.lexer.peek()? {
            Some(token) if token.kind.is_comparison_operator() => {
                return Err(self.unexpected(token, "end of comparison"));
            }
            _ => {}
        }

        self.binary(expression, operator, rhs)
    }

    fn parse_comparison_operator(&mut self) -> ParseResult<BinaryOperator> {
        let operator = self.expect_next("comparison operator")?;

        Ok(BinaryOperator {
            span: operator.span,
            kind: match operator.kind {
                TokenKind::NotEquals => BinaryOperatorKind::NotEquals,
                TokenKind::DoubleEquals => BinaryOperatorKind::Equals,
                TokenKind::LessThan => BinaryOperatorKind::LessThan,
                TokenKind::LessThanOrEqualTo => BinaryOperatorKind::LessThanOrEqualTo,
                TokenKind::GreaterThan => BinaryOperatorKind::GreaterThan,
                TokenKind::GreaterThanOrEqualTo => BinaryOperatorKind::GreaterThanOrEqualTo,
                _ => unreachable!(),
            },
        })
    }

    fn parse_term_expression(&mut self) -> ParseResult<Subtree> {
        let mut expression = self.parse_factor_expression()?;

        while self.lexer.peek()?.is_some_and(|t| t.kind.is_term_operator()) {
            let operator = self.expect_next("term operator")?;

            let kind = match operator.kind {
                TokenKind::Plus => BinaryOperatorKind::Add,
                TokenKind::Minus => BinaryOperatorKind::Subtract,
                _ => unreachable!(),
            };

            let rhs = self.parse_factor_expression()?;
            expression = self.binary(
                expression,
                BinaryOperator {
                    span: operator.span,
                    kind,
                },
                rhs,
            )?;
        }

        Ok(expression)
    }

    fn parse_factor_expression(&mut self) -> ParseResult<Subtree> {
        let mut expression = self.parse_power_expression()?;

        while self.lexer.peek()?.is_some_and(|t| t.kind.is_factor_operator()) {
            let operator = self.expect_next("factor operator")?;

            let kind = match operator.kind {
                TokenKind::Asterisk => BinaryOperatorKind::Multiply,
                TokenKind::Divide => BinaryOperatorKind::Divide,
                _ => unreachable!(),
            };

            let rhs = self.parse_power_expression()?;
            expression = self.binary(
                expression,
                BinaryOperator {
                    span: operator.span,
                    kind,
                },
                rhs,
            )?;
        }

        Ok(expression)
    }

    // `^` groups to the left, matching the other binary operators
    fn parse_power_expression(&mut self) -> ParseResult<Subtree> {
        let mut expression = self.parse_unary_expression()?;

        while self.next_is(TokenKind::Caret)? {
            let operator = self.expect_next_to_be(TokenKind::Caret)?;

            let rhs = self.parse_unary_expression()?;
            expression = self.binary(
                expression,
                BinaryOperator {
                    span: operator.span,
                    kind: BinaryOperatorKind::Power,
                },
                rhs,
            )?;
        }

        Ok(expression)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Subtree> {
        let peeked = self.expect_peek("expression")?;

        if peeked.kind != TokenKind::Minus {
            return self.parse_atomic_expression();
        }

        self.nested(peeked.span, |this| {
            let minus = this.expect_next_to_be(TokenKind::Minus)?;
            let operand = this.parse_unary_expression()?;

            let height = operand.height + 1;
            this.check_height(minus.span, height)?;

            Ok(Subtree {
                expression: Expression {
                    span: minus.span.to(operand.expression.span),
                    kind: ExpressionKind::Negate(Box::new(operand.expression)),
                },
                height,
            })
        })
    }

    fn parse_atomic_expression(&mut self) -> ParseResult<Subtree> {
        let token = self.expect_next("identifier, literal, or open paren")?;
        let value = self.lexer.source().value_of_span(token.span);

        let literal = match token.kind {
            TokenKind::Identifier => {
                self.check_height(token.span, 1)?;

                return Ok(Subtree {
                    expression: Expression {
                        span: token.span,
                        kind: ExpressionKind::Name(Identifier {
                            span: token.span,
                            name: value.to_owned(),
                        }),
                    },
                    height: 1,
                });
            }
            // Grouping collapses into the inner expression and adds no height
            TokenKind::OpenParen => {
                return self.nested(token.span, |this| {
                    let inner = this.parse_logical_expression()?;
                    this.expect_next_to_be(TokenKind::CloseParen)?;
                    Ok(inner)
                });
            }
            TokenKind::IntegerLiteral => match value.parse() {
                Ok(value) => Literal::Integer(value),
                Err(_) => {
                    return Err(self.unexpected(token, "integer literal that fits in 64 bits"));
                }
            },
            TokenKind::FloatLiteral => match value.parse() {
                Ok(value) => Literal::Float(value),
                Err(_) => return Err(self.unexpected(token, "float literal")),
            },
            TokenKind::StringLiteral => Literal::String(value[1..value.len() - 1].to_owned()),
            TokenKind::BooleanLiteral => Literal::Boolean(value == "true"),
            _ => return Err(self.unexpected(token, "identifier, literal, or open paren")),
        };

        self.check_height(token.span, 1)?;

        Ok(Subtree {
            expression: Expression {
                span: token.span,
                kind: ExpressionKind::Literal(literal),
            },
            height: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult<Program> {
        Parser::parse_program(&SourceFile::memory(source))
    }

    fn parse_expression(source: &str) -> Expression {
        let program = parse(&format!("print {source};")).unwrap();

        match program.statements.into_iter().next().unwrap().kind {
            StatementKind::Print(expression) => *expression,
            kind => panic!("expected print statement, got {kind:?}"),
        }
    }

    /// Fully parenthesized rendering of an expression tree
    fn shape(expression: &Expression) -> String {
        match &expression.kind {
            ExpressionKind::Literal(Literal::Integer(v)) => v.to_string(),
            ExpressionKind::Literal(Literal::Float(v)) => format!("{v:?}"),
            ExpressionKind::Literal(Literal::String(v)) => format!("{v:?}"),
            ExpressionKind::Literal(Literal::Boolean(v)) => v.to_string(),
            ExpressionKind::Name(identifier) => identifier.name.clone(),
            ExpressionKind::Binary { lhs, operator, rhs } => {
                format!("({} {} {})", shape(lhs), operator.kind, shape(rhs))
            }
            ExpressionKind::Negate(operand) => format!("(-{})", shape(operand)),
        }
    }

    #[test]
    fn precedence_ladder() {
        assert_eq!(shape(&parse_expression("1 + 2 * 3")), "(1 + (2 * 3))");
        assert_eq!(shape(&parse_expression("2 * 3 ^ 2")), "(2 * (3 ^ 2))");
        assert_eq!(
            shape(&parse_expression("a + 1 > b and c or d")),
            "((((a + 1) > b) and c) or d)"
        );
        assert_eq!(shape(&parse_expression("-a ^ 2")), "((-a) ^ 2)");
    }

    #[test]
    fn left_associativity() {
        assert_eq!(shape(&parse_expression("10 - 4 - 3")), "((10 - 4) - 3)");
        assert_eq!(shape(&parse_expression("8 / 4 / 2")), "((8 / 4) / 2)");
        assert_eq!(shape(&parse_expression("2 ^ 3 ^ 2")), "((2 ^ 3) ^ 2)");
    }

    #[test]
    fn parentheses_collapse() {
        assert_eq!(shape(&parse_expression("(1 + 2) * 3")), "((1 + 2) * 3)");
        assert_eq!(shape(&parse_expression("((x))")), "x");
    }

    #[test]
    fn literals() {
        assert_eq!(
            shape(&parse_expression(r#""text" == true"#)),
            r#"("text" == true)"#
        );
        assert_eq!(shape(&parse_expression("1.5 + -2")), "(1.5 + (-2))");
    }

    #[test]
    fn chained_comparison_is_rejected() {
        assert!(matches!(
            parse("print 1 < 2 < 3;"),
            Err(SyntaxError::UnexpectedToken { line: 1, column: 13, .. })
        ));
    }

    #[test]
    fn statement_forms() {
        let program = parse(
            "int a; float b = 1.5; a = 2; print a;
             if (a > 1) { print 1; } elif (a > 0) { print 2; } elif (a == 0) { } else { print 3; }
             while (a < 10) { a = a + 1; }
             do { a = a - 1; } while (a > 0);
             for (int i = 0; i < 3; i = i + 1) { print i; }",
        )
        .unwrap();

        let kinds: Vec<_> = program.statements.iter().map(|s| &s.kind).collect();

        assert!(matches!(
            kinds[0],
            StatementKind::Declare {
                ty: PrimitiveType::Int,
                ..
            }
        ));
        assert!(matches!(
            kinds[1],
            StatementKind::DeclareAssign(init) if init.ty == PrimitiveType::Float
        ));
        assert!(matches!(kinds[2], StatementKind::Assign(a) if a.name.name == "a"));
        assert!(matches!(kinds[3], StatementKind::Print(_)));
        assert!(matches!(
            kinds[4],
            StatementKind::Condition(condition)
                if condition.elif_branches.len() == 2
                    && condition.elif_branches[1].body.statements.is_empty()
                    && condition.else_branch.is_some()
        ));
        assert!(matches!(kinds[5], StatementKind::While { .. }));
        assert!(matches!(kinds[6], StatementKind::DoWhile { .. }));
        assert!(matches!(
            kinds[7],
            StatementKind::For(for_loop)
                if for_loop.init.name.name == "i" && for_loop.step.name.name == "i"
        ));
    }

    #[test]
    fn string_literal_drops_quotes() {
        let program = parse(r#"string s = "a b";"#).unwrap();

        let StatementKind::DeclareAssign(init) = &program.statements[0].kind else {
            panic!("expected declaration");
        };

        assert_eq!(
            init.value.kind,
            ExpressionKind::Literal(Literal::String("a b".to_owned()))
        );
    }

    #[test]
    fn for_init_requires_initializer() {
        assert!(matches!(
            parse("for (int i; i < 3; i = i + 1) { }"),
            Err(SyntaxError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn missing_semicolon() {
        let error = parse("int x = 1\nprint x;").unwrap_err();

        assert!(matches!(
            error,
            SyntaxError::UnexpectedToken { line: 2, column: 1, .. }
        ));
    }

    #[test]
    fn unexpected_eof() {
        assert!(matches!(
            parse("while (x < 1) {"),
            Err(SyntaxError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn integer_overflow_is_rejected() {
        assert!(matches!(
            parse("print 99999999999999999999;"),
            Err(SyntaxError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn lex_errors_propagate() {
        assert!(matches!(
            parse("int x = 1 @ 2;"),
            Err(SyntaxError::Lex(LexError::UnexpectedCharacter { character: '@', .. }))
        ));
    }

    #[test]
    fn nesting_limit() {
        let source = SourceFile::memory("print ((((((1))))));");

        assert!(matches!(
            Parser::new(&source).with_max_depth(4).parse(),
            Err(SyntaxError::NestingTooDeep { limit: 4, .. })
        ));
        assert!(Parser::new(&source).with_max_depth(16).parse().is_ok());
    }

    #[test]
    fn negations_count_one_level_each() {
        // The statement, two negations and the literal
        let source = SourceFile::memory("print --1;");

        assert!(Parser::new(&source).with_max_depth(4).parse().is_ok());
        assert!(matches!(
            Parser::new(&source).with_max_depth(3).parse(),
            Err(SyntaxError::NestingTooDeep { limit: 3, .. })
        ));
    }

    #[test]
    fn chains_at_different_levels_add_up() {
        // `a ^ a * a + a` is a left spine four operators long
        let source = SourceFile::memory("print a ^ a * a + a and a;");

        assert!(Parser::new(&source).with_max_depth(6).parse().is_ok());
        assert!(matches!(
            Parser::new(&source).with_max_depth(5).parse(),
            Err(SyntaxError::NestingTooDeep { line: 1, column: 21, .. })
        ));
    }

    #[test]
    fn long_operator_chain_counts_towards_depth() {
        let source = SourceFile::memory("print 1 + 1 + 1 + 1 + 1 + 1 + 1 + 1;");

        assert!(matches!(
            Parser::new(&source).with_max_depth(5).parse(),
            Err(SyntaxError::NestingTooDeep { .. })
        ));
    }
}
