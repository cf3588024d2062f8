mod common;

use calcc::{
    CompileError, DiagnosticKind, Generation, LoweringOptions, compile_to_tac,
    frontend::{
        SourceFile,
        lexer::LexError,
        parser::{DEFAULT_MAX_DEPTH, Parser, SyntaxError},
    },
    middle::tac::ast_lowering::{LoweringError, generate_with_options},
};
use common::{compile, lines};
use indoc::indoc;

fn compile_error(source: &str) -> CompileError {
    compile_to_tac(&SourceFile::memory(source)).unwrap_err()
}

// ── Undeclared variables ─────────────────────────────────────────────────
// Reported as diagnostics while the instruction is still emitted.

#[test]
fn assignment_to_undeclared_variable() {
    let generation = compile("total = 4;");

    assert_eq!(generation.diagnostics.len(), 1);
    assert_eq!(
        generation.diagnostics[0].kind,
        DiagnosticKind::UndeclaredVariable
    );
    assert_eq!(generation.diagnostics[0].name, "total");
    assert_eq!(lines("total = 4;"), ["total = 4"]);
}

#[test]
fn reference_to_undeclared_variable() {
    let source = "int x = y + 1;";
    let generation = compile(source);

    assert_eq!(generation.diagnostics.len(), 1);

    let span = generation.diagnostics[0].span;
    assert_eq!(&source[span.start..span.end], "y");
    assert_eq!(lines(source), ["int x", "V1 = y + 1", "x = V1"]);
}

#[test]
fn every_use_is_reported() {
    let generation = compile("print a; print a; a = 1;");

    let names: Vec<_> = generation
        .diagnostics
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, ["a", "a", "a"]);
}

#[test]
fn declarations_are_program_wide() {
    let source = indoc! {"
        if (true) { int inner = 1; }
        inner = 2;
        print inner;
    "};

    assert!(compile(source).diagnostics.is_empty());
}

#[test]
fn use_before_declaration_is_reported() {
    let generation = compile("x = 1; int x;");

    assert_eq!(generation.diagnostics.len(), 1);
}

// ── Lexical and syntax errors ────────────────────────────────────────────

#[test]
fn unexpected_character() {
    let error = compile_error("int x = 3 $ 4;");

    assert!(matches!(
        error,
        CompileError::Syntax(SyntaxError::Lex(LexError::UnexpectedCharacter {
            character: '$',
            line: 1,
            column: 11,
            ..
        }))
    ));
}

#[test]
fn unterminated_string() {
    let error = compile_error("print \"open;\n");

    assert!(matches!(
        error,
        CompileError::Syntax(SyntaxError::Lex(LexError::UnterminatedString { .. }))
    ));
}

#[test]
fn missing_semicolon_points_at_next_token() {
    let source = "print 1\nprint 2;";
    let error = compile_error(source);

    let CompileError::Syntax(SyntaxError::UnexpectedToken { line, column, .. }) = &error else {
        panic!("expected unexpected token, got {error:?}");
    };
    assert_eq!((*line, *column), (2, 1));
}

#[test]
fn unclosed_block() {
    let error = compile_error("while (true) { print 1;");

    assert!(matches!(
        error,
        CompileError::Syntax(SyntaxError::UnexpectedEof { .. })
    ));
}

#[test]
fn chained_comparison() {
    let error = compile_error("print 1 < 2 < 3;");

    assert!(matches!(
        error,
        CompileError::Syntax(SyntaxError::UnexpectedToken { .. })
    ));
}

#[test]
fn integer_out_of_range() {
    let error = compile_error("print 99999999999999999999;");

    assert!(matches!(
        error,
        CompileError::Syntax(SyntaxError::UnexpectedToken { .. })
    ));
}

#[test]
fn missing_type_in_for_initializer() {
    let error = compile_error("for (i = 0; i < 3; i = i + 1) { print i; }");

    assert!(matches!(error, CompileError::Syntax(_)));
}

// ── Nesting limits ───────────────────────────────────────────────────────

fn nested_groups(depth: usize) -> SourceFile {
    SourceFile::memory(format!(
        "print {}1{};",
        "(".repeat(depth),
        ")".repeat(depth)
    ))
}

fn negations(count: usize) -> SourceFile {
    SourceFile::memory(format!("print {}1;", "-".repeat(count)))
}

/// `int a; print a ^ a ...` with the given number of `^`, `*`, `+` and `and`
/// operators, forming one left spine
fn mixed_chains(per_level: [usize; 4]) -> SourceFile {
    let mut source = String::from("int a; print a");

    for (operator, count) in ["^", "*", "+", "and"].into_iter().zip(per_level) {
        source.push_str(&format!(" {operator} a").repeat(count));
    }
    source.push(';');

    SourceFile::memory(source)
}

fn is_parser_depth_error(result: Result<Generation, CompileError>) -> bool {
    matches!(
        result,
        Err(CompileError::Syntax(SyntaxError::NestingTooDeep {
            limit: DEFAULT_MAX_DEPTH,
            ..
        }))
    )
}

#[test]
fn parser_rejects_deep_nesting() {
    let source = nested_groups(100);

    let error = Parser::new(&source).with_max_depth(64).parse().unwrap_err();
    assert!(matches!(error, SyntaxError::NestingTooDeep { limit: 64, .. }));

    assert!(Parser::new(&source).with_max_depth(128).parse().is_ok());
}

#[test]
fn default_limit_fits_on_a_spawned_thread() {
    let groups = std::thread::spawn(|| {
        compile_to_tac(&nested_groups(DEFAULT_MAX_DEPTH - 1)).map(|g| g.instructions.len())
    });
    // The statement and the literal take the last two levels
    let negated = std::thread::spawn(|| {
        compile_to_tac(&negations(DEFAULT_MAX_DEPTH - 2)).map(|g| g.instructions.len())
    });

    assert_eq!(groups.join().unwrap(), Ok(1));
    assert_eq!(negated.join().unwrap(), Ok(1));
}

#[test]
fn default_limit_rejects_one_level_more() {
    assert!(is_parser_depth_error(compile_to_tac(&nested_groups(
        DEFAULT_MAX_DEPTH
    ))));
    assert!(is_parser_depth_error(compile_to_tac(&negations(
        DEFAULT_MAX_DEPTH - 1
    ))));
}

#[test]
fn mixed_operator_chains_at_default_limit() {
    // The statement, 126 operators and the leftmost `a`
    let generation = compile_to_tac(&mixed_chains([30, 30, 30, 36])).unwrap();
    assert_eq!(generation.instructions.len(), 1 + 126 + 1);

    // One more operator is rejected by the parser before lowering runs
    assert!(is_parser_depth_error(compile_to_tac(&mixed_chains([
        30, 30, 30, 37
    ]))));
}

#[test]
fn parser_and_lowering_agree_on_every_limit() {
    let sources = [
        "int a; print a ^ a * a + a and a;",
        "int a; while (a < 3) { if (a == 1) { a = -a + 1; } elif (a > 1) { print a; } }",
        "for (int i = 0; i < 2; i = i * 2 - -1) { do { print i; } while (i > 0 or i < -1); }",
    ];

    for source in sources {
        let source = SourceFile::memory(source);
        let program = Parser::parse_program(&source).unwrap();

        for limit in 1..=12 {
            let parsed = Parser::new(&source).with_max_depth(limit).parse();
            let lowered = generate_with_options(
                &program,
                LoweringOptions::default().with_max_depth(limit),
            );

            assert_eq!(
                parsed.is_ok(),
                lowered.is_ok(),
                "limit {limit} for {:?}",
                source.contents
            );
        }
    }
}

#[test]
fn lowering_honors_its_own_limit() {
    let source = SourceFile::memory("int x; x = 1 + 2 + 3 + 4 + 5;");
    let program = Parser::parse_program(&source).unwrap();

    let error =
        generate_with_options(&program, LoweringOptions::default().with_max_depth(3)).unwrap_err();

    let LoweringError::NestingTooDeep { limit, span } = error;
    assert_eq!(limit, 3);
    assert!(span.end <= source.contents.len());

    assert!(generate_with_options(&program, LoweringOptions::default()).is_ok());
}

#[test]
fn error_spans_resolve_to_source_positions() {
    let source = SourceFile::memory("int x;\nx = (1 + ;\n");
    let error = compile_to_tac(&source).unwrap_err();

    assert_eq!(source.format_span_position(error.span()), "<memory>:2:10");
}
