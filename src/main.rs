use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};

use calcc::{
    CompileError, Diagnostic, IrSink, LoweringOptions, TextSink,
    frontend::{
        SourceFile, SourceFileOrigin,
        ast::Program,
        parser::{DEFAULT_MAX_DEPTH, Parser},
    },
    middle::tac::{ast_lowering::generate_with_options, pretty_print::pretty_print_tac},
};
use clap::{ArgAction, CommandFactory, Parser as ClapParser, ValueEnum, error::ErrorKind};
use colored::Colorize;
use thiserror::Error;
use tracing::{Level, debug, info};

#[derive(Debug, ClapParser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Calc source file to compile
    source_file: PathBuf,

    /// Write plain text output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Emit::Ir)]
    emit: Emit,

    /// Deepest statement or expression nesting accepted
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Log more, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Three-address code
    Ir,
    /// The parse tree
    Ast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("failed to write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to write to stdout: {0}")]
    Stdout(#[source] io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose);

    match args.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {}
    }

    if !args.source_file.exists() {
        Args::command()
            .error(
                ErrorKind::InvalidValue,
                format!(
                    "Source file '{}' does not exist!",
                    args.source_file.display()
                ),
            )
            .exit()
    }

    if !args.source_file.is_file() {
        Args::command()
            .error(
                ErrorKind::InvalidValue,
                format!("Input path '{}' is not a file!", args.source_file.display()),
            )
            .exit()
    }

    let contents = match std::fs::read_to_string(&args.source_file) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!(
                "{} failed to read '{}': {error}",
                "error:".red().bold(),
                args.source_file.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let source_file = SourceFile {
        contents,
        origin: SourceFileOrigin::File(args.source_file.clone()),
    };

    match run(&args, &source_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_error(&source_file, &error);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args, source_file: &SourceFile) -> Result<(), CliError> {
    let program = Parser::new(source_file)
        .with_max_depth(args.max_depth)
        .parse()
        .map_err(CompileError::from)?;

    info!(
        origin = %source_file.origin,
        statements = program.statements.len(),
        "parsed source file"
    );

    match args.emit {
        Emit::Ast => emit_ast(args, &program),
        Emit::Ir => {
            let diagnostics = emit_ir(args, &program)?;

            for diagnostic in &diagnostics {
                report_diagnostic(source_file, diagnostic);
            }

            Ok(())
        }
    }
}

fn emit_ast(args: &Args, program: &Program) -> Result<(), CliError> {
    let tree = format!("{program:#?}\n");

    match &args.output {
        Some(path) => std::fs::write(path, tree).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        }),
        None => io::stdout()
            .lock()
            .write_all(tree.as_bytes())
            .map_err(CliError::Stdout),
    }
}

/// Prints the colored listing to stdout, or writes plain text to the output
/// file once the whole program has been lowered
fn emit_ir(args: &Args, program: &Program) -> Result<Vec<Diagnostic>, CliError> {
    let options = LoweringOptions::default().with_max_depth(args.max_depth);
    let generation = generate_with_options(program, options).map_err(CompileError::from)?;

    let Some(path) = &args.output else {
        pretty_print_tac(&mut io::stdout().lock(), &generation.instructions)
            .map_err(CliError::Stdout)?;

        return Ok(generation.diagnostics);
    };

    let write_error = |source: io::Error| CliError::Write {
        path: path.clone(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut sink = TextSink::new(BufWriter::new(file));

    for instruction in generation.instructions {
        sink.emit(instruction);
    }

    let written = sink.written();
    sink.finish().map_err(write_error)?;

    info!(path = %path.display(), instructions = written, "wrote IR");

    Ok(generation.diagnostics)
}

fn report_error(source_file: &SourceFile, error: &CliError) {
    eprintln!("{} {error}", "error:".red().bold());

    if let CliError::Compile(error) = error {
        let span = error.span();

        eprintln!(
            "{} {}",
            "-->".blue(),
            source_file.format_span_position(span)
        );
        eprintln!("{}", source_file.highlight_span(span));
    }
}

fn report_diagnostic(source_file: &SourceFile, diagnostic: &Diagnostic) {
    debug!(name = %diagnostic.name, kind = ?diagnostic.kind, "reporting diagnostic");

    eprintln!("{} {diagnostic}", "warning:".yellow().bold());
    eprintln!(
        "{} {}",
        "-->".blue(),
        source_file.format_span_position(diagnostic.span)
    );
    eprintln!("{}", source_file.highlight_span(diagnostic.span));
}
