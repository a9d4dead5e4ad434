use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use tracing_subscriber::EnvFilter;
use treelox::{parse, scan, AstPrinter, Error, ErrorPhase, Interpreter, InterpreterConfig, Stmt};

// sysexits.h
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_NOINPUT: u8 = 66;
const EX_SOFTWARE: u8 = 70;

/// treelox runs Lox scripts, or starts an interactive prompt when no script
/// is given.
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print each parsed statement as an S-expression instead of running it.
    #[arg(long)]
    dump_ast: bool,

    /// Print the scanned tokens as JSON instead of running the program.
    #[arg(long, conflicts_with = "dump_ast")]
    tokens: bool,

    /// Script to run.
    script: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Run,
    DumpAst,
    Tokens,
}

impl From<&Args> for Mode {
    fn from(args: &Args) -> Self {
        if args.tokens {
            Mode::Tokens
        } else if args.dump_ast {
            Mode::DumpAst
        } else {
            Mode::Run
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EX_USAGE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mode = Mode::from(&args);
    let result = match &args.script {
        Some(path) => run_file(path, mode),
        None => run_prompt(mode),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("treelox: {:#}", e);
            ExitCode::from(EX_SOFTWARE)
        }
    }
}

fn run_file(path: &Path, mode: Mode) -> anyhow::Result<ExitCode> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("treelox: failed to read '{}': {}", path.display(), e);
            return Ok(ExitCode::from(EX_NOINPUT));
        }
    };
    tracing::debug!(path = %path.display(), bytes = source.len(), "running script");

    let mut interpreter = Interpreter::new().with_config(InterpreterConfig::from_env());
    let errors = process(&source, mode, &mut interpreter, false)?;
    report(&errors);

    let code = match errors.first().map(Error::phase) {
        None => ExitCode::SUCCESS,
        Some(ErrorPhase::Lex | ErrorPhase::Parse) => ExitCode::from(EX_DATAERR),
        Some(ErrorPhase::Runtime) => ExitCode::from(EX_SOFTWARE),
    };
    Ok(code)
}

fn run_prompt(mode: Mode) -> anyhow::Result<ExitCode> {
    let mut interpreter = Interpreter::new().with_config(InterpreterConfig::from_env());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("failed to flush prompt")?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(ExitCode::SUCCESS);
        };
        let line = line.context("failed to read from stdin")?;

        let errors = process(&line, mode, &mut interpreter, true)?;
        report(&errors);
    }
}

/// Handles one unit of source: a whole script or a single REPL line.
///
/// Nothing executes when scanning or parsing reported anything. With `echo`,
/// the value of each expression statement is printed.
fn process(
    source: &str,
    mode: Mode,
    interpreter: &mut Interpreter,
    echo: bool,
) -> anyhow::Result<Vec<Error>> {
    let (tokens, mut errors) = scan(source);

    if let Mode::Tokens = mode {
        let json = serde_json::to_string_pretty(&tokens).context("failed to encode tokens")?;
        println!("{}", json);
        return Ok(errors);
    }

    let (statements, parse_errors) = parse(tokens);
    errors.extend(parse_errors);
    if !errors.is_empty() {
        return Ok(errors);
    }

    match mode {
        Mode::DumpAst => {
            let printer = AstPrinter::new();
            for stmt in &statements {
                println!("{}", printer.print_stmt(stmt));
            }
            Ok(errors)
        }
        Mode::Run if echo => Ok(execute_echoing(&statements, interpreter)),
        _ => Ok(interpreter.interpret(&statements)),
    }
}

fn execute_echoing(statements: &[Stmt], interpreter: &mut Interpreter) -> Vec<Error> {
    let mut errors = Vec::new();
    for stmt in statements {
        match interpreter.execute(stmt) {
            Ok(Some(value)) => println!("{}", value),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    errors
}

fn report(errors: &[Error]) {
    for error in errors {
        eprintln!("{}", error);
    }
}
