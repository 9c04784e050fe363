//! Prim CLI.
//!
//! Commands:
//! - `prim run <file.prim>` — interpret the program; `main`'s Integer
//!   result becomes the process exit code
//! - `prim check <file.prim>` — parse and statically analyze
//! - `prim parse <file.prim>` — print the syntax tree

use std::process::ExitCode;

use prim_eval::{StdoutPrintHandler, Value};
use prim_ir::StringInterner;
use primc::{check_source, dump_program, parse_source, run_source};

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(2);
    }

    match args[1].as_str() {
        "run" => with_source(&args, run_command),
        "check" => with_source(&args, check_command),
        "parse" => with_source(&args, parse_command),
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("error: unknown command `{other}`");
            print_usage();
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("Usage: prim <command> <file.prim>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run    <file>   Interpret the program");
    eprintln!("  check  <file>   Parse and statically analyze");
    eprintln!("  parse  <file>   Print the syntax tree");
}

/// Read the file argument and hand its contents to `command`.
fn with_source(args: &[String], command: fn(&str) -> ExitCode) -> ExitCode {
    let Some(path) = args.get(2) else {
        eprintln!("error: missing file path");
        print_usage();
        return ExitCode::from(2);
    };
    match std::fs::read_to_string(path) {
        Ok(source) => command(&source),
        Err(error) => {
            eprintln!("error: cannot read `{path}`: {error}");
            ExitCode::from(2)
        }
    }
}

fn run_command(source: &str) -> ExitCode {
    let interner = StringInterner::new();
    let handler = StdoutPrintHandler;
    match run_source(source, &interner, &handler) {
        // main's Integer result is the process exit code.
        Ok(Value::Int(code)) => ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX)),
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(diagnostic) => {
            eprintln!("{}", diagnostic.render(Some(source)));
            ExitCode::FAILURE
        }
    }
}

fn check_command(source: &str) -> ExitCode {
    let interner = StringInterner::new();
    match check_source(source, &interner) {
        Ok(_) => ExitCode::SUCCESS,
        Err(diagnostic) => {
            eprintln!("{}", diagnostic.render(Some(source)));
            ExitCode::FAILURE
        }
    }
}

fn parse_command(source: &str) -> ExitCode {
    let interner = StringInterner::new();
    match parse_source(source, &interner) {
        Ok(out) => {
            print!("{}", dump_program(&out, &interner));
            ExitCode::SUCCESS
        }
        Err(diagnostic) => {
            eprintln!("{}", diagnostic.render(Some(source)));
            ExitCode::FAILURE
        }
    }
}
