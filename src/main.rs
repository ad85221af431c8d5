use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use thiserror::Error;

use inumaki::builtins;
use inumaki::interpreter::{Interpreter, RuntimeError};
use inumaki::lexer::{self, LexError};
use inumaki::parser::{self, ParseError};

/// Run inumaki programs from a file, or start an interactive session.
#[derive(Debug, ClapParser)]
#[command(name = "inumaki", version, about)]
struct Cli {
    /// Program to run. Without it an interactive session starts.
    file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum ScriptError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl ScriptError {
    fn suggestion(&self) -> Option<String> {
        match self {
            ScriptError::Lex(error) => error.suggestion(),
            ScriptError::Parse(error) => error.suggestion(),
            ScriptError::Runtime(error) => error.suggestion(),
        }
    }
}

fn execute(interpreter: &mut Interpreter, source: &str) -> Result<(), ScriptError> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse_tokens(tokens)?;
    interpreter.run(&program)?;
    Ok(())
}

fn flush_output(interpreter: &mut Interpreter) {
    for line in interpreter.take_output() {
        println!("{line}");
    }
}

fn report(error: &ScriptError) {
    eprintln!("Error: {error}");
    if let Some(suggestion) = error.suggestion() {
        eprintln!("Suggestion: {suggestion}");
    }
}

fn run_file(path: &PathBuf) -> Result<ExitCode> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Reading {}", path.display()))?;
    let mut interpreter = Interpreter::new(builtins::initial_environment());
    let result = execute(&mut interpreter, &source);
    // Lines produced before a failing statement are still shown.
    flush_output(&mut interpreter);
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            report(&error);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Interactive session. The environment and the cursed-speech counter
/// persist across inputs, so an overload can only be cleared by entering
/// `Cough_Syrup`.
fn run_repl() -> Result<ExitCode> {
    println!("inumaki interactive session. Type 'exit' to leave.");
    let mut interpreter = Interpreter::new(builtins::initial_environment());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("inumaki> ");
        io::stdout().flush().context("Flushing prompt")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Reading input line")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" {
            break;
        }
        let result = execute(&mut interpreter, input);
        flush_output(&mut interpreter);
        if let Err(error) = result {
            report(&error);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match &cli.file {
        Some(path) => run_file(path),
        None => run_repl(),
    }
}
