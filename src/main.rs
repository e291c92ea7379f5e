// g0c: front end for the G0 teaching subset of C

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser as _;
use tracing::info;

use g0c::{parse_source, Lexer, Options};

/// Check a G0 source file and report the first error.
#[derive(clap::Parser, Debug)]
#[command(name = "g0c", version, about, long_about = None)]
struct Cli {
    /// Source file (reads standard input when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Enforce the grammar only; skip symbol table checks
    #[arg(long)]
    no_check: bool,

    /// Print the token stream instead of parsing (debug)
    #[arg(long)]
    tokens: bool,

    /// Print the AST node arena after a successful parse
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let cli = Cli::parse();

    let source = match read_source(&cli) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if cli.tokens {
        print_tokens(&source);
        return;
    }

    let options = Options {
        check_semantics: !cli.no_check,
    };

    match parse_source(&source, options) {
        Ok(program) => {
            info!(
                functions = program.functions().count(),
                globals = program.symbols.globals().count(),
                "program accepted"
            );
            if cli.dump_ast {
                println!("{:#?}", program.ast);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn read_source(cli: &Cli) -> io::Result<String> {
    match &cli.file {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            io::Error::new(e.kind(), format!("cannot read '{}': {}", path.display(), e))
        }),
        None => io::read_to_string(io::stdin()),
    }
}

fn print_tokens(source: &str) {
    match Lexer::new(source).tokenize() {
        Ok(tokens) => {
            for token in &tokens {
                println!("{}\t{}", token.line, token);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
