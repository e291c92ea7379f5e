//! # Introduction
//!
//! g0c is the front end of a compiler for G0, a small C-like teaching
//! language. It turns source text into an abstract syntax tree whose names are
//! resolved against a scoped symbol table, and rejects the first lexical,
//! syntax or semantic error it finds.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser (+ Symbol Table) → Program { AST, symbols }
//! ```
//!
//! 1. [`parser::lexer`]: maximal-munch tokenizer, one token per call.
//! 2. [`parser::symbols`]: Global scope plus one function-local scope.
//! 3. [`parser::parse`]: recursive descent parser that checks declarations,
//!    uses, kinds and call arity while it builds the tree.
//! 4. [`parser::ast`]: arena of tagged nodes addressed by index, ready for a
//!    later code generation pass.
//!
//! ## Example
//!
//! ```
//! use g0c::{parse_source, Options};
//!
//! let program = parse_source("int f(int x) { int y; y = x; return y; }", Options::default())
//!     .expect("valid program");
//! assert_eq!(program.functions().count(), 1);
//! ```

pub mod parser;

pub use parser::ast::{Ast, BinOp, Node, NodeId, Program};
pub use parser::lexer::{LexError, Lexer, Token, TokenKind};
pub use parser::parse::{ErrorKind, Options, ParseError, Parser, MAX_NESTING_DEPTH};
pub use parser::symbols::{LookupMode, Scope, Symbol, SymbolId, SymbolKind, SymbolTable};

/// Parse and check a whole source unit.
#[tracing::instrument(skip_all, fields(source_len = source.len(), check = options.check_semantics))]
pub fn parse_source(source: &str, options: Options) -> Result<Program, ParseError> {
    let program = Parser::new(source, options)?.parse_program()?;
    tracing::debug!(
        functions = program.functions().count(),
        nodes = program.ast.len(),
        "parse finished"
    );
    Ok(program)
}
