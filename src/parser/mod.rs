//! G0 source code front end
//!
//! This module transforms G0 source text into a checked Abstract Syntax Tree:
//! - [`lexer`]: Tokenization (source text → tokens, one at a time)
//! - [`symbols`]: Global and function-local scopes
//! - [`parse`]: Parsing with inline name resolution (tokens → AST)
//! - [`ast`]: AST node definitions and the node arena
//!
//! # Supported language
//!
//! G0 is a small subset of C:
//! - Types: `int` only; global variables, functions, parameters and locals
//! - Statements: assignment, call, `if`/`else`, `while`, `return`, blocks
//! - Expressions: `+ - * /`, unary `-`, calls; conditions compare with
//!   `== != < <= > >=` and combine with `&&` and `||`
//! - Comments: `/* ... */` only
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with one token of lookahead. Name resolution
//! and arity checks run while the tree is built; the first error stops the
//! parse.

pub mod ast;
pub mod lexer;
pub mod parse;
pub mod symbols;

mod declarations;
mod expressions;
mod statements;
