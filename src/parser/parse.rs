//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, options, helper methods, and the main parse entry
//! point.
//!
//! # Parser Architecture
//!
//! The Parser is a one-token-lookahead recursive descent parser that resolves
//! names and builds the AST in the same pass:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: global declarations, function definitions, formals, locals
//! - `statements`: assignments, calls, `if`, `while`, `return`, blocks
//! - `expressions`: arithmetic and boolean expressions, calls
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks.
//! The parser pulls tokens from the [`Lexer`] one at a time and owns the
//! [`SymbolTable`] and [`Ast`] it is filling, so there is no state outside the
//! parser value. Every procedure returns `Result` and the first error ends the
//! parse.

use thiserror::Error;

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use crate::parser::symbols::{
    LookupMode, Scope, SymbolError, SymbolId, SymbolKind, SymbolTable,
};

/// Deepest nesting of statements, conditions and factors the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Run symbol-table checks (duplicate, undefined, kind and arity). When
    /// off, only the grammar is enforced.
    pub check_semantics: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            check_semantics: true,
        }
    }
}

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("no token pattern matches this input")]
    Lexical,

    #[error("expected {expected}")]
    Syntax { expected: String },

    #[error("symbol '{name}' previously declared in this scope")]
    DuplicateDeclaration { name: String },

    #[error("symbol '{name}' undefined")]
    UndefinedSymbol { name: String },

    #[error("'{name}' declared as a {declared} but used as a {used}")]
    KindMismatch {
        name: String,
        declared: SymbolKind,
        used: SymbolKind,
    },

    #[error("wrong number of arguments to '{name}': expected {expected}, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Parser error type: the first lexical, syntax or semantic error found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error at line {line}, token {token}, lexeme '{lexeme}': {kind}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub line: usize,
    pub token: TokenKind,
    pub lexeme: String,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            kind: ErrorKind::Lexical,
            line: err.line,
            token: TokenKind::Unknown,
            lexeme: err.lexeme,
        }
    }
}

/// Recursive descent parser for G0
pub struct Parser {
    lexer: Lexer,
    pub(crate) current: Token,
    pub(crate) symbols: SymbolTable,
    pub(crate) ast: Ast,
    pub(crate) options: Options,
    depth: usize,
}

impl Parser {
    pub fn new(source: &str, options: Options) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            symbols: SymbolTable::new(),
            ast: Ast::new(),
            options,
            depth: 0,
        })
    }

    /// Parse the entire program (top-level declarations and definitions)
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let line = self.current.line;
        let mut functions = Vec::new();

        while self.check(TokenKind::Int) {
            if let Some(function) = self.parse_top_level_declaration()? {
                functions.push(function);
            }
        }

        if !self.is_at_end() {
            return Err(self.syntax_error("'int' or end of file"));
        }

        let root = self.ast.sequence_from(functions, line);
        Ok(Program {
            ast: self.ast,
            root,
            symbols: self.symbols,
        })
    }

    // ===== Helper methods =====

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consume the current token and return it.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        ctx: &str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.syntax_error(format!("{kind} {ctx}")))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect_token(TokenKind::LParen, ctx)
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect_token(TokenKind::RParen, ctx)
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect_token(TokenKind::LBrace, ctx)
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect_token(TokenKind::RBrace, ctx)
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect_token(TokenKind::Semicolon, ctx)
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<Token, ParseError> {
        self.expect_token(TokenKind::Ident, ctx)
    }

    /// Error at the current token.
    pub(crate) fn syntax_error(&self, expected: impl Into<String>) -> ParseError {
        ParseError {
            kind: ErrorKind::Syntax {
                expected: expected.into(),
            },
            line: self.current.line,
            token: self.current.kind,
            lexeme: self.current.lexeme.clone(),
        }
    }

    /// Run `parse` one nesting level deeper.
    ///
    /// Fails at the current token once [`MAX_NESTING_DEPTH`] levels are open.
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError {
                kind: ErrorKind::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                },
                line: self.current.line,
                token: self.current.kind,
                lexeme: self.current.lexeme.clone(),
            });
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Error anchored at the identifier it concerns.
    pub(crate) fn semantic_error(name: &Token, kind: ErrorKind) -> ParseError {
        ParseError {
            kind,
            line: name.line,
            token: name.kind,
            lexeme: name.lexeme.clone(),
        }
    }

    // ===== Symbol table access =====

    /// Declare the identifier `name` in `scope`.
    ///
    /// With semantic checks off a duplicate resolves to the existing entry.
    pub(crate) fn declare(
        &mut self,
        name: &Token,
        kind: SymbolKind,
        arity: usize,
        scope: Scope,
    ) -> Result<SymbolId, ParseError> {
        match self.symbols.declare(&name.lexeme, kind, arity, scope) {
            Ok(id) => Ok(id),
            Err(SymbolError::Duplicate { existing, .. }) if !self.options.check_semantics => {
                Ok(existing)
            }
            Err(SymbolError::Duplicate { name: dup, .. }) => Err(Self::semantic_error(
                name,
                ErrorKind::DuplicateDeclaration { name: dup },
            )),
            Err(err @ SymbolError::NoActiveScope) => Err(Self::semantic_error(
                name,
                ErrorKind::Syntax {
                    expected: err.to_string(),
                },
            )),
        }
    }

    /// Resolve a use of `name` as `used`, Local scope first.
    ///
    /// Returns `None` only when semantic checks are off and the name is
    /// unknown.
    pub(crate) fn resolve_use(
        &self,
        name: &Token,
        used: SymbolKind,
    ) -> Result<Option<SymbolId>, ParseError> {
        let found = self
            .symbols
            .lookup(&name.lexeme, LookupMode::LocalThenGlobal);
        if !self.options.check_semantics {
            return Ok(found);
        }

        let id = found.ok_or_else(|| {
            Self::semantic_error(
                name,
                ErrorKind::UndefinedSymbol {
                    name: name.lexeme.clone(),
                },
            )
        })?;

        let declared = self.symbols.get(id).kind;
        if declared != used {
            return Err(Self::semantic_error(
                name,
                ErrorKind::KindMismatch {
                    name: name.lexeme.clone(),
                    declared,
                    used,
                },
            ));
        }

        Ok(Some(id))
    }
}
