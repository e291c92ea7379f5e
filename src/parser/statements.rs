//! Statement parsing implementation
//!
//! This module handles parsing of all G0 statement types:
//!
//! - Assignments: `x = expr;`
//! - Call statements: `f(a, b);`
//! - Control flow: `if`, `if`/`else`, `while`
//! - `return` with an optional value
//! - Blocks `{ ... }` and the empty statement `;`
//!
//! # Grammar
//!
//! ```text
//! stmt ::= IDENT "=" arith ";" | IDENT "(" [ args ] ")" ";"
//!        | "if" "(" bool ")" stmt [ "else" stmt ]
//!        | "while" "(" bool ")" stmt
//!        | "return" [ arith ] ";"
//!        | "{" { stmt } "}" | ";"
//! ```
//!
//! An `else` is taken by the innermost `if` still being parsed, so a dangling
//! `else` binds to the nearest unmatched `if`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::symbols::SymbolKind;

impl Parser {
    /// True if the current token can begin a statement.
    pub(crate) fn starts_statement(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Ident
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::LBrace
                | TokenKind::Semicolon
        )
    }

    /// Parse statements until a token that cannot start one, as a `Seq` chain.
    pub(crate) fn parse_statement_list(&mut self, line: usize) -> Result<NodeId, ParseError> {
        let mut statements = Vec::new();

        while self.starts_statement() {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok(self.ast.sequence_from(statements, line))
    }

    /// Parse a statement. The empty statement yields `None`.
    pub(crate) fn parse_statement(&mut self) -> Result<Option<NodeId>, ParseError> {
        self.nested(Self::parse_statement_body)
    }

    fn parse_statement_body(&mut self) -> Result<Option<NodeId>, ParseError> {
        match self.current.kind {
            TokenKind::Ident => self.parse_assignment_or_call().map(Some),
            TokenKind::If => self.parse_if_statement().map(Some),
            TokenKind::While => self.parse_while_statement().map(Some),
            TokenKind::Return => self.parse_return_statement().map(Some),
            TokenKind::LBrace => {
                let open = self.advance()?;
                let block = self.parse_statement_list(open.line)?;
                self.expect_rbrace("after block")?;
                Ok(Some(block))
            }
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(None)
            }
            _ => Err(self.syntax_error("a statement")),
        }
    }

    /// Parse the single statement an `if` or `while` requires.
    fn parse_branch(&mut self) -> Result<NodeId, ParseError> {
        let line = self.current.line;
        match self.parse_statement()? {
            Some(statement) => Ok(statement),
            None => Ok(self.ast.push(Node::Empty, line)),
        }
    }

    /// Parse `x = expr;` or `f(args);`, decided by the token after the name.
    fn parse_assignment_or_call(&mut self) -> Result<NodeId, ParseError> {
        let name = self.advance()?;

        if self.match_token(TokenKind::Assign)? {
            let symbol = self.resolve_use(&name, SymbolKind::Variable)?;
            let target = self.ast.push(
                Node::Ident {
                    name: name.lexeme.clone(),
                    symbol,
                },
                name.line,
            );
            let value = self.parse_arith()?;
            self.expect_semicolon("after assignment")?;

            return Ok(self.ast.push(Node::Assign { target, value }, name.line));
        }

        if !self.check(TokenKind::LParen) {
            return Err(self.syntax_error("'=' or '(' after identifier"));
        }

        let call = self.parse_call(name)?;
        self.expect_semicolon("after function call")?;
        Ok(call)
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance()?;

        self.expect_lparen("after 'if'")?;
        let cond = self.parse_condition()?;
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_branch()?;

        let else_branch = if self.match_token(TokenKind::Else)? {
            Some(self.parse_branch()?)
        } else {
            None
        };

        Ok(self.ast.push(
            Node::If {
                cond,
                then_branch,
                else_branch,
            },
            keyword.line,
        ))
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance()?;

        self.expect_lparen("after 'while'")?;
        let cond = self.parse_condition()?;
        self.expect_rparen("after while condition")?;

        let body = self.parse_branch()?;

        Ok(self.ast.push(Node::While { cond, body }, keyword.line))
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance()?;

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_arith()?)
        };

        self.expect_semicolon("after return")?;

        Ok(self.ast.push(Node::Return { value }, keyword.line))
    }
}
