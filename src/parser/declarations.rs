//! Declaration parsing implementation
//!
//! This module handles everything introduced by the `int` keyword:
//!
//! - Global variable declarations: `int a;`, `int a, b, c;`
//! - Function definitions: `int name(int x, int y) { locals stmts }`
//! - Formal parameters and local variable declarations
//!
//! Declarations only register Symbol Table entries; they never become AST
//! nodes. A function definition becomes a `FunctionDef` node.
//!
//! # Grammar
//!
//! ```text
//! top_level  ::= "int" IDENT ( decl_rest | func_rest )
//! decl_rest  ::= { "," IDENT } ";"
//! func_rest  ::= "(" [ formals ] ")" "{" { var_decl } { stmt } "}"
//! formals    ::= "int" IDENT { "," "int" IDENT }
//! var_decl   ::= "int" IDENT { "," IDENT } ";"
//! ```

use tracing::debug;

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser};
use crate::parser::symbols::{Scope, SymbolId, SymbolKind};

impl Parser {
    /// Parse a top-level declaration or function definition.
    ///
    /// One token after the name decides: `;` or `,` continue a variable
    /// declaration, anything else must start a function definition.
    pub(crate) fn parse_top_level_declaration(&mut self) -> Result<Option<NodeId>, ParseError> {
        let keyword = self.expect_token(TokenKind::Int, "at start of declaration")?;
        let name = self.expect_identifier("after 'int'")?;

        match self.current.kind {
            TokenKind::Semicolon | TokenKind::Comma => {
                self.parse_global_declaration(name)?;
                Ok(None)
            }
            _ => self.parse_function_definition(name, keyword.line).map(Some),
        }
    }

    /// Parse the rest of `int a, b, c;` after the first name.
    fn parse_global_declaration(&mut self, first: Token) -> Result<(), ParseError> {
        self.declare(&first, SymbolKind::Variable, 0, Scope::Global)?;
        let mut count = 1;

        while self.match_token(TokenKind::Comma)? {
            let name = self.expect_identifier("after ','")?;
            self.declare(&name, SymbolKind::Variable, 0, Scope::Global)?;
            count += 1;
        }
        self.expect_semicolon("after declaration")?;

        debug!(count, line = first.line, "declared globals");
        Ok(())
    }

    /// Parse function definition: int name(formals) { locals statements }
    fn parse_function_definition(
        &mut self,
        name: Token,
        line: usize,
    ) -> Result<NodeId, ParseError> {
        self.expect_lparen("after function name")?;

        self.symbols.enter_function_scope();
        let params = self.parse_parameter_list()?;

        // Declared before the body so the function can call itself.
        let symbol = self.declare(&name, SymbolKind::Function, params.len(), Scope::Global)?;

        self.expect_rparen("after parameters")?;
        let open = self.expect_lbrace("before function body")?;

        self.parse_local_declarations()?;
        let body = self.parse_statement_list(open.line)?;

        self.expect_rbrace("after function body")?;
        self.symbols.exit_function_scope();

        debug!(name = %name.lexeme, arity = params.len(), line, "parsed function definition");

        Ok(self.ast.push(
            Node::FunctionDef {
                symbol,
                params,
                body,
            },
            line,
        ))
    }

    /// Parse parameter list: int name, int name, ...
    fn parse_parameter_list(&mut self) -> Result<Vec<SymbolId>, ParseError> {
        let mut params = Vec::new();

        if !self.check(TokenKind::Int) {
            return Ok(params);
        }

        loop {
            self.expect_token(TokenKind::Int, "before parameter name")?;
            let name = self.expect_identifier("as parameter name")?;
            params.push(self.declare(&name, SymbolKind::Variable, 0, Scope::Local)?);

            if !self.match_token(TokenKind::Comma)? {
                break;
            }
        }

        Ok(params)
    }

    /// Parse local variable declarations at the top of a function body.
    fn parse_local_declarations(&mut self) -> Result<(), ParseError> {
        while self.match_token(TokenKind::Int)? {
            loop {
                let name = self.expect_identifier("in declaration")?;
                self.declare(&name, SymbolKind::Variable, 0, Scope::Local)?;

                if !self.match_token(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect_semicolon("after declaration")?;
        }
        Ok(())
    }
}
