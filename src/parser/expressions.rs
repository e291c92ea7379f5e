//! Expression parsing implementation
//!
//! Arithmetic expressions are parsed with one procedure per precedence level;
//! conditions are relational comparisons joined by `&&` and `||`.
//!
//! # Grammar
//!
//! ```text
//! bool   ::= conj { "||" conj }
//! conj   ::= rel { "&&" rel }
//! rel    ::= arith relop arith
//! arith  ::= term { ( "+" | "-" ) term }
//! term   ::= factor { ( "*" | "/" ) factor }
//! factor ::= IDENT | IDENT "(" [ args ] ")" | INTCON | "(" arith ")" | "-" factor
//! args   ::= arith { "," arith }
//! ```
//!
//! Every binary level is left-associative.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ErrorKind, ParseError, Parser};
use crate::parser::symbols::SymbolKind;

impl Parser {
    /// True if the current token can begin an arithmetic expression.
    pub(crate) fn starts_expression(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Ident | TokenKind::IntConst | TokenKind::LParen | TokenKind::Minus
        )
    }

    /// Parse a condition (`if` / `while`)
    pub(crate) fn parse_condition(&mut self) -> Result<NodeId, ParseError> {
        self.nested(Self::parse_disjunction)
    }

    /// Parse logical OR (||)
    fn parse_disjunction(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_conjunction()?;

        while self.match_token(TokenKind::OrOr)? {
            let right = self.parse_conjunction()?;
            left = self.binary(BinOp::Or, left, right);
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_conjunction(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_relational()?;

        while self.match_token(TokenKind::AndAnd)? {
            let right = self.parse_relational()?;
            left = self.binary(BinOp::And, left, right);
        }

        Ok(left)
    }

    /// Parse a comparison: arith relop arith
    fn parse_relational(&mut self) -> Result<NodeId, ParseError> {
        let left = self.parse_arith()?;

        let op = match self.current.kind {
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::NotEq => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Le => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Ge => BinOp::Ge,
            _ => return Err(self.syntax_error("a relational operator")),
        };
        self.advance()?;

        let right = self.parse_arith()?;
        Ok(self.binary(op, left, right))
    }

    /// Parse additive expression (+ -)
    pub(crate) fn parse_arith(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_term()?;
            left = self.binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplicative expression (* /)
    fn parse_term(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_factor()?;
            left = self.binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<NodeId, ParseError> {
        self.nested(Self::parse_factor_body)
    }

    fn parse_factor_body(&mut self) -> Result<NodeId, ParseError> {
        match self.current.kind {
            TokenKind::Ident => {
                let name = self.advance()?;
                if self.check(TokenKind::LParen) {
                    return self.parse_call(name);
                }

                let symbol = self.resolve_use(&name, SymbolKind::Variable)?;
                Ok(self.ast.push(
                    Node::Ident {
                        name: name.lexeme,
                        symbol,
                    },
                    name.line,
                ))
            }
            TokenKind::IntConst => {
                let literal = self.advance()?;
                Ok(self.ast.push(Node::IntConst(literal.value), literal.line))
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_arith()?;
                self.expect_rparen("after expression")?;
                Ok(inner)
            }
            TokenKind::Minus => {
                let minus = self.advance()?;
                let operand = self.parse_factor()?;
                Ok(self.ast.push(Node::Neg { operand }, minus.line))
            }
            _ => Err(self.syntax_error("an expression")),
        }
    }

    /// Parse a call after its name: "(" [ args ] ")"
    ///
    /// The argument count is checked as each argument completes, so
    /// over-application fails at the first surplus argument; the final count
    /// is checked again after the closing parenthesis.
    pub(crate) fn parse_call(&mut self, name: Token) -> Result<NodeId, ParseError> {
        self.expect_lparen("after function name")?;

        let callee = self.resolve_use(&name, SymbolKind::Function)?;
        let expected = callee
            .filter(|_| self.options.check_semantics)
            .map(|id| self.symbols.get(id).arity);

        let mut args = Vec::new();
        if self.starts_expression() {
            loop {
                args.push(self.parse_arith()?);
                if let Some(expected) = expected {
                    if args.len() > expected {
                        return Err(arity_error(&name, expected, args.len()));
                    }
                }

                if !self.match_token(TokenKind::Comma)? {
                    break;
                }
            }
        }

        if let Some(expected) = expected {
            if args.is_empty() && expected > 0 {
                return Err(arity_error(&name, expected, 0));
            }
        }

        self.expect_rparen("after arguments")?;

        if let Some(expected) = expected {
            if args.len() != expected {
                return Err(arity_error(&name, expected, args.len()));
            }
        }

        Ok(self.ast.push(
            Node::Call {
                name: name.lexeme,
                callee,
                args,
            },
            name.line,
        ))
    }

    fn binary(&mut self, op: BinOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let line = self.ast.line(lhs);
        self.ast.push(Node::Binary { op, lhs, rhs }, line)
    }
}

fn arity_error(name: &Token, expected: usize, found: usize) -> ParseError {
    Parser::semantic_error(
        name,
        ErrorKind::ArityMismatch {
            name: name.lexeme.clone(),
            expected,
            found,
        },
    )
}
