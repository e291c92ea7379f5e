//! Lexer (tokenizer) for G0 source code
//!
//! Produces one [`Token`] per call to [`Lexer::next_token`] using maximal
//! munch: the candidate buffer grows one character at a time while at least
//! one pattern is still consistent with it, and the longest prefix that
//! completely matches a pattern becomes the token. Characters read past that
//! prefix are pushed back by rewinding the cursor, so backtracking never
//! reaches into a previously finalized token.
//!
//! Whitespace and `/* ... */` comments are skipped between tokens. A comment
//! opener without a matching `*/` is not an error: the consumed text is pushed
//! back and lexed as ordinary tokens.

use std::fmt;

use thiserror::Error;
use tracing::trace;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Dynamic classes
    Ident,
    IntConst,

    // Keywords
    Int,
    If,
    Else,
    While,
    Return,

    // Operators
    Assign, // =
    EqEq,   // ==
    NotEq,  // !=
    Gt,     // >
    Ge,     // >=
    Lt,     // <
    Le,     // <=
    AndAnd, // &&
    OrOr,   // ||
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;

    // End of input
    Eof,

    /// Text that matches no pattern. Never returned by [`Lexer::next_token`];
    /// only used to describe the offending input of a [`LexError`].
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Ident => "identifier",
            TokenKind::IntConst => "integer constant",
            TokenKind::Int => "'int'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::Return => "'return'",
            TokenKind::Assign => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Eof => "end of file",
            TokenKind::Unknown => "unrecognized input",
        };
        f.write_str(name)
    }
}

/// Fixed-string patterns. An exact-length match against one of these beats
/// the identifier class, which is how keywords are told apart from names.
const FIXED_PATTERNS: &[(&str, TokenKind)] = &[
    ("int", TokenKind::Int),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("return", TokenKind::Return),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    (">=", TokenKind::Ge),
    ("<=", TokenKind::Le),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    (">", TokenKind::Gt),
    ("<", TokenKind::Lt),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    ("=", TokenKind::Assign),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
];

/// A single lexed token.
///
/// `value` is only meaningful for [`TokenKind::IntConst`] and is zero for
/// every other kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub value: i32,
    pub line: usize,
}

impl Token {
    fn eof(line: usize) -> Self {
        Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            value: 0,
            line,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::IntConst => write!(f, "integer constant {}", self.lexeme),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Lexer error: no pattern matches the input at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {line}: unrecognized input '{lexeme}'")]
pub struct LexError {
    pub line: usize,
    pub lexeme: String,
}

/// Bit `i` stands for `FIXED_PATTERNS[i]`.
const ALL_FIXED: u32 = (1 << FIXED_PATTERNS.len()) - 1;

/// Working set of patterns still consistent with the candidate buffer.
#[derive(Debug, Clone, Copy)]
struct Candidates {
    fixed: u32,
    ident: bool,
    int_const: bool,
}

impl Candidates {
    fn all() -> Self {
        Self {
            fixed: ALL_FIXED,
            ident: true,
            int_const: true,
        }
    }

    /// Live fixed patterns with their bit index.
    fn live_fixed(self) -> impl Iterator<Item = (usize, &'static str, TokenKind)> {
        FIXED_PATTERNS
            .iter()
            .enumerate()
            .filter(move |&(i, _)| self.fixed & (1 << i) != 0)
            .map(|(i, &(pattern, kind))| (i, pattern, kind))
    }

    /// Candidates that remain consistent once `ch` is appended at `index`.
    fn narrow(self, ch: char, index: usize) -> Self {
        let fixed = self
            .live_fixed()
            .filter(|(_, pattern, _)| pattern[index..].starts_with(ch))
            .fold(0u32, |mask, (i, _, _)| mask | (1 << i));
        let ident = self.ident
            && if index == 0 {
                ch.is_ascii_alphabetic() || ch == '_'
            } else {
                ch.is_ascii_alphanumeric() || ch == '_'
            };
        let int_const = self.int_const && ch.is_ascii_digit();

        Self {
            fixed,
            ident,
            int_const,
        }
    }

    fn is_empty(self) -> bool {
        self.fixed == 0 && !self.ident && !self.int_const
    }

    /// The kind that a buffer of `len` characters completely matches, if any.
    fn complete_match(self, len: usize) -> Option<TokenKind> {
        if let Some((_, _, kind)) = self.live_fixed().find(|(_, pattern, _)| pattern.len() == len) {
            return Some(kind);
        }
        if self.ident {
            return Some(TokenKind::Ident);
        }
        if self.int_const {
            return Some(TokenKind::IntConst);
        }
        None
    }
}

/// Cursor position that can be rewound to.
#[derive(Debug, Clone, Copy)]
struct Mark {
    position: usize,
    line: usize,
}

/// Longest complete match seen so far while extending the buffer.
#[derive(Debug, Clone, Copy)]
struct Accepted {
    kind: TokenKind,
    end: Mark,
    len: usize,
    value: i32,
}

/// Lexer for G0 source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Tokenize the entire input, ending with an [`TokenKind::Eof`] token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Get the next token, or an `Eof` token once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        if self.is_at_end() {
            return Ok(Token::eof(line));
        }

        let mut candidates = Candidates::all();
        let mut buffer = String::new();
        let mut value: i32 = 0;
        let mut accepted: Option<Accepted> = None;

        while let Some(ch) = self.peek() {
            let next = candidates.narrow(ch, buffer.len());
            if next.is_empty() {
                break;
            }
            self.advance();
            buffer.push(ch);
            candidates = next;

            if let Some(digit) = ch.to_digit(10) {
                value = value.wrapping_mul(10).wrapping_add(digit as i32);
            }
            if let Some(kind) = candidates.complete_match(buffer.len()) {
                accepted = Some(Accepted {
                    kind,
                    end: self.mark(),
                    len: buffer.len(),
                    value,
                });
            }
        }

        let Some(accepted) = accepted else {
            if buffer.is_empty() {
                if let Some(ch) = self.advance() {
                    buffer.push(ch);
                }
            }
            return Err(LexError {
                line,
                lexeme: buffer,
            });
        };

        // Push back whatever was read past the longest match.
        self.rewind(accepted.end);
        buffer.truncate(accepted.len);

        let value = if accepted.kind == TokenKind::IntConst {
            accepted.value
        } else {
            0
        };
        trace!(line, kind = %accepted.kind, lexeme = %buffer, "token");

        Ok(Token {
            kind: accepted.kind,
            lexeme: buffer,
            value,
            line,
        })
    }

    /// Skip whitespace and block comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if is_whitespace(ch) => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    if !self.skip_block_comment() {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip a block comment (/* ... */). Returns false, with the cursor and
    /// line counter restored, when the comment is never closed.
    fn skip_block_comment(&mut self) -> bool {
        let start = self.mark();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return true;
            }
            self.advance();
        }

        trace!(line = start.line, "unterminated comment pushed back");
        self.rewind(start);
        false
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
        }
    }

    fn rewind(&mut self, mark: Mark) {
        self.position = mark.position;
        self.line = mark.line;
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
