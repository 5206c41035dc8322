//! Lexer for Go source, including the automatic semicolon insertion rule.
//!
//! The token stream is complete enough to parse top-level declarations
//! precisely and to scan declaration interiors for identifier use-sites;
//! operators that never shape structure collapse into a single category.

use crate::model::Position;
use crate::syntax::token::{Token, TokenType};
use crate::syntax::SyntaxError;

pub struct Lexer<'src> {
    chars: Vec<(usize, char)>,
    index: usize,
    line: u32,
    line_start: usize,
    src_len: usize,
    source: &'src str,
    last: Option<(TokenType, bool)>,
    errors: Vec<SyntaxError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.char_indices().collect(),
            index: 0,
            line: 1,
            line_start: 0,
            src_len: source.len(),
            source,
            last: None,
            errors: Vec::new(),
        }
    }

    /// Lex the whole source. Errors are collected rather than aborting so a
    /// file yields as many tokens as it can.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<SyntaxError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.ty == TokenType::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn next_token(&mut self) -> Token {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('\n') => {
                    if self.needs_semi() {
                        return self.insert_semi();
                    }
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    if self.skip_block_comment() && self.needs_semi() {
                        return self.insert_semi();
                    }
                }
                None => {
                    if self.needs_semi() {
                        return self.insert_semi();
                    }
                    let pos = self.position();
                    return Token::new(TokenType::Eof, "", pos, pos);
                }
                _ => break,
            }
        }

        let start = self.position();
        let start_index = self.index;
        let c = self.advance().unwrap();

        let token = match c {
            '(' => self.punct(TokenType::LParen, start, start_index),
            ')' => self.punct(TokenType::RParen, start, start_index),
            '{' => self.punct(TokenType::LBrace, start, start_index),
            '}' => self.punct(TokenType::RBrace, start, start_index),
            '[' => self.punct(TokenType::LBracket, start, start_index),
            ']' => self.punct(TokenType::RBracket, start, start_index),
            ',' => self.punct(TokenType::Comma, start, start_index),
            ';' => self.punct(TokenType::Semi, start, start_index),
            '.' => {
                if self.peek() == Some('.') && self.peek_at(1) == Some('.') {
                    self.advance();
                    self.advance();
                    self.punct(TokenType::Op, start, start_index)
                } else if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.number(start, start_index)
                } else {
                    self.punct(TokenType::Dot, start, start_index)
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.punct(TokenType::Op, start, start_index)
                } else {
                    self.punct(TokenType::Assign, start, start_index)
                }
            }
            '"' => self.interpreted_string(start, start_index),
            '`' => self.raw_string(start, start_index),
            '\'' => self.rune(start, start_index),
            '+' | '-' => {
                if self.peek() == Some(c) || self.peek() == Some('=') {
                    self.advance();
                }
                self.punct(TokenType::Op, start, start_index)
            }
            '*' | '/' | '%' | '^' | '!' | ':' => {
                if self.peek() == Some('=') {
                    self.advance();
                }
                self.punct(TokenType::Op, start, start_index)
            }
            '&' => {
                match self.peek() {
                    Some('&') | Some('=') => {
                        self.advance();
                    }
                    Some('^') => {
                        self.advance();
                        if self.peek() == Some('=') {
                            self.advance();
                        }
                    }
                    _ => {}
                }
                self.punct(TokenType::Op, start, start_index)
            }
            '|' => {
                if matches!(self.peek(), Some('|') | Some('=')) {
                    self.advance();
                }
                self.punct(TokenType::Op, start, start_index)
            }
            '<' => {
                match self.peek() {
                    Some('-') | Some('=') => {
                        self.advance();
                    }
                    Some('<') => {
                        self.advance();
                        if self.peek() == Some('=') {
                            self.advance();
                        }
                    }
                    _ => {}
                }
                self.punct(TokenType::Op, start, start_index)
            }
            '>' => {
                match self.peek() {
                    Some('=') => {
                        self.advance();
                    }
                    Some('>') => {
                        self.advance();
                        if self.peek() == Some('=') {
                            self.advance();
                        }
                    }
                    _ => {}
                }
                self.punct(TokenType::Op, start, start_index)
            }
            '~' => self.punct(TokenType::Op, start, start_index),
            c if c.is_ascii_digit() => self.number(start, start_index),
            c if c.is_alphabetic() || c == '_' => self.ident(start, start_index),
            other => {
                self.errors.push(SyntaxError {
                    message: format!("unexpected character '{}'", other),
                    position: start,
                });
                return self.next_token();
            }
        };

        self.last = Some((token.ty, token.lexeme == "++" || token.lexeme == "--"));
        token
    }

    fn ident(&mut self, start: Position, start_index: usize) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let lexeme = self.lexeme_from(start_index);
        let ty = TokenType::keyword(lexeme).unwrap_or(TokenType::Ident);
        Token::new(ty, lexeme, start, self.position())
    }

    fn number(&mut self, start: Position, start_index: usize) -> Token {
        let mut prev = '0';
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                    prev = c;
                    self.advance();
                }
                Some('.') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    prev = '.';
                    self.advance();
                }
                Some(c @ ('+' | '-')) if matches!(prev, 'e' | 'E' | 'p' | 'P') => {
                    prev = c;
                    self.advance();
                }
                _ => break,
            }
        }
        let lexeme = self.lexeme_from(start_index);
        let ty = if lexeme.ends_with('i') {
            TokenType::ImagLit
        } else if lexeme.contains('.') {
            TokenType::FloatLit
        } else {
            TokenType::IntLit
        };
        Token::new(ty, lexeme, start, self.position())
    }

    fn interpreted_string(&mut self, start: Position, start_index: usize) -> Token {
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('\n') | None => {
                    self.errors.push(SyntaxError {
                        message: "unterminated string literal".into(),
                        position: start,
                    });
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        Token::new(
            TokenType::StringLit,
            self.lexeme_from(start_index),
            start,
            self.position(),
        )
    }

    fn raw_string(&mut self, start: Position, start_index: usize) -> Token {
        loop {
            match self.advance() {
                Some('`') => break,
                Some(_) => {}
                None => {
                    self.errors.push(SyntaxError {
                        message: "unterminated raw string literal".into(),
                        position: start,
                    });
                    break;
                }
            }
        }
        Token::new(
            TokenType::StringLit,
            self.lexeme_from(start_index),
            start,
            self.position(),
        )
    }

    fn rune(&mut self, start: Position, start_index: usize) -> Token {
        loop {
            match self.peek() {
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('\n') | None => {
                    self.errors.push(SyntaxError {
                        message: "unterminated rune literal".into(),
                        position: start,
                    });
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        Token::new(
            TokenType::RuneLit,
            self.lexeme_from(start_index),
            start,
            self.position(),
        )
    }

    fn punct(&mut self, ty: TokenType, start: Position, start_index: usize) -> Token {
        Token::new(ty, self.lexeme_from(start_index), start, self.position())
    }

    /// Skip a `/* ... */` comment; returns true when it spanned a newline,
    /// which counts as a line break for semicolon insertion.
    fn skip_block_comment(&mut self) -> bool {
        let start = self.position();
        self.advance();
        self.advance();
        let mut spans_newline = false;
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    break;
                }
                Some('\n') => spans_newline = true,
                Some(_) => {}
                None => {
                    self.errors.push(SyntaxError {
                        message: "unterminated block comment".into(),
                        position: start,
                    });
                    break;
                }
            }
        }
        spans_newline
    }

    fn needs_semi(&self) -> bool {
        match self.last {
            Some((ty, plusplus)) => ty.terminates_statement() || plusplus,
            None => false,
        }
    }

    fn insert_semi(&mut self) -> Token {
        let pos = self.position();
        if self.peek() == Some('\n') {
            self.advance();
        }
        self.last = Some((TokenType::Semi, false));
        Token::new(TokenType::Semi, "\n", pos, pos)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|&(_, c)| c)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.index + ahead).map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let &(offset, c) = self.chars.get(self.index)?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.line_start = offset + 1;
        }
        Some(c)
    }

    fn byte_offset(&self) -> usize {
        self.chars
            .get(self.index)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.src_len)
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: (self.byte_offset() - self.line_start + 1) as u32,
        }
    }

    fn lexeme_from(&self, start_index: usize) -> &'src str {
        let start = self
            .chars
            .get(start_index)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.src_len);
        &self.source[start..self.byte_offset()]
    }
}
