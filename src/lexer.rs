use std::{iter::Peekable, str::CharIndices};

use crate::token::{Lexicon, Span, Token, TokenKind};

pub mod error;

pub use error::{LexError, LexResult};

/// Single-pass scanner producing the token stream for one source text.
pub struct Lexer<'src, 'lex> {
    input: &'src str,
    chars: Peekable<CharIndices<'src>>,
    lexicon: &'lex Lexicon,
    line: usize,
    column: usize,
}

impl<'src, 'lex> Lexer<'src, 'lex> {
    pub fn new(input: &'src str, lexicon: &'lex Lexicon) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            lexicon,
            line: 1,
            column: 0,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token<'src>> {
        loop {
            let Some(&(start_idx, ch)) = self.chars.peek() else {
                let index = self.input.len();
                return Ok(Token::new(
                    TokenKind::Eof,
                    Span {
                        start: index,
                        end: index,
                        line: self.line,
                        column: self.column,
                    },
                ));
            };

            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance_char();
                }
                '?' => {
                    // Line comment: discard everything up to the newline.
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance_char();
                    }
                }
                _ => return self.scan_token(start_idx, ch),
            }
        }
    }

    fn scan_token(&mut self, start_idx: usize, ch: char) -> LexResult<Token<'src>> {
        let start_line = self.line;
        let start_column = self.column;

        match ch {
            '(' => Ok(self.take_single(TokenKind::LParen, start_idx)),
            ')' => Ok(self.take_single(TokenKind::RParen, start_idx)),
            '{' => Ok(self.take_single(TokenKind::LBrace, start_idx)),
            '}' => Ok(self.take_single(TokenKind::RBrace, start_idx)),
            '[' => Ok(self.take_single(TokenKind::LBracket, start_idx)),
            ']' => Ok(self.take_single(TokenKind::RBracket, start_idx)),
            '.' => Ok(self.take_single(TokenKind::Dot, start_idx)),
            ',' => Ok(self.take_single(TokenKind::Comma, start_idx)),
            ':' => Ok(self.take_single(TokenKind::Colon, start_idx)),
            '+' => Ok(self.take_single(TokenKind::Plus, start_idx)),
            '-' => Ok(self.take_single(TokenKind::Minus, start_idx)),
            '*' => Ok(self.take_single(TokenKind::Star, start_idx)),
            '/' => Ok(self.take_single(TokenKind::Slash, start_idx)),
            '%' => Ok(self.take_single(TokenKind::Percent, start_idx)),
            '<' => Ok(self.take_comparison(TokenKind::Less, TokenKind::LessEq, start_idx)),
            '>' => Ok(self.take_comparison(TokenKind::Greater, TokenKind::GreaterEq, start_idx)),
            '=' => self.take_two_char('=', TokenKind::EqEq, start_idx),
            '!' => self.take_two_char('!', TokenKind::NotEq, start_idx),
            '\'' | '"' => self.read_string(ch, start_idx, start_line, start_column),
            'a' if self.rest(start_idx).starts_with("and ") => {
                Ok(self.take_logical_word(TokenKind::And, 3, start_idx))
            }
            'o' if self.rest(start_idx).starts_with("or ") => {
                Ok(self.take_logical_word(TokenKind::Or, 2, start_idx))
            }
            'n' if self.rest(start_idx).starts_with("not ") => {
                Ok(self.take_logical_word(TokenKind::Not, 3, start_idx))
            }
            c if c.is_ascii_digit() => self.read_number(start_idx, start_line, start_column),
            c if c.is_alphabetic() || c == '_' => {
                Ok(self.read_identifier(start_idx, start_line, start_column))
            }
            other => Err(LexError::InvalidCharacter {
                character: other,
                line: start_line,
                column: start_column,
            }),
        }
    }

    fn take_single(&mut self, kind: TokenKind<'src>, start: usize) -> Token<'src> {
        let line = self.line;
        let column = self.column;
        self.advance_char();
        Token::new(
            kind,
            Span {
                start,
                end: start + 1,
                line,
                column,
            },
        )
    }

    /// `<` / `>`, doubled up with a trailing `=` when present.
    fn take_comparison(
        &mut self,
        bare: TokenKind<'src>,
        with_eq: TokenKind<'src>,
        start: usize,
    ) -> Token<'src> {
        let line = self.line;
        let column = self.column;
        self.advance_char();
        if matches!(self.chars.peek(), Some(&(_, '='))) {
            self.advance_char();
            Token::new(
                with_eq,
                Span {
                    start,
                    end: start + 2,
                    line,
                    column,
                },
            )
        } else {
            Token::new(
                bare,
                Span {
                    start,
                    end: start + 1,
                    line,
                    column,
                },
            )
        }
    }

    /// `=` and `!` exist only as the first half of `==` / `!=`.
    fn take_two_char(
        &mut self,
        first: char,
        kind: TokenKind<'src>,
        start: usize,
    ) -> LexResult<Token<'src>> {
        let line = self.line;
        let column = self.column;
        self.advance_char();
        if matches!(self.chars.peek(), Some(&(_, '='))) {
            self.advance_char();
            Ok(Token::new(
                kind,
                Span {
                    start,
                    end: start + 2,
                    line,
                    column,
                },
            ))
        } else {
            Err(LexError::InvalidCharacter {
                character: first,
                line,
                column,
            })
        }
    }

    /// `and` / `or` / `not` followed by a space. The trailing space is part of
    /// the match and gets consumed; without it the word scans as an ordinary
    /// identifier (so `android` stays an identifier).
    fn take_logical_word(
        &mut self,
        kind: TokenKind<'src>,
        word_len: usize,
        start: usize,
    ) -> Token<'src> {
        let line = self.line;
        let column = self.column;
        for _ in 0..word_len {
            self.advance_char();
        }
        self.advance_char(); // the space after the word
        Token::new(
            kind,
            Span {
                start,
                end: start + word_len,
                line,
                column,
            },
        )
    }

    fn read_string(
        &mut self,
        quote: char,
        start: usize,
        line: usize,
        column: usize,
    ) -> LexResult<Token<'src>> {
        self.advance_char(); // opening quote
        let content_start = (start + quote.len_utf8()).min(self.input.len());
        while let Some(&(idx, c)) = self.chars.peek() {
            if c == quote {
                self.advance_char(); // closing quote
                return Ok(Token::new(
                    TokenKind::Str(&self.input[content_start..idx]),
                    Span {
                        start,
                        end: idx + quote.len_utf8(),
                        line,
                        column,
                    },
                ));
            }
            self.advance_char();
        }
        Err(LexError::UnterminatedString { line, column })
    }

    fn read_number(
        &mut self,
        start: usize,
        line: usize,
        column: usize,
    ) -> LexResult<Token<'src>> {
        self.advance_char(); // first digit
        let mut saw_dot = false;
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.advance_char();
            } else if c == '.' && !saw_dot && self.second_char_is_digit() {
                saw_dot = true;
                self.advance_char();
            } else {
                break;
            }
        }

        let end_idx = self.current_index();
        let literal = &self.input[start..end_idx];
        let value = literal
            .parse::<f64>()
            .map_err(|_| LexError::InvalidNumberLiteral {
                literal: literal.to_string(),
                line,
                column,
            })?;
        Ok(Token::new(
            TokenKind::Number(value),
            Span {
                start,
                end: end_idx,
                line,
                column,
            },
        ))
    }

    fn read_identifier(&mut self, start: usize, line: usize, column: usize) -> Token<'src> {
        self.advance_char(); // first char
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }

        let end_idx = self.current_index();
        let word = &self.input[start..end_idx];
        let kind = if let Some(value) = self.lexicon.boolean(word) {
            TokenKind::Boolean(value)
        } else if let Some(keyword) = self.lexicon.keyword(word) {
            TokenKind::Keyword(keyword)
        } else {
            TokenKind::Identifier(word)
        };
        Token::new(
            kind,
            Span {
                start,
                end: end_idx,
                line,
                column,
            },
        )
    }

    /// Character after the next one, via a cloned iterator.
    fn second_char_is_digit(&self) -> bool {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        matches!(lookahead.peek(), Some(&(_, c)) if c.is_ascii_digit())
    }

    fn rest(&self, from: usize) -> &'src str {
        &self.input[from..]
    }

    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

/// Scan a whole source text into tokens, ending with an EOF token.
pub fn tokenize(input: &str) -> LexResult<Vec<Token<'_>>> {
    let lexicon = Lexicon::new();
    let mut lexer = Lexer::new(input, &lexicon);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::Eof);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}
