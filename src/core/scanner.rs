use std::iter::Peekable;

use owned_chars::OwnedChars;

use super::{Result, TinyError, Token, TokenType};

/// Roughly how much of the offending input a lexical error reports.
const SNIPPET_LEN: usize = 10;

pub struct Scanner {
    // Scratch pad for the token currently being scanned
    scratch: String,
    chars: Peekable<OwnedChars>,
    tokens: Vec<Token>,
    line: usize,
}

impl Scanner {
    /// Creates a new `Scanner` whose referent is `source`.
    ///
    /// A `Scanner` is an encapsulated cursor over one source buffer: it owns
    /// every piece of scanning state, so constructing a fresh `Scanner` over
    /// the same text always reproduces the same token sequence.
    #[must_use]
    pub fn new(source: String) -> Self {
        Scanner {
            // cautiously optimistic allocation
            scratch: String::with_capacity(1024),
            chars: OwnedChars::from_string(source).peekable(),
            tokens: Vec::new(),
            line: 1,
        }
    }

    /// Scans the whole buffer, yielding the tokens in source order with an
    /// `Eof` sentinel appended last.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        while let Some(c) = self.advance() {
            self.scan_token(c)?;
            self.scratch.clear();
        }

        self.tokens
            .push(Token::new(TokenType::Eof, String::new(), self.line));

        Ok(self.tokens)
    }

    fn scan_token(&mut self, c: char) -> Result<()> {
        match c {
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '+' => self.add_token(TokenType::Plus),
            '-' => self.add_token(TokenType::Minus),
            '*' => self.add_token(TokenType::Star),
            '/' => self.add_token(TokenType::Slash),
            ':' => self.add_token(TokenType::Colon),
            ';' => self.add_token(TokenType::Semicolon),
            '=' => self.is_compound_equal_operator(TokenType::EqualEqual, TokenType::Assign),
            '>' => self.is_compound_equal_operator(TokenType::GreaterEqual, TokenType::Greater),
            '<' => self.less(),
            c => {
                if Scanner::is_digit(Some(c)) {
                    self.number();
                } else if c.is_alphabetic() {
                    self.identifier();
                } else {
                    return Err(self.unscannable());
                }
            }
        };

        Ok(())
    }

    // this method has weird semantics. it feels like the right abstraction
    // but maybe it can use some work
    fn is_compound_equal_operator(&mut self, yes: TokenType, no: TokenType) {
        if let Some('=') = self.peek() {
            self.advance();
            self.add_token(yes);
        } else {
            self.add_token(no);
        };
    }

    /// `<` begins three operators: `<=`, the inequality test `<>`, and plain
    /// `<`.
    fn less(&mut self) {
        match self.peek() {
            Some('=') => {
                self.advance();
                self.add_token(TokenType::LessEqual);
            }
            Some('>') => {
                self.advance();
                self.add_token(TokenType::NotEqual);
            }
            _ => self.add_token(TokenType::Less),
        }
    }

    fn identifier(&mut self) {
        while Scanner::is_alphanumeric(self.peek()) {
            self.advance();
        }

        self.add_token(TokenType::keyword_from_str(&self.scratch));
    }

    /// Adapter for Option<char>
    fn is_alphanumeric(c: Option<char>) -> bool {
        c.map_or(false, |c| c.is_ascii_alphanumeric())
    }

    /// Adapter for Option<char>
    fn is_digit(c: Option<char>) -> bool {
        c.map_or(false, |c| c.is_ascii_digit())
    }

    /// A sequence of digits, optionally followed by a decimal point and more
    /// digits. Whether the lexeme is an integer or a real is decided later,
    /// by whoever converts it.
    fn number(&mut self) {
        while Scanner::is_digit(self.peek()) {
            self.advance();
        }

        if let Some('.') = self.peek() {
            self.advance();

            while Scanner::is_digit(self.peek()) {
                self.advance();
            }
        }

        self.add_token(TokenType::Number);
    }

    /// Builds the lexical error for input no pattern matches. The scratch
    /// pad already holds the offending character; pull a few more so the
    /// message shows where scanning stopped.
    fn unscannable(&mut self) -> TinyError {
        while self.scratch.chars().count() < SNIPPET_LEN && self.advance().is_some() {}

        TinyError::Unscannable(String::from(&self.scratch))
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|c| {
            self.scratch.push(c);
            c
        })
    }

    fn add_token(&mut self, token: TokenType) {
        let value = String::from(&self.scratch);
        self.tokens.push(Token::new(token, value, self.line));
    }
}
