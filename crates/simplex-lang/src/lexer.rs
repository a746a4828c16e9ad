use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Maximize,
    Minimize,

    // Literals
    Ident,
    Number,

    // Operators
    Plus,
    Minus,
    Star,
    Colon,

    // Comparators
    Le,
    Ge,
    Lt,
    Gt,
    Eq,

    // Special
    Newline,
    Comment,
    Eof,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Chars<'a>,
    pos: usize,
    current: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            source,
            chars,
            pos: 0,
            current,
        }
    }

    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current;
        self.current = self.chars.next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.current
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::Comment, start)
    }

    fn skip_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part, possibly empty for ".5"
        self.skip_digits();

        // Decimal part
        if self.peek() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent, only when digits follow so that "2e" stays 2 * e
        if matches!(self.peek(), Some('e' | 'E')) {
            let mut chars = self.chars.clone();
            let next = chars.next();
            let after_sign = chars.next();
            let has_exponent = match next {
                Some(c) if c.is_ascii_digit() => true,
                Some('+' | '-') => after_sign.is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                self.advance(); // e
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        self.token(TokenKind::Number, start)
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let kind = match &self.source[start..self.pos] {
            "maximize" | "max" => TokenKind::Maximize,
            "minimize" | "min" => TokenKind::Minimize,
            _ => TokenKind::Ident,
        };
        self.token(kind, start)
    }

    /// Consumes one character, or two when the second is `=`
    fn read_comparator(&mut self, single: TokenKind, with_eq: TokenKind) -> Token {
        let start = self.pos;
        self.advance();
        if self.peek() == Some('=') {
            self.advance();
            return self.token(with_eq, start);
        }
        self.token(single, start)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.advance();
        self.token(kind, start)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        };

        match c {
            '\n' => self.single(TokenKind::Newline),
            '#' => self.skip_line_comment(),
            '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            ':' => self.single(TokenKind::Colon),
            '<' => self.read_comparator(TokenKind::Lt, TokenKind::Le),
            '>' => self.read_comparator(TokenKind::Gt, TokenKind::Ge),
            '=' => self.read_comparator(TokenKind::Eq, TokenKind::Eq),
            '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_ident(),
            _ => self.single(TokenKind::Error),
        }
    }
}
