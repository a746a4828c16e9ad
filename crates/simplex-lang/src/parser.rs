use simplex_solver::{Comparator, Problem, Sense};
use thiserror::Error;

use crate::lexer::{Lexer, Span, Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found {found} at position {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Missing objective: expected a maximize or minimize line")]
    MissingObjective,
    #[error("Objective defined twice, again at position {0:?}")]
    DuplicateObjective(Span),
}

/// Parser for the line-oriented problem format:
///
/// ```text
/// # comment
/// maximize 2x + y
/// 3x + y <= 6
/// x + 2y <= 7
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<Problem, ParseError> {
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_problem()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn skip_newlines_and_comments(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Comment) {
            self.advance();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(t) if t.kind != TokenKind::Eof => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{:?}", t.kind),
                span: t.span,
            },
            _ => ParseError::UnexpectedEof,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.current().cloned() {
            Some(t) if t.kind == kind => {
                self.advance();
                Ok(t)
            }
            _ => Err(self.unexpected(&format!("{:?}", kind))),
        }
    }

    fn parse_problem(&mut self) -> Result<Problem, ParseError> {
        let mut problem = Problem::new();
        let mut has_objective = false;

        loop {
            self.skip_newlines_and_comments();

            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Maximize | TokenKind::Minimize => {
                    if has_objective {
                        let span = self.current().map(|t| t.span).unwrap_or(Span::new(0, 0));
                        return Err(ParseError::DuplicateObjective(span));
                    }
                    let (sense, terms) = self.parse_objective()?;
                    problem.set_sense(sense);
                    problem.set_objective(terms);
                    has_objective = true;
                }
                _ => {
                    let (terms, comparator, rhs) = self.parse_constraint()?;
                    problem.add_constraint(terms, comparator, rhs);
                }
            }

            self.end_of_statement()?;
        }

        if !has_objective {
            return Err(ParseError::MissingObjective);
        }
        Ok(problem)
    }

    fn end_of_statement(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::Comment | TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    fn parse_objective(&mut self) -> Result<(Sense, Vec<(String, f64)>), ParseError> {
        let sense = match self.advance().map(|t| t.kind) {
            Some(TokenKind::Minimize) => Sense::Minimize,
            _ => Sense::Maximize,
        };
        if self.peek_kind() == TokenKind::Colon {
            self.advance();
        }
        let terms = self.parse_expression()?;
        Ok((sense, terms))
    }

    fn parse_constraint(&mut self) -> Result<(Vec<(String, f64)>, Comparator, f64), ParseError> {
        let terms = self.parse_expression()?;
        let comparator = self.parse_comparator()?;
        let rhs = self.parse_signed_number()?;
        Ok((terms, comparator, rhs))
    }

    /// `[+|-] term { (+|-) term }`
    fn parse_expression(&mut self) -> Result<Vec<(String, f64)>, ParseError> {
        let mut terms = Vec::new();

        let mut sign = self.parse_sign().unwrap_or(1.0);
        loop {
            terms.push(self.parse_term(sign)?);
            match self.parse_sign() {
                Some(next) => sign = next,
                None => break,
            }
        }

        Ok(terms)
    }

    fn parse_sign(&mut self) -> Option<f64> {
        match self.peek_kind() {
            TokenKind::Plus => {
                self.advance();
                Some(1.0)
            }
            TokenKind::Minus => {
                self.advance();
                Some(-1.0)
            }
            _ => None,
        }
    }

    /// `[number] [*] name`
    fn parse_term(&mut self, sign: f64) -> Result<(String, f64), ParseError> {
        let coefficient = if self.peek_kind() == TokenKind::Number {
            let value = self.parse_number()?;
            if self.peek_kind() == TokenKind::Star {
                self.advance();
            }
            value
        } else {
            1.0
        };

        if self.peek_kind() != TokenKind::Ident {
            return Err(self.unexpected("variable name"));
        }
        let name = self.expect(TokenKind::Ident)?.text;
        Ok((name, sign * coefficient))
    }

    fn parse_comparator(&mut self) -> Result<Comparator, ParseError> {
        let comparator = match self.peek_kind() {
            TokenKind::Le => Comparator::LessOrEqual,
            TokenKind::Ge => Comparator::GreaterOrEqual,
            TokenKind::Eq => Comparator::Equal,
            TokenKind::Lt => Comparator::Less,
            TokenKind::Gt => Comparator::Greater,
            _ => return Err(self.unexpected("comparator (<=, >=, =)")),
        };
        self.advance();
        Ok(comparator)
    }

    fn parse_signed_number(&mut self) -> Result<f64, ParseError> {
        let sign = self.parse_sign().unwrap_or(1.0);
        Ok(sign * self.parse_number()?)
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        let token = self.expect(TokenKind::Number)?;
        token
            .text
            .parse()
            .map_err(|_| ParseError::InvalidNumber(token.text))
    }
}
