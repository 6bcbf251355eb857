//! Recursive-descent parser producing the formula AST.
//!
//! Precedence, loosest first: comparison (chainable), `+ -`, `* /`, unary.

use super::token::{Attribute, Token, TokenKind};
use super::FormulaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    If,
    And,
    Or,
    Sum,
    Ifs,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "IF" => Some(Self::If),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "SUM" => Some(Self::Sum),
            "IFS" => Some(Self::Ifs),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::If => "IF",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Sum => "SUM",
            Self::Ifs => "IFS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Text(String),
    Bool(bool),
    Reference {
        item: String,
        attribute: Attribute,
    },
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `a < b <= c` holds when every adjacent pair holds.
    Compare {
        first: Box<Expr>,
        rest: Vec<(CompareOp, Expr)>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(mut self) -> Result<Expr, FormulaError> {
        if self.peek() == &TokenKind::Eof {
            return Err(FormulaError::Empty);
        }
        let expr = self.comparison()?;
        self.expect(&TokenKind::Eof, "end of formula")?;
        Ok(expr)
    }

    fn peek(&self) -> &TokenKind {
        // tokenize() always ends with Eof
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|t| t.offset).unwrap_or(0)
    }

    fn bump(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), FormulaError> {
        if self.peek() == kind {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> FormulaError {
        FormulaError::UnexpectedToken {
            found: self.peek().to_string(),
            expected,
            offset: self.offset(),
        }
    }

    fn comparison(&mut self) -> Result<Expr, FormulaError> {
        let first = self.additive()?;
        let mut rest = Vec::new();

        loop {
            let op = match self.peek() {
                TokenKind::Eq => CompareOp::Eq,
                TokenKind::Ne => CompareOp::Ne,
                TokenKind::Lt => CompareOp::Lt,
                TokenKind::Le => CompareOp::Le,
                TokenKind::Gt => CompareOp::Gt,
                TokenKind::Ge => CompareOp::Ge,
                _ => break,
            };
            self.bump();
            rest.push((op, self.additive()?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn additive(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.bump();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            TokenKind::Minus => {
                self.bump();
                Ok(Expr::Negate(Box::new(self.unary()?)))
            }
            TokenKind::Plus => {
                self.bump();
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.bump() {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Text(s) => Ok(Expr::Text(s)),
            TokenKind::Reference { item, attribute } => Ok(Expr::Reference { item, attribute }),
            TokenKind::LParen => {
                let inner = self.comparison()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Identifier(name) => self.identifier(name),
            _ => {
                // step back so the error points at the offending token
                self.pos = self.pos.saturating_sub(1);
                Err(self.unexpected("a value"))
            }
        }
    }

    fn identifier(&mut self, name: String) -> Result<Expr, FormulaError> {
        if name == "TRUE" {
            return Ok(Expr::Bool(true));
        }

        let Some(function) = Function::lookup(&name) else {
            return Err(FormulaError::UnknownName(name));
        };

        self.expect(&TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if self.peek() != &TokenKind::RParen {
            loop {
                args.push(self.comparison()?);
                if self.peek() == &TokenKind::Comma {
                    self.bump();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;

        if function == Function::If && args.len() != 3 {
            return Err(FormulaError::Arity {
                function: function.name(),
                expected: "exactly 3",
                found: args.len(),
            });
        }

        Ok(Expr::Call { function, args })
    }
}
