//! Integer arithmetic over the variable `N`.
//!
//! Redundancy variation points give the vote count `k` as a formula of the
//! number of copies `N`, e.g. `N-1` or `(N+1)/2`. Supported: integer
//! literals, `N`, unary minus, parentheses and the binary operators
//! `+ - * / %` with the usual precedence. Division truncates toward zero.

use std::fmt;

use crate::error::FormulaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl Op {
    fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div | Op::Rem => 2,
        }
    }

    fn apply(self, lhs: i64, rhs: i64) -> Result<i64, FormulaError> {
        let value = match self {
            Op::Add => lhs.checked_add(rhs),
            Op::Sub => lhs.checked_sub(rhs),
            Op::Mul => lhs.checked_mul(rhs),
            Op::Div | Op::Rem if rhs == 0 => return Err(FormulaError::DivisionByZero),
            Op::Div => lhs.checked_div(rhs),
            Op::Rem => lhs.checked_rem(rhs),
        };
        value.ok_or(FormulaError::Overflow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(i64),
    Var,
    Op(Op),
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Var => write!(f, "N"),
            Token::Op(op) => write!(f, "operator {op:?}"),
            Token::LeftParen => write!(f, "'('"),
            Token::RightParen => write!(f, "')'"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '+' => Token::Op(Op::Add),
            '-' => Token::Op(Op::Sub),
            '*' => Token::Op(Op::Mul),
            '/' => Token::Op(Op::Div),
            '%' => Token::Op(Op::Rem),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            c if c.is_ascii_digit() => {
                let mut literal = String::from(c);
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    literal.push(d);
                    chars.next();
                }
                let value = literal
                    .parse()
                    .map_err(|_| FormulaError::LiteralTooLarge(literal.clone()))?;
                Token::Number(value)
            }
            c if c.is_ascii_alphabetic() => {
                let mut name = String::from(c);
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_alphanumeric() && d != '_' {
                        break;
                    }
                    name.push(d);
                    chars.next();
                }
                if name != "N" {
                    return Err(FormulaError::UnknownVariable(name));
                }
                Token::Var
            }
            ch => return Err(FormulaError::UnexpectedChar { ch, pos }),
        };
        tokens.push((token, pos));
    }

    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Number(i64),
    Var,
    Neg(Box<Expr>),
    Binary {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    fn eval(&self, n: i64) -> Result<i64, FormulaError> {
        match self {
            Expr::Number(v) => Ok(*v),
            Expr::Var => Ok(n),
            Expr::Neg(inner) => inner.eval(n)?.checked_neg().ok_or(FormulaError::Overflow),
            Expr::Binary { op, left, right } => op.apply(left.eval(n)?, right.eval(n)?),
        }
    }
}

/// Deepest expression nesting accepted, counting operators and parentheses.
const MAX_DEPTH: usize = 64;

struct Parser<'t> {
    tokens: &'t [(Token, usize)],
    current: usize,
    depth: usize,
}

impl Parser<'_> {
    fn descend(&mut self) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|(t, _)| t)
    }

    fn unexpected(&self) -> FormulaError {
        match self.tokens.get(self.current) {
            Some((token, pos)) => FormulaError::UnexpectedToken {
                found: token.to_string(),
                pos: *pos,
            },
            None => FormulaError::UnexpectedEnd,
        }
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, FormulaError> {
        let base = self.depth;
        let mut left = self.parse_unary()?;

        while let Some(Token::Op(op)) = self.peek().cloned() {
            if op.precedence() < min_precedence {
                break;
            }
            self.descend()?;
            self.current += 1;
            let right = self.parse_binary(op.precedence() + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth = base;
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            Some(Token::Op(Op::Sub)) => {
                self.current += 1;
                self.descend()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(Token::Op(Op::Add)) => {
                self.current += 1;
                self.descend()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, FormulaError> {
        let expr = match self.peek() {
            Some(Token::Number(v)) => Expr::Number(*v),
            Some(Token::Var) => Expr::Var,
            Some(Token::LeftParen) => {
                self.current += 1;
                self.descend()?;
                let inner = self.parse_binary(0)?;
                self.depth -= 1;
                if self.peek() != Some(&Token::RightParen) {
                    return Err(self.unexpected());
                }
                inner
            }
            _ => return Err(self.unexpected()),
        };
        self.current += 1;
        Ok(expr)
    }
}

/// A parsed redundancy formula, evaluated once per candidate `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            tokens: &tokens,
            current: 0,
            depth: 0,
        };
        let expr = parser.parse_binary(0)?;
        if parser.current < tokens.len() {
            return Err(parser.unexpected());
        }
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// Evaluate with `N = n`.
    pub fn eval(&self, n: i64) -> Result<i64, FormulaError> {
        self.expr.eval(n)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Parse and evaluate in one step.
pub fn evaluate(source: &str, n: i64) -> Result<i64, FormulaError> {
    Formula::parse(source)?.eval(n)
}
