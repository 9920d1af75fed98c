//! Arithmetic evaluator for extracted math expressions.
//!
//! Only decimal literals, `+ - * /`, parentheses and unary minus are
//! accepted. The whole input is tokenized and parsed before anything is
//! evaluated, so a disallowed token never leads to partial evaluation.

use crate::error::ToolError;

/// Nesting limit for parentheses and unary minus chains.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    pub fn is_operator(self) -> bool {
        matches!(self, Token::Plus | Token::Minus | Token::Star | Token::Slash)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Num(f64),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

/// Split an expression into tokens, rejecting anything outside the grammar.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ToolError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(parse_literal(&input[start..end])?));
            }
            '+' | '-' | '*' | '/' | '(' | ')' => {
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    _ => Token::RParen,
                });
                chars.next();
            }
            other => {
                return Err(ToolError::invalid_expression(format!(
                    "Unsupported token '{other}'."
                )));
            }
        }
    }

    Ok(tokens)
}

fn parse_literal(text: &str) -> Result<f64, ToolError> {
    let dots = text.matches('.').count();
    if dots > 1 || !text.bytes().any(|b| b.is_ascii_digit()) {
        return Err(ToolError::invalid_expression(format!(
            "Malformed number '{text}'."
        )));
    }
    text.parse::<f64>()
        .map_err(|_| ToolError::invalid_expression(format!("Malformed number '{text}'.")))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn descend(&mut self) -> Result<(), ToolError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ToolError::invalid_expression("Expression is nested too deeply."));
        }
        Ok(())
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Expr, ToolError> {
        let mut lhs = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            let op = if op == Token::Plus { BinOp::Add } else { BinOp::Sub };
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<Expr, ToolError> {
        let mut lhs = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            let op = if op == Token::Star { BinOp::Mul } else { BinOp::Div };
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    // unary := '-' unary | primary
    fn unary(&mut self) -> Result<Expr, ToolError> {
        if self.peek() == Some(Token::Minus) {
            self.pos += 1;
            self.descend()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.primary()
    }

    // primary := number | '(' expr ')'
    fn primary(&mut self) -> Result<Expr, ToolError> {
        match self.bump() {
            Some(Token::Number(n)) => Ok(Expr::Num(n)),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ToolError::invalid_expression("Unbalanced parentheses.")),
                }
            }
            Some(_) => Err(ToolError::invalid_expression("Unexpected operator.")),
            None => Err(ToolError::invalid_expression("Incomplete expression.")),
        }
    }
}

fn parse(input: &str) -> Result<Expr, ToolError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ToolError::invalid_expression("Empty expression."));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(ToolError::invalid_expression("Unexpected trailing input."));
    }
    Ok(expr)
}

fn eval(expr: &Expr) -> Result<f64, ToolError> {
    let value = match expr {
        Expr::Num(n) => *n,
        Expr::Neg(inner) => -eval(inner)?,
        Expr::Binary(op, lhs, rhs) => {
            let a = eval(lhs)?;
            let b = eval(rhs)?;
            match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => {
                    if b == 0.0 {
                        return Err(ToolError::division_by_zero());
                    }
                    a / b
                }
            }
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ToolError::overflow())
    }
}

/// Evaluate a normalized expression string.
pub fn evaluate(input: &str) -> Result<f64, ToolError> {
    let expr = parse(input)?;
    eval(&expr)
}

/// Render a result: integers without a fractional part, everything else
/// with at most `places` decimals.
pub fn format_number(value: f64, places: usize) -> String {
    let text = if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let fixed = format!("{value:.places$}");
        if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            fixed
        }
    };

    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}
