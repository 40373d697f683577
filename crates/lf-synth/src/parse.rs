//! Recursive-descent parser for the expression text form.
//!
//! ```text
//! or    := xor ('|' xor)*
//! xor   := and ('^' and)*
//! and   := unary ('&' unary)*
//! unary := '~' unary | atom
//! atom  := IDENT | '0' | '1' | '(' or ')'
//! ```

use crate::error::{SynthError, SynthResult};
use crate::expr::Expr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Const(bool),
    Not,
    And,
    Or,
    Xor,
    LParen,
    RParen,
}

fn lex(src: &str) -> SynthResult<Vec<(usize, Tok)>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        let tok = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '~' | '!' => Tok::Not,
            '&' => Tok::And,
            '|' => Tok::Or,
            '^' => Tok::Xor,
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '0' => Tok::Const(false),
            '1' => Tok::Const(true),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((pos, Tok::Ident(name)));
                continue;
            }
            other => {
                return Err(SynthError::Parse {
                    pos,
                    message: format!("unexpected character '{other}'"),
                });
            }
        };
        chars.next();
        tokens.push((pos, tok));
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Tok)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(p, _)| *p)
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> SynthError {
        SynthError::Parse {
            pos: self.offset(),
            message: message.into(),
        }
    }

    fn or(&mut self) -> SynthResult<Expr> {
        let mut ops = vec![self.xor()?];
        while self.eat(&Tok::Or) {
            ops.push(self.xor()?);
        }
        Ok(if ops.len() == 1 { ops.remove(0) } else { Expr::Or(ops) })
    }

    fn xor(&mut self) -> SynthResult<Expr> {
        let mut lhs = self.and()?;
        while self.eat(&Tok::Xor) {
            let rhs = self.and()?;
            lhs = Expr::xor(lhs, rhs);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> SynthResult<Expr> {
        let mut ops = vec![self.unary()?];
        while self.eat(&Tok::And) {
            ops.push(self.unary()?);
        }
        Ok(if ops.len() == 1 { ops.remove(0) } else { Expr::And(ops) })
    }

    fn unary(&mut self) -> SynthResult<Expr> {
        if self.eat(&Tok::Not) {
            return Ok(Expr::not(self.unary()?));
        }
        self.atom()
    }

    fn atom(&mut self) -> SynthResult<Expr> {
        let Some(tok) = self.peek().cloned() else {
            return Err(self.error("unexpected end of expression"));
        };
        match tok {
            Tok::Ident(name) => {
                self.pos += 1;
                Ok(Expr::Var(name))
            }
            Tok::Const(v) => {
                self.pos += 1;
                Ok(Expr::Const(v))
            }
            Tok::LParen => {
                self.pos += 1;
                let inner = self.or()?;
                if !self.eat(&Tok::RParen) {
                    return Err(self.error("expected ')'"));
                }
                Ok(inner)
            }
            other => Err(self.error(format!("unexpected token {other:?}"))),
        }
    }
}

/// Parse expression text into an [`Expr`].
pub fn parse_expression(src: &str) -> SynthResult<Expr> {
    let tokens = lex(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: src.len(),
    };
    let expr = parser.or()?;
    if parser.peek().is_some() {
        return Err(parser.error("trailing input"));
    }
    Ok(expr)
}
