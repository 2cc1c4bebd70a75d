//! Textual expression parsing
//!
//! Parses infix arithmetic such as `sqrt(sq(x1 - x2) + sq(y1 - y2)) - 10` into
//! an [`Expr`]. Parsing runs in two stages: `nom` combinators build a small
//! syntax tree, which is then lowered to an `Expr` by resolving identifiers to
//! parameters through a caller-supplied resolver.
//!
//! Grammar (all binary operators are left associative):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := number | ident '(' expr ')' | ident | '(' expr ')'
//! ```
//!
//! Supported functions are `sqrt`, `sin`, `cos` and `sq` (square).

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{recognize, value},
    multi::many0,
    number::complete::double,
    sequence::pair,
    IResult, Parser,
};
use std::rc::Rc;
use thiserror::Error;

use crate::expression::expr::{BinaryOp, Expr};
use crate::parameters::ParamRef;

/// Error that can occur while parsing or resolving an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression: {message}")]
    ParseError { message: String },

    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String },
}

type ExprResult<T> = Result<T, ExpressionError>;

/// Syntax tree produced by the combinators, before name resolution
#[derive(Debug, Clone, PartialEq)]
enum Ast {
    Number(f64),
    Variable(String),
    Negate(Box<Ast>),
    Binary(BinaryOp, Box<Ast>, Box<Ast>),
    Call(String, Box<Ast>),
}

impl Expr {
    /// Parse an expression, resolving identifiers with `resolve`
    ///
    /// # Arguments
    ///
    /// * `input` - Infix expression text
    /// * `resolve` - Maps an identifier to the parameter it names
    ///
    /// # Errors
    ///
    /// `ExpressionError::ParseError` on malformed input or trailing characters,
    /// `UndefinedVariable` when `resolve` returns `None`, and
    /// `UndefinedFunction` for an unknown function name.
    ///
    /// # Examples
    ///
    /// ```
    /// use geosolve_rs::expression::Expr;
    /// use geosolve_rs::parameters::Param;
    ///
    /// let x = Param::shared(3.0, "x");
    /// let e = Expr::parse("sq(x) - 2 * x", |name| (name == "x").then(|| x.clone())).unwrap();
    /// assert_eq!(e.eval(), 3.0);
    /// ```
    pub fn parse<F>(input: &str, mut resolve: F) -> ExprResult<Expr>
    where
        F: FnMut(&str) -> Option<ParamRef>,
    {
        let ast = match expr_parser(input) {
            Ok((remainder, ast)) => {
                if remainder.trim().is_empty() {
                    ast
                } else {
                    return Err(ExpressionError::ParseError {
                        message: format!("Unexpected trailing characters: '{}'", remainder),
                    });
                }
            }
            Err(e) => {
                return Err(ExpressionError::ParseError {
                    message: format!("{:?}", e),
                })
            }
        };
        lower(ast, &mut resolve)
    }

    /// Parse an expression whose identifiers are the symbols of `params`
    pub fn parse_with_params(input: &str, params: &[ParamRef]) -> ExprResult<Expr> {
        Self::parse(input, |name| {
            params.iter().find(|p| p.symbol() == name).map(Rc::clone)
        })
    }
}

fn lower(ast: Ast, resolve: &mut dyn FnMut(&str) -> Option<ParamRef>) -> ExprResult<Expr> {
    match ast {
        Ast::Number(v) => Ok(Expr::Constant(v)),
        Ast::Variable(name) => match resolve(&name) {
            Some(param) => Ok(Expr::Param(param)),
            None => Err(ExpressionError::UndefinedVariable { name }),
        },
        Ast::Negate(a) => Ok(lower(*a, resolve)?.negate()),
        Ast::Binary(op, a, b) => {
            let a = lower(*a, resolve)?;
            let b = lower(*b, resolve)?;
            Ok(Expr::Binary(op, Box::new(a), Box::new(b)))
        }
        Ast::Call(name, arg) => {
            let arg = lower(*arg, resolve)?;
            match name.as_str() {
                "sqrt" => Ok(arg.sqrt()),
                "sq" => Ok(arg.square()),
                "sin" => Ok(arg.sin()),
                "cos" => Ok(arg.cos()),
                _ => Err(ExpressionError::UndefinedFunction { name }),
            }
        }
    }
}

// Parser functions using nom

fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

/// Skip whitespace, then match `c`
fn symbol(input: &str, c: char) -> IResult<&str, char> {
    let (input, _) = ws(input)?;
    char(c).parse(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    double(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOp> {
    let (input, _) = ws(input)?;
    alt((
        value(BinaryOp::Plus, char('+')),
        value(BinaryOp::Minus, char('-')),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOp> {
    let (input, _) = ws(input)?;
    alt((
        value(BinaryOp::Times, char('*')),
        value(BinaryOp::Div, char('/')),
    ))
    .parse(input)
}

/// Parse a primary expression (number, function call, variable, or parenthesized expression)
fn primary(input: &str) -> IResult<&str, Ast> {
    let (input, _) = ws(input)?;

    // `double` also accepts names such as `inf`, so only digits start a number
    if input.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        let (input, v) = number(input)?;
        return Ok((input, Ast::Number(v)));
    }

    if let Ok((after_name, name)) = identifier(input) {
        if let Ok((after_paren, _)) = symbol(after_name, '(') {
            let (input, arg) = expr_parser(after_paren)?;
            let (input, _) = symbol(input, ')')?;
            return Ok((input, Ast::Call(name.to_string(), Box::new(arg))));
        }
        return Ok((after_name, Ast::Variable(name.to_string())));
    }

    let (input, _) = symbol(input, '(')?;
    let (input, inner) = expr_parser(input)?;
    let (input, _) = symbol(input, ')')?;
    Ok((input, inner))
}

/// Parse a unary expression (-expr)
fn unary(input: &str) -> IResult<&str, Ast> {
    match symbol(input, '-') {
        Ok((input, _)) => {
            let (input, inner) = unary(input)?;
            Ok((input, Ast::Negate(Box::new(inner))))
        }
        Err(_) => primary(input),
    }
}

/// Parse a multiplicative expression (expr * expr, expr / expr)
fn term(input: &str) -> IResult<&str, Ast> {
    let (mut input, mut left) = unary(input)?;
    while let Ok((after_op, op)) = multiplicative_op(input) {
        let (rest, right) = unary(after_op)?;
        left = Ast::Binary(op, Box::new(left), Box::new(right));
        input = rest;
    }
    Ok((input, left))
}

/// Parse an additive expression (expr + expr, expr - expr)
fn expr_parser(input: &str) -> IResult<&str, Ast> {
    let (mut input, mut left) = term(input)?;
    while let Ok((after_op, op)) = additive_op(input) {
        let (rest, right) = term(after_op)?;
        left = Ast::Binary(op, Box::new(left), Box::new(right));
        input = rest;
    }
    Ok((input, left))
}
