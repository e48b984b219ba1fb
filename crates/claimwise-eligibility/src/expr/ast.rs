//! Syntax tree and runtime values of rule expressions

use std::fmt;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Any number (integers included)
    Number(f64),
    /// Text
    Str(String),
    /// Boolean
    Bool(bool),
    /// List of values
    List(Vec<Value>),
}

impl Value {
    /// Type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// `+` (numbers, or string concatenation)
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Whitelisted helper functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    /// Lowercase a string
    Lower,
    /// Uppercase a string
    Upper,
    /// Trim surrounding whitespace
    Strip,
    /// Length of a string (in characters) or list
    Len,
}

/// Expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Value),
    /// Claim field reference, resolved at evaluation
    Field(String),
    /// List literal
    List(Vec<Expr>),
    /// Logical negation
    Not(Box<Expr>),
    /// Short-circuit conjunction
    And(Box<Expr>, Box<Expr>),
    /// Short-circuit disjunction
    Or(Box<Expr>, Box<Expr>),
    /// Binary comparison
    Compare(CmpOp, Box<Expr>, Box<Expr>),
    /// Containment test, `negated` for `not in`
    In {
        /// Value searched for
        needle: Box<Expr>,
        /// String or list searched in
        haystack: Box<Expr>,
        /// `not in`
        negated: bool,
    },
    /// Arithmetic
    Arith(ArithOp, Box<Expr>, Box<Expr>),
    /// Helper call (`lower(x)` or `x.lower()`)
    Call(Func, Box<Expr>),
}
