//! Tree-walking evaluator over a claim's fields

use super::ast::{ArithOp, CmpOp, Expr, Func, Value};
use crate::RuleError;
use claimwise_domain::ClaimSubmission;
use std::cmp::Ordering;

/// Claim fields visible to expressions
pub const FIELDS: &[&str] = &[
    "ssn_last4",
    "employer",
    "separation_reason",
    "earnings",
    "employment_months",
];

/// Evaluate an expression to a boolean
///
/// # Examples
///
/// ```
/// use claimwise_domain::ClaimSubmission;
/// use claimwise_eligibility::expr::{evaluate, parse_expression};
///
/// let claim = ClaimSubmission::new("1234", "Acme Corp", "Laid off", 5000.0, 12).unwrap();
/// let expr = parse_expression("'laid' in separation_reason.lower()").unwrap();
/// assert!(evaluate(&expr, &claim).unwrap());
/// ```
pub fn evaluate(expr: &Expr, claim: &ClaimSubmission) -> Result<bool, RuleError> {
    match eval(expr, claim)? {
        Value::Bool(b) => Ok(b),
        other => Err(RuleError::NotBoolean(other.type_name())),
    }
}

fn field(name: &str, claim: &ClaimSubmission) -> Result<Value, RuleError> {
    match name {
        "ssn_last4" => Ok(Value::Str(claim.ssn_last4().as_str().to_string())),
        "employer" => Ok(Value::Str(claim.employer().to_string())),
        "separation_reason" => Ok(Value::Str(claim.separation_reason().to_string())),
        "earnings" => Ok(Value::Number(claim.earnings())),
        "employment_months" => Ok(Value::Number(f64::from(claim.employment_months()))),
        other => Err(RuleError::UnknownField(other.to_string())),
    }
}

fn eval(expr: &Expr, claim: &ClaimSubmission) -> Result<Value, RuleError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Field(name) => field(name, claim),
        Expr::List(items) => Ok(Value::List(
            items
                .iter()
                .map(|item| eval(item, claim))
                .collect::<Result<_, _>>()?,
        )),
        Expr::Not(inner) => Ok(Value::Bool(!as_bool(eval(inner, claim)?, "not")?)),
        Expr::And(lhs, rhs) => {
            if !as_bool(eval(lhs, claim)?, "and")? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(as_bool(eval(rhs, claim)?, "and")?))
        }
        Expr::Or(lhs, rhs) => {
            if as_bool(eval(lhs, claim)?, "or")? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(as_bool(eval(rhs, claim)?, "or")?))
        }
        Expr::Compare(op, lhs, rhs) => compare(*op, eval(lhs, claim)?, eval(rhs, claim)?),
        Expr::In {
            needle,
            haystack,
            negated,
        } => {
            let found = contains(eval(haystack, claim)?, eval(needle, claim)?)?;
            Ok(Value::Bool(found != *negated))
        }
        Expr::Arith(op, lhs, rhs) => arith(*op, eval(lhs, claim)?, eval(rhs, claim)?),
        Expr::Call(func, arg) => call(*func, eval(arg, claim)?),
    }
}

fn as_bool(value: Value, context: &str) -> Result<bool, RuleError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(RuleError::TypeMismatch(format!(
            "'{}' expects bool operands, got {}",
            context,
            other.type_name()
        ))),
    }
}

fn compare(op: CmpOp, lhs: Value, rhs: Value) -> Result<Value, RuleError> {
    let ordering = match op {
        CmpOp::Eq => return Ok(Value::Bool(lhs == rhs)),
        CmpOp::Ne => return Ok(Value::Bool(lhs != rhs)),
        _ => match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => {
                return Err(RuleError::TypeMismatch(format!(
                    "cannot order {} and {}",
                    lhs.type_name(),
                    rhs.type_name()
                )))
            }
        },
    };

    // NaN compares false both ways
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };

    let result = match op {
        CmpOp::Lt => ordering == Ordering::Less,
        CmpOp::Le => ordering != Ordering::Greater,
        CmpOp::Gt => ordering == Ordering::Greater,
        CmpOp::Ge => ordering != Ordering::Less,
        CmpOp::Eq | CmpOp::Ne => unreachable!("equality handled above"),
    };
    Ok(Value::Bool(result))
}

fn contains(haystack: Value, needle: Value) -> Result<bool, RuleError> {
    match (haystack, needle) {
        (Value::Str(h), Value::Str(n)) => Ok(h.contains(n.as_str())),
        (Value::List(items), n) => Ok(items.contains(&n)),
        (Value::Str(_), n) => Err(RuleError::TypeMismatch(format!(
            "'in <string>' requires a string on the left, got {}",
            n.type_name()
        ))),
        (h, _) => Err(RuleError::TypeMismatch(format!(
            "'in' expects a string or list, got {}",
            h.type_name()
        ))),
    }
}

fn arith(op: ArithOp, lhs: Value, rhs: Value) -> Result<Value, RuleError> {
    match (op, lhs, rhs) {
        (ArithOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (_, Value::Number(_), Value::Number(b)) if op == ArithOp::Div && b == 0.0 => {
            Err(RuleError::DivisionByZero)
        }
        (op, Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
        })),
        (op, lhs, rhs) => Err(RuleError::TypeMismatch(format!(
            "unsupported operands for {:?}: {} and {}",
            op,
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

fn call(func: Func, arg: Value) -> Result<Value, RuleError> {
    match (func, arg) {
        (Func::Lower, Value::Str(s)) => Ok(Value::Str(s.to_lowercase())),
        (Func::Upper, Value::Str(s)) => Ok(Value::Str(s.to_uppercase())),
        (Func::Strip, Value::Str(s)) => Ok(Value::Str(s.trim().to_string())),
        (Func::Len, Value::Str(s)) => Ok(Value::Number(s.chars().count() as f64)),
        (Func::Len, Value::List(items)) => Ok(Value::Number(items.len() as f64)),
        (func, arg) => Err(RuleError::TypeMismatch(format!(
            "{:?} is not defined for {}",
            func,
            arg.type_name()
        ))),
    }
}
