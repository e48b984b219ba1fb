//! Safe rule-expression language
//!
//! Dynamic eligibility rules are stored as text and interpreted here. The
//! language only sees literals and the whitelisted claim fields; there is no
//! way to reach host code.
//!
//! # Examples
//!
//! ```
//! use claimwise_domain::ClaimSubmission;
//! use claimwise_eligibility::expr::{evaluate, parse_expression};
//!
//! let claim = ClaimSubmission::new("1234", "Acme Corp", "layoff", 5000.0, 12).unwrap();
//!
//! let rule = parse_expression("employment_months >= 6 && earnings >= 3000").unwrap();
//! assert!(evaluate(&rule, &claim).unwrap());
//! ```

mod ast;
mod eval;
mod parser;

pub use ast::{ArithOp, CmpOp, Expr, Func, Value};
pub use eval::{evaluate, FIELDS};
pub use parser::{parse_expression, MAX_EXPRESSION_LEN, MAX_NESTING};
