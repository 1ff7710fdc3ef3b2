//! Treecalc evaluates arithmetic expressions given as text, e.g.,
//! `2 + ((1+1)*2)*2` or `sin(pi/2)*2`.
//!
//! An expression is tokenized, checked for bracket balance, compiled into a
//! binary expression tree in a single pass over the tokens, and evaluated by
//! a post-order walk of that tree. Operator precedence, associativity, and
//! the two faces of `-` are resolved during tree construction by rotating an
//! active cursor upward through the partially built tree. See
//! [`tree::make_tree`](tree::make_tree) for the mechanics.
//!
//! ```rust
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let result = treecalc::compute::<f64>("2 + ((1+1)*2)*2")?;
//! assert!((result - 10.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! Supported are `+`, `-`, `*`, `/`, `^`, the postfix factorial `!`,
//! brackets, the functions `sin`, `cos`, and `tan` (radians), and the
//! constants `pi` and `e`. Function arguments consisting of a single number
//! or constant do not need brackets, `sin pi` works. There are no variables
//! and no user-defined functions.

mod definitions;
pub mod eval;
pub mod operators;
pub mod parser;
mod result;
pub mod tree;

pub use crate::operators::{make_operators, OpKind, Operator, Prec, SwapRule};
pub use crate::parser::Token;
pub use crate::result::{CalcError, CalcResult, ErrorKind};
pub use crate::tree::ExprTree;

use num::traits::FloatConst;
use num::Float;
use std::str::FromStr;

/// Evaluates an expression in one shot, composing tokenizer, bracket check,
/// tree builder, and evaluator. Each call is independent and builds its own
/// token list and tree.
///
/// # Errors
///
/// The error of whichever stage failed is propagated unchanged; its
/// [`ErrorKind`](ErrorKind) names the stage.
///
pub fn compute<T>(text: &str) -> CalcResult<T>
where
    T: Float + FloatConst + FromStr,
{
    let ops = make_operators::<T>();
    let tokens = parser::tokenize(text, &ops)?;
    parser::check_brackets(&tokens)?;
    let tree = tree::make_tree(&tokens)?;
    eval::eval_tree(&tree)
}

#[cfg(test)]
mod tests {
    use crate::{compute, ErrorKind};

    #[test]
    fn test_compute() {
        assert_eq!(compute::<f64>("4+3*7").unwrap(), 25.0);
        assert_eq!(compute::<f64>("4^(1/2)").unwrap(), 2.0);
        assert_eq!(compute::<f64>("5*-6").unwrap(), -30.0);
        assert!((compute::<f64>("sin(pi/2)*2").unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_error_kinds() {
        assert_eq!(compute::<f64>("3.4.").unwrap_err().kind, ErrorKind::Syntax);
        assert_eq!(compute::<f64>("(3").unwrap_err().kind, ErrorKind::Bracket);
        assert_eq!(compute::<f64>("0.5!").unwrap_err().kind, ErrorKind::Domain);
    }
}
