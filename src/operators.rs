use crate::{CalcError, CalcResult};
use num::traits::FloatConst;
use num::Float;

/// Syntactic category of a registered symbol.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum OpKind {
    /// Zero-arity symbol such as `pi` that evaluates to a fixed value.
    Constant,
    /// Binary operator. `+` and `-` also act as prefix sign operators when
    /// there is no left operand.
    Infix,
    /// Postfix operator whose operand arrives on the left, i.e., `!`.
    Postfix,
    /// Named function applied to its bracketed right operand.
    Function,
    Open,
    Close,
}

/// Whether inserting an operator into the tree may rotate the active cursor
/// upward past existing nodes.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SwapRule {
    Always,
    /// Pins the subtree below, used by the opening bracket.
    Never,
    /// Rotate only if the node before the operator carries a value of its
    /// own, i.e., a number, a constant, a postfix operator, or a closed
    /// sub-expression. This is what distinguishes `5-6` from `5*-6`.
    AfterValue,
}

/// Precedence rank. Brackets, constants, and functions are `Inf` so that no
/// rotation ever displaces them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum Prec {
    Finite(i32),
    Inf,
}

/// One row of the operator table.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Operator<T: Copy> {
    /// Representation of the operator in the string to be parsed, e.g., `-` or `sin`.
    pub repr: &'static str,
    pub kind: OpKind,
    /// `None` only for the closing bracket which never makes it into a tree.
    pub prec: Option<Prec>,
    /// True only for exponentiation, since `4^2^3` is `4^(2^3)`.
    pub right_associative: bool,
    pub swap: SwapRule,
    /// Evaluation taking the already-evaluated operands. An absent left
    /// operand signals a unary context. Brackets have no evaluation.
    pub apply: Option<fn(Option<T>, Option<T>) -> CalcResult<T>>,
}

fn operand<T>(x: Option<T>, repr: &str, side: &str) -> CalcResult<T> {
    x.ok_or_else(|| CalcError::syntax(format!("'{}' is missing its {} operand", repr, side)))
}

/// `x!` for non-negative whole numbers.
fn factorial<T: Float>(x: T) -> CalcResult<T> {
    if x < T::zero() || x.fract() != T::zero() {
        return Err(CalcError::domain(
            "factorial needs a non-negative integer".to_string(),
        ));
    }
    let mut result = T::one();
    let mut k = T::one();
    while k <= x {
        result = result * k;
        k = k + T::one();
    }
    Ok(result)
}

/// The opening bracket doubles as the synthetic root of every tree under
/// construction, so it gets its own constructor.
pub fn open_bracket<T: Copy>() -> Operator<T> {
    Operator {
        repr: "(",
        kind: OpKind::Open,
        prec: Some(Prec::Inf),
        right_associative: false,
        swap: SwapRule::Never,
        apply: None,
    }
}

/// Returns the operator table. The table is immutable; it is re-created per
/// call since the entries are instantiated for the numeric type `T`.
pub fn make_operators<T: Float + FloatConst>() -> Vec<Operator<T>> {
    vec![
        Operator {
            repr: "^",
            kind: OpKind::Infix,
            prec: Some(Prec::Finite(4)),
            right_associative: true,
            swap: SwapRule::Always,
            apply: Some(|l, r| Ok(operand(l, "^", "left")?.powf(operand(r, "^", "right")?))),
        },
        Operator {
            repr: "*",
            kind: OpKind::Infix,
            prec: Some(Prec::Finite(3)),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|l, r| Ok(operand(l, "*", "left")? * operand(r, "*", "right")?)),
        },
        Operator {
            repr: "/",
            kind: OpKind::Infix,
            prec: Some(Prec::Finite(3)),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|l, r| {
                let numer = operand(l, "/", "left")?;
                let denom = operand(r, "/", "right")?;
                if denom == T::zero() {
                    Err(CalcError::domain("division by zero".to_string()))
                } else {
                    Ok(numer / denom)
                }
            }),
        },
        Operator {
            repr: "+",
            kind: OpKind::Infix,
            prec: Some(Prec::Finite(2)),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|l, r| {
                let r = operand(r, "+", "right")?;
                Ok(match l {
                    Some(l) => l + r,
                    None => r,
                })
            }),
        },
        Operator {
            repr: "-",
            kind: OpKind::Infix,
            prec: Some(Prec::Finite(2)),
            right_associative: false,
            swap: SwapRule::AfterValue,
            apply: Some(|l, r| {
                let r = operand(r, "-", "right")?;
                Ok(match l {
                    Some(l) => l - r,
                    None => -r,
                })
            }),
        },
        Operator {
            repr: "!",
            kind: OpKind::Postfix,
            prec: Some(Prec::Finite(5)),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|l, _| factorial(operand(l, "!", "left")?)),
        },
        open_bracket(),
        Operator {
            repr: ")",
            kind: OpKind::Close,
            prec: None,
            right_associative: false,
            swap: SwapRule::Always,
            apply: None,
        },
        Operator {
            repr: "sin",
            kind: OpKind::Function,
            prec: Some(Prec::Inf),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|_, r| Ok(operand(r, "sin", "right")?.sin())),
        },
        Operator {
            repr: "cos",
            kind: OpKind::Function,
            prec: Some(Prec::Inf),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|_, r| Ok(operand(r, "cos", "right")?.cos())),
        },
        Operator {
            repr: "tan",
            kind: OpKind::Function,
            prec: Some(Prec::Inf),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|_, r| Ok(operand(r, "tan", "right")?.tan())),
        },
        Operator {
            repr: "pi",
            kind: OpKind::Constant,
            prec: Some(Prec::Inf),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|_, _| Ok(T::PI())),
        },
        Operator {
            repr: "e",
            kind: OpKind::Constant,
            prec: Some(Prec::Inf),
            right_associative: false,
            swap: SwapRule::Always,
            apply: Some(|_, _| Ok(T::E())),
        },
    ]
}

/// Finds the table entry of a symbol, if registered.
pub fn lookup<'a, T: Copy>(ops: &'a [Operator<T>], repr: &str) -> Option<&'a Operator<T>> {
    ops.iter().find(|o| o.repr == repr)
}

#[test]
fn test_factorial() {
    assert_eq!(factorial(0.0f64).unwrap(), 1.0);
    assert_eq!(factorial(1.0f64).unwrap(), 1.0);
    assert_eq!(factorial(5.0f64).unwrap(), 120.0);
    assert!(factorial(-1.0f64).is_err());
    assert!(factorial(0.5f64).is_err());
}

#[test]
fn test_prec_order() {
    assert!(Prec::Finite(2) < Prec::Finite(3));
    assert!(Prec::Finite(5) < Prec::Inf);
    assert!(None < Some(Prec::Finite(2)));
}

#[test]
fn test_lookup() {
    let ops = make_operators::<f64>();
    assert_eq!(lookup(&ops, "sin").unwrap().kind, OpKind::Function);
    assert_eq!(lookup(&ops, ")").unwrap().prec, None);
    assert!(lookup(&ops, "log").is_none());
}
