use crate::parser::Token;
use crate::tree::{ExprTree, Node};
use crate::{CalcError, CalcResult};
use num::{Float, NumCast, ToPrimitive};

/// Evaluates a compiled expression tree and normalizes the result with
/// [`round_result`](round_result).
///
/// # Errors
///
/// Whatever the operator evaluations raise is propagated unchanged, e.g.,
/// [`ErrorKind::Domain`](crate::ErrorKind::Domain) for `(-1)!` or `1/0`.
///
pub fn eval_tree<T: Float>(tree: &ExprTree<T>) -> CalcResult<T> {
    let result = eval_node(&tree.nodes, tree.root)?
        .ok_or_else(|| CalcError::syntax("the expression is empty".to_string()))?;
    Ok(round_result(result))
}

/// Post-order walk. An absent node evaluates to an absent operand value,
/// which is how unary contexts reach the operator evaluations.
fn eval_node<T: Float>(nodes: &[Node<T>], idx: Option<usize>) -> CalcResult<Option<T>> {
    let idx = match idx {
        Some(idx) => idx,
        None => return Ok(None),
    };
    let node = &nodes[idx];
    match &node.token {
        Token::Num(n) => Ok(Some(*n)),
        Token::Op(op) => {
            let left = eval_node(nodes, node.left)?;
            let right = eval_node(nodes, node.right)?;
            let apply = op.apply.ok_or_else(|| {
                CalcError::internal(format!(
                    "'{}' cannot be evaluated and must not appear in a finished tree",
                    op.repr
                ))
            })?;
            apply(left, right).map(Some)
        }
    }
}

/// Rounds to 15 significant decimal digits to strip accumulated floating
/// point noise, so that `4^0.5` reports exactly `2` instead of something
/// like `2.0000000000000004`. Values that do not survive the round trip
/// through `f64` are returned unchanged.
pub fn round_result<T: Float>(x: T) -> T {
    let rounded = x
        .to_f64()
        .map(|f| format!("{:.14e}", f))
        .and_then(|s| s.parse::<f64>().ok())
        .and_then(|f| <T as NumCast>::from(f));
    rounded.unwrap_or(x)
}

#[test]
fn test_round_result() {
    assert_eq!(round_result(2.0000000000000004f64), 2.0);
    assert_eq!(round_result(0.30000000000000004f64), 0.3);
    assert_eq!(round_result(5.3f64), 5.3);
    assert_eq!(round_result(-1.0f64), -1.0);
    assert_eq!(round_result(65536.0f64), 65536.0);
    assert_eq!(round_result(1e300f64), 1e300);
    assert!(round_result(f64::INFINITY).is_infinite());
}

#[test]
fn test_eval_missing_operand() {
    use crate::operators::make_operators;
    use crate::parser::tokenize;
    use crate::tree::make_tree;
    let ops = make_operators::<f64>();
    let tree = make_tree(&tokenize("5*", &ops).unwrap()).unwrap();
    let err = eval_tree(&tree).unwrap_err();
    assert_eq!(err.kind, crate::ErrorKind::Syntax);
    assert!(err.msg.contains("operand"));
}
