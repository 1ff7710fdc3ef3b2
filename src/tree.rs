use crate::definitions::N_NODES_ON_STACK;
use crate::operators::{self, OpKind, Prec, SwapRule};
use crate::parser::Token;
use crate::{CalcError, CalcResult};
use smallvec::SmallVec;

type NodeVec<T> = SmallVec<[Node<T>; N_NODES_ON_STACK]>;

/// One arena-allocated node of an expression tree. The child indices own
/// the subtrees; `parent` is a navigational back-reference that is only
/// followed while the tree is under construction.
#[derive(Clone, Debug)]
pub struct Node<T: Copy> {
    pub token: Token<T>,
    pub parent: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl<T: Copy> Node<T> {
    fn new(token: Token<T>) -> Self {
        Node {
            token,
            parent: None,
            left: None,
            right: None,
        }
    }
}

/// An expression compiled into a binary tree. The nodes live in an arena
/// indexed by `usize`; `root` is the right child of the synthetic outermost
/// bracket and absent for expressions without content such as `()`.
#[derive(Clone, Debug)]
pub struct ExprTree<T: Copy> {
    pub(crate) nodes: NodeVec<T>,
    pub(crate) root: Option<usize>,
}

fn is_open<T: Copy>(node: &Node<T>) -> bool {
    matches!(&node.token, Token::Op(op) if op.kind == OpKind::Open)
}

/// A node carries a value of its own if it is a number, a constant, a
/// postfix operator, or a closed sub-expression spliced in by a bracket.
fn is_value_like<T: Copy>(node: &Node<T>) -> bool {
    match &node.token {
        Token::Num(_) => true,
        Token::Op(op) => {
            matches!(op.kind, OpKind::Constant | OpKind::Postfix) || node.right.is_some()
        }
    }
}

fn allows_swap_at<T: Copy>(rule: SwapRule, node: &Node<T>) -> bool {
    match rule {
        SwapRule::Always => true,
        SwapRule::Never => false,
        SwapRule::AfterValue => is_value_like(node),
    }
}

fn node_swap_rule<T: Copy>(node: &Node<T>) -> SwapRule {
    match &node.token {
        Token::Num(_) => SwapRule::Always,
        Token::Op(op) => op.swap,
    }
}

fn node_prec<T: Copy>(node: &Node<T>) -> Prec {
    match &node.token {
        Token::Num(_) => Prec::Inf,
        Token::Op(op) => op.prec.unwrap_or(Prec::Inf),
    }
}

fn incoming_prec<T: Copy>(token: &Token<T>) -> (Prec, bool) {
    match token {
        Token::Num(_) => (Prec::Inf, false),
        Token::Op(op) => (op.prec.unwrap_or(Prec::Inf), op.right_associative),
    }
}

/// The rotation condition: keep walking upward while the node at the cursor
/// binds at least as strongly as the incoming token (strictly stronger for
/// right-associative ones) and permits being rotated past.
fn should_move_up<T: Copy>(nodes: &NodeVec<T>, active: usize, token: &Token<T>) -> bool {
    let node = &nodes[active];
    if !allows_swap_at(node_swap_rule(node), node) {
        return false;
    }
    let (new_prec, right_associative) = incoming_prec(token);
    if right_associative {
        node_prec(node) > new_prec
    } else {
        node_prec(node) >= new_prec
    }
}

/// Hangs `new_idx` below `parent` as its right child. A right child that is
/// already in place becomes the left operand of the new node.
fn insert_below<T: Copy>(nodes: &mut NodeVec<T>, parent: usize, new_idx: usize) {
    let displaced = nodes[parent].right;
    nodes[new_idx].left = displaced;
    if let Some(d) = displaced {
        nodes[d].parent = Some(new_idx);
    }
    nodes[parent].right = Some(new_idx);
    nodes[new_idx].parent = Some(parent);
}

/// Handles a closing bracket: finds the nearest enclosing opening bracket
/// and splices it out of the tree, re-parenting its content. Returns the new
/// active index.
fn splice_bracket<T: Copy>(nodes: &mut NodeVec<T>, active: usize) -> CalcResult<usize> {
    let mut idx = active;
    while !is_open(&nodes[idx]) {
        idx = nodes[idx]
            .parent
            .ok_or_else(|| CalcError::internal("missing matching bracket".to_string()))?;
    }
    if nodes[idx].left.is_some() {
        return Err(CalcError::internal(
            "a bracket node cannot have a left child".to_string(),
        ));
    }
    let parent = nodes[idx]
        .parent
        .ok_or_else(|| CalcError::internal("cannot splice out the tree root".to_string()))?;
    if nodes[parent].right != Some(idx) {
        return Err(CalcError::internal(
            "a bracket node must be the right child of its parent".to_string(),
        ));
    }
    let inner = nodes[idx].right;
    nodes[parent].right = inner;
    if let Some(inner_idx) = inner {
        nodes[inner_idx].parent = Some(parent);
    }
    Ok(parent)
}

/// Builds the expression tree from a balanced token sequence in one pass.
///
/// The builder keeps an active cursor at the most recently inserted node.
/// Every token that is eligible per its [`SwapRule`](crate::SwapRule) first
/// rotates the cursor upward as far as precedence demands and is then hung
/// below the cursor, displacing the subtree there into its left operand.
/// Brackets only scaffold this process; none of them survives in the result.
///
/// # Errors
///
/// Sequences that did not pass [`check_brackets`](crate::parser::check_brackets)
/// can trip the builder's consistency checks, which are reported as
/// [`ErrorKind::Internal`](crate::ErrorKind::Internal).
///
pub fn make_tree<T: Copy>(tokens: &[Token<T>]) -> CalcResult<ExprTree<T>> {
    let mut nodes = NodeVec::<T>::new();
    nodes.push(Node::new(Token::Op(operators::open_bracket())));
    let mut active = 0usize;

    for token in tokens {
        if let Token::Op(op) = token {
            if op.kind == OpKind::Close {
                active = splice_bracket(&mut nodes, active)?;
                continue;
            }
        }
        let eligible = match token {
            Token::Num(_) => true,
            Token::Op(op) => allows_swap_at(op.swap, &nodes[active]),
        };
        if eligible {
            while should_move_up(&nodes, active, token) {
                active = nodes[active].parent.ok_or_else(|| {
                    CalcError::internal("rotation walked past the tree root".to_string())
                })?;
            }
        }
        let new_idx = nodes.len();
        nodes.push(Node::new(*token));
        insert_below(&mut nodes, active, new_idx);
        active = new_idx;
    }

    let root = nodes[0].right;
    Ok(ExprTree { nodes, root })
}

#[cfg(test)]
use crate::operators::make_operators;
#[cfg(test)]
use crate::parser::tokenize;

#[cfg(test)]
fn repr_of<T: Copy>(tree: &ExprTree<T>, idx: Option<usize>) -> String {
    match idx.map(|i| &tree.nodes[i].token) {
        Some(Token::Op(op)) => op.repr.to_string(),
        Some(Token::Num(_)) => "num".to_string(),
        None => "-".to_string(),
    }
}

#[test]
fn test_precedence_shape() {
    let ops = make_operators::<f64>();
    let tokens = tokenize("4+3*7", &ops).unwrap();
    let tree = make_tree(&tokens).unwrap();
    // the later-evaluated + ends up on top with * below on its right
    assert_eq!(repr_of(&tree, tree.root), "+");
    let root = tree.root.unwrap();
    assert_eq!(repr_of(&tree, tree.nodes[root].left), "num");
    assert_eq!(repr_of(&tree, tree.nodes[root].right), "*");

    let tokens = tokenize("3*7+4", &ops).unwrap();
    let tree = make_tree(&tokens).unwrap();
    assert_eq!(repr_of(&tree, tree.root), "+");
    let root = tree.root.unwrap();
    assert_eq!(repr_of(&tree, tree.nodes[root].left), "*");
}

#[test]
fn test_right_associative_shape() {
    let ops = make_operators::<f64>();
    let tokens = tokenize("4^2^3", &ops).unwrap();
    let tree = make_tree(&tokens).unwrap();
    // 4^(2^3): the first ^ keeps the top spot
    let root = tree.root.unwrap();
    assert_eq!(repr_of(&tree, tree.root), "^");
    assert_eq!(repr_of(&tree, tree.nodes[root].left), "num");
    assert_eq!(repr_of(&tree, tree.nodes[root].right), "^");
}

#[test]
fn test_brackets_leave_no_trace() {
    let ops = make_operators::<f64>();
    let tokens = tokenize("(3+4)*7", &ops).unwrap();
    let tree = make_tree(&tokens).unwrap();
    let root = tree.root.unwrap();
    assert_eq!(repr_of(&tree, tree.root), "*");
    assert_eq!(repr_of(&tree, tree.nodes[root].left), "+");
    // no reachable node is a bracket
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        assert!(!is_open(&tree.nodes[idx]));
        stack.extend(tree.nodes[idx].left);
        stack.extend(tree.nodes[idx].right);
    }
}

#[test]
fn test_unary_minus_shape() {
    let ops = make_operators::<f64>();
    // 5*-6: the minus hangs below * with an empty left slot
    let tokens = tokenize("5*-6", &ops).unwrap();
    let tree = make_tree(&tokens).unwrap();
    let root = tree.root.unwrap();
    assert_eq!(repr_of(&tree, tree.root), "*");
    let minus = tree.nodes[root].right.unwrap();
    assert_eq!(repr_of(&tree, Some(minus)), "-");
    assert!(tree.nodes[minus].left.is_none());

    // 5-6: the minus takes the 5 as its left operand
    let tokens = tokenize("5-6", &ops).unwrap();
    let tree = make_tree(&tokens).unwrap();
    let root = tree.root.unwrap();
    assert_eq!(repr_of(&tree, tree.root), "-");
    assert!(tree.nodes[root].left.is_some());
}

#[test]
fn test_unvalidated_sequence_is_internal_error() {
    let ops = make_operators::<f64>();
    let tokens = tokenize("3)", &ops).unwrap();
    let err = make_tree(&tokens).unwrap_err();
    assert_eq!(err.kind, crate::ErrorKind::Internal);
}
