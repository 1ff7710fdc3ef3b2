use crate::operators::{self, OpKind, Operator};
use crate::{CalcError, CalcResult};
use lazy_static::lazy_static;
use regex::Regex;
use smallvec::SmallVec;
use std::str::FromStr;

/// A scanned piece of the input, either a numeric literal or a reference to
/// a registered operator. Tokens are the nodes-to-be of the expression tree.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Token<T: Copy> {
    Num(T),
    Op(Operator<T>),
}

/// Checks whether the text starts with a numeric literal and returns it if
/// so. Literals are digit runs with at most one dot, e.g., `4.`, `.4`, and
/// `23.414`, but not `.` or `3.4.`.
pub fn is_numeric_text(text: &str) -> Option<&str> {
    let mut n_dots = 0;
    let n_num_chars = text
        .chars()
        .take_while(|c| {
            let is_dot = *c == '.';
            if is_dot {
                n_dots += 1;
            }
            c.is_ascii_digit() || is_dot
        })
        .count();
    if (n_num_chars > 1 && n_dots < 2) || (n_num_chars == 1 && n_dots == 0) {
        Some(&text[0..n_num_chars])
    } else {
        None
    }
}

/// Converts text into the token sequence the tree is built from.
///
/// The scan walks the input left to right and takes, at every offset, the
/// longest match of either a numeric literal or a registered symbol. Sorting
/// the symbols inverse-alphabetically makes the longest symbol win, which
/// keeps multi-letter names such as `sin` distinguishable without lookahead.
/// After the scan, bare function arguments get their brackets synthesized,
/// so `sin 0.5` ends up as `sin ( 0.5 )`.
///
/// # Errors
///
/// Malformed literals and unknown symbols are reported as
/// [`ErrorKind::Syntax`](crate::ErrorKind::Syntax).
///
pub fn tokenize<T>(text: &str, ops: &[Operator<T>]) -> CalcResult<Vec<Token<T>>>
where
    T: Copy + FromStr,
{
    if text.chars().any(|c| !c.is_ascii()) {
        return Err(CalcError::syntax(
            "only ascii characters are supported".to_string(),
        ));
    }

    let mut ops_sorted = ops.iter().collect::<SmallVec<[_; 16]>>();
    ops_sorted.sort_unstable_by(|o1, o2| o2.repr.cmp(o1.repr));

    lazy_static! {
        static ref RE_NAME: Regex = Regex::new(r"^[a-zA-Z_]+[a-zA-Z_0-9]*").unwrap();
    }

    let find_op = |rest: &str| ops_sorted.iter().find(|op| rest.starts_with(op.repr));

    let mut tokens = Vec::new();
    let mut cur_offset = 0usize;
    while cur_offset < text.len() {
        let text_rest = &text[cur_offset..];
        let c = text_rest.as_bytes()[0] as char;
        if c.is_ascii_whitespace() {
            cur_offset += 1;
        } else if let Some(num_str) = is_numeric_text(text_rest) {
            cur_offset += num_str.len();
            let num = num_str.parse::<T>().map_err(|_| {
                CalcError::syntax(format!("could not parse '{}' as a number", num_str))
            })?;
            tokens.push(Token::Num(num));
        } else if let Some(op) = find_op(text_rest) {
            cur_offset += op.repr.len();
            tokens.push(Token::Op(**op));
        } else if let Some(name) = RE_NAME.find(text_rest) {
            return Err(CalcError::syntax(format!(
                "unknown function or constant '{}'",
                name.as_str()
            )));
        } else {
            return Err(CalcError::syntax(format!(
                "do not know how to tokenize the beginning of '{}'",
                text_rest
            )));
        }
    }
    if tokens.is_empty() {
        return Err(CalcError::syntax("cannot parse empty string".to_string()));
    }
    insert_function_brackets(tokens, ops)
}

/// Synthesizes brackets around bare function arguments, `sin 0.5` becomes
/// `sin ( 0.5 )`. A bare argument must be a single literal or constant.
fn insert_function_brackets<T: Copy>(
    mut tokens: Vec<Token<T>>,
    ops: &[Operator<T>],
) -> CalcResult<Vec<Token<T>>> {
    let open = *operators::lookup(ops, "(")
        .ok_or_else(|| CalcError::internal("operator table lost its brackets".to_string()))?;
    let close = *operators::lookup(ops, ")")
        .ok_or_else(|| CalcError::internal("operator table lost its brackets".to_string()))?;

    let mut i = 0;
    while i + 1 < tokens.len() {
        let needs_brackets = match (&tokens[i], &tokens[i + 1]) {
            (Token::Op(op), next) if op.kind == OpKind::Function => match next {
                Token::Num(_) => true,
                Token::Op(next_op) if next_op.kind == OpKind::Open => false,
                Token::Op(next_op) if next_op.kind == OpKind::Constant => true,
                _ => {
                    return Err(CalcError::syntax(format!(
                        "the argument of '{}' needs brackets",
                        op.repr
                    )))
                }
            },
            _ => false,
        };
        if needs_brackets {
            tokens.insert(i + 1, Token::Op(open));
            tokens.insert(i + 3, Token::Op(close));
        }
        i += 1;
    }
    Ok(tokens)
}

/// Verifies bracket balance. Must run before the tree is built; the builder
/// assumes a balanced sequence.
///
/// # Errors
///
/// [`ErrorKind::Bracket`](crate::ErrorKind::Bracket), reported at the
/// offending token for surplus closing brackets and at the end of the scan
/// for surplus opening ones.
///
pub fn check_brackets<T: Copy>(tokens: &[Token<T>]) -> CalcResult<()> {
    let mut open_cnt = 0i32;
    for (i, token) in tokens.iter().enumerate() {
        if let Token::Op(op) = token {
            match op.kind {
                OpKind::Open => open_cnt += 1,
                OpKind::Close => {
                    open_cnt -= 1;
                    if open_cnt < 0 {
                        return Err(CalcError::bracket(format!(
                            "too many closing brackets until position {}",
                            i
                        )));
                    }
                }
                _ => (),
            }
        }
    }
    if open_cnt != 0 {
        return Err(CalcError::bracket("too many opening brackets".to_string()));
    }
    Ok(())
}

#[cfg(test)]
use crate::operators::make_operators;
#[cfg(test)]
use crate::ErrorKind;

#[test]
fn test_is_numeric() {
    assert_eq!(is_numeric_text("5/6").unwrap(), "5");
    assert!(is_numeric_text(".").is_none());
    assert!(is_numeric_text("o.4").is_none());
    assert_eq!(is_numeric_text("6").unwrap(), "6");
    assert_eq!(is_numeric_text("4.").unwrap(), "4.");
    assert_eq!(is_numeric_text(".4").unwrap(), ".4");
    assert_eq!(is_numeric_text("23.414").unwrap(), "23.414");
    assert!(is_numeric_text("3.4.").is_none());
}

#[test]
fn test_tokenize() {
    let ops = make_operators::<f64>();
    assert_eq!(tokenize("4+3*7", &ops).unwrap().len(), 5);
    assert_eq!(tokenize(" 4 + 3 ", &ops).unwrap().len(), 3);
    // `pi` and `sin` are matched greedily against the table
    assert_eq!(tokenize("sin(pi)", &ops).unwrap().len(), 4);
    assert!(matches!(
        tokenize("2~3", &ops),
        Err(CalcError {
            kind: ErrorKind::Syntax,
            ..
        })
    ));
    assert!(matches!(
        tokenize("log(2)", &ops),
        Err(CalcError {
            kind: ErrorKind::Syntax,
            ..
        })
    ));
    assert!(tokenize("", &ops).is_err());
    assert!(tokenize("   ", &ops).is_err());
    assert!(tokenize("ӭ", &ops).is_err());
    assert!(tokenize("3.4.", &ops).is_err());
}

#[test]
fn test_function_brackets() {
    let ops = make_operators::<f64>();
    // sin 0.5 -> sin ( 0.5 )
    let tokens = tokenize("sin 0.5", &ops).unwrap();
    assert_eq!(tokens.len(), 4);
    assert!(matches!(&tokens[1], Token::Op(op) if op.kind == OpKind::Open));
    assert!(matches!(&tokens[3], Token::Op(op) if op.kind == OpKind::Close));
    // constants count as bare arguments
    assert_eq!(tokenize("cos pi", &ops).unwrap().len(), 4);
    // anything else needs explicit brackets
    assert!(tokenize("sin sin 1", &ops).is_err());
    assert!(tokenize("sin -3", &ops).is_err());
}

#[test]
fn test_check_brackets() {
    let ops = make_operators::<f64>();
    let check = |text: &str| check_brackets(&tokenize(text, &ops).unwrap());
    assert!(check("(3+4)*7").is_ok());
    assert!(check("sin 0.5").is_ok());
    let err = check("(3").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Bracket);
    assert!(err.msg.contains("opening"));
    let err = check("3))").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Bracket);
    assert!(err.msg.contains("closing"));
}
