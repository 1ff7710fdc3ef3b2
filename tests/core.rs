mod utils;
use treecalc::{compute, ErrorKind};
use utils::assert_float_eq_f64;

#[test]
fn test_valid_expressions() {
    let cases = [
        // basic operations
        ("4*3", 12.0),
        ("4+3", 7.0),
        ("(3)", 3.0),
        ("5-3", 2.0),
        ("5-6", -1.0),
        ("5*-6", -30.0),
        ("-3", -3.0),
        ("5/3", 1.666666666),
        ("5.3", 5.3),
        ("2.5 + 2.5 * 2", 7.5),
        ("sin(0.523598775)", 0.5),
        ("tan(1)", 1.557407725),
        ("cos(1)", 0.540302305),
        ("cos(pi)", -1.0),
        ("cos pi", -1.0),
        ("4^2", 16.0),
        ("4^(1/2)", 2.0),
        ("4^0.5", 2.0),
        ("(3)-2", 1.0),
        ("3!^2", 36.0),
        ("5!+1", 121.0),
        // whitespace
        (" 4 + 3 ", 7.0),
        // order of operations
        ("4+3*7", 25.0),
        ("3*7+4", 25.0),
        ("(3+4)*7/7", 7.0),
        ("2 + ((1+1)*2)*2 ", 10.0),
        ("2 + ((-1+1)*2)*2 ", 2.0),
        ("1-1^2", 0.0),
        ("-1^2", -1.0),
        ("4^2^3", 65536.0),
        ("6 / 3 * 2", 4.0),
        ("cos(0)*2", 2.0),
        ("sin (pi/2) * 2", 2.0),
        ("-cos (-pi)", 1.0),
    ];
    for (expr, reference) in cases {
        println!("testing {}...", expr);
        assert_float_eq_f64(compute::<f64>(expr).unwrap(), reference);
    }
}

#[test]
fn test_right_associativity() {
    // 4^(2^3), not (4^2)^3
    assert_eq!(compute::<f64>("4^2^3").unwrap(), 65536.0);
    assert_eq!(compute::<f64>("2^3!").unwrap(), 64.0);
}

#[test]
fn test_integer_collapse() {
    // float noise is rounded away, the results are exact
    assert_eq!(compute::<f64>("4^(1/2)").unwrap(), 2.0);
    assert_eq!(compute::<f64>("4^0.5").unwrap(), 2.0);
    assert_eq!(compute::<f64>("0.1+0.2").unwrap(), 0.3);
}

#[test]
fn test_unary_minus() {
    assert_eq!(compute::<f64>("5*-6").unwrap(), -30.0);
    assert_eq!(compute::<f64>("5-6").unwrap(), -1.0);
    assert_eq!(compute::<f64>("-3").unwrap(), -3.0);
    assert_eq!(compute::<f64>("--3").unwrap(), 3.0);
    assert_eq!(compute::<f64>("-1-1").unwrap(), -2.0);
    assert_eq!(compute::<f64>("-3!").unwrap(), -6.0);
}

#[test]
fn test_subtraction_after_group_associates_left() {
    assert_eq!(compute::<f64>("2-(3+4)-2").unwrap(), -7.0);
    assert_eq!(compute::<f64>("10-(2)+3").unwrap(), 11.0);
    assert_eq!(compute::<f64>("sin(0)-1").unwrap(), -1.0);
    assert_eq!(compute::<f64>("3!-2").unwrap(), 4.0);
}

#[test]
fn test_implicit_function_brackets() {
    assert_eq!(
        compute::<f64>("sin pi").unwrap(),
        compute::<f64>("sin(pi)").unwrap()
    );
    assert_eq!(
        compute::<f64>("sin 0.5").unwrap(),
        compute::<f64>("sin(0.5)").unwrap()
    );
    // only the literal itself gets wrapped
    assert_eq!(
        compute::<f64>("sin 1+1").unwrap(),
        compute::<f64>("sin(1)+1").unwrap()
    );
    assert!(compute::<f64>("sin sin 1").is_err());
    assert!(compute::<f64>("sin -3").is_err());
}

#[test]
fn test_error_kinds() {
    let kind = |text: &str| compute::<f64>(text).unwrap_err().kind;
    assert_eq!(kind("(3"), ErrorKind::Bracket);
    assert_eq!(kind("((4+5)"), ErrorKind::Bracket);
    assert_eq!(kind("3))"), ErrorKind::Bracket);
    assert_eq!(kind("3.4."), ErrorKind::Syntax);
    assert_eq!(kind("log(2)"), ErrorKind::Syntax);
    assert_eq!(kind(""), ErrorKind::Syntax);
    assert_eq!(kind("5*"), ErrorKind::Syntax);
    assert_eq!(kind("()"), ErrorKind::Syntax);
    assert_eq!(kind("0.5!"), ErrorKind::Domain);
    assert_eq!(kind("(-1)!"), ErrorKind::Domain);
    assert_eq!(kind("1/0"), ErrorKind::Domain);
}

#[test]
fn test_idempotence() {
    let first = compute::<f64>("2 + ((1+1)*2)*2").unwrap();
    let second = compute::<f64>("2 + ((1+1)*2)*2").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, 10.0);
}
