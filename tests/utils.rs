pub fn assert_float_eq(f1: f64, f2: f64, tol: f64) {
    if (f1 - f2).abs() >= tol {
        println!("floats not almost equal\nf1: {}\nf2: {}\n", f1, f2);
        assert!(false);
    }
}

pub fn assert_float_eq_f64(f1: f64, f2: f64) {
    assert_float_eq(f1, f2, 1e-8);
}
