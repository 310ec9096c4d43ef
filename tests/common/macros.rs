/// Asserts two floats agree within a tolerance (default 1e-9).
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        assert_close!($left, $right, 1e-9)
    };
    ($left:expr, $right:expr, $tol:expr) => {{
        let (l, r): (f64, f64) = ($left, $right);
        assert!(
            (l - r).abs() <= $tol,
            "{} = {} is not within {} of {}",
            stringify!($left),
            l,
            $tol,
            r
        );
    }};
}

/// Asserts a diet validation raised the given alert code.
#[macro_export]
macro_rules! assert_alert {
    ($validation:expr, $code:expr) => {
        assert!(
            $validation.has($code),
            "Expected alert {:?}, got {:?}",
            $code,
            $validation.alerts.iter().map(|a| a.code).collect::<Vec<_>>()
        );
    };
}

/// Asserts a series of growth points never loses weight.
#[macro_export]
macro_rules! assert_monotone_weight {
    ($points:expr) => {
        for pair in $points.windows(2) {
            assert!(
                pair[1].weight >= pair[0].weight,
                "Weight dropped from {} to {} on {}",
                pair[0].weight,
                pair[1].weight,
                pair[1].date
            );
        }
    };
}
