use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::DigitNetError;
use crate::stats::*;

#[test]
fn test_summary_statistics() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert_eq!(min(&values).unwrap(), 2.0);
    assert_eq!(max(&values).unwrap(), 9.0);
    assert_eq!(mean(&values).unwrap(), 5.0);
    assert_eq!(std_dev(&values).unwrap(), 2.0);
}

#[test]
fn test_empty_input_is_rejected() {
    assert!(matches!(min(&[]), Err(DigitNetError::InvalidArgument { .. })));
    assert!(matches!(mean(&[]), Err(DigitNetError::InvalidArgument { .. })));
    let mut empty: [f64; 0] = [];
    assert!(normalize(&mut empty).is_err());
    assert!(standardize(&mut empty).is_err());
}

#[test]
fn test_normalize() {
    let mut values = [0.0, 2.0, 4.0, 8.0];
    normalize(&mut values).unwrap();
    assert_eq!(values, [0.0, 0.25, 0.5, 1.0]);
}

#[test]
fn test_standardize() {
    let mut values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    standardize(&mut values).unwrap();
    assert!(mean(&values).unwrap().abs() < 1e-12);
    assert!((std_dev(&values).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_constant_input_is_left_untouched() {
    let mut values = [3.0; 5];
    normalize(&mut values).unwrap();
    assert_eq!(values, [3.0; 5]);
    standardize(&mut values).unwrap();
    assert_eq!(values, [3.0; 5]);
}

#[test]
fn test_random_uniform() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let v = random_uniform(&mut rng, -0.5, 0.5).unwrap();
        assert!((-0.5..=0.5).contains(&v));
    }
    assert_eq!(random_uniform(&mut rng, 2.0, 2.0).unwrap(), 2.0);
    assert!(random_uniform(&mut rng, 1.0, 0.0).is_err());
    assert!(random_uniform(&mut rng, 0.0, f64::INFINITY).is_err());
}

#[test]
fn test_approx_eq() {
    assert!(approx_eq(0.1 + 0.2, 0.3));
    assert!(!approx_eq(1.0, 1.0001));
}
