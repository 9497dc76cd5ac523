//! Every compiled-in backend must agree with the reference fold

use finmetrix::{
    active_backend, compute_twr, compute_twr_with, kernels, Backend, ReturnsError, TwrCalculator,
    TwrConfig, ValidationPolicy,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn parity_cases() -> Vec<Vec<f64>> {
    vec![
        vec![0.05],
        vec![0.1, -0.1],
        vec![0.05, 0.03, -0.02],
        vec![0.001; 100],
        vec![-0.5, 0.5, -0.3, 0.3],
        (0..5_000).map(|i| ((i % 17) as f64 - 8.0) / 500.0).collect(),
    ]
}

#[test]
fn active_backend_is_compiled_in() {
    init_tracing();
    let backend = active_backend();
    assert!(backend.is_available());
    assert!(Backend::available().contains(&backend));
}

#[test]
fn backends_match_reference_numerically() {
    init_tracing();
    for returns in parity_cases() {
        let reference = kernels::reference(&returns);

        for backend in Backend::available() {
            let value = compute_twr_with(&returns, backend).unwrap();
            assert!(
                (value - reference).abs() <= 1e-10 * reference.abs().max(1e-3),
                "mismatch on {backend} for {} returns: reference={reference}, got={value}",
                returns.len()
            );
        }
    }
}

#[test]
fn public_entry_point_matches_reference() {
    init_tracing();
    for returns in parity_cases() {
        let reference = kernels::reference(&returns);
        let value = compute_twr(&returns).unwrap();
        assert!((value - reference).abs() <= 1e-10 * reference.abs().max(1e-3));
    }
}

#[test]
fn invalid_input_never_reaches_a_kernel() {
    init_tracing();
    for backend in Backend::available() {
        assert_eq!(compute_twr_with(&[], backend), Err(ReturnsError::Empty));
        assert_eq!(
            compute_twr_with(&[f64::NAN], backend),
            Err(ReturnsError::NaN { index: 0 })
        );
        assert!(matches!(
            compute_twr_with(&[0.2, f64::INFINITY], backend),
            Err(ReturnsError::Infinite { index: 1, .. })
        ));
    }

    let strict = TwrCalculator::new(TwrConfig::new().with_validation(ValidationPolicy::Strict)).unwrap();
    assert_eq!(strict.calculate(&[-1.0]), Err(ReturnsError::TotalLoss { index: 0 }));
}

#[test]
fn unavailable_backend_is_a_config_error() {
    for backend in Backend::ALL {
        let result = TwrCalculator::new(TwrConfig::new().with_backend(backend));
        if backend.is_available() {
            assert!(result.is_ok(), "{backend}");
        } else {
            assert_eq!(result.unwrap_err(), ReturnsError::BackendUnavailable(backend));
        }
    }
}

#[test]
fn error_messages_name_the_problem() {
    assert!(compute_twr(&[]).unwrap_err().to_string().contains("no returns"));
    assert!(compute_twr(&[0.1, f64::NAN]).unwrap_err().to_string().contains("NaN"));
    assert!(compute_twr(&[f64::INFINITY]).unwrap_err().to_string().contains("infinite"));
}
