//! Unit tests for template construction and reconstruction.

use super::*;
use crate::error::KernelError;
use crate::rng::{ReplaySource, SimRng};
use approx::assert_relative_eq;
use process_core::{
    CorrelationKernel, CorrelationModel, FnModel, MeanFunction, ModelError, ProcessModel, TimeGrid,
};
use proptest::prelude::*;

fn rational_model(n: usize) -> ProcessModel {
    ProcessModel::new(
        n,
        TimeGrid::new(0.25).unwrap(),
        MeanFunction::Constant(1.0),
        CorrelationKernel::RationalAbs { alpha: 5.0 },
    )
    .unwrap()
}

/// Not positive semi-definite: every off-diagonal correlation exceeds the variance.
fn ill_posed() -> impl CorrelationModel {
    FnModel::new(|_| 0.0, |i, j| if i == j { 1.0 } else { 2.0 })
}

/// Perfectly correlated steps: every conditional variance after the first is zero.
fn degenerate() -> impl CorrelationModel {
    FnModel::new(|_| 0.0, |_, _| 1.0)
}

#[test]
fn test_rejects_empty_process() {
    let model = ProcessModel::white_noise(1).unwrap();
    assert_eq!(
        ProcessTemplate::build(&model, 0, SafeMath::Clamp).unwrap_err(),
        ModelError::EmptyProcess
    );
}

#[test]
fn test_white_noise_template_is_identity() {
    let n = 6;
    let model = ProcessModel::white_noise(n).unwrap();
    let template = ProcessTemplate::build(&model, n, SafeMath::Clamp).unwrap();

    assert_eq!(template.len(), n);
    for i in 0..n {
        assert_eq!(template.devs()[i], 1.0);
        for j in 0..n {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_eq!(template.coefficient(i, j), expected);
        }
    }
    assert_eq!(template.clamped_count(), 0);
}

#[test]
fn test_two_step_closed_form() {
    let rho = 0.6;
    let model = FnModel::new(|_| 2.0, move |i, j| if i == j { 1.0 } else { rho });
    let template = ProcessTemplate::build(&model, 2, SafeMath::Clamp).unwrap();

    assert_relative_eq!(template.devs()[0], 1.0);
    assert_relative_eq!(template.devs()[1], 1.0 - rho * rho, epsilon = 1e-15);
    assert_relative_eq!(template.coefficient(0, 1), rho, epsilon = 1e-15);
    assert_eq!(template.coefficient(1, 0), 0.0);

    let (z0, z1) = (0.3, -1.2);
    let x = template.realize_from_draws(&[z0, z1]).unwrap();
    assert_relative_eq!(x[0], 2.0 + z0, epsilon = 1e-15);
    assert_relative_eq!(
        x[1],
        2.0 + z0 * rho + z1 * (1.0 - rho * rho).sqrt(),
        epsilon = 1e-14
    );
}

#[test]
fn test_template_reproduces_covariance() {
    // Σ_k φ[k][i] φ[k][j] D[k] == K(i, j) for a positive definite model.
    let n = 8;
    let model = rational_model(n);
    let template = ProcessTemplate::build(&model, n, SafeMath::Clamp).unwrap();

    for i in 0..n {
        for j in i..n {
            let rebuilt: f64 = (0..=i)
                .map(|k| template.coefficient(k, i) * template.coefficient(k, j) * template.devs()[k])
                .sum();
            assert_relative_eq!(rebuilt, model.correlation(i, j), epsilon = 1e-12);
        }
    }
}

#[test]
fn test_means_are_precomputed() {
    let model = FnModel::new(|i| i as f64 * 0.5, |i, j| if i == j { 1.0 } else { 0.0 });
    let template = ProcessTemplate::build(&model, 4, SafeMath::Clamp).unwrap();
    assert_eq!(template.means(), &[0.0, 0.5, 1.0, 1.5]);

    let x = template.realize_from_draws(&[0.0; 4]).unwrap();
    assert_eq!(x.as_slice(), template.means());
}

#[test]
fn test_draw_count_mismatch() {
    let model = rational_model(5);
    let template = ProcessTemplate::build(&model, 5, SafeMath::Clamp).unwrap();
    assert_eq!(
        template.realize_from_draws(&[0.0; 4]).unwrap_err(),
        KernelError::DrawCount {
            expected: 5,
            got: 4
        }
    );
}

#[test]
fn test_clamp_handles_ill_posed_model() {
    let model = ill_posed();
    let template = ProcessTemplate::build(&model, 4, SafeMath::Clamp).unwrap();

    assert!(template.devs().iter().all(|&d| d >= 0.0));
    assert!(template.clamped_count() > 0);

    let mut rng = SimRng::from_seed(1);
    let x = template.realize(&mut rng);
    assert!(x.iter().all(|v| v.is_finite()));
}

#[test]
fn test_propagate_surfaces_ill_posed_model() {
    let model = ill_posed();
    let template = ProcessTemplate::build(&model, 2, SafeMath::Propagate).unwrap();

    // D[1] = 1 - 2² · 1
    assert_relative_eq!(template.devs()[1], -3.0);
    assert_eq!(template.clamped_count(), 0);

    let x = template.realize_from_draws(&[0.5, 0.5]).unwrap();
    assert!(x[0].is_finite());
    assert!(x[1].is_nan());
}

#[test]
fn test_zero_variance_guard() {
    let n = 4;
    let model = degenerate();

    let safe = ProcessTemplate::build(&model, n, SafeMath::Clamp).unwrap();
    assert_eq!(safe.devs()[1], 0.0);
    assert_eq!(safe.coefficient(1, 2), 0.0);
    let x = safe.realize_from_draws(&[1.5, -0.5, 0.25, 2.0]).unwrap();
    assert!(x.iter().all(|&v| v == 1.5));

    let raw = ProcessTemplate::build(&model, n, SafeMath::Propagate).unwrap();
    assert!(raw.coefficient(1, 2).is_nan());
    let x = raw.realize_from_draws(&[1.5, -0.5, 0.25, 2.0]).unwrap();
    assert_eq!(x[0], 1.5);
    assert!(x[2].is_nan());
}

#[test]
fn test_safe_math_from_flag() {
    assert_eq!(SafeMath::from(true), SafeMath::Clamp);
    assert_eq!(SafeMath::from(false), SafeMath::Propagate);
    assert_eq!(SafeMath::default(), SafeMath::Clamp);
    assert_eq!(SafeMath::Propagate.to_string(), "propagate");
}

#[test]
fn test_realize_consumes_n_draws() {
    let model = rational_model(5);
    let template = ProcessTemplate::build(&model, 5, SafeMath::Clamp).unwrap();
    let mut source = ReplaySource::new(vec![0.1, 0.2, 0.3, 0.4, 0.5]);

    let first = template.realize(&mut source);
    let second = template.realize(&mut source);
    assert_eq!(source.consumed(), 10);
    assert_eq!(first, second);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// φ is unit upper triangular for any kernel and policy.
    #[test]
    fn prop_triangularity(n in 1usize..24, alpha in 0.0..10.0f64, clamp in any::<bool>()) {
        let model = ProcessModel::new(
            n,
            TimeGrid::new(0.1).unwrap(),
            MeanFunction::Constant(0.0),
            CorrelationKernel::Cauchy { alpha },
        ).unwrap();
        let template = ProcessTemplate::build(&model, n, SafeMath::from(clamp)).unwrap();

        for i in 0..n {
            prop_assert_eq!(template.coefficient(i, i), 1.0);
            for j in 0..i {
                prop_assert_eq!(template.coefficient(i, j), 0.0);
            }
        }
    }

    /// Under Clamp every conditional variance is non-negative, even for
    /// arbitrary (possibly indefinite) symmetric kernels.
    #[test]
    fn prop_safe_mode_non_negative(
        n in 1usize..16,
        off in -3.0..3.0f64,
        diag in -1.0..2.0f64,
    ) {
        let model = FnModel::new(|_| 0.0, move |i, j| {
            if i == j { diag } else { off / (1.0 + (i as f64 - j as f64).abs()) }
        });
        let template = ProcessTemplate::build(&model, n, SafeMath::Clamp).unwrap();

        for &d in template.devs() {
            prop_assert!(d >= 0.0, "negative variance {}", d);
        }
    }
}
