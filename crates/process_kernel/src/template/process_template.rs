use process_core::{CorrelationModel, ModelError};
use tracing::{debug, warn};

use super::policy::SafeMath;
use crate::error::KernelError;
use crate::realization::Realization;
use crate::rng::NormalSource;

/// Precomputed conditional variances and regression coefficients.
///
/// Immutable once built; share it between threads behind an `Arc`.
///
/// # Memory Layout
///
/// Coefficients are stored row-major: `funcs[k * n + i]` is `φ[k][i]`, the
/// weight of the `k`-th orthogonal component in step `i`.
///
/// # Examples
///
/// ```rust
/// use process_core::ProcessModel;
/// use process_kernel::template::{ProcessTemplate, SafeMath};
///
/// let model = ProcessModel::white_noise(3).unwrap();
/// let template = ProcessTemplate::build(&model, model.len(), SafeMath::Clamp).unwrap();
///
/// assert_eq!(template.devs(), &[1.0, 1.0, 1.0]);
/// assert_eq!(template.coefficient(0, 1), 0.0);
///
/// let x = template.realize_from_draws(&[0.5, -1.0, 2.0]).unwrap();
/// assert_eq!(x.as_slice(), &[0.5, -1.0, 2.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessTemplate {
    /// Process length `n`.
    len: usize,
    /// Theoretical means `m(i)`.
    means: Vec<f64>,
    /// Conditional variances `D[i]`.
    devs: Vec<f64>,
    /// Regression coefficients, row-major `n × n`.
    funcs: Vec<f64>,
    /// Policy used during construction.
    policy: SafeMath,
    /// Number of variances replaced by zero under [`SafeMath::Clamp`].
    clamped: usize,
}

impl ProcessTemplate {
    /// Builds the template for the first `n` steps of `model`.
    ///
    /// Costs `O(n²)` correlation evaluations, paid once and amortised over
    /// every realization drawn from the template.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyProcess`] if `n == 0`.
    pub fn build<M>(model: &M, n: usize, policy: SafeMath) -> Result<Self, ModelError>
    where
        M: CorrelationModel + ?Sized,
    {
        if n == 0 {
            return Err(ModelError::EmptyProcess);
        }

        let means: Vec<f64> = (0..n).map(|i| model.mean(i)).collect();
        let mut devs: Vec<f64> = Vec::with_capacity(n);
        let mut funcs = vec![0.0_f64; n * n];
        let mut clamped = 0;

        for i in 0..n {
            let variance = model.correlation(i, i);
            let explained: f64 = (0..i).map(|x| funcs[x * n + i].powi(2) * devs[x]).sum();
            let mut dev = variance - explained;

            if policy.clamps() && (explained > variance || dev.is_nan()) {
                dev = 0.0;
                clamped += 1;
            }
            devs.push(dev);

            funcs[i * n + i] = 1.0;
            for j in (i + 1)..n {
                funcs[i * n + j] = if policy.clamps() && dev == 0.0 {
                    0.0
                } else {
                    let mut dividend = model.correlation(i, j);
                    for x in 0..i {
                        dividend -= funcs[x * n + i] * funcs[x * n + j] * devs[x];
                    }
                    dividend / dev
                };
            }
        }

        if clamped > 0 {
            warn!(n, clamped, "conditional variances clamped to zero");
        }
        debug!(n, %policy, "process template built");

        Ok(Self {
            len: n,
            means,
            devs,
            funcs,
            policy,
            clamped,
        })
    }

    /// Process length `n`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a template has at least one step.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Precomputed means `m(0) .. m(n-1)`.
    #[inline]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Conditional variances `D[0] .. D[n-1]`.
    #[inline]
    pub fn devs(&self) -> &[f64] {
        &self.devs
    }

    /// Regression coefficient `φ[k][i]`.
    #[inline]
    pub fn coefficient(&self, k: usize, i: usize) -> f64 {
        self.funcs[k * self.len + i]
    }

    /// Policy the template was built with.
    #[inline]
    pub fn policy(&self) -> SafeMath {
        self.policy
    }

    /// Number of conditional variances that were clamped to zero.
    #[inline]
    pub fn clamped_count(&self) -> usize {
        self.clamped
    }

    /// Reconstructs the realization for the given standard-normal draws.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::DrawCount`] if `draws.len() != n`.
    pub fn realize_from_draws(&self, draws: &[f64]) -> Result<Realization, KernelError> {
        if draws.len() != self.len {
            return Err(KernelError::DrawCount {
                expected: self.len,
                got: draws.len(),
            });
        }
        let mut scaled = draws.to_vec();
        Ok(self.reconstruct(&mut scaled))
    }

    /// Draws `n` normals from `source` and reconstructs one realization.
    pub fn realize<S: NormalSource + ?Sized>(&self, source: &mut S) -> Realization {
        let mut draws = vec![0.0; self.len];
        self.realize_into(source, &mut draws)
    }

    /// Same as [`realize`](Self::realize) but reuses a caller-owned draw
    /// buffer of length `n`.
    pub(crate) fn realize_into<S: NormalSource + ?Sized>(
        &self,
        source: &mut S,
        draws: &mut [f64],
    ) -> Realization {
        debug_assert_eq!(draws.len(), self.len);
        source.fill_normal(draws);
        self.reconstruct(draws)
    }

    /// Scales `draws` in place by `√D` and sums the weighted components.
    fn reconstruct(&self, draws: &mut [f64]) -> Realization {
        let n = self.len;
        for (z, dev) in draws.iter_mut().zip(&self.devs) {
            *z *= dev.sqrt();
        }

        let values = (0..n)
            .map(|i| {
                let mut x = self.means[i];
                for k in 0..=i {
                    x += draws[k] * self.funcs[k * n + i];
                }
                x
            })
            .collect::<Vec<f64>>();

        Realization::from(values)
    }
}
