//! Sequential conditional-regression template.
//!
//! A [`ProcessTemplate`] holds everything needed to turn `n` independent
//! standard-normal draws into one realization of a Gaussian process with
//! prescribed mean `m(i)` and correlation `K(i, j)`.
//!
//! ## Construction
//!
//! For `i = 0 .. n-1`, strictly in order (step `i` reads every step `< i`):
//!
//! ```text
//! D[i]    = K(i, i) − Σ_{x<i} φ[x][i]² · D[x]
//! φ[i][j] = 0                                              j < i
//! φ[i][i] = 1
//! φ[i][j] = (K(i, j) − Σ_{x<i} φ[x][i]·φ[x][j]·D[x]) / D[i]   j > i
//! ```
//!
//! `D` are the conditional variances (`devs`), `φ` the regression
//! coefficients (`funcs`). This is an LDLᵀ factorisation of the covariance
//! matrix computed row by row with explicit coefficients, so a template is
//! built once and reused for any number of realizations.
//!
//! ## Reconstruction
//!
//! ```text
//! r[k] = z[k] · √D[k]
//! x[i] = m(i) + Σ_{k≤i} r[k] · φ[k][i]
//! ```
//!
//! ## Numerical Policy
//!
//! Ill-conditioned models can produce a negative or NaN conditional
//! variance. [`SafeMath::Clamp`] replaces it by zero and zeroes the
//! coefficients that would divide by it; [`SafeMath::Propagate`] leaves the
//! raw values in place for diagnostics.

mod policy;
mod process_template;

pub use policy::SafeMath;
pub use process_template::ProcessTemplate;

#[cfg(test)]
mod tests;
