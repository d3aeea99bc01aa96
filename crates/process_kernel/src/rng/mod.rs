//! # Random Number Generation
//!
//! Sources of independent standard-normal draws for realization generation.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: [`SimRng`] is always seeded, so any run can be replayed
//! - **Zero allocation**: draws are written into caller-owned `&mut [f64]` slices
//! - **Static dispatch**: generators are generic over [`NormalSource`]; no
//!   `Box<dyn Trait>` in the hot path
//! - **Independence**: each parallel worker owns its own source, seeded by
//!   [`worker_seed`], so no state is shared between threads
//!
//! ## Module Structure
//!
//! - `prng`: seeded PRNG wrapper (`StdRng` + Ziggurat `StandardNormal`)
//! - `replay`: deterministic source replaying a recorded draw sequence
//!
//! ## Usage Example
//!
//! ```rust
//! use process_kernel::rng::{NormalSource, SimRng};
//!
//! let mut rng = SimRng::from_seed(12345);
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;
mod replay;

pub use prng::SimRng;
pub use replay::ReplaySource;

/// A supply of independent standard-normal draws.
pub trait NormalSource {
    /// Fills `buffer` with draws from `N(0, 1)`.
    fn fill_normal(&mut self, buffer: &mut [f64]);
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        (**self).fill_normal(buffer)
    }
}

/// Derives the seed for worker `index` from a run's base seed.
///
/// Uses the SplitMix64 finaliser so neighbouring worker indices map to
/// unrelated seeds.
#[inline]
pub fn worker_seed(base: u64, index: usize) -> u64 {
    let mut z = base.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
