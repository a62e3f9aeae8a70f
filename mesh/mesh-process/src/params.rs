//! Parameters for Laplacian smoothing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on smoothing iterations.
///
/// Beyond this the relaxation visibly flattens facial features. Larger
/// requests are clamped.
pub const MAX_SMOOTHING_ITERATIONS: u32 = 10;

/// Parameters for [`smooth_mesh`](crate::smooth_mesh).
///
/// # Example
///
/// ```
/// use mesh_process::{SmoothParams, MAX_SMOOTHING_ITERATIONS};
///
/// let params = SmoothParams::light();
/// assert_eq!(params.iterations, 2);
///
/// let clamped = SmoothParams::new(50);
/// assert_eq!(clamped.effective_iterations(), MAX_SMOOTHING_ITERATIONS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmoothParams {
    /// Requested number of relaxation passes. Zero leaves the mesh untouched.
    pub iterations: u32,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self { iterations: 3 }
    }
}

impl SmoothParams {
    /// Creates parameters with the given iteration count.
    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// No smoothing.
    #[must_use]
    pub const fn none() -> Self {
        Self { iterations: 0 }
    }

    /// Gentle smoothing that keeps fine detail.
    #[must_use]
    pub const fn light() -> Self {
        Self { iterations: 2 }
    }

    /// Strong smoothing for very noisy captures.
    #[must_use]
    pub const fn strong() -> Self {
        Self { iterations: 8 }
    }

    /// Sets the number of iterations.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Iteration count after clamping to [`MAX_SMOOTHING_ITERATIONS`].
    #[must_use]
    pub const fn effective_iterations(&self) -> u32 {
        if self.iterations > MAX_SMOOTHING_ITERATIONS {
            MAX_SMOOTHING_ITERATIONS
        } else {
            self.iterations
        }
    }

    /// Check whether the requested count exceeds the maximum.
    #[must_use]
    pub const fn is_clamped(&self) -> bool {
        self.iterations > MAX_SMOOTHING_ITERATIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(SmoothParams::none().iterations, 0);
        assert_eq!(SmoothParams::default().iterations, 3);
        assert!(SmoothParams::strong().iterations <= MAX_SMOOTHING_ITERATIONS);
    }

    #[test]
    fn builder() {
        let params = SmoothParams::none().with_iterations(4);
        assert_eq!(params.iterations, 4);
        assert!(!params.is_clamped());
    }

    #[test]
    fn clamping() {
        let params = SmoothParams::new(11);
        assert!(params.is_clamped());
        assert_eq!(params.effective_iterations(), 10);
        assert_eq!(SmoothParams::new(10).effective_iterations(), 10);
    }
}
