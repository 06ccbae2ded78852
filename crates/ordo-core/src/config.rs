//! Comparator configuration

/// Default nesting limit for recursive comparison
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Absolute tolerance used by [`CompareConfig::approximate`]
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Comparator configuration
#[derive(Clone, Debug, PartialEq)]
pub struct CompareConfig {
    /// Absolute tolerance for float comparison (0 = exact)
    ///
    /// Relative tolerance is not offered: it disagrees with the
    /// lexicographic order of containers of floats.
    pub tolerance: f64,
    /// Maximum container nesting followed before giving up
    pub max_depth: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        CompareConfig {
            tolerance: 0.0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompareConfig {
    /// Strict total order
    pub fn exact() -> Self {
        CompareConfig::default()
    }

    /// Approximate equality with the default absolute tolerance
    ///
    /// Not transitive for values within tolerance of each other; use it to
    /// test equality, not to sort.
    pub fn approximate() -> Self {
        CompareConfig {
            tolerance: DEFAULT_TOLERANCE,
            ..CompareConfig::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        self.tolerance == 0.0
    }

    /// Tolerance must be finite and non-negative, otherwise `x < x` could hold
    pub fn is_valid(&self) -> bool {
        self.tolerance.is_finite() && self.tolerance >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(CompareConfig::exact().is_exact());
        assert!(!CompareConfig::approximate().is_exact());
        assert_eq!(CompareConfig::approximate().tolerance, DEFAULT_TOLERANCE);
        assert_eq!(CompareConfig::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_validity() {
        assert!(CompareConfig::exact().with_tolerance(0.5).is_valid());
        assert!(!CompareConfig::exact().with_tolerance(-1.0).is_valid());
        assert!(!CompareConfig::exact().with_tolerance(f64::NAN).is_valid());
        assert!(!CompareConfig::exact().with_tolerance(f64::INFINITY).is_valid());
    }
}
