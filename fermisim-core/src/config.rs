//! Configuration shared by state construction and contraction routines

/// Tunables for fermionic state operations
#[derive(Debug, Clone, PartialEq)]
pub struct FermiConfig {
    /// Check that orbital rotations are unitary before applying them
    ///
    /// Default: true
    pub validate_unitary: bool,

    /// Relative tolerance for the unitarity check
    ///
    /// Default: 1e-5
    pub rtol: f64,

    /// Absolute tolerance for the unitarity check
    ///
    /// Default: 1e-8
    pub atol: f64,

    /// Minimum sector dimension before rows are processed with rayon
    ///
    /// Sectors smaller than this run single-threaded to avoid scheduling
    /// overhead.
    ///
    /// Default: 256
    pub parallel_threshold: usize,
}

impl Default for FermiConfig {
    fn default() -> Self {
        Self {
            validate_unitary: true,
            rtol: 1e-5,
            atol: 1e-8,
            parallel_threshold: 256,
        }
    }
}

impl FermiConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that skips input validation
    ///
    /// - No unitarity check on orbital rotations
    /// - Lower parallel threshold
    pub fn fast() -> Self {
        Self {
            validate_unitary: false,
            parallel_threshold: 64,
            ..Default::default()
        }
    }

    /// Configuration with tight tolerances and single-threaded execution
    pub fn strict() -> Self {
        Self {
            validate_unitary: true,
            rtol: 1e-10,
            atol: 1e-12,
            parallel_threshold: usize::MAX,
        }
    }

    /// Enable or disable the unitarity check
    pub fn with_validate_unitary(mut self, validate: bool) -> Self {
        self.validate_unitary = validate;
        self
    }

    /// Set the unitarity tolerances
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    /// Set the parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Whether a sector of the given dimension should run in parallel
    #[inline]
    pub fn use_parallel(&self, dimension: usize) -> bool {
        dimension >= self.parallel_threshold
    }

    /// Whether `a` and `b` agree within the configured tolerances
    #[inline]
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }
}
