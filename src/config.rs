//! Runtime configuration.

/// Knobs for a [`Runtime`](crate::Runtime).
///
/// ```ignore
/// let config = RuntimeConfig::default().max_update_passes(20);
/// let runtime = Runtime::with_config(host, config);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Fail a render whose hook count differs from the previous render.
    ///
    /// Kind and type mismatches are always reported: a slot holding another
    /// value type cannot be read.
    pub validate_hook_order: bool,
    /// Upper bound on deferred updates drained in a single flush.
    pub max_update_passes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            validate_hook_order: true,
            max_update_passes: 100,
        }
    }
}

impl RuntimeConfig {
    pub fn validate_hook_order(mut self, enabled: bool) -> Self {
        self.validate_hook_order = enabled;
        self
    }

    pub fn max_update_passes(mut self, passes: usize) -> Self {
        self.max_update_passes = passes;
        self
    }
}
