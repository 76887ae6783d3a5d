//! Configuration for tree resolution

/// Configuration options for resolving an item tree
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Drop options that resolved to `Unspecified` from the output
    pub prune_unspecified: bool,

    /// Report values stored under names the item's schema does not register
    pub unknown_option_diagnostics: bool,

    /// Report options set differently by several matching tag templates
    pub ambiguity_diagnostics: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            prune_unspecified: false,
            unknown_option_diagnostics: true,
            ambiguity_diagnostics: true,
        }
    }
}

impl ResolveConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prune_unspecified(mut self, prune: bool) -> Self {
        self.prune_unspecified = prune;
        self
    }

    pub fn with_unknown_option_diagnostics(mut self, enabled: bool) -> Self {
        self.unknown_option_diagnostics = enabled;
        self
    }

    pub fn with_ambiguity_diagnostics(mut self, enabled: bool) -> Self {
        self.ambiguity_diagnostics = enabled;
        self
    }

    /// Disable every diagnostic
    pub fn quiet(self) -> Self {
        self.with_unknown_option_diagnostics(false)
            .with_ambiguity_diagnostics(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolveConfig::default();
        assert!(!config.prune_unspecified);
        assert!(config.unknown_option_diagnostics);
        assert!(config.ambiguity_diagnostics);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResolveConfig::new()
            .with_prune_unspecified(true)
            .with_ambiguity_diagnostics(false);
        assert!(config.prune_unspecified);
        assert!(config.unknown_option_diagnostics);
        assert!(!config.ambiguity_diagnostics);
    }

    #[test]
    fn test_quiet() {
        let config = ResolveConfig::new().quiet();
        assert!(!config.unknown_option_diagnostics);
        assert!(!config.ambiguity_diagnostics);
    }
}
