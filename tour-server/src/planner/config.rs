//! Search configuration for the route planner.

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of routes to return when the request does not say.
    /// The search stops as soon as this many valid routes are found.
    pub max_routes: usize,

    /// Maximum number of path extensions to explore before giving up.
    /// Bounds the work done on large, generous-budget searches.
    pub max_explored: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_routes: usize, max_explored: usize) -> Self {
        Self {
            max_routes,
            max_explored,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_routes: 10,
            max_explored: 100_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.max_routes, 10);
        assert_eq!(config.max_explored, 100_000);
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(5, 1_000);

        assert_eq!(config.max_routes, 5);
        assert_eq!(config.max_explored, 1_000);
    }
}
