//! Travel model used to weight graph edges.

/// Conversion from distance to travel time and cost.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    /// Assumed average travel speed (km/h).
    pub speed_kmh: f64,

    /// Assumed travel cost per kilometre.
    pub cost_per_km: f64,
}

impl GraphConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(speed_kmh: f64, cost_per_km: f64) -> Self {
        Self {
            speed_kmh,
            cost_per_km,
        }
    }

    /// Hours needed to cover `distance_km`.
    pub fn travel_hours(&self, distance_km: f64) -> f64 {
        distance_km / self.speed_kmh
    }

    /// Whether every distance maps to a finite, non-negative time and cost.
    pub fn is_valid(&self) -> bool {
        self.speed_kmh.is_finite()
            && self.speed_kmh > 0.0
            && self.cost_per_km.is_finite()
            && self.cost_per_km >= 0.0
    }

    /// Money needed to cover `distance_km`.
    pub fn travel_cost(&self, distance_km: f64) -> f64 {
        distance_km * self.cost_per_km
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 40.0,
            cost_per_km: 0.5,
        }
    }
}
