//! Simulated disclosure-risk display.
//!
//! These metrics are presentation-only constants: nothing is computed from the
//! loaded dataset. The display exists to remind users that the tool processes
//! everything locally, not to certify any real anonymization property.

/// Hardcoded disclosure-risk metrics shown alongside the overview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrivacyReport {
    pub k_anonymity: u32,
    pub l_diversity: u32,
    pub t_closeness: f64,
}

impl PrivacyReport {
    /// The fixed values shown by the dashboard.
    pub const SIMULATED: Self = Self {
        k_anonymity: 5,
        l_diversity: 3,
        t_closeness: 0.2,
    };

    /// Composite score: `min(100, k/10·50 + l/5·40 + (1−t)·10)`, rounded.
    pub fn score(&self) -> u32 {
        let raw = (self.k_anonymity as f64 / 10.0) * 50.0
            + (self.l_diversity as f64 / 5.0) * 40.0
            + (1.0 - self.t_closeness) * 10.0;
        raw.min(100.0).round() as u32
    }

    pub fn overall_label(&self) -> &'static str {
        if self.score() > 80 { "Excellent" } else { "Good" }
    }

    pub fn k_anonymity_label(&self) -> &'static str {
        match self.k_anonymity {
            k if k >= 5 => "Strong",
            k if k >= 3 => "Moderate",
            _ => "Weak",
        }
    }

    pub fn l_diversity_label(&self) -> &'static str {
        match self.l_diversity {
            l if l >= 3 => "Good",
            l if l >= 2 => "Fair",
            _ => "Poor",
        }
    }
}
