// config.rs
// Numerical tuning constants for the solver and optimizer, collected in one
// place so the iteration caps and tolerances are easy to audit.

use serde::{Deserialize, Serialize};

// ==========================
// NNLS SOLVER
// ==========================

/// Hard cap on multiplicative update iterations.
pub const NNLS_MAX_ITERATIONS: usize = 2000;
/// Stabilizer added to numerator and denominator of every update factor.
/// Keeps the ratio finite when a column is orthogonal to the requirement.
pub const NNLS_EPSILON: f64 = 1e-9;
/// Iteration stops early once no component moves by more than this (grams).
pub const NNLS_CONVERGENCE_TOL: f64 = 1e-6;

// ==========================
// COST OPTIMIZER
// ==========================

/// Upper bound on elimination sweeps over the candidate list.
pub const OPTIMIZER_MAX_PASSES: usize = 5;
/// A reduced mix stays feasible while delivering at least this fraction
/// of every required ion mass.
pub const FEASIBILITY_FRACTION: f64 = 0.99;
/// Absolute slack (grams) added to the delivered side of the feasibility
/// check, so zero-requirement ions compare cleanly.
pub const FEASIBILITY_SLACK_G: f64 = 1e-6;
/// A cheaper mix is only adopted when it beats the incumbent by more than
/// this, which keeps float noise from flapping the result.
pub const COST_IMPROVEMENT_EPS: f64 = 1e-9;
/// Salts solved below this mass (grams) are treated as absent.
pub const NEGLIGIBLE_MASS_G: f64 = 1e-9;

// ==========================
// CONFIG STRUCT
// ==========================

/// Runtime solver settings. Defaults reproduce the constants above; tests
/// shrink the caps to probe iteration-limit behavior.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub max_iterations: usize,
    pub epsilon: f64,
    pub convergence_tol: f64,
    pub max_passes: usize,
    pub feasibility_fraction: f64,
    pub feasibility_slack_g: f64,
    pub cost_improvement_eps: f64,
    pub negligible_mass_g: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: NNLS_MAX_ITERATIONS,
            epsilon: NNLS_EPSILON,
            convergence_tol: NNLS_CONVERGENCE_TOL,
            max_passes: OPTIMIZER_MAX_PASSES,
            feasibility_fraction: FEASIBILITY_FRACTION,
            feasibility_slack_g: FEASIBILITY_SLACK_G,
            cost_improvement_eps: COST_IMPROVEMENT_EPS,
            negligible_mass_g: NEGLIGIBLE_MASS_G,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_constants() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.max_iterations, NNLS_MAX_ITERATIONS);
        assert_eq!(cfg.epsilon, NNLS_EPSILON);
        assert_eq!(cfg.convergence_tol, NNLS_CONVERGENCE_TOL);
        assert_eq!(cfg.max_passes, OPTIMIZER_MAX_PASSES);
        assert_eq!(cfg.feasibility_fraction, FEASIBILITY_FRACTION);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: SolverConfig = toml::from_str("max_iterations = 50").unwrap();
        assert_eq!(cfg.max_iterations, 50);
        assert_eq!(cfg.epsilon, NNLS_EPSILON);
        assert_eq!(cfg.max_passes, OPTIMIZER_MAX_PASSES);
    }
}
