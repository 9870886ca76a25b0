// solver/optimizer.rs
// Cost reduction by bounded greedy backward elimination. The NNLS baseline
// spreads mass across every candidate; this pass tries dropping one salt at
// a time and keeps the removal when the re-solved mix is still feasible and
// strictly cheaper.

use super::nnls::solve_nnls;
use crate::catalog::Candidate;
use crate::composition::IonVector;
use crate::config::SolverConfig;
use crate::elements::Ion;
use serde::Serialize;

/// Solved mix: one mass per candidate (catalog order) plus its total cost.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MixResult {
    /// Grams of each candidate salt, index-aligned with the candidate list.
    pub masses_g: Vec<f64>,
    /// Total cost in currency units.
    pub cost: f64,
}

impl MixResult {
    pub fn empty(n_candidates: usize) -> Self {
        MixResult {
            masses_g: vec![0.0; n_candidates],
            cost: 0.0,
        }
    }
}

/// Total grams of each ion a mass assignment delivers.
pub fn delivered_totals(candidates: &[Candidate], masses_g: &[f64]) -> IonVector {
    let mut delivered = IonVector::zero();
    for (candidate, &mass) in candidates.iter().zip(masses_g.iter()) {
        delivered.add_scaled(&candidate.composition, mass);
    }
    delivered
}

/// Near-match rule used by both the optimizer and the delivery report: an
/// ion counts as satisfied at 99% of its required mass, with a small
/// absolute slack so zero requirements compare cleanly.
pub fn ion_requirement_met(delivered_g: f64, required_g: f64, cfg: &SolverConfig) -> bool {
    delivered_g + cfg.feasibility_slack_g >= required_g * cfg.feasibility_fraction
}

fn meets_all(delivered: &IonVector, requirement: &IonVector, cfg: &SolverConfig) -> bool {
    Ion::ALL
        .iter()
        .all(|&ion| ion_requirement_met(delivered.get(ion), requirement.get(ion), cfg))
}

fn mix_cost(masses_g: &[f64], candidates: &[Candidate]) -> f64 {
    masses_g
        .iter()
        .zip(candidates.iter())
        .map(|(mass, candidate)| mass * candidate.cost_per_gram())
        .sum()
}

/// Plain NNLS solve over all candidates, costed but not optimized. Used
/// directly when the caller disables cost optimization.
pub fn solve_baseline(
    candidates: &[Candidate],
    requirement: &IonVector,
    cfg: &SolverConfig,
) -> MixResult {
    if candidates.is_empty() || requirement.has_no_demand() {
        return MixResult::empty(candidates.len());
    }
    let columns: Vec<IonVector> = candidates.iter().map(|c| c.composition).collect();
    let masses_g = solve_nnls(&columns, requirement, cfg);
    let cost = mix_cost(&masses_g, candidates);
    MixResult { masses_g, cost }
}

/// Full pipeline: NNLS baseline, then up to `cfg.max_passes` elimination
/// sweeps in candidate order.
///
/// The baseline is adopted as the incumbent without a feasibility check, so
/// an under-determined requirement still produces the least-squares
/// best-effort answer. Each sweep walks candidates left to right, re-solves
/// without one active salt, and accepts the reduced mix only when it still
/// delivers at least the feasibility fraction of every ion and costs less
/// than the incumbent by more than the improvement epsilon. Sweeps stop
/// early once a full pass accepts nothing.
pub fn compute_mix(
    candidates: &[Candidate],
    requirement: &IonVector,
    cfg: &SolverConfig,
) -> MixResult {
    let n = candidates.len();
    if n == 0 || requirement.has_no_demand() {
        return MixResult::empty(n);
    }

    let columns: Vec<IonVector> = candidates.iter().map(|c| c.composition).collect();
    let mut best = solve_nnls(&columns, requirement, cfg);
    let mut best_cost = mix_cost(&best, candidates);

    let mut pass = 0;
    let mut improved = true;
    while pass < cfg.max_passes && improved {
        improved = false;
        for drop in 0..n {
            if best[drop] <= cfg.negligible_mass_g {
                continue;
            }
            let kept: Vec<usize> = (0..n).filter(|&i| i != drop).collect();
            if kept.is_empty() {
                continue;
            }

            let kept_columns: Vec<IonVector> = kept.iter().map(|&i| columns[i]).collect();
            let kept_masses = solve_nnls(&kept_columns, requirement, cfg);

            let mut trial = vec![0.0; n];
            for (slot, &i) in kept.iter().enumerate() {
                trial[i] = kept_masses[slot];
            }

            let trial_cost = mix_cost(&trial, candidates);
            let delivered = delivered_totals(candidates, &trial);
            if meets_all(&delivered, requirement, cfg)
                && trial_cost < best_cost - cfg.cost_improvement_eps
            {
                best = trial;
                best_cost = trial_cost;
                improved = true;
            }
        }
        pass += 1;
    }

    MixResult {
        masses_g: best,
        cost: best_cost,
    }
}
