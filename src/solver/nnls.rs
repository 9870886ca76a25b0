//! Non-negative least squares via Lee-Seung multiplicative updates.
//!
//! Solves min ||A x - b||² with x >= 0, where column j of A is the ion
//! composition of candidate salt j and b is the gram requirement vector.
//! Multiplicative updates preserve sign: starting from a positive guess,
//! every iterate stays positive, so non-negativity needs no projection
//! step. The fixed small epsilon keeps update ratios finite for columns
//! that share no ions with the requirement.
//!
//! The update never divides by a freshly computed residual, so the same
//! inputs walk the same float path every run. Callers rely on that for
//! reproducible mixes.

use crate::composition::IonVector;
use crate::config::SolverConfig;
use crate::elements::Ion;

/// Solve for non-negative salt masses (grams). Returns one mass per column,
/// in column order. An empty column list yields an empty vector.
///
/// Convergence is declared when no component moves by more than
/// `cfg.convergence_tol` grams in one sweep; `cfg.max_iterations` bounds the
/// work either way and a non-converged sweep still returns the best iterate.
pub fn solve_nnls(columns: &[IonVector], requirement: &IonVector, cfg: &SolverConfig) -> Vec<f64> {
    let n_salts = columns.len();
    if n_salts == 0 {
        return Vec::new();
    }

    let mut x = vec![1.0_f64; n_salts];
    let mut delivered = [0.0_f64; Ion::COUNT];

    // A^T b is constant across iterations
    let atb: Vec<f64> = columns.iter().map(|col| col.dot(requirement)).collect();

    for _ in 0..cfg.max_iterations {
        // delivered = A x, with x from the previous sweep
        delivered.fill(0.0);
        for (col, &mass) in columns.iter().zip(x.iter()) {
            for (dst, &yield_per_g) in delivered.iter_mut().zip(col.as_array().iter()) {
                *dst += yield_per_g * mass;
            }
        }

        let mut max_change = 0.0_f64;
        for (j, col) in columns.iter().enumerate() {
            let numerator = atb[j] + cfg.epsilon;
            let denominator = col
                .as_array()
                .iter()
                .zip(delivered.iter())
                .map(|(a, d)| a * d)
                .sum::<f64>()
                + cfg.epsilon;
            let next = x[j] * numerator / denominator;
            let change = (next - x[j]).abs();
            if change > max_change {
                max_change = change;
            }
            x[j] = next;
        }

        if max_change < cfg.convergence_tol {
            break;
        }
    }

    // Clamp float dust; the update itself cannot go negative
    for mass in x.iter_mut() {
        if *mass < 0.0 {
            *mass = 0.0;
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn column(entries: &[(Ion, f64)]) -> IonVector {
        IonVector::from_entries(entries)
    }

    #[test]
    fn empty_candidate_list_returns_empty() {
        let req = column(&[(Ion::K, 10.0)]);
        assert!(solve_nnls(&[], &req, &SolverConfig::default()).is_empty());
    }

    #[test]
    fn single_pure_salt_hits_requirement_exactly() {
        // One salt, 100% K by mass: the fixed point is x = required grams
        let cols = [column(&[(Ion::K, 1.0)])];
        let req = column(&[(Ion::K, 100.0)]);
        let masses = solve_nnls(&cols, &req, &SolverConfig::default());
        assert_eq!(masses.len(), 1);
        assert_relative_eq!(masses[0], 100.0, epsilon = 1e-4);
    }

    #[test]
    fn partial_yield_salt_needs_proportionally_more_mass() {
        // 40% K by mass means 250 g of salt for 100 g of K
        let cols = [column(&[(Ion::K, 0.4)])];
        let req = column(&[(Ion::K, 100.0)]);
        let masses = solve_nnls(&cols, &req, &SolverConfig::default());
        assert_relative_eq!(masses[0], 250.0, epsilon = 1e-3);
    }

    #[test]
    fn identical_columns_split_the_load_evenly() {
        let cols = [column(&[(Ion::K, 1.0)]), column(&[(Ion::K, 1.0)])];
        let req = column(&[(Ion::K, 50.0)]);
        let masses = solve_nnls(&cols, &req, &SolverConfig::default());
        assert_relative_eq!(masses[0], 25.0, epsilon = 1e-4);
        assert_relative_eq!(masses[1], 25.0, epsilon = 1e-4);
    }

    #[test]
    fn orthogonal_column_decays_to_nothing() {
        // Second salt delivers an ion nobody asked for
        let cols = [column(&[(Ion::K, 1.0)]), column(&[(Ion::Fe, 1.0)])];
        let req = column(&[(Ion::K, 50.0)]);
        let masses = solve_nnls(&cols, &req, &SolverConfig::default());
        assert_relative_eq!(masses[0], 50.0, epsilon = 1e-3);
        assert!(
            masses[1] < 1e-3,
            "unwanted salt kept mass {}",
            masses[1]
        );
    }

    #[test]
    fn unreachable_requirement_does_not_diverge() {
        // Nothing supplies Fe; the K part still solves
        let cols = [column(&[(Ion::K, 1.0)])];
        let req = column(&[(Ion::K, 50.0), (Ion::Fe, 2.0)]);
        let masses = solve_nnls(&cols, &req, &SolverConfig::default());
        assert_relative_eq!(masses[0], 50.0, epsilon = 1e-3);
        assert!(masses[0].is_finite());
    }

    #[test]
    fn masses_are_never_negative() {
        fastrand::seed(0);
        for _ in 0..50 {
            let n_salts = 1 + fastrand::usize(..8);
            let cols: Vec<IonVector> = (0..n_salts)
                .map(|_| {
                    let mut entries = Vec::new();
                    for ion in Ion::ALL {
                        if fastrand::f64() < 0.3 {
                            entries.push((ion, fastrand::f64()));
                        }
                    }
                    IonVector::from_entries(&entries)
                })
                .collect();
            let mut req_entries = Vec::new();
            for ion in Ion::ALL {
                if fastrand::f64() < 0.5 {
                    req_entries.push((ion, fastrand::f64() * 100.0));
                }
            }
            let req = IonVector::from_entries(&req_entries);

            let masses = solve_nnls(&cols, &req, &SolverConfig::default());
            assert_eq!(masses.len(), n_salts);
            for &mass in &masses {
                assert!(mass >= 0.0, "negative mass {mass}");
                assert!(mass.is_finite(), "non-finite mass {mass}");
            }
        }
    }

    #[test]
    fn repeated_solves_are_bitwise_identical() {
        let cols = [
            column(&[(Ion::K, 0.38), (Ion::N, 0.13)]),
            column(&[(Ion::Ca, 0.17), (Ion::N, 0.12)]),
            column(&[(Ion::Mg, 0.1), (Ion::S, 0.13)]),
        ];
        let req = column(&[(Ion::N, 15.0), (Ion::K, 20.0), (Ion::Ca, 16.0), (Ion::Mg, 4.0)]);
        let cfg = SolverConfig::default();
        let first = solve_nnls(&cols, &req, &cfg);
        let second = solve_nnls(&cols, &req, &cfg);
        assert_eq!(first, second);
    }

    #[test]
    fn iteration_cap_is_honored() {
        let cols = [column(&[(Ion::K, 1.0)])];
        let req = column(&[(Ion::K, 1e6)]);
        let cfg = SolverConfig {
            max_iterations: 3,
            ..SolverConfig::default()
        };
        // Hitting the cap is not an error; the current iterate comes back
        let masses = solve_nnls(&cols, &req, &cfg);
        assert!(masses[0].is_finite());
        assert!(masses[0] > 0.0);
    }
}
