// report.rs
// Delivery accounting for a solved mix: per-ion achieved concentrations,
// residuals against the targets, and CSV/JSON export of the weigh-out list.
// The delivered-mass formula here is the same one the optimizer's
// feasibility check uses, so reported residuals agree with what the
// elimination pass saw.

use crate::catalog::{Candidate, TankGroup};
use crate::composition::{requirement_grams, IonVector};
use crate::config::{self, SolverConfig};
use crate::elements::Ion;
use crate::solver::{delivered_totals, ion_requirement_met, MixResult};
use crate::units;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One row of the delivery table.
#[derive(Clone, Debug, Serialize)]
pub struct IonDelivery {
    pub ion: Ion,
    pub target_mg_l: f64,
    pub required_g: f64,
    pub delivered_g: f64,
    pub delivered_mg_l: f64,
    /// Achieved minus requested concentration; negative means shortfall.
    pub residual_mg_l: f64,
    /// Satisfied under the optimizer's 99% near-match rule.
    pub met: bool,
    /// At least one candidate salt supplies this ion at all.
    pub reachable: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct DeliveryReport {
    pub volume_l: f64,
    pub total_cost: f64,
    pub rows: Vec<IonDelivery>,
}

impl DeliveryReport {
    /// Derive the full per-ion table from a solved mix. The requirement is
    /// recomputed from the targets so report and solver always agree.
    pub fn build(
        candidates: &[Candidate],
        mix: &MixResult,
        targets_mg_l: &IonVector,
        volume_l: f64,
        cfg: &SolverConfig,
    ) -> Self {
        let requirement = requirement_grams(targets_mg_l, volume_l);
        let delivered = delivered_totals(candidates, &mix.masses_g);

        let rows = Ion::ALL
            .iter()
            .map(|&ion| {
                let target_mg_l = targets_mg_l.get(ion);
                let required_g = requirement.get(ion);
                let delivered_g = delivered.get(ion);
                let delivered_mg_l = units::grams_to_mg_per_l(delivered_g, volume_l);
                IonDelivery {
                    ion,
                    target_mg_l,
                    required_g,
                    delivered_g,
                    delivered_mg_l,
                    residual_mg_l: delivered_mg_l - target_mg_l,
                    met: ion_requirement_met(delivered_g, required_g, cfg),
                    reachable: candidates.iter().any(|c| c.composition.get(ion) > 0.0),
                }
            })
            .collect();

        DeliveryReport {
            volume_l,
            total_cost: mix.cost,
            rows,
        }
    }

    /// Requested ions that missed the 99% near-match rule.
    pub fn under_delivered(&self) -> Vec<Ion> {
        self.rows
            .iter()
            .filter(|row| row.required_g > 0.0 && !row.met)
            .map(|row| row.ion)
            .collect()
    }

    /// Requested ions no candidate can supply. Always a subset of
    /// `under_delivered`.
    pub fn unreachable_ions(&self) -> Vec<Ion> {
        self.rows
            .iter()
            .filter(|row| row.required_g > 0.0 && !row.reachable)
            .map(|row| row.ion)
            .collect()
    }
}

/// One line of the weigh-out list.
#[derive(Clone, Debug, Serialize)]
pub struct SaltDose {
    pub id: String,
    pub name: String,
    pub tank: TankGroup,
    pub grams: f64,
    pub grams_per_l: f64,
    pub cost: f64,
}

/// Weigh-out list for a solved mix, skipping salts below the negligible
/// mass threshold. Order follows the candidate list.
pub fn salt_doses(candidates: &[Candidate], masses_g: &[f64], volume_l: f64) -> Vec<SaltDose> {
    candidates
        .iter()
        .zip(masses_g.iter())
        .filter(|(_, &mass)| mass > config::NEGLIGIBLE_MASS_G)
        .map(|(candidate, &mass)| SaltDose {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            tank: candidate.tank,
            grams: mass,
            grams_per_l: mass / units::effective_volume(volume_l),
            cost: mass * candidate.cost_per_gram(),
        })
        .collect()
}

/// Write the weigh-out list as CSV.
pub fn export_doses_csv(path: &Path, doses: &[SaltDose]) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    writeln!(file, "salt_id,name,tank,grams,grams_per_liter,cost")?;
    for dose in doses {
        writeln!(
            file,
            "{},{},{:?},{:.4},{:.6},{:.4}",
            dose.id, dose.name, dose.tank, dose.grams, dose.grams_per_l, dose.cost
        )?;
    }
    println!("📄 Exported weigh-out list to {}", path.display());
    Ok(())
}

/// Everything one run produced, bundled for JSON export.
#[derive(Serialize)]
pub struct MixExport<'a> {
    pub scenario: &'a str,
    pub volume_l: f64,
    pub total_cost: f64,
    pub doses: &'a [SaltDose],
    pub delivery: &'a DeliveryReport,
}

pub fn export_report_json(path: &Path, export: &MixExport) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, export)?;
    println!("📄 Exported full report to {}", path.display());
    Ok(())
}

/// One preset's line in a sweep comparison.
#[derive(Clone, Debug, Serialize)]
pub struct SweepRow {
    pub preset: String,
    pub total_grams: f64,
    pub salts_used: usize,
    pub cost: f64,
    pub under_delivered: usize,
}

/// Write the preset sweep comparison as CSV.
pub fn export_sweep_csv(
    path: &Path,
    volume_l: f64,
    rows: &[SweepRow],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    writeln!(file, "preset,volume_l,salts_used,total_grams,cost,under_delivered")?;
    for row in rows {
        writeln!(
            file,
            "{},{},{},{:.4},{:.4},{}",
            row.preset, volume_l, row.salts_used, row.total_grams, row.cost, row.under_delivered
        )?;
    }
    println!("📄 Exported sweep summary to {}", path.display());
    Ok(())
}
