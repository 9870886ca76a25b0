// runner.rs
// Headless scenario runner: resolves a scenario, solves the mix, prints the
// weigh-out and delivery tables, and exports results when an output
// directory is given. Also hosts the all-presets sweep.

use crate::catalog::{self, Candidate, OverrideMap};
use crate::composition::requirement_grams;
use crate::config::SolverConfig;
use crate::elements::Ion;
use crate::presets;
use crate::report::{self, DeliveryReport, MixExport, SaltDose, SweepRow};
use crate::scenario::Scenario;
use crate::solver::{compute_mix, solve_baseline, MixResult};
use rayon::prelude::*;
use std::path::Path;

pub struct MixRunner {
    scenario: Scenario,
    output_dir: Option<String>,
}

/// Everything one run produced, returned for callers that want more than
/// the printed tables.
pub struct RunOutput {
    pub candidates: Vec<Candidate>,
    pub mix: MixResult,
    pub doses: Vec<SaltDose>,
    pub report: DeliveryReport,
}

impl MixRunner {
    pub fn new(scenario: Scenario, output_dir: Option<String>) -> Self {
        Self {
            scenario,
            output_dir,
        }
    }

    pub fn run(&self) -> Result<RunOutput, Box<dyn std::error::Error>> {
        println!("\n╔══════════════════════════════════════════╗");
        println!("║  Solving scenario: {}  ", self.scenario.name);
        println!("╚══════════════════════════════════════════╝\n");

        let targets = self.scenario.resolve_targets()?;
        let candidates = catalog::candidates(
            &catalog::SALT_CATALOG,
            &self.scenario.overrides,
            self.scenario.include_micros,
        )?;

        println!("⚙️  Volume: {} L", self.scenario.volume_l);
        if let Some(preset) = &self.scenario.preset {
            println!("⚙️  Preset: {}", preset);
        }
        println!(
            "⚙️  Candidates: {} salts{}",
            candidates.len(),
            if self.scenario.include_micros {
                ""
            } else {
                " (micronutrient sources excluded)"
            }
        );
        println!(
            "⚙️  Cost optimization: {}\n",
            if self.scenario.optimize { "on" } else { "off" }
        );

        let cfg = SolverConfig::default();
        let requirement = requirement_grams(&targets, self.scenario.volume_l);

        let start_time = std::time::Instant::now();
        let mix = if self.scenario.optimize {
            compute_mix(&candidates, &requirement, &cfg)
        } else {
            solve_baseline(&candidates, &requirement, &cfg)
        };
        println!(
            "✓ Solved in {:.2}s",
            start_time.elapsed().as_secs_f32()
        );

        let delivery = DeliveryReport::build(&candidates, &mix, &targets, self.scenario.volume_l, &cfg);
        let doses = report::salt_doses(&candidates, &mix.masses_g, self.scenario.volume_l);

        print_doses(&doses, mix.cost);
        print_delivery(&delivery);

        let unreachable = delivery.unreachable_ions();
        for &ion in &unreachable {
            println!("⚠️  No candidate salt supplies {}", ion);
        }
        for ion in delivery.under_delivered() {
            if !unreachable.contains(&ion) {
                println!("⚠️  {} lands below 99% of its target", ion);
            }
        }

        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir)?;
            let stem = self.scenario.name.replace(' ', "_");
            report::export_doses_csv(
                &Path::new(dir).join(format!("{}_mix.csv", stem)),
                &doses,
            )?;
            report::export_report_json(
                &Path::new(dir).join(format!("{}_report.json", stem)),
                &MixExport {
                    scenario: &self.scenario.name,
                    volume_l: self.scenario.volume_l,
                    total_cost: mix.cost,
                    doses: &doses,
                    delivery: &delivery,
                },
            )?;
        }

        println!("\n✅ Scenario '{}' completed", self.scenario.name);

        Ok(RunOutput {
            candidates,
            mix,
            doses,
            report: delivery,
        })
    }

    /// Solve every builtin preset at one volume, in parallel, and print a
    /// comparison table. Output order follows the preset menu regardless of
    /// which worker finishes first.
    pub fn sweep_presets(
        volume_l: f64,
        include_micros: bool,
        output_dir: Option<&str>,
    ) -> Result<Vec<SweepRow>, Box<dyn std::error::Error>> {
        println!("\n╔══════════════════════════════════════════╗");
        println!("║  Preset sweep at {} L  ", volume_l);
        println!("╚══════════════════════════════════════════╝\n");

        let candidates = catalog::candidates(
            &catalog::SALT_CATALOG,
            &OverrideMap::new(),
            include_micros,
        )?;
        let cfg = SolverConfig::default();

        let rows: Vec<SweepRow> = presets::CROP_PRESETS
            .par_iter()
            .map(|(name, targets)| {
                let requirement = requirement_grams(targets, volume_l);
                let mix = compute_mix(&candidates, &requirement, &cfg);
                let delivery =
                    DeliveryReport::build(&candidates, &mix, targets, volume_l, &cfg);
                let doses = report::salt_doses(&candidates, &mix.masses_g, volume_l);
                SweepRow {
                    preset: name.to_string(),
                    total_grams: doses.iter().map(|d| d.grams).sum(),
                    salts_used: doses.len(),
                    cost: mix.cost,
                    under_delivered: delivery.under_delivered().len(),
                }
            })
            .collect();

        println!(
            "{:<15} {:>10} {:>12} {:>10} {:>8}",
            "Preset", "Salts", "Total (g)", "Cost", "Short"
        );
        for row in &rows {
            println!(
                "{:<15} {:>10} {:>12.2} {:>10.4} {:>8}",
                row.preset, row.salts_used, row.total_grams, row.cost, row.under_delivered
            );
        }

        if let Some(dir) = output_dir {
            std::fs::create_dir_all(dir)?;
            report::export_sweep_csv(&Path::new(dir).join("preset_sweep.csv"), volume_l, &rows)?;
        }

        println!("\n✅ Swept {} presets", rows.len());
        Ok(rows)
    }

    /// List builtin presets with their macronutrient headline numbers.
    pub fn list_presets() {
        println!("\nBuiltin crop presets ({}):\n", presets::CROP_PRESETS.len());
        for (idx, (name, targets)) in presets::CROP_PRESETS.iter().enumerate() {
            println!("  [{}] {}", idx + 1, name);
            println!(
                "      N {:.0} / P {:.0} / K {:.0} / Ca {:.0} / Mg {:.0} / S {:.0} mg/L",
                targets.get(Ion::N),
                targets.get(Ion::P),
                targets.get(Ion::K),
                targets.get(Ion::Ca),
                targets.get(Ion::Mg),
                targets.get(Ion::S),
            );
        }
        println!();
    }

    /// List the builtin salt catalog.
    pub fn list_salts() {
        println!(
            "\nBuiltin salt catalog ({} salts):\n",
            catalog::SALT_CATALOG.len()
        );
        for salt in catalog::SALT_CATALOG.iter() {
            let ions: Vec<String> = salt
                .stoichiometry
                .iter()
                .map(|(ion, count)| format!("{}x{}", ion, count))
                .collect();
            println!("  {:<18} {} [tank {:?}]", salt.id, salt.name, salt.tank);
            println!(
                "      {:.3} g/mol, {} , {:.2}/kg",
                salt.molar_mass,
                ions.join(" "),
                salt.cost_per_kg
            );
            println!("      {}", salt.source_notes);
        }
        println!();
    }
}

fn print_doses(doses: &[SaltDose], total_cost: f64) {
    println!("\n{:<18} {:>10} {:>12} {:>10}  {}", "Salt", "Grams", "g/L", "Cost", "Tank");
    for dose in doses {
        println!(
            "{:<18} {:>10.3} {:>12.5} {:>10.4}  {:?}",
            dose.id, dose.grams, dose.grams_per_l, dose.cost, dose.tank
        );
    }
    println!("{:<18} {:>10} {:>12} {:>10.4}", "Total cost", "", "", total_cost);
}

fn print_delivery(report: &DeliveryReport) {
    println!(
        "\n{:<4} {:>12} {:>14} {:>12}  {}",
        "Ion", "Target mg/L", "Delivered mg/L", "Residual", "OK"
    );
    for row in &report.rows {
        println!(
            "{:<4} {:>12.3} {:>14.3} {:>+12.3}  {}",
            row.ion,
            row.target_mg_l,
            row.delivered_mg_l,
            row.residual_mg_l,
            if row.met { "✓" } else { "✗" }
        );
    }
}
