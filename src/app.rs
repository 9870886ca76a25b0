/// CLI for computing nutrient solution mixes from scenario files
use crate::runner::MixRunner;
use crate::scenario::Scenario;
use std::env;

pub fn run() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "init" => init_scenario(&args[2..]),
        "run" => run_scenario(&args[2..]),
        "sweep" => sweep_presets(&args[2..]),
        "list-presets" => MixRunner::list_presets(),
        "list-salts" => MixRunner::list_salts(),
        _ => {
            println!("Unknown command: {}", command);
            print_usage();
        }
    }
}

fn print_usage() {
    println!("\n╔══════════════════════════════════════════════════════════╗");
    println!("║  NutrientMix - Hydroponic Solution Calculator  ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");
    println!("Usage: cargo run --release -- <command> [options]\n");
    println!("Commands:");
    println!("  init          Write a starter scenario file");
    println!("  run           Solve a scenario file");
    println!("  sweep         Solve every builtin preset at one volume");
    println!("  list-presets  List builtin crop presets");
    println!("  list-salts    List the builtin salt catalog\n");
    println!("Examples:");
    println!("  # Write a starter scenario");
    println!("  cargo run --release -- init my_tank.toml\n");
    println!("  # Solve it, exporting CSV and JSON next to the results");
    println!("  cargo run --release -- run my_tank.toml results\n");
    println!("  # Compare all presets for a 200 L tank");
    println!("  cargo run --release -- sweep 200 results\n");
}

fn init_scenario(args: &[String]) {
    if args.is_empty() {
        println!("❌ Error: Please specify output file name");
        println!("Usage: cargo run -- init <scenario_file.toml>");
        return;
    }

    let output_file = &args[0];
    let scenario = Scenario::example();

    match scenario.to_file(output_file) {
        Ok(_) => {
            println!("✅ Starter scenario written: {}", output_file);
            println!("   Edit the preset, targets, and overrides, then run it.");
        }
        Err(e) => {
            println!("❌ Error writing scenario: {}", e);
        }
    }
}

fn run_scenario(args: &[String]) {
    if args.is_empty() {
        println!("❌ Error: Please specify a scenario file");
        println!("Usage: cargo run -- run <scenario_file.toml> [output_dir]");
        return;
    }

    let scenario_file = &args[0];
    let output_dir = args.get(1).cloned();

    match Scenario::from_file(scenario_file) {
        Ok(scenario) => {
            let runner = MixRunner::new(scenario, output_dir);
            if let Err(e) = runner.run() {
                println!("❌ Error solving scenario: {}", e);
            }
        }
        Err(e) => {
            println!("❌ Error loading scenario: {}", e);
        }
    }
}

fn sweep_presets(args: &[String]) {
    if args.is_empty() {
        println!("❌ Error: Please specify the tank volume in liters");
        println!("Usage: cargo run -- sweep <volume_l> [output_dir]");
        return;
    }

    let volume_l: f64 = match args[0].parse() {
        Ok(v) => v,
        Err(_) => {
            println!("❌ Error: '{}' is not a valid volume", args[0]);
            return;
        }
    };
    let output_dir = args.get(1).map(|s| s.as_str());

    if let Err(e) = MixRunner::sweep_presets(volume_l, true, output_dir) {
        println!("❌ Error running sweep: {}", e);
    }
}
