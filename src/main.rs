use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ganadero_core::genetics::{resolve_breed, HybridCache};
use ganadero_core::herd::HerdEvaluator;
use ganadero_core::metrics::init_logging;
use ganadero_core::nutrition::{compare_to_targets, NutritionEngine};
use ganadero_lib::report::{render_markdown, write_records_jsonl};
use ganadero_lib::scenario::{Scenario, ScenarioError};
use std::fs::File;
use std::io::BufWriter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate the herd up to a date and write the report
    Simulate {
        #[arg(short, long)]
        scenario: String,

        /// Model parameters (TOML); defaults when missing
        #[arg(short, long, default_value = "ganadero.toml")]
        config: String,

        /// Simulation date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Markdown report path; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// JSONL path for the new monthly records
        #[arg(short, long)]
        records: Option<String>,
    },
    /// Print the F1 hybrid of two registered breeds as JSON
    Cross {
        #[arg(short, long)]
        scenario: String,

        #[arg(long)]
        sire: String,

        #[arg(long)]
        dam: String,
    },
    /// Write a scenario's breeds as a standalone registry file
    ExportBreeds {
        #[arg(short, long)]
        scenario: String,

        #[arg(short, long)]
        output: String,
    },
    /// Check an animal's ration
    ValidateDiet {
        #[arg(short, long)]
        scenario: String,

        #[arg(short, long)]
        animal: String,

        /// Feeding date (defaults to today)
        #[arg(long)]
        on: Option<NaiveDate>,

        #[arg(short, long, default_value = "ganadero.toml")]
        config: String,
    },
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Command::Simulate {
            scenario,
            config,
            as_of,
            output,
            records,
        } => {
            let scenario = Scenario::load(&scenario)?;
            let config = ganadero_lib::load_config(&config)?;
            let registry = scenario.registry();
            let climate = scenario.climate_history();
            let now = as_of.unwrap_or_else(today);

            let evaluator = HerdEvaluator::new(&config, &registry, scenario.catalog());
            let report = evaluator.evaluate(
                &scenario.animals,
                &climate,
                &scenario.existing_weighings,
                now,
            );

            let markdown = render_markdown(&report, &scenario.name, scenario.hectares)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, markdown)
                        .with_context(|| format!("Failed to write report {path}"))?;
                    println!("Report generated: {path}");
                }
                None => print!("{markdown}"),
            }

            if let Some(path) = records {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create records file {path}"))?;
                let written = write_records_jsonl(&report, BufWriter::new(file))?;
                println!("Wrote {written} monthly records to {path}");
            }
        }
        Command::Cross {
            scenario,
            sire,
            dam,
        } => {
            let scenario = Scenario::load(&scenario)?;
            let registry = scenario.registry();
            let mut cache = HybridCache::new();
            let hybrid = cache.get_or_cross(&registry, &sire, &dam)?;
            println!("{}", serde_json::to_string_pretty(hybrid)?);
        }
        Command::ExportBreeds { scenario, output } => {
            let registry = Scenario::load(&scenario)?.registry();
            registry
                .save(&output)
                .with_context(|| format!("Failed to write breeds {output}"))?;
            println!("Exported {} breeds to {output}", registry.len());
        }
        Command::ValidateDiet {
            scenario,
            animal,
            on,
            config,
        } => {
            let scenario = Scenario::load(&scenario)?;
            let config = ganadero_lib::load_config(&config)?;
            let on = on.unwrap_or_else(today);
            let animal = scenario.animal(&animal)?;
            let diet = animal
                .diet
                .as_ref()
                .ok_or_else(|| ScenarioError::NoDiet(animal.id.clone()))?;

            let registry = scenario.registry();
            let breed = resolve_breed(&registry, &animal.breed, &mut HybridCache::new())?;
            let engine = NutritionEngine::new(config.nutrition, scenario.catalog());
            let analysis = engine.analyze_diet(diet);
            let validation = engine.validate_analysis(&analysis, &breed, on);
            let stage = engine.stage(animal, on);
            let comparison = compare_to_targets(&analysis, stage, None);

            println!("Animal {} ({}) on {on}: stage {stage}", animal.id, breed.name);
            println!(
                "Ration: {:.2} kg DM, {:.2} Mcal/kg, {:.1}% CP, {:.1}% NDF",
                analysis.dry_matter_kg,
                analysis.energy_density(),
                analysis.crude_protein_pct,
                analysis.ndf_pct
            );
            println!(
                "Versus targets: CP {:+.1} pts, energy {:+.2} Mcal/kg, NDF {:+.1} pts",
                comparison.protein_delta_pct,
                comparison.energy_delta_mcal_kg,
                comparison.ndf_delta_pct
            );
            if validation.is_valid() {
                println!("No alerts.");
            } else {
                for alert in &validation.alerts {
                    println!("[{:?}] {}: {}", alert.level, alert.code, alert.message);
                }
            }
        }
    }

    Ok(())
}
