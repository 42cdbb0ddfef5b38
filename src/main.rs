use anyhow::Result;
use clap::Parser;
use phototree::phototree_core::error::DistributionReport;
use phototree::phototree_core::find::{PlaceQuery, plan_place_search, similar_places};
use phototree::phototree_core::{
    Cli, Commands, DistributeOptions, PhototreeError, SortSettings, build_plan, distribute,
    format_plan,
};
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("phototree.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    match cli.command {
        Commands::Sort {
            plan,
            dry_run,
            jobs,
        } => {
            let settings = SortSettings::new(plan.criteria.as_slice(), plan.output.clone(), plan.distance)?;
            let records = plan.input.source()?.load(settings.distance_km)?;
            let map = build_plan(records, &settings);
            let report = distribute(map, &DistributeOptions { dry_run, jobs })?;

            if !dry_run {
                print_report("Sort", &report);
            }
            report.into_result()?;
        }

        Commands::Plan { plan, format } => {
            let settings = SortSettings::new(plan.criteria.as_slice(), plan.output.clone(), plan.distance)?;
            let records = plan.input.source()?.load(settings.distance_km)?;
            let map = build_plan(records, &settings);
            println!("{}", format_plan(&map, &format));
        }

        Commands::Find {
            input,
            country,
            city,
            output,
            distance,
        } => {
            let output = output.ok_or(PhototreeError::MissingOutputPath)?;
            let query = match (country, city) {
                (Some(country), _) => PlaceQuery::Country(country),
                (None, Some(city)) => {
                    if distance.is_none() {
                        return Err(PhototreeError::MissingDistanceParameter.into());
                    }
                    PlaceQuery::City(city)
                }
                (None, None) => {
                    return Err(PhototreeError::Argument("--country or --city is required".to_string()).into());
                }
            };

            let records = input.source()?.load(distance)?;
            let map = plan_place_search(&records, &query, &output);

            if map.file_count() == 0 {
                println!("No photos found for '{}'", query.name());
                let suggestions = similar_places(&records, &query);
                if !suggestions.is_empty() {
                    println!("Did you mean: {}?", suggestions.join(", "));
                }
                return Ok(());
            }

            let report = distribute(map, &DistributeOptions::default())?;
            print_report("Find", &report);
            report.into_result()?;
        }
    }

    Ok(())
}

fn print_report(what: &str, report: &DistributionReport) {
    println!("\n{} complete!", what);
    println!("  {} folders written", report.leaves_written);
    println!("  {} files copied", report.files_copied);
    println!("  {} bytes transferred", report.bytes_copied);
    if report.files_in_place > 0 {
        println!("  {} files already in place", report.files_in_place);
    }
    if report.files_overwritten > 0 {
        println!("  {} files overwritten by a same-named photo", report.files_overwritten);
    }
    if !report.is_clean() {
        println!(
            "  {} folders and {} files failed",
            report.failed_leaves.len(),
            report.failed_copies.len()
        );
    }
}
