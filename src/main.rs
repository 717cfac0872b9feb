//! coordsweep CLI entry point

use anyhow::{Context, Result};
use coordsweep::config::cli::{Cli, ExecutionMode};
use coordsweep::config::{toml, validator, Config};
use coordsweep::coordinator::{SweepCoordinator, SweepPlan};
use coordsweep::engine::{command::CommandRunner, JobRunner, NoopRunner};
use coordsweep::output::{self, text, SweepManifest};
use coordsweep::worker::{load_template, JobSettings};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();

    println!("coordsweep v{}", env!("CARGO_PKG_VERSION"));
    println!("Coordination statistics and Monte Carlo sweep dispatch");
    println!();

    cli.validate()?;

    let config = build_config(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    match cli.mode {
        ExecutionMode::Extract => run_extract(&cli, &config),
        ExecutionMode::Sweep => run_sweep(&cli, &config),
    }
}

/// Merge the optional TOML file with CLI flags
fn build_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => {
            log::debug!("Loading configuration from {}", path.display());
            toml::parse_toml_file(path)?
        }
        None => Config::default(),
    };

    toml::merge_cli_with_config(cli, base)
}

/// Run the coordination extraction pipeline
fn run_extract(cli: &Cli, config: &Config) -> Result<()> {
    print_extract_configuration(config);

    if cli.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    let dataset = coordsweep::dataset::load_dataset(&config.extract)?;
    output::write_dataset(&dataset, &config.output)?;

    println!();
    text::print_extract_summary(&dataset);
    Ok(())
}

/// Run the Monte Carlo sweep
fn run_sweep(cli: &Cli, config: &Config) -> Result<()> {
    let sweep = &config.sweep;
    print_sweep_configuration(config);

    let plan = SweepPlan::new(sweep)?;

    if cli.dry_run {
        println!();
        text::print_plan(&plan);
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let settings = JobSettings {
        template: load_template(&sweep.template)?,
        root: sweep.root.clone(),
        input_file: sweep.input_file.clone(),
        existing: sweep.existing,
    };

    let command_runner = CommandRunner::new(sweep.command.clone(), sweep.args.clone());
    let runner: &dyn JobRunner = if cli.no_launch {
        &NoopRunner
    } else {
        &command_runner
    };

    println!();
    let coordinator = SweepCoordinator::new(plan, settings, runner);
    let report = match sweep.rank {
        Some(rank) => coordinator.run_rank(rank)?,
        None => coordinator.run()?,
    };

    println!();
    text::print_sweep_summary(&report);

    if let Some(ref path) = config.output.manifest {
        let path = output::manifest_path(path, sweep.rank);
        output::write_manifest(&path, &SweepManifest::new(sweep, &report))?;
    }

    Ok(())
}

fn print_extract_configuration(config: &Config) {
    let extract = &config.extract;
    println!("Configuration:");
    println!("  Extraction:");
    println!("    Table: {}", extract.table.display());
    println!("    Structures: {}", extract.structure_pattern);
    println!(
        "    Scales: composition x{}, energy x{}, size x{}",
        extract.composition_scale, extract.energy_scale, extract.size_scale
    );
    println!(
        "    Na split: {} within {} Å",
        extract.classifier.split_marker, extract.classifier.split_radius
    );
    println!("  Queries:");
    for query in &extract.queries {
        println!(
            "    {:<24} r <= {:<5} k = {:<3} min = {}",
            query.label, query.radius, query.k, query.min_distance
        );
    }
    println!("  Output:");
    println!("    Path: {}", config.output.path.display());
    println!("    Format: {}", config.output.format);
}

fn print_sweep_configuration(config: &Config) {
    let sweep = &config.sweep;
    println!("Configuration:");
    println!("  Sweep:");
    println!(
        "    Temperature grid: {} ({} values)",
        sweep.temperature_grid,
        sweep.temperature_grid.len()
    );
    println!(
        "    Potential grid: {} ({} values)",
        sweep.potential_grid,
        sweep.potential_grid.len()
    );
    let directions: Vec<String> = sweep.directions.iter().map(|d| d.to_string()).collect();
    println!("    Directions: {}", directions.join(", "));
    println!("    Template: {}", sweep.template.display());
    println!("    Job root: {}", sweep.root.display());
    println!("    Command: {}", sweep.command_line());
    println!("    Existing directories: {}", sweep.existing);
    println!("  Workers:");
    match (sweep.rank, sweep.world_size) {
        (Some(rank), Some(size)) => println!("    Rank {} of {}", rank, size),
        _ => println!("    Threads: {}", sweep.effective_workers()),
    }
    if let Some(ref path) = config.output.manifest {
        println!("  Manifest: {}", output::manifest_path(path, sweep.rank).display());
    }
}
