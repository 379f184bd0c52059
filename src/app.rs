//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - runs the bowtie pipeline
//! - prints reports/plots
//! - writes optional exports

use std::path::Path;

use clap::Parser;
use log::info;

use crate::cli::{AnalyzeArgs, Cli, Command, ShowArgs, SynthArgs};
use crate::data::{ResponseNoise, boxcar_table, default_boxcars};
use crate::domain::BowtieConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `bowtie` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Synth(args) => handle_synth(args),
        Command::Show(args) => handle_show(args),
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or crate-level info with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,bowtie_gf=info" } else { "warn" };
    // A second init (e.g. from tests) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_run_summary(run.table(), &config));
    println!("{}", crate::report::format_results_table(&run.results, config.mode));

    if config.plot {
        for plot in run.results.iter().filter_map(|r| r.plot.as_ref()) {
            println!(
                "{}",
                crate::plot::render_bowtie_ascii(plot, config.plot_width, config.plot_height)
            );
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        let figures = crate::io::save_results(path, &run.results, config.save_figures)?;
        info!("wrote {} and {} figure(s)", path.display(), figures.len());
    } else if config.save_figures {
        for plot in run.results.iter().filter_map(|r| r.plot.as_ref()) {
            let path = crate::plot::save_bowtie_figure(Path::new("."), plot)?;
            info!("wrote {}", path.display());
        }
    }
    if let Some(path) = &config.export_json {
        let file = crate::io::results_file(&config, &run.results);
        crate::io::write_results_json(path, &file)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let noise = (args.noise > 0.0).then_some(ResponseNoise {
        relative: args.noise,
        seed: args.seed,
    });
    let table = boxcar_table(&default_boxcars(), args.energy_min, args.energy_max, args.points, noise)?;
    crate::io::write_response_csv(&args.out, &table, &args.energy_column)?;

    println!(
        "Wrote {} channel(s) x {} energies to {}",
        table.channel_count(),
        table.energy_grid().len(),
        args.out.display()
    );
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let file = crate::io::read_results_json(&args.results)?;
    let s = &file.settings;

    println!("Source: {} ({})", file.source, file.tool);
    println!(
        "Energy window: [{}, {}] | indices: {} steps in [{}, {}]",
        s.energy_min, s.energy_max, s.gamma_steps, s.gamma_min, s.gamma_max
    );
    println!("{}", crate::report::format_results_table(&file.results, s.mode));
    Ok(())
}

pub fn config_from_args(args: &AnalyzeArgs) -> BowtieConfig {
    BowtieConfig {
        responses: args.responses.clone(),
        energy_column: args.energy_column.clone(),
        energy_min: args.energy_min,
        energy_max: args.energy_max,
        gamma_min: args.gamma_min,
        gamma_max: args.gamma_max,
        gamma_steps: args.gamma_steps,
        mode: args.mode,
        resample: args.resample,
        channel: args.channel.clone(),
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_json: args.export_json.clone(),
        save_figures: args.save_figures,
    }
}
