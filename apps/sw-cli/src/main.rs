mod args;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use sw_app::{
    AppResult, ChainMismatch, RunOptions, RunProgressEvent, RunRequest, RunStage,
    project_service, query, run_service, runtime_compile,
};
use sw_sim::CoiMethod;

use crate::args::{DisturbanceArg, parse_area_list, parse_disturbance};

#[derive(Parser)]
#[command(name = "swingnet")]
#[command(about = "swingnet - Multi-area power grid swing dynamics simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in ten-area scenario
    Template {
        /// Output file (YAML, or JSON for .json); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate scenario file syntax and parameters
    Validate {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// List areas in a scenario
    Areas {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// Show the connection matrix and chain coupling of a selection
    Topology {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// 1-based area numbers (comma separated) or "all"
        #[arg(long)]
        areas: Option<String>,
    },
    /// Run a swing simulation and print per-area COI series
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Path to the scenario file
    scenario_path: PathBuf,
    /// 1-based area numbers (comma separated) or "all"
    #[arg(long)]
    areas: Option<String>,
    /// Initial angle AREA:GEN:ANGLE (1-based; ANGLE may end in deg or rad)
    #[arg(long, value_parser = parse_disturbance)]
    disturb: Vec<DisturbanceArg>,
    /// End time in seconds
    #[arg(long)]
    t_end: Option<f64>,
    /// Number of output samples
    #[arg(long)]
    points: Option<usize>,
    /// Random seed for initial jitter
    #[arg(long)]
    seed: Option<u64>,
    /// Standard deviation of initial angle jitter (rad)
    #[arg(long)]
    jitter: Option<f64>,
    /// Print every Nth COI sample
    #[arg(long, default_value_t = 50)]
    every: usize,
    /// Use the circular mean for COI angles
    #[arg(long)]
    circular: bool,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Template { output } => cmd_template(output.as_deref()),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Areas { scenario_path } => cmd_areas(&scenario_path),
        Commands::Topology {
            scenario_path,
            areas,
        } => cmd_topology(&scenario_path, areas.as_deref()),
        Commands::Run(args) => cmd_run(args),
    }
}

fn cmd_template(output: Option<&Path>) -> AppResult<()> {
    let scenario = sw_project::japan_ten_area();
    match output {
        Some(path) => {
            project_service::save_scenario(path, &scenario)?;
            println!("✓ Wrote template to {}", path.display());
        }
        None => print!("{}", sw_project::to_yaml_string(&scenario)?),
    }
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = project_service::load_scenario(scenario_path)?;
    project_service::validate_scenario(&scenario)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_areas(scenario_path: &Path) -> AppResult<()> {
    let scenario = project_service::load_scenario(scenario_path)?;
    let areas = project_service::list_areas(&scenario)?;

    println!("Areas in scenario '{}':", scenario.name);
    for area in areas {
        let neighbors: Vec<String> = area.neighbors.iter().map(|n| (n + 1).to_string()).collect();
        println!(
            "  {:>2} {:<10} n={:<3} p_m={:.3} b={:.3} b_int={:.1} eps={:.3}  neighbours=[{}]",
            area.index + 1,
            area.name,
            area.generator_count,
            area.p_m,
            area.b,
            area.b_int,
            area.epsilon,
            neighbors.join(",")
        );
    }
    Ok(())
}

fn cmd_topology(scenario_path: &Path, areas: Option<&str>) -> AppResult<()> {
    let mut scenario = project_service::load_scenario(scenario_path)?;
    if let Some(text) = areas {
        scenario.selection = parse_area_list(text, scenario.areas.len())?;
    }
    project_service::validate_scenario(&scenario)?;
    let topo = runtime_compile::compile_topology(&scenario)?;

    println!("Selected areas: {}", topo.names.join(", "));
    println!("\nConnection matrix:");
    for i in 0..topo.connection.nrows() {
        let row: Vec<String> = topo
            .connection
            .row(i)
            .iter()
            .map(|v| format!("{:4.1}", v))
            .collect();
        println!("  {:<10} {}", topo.names[i], row.join(" "));
    }

    println!("\nChain coupling:");
    for (i, j) in &topo.chain {
        println!("  {} - {}", topo.names[*i], topo.names[*j]);
    }

    if topo.mismatches.is_empty() {
        println!("\n✓ Chain coupling matches the adjacency table");
    } else {
        println!("\n{} mismatch(es) between chain and adjacency:", topo.mismatches.len());
        for m in &topo.mismatches {
            match *m {
                ChainMismatch::CoupledNotAdjacent(i, j) => println!(
                    "  coupled but not adjacent: {} - {}",
                    topo.names[i], topo.names[j]
                ),
                ChainMismatch::AdjacentNotCoupled(i, j) => println!(
                    "  adjacent but not coupled: {} - {}",
                    topo.names[i], topo.names[j]
                ),
            }
        }
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> AppResult<()> {
    let mut scenario = project_service::load_scenario(&args.scenario_path)?;
    if let Some(text) = &args.areas {
        let selection = parse_area_list(text, scenario.areas.len())?;
        if args.disturb.is_empty() {
            let dropped = project_service::reselect(&mut scenario, selection)?;
            if !dropped.is_empty() {
                println!(
                    "Note: dropped {} disturbance(s) on areas outside --areas",
                    dropped.len()
                );
            }
        } else {
            scenario.selection = selection;
        }
    }
    if !args.disturb.is_empty() {
        scenario.disturbances = args.disturb.iter().map(|d| d.to_def()).collect();
    }
    if let Some(t_end) = args.t_end {
        scenario.time.end_s = t_end;
    }
    if let Some(points) = args.points {
        scenario.time.points = points;
    }
    if let Some(seed) = args.seed {
        scenario.initial.seed = seed;
    }
    if let Some(jitter) = args.jitter {
        scenario.initial.jitter_rad = jitter;
    }
    tracing::debug!(
        selection = ?scenario.selection,
        disturbances = scenario.disturbances.len(),
        "scenario overrides applied"
    );

    println!("Running swing simulation: {}", scenario.name);

    let request = RunRequest {
        scenario: &scenario,
        options: RunOptions {
            coi_method: if args.circular {
                CoiMethod::Circular
            } else {
                CoiMethod::WrappedArithmetic
            },
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::run_scenario_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Simulation completed");

    let summary = query::get_run_summary(&response)?;
    println!("\nRun summary:");
    println!(
        "  Time range: {:.3} - {:.3} s ({} samples)",
        summary.time_range.0, summary.time_range.1, summary.sample_count
    );
    println!(
        "  Areas: {}  Generators: {}  State length: {}",
        summary.area_count, summary.generator_count, summary.state_len
    );
    for (name, peak) in response.area_names.iter().zip(&summary.peak_frequency) {
        println!("  {:<10} peak |ω_COI| = {:.6} rad/s", name, peak);
    }
    if summary.mismatch_count > 0 {
        println!(
            "  Warning: {} chain/adjacency mismatch(es); see `swingnet topology`",
            summary.mismatch_count
        );
    }

    print_timing_summary(&response.timing);

    let rows = query::coi_table(&response, args.every)?;
    println!("\nCOI angle (rad):");
    print_table_header(&response.area_names);
    for row in &rows {
        print_table_row(row.t, &row.angle);
    }
    println!("\nCOI frequency (rad/s):");
    print_table_header(&response.area_names);
    for row in &rows {
        print_table_row(row.t, &row.frequency);
    }

    Ok(())
}

fn print_table_header(names: &[String]) {
    let cols: Vec<String> = names.iter().map(|n| format!("{:>10}", n)).collect();
    println!("{:>8} {}", "t [s]", cols.join(" "));
}

fn print_table_row(t: f64, values: &[f64]) {
    let cols: Vec<String> = values.iter().map(|v| format!("{:>10.5}", v)).collect();
    println!("{:>8.3} {}", t, cols.join(" "));
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (event.stage, &event.transient) {
        (RunStage::Integrating, Some(t)) => {
            let width = 28usize;
            let filled = ((t.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  phase={}  t={:.3}/{:.3}s  steps={}  rejected={}  elapsed={:.1}s",
                bar,
                t.fraction_complete * 100.0,
                event.stage.label(),
                t.sim_time_s,
                t.t_end_s,
                t.accepted_steps,
                t.rejected_steps,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(message) = &event.message {
                line.push_str("  ");
                line.push_str(message);
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

fn print_timing_summary(timing: &sw_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    let compile_pct = 100.0 * timing.compile_time_s / total;
    let solve_pct = 100.0 * timing.solve_time_s / total;
    let aggregate_pct = 100.0 * timing.aggregate_time_s / total;

    println!("\nTiming summary:");
    println!(
        "  Compile:   {:.3}s ({:.1}%)",
        timing.compile_time_s, compile_pct
    );
    println!("  Solve:     {:.3}s ({:.1}%)", timing.solve_time_s, solve_pct);
    println!(
        "  Aggregate: {:.3}s ({:.1}%)",
        timing.aggregate_time_s, aggregate_pct
    );
    println!("  Total:     {:.3}s", timing.total_time_s);
    println!(
        "  Steps: {} accepted, {} rejected, {} RHS evaluations",
        timing.accepted_steps, timing.rejected_steps, timing.rhs_evals
    );
}
