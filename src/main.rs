//! u-sat-schedule CLI - solve crew scheduling problem files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use u_sat_schedule::config::ProblemConfig;
use u_sat_schedule::models::ScheduleOutcome;
use u_sat_schedule::scheduler::ScheduleKpi;
use u_sat_schedule::validation::validate_input;

#[derive(Parser)]
#[command(name = "u-sat-schedule")]
#[command(author, version, about = "Crew scheduling by SAT encoding", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and print the schedule
    Solve(SolveArgs),
    /// Write the CNF encoding of a problem file in DIMACS format
    Encode(EncodeArgs),
    /// Validate a problem file without solving it
    Check {
        /// Problem file (TOML)
        problem: PathBuf,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Problem file (TOML)
    problem: PathBuf,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct EncodeArgs {
    /// Problem file (TOML)
    problem: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve(args) => solve(args),
        Commands::Encode(args) => encode(args),
        Commands::Check { problem } => check(problem),
    }
}

fn load(path: &Path) -> anyhow::Result<ProblemConfig> {
    ProblemConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

fn solve(args: SolveArgs) -> anyhow::Result<()> {
    let scheduler = load(&args.problem)?.build_scheduler()?;
    let outcome = scheduler.resolve()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        ScheduleOutcome::Scheduled(schedule) => {
            for (date, pairs) in schedule.by_day() {
                println!("{date}");
                for (team, job) in pairs {
                    println!("  {team:<12} {job}");
                }
            }
            for w in &schedule.warnings {
                println!(
                    "warning: team {} on {} has {} min of work for {} min of capacity",
                    w.team, w.date, w.load_min, w.capacity_min
                );
            }

            let kpi = ScheduleKpi::calculate(schedule, scheduler.teams(), scheduler.period());
            println!(
                "{} jobs, {} of {} teams active, avg utilization {:.1}%",
                schedule.assignment_count(),
                kpi.active_teams,
                scheduler.teams().len(),
                kpi.avg_utilization * 100.0
            );
        }
        ScheduleOutcome::Infeasible => println!("no feasible schedule"),
        ScheduleOutcome::InsufficientData(reason) => println!("insufficient data: {reason}"),
    }
    Ok(())
}

fn encode(args: EncodeArgs) -> anyhow::Result<()> {
    let scheduler = load(&args.problem)?.build_scheduler()?;
    let encoding = scheduler.encode()?;
    let dimacs = encoding.cnf.to_dimacs();

    match &args.output {
        Some(path) => {
            fs::write(path, dimacs).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(
                event = "encode_written",
                path = %path.display(),
                clauses = encoding.cnf.len(),
            );
        }
        None => print!("{dimacs}"),
    }
    Ok(())
}

fn check(problem: PathBuf) -> anyhow::Result<()> {
    let scheduler = load(&problem)?.build_scheduler()?;
    match validate_input(scheduler.teams(), scheduler.jobs(), scheduler.period()) {
        Ok(()) => {
            println!(
                "ok: {} teams, {} jobs, {} days, {} variables",
                scheduler.teams().len(),
                scheduler.jobs().len(),
                scheduler.period().len(),
                scheduler.lattice().var_count()
            );
            Ok(())
        }
        Err(errors) => {
            for e in &errors {
                println!("{:?}: {}", e.kind, e.message);
            }
            anyhow::bail!("{} problem(s) found", errors.len())
        }
    }
}
