mod config;
mod demo;
mod output;
mod parse;

use chrono::{Local, NaiveTime, Timelike};
use clap::Parser;
use courtshuffle_core::{
    compute_stats, rank_teams, schedule_session, RankingMode, SessionConfig,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "courtshuffle", version, about = "Schedule ranked pair sessions and crunch the standings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Build a round schedule from a ranked pair list
    Schedule(ScheduleArgs),
    /// Compute statistics and rankings from a results transcript
    Standings(StandingsArgs),
    /// Print a ready-made ranked pair list for trying things out
    Demo(DemoArgs),
    /// Create a default config file at ~/.config/courtshuffle/config.toml
    Init,
}

#[derive(Parser)]
struct ScheduleArgs {
    /// File with one pair per line (or a JSON array of names), strongest first
    #[arg(long)]
    pairs: Option<PathBuf>,

    /// Inline pair name (repeatable), strongest first
    #[arg(long = "pair")]
    inline_pairs: Vec<String>,

    /// Courts available per round
    #[arg(long)]
    courts: Option<usize>,

    /// Rounds to schedule
    #[arg(long)]
    rounds: Option<usize>,

    /// Largest allowed rank gap within a match
    #[arg(long)]
    max_gap: Option<usize>,

    /// How many times a matchup may repeat beyond its first occurrence
    #[arg(long)]
    max_repeats: Option<u32>,

    /// How many closing rounds tolerate repeat matchups
    #[arg(long)]
    repeat_tail: Option<usize>,

    /// RNG seed for a reproducible schedule (omit for a fresh draw)
    #[arg(long)]
    seed: Option<u64>,

    /// Start time of the first round as HH:MM (default: now)
    #[arg(long)]
    start_time: Option<String>,

    /// Minutes per round, used for the time labels
    #[arg(long)]
    round_minutes: Option<u32>,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,

    /// Show progress during scheduling
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/courtshuffle/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct StandingsArgs {
    /// Results transcript: `Game N` headers and `A x-y B` match lines
    #[arg(long)]
    results: Option<PathBuf>,

    /// Team list file: `<number> <name>` per line, for display names
    #[arg(long)]
    teams: Option<PathBuf>,

    /// Output JSON instead of tables
    #[arg(long, conflicts_with = "share")]
    json: bool,

    /// Output compact text made for pasting into a group chat
    #[arg(long)]
    share: bool,

    /// Directory to write stats.csv, ranking_wins.csv and ranking_points.csv
    #[arg(long)]
    export_csv: Option<PathBuf>,
}

#[derive(Parser)]
struct DemoArgs {
    /// How many pairs to generate
    #[arg(long, default_value_t = 8)]
    pairs: usize,

    /// RNG seed for a reproducible roster
    #[arg(long)]
    seed: Option<u64>,
}

/// Load the ranked pair list from all sources: --pairs file, --pair inline
/// args, or stdin.
fn load_pairs(args: &ScheduleArgs) -> Vec<String> {
    let mut pairs = Vec::new();

    // From file (auto-detects JSON array vs one-per-line)
    if let Some(ref path) = args.pairs {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read pairs file {}: {e}", path.display())));
        pairs = parse::parse_pair_list(&content);
    }

    // From inline --pair flags
    pairs.extend(args.inline_pairs.iter().cloned());

    // From stdin (only if no file and no inline pairs)
    if pairs.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No pairs provided. Use --pairs <file>, --pair <name>, or pipe a list via stdin.");
        }
        let content: String = stdin
            .lock()
            .lines()
            .map(|l| l.expect("Failed to read from stdin"))
            .collect::<Vec<_>>()
            .join("\n");
        pairs = parse::parse_pair_list(&content);
    }

    if pairs.len() < 2 {
        bail(format!("Need at least 2 pairs to schedule, got {}", pairs.len()));
    }
    pairs
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Schedule(args) => run_schedule(args),
        Commands::Standings(args) => run_standings(args),
        Commands::Demo(args) => run_demo(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default courts, rounds, etc.");
        }
    }
}

fn run_schedule(args: ScheduleArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let courts = args.courts.or(cfg.courts).unwrap_or(1);
    let rounds = args.rounds.or(cfg.rounds).unwrap_or(1);
    let max_gap = args.max_gap.or(cfg.max_gap).unwrap_or(10);
    let max_repeats = args.max_repeats.or(cfg.max_repeats).unwrap_or(1);
    let repeat_tail = args.repeat_tail.or(cfg.repeat_tail).unwrap_or(2);
    let round_minutes = args.round_minutes.or(cfg.round_minutes).unwrap_or(12);

    if courts < 1 {
        bail("--courts must be at least 1");
    }
    if rounds < 1 {
        bail("--rounds must be at least 1");
    }
    if max_gap < 1 {
        bail("--max-gap must be at least 1");
    }
    if round_minutes < 1 {
        bail("--round-minutes must be at least 1");
    }

    let pairs = load_pairs(&args);

    let on_floor = courts.saturating_mul(2);
    if pairs.len() < on_floor {
        bail(format!(
            "{} court(s) put {} pairs on the floor at once, but only {} signed up",
            courts,
            on_floor,
            pairs.len()
        ));
    }

    let start = match args.start_time.as_deref() {
        Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
            .unwrap_or_else(|_| bail(format!("Invalid --start-time \"{s}\", expected HH:MM"))),
        None => {
            let now = Local::now().time();
            NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now)
        }
    };

    if args.verbose {
        eprintln!(
            "Scheduling {} pairs on {} courts for {} rounds (max gap {}, repeats {}, tail {})",
            pairs.len(),
            courts,
            rounds,
            max_gap,
            max_repeats,
            repeat_tail,
        );
    }

    let schedule = schedule_session(&SessionConfig {
        n_pairs: pairs.len(),
        courts,
        rounds_requested: rounds,
        max_gap,
        max_repeat_per_matchup: max_repeats,
        repeat_tail_rounds: repeat_tail,
        seed: args.seed,
    });

    if schedule.is_infeasible() {
        bail("No feasible round under these constraints. Try a larger --max-gap, fewer --courts, or more pairs.");
    }

    if schedule.rounds_actual() < schedule.rounds_requested {
        eprintln!(
            "Warning: only {} of {} rounds were feasible; the rest would break the gap or repeat limits.",
            schedule.rounds_actual(),
            schedule.rounds_requested,
        );
    }
    if schedule.forced_early_repeats > 0 {
        eprintln!(
            "Warning: {} match(es) repeat a matchup before the final {} rounds.",
            schedule.forced_early_repeats, repeat_tail,
        );
    }

    if args.verbose {
        eprintln!(
            "Built {} round(s) with seed {}",
            schedule.rounds_actual(),
            schedule.seed,
        );
    }

    if args.json {
        println!(
            "{}",
            output::render_schedule_json(&pairs, &schedule, start, round_minutes)
        );
    } else {
        print!(
            "{}",
            output::render_schedule_text(&pairs, &schedule, start, round_minutes)
        );
    }
}

fn run_standings(args: StandingsArgs) {
    let teams = match args.teams {
        Some(ref path) => {
            let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
                bail(format!("Failed to read teams file {}: {e}", path.display()))
            });
            parse::parse_team_list(&content)
        }
        None => BTreeMap::new(),
    };

    let content = match args.results {
        Some(ref path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            bail(format!("Failed to read results file {}: {e}", path.display()))
        }),
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                bail("No results provided. Use --results <file> or pipe a transcript via stdin.");
            }
            stdin
                .lock()
                .lines()
                .map(|l| l.expect("Failed to read from stdin"))
                .collect::<Vec<_>>()
                .join("\n")
        }
    };

    let parsed = parse::parse_results(&content);
    // Any problem line blocks the whole computation: half-counted standings
    // are worse than none.
    if !parsed.errors.is_empty() {
        for problem in &parsed.errors {
            eprintln!("{problem}");
        }
        bail(format!(
            "{} problem line(s) in the results transcript",
            parsed.errors.len()
        ));
    }
    if parsed.scores.is_empty() {
        bail("No match results recognized. Lines must read like \"1 21-15 2\".");
    }

    let (stats, h2h) = compute_stats(&parsed.scores);
    let wins = rank_teams(&stats, &h2h, RankingMode::Wins);
    let points = rank_teams(&stats, &h2h, RankingMode::Points);

    if args.json {
        println!(
            "{}",
            output::render_standings_json(&stats, &wins, &points, &teams)
        );
    } else if args.share {
        print!("{}", output::render_share_text(&wins, &points, &teams));
    } else {
        print!("{}", output::render_stats_table(&stats, &teams));
        println!();
        print!(
            "{}",
            output::render_ranking_table(&wins, &teams, RankingMode::Wins)
        );
        println!();
        print!(
            "{}",
            output::render_ranking_table(&points, &teams, RankingMode::Points)
        );
    }

    if let Some(ref dir) = args.export_csv {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| bail(format!("Failed to create {}: {e}", dir.display())));
        let files = [
            ("stats.csv", output::stats_csv(&stats, &teams)),
            ("ranking_wins.csv", output::ranking_csv(&wins, &teams)),
            ("ranking_points.csv", output::ranking_csv(&points, &teams)),
        ];
        for (file, content) in files {
            let path = dir.join(file);
            std::fs::write(&path, content)
                .unwrap_or_else(|e| bail(format!("Failed to write {}: {e}", path.display())));
            println!("Wrote {}", path.display());
        }
    }
}

fn run_demo(args: DemoArgs) {
    if args.pairs < 2 || args.pairs > demo::MAX_DEMO_PAIRS {
        bail(format!(
            "--pairs must be between 2 and {}, got {}",
            demo::MAX_DEMO_PAIRS,
            args.pairs
        ));
    }
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = SmallRng::seed_from_u64(seed);
    println!("{}", demo::demo_pair_list(args.pairs, &mut rng));
}
