use anyhow::Context;
use clap::{Args, ColorChoice, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use listsense::config::SearchConfig;
use listsense::host::scripted::{ScriptedHost, ViewportScript};
use listsense::matcher;
use listsense::merge::{MergeTolerance, merge_text_blocks};
use listsense::search::PaginatedSearchController;
use listsense::target::TargetSpec;
use listsense::RawDetection;
use serde::Deserialize;
use serde_json::json;
use std::io::{IsTerminal, stdout};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "listsense",
    about = "Target acquisition in scrollable OCR-rendered lists",
    arg_required_else_help = true
)]
struct Cli {
    /// Disable color
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    /// Log engine activity to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge raw OCR detections into logical entries
    Merge(MergeArgs),
    /// Score a candidate entry text against an expected name
    Match(MatchArgs),
    /// Drive the full search loop against a scripted viewport
    Run(RunArgs),
}

#[derive(Args, Clone)]
struct MergeArgs {
    /// JSON file holding an array of raw detections
    detections: PathBuf,

    /// Minimum recognizer score for a detection to survive
    #[arg(long)]
    threshold: Option<f32>,

    /// Horizontal merge tolerance in pixels
    #[arg(long)]
    x_tolerance: Option<i32>,

    /// Vertical merge tolerance in pixels
    #[arg(long)]
    y_tolerance: Option<i32>,

    /// Output JSON instead of the human listing
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct MatchArgs {
    /// Detected entry text
    candidate: String,

    /// Expected target name
    expected: String,

    /// Similarity limit (inclusive)
    #[arg(long)]
    limit: Option<f64>,

    /// Output JSON instead of the human verdict
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct RunArgs {
    /// JSON file holding targets and a scripted viewport
    script: PathBuf,

    /// Engine config TOML (defaults to the user config file)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output a JSON summary instead of the human one
    #[arg(long)]
    json: bool,
}

/// Shape of the `run` subcommand's script file.
#[derive(Deserialize)]
struct RunScript {
    targets: Vec<TargetSpec>,
    viewport: ViewportScript,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "listsense=debug" } else { "listsense=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn detect_color_choice() -> ColorChoice {
    // Scan args before clap so help/errors honor `--no-color`.
    // Mirror clap's parsing by stopping at `--` which terminates flags.
    let mut args = std::env::args_os();
    // Skip binary name
    args.next();
    let mut flag = false;
    for arg in args {
        if arg == "--" {
            break;
        }
        if arg == "--no-color" {
            flag = true;
            break;
        }
    }
    if flag || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn verdict(matched: bool, color: bool) -> String {
    let word = if matched { "match" } else { "no match" };
    if !color {
        return word.to_string();
    }
    if matched {
        word.green().to_string()
    } else {
        word.red().to_string()
    }
}

fn run_merge(args: MergeArgs, color: bool) -> Result<(), i32> {
    let defaults = SearchConfig::default();
    let tolerance = MergeTolerance {
        x: args.x_tolerance.unwrap_or(defaults.merge.x),
        y: args.y_tolerance.unwrap_or(defaults.merge.y),
    };
    let threshold = args.threshold.unwrap_or(defaults.score_threshold);

    let detections: Vec<RawDetection> = match read_json(&args.detections) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{:#}", e);
            return Err(2);
        }
    };

    let entries = merge_text_blocks(&detections, threshold, &tolerance);

    if args.json {
        match serde_json::to_string_pretty(&entries) {
            Ok(s) => println!("{}", s),
            Err(_) => return Err(3),
        }
        return Ok(());
    }

    let heading = format!("{} entries:", entries.len());
    if color {
        println!("{}", heading.bold().cyan());
    } else {
        println!("{}", heading);
    }
    for entry in &entries {
        println!("  {} @ ({}, {})", entry.text, entry.click_x, entry.click_y);
    }
    Ok(())
}

fn run_match(args: MatchArgs, color: bool) -> Result<(), i32> {
    let limit = args.limit.unwrap_or(SearchConfig::default().similarity_limit);
    let candidate = matcher::normalize(&args.candidate);
    let expected = matcher::normalize(&args.expected);
    let similarity = matcher::similarity(&candidate, &expected);
    let matched = similarity >= limit;

    if args.json {
        let v = json!({
            "candidate": args.candidate,
            "expected": args.expected,
            "normalized_candidate": candidate,
            "normalized_expected": expected,
            "similarity": similarity,
            "limit": limit,
            "matched": matched,
        });
        match serde_json::to_string_pretty(&v) {
            Ok(s) => println!("{}", s),
            Err(_) => return Err(3),
        }
    } else {
        println!(
            "'{}' vs '{}': similarity {:.3} (limit {:.2}) -> {}",
            candidate,
            expected,
            similarity,
            limit,
            verdict(matched, color)
        );
    }

    if matched { Ok(()) } else { Err(1) }
}

fn run_script(args: RunArgs, color: bool) -> Result<(), i32> {
    let config = match &args.config {
        Some(path) => match SearchConfig::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to read config: {}", e);
                return Err(2);
            }
        },
        None => SearchConfig::load(),
    };

    let script: RunScript = match read_json(&args.script) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{:#}", e);
            return Err(2);
        }
    };

    let controller = PaginatedSearchController::new(config.clone());
    let mut host = ScriptedHost::new(script.viewport, config.keys.clone());
    let completed = controller.run(&mut host, &script.targets);

    if args.json {
        let v = json!({
            "completed": completed,
            "clicks": host.clicks,
            "scroll_downs": host.scroll_downs,
            "scroll_ups": host.scroll_ups,
            "captures": host.captures,
            "tasks": host.tasks.iter().map(|t| &t.name).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&v) {
            Ok(s) => println!("{}", s),
            Err(_) => return Err(3),
        }
    } else {
        let status = if completed { "completed" } else { "cancelled" };
        let heading = format!("Batch {}:", status);
        if color {
            println!("{}", heading.bold().cyan());
        } else {
            println!("{}", heading);
        }
        println!("  clicks: {:?}", host.clicks);
        println!("  scrolls: {} down, {} up", host.scroll_downs, host.scroll_ups);
        println!("  captures: {}", host.captures);
        for task in &host.tasks {
            println!("  task: {}", task.name);
        }
    }

    if completed { Ok(()) } else { Err(1) }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() {
    let color = detect_color_choice();
    let matches = Cli::command().color(color).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_tracing(cli.verbose);

    let want_color = stdout().is_terminal() && !matches!(color, ColorChoice::Never);
    let result = match cli.command {
        Some(Commands::Merge(args)) => run_merge(args, want_color),
        Some(Commands::Match(args)) => run_match(args, want_color),
        Some(Commands::Run(args)) => run_script(args, want_color),
        None => Ok(()),
    };
    if let Err(code) = result {
        std::process::exit(code);
    }
}
