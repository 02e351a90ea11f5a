use anyhow::Result;
use clap::{Parser, Subcommand};
use sidekick::commands::{
    cleanup, detect, patterns, print_error_json, search, suggest, track, track::TrackArgs, watch,
    watch::WatchArgs, CommandContext,
};
use sidekick::logging;
use sidekick::validation::{clap_confidence_validator, clap_id_validator};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sidekick")]
#[command(about = "Detect terminal prompts and suggest responses", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to sidekick.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect a prompt at the end of a log file
    Detect {
        file: PathBuf,

        /// Minimum confidence (0.0-1.0)
        #[arg(long, value_parser = clap_confidence_validator)]
        min_confidence: Option<f64>,

        /// Lines of context around the prompt (0-10)
        #[arg(long)]
        context_lines: Option<usize>,
    },

    /// Suggest inputs for a prompt
    Suggest {
        prompt: String,

        /// password, yes_no, choice, path, command, text or unknown
        #[arg(short = 't', long = "type")]
        prompt_type: String,

        /// Working directory to use as context
        #[arg(long)]
        cwd: Option<String>,
    },

    /// Record the response given to a prompt
    Track {
        #[arg(value_parser = clap_id_validator)]
        session_id: String,
        prompt: String,
        input: String,

        /// The input was rejected
        #[arg(long)]
        failed: bool,

        /// user_typed, ai_suggested or auto_injected
        #[arg(long, default_value = "user_typed")]
        source: String,

        #[arg(long, default_value_t = 0)]
        response_time_ms: u64,
    },

    /// List learned patterns
    Patterns {
        /// Case-insensitive substring of the prompt text
        #[arg(long)]
        filter: Option<String>,

        #[arg(long, default_value_t = 1)]
        min_occurrences: u64,

        /// occurrences, last_seen or success_rate
        #[arg(long, default_value = "occurrences")]
        sort_by: String,
    },

    /// Regex search across log files
    Search {
        query: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, default_value_t = 3)]
        context_lines: usize,

        #[arg(long, default_value_t = 10)]
        max_results: usize,
    },

    /// Delete stored files older than the retention period
    Cleanup {
        /// Defaults to the configured retention (1-365)
        #[arg(long)]
        retention_days: Option<u32>,

        /// Only report what would be deleted
        #[arg(long)]
        dry_run: bool,
    },

    /// Follow a log file and report prompts as they appear
    Watch {
        file: PathBuf,

        #[arg(long, value_parser = clap_id_validator)]
        session_id: Option<String>,

        #[arg(long, value_parser = clap_confidence_validator)]
        min_confidence: Option<f64>,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,

        /// Poll once and exit
        #[arg(long)]
        once: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let json = cli.json;

    let result = run(cli);
    if json {
        if let Err(e) = &result {
            print_error_json(e)?;
            std::process::exit(1);
        }
    }
    result
}

fn run(cli: Cli) -> Result<()> {
    let ctx = CommandContext::load(cli.config, cli.json)?;
    logging::init(&ctx.config.log_level);

    match cli.command {
        Commands::Detect {
            file,
            min_confidence,
            context_lines,
        } => detect::execute(&ctx, file, min_confidence, context_lines),
        Commands::Suggest {
            prompt,
            prompt_type,
            cwd,
        } => suggest::execute(&ctx, prompt, prompt_type, cwd),
        Commands::Track {
            session_id,
            prompt,
            input,
            failed,
            source,
            response_time_ms,
        } => track::execute(
            &ctx,
            TrackArgs {
                session_id,
                prompt,
                input,
                failed,
                source,
                response_time_ms,
            },
        ),
        Commands::Patterns {
            filter,
            min_occurrences,
            sort_by,
        } => patterns::execute(&ctx, filter, min_occurrences, sort_by),
        Commands::Search {
            query,
            files,
            context_lines,
            max_results,
        } => search::execute(&ctx, query, files, context_lines, max_results),
        Commands::Cleanup {
            retention_days,
            dry_run,
        } => cleanup::execute(&ctx, retention_days, dry_run),
        Commands::Watch {
            file,
            session_id,
            min_confidence,
            interval_ms,
            once,
        } => watch::execute(
            &ctx,
            WatchArgs {
                file,
                session_id,
                min_confidence,
                interval_ms,
                once,
            },
        ),
    }
}
