use clap::Parser;
use tagger::application::{ClearOptions, FindOptions, MergeEngine, QueryEngine, TagService};
use tagger::cli::{format_lines, format_merge_report, format_paths, Cli, Commands};
use tagger::domain::TagSet;
use tagger::error::TaggerError;
use tagger::infrastructure::{Config, SidecarStore};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "TAGGER_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match Config::from_env() {
        Ok(config) => run(cli.command, &config),
        Err(e) => Err(("load config", e)),
    };

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err((verb, e)) => {
            eprintln!("[-] Failed to {}: {}", verb, e.display_with_suggestions());
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Runs one command. `Ok(false)` reports a partial failure.
fn run(command: Commands, config: &Config) -> Result<bool, (&'static str, TaggerError)> {
    let store = SidecarStore::from_config(config);

    match command {
        Commands::Add { path, tags } => {
            TagService::new(&store)
                .add(&path, &TagSet::from_iter(tags))
                .map_err(|e| ("add tags", e))?;
            Ok(true)
        }
        Commands::Rm { path, tags } => {
            TagService::new(&store)
                .remove(&path, &TagSet::from_iter(tags))
                .map_err(|e| ("remove tags", e))?;
            Ok(true)
        }
        Commands::Get { path } => {
            let tags = TagService::new(&store).get(&path);
            print_nonempty(&format_lines(&tags));
            Ok(true)
        }
        Commands::Find { path, tags, walk } => {
            let options = FindOptions {
                top_only: walk.top_only,
                max_depth: walk.depth.or(config.default_depth),
            };
            let found = QueryEngine::new(&store).find(&path, &TagSet::from_iter(tags), options);
            print_nonempty(&format_paths(&found));
            Ok(true)
        }
        Commands::Clear {
            path,
            recursive,
            walk,
        } => {
            let options = ClearOptions {
                recursive,
                top_only: walk.top_only,
                max_depth: walk.depth.or(config.default_depth),
            };
            QueryEngine::new(&store)
                .clear(&path, options)
                .map_err(|e| ("clear tags", e))?;
            Ok(true)
        }
        Commands::Merge { path, dest, tags } => {
            let report = MergeEngine::new(&store)
                .merge(&path, &dest, &TagSet::from_iter(tags))
                .map_err(|e| ("merge", e))?;
            println!("{}", format_merge_report(&report));
            Ok(report.is_complete())
        }
        Commands::Sync { path, recursive } => {
            let removed = TagService::new(&store)
                .sync(&path, recursive)
                .map_err(|e| ("sync tags", e))?;
            tracing::info!("Removed {} dangling entries", removed);
            Ok(true)
        }
    }
}

fn print_nonempty(output: &str) {
    if !output.is_empty() {
        println!("{}", output);
    }
}
