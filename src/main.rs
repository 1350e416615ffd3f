mod cli;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputFormat};
use jp_scanner::config::{self, Settings};
use jp_scanner::infra::source;
use jp_scanner::{index_collisions, EpisodeSource, ParsedEpisode, PatternMatcher};

fn main() {
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("Using default settings: {e}");
        Settings::default()
    });

    let matcher = build_matcher(&cli, &settings);
    let extensions = cli
        .extensions
        .clone()
        .unwrap_or_else(|| settings.extensions.clone());

    let mut files = Vec::new();
    for input_path in &cli.inputs {
        if input_path.is_file() {
            files.push(input_path.clone());
        } else if input_path.is_dir() {
            match source::collect_video_files(input_path, cli.recursive, &extensions) {
                Ok(found) => files.extend(found),
                Err(e) => error!("Error processing path {input_path:?}: {e}"),
            }
        } else {
            error!("Input path does not exist: {input_path:?}");
        }
    }

    info!("Found {} file(s) to parse", files.len());

    let mut matched: Vec<(PathBuf, ParsedEpisode)> = Vec::new();
    let mut unmatched = 0usize;
    for file_path in &files {
        match parse_file(&matcher, file_path) {
            Ok(Some(episode)) => {
                print_episode(file_path, &episode, cli.format)?;
                matched.push((file_path.clone(), episode));
            }
            Ok(None) => {
                warn!("No pattern matched {file_path:?}");
                unmatched += 1;
            }
            Err(e) => {
                // Continue with the remaining files
                error!("Error parsing {file_path:?}: {e:#}");
                unmatched += 1;
            }
        }
    }

    if cli.collisions {
        report_collisions(&matched);
    }

    info!(
        "Total files parsed: {}, matched: {}, unmatched: {}",
        files.len(),
        matched.len(),
        unmatched
    );

    Ok(())
}

fn build_matcher(cli: &Cli, settings: &Settings) -> PatternMatcher {
    let custom = match config::get_patterns_path(cli.patterns.as_deref(), settings) {
        Some(path) => config::load_custom_patterns(&path).unwrap_or_else(|e| {
            // Built-in date matching must keep working without custom patterns.
            warn!("Ignoring custom patterns: {e}");
            Vec::new()
        }),
        None => Vec::new(),
    };
    info!("Loaded {} custom pattern(s)", custom.len());

    let mut matcher = PatternMatcher::new(custom);
    if cli.standard_patterns || settings.standard_patterns {
        matcher = matcher.with_standard_patterns();
    }
    info!("Matching against {} pattern(s)", matcher.pattern_count());
    matcher
}

fn parse_file(matcher: &PatternMatcher, file_path: &Path) -> Result<Option<ParsedEpisode>> {
    let modified_at = source::modified_at(file_path)?;
    let show_dir = source::show_dir_name(file_path);
    let episode_source =
        EpisodeSource::new(file_path, modified_at).with_show_dir(show_dir.as_deref());

    Ok(matcher.parse(&episode_source)?)
}

fn print_episode(file_path: &Path, episode: &ParsedEpisode, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(episode)?;
            value["path"] = serde_json::Value::from(file_path.to_string_lossy().into_owned());
            println!("{value}");
        }
        OutputFormat::Text => {
            let episode_title = episode
                .episode_title
                .as_deref()
                .map(|t| format!(" - {t}"))
                .unwrap_or_default();
            println!(
                "{}: {} - {} - E{}{}",
                file_path.display(),
                episode.title,
                episode.season_label,
                episode.episode_index,
                episode_title
            );
        }
    }
    Ok(())
}

fn report_collisions(matched: &[(PathBuf, ParsedEpisode)]) {
    let collisions = index_collisions(matched);
    if collisions.is_empty() {
        info!("No episode index collisions");
        return;
    }

    for group in collisions {
        warn!("Files with the same episode index ({}):", group.len());
        for path in group {
            warn!("  {}", path.display());
        }
    }
}
