//! Skywriter asset database builder
//!
//! Turns raw amiibo NFC dumps into the per-series JSON records bundled with
//! the Skywriter Android app.

mod batch;
mod config;
mod convert;
mod enrich;
mod fetch;
mod organize;
mod pipeline;
mod prompt;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_ASSETS_DIR, DEFAULT_CLONE_TIMEOUT_SECS, PipelineConfig};
use crate::prompt::Prompter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "skywriter-db")]
#[command(about = "Build the Skywriter amiibo asset database from NFC dumps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Profile database (JSON)
    #[arg(long, global = true, env = "SKYWRITER_PROFILES")]
    profiles: Option<PathBuf>,

    /// Series table overriding the built-in one (JSON)
    #[arg(long, global = true, env = "SKYWRITER_SERIES_TABLE")]
    series_table: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone dump repositories and collect unique .bin/.nfc files
    Fetch {
        /// Directory receiving the dumps
        output_dir: PathBuf,
        /// Repository URL (repeatable; defaults to the known dump repositories)
        #[arg(long = "repo")]
        repos: Vec<String>,
        /// Seconds allowed per clone
        #[arg(long, env = "SKYWRITER_CLONE_TIMEOUT", default_value_t = DEFAULT_CLONE_TIMEOUT_SECS)]
        timeout: u64,
    },
    /// Convert 540-byte dumps into JSON records
    Convert {
        input_dir: PathBuf,
        output_dir: PathBuf,
    },
    /// Fill record metadata from the profile database
    Enrich {
        #[arg(env = "SKYWRITER_ASSETS_DIR", default_value = DEFAULT_ASSETS_DIR)]
        json_dir: PathBuf,
        /// Prompt for profiles the database does not know
        #[arg(short, long)]
        interactive: bool,
    },
    /// Move records into one directory per game series
    Organize {
        #[arg(env = "SKYWRITER_ASSETS_DIR", default_value = DEFAULT_ASSETS_DIR)]
        json_dir: PathBuf,
    },
    /// Fetch, convert, enrich and organize in one go
    Compile {
        #[arg(long, env = "SKYWRITER_ASSETS_DIR", default_value = DEFAULT_ASSETS_DIR)]
        assets_dir: PathBuf,
        /// Existing dumps to include; the directory is only read
        #[arg(long, env = "SKYWRITER_DUMPS_DIR")]
        dumps_dir: Option<PathBuf>,
        #[arg(long = "repo")]
        repos: Vec<String>,
        #[arg(long, env = "SKYWRITER_CLONE_TIMEOUT", default_value_t = DEFAULT_CLONE_TIMEOUT_SECS)]
        timeout: u64,
        /// Prompt for profiles the database does not know
        #[arg(short, long)]
        interactive: bool,
    },
    /// Classify labels read from stdin, one JSON line per label
    Classify,
    /// Merge an AmiiboAPI response into the profile database
    ImportProfiles {
        /// Saved response of https://www.amiiboapi.com/api/amiibo/
        file: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct ClassifyOutput<'a> {
    input: &'a str,
    series: &'a str,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = PipelineConfig::new().with_series_table(cli.series_table);
    if let Some(path) = cli.profiles {
        config = config.with_profiles_path(path);
    }

    match cli.command {
        Commands::Fetch {
            output_dir,
            repos,
            timeout,
        } => {
            let config = config.with_repos(repos).with_clone_timeout(timeout);
            let report = fetch::fetch(&output_dir, &config.repos, config.clone_timeout)?;
            if report.processed == 0 {
                warn!(dir = %output_dir.display(), "no amiibo dumps were downloaded");
            }
        }
        Commands::Convert {
            input_dir,
            output_dir,
        } => {
            convert::convert_dir(&input_dir, &output_dir)?;
        }
        Commands::Enrich {
            json_dir,
            interactive,
        } => {
            let config = config.with_assets_dir(json_dir);
            pipeline::enrich_assets(&config, operator_prompt(interactive))?;
        }
        Commands::Organize { json_dir } => {
            let classifier = config.classifier()?;
            organize::organize_dir(&json_dir, &classifier)?;
        }
        Commands::Compile {
            assets_dir,
            dumps_dir,
            repos,
            timeout,
            interactive,
        } => {
            let config = config
                .with_assets_dir(assets_dir)
                .with_dumps_dir(dumps_dir)
                .with_repos(repos)
                .with_clone_timeout(timeout)
                .with_interactive(interactive);
            pipeline::compile(&config, operator_prompt(config.interactive))?;
        }
        Commands::Classify => {
            let classifier = config.classifier()?;
            for line in io::stdin().lock().lines() {
                let line = line?;
                let label = line.trim();
                if label.is_empty() {
                    continue;
                }
                let output = ClassifyOutput {
                    input: label,
                    series: classifier.classify(label),
                };
                println!("{}", serde_json::to_string(&output)?);
            }
        }
        Commands::ImportProfiles { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let imported = skywriter_profiles::import_amiibo_api(&json)?;

            let mut db = config.load_profiles()?;
            let count = db.merge(imported);
            db.save(&config.profiles_path)?;
            info!(count, path = %config.profiles_path.display(), "imported profiles");
        }
    }

    Ok(())
}

/// Operator prompt on the terminal, if requested.
fn operator_prompt(interactive: bool) -> Option<Prompter<io::StdinLock<'static>, io::Stdout>> {
    interactive.then(|| Prompter::new(io::stdin().lock(), io::stdout()))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_fetch_with_repos() {
        let cli = Cli::try_parse_from([
            "skywriter-db",
            "fetch",
            "dumps",
            "--repo",
            "https://example.invalid/a.git",
            "--repo",
            "https://example.invalid/b.git",
            "--timeout",
            "30",
        ])
        .unwrap();

        match cli.command {
            Commands::Fetch {
                output_dir,
                repos,
                timeout,
            } => {
                assert_eq!(output_dir, PathBuf::from("dumps"));
                assert_eq!(repos.len(), 2);
                assert_eq!(timeout, 30);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "skywriter-db",
            "organize",
            "assets",
            "--series-table",
            "series.json",
        ])
        .unwrap();
        assert_eq!(cli.series_table, Some(PathBuf::from("series.json")));
        assert!(matches!(cli.command, Commands::Organize { .. }));
    }

    #[test]
    fn compile_dumps_dir_is_optional() {
        let cli = Cli::try_parse_from(["skywriter-db", "compile"]).unwrap();
        match cli.command {
            Commands::Compile { dumps_dir, .. } => assert!(dumps_dir.is_none()),
            _ => panic!("expected compile"),
        }

        let cli =
            Cli::try_parse_from(["skywriter-db", "compile", "--dumps-dir", "my_dumps"]).unwrap();
        match cli.command {
            Commands::Compile { dumps_dir, .. } => {
                assert_eq!(dumps_dir, Some(PathBuf::from("my_dumps")));
            }
            _ => panic!("expected compile"),
        }
    }

    #[test]
    fn classify_output_shape() {
        let output = ClassifyOutput {
            input: "Qbby",
            series: "BoxBoy!",
        };
        assert_eq!(
            serde_json::to_string(&output).unwrap(),
            r#"{"input":"Qbby","series":"BoxBoy!"}"#
        );
    }
}
