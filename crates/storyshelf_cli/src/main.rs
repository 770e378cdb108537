//! `storyshelf` terminal entry point.
//!
//! Resolves configuration (flags over `STORYSHELF_*` variables), starts
//! logging, loads the story document once and hands stdin/stdout to the
//! shell.

use clap::Parser;
use log::{error, info};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use storyshelf_cli::Shell;
use storyshelf_core::config::{
    ENV_EXPORT_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_STORIES_PATH, ENV_TAG_SCOPE,
};
use storyshelf_core::{
    core_version, init_logging, load_document, log_shelf_config, ShelfApp, ShelfConfig,
};

#[derive(Debug, Parser)]
#[command(name = "storyshelf", version, about = "Browse, filter and edit a personal story collection")]
struct Args {
    /// Story document to load at startup.
    #[arg(long)]
    stories: Option<PathBuf>,
    /// Default target of the `export` command.
    #[arg(long)]
    export: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// collection|visible
    #[arg(long)]
    tag_scope: Option<String>,
}

impl Args {
    fn lookup(&self, key: &str) -> Option<String> {
        let path_value = |path: &Option<PathBuf>| path.as_ref().map(|p| p.display().to_string());
        let flag = match key {
            ENV_STORIES_PATH => path_value(&self.stories),
            ENV_EXPORT_PATH => path_value(&self.export),
            ENV_LOG_LEVEL => self.log_level.clone(),
            ENV_LOG_DIR => path_value(&self.log_dir),
            ENV_TAG_SCOPE => self.tag_scope.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match ShelfConfig::from_lookup(|key| args.lookup(key)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("storyshelf: {err}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("storyshelf: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );
    log_shelf_config(&config);

    let document = load_document(&config.stories_path);
    let app = match ShelfApp::from_document(document, config.tag_scope) {
        Ok(app) => app,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("storyshelf: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut shell = Shell::new(app, stdin.lock(), io::stdout().lock(), config.export_path);
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_io module=cli status=error error={err}");
            eprintln!("storyshelf: {err}");
            ExitCode::FAILURE
        }
    }
}
