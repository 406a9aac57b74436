use crate::banner::{RunSummary, print_banner};
use crate::locator::{Repositories, locate};
use crate::remote::{ConfigFileStore, GitCommandStore, RemoteStore};
use crate::error::ConfigError;
use crate::rules::Config;
use crate::{git, modes, prompt};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Where Gitea keeps its repositories in a default installation.
pub const DEFAULT_REPOSITORIES_DIR: &str = "/home/git/data/gitea-repositories";

/// Rewrite the credentials embedded in the origin URLs of Gitea mirror repositories.
#[derive(Parser, Debug)]
#[command(name = "gitea-token-rewrite", version)]
pub struct Cli {
    /// Root directory laid out as <owner>/<repo>.git
    /// [default: gitea_repositories_dir from the config file, else /home/git/data/gitea-repositories]
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// JSON config file with replacement rules
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// How origin URLs are read and written
    #[arg(long, value_enum, global = true, default_value_t = Backend::Direct)]
    pub backend: Backend,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every repository with its current origin URL
    Preview {
        /// Also list remote-tracking branches (requires git)
        #[arg(long)]
        branches: bool,
    },

    /// Give repositories the token of the first rule matching their id
    AutoReplace {
        /// Show each rewrite and ask before writing it
        #[arg(long)]
        confirm: bool,

        /// Print planned rewrites without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Group repositories by current token and ask for a replacement per group
    TokenReplace {
        /// Print planned rewrites without writing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Strategy for accessing a repository's origin URL.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Edit <repo>/config directly
    Direct,
    /// Run `git config` / `git remote set-url`
    Git,
}

impl Backend {
    fn name(self) -> &'static str {
        match self {
            Backend::Direct => "direct",
            Backend::Git => "git",
        }
    }
}

/// Installs the `tracing` subscriber that writes diagnostics to stderr.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn print_error(message: impl std::fmt::Display) {
    eprintln!("{}", style(format!("Error: {}", message)).red().bold());
}

/// Loads the config file if one was given. Any problem with it is fatal.
fn load_config(path: Option<&Path>) -> Result<Option<Config>, ()> {
    match path {
        Some(p) => match Config::load(p) {
            Ok(c) => Ok(Some(c)),
            Err(e) => {
                print_error(e);
                Err(())
            }
        },
        None => Ok(None),
    }
}

/// Picks the repositories root: flag, then config file, then the default.
pub(crate) fn resolve_root(flag: Option<&Path>, config: Option<&Config>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.and_then(|c| c.repositories_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPOSITORIES_DIR))
}

/// Verifies that `git` is available when something needs it.
fn require_git(reason: &str) -> Result<(), ()> {
    if git::is_available() {
        Ok(())
    } else {
        print_error(format!("`git` not found in PATH ({})", reason));
        Err(())
    }
}

fn start_walk<'s, S: RemoteStore + ?Sized>(
    root: &Path,
    store: &'s S,
) -> Result<Repositories<'s, S>, ()> {
    locate(root, store).map_err(|e| print_error(e))
}

/// Main CLI entry point for `gitea-token-rewrite`.
///
/// This function:
/// 1. Parses arguments; `--help`/`--version` exit `0`, usage errors exit `2`.
/// 2. Loads and compiles the config file, aborting on any error before a
///    repository is touched.
/// 3. Resolves the repositories root and the URL backend.
/// 4. Runs the selected mode and prints a summary.
///
/// # Exit Codes
///
/// * `0` – Every attempted write succeeded (or nothing needed writing).
/// * `1` – A write failed, or the run could not start.
/// * `2` – Invalid command line.
pub fn entry() -> Result<i32, ()> {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            let _ = e.print();
            return Ok(e.exit_code());
        }
    };

    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let root = resolve_root(cli.dir.as_deref(), config.as_ref());

    if cli.backend == Backend::Git {
        require_git("--backend git")?;
    }
    let store: Box<dyn RemoteStore> = match cli.backend {
        Backend::Direct => Box::new(ConfigFileStore),
        Backend::Git => Box::new(GitCommandStore),
    };

    match cli.command {
        Command::Preview { branches } => {
            let lister: Option<&dyn Fn(&Path) -> Result<Vec<String>, String>> = if branches {
                require_git("--branches")?;
                Some(&git::remote_branches)
            } else {
                None
            };
            let records = start_walk(&root, store.as_ref())?;
            modes::preview(records, lister);
            Ok(0)
        }

        Command::AutoReplace { confirm, dry_run } => {
            let rules = match config {
                Some(c) if !c.rules.is_empty() => c.rules,
                _ => {
                    print_error(ConfigError::NoRules);
                    eprintln!("Pass a config file with --config.");
                    return Err(());
                }
            };

            print_banner(&RunSummary {
                mode: "auto-replace",
                root: &root,
                backend: cli.backend.name(),
                rules: Some(rules.len()),
                confirm,
                dry_run,
            });

            let records = start_walk(&root, store.as_ref())?;
            let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
            let prompter = if confirm { Some(&mut confirm_prompter) } else { None };
            let report = modes::auto_replace(records, &rules, store.as_ref(), prompter, dry_run);
            report.print_summary();
            Ok(if report.has_failures() { 1 } else { 0 })
        }

        Command::TokenReplace { dry_run } => {
            print_banner(&RunSummary {
                mode: "token-replace",
                root: &root,
                backend: cli.backend.name(),
                rules: None,
                confirm: true,
                dry_run,
            });

            let records = start_walk(&root, store.as_ref())?;
            let mut string_prompter = prompt::DialoguerStringPrompter;
            let report = modes::token_replace(records, store.as_ref(), &mut string_prompter, dry_run);
            report.print_summary();
            Ok(if report.has_failures() { 1 } else { 0 })
        }
    }
}
