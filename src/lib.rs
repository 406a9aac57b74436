//! # gitea-token-rewrite
//!
//! A CLI tool to rewrite the credentials embedded in the origin URLs of the
//! bare repositories a Gitea instance keeps on disk.
//!
//! This crate provides functionality to:
//! - Walk a `<root>/<owner>/<repo>.git` tree and read every origin URL
//! - Replace the password/token part of those URLs
//! - Pick the new token from regex rules over `owner/repo` ids, or ask for
//!   one per distinct token currently in use
//!
//! ## Usage
//!
//! ```bash
//! # List repositories and their current origin URLs
//! gitea-token-rewrite -d /home/git/data/gitea-repositories preview
//!
//! # Apply the rules from a config file, asking before each write
//! gitea-token-rewrite auto-replace -c rules.json --confirm
//!
//! # Replace tokens group by group
//! gitea-token-rewrite token-replace
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface and main entry point
//! - [`locator`] - Repository discovery
//! - [`remote`] - Reading and writing origin URLs
//! - [`git`] - Git command wrappers
//! - [`credential`] - URL credential rewriting
//! - [`rules`] - Replacement rules and config file loading
//! - [`modes`] - Preview, auto-replace and token-replace
//! - [`prompt`] - User input abstractions
//! - [`banner`] - Run summary banner
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod credential;
pub mod error;
pub mod git;
pub mod locator;
pub mod modes;
pub mod prompt;
pub mod remote;
pub mod rules;
