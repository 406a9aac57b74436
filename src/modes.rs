//! The three ways of running the tool: preview, auto-replace and
//! token-replace.
//!
//! Each mode first decides what would change ([`plan_auto_replace`],
//! [`group_by_token`], [`plan_token_replace`]) and only then writes through
//! [`apply`], which asks a caller-supplied predicate before every write.
//!
//! Writes are independent per repository. A failure leaves earlier writes in
//! place; there is no rollback.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use console::style;
use tracing::{debug, info};

use crate::credential::{self, embedded_token, rewrite_token};
use crate::error::{CredentialError, RemoteError};
use crate::locator::RepositoryRecord;
use crate::prompt::{self, ConfirmPrompter, StringPrompter};
use crate::remote::RemoteStore;
use crate::rules::RuleSet;

/// A rewrite that has been decided but not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub record: RepositoryRecord,
    pub new_url: String,
}

/// Why a repository selected for rewriting was left alone.
#[derive(Debug)]
pub enum SkipReason {
    /// The URL has no username to attach a token to.
    NoUsername,
    /// The URL already carries the wanted token.
    Unchanged,
    /// The URL could not be rewritten.
    Credential(CredentialError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoUsername => write!(f, "remote url has no username"),
            SkipReason::Unchanged => write!(f, "already uses this token"),
            SkipReason::Credential(e) => write!(f, "{}", e),
        }
    }
}

/// Changes to make, plus the selected repositories that need none.
#[derive(Debug, Default)]
pub struct Plan {
    pub changes: Vec<PlannedChange>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl Plan {
    fn push(&mut self, record: RepositoryRecord, token: &str) {
        match rewrite_token(&record.remote_url, token) {
            Ok(Some(new_url)) if new_url == record.remote_url => {
                self.skipped.push((record.id, SkipReason::Unchanged))
            }
            Ok(Some(new_url)) => self.changes.push(PlannedChange { record, new_url }),
            Ok(None) => self.skipped.push((record.id, SkipReason::NoUsername)),
            Err(e) => self.skipped.push((record.id, SkipReason::Credential(e))),
        }
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct Report {
    pub applied: Vec<String>,
    pub declined: Vec<String>,
    pub failed: Vec<(String, RemoteError)>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl Report {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn merge(&mut self, other: Report) {
        self.applied.extend(other.applied);
        self.declined.extend(other.declined);
        self.failed.extend(other.failed);
        self.skipped.extend(other.skipped);
    }

    /// Prints the one-line summary shown at the end of a run.
    pub fn print_summary(&self) {
        let line = format!(
            "{} updated, {} declined, {} skipped, {} failed",
            self.applied.len(),
            self.declined.len(),
            self.skipped.len(),
            self.failed.len()
        );
        if self.has_failures() {
            eprintln!("{}", style(line).red().bold());
        } else {
            println!("{}", style(line).green().bold());
        }
    }
}

/// Repositories keyed by the token embedded in their URL, ordered by token.
pub type TokenGroups = BTreeMap<String, Vec<RepositoryRecord>>;

/// Selects the repositories matched by `rules` and computes their new URLs.
///
/// Repositories that match no rule do not appear in the plan at all.
pub fn plan_auto_replace<I>(records: I, rules: &RuleSet) -> Plan
where
    I: IntoIterator<Item = RepositoryRecord>,
{
    let mut plan = Plan::default();
    for record in records {
        match rules.match_token(&record.id) {
            Some(token) => plan.push(record, token),
            None => debug!(id = %record.id, "no rule matches"),
        }
    }
    plan
}

/// Groups repositories by the token embedded in their URL.
///
/// Repositories whose URL carries no password are left out. Within a group,
/// repositories keep their discovery order.
pub fn group_by_token<I>(records: I) -> TokenGroups
where
    I: IntoIterator<Item = RepositoryRecord>,
{
    let mut groups = TokenGroups::new();
    for record in records {
        match embedded_token(&record.remote_url) {
            Some(token) => groups.entry(token).or_default().push(record),
            None => debug!(id = %record.id, "no embedded token"),
        }
    }
    groups
}

/// Computes the new URLs giving every repository in `group` the token `token`.
pub fn plan_token_replace(group: &[RepositoryRecord], token: &str) -> Plan {
    let mut plan = Plan::default();
    for record in group {
        plan.push(record.clone(), token);
    }
    plan
}

/// Writes each change `approve` accepts, continuing past failures.
///
/// `approve` is called once per change, right before its write; returning
/// `false` skips that repository.
pub fn apply<S, F>(changes: Vec<PlannedChange>, store: &S, mut approve: F) -> Report
where
    S: RemoteStore + ?Sized,
    F: FnMut(&PlannedChange) -> bool,
{
    let mut report = Report::default();
    for change in changes {
        let id = change.record.id.clone();
        if !approve(&change) {
            println!("{}", style(format!("Skipped {}.", id)).yellow());
            report.declined.push(id);
            continue;
        }
        match store.write_url(&change.record.directory, &change.new_url) {
            Ok(()) => {
                info!(id = %id, url = %credential::redact(&change.new_url), "origin url updated");
                println!("{}", style(format!("✅ Updated {}", id)).green());
                report.applied.push(id);
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    style(format!("❌ Failed to update {}: {}", id, e)).red().bold()
                );
                report.failed.push((id, e));
            }
        }
    }
    report
}

/// Formats one repository the way preview mode lists it.
pub fn describe(record: &RepositoryRecord) -> String {
    format!(
        "ID: {}, Path: {}, URL: {}",
        record.id,
        record.directory.display(),
        record.remote_url
    )
}

/// Lists every repository. With `branches`, the remote-tracking branches
/// of each repository are listed under it.
///
/// Returns the number of repositories shown.
pub fn preview<I>(records: I, branches: Option<&dyn Fn(&Path) -> Result<Vec<String>, String>>) -> usize
where
    I: IntoIterator<Item = RepositoryRecord>,
{
    let mut count = 0;
    for record in records {
        println!("{}", describe(&record));
        if let Some(list) = branches {
            match list(&record.directory) {
                Ok(names) => {
                    for name in names {
                        println!("    {}", style(name).cyan());
                    }
                }
                Err(e) => eprintln!(
                    "{}",
                    style(format!("    cannot list branches: {}", e)).yellow()
                ),
            }
        }
        count += 1;
    }
    println!("{}", style(format!("{} repositories found.", count)).bold());
    count
}

fn print_skipped(skipped: &[(String, SkipReason)]) {
    for (id, reason) in skipped {
        println!("{}", style(format!("Skipping {}: {}", id, reason)).dim());
    }
}

fn print_plan(plan: &Plan) {
    for change in &plan.changes {
        println!("{}", style(&change.record.id).bold());
        println!("    old: {}", change.record.remote_url);
        println!("    new: {}", style(&change.new_url).green());
    }
}

/// Rewrites every repository matched by `rules`.
///
/// With a `confirm` prompter, the old and new URL are shown and the
/// operator has to accept each write; a failed prompt counts as a "no".
/// With `dry_run`, the plan is printed and nothing is written.
pub fn auto_replace<I, S, C>(
    records: I,
    rules: &RuleSet,
    store: &S,
    confirm: Option<&mut C>,
    dry_run: bool,
) -> Report
where
    I: IntoIterator<Item = RepositoryRecord>,
    S: RemoteStore + ?Sized,
    C: ConfirmPrompter,
{
    let plan = plan_auto_replace(records, rules);
    print_skipped(&plan.skipped);

    if dry_run {
        print_plan(&plan);
        return Report {
            skipped: plan.skipped,
            ..Report::default()
        };
    }

    let mut report = match confirm {
        Some(prompter) => apply(plan.changes, store, |change| {
            println!("{}", style(&change.record.id).bold());
            println!("    old: {}", change.record.remote_url);
            println!("    new: {}", style(&change.new_url).green());
            match prompt::confirm_change(&mut *prompter, &change.record.id) {
                Ok(answer) => answer,
                Err(e) => {
                    eprintln!("{}", style(format!("Prompt error: {}", e)).red());
                    false
                }
            }
        }),
        None => apply(plan.changes, store, |_| true),
    };
    report.skipped.extend(plan.skipped);
    report
}

/// Asks for a replacement per distinct token and applies it to the group.
///
/// Each group gets exactly one prompt. An empty answer, the same token, or a
/// failed prompt leaves the whole group untouched.
pub fn token_replace<I, S, P>(records: I, store: &S, prompter: &mut P, dry_run: bool) -> Report
where
    I: IntoIterator<Item = RepositoryRecord>,
    S: RemoteStore + ?Sized,
    P: StringPrompter,
{
    let groups = group_by_token(records);
    let mut report = Report::default();

    for (token, group) in &groups {
        println!();
        println!(
            "{} {}",
            style("Token:").bold(),
            style(token).yellow().bold()
        );
        for record in group {
            println!("    {}", record.id);
        }

        let new_token = match prompt::ask_token(&mut *prompter, token, group.len()) {
            Ok(t) => t,
            Err(e) => {
                eprintln!(
                    "{}",
                    style(format!("Prompt error: {}; skipping group.", e)).red()
                );
                continue;
            }
        };
        if new_token.is_empty() || &new_token == token {
            println!("{}", style("Leaving group unchanged.").yellow());
            continue;
        }

        let plan = plan_token_replace(group, &new_token);
        print_skipped(&plan.skipped);
        if dry_run {
            print_plan(&plan);
            report.skipped.extend(plan.skipped);
            continue;
        }
        let mut group_report = apply(plan.changes, store, |_| true);
        group_report.skipped.extend(plan.skipped);
        report.merge(group_report);
    }

    report
}
