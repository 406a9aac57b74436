use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Returns `true` if a `git` executable can be found in `PATH`.
pub fn is_available() -> bool {
    which::which("git").is_ok()
}

/// Builds a `git --git-dir <repo>` command with captured output and no stdin.
///
/// `--git-dir` pins git to `repo` itself. If `repo` is not a repository the
/// command fails instead of discovering one in a parent directory.
fn git_in(repo: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("--git-dir").arg(repo);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd
}

/// Runs a command and returns its trimmed standard output on success,
/// or its standard error as an `Err` on failure.
///
/// This function executes the provided [`std::process::Command`] and:
/// - If the command exits with a zero status, its `stdout` is captured,
///   converted to UTF-8 (lossy), trimmed, and returned as `Ok(String)`.
/// - If the command exits non-zero, its `stderr` is captured,
///   converted to UTF-8 (lossy), trimmed, and returned as `Err(String)`.
///   An empty `stderr` is reported as `"non-zero exit"`.
/// - If the process fails to spawn, the I/O error message is returned as `Err(String)`.
fn run_output(mut cmd: Command) -> Result<String, String> {
    let out_res = cmd.output();
    match out_res {
        Ok(out) => {
            if out.status.success() {
                Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
            } else {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                if stderr.is_empty() {
                    Err(String::from("non-zero exit"))
                } else {
                    Err(stderr)
                }
            }
        }
        Err(e) => Err(format!("{}", e)),
    }
}

/// Reads the origin URL of the repository at `repo`.
///
/// Runs:
///
/// ```text
/// git --git-dir <repo> config --local --get remote.origin.url
/// ```
///
/// # Returns
///
/// * `Ok(String)` with the configured URL.
/// * `Err(String)` if `repo` is not a repository, the key is not set in
///   `repo`'s own config (git exits with status 1 and no output), or the
///   command could not be run. Global and system config are not consulted.
pub fn remote_url(repo: &Path) -> Result<String, String> {
    let mut cmd = git_in(repo);
    cmd.arg("config")
        .arg("--local")
        .arg("--get")
        .arg("remote.origin.url");
    debug!(repo = %repo.display(), "git config --local --get remote.origin.url");
    match run_output(cmd) {
        Ok(s) if s.is_empty() => Err(String::from("remote.origin.url is empty")),
        other => other,
    }
}

/// Points the `origin` remote of the repository at `repo` to `url`.
///
/// Runs:
///
/// ```text
/// git --git-dir <repo> remote set-url origin <url>
/// ```
///
/// # Notes
///
/// `url` carries a credential. It is passed as an argument and therefore
/// briefly visible in the process list of the host.
pub fn set_remote_url(repo: &Path, url: &str) -> Result<(), String> {
    let mut cmd = git_in(repo);
    cmd.arg("remote").arg("set-url").arg("origin").arg(url);
    debug!(repo = %repo.display(), "git remote set-url origin");
    run_output(cmd).map(|_| ())
}

/// Lists the remote-tracking branches of the repository at `repo`.
///
/// Runs `git --git-dir <repo> branch -r` and returns one name per branch, see
/// [`parse_branch_lines`].
pub fn remote_branches(repo: &Path) -> Result<Vec<String>, String> {
    let mut cmd = git_in(repo);
    cmd.arg("branch").arg("-r");
    debug!(repo = %repo.display(), "git branch -r");
    run_output(cmd).map(|out| parse_branch_lines(&out))
}

/// Turns `git branch -r` output into branch names.
///
/// Leading whitespace is removed and symbolic refs such as
/// `origin/HEAD -> origin/main` are reduced to their own name.
pub(crate) fn parse_branch_lines(out: &str) -> Vec<String> {
    out.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| match l.split_once(" -> ") {
            Some((name, _)) => name.to_string(),
            None => l.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{is_available, parse_branch_lines, remote_branches, remote_url};

    #[test]
    fn branch_lines_are_trimmed() {
        let out = "  origin/HEAD -> origin/main\n  origin/main\n  origin/release/1.x\n";
        assert_eq!(
            parse_branch_lines(out),
            vec!["origin/HEAD", "origin/main", "origin/release/1.x"]
        );
    }

    #[test]
    fn empty_output_is_empty_list() {
        assert!(parse_branch_lines("").is_empty());
        assert!(parse_branch_lines("\n  \n").is_empty());
    }

    #[test]
    fn fresh_bare_repo_has_no_origin_or_branches() {
        if !is_available() {
            return;
        }
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        git2::Repository::init_bare(dir.path()).expect("failed to init bare repo");

        assert!(remote_url(dir.path()).is_err());
        assert_eq!(remote_branches(dir.path()).expect("branch -r failed"), Vec::<String>::new());
    }
}
