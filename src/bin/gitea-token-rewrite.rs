/// Entry point for the `gitea-token-rewrite` binary.
///
/// Delegates to the CLI entry function and exits the process with the
/// returned exit code. If the run could not start, exits with status code 1.
fn main() {
    match gitea_token_rewrite::cli::entry() {
        Ok(code) => std::process::exit(code),
        Err(_) => std::process::exit(1),
    }
}
