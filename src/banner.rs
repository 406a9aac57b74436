use console::{measure_text_width, style};
use std::iter;
use std::path::Path;

/// What a mutating run is about to do, as shown in the banner.
pub struct RunSummary<'a> {
    /// `auto-replace` or `token-replace`.
    pub mode: &'a str,
    pub root: &'a Path,
    /// `direct` or `git`.
    pub backend: &'a str,
    /// Number of configured rules; `None` outside auto-replace.
    pub rules: Option<usize>,
    pub confirm: bool,
    pub dry_run: bool,
}

/// Prints a decorative, colorized box describing the upcoming run.
///
/// The box is sized to the widest **visible** line, using
/// [`console::measure_text_width`] so that ANSI color codes inside the
/// content do not throw off the padding. Borders are styled separately from
/// the content.
///
/// # Examples
///
/// ```no_run
/// use gitea_token_rewrite::banner::{RunSummary, print_banner};
/// use std::path::Path;
///
/// print_banner(&RunSummary {
///     mode: "auto-replace",
///     root: Path::new("/home/git/data/gitea-repositories"),
///     backend: "direct",
///     rules: Some(2),
///     confirm: true,
///     dry_run: false,
/// });
/// ```
pub fn print_banner(summary: &RunSummary<'_>) {
    let lines = banner_lines(summary);

    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l)) // ignore ANSI in content
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let top = style(format!("╔{}╗", border)).blue().bold();
    let bottom = style(format!("╚{}╝", border)).blue().bold();
    let left = style("║ ").blue().bold().to_string();
    let right = style("║").blue().bold().to_string();

    println!();
    println!("{top}");
    for line in lines {
        let visible = measure_text_width(&line);
        let pad = max_width - visible; // includes the one space after left border
        println!("{}{}{}{}", left, line, " ".repeat(pad - 1), right);
    }
    println!("{bottom}");
    println!();
}

/// Constructs the lines of the run banner: title, settings, then a
/// highlighted note on whether anything will be written.
///
/// Some lines carry ANSI styling; measure them with
/// `console::measure_text_width`, not `str::len()`.
fn banner_lines(summary: &RunSummary<'_>) -> Vec<String> {
    let top = ["Rewrite credentials in repository remote URLs", ""]
        .into_iter()
        .map(|s| s.to_string());

    let settings = [
        Some(format!("Mode:         {}", summary.mode)),
        Some(format!("Repositories: {}", summary.root.display())),
        Some(format!("Backend:      {}", summary.backend)),
        summary.rules.map(|n| format!("Rules:        {}", n)),
    ]
    .into_iter()
    .flatten();

    let note = if summary.dry_run {
        style("Dry run: planned changes are printed, nothing is written.")
            .cyan()
            .bold()
            .to_string()
    } else if summary.confirm {
        style("Each rewrite is shown and must be confirmed before it is written.")
            .cyan()
            .bold()
            .to_string()
    } else {
        style("Changes are written immediately and are not rolled back on failure.")
            .yellow()
            .bold()
            .to_string()
    };

    top.chain(settings)
        .chain(iter::once(String::new()))
        .chain(iter::once(note))
        .collect()
}
