use colored::Colorize;
use declarative::{InstallOutcome, PackageState, ReconcileSummary};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a step indicator
pub fn step(num: usize, total: usize, msg: &str) {
    println!("{} {}", format!("[{num}/{total}]").blue().bold(), msg);
}

/// Print the result for one package
///
/// Failures go to stderr so they stay visible when stdout is redirected.
pub fn outcome(name: &str, outcome: &InstallOutcome) {
    match outcome {
        InstallOutcome::AlreadyInstalled => dim(&format!("{name} already installed")),
        InstallOutcome::Installed => success(&format!("{name} installed")),
        InstallOutcome::NotAvailable => {
            eprintln!("{} {} is not available", "⚠".yellow(), name.bold());
        }
        InstallOutcome::InstallFailed { reason } => {
            error(&format!("{} failed: {reason}", name.bold()));
        }
    }
}

/// Print the installed state of one package
pub fn state(name: &str, state: PackageState) {
    match state {
        PackageState::Installed => println!("  {} {}", "✓".green(), name),
        PackageState::Missing => println!("  {} {} {}", "○".yellow(), name, "(missing)".dimmed()),
        PackageState::Unavailable => {
            println!("  {} {} {}", "✗".red(), name, "(not available)".dimmed());
        }
    }
}

/// Print a one-line run summary
pub fn summary(summary: &ReconcileSummary) {
    let line = summary_line(summary);
    if summary.is_success() {
        success(&line);
    } else {
        warn(&line);
    }
}

fn summary_line(summary: &ReconcileSummary) -> String {
    let mut parts = vec![
        format!("{} installed", summary.installed),
        format!("{} already present", summary.already_installed),
    ];
    if summary.failed > 0 {
        parts.push(format!("{} failed", summary.failed));
    }
    if summary.not_available > 0 {
        parts.push(format!("{} not available", summary.not_available));
    }
    parts.join(", ")
}
