//! Console display logic for the dn-check CLI.
//!
//! This module handles the default console output: the YES/NO table,
//! spinner animation, header, and summaries. Uses only the `console` crate.

use console::{pad_str, style, Alignment, Style, Term};
use dn_check_lib::{FailureKind, ResultSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::ErrorStats;

/// FQDNs listed per failure category before truncating.
const MAX_LISTED_PER_CATEGORY: usize = 5;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message (e.g. "Checking 8 names...").
    ///
    /// Returns `None` when stderr is not a terminal.
    pub fn start(message: String) -> Option<Self> {
        let term = Term::stderr();
        if !term.is_term() {
            return None;
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a dimmed header line to stderr at the start of a verbose run.
pub fn print_header(name_count: usize, tld_count: usize, concurrency: usize) {
    eprintln!(
        "{} {} {}",
        style("dn-check").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "Checking {} name{} for {} TLD{} | Concurrency: {}",
            name_count,
            plural(name_count),
            tld_count,
            plural(tld_count),
            concurrency
        ))
        .dim(),
    );
}

// ── Table ────────────────────────────────────────────────────────────────────

/// Render the availability table: one row per name, one column per TLD.
///
/// Cells are `YES`, `NO`, or `-` for a pair that could not be checked.
pub fn render_table(results: &ResultSet, tlds: &[String], color: bool) -> String {
    let name_width = results
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once("Names".len()))
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = tlds.iter().map(|tld| tld.chars().count().max(3)).collect();

    let mut out = String::new();

    out.push_str(&pad_str("Names", name_width, Alignment::Left, None));
    for (tld, width) in tlds.iter().zip(&widths) {
        out.push_str("  ");
        out.push_str(&paint(
            &pad_str(tld, *width, Alignment::Left, None),
            Style::new().bold(),
            color,
        ));
    }
    out.push('\n');

    for result in results {
        out.push_str(&pad_str(&result.name, name_width, Alignment::Left, None));
        for (tld, width) in tlds.iter().zip(&widths) {
            let (cell, cell_style) = match result.verdict_for(tld) {
                Some(v) if v.available => ("YES", Style::new().green().bold()),
                Some(_) => ("NO", Style::new().red()),
                None => ("-", Style::new().yellow()),
            };
            out.push_str("  ");
            out.push_str(&paint(
                &pad_str(cell, *width, Alignment::Left, None),
                cell_style,
                color,
            ));
        }
        out.push('\n');
    }

    out
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Counts shown in the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCounts {
    pub names: usize,
    pub checks: usize,
    pub available: usize,
    pub taken: usize,
    pub unchecked: usize,
}

impl RunCounts {
    /// `checks` is the number of probes dispatched.
    pub fn from_results(results: &ResultSet, checks: usize) -> Self {
        let available: usize = results.iter().map(|r| r.available_count()).sum();
        let verdicts = results.verdict_count();
        Self {
            names: results.len(),
            checks,
            available,
            taken: verdicts - available,
            unchecked: checks.saturating_sub(verdicts),
        }
    }
}

/// Print the final summary bar with colored counts.
pub fn print_summary(counts: &RunCounts, duration: Duration) {
    println!(
        "{}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "{} name{}, {} check{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(counts.names).bold(),
        plural(counts.names),
        counts.checks,
        plural(counts.checks),
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", counts.available)).green(),
        style("|").dim(),
        style(format!("{} taken", counts.taken)).red(),
        style("|").dim(),
        style(format!("{} unchecked", counts.unchecked)).yellow(),
    );
}

// ── Error summary ────────────────────────────────────────────────────────────

/// Format the categorized list of pairs that could not be checked.
///
/// Returns one line per non-empty category, in [`FailureKind::ALL`] order.
pub fn format_error_summary(error_stats: &ErrorStats) -> Vec<String> {
    FailureKind::ALL
        .iter()
        .filter_map(|kind| {
            let fqdns = error_stats.for_kind(*kind);
            if fqdns.is_empty() {
                return None;
            }
            Some(format!(
                "{} {}{}: {}",
                fqdns.len(),
                kind.label(),
                plural(fqdns.len()),
                format_list(fqdns, MAX_LISTED_PER_CATEGORY),
            ))
        })
        .collect()
}

/// Print a categorized error summary to stderr.
pub fn print_error_summary(error_stats: &ErrorStats) {
    if !error_stats.has_errors() {
        return;
    }

    eprintln!("{}", style("Some names could not be checked:").yellow());
    for line in format_error_summary(error_stats) {
        eprintln!("{} {}", style("•").dim(), line);
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn format_list(items: &[String], max_show: usize) -> String {
    if items.len() <= max_show {
        items.join(", ")
    } else {
        let shown = &items[..max_show];
        let remaining = items.len() - max_show;
        format!("{}, ... and {} more", shown.join(", "), remaining)
    }
}

fn paint(text: &str, text_style: Style, color: bool) -> String {
    if color {
        text_style.apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dn_check_lib::{CheckConfig, NameChecker, Outcome, Resolve};
    use std::sync::Arc;

    struct Fixed;

    #[async_trait::async_trait]
    impl Resolve for Fixed {
        async fn resolve(&self, fqdn: &str) -> Outcome {
            match fqdn {
                f if f.ends_with(".tj") => Outcome::transient(FailureKind::Timeout, "slow"),
                f if f.starts_with("yahoo") => Outcome::Registered,
                _ => Outcome::NotFound,
            }
        }
    }

    fn tlds() -> Vec<String> {
        vec!["com".to_string(), "net".to_string(), "tj".to_string()]
    }

    async fn sample() -> ResultSet {
        let checker = NameChecker::with_resolver(CheckConfig::default(), Arc::new(Fixed));
        let names = vec!["yahoo".to_string(), "sun4everyone".to_string()];
        checker.run(&names, &tlds()).await.unwrap()
    }

    #[tokio::test]
    async fn test_render_table_plain() {
        let table = render_table(&sample().await, &tlds(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].trim_end(), "Names         com  net  tj");
        assert_eq!(lines[1].trim_end(), "yahoo         NO   NO   -");
        assert_eq!(lines[2].trim_end(), "sun4everyone  YES  YES  -");
    }

    #[tokio::test]
    async fn test_run_counts() {
        let counts = RunCounts::from_results(&sample().await, 6);
        assert_eq!(
            counts,
            RunCounts {
                names: 2,
                checks: 6,
                available: 2,
                taken: 2,
                unchecked: 2,
            }
        );
    }

    #[test]
    fn test_format_list_truncates() {
        let items: Vec<String> = (1..=7).map(|i| format!("n{}.com", i)).collect();
        assert_eq!(
            format_list(&items, 5),
            "n1.com, n2.com, n3.com, n4.com, n5.com, ... and 2 more"
        );
        assert_eq!(format_list(&items[..2], 5), "n1.com, n2.com");
    }

    #[test]
    fn test_format_error_summary() {
        let mut stats = ErrorStats::default();
        stats.add_error("a.tj", FailureKind::Timeout);
        stats.add_error("b.tj", FailureKind::Timeout);
        stats.add_error("c.com", FailureKind::ServerFailure);

        let lines = format_error_summary(&stats);
        assert_eq!(
            lines,
            vec![
                "2 timeouts: a.tj, b.tj".to_string(),
                "1 server failure: c.com".to_string(),
            ]
        );
    }
}
