use super::{
    BatchStartInfo, BuildSummary, ConversionOutcome, OutcomeStatus, Reporter, ReporterError,
    format_duration,
};
use crate::plan::ConversionJob;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

/// Human-friendly reporter.
///
/// Quiet unless something fails: failures always go to stderr together with
/// the converter's own output. Verbose mode adds per-file lines, a summary,
/// and a progress bar when stderr is a terminal.
pub struct TerminalReporter {
    verbose: bool,
    progress: Mutex<Option<ProgressBar>>,
}

impl TerminalReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            progress: Mutex::new(None),
        }
    }

    /// Runs `f` with the progress bar hidden so printed lines stay intact.
    fn print<F: FnOnce()>(&self, f: F) {
        match self.progress.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(pb) => pb.suspend(f),
                None => f(),
            },
            Err(_) => f(),
        }
    }

    fn finish_progress(&self) {
        if let Ok(mut guard) = self.progress.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Reporter for TerminalReporter {
    fn batch_started(&self, info: &BatchStartInfo) {
        if !self.verbose {
            return;
        }
        println!("\n{}", style("BUILD").bold().cyan());
        println!(
            "  Converting {} of {} file(s) -> {} ({} job(s)){}",
            info.pending,
            info.total_sources,
            style(&info.output_dir).bold(),
            info.jobs,
            if info.forced { ", forced" } else { "" }
        );

        if info.pending > 1 && Term::stderr().is_term() {
            let pb = ProgressBar::with_draw_target(
                Some(info.pending as u64),
                ProgressDrawTarget::stderr(),
            );
            if let Ok(bar_style) =
                ProgressStyle::default_bar().template("  [{bar:30}] {pos}/{len} {msg}")
            {
                pb.set_style(bar_style.progress_chars("=> "));
            }
            if let Ok(mut guard) = self.progress.lock() {
                *guard = Some(pb);
            }
        }
    }

    fn conversion_skipped(&self, job: &ConversionJob) {
        if self.verbose {
            self.print(|| {
                println!(
                    "  {} {} {}",
                    style("=").dim(),
                    job.source_name(),
                    style("up to date").dim()
                )
            });
        }
    }

    fn conversion_started(&self, job: &ConversionJob) {
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_message(job.source_name());
            }
        }
    }

    fn conversion_finished(&self, outcome: &ConversionOutcome) {
        match &outcome.status {
            OutcomeStatus::Converted => {
                if self.verbose {
                    self.print(|| {
                        println!(
                            "  {} {} -> {} ({})",
                            style("✓").green().bold(),
                            outcome.source_name(),
                            outcome.target.display(),
                            format_duration(&outcome.duration)
                        )
                    });
                }
            }
            OutcomeStatus::Failed(failure) => {
                self.print(|| {
                    eprintln!(
                        "{} {}",
                        style("ERROR").red().bold(),
                        style(&failure.message).red()
                    );
                    if !failure.output.is_empty() {
                        eprint!("{}", failure.output);
                        if !failure.output.ends_with('\n') {
                            eprintln!();
                        }
                    }
                });
            }
            OutcomeStatus::NotRun => {
                if self.verbose {
                    self.print(|| {
                        println!(
                            "  {} {} {}",
                            style("-").yellow(),
                            outcome.source_name(),
                            style("not converted").yellow()
                        )
                    });
                }
            }
        }

        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    fn batch_complete(&self, summary: &BuildSummary) {
        self.finish_progress();

        if !summary.failures.is_empty() {
            eprintln!(
                "{} {} of {} conversion(s) failed: {}",
                style("flebuild:").bold(),
                summary.failures.len(),
                summary.converted + summary.failures.len() + summary.not_run,
                summary.failed_names().join(", ")
            );
        }

        if !self.verbose {
            return;
        }
        println!("\n{}", style("SUMMARY").bold().cyan());
        println!(
            "  {} converted, {} up to date, {} failed, {} not run",
            style(summary.converted).green(),
            summary.skipped,
            style(summary.failures.len()).red(),
            summary.not_run
        );
        println!("  Time: {}", format_duration(&summary.duration));
    }

    fn clean_complete(&self, output_dir: &str, removed: bool) {
        if !self.verbose {
            return;
        }
        if removed {
            println!("{} Removed {}", style("✓").green().bold(), output_dir);
        } else {
            println!("{} {} already clean", style("✓").green().bold(), output_dir);
        }
    }

    fn warning(&self, message: &str) {
        self.print(|| eprintln!("{}", style(format!("WARN: {}", message)).yellow().bold()));
    }

    fn error(&self, error: &ReporterError) {
        self.print(|| {
            eprintln!(
                "{} {}",
                style("ERROR").red().bold(),
                style(&error.title).red().bold()
            );
            eprintln!("  {}", error.message);
            if let Some(suggestion) = &error.suggestion {
                eprintln!("  Suggestion: {}", suggestion);
            }
        });
    }
}
