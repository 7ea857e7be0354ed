//! Console progress, counters and the two run logs.

use crate::error::{SweepError, SweepResult};
use crate::installer::Outcome;
use crate::utils::format_duration;
use colored::{ColoredString, Colorize};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, error, info};
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Success and failure logs for one run. Both are line buffered so every
/// outcome is on disk as soon as it is recorded.
#[derive(Debug)]
pub struct RunLogs {
    success: LineWriter<File>,
    failure: LineWriter<File>,
    success_path: PathBuf,
    failure_path: PathBuf,
}

impl RunLogs {
    pub fn create(dir: &Path, timestamp: &str) -> SweepResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            SweepError::LogError(format!("cannot create {}: {}", dir.display(), e))
        })?;
        let success_path = dir.join(format!("termux_installed_packages_{}.log", timestamp));
        let failure_path = dir.join(format!("termux_failed_packages_{}.log", timestamp));
        let open = |path: &Path| {
            File::create(path)
                .map(LineWriter::new)
                .map_err(|e| SweepError::LogError(format!("cannot create {}: {}", path.display(), e)))
        };
        Ok(Self {
            success: open(&success_path)?,
            failure: open(&failure_path)?,
            success_path,
            failure_path,
        })
    }

    pub fn success_path(&self) -> &Path {
        &self.success_path
    }

    pub fn failure_path(&self) -> &Path {
        &self.failure_path
    }

    fn append(&mut self, success: bool, line: &str) -> SweepResult<()> {
        let writer = if success {
            &mut self.success
        } else {
            &mut self.failure
        };
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn write_trailers(&mut self, installed: usize, skipped: usize) -> SweepResult<()> {
        write!(self.success, "\nTotal Installed Packages: {}\n", installed)?;
        write!(self.failure, "\nTotal Skipped Packages: {}\n", skipped)?;
        self.success.flush()?;
        self.failure.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub installed: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

pub struct Reporter {
    logs: RunLogs,
    installed: usize,
    skipped: usize,
    total: usize,
    multi: MultiProgress,
    overall: ProgressBar,
    current: ProgressBar,
    started: Instant,
    quiet: bool,
}

impl Reporter {
    /// Progress drawn to stderr, status lines to stdout. Status lines are
    /// printed even when stderr is not a terminal and the bars stay hidden.
    pub fn new(logs: RunLogs, total: usize) -> Self {
        Self::with_draw_target(logs, total, ProgressDrawTarget::stderr(), false)
    }

    /// No progress bars or status lines; logs and counters only.
    pub fn hidden(logs: RunLogs, total: usize) -> Self {
        Self::with_draw_target(logs, total, ProgressDrawTarget::hidden(), true)
    }

    fn with_draw_target(
        logs: RunLogs,
        total: usize,
        target: ProgressDrawTarget,
        quiet: bool,
    ) -> Self {
        let multi = MultiProgress::with_draw_target(target);

        let overall = multi.add(ProgressBar::new(total as u64));
        overall.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        overall.set_message("Overall Progress");

        let current = multi.add(ProgressBar::new(1));
        current.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40.blue}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        current.set_message("Current Package");

        Self {
            logs,
            installed: 0,
            skipped: 0,
            total,
            multi,
            overall,
            current,
            started: Instant::now(),
            quiet,
        }
    }

    pub fn installed_count(&self) -> usize {
        self.installed
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn logs(&self) -> &RunLogs {
        &self.logs
    }

    /// Prints above the progress bars.
    pub fn status(&self, line: ColoredString) {
        self.status_to(&mut std::io::stdout(), line);
    }

    fn status_to<W: Write>(&self, out: &mut W, line: ColoredString) {
        if self.quiet {
            return;
        }
        if let Err(e) = self.multi.suspend(|| writeln!(out, "{}", line)) {
            debug!("Could not print status line: {}", e);
        }
    }

    pub fn skip_blacklisted(&mut self, package: &str) {
        self.status(format!("{} is in the blacklist. Skipping...", package).yellow());
        self.skipped += 1;
        self.overall.inc(1);
    }

    pub fn begin_package(&mut self, package: &str, index: usize) {
        self.current.reset();
        self.current.set_length(1);
        self.current.set_message(package.to_string());
        self.status(format!("Installing {} ({}/{})...", package, index, self.total).cyan());
    }

    pub fn finish_package(&mut self) {
        self.current.set_position(1);
        self.overall.inc(1);
    }

    /// Appends the line for `outcome` without touching the counters. Used for
    /// the provisional failure of a first attempt.
    pub fn note(&mut self, package: &str, outcome: &Outcome) -> SweepResult<()> {
        self.logs.append(outcome.is_success(), &outcome.log_line(package))
    }

    /// Counts a terminal outcome, logs it and echoes it to the console. A log
    /// write failure is reported but never stops the run.
    pub fn record(&mut self, package: &str, outcome: &Outcome) {
        if outcome.is_success() {
            self.installed += 1;
        } else {
            self.skipped += 1;
        }

        if let Err(e) = self.note(package, outcome) {
            error!("Could not log outcome for {}: {}", package, e);
            self.status(format!("Could not write log entry for {}: {}", package, e).red());
        }

        let line = match outcome {
            Outcome::AlreadyInstalled => {
                format!("{} is already installed. Skipping...", package).yellow()
            }
            Outcome::Installed => format!("{} installed.", package).green(),
            Outcome::InstalledAfterRetry => format!("{} installed after retry.", package).green(),
            Outcome::Failed { .. } | Outcome::FailedAfterRetry { .. } => {
                format!("{} failed to install.", package).red()
            }
            Outcome::Exception { error } => {
                format!("{}: exception occurred: {}", package, error).red()
            }
        };
        self.status(line);
    }

    /// Writes the log trailers, clears the bars and prints the summary.
    pub fn finish(mut self) -> SweepResult<Summary> {
        self.current.finish_and_clear();
        self.overall.finish_and_clear();
        if let Err(e) = self.multi.clear() {
            debug!("Could not clear progress bars: {}", e);
        }

        self.logs.write_trailers(self.installed_count(), self.skipped_count())?;

        let summary = Summary {
            total: self.total,
            installed: self.installed_count(),
            skipped: self.skipped_count(),
            elapsed: self.started.elapsed(),
        };
        info!(
            "Run finished: {} installed, {} skipped of {}",
            summary.installed, summary.skipped, summary.total
        );

        println!("\n{}", "Installation process completed!".green().bold());
        println!("{} {}", "Installed Packages:".green(), summary.installed);
        println!("{} {}", "Skipped Packages:".yellow(), summary.skipped);
        println!(
            "{} {}",
            "Elapsed:".dimmed(),
            format_duration(summary.elapsed.as_secs())
        );
        println!("Success log: {}", self.logs.success_path().display());
        println!("Failure log: {}", self.logs.failure_path().display());
        Ok(summary)
    }
}
