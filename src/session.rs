//! One sweep over every available package.

use crate::backend::PackageManager;
use crate::blacklist::{prompt_for_additions, Blacklist};
use crate::config::Config;
use crate::enumerator::fetch_available;
use crate::error::SweepResult;
use crate::installer::Installer;
use crate::reporter::{Reporter, RunLogs, Summary};
use crate::utils::run_timestamp;
use colored::Colorize;
use log::info;
use std::io::BufRead;

pub struct Session<'a, P: PackageManager> {
    config: &'a Config,
    manager: &'a P,
    show_progress: bool,
}

impl<'a, P: PackageManager> Session<'a, P> {
    pub fn new(config: &'a Config, manager: &'a P) -> Self {
        Self {
            config,
            manager,
            show_progress: true,
        }
    }

    /// Keep progress bars and status lines off the terminal.
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Defaults plus the on-disk list, extended by whatever is typed at the
    /// prompt when prompting is enabled.
    pub fn prepare_blacklist<R: BufRead>(&self, input: &mut R) -> SweepResult<Blacklist> {
        let additions = if self.config.prompt {
            prompt_for_additions(input)?
        } else {
            Vec::new()
        };
        Blacklist::assemble(&self.config.blacklist_file, additions)
    }

    /// Full run: blacklist, log files, enumeration, then every package in
    /// order. `None` means nothing could be enumerated.
    pub fn run<R: BufRead>(&self, input: &mut R) -> SweepResult<Option<Summary>> {
        let blacklist = self.prepare_blacklist(input)?;
        info!("Blacklist holds {} packages", blacklist.distinct_count());
        let logs = RunLogs::create(&self.config.log_dir, &run_timestamp())?;
        self.sweep(&blacklist, logs)
    }

    /// Enumerates and processes packages, writing outcomes to `logs`.
    pub fn sweep(&self, blacklist: &Blacklist, logs: RunLogs) -> SweepResult<Option<Summary>> {
        println!("{}", "Fetching all available Termux packages...".blue());
        let packages = fetch_available(self.manager);
        if packages.is_empty() {
            println!("{}", "No packages found.".red());
            return Ok(None);
        }

        let total = packages.len();
        println!("{}", format!("Found {} packages.", total).green());

        let mut reporter = if self.show_progress {
            Reporter::new(logs, total)
        } else {
            Reporter::hidden(logs, total)
        };
        let installer = Installer::new(self.manager);

        for (index, package) in packages.iter().enumerate() {
            if blacklist.contains(package) {
                reporter.skip_blacklisted(package);
                continue;
            }

            reporter.begin_package(package, index + 1);
            let outcome = installer.install(package, &mut reporter);
            reporter.record(package, &outcome);
            reporter.finish_package();

            if self.config.repair_after_each_package {
                installer.repair(&reporter);
            }
        }

        reporter.finish().map(Some)
    }
}
