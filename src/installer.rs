use crate::backend::PackageManager;
use crate::error::SweepResult;
use crate::reporter::Reporter;
use colored::Colorize;
use log::{debug, info, warn};

/// How the processing of one package ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadyInstalled,
    Installed,
    InstalledAfterRetry,
    /// A failed first attempt. Logged as soon as it happens; the retry then
    /// decides the terminal outcome.
    Failed { error: String },
    FailedAfterRetry { error: String },
    /// The process machinery itself failed, e.g. a missing executable.
    Exception { error: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::AlreadyInstalled | Outcome::Installed | Outcome::InstalledAfterRetry
        )
    }

    pub fn log_line(&self, package: &str) -> String {
        match self {
            Outcome::AlreadyInstalled => format!("{}: Already installed.", package),
            Outcome::Installed => format!("{}: Successfully installed.", package),
            Outcome::InstalledAfterRetry => {
                format!("{}: Successfully installed after retry.", package)
            }
            Outcome::Failed { error } => {
                format!("{}: Failed to install. Error: {}", package, error)
            }
            Outcome::FailedAfterRetry { error } => {
                format!("{}: Failed to install after retry. Error: {}", package, error)
            }
            Outcome::Exception { error } => format!("{}: Exception occurred: {}", package, error),
        }
    }
}

pub struct Installer<'a, P: PackageManager> {
    manager: &'a P,
}

impl<'a, P: PackageManager> Installer<'a, P> {
    pub fn new(manager: &'a P) -> Self {
        Self { manager }
    }

    /// Check, install, and on failure repair and retry once. Never fails:
    /// errors from the process machinery become [`Outcome::Exception`].
    pub fn install(&self, package: &str, reporter: &mut Reporter) -> Outcome {
        match self.attempt(package, reporter) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Processing {} aborted: {}", package, e);
                Outcome::Exception {
                    error: e.to_string(),
                }
            }
        }
    }

    fn attempt(&self, package: &str, reporter: &mut Reporter) -> SweepResult<Outcome> {
        if self.manager.is_installed(package)? {
            debug!("{} is already installed", package);
            return Ok(Outcome::AlreadyInstalled);
        }

        let first = self.manager.install(package)?;
        if first.success {
            info!("Installed {}", package);
            return Ok(Outcome::Installed);
        }

        warn!("Installing {} failed, retrying: {}", package, first.error_text());
        reporter.note(
            package,
            &Outcome::Failed {
                error: first.error_text().to_string(),
            },
        )?;
        self.repair(reporter);

        let second = self.manager.install(package)?;
        if second.success {
            info!("Installed {} on retry", package);
            Ok(Outcome::InstalledAfterRetry)
        } else {
            warn!("Installing {} failed again: {}", package, second.error_text());
            Ok(Outcome::FailedAfterRetry {
                error: second.error_text().to_string(),
            })
        }
    }

    /// Runs the package manager's fix-broken operation. The result is only
    /// logged.
    pub fn repair(&self, reporter: &Reporter) {
        reporter.status("Fixing broken packages...".yellow());
        match self.manager.fix_broken() {
            Ok(true) => debug!("fix-broken completed"),
            Ok(false) => debug!("fix-broken exited with a non-zero status"),
            Err(e) => debug!("fix-broken could not run: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SweepError;
    use crate::reporter::RunLogs;
    use crate::utils::CommandOutput;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays queued install results and records every call.
    #[derive(Default)]
    struct Scripted {
        installed: bool,
        dpkg_missing: bool,
        apt_missing: bool,
        installs: RefCell<VecDeque<SweepResult<CommandOutput>>>,
        calls: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn with_installs(results: Vec<SweepResult<CommandOutput>>) -> Self {
            Self {
                installs: RefCell::new(results.into()),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl PackageManager for Scripted {
        fn list_all(&self) -> SweepResult<CommandOutput> {
            unreachable!()
        }

        fn is_installed(&self, package: &str) -> SweepResult<bool> {
            self.calls.borrow_mut().push(format!("check {}", package));
            if self.dpkg_missing {
                return Err(missing("dpkg"));
            }
            Ok(self.installed)
        }

        fn install(&self, package: &str) -> SweepResult<CommandOutput> {
            self.calls.borrow_mut().push(format!("install {}", package));
            self.installs
                .borrow_mut()
                .pop_front()
                .expect("unexpected install call")
        }

        fn fix_broken(&self) -> SweepResult<bool> {
            self.calls.borrow_mut().push("repair".to_string());
            if self.apt_missing {
                return Err(missing("apt"));
            }
            Ok(false)
        }
    }

    fn missing(program: &str) -> SweepError {
        SweepError::spawn(
            program,
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        )
    }

    fn missing_pkg() -> SweepError {
        missing("pkg")
    }

    fn run(manager: &Scripted, package: &str) -> (Outcome, String) {
        let dir = tempfile::tempdir().unwrap();
        let mut reporter = Reporter::hidden(RunLogs::create(dir.path(), "test").unwrap(), 1);
        let outcome = Installer::new(manager).install(package, &mut reporter);
        let failure = std::fs::read_to_string(reporter.logs().failure_path()).unwrap();
        (outcome, failure)
    }

    #[test]
    fn test_already_installed_short_circuits() {
        let manager = Scripted {
            installed: true,
            ..Default::default()
        };
        let (outcome, failure) = run(&manager, "alpha");
        assert_eq!(outcome, Outcome::AlreadyInstalled);
        assert_eq!(manager.calls(), vec!["check alpha"]);
        assert!(failure.is_empty());
    }

    #[test]
    fn test_first_attempt_success() {
        let manager = Scripted::with_installs(vec![Ok(CommandOutput::ok(""))]);
        let (outcome, failure) = run(&manager, "gamma");
        assert_eq!(outcome, Outcome::Installed);
        assert_eq!(manager.calls(), vec!["check gamma", "install gamma"]);
        assert!(failure.is_empty());
    }

    #[test]
    fn test_retry_after_single_repair() {
        let manager = Scripted::with_installs(vec![
            Ok(CommandOutput::failed("E: Could not get lock\n")),
            Ok(CommandOutput::ok("")),
        ]);
        let (outcome, failure) = run(&manager, "vim");
        assert_eq!(outcome, Outcome::InstalledAfterRetry);
        assert_eq!(
            manager.calls(),
            vec!["check vim", "install vim", "repair", "install vim"]
        );
        assert_eq!(failure, "vim: Failed to install. Error: E: Could not get lock\n");
    }

    #[test]
    fn test_both_attempts_fail() {
        let manager = Scripted::with_installs(vec![
            Ok(CommandOutput::failed("first error")),
            Ok(CommandOutput::failed("second error")),
        ]);
        let (outcome, failure) = run(&manager, "vim");
        assert_eq!(
            outcome,
            Outcome::FailedAfterRetry {
                error: "second error".into()
            }
        );
        assert_eq!(manager.calls().iter().filter(|c| *c == "repair").count(), 1);
        assert!(failure.contains("vim: Failed to install. Error: first error\n"));
        assert_eq!(failure.lines().count(), 1);
    }

    #[test]
    fn test_spawn_failure_becomes_exception() {
        let manager = Scripted::with_installs(vec![Err(missing_pkg())]);
        let (outcome, _) = run(&manager, "vim");
        assert_eq!(
            outcome,
            Outcome::Exception {
                error: "Failed to run pkg: No such file or directory".into()
            }
        );
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_spawn_failure_on_retry_becomes_exception() {
        let manager = Scripted::with_installs(vec![
            Ok(CommandOutput::failed("first error")),
            Err(missing_pkg()),
        ]);
        let (outcome, failure) = run(&manager, "vim");
        assert!(matches!(outcome, Outcome::Exception { .. }));
        assert!(failure.starts_with("vim: Failed to install. Error: first error"));
    }

    #[test]
    fn test_status_check_failure_becomes_exception() {
        let manager = Scripted {
            dpkg_missing: true,
            ..Default::default()
        };
        let (outcome, failure) = run(&manager, "vim");
        assert_eq!(
            outcome,
            Outcome::Exception {
                error: "Failed to run dpkg: No such file or directory".into()
            }
        );
        assert_eq!(manager.calls(), vec!["check vim"]);
        assert!(failure.is_empty());
    }

    #[test]
    fn test_repair_failure_does_not_stop_retry() {
        let manager = Scripted {
            apt_missing: true,
            ..Scripted::with_installs(vec![
                Ok(CommandOutput::failed("E: Could not get lock")),
                Ok(CommandOutput::ok("")),
            ])
        };
        let (outcome, _) = run(&manager, "vim");
        assert_eq!(outcome, Outcome::InstalledAfterRetry);
        assert_eq!(
            manager.calls(),
            vec!["check vim", "install vim", "repair", "install vim"]
        );
    }

    #[test]
    fn test_outcome_classification() {
        assert!(Outcome::AlreadyInstalled.is_success());
        assert!(Outcome::Installed.is_success());
        assert!(Outcome::InstalledAfterRetry.is_success());
        assert!(!Outcome::Failed { error: String::new() }.is_success());
        assert!(!Outcome::FailedAfterRetry { error: String::new() }.is_success());
        assert!(!Outcome::Exception { error: String::new() }.is_success());
    }
}
