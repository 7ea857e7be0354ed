//! The narrow seam between the installer and the system package manager.

use crate::error::SweepResult;
use crate::utils::{run_command_silent, run_command_with_output, CommandOutput};

/// The four package-manager operations a sweep relies on. Only exit status
/// and raw output text cross this boundary.
pub trait PackageManager {
    /// Every installable package, in the manager's own text format.
    fn list_all(&self) -> SweepResult<CommandOutput>;

    fn is_installed(&self, package: &str) -> SweepResult<bool>;

    /// Non-interactive install of a single package.
    fn install(&self, package: &str) -> SweepResult<CommandOutput>;

    /// Best-effort repair of half-configured packages. The returned status is
    /// informational only.
    fn fix_broken(&self) -> SweepResult<bool>;
}

/// Termux: `pkg` for listing and installing, `dpkg` for status, `apt` for
/// repair.
#[derive(Debug, Clone, Default)]
pub struct TermuxPkg;

impl TermuxPkg {
    pub fn new() -> Self {
        Self
    }
}

impl PackageManager for TermuxPkg {
    fn list_all(&self) -> SweepResult<CommandOutput> {
        run_command_with_output("pkg", &["list-all"])
    }

    fn is_installed(&self, package: &str) -> SweepResult<bool> {
        Ok(run_command_with_output("dpkg", &["-s", package])?.success)
    }

    fn install(&self, package: &str) -> SweepResult<CommandOutput> {
        run_command_with_output("pkg", &["install", "-y", package])
    }

    fn fix_broken(&self) -> SweepResult<bool> {
        run_command_silent("apt", &["--fix-broken", "install", "-y"])
    }
}
