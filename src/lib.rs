pub mod backend;
pub mod blacklist;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod installer;
pub mod reporter;
pub mod session;
pub mod utils;

pub use backend::{PackageManager, TermuxPkg};
pub use blacklist::{Blacklist, DEFAULT_BLACKLIST};
pub use config::Config;
pub use error::{SweepError, SweepResult};
pub use installer::{Installer, Outcome};
pub use reporter::{Reporter, RunLogs, Summary};
pub use session::Session;
pub use utils::CommandOutput;

pub const PKGSWEEP_VERSION: &str = "0.1.0";
