use crate::backend::PackageManager;
use colored::Colorize;
use log::{error, info};
use std::collections::BTreeSet;

/// Package names from `pkg list-all` style output: the part of each line
/// before the first `/`, sorted and deduplicated. Blank lines are skipped.
pub fn parse_package_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split('/').next())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Everything the package manager can currently install. Any failure is
/// reported and yields an empty list, which ends the run.
pub fn fetch_available<P: PackageManager>(manager: &P) -> Vec<String> {
    let output = match manager.list_all() {
        Ok(output) => output,
        Err(e) => {
            error!("Listing packages failed: {}", e);
            println!("{}", "Failed to retrieve package list.".red());
            return Vec::new();
        }
    };

    if !output.success {
        error!("Listing packages failed: {}", output.error_text());
        println!("{}", "Failed to retrieve package list.".red());
        return Vec::new();
    }

    let packages = parse_package_list(&output.stdout);
    info!("Enumerated {} packages", packages.len());
    packages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SweepError, SweepResult};
    use crate::utils::CommandOutput;
    use proptest::prelude::*;

    struct Listing(SweepResult<CommandOutput>);

    impl PackageManager for Listing {
        fn list_all(&self) -> SweepResult<CommandOutput> {
            match &self.0 {
                Ok(out) => Ok(out.clone()),
                Err(_) => Err(SweepError::spawn(
                    "pkg",
                    std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                )),
            }
        }
        fn is_installed(&self, _package: &str) -> SweepResult<bool> {
            unreachable!()
        }
        fn install(&self, _package: &str) -> SweepResult<CommandOutput> {
            unreachable!()
        }
        fn fix_broken(&self) -> SweepResult<bool> {
            unreachable!()
        }
    }

    #[test]
    fn test_parse_takes_name_before_slash() {
        let stdout = "zsh/stable 5.9 aarch64\nabduco/stable 0.6-4 aarch64\nlibc++/stable 27c aarch64\n";
        assert_eq!(parse_package_list(stdout), vec!["abduco", "libc++", "zsh"]);
    }

    #[test]
    fn test_parse_deduplicates() {
        assert_eq!(parse_package_list("foo/stable\nfoo/stable\n"), vec!["foo"]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        assert_eq!(parse_package_list("\nb/x\n\na/y\n"), vec!["a", "b"]);
        assert!(parse_package_list("").is_empty());
    }

    #[test]
    fn test_fetch_sorted_on_success() {
        let manager = Listing(Ok(CommandOutput::ok("gamma/stable\nalpha/stable\nbeta/stable\n")));
        assert_eq!(fetch_available(&manager), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_fetch_empty_on_nonzero_exit() {
        let mut output = CommandOutput::failed("E: repository unreachable");
        output.stdout = "alpha/stable\n".into();
        assert!(fetch_available(&Listing(Ok(output))).is_empty());
    }

    #[test]
    fn test_fetch_empty_when_command_missing() {
        let manager = Listing(Err(SweepError::ConfigError(String::new())));
        assert!(fetch_available(&manager).is_empty());
    }

    proptest! {
        #[test]
        fn prop_parse_is_sorted_set_without_slashes(
            lines in proptest::collection::vec("[a-z0-9.+-]{1,12}(/[a-z]{1,8}( [0-9.]{1,6})?)?", 0..30)
        ) {
            let stdout = lines.join("\n");
            let parsed = parse_package_list(&stdout);
            for pair in parsed.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
            for name in &parsed {
                prop_assert!(!name.contains('/'));
                prop_assert!(!name.is_empty());
            }
            for line in &lines {
                let name = line.split('/').next().unwrap();
                prop_assert!(parsed.iter().any(|p| p == name));
            }
        }
    }
}
