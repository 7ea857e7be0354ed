use thiserror::Error;

pub type SweepResult<T> = Result<T, SweepError>;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The child process could not be started at all (missing executable,
    /// permission problems, fork failure).
    #[error("Failed to run {program}: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Blacklist error: {0}")]
    BlacklistError(String),

    #[error("Log error: {0}")]
    LogError(String),
}

impl SweepError {
    pub fn spawn(program: &str, source: std::io::Error) -> Self {
        SweepError::CommandSpawn {
            program: program.to_string(),
            source,
        }
    }

    /// Errors caused by local files or settings rather than by the package
    /// manager or the filesystem underneath it.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            SweepError::TomlParse(_)
                | SweepError::ConfigError(_)
                | SweepError::BlacklistError(_)
                | SweepError::LogError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_message_names_program() {
        let err = SweepError::spawn(
            "pkg",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to run pkg: No such file or directory"
        );
        assert!(!err.is_setup_error());
    }

    #[test]
    fn test_setup_errors() {
        assert!(SweepError::LogError("x".into()).is_setup_error());
        assert!(SweepError::BlacklistError("x".into()).is_setup_error());
        assert!(SweepError::ConfigError("x".into()).is_setup_error());
        assert!(!SweepError::Io(std::io::Error::other("x")).is_setup_error());
    }
}
