pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli_config {
    use super::toml_config::{BatchConfig, TomlConfig};
    use crate::domain::model::{CourseQuery, Crn};
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_non_empty_string, Validate};
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "course-tracker")]
    #[command(about = "Check whether a course section is open for enrollment")]
    pub struct CliConfig {
        #[arg(short, long, global = true, help = "TOML configuration file")]
        pub config: Option<PathBuf>,

        #[arg(long, global = true, help = "Listing URL template with an empty term_subj= parameter")]
        pub template: Option<String>,

        #[arg(long, global = true, help = "Term code substituted into term_code=")]
        pub term: Option<String>,

        #[arg(long, global = true, help = "Request timeout in seconds")]
        pub timeout: Option<u64>,

        #[arg(long, global = true)]
        pub concurrent_requests: Option<usize>,

        #[arg(long, global = true, help = "Print reports as JSON")]
        pub json: bool,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Report whether a section is OPEN or CLOSED
        Status { crn: Crn, subject: String },
        /// Report whether a CRN is listed under a subject
        Exists { crn: Crn, subject: String },
        /// Check several CRN:SUBJECT pairs (defaults to the config file's courses)
        Check { courses: Vec<CourseQuery> },
    }

    impl CliConfig {
        /// 合併設定檔與命令列參數，命令列優先
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };

            if let Some(template) = &self.template {
                config.listing.template = template.clone();
            }
            if let Some(term) = &self.term {
                config.listing.term_code = Some(term.clone());
            }
            if let Some(timeout) = self.timeout {
                config.listing.timeout_seconds = timeout;
            }
            if let Some(concurrent) = self.concurrent_requests {
                config.batch = Some(BatchConfig {
                    concurrent_requests: Some(concurrent),
                });
            }

            config.validate()?;
            Ok(config)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match &self.command {
                Command::Status { subject, .. } | Command::Exists { subject, .. } => {
                    validate_non_empty_string("subject", subject)
                }
                Command::Check { .. } => Ok(()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core::ConfigProvider;
        use std::io::Write;
        use tempfile::NamedTempFile;

        #[test]
        fn test_parse_status_command() {
            let cli = CliConfig::try_parse_from(["course-tracker", "status", "12345", "CSCI"]).unwrap();
            match &cli.command {
                Command::Status { crn, subject } => {
                    assert_eq!(crn.get(), 12345);
                    assert_eq!(subject, "CSCI");
                }
                other => panic!("unexpected command: {:?}", other),
            }
            assert!(cli.validate().is_ok());
        }

        #[test]
        fn test_rejects_non_numeric_crn() {
            assert!(CliConfig::try_parse_from(["course-tracker", "status", "abc", "CSCI"]).is_err());
            assert!(CliConfig::try_parse_from(["course-tracker", "exists", "0", "CSCI"]).is_err());
        }

        #[test]
        fn test_parse_check_pairs() {
            let cli = CliConfig::try_parse_from([
                "course-tracker",
                "check",
                "12345:CSCI",
                "67890:BIOL",
                "--json",
            ])
            .unwrap();
            assert!(cli.json);
            match cli.command {
                Command::Check { courses } => {
                    assert_eq!(courses.len(), 2);
                    assert_eq!(courses[1].subject, "BIOL");
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }

        #[test]
        fn test_resolve_defaults_and_overrides() {
            let cli = CliConfig::try_parse_from([
                "course-tracker",
                "--term",
                "202420",
                "--timeout",
                "3",
                "exists",
                "12345",
                "CSCI",
            ])
            .unwrap();

            let config = cli.resolve().unwrap();
            assert_eq!(config.term_code(), Some("202420"));
            assert_eq!(config.timeout_secs(), 3);
        }

        #[test]
        fn test_resolve_cli_overrides_file() {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(b"[listing]\ntimeout_seconds = 20\nterm_code = \"202310\"\n")
                .unwrap();
            let path = file.path().to_str().unwrap().to_string();

            let cli = CliConfig::try_parse_from([
                "course-tracker",
                "--config",
                path.as_str(),
                "--term",
                "202420",
                "check",
            ])
            .unwrap();

            let config = cli.resolve().unwrap();
            assert_eq!(config.timeout_secs(), 20);
            assert_eq!(config.term_code(), Some("202420"));
        }

        #[test]
        fn test_resolve_rejects_invalid_timeout() {
            let cli = CliConfig::try_parse_from([
                "course-tracker",
                "--timeout",
                "0",
                "status",
                "12345",
                "CSCI",
            ])
            .unwrap();
            assert!(cli.resolve().is_err());
        }
    }
}
