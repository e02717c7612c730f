// CLI module for argument parsing and configuration

use crate::domain::{normalize_extension, TriageConfig, DEFAULT_ARCHIVE_DIR, DEFAULT_EXTENSIONS};
use clap::{ArgAction, Parser};
use std::path::{Component, Path, PathBuf};

/// Nweat - sort a folder of photos and videos from the terminal
///
/// Go through the media files of a directory one at a time: archive them,
/// skip them, or move them into a sub-folder.
#[derive(Parser, Debug, Clone)]
#[command(name = "nweat")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to triage
    ///
    /// If not specified, the directory opened last time is used.
    pub directory: Option<PathBuf>,

    /// Name of the archive sub-directory
    #[arg(long = "archive-name", default_value = DEFAULT_ARCHIVE_DIR)]
    pub archive_name: String,

    /// Media file extension(s) to include
    ///
    /// Can be specified multiple times. Replaces the default list.
    /// Example: -e jpg -e mp4
    #[arg(short = 'e', long = "ext")]
    pub extensions: Vec<String>,

    /// Include hidden files and folders (names starting with .)
    #[arg(long = "hidden", action = ArgAction::SetTrue)]
    pub show_hidden: bool,

    /// Neither reopen nor remember the last directory
    #[arg(long = "forget", action = ArgAction::SetTrue)]
    pub forget: bool,

    /// Write logs to this file instead of the default location
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Extensions to scan for, falling back to the built-in list
    pub fn get_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            self.extensions
                .iter()
                .map(|e| normalize_extension(e))
                .filter(|e| !e.is_empty())
                .collect()
        }
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref directory) = self.directory {
            if !directory.exists() {
                return Err(format!(
                    "Directory does not exist: {}",
                    directory.display()
                ));
            }

            if !directory.is_dir() {
                return Err(format!(
                    "Path is not a directory: {}",
                    directory.display()
                ));
            }
        }

        if !self.extensions.is_empty() && self.get_extensions().is_empty() {
            return Err("No usable extension given to --ext".to_string());
        }

        if !is_single_component(&self.archive_name) {
            return Err(format!(
                "Invalid archive name: '{}'. Use a plain folder name like 'Archived'",
                self.archive_name
            ));
        }

        Ok(())
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: Option<PathBuf>,
    pub triage: TriageConfig,
    pub remember_root: bool,
    pub log_file: Option<PathBuf>,
    pub verbosity: u8,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        let triage = TriageConfig {
            archive_dir_name: args.archive_name.clone(),
            include_hidden: args.show_hidden,
            ..TriageConfig::default()
        }
        .with_extensions(args.get_extensions());

        AppConfig {
            directory: args.directory,
            triage,
            remember_root: !args.forget,
            log_file: args.log_file,
            verbosity: args.verbose,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: None,
            triage: TriageConfig::default(),
            remember_root: true,
            log_file: None,
            verbosity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            directory: None,
            archive_name: DEFAULT_ARCHIVE_DIR.to_string(),
            extensions: vec![],
            show_hidden: false,
            forget: false,
            log_file: None,
            verbose: 0,
        }
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_parse_defaults() {
            let parsed = Args::try_parse_from(["nweat"]).unwrap();

            assert!(parsed.directory.is_none());
            assert_eq!(parsed.archive_name, "Archived");
            assert!(parsed.extensions.is_empty());
            assert!(!parsed.show_hidden);
            assert!(!parsed.forget);
            assert_eq!(parsed.verbose, 0);
        }

        #[test]
        fn test_parse_all_flags() {
            let parsed = Args::try_parse_from([
                "nweat",
                "/photos",
                "--archive-name",
                "Old",
                "-e",
                "jpg",
                "--ext",
                ".PNG",
                "--hidden",
                "--forget",
                "--log-file",
                "/tmp/nweat.log",
                "-vv",
            ])
            .unwrap();

            assert_eq!(parsed.directory, Some(PathBuf::from("/photos")));
            assert_eq!(parsed.archive_name, "Old");
            assert_eq!(parsed.get_extensions(), vec!["jpg", "png"]);
            assert!(parsed.show_hidden);
            assert!(parsed.forget);
            assert_eq!(parsed.log_file, Some(PathBuf::from("/tmp/nweat.log")));
            assert_eq!(parsed.verbose, 2);
        }

        #[test]
        fn test_get_extensions_default() {
            let extensions = args().get_extensions();
            assert_eq!(extensions.len(), DEFAULT_EXTENSIONS.len());
            assert!(extensions.contains(&"heic".to_string()));
        }

        #[test]
        fn test_args_validate_no_directory() {
            assert!(args().validate().is_ok());
        }

        #[test]
        fn test_args_validate_nonexistent_directory() {
            let args = Args {
                directory: Some(PathBuf::from("/nonexistent/path/12345")),
                ..args()
            };

            let result = args.validate();
            assert!(result.is_err());
            assert!(result.unwrap_err().contains("does not exist"));
        }

        #[test]
        fn test_args_validate_not_a_directory() {
            let temp_dir = tempfile::TempDir::new().unwrap();
            let file = temp_dir.path().join("photo.jpg");
            std::fs::write(&file, b"x").unwrap();

            let args = Args {
                directory: Some(file),
                ..args()
            };

            assert!(args.validate().unwrap_err().contains("not a directory"));
        }

        #[test]
        fn test_args_validate_empty_extensions() {
            let args = Args {
                extensions: vec![".".to_string(), "".to_string()],
                ..args()
            };

            assert!(args.validate().unwrap_err().contains("--ext"));
        }

        #[test]
        fn test_args_validate_archive_name() {
            for bad in ["", ".", "..", "a/b", "../Archived"] {
                let args = Args {
                    archive_name: bad.to_string(),
                    ..args()
                };
                assert!(args.validate().is_err(), "accepted {:?}", bad);
            }

            let args = Args {
                archive_name: "Trash".to_string(),
                ..args()
            };
            assert!(args.validate().is_ok());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_app_config_from_args() {
            let args = Args {
                directory: Some(PathBuf::from("/test/path")),
                archive_name: "Old".to_string(),
                extensions: vec!["JPG".to_string()],
                show_hidden: true,
                forget: true,
                log_file: None,
                verbose: 1,
            };

            let config: AppConfig = args.into();

            assert_eq!(config.directory, Some(PathBuf::from("/test/path")));
            assert_eq!(config.triage.archive_dir_name, "Old");
            assert_eq!(config.triage.extensions, vec!["jpg"]);
            assert!(config.triage.include_hidden);
            assert!(!config.remember_root);
            assert_eq!(config.verbosity, 1);
        }

        #[test]
        fn test_app_config_default() {
            let config = AppConfig::default();

            assert!(config.directory.is_none());
            assert_eq!(config.triage, TriageConfig::default());
            assert!(config.remember_root);
            assert!(config.log_file.is_none());
        }
    }
}
