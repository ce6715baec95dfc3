//! Search configuration.
//!
//! A configuration file is a CSV with a header row and one data row:
//!
//! ```text
//! depth,parallel_depth,num_threads,pruning
//! 6,1,4,true
//! ```
//!
//! Missing columns take their default value.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Deepest search accepted by `SearchConfig::validate`.
pub const MAX_DEPTH: i32 = 12;

/// Largest worker pool accepted by `SearchConfig::validate`.
pub const MAX_THREADS: usize = 256;

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be opened or is not a valid configuration CSV
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Search settings of a `SearchEngine`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched from the root
    pub depth: i32,
    /// Plies below the root whose children run in parallel
    pub parallel_depth: u32,
    /// Worker threads, 0 lets rayon pick
    pub num_threads: usize,
    /// Alpha-beta pruning; the chosen move and score do not change
    pub pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            parallel_depth: 1,
            num_threads: 0,
            pruning: false,
        }
    }
}

impl SearchConfig {
    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` when the depth is below 1 or above `MAX_DEPTH`,
    /// the parallel depth exceeds the depth, or the thread count exceeds
    /// `MAX_THREADS`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DEPTH).contains(&self.depth) {
            return Err(ConfigError::Invalid(format!(
                "depth must be in 1..={}, got {}",
                MAX_DEPTH, self.depth
            )));
        }
        if self.parallel_depth as i64 > self.depth as i64 {
            return Err(ConfigError::Invalid(format!(
                "parallel_depth {} exceeds depth {}",
                self.parallel_depth, self.depth
            )));
        }
        if self.num_threads > MAX_THREADS {
            return Err(ConfigError::Invalid(format!(
                "num_threads must be at most {}, got {}",
                MAX_THREADS, self.num_threads
            )));
        }
        Ok(())
    }
}

/// Loads and validates a configuration file.
///
/// A file with a header but no data row yields the default configuration.
///
/// # Errors
///
/// I/O, CSV and validation failures.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SearchConfig, ConfigError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let config = match reader.deserialize::<SearchConfig>().next() {
        Some(record) => record?,
        None => {
            log::warn!(
                "No configuration row in {}, using defaults",
                path.display()
            );
            SearchConfig::default()
        }
    };

    config.validate()?;
    log::debug!("Loaded {:?} from {}", config, path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_full_row() {
        let file = write_config("depth,parallel_depth,num_threads,pruning\n6,2,4,true\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(
            config,
            SearchConfig {
                depth: 6,
                parallel_depth: 2,
                num_threads: 4,
                pruning: true,
            }
        );
    }

    #[test]
    fn test_missing_columns_use_defaults() {
        let file = write_config("depth\n3\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.depth, 3);
        assert_eq!(config.parallel_depth, 1);
        assert!(!config.pruning);
    }

    #[test]
    fn test_header_only_gives_defaults() {
        let file = write_config("depth,parallel_depth\n");
        assert_eq!(load_config(file.path()).unwrap(), SearchConfig::default());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let file = write_config("depth,parallel_depth\n13,0\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));

        let config = SearchConfig {
            depth: 2,
            parallel_depth: 3,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = SearchConfig {
            num_threads: MAX_THREADS + 1,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_depth() {
        // A depth-0 engine never proposes a move
        let config = SearchConfig {
            depth: 0,
            parallel_depth: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let file = write_config("depth,parallel_depth\n0,0\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));

        let config = SearchConfig {
            depth: 1,
            parallel_depth: 0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_values() {
        let file = write_config("depth,pruning\nsix,maybe\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Csv(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/sandwich/search.csv");
        assert!(matches!(result, Err(ConfigError::Csv(_))));
    }
}
