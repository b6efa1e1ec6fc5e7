use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Explore gross earnings per genre and year.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Dataset to open (.csv, .json or .parquet). Overrides `data_path` from the config.
    pub path: Option<PathBuf>,

    /// Read configuration from this file instead of the user config directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reload the dataset from disk on every filter change.
    #[arg(long)]
    pub no_cache: bool,

    /// Write the default config file to the user config directory and exit.
    #[arg(long)]
    pub write_default_config: bool,
}

impl Args {
    /// Fold command-line overrides into a loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.path {
            config.data_path = path.clone();
        }
        if self.no_cache {
            config.cache_dataset = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let args = Args::parse_from(["genre-explorer", "other.parquet", "--no-cache"]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.data_path, PathBuf::from("other.parquet"));
        assert!(!config.cache_dataset);
    }

    #[test]
    fn test_no_args_keep_config() {
        let args = Args::parse_from(["genre-explorer"]);
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
