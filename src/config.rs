use std::path::PathBuf;

/// Default directory holding one JSON file of rows per table.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default location of the catalog file.
pub const DEFAULT_METADATA_FILE: &str = "./storage/db_meta.json";

/// Runtime settings for a database and its shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory where table rows are stored.
    pub data_dir: PathBuf,

    /// File where the catalog is stored.
    pub metadata_file: PathBuf,

    /// Print how long each command took.
    pub timing: bool,

    /// Skip the confirmation prompt for drops and deletes.
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            metadata_file: PathBuf::from(DEFAULT_METADATA_FILE),
            timing: false,
            assume_yes: false,
        }
    }
}
