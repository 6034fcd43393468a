use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::Storage;
use crate::{catalog::Catalog, common::error::DbResult, config::Config, db::table::Row};

/// Stores the catalog and each table's rows as JSON files.
///
/// - catalog: `metadata_file`
/// - rows of table `t`: `<data_dir>/t.json`
///
/// Files are written to a sibling temp file, synced to disk and then renamed
/// into place, so a crash mid-write leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    metadata_file: PathBuf,
    data_dir: PathBuf,
}

impl JsonStorage {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(metadata_file: P, data_dir: Q) -> Self {
        Self {
            metadata_file: metadata_file.as_ref().to_path_buf(),
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.metadata_file, &config.data_dir)
    }

    fn table_path(&self, table: &str) -> io::Result<PathBuf> {
        let plain = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
        if !plain {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("table name \"{table}\" cannot be used as a file name"),
            ));
        }

        Ok(self.data_dir.join(format!("{table}.json")))
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> DbResult<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no file yet, starting empty");
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(serde_json::from_str(&content)?)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> DbResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = File::create(&tmp)?;
    file.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)?;
    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    debug!(path = %path.display(), "saved");
    Ok(())
}

impl Storage for JsonStorage {
    fn load_catalog(&self) -> DbResult<Catalog> {
        read_json(&self.metadata_file)
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> DbResult<()> {
        write_json(&self.metadata_file, catalog)
    }

    fn load_rows(&self, table: &str) -> DbResult<Vec<Row>> {
        read_json(&self.table_path(table)?)
    }

    fn save_rows(&mut self, table: &str, rows: &[Row]) -> DbResult<()> {
        write_json(&self.table_path(table)?, rows)
    }

    fn remove_rows(&mut self, table: &str) -> DbResult<()> {
        let path = self.table_path(table)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
