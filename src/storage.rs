use crate::schedule::{SchedError, Schedule};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un horaire depuis un support.
    fn load(&self) -> Result<Schedule, SchedError>;
    /// Sauvegarde de manière atomique.
    fn save(&self, schedule: &Schedule) -> Result<(), SchedError>;
}

/// Horaire persisté en JSON. Les drapeaux de conflit ne sont pas stockés :
/// recalculer après `load`.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, source: io::Error) -> SchedError {
        SchedError::CouldNotReadFile {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> SchedError {
        SchedError::CouldNotWriteFile {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> Result<Schedule, SchedError> {
        let data = fs::read(&self.path).map_err(|e| self.read_error(e))?;
        let schedule: Schedule =
            serde_json::from_slice(&data).map_err(|e| self.read_error(e.into()))?;
        tracing::debug!(path = %self.path.display(), "schedule loaded");
        Ok(schedule)
    }

    fn save(&self, schedule: &Schedule) -> Result<(), SchedError> {
        let json = serde_json::to_vec_pretty(schedule).map_err(|e| self.write_error(e.into()))?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(&json).map_err(|e| self.write_error(e))?;
        tmp.flush().map_err(|e| self.write_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;
        tracing::debug!(path = %self.path.display(), "schedule saved");
        Ok(())
    }
}
