//! Weight profile sources.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use align_ethics::{WeightProfile, PRESET_NAMES};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::Result;

/// Where named weight profiles come from.
pub trait WeightProfileSource: Send + Sync {
    /// Loads and validates the profile called `name`.
    fn load(&self, name: &str) -> Result<WeightProfile>;

    /// Names this source can load.
    fn names(&self) -> Result<Vec<String>>;
}

/// The built-in presets: `default`, `conservative`, `supportive`, `strict`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetSource;

impl WeightProfileSource for PresetSource {
    fn load(&self, name: &str) -> Result<WeightProfile> {
        WeightProfile::preset(name).ok_or_else(|| EngineError::ProfileNotFound(name.to_string()))
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(PRESET_NAMES.iter().map(|n| n.to_string()).collect())
    }
}

/// Profiles stored as `<dir>/<name>.json`, one key/value map per file.
///
/// ```json
/// {"awareness": 1.0, "learning": 0.8, "integrity": 1.4, "governance": 1.0, "nurturing": 1.2}
/// ```
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    /// Creates a source over `dir`. The directory is not touched until used.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && !name.contains('\0');
        if !valid {
            return Err(EngineError::ProfileNotFound(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Writes `profile` as `<dir>/<name>.json`, creating the directory.
    pub fn save(&self, name: &str, profile: &WeightProfile) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, serde_json::to_string_pretty(profile)?)?;
        info!(profile = name, path = %path.display(), "weight profile saved");
        Ok(path)
    }
}

impl WeightProfileSource for JsonDirSource {
    fn load(&self, name: &str) -> Result<WeightProfile> {
        let path = self.path_for(name)?;
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(EngineError::ProfileNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let raw: BTreeMap<String, f64> = serde_json::from_str(&json)?;
        let profile = WeightProfile::from_named(&raw)?;
        debug!(profile = name, path = %path.display(), "weight profile loaded");
        Ok(profile)
    }

    fn names(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
