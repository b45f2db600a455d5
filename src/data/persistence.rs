use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Set once at startup by main() from the --data-dir argument.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Call this from main() before any load/save operations.
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }
    // Fallback when running tests or if set_data_dir was not called
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join("config"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    fn parse<T: for<'de> Deserialize<'de>>(self, contents: &str, path: &Path) -> Result<T> {
        match self {
            FileFormat::Json => serde_json::from_str(contents)
                .with_context(|| format!("failed to parse JSON from {}", path.display())),
            FileFormat::Yaml => serde_norway::from_str(contents)
                .with_context(|| format!("failed to parse YAML from {}", path.display())),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            FileFormat::Json => {
                serde_json::to_string_pretty(value).context("failed to serialize JSON")
            }
            FileFormat::Yaml => serde_norway::to_string(value).context("failed to serialize YAML"),
        }
    }
}

/// A data file living in the data directory. Missing files load as
/// `Default`.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;
    fn format() -> FileFormat;

    fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    fn save(&self) -> Result<()> {
        self.save_to(&get_data_dir()?)
    }

    /// Load from an explicit directory, bypassing the global `DATA_DIR`.
    fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::filename());
        if !path.exists() {
            debug!(path = %path.display(), "data file missing, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::format().parse(&contents, &path)
    }

    /// Save to an explicit directory, bypassing the global `DATA_DIR`.
    fn save_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create dir {}", dir.display()))?;
        let path = dir.join(Self::filename());
        let contents = Self::format().render(self)?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "saved data file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct TestJsonData {
        value: String,
    }

    impl Persistable for TestJsonData {
        fn filename() -> &'static str {
            "test_data.json"
        }
        fn format() -> FileFormat {
            FileFormat::Json
        }
    }

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct TestYamlData {
        count: u32,
    }

    impl Persistable for TestYamlData {
        fn filename() -> &'static str {
            "test_data.yaml"
        }
        fn format() -> FileFormat {
            FileFormat::Yaml
        }
    }

    #[test]
    fn test_get_data_dir_returns_a_path() {
        assert!(get_data_dir().is_ok());
    }

    #[test]
    fn test_json_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let data = TestJsonData {
            value: "hello".to_string(),
        };
        data.save_to(tmp.path()).unwrap();
        assert!(tmp.path().join("test_data.json").exists());
        let loaded = TestJsonData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_yaml_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        TestYamlData { count: 7 }.save_to(tmp.path()).unwrap();
        let loaded = TestYamlData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.count, 7);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let loaded = TestJsonData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded, TestJsonData::default());
    }

    #[test]
    fn test_load_malformed_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test_data.json");
        fs::write(&path, "{ not json").unwrap();
        let err = TestJsonData::load_from(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse JSON"));
        assert!(err.to_string().contains("test_data.json"));
    }

    #[test]
    fn test_save_to_creates_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        TestYamlData { count: 1 }.save_to(&nested).unwrap();
        assert!(nested.join("test_data.yaml").exists());
    }
}
