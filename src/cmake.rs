use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Phase a preset applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetPhase {
    Configure,
    Build,
    Test,
}

impl PresetPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetPhase::Configure => "configure",
            PresetPhase::Build => "build",
            PresetPhase::Test => "test",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CMakePreset {
    name: String,
    #[serde(default = "default_hidden")]
    hidden: bool,
}

impl CMakePreset {
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CMakePresets {
    #[serde(default)]
    vendor: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    configure_presets: Vec<CMakePreset>,
    #[serde(default)]
    build_presets: Vec<CMakePreset>,
    #[serde(default)]
    test_presets: Vec<CMakePreset>,
}

impl CMakePresets {
    pub fn new<T>(path: T) -> Result<Self>
    where
        T: Into<PathBuf>, {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        serde_json::from_str(&content).map_err(|e| Error::parse(&path, e))
    }

    pub fn has_vendor(&self, tag: &str) -> bool {
        self.vendor.as_ref().is_some_and(|vendor| vendor.contains_key(tag))
    }

    /// Non-hidden presets of one phase, in file order.
    pub fn visible(&self, phase: PresetPhase) -> Vec<&CMakePreset> {
        let presets = match phase {
            PresetPhase::Configure => &self.configure_presets,
            PresetPhase::Build => &self.build_presets,
            PresetPhase::Test => &self.test_presets,
        };
        presets.iter().filter(|p| !p.hidden).collect()
    }
}

/// Presets files directly inside `dir`, sorted by file name.
pub fn find_presets_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with("CMakePresets.json"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn default_hidden() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: &str = r#"{
        "version": 3,
        "vendor": { "conan": {} },
        "configurePresets": [
            { "name": "base", "hidden": true },
            { "name": "conan-release" }
        ],
        "buildPresets": [{ "name": "conan-release" }]
    }"#;

    #[test]
    fn get_cmake_presets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CMakePresets.json");
        std::fs::write(&path, PRESETS).unwrap();

        let presets = CMakePresets::new(&path).unwrap();
        let build = presets.visible(PresetPhase::Build);
        assert_eq!(build.len(), 1);
        assert_eq!(build[0].get_name(), "conan-release");
        assert!(presets.has_vendor("conan"));
        assert!(!presets.has_vendor("vcpkg"));
    }

    #[test]
    fn missing_presets_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CMakePresets::new(dir.path().join("CMakePresets.json")).unwrap_err();
        assert_eq!(err.class(), crate::ErrorClass::Io);
    }

    #[test]
    fn hidden_presets_are_not_visible() {
        let presets: CMakePresets = serde_json::from_str(PRESETS).unwrap();
        let names: Vec<_> = presets.visible(PresetPhase::Configure).iter().map(|p| p.get_name()).collect();
        assert_eq!(names, ["conan-release"]);
        assert!(presets.visible(PresetPhase::Test).is_empty());
    }

    #[test]
    fn finds_presets_files_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CMakeUserPresets.json"), "{}").unwrap();
        std::fs::write(dir.path().join("CMakePresets.json"), "{}").unwrap();
        std::fs::write(dir.path().join("presets.json"), "{}").unwrap();

        let files = find_presets_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
        assert_eq!(names, ["CMakePresets.json", "CMakeUserPresets.json"]);
    }
}
