//! Conan integration.
//!
//! Everything here is inert unless a Conan manifest sits in the working
//! directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{
    cmake::{find_presets_files, CMakePresets, PresetPhase},
    error::{Error, Result},
    host::Prompter,
};

/// File names a dependency manager generates or reads.
pub trait ManifestLayout {
    fn manifest_names(&self) -> &[&str];
    /// Key under `vendor` in the presets files it generates.
    fn vendor_tag(&self) -> &str;
    fn toolchain_file_name(&self) -> &str;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Conan2;

impl ManifestLayout for Conan2 {
    fn manifest_names(&self) -> &[&str] {
        &["conanfile.txt", "conanfile.py"]
    }

    fn vendor_tag(&self) -> &str {
        "conan"
    }

    fn toolchain_file_name(&self) -> &str {
        "conan_toolchain.cmake"
    }
}

pub struct DependencyResolver<'a> {
    layout: Box<dyn ManifestLayout>,
    prompter: &'a dyn Prompter,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self::with_layout(Conan2, prompter)
    }

    pub fn with_layout<L>(layout: L, prompter: &'a dyn Prompter) -> Self
    where
        L: ManifestLayout + 'static, {
        Self {
            layout: Box::new(layout),
            prompter,
        }
    }

    pub fn manifest_present(&self, working_dir: &Path) -> bool {
        self.layout
            .manifest_names()
            .iter()
            .any(|name| working_dir.join(name).is_file())
    }

    /// Preset name for `phase` from the vendor-tagged presets file in
    /// `build_dir`. `None` when there is no such file or the phase has no
    /// presets; several presets are offered to the prompter.
    pub fn presets_for_phase(&self, build_dir: &Path, phase: PresetPhase) -> Result<Option<String>> {
        let Some(presets) = self.vendor_presets(build_dir)? else {
            tracing::debug!("no {} presets in {:?}", self.layout.vendor_tag(), build_dir);
            return Ok(None);
        };

        let names: Vec<String> = presets
            .visible(phase)
            .into_iter()
            .map(|p| p.get_name().to_string())
            .collect();

        match names.len() {
            0 => Ok(None),
            1 => Ok(names.into_iter().next()),
            _ => {
                let prompt = format!("Select {} preset", phase.as_str());
                match self.prompter.select(&prompt, &names) {
                    Some(choice) if names.contains(&choice) => {
                        tracing::info!("selected {} preset {}", phase.as_str(), choice);
                        Ok(Some(choice))
                    }
                    _ => Err(Error::UserInput(format!(
                        "no {} preset selected out of {}",
                        phase.as_str(),
                        names.join(", ")
                    ))),
                }
            }
        }
    }

    /// Heuristic only: a non-empty build directory is taken to mean the
    /// dependencies were installed into it. A stale build tree reads as
    /// installed, and dependencies installed elsewhere read as missing.
    pub fn dependencies_installed_hint(&self, build_dir: &Path) -> bool {
        std::fs::read_dir(build_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// First toolchain file anywhere under `build_dir`.
    pub fn find_toolchain_file(&self, build_dir: &Path) -> Option<PathBuf> {
        let name = self.layout.toolchain_file_name();
        WalkDir::new(build_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
            .map(|entry| entry.into_path())
    }

    fn vendor_presets(&self, build_dir: &Path) -> Result<Option<CMakePresets>> {
        for path in find_presets_files(build_dir)? {
            let presets = CMakePresets::new(&path)?;
            if presets.has_vendor(self.layout.vendor_tag()) {
                tracing::debug!("using presets from {:?}", path);
                return Ok(Some(presets));
            }
        }
        Ok(None)
    }
}
