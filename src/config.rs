use std::{fmt, path::{Path, PathBuf}, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "cmake-tasks.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildType {
    #[default]
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }

    /// Only these two keep debug info in the artifacts.
    pub fn is_debuggable(&self) -> bool {
        matches!(self, BuildType::Debug | BuildType::RelWithDebInfo)
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Debug" => Ok(BuildType::Debug),
            "Release" => Ok(BuildType::Release),
            "RelWithDebInfo" => Ok(BuildType::RelWithDebInfo),
            "MinSizeRel" => Ok(BuildType::MinSizeRel),
            other => Err(Error::ConfigState(format!("unknown build type `{other}`"))),
        }
    }
}

/// Per-invocation settings shared by every task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build directory template, see [`crate::path::resolve`].
    pub build_dir: String,
    #[serde(default)]
    pub build_type: BuildType,
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_conan")]
    pub conan: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub dap_name: Option<String>,
}

impl BuildConfig {
    pub fn new<T>(build_dir: T, build_type: BuildType) -> Self
    where
        T: Into<String>, {
        Self {
            build_dir: build_dir.into(),
            build_type,
            command: default_command(),
            conan: default_conan(),
            target: None,
            dap_name: None,
        }
    }

    pub fn set_target<T>(mut self, target: T) -> Self
    where
        T: Into<String>, {
        self.target = Some(target.into());
        self
    }

    pub fn set_dap_name<T>(mut self, name: T) -> Self
    where
        T: Into<String>, {
        self.dap_name = Some(name.into());
        self
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: BuildConfig =
            serde_json::from_str(&content).map_err(|e| Error::parse(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.build_dir.trim().is_empty() {
            return Err(Error::ConfigState("build_dir must not be empty".into()));
        }
        if self.command.trim().is_empty() {
            return Err(Error::ConfigState("command must not be empty".into()));
        }
        Ok(())
    }
}

fn default_command() -> String {
    "cmake".to_string()
}

fn default_conan() -> String {
    "conan".to_string()
}

/// Working directory and host OS of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub cwd: PathBuf,
    pub os: String,
}

impl Context {
    pub fn new<P, S>(cwd: P, os: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>, {
        Self {
            cwd: cwd.into(),
            os: os.into().to_lowercase(),
        }
    }

    pub fn current() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
        Ok(Self::new(cwd, std::env::consts::OS))
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: BuildConfig = serde_json::from_str(r#"{ "build_dir": "{cwd}/build" }"#).unwrap();
        assert_eq!(config.build_type, BuildType::Debug);
        assert_eq!(config.command, "cmake");
        assert_eq!(config.conan, "conan");
        assert_eq!(config.target, None);
    }

    #[test]
    fn config_rejects_unknown_build_type() {
        let result: std::result::Result<BuildConfig, _> =
            serde_json::from_str(r#"{ "build_dir": "b", "build_type": "Fast" }"#);
        assert!(result.is_err());
        assert!("Fast".parse::<BuildType>().is_err());
        assert_eq!("RelWithDebInfo".parse::<BuildType>().unwrap(), BuildType::RelWithDebInfo);
    }

    #[test]
    fn validate_rejects_empty_template() {
        let config = BuildConfig::new("  ", BuildType::Release);
        let err = config.validate().unwrap_err();
        assert_eq!(err.class(), crate::ErrorClass::ConfigState);
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "build_dir": "out", "build_type": "Release", "target": "app", "dap_name": "lldb" }"#,
        )
        .unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.build_type, BuildType::Release);
        assert_eq!(config.target.as_deref(), Some("app"));
        assert_eq!(config.dap_name.as_deref(), Some("lldb"));
    }

    #[test]
    fn debuggable_build_types() {
        assert!(BuildType::Debug.is_debuggable());
        assert!(BuildType::RelWithDebInfo.is_debuggable());
        assert!(!BuildType::Release.is_debuggable());
        assert!(!BuildType::MinSizeRel.is_debuggable());
    }

    #[test]
    fn context_lowercases_os() {
        let ctx = Context::new("/repo", "Windows");
        assert!(ctx.is_windows());
    }
}
