//! CMake File API client.
//!
//! A query marker written before configure asks CMake to emit a codemodel
//! reply. The reply is only read after a configure has run.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{Error, Result};

/// On-disk naming of one File API version.
pub trait FileApiProtocol {
    fn query_dir(&self, build_dir: &Path) -> PathBuf;
    fn reply_dir(&self, build_dir: &Path) -> PathBuf;
    /// File name whose existence requests the codemodel.
    fn query_marker(&self) -> &str;
    /// Prefix of the codemodel index file in the reply directory.
    fn index_prefix(&self) -> &str;
    /// Substring marking helper targets generated by CMake itself.
    fn helper_marker(&self) -> &str;
}

/// `.cmake/api/v1` with codemodel version 2.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodemodelV2;

impl FileApiProtocol for CodemodelV2 {
    fn query_dir(&self, build_dir: &Path) -> PathBuf {
        build_dir.join(".cmake").join("api").join("v1").join("query")
    }

    fn reply_dir(&self, build_dir: &Path) -> PathBuf {
        build_dir.join(".cmake").join("api").join("v1").join("reply")
    }

    fn query_marker(&self) -> &str {
        "codemodel-v2"
    }

    fn index_prefix(&self) -> &str {
        "codemodel"
    }

    fn helper_marker(&self) -> &str {
        "_autogen"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetDescriptor {
    pub name: String,
    #[serde(rename = "jsonFile")]
    pub json_file: String,
}

#[derive(Deserialize)]
struct Codemodel {
    #[serde(default)]
    configurations: Vec<Configuration>,
}

#[derive(Deserialize)]
struct Configuration {
    #[serde(default)]
    targets: Vec<TargetDescriptor>,
}

/// Targets of the first configuration in the codemodel, in CMake's order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplyIndex {
    pub targets: Vec<TargetDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Executable,
    StaticLibrary,
    SharedLibrary,
    ModuleLibrary,
    ObjectLibrary,
    InterfaceLibrary,
    Utility,
    #[serde(other)]
    Other,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Executable => "EXECUTABLE",
            TargetType::StaticLibrary => "STATIC_LIBRARY",
            TargetType::SharedLibrary => "SHARED_LIBRARY",
            TargetType::ModuleLibrary => "MODULE_LIBRARY",
            TargetType::ObjectLibrary => "OBJECT_LIBRARY",
            TargetType::InterfaceLibrary => "INTERFACE_LIBRARY",
            TargetType::Utility => "UTILITY",
            TargetType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TargetType,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

pub struct FileApiClient {
    protocol: Box<dyn FileApiProtocol>,
}

impl Default for FileApiClient {
    fn default() -> Self {
        Self::new(CodemodelV2)
    }
}

impl FileApiClient {
    pub fn new<P>(protocol: P) -> Self
    where
        P: FileApiProtocol + 'static, {
        Self { protocol: Box::new(protocol) }
    }

    pub fn protocol(&self) -> &dyn FileApiProtocol {
        self.protocol.as_ref()
    }

    pub fn reply_dir(&self, build_dir: &Path) -> PathBuf {
        self.protocol.reply_dir(build_dir)
    }

    /// Creates the codemodel query marker. Safe to call repeatedly.
    pub fn ensure_query(&self, build_dir: &Path) -> Result<PathBuf> {
        let query_dir = self.protocol.query_dir(build_dir);
        std::fs::create_dir_all(&query_dir).map_err(|e| Error::io(&query_dir, e))?;

        let marker = query_dir.join(self.protocol.query_marker());
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&marker)
            .map_err(|e| Error::io(&marker, e))?;

        tracing::debug!("file api query marker at {:?}", marker);
        Ok(marker)
    }

    /// Parses the codemodel index. Reply files are scanned in name order and
    /// the first one with the codemodel prefix is used.
    pub fn read_reply_index(&self, reply_dir: &Path) -> Result<ReplyIndex> {
        let entries = match std::fs::read_dir(reply_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ReplyNotFound(reply_dir.to_path_buf()));
            }
            Err(e) => return Err(Error::io(reply_dir, e)),
        };

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| {
                        name.starts_with(self.protocol.index_prefix()) && name.ends_with(".json")
                    })
            })
            .collect();
        candidates.sort();

        let Some(index_path) = candidates.into_iter().next() else {
            return Err(Error::ReplyNotFound(reply_dir.to_path_buf()));
        };

        let content = std::fs::read_to_string(&index_path).map_err(|e| Error::io(&index_path, e))?;
        let codemodel: Codemodel =
            serde_json::from_str(&content).map_err(|e| Error::parse(&index_path, e))?;

        let targets = codemodel
            .configurations
            .into_iter()
            .next()
            .map(|configuration| configuration.targets)
            .unwrap_or_default();

        tracing::debug!("{} targets in {:?}", targets.len(), index_path);
        Ok(ReplyIndex { targets })
    }

    pub fn read_target_info(&self, target: &TargetDescriptor, reply_dir: &Path) -> Result<TargetInfo> {
        let path = reply_dir.join(&target.json_file);
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        serde_json::from_str(&content).map_err(|e| Error::parse(&path, e))
    }
}
