//! Target lookup over the File API reply.

use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    fileapi::{FileApiClient, TargetType},
};

pub struct TargetCatalog<'a> {
    client: &'a FileApiClient,
}

impl<'a> TargetCatalog<'a> {
    pub fn new(client: &'a FileApiClient) -> Self {
        Self { client }
    }

    /// Target names in codemodel order, without CMake's generated helpers.
    pub fn list_target_names(&self, build_dir: &Path) -> Result<Vec<String>> {
        let marker = self.client.protocol().helper_marker();
        let index = self.client.read_reply_index(&self.client.reply_dir(build_dir))?;

        Ok(index
            .targets
            .into_iter()
            .filter(|target| !target.name.contains(marker))
            .map(|target| target.name)
            .collect())
    }

    /// Path of the first artifact of executable target `name`. Relative
    /// artifact paths are relative to the build directory.
    pub fn resolve_executable_path(&self, build_dir: &Path, name: &str) -> Result<PathBuf> {
        let reply_dir = self.client.reply_dir(build_dir);
        let index = self.client.read_reply_index(&reply_dir)?;

        let marker = self.client.protocol().helper_marker();
        let Some(descriptor) = index
            .targets
            .iter()
            .filter(|target| !target.name.contains(marker))
            .find(|target| target.name == name)
        else {
            return Err(Error::TargetNotFound(name.to_string()));
        };

        let info = self.client.read_target_info(descriptor, &reply_dir)?;
        if info.kind != TargetType::Executable {
            return Err(Error::NotExecutable {
                name: name.to_string(),
                kind: info.kind.as_str().to_string(),
            });
        }

        let Some(artifact) = info.artifacts.first() else {
            return Err(Error::NoArtifacts { name: name.to_string() });
        };

        let path = PathBuf::from(&artifact.path);
        Ok(if path.is_absolute() { path } else { build_dir.join(path) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_reply;
    use crate::ErrorClass;

    #[test]
    fn list_skips_generated_helpers_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        write_reply(
            dir.path(),
            &[
                ("app", "EXECUTABLE", Some("app")),
                ("app_autogen", "UTILITY", None),
                ("util_autogen/impl", "UTILITY", None),
                ("tests", "EXECUTABLE", Some("tests")),
            ],
        );
        let client = FileApiClient::default();

        let names = TargetCatalog::new(&client).list_target_names(dir.path()).unwrap();
        assert_eq!(names, ["app", "tests"]);
    }

    #[test]
    fn relative_artifact_is_joined_onto_build_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_reply(dir.path(), &[("app", "EXECUTABLE", Some("bin/app"))]);
        let client = FileApiClient::default();

        let path = TargetCatalog::new(&client).resolve_executable_path(dir.path(), "app").unwrap();
        assert_eq!(path, dir.path().join("bin/app"));
    }

    #[test]
    fn absolute_artifact_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        write_reply(dir.path(), &[("app", "EXECUTABLE", Some("/opt/app"))]);
        let client = FileApiClient::default();

        let path = TargetCatalog::new(&client).resolve_executable_path(dir.path(), "app").unwrap();
        assert_eq!(path, PathBuf::from("/opt/app"));
    }

    #[test]
    fn static_library_is_a_type_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_reply(dir.path(), &[("core", "STATIC_LIBRARY", Some("libcore.a"))]);
        let client = FileApiClient::default();

        let err = TargetCatalog::new(&client).resolve_executable_path(dir.path(), "core").unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeMismatch);
        assert!(err.to_string().contains("STATIC_LIBRARY"));
    }

    #[test]
    fn generated_helpers_are_never_resolved() {
        let dir = tempfile::tempdir().unwrap();
        write_reply(dir.path(), &[("app_autogen", "EXECUTABLE", Some("app_autogen"))]);
        let client = FileApiClient::default();

        let err = TargetCatalog::new(&client)
            .resolve_executable_path(dir.path(), "app_autogen")
            .unwrap_err();
        assert!(matches!(err, Error::TargetNotFound(_)));
    }

    #[test]
    fn unknown_target_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_reply(dir.path(), &[("app", "EXECUTABLE", Some("app"))]);
        let client = FileApiClient::default();

        let err = TargetCatalog::new(&client).resolve_executable_path(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, Error::TargetNotFound(name) if name == "nope"));
    }
}
