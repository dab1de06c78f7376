//! Build directory template expansion.
//!
//! Templates may contain `{cwd}`, `{os}` and `{build_type}` anywhere and any
//! number of times. The result is not validated; a malformed path fails later
//! when a task touches it.

use std::path::PathBuf;

use crate::config::{BuildType, Context};

pub const CWD_PLACEHOLDER: &str = "{cwd}";
pub const OS_PLACEHOLDER: &str = "{os}";
pub const BUILD_TYPE_PLACEHOLDER: &str = "{build_type}";

/// Expands every placeholder in `template`. A relative result is anchored at
/// the context's working directory.
pub fn resolve(template: &str, build_type: BuildType, ctx: &Context) -> PathBuf {
    let cwd = ctx.cwd.to_string_lossy();
    let placeholders = [
        (CWD_PLACEHOLDER, cwd.as_ref()),
        (OS_PLACEHOLDER, ctx.os.as_str()),
        (BUILD_TYPE_PLACEHOLDER, build_type.as_str()),
    ];

    // single pass, substituted values are never expanded again
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    while !rest.is_empty() {
        match placeholders.iter().find(|(key, _)| rest.starts_with(key)) {
            Some((key, value)) => {
                expanded.push_str(value);
                rest = &rest[key.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    expanded.push(c);
                }
                rest = chars.as_str();
            }
        }
    }

    let path = PathBuf::from(expanded);
    let path = if path.is_absolute() { path } else { ctx.cwd.join(path) };
    tracing::debug!("resolved build dir template {:?} to {:?}", template, path);
    path
}
