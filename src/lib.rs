//! # cmake-tasks
//!
//! Builds ready-to-run command descriptors for configuring, building,
//! running, debugging and cleaning a CMake project, with optional Conan
//! dependency management.
//!
//! Nothing here spawns processes. A host asks for the command of each step
//! of a [`Task`], runs it, and on success runs its [`AfterSuccess`] hook
//! before asking for the next step.
//!
//! ```no_run
//! use cmake_tasks::{BuildConfig, BuildType, Context, Notifier, Prompter, Task, TaskBuilder};
//!
//! struct Host;
//!
//! impl Notifier for Host {
//!     fn info(&self, message: &str) { println!("{message}") }
//!     fn error(&self, message: &str) { eprintln!("{message}") }
//! }
//!
//! impl Prompter for Host {
//!     fn input(&self, _prompt: &str) -> Option<String> { Some(String::new()) }
//!     fn select(&self, _prompt: &str, items: &[String]) -> Option<String> { items.first().cloned() }
//! }
//!
//! let ctx = Context::current().unwrap();
//! let config = BuildConfig::new("{cwd}/build/{build_type}", BuildType::Debug).set_target("app");
//! let builder = TaskBuilder::new(&ctx, &Host, &Host);
//!
//! for step in Task::Run.steps() {
//!     let Some(cmd) = builder.step(*step, &config) else { break };
//!     println!("{} {:?}", cmd.cmd, cmd.args);
//! }
//! ```

pub mod cmake;
pub mod cmd;
pub mod compdb;
pub mod conan;
pub mod config;
pub mod error;
pub mod fileapi;
pub mod host;
pub mod path;
pub mod targets;
pub mod task;

#[cfg(test)]
mod test_support;

pub use cmd::{AfterSuccess, Command};
pub use config::{BuildConfig, BuildType, Context};
pub use error::{Error, ErrorClass, Result};
pub use host::{Notifier, Prompter};
pub use task::{Step, Task, TaskBuilder};
