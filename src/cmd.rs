use std::path::PathBuf;

use serde::Serialize;

use crate::{compdb::CompileCommandsSync, error::Result, host::Notifier};

/// Action the host runs after a command exits successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AfterSuccess {
    Notify { message: String },
    SyncCompileCommands(CompileCommandsSync),
}

impl AfterSuccess {
    pub fn run(&self, notifier: &dyn Notifier) -> Result<()> {
        match self {
            AfterSuccess::Notify { message } => notifier.info(message),
            AfterSuccess::SyncCompileCommands(sync) => {
                sync.run()?;
            }
        }
        Ok(())
    }
}

/// A process for the host to run. Built fresh for every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub cmd: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_success: Option<AfterSuccess>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dap_name: Option<String>,
    pub ignore_stdout: bool,
    pub ignore_stderr: bool,
}

impl Command {
    pub fn new<T>(cmd: T) -> Self
    where
        T: Into<String>, {
        Self {
            cmd: cmd.into(),
            args: Vec::new(),
            cwd: None,
            after_success: None,
            dap_name: None,
            ignore_stdout: false,
            ignore_stderr: false,
        }
    }

    pub fn add_arg<T>(mut self, arg: T) -> Self
    where
        T: Into<String>, {
        self.args.push(arg.into());
        self
    }

    pub fn add_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>, {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn set_cwd<T>(mut self, cwd: T) -> Self
    where
        T: Into<PathBuf>, {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn set_after_success(mut self, action: AfterSuccess) -> Self {
        self.after_success = Some(action);
        self
    }

    pub fn set_dap_name<T>(mut self, name: T) -> Self
    where
        T: Into<String>, {
        self.dap_name = Some(name.into());
        self
    }

    /// Discard both output streams.
    pub fn quiet(mut self) -> Self {
        self.ignore_stdout = true;
        self.ignore_stderr = true;
        self
    }

    /// Whether `cmd` can be found on `PATH` (or is an existing path).
    pub fn is_available(&self) -> bool {
        which::which(&self.cmd).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Notifier for Recorder {
        fn info(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }

        fn error(&self, _message: &str) {}
    }

    #[test]
    fn builder_collects_arguments() {
        let cmd = Command::new("cmake")
            .add_arg("--build")
            .add_args(["build", "--target", "app"])
            .set_cwd("/repo");

        assert_eq!(cmd.args, ["--build", "build", "--target", "app"]);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/repo")));
        assert!(!cmd.ignore_stdout);
    }

    #[test]
    fn serializes_hook_as_data() {
        let cmd = Command::new("conan").quiet().set_after_success(AfterSuccess::Notify {
            message: "done".into(),
        });

        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["after_success"]["action"], "notify");
        assert_eq!(value["ignore_stderr"], true);
        assert!(value.get("cwd").is_none());
    }

    #[test]
    fn notify_hook_reaches_notifier() {
        let recorder = Recorder::default();
        AfterSuccess::Notify { message: "installed".into() }.run(&recorder).unwrap();
        assert_eq!(*recorder.0.borrow(), ["installed"]);
    }
}
