//! Task kinds and the commands each of their steps produces.
//!
//! A task is a fixed sequence of steps. The host asks for one step's command
//! at a time and only moves on after it succeeded, so `Run` sees the binary
//! the preceding `Build` produced.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    cmake::PresetPhase,
    cmd::{AfterSuccess, Command},
    compdb::CompileCommandsSync,
    config::{BuildConfig, Context},
    conan::DependencyResolver,
    error::{Error, Result},
    fileapi::FileApiClient,
    host::{Notifier, Prompter},
    path,
    targets::TargetCatalog,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    GetDeps,
    Configure,
    Build,
    BuildAll,
    Run,
    Debug,
    Clean,
    OpenBuildDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    InstallDeps,
    Configure,
    Build,
    BuildAll,
    Run,
    Debug,
    Clean,
    OpenBuildDir,
}

impl Task {
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Task::GetDeps => &[Step::InstallDeps],
            Task::Configure => &[Step::Configure],
            Task::Build => &[Step::Build],
            Task::BuildAll => &[Step::BuildAll],
            Task::Run => &[Step::Build, Step::Run],
            Task::Debug => &[Step::Build, Step::Debug],
            Task::Clean => &[Step::Clean],
            Task::OpenBuildDir => &[Step::OpenBuildDir],
        }
    }
}

pub struct TaskBuilder<'a> {
    ctx: &'a Context,
    notifier: &'a dyn Notifier,
    prompter: &'a dyn Prompter,
    client: FileApiClient,
}

impl<'a> TaskBuilder<'a> {
    pub fn new(ctx: &'a Context, notifier: &'a dyn Notifier, prompter: &'a dyn Prompter) -> Self {
        Self {
            ctx,
            notifier,
            prompter,
            client: FileApiClient::default(),
        }
    }

    pub fn set_client(mut self, client: FileApiClient) -> Self {
        self.client = client;
        self
    }

    /// Command for `step`, or `None` if there is nothing to run. Failures
    /// are reported to the notifier before `None` is returned.
    pub fn step(&self, step: Step, config: &BuildConfig) -> Option<Command> {
        match self.try_step(step, config) {
            Ok(cmd) => cmd,
            Err(e) => {
                tracing::debug!("{:?} aborted: {:?}", step, e);
                self.notifier.error(&e.to_string());
                None
            }
        }
    }

    pub fn try_step(&self, step: Step, config: &BuildConfig) -> Result<Option<Command>> {
        config.validate()?;
        match step {
            Step::InstallDeps => self.install_deps(config),
            Step::Configure => self.configure(config).map(Some),
            Step::Build => self.build(config, true).map(Some),
            Step::BuildAll => self.build(config, false).map(Some),
            Step::Run => self.launch(config).map(Some),
            Step::Debug => self.debug(config).map(Some),
            Step::Clean => self.clean(config).map(Some),
            Step::OpenBuildDir => Ok(Some(self.open_build_dir(config))),
        }
    }

    fn build_dir(&self, config: &BuildConfig) -> PathBuf {
        path::resolve(&config.build_dir, config.build_type, self.ctx)
    }

    fn deps(&self) -> DependencyResolver<'a> {
        DependencyResolver::new(self.prompter)
    }

    fn tool(&self, program: &str) -> Command {
        let cmd = Command::new(program).set_cwd(&self.ctx.cwd);
        if !cmd.is_available() {
            tracing::warn!("{} not found in PATH", program);
        }
        cmd
    }

    fn sync_hook(&self, build_dir: &Path) -> AfterSuccess {
        AfterSuccess::SyncCompileCommands(CompileCommandsSync::new(build_dir, self.ctx))
    }

    fn install_deps(&self, config: &BuildConfig) -> Result<Option<Command>> {
        if !self.deps().manifest_present(&self.ctx.cwd) {
            self.notifier.info(&format!(
                "no conanfile.txt or conanfile.py in {}, nothing to install",
                self.ctx.cwd.display()
            ));
            return Ok(None);
        }

        let build_dir = self.build_dir(config);
        let cmd = self
            .tool(&config.conan)
            .add_args(["install", ".", "--output-folder"])
            .add_arg(build_dir.to_string_lossy())
            .add_args(["--build=missing", "-s"])
            .add_arg(format!("build_type={}", config.build_type))
            .set_after_success(AfterSuccess::Notify {
                message: format!("dependencies installed into {}", build_dir.display()),
            });
        Ok(Some(cmd))
    }

    fn configure(&self, config: &BuildConfig) -> Result<Command> {
        let build_dir = self.build_dir(config);
        let deps = self.deps();
        let manifest = deps.manifest_present(&self.ctx.cwd);

        // checked before we create anything inside the build dir ourselves
        if manifest && !deps.dependencies_installed_hint(&build_dir) {
            return Err(Error::DependencyState(format!(
                "{} is empty, run get_deps before configuring",
                build_dir.display()
            )));
        }

        std::fs::create_dir_all(&build_dir).map_err(|e| Error::io(&build_dir, e))?;
        self.client.ensure_query(&build_dir)?;

        let mut args = vec![
            "-B".to_string(),
            build_dir.to_string_lossy().into_owned(),
            "-D".to_string(),
            format!("CMAKE_BUILD_TYPE={}", config.build_type),
        ];

        if manifest {
            if let Some(preset) = deps.presets_for_phase(&build_dir, PresetPhase::Configure)? {
                args = vec!["--preset".to_string(), preset];
            } else if let Some(toolchain) = deps.find_toolchain_file(&build_dir) {
                args.push(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
            } else {
                return Err(Error::DependencyState(format!(
                    "no conan preset or toolchain file in {}, run get_deps first",
                    build_dir.display()
                )));
            }
        }

        Ok(self
            .tool(&config.command)
            .add_args(args)
            .set_after_success(self.sync_hook(&build_dir)))
    }

    fn build(&self, config: &BuildConfig, with_target: bool) -> Result<Command> {
        let build_dir = self.build_dir(config);
        let deps = self.deps();

        let preset = if deps.manifest_present(&self.ctx.cwd) {
            deps.presets_for_phase(&build_dir, PresetPhase::Build)?
        } else {
            None
        };

        let mut cmd = self.tool(&config.command).add_arg("--build");
        cmd = match preset {
            Some(preset) => cmd.add_arg("--preset").add_arg(preset),
            None => cmd.add_arg(build_dir.to_string_lossy()),
        };

        if with_target {
            if let Some(target) = &config.target {
                cmd = cmd.add_arg("--target").add_arg(target);
            }
        }

        Ok(cmd.set_after_success(self.sync_hook(&build_dir)))
    }

    fn launch(&self, config: &BuildConfig) -> Result<Command> {
        let Some(target) = config.target.as_deref() else {
            return Err(Error::ConfigState(
                "no target configured, set `target` to the executable to run".into(),
            ));
        };

        let build_dir = self.build_dir(config);
        if !build_dir.is_dir() {
            return Err(Error::ConfigState(format!(
                "{} does not exist, run configure first",
                build_dir.display()
            )));
        }

        let executable = TargetCatalog::new(&self.client).resolve_executable_path(&build_dir, target)?;
        if !executable.is_file() {
            return Err(Error::ConfigState(format!(
                "{} has not been built yet",
                executable.display()
            )));
        }

        let Some(input) = self.prompter.input(&format!("Arguments for {target}: ")) else {
            return Err(Error::UserInput(format!("no arguments given for {target}")));
        };

        let cwd = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(build_dir);

        Ok(Command::new(executable.to_string_lossy())
            .add_args(split_args(&input))
            .set_cwd(cwd))
    }

    fn debug(&self, config: &BuildConfig) -> Result<Command> {
        if !config.build_type.is_debuggable() {
            return Err(Error::NotDebuggable(config.build_type));
        }

        let cmd = self.launch(config)?;
        Ok(match &config.dap_name {
            Some(name) => cmd.set_dap_name(name),
            None => {
                tracing::warn!("no dap_name configured for debugging");
                cmd
            }
        })
    }

    fn clean(&self, config: &BuildConfig) -> Result<Command> {
        let build_dir = self.build_dir(config);
        Ok(self
            .tool(&config.command)
            .add_arg("--build")
            .add_arg(build_dir.to_string_lossy())
            .add_args(["--target", "clean"])
            .set_after_success(self.sync_hook(&build_dir)))
    }

    fn open_build_dir(&self, config: &BuildConfig) -> Command {
        Command::new(opener(&self.ctx.os))
            .add_arg(self.build_dir(config).to_string_lossy())
            .quiet()
    }
}

/// Splits on runs of spaces.
fn split_args(input: &str) -> Vec<String> {
    input
        .split(' ')
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}

fn opener(os: &str) -> &'static str {
    match os {
        "windows" => "explorer",
        "macos" => "open",
        _ => "xdg-open",
    }
}
