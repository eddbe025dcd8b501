use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use unibuild_core::config::BuildConfig;
use unibuild_core::paths;
use unibuild_core::platform::PlatformKey;

/// Engine-side entry point that dispatches named pre-build hooks.
pub const HOOK_DISPATCH_METHOD: &str = "CommandLineBuild.ExecuteHook";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One headless invocation of the engine editor.
///
/// The argument contract is fixed: batch mode, no graphics, quit after the
/// named method runs, and a dedicated log file so historical logs from
/// different platforms never collide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineInvocation {
    pub engine_path: PathBuf,
    pub project_root: PathBuf,
    pub method: String,
    pub hook_name: Option<String>,
    pub log_file: PathBuf,
}

impl EngineInvocation {
    pub fn for_build(config: &BuildConfig, platform: PlatformKey) -> Self {
        EngineInvocation {
            engine_path: config.engine_path.clone(),
            project_root: config.project_root.clone(),
            method: platform.build_method().to_string(),
            hook_name: None,
            log_file: paths::build_log_path(config, platform),
        }
    }

    pub fn for_hook(config: &BuildConfig, hook_name: &str) -> Self {
        EngineInvocation {
            engine_path: config.engine_path.clone(),
            project_root: config.project_root.clone(),
            method: HOOK_DISPATCH_METHOD.to_string(),
            hook_name: Some(hook_name.to_string()),
            log_file: paths::hook_log_path(config),
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-batchmode".to_string(),
            "-quit".to_string(),
            "-nographics".to_string(),
            "-projectPath".to_string(),
            self.project_root.display().to_string(),
            "-executeMethod".to_string(),
            self.method.clone(),
            "-logFile".to_string(),
            self.log_file.display().to_string(),
        ];
        if let Some(hook) = &self.hook_name {
            args.push("-hookName".to_string());
            args.push(hook.clone());
        }
        args
    }
}

/// Raw outcome of a completed engine process. `code` is `None` when the
/// process was terminated by a signal.
#[derive(Clone, Debug)]
pub struct EngineExit {
    pub code: Option<i32>,
    pub output: String,
}

impl EngineExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Clone, Debug)]
pub enum TimedExit {
    Completed(EngineExit),
    TimedOut,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "engine invocation failed: {}", self.message)
    }
}

impl std::error::Error for EngineError {}

/// Seam between the orchestration pipeline and the real engine process.
pub trait EngineRunner {
    /// Blocking run with no imposed timeout; engine builds can legitimately
    /// take tens of minutes. Captures combined output and exit status
    /// without interpreting either.
    fn run(&self, invocation: &EngineInvocation) -> Result<EngineExit, EngineError>;

    /// Bounded run for short-lived invocations; the process is killed when
    /// the limit expires.
    fn run_with_timeout(
        &self,
        invocation: &EngineInvocation,
        limit: Duration,
    ) -> Result<TimedExit, EngineError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEngineRunner;

impl ProcessEngineRunner {
    pub fn new() -> Self {
        Self
    }
}

impl EngineRunner for ProcessEngineRunner {
    fn run(&self, invocation: &EngineInvocation) -> Result<EngineExit, EngineError> {
        tracing::debug!(method = %invocation.method, "spawning engine");
        let output = Command::new(&invocation.engine_path)
            .args(invocation.args())
            .output()
            .map_err(|error| {
                EngineError::new(format!(
                    "failed to spawn '{}': {}",
                    invocation.engine_path.display(),
                    error
                ))
            })?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(EngineExit {
            code: output.status.code(),
            output: combined,
        })
    }

    fn run_with_timeout(
        &self,
        invocation: &EngineInvocation,
        limit: Duration,
    ) -> Result<TimedExit, EngineError> {
        // Output is routed to the invocation's log file by the engine
        // itself; nothing is read from the pipes here, so they stay closed.
        let mut child = Command::new(&invocation.engine_path)
            .args(invocation.args())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| {
                EngineError::new(format!(
                    "failed to spawn '{}': {}",
                    invocation.engine_path.display(),
                    error
                ))
            })?;
        let deadline = Instant::now() + limit;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return Ok(TimedExit::Completed(EngineExit {
                        code: status.code(),
                        output: String::new(),
                    }));
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Ok(TimedExit::TimedOut);
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(error) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EngineError::new(format!(
                        "failed to wait for engine: {}",
                        error
                    )));
                }
            }
        }
    }
}
