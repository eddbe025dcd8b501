use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use unibuild_build::{
    BatchRunner, EngineError, EngineExit, EngineInvocation, EngineRunner, HostEnvironment,
    TimedExit,
};
use unibuild_core::config::BuildConfig;
use unibuild_core::events::SilentEvents;
use unibuild_core::paths;
use unibuild_core::platform::PlatformKey;
use unibuild_core::report::SUMMARY_FILE_NAME;
use unibuild_core::result::BuildStatus;

fn temp_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    path.push(format!("unibuild-batch-flow-{}-{}", name, stamp));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

fn test_config(root: &Path) -> BuildConfig {
    BuildConfig {
        project_root: root.to_path_buf(),
        product_name: "App".to_string(),
        product_version: "1.0.0".to_string(),
        engine_path: root.join("engine"),
        pre_build_hook: None,
    }
}

fn host_with_sdk() -> HostEnvironment {
    let mut vars = HashMap::new();
    vars.insert("ANDROID_HOME".to_string(), "/opt/android-sdk".to_string());
    HostEnvironment::with_vars("linux", vars)
}

fn bare_linux_host() -> HostEnvironment {
    HostEnvironment::with_vars("linux", HashMap::new())
}

enum HookBehavior {
    Succeed,
    ExitWith(i32),
    TimeOut,
}

/// Engine stand-in: records every invocation and plays a scripted effect
/// (writing artifacts, summaries) before returning the scripted exit code.
struct ScriptedEngine<F: Fn(&EngineInvocation)> {
    effect: F,
    exit_code: i32,
    hook: HookBehavior,
    invocations: Mutex<Vec<String>>,
}

impl<F: Fn(&EngineInvocation)> ScriptedEngine<F> {
    fn new(effect: F, exit_code: i32) -> Self {
        ScriptedEngine {
            effect,
            exit_code,
            hook: HookBehavior::Succeed,
            invocations: Mutex::new(Vec::new()),
        }
    }

    fn with_hook(mut self, hook: HookBehavior) -> Self {
        self.hook = hook;
        self
    }

    fn recorded(&self) -> Vec<String> {
        self.invocations.lock().expect("lock").clone()
    }
}

impl<F: Fn(&EngineInvocation)> EngineRunner for ScriptedEngine<F> {
    fn run(&self, invocation: &EngineInvocation) -> Result<EngineExit, EngineError> {
        self.invocations
            .lock()
            .expect("lock")
            .push(invocation.method.clone());
        (self.effect)(invocation);
        Ok(EngineExit {
            code: Some(self.exit_code),
            output: String::new(),
        })
    }

    fn run_with_timeout(
        &self,
        invocation: &EngineInvocation,
        _limit: Duration,
    ) -> Result<TimedExit, EngineError> {
        let label = match &invocation.hook_name {
            Some(hook) => format!("{}#{}", invocation.method, hook),
            None => invocation.method.clone(),
        };
        self.invocations.lock().expect("lock").push(label);
        match self.hook {
            HookBehavior::Succeed => Ok(TimedExit::Completed(EngineExit {
                code: Some(0),
                output: String::new(),
            })),
            HookBehavior::ExitWith(code) => Ok(TimedExit::Completed(EngineExit {
                code: Some(code),
                output: String::new(),
            })),
            HookBehavior::TimeOut => Ok(TimedExit::TimedOut),
        }
    }
}

fn version_dir(config: &BuildConfig, platform: PlatformKey) -> PathBuf {
    paths::engine_output_path(config, platform, &config.product_name)
        .parent()
        .expect("version dir")
        .to_path_buf()
}

#[test]
fn single_platform_batch_yields_one_matching_result() {
    let root = temp_dir("single");
    let config = test_config(&root);
    let webgl_dir = version_dir(&config, PlatformKey::Webgl);
    let engine = ScriptedEngine::new(
        move |_invocation: &EngineInvocation| {
            let bundle = webgl_dir.join("App");
            fs::create_dir_all(&bundle).expect("bundle");
            fs::write(bundle.join("index.html"), "<html></html>").expect("index");
        },
        0,
    );
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Webgl], None, false);
    assert_eq!(outcome.results.len(), 1);
    let result = &outcome.results[0];
    assert_eq!(result.platform, PlatformKey::Webgl);
    assert_eq!(result.status, BuildStatus::Success);
    let output_path = result.output_path.as_ref().expect("output path");
    assert!(output_path.exists());
    let stamped_dir = output_path.parent().expect("stamped dir");
    let dir_name = stamped_dir.file_name().unwrap().to_string_lossy();
    assert!(dir_name.starts_with("1.0.0_"));
    assert_eq!(outcome.success_count, 1);
}

#[test]
fn skipped_platform_spawns_no_subprocess() {
    let root = temp_dir("skip-no-spawn");
    let config = test_config(&root);
    let engine = ScriptedEngine::new(|_invocation: &EngineInvocation| {}, 0);
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Android], None, false);
    assert_eq!(outcome.results[0].status, BuildStatus::Skipped);
    assert_eq!(
        outcome.results[0].reason.as_deref(),
        Some("ANDROID_HOME environment variable not set")
    );
    assert!(engine.recorded().is_empty());
}

#[test]
fn failed_hook_aborts_before_dispatch() {
    let root = temp_dir("hook-fails");
    let mut config = test_config(&root);
    config.pre_build_hook = Some("BuildHooks.SwitchToProduction".to_string());
    let engine = ScriptedEngine::new(|_invocation: &EngineInvocation| {}, 0)
        .with_hook(HookBehavior::ExitWith(2));
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Webgl], None, false);
    let result = &outcome.results[0];
    assert_eq!(result.status, BuildStatus::Failed);
    assert_eq!(result.reason.as_deref(), Some("pre-build hook failed"));
    let recorded = engine.recorded();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].contains("BuildHooks.SwitchToProduction"));
}

#[test]
fn hook_timeout_aborts_with_distinct_diagnostic() {
    let root = temp_dir("hook-timeout");
    let config = test_config(&root);
    let engine = ScriptedEngine::new(|_invocation: &EngineInvocation| {}, 0)
        .with_hook(HookBehavior::TimeOut);
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Webgl], Some("BuildHooks.PrepareWebGL"), false);
    let result = &outcome.results[0];
    assert_eq!(result.status, BuildStatus::Failed);
    assert_eq!(result.reason.as_deref(), Some("pre-build hook failed"));
    assert!(result.errors[0].contains("timeout"));
    assert_eq!(engine.recorded().len(), 1);
}

#[test]
fn skip_hook_flag_goes_straight_to_dispatch() {
    let root = temp_dir("hook-skipped");
    let mut config = test_config(&root);
    config.pre_build_hook = Some("BuildHooks.SwitchToProduction".to_string());
    let webgl_dir = version_dir(&config, PlatformKey::Webgl);
    let engine = ScriptedEngine::new(
        move |_invocation: &EngineInvocation| {
            let bundle = webgl_dir.join("App");
            fs::create_dir_all(&bundle).expect("bundle");
            fs::write(bundle.join("index.html"), "x").expect("index");
        },
        0,
    )
    .with_hook(HookBehavior::ExitWith(1));
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Webgl], None, true);
    assert_eq!(outcome.results[0].status, BuildStatus::Success);
    assert_eq!(engine.recorded(), vec!["CommandLineBuild.BuildWebGL"]);
}

#[test]
fn renamed_product_relocates_under_reported_name() {
    let root = temp_dir("renamed");
    let config = test_config(&root);
    let android_dir = version_dir(&config, PlatformKey::Android);
    let effect_dir = android_dir.clone();
    let engine = ScriptedEngine::new(
        move |_invocation: &EngineInvocation| {
            fs::create_dir_all(&effect_dir).expect("version dir");
            fs::write(effect_dir.join("Renamed.apk"), vec![0u8; 256]).expect("apk");
            fs::write(
                effect_dir.join(SUMMARY_FILE_NAME),
                r#"{"status":"success","product_name":"Renamed"}"#,
            )
            .expect("summary");
        },
        0,
    );
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(host_with_sdk());

    let outcome = batch.run(&[PlatformKey::Android], None, false);
    let result = &outcome.results[0];
    assert_eq!(result.status, BuildStatus::Success);
    let output_path = result.output_path.as_ref().expect("output path");
    assert_eq!(
        output_path.file_name().unwrap().to_string_lossy(),
        "Renamed.apk"
    );
    assert!(output_path.exists());
    // The intermediate artifact at the reported name was moved, not copied.
    assert!(!android_dir.join("Renamed.apk").exists());
}

#[test]
fn zero_exit_without_output_is_never_success() {
    let root = temp_dir("zero-exit-empty");
    let config = test_config(&root);
    let engine = ScriptedEngine::new(|_invocation: &EngineInvocation| {}, 0);
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Webgl], None, false);
    let result = &outcome.results[0];
    assert_eq!(result.status, BuildStatus::Failed);
    assert!(result
        .reason
        .as_deref()
        .expect("reason")
        .contains("expected output not found"));
}

#[test]
fn self_reported_size_supersedes_computed_size() {
    let root = temp_dir("reported-size");
    let config = test_config(&root);
    let android_dir = version_dir(&config, PlatformKey::Android);
    let engine = ScriptedEngine::new(
        move |_invocation: &EngineInvocation| {
            fs::create_dir_all(&android_dir).expect("version dir");
            fs::write(android_dir.join("App.apk"), vec![0u8; 100]).expect("apk");
            fs::write(
                android_dir.join(SUMMARY_FILE_NAME),
                r#"{"status":"success","build_size_mb":12.5}"#,
            )
            .expect("summary");
        },
        0,
    );
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(host_with_sdk());

    let outcome = batch.run(&[PlatformKey::Android], None, false);
    let result = &outcome.results[0];
    assert_eq!(result.status, BuildStatus::Success);
    assert_eq!(result.size_mb, Some(12.5));
}

#[test]
fn scattered_output_moves_every_sibling_entry() {
    let root = temp_dir("scattered");
    let config = test_config(&root);
    let windows_dir = version_dir(&config, PlatformKey::Windows);
    let effect_dir = windows_dir.clone();
    let engine = ScriptedEngine::new(
        move |_invocation: &EngineInvocation| {
            fs::create_dir_all(effect_dir.join("App_Data")).expect("data dir");
            fs::write(effect_dir.join("App.exe"), vec![0u8; 100]).expect("exe");
            fs::write(effect_dir.join("UnityPlayer.dll"), vec![0u8; 60]).expect("dll");
            fs::write(effect_dir.join("App_Data").join("level0"), vec![0u8; 40]).expect("level");
        },
        0,
    );
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Windows], None, false);
    let result = &outcome.results[0];
    assert_eq!(result.status, BuildStatus::Success);
    let output_path = result.output_path.as_ref().expect("output path");
    let stamped_dir = output_path.parent().expect("stamped dir");
    assert!(stamped_dir.join("App.exe").exists());
    assert!(stamped_dir.join("UnityPlayer.dll").exists());
    assert!(stamped_dir.join("App_Data").join("level0").exists());
    // The emptied version folder does not linger to pollute the next run.
    assert!(!windows_dir.exists());
}

#[test]
fn one_failure_never_halts_the_batch() {
    let root = temp_dir("keep-going");
    let config = test_config(&root);
    let android_dir = version_dir(&config, PlatformKey::Android);
    let engine = ScriptedEngine::new(
        move |invocation: &EngineInvocation| {
            // Only the Android build produces output; WebGL fails dry.
            if invocation.method == "CommandLineBuild.BuildAndroid" {
                fs::create_dir_all(&android_dir).expect("version dir");
                fs::write(android_dir.join("App.apk"), vec![0u8; 64]).expect("apk");
            }
        },
        0,
    );
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(host_with_sdk());

    let outcome = batch.run(&[PlatformKey::Webgl, PlatformKey::Android], None, false);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].platform, PlatformKey::Webgl);
    assert_eq!(outcome.results[0].status, BuildStatus::Failed);
    assert_eq!(outcome.results[1].platform, PlatformKey::Android);
    assert_eq!(outcome.results[1].status, BuildStatus::Success);
    assert_eq!(outcome.success_count, 1);
}

#[test]
fn skipped_then_success_keeps_request_order() {
    let root = temp_dir("order");
    let config = test_config(&root);
    let webgl_dir = version_dir(&config, PlatformKey::Webgl);
    let engine = ScriptedEngine::new(
        move |_invocation: &EngineInvocation| {
            let bundle = webgl_dir.join("App");
            fs::create_dir_all(&bundle).expect("bundle");
            fs::write(bundle.join("index.html"), "x").expect("index");
        },
        0,
    );
    let events = SilentEvents;
    // No ANDROID_HOME: the first platform is skipped before any spawn.
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Android, PlatformKey::Webgl], None, false);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].status, BuildStatus::Skipped);
    assert_eq!(outcome.results[1].status, BuildStatus::Success);
    assert_eq!(outcome.success_count, 1);
}

#[test]
fn summary_error_list_is_retained_in_full() {
    let root = temp_dir("full-errors");
    let config = test_config(&root);
    let webgl_dir = version_dir(&config, PlatformKey::Webgl);
    let engine = ScriptedEngine::new(
        move |_invocation: &EngineInvocation| {
            fs::create_dir_all(&webgl_dir).expect("version dir");
            let errors: Vec<String> = (0..7).map(|index| format!("\"error {}\"", index)).collect();
            fs::write(
                webgl_dir.join(SUMMARY_FILE_NAME),
                format!(r#"{{"status":"failed","errors":[{}]}}"#, errors.join(",")),
            )
            .expect("summary");
        },
        0,
    );
    let events = SilentEvents;
    let batch = BatchRunner::new(&config, &engine, &events).with_host(bare_linux_host());

    let outcome = batch.run(&[PlatformKey::Webgl], None, false);
    let result = &outcome.results[0];
    assert_eq!(result.status, BuildStatus::Failed);
    // First 5 go to the console; the record keeps all of them.
    assert_eq!(result.errors.len(), 7);
}
