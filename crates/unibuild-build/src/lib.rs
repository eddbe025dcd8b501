pub mod availability;
pub mod batch;
pub mod engine;
pub mod hook;
pub mod reconcile;

pub use availability::{check_platform, Availability, HostEnvironment};
pub use batch::BatchRunner;
pub use engine::{
    EngineError, EngineExit, EngineInvocation, EngineRunner, ProcessEngineRunner, TimedExit,
};
pub use hook::{run_pre_build_hook, HookFailure, HookOutcome, HOOK_TIMEOUT};
pub use reconcile::{reconcile, ProducedArtifact, Reconciliation};
