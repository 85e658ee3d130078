//! Shared imports and helpers for specs.

pub use shep_adapters::{FakeEventBus, FakeLiveness, FakeSlbNotifier};
pub use shep_core::{
    Activity, AgentType, ApprovalStatus, FakeClock, HealthStatus, IssueKind, JobPriority,
    JobStatus, JobType, ProcessStatus, SpawnJob,
};
pub use shep_engine::{
    classify, ApprovalConfig, ApprovalEngine, ApprovalError, FairScheduler, FairSchedulerConfig,
    PaneSample, RequestParams,
};
pub use shep_storage::MemoryApprovalStore;
pub use std::sync::Arc;
pub use std::time::Duration;

/// Scheduler on a fake clock with the given caps
pub fn scheduler(max_per_session: usize, max_per_batch: usize) -> FairScheduler<FakeClock> {
    FairScheduler::with_clock(FairSchedulerConfig { max_per_session, max_per_batch }, FakeClock::new())
}

/// A job created at the scheduler's current time
pub fn job(
    scheduler: &FairScheduler<FakeClock>,
    session: &str,
    priority: JobPriority,
) -> SpawnJob {
    SpawnJob::new(JobType::AgentLaunch, session, priority, scheduler.queue().clock())
}

/// Approval engine wired to recording fakes
pub struct Approvals {
    pub engine: Arc<ApprovalEngine<MemoryApprovalStore, FakeClock>>,
    pub clock: FakeClock,
    pub bus: FakeEventBus,
    pub notifier: FakeSlbNotifier,
}

impl Approvals {
    pub fn new(config: ApprovalConfig) -> Self {
        let clock = FakeClock::new();
        let bus = FakeEventBus::new();
        let notifier = FakeSlbNotifier::new();
        let engine = ApprovalEngine::with_clock(MemoryApprovalStore::new(), config, clock.clone())
            .with_bus(Arc::new(bus.clone()))
            .with_notifier(Arc::new(notifier.clone()));
        Self { engine: Arc::new(engine), clock, bus, notifier }
    }
}

impl Default for Approvals {
    fn default() -> Self {
        Self::new(ApprovalConfig::default())
    }
}
