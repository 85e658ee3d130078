//! Pane health specs
//!
//! One poll cycle over a fleet of panes produces an independent snapshot per
//! pane from its text, timestamps and shell PID.

use crate::prelude::*;
use shep_engine::health::{calculate_confidence, detect_activity, parse_agent_state};

const NOW: u64 = 90_000_000;

#[test]
fn poll_cycle_over_a_mixed_fleet() {
    let liveness = FakeLiveness::new();
    liveness.spawn_child(100, 101);
    liveness.set_alive(200);

    let panes = [
        PaneSample::new(AgentType::ClaudeCode, "✻ Reading files… (esc to interrupt)\n45% context left")
            .shell_pid(100u32)
            .last_activity_ms(NOW - 5_000),
        PaneSample::new(AgentType::Codex, "Segmentation fault (core dumped)\n$ ")
            .shell_pid(200u32)
            .last_activity_ms(NOW - 5_000),
        PaneSample::new(AgentType::ClaudeCode, "Error: rate limit reached. Try again in 2 minutes.")
            .last_activity_ms(NOW - 5_000),
        PaneSample::new(AgentType::Aider, "Applied edit to main.rs\naider> ")
            .last_activity_ms(NOW - 3_600_000),
    ];
    let snapshot: Vec<_> = panes.iter().map(|pane| classify(pane, &liveness, NOW)).collect();

    assert_eq!(snapshot[0].status, HealthStatus::Ok);
    assert_eq!(snapshot[0].process_status, ProcessStatus::Running);

    assert_eq!(snapshot[1].process_status, ProcessStatus::Exited);
    assert_eq!(snapshot[1].status, HealthStatus::Error);

    assert_eq!(snapshot[2].status, HealthStatus::Warning);
    let rate_limit = snapshot[2].issues.iter().find(|i| i.kind == IssueKind::RateLimit).unwrap();
    assert_eq!(rate_limit.retry_after_secs, Some(120));

    // prompt wins over an hour of silence
    assert_eq!(snapshot[3].activity, Activity::Idle);
    assert_eq!(snapshot[3].status, HealthStatus::Ok);
}

#[test]
fn shell_pid_evidence_beats_text() {
    let liveness = FakeLiveness::new();
    liveness.set_alive(300);
    let quiet = PaneSample::new(AgentType::Gemini, "all good, still working")
        .shell_pid(300u32)
        .last_activity_ms(NOW);
    assert_eq!(classify(&quiet, &liveness, NOW).process_status, ProcessStatus::Exited);

    liveness.spawn_child(300, 301);
    let noisy = PaneSample::new(AgentType::Gemini, "process exited with code 1")
        .shell_pid(300u32)
        .last_activity_ms(NOW);
    assert_eq!(classify(&noisy, &liveness, NOW).process_status, ProcessStatus::Running);
}

#[yare::parameterized(
    never_seen      = { "", None, Activity::Unknown },
    just_now        = { "compiling", Some(NOW - 30_000), Activity::Active },
    under_five_min  = { "compiling", Some(NOW - 299_000), Activity::Active },
    five_min_one_s  = { "compiling", Some(NOW - 301_000), Activity::Stale },
    ten_min         = { "compiling", Some(NOW - 600_000), Activity::Stale },
    prompt_no_clock = { "done\n> ", None, Activity::Idle },
)]
fn activity_boundaries(text: &str, last: Option<u64>, expected: Activity) {
    assert_eq!(detect_activity(text, last, AgentType::ClaudeCode, NOW), expected);
}

#[test]
fn parsed_state_drives_confidence() {
    let rich = parse_agent_state(
        AgentType::ClaudeCode,
        "Thinking… esc to interrupt\nSearching codebase\nBuilding\n12,400 tokens\n20% context left\nrate limit",
    );
    assert_eq!(rich.context_remaining, Some(20.0));
    assert_eq!(rich.tokens_used, Some(12_400));
    assert_eq!(calculate_confidence(&rich), 1.0);

    let blank = parse_agent_state(AgentType::Unknown, "");
    assert_eq!(calculate_confidence(&blank), 0.2);
}
