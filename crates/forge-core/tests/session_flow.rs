//! Sessions driven end to end with scripted collaborators

use forge_core::prelude::*;
use forge_core::{CompletionReason, ElicitationLoop, ElicitationOutcome};
use forge_test_utils::{
    chatty_fence, FixedConfirmer, MemoryStore, RecordingObserver, ScriptedAnalyst,
    ScriptedPlanner, ScriptedTurns, DEMO_PLAN_JSON, TEAM_PLAN_JSON,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn clarified_request_generates_agent() {
    let analyst = ScriptedAnalyst::new(["Which tools should it use?", "INFO_COMPLETE"]);
    let planner = ScriptedPlanner::new(chatty_fence(DEMO_PLAN_JSON));
    let store = MemoryStore::new();
    let observer = RecordingObserver::new();
    let mut turns = ScriptedTurns::new("an agent for AI news", ["web search"]);
    let mut confirmer = FixedConfirmer::yes();

    let session = ForgeSession::new(ForgeConfig::default(), &analyst, &planner, &store)
        .with_observer(&observer);
    let outcome = session.run(&mut turns, &mut confirmer).unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.filename, "demo_web_research_agent_agent.py");
    assert_eq!(store.get("demo_web_research_agent").as_deref(), Some(report.code.as_str()));

    assert_eq!(
        planner.transcripts(),
        vec![
            "User: an agent for AI news\n\nAssistant: Which tools should it use?\nUser: web search"
                .to_string()
        ]
    );
    assert_eq!(turns.questions(), &["Which tools should it use?".to_string()]);
    assert_eq!(confirmer.shown()[0].name, "Demo Web Research Agent");

    let events = observer.events();
    assert!(matches!(events.first(), Some(SessionEvent::RequestReceived { .. })));
    assert!(events.contains(&SessionEvent::ElicitationComplete {
        reason: CompletionReason::Sentinel,
        iterations: 2,
    }));
    assert!(matches!(events.last(), Some(SessionEvent::Saved { .. })));
}

#[test]
fn team_session_promotes_model() {
    let analyst = ScriptedAnalyst::new(["INFO_COMPLETE"]);
    let planner = ScriptedPlanner::new(TEAM_PLAN_JSON);
    let store = MemoryStore::new();
    let mut turns = ScriptedTurns::new("a research team", Vec::<String>::new());

    let session = ForgeSession::new(ForgeConfig::default(), &analyst, &planner, &store);
    let outcome = session.run(&mut turns, &mut FixedConfirmer::new("s")).unwrap();
    let report = outcome.report().unwrap();

    assert_eq!(report.plan.model_id(), "deepseek-chat");
    assert_eq!(report.effective_plan.model_id(), "deepseek-reasoner");
    assert!(report.code.contains("DeepSeek(id=\"deepseek-reasoner\")"));
    assert_eq!(report.code.matches(" = Agent(").count(), 3);
}

#[test]
fn declined_plan_is_not_persisted() {
    let analyst = ScriptedAnalyst::new(["INFO_COMPLETE"]);
    let planner = ScriptedPlanner::new(DEMO_PLAN_JSON);
    let store = MemoryStore::new();
    let observer = RecordingObserver::new();

    let session = ForgeSession::new(ForgeConfig::default(), &analyst, &planner, &store)
        .with_observer(&observer);
    let outcome = session
        .run(&mut ScriptedTurns::new("news", Vec::<String>::new()), &mut FixedConfirmer::no())
        .unwrap();

    assert!(matches!(outcome, SessionOutcome::Declined(_)));
    assert_eq!(store.save_count(), 0);
    assert_eq!(observer.count(|e| matches!(e, SessionEvent::Declined)), 1);
}

#[test]
fn schema_invalid_plan_reports_violations() {
    let analyst = ScriptedAnalyst::new(["INFO_COMPLETE"]);
    let planner = ScriptedPlanner::new(r#"{"name": "", "role": "x", "complexity_level": 9}"#);
    let store = MemoryStore::new();

    let session = ForgeSession::new(ForgeConfig::default(), &analyst, &planner, &store);
    let err = session
        .run(&mut ScriptedTurns::new("x", Vec::<String>::new()), &mut FixedConfirmer::yes())
        .unwrap_err();

    match err {
        ForgeError::Extraction(err) => {
            assert_eq!(err.kind().as_str(), "SCHEMA_INVALID");
            assert!(err.violations().iter().any(|v| v.field == "name"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn planner_failure_is_surfaced() {
    let analyst = ScriptedAnalyst::new(["INFO_COMPLETE"]);
    let planner = ScriptedPlanner::failing("connection reset");
    let store = MemoryStore::new();

    let session = ForgeSession::new(ForgeConfig::default(), &analyst, &planner, &store);
    let err = session
        .run(&mut ScriptedTurns::new("x", Vec::<String>::new()), &mut FixedConfirmer::yes())
        .unwrap_err();
    assert!(err.to_string().contains("connection reset"));
}

#[test]
fn store_failure_is_surfaced() {
    let analyst = ScriptedAnalyst::new(["INFO_COMPLETE"]);
    let planner = ScriptedPlanner::new(DEMO_PLAN_JSON);
    let store = MemoryStore::failing("disk full");

    let session = ForgeSession::new(ForgeConfig::default(), &analyst, &planner, &store);
    let err = session
        .run(&mut ScriptedTurns::new("x", Vec::<String>::new()), &mut FixedConfirmer::yes())
        .unwrap_err();
    assert_eq!(err.kind(), "store");
    assert!(!err.is_recoverable());
}

#[test]
fn file_store_session_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = ForgeConfig::default().with_output_dir(dir.path());
    let store = FileStore::new(&config.output_dir);
    let analyst = ScriptedAnalyst::new(["INFO_COMPLETE"]);
    let planner = ScriptedPlanner::new(DEMO_PLAN_JSON);

    let session = ForgeSession::new(config, &analyst, &planner, &store);
    session
        .run(&mut ScriptedTurns::new("news", Vec::<String>::new()), &mut FixedConfirmer::yes())
        .unwrap();

    let listing = store.list(0, 50).unwrap();
    assert_eq!(listing.total, 1);
    let info = &listing.agents[0];
    assert_eq!(info.summary.name, "Demo Web Research Agent");
    assert_eq!(info.summary.role, "search AI news");
}

proptest! {
    #[test]
    fn elicitation_terminates_within_budget(budget in 1usize..8, answers in proptest::collection::vec("[a-z]{1,8}", 0..12)) {
        let analyst = ScriptedAnalyst::never_satisfied();
        let mut turns = ScriptedTurns::new("build me an agent", answers.clone());
        let observer = RecordingObserver::new();

        let outcome = ElicitationLoop::new()
            .with_max_iterations(budget)
            .run(&mut turns, &analyst, &observer)
            .unwrap();

        let ElicitationOutcome::Complete { iterations, reason, transcript } = outcome else {
            panic!("non-empty request must complete");
        };
        prop_assert!(iterations <= budget);
        prop_assert_eq!(analyst.calls().len(), iterations);
        if answers.len() >= budget {
            prop_assert_eq!(reason, CompletionReason::BudgetExhausted);
            prop_assert_eq!(transcript.exchanges(), budget);
        } else {
            prop_assert_eq!(reason, CompletionReason::UserProceeded);
            prop_assert_eq!(transcript.exchanges(), answers.len());
        }
    }
}
