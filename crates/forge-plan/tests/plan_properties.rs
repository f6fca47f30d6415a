use forge_plan::{AgentPlan, PlanDraft, Variant, MAX_COMPLEXITY, MIN_COMPLEXITY};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_builder_complexity_always_in_range(level in any::<u8>()) {
        let plan = AgentPlan::builder("Agent", "does things")
            .complexity(level)
            .build()
            .unwrap();
        prop_assert!((MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&plan.complexity_level()));
    }

    #[test]
    fn prop_draft_level_accepted_iff_in_range(level in -10i64..20) {
        let draft = PlanDraft {
            name: "Agent".into(),
            role: "does things".into(),
            complexity_level: Some(level),
            ..PlanDraft::default()
        };
        let result = draft.validate();
        prop_assert_eq!(result.is_ok(), (1..=5).contains(&level));
    }

    #[test]
    fn prop_team_flag_always_selects_team(needs_memory in any::<bool>(), level in 1u8..=5) {
        let plan = AgentPlan::builder("Crew", "collaborate")
            .team(true)
            .needs_memory(needs_memory)
            .complexity(level)
            .build()
            .unwrap();
        prop_assert_eq!(plan.variant(), Variant::Team);
    }

    #[test]
    fn prop_identifier_is_filesystem_safe(name in "\\PC{1,40}") {
        let id = forge_plan::sanitize_identifier(&name);
        prop_assert!(id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }
}
