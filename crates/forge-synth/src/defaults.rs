//! Values substituted when a plan leaves a field empty

use forge_plan::{TeamMember, Variant};

/// Example question for single agents
pub const DEFAULT_AGENT_EXAMPLE: &str = "How can you help me?";

/// Example task for teams
pub const DEFAULT_TEAM_EXAMPLE: &str = "What can this team do?";

/// Coordinator instructions for teams without explicit ones
pub const DEFAULT_TEAM_INSTRUCTIONS: [&str; 3] = [
    "Collaborate effectively",
    "Split the work according to each specialty",
    "Combine your findings",
];

/// Role for members that declare none
pub const DEFAULT_MEMBER_ROLE: &str = "Team member";

/// Default instruction list for a variant
#[must_use]
pub fn default_instructions(variant: Variant, role: &str) -> Vec<String> {
    match variant {
        Variant::Basic => vec![
            format!("You are a {role}"),
            "Be helpful and concise".to_string(),
            "Answer clearly".to_string(),
        ],
        Variant::Memory => vec![
            format!("You are a {role}"),
            "Remember previous conversations".to_string(),
            "Be helpful and contextual".to_string(),
        ],
        Variant::Team => DEFAULT_TEAM_INSTRUCTIONS.iter().map(ToString::to_string).collect(),
    }
}

/// Three-role team used when a team plan lists no members
#[must_use]
pub fn default_team() -> Vec<TeamMember> {
    vec![
        TeamMember::new("Researcher", "Search for information").with_tools(["duckduckgo"]),
        TeamMember::new("Analyzer", "Analyze data").with_tools(["reasoning"]),
        TeamMember::new("Writer", "Write responses"),
    ]
}

/// Example text for a variant
#[must_use]
pub fn default_example(variant: Variant) -> &'static str {
    match variant {
        Variant::Team => DEFAULT_TEAM_EXAMPLE,
        Variant::Basic | Variant::Memory => DEFAULT_AGENT_EXAMPLE,
    }
}
