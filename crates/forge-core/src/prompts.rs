//! Prompt text for the analysis and planning collaborators

use forge_catalog::ToolCatalog;
use forge_plan::{plan_json_schema, BASE_CHAT_MODEL, MAX_COMPLEXITY, MIN_COMPLEXITY};
use std::fmt::Write as _;

/// Instructions given to the analyst for one clarification round
#[must_use]
pub fn analysis_prompt(transcript: &str, latest: &str, sentinel: &str) -> String {
    format!(
        "Conversation so far:\n\
         {transcript}\n\
         \n\
         Latest user message:\n\
         {latest}\n\
         \n\
         Analyze this request for building an AI agent. You need to know:\n\
         1. What the agent must do (purpose/role)\n\
         2. Which tools it needs (web search, finance, files, ...)\n\
         3. Whether it needs memory of previous conversations\n\
         4. Whether it is a single agent or a team\n\
         5. Any special instructions or constraints\n\
         \n\
         If you already have ALL of this information clearly, answer exactly: {sentinel}\n\
         \n\
         Otherwise ask 1-2 specific questions to clarify, suggesting concrete options where possible.\n"
    )
}

/// Instructions given to the planner, embedding the plan schema
///
/// # Errors
/// Only if the schema cannot be serialized
pub fn planning_prompt(transcript: &str, catalog: &ToolCatalog) -> Result<String, serde_json::Error> {
    let schema = plan_json_schema()?;

    let mut tools = String::new();
    for entry in catalog.entries() {
        // Writing to a String cannot fail
        let _ = writeln!(tools, "- {}: {}", entry.name, entry.description);
    }

    Ok(format!(
        "Based on this conversation with the user, create a complete plan for the agent:\n\
         \n\
         {transcript}\n\
         \n\
         Return a JSON object following this schema exactly:\n\
         {schema}\n\
         \n\
         Rules:\n\
         - name: descriptive agent name (e.g. \"Tech News Finder\")\n\
         - role: clear description of its purpose\n\
         - model_id: use \"{BASE_CHAT_MODEL}\" unless the user asked for another model\n\
         - complexity_level: {MIN_COMPLEXITY}=basic, 2=with knowledge, 3=with memory, 4=team, {MAX_COMPLEXITY}=workflow\n\
         - tools: list of tool names such as [\"duckduckgo\", \"yfinance\", \"reasoning\"]\n\
         - instructions: list of specific instructions\n\
         - needs_memory: true if it must remember conversations\n\
         - is_team: true if it is a team of agents\n\
         - team_members: for teams, objects with name, role and tools\n\
         - usage_example: an example question or task for the agent\n\
         \n\
         Available tools:\n\
         {tools}\
         \n\
         Return ONLY the JSON, without markdown or extra explanation.\n"
    ))
}
