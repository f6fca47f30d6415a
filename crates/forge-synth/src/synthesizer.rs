//! Code synthesizer
//!
//! Renders a validated plan into a standalone Python program using one of
//! three templates. Output is a pure function of the plan, the catalog and
//! the options.

use crate::defaults::{default_example, default_instructions, default_team, DEFAULT_MEMBER_ROLE};
use crate::model::{model_init, resolve_model};
use crate::options::{Synthesis, SynthesisOptions};
use crate::python::{comment_text, docstring_text, py_identifier, py_str};
use crate::writer::SourceWriter;
use forge_catalog::{ToolCatalog, ToolResolution};
use forge_plan::{AgentPlan, ModelFamily, TeamMember, Variant};
use indexmap::IndexSet;
use std::collections::BTreeSet;

const BASE_IMPORTS: [&str; 3] = [
    "import os",
    "from dotenv import load_dotenv",
    "from agno.agent import Agent",
];
const MEMORY_IMPORT: &str = "from agno.db.sqlite import SqliteDb";
const TEAM_IMPORT: &str = "from agno.team import Team";

/// Renders plans into Python source
#[derive(Debug, Clone)]
pub struct CodeSynthesizer<'c> {
    catalog: &'c ToolCatalog,
    options: SynthesisOptions,
}

impl Default for CodeSynthesizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeSynthesizer<'static> {
    /// Synthesizer over the built-in catalog with default options
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(ToolCatalog::global())
    }
}

impl<'c> CodeSynthesizer<'c> {
    /// Synthesizer over a custom catalog
    #[must_use]
    pub fn with_catalog(catalog: &'c ToolCatalog) -> Self {
        Self {
            catalog,
            options: SynthesisOptions::default(),
        }
    }

    /// Set rendering options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Catalog used for tool resolution
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &'c ToolCatalog {
        self.catalog
    }

    /// Render source text only
    #[must_use]
    pub fn synthesize(&self, plan: &AgentPlan) -> String {
        self.render(plan).source
    }

    /// Render source text with the variant and effective plan
    ///
    /// Team plans on the base chat model are rendered with the reasoning
    /// model; `plan` itself is never modified.
    #[must_use]
    pub fn render(&self, plan: &AgentPlan) -> Synthesis {
        let variant = plan.variant();
        let effective_plan = match variant {
            Variant::Team => plan.with_team_model_promotion(),
            Variant::Basic | Variant::Memory => plan.clone(),
        };

        let source = match variant {
            Variant::Basic | Variant::Memory => self.render_agent(&effective_plan, variant),
            Variant::Team => self.render_team(&effective_plan),
        };

        tracing::debug!(
            plan = effective_plan.name(),
            %variant,
            bytes = source.len(),
            "synthesized agent source"
        );

        Synthesis {
            source,
            variant,
            effective_plan,
        }
    }

    fn render_agent(&self, plan: &AgentPlan, variant: Variant) -> String {
        let memory = variant == Variant::Memory;
        let tools = self.catalog.resolve(plan.tools());
        let (family, _) = resolve_model(plan.model_id());
        let instructions = instruction_literals(plan, variant);
        let example = example_text(plan, variant);
        let name = plan.name();
        let db_file = self.options.memory_db_file.as_str();

        let mut w = SourceWriter::new(self.options.include_comments);
        let summary = if memory {
            "AI agent with persistent memory."
        } else {
            "AI agent generated automatically."
        };
        header(
            &mut w,
            plan,
            summary,
            &[
                format!("Tools: {}", tools_summary(plan.tools())),
                format!("Memory: {}", if memory { "Enabled (SQLite)" } else { "Disabled" }),
            ],
        );

        let extra = if memory { vec![MEMORY_IMPORT] } else { Vec::new() };
        imports(&mut w, &extra, family, &tools.imports);
        bootstrap(&mut w);

        w.block("def main():", |w| {
            w.line(if memory {
                "\"\"\"Run the agent with memory.\"\"\""
            } else {
                "\"\"\"Run the agent.\"\"\""
            });

            if memory {
                w.blank();
                w.comment("Configure storage");
                w.line(format!("db = SqliteDb(db_file={})", py_str(db_file)));
            }

            w.blank();
            w.comment("Create the agent");
            placeholders(w, &tools);
            w.bracketed("agent = Agent(", ")", |w| {
                w.line(format!("name={},", py_str(name)));
                w.line(format!("role={},", py_str(plan.role())));
                w.line(format!("model={},", model_init(plan.model_id())));
                w.line(format!("tools={},", inline_list(&tools.initializers)));
                w.list_arg("instructions", &instructions);
                if memory {
                    w.line("db=db,");
                }
                w.line("markdown=True,");
                if memory {
                    w.line("enable_user_memories=True,");
                    w.line("enable_session_summaries=True,");
                }
            });

            w.blank();
            let ready = if memory {
                format!("\n🤖 {name} is ready (with memory)\n")
            } else {
                format!("\n🤖 {name} is ready\n")
            };
            self.announce_and_run(w, "agent", &ready, "Example question", example, false);

            w.blank();
            w.line(r#"print("\n")"#);
            if memory {
                w.line(format!(
                    "print({})",
                    py_str(&format!("💾 Conversations are stored in: {db_file}"))
                ));
                w.line(r#"print("The agent remembers context from previous sessions.")"#);
            } else {
                w.line(
                    r#"print("To use interactively, edit this file and call agent.print_response(your_question)")"#,
                );
            }
        });

        entry_point(&mut w);
        w.finish()
    }

    fn render_team(&self, plan: &AgentPlan) -> String {
        let members: Vec<TeamMember> = if plan.team_members().is_empty() {
            default_team()
        } else {
            plan.team_members().to_vec()
        };

        let rendered: Vec<RenderedMember> = members
            .iter()
            .enumerate()
            .map(|(idx, member)| RenderedMember::new(member, idx + 1, self.catalog))
            .collect();

        let tool_imports: BTreeSet<String> = rendered
            .iter()
            .flat_map(|m| m.tools.imports.iter().cloned())
            .collect();
        let all_tools: Vec<&str> = plan
            .tools()
            .iter()
            .chain(members.iter().flat_map(|m| m.tools.iter()))
            .map(String::as_str)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        let (family, _) = resolve_model(plan.model_id());
        let model = model_init(plan.model_id());
        let instructions = instruction_literals(plan, Variant::Team);
        let example = example_text(plan, Variant::Team);
        let name = plan.name();

        let mut w = SourceWriter::new(self.options.include_comments);
        header(
            &mut w,
            plan,
            "Team of collaborating AI agents.",
            &[
                format!("Members: {}", rendered.len()),
                format!("Tools: {}", tools_summary(&all_tools)),
                format!(
                    "Memory: {}",
                    if plan.needs_memory() { "Requested (not used by teams)" } else { "Disabled" }
                ),
            ],
        );
        imports(&mut w, &[TEAM_IMPORT], family, &tool_imports);
        bootstrap(&mut w);

        w.block("def main():", |w| {
            w.line("\"\"\"Run the agent team.\"\"\"");
            w.blank();
            w.comment("Create team members");

            for member in &rendered {
                w.blank();
                w.comment(&format!("Member: {}", comment_text(&member.display_name)));
                placeholders(w, &member.tools);
                w.bracketed(&format!("{} = Agent(", member.ident), ")", |w| {
                    w.line(format!("name={},", py_str(&member.display_name)));
                    w.line(format!("role={},", py_str(&member.role)));
                    w.line(format!("model={model},"));
                    w.line(format!("tools={},", inline_list(&member.tools.initializers)));
                });
            }

            w.blank();
            w.bracketed("member_info = [", "]", |w| {
                for member in &rendered {
                    w.line(format!(
                        "({}, {}),",
                        py_str(&member.display_name),
                        py_str(&member.role)
                    ));
                }
            });

            w.blank();
            w.comment("Create the team");
            let idents: Vec<&str> = rendered.iter().map(|m| m.ident.as_str()).collect();
            w.bracketed("team = Team(", ")", |w| {
                w.line(format!("name={},", py_str(name)));
                w.line(format!("members=[{}],", idents.join(", ")));
                w.line(format!("model={model},"));
                w.list_arg("instructions", &instructions);
                w.line("markdown=True,");
            });

            w.blank();
            self.announce_and_run(
                w,
                "team",
                &format!("\n🤖 {name} is ready\n"),
                "Example task",
                example,
                true,
            );

            w.blank();
            w.line(r#"print("\n")"#);
            w.line(r#"print("The team collaborates automatically to complete complex tasks.")"#);
        });

        entry_point(&mut w);
        w.finish()
    }

    /// Status line, optional roster loop, then the illustrative invocation
    fn announce_and_run(
        &self,
        w: &mut SourceWriter,
        target: &str,
        ready: &str,
        example_label: &str,
        example: &str,
        roster: bool,
    ) {
        if self.options.add_examples {
            w.comment("Usage example");
        }
        w.line(format!("print({})", py_str(ready)));
        if roster {
            w.line(r#"print("Team members:")"#);
            w.block("for display_name, display_role in member_info:", |w| {
                w.line(r#"print(f"  - {display_name}: {display_role}")"#);
            });
        }

        if self.options.add_examples {
            w.line(format!(
                "print({})",
                py_str(&format!("{example_label}: {example}\n"))
            ));
            w.blank();
            w.comment("Run the example");
            w.line(format!(
                "{target}.print_response({}, stream=True)",
                py_str(example)
            ));
        }
    }
}

/// Member with its derived identifier and resolved tools
struct RenderedMember {
    ident: String,
    display_name: String,
    role: String,
    tools: ToolResolution,
}

impl RenderedMember {
    fn new(member: &TeamMember, position: usize, catalog: &ToolCatalog) -> Self {
        let trimmed = member.name.trim();
        let display_name = if trimmed.is_empty() {
            format!("Member {position}")
        } else {
            trimmed.to_string()
        };
        let role = match member.role.trim() {
            "" => DEFAULT_MEMBER_ROLE.to_string(),
            role => role.to_string(),
        };
        Self {
            ident: py_identifier(&member.name, position),
            display_name,
            role,
            tools: catalog.resolve(&member.tools),
        }
    }
}

fn header(w: &mut SourceWriter, plan: &AgentPlan, summary: &str, details: &[String]) {
    w.line("\"\"\"");
    w.line(format!("{} - {summary}", docstring_text(plan.name())));
    w.blank();
    w.line(format!("Role: {}", docstring_text(plan.role())));
    for detail in details {
        w.line(detail);
    }
    w.line("\"\"\"");
    w.blank();
}

fn imports(
    w: &mut SourceWriter,
    extra: &[&str],
    family: ModelFamily,
    tool_imports: &BTreeSet<String>,
) {
    for line in BASE_IMPORTS.iter().chain(extra) {
        w.line(*line);
    }
    w.line(crate::model::model_import(family));
    for line in tool_imports {
        w.line(line);
    }
}

fn bootstrap(w: &mut SourceWriter) {
    w.blank();
    w.comment("Load environment variables");
    w.line("load_dotenv()");
    w.blank();
    w.blank();
}

fn entry_point(w: &mut SourceWriter) {
    w.blank();
    w.blank();
    w.block("if __name__ == \"__main__\":", |w| {
        w.line("main()");
    });
}

fn placeholders(w: &mut SourceWriter, tools: &ToolResolution) {
    for comment in &tools.unresolved {
        w.line(comment);
    }
}

fn instruction_literals(plan: &AgentPlan, variant: Variant) -> Vec<String> {
    let instructions = if plan.instructions().is_empty() {
        default_instructions(variant, plan.role())
    } else {
        plan.instructions().to_vec()
    };
    instructions.iter().map(|i| py_str(i)).collect()
}

fn example_text(plan: &AgentPlan, variant: Variant) -> &str {
    match plan.usage_example().trim() {
        "" => default_example(variant),
        example => example,
    }
}

fn inline_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

fn tools_summary<S: AsRef<str>>(tools: &[S]) -> String {
    if tools.is_empty() {
        return "None".to_string();
    }
    tools
        .iter()
        .map(|t| docstring_text(t.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
