//! Model import and constructor rendering

use crate::python::py_str;
use forge_plan::{ModelFamily, BASE_CHAT_MODEL};

/// Import line for a model family
#[must_use]
pub fn model_import(family: ModelFamily) -> &'static str {
    match family {
        ModelFamily::DeepSeek => "from agno.models.deepseek import DeepSeek",
        ModelFamily::Anthropic => "from agno.models.anthropic import Claude",
        ModelFamily::OpenAi => "from agno.models.openai import OpenAIChat",
        ModelFamily::Google => "from agno.models.google import Gemini",
    }
}

fn model_class(family: ModelFamily) -> &'static str {
    match family {
        ModelFamily::DeepSeek => "DeepSeek",
        ModelFamily::Anthropic => "Claude",
        ModelFamily::OpenAi => "OpenAIChat",
        ModelFamily::Google => "Gemini",
    }
}

/// Family and concrete id for a model id
///
/// Undetectable ids resolve to the base chat model, so import and
/// constructor always agree.
#[must_use]
pub fn resolve_model(model_id: &str) -> (ModelFamily, String) {
    match ModelFamily::detect(model_id) {
        Some(family) => (family, family.concrete_id(model_id)),
        None => (ModelFamily::DeepSeek, BASE_CHAT_MODEL.to_string()),
    }
}

/// Constructor expression, e.g. `DeepSeek(id="deepseek-chat")`
#[must_use]
pub fn model_init(model_id: &str) -> String {
    let (family, id) = resolve_model(model_id);
    format!("{}(id={})", model_class(family), py_str(&id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn init_per_family() {
        assert_eq!(model_init("deepseek-chat"), r#"DeepSeek(id="deepseek-chat")"#);
        assert_eq!(model_init("deepseek-reasoner"), r#"DeepSeek(id="deepseek-reasoner")"#);
        assert_eq!(
            model_init("claude-3-5-haiku"),
            r#"Claude(id="claude-3-5-haiku")"#
        );
        assert_eq!(model_init("sonnet"), r#"Claude(id="claude-sonnet-4-20250514")"#);
        assert_eq!(model_init("openai"), r#"OpenAIChat(id="gpt-4o")"#);
        assert_eq!(model_init("gemini"), r#"Gemini(id="gemini-2.0-flash-exp")"#);
    }

    #[test]
    fn unknown_model_is_consistent() {
        let (family, id) = resolve_model("mystery");
        assert_eq!(family, ModelFamily::DeepSeek);
        assert_eq!(id, BASE_CHAT_MODEL);
        assert_eq!(model_import(family), "from agno.models.deepseek import DeepSeek");
    }
}
