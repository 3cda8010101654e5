// All LLM prompt templates for rephrasing and chat-driven revision.
// Filled with llm_client::prompts::render_template.

use crate::llm_client::prompts::render_template;
use crate::rephrase::style::{customization_string, StyleParameters};

/// Rephrase prompt. Replace: {style}, {text}, {customizations}
pub const REPHRASE_PROMPT_TEMPLATE: &str = r#"Rephrase the following text in a {style} style:

{text}

Style-specific customizations:
{customizations}

Rephrased text:"#;

/// Revision prompt for "customize ..." chat messages.
/// Replace: {instruction}, {rephrased_text}
pub const CUSTOMIZE_PROMPT_TEMPLATE: &str = r#"Customize the rephrasing based on the following specifications:

{instruction}

Apply these customizations to the following text:

{rephrased_text}

Provide the customized text:"#;

pub fn build_rephrase_prompt(text: &str, params: &StyleParameters) -> String {
    let style = params.style().to_string();
    let customizations = customization_string(Some(params));
    render_template(
        REPHRASE_PROMPT_TEMPLATE,
        &[
            ("style", style.as_str()),
            ("text", text),
            ("customizations", customizations.as_str()),
        ],
    )
}

pub fn build_customize_prompt(instruction: &str, rephrased_text: &str) -> String {
    render_template(
        CUSTOMIZE_PROMPT_TEMPLATE,
        &[("instruction", instruction), ("rephrased_text", rephrased_text)],
    )
}
