// src/services/prompt_composer.rs
use crate::models::Provider;

const AD_QUALIFIERS: &str = "professional product advertisement, high quality";
const RESOLUTION_QUALIFIER: &str = "4K resolution";

/// Builds the enhanced prompt. Style and mood are interpolated verbatim.
pub fn compose(description: &str, style: &str, mood: &str) -> String {
    format!(
        "{}, {} style, {} mood, {}, {}",
        description, style, mood, AD_QUALIFIERS, RESOLUTION_QUALIFIER
    )
}

/// Same as [`compose`], except Stability prompts drop the resolution clause.
pub fn compose_for(provider: Provider, description: &str, style: &str, mood: &str) -> String {
    match provider {
        Provider::OpenAi => compose(description, style, mood),
        Provider::Stability => format!(
            "{}, {} style, {} mood, {}",
            description, style, mood, AD_QUALIFIERS
        ),
    }
}
