// src/services/prompt_composer.rs
use crate::catalog::{NO_STYLE, find_style};
use crate::directives::tone_keywords;
use crate::models::BrandTone;

const SEPARATOR: &str = ". ";

/// Builds the final image prompt: style medium, then tone keywords, then the
/// user's subject. Empty fragments are dropped, unknown styles count as none.
/// The subject is kept as typed apart from surrounding whitespace.
pub fn compose_prompt(raw_prompt: &str, style_id: &str, tone: BrandTone) -> String {
    let style_modifier = if style_id == NO_STYLE {
        ""
    } else {
        find_style(style_id)
            .map(|preset| preset.prompt_modifier)
            .unwrap_or("")
    };

    join_fragments(&[style_modifier, tone_keywords(tone), raw_prompt])
}

// A fragment followed by another one gives up a single trailing period, which
// the separator supplies. The last fragment is never altered.
fn join_fragments(fragments: &[&str]) -> String {
    let fragments: Vec<&str> = fragments
        .iter()
        .map(|fragment| fragment.trim())
        .filter(|fragment| !fragment.is_empty())
        .collect();

    let mut composed = String::new();
    for (index, fragment) in fragments.iter().enumerate() {
        if index + 1 == fragments.len() {
            composed.push_str(fragment);
        } else {
            composed.push_str(fragment.strip_suffix('.').unwrap_or(fragment));
            composed.push_str(SEPARATOR);
        }
    }
    composed
}
