// src/directives.rs
//! Static text tables keyed by [`BrandTone`] and [`AspectRatio`].
//!
//! Every table must list every enum member; [`validate_tables`] runs at
//! startup and refuses to boot the server otherwise.

use crate::errors::StudioError;
use crate::models::{AspectRatio, BrandTone};

/// Tone directive given to the enhancement model.
pub static TONE_INSTRUCTIONS: &[(BrandTone, &str)] = &[
    (
        BrandTone::Default,
        "Keep a balanced, high-quality, professional look that fits the subject naturally.",
    ),
    (
        BrandTone::Minimalist,
        "Apply a minimalist brand tone: clean lines, generous negative space, a restrained palette and an uncluttered composition.",
    ),
    (
        BrandTone::Luxury,
        "Apply a luxury brand tone: premium materials such as marble, gold and velvet, elegant low-key lighting and an exclusive, sophisticated mood.",
    ),
    (
        BrandTone::Energetic,
        "Apply an energetic brand tone: saturated colors, dynamic angles, motion and a bold, high-impact composition.",
    ),
    (
        BrandTone::Corporate,
        "Apply a corporate brand tone: polished, well-lit modern settings that communicate trust, competence and clarity.",
    ),
    (
        BrandTone::Playful,
        "Apply a playful brand tone: bright cheerful colors, soft rounded shapes, whimsical details and a lighthearted mood.",
    ),
];

/// Keywords injected verbatim into the final image prompt. Empty for the
/// default tone.
pub static TONE_KEYWORDS: &[(BrandTone, &str)] = &[
    (BrandTone::Default, ""),
    (
        BrandTone::Minimalist,
        "minimalist aesthetic, clean lines, negative space, restrained palette",
    ),
    (
        BrandTone::Luxury,
        "luxury aesthetic, premium materials, elegant lighting, sophisticated atmosphere",
    ),
    (
        BrandTone::Energetic,
        "energetic vibe, vibrant saturated colors, dynamic composition, bold contrast",
    ),
    (
        BrandTone::Corporate,
        "corporate professional style, clean modern setting, trustworthy, polished",
    ),
    (
        BrandTone::Playful,
        "playful mood, bright cheerful colors, whimsical details, rounded shapes",
    ),
];

/// Scenario context for creative suggestions.
pub static SUGGESTION_CONTEXTS: &[(BrandTone, &str)] = &[
    (
        BrandTone::Default,
        "Imagine any visually striking scene: a product shot, a character, a place or an abstract concept.",
    ),
    (
        BrandTone::Minimalist,
        "Imagine a minimalist brand visual: a single hero object on a calm, empty background.",
    ),
    (
        BrandTone::Luxury,
        "Imagine a luxury brand campaign: high-end products, opulent interiors or haute couture.",
    ),
    (
        BrandTone::Energetic,
        "Imagine an energetic campaign visual: sports, music, street culture or motion-filled action.",
    ),
    (
        BrandTone::Corporate,
        "Imagine a corporate brand visual: modern offices, teamwork, technology or confident professionals.",
    ),
    (
        BrandTone::Playful,
        "Imagine a playful brand visual: cute characters, toys, candy colors or whimsical worlds.",
    ),
];

pub struct RatioDirective {
    /// Composition guidance for the enhancement model.
    pub composition: &'static str,
    /// Must appear verbatim in the enhanced prompt. Always names the ratio.
    pub keyword: &'static str,
}

pub static RATIO_DIRECTIVES: &[(AspectRatio, RatioDirective)] = &[
    (
        AspectRatio::Square,
        RatioDirective {
            composition: "Compose for a square canvas: center the subject with balanced, symmetrical framing and even margins.",
            keyword: "1:1 square format, centered composition",
        },
    ),
    (
        AspectRatio::Wide,
        RatioDirective {
            composition: "Compose for a wide cinematic frame: horizontal flow, panoramic framing and room for the scene to breathe left to right.",
            keyword: "16:9 wide cinematic landscape composition",
        },
    ),
    (
        AspectRatio::Tall,
        RatioDirective {
            composition: "Compose for a tall mobile frame: stack elements vertically and keep the subject full height within the frame.",
            keyword: "9:16 vertical portrait composition, full height framing",
        },
    ),
    (
        AspectRatio::Landscape,
        RatioDirective {
            composition: "Compose for a classic landscape frame, slightly wider than tall, with the subject placed on the rule of thirds.",
            keyword: "4:3 landscape format, classic framing",
        },
    ),
    (
        AspectRatio::Portrait,
        RatioDirective {
            composition: "Compose for a classic portrait frame, slightly taller than wide, with a strong vertical focal line.",
            keyword: "3:4 portrait format, vertical framing",
        },
    ),
];

fn lookup_tone(table: &'static [(BrandTone, &'static str)], tone: BrandTone) -> &'static str {
    table
        .iter()
        .find(|(key, _)| *key == tone)
        .or_else(|| table.iter().find(|(key, _)| *key == BrandTone::Default))
        .map(|(_, text)| *text)
        .unwrap_or("")
}

pub fn tone_instruction(tone: BrandTone) -> &'static str {
    lookup_tone(TONE_INSTRUCTIONS, tone)
}

pub fn tone_keywords(tone: BrandTone) -> &'static str {
    lookup_tone(TONE_KEYWORDS, tone)
}

pub fn suggestion_context(tone: BrandTone) -> &'static str {
    lookup_tone(SUGGESTION_CONTEXTS, tone)
}

pub fn ratio_directive(ratio: AspectRatio) -> &'static RatioDirective {
    RATIO_DIRECTIVES
        .iter()
        .find(|(key, _)| *key == ratio)
        .map(|(_, directive)| directive)
        .unwrap_or(&RATIO_DIRECTIVES[0].1)
}

/// Extra framing constraint for suggestions. Only the tall and wide ratios
/// get one.
pub fn suggestion_framing(ratio: AspectRatio) -> &'static str {
    match ratio {
        AspectRatio::Tall => {
            "The scene must suit a tall 9:16 vertical frame, with the subject filling the height."
        }
        AspectRatio::Wide => {
            "The scene must suit a wide 16:9 frame, with a panoramic, horizontal layout."
        }
        _ => "",
    }
}

/// Checks that every tone and ratio table covers every enum member and that
/// each ratio keyword names its own ratio.
pub fn validate_tables() -> Result<(), StudioError> {
    let tone_tables: [(&str, &[(BrandTone, &str)]); 3] = [
        ("tone instructions", TONE_INSTRUCTIONS),
        ("tone keywords", TONE_KEYWORDS),
        ("suggestion contexts", SUGGESTION_CONTEXTS),
    ];

    for (name, table) in tone_tables {
        for tone in BrandTone::ALL {
            if !table.iter().any(|(key, _)| *key == tone) {
                return Err(StudioError::Config(format!(
                    "{} table is missing tone '{}'",
                    name,
                    tone.as_str()
                )));
            }
        }
    }

    for ratio in AspectRatio::ALL {
        let directive = RATIO_DIRECTIVES
            .iter()
            .find(|(key, _)| *key == ratio)
            .map(|(_, directive)| directive)
            .ok_or_else(|| {
                StudioError::Config(format!(
                    "ratio directive table is missing '{}'",
                    ratio.as_str()
                ))
            })?;

        if !directive.keyword.contains(ratio.as_str()) {
            return Err(StudioError::Config(format!(
                "ratio keyword '{}' does not name ratio '{}'",
                directive.keyword,
                ratio.as_str()
            )));
        }
    }

    Ok(())
}
