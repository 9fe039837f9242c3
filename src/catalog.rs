// src/catalog.rs
use crate::models::StylePreset;

pub const NO_STYLE: &str = "none";

/// Style presets in display order.
pub static STYLE_PRESETS: &[StylePreset] = &[
    StylePreset {
        id: NO_STYLE,
        name: "No Style",
        description: "Use the prompt as written",
        prompt_modifier: "",
        thumbnail: "/thumbnails/none.png",
    },
    StylePreset {
        id: "cinematic",
        name: "Cinematic",
        description: "Film still with dramatic lighting",
        prompt_modifier: "Cinematic film still, dramatic lighting, anamorphic lens, shallow depth of field, color graded",
        thumbnail: "/thumbnails/cinematic.png",
    },
    StylePreset {
        id: "photorealistic",
        name: "Photorealistic",
        description: "High-end studio photography",
        prompt_modifier: "Photorealistic, 8k resolution, shot on a full-frame DSLR, 85mm lens, natural skin and material detail",
        thumbnail: "/thumbnails/photorealistic.png",
    },
    StylePreset {
        id: "anime",
        name: "Anime",
        description: "Japanese animation look",
        prompt_modifier: "Anime style illustration, cel shading, vibrant colors, detailed line art, studio quality key visual",
        thumbnail: "/thumbnails/anime.png",
    },
    StylePreset {
        id: "3d-render",
        name: "3D Render",
        description: "Clean product-grade 3D",
        prompt_modifier: "3D render, octane render, global illumination, subsurface scattering, soft studio lighting",
        thumbnail: "/thumbnails/3d-render.png",
    },
    StylePreset {
        id: "watercolor",
        name: "Watercolor",
        description: "Soft painted washes",
        prompt_modifier: "Watercolor painting, soft washes, visible paper texture, delicate bleeding edges",
        thumbnail: "/thumbnails/watercolor.png",
    },
    StylePreset {
        id: "oil-painting",
        name: "Oil Painting",
        description: "Classical canvas work",
        prompt_modifier: "Oil painting on canvas, impasto brushstrokes, rich pigments, classical composition",
        thumbnail: "/thumbnails/oil-painting.png",
    },
    StylePreset {
        id: "cyberpunk",
        name: "Cyberpunk",
        description: "Neon-soaked future city",
        prompt_modifier: "Cyberpunk aesthetic, neon lights, rain-slick reflections, futuristic high-tech atmosphere",
        thumbnail: "/thumbnails/cyberpunk.png",
    },
    StylePreset {
        id: "flat-illustration",
        name: "Flat Illustration",
        description: "Vector shapes for marketing",
        prompt_modifier: "Flat vector illustration, bold geometric shapes, limited color palette, clean edges",
        thumbnail: "/thumbnails/flat-illustration.png",
    },
    StylePreset {
        id: "pixel-art",
        name: "Pixel Art",
        description: "Retro 16-bit sprites",
        prompt_modifier: "Pixel art, 16-bit retro game style, crisp pixels, limited palette",
        thumbnail: "/thumbnails/pixel-art.png",
    },
];

pub fn find_style(id: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS.iter().find(|preset| preset.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = STYLE_PRESETS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), STYLE_PRESETS.len());
    }

    #[test]
    fn none_has_empty_modifier_and_others_do_not() {
        for preset in STYLE_PRESETS {
            if preset.id == NO_STYLE {
                assert!(preset.prompt_modifier.is_empty());
            } else {
                assert!(!preset.prompt_modifier.trim().is_empty(), "{}", preset.id);
            }
        }
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(find_style("cinematic").map(|p| p.name), Some("Cinematic"));
        assert!(find_style("baroque").is_none());
    }
}
