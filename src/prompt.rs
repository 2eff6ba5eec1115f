//! Styling preferences and the try-on prompt template.
use serde::Deserialize;

pub const DEFAULT_RATIO: &str = "4:5";

/// Structured styling preferences for a single try-on render.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StyleRequest {
    pub outfit: String,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub fit: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub accessories: Option<Vec<String>>,
    #[serde(default)]
    pub vibe: Option<String>,
    #[serde(default)]
    pub variation: bool,
    #[serde(default = "default_ratio")]
    pub ratio: String,
}

fn default_ratio() -> String {
    DEFAULT_RATIO.to_string()
}

impl StyleRequest {
    pub fn new(outfit: impl Into<String>) -> Self {
        Self {
            outfit: outfit.into(),
            occasion: None,
            fit: None,
            color: None,
            accessories: None,
            vibe: None,
            variation: false,
            ratio: default_ratio(),
        }
    }

    /// Renders the natural-language prompt sent to the combiner model.
    pub fn render_prompt(&self) -> String {
        let accessories = match &self.accessories {
            Some(items) if !items.is_empty() => items.join(", "),
            _ => "none".to_string(),
        };
        let variation = if self.variation {
            "Create a slightly different variation with unique fabric detailing."
        } else {
            ""
        };

        let prompt = format!(
            "Transform the uploaded person into a high-resolution realistic fashion photoshoot.

Outfit type: {outfit}.
Occasion: {occasion}.
Fit style: {fit}.
Primary colors: {color}.
Accessories: {accessories}.
Fashion vibe: {vibe}.

Keep the person's face unchanged.
Preserve identity and facial structure.
Maintain realistic body proportions.
Professional fashion lighting.
Ultra-detailed fabric textures.
Editorial quality image.
{variation}",
            outfit = self.outfit,
            occasion = or_default(&self.occasion, "modern setting"),
            fit = or_default(&self.fit, "natural fit"),
            color = or_default(&self.color, "balanced tones"),
            vibe = or_default(&self.vibe, "modern fashion aesthetic"),
        );
        prompt.trim().to_string()
    }
}

fn or_default<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(fallback)
}
