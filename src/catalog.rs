//! Application, model and style codes recognised by the upstream service.

/// The image combiner app: edits an uploaded photo according to a prompt.
pub const COMBINER_APP: &str = "image_combiner";
/// The action figure generator app.
pub const FIGURE_APP: &str = "action_figure_generator";

pub const APPS: [&str; 2] = [COMBINER_APP, FIGURE_APP];

/// Models usable with [`COMBINER_APP`]. The first one is the default.
pub const COMBINER_MODELS: [&str; 3] = ["nano_banana", "seedream_4_2k", "pruna_image_editor"];
/// Models usable with [`FIGURE_APP`].
pub const GENERATOR_MODELS: [&str; 1] = ["headshot_master_ai"];

pub const STYLES: [&str; 9] = [
    "action_figure",
    "3d_chibi_toy",
    "barbie",
    "realistic",
    "pop_mart",
    "lego",
    "jellycat",
    "craft_style",
    "soft_toy",
];

pub const DEFAULT_APP: &str = COMBINER_APP;
pub const DEFAULT_MODEL: &str = COMBINER_MODELS[0];

/// Every known model code, combiner models first.
pub fn all_models() -> Vec<&'static str> {
    COMBINER_MODELS
        .iter()
        .chain(GENERATOR_MODELS.iter())
        .copied()
        .collect()
}
