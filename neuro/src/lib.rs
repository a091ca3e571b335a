pub mod clock;
pub mod data;
mod neuro;
pub mod pipeline;
pub mod render;
pub mod settings;
pub mod uniforms;

pub use crate::neuro::{Neuro, Problem, Renderer};
pub use settings::Settings;
pub use uniforms::{Uniforms, Viewport};

/// Element id of the canvas the browser host draws into.
pub const CANVAS_ELEMENT_ID: &str = "neuro";
