pub mod size;

#[cfg(target_arch = "wasm32")]
mod wasm_wrapper;

#[cfg(target_arch = "wasm32")]
pub use wasm_wrapper::Neuro;
