//! WebGPU rendering module
//!
//! A single fullscreen-triangle pipeline raymarches the whole scene (floor,
//! wall boxes, actors) in the fragment shader via signed distance fields.

pub mod sdf_pipeline;

pub use sdf_pipeline::DungeonRenderState;
