//! wgpu render pipelines.

pub mod mesh;
