/*! Render passes and pipeline compilation. */

pub mod compiler;
pub mod render_pass;
pub mod shader;

pub use compiler::{CompiledPass, CompiledPipeline, CompiledStage, Pipeline};
pub use render_pass::RenderPass;
pub use shader::{ComputeShader, FragmentShader, VertexShader};
