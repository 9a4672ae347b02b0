use crate::bindings::visible_to::Stage;

/// WGSL source for the vertex stage of a render pass.
///
/// The source is the user body only; bindings, generated structs and constants are prepended
/// when the pipeline compiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexShader {
    pub(crate) label: &'static str,
    //may need additional type design for future backends
    pub(crate) wgsl_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentShader {
    pub(crate) label: &'static str,
    pub(crate) wgsl_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeShader {
    pub(crate) label: &'static str,
    pub(crate) wgsl_code: String,
}

impl VertexShader {
    pub fn new(label: &'static str, wgsl_code: String) -> Self {
        Self { label, wgsl_code }
    }
}

impl FragmentShader {
    pub fn new(label: &'static str, wgsl_code: String) -> Self {
        Self { label, wgsl_code }
    }
}

impl ComputeShader {
    pub fn new(label: &'static str, wgsl_code: String) -> Self {
        Self { label, wgsl_code }
    }
}

/// A shader of any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StageSource<'a> {
    pub(crate) stage: Stage,
    pub(crate) label: &'static str,
    pub(crate) wgsl_code: &'a str,
}
