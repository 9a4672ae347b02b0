// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::bindings::visible_to::Stage;
use crate::passes::shader::{ComputeShader, FragmentShader, StageSource, VertexShader};

/**
Describes one render pass: up to three shader stages that share resources.

A pass needs at least one stage, and vertex and fragment stages come as a pair.  Either a
compute-only pass or a full compute/vertex/fragment triple is fine.

```
use slots_and_strides::passes::{RenderPass, VertexShader, FragmentShader};
let pass = RenderPass::new("sprites".to_string())
    .vertex(VertexShader::new("sprites_vs", "@vertex fn main() -> @builtin(position) vec4f { return vec4f(0.0); }".to_string()))
    .fragment(FragmentShader::new("sprites_fs", "@fragment fn main() -> @location(0) vec4f { return vec4f(1.0); }".to_string()));
assert!(!pass.is_internal());
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
    pub(crate) name: String,
    pub(crate) vertex_shader: Option<VertexShader>,
    pub(crate) fragment_shader: Option<FragmentShader>,
    pub(crate) compute_shader: Option<ComputeShader>,
    pub(crate) internal: bool,
}

impl RenderPass {
    /// A pass with no stages yet.
    ///
    /// ## Design note:
    /// We use Rust strings because we end up manipulating strings before passing to the backend
    pub fn new(name: String) -> Self {
        Self {
            name,
            vertex_shader: None,
            fragment_shader: None,
            compute_shader: None,
            internal: false,
        }
    }

    pub fn vertex(mut self, shader: VertexShader) -> Self {
        self.vertex_shader = Some(shader);
        self
    }

    pub fn fragment(mut self, shader: FragmentShader) -> Self {
        self.fragment_shader = Some(shader);
        self
    }

    pub fn compute(mut self, shader: ComputeShader) -> Self {
        self.compute_shader = Some(shader);
        self
    }

    /// Marks the pass as system-injected.  It binds internal resources in their own group.
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub const fn is_internal(&self) -> bool {
        self.internal
    }

    pub const fn has_compute(&self) -> bool {
        self.compute_shader.is_some()
    }

    /// The declared stages, in compile order.
    pub(crate) fn stages(&self) -> Vec<StageSource<'_>> {
        let mut stages = Vec::with_capacity(3);
        if let Some(shader) = &self.compute_shader {
            stages.push(StageSource {
                stage: Stage::Compute,
                label: shader.label,
                wgsl_code: &shader.wgsl_code,
            });
        }
        if let Some(shader) = &self.vertex_shader {
            stages.push(StageSource {
                stage: Stage::Vertex,
                label: shader.label,
                wgsl_code: &shader.wgsl_code,
            });
        }
        if let Some(shader) = &self.fragment_shader {
            stages.push(StageSource {
                stage: Stage::Fragment,
                label: shader.label,
                wgsl_code: &shader.wgsl_code,
            });
        }
        stages
    }
}
