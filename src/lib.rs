/*! slots_and_strides is a host-side compiler for GPU resource layouts and bindings.

You declare resources (uniform values, storage buffers, samplers, textures) and write the body of
each shader stage.  slots_and_strides computes

* a byte-exact memory layout for every buffer, and
* the `@group`/`@binding` declarations each stage needs, together with host-side binding records
  that agree with the shader text index-for-index.

It computes; it does not render.  Command submission, window management and draw sequencing are
left to your backend.

# Pipeline

| Step        | Module                         | Input                              | Output                                   |
|-------------|--------------------------------|------------------------------------|------------------------------------------|
| Parse       | [layout::struct_parser]        | WGSL source                        | [layout::StructDefinition]s              |
| Lay out     | [layout::calculator]           | struct definitions, constants      | [layout::StructLayout]s                  |
| Resolve     | [bindings::access_mode]        | stage, visibility                  | read or read-write access                |
| Synthesize  | [bindings::synthesize]         | [bindings::Resources], pass, stage | binding text, [bindings::BindingAssignment]s |
| Compile     | [passes::compiler]             | [passes::Pipeline]                 | [passes::CompiledPipeline]               |
| Pack        | [layout::packer]               | layout, uniform values             | bytes                                    |

# Layout rules

Sizes and alignments follow WGSL, with one documented quirk: padding between fields is decided by
the *next field's size* rather than its alignment.  Buffers depend on this, so it is kept; structs
where it disagrees with the canonical rule are reported in
[layout::StructLayout::canonical_disagreements].

# Groups and access

User resources bind in `@group(0)` and resources the system declares for its own passes bind in
`@group(1)`.  Binding indices restart at 0 for each stage.  A buffer written by a compute stage is
read-only in every other stage that sees it.

# Example

```
use slots_and_strides::passes::{Pipeline, RenderPass, ComputeShader, VertexShader, FragmentShader};
use slots_and_strides::bindings::{StorageOptions, StageSet, Stage};

let mut pipeline = Pipeline::new();
let resources = pipeline.resources_mut();
resources.declare_uniform("time", 0.0f32, "f32");
resources.declare_storage("particles", "array<Particle, 4>", StorageOptions {
    visibility: StageSet::COMPUTE | StageSet::VERTEX,
    ..Default::default()
}).unwrap();

let particle = "struct Particle { position: vec2f, life: f32 }\n";
pipeline.add_render_pass(RenderPass::new("particles".to_string())
    .compute(ComputeShader::new("simulate", format!("{particle}@compute @workgroup_size(64) fn main() {{}}")))
    .vertex(VertexShader::new("draw", format!("{particle}@vertex fn main() -> @builtin(position) vec4f {{ return vec4f(0.0); }}")))
    .fragment(FragmentShader::new("shade", "@fragment fn main() -> @location(0) vec4f { return vec4f(1.0); }".to_string())));

let compiled = pipeline.compile().unwrap();
assert_eq!(compiled.storage_size("particles"), Some(64));
let vertex = compiled.pass(0).unwrap().text(Stage::Vertex).unwrap();
assert!(vertex.contains("@group(0) @binding(1) var<storage, read> particles: array<Particle,4>;"));
```

# Backends

With the default `backend_wgpu` feature, [passes::CompiledPipeline::layout_entries] converts the
bindings of a stage into [wgpu](https://wgpu.rs) bind group layout entries.
*/

pub mod bindings;
mod bittricks;
pub mod error;
mod imp;
pub mod layout;
pub mod passes;

pub use error::{Error, Warning};

#[cfg(feature = "backend_wgpu")]
pub use imp::layout_entry;
