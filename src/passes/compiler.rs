// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Compiles a [Pipeline] of render passes.
//!
//! For each pass, compilation
//!
//! 1. generates `struct Params`, `struct InternalParams` and `struct Mesh` from the declared
//!    uniforms, and `const` declarations from the declared constants;
//! 2. computes the layout of every struct in the pass (user structs from every stage, then the
//!    generated ones);
//! 3. synthesizes bindings for each stage and group, and prepends them with the generated text to
//!    the stage's source;
//! 4. sizes every buffer the pass binds.
//!
//! Any error aborts the whole pipeline.
//!
//! ```
//! use slots_and_strides::passes::{Pipeline, RenderPass, ComputeShader};
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.resources_mut().declare_uniform("time", 0.5f32, "f32");
//! pipeline.resources_mut().declare_uniform("screen", [800.0f32, 600.0], "vec2f");
//! pipeline.add_render_pass(RenderPass::new("simulate".to_string())
//!     .compute(ComputeShader::new("simulate", "@compute @workgroup_size(1) fn main() {}".to_string())));
//! let compiled = pipeline.compile().unwrap();
//! let params = compiled.uniform_layout(false).unwrap();
//! assert_eq!(params.byte_size, 16);
//! assert_eq!(params.padding_after("time"), 1);
//! assert_eq!(compiled.pack_uniforms(pipeline.resources(), false).unwrap().len(), 16);
//! ```

use crate::bindings::resources::{Resource, ResourceKind, Resources, Uniform};
use crate::bindings::synthesize::{
    self, BindingAssignment, BoundResource, CompiledBindings, PassContext, INTERNAL_UNIFORM_STRUCT,
    MESH_STRUCT, UNIFORM_STRUCT,
};
use crate::bindings::visible_to::Stage;
use crate::error::Error;
use crate::layout::{compute_layouts, pack, parse_structs, Layouts, StructDefinition, StructLayout};
use crate::passes::render_pass::RenderPass;
use std::collections::HashMap;

/// Resources plus the render passes that use them.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    resources: Resources,
    passes: Vec<RenderPass>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Adds a pass and returns its index.
    ///
    /// Indices saturate at `u32::MAX`; [Pipeline::compile] rejects a pipeline with that many passes.
    pub fn add_render_pass(&mut self, pass: RenderPass) -> u32 {
        self.passes.push(pass);
        u32::try_from(self.passes.len() - 1).unwrap_or(u32::MAX)
    }

    pub fn render_passes(&self) -> &[RenderPass] {
        &self.passes
    }

    fn validate(&self) -> Result<(), Error> {
        if u32::try_from(self.passes.len()).is_err() {
            return Err(Error::TooManyRenderPasses(self.passes.len()));
        }
        for (index, pass) in (0u32..).zip(&self.passes) {
            match (&pass.vertex_shader, &pass.fragment_shader) {
                (Some(_), None) | (None, Some(_)) => {
                    return Err(Error::IncompleteRenderPair(index));
                }
                (None, None) if pass.compute_shader.is_none() => {
                    return Err(Error::EmptyRenderPass(index));
                }
                _ => {}
            }
        }
        if !self.passes.iter().any(RenderPass::has_compute)
            && let Some(texture) = self.resources.binding_textures().next()
        {
            return Err(Error::BindingTextureWithoutCompute(texture.write_name.clone()));
        }
        Ok(())
    }

    /// Compiles every render pass.
    pub fn compile(&self) -> Result<CompiledPipeline, Error> {
        logwise::info_sync!(
            "Compiling pipeline with {passes} render passes",
            passes = self.passes.len()
        );
        self.validate()?;
        let mut passes = Vec::with_capacity(self.passes.len());
        let mut storage_sizes: HashMap<String, u32> = HashMap::new();
        for (index, pass) in (0u32..).zip(&self.passes) {
            let compiled = compile_pass(&self.resources, pass, index)?;
            for (resource, &size) in &compiled.buffer_sizes {
                let name = match resource {
                    BoundResource::Storage { .. } | BoundResource::Layers => resource.name(),
                    _ => continue,
                };
                match storage_sizes.get(name) {
                    Some(&first) if first != size => {
                        return Err(Error::StorageSizeMismatch {
                            name: name.to_string(),
                            first,
                            second: size,
                        });
                    }
                    Some(_) => {}
                    None => {
                        storage_sizes.insert(name.to_string(), size);
                    }
                }
            }
            passes.push(compiled);
        }
        logwise::info_sync!(
            "Compiled {passes} render passes, {storages} storage buffers",
            passes = passes.len(),
            storages = storage_sizes.len()
        );
        Ok(CompiledPipeline {
            passes,
            storage_sizes,
        })
    }
}

/// One compiled stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStage {
    pub stage: Stage,
    pub label: &'static str,
    /// Bindings, generated structs and constants, then the user's source.
    pub text: String,
    /// One entry per group the pass compiles.
    pub bindings: Vec<CompiledBindings>,
}

#[derive(Debug, Clone)]
pub struct CompiledPass {
    context: PassContext,
    name: String,
    stages: Vec<CompiledStage>,
    layouts: Layouts,
    buffer_sizes: HashMap<BoundResource, u32>,
}

impl CompiledPass {
    pub const fn index(&self) -> u32 {
        self.context.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn context(&self) -> PassContext {
        self.context
    }

    pub fn stages(&self) -> &[CompiledStage] {
        &self.stages
    }

    pub fn stage(&self, stage: Stage) -> Option<&CompiledStage> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Final WGSL for `stage`.
    pub fn text(&self, stage: Stage) -> Option<&str> {
        self.stage(stage).map(|s| s.text.as_str())
    }

    /// Every binding of `stage`, across groups.
    pub fn assignments(&self, stage: Stage) -> impl Iterator<Item = &BindingAssignment> {
        self.stage(stage)
            .into_iter()
            .flat_map(|s| s.bindings.iter())
            .flat_map(|b| b.assignments.iter())
    }

    /// Layouts of every struct visible to the pass.
    pub fn layouts(&self) -> &Layouts {
        &self.layouts
    }

    /// Byte size of a buffer bound by this pass.  Textures and samplers have none.
    pub fn buffer_size(&self, resource: &BoundResource) -> Option<u32> {
        self.buffer_sizes.get(resource).copied()
    }
}

#[derive(Debug, Clone)]
pub struct CompiledPipeline {
    passes: Vec<CompiledPass>,
    storage_sizes: HashMap<String, u32>,
}

impl CompiledPipeline {
    pub fn passes(&self) -> &[CompiledPass] {
        &self.passes
    }

    pub fn pass(&self, index: u32) -> Option<&CompiledPass> {
        self.passes.get(index as usize)
    }

    fn pass_or_err(&self, index: u32) -> Result<&CompiledPass, Error> {
        self.pass(index)
            .ok_or_else(|| Error::UnknownResource(format!("render pass {index}")))
    }

    /// Byte size of every storage buffer (and the layer storage) bound anywhere.
    pub fn storage_sizes(&self) -> &HashMap<String, u32> {
        &self.storage_sizes
    }

    pub fn storage_size(&self, name: &str) -> Option<u32> {
        self.storage_sizes.get(name).copied()
    }

    /// Layout of the user (`Params`) or internal (`InternalParams`) uniform block.
    pub fn uniform_layout(&self, internal: bool) -> Option<&StructLayout> {
        let name = if internal {
            INTERNAL_UNIFORM_STRUCT
        } else {
            UNIFORM_STRUCT
        };
        self.passes.iter().find_map(|p| p.layouts.get(name))
    }

    /// Packs the current uniform values of one group.
    ///
    /// Values may change after compilation; types may not.  An empty group packs to no bytes.
    pub fn pack_uniforms(&self, resources: &Resources, internal: bool) -> Result<Vec<u8>, Error> {
        let mut uniforms = resources.uniforms(internal).peekable();
        if uniforms.peek().is_none() {
            return Ok(Vec::new());
        }
        let layout = self.uniform_layout(internal).ok_or_else(|| {
            let name = if internal {
                INTERNAL_UNIFORM_STRUCT
            } else {
                UNIFORM_STRUCT
            };
            Error::UnknownResource(name.to_string())
        })?;
        pack(layout, uniforms.map(|u| (u.name.as_str(), &u.value)))
    }

    /// Packs the current mesh uniforms of render pass `pass`.
    pub fn pack_mesh_uniforms(&self, resources: &Resources, pass: u32) -> Result<Vec<u8>, Error> {
        let compiled = self.pass_or_err(pass)?;
        let mut uniforms = resources.mesh_uniforms(pass).peekable();
        if uniforms.peek().is_none() {
            return Ok(Vec::new());
        }
        let layout = compiled
            .layouts
            .get(MESH_STRUCT)
            .ok_or_else(|| Error::UnknownResource(MESH_STRUCT.to_string()))?;
        pack(layout, uniforms.map(|u| (u.name.as_str(), &u.value)))
    }

    /// Re-synthesizes the bindings of one stage and checks them against the compiled layout.
    ///
    /// Call this when a resource's backing object changes; the returned bindings are only valid
    /// if they occupy the same slots as before.
    pub fn refresh_bindings(
        &self,
        resources: &Resources,
        pass: u32,
        stage: Stage,
    ) -> Result<Vec<CompiledBindings>, Error> {
        let compiled = self.pass_or_err(pass)?;
        let layout = compiled
            .stage(stage)
            .ok_or_else(|| Error::UnknownResource(format!("{stage} stage of render pass {pass}")))?;
        let mut refreshed = Vec::with_capacity(layout.bindings.len());
        for previous in &layout.bindings {
            let bindings = synthesize::synthesize(resources, compiled.context, stage, previous.group);
            synthesize::verify_refresh(&previous.assignments, &bindings.assignments)?;
            refreshed.push(bindings);
        }
        Ok(refreshed)
    }

    /// Bind group layout entries for one stage and group of a pass.
    #[cfg(feature = "backend_wgpu")]
    pub fn layout_entries(
        &self,
        pass: u32,
        stage: Stage,
        group: u32,
    ) -> Result<Vec<wgpu::BindGroupLayoutEntry>, Error> {
        let compiled = self.pass_or_err(pass)?;
        Ok(compiled
            .assignments(stage)
            .filter(|a| a.group == group)
            .map(|a| crate::imp::layout_entry(a, compiled.buffer_size(&a.resource)))
            .collect())
    }
}

fn struct_text<'a>(name: &str, uniforms: impl Iterator<Item = &'a Uniform>) -> Option<String> {
    let mut fields = String::new();
    for uniform in uniforms {
        fields.push_str(&format!("    {}: {},\n", uniform.name, uniform.type_name));
    }
    (!fields.is_empty()).then(|| format!("struct {name} {{\n{fields}}}\n"))
}

/// Generated structs and constants shared by every stage of a pass.
fn boilerplate(resources: &Resources, context: PassContext) -> String {
    let mut text = String::new();
    let blocks = [
        struct_text(UNIFORM_STRUCT, resources.uniforms(false)),
        context
            .internal
            .then(|| struct_text(INTERNAL_UNIFORM_STRUCT, resources.uniforms(true)))
            .flatten(),
        struct_text(MESH_STRUCT, resources.mesh_uniforms(context.index)),
    ];
    for block in blocks.into_iter().flatten() {
        text.push_str(&block);
    }
    for constant in resources.constants() {
        text.push_str(&format!(
            "const {}: {} = {};\n",
            constant.name, constant.type_name, constant.value
        ));
    }
    text
}

/// Adds `definition` unless an identical struct of the same name is already present.
fn merge_definition(
    definitions: &mut Vec<StructDefinition>,
    definition: StructDefinition,
) -> Result<(), Error> {
    match definitions.iter().find(|d| d.name == definition.name) {
        Some(existing) if *existing == definition => Ok(()),
        Some(_) => Err(Error::ConflictingStruct(definition.name)),
        None => {
            definitions.push(definition);
            Ok(())
        }
    }
}

fn buffer_size(
    resources: &Resources,
    layouts: &Layouts,
    context: PassContext,
    resource: &BoundResource,
) -> Result<Option<u32>, Error> {
    let struct_size = |name: &str| {
        layouts
            .get(name)
            .map(|l| l.byte_size)
            .ok_or_else(|| Error::UnknownResource(name.to_string()))
    };
    let size = match resource {
        BoundResource::Uniforms { internal: false } => struct_size(UNIFORM_STRUCT)?,
        BoundResource::Uniforms { internal: true } => struct_size(INTERNAL_UNIFORM_STRUCT)?,
        BoundResource::MeshUniforms => struct_size(MESH_STRUCT)?,
        BoundResource::Storage { name, .. } => {
            let Some(Resource::Storage(storage)) = resources.get(ResourceKind::Storage, name) else {
                return Err(Error::UnknownResource(name.clone()));
            };
            let described = layouts.describe(&storage.r#type)?.size;
            let payload = match &storage.payload {
                Some(p) => u32::try_from(p.len()).map_err(|_| Error::SizeOverflow {
                    type_name: storage.r#type.to_string(),
                })?,
                None => 0,
            };
            described.max(payload)
        }
        BoundResource::Layers => {
            let layers = resources
                .layers()
                .ok_or_else(|| Error::UnknownResource(resource.name().to_string()))?;
            layouts.describe(&layers.r#type())?.size
        }
        _ => return Ok(None),
    };
    logwise::trace_sync!(
        "pass {pass}: {name} is {size} bytes",
        pass = context.index,
        name = logwise::privacy::LogIt(&resource.name()),
        size = size
    );
    Ok(Some(size))
}

fn compile_pass(resources: &Resources, pass: &RenderPass, index: u32) -> Result<CompiledPass, Error> {
    let context = PassContext {
        index,
        internal: pass.internal,
    };
    let boilerplate = boilerplate(resources, context);
    let stages = pass.stages();

    let mut definitions = Vec::new();
    for source in stages
        .iter()
        .map(|s| s.wgsl_code)
        .chain(std::iter::once(boilerplate.as_str()))
    {
        for definition in parse_structs(source)? {
            merge_definition(&mut definitions, definition)?;
        }
    }
    let layouts = compute_layouts(&definitions, &resources.integer_constants())?;

    let mut compiled_stages = Vec::with_capacity(stages.len());
    let mut buffer_sizes = HashMap::new();
    for source in stages {
        let bindings: Vec<CompiledBindings> = context
            .groups()
            .iter()
            .map(|&group| synthesize::synthesize(resources, context, source.stage, group))
            .collect();
        let mut text = String::new();
        for group in &bindings {
            text.push_str(&group.text);
            for assignment in &group.assignments {
                if buffer_sizes.contains_key(&assignment.resource) {
                    continue;
                }
                if let Some(size) = buffer_size(resources, &layouts, context, &assignment.resource)? {
                    buffer_sizes.insert(assignment.resource.clone(), size);
                }
            }
        }
        text.push('\n');
        text.push_str(&boilerplate);
        text.push('\n');
        text.push_str(source.wgsl_code);
        compiled_stages.push(CompiledStage {
            stage: source.stage,
            label: source.label,
            text,
            bindings,
        });
    }
    logwise::info_sync!(
        "Compiled render pass {name} ({index}) with {stages} stages",
        name = logwise::privacy::LogIt(&pass.name()),
        index = index,
        stages = compiled_stages.len()
    );
    Ok(CompiledPass {
        context,
        name: pass.name().to_string(),
        stages: compiled_stages,
        layouts,
        buffer_sizes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::resources::{BindingTextureOptions, DeclareOptions, StorageOptions};
    use crate::bindings::visible_to::StageSet;
    use crate::passes::shader::{ComputeShader, FragmentShader, VertexShader};

    const PARTICLE: &str = "struct Particle { position: vec2f, life: f32 }\n";

    fn compute_pass(name: &'static str, body: &str) -> RenderPass {
        RenderPass::new(name.to_string()).compute(ComputeShader::new(name, body.to_string()))
    }

    fn draw_pass(name: &'static str, vertex: &str, fragment: &str) -> RenderPass {
        RenderPass::new(name.to_string())
            .vertex(VertexShader::new(name, vertex.to_string()))
            .fragment(FragmentShader::new(name, fragment.to_string()))
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn validation() {
        let mut pipeline = Pipeline::new();
        pipeline.add_render_pass(RenderPass::new("empty".to_string()));
        assert_eq!(pipeline.compile().unwrap_err(), Error::EmptyRenderPass(0));

        let mut pipeline = Pipeline::new();
        assert_eq!(pipeline.add_render_pass(compute_pass("ok", "")), 0);
        let half = pipeline.add_render_pass(
            RenderPass::new("half".to_string()).vertex(VertexShader::new("half", String::new())),
        );
        assert_eq!(half, 1);
        assert_eq!(pipeline.compile().unwrap_err(), Error::IncompleteRenderPair(half));

        let mut pipeline = Pipeline::new();
        pipeline
            .resources_mut()
            .declare_binding_texture("trail_out", "trail_in", BindingTextureOptions::default())
            .unwrap();
        pipeline.add_render_pass(draw_pass("draw", "", ""));
        assert_eq!(
            pipeline.compile().unwrap_err(),
            Error::BindingTextureWithoutCompute("trail_out".to_string())
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn stage_text_layout() {
        let mut pipeline = Pipeline::new();
        let r = pipeline.resources_mut();
        r.declare_uniform("time", 0.0f32, "f32");
        r.declare_constant("COUNT", "u32", "4u").unwrap();
        r.declare_storage(
            "particles",
            "array<Particle, COUNT>",
            StorageOptions {
                visibility: StageSet::COMPUTE,
                ..Default::default()
            },
        )
        .unwrap();
        pipeline.add_render_pass(compute_pass("sim", PARTICLE));
        let compiled = pipeline.compile().unwrap();
        let pass = compiled.pass(0).unwrap();
        assert_eq!(
            pass.text(Stage::Compute).unwrap(),
            format!(
                "@group(0) @binding(0) var<uniform> params: Params;\n\
                 @group(0) @binding(1) var<storage, read_write> particles: array<Particle,COUNT>;\n\
                 \n\
                 struct Params {{\n    time: f32,\n}}\n\
                 const COUNT: u32 = 4u;\n\
                 \n{PARTICLE}"
            )
        );
        assert_eq!(compiled.storage_size("particles"), Some(64));
        assert_eq!(
            pass.buffer_size(&BoundResource::Uniforms { internal: false }),
            Some(16)
        );
        assert!(pass.text(Stage::Vertex).is_none());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn storage_size_mismatch_between_passes() {
        let mut pipeline = Pipeline::new();
        pipeline
            .resources_mut()
            .declare_storage("data", "Blob", StorageOptions::default())
            .unwrap();
        pipeline.add_render_pass(compute_pass("a", "struct Blob { a: vec4f }"));
        pipeline.add_render_pass(compute_pass("b", "struct Blob { a: vec4f, b: vec4f }"));
        assert_eq!(
            pipeline.compile().unwrap_err(),
            Error::StorageSizeMismatch {
                name: "data".to_string(),
                first: 16,
                second: 32
            }
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn conflicting_structs_within_a_pass() {
        let mut pipeline = Pipeline::new();
        pipeline.add_render_pass(draw_pass(
            "draw",
            "struct V { a: f32 }",
            "struct V { a: vec2f }",
        ));
        assert_eq!(
            pipeline.compile().unwrap_err(),
            Error::ConflictingStruct("V".to_string())
        );

        //identical declarations in two stages are fine
        let mut pipeline = Pipeline::new();
        pipeline.add_render_pass(draw_pass("draw", "struct V { a: f32 }", "struct V { a: f32 }"));
        pipeline.compile().unwrap();
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn internal_pass_compiles_both_groups() {
        let mut pipeline = Pipeline::new();
        let r = pipeline.resources_mut();
        r.declare_uniform("time", 0.0f32, "f32");
        r.declare_internal_uniform("exposure", 1.0f32, "f32");
        r.declare_texture("scene", DeclareOptions::visible_to(StageSet::FRAGMENT).internal());
        pipeline.add_render_pass(draw_pass("user", "", ""));
        let post = pipeline.add_render_pass(draw_pass("post", "", "").internal());
        let compiled = pipeline.compile().unwrap();

        let user = compiled.pass(0).unwrap().text(Stage::Fragment).unwrap();
        assert!(!user.contains("InternalParams"));
        assert!(!user.contains("scene"));

        let post = compiled.pass(post).unwrap();
        let groups: Vec<u32> = post.stage(Stage::Fragment).unwrap().bindings.iter().map(|b| b.group).collect();
        assert_eq!(groups, [0, 1]);
        let text = post.text(Stage::Fragment).unwrap();
        assert!(text.starts_with(
            "@group(0) @binding(0) var<uniform> params: Params;\n\
             @group(1) @binding(0) var<uniform> internal_params: InternalParams;\n\
             @group(1) @binding(1) var scene: texture_2d<f32>;\n"
        ));
        assert_eq!(
            compiled.pack_uniforms(pipeline.resources(), true).unwrap(),
            [1.0f32.to_le_bytes().as_slice(), &[0; 12]].concat()
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn mesh_uniforms() {
        let mut pipeline = Pipeline::new();
        pipeline
            .resources_mut()
            .declare_mesh_uniform(0, "tint", [0.5f32, 0.5, 0.5, 1.0], "vec4f");
        pipeline.add_render_pass(draw_pass("draw", "", ""));
        let compiled = pipeline.compile().unwrap();
        let pass = compiled.pass(0).unwrap();
        assert!(pass.text(Stage::Vertex).unwrap().contains("struct Mesh {\n    tint: vec4f,\n}\n"));
        assert_eq!(pass.buffer_size(&BoundResource::MeshUniforms), Some(16));
        assert_eq!(
            compiled.pack_mesh_uniforms(pipeline.resources(), 0).unwrap().len(),
            16
        );
        assert!(compiled.pack_uniforms(pipeline.resources(), false).unwrap().is_empty());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn unknown_storage_type_is_fatal() {
        let mut pipeline = Pipeline::new();
        pipeline
            .resources_mut()
            .declare_storage("data", "Missing", StorageOptions::default())
            .unwrap();
        pipeline.add_render_pass(compute_pass("a", ""));
        assert!(matches!(
            pipeline.compile().unwrap_err(),
            Error::UnknownType { type_name, .. } if type_name == "Missing"
        ));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn mapped_payload_grows_storage() {
        let mut pipeline = Pipeline::new();
        pipeline
            .resources_mut()
            .declare_storage(
                "samples",
                "array<f32>",
                StorageOptions {
                    payload: Some(vec![0; 400]),
                    ..Default::default()
                },
            )
            .unwrap();
        pipeline.add_render_pass(compute_pass("a", ""));
        let compiled = pipeline.compile().unwrap();
        assert_eq!(compiled.storage_size("samples"), Some(400));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn oversized_layers_are_fatal() {
        let mut pipeline = Pipeline::new();
        pipeline
            .resources_mut()
            .declare_layers(4096, 2048, 2048, DeclareOptions::default());
        pipeline.add_render_pass(compute_pass("a", ""));
        assert_eq!(
            pipeline.compile().unwrap_err(),
            Error::SizeOverflow {
                type_name: "array<array<vec4f,4194304>,4096>".to_string()
            }
        );

        //a texel count past u32::MAX can't wrap around to a small buffer
        let mut pipeline = Pipeline::new();
        pipeline
            .resources_mut()
            .declare_layers(1, 65536, 65536, DeclareOptions::default());
        pipeline.add_render_pass(compute_pass("a", ""));
        assert!(matches!(pipeline.compile().unwrap_err(), Error::SizeOverflow { .. }));
    }
}
