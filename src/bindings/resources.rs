// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Resource declarations.
//!
//! [Resources] collects everything a pipeline binds: uniforms, storages, samplers and textures.
//! Declarations happen before compilation; afterwards only values may change (uniform values and
//! mapped storage payloads), never a resource's kind, type or visibility.
//!
//! # Redeclaration
//!
//! | Kind                            | Redeclared under the same name                      |
//! |---------------------------------|-----------------------------------------------------|
//! | Uniform / mesh uniform          | Updates the value; a different type is a [Warning] |
//! | Sampler, textures, layers       | Ignored with a [Warning]; the original is returned  |
//! | Storage                         | [Error::DuplicateStorage]                           |
//! | Constant                        | [Error::DuplicateConstant]                          |
//!
//! # Example
//!
//! ```
//! use slots_and_strides::bindings::{Resources, DeclareOptions, StorageOptions, StageSet};
//!
//! let mut resources = Resources::new();
//! resources.declare_uniform("time", 0.0f32, "f32");
//! resources.declare_storage("particles", "array<Particle, 64>", StorageOptions {
//!     visibility: StageSet::COMPUTE | StageSet::VERTEX,
//!     ..Default::default()
//! }).unwrap();
//! resources.declare_texture("albedo", DeclareOptions::visible_to(StageSet::FRAGMENT));
//!
//! // Updating a uniform's value is always allowed
//! resources.declare_uniform("time", 1.5f32, "f32");
//! assert!(resources.warnings().is_empty());
//! ```

use crate::bindings::sampler::{SamplerType, StorageFormat};
use crate::bindings::visible_to::StageSet;
use crate::error::{Error, Warning};
use crate::layout::packer::UniformValue;
use crate::layout::struct_parser::FieldType;
use std::collections::HashMap;
use std::fmt::Display;

/// Visibility and ownership shared by every declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclareOptions {
    pub visibility: StageSet,
    /// Declared by the system (e.g. for a built-in post-processing pass) rather than the
    /// pipeline's author.  Internal and user resources never share a binding group.
    pub internal: bool,
}

impl Default for DeclareOptions {
    fn default() -> Self {
        DeclareOptions {
            visibility: StageSet::all(),
            internal: false,
        }
    }
}

impl DeclareOptions {
    pub fn visible_to(visibility: StageSet) -> Self {
        DeclareOptions {
            visibility,
            internal: false,
        }
    }

    /// Marks the declaration as internal.
    pub fn internal(self) -> Self {
        DeclareOptions {
            internal: true,
            ..self
        }
    }
}

/// Options for [Resources::declare_storage].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageOptions {
    pub visibility: StageSet,
    pub internal: bool,
    /// The host wants to copy the buffer back after the GPU writes it.
    pub readable: bool,
    /// Initial contents.  A storage with a payload is *mapped* and may be updated every frame.
    pub payload: Option<Vec<u8>>,
}

impl Default for StorageOptions {
    fn default() -> Self {
        StorageOptions {
            visibility: StageSet::all(),
            internal: false,
            readable: false,
            payload: None,
        }
    }
}

/// Options for [Resources::declare_binding_texture].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindingTextureOptions {
    pub format: StorageFormat,
    /// Render pass whose compute stage writes the texture.  Set together with `read_pass`.
    pub write_pass: Option<u32>,
    /// Render pass whose fragment stage reads the texture.  Set together with `write_pass`.
    pub read_pass: Option<u32>,
    pub internal: bool,
}

/// One uniform value.  Uniforms are aggregated into a single uniform block per group.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    pub name: String,
    pub type_name: String,
    pub value: UniformValue,
    pub internal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MeshUniform {
    pub(crate) pass: u32,
    pub(crate) uniform: Uniform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    pub name: String,
    pub r#type: FieldType,
    pub visibility: StageSet,
    pub internal: bool,
    pub readable: bool,
    pub payload: Option<Vec<u8>>,
}

impl Storage {
    pub fn is_mapped(&self) -> bool {
        self.payload.is_some()
    }
}

/// An aggregate storage of `count` layers, each `width * height` texels of `vec4f`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layers {
    pub count: u32,
    pub width: u32,
    pub height: u32,
    pub visibility: StageSet,
    pub internal: bool,
}

impl Layers {
    pub const NAME: &'static str = "layers";

    /// The storage type.  A texel count past `u32::MAX` saturates, which sizing then reports as
    /// [crate::Error::SizeOverflow].
    pub fn r#type(&self) -> FieldType {
        FieldType::Array {
            element: Box::new(FieldType::Array {
                element: Box::new(FieldType::Named("vec4f".to_string())),
                length: crate::layout::ArrayLength::Fixed(self.width.saturating_mul(self.height)),
            }),
            length: crate::layout::ArrayLength::Fixed(self.count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sampler {
    pub name: String,
    pub r#type: SamplerType,
    pub visibility: StageSet,
    pub internal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTexture {
    pub name: String,
    pub format: StorageFormat,
    pub visibility: StageSet,
    pub internal: bool,
}

/// A sampled texture: 2D, 2D array or external.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub name: String,
    pub visibility: StageSet,
    pub internal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthTexture {
    pub name: String,
    pub visibility: StageSet,
    pub internal: bool,
    /// The render pass that renders into this depth target.  It is not bound there.
    pub written_by_pass: Option<u32>,
}

/// A texture written by a compute stage and read by a fragment stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTexture {
    pub write_name: String,
    pub read_name: String,
    pub format: StorageFormat,
    /// `(write_pass, read_pass)`; `None` binds in every pass.
    pub passes: Option<(u32, u32)>,
    pub internal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub type_name: String,
    pub value: String,
}

/// Resource kinds, in binding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Storage,
    Layers,
    Sampler,
    StorageTexture,
    Texture2D,
    TextureDepth2D,
    Texture2DArray,
    ExternalTexture,
    BindingTexture,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl ResourceKind {
    const fn label(self) -> &'static str {
        match self {
            ResourceKind::Storage => "storage",
            ResourceKind::Layers => "layers",
            ResourceKind::Sampler => "sampler",
            ResourceKind::StorageTexture => "storage texture",
            ResourceKind::Texture2D => "texture",
            ResourceKind::TextureDepth2D => "depth texture",
            ResourceKind::Texture2DArray => "texture array",
            ResourceKind::ExternalTexture => "external texture",
            ResourceKind::BindingTexture => "binding texture",
        }
    }
}

/// A declared resource other than a uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Storage(Storage),
    Layers(Layers),
    Sampler(Sampler),
    StorageTexture(StorageTexture),
    Texture2D(Texture),
    TextureDepth2D(DepthTexture),
    Texture2DArray(Texture),
    ExternalTexture(Texture),
    BindingTexture(BindingTexture),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Storage(_) => ResourceKind::Storage,
            Resource::Layers(_) => ResourceKind::Layers,
            Resource::Sampler(_) => ResourceKind::Sampler,
            Resource::StorageTexture(_) => ResourceKind::StorageTexture,
            Resource::Texture2D(_) => ResourceKind::Texture2D,
            Resource::TextureDepth2D(_) => ResourceKind::TextureDepth2D,
            Resource::Texture2DArray(_) => ResourceKind::Texture2DArray,
            Resource::ExternalTexture(_) => ResourceKind::ExternalTexture,
            Resource::BindingTexture(_) => ResourceKind::BindingTexture,
        }
    }

    /// The declared name.  Binding textures are named by their write side.
    pub fn name(&self) -> &str {
        match self {
            Resource::Storage(s) => &s.name,
            Resource::Layers(_) => Layers::NAME,
            Resource::Sampler(s) => &s.name,
            Resource::StorageTexture(t) => &t.name,
            Resource::Texture2D(t) | Resource::Texture2DArray(t) | Resource::ExternalTexture(t) => {
                &t.name
            }
            Resource::TextureDepth2D(t) => &t.name,
            Resource::BindingTexture(t) => &t.write_name,
        }
    }

    pub fn internal(&self) -> bool {
        match self {
            Resource::Storage(s) => s.internal,
            Resource::Layers(l) => l.internal,
            Resource::Sampler(s) => s.internal,
            Resource::StorageTexture(t) => t.internal,
            Resource::Texture2D(t) | Resource::Texture2DArray(t) | Resource::ExternalTexture(t) => {
                t.internal
            }
            Resource::TextureDepth2D(t) => t.internal,
            Resource::BindingTexture(t) => t.internal,
        }
    }
}

/// All declarations for one pipeline.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    uniforms: Vec<Uniform>,
    mesh_uniforms: Vec<MeshUniform>,
    resources: Vec<Resource>,
    constants: Vec<Constant>,
    warnings: Vec<Warning>,
}

/// Inserts or updates a uniform.  The first declaration fixes the type.
fn upsert_uniform(list: &mut Vec<Uniform>, uniform: Uniform) -> Option<Warning> {
    let Some(existing) = list.iter_mut().find(|u| u.name == uniform.name) else {
        list.push(uniform);
        return None;
    };
    existing.value = uniform.value;
    if existing.type_name != uniform.type_name {
        return Some(Warning::UniformTypeChanged {
            name: uniform.name,
            kept: existing.type_name.clone(),
            requested: uniform.type_name,
        });
    }
    None
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    fn warn(&mut self, warning: Warning) {
        logwise::warn_sync!(
            "{warning}",
            warning = logwise::privacy::LogIt(&warning.to_string())
        );
        self.warnings.push(warning);
    }

    /// Recoverable problems reported so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    fn declare_uniform_impl(&mut self, name: &str, value: UniformValue, type_name: &str, internal: bool) {
        let uniform = Uniform {
            name: name.to_string(),
            type_name: type_name.to_string(),
            value,
            internal,
        };
        if let Some(warning) = upsert_uniform(&mut self.uniforms, uniform) {
            self.warn(warning);
        }
    }

    /// Declares a uniform, or updates the value of an existing one.
    ///
    /// The first declaration fixes the type; redeclaring with a different type updates the
    /// value, keeps the original type and records a [Warning::UniformTypeChanged].
    pub fn declare_uniform(&mut self, name: &str, value: impl Into<UniformValue>, type_name: &str) {
        self.declare_uniform_impl(name, value.into(), type_name, false);
    }

    /// Like [Self::declare_uniform], for the internal uniform block.
    pub fn declare_internal_uniform(
        &mut self,
        name: &str,
        value: impl Into<UniformValue>,
        type_name: &str,
    ) {
        self.declare_uniform_impl(name, value.into(), type_name, true);
    }

    /// Declares or updates a uniform in the mesh-uniform block of render pass `pass`.
    pub fn declare_mesh_uniform(
        &mut self,
        pass: u32,
        name: &str,
        value: impl Into<UniformValue>,
        type_name: &str,
    ) {
        let uniform = Uniform {
            name: name.to_string(),
            type_name: type_name.to_string(),
            value: value.into(),
            internal: false,
        };
        let mut in_pass: Vec<Uniform> = self
            .mesh_uniforms
            .iter()
            .filter(|m| m.pass == pass)
            .map(|m| m.uniform.clone())
            .collect();
        let warning = upsert_uniform(&mut in_pass, uniform);
        self.mesh_uniforms.retain(|m| m.pass != pass);
        self.mesh_uniforms
            .extend(in_pass.into_iter().map(|uniform| MeshUniform { pass, uniform }));
        if let Some(warning) = warning {
            self.warn(warning);
        }
    }

    /// Uniforms of one group, in declaration order.
    pub fn uniforms(&self, internal: bool) -> impl Iterator<Item = &Uniform> {
        self.uniforms.iter().filter(move |u| u.internal == internal)
    }

    /// Mesh uniforms of render pass `pass`, in declaration order.
    pub fn mesh_uniforms(&self, pass: u32) -> impl Iterator<Item = &Uniform> {
        self.mesh_uniforms
            .iter()
            .filter(move |m| m.pass == pass)
            .map(|m| &m.uniform)
    }

    fn position(&self, kind: ResourceKind, name: &str) -> Option<usize> {
        self.resources
            .iter()
            .position(|r| r.kind() == kind && r.name() == name)
    }

    /// Adds `resource` unless one of the same kind and name exists, in which case the existing
    /// declaration is kept and returned.
    fn declare(&mut self, resource: Resource) -> &Resource {
        let kind = resource.kind();
        let index = match self.position(kind, resource.name()) {
            Some(index) => {
                self.warn(Warning::DuplicateDeclaration {
                    kind: kind.label(),
                    name: resource.name().to_string(),
                });
                index
            }
            None => {
                self.resources.push(resource);
                self.resources.len() - 1
            }
        };
        &self.resources[index]
    }

    /// Declares a storage buffer of type `type_name`: a struct name, a primitive, or an array
    /// of either (`array<Particle, 64>`).
    pub fn declare_storage(
        &mut self,
        name: &str,
        type_name: &str,
        options: StorageOptions,
    ) -> Result<&Resource, Error> {
        if self.position(ResourceKind::Storage, name).is_some() {
            return Err(Error::DuplicateStorage(name.to_string()));
        }
        let r#type = FieldType::parse(type_name)?;
        self.resources.push(Resource::Storage(Storage {
            name: name.to_string(),
            r#type,
            visibility: options.visibility,
            internal: options.internal,
            readable: options.readable,
            payload: options.payload,
        }));
        Ok(&self.resources[self.resources.len() - 1])
    }

    /// Replaces the payload of a mapped storage.
    pub fn update_storage(&mut self, name: &str, payload: Vec<u8>) -> Result<(), Error> {
        let index = self
            .position(ResourceKind::Storage, name)
            .ok_or_else(|| Error::UnknownResource(name.to_string()))?;
        match &mut self.resources[index] {
            Resource::Storage(storage) if storage.is_mapped() => {
                storage.payload = Some(payload);
                Ok(())
            }
            _ => Err(Error::StorageNotMapped(name.to_string())),
        }
    }

    /// Declares the aggregate layer storage.
    pub fn declare_layers(&mut self, count: u32, width: u32, height: u32, options: DeclareOptions) -> &Resource {
        self.declare(Resource::Layers(Layers {
            count,
            width,
            height,
            visibility: options.visibility,
            internal: options.internal,
        }))
    }

    pub fn declare_sampler(&mut self, name: &str, r#type: SamplerType, options: DeclareOptions) -> &Resource {
        self.declare(Resource::Sampler(Sampler {
            name: name.to_string(),
            r#type,
            visibility: options.visibility,
            internal: options.internal,
        }))
    }

    pub fn declare_storage_texture(
        &mut self,
        name: &str,
        format: StorageFormat,
        options: DeclareOptions,
    ) -> &Resource {
        self.declare(Resource::StorageTexture(StorageTexture {
            name: name.to_string(),
            format,
            visibility: options.visibility,
            internal: options.internal,
        }))
    }

    fn texture(name: &str, options: DeclareOptions) -> Texture {
        Texture {
            name: name.to_string(),
            visibility: options.visibility,
            internal: options.internal,
        }
    }

    pub fn declare_texture(&mut self, name: &str, options: DeclareOptions) -> &Resource {
        self.declare(Resource::Texture2D(Self::texture(name, options)))
    }

    pub fn declare_texture_array(&mut self, name: &str, options: DeclareOptions) -> &Resource {
        self.declare(Resource::Texture2DArray(Self::texture(name, options)))
    }

    /// Declares an external texture, such as a video frame.  The host may hand the backend a
    /// new texture handle every frame; the binding stays the same.
    pub fn declare_external_texture(&mut self, name: &str, options: DeclareOptions) -> &Resource {
        self.declare(Resource::ExternalTexture(Self::texture(name, options)))
    }

    /// Declares a depth texture.  It is not bound in `written_by_pass`, the pass rendering into it.
    pub fn declare_depth_texture(
        &mut self,
        name: &str,
        written_by_pass: Option<u32>,
        options: DeclareOptions,
    ) -> &Resource {
        self.declare(Resource::TextureDepth2D(DepthTexture {
            name: name.to_string(),
            visibility: options.visibility,
            internal: options.internal,
            written_by_pass,
        }))
    }

    /// Declares a texture written as storage in a compute stage and read in a fragment stage.
    ///
    /// `write_pass` and `read_pass` must be set together or not at all.
    pub fn declare_binding_texture(
        &mut self,
        write_name: &str,
        read_name: &str,
        options: BindingTextureOptions,
    ) -> Result<&Resource, Error> {
        let passes = match (options.write_pass, options.read_pass) {
            (Some(write), Some(read)) => Some((write, read)),
            (None, None) => None,
            _ => return Err(Error::BindingTexturePairing(write_name.to_string())),
        };
        Ok(self.declare(Resource::BindingTexture(BindingTexture {
            write_name: write_name.to_string(),
            read_name: read_name.to_string(),
            format: options.format,
            passes,
            internal: options.internal,
        })))
    }

    /// Declares `const name: type_name = value;`.  Constants can never be redeclared.
    pub fn declare_constant(&mut self, name: &str, type_name: &str, value: &str) -> Result<&Constant, Error> {
        if self.constants.iter().any(|c| c.name == name) {
            return Err(Error::DuplicateConstant(name.to_string()));
        }
        self.constants.push(Constant {
            name: name.to_string(),
            type_name: type_name.to_string(),
            value: value.to_string(),
        });
        Ok(&self.constants[self.constants.len() - 1])
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// Constants whose value is an integer literal, usable as array lengths.
    pub fn integer_constants(&self) -> HashMap<String, u32> {
        self.constants
            .iter()
            .filter_map(|c| {
                let digits = c.value.trim().trim_end_matches(['u', 'i']);
                digits.parse::<u32>().ok().map(|v| (c.name.clone(), v))
            })
            .collect()
    }

    /// Every non-uniform resource, in binding order: by kind, then declaration order.
    pub fn in_binding_order(&self) -> Vec<&Resource> {
        let mut ordered: Vec<&Resource> = self.resources.iter().collect();
        ordered.sort_by_key(|r| r.kind());
        ordered
    }

    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<&Resource> {
        self.position(kind, name).map(|i| &self.resources[i])
    }

    pub fn storages(&self) -> impl Iterator<Item = &Storage> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Storage(s) => Some(s),
            _ => None,
        })
    }

    pub fn binding_textures(&self) -> impl Iterator<Item = &BindingTexture> {
        self.resources.iter().filter_map(|r| match r {
            Resource::BindingTexture(t) => Some(t),
            _ => None,
        })
    }

    pub(crate) fn layers(&self) -> Option<&Layers> {
        self.resources.iter().find_map(|r| match r {
            Resource::Layers(l) => Some(l),
            _ => None,
        })
    }
}
