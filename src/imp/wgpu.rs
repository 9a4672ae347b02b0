// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Converts binding assignments into wgpu bind group layout entries.
*/

use crate::bindings::access_mode::AccessMode;
use crate::bindings::sampler::{SamplerType, StorageFormat};
use crate::bindings::synthesize::{BindingAssignment, BoundResource};
use crate::bindings::visible_to::Stage;
use wgpu::{
    BindGroupLayoutEntry, BindingType, BufferBindingType, BufferSize, SamplerBindingType,
    ShaderStages, StorageTextureAccess, TextureFormat, TextureSampleType, TextureViewDimension,
};

pub(crate) const fn shader_stage(stage: Stage) -> ShaderStages {
    match stage {
        Stage::Compute => ShaderStages::COMPUTE,
        Stage::Vertex => ShaderStages::VERTEX,
        Stage::Fragment => ShaderStages::FRAGMENT,
    }
}

pub(crate) const fn texture_format(format: StorageFormat) -> TextureFormat {
    match format {
        StorageFormat::Rgba8Unorm => TextureFormat::Rgba8Unorm,
        StorageFormat::Bgra8Unorm => TextureFormat::Bgra8Unorm,
        StorageFormat::Rgba8Uint => TextureFormat::Rgba8Uint,
        StorageFormat::Rgba16Float => TextureFormat::Rgba16Float,
        StorageFormat::Rgba32Float => TextureFormat::Rgba32Float,
        StorageFormat::R32Float => TextureFormat::R32Float,
        StorageFormat::R32Uint => TextureFormat::R32Uint,
    }
}

fn buffer(ty: BufferBindingType, size: Option<u32>) -> BindingType {
    BindingType::Buffer {
        ty,
        has_dynamic_offset: false,
        min_binding_size: size.and_then(|s| BufferSize::new(s as u64)),
    }
}

fn texture(sample_type: TextureSampleType, view_dimension: TextureViewDimension) -> BindingType {
    BindingType::Texture {
        sample_type,
        view_dimension,
        multisampled: false,
    }
}

fn storage_texture(format: StorageFormat) -> BindingType {
    BindingType::StorageTexture {
        access: StorageTextureAccess::WriteOnly,
        format: texture_format(format),
        view_dimension: TextureViewDimension::D2,
    }
}

/// The layout entry for `assignment`.  `size` is the buffer's byte size, if it is a buffer.
pub fn layout_entry(assignment: &BindingAssignment, size: Option<u32>) -> BindGroupLayoutEntry {
    let filterable = TextureSampleType::Float { filterable: true };
    let ty = match &assignment.resource {
        BoundResource::Uniforms { .. } | BoundResource::MeshUniforms => {
            buffer(BufferBindingType::Uniform, size)
        }
        BoundResource::Storage { .. } | BoundResource::Layers => buffer(
            BufferBindingType::Storage {
                read_only: assignment.access == AccessMode::Read,
            },
            size,
        ),
        BoundResource::Sampler { r#type, .. } => BindingType::Sampler(match r#type {
            SamplerType::Filtering => SamplerBindingType::Filtering,
            SamplerType::Comparison => SamplerBindingType::Comparison,
        }),
        BoundResource::StorageTexture { format, .. }
        | BoundResource::BindingTextureWrite { format, .. } => storage_texture(*format),
        BoundResource::Texture2D { .. } | BoundResource::BindingTextureRead { .. } => {
            texture(filterable, TextureViewDimension::D2)
        }
        BoundResource::TextureDepth2D { .. } => {
            texture(TextureSampleType::Depth, TextureViewDimension::D2)
        }
        BoundResource::Texture2DArray { .. } => texture(filterable, TextureViewDimension::D2Array),
        //external frames are uploaded into an ordinary 2D texture
        BoundResource::ExternalTexture { .. } => texture(filterable, TextureViewDimension::D2),
    };
    BindGroupLayoutEntry {
        binding: assignment.binding,
        visibility: shader_stage(assignment.stage),
        ty,
        count: None, //not array
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(resource: BoundResource, access: AccessMode) -> BindingAssignment {
        BindingAssignment {
            resource,
            stage: Stage::Fragment,
            group: 0,
            binding: 3,
            access,
        }
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn storage_entries_follow_access() {
        let storage = BoundResource::Storage {
            name: "particles".to_string(),
            readable: false,
        };
        let read = layout_entry(&assignment(storage.clone(), AccessMode::Read), Some(64));
        assert_eq!(read.binding, 3);
        assert_eq!(read.visibility, ShaderStages::FRAGMENT);
        assert_eq!(
            read.ty,
            BindingType::Buffer {
                ty: BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: BufferSize::new(64),
            }
        );
        let write = layout_entry(&assignment(storage, AccessMode::ReadWrite), None);
        assert_eq!(
            write.ty,
            BindingType::Buffer {
                ty: BufferBindingType::Storage { read_only: false },
                has_dynamic_offset: false,
                min_binding_size: None,
            }
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn textures_and_samplers() {
        let depth = layout_entry(
            &assignment(
                BoundResource::TextureDepth2D {
                    name: "shadow".to_string(),
                },
                AccessMode::Read,
            ),
            None,
        );
        assert_eq!(
            depth.ty,
            BindingType::Texture {
                sample_type: TextureSampleType::Depth,
                view_dimension: TextureViewDimension::D2,
                multisampled: false,
            }
        );
        let sampler = layout_entry(
            &assignment(
                BoundResource::Sampler {
                    name: "cmp".to_string(),
                    r#type: SamplerType::Comparison,
                },
                AccessMode::Read,
            ),
            None,
        );
        assert_eq!(sampler.ty, BindingType::Sampler(SamplerBindingType::Comparison));
        let trail = layout_entry(
            &assignment(
                BoundResource::BindingTextureWrite {
                    name: "trail_out".to_string(),
                    format: StorageFormat::Rgba16Float,
                },
                AccessMode::ReadWrite,
            ),
            None,
        );
        assert_eq!(
            trail.ty,
            BindingType::StorageTexture {
                access: StorageTextureAccess::WriteOnly,
                format: TextureFormat::Rgba16Float,
                view_dimension: TextureViewDimension::D2,
            }
        );
    }
}
