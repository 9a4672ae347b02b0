/*!
Sampler and storage texture descriptions.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerType {
    ///Filtering sampler, declared as `sampler`.
    #[default]
    Filtering,
    ///Depth comparison sampler, declared as `sampler_comparison`.
    Comparison,
}

impl SamplerType {
    pub(crate) const fn wgsl_type(self) -> &'static str {
        match self {
            SamplerType::Filtering => "sampler",
            SamplerType::Comparison => "sampler_comparison",
        }
    }
}

///Texel format of a writable storage texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum StorageFormat {
    #[default]
    Rgba8Unorm,
    Bgra8Unorm,
    Rgba8Uint,
    Rgba16Float,
    Rgba32Float,
    R32Float,
    R32Uint,
}

impl StorageFormat {
    pub const fn wgsl_name(self) -> &'static str {
        match self {
            StorageFormat::Rgba8Unorm => "rgba8unorm",
            StorageFormat::Bgra8Unorm => "bgra8unorm",
            StorageFormat::Rgba8Uint => "rgba8uint",
            StorageFormat::Rgba16Float => "rgba16float",
            StorageFormat::Rgba32Float => "rgba32float",
            StorageFormat::R32Float => "r32float",
            StorageFormat::R32Uint => "r32uint",
        }
    }
}
