// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Packs uniform values into the bytes of a uniform buffer.

Values are written at their field offsets in little-endian order; padding and any field without a
value stay zero.  Matrix values are supplied column-padded, so a `mat3x3f` takes 12 floats.
*/

use crate::error::Error;
use crate::layout::calculator::StructLayout;
use crate::layout::struct_parser::FieldType;
use crate::layout::type_table::ScalarKind;
use half::f16;

/// The value of one uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    F32(Vec<f32>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F16(Vec<f16>),
    Bool(Vec<bool>),
}

impl UniformValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            UniformValue::F32(_) => ScalarKind::F32,
            UniformValue::I32(_) => ScalarKind::I32,
            UniformValue::U32(_) => ScalarKind::U32,
            UniformValue::F16(_) => ScalarKind::F16,
            UniformValue::Bool(_) => ScalarKind::Bool,
        }
    }

    /// Bytes this value occupies when packed, saturating at `u32::MAX`.
    pub fn byte_len(&self) -> u32 {
        let count = match self {
            UniformValue::F32(v) => v.len(),
            UniformValue::I32(v) => v.len(),
            UniformValue::U32(v) => v.len(),
            UniformValue::F16(v) => v.len(),
            UniformValue::Bool(v) => v.len(),
        };
        u32::try_from(count).map_or(u32::MAX, |n| n.saturating_mul(self.kind().bytes()))
    }

    fn write_le(&self, out: &mut [u8]) {
        let mut at = 0;
        let mut put = |bytes: &[u8]| {
            out[at..at + bytes.len()].copy_from_slice(bytes);
            at += bytes.len();
        };
        match self {
            UniformValue::F32(v) => v.iter().for_each(|x| put(&x.to_le_bytes())),
            UniformValue::I32(v) => v.iter().for_each(|x| put(&x.to_le_bytes())),
            UniformValue::U32(v) => v.iter().for_each(|x| put(&x.to_le_bytes())),
            UniformValue::F16(v) => v.iter().for_each(|x| put(&x.to_le_bytes())),
            UniformValue::Bool(v) => v.iter().for_each(|x| put(&(*x as u32).to_le_bytes())),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::F32(vec![value])
    }
}
impl<const N: usize> From<[f32; N]> for UniformValue {
    fn from(value: [f32; N]) -> Self {
        UniformValue::F32(value.to_vec())
    }
}
impl From<Vec<f32>> for UniformValue {
    fn from(value: Vec<f32>) -> Self {
        UniformValue::F32(value)
    }
}
impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::I32(vec![value])
    }
}
impl<const N: usize> From<[i32; N]> for UniformValue {
    fn from(value: [i32; N]) -> Self {
        UniformValue::I32(value.to_vec())
    }
}
impl From<u32> for UniformValue {
    fn from(value: u32) -> Self {
        UniformValue::U32(vec![value])
    }
}
impl<const N: usize> From<[u32; N]> for UniformValue {
    fn from(value: [u32; N]) -> Self {
        UniformValue::U32(value.to_vec())
    }
}
impl From<f16> for UniformValue {
    fn from(value: f16) -> Self {
        UniformValue::F16(vec![value])
    }
}
impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Bool(vec![value])
    }
}

fn element_kind(r#type: &FieldType) -> Option<ScalarKind> {
    match r#type {
        FieldType::Named(name) => ScalarKind::of(name),
        FieldType::Array { element, .. } => element_kind(element),
    }
}

/// Packs `values` into a buffer of `layout.byte_size` bytes.
///
/// ```
/// use slots_and_strides::layout::{parse_structs, compute_layouts, pack, UniformValue};
/// let defs = parse_structs("struct Params { time: f32, screen: vec2f }").unwrap();
/// let layouts = compute_layouts(&defs, &Default::default()).unwrap();
/// let time = UniformValue::from(1.0f32);
/// let screen = UniformValue::from([800.0f32, 600.0]);
/// let bytes = pack(layouts.get("Params").unwrap(), [("time", &time), ("screen", &screen)]).unwrap();
/// assert_eq!(bytes.len(), 16);
/// assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
/// ```
pub fn pack<'a>(
    layout: &StructLayout,
    values: impl IntoIterator<Item = (&'a str, &'a UniformValue)>,
) -> Result<Vec<u8>, Error> {
    let mut bytes = vec![0u8; layout.byte_size as usize];
    for (name, value) in values {
        let Some(field) = layout.fields.iter().find(|f| f.name == name) else {
            return Err(Error::UnknownResource(name.to_string()));
        };
        if let Some(kind) = element_kind(&field.r#type)
            && kind != value.kind()
        {
            return Err(Error::UniformValueKind {
                name: name.to_string(),
                type_name: field.r#type.to_string(),
                found: value.kind().wgsl_name(),
            });
        }
        if value.byte_len() != field.size {
            return Err(Error::UniformValueSize {
                name: name.to_string(),
                expected: field.size,
                found: value.byte_len(),
            });
        }
        let start = field.offset as usize;
        value.write_le(&mut bytes[start..start + field.size as usize]);
    }
    Ok(bytes)
}
