// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Sizes and alignments of WGSL primitive types.
//!
//! The table covers scalars, 2-4 component vectors, 2x2 through 4x4 matrices and atomics,
//! for every spelling WGSL accepts: `vec3<f32>` and `vec3f` describe the same type, as do
//! `mat4x4<f32>` and `mat4x4f`.  Whitespace inside a type name is ignored.
//!
//! Arrays and structs are not in the table; [super::calculator] derives them.
//!
//! # The 3-vector quirk
//!
//! A 3-component vector holds 3 scalars of data but aligns like a 4-component vector, so
//! `vec3<f32>` is `size = 12, align = 16`.  Everything downstream depends on this.
//!
//! ```
//! use slots_and_strides::layout::type_table::{lookup, TypeDescriptor};
//! assert_eq!(lookup("vec3<f32>"), Some(TypeDescriptor { size: 12, align: 16 }));
//! assert_eq!(lookup("vec3f"), lookup("vec3<f32>"));
//! assert_eq!(lookup("Particle"), None);
//! ```

use crate::bittricks::round_up;

/// Size and alignment of a type, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub size: u32,
    pub align: u32,
}

/// The element type of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    F32,
    I32,
    U32,
    F16,
    Bool,
}

impl ScalarKind {
    /// Bytes per scalar.
    pub const fn bytes(self) -> u32 {
        match self {
            ScalarKind::F16 => 2,
            ScalarKind::F32 | ScalarKind::I32 | ScalarKind::U32 | ScalarKind::Bool => 4,
        }
    }

    /// The element kind of a primitive type name, or `None` for anything that isn't in the table.
    ///
    /// ```
    /// use slots_and_strides::layout::type_table::ScalarKind;
    /// assert_eq!(ScalarKind::of("vec2i"), Some(ScalarKind::I32));
    /// assert_eq!(ScalarKind::of("mat3x3<f16>"), Some(ScalarKind::F16));
    /// ```
    pub fn of(type_name: &str) -> Option<ScalarKind> {
        parse(&normalize(type_name)).map(|(_, kind)| kind)
    }

    fn from_name(name: &str) -> Option<ScalarKind> {
        match name {
            "f32" => Some(ScalarKind::F32),
            "i32" => Some(ScalarKind::I32),
            "u32" => Some(ScalarKind::U32),
            "f16" => Some(ScalarKind::F16),
            "bool" => Some(ScalarKind::Bool),
            _ => None,
        }
    }

    fn from_suffix(suffix: &str) -> Option<ScalarKind> {
        match suffix {
            "f" => Some(ScalarKind::F32),
            "i" => Some(ScalarKind::I32),
            "u" => Some(ScalarKind::U32),
            "h" => Some(ScalarKind::F16),
            _ => None,
        }
    }

    pub(crate) const fn wgsl_name(self) -> &'static str {
        match self {
            ScalarKind::F32 => "f32",
            ScalarKind::I32 => "i32",
            ScalarKind::U32 => "u32",
            ScalarKind::F16 => "f16",
            ScalarKind::Bool => "bool",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Scalar,
    Atomic,
    Vector(u32),
    Matrix { columns: u32, rows: u32 },
}

/// Looks up the size and alignment of a primitive type.
///
/// Returns `None` for struct names, arrays and anything else outside the table.
pub fn lookup(type_name: &str) -> Option<TypeDescriptor> {
    parse(&normalize(type_name)).map(|(shape, kind)| describe(shape, kind))
}

fn normalize(type_name: &str) -> String {
    type_name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn describe(shape: Shape, kind: ScalarKind) -> TypeDescriptor {
    let s = kind.bytes();
    match shape {
        Shape::Scalar | Shape::Atomic => TypeDescriptor { size: s, align: s },
        Shape::Vector(n) => vector(n, s),
        Shape::Matrix { columns, rows } => {
            let column = vector(rows, s);
            TypeDescriptor {
                size: columns * round_up(column.size, column.align),
                align: column.align,
            }
        }
    }
}

fn vector(n: u32, scalar: u32) -> TypeDescriptor {
    match n {
        2 => TypeDescriptor {
            size: 2 * scalar,
            align: 2 * scalar,
        },
        //3 scalars of data, aligned like 4
        3 => TypeDescriptor {
            size: 3 * scalar,
            align: 4 * scalar,
        },
        _ => TypeDescriptor {
            size: 4 * scalar,
            align: 4 * scalar,
        },
    }
}

fn dimension(c: u8) -> Option<u32> {
    match c {
        b'2' => Some(2),
        b'3' => Some(3),
        b'4' => Some(4),
        _ => None,
    }
}

/// Splits `rest` into a kind either as `<T>` or as a single-letter alias suffix.
fn element_kind(rest: &str) -> Option<ScalarKind> {
    if let Some(inner) = rest.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        ScalarKind::from_name(inner)
    } else {
        ScalarKind::from_suffix(rest)
    }
}

fn parse(name: &str) -> Option<(Shape, ScalarKind)> {
    if let Some(kind) = ScalarKind::from_name(name) {
        return Some((Shape::Scalar, kind));
    }
    if let Some(rest) = name.strip_prefix("atomic") {
        return match element_kind(rest) {
            //atomic<T> only; no alias spelling
            Some(kind @ (ScalarKind::I32 | ScalarKind::U32)) if rest.starts_with('<') => {
                Some((Shape::Atomic, kind))
            }
            _ => None,
        };
    }
    if let Some(rest) = name.strip_prefix("vec") {
        let n = dimension(*rest.as_bytes().first()?)?;
        let kind = element_kind(&rest[1..])?;
        return Some((Shape::Vector(n), kind));
    }
    if let Some(rest) = name.strip_prefix("mat") {
        let bytes = rest.as_bytes();
        if bytes.len() < 3 || bytes[1] != b'x' {
            return None;
        }
        let columns = dimension(bytes[0])?;
        let rows = dimension(bytes[2])?;
        return match element_kind(&rest[3..])? {
            kind @ (ScalarKind::F32 | ScalarKind::F16) => {
                Some((Shape::Matrix { columns, rows }, kind))
            }
            _ => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn td(size: u32, align: u32) -> Option<TypeDescriptor> {
        Some(TypeDescriptor { size, align })
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn scalars() {
        assert_eq!(lookup("f32"), td(4, 4));
        assert_eq!(lookup("i32"), td(4, 4));
        assert_eq!(lookup("u32"), td(4, 4));
        assert_eq!(lookup("bool"), td(4, 4));
        assert_eq!(lookup("f16"), td(2, 2));
        assert_eq!(lookup("atomic<u32>"), td(4, 4));
        assert_eq!(lookup("atomic< i32 >"), td(4, 4));
        assert_eq!(lookup("atomic<f32>"), None);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn vectors() {
        assert_eq!(lookup("vec2<f32>"), td(8, 8));
        assert_eq!(lookup("vec2f"), td(8, 8));
        assert_eq!(lookup("vec3<f32>"), td(12, 16));
        assert_eq!(lookup("vec3u"), td(12, 16));
        assert_eq!(lookup("vec4i"), td(16, 16));
        assert_eq!(lookup("vec3h"), td(6, 8));
        assert_eq!(lookup("vec2<bool>"), td(8, 8));
        assert_eq!(lookup("vec5f"), None);
        assert_eq!(lookup("vec3"), None);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn matrices() {
        assert_eq!(lookup("mat2x2<f32>"), td(16, 8));
        assert_eq!(lookup("mat3x2f"), td(24, 8));
        assert_eq!(lookup("mat2x3f"), td(32, 16));
        assert_eq!(lookup("mat3x3<f32>"), td(48, 16));
        assert_eq!(lookup("mat4x4f"), td(64, 16));
        assert_eq!(lookup("mat4x4h"), td(32, 8));
        assert_eq!(lookup("mat4x4<i32>"), None);
        assert_eq!(lookup("mat4"), None);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn kinds() {
        assert_eq!(ScalarKind::of("vec4u"), Some(ScalarKind::U32));
        assert_eq!(ScalarKind::of("f16"), Some(ScalarKind::F16));
        assert_eq!(ScalarKind::of("Particle"), None);
    }
}
