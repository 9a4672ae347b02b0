// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Computes byte layouts for parsed structs.
//!
//! Layouts are computed in declaration order, so a struct may use any struct declared before it
//! as a field type.  The result for each struct is a [StructLayout]: its maximum alignment, the
//! offset and size of every field, the padding to insert after each field, and the total size.
//!
//! # Padding rule
//!
//! Fields are walked in order with a running byte counter.  After a field is added, if the counter
//! is off the struct's `max_align` boundary and the *next field's size* would cross that boundary,
//! the counter is padded up to the boundary and the padding is recorded against the current field.
//! After the last field the counter is padded to a multiple of 16, recorded under `""`.
//! Padding is recorded in 4-byte words, so a struct whose padding would be a partial word (a lone
//! `f16` before an `f32`, for instance) is rejected with [Error::SubWordPadding].
//!
//! This rule decides padding by the next field's size, not its alignment, so for some shapes it
//! places a field somewhere other than where the canonical WGSL rules would.  Buffers already
//! depend on this layout, so the rule is kept; such fields are reported in
//! [StructLayout::canonical_disagreements] and logged.

use crate::bittricks::{checked_round_up, whole_words};
use crate::error::Error;
use crate::layout::struct_parser::{ArrayLength, FieldType, StructDefinition};
use crate::layout::type_table::{self, TypeDescriptor};
use std::collections::HashMap;

/// Base alignment unit; every struct's size is a multiple of this.
pub const BASE_ALIGN: u32 = 16;

/// Placeholder descriptor for runtime-sized arrays.
pub const RUNTIME_ARRAY: TypeDescriptor = TypeDescriptor {
    size: 16,
    align: 16,
};

/// Offset and size of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    pub r#type: FieldType,
    pub offset: u32,
    pub size: u32,
}

/// The computed layout of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    pub name: String,
    pub max_align: u32,
    /// Padding words to insert after the named field.  `""` holds the tail padding.
    /// Only non-zero paddings appear.  Writing each field followed by its padding reproduces
    /// `byte_size` exactly.
    pub paddings: HashMap<String, u32>,
    pub fields: Vec<FieldLayout>,
    pub byte_size: u32,
    /// Fields whose offset differs from the canonical WGSL alignment rule.
    pub canonical_disagreements: Vec<String>,
}

impl StructLayout {
    /// Padding words recorded after `field`, or after the last field for `""`.
    pub fn padding_after(&self, field: &str) -> u32 {
        self.paddings.get(field).copied().unwrap_or(0)
    }

    /// The layout as a type descriptor, for use as a field or array element.
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor {
            size: self.byte_size,
            align: self.max_align,
        }
    }
}

/// Layouts for a set of structs, plus the integer constants their array lengths may name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layouts {
    structs: Vec<StructLayout>,
    constants: HashMap<String, u32>,
}

impl Layouts {
    pub fn get(&self, name: &str) -> Option<&StructLayout> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructLayout> {
        self.structs.iter()
    }

    /// Size and alignment of any type: a primitive, a known struct, or an array of either.
    ///
    /// ```
    /// use slots_and_strides::layout::{parse_structs, compute_layouts, FieldType};
    /// let defs = parse_structs("struct Particle { position: vec2f, life: f32 }").unwrap();
    /// let layouts = compute_layouts(&defs, &Default::default()).unwrap();
    /// let t = FieldType::parse("array<Particle,4>").unwrap();
    /// assert_eq!(layouts.describe(&t).unwrap().size, 64);
    /// ```
    pub fn describe(&self, r#type: &FieldType) -> Result<TypeDescriptor, Error> {
        let name = r#type.to_string();
        self.resolve(r#type, &name, &name)
    }

    fn resolve(&self, r#type: &FieldType, owner: &str, field: &str) -> Result<TypeDescriptor, Error> {
        match r#type {
            FieldType::Named(name) => type_table::lookup(name)
                .or_else(|| self.get(name).map(StructLayout::descriptor))
                .ok_or_else(|| Error::UnknownType {
                    owner: owner.to_string(),
                    field: field.to_string(),
                    type_name: name.clone(),
                }),
            FieldType::Array { element, length } => {
                let count = match length {
                    ArrayLength::Runtime => return Ok(RUNTIME_ARRAY),
                    ArrayLength::Fixed(n) => *n,
                    ArrayLength::Constant(c) => {
                        *self
                            .constants
                            .get(c)
                            .ok_or_else(|| Error::UnknownConstant {
                                type_name: r#type.to_string(),
                                constant: c.clone(),
                            })?
                    }
                };
                if count == 0 {
                    return Err(Error::ZeroLengthArray {
                        type_name: r#type.to_string(),
                    });
                }
                let element = self.resolve(element, owner, field)?;
                let size = checked_round_up(element.size, element.align)
                    .and_then(|stride| stride.checked_mul(count))
                    .ok_or_else(|| Error::SizeOverflow {
                        type_name: r#type.to_string(),
                    })?;
                Ok(TypeDescriptor {
                    size,
                    align: element.align,
                })
            }
        }
    }

    fn layout(&self, definition: &StructDefinition) -> Result<StructLayout, Error> {
        let name = definition.name.as_str();
        let mut max_align = 0;
        for r#type in &definition.unique_field_types {
            let field = definition
                .fields
                .iter()
                .find(|f| &f.r#type == r#type)
                .map(|f| f.name.as_str())
                .unwrap_or_default();
            let descriptor = self.resolve(r#type, name, field)?;
            //ties go to the later type
            if descriptor.align >= max_align {
                max_align = descriptor.align;
            }
        }

        let mut descriptors = Vec::with_capacity(definition.fields.len());
        let last = definition.fields.len().saturating_sub(1);
        for (i, field) in definition.fields.iter().enumerate() {
            if field.r#type.is_runtime_array() && i != last {
                return Err(Error::RuntimeArrayNotLast {
                    owner: name.to_string(),
                    field: field.name.clone(),
                    type_name: field.r#type.to_string(),
                });
            }
            descriptors.push(self.resolve(&field.r#type, name, &field.name)?);
        }

        let overflow = || Error::SizeOverflow {
            type_name: name.to_string(),
        };
        let words = |after: &str, bytes: u32| {
            whole_words(bytes).ok_or_else(|| Error::SubWordPadding {
                owner: name.to_string(),
                after: after.to_string(),
                bytes,
            })
        };
        let mut paddings = HashMap::new();
        let mut fields = Vec::with_capacity(definition.fields.len());
        let mut canonical_disagreements = Vec::new();
        let mut counter: u32 = 0;
        let mut canonical_counter: u32 = 0;
        for (i, field) in definition.fields.iter().enumerate() {
            let descriptor = descriptors[i];
            let canonical_offset =
                checked_round_up(canonical_counter, descriptor.align).ok_or_else(overflow)?;
            if canonical_offset != counter {
                canonical_disagreements.push(field.name.clone());
            }
            canonical_counter = canonical_offset
                .checked_add(descriptor.size)
                .ok_or_else(overflow)?;

            fields.push(FieldLayout {
                name: field.name.clone(),
                r#type: field.r#type.clone(),
                offset: counter,
                size: descriptor.size,
            });
            counter = counter.checked_add(descriptor.size).ok_or_else(overflow)?;
            if i == last {
                break;
            }
            let next = descriptors[i + 1].size;
            let boundary = checked_round_up(counter, max_align).ok_or_else(overflow)?;
            if counter != boundary && counter.checked_add(next).is_none_or(|end| end > boundary) {
                paddings.insert(field.name.clone(), words(&field.name, boundary - counter)?);
                counter = boundary;
            }
        }
        let byte_size = checked_round_up(counter, BASE_ALIGN).ok_or_else(overflow)?;
        let tail_after = definition.fields.last().map_or("", |f| f.name.as_str());
        let tail = words(tail_after, byte_size - counter)?;
        if tail > 0 {
            paddings.insert(String::new(), tail);
        }

        if !canonical_disagreements.is_empty() {
            logwise::warn_sync!(
                "Struct {name} places fields {fields} differently from canonical WGSL alignment; keeping the computed layout",
                name = logwise::privacy::LogIt(&name),
                fields = logwise::privacy::LogIt(&canonical_disagreements)
            );
        }

        Ok(StructLayout {
            name: name.to_string(),
            max_align,
            paddings,
            fields,
            byte_size,
            canonical_disagreements,
        })
    }
}

/// Computes the layout of every struct, in order.
///
/// `constants` supplies values for array lengths written as constant names.  A struct name that
/// appears twice keeps its first layout.
pub fn compute_layouts(
    definitions: &[StructDefinition],
    constants: &HashMap<String, u32>,
) -> Result<Layouts, Error> {
    let mut layouts = Layouts {
        structs: Vec::with_capacity(definitions.len()),
        constants: constants.clone(),
    };
    for definition in definitions {
        if layouts.get(&definition.name).is_some() {
            continue;
        }
        let layout = layouts.layout(definition)?;
        logwise::trace_sync!(
            "Computed layout for {name}: {size} bytes",
            name = logwise::privacy::LogIt(&layout.name),
            size = layout.byte_size
        );
        layouts.structs.push(layout);
    }
    Ok(layouts)
}
