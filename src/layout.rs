/*! Struct parsing, layout computation and uniform packing. */

pub mod type_table;
pub mod struct_parser;
pub mod calculator;
pub mod packer;

pub use calculator::{compute_layouts, FieldLayout, Layouts, StructLayout};
pub use packer::{pack, UniformValue};
pub use struct_parser::{parse_structs, ArrayLength, FieldType, StructDefinition, StructField};
pub use type_table::{ScalarKind, TypeDescriptor};
