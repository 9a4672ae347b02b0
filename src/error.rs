// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Errors and warnings produced while compiling layouts and bindings.

Fatal conditions are [Error]s and abort compilation of the whole pipeline.  Recoverable
conditions are [Warning]s; they are logged and collected on [crate::bindings::Resources],
and compilation continues.
*/

/// A fatal compilation error.
///
/// Every variant names the offending type or resource so the failure can be diagnosed
/// from the message alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Type `{type_name}` (field `{field}` of struct `{owner}`) is neither a known type nor a previously declared struct")]
    UnknownType {
        owner: String,
        field: String,
        type_name: String,
    },
    #[error("Array type `{type_name}` has zero length")]
    ZeroLengthArray { type_name: String },
    #[error("Runtime-sized array `{type_name}` (field `{field}` of struct `{owner}`) must be the last field")]
    RuntimeArrayNotLast {
        owner: String,
        field: String,
        type_name: String,
    },
    #[error("Size of `{type_name}` doesn't fit in 32 bits")]
    SizeOverflow { type_name: String },
    #[error("Struct `{owner}` needs {bytes} padding bytes after `{after}`, which is not a whole number of 4-byte words")]
    SubWordPadding { owner: String, after: String, bytes: u32 },
    #[error("Array length `{constant}` in `{type_name}` is not a declared integer constant")]
    UnknownConstant { type_name: String, constant: String },
    #[error("Can't parse struct `{owner}`: {message}")]
    Parse { owner: String, message: String },
    #[error("Struct `{0}` is declared twice with different fields")]
    ConflictingStruct(String),
    #[error("Storage `{0}` is already declared")]
    DuplicateStorage(String),
    #[error("Constant `{0}` is already declared")]
    DuplicateConstant(String),
    #[error("Binding texture `{0}` sets only one of its write/read pass indices")]
    BindingTexturePairing(String),
    #[error("Binding texture `{0}` requires a compute stage, but no render pass has one")]
    BindingTextureWithoutCompute(String),
    #[error("{0} render passes can't be indexed by a u32")]
    TooManyRenderPasses(usize),
    #[error("Render pass {0} has no shader stages")]
    EmptyRenderPass(u32),
    #[error("Render pass {0} declares only one of its vertex/fragment pair")]
    IncompleteRenderPair(u32),
    #[error("No resource named `{0}`")]
    UnknownResource(String),
    #[error("Storage `{0}` was declared without a mapped payload")]
    StorageNotMapped(String),
    #[error("Storage `{name}` is {first} bytes in one render pass and {second} bytes in another")]
    StorageSizeMismatch { name: String, first: u32, second: u32 },
    #[error("Binding {binding} no longer matches its layout: expected {expected}, found {found}")]
    BindingMismatch {
        binding: u32,
        expected: String,
        found: String,
    },
    #[error("Uniform `{name}` is {expected} bytes but its value is {found} bytes")]
    UniformValueSize {
        name: String,
        expected: u32,
        found: u32,
    },
    #[error("Uniform `{name}` of type `{type_name}` can't hold a {found} value")]
    UniformValueKind {
        name: String,
        type_name: String,
        found: &'static str,
    },
}

/// A recoverable condition reported during declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Warning {
    /// A uniform was redeclared with a different type.  The value was updated; the type was not.
    #[error("uniform `{name}` can't change type from `{kept}` to `{requested}`; keeping `{kept}`")]
    UniformTypeChanged {
        name: String,
        kept: String,
        requested: String,
    },
    /// A resource was declared twice.  The second declaration was ignored.
    #[error("{kind} `{name}` is already declared; ignoring")]
    DuplicateDeclaration { kind: &'static str, name: String },
}
