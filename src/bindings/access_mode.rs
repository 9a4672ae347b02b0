// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Access permissions for storage resources.
//!
//! Compute is the only stage allowed to write a buffer that another stage reads, which keeps one
//! writer and many readers without explicit synchronization.  A resource visible only to the
//! fragment stage has no contender and may be written there.
//!
//! ```
//! use slots_and_strides::bindings::access_mode::{resolve, Access};
//! use slots_and_strides::bindings::visible_to::{Stage, StageSet};
//!
//! let shared = StageSet::COMPUTE | StageSet::FRAGMENT;
//! assert_eq!(resolve(Stage::Compute, shared), Access::ReadWrite);
//! assert_eq!(resolve(Stage::Fragment, shared), Access::Read);
//! assert_eq!(resolve(Stage::Vertex, shared), Access::Disallowed);
//! ```

use crate::bindings::visible_to::{Stage, StageSet};

/// The permission a resource receives in one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    ReadWrite,
    /// The resource is not visible to the stage; no binding is emitted.
    Disallowed,
}

/// A permission that results in a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    Read,
    ReadWrite,
}

impl Access {
    pub fn mode(self) -> Option<AccessMode> {
        match self {
            Access::Read => Some(AccessMode::Read),
            Access::ReadWrite => Some(AccessMode::ReadWrite),
            Access::Disallowed => None,
        }
    }
}

impl AccessMode {
    /// The WGSL storage access keyword.
    pub const fn wgsl_name(self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::ReadWrite => "read_write",
        }
    }
}

/// Resolves the access for `current` of a resource visible to `declaring`.
pub fn resolve(current: Stage, declaring: StageSet) -> Access {
    use Access::*;
    let compute = declaring.contains(StageSet::COMPUTE);
    let vertex = declaring.contains(StageSet::VERTEX);
    let fragment = declaring.contains(StageSet::FRAGMENT);
    let [in_compute, in_vertex, in_fragment] = match (compute, vertex, fragment) {
        (true, false, false) => [ReadWrite, Disallowed, Disallowed],
        (false, true, false) => [Disallowed, Read, Disallowed],
        (false, false, true) => [Disallowed, Disallowed, ReadWrite],
        (false, true, true) => [Disallowed, Read, Read],
        (true, true, false) => [ReadWrite, Read, Disallowed],
        (true, false, true) => [ReadWrite, Disallowed, Read],
        (true, true, true) => [ReadWrite, Read, Read],
        (false, false, false) => [Disallowed, Disallowed, Disallowed],
    };
    match current {
        Stage::Compute => in_compute,
        Stage::Vertex => in_vertex,
        Stage::Fragment => in_fragment,
    }
}
