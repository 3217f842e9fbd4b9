mod depth;
mod error;
mod json;
mod node;
/// Ready-made routines for common rewrites.
pub mod routines;
mod ty;
mod value;
mod variable;
mod walker;

/// Error and result aliases.
pub use error::{Result, WalkError};
/// JSON conversion entry points.
pub use json::{from_json, to_json};
/// Visited positions and their pending actions.
pub use node::{Action, Node, NodeKind};
/// Declared types, kinds, and dispatch categories.
pub use ty::{Category, Kind, Type};
/// Runtime value tree types.
pub use value::{FieldValue, MapValue, OpaqueValue, PtrValue, SeqValue, StructValue, Value};
/// Read and write handles exposed to routines.
pub use variable::{Variable, VariableMut};
/// Traversal engine, options, and routine type.
pub use walker::{NO_DEPTH_LIMIT, Routine, WalkOptions, Walker};
