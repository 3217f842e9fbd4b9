use thiserror::Error;

use crate::walk::Kind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors produced while reading, rebuilding, and converting value trees.
#[derive(Debug, Error)]
pub enum WalkError {
	/// Checked accessor was called against a value of another kind.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Kind requested by the accessor.
		expected: Kind,
		/// Kind actually held by the variable.
		got: Kind,
	},
	/// Rebuilt sequence element does not fit the declared element type.
	#[error("sequence element {index} has type {got}, expected {expected}")]
	SeqElementMismatch {
		/// Position of the element in the input sequence.
		index: usize,
		/// Declared element type.
		expected: String,
		/// Type of the offending value.
		got: String,
	},
	/// Rebuilt map value does not fit the declared value type.
	#[error("map value for key {key} has type {got}, expected {expected}")]
	MapValueMismatch {
		/// Rendered key of the offending entry.
		key: String,
		/// Declared value type.
		expected: String,
		/// Type of the offending value.
		got: String,
	},
	/// Rebuilt map key does not fit the declared key type.
	#[error("map key {key} has type {got}, expected {expected}")]
	MapKeyMismatch {
		/// Rendered offending key.
		key: String,
		/// Declared key type.
		expected: String,
		/// Type of the offending key.
		got: String,
	},
	/// Key coercion is enabled and a non-string key reached map assembly.
	#[error("jsonable map requires string keys, got {got} key {key}")]
	KeyNotString {
		/// Rendered offending key.
		key: String,
		/// Type of the offending key.
		got: String,
	},
	/// Written struct field value does not fit the declared field type.
	#[error("struct {struct_name} field {field} has type {got}, expected {expected}")]
	FieldMismatch {
		/// Struct type name.
		struct_name: String,
		/// Field name.
		field: String,
		/// Declared field type.
		expected: String,
		/// Type of the offending value.
		got: String,
	},
	/// Overridden scalar does not keep the original scalar type.
	#[error("scalar override has type {got}, expected {expected}")]
	ScalarMismatch {
		/// Original scalar type.
		expected: String,
		/// Type of the staged replacement.
		got: String,
	},
	/// Value cannot be represented as JSON.
	#[error("value is not representable as json: {reason}")]
	NotJsonable {
		/// Description of the offending value.
		reason: String,
	},
	/// Visitor routine aborted the traversal.
	#[error("routine aborted: {reason}")]
	RoutineAborted {
		/// Reason supplied by the routine.
		reason: String,
	},
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON parse or render failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// CLI rename argument was not `old=new`.
	#[error("invalid rename spec: {spec}")]
	InvalidRename {
		/// User-provided argument.
		spec: String,
	},
}

impl WalkError {
	/// Build a routine abort error.
	pub fn aborted(reason: impl Into<String>) -> Self {
		Self::RoutineAborted { reason: reason.into() }
	}
}
