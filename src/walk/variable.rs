use std::ops::Deref;

use crate::walk::{Action, Kind, Result, Type, Value, WalkError};

/// Read handle for one traversed value or key.
///
/// Introspection (`type_name`, `kind`, `original_type`) always reports the value
/// the node was created with. Readers see the staged replacement once one exists.
#[derive(Debug, Clone)]
pub struct Variable {
	slot: Type,
	original_type: Type,
	original_kind: Kind,
	original: Value,
	staged: Option<Value>,
}

/// Write handle for a [`Variable`], tied to its node's pending action.
pub struct VariableMut<'a> {
	var: &'a mut Variable,
	action: &'a mut Action,
}

macro_rules! scalar_readers {
	($($as_fn:ident, $must_fn:ident, $ty:ty, $variant:ident;)*) => {
		$(
			#[doc = concat!("Read the value as `", stringify!($ty), "`, or fail with a type mismatch.")]
			pub fn $as_fn(&self) -> Result<$ty> {
				match self.interface() {
					Value::$variant(value) => Ok(*value),
					other => Err(WalkError::TypeMismatch {
						expected: Kind::$variant,
						got: other.kind(),
					}),
				}
			}

			#[doc = concat!("Read the value as `", stringify!($ty), "` when its kind is already known.")]
			///
			/// # Panics
			///
			/// Panics when the value has another kind, aborting the walk.
			pub fn $must_fn(&self) -> $ty {
				match self.$as_fn() {
					Ok(value) => value,
					Err(err) => panic!("trusted read failed: {err}"),
				}
			}
		)*
	};
}

impl Variable {
	pub(crate) fn new(slot: Type, value: Value) -> Self {
		Self {
			slot,
			original_type: value.type_of(),
			original_kind: value.kind(),
			original: value,
			staged: None,
		}
	}

	/// Declared type of the container slot this value is written back into.
	pub fn slot_type(&self) -> &Type {
		&self.slot
	}

	/// Runtime type of the original value.
	pub fn original_type(&self) -> &Type {
		&self.original_type
	}

	/// Name of the original runtime type.
	pub fn type_name(&self) -> String {
		match self.original_kind {
			Kind::Nil => "nil".to_owned(),
			_ => self.original_type.name(),
		}
	}

	/// Kind of the original runtime value.
	pub fn kind(&self) -> Kind {
		self.original_kind
	}

	/// Current value: the staged replacement if any, otherwise the original.
	pub fn interface(&self) -> &Value {
		self.staged.as_ref().unwrap_or(&self.original)
	}

	/// True once a replacement has been staged.
	pub fn is_staged(&self) -> bool {
		self.staged.is_some()
	}

	/// Read the value as a string slice, or fail with a type mismatch.
	pub fn as_str(&self) -> Result<&str> {
		match self.interface() {
			Value::String(value) => Ok(value),
			other => Err(WalkError::TypeMismatch {
				expected: Kind::String,
				got: other.kind(),
			}),
		}
	}

	/// Read the value as a string slice when its kind is already known.
	///
	/// # Panics
	///
	/// Panics when the value is not a string, aborting the walk.
	pub fn must_str(&self) -> &str {
		match self.as_str() {
			Ok(value) => value,
			Err(err) => panic!("trusted read failed: {err}"),
		}
	}

	scalar_readers! {
		as_bool, must_bool, bool, Bool;
		as_i8, must_i8, i8, I8;
		as_i16, must_i16, i16, I16;
		as_i32, must_i32, i32, I32;
		as_i64, must_i64, i64, I64;
		as_isize, must_isize, isize, Isize;
		as_u8, must_u8, u8, U8;
		as_u16, must_u16, u16, U16;
		as_u32, must_u32, u32, U32;
		as_u64, must_u64, u64, U64;
		as_usize, must_usize, usize, Usize;
		as_f32, must_f32, f32, F32;
		as_f64, must_f64, f64, F64;
	}

	/// Final value after chain resolution; `keep_original` discards any staged value.
	pub(crate) fn into_value(self, keep_original: bool) -> Value {
		match self.staged {
			Some(staged) if !keep_original => staged,
			_ => self.original,
		}
	}
}

impl<'a> VariableMut<'a> {
	pub(crate) fn new(var: &'a mut Variable, action: &'a mut Action) -> Self {
		Self { var, action }
	}

	/// Stage a replacement value.
	///
	/// The value is not checked here; a replacement that does not fit the slot fails
	/// when the parent container is rebuilt. Ignored once the node is deleted.
	pub fn set(&mut self, value: impl Into<Value>) {
		if *self.action == Action::Delete {
			return;
		}
		*self.action = Action::Override;
		self.var.staged = Some(value.into());
	}
}

impl Deref for VariableMut<'_> {
	type Target = Variable;

	fn deref(&self) -> &Variable {
		self.var
	}
}
