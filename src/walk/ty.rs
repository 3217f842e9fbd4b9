use std::fmt;
use std::sync::Arc;

use crate::walk::Value;

/// Flat introspection tag for a type or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Untyped nil.
	Nil,
	/// Dynamic slot that holds any value.
	Any,
	/// Boolean.
	Bool,
	/// Signed 8-bit integer.
	I8,
	/// Signed 16-bit integer.
	I16,
	/// Signed 32-bit integer.
	I32,
	/// Signed 64-bit integer.
	I64,
	/// Platform-width signed integer.
	Isize,
	/// Unsigned 8-bit integer.
	U8,
	/// Unsigned 16-bit integer.
	U16,
	/// Unsigned 32-bit integer.
	U32,
	/// Unsigned 64-bit integer.
	U64,
	/// Platform-width unsigned integer.
	Usize,
	/// 32-bit float.
	F32,
	/// 64-bit float.
	F64,
	/// UTF-8 string.
	String,
	/// Ordered sequence.
	Seq,
	/// Key/value mapping.
	Map,
	/// Named fixed-shape aggregate.
	Struct,
	/// Shared pointer indirection.
	Ptr,
	/// Unsupported payload passed through untouched.
	Opaque,
}

impl Kind {
	/// Lowercase display name.
	pub fn as_str(self) -> &'static str {
		match self {
			Kind::Nil => "nil",
			Kind::Any => "any",
			Kind::Bool => "bool",
			Kind::I8 => "i8",
			Kind::I16 => "i16",
			Kind::I32 => "i32",
			Kind::I64 => "i64",
			Kind::Isize => "isize",
			Kind::U8 => "u8",
			Kind::U16 => "u16",
			Kind::U32 => "u32",
			Kind::U64 => "u64",
			Kind::Usize => "usize",
			Kind::F32 => "f32",
			Kind::F64 => "f64",
			Kind::String => "string",
			Kind::Seq => "seq",
			Kind::Map => "map",
			Kind::Struct => "struct",
			Kind::Ptr => "ptr",
			Kind::Opaque => "opaque",
		}
	}

	/// True for bool, integer, float, and string kinds.
	pub fn is_scalar(self) -> bool {
		!matches!(
			self,
			Kind::Nil | Kind::Any | Kind::Seq | Kind::Map | Kind::Struct | Kind::Ptr | Kind::Opaque
		)
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Declared type of a slot that holds a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
	/// Dynamic slot.
	Any,
	/// Boolean.
	Bool,
	/// Signed 8-bit integer.
	I8,
	/// Signed 16-bit integer.
	I16,
	/// Signed 32-bit integer.
	I32,
	/// Signed 64-bit integer.
	I64,
	/// Platform-width signed integer.
	Isize,
	/// Unsigned 8-bit integer.
	U8,
	/// Unsigned 16-bit integer.
	U16,
	/// Unsigned 32-bit integer.
	U32,
	/// Unsigned 64-bit integer.
	U64,
	/// Platform-width unsigned integer.
	Usize,
	/// 32-bit float.
	F32,
	/// 64-bit float.
	F64,
	/// UTF-8 string.
	String,
	/// Sequence of the element type.
	Seq(Box<Type>),
	/// Mapping from key type to value type.
	Map(Box<Type>, Box<Type>),
	/// Named struct type.
	Struct(Arc<str>),
	/// Pointer to the target type.
	Ptr(Box<Type>),
	/// Named unsupported type.
	Opaque(Arc<str>),
}

impl Type {
	/// Sequence type helper.
	pub fn seq(elem: Type) -> Self {
		Type::Seq(Box::new(elem))
	}

	/// Map type helper.
	pub fn map(key: Type, value: Type) -> Self {
		Type::Map(Box::new(key), Box::new(value))
	}

	/// Pointer type helper.
	pub fn ptr(target: Type) -> Self {
		Type::Ptr(Box::new(target))
	}

	/// Flat kind of this type.
	pub fn kind(&self) -> Kind {
		match self {
			Type::Any => Kind::Any,
			Type::Bool => Kind::Bool,
			Type::I8 => Kind::I8,
			Type::I16 => Kind::I16,
			Type::I32 => Kind::I32,
			Type::I64 => Kind::I64,
			Type::Isize => Kind::Isize,
			Type::U8 => Kind::U8,
			Type::U16 => Kind::U16,
			Type::U32 => Kind::U32,
			Type::U64 => Kind::U64,
			Type::Usize => Kind::Usize,
			Type::F32 => Kind::F32,
			Type::F64 => Kind::F64,
			Type::String => Kind::String,
			Type::Seq(_) => Kind::Seq,
			Type::Map(..) => Kind::Map,
			Type::Struct(_) => Kind::Struct,
			Type::Ptr(_) => Kind::Ptr,
			Type::Opaque(_) => Kind::Opaque,
		}
	}

	/// Short type name: struct and opaque names, otherwise the rendered type.
	pub fn name(&self) -> String {
		match self {
			Type::Struct(name) | Type::Opaque(name) => name.to_string(),
			other => other.to_string(),
		}
	}

	/// Runtime compatibility check applied when a value is written into a slot.
	///
	/// Containers are matched by shape only, so rebuilt children whose own declared
	/// types changed (for example through key coercion) still fit their parent slot.
	/// A pointer slot also takes a bare value its target type accepts, which is
	/// where flattened indirections land.
	pub fn accepts(&self, value: &Value) -> bool {
		match (self, value) {
			(Type::Any, _) => true,
			(Type::Seq(_) | Type::Map(..) | Type::Ptr(_) | Type::Opaque(_), Value::Nil) => true,
			(Type::Seq(_), Value::Seq(_)) => true,
			(Type::Map(..), Value::Map(_)) => true,
			(Type::Struct(name), Value::Struct(item)) => item.type_name() == name.as_ref(),
			(Type::Opaque(name), Value::Opaque(item)) => item.type_name() == name.as_ref(),
			(Type::Ptr(_), Value::Ptr(_)) => true,
			(Type::Ptr(target), other) => target.accepts(other),
			(scalar, other) => scalar.kind().is_scalar() && scalar.kind() == other.kind(),
		}
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Type::Seq(elem) => write!(f, "Vec<{elem}>"),
			Type::Map(key, value) => write!(f, "Map<{key}, {value}>"),
			Type::Struct(name) | Type::Opaque(name) => f.write_str(name),
			Type::Ptr(target) => write!(f, "*{target}"),
			other => f.write_str(other.kind().as_str()),
		}
	}
}

/// Shape category driving traversal dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
	/// Key/value mapping.
	Mapping,
	/// Ordered sequence.
	Sequence,
	/// Fixed-shape struct.
	Aggregate,
	/// Pointer indirection.
	Indirection,
	/// Bool, integer, float, or string.
	Scalar,
	/// Anything else, passed through.
	Opaque,
}

impl Category {
	/// Terminal categories are visited without recursion.
	pub fn is_terminal(self) -> bool {
		matches!(self, Category::Scalar | Category::Opaque)
	}
}
