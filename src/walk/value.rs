use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use crate::walk::{Category, Kind, Type};

/// Dynamic value tree traversed by the walker.
#[derive(Debug, Clone, Default)]
pub enum Value {
	/// Untyped nil.
	#[default]
	Nil,
	/// Boolean.
	Bool(bool),
	/// `i8` scalar.
	I8(i8),
	/// `i16` scalar.
	I16(i16),
	/// `i32` scalar.
	I32(i32),
	/// `i64` scalar.
	I64(i64),
	/// `isize` scalar.
	Isize(isize),
	/// `u8` scalar.
	U8(u8),
	/// `u16` scalar.
	U16(u16),
	/// `u32` scalar.
	U32(u32),
	/// `u64` scalar.
	U64(u64),
	/// `usize` scalar.
	Usize(usize),
	/// `f32` scalar.
	F32(f32),
	/// `f64` scalar.
	F64(f64),
	/// UTF-8 string.
	String(String),
	/// Ordered sequence.
	Seq(SeqValue),
	/// Key/value mapping.
	Map(MapValue),
	/// Named struct.
	Struct(StructValue),
	/// Shared pointer.
	Ptr(PtrValue),
	/// Unsupported payload.
	Opaque(OpaqueValue),
}

/// Ordered sequence with a declared element type.
#[derive(Debug, Clone)]
pub struct SeqValue {
	/// Declared element type.
	pub elem: Type,
	/// Elements in order.
	pub items: Vec<Value>,
}

/// Mapping with declared key and value types and unique keys.
///
/// Entries keep insertion order; `index` maps each key to its entry position.
#[derive(Clone)]
pub struct MapValue {
	key: Type,
	value: Type,
	entries: Vec<(Value, Value)>,
	index: HashMap<Value, usize>,
}

/// Named struct with ordered fields.
#[derive(Debug, Clone)]
pub struct StructValue {
	/// Struct type name.
	pub type_name: Box<str>,
	/// Fields in declaration order.
	pub fields: Vec<FieldValue>,
}

/// One struct field.
#[derive(Debug, Clone)]
pub struct FieldValue {
	/// Field name.
	pub name: Box<str>,
	/// Declared field type.
	pub ty: Type,
	/// Unexported fields are never visited or mutated.
	pub exported: bool,
	/// Current field value.
	pub value: Value,
}

/// Shared, mutable pointer to a target value.
///
/// Clones share the same target, so writes made through one handle are seen by all.
#[derive(Clone)]
pub struct PtrValue {
	elem: Type,
	target: Option<Rc<RefCell<Value>>>,
}

/// Unsupported payload carried through a walk untouched.
#[derive(Clone)]
pub struct OpaqueValue {
	type_name: Arc<str>,
	payload: Rc<dyn Any>,
}

impl Value {
	/// Sequence with a declared element type.
	pub fn seq(elem: Type, items: impl IntoIterator<Item = Value>) -> Self {
		Value::Seq(SeqValue {
			elem,
			items: items.into_iter().collect(),
		})
	}

	/// Map with declared key and value types. Later duplicate keys replace earlier ones.
	pub fn map(key: Type, value: Type, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
		let mut out = MapValue::new(key, value);
		for (k, v) in entries {
			out.insert(k, v);
		}
		Value::Map(out)
	}

	/// Pointer to a fresh shared target.
	pub fn ptr(target: impl Into<Value>) -> Self {
		Value::Ptr(PtrValue::new(target.into()))
	}

	/// Flat kind of the runtime value.
	pub fn kind(&self) -> Kind {
		match self {
			Value::Nil => Kind::Nil,
			Value::Bool(_) => Kind::Bool,
			Value::I8(_) => Kind::I8,
			Value::I16(_) => Kind::I16,
			Value::I32(_) => Kind::I32,
			Value::I64(_) => Kind::I64,
			Value::Isize(_) => Kind::Isize,
			Value::U8(_) => Kind::U8,
			Value::U16(_) => Kind::U16,
			Value::U32(_) => Kind::U32,
			Value::U64(_) => Kind::U64,
			Value::Usize(_) => Kind::Usize,
			Value::F32(_) => Kind::F32,
			Value::F64(_) => Kind::F64,
			Value::String(_) => Kind::String,
			Value::Seq(_) => Kind::Seq,
			Value::Map(_) => Kind::Map,
			Value::Struct(_) => Kind::Struct,
			Value::Ptr(_) => Kind::Ptr,
			Value::Opaque(_) => Kind::Opaque,
		}
	}

	/// Runtime type of the value. Nil reports the dynamic type.
	pub fn type_of(&self) -> Type {
		match self {
			Value::Nil => Type::Any,
			Value::Bool(_) => Type::Bool,
			Value::I8(_) => Type::I8,
			Value::I16(_) => Type::I16,
			Value::I32(_) => Type::I32,
			Value::I64(_) => Type::I64,
			Value::Isize(_) => Type::Isize,
			Value::U8(_) => Type::U8,
			Value::U16(_) => Type::U16,
			Value::U32(_) => Type::U32,
			Value::U64(_) => Type::U64,
			Value::Usize(_) => Type::Usize,
			Value::F32(_) => Type::F32,
			Value::F64(_) => Type::F64,
			Value::String(_) => Type::String,
			Value::Seq(item) => Type::seq(item.elem.clone()),
			Value::Map(item) => Type::map(item.key.clone(), item.value.clone()),
			Value::Struct(item) => Type::Struct(Arc::from(item.type_name.as_ref())),
			Value::Ptr(item) => Type::ptr(item.elem.clone()),
			Value::Opaque(item) => Type::Opaque(item.type_name.clone()),
		}
	}

	/// Type name used in diagnostics; `nil` for untyped nil.
	pub fn type_name(&self) -> String {
		match self {
			Value::Nil => "nil".to_owned(),
			other => other.type_of().name(),
		}
	}

	/// Dispatch category of the value.
	pub fn category(&self) -> Category {
		match self {
			Value::Map(_) => Category::Mapping,
			Value::Seq(_) => Category::Sequence,
			Value::Struct(_) => Category::Aggregate,
			Value::Ptr(_) => Category::Indirection,
			Value::Nil | Value::Opaque(_) => Category::Opaque,
			_ => Category::Scalar,
		}
	}

	/// True when the value is visited directly instead of recursed into.
	pub fn is_literal(&self) -> bool {
		self.category().is_terminal()
	}

	/// True for `Value::Nil` and null pointers.
	pub fn is_nil(&self) -> bool {
		match self {
			Value::Nil => true,
			Value::Ptr(ptr) => ptr.is_null(),
			_ => false,
		}
	}

	/// Flatten one pointer level: a non-null pointer yields a clone of its target,
	/// anything else is returned as is. The wrapper is not carried into the result.
	pub fn unpack(self) -> Value {
		match self {
			Value::Ptr(ptr) => match ptr.load() {
				Some(target) => target,
				None => Value::Ptr(ptr),
			},
			other => other,
		}
	}

	/// Borrow the string payload when the value is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(value) => Some(value),
			_ => None,
		}
	}
}

impl SeqValue {
	/// Empty sequence of the element type.
	pub fn new(elem: Type) -> Self {
		Self { elem, items: Vec::new() }
	}
}

impl MapValue {
	/// Empty map with declared key and value types.
	pub fn new(key: Type, value: Type) -> Self {
		Self::with_capacity(key, value, 0)
	}

	/// Empty map with room for `capacity` entries.
	pub fn with_capacity(key: Type, value: Type, capacity: usize) -> Self {
		Self {
			key,
			value,
			entries: Vec::with_capacity(capacity),
			index: HashMap::with_capacity(capacity),
		}
	}

	/// Declared key type.
	pub fn key_type(&self) -> &Type {
		&self.key
	}

	/// Declared value type.
	pub fn value_type(&self) -> &Type {
		&self.value
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when the map holds no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Look up the value stored under `key`.
	pub fn get(&self, key: &Value) -> Option<&Value> {
		self.index.get(key).and_then(|&pos| self.entries.get(pos)).map(|(_, v)| v)
	}

	/// Look up the value stored under a string key.
	pub fn get_str(&self, key: &str) -> Option<&Value> {
		self.get(&Value::String(key.to_owned()))
	}

	/// Insert or replace the entry for `key`, returning the previous value.
	///
	/// A replaced entry keeps its original position.
	pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
		if let Some(slot) = self.index.get(&key).and_then(|&pos| self.entries.get_mut(pos)) {
			return Some(std::mem::replace(&mut slot.1, value));
		}
		self.index.insert(key.clone(), self.entries.len());
		self.entries.push((key, value));
		None
	}

	/// Iterate entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
		self.entries.iter().map(|(k, v)| (k, v))
	}

	/// Consume the map into its declared types and entries.
	pub fn into_parts(self) -> (Type, Type, Vec<(Value, Value)>) {
		(self.key, self.value, self.entries)
	}
}

impl StructValue {
	/// Struct with no fields.
	pub fn new(type_name: impl Into<Box<str>>) -> Self {
		Self {
			type_name: type_name.into(),
			fields: Vec::new(),
		}
	}

	/// Append an exported field typed after its value.
	pub fn field(self, name: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
		let value = value.into();
		let ty = value.type_of();
		self.push_field(name.into(), ty, true, value)
	}

	/// Append an exported field with an explicit declared type.
	pub fn typed_field(self, name: impl Into<Box<str>>, ty: Type, value: impl Into<Value>) -> Self {
		self.push_field(name.into(), ty, true, value.into())
	}

	/// Append an unexported field typed after its value.
	pub fn private(self, name: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
		let value = value.into();
		let ty = value.type_of();
		self.push_field(name.into(), ty, false, value)
	}

	fn push_field(mut self, name: Box<str>, ty: Type, exported: bool, value: Value) -> Self {
		self.fields.push(FieldValue { name, ty, exported, value });
		self
	}

	/// Struct type name.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Look up a field value by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value)
	}
}

impl PtrValue {
	/// Pointer to a fresh shared target typed after the value.
	pub fn new(target: Value) -> Self {
		Self {
			elem: target.type_of(),
			target: Some(Rc::new(RefCell::new(target))),
		}
	}

	/// Null pointer to the target type.
	pub fn null(elem: Type) -> Self {
		Self { elem, target: None }
	}

	/// Declared target type.
	pub fn elem(&self) -> &Type {
		&self.elem
	}

	/// True when the pointer has no target.
	pub fn is_null(&self) -> bool {
		self.target.is_none()
	}

	/// Shared target storage.
	pub fn target(&self) -> Option<&Rc<RefCell<Value>>> {
		self.target.as_ref()
	}

	/// Clone of the current target value.
	pub fn load(&self) -> Option<Value> {
		self.target.as_ref().map(|cell| cell.borrow().clone())
	}

	/// True when both handles point at the same storage.
	pub fn same_target(&self, other: &PtrValue) -> bool {
		match (&self.target, &other.target) {
			(Some(a), Some(b)) => Rc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl OpaqueValue {
	/// Wrap an arbitrary payload under a type name.
	pub fn new<T: Any>(type_name: impl Into<Arc<str>>, payload: T) -> Self {
		Self {
			type_name: type_name.into(),
			payload: Rc::new(payload),
		}
	}

	/// Type name of the payload.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Downcast the payload.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.payload.downcast_ref::<T>()
	}
}

impl fmt::Debug for PtrValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.target {
			Some(cell) => f.debug_tuple("Ptr").field(&*cell.borrow()).finish(),
			None => write!(f, "Ptr(nil {})", self.elem),
		}
	}
}

impl fmt::Debug for OpaqueValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Opaque({})", self.type_name)
	}
}

impl fmt::Debug for MapValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MapValue")
			.field("key", &self.key)
			.field("value", &self.value)
			.field("entries", &self.entries)
			.finish()
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Nil, Value::Nil) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::I8(a), Value::I8(b)) => a == b,
			(Value::I16(a), Value::I16(b)) => a == b,
			(Value::I32(a), Value::I32(b)) => a == b,
			(Value::I64(a), Value::I64(b)) => a == b,
			(Value::Isize(a), Value::Isize(b)) => a == b,
			(Value::U8(a), Value::U8(b)) => a == b,
			(Value::U16(a), Value::U16(b)) => a == b,
			(Value::U32(a), Value::U32(b)) => a == b,
			(Value::U64(a), Value::U64(b)) => a == b,
			(Value::Usize(a), Value::Usize(b)) => a == b,
			(Value::F32(a), Value::F32(b)) => a == b,
			(Value::F64(a), Value::F64(b)) => a == b,
			(Value::String(a), Value::String(b)) => a == b,
			(Value::Seq(a), Value::Seq(b)) => a == b,
			(Value::Map(a), Value::Map(b)) => a == b,
			(Value::Struct(a), Value::Struct(b)) => a == b,
			(Value::Ptr(a), Value::Ptr(b)) => a == b,
			(Value::Opaque(a), Value::Opaque(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			Value::Nil => {}
			Value::Bool(v) => v.hash(state),
			Value::I8(v) => v.hash(state),
			Value::I16(v) => v.hash(state),
			Value::I32(v) => v.hash(state),
			Value::I64(v) => v.hash(state),
			Value::Isize(v) => v.hash(state),
			Value::U8(v) => v.hash(state),
			Value::U16(v) => v.hash(state),
			Value::U32(v) => v.hash(state),
			Value::U64(v) => v.hash(state),
			Value::Usize(v) => v.hash(state),
			// 0.0 and -0.0 compare equal, so they share one hash.
			Value::F32(v) => (if *v == 0.0 { 0 } else { v.to_bits() }).hash(state),
			Value::F64(v) => (if *v == 0.0 { 0 } else { v.to_bits() }).hash(state),
			Value::String(v) => v.hash(state),
			Value::Seq(seq) => {
				seq.elem.hash(state);
				seq.items.hash(state);
			}
			// Map equality ignores entry order; hash only the order-free parts.
			Value::Map(map) => {
				map.key.hash(state);
				map.value.hash(state);
				map.len().hash(state);
			}
			Value::Struct(item) => {
				item.type_name.hash(state);
				for field in &item.fields {
					field.name.hash(state);
					field.ty.hash(state);
					field.exported.hash(state);
					field.value.hash(state);
				}
			}
			Value::Ptr(ptr) => {
				ptr.elem.hash(state);
				match &ptr.target {
					Some(cell) => cell.borrow().hash(state),
					None => 0_u8.hash(state),
				}
			}
			Value::Opaque(item) => {
				item.type_name.hash(state);
				std::ptr::hash(Rc::as_ptr(&item.payload).cast::<()>(), state);
			}
		}
	}
}

impl PartialEq for SeqValue {
	fn eq(&self, other: &Self) -> bool {
		self.elem == other.elem && self.items == other.items
	}
}

impl PartialEq for MapValue {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
			&& self.value == other.value
			&& self.len() == other.len()
			&& self.iter().all(|(k, v)| other.get(k) == Some(v))
	}
}

impl PartialEq for StructValue {
	fn eq(&self, other: &Self) -> bool {
		self.type_name == other.type_name && self.fields == other.fields
	}
}

impl PartialEq for FieldValue {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name && self.ty == other.ty && self.exported == other.exported && self.value == other.value
	}
}

impl PartialEq for PtrValue {
	fn eq(&self, other: &Self) -> bool {
		if self.elem != other.elem {
			return false;
		}
		match (&self.target, &other.target) {
			(None, None) => true,
			(Some(a), Some(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
			_ => false,
		}
	}
}

impl PartialEq for OpaqueValue {
	fn eq(&self, other: &Self) -> bool {
		self.type_name == other.type_name && Rc::ptr_eq(&self.payload, &other.payload)
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Nil => f.write_str("nil"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::I8(v) => write!(f, "{v}"),
			Value::I16(v) => write!(f, "{v}"),
			Value::I32(v) => write!(f, "{v}"),
			Value::I64(v) => write!(f, "{v}"),
			Value::Isize(v) => write!(f, "{v}"),
			Value::U8(v) => write!(f, "{v}"),
			Value::U16(v) => write!(f, "{v}"),
			Value::U32(v) => write!(f, "{v}"),
			Value::U64(v) => write!(f, "{v}"),
			Value::Usize(v) => write!(f, "{v}"),
			Value::F32(v) => write!(f, "{v}"),
			Value::F64(v) => write!(f, "{v}"),
			Value::String(v) => write!(f, "{v:?}"),
			Value::Seq(seq) => {
				f.write_str("[")?;
				for (idx, item) in seq.items.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Value::Map(map) => {
				f.write_str("{")?;
				for (idx, (k, v)) in map.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{k}: {v}")?;
				}
				f.write_str("}")
			}
			Value::Struct(item) => {
				write!(f, "{} {{", item.type_name)?;
				for (idx, field) in item.fields.iter().enumerate() {
					if idx > 0 {
						f.write_str(",")?;
					}
					write!(f, " {}: {}", field.name, field.value)?;
				}
				f.write_str(" }")
			}
			Value::Ptr(ptr) => match ptr.target() {
				Some(cell) => write!(f, "&{}", cell.borrow()),
				None => f.write_str("nil"),
			},
			Value::Opaque(item) => write!(f, "<{}>", item.type_name),
		}
	}
}

macro_rules! impl_from_scalar {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Value::$variant(value)
				}
			}
		)*
	};
}

impl_from_scalar! {
	bool => Bool,
	i8 => I8,
	i16 => I16,
	i32 => I32,
	i64 => I64,
	isize => Isize,
	u8 => U8,
	u16 => U16,
	u32 => U32,
	u64 => U64,
	usize => Usize,
	f32 => F32,
	f64 => F64,
	String => String,
	SeqValue => Seq,
	MapValue => Map,
	StructValue => Struct,
	PtrValue => Ptr,
	OpaqueValue => Opaque,
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_owned())
	}
}

#[cfg(test)]
mod tests;
