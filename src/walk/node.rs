use crate::walk::{Type, Value, Variable, VariableMut};

/// Position kind of a visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	/// Map entry; the key is the original map key.
	MapEntry,
	/// Sequence element; no key.
	SeqElement,
	/// Exported struct field; the key is the field name as a string.
	StructField,
	/// Scalar walked directly, or through a pointer; no key.
	ScalarRoot,
}

impl NodeKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::MapEntry => "map_entry",
			Self::SeqElement => "seq_element",
			Self::StructField => "struct_field",
			Self::ScalarRoot => "scalar_root",
		}
	}
}

/// Pending action on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
	/// Write the original key and value back.
	#[default]
	Keep,
	/// Write the staged key and/or value.
	Override,
	/// Drop the position from its parent. Final once set.
	Delete,
}

/// One visited position handed to every routine in the chain.
#[derive(Debug)]
pub struct Node {
	kind: NodeKind,
	depth: usize,
	key: Option<Variable>,
	value: Variable,
	action: Action,
}

/// Net effect of one chain run.
#[derive(Debug)]
pub(crate) struct Resolution {
	pub action: Action,
	/// Final key; the original key when the node was deleted.
	pub key: Option<Value>,
	/// Final value; the original value when the node was deleted.
	pub value: Value,
}

impl Node {
	pub(crate) fn map_entry(key: Value, key_slot: &Type, value: Value, value_slot: &Type, depth: usize) -> Self {
		Self::new(NodeKind::MapEntry, depth, Some(Variable::new(key_slot.clone(), key)), Variable::new(value_slot.clone(), value))
	}

	pub(crate) fn seq_element(value: Value, slot: &Type, depth: usize) -> Self {
		Self::new(NodeKind::SeqElement, depth, None, Variable::new(slot.clone(), value))
	}

	pub(crate) fn struct_field(name: &str, value: Value, slot: &Type, depth: usize) -> Self {
		let key = Variable::new(Type::String, Value::String(name.to_owned()));
		Self::new(NodeKind::StructField, depth, Some(key), Variable::new(slot.clone(), value))
	}

	pub(crate) fn scalar_root(value: Value, depth: usize) -> Self {
		let slot = value.type_of();
		Self::new(NodeKind::ScalarRoot, depth, None, Variable::new(slot, value))
	}

	fn new(kind: NodeKind, depth: usize, key: Option<Variable>, value: Variable) -> Self {
		Self {
			kind,
			depth,
			key,
			value,
			action: Action::Keep,
		}
	}

	/// Position kind.
	pub fn kind(&self) -> NodeKind {
		self.kind
	}

	/// Nesting level of the container holding this position; the walk root is 0.
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Key variable, present for map entries and struct fields.
	pub fn key(&self) -> Option<&Variable> {
		self.key.as_ref()
	}

	/// Value variable.
	pub fn value(&self) -> &Variable {
		&self.value
	}

	/// Writable key handle. Struct field names cannot be changed: a staged key is accepted but not applied.
	pub fn key_mut(&mut self) -> Option<VariableMut<'_>> {
		let Node { key, action, .. } = self;
		key.as_mut().map(|var| VariableMut::new(var, action))
	}

	/// Writable value handle.
	pub fn value_mut(&mut self) -> VariableMut<'_> {
		VariableMut::new(&mut self.value, &mut self.action)
	}

	/// Mark the position for removal. Idempotent, and later `set` calls are ignored.
	///
	/// Struct fields cannot be removed, so a delete on a struct field keeps the field.
	pub fn delete(&mut self) {
		self.action = Action::Delete;
	}

	/// True once [`Node::delete`] was called.
	pub fn is_deleted(&self) -> bool {
		self.action == Action::Delete
	}

	/// Current pending action.
	pub fn action(&self) -> Action {
		self.action
	}

	pub(crate) fn resolve(self) -> Resolution {
		let keep_original = self.action != Action::Override;
		Resolution {
			action: self.action,
			key: self.key.map(|key| key.into_value(keep_original)),
			value: self.value.into_value(keep_original),
		}
	}
}
