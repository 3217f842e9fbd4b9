use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::walk::depth::Depth;
use crate::walk::node::Resolution;
use crate::walk::{Action, Category, MapValue, Node, PtrValue, Result, SeqValue, StructValue, Type, Value, WalkError};

/// Visitor routine run against every qualifying node, in registration order.
///
/// Returning an error aborts the walk.
pub type Routine<C> = Box<dyn Fn(&C, &mut Node) -> Result<()>>;

/// Disables the depth guard.
pub const NO_DEPTH_LIMIT: Option<usize> = None;

/// Traversal limits and behavior switches.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
	/// Deepest container level that is still rebuilt; `None` walks everything.
	pub max_depth: Option<usize>,
	/// Rebuild maps with string keys so the output can be exported as JSON.
	pub jsonable_map: bool,
}

impl WalkOptions {
	/// Preset for output headed to a JSON encoder.
	pub fn for_json_export() -> Self {
		Self {
			max_depth: NO_DEPTH_LIMIT,
			jsonable_map: true,
		}
	}
}

/// Configured traversal engine.
///
/// `C` is the caller context handed to every routine.
pub struct Walker<C = ()> {
	options: WalkOptions,
	routines: Vec<Routine<C>>,
}

impl<C> Default for Walker<C> {
	fn default() -> Self {
		Self::new(WalkOptions::default())
	}
}

impl<C> Walker<C> {
	/// Walker with the given options and no routines.
	pub fn new(options: WalkOptions) -> Self {
		Self {
			options,
			routines: Vec::new(),
		}
	}

	/// Bound recursion to `max_depth` container levels below the root.
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.options.max_depth = Some(max_depth);
		self
	}

	/// Rebuild maps with string keys.
	pub fn with_jsonable_map(mut self) -> Self {
		self.options.jsonable_map = true;
		self
	}

	/// Append one routine to the chain.
	pub fn with_routine(mut self, routine: impl Fn(&C, &mut Node) -> Result<()> + 'static) -> Self {
		self.routines.push(Box::new(routine));
		self
	}

	/// Replace the whole chain.
	pub fn with_routines(mut self, routines: impl IntoIterator<Item = Routine<C>>) -> Self {
		self.routines = routines.into_iter().collect();
		self
	}

	/// Active options.
	pub fn options(&self) -> &WalkOptions {
		&self.options
	}

	/// Number of registered routines.
	pub fn routine_count(&self) -> usize {
		self.routines.len()
	}

	/// Walk `value` with an explicit context and return the rebuilt tree.
	///
	/// Maps and sequences are always rebuilt as new values. Structs and scalars behind
	/// a pointer are updated in place in the pointer's shared storage.
	pub fn walk_with(&self, ctx: &C, value: Value) -> Result<Value> {
		if matches!(value, Value::Nil) {
			return Ok(value);
		}

		debug!(
			kind = %value.kind(),
			max_depth = ?self.options.max_depth,
			jsonable_map = self.options.jsonable_map,
			routines = self.routines.len(),
			"walk start"
		);

		let pass = Pass {
			options: &self.options,
			routines: &self.routines,
			ctx,
		};
		let out = pass.walk_value(value, Depth::root(self.options.max_depth));
		if let Err(err) = &out {
			debug!(%err, "walk aborted");
		}
		out
	}
}

impl<C: Default> Walker<C> {
	/// Walk `value`; an absent context is replaced by `C::default()`.
	pub fn walk(&self, ctx: Option<&C>, value: Value) -> Result<Value> {
		match ctx {
			Some(ctx) => self.walk_with(ctx, value),
			None => self.walk_with(&C::default(), value),
		}
	}
}

/// State of one top-level walk.
struct Pass<'a, C> {
	options: &'a WalkOptions,
	routines: &'a [Routine<C>],
	ctx: &'a C,
}

impl<C> Pass<'_, C> {
	fn walk_value(&self, value: Value, depth: Depth) -> Result<Value> {
		if depth.exceeded() {
			trace!(level = depth.level(), kind = %value.kind(), "depth limit reached, subtree left untouched");
			return Ok(value);
		}

		match value {
			Value::Map(map) => self.walk_map(map, depth).map(Value::Map),
			Value::Seq(seq) => self.walk_seq(seq, depth).map(Value::Seq),
			Value::Struct(item) => self.walk_struct(item, depth).map(Value::Struct),
			Value::Ptr(ptr) => self.walk_ptr(ptr, depth),
			Value::Opaque(item) => Ok(Value::Opaque(item)),
			Value::Nil => Ok(Value::Nil),
			scalar => self.walk_scalar(scalar, depth),
		}
	}

	/// Recurse into a non-terminal child; terminal children are visited as they are.
	fn descend(&self, value: Value, depth: Depth) -> Result<Value> {
		if value.is_literal() { Ok(value) } else { self.walk_value(value, depth.child()) }
	}

	fn run_chain(&self, mut node: Node) -> Result<Resolution> {
		for routine in self.routines {
			routine(self.ctx, &mut node)?;
		}
		Ok(node.resolve())
	}

	fn walk_scalar(&self, value: Value, depth: Depth) -> Result<Value> {
		let expected = value.type_of();
		let resolved = self.run_chain(Node::scalar_root(value, depth.level()))?;
		if resolved.action == Action::Override && !expected.accepts(&resolved.value) {
			return Err(WalkError::ScalarMismatch {
				expected: expected.to_string(),
				got: resolved.value.type_name(),
			});
		}
		Ok(resolved.value)
	}

	fn walk_ptr(&self, ptr: PtrValue, depth: Depth) -> Result<Value> {
		let Some(cell) = ptr.target().cloned() else {
			return Ok(Value::Ptr(ptr));
		};

		let category = cell.borrow().category();
		match category {
			Category::Mapping | Category::Sequence => {
				let target = cell.borrow().clone();
				match target {
					Value::Map(map) => self.walk_map(map, depth).map(Value::Map),
					Value::Seq(seq) => self.walk_seq(seq, depth).map(Value::Seq),
					other => Ok(other),
				}
			}
			Category::Aggregate => {
				self.walk_struct_in_place(&cell, depth)?;
				Ok(Value::Ptr(ptr))
			}
			Category::Scalar => {
				let current = cell.borrow().clone();
				let updated = self.walk_scalar(current, depth)?;
				*cell.borrow_mut() = updated;
				Ok(Value::Ptr(ptr))
			}
			Category::Indirection | Category::Opaque => Ok(Value::Ptr(ptr)),
		}
	}

	fn walk_map(&self, map: MapValue, depth: Depth) -> Result<MapValue> {
		let (key_ty, value_ty, entries) = map.into_parts();
		let out_key_ty = if self.options.jsonable_map { Type::String } else { key_ty.clone() };
		let mut out = MapValue::with_capacity(out_key_ty, value_ty.clone(), entries.len());

		for (key, value) in entries {
			let key = key.unpack();
			let value = self.descend(value.unpack(), depth)?;

			let resolved = self.run_chain(Node::map_entry(key, &key_ty, value, &value_ty, depth.level()))?;
			if resolved.action == Action::Delete {
				trace!(level = depth.level(), "map entry deleted");
				continue;
			}

			let key = resolved.key.unwrap_or_default();
			self.check_map_key(&key, &key_ty)?;
			if !value_ty.accepts(&resolved.value) {
				return Err(WalkError::MapValueMismatch {
					key: key.to_string(),
					expected: value_ty.to_string(),
					got: resolved.value.type_name(),
				});
			}
			out.insert(key, resolved.value);
		}

		Ok(out)
	}

	fn check_map_key(&self, key: &Value, key_ty: &Type) -> Result<()> {
		if self.options.jsonable_map {
			if !matches!(key, Value::String(_)) {
				return Err(WalkError::KeyNotString {
					key: key.to_string(),
					got: key.type_name(),
				});
			}
			return Ok(());
		}

		if !key_ty.accepts(key) {
			return Err(WalkError::MapKeyMismatch {
				key: key.to_string(),
				expected: key_ty.to_string(),
				got: key.type_name(),
			});
		}
		Ok(())
	}

	fn walk_seq(&self, seq: SeqValue, depth: Depth) -> Result<SeqValue> {
		let SeqValue { elem, items } = seq;
		let mut out = Vec::with_capacity(items.len());

		for (index, item) in items.into_iter().enumerate() {
			let item = self.descend(item.unpack(), depth)?;

			let resolved = self.run_chain(Node::seq_element(item, &elem, depth.level()))?;
			if resolved.action == Action::Delete {
				trace!(level = depth.level(), "sequence element deleted");
				continue;
			}

			if !elem.accepts(&resolved.value) {
				return Err(WalkError::SeqElementMismatch {
					index,
					expected: elem.to_string(),
					got: resolved.value.type_name(),
				});
			}
			out.push(resolved.value);
		}

		Ok(SeqValue { elem, items: out })
	}

	fn walk_struct(&self, mut item: StructValue, depth: Depth) -> Result<StructValue> {
		for field in item.fields.iter_mut().filter(|field| field.exported) {
			let value = std::mem::take(&mut field.value);
			field.value = self.visit_field(&item.type_name, &field.name, &field.ty, value, depth)?;
		}
		Ok(item)
	}

	/// Rebuild the exported fields of a struct living behind a shared pointer.
	///
	/// The target is only borrowed while one field is read or written, never across recursion.
	fn walk_struct_in_place(&self, cell: &Rc<RefCell<Value>>, depth: Depth) -> Result<()> {
		let (type_name, field_count) = match &*cell.borrow() {
			Value::Struct(item) => (item.type_name.clone(), item.fields.len()),
			_ => return Ok(()),
		};

		for idx in 0..field_count {
			let field = match &*cell.borrow() {
				Value::Struct(item) => item.fields.get(idx).filter(|field| field.exported).cloned(),
				_ => None,
			};
			let Some(field) = field else {
				continue;
			};

			let updated = self.visit_field(&type_name, &field.name, &field.ty, field.value, depth)?;
			if let Value::Struct(item) = &mut *cell.borrow_mut()
				&& let Some(slot) = item.fields.get_mut(idx)
			{
				slot.value = updated;
			}
		}
		Ok(())
	}

	/// Visit one exported field and return the value to store back into it.
	fn visit_field(&self, struct_name: &str, name: &str, ty: &Type, value: Value, depth: Depth) -> Result<Value> {
		let value = self.descend(value, depth)?;
		let resolved = self.run_chain(Node::struct_field(name, value, ty, depth.level()))?;

		match resolved.action {
			Action::Delete => {
				trace!(struct_name, field = name, "delete on struct field has no effect");
			}
			Action::Override if !ty.accepts(&resolved.value) => {
				return Err(WalkError::FieldMismatch {
					struct_name: struct_name.to_owned(),
					field: name.to_owned(),
					expected: ty.to_string(),
					got: resolved.value.type_name(),
				});
			}
			Action::Override | Action::Keep => {}
		}
		Ok(resolved.value)
	}
}
