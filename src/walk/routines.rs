//! Stock routines for key deletion, renaming, redaction, and key normalization.
//!
//! Each constructor returns a boxed [`Routine`](crate::walk::Routine) for [`Walker::with_routine`](crate::walk::Walker::with_routine) or [`Walker::with_routines`](crate::walk::Walker::with_routines).

use std::collections::{HashMap, HashSet};

use crate::walk::{Node, NodeKind, Routine, Value};

/// Delete map entries whose string key is one of `keys`.
pub fn delete_keys<C>(keys: impl IntoIterator<Item = impl Into<String>>) -> Routine<C> {
	let keys: HashSet<String> = keys.into_iter().map(Into::into).collect();
	Box::new(move |_: &C, node: &mut Node| {
		if node.kind() == NodeKind::MapEntry && string_key(node).is_some_and(|key| keys.contains(key)) {
			node.delete();
		}
		Ok(())
	})
}

/// Rename map entries whose string key appears in `pairs` as `(old, new)`.
pub fn rename_keys<C>(pairs: impl IntoIterator<Item = (String, String)>) -> Routine<C> {
	let renames: HashMap<String, String> = pairs.into_iter().collect();
	Box::new(move |_: &C, node: &mut Node| {
		if node.kind() != NodeKind::MapEntry {
			return Ok(());
		}
		let Some(new_key) = string_key(node).and_then(|key| renames.get(key)).cloned() else {
			return Ok(());
		};
		if let Some(mut key) = node.key_mut() {
			key.set(new_key);
		}
		Ok(())
	})
}

/// Replace the value of map entries and struct fields named in `keys` with `replacement`.
///
/// Positions whose slot cannot hold a string are left alone.
pub fn redact_keys<C>(keys: impl IntoIterator<Item = impl Into<String>>, replacement: impl Into<String>) -> Routine<C> {
	let keys: HashSet<String> = keys.into_iter().map(Into::into).collect();
	let replacement = Value::String(replacement.into());
	Box::new(move |_: &C, node: &mut Node| {
		if !string_key(node).is_some_and(|key| keys.contains(key)) {
			return Ok(());
		}
		if node.value().slot_type().accepts(&replacement) {
			node.value_mut().set(replacement.clone());
		}
		Ok(())
	})
}

/// Rewrite bool, integer, and float map keys into their string form.
///
/// Pair with key coercion to export maps whose keys are not strings.
pub fn stringify_keys<C>() -> Routine<C> {
	Box::new(|_: &C, node: &mut Node| {
		if node.kind() != NodeKind::MapEntry {
			return Ok(());
		}
		let Some(mut key) = node.key_mut() else {
			return Ok(());
		};
		let current = key.interface();
		if current.kind().is_scalar() && !matches!(current, Value::String(_)) {
			let rendered = current.to_string();
			key.set(rendered);
		}
		Ok(())
	})
}

/// Apply `f` to every string map key.
pub fn map_keys<C>(f: impl Fn(&str) -> String + 'static) -> Routine<C> {
	Box::new(move |_: &C, node: &mut Node| {
		if node.kind() != NodeKind::MapEntry {
			return Ok(());
		}
		let Some(mapped) = string_key(node).map(&f) else {
			return Ok(());
		};
		if let Some(mut key) = node.key_mut() {
			key.set(mapped);
		}
		Ok(())
	})
}

/// Apply `f` to every string value.
pub fn map_strings<C>(f: impl Fn(&str) -> String + 'static) -> Routine<C> {
	Box::new(move |_: &C, node: &mut Node| {
		if let Ok(current) = node.value().as_str() {
			let mapped = f(current);
			node.value_mut().set(mapped);
		}
		Ok(())
	})
}

fn string_key(node: &Node) -> Option<&str> {
	node.key().and_then(|key| key.as_str().ok())
}
