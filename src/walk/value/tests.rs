use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::walk::{MapValue, OpaqueValue, PtrValue, SeqValue, Type, Value};

fn hash_of(value: &Value) -> u64 {
	let mut hasher = DefaultHasher::new();
	value.hash(&mut hasher);
	hasher.finish()
}

#[test]
fn equal_values_hash_alike() {
	assert_eq!(hash_of(&Value::F64(0.0)), hash_of(&Value::F64(-0.0)));

	let a = Value::map(Type::String, Type::I64, vec![(Value::from("x"), Value::I64(1)), (Value::from("y"), Value::I64(2))]);
	let b = Value::map(Type::String, Type::I64, vec![(Value::from("y"), Value::I64(2)), (Value::from("x"), Value::I64(1))]);
	assert_eq!(a, b);
	assert_eq!(hash_of(&a), hash_of(&b));

	let left = Value::Ptr(PtrValue::new(Value::I64(3)));
	let right = Value::Ptr(PtrValue::new(Value::I64(3)));
	assert_eq!(left, right);
	assert_eq!(hash_of(&left), hash_of(&right));
}

#[test]
fn opaque_keys_compare_by_identity() {
	let chan = OpaqueValue::new("chan", 1_u8);
	let other = OpaqueValue::new("chan", 1_u8);

	let mut map = MapValue::new(Type::Opaque("chan".into()), Type::I64);
	map.insert(Value::Opaque(chan.clone()), Value::I64(1));
	map.insert(Value::Opaque(other.clone()), Value::I64(2));

	assert_eq!(map.len(), 2);
	assert_eq!(map.get(&Value::Opaque(chan)), Some(&Value::I64(1)));
	assert_eq!(map.get(&Value::Opaque(other)), Some(&Value::I64(2)));
}

#[test]
fn insert_replaces_in_place_and_keeps_order() {
	let mut map = MapValue::new(Type::Any, Type::Any);
	assert!(map.is_empty());
	assert_eq!(map.insert(Value::from("a"), Value::I64(1)), None);
	assert_eq!(map.insert(Value::I64(7), Value::I64(2)), None);
	assert_eq!(map.insert(Value::from("a"), Value::I64(3)), Some(Value::I64(1)));

	let keys: Vec<String> = map.iter().map(|(key, _)| key.to_string()).collect();
	assert_eq!(keys, vec!["\"a\"".to_owned(), "7".to_owned()]);
	assert_eq!(map.get_str("a"), Some(&Value::I64(3)));
	assert_eq!(map.get(&Value::I64(7)), Some(&Value::I64(2)));
	assert_eq!(map.get(&Value::I32(7)), None);
}

#[test]
fn large_maps_keep_constant_time_lookups() {
	let count = 100_000;
	let map = Value::map(Type::String, Type::Usize, (0..count).map(|idx| (Value::String(format!("key{idx}")), Value::Usize(idx))));

	let Value::Map(map) = map else {
		panic!("expected map");
	};
	assert_eq!(map.len(), count);
	assert_eq!(map.get_str("key0"), Some(&Value::Usize(0)));
	assert_eq!(map.get_str("key99999"), Some(&Value::Usize(99_999)));
	assert_eq!(map.get_str("missing"), None);
}

#[test]
fn nil_covers_null_pointers_only() {
	assert!(Value::Nil.is_nil());
	assert!(Value::Ptr(PtrValue::null(Type::I64)).is_nil());
	assert!(!Value::ptr(0_i64).is_nil());
	assert!(!Value::Seq(SeqValue::new(Type::I64)).is_nil());
}

#[test]
fn empty_sequence_keeps_its_element_type() {
	let seq = SeqValue::new(Type::String);

	assert!(seq.items.is_empty());
	assert_eq!(Value::Seq(seq).type_of(), Type::seq(Type::String));
}
