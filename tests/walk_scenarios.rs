#![allow(missing_docs)]

use std::cell::RefCell;
use std::time::{Duration, Instant};

use serde_json::json;
use treewalk::walk::routines::{delete_keys, redact_keys};
use treewalk::walk::{NodeKind, PtrValue, StructValue, Value, WalkOptions, Walker, from_json, to_json};

#[derive(Default)]
struct Audit {
	redacted: RefCell<Vec<String>>,
}

#[test]
fn json_document_round_trips_through_a_routine_chain() {
	let document = from_json(json!({
		"user": {"name": "ada", "password": "hunter2", "sessions": [{"token": "t1"}, {"token": "t2"}]},
		"debug": true
	}));
	let walker = Walker::<()>::new(WalkOptions::for_json_export())
		.with_routine(delete_keys(["debug"]))
		.with_routine(redact_keys(["password", "token"], "***"));

	let out = walker.walk(None, document).expect("walk succeeds");
	assert_eq!(
		to_json(&out).expect("output is jsonable"),
		json!({"user": {"name": "ada", "password": "***", "sessions": [{"token": "***"}, {"token": "***"}]}})
	);
}

#[test]
fn context_collects_information_across_the_walk() {
	let document = from_json(json!({"a": {"secret": 1}, "b": [{"secret": 2}], "secret": 3}));
	let walker = Walker::<Audit>::default().with_routine(|audit: &Audit, node| {
		if node.kind() == NodeKind::MapEntry && node.key().is_some_and(|key| key.as_str().is_ok_and(|key| key == "secret")) {
			audit.redacted.borrow_mut().push(node.value().interface().to_string());
			node.delete();
		}
		Ok(())
	});
	let audit = Audit::default();

	let out = walker.walk(Some(&audit), document).expect("walk succeeds");
	let mut seen = audit.redacted.into_inner();
	seen.sort();
	assert_eq!(seen, vec!["1", "2", "3"]);
	assert_eq!(to_json(&out).expect("jsonable"), json!({"a": {}, "b": [{}]}));
}

#[test]
fn shared_struct_is_visible_through_every_alias() {
	let config = PtrValue::new(Value::Struct(StructValue::new("Config").field("Host", "localhost").private("cache", 0_u32)));
	let alias = config.clone();
	let walker = Walker::<()>::default().with_routine(|_, node| {
		if node.kind() == NodeKind::StructField && node.value().as_str().is_ok_and(|host| host == "localhost") {
			node.value_mut().set("127.0.0.1");
		}
		Ok(())
	});

	walker.walk(None, Value::Ptr(config)).expect("walk succeeds");
	let Some(Value::Struct(item)) = alias.load() else {
		panic!("alias should still point at a struct");
	};
	assert_eq!(item.get("Host"), Some(&Value::from("127.0.0.1")));
	assert_eq!(item.get("cache"), Some(&Value::U32(0)));
}

#[test]
fn depth_bound_leaves_deep_levels_untouched() {
	let document = from_json(json!({"l0": {"l1": {"l2": "deep"}}, "top": "shallow"}));
	let walker = Walker::<()>::default().with_max_depth(1).with_routine(|_, node| {
		if let Ok(text) = node.value().as_str() {
			let upper = text.to_uppercase();
			node.value_mut().set(upper);
		}
		Ok(())
	});

	let out = walker.walk(None, document).expect("walk succeeds");
	assert_eq!(to_json(&out).expect("jsonable"), json!({"l0": {"l1": {"l2": "deep"}}, "top": "SHALLOW"}));
}

#[test]
fn wide_objects_convert_and_walk_in_linear_time() {
	let count = 100_000;
	let object: serde_json::Map<String, serde_json::Value> = (0..count).map(|idx| (format!("key{idx}"), json!(idx))).collect();

	let started = Instant::now();
	let document = from_json(serde_json::Value::Object(object));
	let out = Walker::<()>::new(WalkOptions::for_json_export()).walk(None, document).expect("walk succeeds");
	let elapsed = started.elapsed();

	let Value::Map(map) = out else {
		panic!("expected map output");
	};
	assert_eq!(map.len(), count);
	assert_eq!(map.get_str("key12345"), Some(&Value::I64(12_345)));
	assert!(elapsed < Duration::from_secs(20), "converting and walking {count} keys took {elapsed:?}");
}
