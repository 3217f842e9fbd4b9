use serde_json::{Map, Number, Value as JsonValue};

use crate::walk::{Result, Type, Value, WalkError};

/// Convert parsed JSON into a value tree.
///
/// Objects become `Map<string, any>`, arrays become `Vec<any>`. Integers that fit
/// `i64` are kept signed, larger ones become `u64`, everything else `f64`.
pub fn from_json(json: JsonValue) -> Value {
	match json {
		JsonValue::Null => Value::Nil,
		JsonValue::Bool(v) => Value::Bool(v),
		JsonValue::Number(number) => number_value(&number),
		JsonValue::String(v) => Value::String(v),
		JsonValue::Array(items) => Value::seq(Type::Any, items.into_iter().map(from_json)),
		JsonValue::Object(entries) => Value::map(
			Type::String,
			Type::Any,
			entries.into_iter().map(|(key, value)| (Value::String(key), from_json(value))),
		),
	}
}

/// Render a value tree as JSON.
///
/// Fails on non-string map keys, non-finite floats, and opaque payloads. Structs render
/// their exported fields only; pointers render their target.
pub fn to_json(value: &Value) -> Result<JsonValue> {
	Ok(match value {
		Value::Nil => JsonValue::Null,
		Value::Bool(v) => JsonValue::Bool(*v),
		Value::I8(v) => JsonValue::from(*v),
		Value::I16(v) => JsonValue::from(*v),
		Value::I32(v) => JsonValue::from(*v),
		Value::I64(v) => JsonValue::from(*v),
		Value::Isize(v) => JsonValue::from(*v),
		Value::U8(v) => JsonValue::from(*v),
		Value::U16(v) => JsonValue::from(*v),
		Value::U32(v) => JsonValue::from(*v),
		Value::U64(v) => JsonValue::from(*v),
		Value::Usize(v) => JsonValue::from(*v),
		Value::F32(v) => float_json(f64::from(*v))?,
		Value::F64(v) => float_json(*v)?,
		Value::String(v) => JsonValue::String(v.clone()),
		Value::Seq(seq) => JsonValue::Array(seq.items.iter().map(to_json).collect::<Result<Vec<_>>>()?),
		Value::Map(map) => {
			let mut out = Map::new();
			for (key, item) in map.iter() {
				let Value::String(key) = key else {
					return Err(WalkError::NotJsonable {
						reason: format!("map key {key} has type {}", key.type_name()),
					});
				};
				out.insert(key.clone(), to_json(item)?);
			}
			JsonValue::Object(out)
		}
		Value::Struct(item) => {
			let mut out = Map::new();
			for field in item.fields.iter().filter(|field| field.exported) {
				out.insert(field.name.to_string(), to_json(&field.value)?);
			}
			JsonValue::Object(out)
		}
		Value::Ptr(ptr) => match ptr.target() {
			Some(cell) => to_json(&cell.borrow())?,
			None => JsonValue::Null,
		},
		Value::Opaque(item) => {
			return Err(WalkError::NotJsonable {
				reason: format!("opaque value of type {}", item.type_name()),
			});
		}
	})
}

impl From<JsonValue> for Value {
	fn from(json: JsonValue) -> Self {
		from_json(json)
	}
}

fn number_value(number: &Number) -> Value {
	if let Some(v) = number.as_i64() {
		Value::I64(v)
	} else if let Some(v) = number.as_u64() {
		Value::U64(v)
	} else {
		number.as_f64().map_or(Value::Nil, Value::F64)
	}
}

fn float_json(value: f64) -> Result<JsonValue> {
	Number::from_f64(value).map(JsonValue::Number).ok_or_else(|| WalkError::NotJsonable {
		reason: format!("non-finite float {value}"),
	})
}
