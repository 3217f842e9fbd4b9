use std::path::Path;

use treewalk::walk::{Result, Value, WalkError, from_json};

/// Read a JSON document into a value tree.
pub(crate) fn read_document(path: &Path) -> Result<Value> {
	let text = std::fs::read_to_string(path)?;
	let json: serde_json::Value = serde_json::from_str(&text)?;
	Ok(from_json(json))
}

/// Parse an `old=new` rename pair.
pub(crate) fn parse_rename(spec: &str) -> Result<(String, String)> {
	match spec.split_once('=') {
		Some((old, new)) if !old.is_empty() && !new.is_empty() => Ok((old.to_owned(), new.to_owned())),
		_ => Err(WalkError::InvalidRename { spec: spec.to_owned() }),
	}
}

/// Print a serializable payload as JSON on stdout.
pub(crate) fn emit_json(payload: &impl serde::Serialize, compact: bool) -> Result<()> {
	let text = if compact { serde_json::to_string(payload)? } else { serde_json::to_string_pretty(payload)? };
	println!("{text}");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::parse_rename;

	#[test]
	fn rename_pairs_need_both_sides() {
		assert_eq!(parse_rename("user=login").expect("valid pair"), ("user".to_owned(), "login".to_owned()));
		assert_eq!(parse_rename("a=b=c").expect("valid pair"), ("a".to_owned(), "b=c".to_owned()));
		assert!(parse_rename("user").is_err());
		assert!(parse_rename("=login").is_err());
		assert!(parse_rename("user=").is_err());
	}
}
