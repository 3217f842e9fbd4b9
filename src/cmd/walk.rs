use std::path::PathBuf;

use tracing::info;
use treewalk::walk::routines::{delete_keys, map_keys, redact_keys, rename_keys, stringify_keys};
use treewalk::walk::{Routine, WalkOptions, Walker, to_json};

use crate::cmd::util::{emit_json, parse_rename, read_document};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long = "max-depth")]
	pub max_depth: Option<usize>,
	#[arg(long)]
	pub jsonable: bool,
	#[arg(long = "delete-key")]
	pub delete_keys: Vec<String>,
	#[arg(long = "rename-key", value_name = "OLD=NEW")]
	pub rename_keys: Vec<String>,
	#[arg(long = "redact-key")]
	pub redact_keys: Vec<String>,
	#[arg(long = "redact-with", default_value = "[redacted]")]
	pub redact_with: String,
	#[arg(long = "stringify-keys")]
	pub stringify_keys: bool,
	#[arg(long = "upper-keys")]
	pub upper_keys: bool,
	#[arg(long)]
	pub compact: bool,
}

/// Rewrite a JSON document and print the result.
pub fn run(args: Args) -> treewalk::walk::Result<()> {
	let Args {
		file: path,
		max_depth,
		jsonable,
		delete_keys: to_delete,
		rename_keys: renames,
		redact_keys: to_redact,
		redact_with,
		stringify_keys: stringify,
		upper_keys,
		compact,
	} = args;

	let renames = renames.iter().map(|spec| parse_rename(spec)).collect::<treewalk::walk::Result<Vec<_>>>()?;

	let mut chain: Vec<Routine<()>> = Vec::new();
	if !to_delete.is_empty() {
		chain.push(delete_keys(to_delete));
	}
	if !renames.is_empty() {
		chain.push(rename_keys(renames));
	}
	if !to_redact.is_empty() {
		chain.push(redact_keys(to_redact, redact_with));
	}
	if stringify {
		chain.push(stringify_keys());
	}
	if upper_keys {
		chain.push(map_keys(str::to_uppercase));
	}

	let options = WalkOptions {
		max_depth,
		jsonable_map: jsonable,
	};
	let walker = Walker::new(options).with_routines(chain);
	info!(path = %path.display(), routines = walker.routine_count(), "rewriting document");

	let document = read_document(&path)?;
	let rewritten = walker.walk(None, document)?;
	emit_json(&to_json(&rewritten)?, compact)
}
