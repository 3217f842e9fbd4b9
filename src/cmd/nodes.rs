use std::cell::RefCell;
use std::path::PathBuf;

use treewalk::walk::{Node, Value, WalkOptions, Walker};

use crate::cmd::util::{emit_json, read_document};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long = "max-depth")]
	pub max_depth: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

/// Visit every position of a JSON document and list it in traversal order.
pub fn run(args: Args) -> treewalk::walk::Result<()> {
	let Args { file: path, max_depth, json } = args;

	let walker = Walker::<NodeLog>::new(WalkOptions {
		max_depth,
		jsonable_map: false,
	})
	.with_routine(record_node);

	let log = NodeLog::default();
	let document = read_document(&path)?;
	walker.walk(Some(&log), document)?;
	let rows = log.rows.into_inner();

	if json {
		let payload = NodesJson {
			path: path.display().to_string(),
			count: rows.len(),
			nodes: rows,
		};
		return emit_json(&payload, false);
	}

	println!("path: {}", path.display());
	println!("nodes: {}", rows.len());
	println!("depth\tkind\tkey\ttype\tvalue");
	for row in rows {
		println!(
			"{}\t{}\t{}\t{}\t{}",
			row.depth,
			row.kind,
			row.key.as_deref().unwrap_or("-"),
			row.type_name,
			row.value.as_deref().unwrap_or("-")
		);
	}

	Ok(())
}

#[derive(Default)]
struct NodeLog {
	rows: RefCell<Vec<NodeJson>>,
}

fn record_node(log: &NodeLog, node: &mut Node) -> treewalk::walk::Result<()> {
	let value = node.value().interface();
	let rendered = match value {
		Value::Map(_) | Value::Seq(_) | Value::Struct(_) | Value::Ptr(_) | Value::Opaque(_) => None,
		scalar => Some(scalar.to_string()),
	};
	log.rows.borrow_mut().push(NodeJson {
		depth: node.depth(),
		kind: node.kind().as_str(),
		key: node.key().map(|key| key.as_str().map(str::to_owned).unwrap_or_else(|_| key.interface().to_string())),
		type_name: node.value().type_name(),
		value: rendered,
	});
	Ok(())
}

#[derive(serde::Serialize)]
struct NodeJson {
	depth: usize,
	kind: &'static str,
	key: Option<String>,
	#[serde(rename = "type")]
	type_name: String,
	value: Option<String>,
}

#[derive(serde::Serialize)]
struct NodesJson {
	path: String,
	count: usize,
	nodes: Vec<NodeJson>,
}
