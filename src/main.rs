#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "treewalk", about = "Visitor-driven rewriting of JSON documents")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Rewrite a document through a chain of stock routines.
	Walk(cmd::walk::Args),
	/// List every position the walker visits.
	Nodes(cmd::nodes::Args),
}

fn main() {
	init_logging();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> treewalk::walk::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Walk(args) => cmd::walk::run(args),
		Commands::Nodes(args) => cmd::nodes::run(args),
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}
