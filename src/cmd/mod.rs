/// Visited position listing command.
pub mod nodes;
/// Document helpers shared by commands.
pub mod util;
/// Rewrite command.
pub mod walk;
