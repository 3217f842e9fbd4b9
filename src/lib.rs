//! Visitor-driven traversal and rebuilding of dynamic value trees.

/// Value model, visitor nodes, and the traversal engine.
pub mod walk;
