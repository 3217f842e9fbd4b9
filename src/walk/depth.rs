/// Depth of the current position, threaded through recursive calls.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Depth {
	level: usize,
	max: Option<usize>,
}

impl Depth {
	pub(crate) fn root(max: Option<usize>) -> Self {
		Self { level: 0, max }
	}

	pub(crate) fn level(self) -> usize {
		self.level
	}

	/// One container level further down.
	pub(crate) fn child(self) -> Self {
		Self {
			level: self.level + 1,
			max: self.max,
		}
	}

	/// True when this level lies beyond the configured bound.
	pub(crate) fn exceeded(self) -> bool {
		self.max.is_some_and(|max| self.level > max)
	}
}
