//! In-memory history stack.

use super::{BasePath, History, HistoryEntry, HistoryError, HistoryListener};
use crate::location::Location;

/// A history stack held in memory.
///
/// Behaves like the browser session history: pushing truncates forward
/// entries, replacing overwrites the current one, and `go` notifies the
/// registered listeners (pushes and replaces do not).
pub struct MemoryHistory {
	base: BasePath,
	entries: Vec<HistoryEntry>,
	index: usize,
	listeners: Vec<HistoryListener>,
}

impl std::fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("base", &self.base)
			.field("entries", &self.entries)
			.field("index", &self.index)
			.field("listeners", &self.listeners.len())
			.finish()
	}
}

impl MemoryHistory {
	/// Creates a history whose only entry is `initial`.
	pub fn new(initial: &str) -> Self {
		Self::with_base("/", initial)
	}

	/// Creates a history served under `base`.
	///
	/// `initial` is a full URL; the base is stripped from it.
	pub fn with_base(base: &str, initial: &str) -> Self {
		let base = BasePath::new(base);
		let location = Location::parse(base.strip(initial));
		Self {
			base,
			entries: vec![HistoryEntry::new(location)],
			index: 0,
			listeners: Vec::new(),
		}
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Always `false`: the stack holds at least the initial entry.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the position of the current entry.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Returns all entries, oldest first.
	pub fn entries(&self) -> &[HistoryEntry] {
		&self.entries
	}

	/// Returns the current entry.
	pub fn current(&self) -> &HistoryEntry {
		&self.entries[self.index]
	}

	/// Returns the full URL of the current entry, base included.
	pub fn url(&self) -> String {
		self.base.join(&self.current().location.to_url())
	}
}

impl History for MemoryHistory {
	fn location(&self) -> Location {
		self.current().location.clone()
	}

	fn push_entry(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
		self.entries.truncate(self.index + 1);
		self.entries.push(entry.clone());
		self.index = self.entries.len() - 1;
		Ok(())
	}

	fn replace_entry(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
		self.entries[self.index] = entry.clone();
		Ok(())
	}

	fn on_history_change(&mut self, listener: HistoryListener) -> Result<(), HistoryError> {
		self.listeners.push(listener);
		Ok(())
	}

	fn go(&mut self, delta: isize) -> Result<(), HistoryError> {
		let out_of_range = || HistoryError::OutOfRange {
			delta,
			index: self.index,
			len: self.entries.len(),
		};
		let target = isize::try_from(self.index)
			.ok()
			.and_then(|index| index.checked_add(delta))
			.and_then(|target| usize::try_from(target).ok())
			.filter(|target| *target < self.entries.len())
			.ok_or_else(out_of_range)?;

		self.index = target;
		let entry = &self.entries[self.index];
		for listener in &mut self.listeners {
			listener(entry);
		}
		Ok(())
	}
}
