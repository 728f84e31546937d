//! Labels are interned per method: two `:foo` occurrences in the same method
//! resolve to the same `LabelId`, and identity (not name) is what the
//! instruction iterator and control-flow driver compare against.

use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Label {
	pub name: String,
}

/// Cheap, `Eq`-by-pointer handle to an interned `Label`, matching the
/// reference's `__hash__ = id(self)` identity semantics.
#[derive(Debug, Clone)]
pub struct LabelId(pub Rc<Label>);

impl PartialEq for LabelId {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}
impl Eq for LabelId {}

impl std::hash::Hash for LabelId {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		(Rc::as_ptr(&self.0) as usize).hash(state);
	}
}

impl std::fmt::Display for LabelId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, ":{}", self.0.name)
	}
}

#[derive(Debug, Default)]
pub struct LabelsContext {
	labels: HashMap<String, LabelId>,
}

impl LabelsContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Interns `name`, returning the existing handle if this method has
	/// already seen it, or creating a fresh one otherwise.
	pub fn get(&mut self, name: &str) -> LabelId {
		self.labels
			.entry(name.to_string())
			.or_insert_with(|| {
				LabelId(Rc::new(Label {
					name: name.to_string(),
				}))
			})
			.clone()
	}

	/// Parses a `:label` line (the leading colon already confirmed by the
	/// caller) and interns it.
	pub fn parse(&mut self, line: &str) -> LabelId {
		let name = line.strip_prefix(':').unwrap_or(line);
		self.get(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_name_interns_to_same_handle() {
		let mut ctx = LabelsContext::new();
		let a = ctx.parse(":loop_start");
		let b = ctx.get("loop_start");
		assert_eq!(a, b);
	}

	#[test]
	fn different_names_are_distinct() {
		let mut ctx = LabelsContext::new();
		let a = ctx.get("loop_start");
		let b = ctx.get("loop_end");
		assert_ne!(a, b);
	}
}
