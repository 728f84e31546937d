//! `AmbiguousValue`: a finite set of candidate `RegisterValue`s a register
//! might hold, produced when branch/switch fan-out exploration disagrees on
//! what a register contains. Mirrors the reference's `AmbiguousValue`
//! wrapping a `set[RegisterValue]`; the collapse-to-`Unknown` behavior past
//! the configured cap is this engine's resolution of the open question the
//! reference leaves unbounded.

use super::register_value::RegisterValue;

#[derive(Debug, Clone)]
pub struct AmbiguousValue {
	values: Vec<RegisterValue>,
}

impl AmbiguousValue {
	pub fn new() -> Self {
		AmbiguousValue { values: Vec::new() }
	}

	pub fn values(&self) -> &[RegisterValue] {
		&self.values
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	fn contains(&self, value: &RegisterValue) -> bool {
		self.values.iter().any(|existing| values_equal(existing, value))
	}

	/// Inserts `value` if it isn't already present. Returns `true` if the
	/// set would now exceed `cap` and the caller should collapse this
	/// register to `RegisterValue::Unknown` instead of keeping it ambiguous.
	pub fn insert(&mut self, value: RegisterValue, cap: usize) -> bool {
		if self.contains(&value) {
			return false;
		}
		if self.values.len() >= cap {
			return true;
		}
		self.values.push(value);
		false
	}
}

impl Default for AmbiguousValue {
	fn default() -> Self {
		Self::new()
	}
}

/// Structural equality used for de-duplicating candidate values. `Unknown`
/// values are never deduplicated against each other since each arises from
/// a distinct unresolved computation.
fn values_equal(a: &RegisterValue, b: &RegisterValue) -> bool {
	match (a, b) {
		(RegisterValue::Concrete { literal: l1, value_type: t1 }, RegisterValue::Concrete { literal: l2, value_type: t2 }) => {
			l1 == l2 && t1 == t2
		}
		_ => false,
	}
}

/// Merges a set of candidate values produced by fan-out exploration of a
/// single register into either a single concrete value (all branches
/// agreed), an `Ambiguous` value, or `Unknown` if the candidate set would
/// overflow the configured cap.
pub fn merge_candidates(candidates: Vec<RegisterValue>, cap: usize) -> RegisterValue {
	if candidates.is_empty() {
		return RegisterValue::Unknown;
	}
	if candidates.iter().any(|c| c.is_unknown()) {
		return RegisterValue::Unknown;
	}

	let mut ambiguous = AmbiguousValue::new();
	for candidate in candidates {
		if ambiguous.insert(candidate, cap) {
			return RegisterValue::Unknown;
		}
	}

	if ambiguous.len() == 1 {
		return ambiguous.values.into_iter().next().unwrap();
	}
	RegisterValue::Ambiguous(ambiguous)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_candidate_stays_concrete() {
		let merged = merge_candidates(vec![RegisterValue::concrete("0x1", "I")], 16);
		assert!(matches!(merged, RegisterValue::Concrete { .. }));
	}

	#[test]
	fn matching_candidates_collapse_to_one() {
		let merged = merge_candidates(
			vec![RegisterValue::concrete("0x1", "I"), RegisterValue::concrete("0x1", "I")],
			16,
		);
		assert!(matches!(merged, RegisterValue::Concrete { .. }));
	}

	#[test]
	fn differing_candidates_become_ambiguous() {
		let merged = merge_candidates(
			vec![RegisterValue::concrete("0x1", "I"), RegisterValue::concrete("0x2", "I")],
			16,
		);
		assert!(matches!(merged, RegisterValue::Ambiguous(_)));
	}

	#[test]
	fn overflowing_cap_collapses_to_unknown() {
		let candidates: Vec<_> = (0..20).map(|i| RegisterValue::concrete(format!("0x{:x}", i), "I")).collect();
		let merged = merge_candidates(candidates, 16);
		assert!(merged.is_unknown());
	}

	#[test]
	fn any_unknown_candidate_collapses_whole_merge() {
		let merged = merge_candidates(vec![RegisterValue::concrete("0x1", "I"), RegisterValue::Unknown], 16);
		assert!(merged.is_unknown());
	}
}
