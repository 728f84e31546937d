//! `Array`: a fixed-size, sparsely-backed array value. Grounded on
//! `registers_values/array.py`: only indexes that have actually been
//! written are stored; an unwritten index reads back as `Unknown` rather
//! than pre-filling every slot, since most arrays the engine sees are never
//! fully populated along any single explored path.

use std::collections::HashMap;

use crate::error::{VmError, VmResult};

use super::register_value::RegisterValue;

#[derive(Debug, Clone)]
pub struct Array {
	size: usize,
	element_type: String,
	items: HashMap<usize, RegisterValue>,
}

impl Array {
	pub fn new(size: usize, element_type: impl Into<String>) -> Self {
		Array { size, element_type: element_type.into(), items: HashMap::new() }
	}

	pub fn size(&self) -> usize {
		self.size
	}

	pub fn element_type(&self) -> &str {
		&self.element_type
	}

	pub fn get(&self, index: usize) -> VmResult<RegisterValue> {
		if index >= self.size {
			return Err(VmError::InvalidValueType { expected: "in-bounds array index" });
		}
		Ok(self.items.get(&index).cloned().unwrap_or(RegisterValue::Unknown))
	}

	pub fn set(&mut self, index: usize, value: RegisterValue) -> VmResult<()> {
		if index >= self.size {
			return Err(VmError::InvalidValueType { expected: "in-bounds array index" });
		}
		self.items.insert(index, value);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unset_index_reads_unknown() {
		let array = Array::new(4, "I");
		assert!(array.get(0).unwrap().is_unknown());
	}

	#[test]
	fn set_then_get_round_trips() {
		let mut array = Array::new(4, "I");
		array.set(2, RegisterValue::concrete("0x5", "I")).unwrap();
		assert_eq!(array.get(2).unwrap().as_int().unwrap(), 5);
	}

	#[test]
	fn out_of_bounds_get_errors() {
		let array = Array::new(2, "I");
		assert!(array.get(5).is_err());
	}

	#[test]
	fn out_of_bounds_set_errors() {
		let mut array = Array::new(2, "I");
		assert!(array.set(5, RegisterValue::concrete("0x1", "I")).is_err());
	}
}
