//! `Breakpoints`: the observer bus callers register against a running
//! method. Grounded on `smalivm/breakpoints.py`'s three registration kinds
//! by instruction identity, by an arbitrary predicate evaluated before
//! every instruction, and by value type (currently just `"string"`,
//! firing after a `const-string`/`const-string/jumbo` or a
//! `move-result-object` that resolved to string data).
//!
//! The reference keys `__by_instructions` by Python object identity
//! (`Instruction` objects are shared, mutable-free, and hashed with
//! `id()`); this engine keys by `(method position)` instead, since
//! `Instruction` here is a plain `Clone` value with no stable identity of
//! its own. Callbacks are registered as `Rc<dyn Fn(...)>` and removed by
//! the handle `add_*` returns, rather than by re-passing the original
//! closure (Rust closures aren't comparable the way Python functions are).

use std::collections::HashMap;
use std::rc::Rc;

use crate::smali::{Instruction, Opcode};
use crate::value::{RegisterValue, RegistersContext};

pub type InstructionCallback = Rc<dyn Fn(&RegistersContext, &Instruction) -> Option<bool>>;
pub type ConditionFn = Rc<dyn Fn(&RegistersContext, &Instruction) -> bool>;
pub type StringValueCallback = Rc<dyn Fn(&RegistersContext, &Instruction, &str, &str) -> Option<bool>>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BreakpointHandle(u64);

#[derive(Default)]
pub struct Breakpoints {
	by_instruction: HashMap<usize, Vec<(BreakpointHandle, InstructionCallback)>>,
	by_custom_condition: Vec<(BreakpointHandle, ConditionFn, InstructionCallback)>,
	by_value_type_string: Vec<(BreakpointHandle, StringValueCallback)>,
	next_handle: u64,
}

impl Breakpoints {
	pub fn new() -> Self {
		Breakpoints::default()
	}

	fn issue_handle(&mut self) -> BreakpointHandle {
		self.next_handle += 1;
		BreakpointHandle(self.next_handle)
	}

	pub fn add_by_instruction_position(&mut self, position: usize, callback: InstructionCallback) -> BreakpointHandle {
		let handle = self.issue_handle();
		self.by_instruction.entry(position).or_default().push((handle, callback));
		handle
	}

	pub fn add_by_custom_condition(&mut self, condition: ConditionFn, callback: InstructionCallback) -> BreakpointHandle {
		let handle = self.issue_handle();
		self.by_custom_condition.push((handle, condition, callback));
		handle
	}

	pub fn add_by_string_value(&mut self, callback: StringValueCallback) -> BreakpointHandle {
		let handle = self.issue_handle();
		self.by_value_type_string.push((handle, callback));
		handle
	}

	pub fn remove(&mut self, handle: BreakpointHandle) {
		for callbacks in self.by_instruction.values_mut() {
			callbacks.retain(|(h, _)| *h != handle);
		}
		self.by_instruction.retain(|_, v| !v.is_empty());
		self.by_custom_condition.retain(|(h, _, _)| *h != handle);
		self.by_value_type_string.retain(|(h, _)| *h != handle);
	}

	/// Fires before an instruction executes. Returns `false` if any
	/// callback vetoed the step (a caller may use that to pause execution),
	/// matching the reference's `False`-means-stop convention.
	pub fn trigger_before(&self, position: usize, context: &RegistersContext, ins: &Instruction) -> bool {
		let mut proceed = true;
		if let Some(callbacks) = self.by_instruction.get(&position) {
			for (_, callback) in callbacks {
				if callback(context, ins) == Some(false) {
					proceed = false;
				}
			}
		}
		for (_, condition, callback) in &self.by_custom_condition {
			if condition(context, ins) && callback(context, ins) == Some(false) {
				proceed = false;
			}
		}
		proceed
	}

	/// Fires after a `const-string`/`const-string/jumbo` lands, or after a
	/// `move-result-object` whose value resolved to string data (from a
	/// String-returning `invoke-*` or a `String[]`-returning
	/// `filled-new-array`). `register_name` names the destination register,
	/// `value` is its decoded string contents.
	pub fn trigger_after_string(&self, context: &RegistersContext, ins: &Instruction, register_name: &str, value: &str) -> bool {
		let mut proceed = true;
		for (_, callback) in &self.by_value_type_string {
			if callback(context, ins, register_name, value) == Some(false) {
				proceed = false;
			}
		}
		proceed
	}
}

/// True for the instructions `trigger_after_string` should inspect: direct
/// string constants, and a `move-result-object` whose defining instruction
/// produced string data.
pub fn is_string_producing(opcode: Opcode) -> bool {
	matches!(opcode, Opcode::ConstString | Opcode::ConstStringJumbo | Opcode::MoveResultObject)
}

/// Extracts the string payload from a resolved register value, if it holds
/// one, used by the interpreter to feed `trigger_after_string`.
pub fn string_payload(value: &RegisterValue) -> Option<&str> {
	value.as_string().ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::smali::Operands;

	fn sample_ins() -> Instruction {
		Instruction { opcode: Opcode::Nop, operands: Operands::None }
	}

	#[test]
	fn instruction_breakpoint_fires_at_its_position() {
		let mut bp = Breakpoints::new();
		let fired = Rc::new(std::cell::Cell::new(false));
		let fired_clone = fired.clone();
		bp.add_by_instruction_position(3, Rc::new(move |_ctx, _ins| {
			fired_clone.set(true);
			None
		}));
		let ctx = RegistersContext::new();
		let ins = sample_ins();
		assert!(bp.trigger_before(3, &ctx, &ins));
		assert!(fired.get());
		assert!(!bp.by_instruction.contains_key(&7));
	}

	#[test]
	fn vetoing_callback_reports_do_not_proceed() {
		let mut bp = Breakpoints::new();
		bp.add_by_instruction_position(0, Rc::new(|_ctx, _ins| Some(false)));
		let ctx = RegistersContext::new();
		let ins = sample_ins();
		assert!(!bp.trigger_before(0, &ctx, &ins));
	}

	#[test]
	fn removing_a_handle_stops_it_firing() {
		let mut bp = Breakpoints::new();
		let handle = bp.add_by_instruction_position(0, Rc::new(|_ctx, _ins| Some(false)));
		bp.remove(handle);
		let ctx = RegistersContext::new();
		let ins = sample_ins();
		assert!(bp.trigger_before(0, &ctx, &ins));
	}

	#[test]
	fn custom_condition_only_fires_when_true() {
		let mut bp = Breakpoints::new();
		bp.add_by_custom_condition(Rc::new(|_ctx, ins| ins.opcode == Opcode::Nop), Rc::new(|_ctx, _ins| Some(false)));
		let ctx = RegistersContext::new();
		let ins = sample_ins();
		assert!(!bp.trigger_before(99, &ctx, &ins));
	}
}
