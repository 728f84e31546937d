//! `MethodRunner`: binds a method's parameter registers and drives its body
//! through an `InstructionsRunner`. Grounded on `smalivm/smalivm.py`'s
//! `MethodRunner` and the recursion guard living inline in its
//! `InstructionsRunner._invoke`.
//!
//! The reference keys its call-stack guard by the raw invoke operand text
//! and leaks a stack entry when a nested run raises past the `del`; this
//! engine keys by the resolved `class->name(params)returntype` signature and
//! pops unconditionally after the nested run returns, whether it returned a
//! value or an error, so every exit path, not just the success path, leaves
//! the stack exactly as it found it.

use std::rc::Rc;

use tracing::debug;

use crate::error::{VmError, VmResult};
use crate::interpreter::{InstructionsRunner, MethodInvoker};
use crate::smali::members::Method;
use crate::value::{RegisterValue, RegistersContext};
use crate::vm::Vm;

pub struct MethodRunner<'a> {
	vm: &'a Vm,
	invokes_stack: &'a mut Vec<String>,
}

impl<'a> MethodRunner<'a> {
	pub fn new(vm: &'a Vm, invokes_stack: &'a mut Vec<String>) -> Self {
		MethodRunner { vm, invokes_stack }
	}

	/// Declares `method`'s full register file and binds `args`, one per
	/// declared Dalvik parameter (*not* counting the implicit instance
	/// receiver), into the parameter registers starting after `p0`. Wide
	/// parameters claim their pair register the same way any other wide
	/// assignment does.
	///
	/// `p0` (the instance receiver, for a non-static method) is always bound
	/// to `Unknown` rather than the caller's actual receiver value: the
	/// reference's `MethodRunner.run` never touches the receiver slot when
	/// binding arguments either, so a callee never actually learns which
	/// instance it was invoked on.
	pub fn run(&mut self, method: &Method, args: &[RegisterValue]) -> VmResult<RegisterValue> {
		let param_registers = method.parameter_register_count();
		let local_registers = method.registers_count.saturating_sub(param_registers);
		let mut registers = RegistersContext::new();
		registers.declare(local_registers, false);
		registers.declare(param_registers, true);

		let mut slot = 0u32;
		if !method.is_static() {
			registers.set_register("p0", RegisterValue::Unknown, false)?;
			slot += 1;
		}
		for (arg_idx, param) in method.parameter_types.iter().enumerate() {
			let wide = param == "J" || param == "D";
			let value = args.get(arg_idx).cloned().unwrap_or(RegisterValue::Unknown);
			registers.set_register(&format!("p{}", slot), value, wide)?;
			slot += if wide { 2 } else { 1 };
		}

		let config = self.vm.config();
		let breakpoints = self.vm.breakpoints();
		let mut runner = InstructionsRunner::new(&method.items, config, self).with_breakpoints(breakpoints);
		runner.run(registers)
	}
}

impl<'a> MethodInvoker for MethodRunner<'a> {
	fn invoke(
		&mut self,
		class_descriptor: &str,
		method_name: &str,
		params: &str,
		return_type: &str,
		args: &[RegisterValue],
	) -> VmResult<RegisterValue> {
		let key = format!("{}->{}({}){}", class_descriptor, method_name, params, return_type);
		if self.invokes_stack.contains(&key) {
			return Ok(RegisterValue::Unknown);
		}

		let class = match self.vm.load_class(class_descriptor)? {
			Some(class) => class,
			None => {
				let err = VmError::ClassNotFound { class: class_descriptor.to_string() };
				debug!(%err, "invoke target unresolved");
				return Ok(RegisterValue::Unknown);
			}
		};
		let signature = format!("{}({}){}", method_name, params, return_type);
		let method: Rc<Method> = match class.find_method_by_signature(&signature) {
			Some(method) if method.is_abstract() || method.is_native() => {
				let err = VmError::AbstractOrNativeMethod {
					class: class_descriptor.to_string(),
					signature: signature.clone(),
				};
				debug!(%err, "invoke target unresolved");
				return Ok(RegisterValue::Unknown);
			}
			Some(method) => method.clone(),
			None => {
				let err = VmError::MethodNotFound { class: class_descriptor.to_string(), signature: signature.clone() };
				debug!(%err, "invoke target unresolved");
				return Ok(RegisterValue::Unknown);
			}
		};

		self.invokes_stack.push(key);
		let result = MethodRunner::new(self.vm, &mut *self.invokes_stack).run(&method, args);
		self.invokes_stack.pop();
		result
	}
}
