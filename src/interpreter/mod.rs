//! `InstructionsRunner`: executes one method body over an approximate value
//! domain. Grounded on `smalivm/smalivm.py`'s `InstructionsRunner`, scaled
//! down from one Python method per individual mnemonic to one Rust match
//! arm (or arm group) per instruction *family*: `add-int`/`add-int/2addr`/
//! `add-int/lit8` all reduce to the same binary-op handling, dispatched off
//! `Operands` shape rather than re-deriving the same arithmetic three
//! times. See `DESIGN.md` for the full opcode-family-to-handler mapping.
//!
//! Branch/switch fan-out (§4.5 of the design brief this engine follows):
//! when a conditional test can't be decided from the current register
//! state, both successors are explored with independently cloned register
//! files; since tracking a precise merge point would need real dominator
//! analysis, this engine resolves the fork at the *method return* level:
//! each explored path runs to completion (a `return`, or falling off the
//! end) and the candidate outcomes are merged the same way ambiguous
//! register values are (`value::merge_candidates`). This is a deliberate
//! simplification of the reference's mid-method register-state merge,
//! recorded as an open-question resolution in `DESIGN.md`.

pub mod ops;

use std::collections::HashMap;

use crate::breakpoints::Breakpoints;
use crate::config::VmConfig;
use crate::error::{VmError, VmResult};
use crate::framework;
use crate::smali::directive::Directive;
use crate::smali::labels::LabelId;
use crate::smali::members::MethodItem;
use crate::smali::{Instruction, Opcode, Operands};
use crate::value::array::Array;
use crate::value::{merge_candidates, RegisterValue, RegistersContext};

use std::cell::RefCell;
use std::rc::Rc;

/// Resolves a non-framework `invoke-*` target. Implemented by
/// `method_runner::MethodRunner`, which also owns the call-stack recursion
/// guard; kept as a trait so this module doesn't need to know about class
/// loading.
pub trait MethodInvoker {
	fn invoke(
		&mut self,
		class_descriptor: &str,
		method_name: &str,
		params: &str,
		return_type: &str,
		args: &[RegisterValue],
	) -> VmResult<RegisterValue>;
}

/// An invoker used when no class-loading context is wired up (unit tests,
/// or analyzing a method in isolation): every non-framework call resolves
/// to `Unknown`, same as a method the engine can't locate.
pub struct NullInvoker;

impl MethodInvoker for NullInvoker {
	fn invoke(&mut self, _class: &str, _method: &str, _params: &str, _ret: &str, _args: &[RegisterValue]) -> VmResult<RegisterValue> {
		Ok(RegisterValue::Unknown)
	}
}

enum StepOutcome {
	Continue,
	Jump(usize),
	Return(RegisterValue),
	Fork(Vec<usize>),
}

pub struct InstructionsRunner<'a> {
	items: &'a [MethodItem],
	label_positions: HashMap<usize, usize>,
	config: &'a VmConfig,
	invoker: &'a mut dyn MethodInvoker,
	breakpoints: Option<&'a Breakpoints>,
}

fn label_key(label: &LabelId) -> usize {
	Rc::as_ptr(&label.0) as usize
}

impl<'a> InstructionsRunner<'a> {
	pub fn new(items: &'a [MethodItem], config: &'a VmConfig, invoker: &'a mut dyn MethodInvoker) -> Self {
		let mut label_positions = HashMap::new();
		for (pos, item) in items.iter().enumerate() {
			if let MethodItem::Label(label) = item {
				label_positions.insert(label_key(label), pos);
			}
		}
		InstructionsRunner { items, label_positions, config, invoker, breakpoints: None }
	}

	pub fn with_breakpoints(mut self, breakpoints: &'a Breakpoints) -> Self {
		self.breakpoints = Some(breakpoints);
		self
	}

	fn position_of(&self, label: &LabelId) -> Option<usize> {
		self.label_positions.get(&label_key(label)).copied()
	}

	/// Runs the method body starting at register state `registers`,
	/// returning its resolved return value (`Unknown` for a `void` method
	/// or a path that falls off the end without an explicit `return`).
	pub fn run(&mut self, registers: RegistersContext) -> VmResult<RegisterValue> {
		self.run_from(registers, 0, 0, &mut Vec::new())
	}

	/// `blocked_gotos` holds the positions of `goto`/`goto/16`/`goto/32`
	/// instructions currently being jumped from somewhere up this call
	/// chain: `goto` is driven recursively (see below) rather than by
	/// adjusting `pos` in place, and a position is pushed before recursing
	/// and popped unconditionally after, so re-entering the same `goto`,
	/// directly (`:L goto :L`) or via a longer cycle of nothing but gotos,
	/// terminates that leaf instead of spinning forever.
	fn run_from(
		&mut self,
		mut registers: RegistersContext,
		mut pos: usize,
		depth: u32,
		blocked_gotos: &mut Vec<usize>,
	) -> VmResult<RegisterValue> {
		let mut pending_result: Option<RegisterValue> = None;
		let mut pending_exception: Option<RegisterValue> = None;

		loop {
			let item = match self.items.get(pos) {
				Some(item) => item,
				None => return Ok(RegisterValue::Unknown),
			};
			let ins = match item {
				MethodItem::Label(_) | MethodItem::Directive(_) => {
					pos += 1;
					continue;
				}
				MethodItem::Instruction(ins) => ins,
			};

			if let Some(bp) = self.breakpoints {
				bp.trigger_before(pos, &registers, ins);
			}

			if matches!(ins.opcode, Opcode::GOTO | Opcode::Goto16 | Opcode::Goto32) {
				if blocked_gotos.contains(&pos) {
					return Ok(RegisterValue::Unknown);
				}
				let label = match &ins.operands {
					Operands::Goto { label } => label,
					_ => return Err(VmError::UnsupportedOpcode { mnemonic: ins.opcode.name().to_string() }),
				};
				let target = self.position_of(label).unwrap_or(pos + 1);
				blocked_gotos.push(pos);
				let result = self.run_from(registers, target, depth, blocked_gotos);
				blocked_gotos.pop();
				return result;
			}

			match self.step(ins, &mut registers, pos, &mut pending_result, &mut pending_exception) {
				Ok(StepOutcome::Continue) => pos += 1,
				Ok(StepOutcome::Jump(target)) => pos = target,
				Ok(StepOutcome::Return(value)) => return Ok(value),
				Ok(StepOutcome::Fork(targets)) => {
					if depth >= self.config.max_fan_out_depth {
						return Ok(RegisterValue::Unknown);
					}
					let mut outcomes = Vec::with_capacity(targets.len());
					for target in targets {
						let outcome = self.run_from(registers.clone(), target, depth + 1, blocked_gotos)?;
						outcomes.push(outcome);
					}
					return Ok(merge_candidates(outcomes, self.config.max_ambiguous_values));
				}
				Err(e) if e.is_catchable() => match self.find_catch(pos, &e) {
					Some((catch_pos, exception_value)) => {
						pending_exception = Some(exception_value);
						pos = catch_pos;
					}
					None => return Err(e),
				},
				Err(e) => return Err(e),
			}
		}
	}

	fn find_catch(&self, pos: usize, error: &VmError) -> Option<(usize, RegisterValue)> {
		for item in self.items {
			let block = match item {
				MethodItem::Directive(Directive::Catch(b)) | MethodItem::Directive(Directive::CatchAll(b)) => b,
				_ => continue,
			};
			let start = self.position_of(&block.start_label)?;
			let end = self.position_of(&block.end_label)?;
			if pos >= start && pos < end {
				let catch_pos = self.position_of(&block.catch_label)?;
				let class_name = match error {
					VmError::RegisterNotFound { .. } => "Ljava/lang/RuntimeException;".to_string(),
					VmError::RegisterNotInitialized { .. } => "Ljava/lang/RuntimeException;".to_string(),
					VmError::DivisionByZero => "Ljava/lang/ArithmeticException;".to_string(),
					_ => block.exception_type.clone(),
				};
				return Some((catch_pos, RegisterValue::Object(framework::ObjectValue::Instance { class_name })));
			}
		}
		None
	}

	fn step(
		&mut self,
		ins: &Instruction,
		registers: &mut RegistersContext,
		pos: usize,
		pending_result: &mut Option<RegisterValue>,
		pending_exception: &mut Option<RegisterValue>,
	) -> VmResult<StepOutcome> {
		use Opcode::*;
		let op = ins.opcode;

		match (&ins.operands, op) {
			(Operands::None, Nop) => Ok(StepOutcome::Continue),
			(Operands::OneReg { .. }, MonitorEnter) | (Operands::OneReg { .. }, MonitorExit) => {
				Ok(StepOutcome::Continue)
			}

			(Operands::None, ReturnVoid) | (Operands::None, ReturnVoidNoBarrier) => {
				Ok(StepOutcome::Return(RegisterValue::Unknown))
			}
			(Operands::OneReg { reg }, RETURN) | (Operands::OneReg { reg }, ReturnWide) | (Operands::OneReg { reg }, ReturnObject) => {
				let value = registers.get_register(reg).cloned().unwrap_or(RegisterValue::Unknown);
				Ok(StepOutcome::Return(value))
			}

			(Operands::OneReg { reg }, THROW) => {
				let value = registers.get_register(reg)?.clone();
				Err(thrown_error(&value))
			}

			(Operands::TwoRegs { dest, src }, MOVE)
			| (Operands::TwoRegs { dest, src }, MoveFrom16)
			| (Operands::TwoRegs { dest, src }, Move16)
			| (Operands::TwoRegs { dest, src }, MoveObject)
			| (Operands::TwoRegs { dest, src }, MoveObjectFrom16)
			| (Operands::TwoRegs { dest, src }, MoveObject16) => {
				let value = registers.get_register(src)?.clone();
				registers.set_register(dest, value, false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::TwoRegs { dest, src }, MoveWide)
			| (Operands::TwoRegs { dest, src }, MoveWideFrom16)
			| (Operands::TwoRegs { dest, src }, MoveWide16) => {
				let value = registers.get_register(src)?.clone();
				registers.set_register(dest, value, true)?;
				Ok(StepOutcome::Continue)
			}

			(Operands::OneReg { reg }, MoveResult) => {
				let value = pending_result.take().unwrap_or(RegisterValue::Unknown);
				registers.set_register(reg, value, false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::OneReg { reg }, MoveResultWide) => {
				let value = pending_result.take().unwrap_or(RegisterValue::Unknown);
				registers.set_register(reg, value, true)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::OneReg { reg }, MoveResultObject) => {
				let value = pending_result.take().unwrap_or(RegisterValue::Unknown);
				if let Some(bp) = self.breakpoints {
					fire_string_observer(bp, registers, ins, reg, &value);
				}
				registers.set_register(reg, value, false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::OneReg { reg }, MoveException) => {
				let value = pending_exception.take().unwrap_or(RegisterValue::Unknown);
				registers.set_register(reg, value, false)?;
				Ok(StepOutcome::Continue)
			}

			(Operands::OneRegLiteral { reg, literal }, Const4) => {
				registers.set_register(reg, RegisterValue::concrete(literal.clone(), "I"), false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::OneRegNumLiteral { reg, literal }, Const16)
			| (Operands::OneRegNumLiteral { reg, literal }, CONST)
			| (Operands::OneRegNumLiteral { reg, literal }, ConstHigh16) => {
				registers.set_register(reg, RegisterValue::concrete(literal.clone(), "I"), false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::OneRegNumLiteral { reg, literal }, ConstWide16)
			| (Operands::OneRegNumLiteral { reg, literal }, ConstWide32)
			| (Operands::OneRegNumLiteral { reg, literal }, ConstWide)
			| (Operands::OneRegNumLiteral { reg, literal }, ConstWideHigh16) => {
				registers.set_register(reg, RegisterValue::concrete(literal.clone(), "J"), true)?;
				Ok(StepOutcome::Continue)
			}

			(Operands::OneRegRef { reg, data }, ConstString) | (Operands::OneRegRef { reg, data }, ConstStringJumbo) => {
				let text = unquote(data);
				let value = framework::string::string_value(text.clone());
				if let Some(bp) = self.breakpoints {
					bp.trigger_after_string(registers, ins, reg, &text);
				}
				registers.set_register(reg, value, false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::OneRegRef { reg, data }, ConstClass)
			| (Operands::OneRegRef { reg, data }, ConstMethodHandle)
			| (Operands::OneRegRef { reg, data }, ConstMethodType) => {
				registers.set_register(reg, RegisterValue::Object(framework::ObjectValue::Instance { class_name: data.clone() }), false)?;
				Ok(StepOutcome::Continue)
			}

			(Operands::OneRegRef { reg, .. }, CheckCast) => {
				// A successful cast doesn't change the value; this engine
				// never verifies the runtime type against `data`.
				let _ = registers.get_register(reg)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::TwoRegsRef { dest, src, .. }, InstanceOf) => {
				let value = registers.get_register(src)?;
				let result = if value.is_null() { RegisterValue::concrete("0x0", "Z") } else { RegisterValue::Unknown };
				registers.set_register(dest, result, false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::TwoRegs { dest, src }, ArrayLength) => {
				let value = registers.get_register(src)?;
				let result = match value.as_array() {
					Ok(array) => RegisterValue::concrete(format!("{:#x}", array.borrow().size()), "I"),
					Err(_) => RegisterValue::Unknown,
				};
				registers.set_register(dest, result, false)?;
				Ok(StepOutcome::Continue)
			}

			(Operands::OneRegRef { reg, data }, NewInstance) => {
				registers.set_register(reg, RegisterValue::Object(framework::ObjectValue::Instance { class_name: data.clone() }), false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::TwoRegsRef { dest, src, data }, NewArray) => {
				let size = registers.get_register(src)?.as_int();
				let value = match size {
					Ok(n) if n >= 0 => RegisterValue::Array(Rc::new(RefCell::new(Array::new(n as usize, array_element_type(data))))),
					_ => RegisterValue::Unknown,
				};
				registers.set_register(dest, value, false)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::Invoke { regs, data }, FilledNewArray) | (Operands::Invoke { regs, data }, FilledNewArrayRange) => {
				let element_type = data.rfind('[').map(|idx| data[idx + 1..].to_string()).unwrap_or_else(|| data.clone());
				let array = Array::new(regs.len(), element_type);
				let array = Rc::new(RefCell::new(array));
				for (i, reg) in regs.iter().enumerate() {
					if let Ok(value) = registers.get_register(reg) {
						let _ = array.borrow_mut().set(i, value.clone());
					}
				}
				*pending_result = Some(RegisterValue::Array(array));
				Ok(StepOutcome::Continue)
			}
			(Operands::RegAndLabel { reg, label }, FillArrayData) => {
				if let Ok(array) = registers.get_register(reg)?.as_array() {
					if let Some(directive_pos) = self.position_of(label) {
						if let Some(MethodItem::Directive(Directive::ArrayData { values })) = self.items.get(directive_pos + 1) {
							let element_type = array.borrow().element_type().to_string();
							let mut array = array.borrow_mut();
							for (i, value) in values.iter().enumerate() {
								let _ = array.set(i, RegisterValue::concrete(value.clone(), element_type.clone()));
							}
						}
					}
				}
				Ok(StepOutcome::Continue)
			}

			(Operands::RegAndLabel { reg, label }, PackedSwitch) => {
				self.run_switch(reg, label, registers, pos, SwitchKind::Packed)
			}
			(Operands::RegAndLabel { reg, label }, SparseSwitch) => {
				self.run_switch(reg, label, registers, pos, SwitchKind::Sparse)
			}

			(Operands::ThreeRegs { dest, src1, src2 }, CmplFloat) => binop(registers, dest, src1, src2, ops::cmpl_float),
			(Operands::ThreeRegs { dest, src1, src2 }, CmpgFloat) => binop(registers, dest, src1, src2, ops::cmpg_float),
			(Operands::ThreeRegs { dest, src1, src2 }, CmplDouble) => binop(registers, dest, src1, src2, ops::cmpl_double),
			(Operands::ThreeRegs { dest, src1, src2 }, CmpgDouble) => binop(registers, dest, src1, src2, ops::cmpg_double),
			(Operands::ThreeRegs { dest, src1, src2 }, CmpLong) => binop(registers, dest, src1, src2, ops::cmp_long),

			(Operands::If { regs, label }, op) if is_if(op) => self.run_if(regs, label, registers, pos, op),

			(Operands::ThreeRegs { dest, src1, src2 }, AGET)
			| (Operands::ThreeRegs { dest, src1, src2 }, AgetWide)
			| (Operands::ThreeRegs { dest, src1, src2 }, AgetObject)
			| (Operands::ThreeRegs { dest, src1, src2 }, AgetBoolean)
			| (Operands::ThreeRegs { dest, src1, src2 }, AgetByte)
			| (Operands::ThreeRegs { dest, src1, src2 }, AgetChar)
			| (Operands::ThreeRegs { dest, src1, src2 }, AgetShort) => {
				let array = registers.get_register(src1)?.as_array();
				let index = registers.get_register(src2)?.as_int();
				let value = match (array, index) {
					(Ok(array), Ok(i)) if i >= 0 => array.borrow().get(i as usize).unwrap_or(RegisterValue::Unknown),
					_ => RegisterValue::Unknown,
				};
				registers.set_register(dest, value, op == AgetWide)?;
				Ok(StepOutcome::Continue)
			}
			(Operands::ThreeRegs { dest, src1, src2 }, APUT)
			| (Operands::ThreeRegs { dest, src1, src2 }, AputWide)
			| (Operands::ThreeRegs { dest, src1, src2 }, AputObject)
			| (Operands::ThreeRegs { dest, src1, src2 }, AputBoolean)
			| (Operands::ThreeRegs { dest, src1, src2 }, AputByte)
			| (Operands::ThreeRegs { dest, src1, src2 }, AputChar)
			| (Operands::ThreeRegs { dest, src1, src2 }, AputShort) => {
				let value = registers.get_register(dest)?.clone();
				let array = registers.get_register(src1)?.as_array();
				let index = registers.get_register(src2)?.as_int();
				if let (Ok(array), Ok(i)) = (array, index) {
					if i >= 0 {
						let _ = array.borrow_mut().set(i as usize, value);
					}
				}
				Ok(StepOutcome::Continue)
			}

			// Object/static field access never tracks heap state (this
			// engine has no object-graph model): reads resolve to
			// `Unknown`, writes are no-ops. Includes odex-only volatile
			// variants, which behave identically for our purposes.
			(Operands::TwoRegsRef { dest, .. }, op) if is_iget(op) => {
				registers.set_register(dest, RegisterValue::Unknown, is_wide_field(op))?;
				Ok(StepOutcome::Continue)
			}
			(Operands::TwoRegsRef { .. }, op) if is_iput(op) => Ok(StepOutcome::Continue),
			(Operands::OneRegRef { reg, .. }, op) if is_sget(op) => {
				registers.set_register(reg, RegisterValue::Unknown, is_wide_field(op))?;
				Ok(StepOutcome::Continue)
			}
			(Operands::OneRegRef { .. }, op) if is_sput(op) => Ok(StepOutcome::Continue),

			(Operands::Invoke { regs, data }, op) if is_invoke(op) => self.run_invoke(regs, data, op, registers, pending_result),

			(Operands::TwoRegs { dest, src }, op) if is_unary(op) => {
				let value = registers.get_register(src)?.clone();
				registers.set_register(dest, unary(op, &value), is_wide_unary_result(op))?;
				Ok(StepOutcome::Continue)
			}

			(Operands::ThreeRegs { dest, src1, src2 }, op) if is_binary(op) => {
				let a = registers.get_register(src1)?.clone();
				let b = registers.get_register(src2)?.clone();
				registers.set_register(dest, binary(op, &a, &b)?, is_wide_binary(op))?;
				Ok(StepOutcome::Continue)
			}
			(Operands::TwoRegs { dest, src }, op) if is_binary_2addr(op) => {
				let a = registers.get_register(dest)?.clone();
				let b = registers.get_register(src)?.clone();
				registers.set_register(dest, binary(unaddr(op), &a, &b)?, is_wide_binary(unaddr(op)))?;
				Ok(StepOutcome::Continue)
			}
			(Operands::TwoRegsLiteral { dest, src, literal }, op) if is_binary_lit(op) => {
				let a = registers.get_register(src)?.clone();
				let b = RegisterValue::concrete(literal.clone(), "I");
				let (a, b) = if op == RsubInt || op == RsubIntLit8 { (b, a) } else { (a, b) };
				registers.set_register(dest, binary(unlit(op), &a, &b)?, false)?;
				Ok(StepOutcome::Continue)
			}

			// Odex inline/quick-dispatch forms the reference treats as
			// pass-through equivalents of their ordinary counterparts.
			(Operands::Invoke { regs, data }, ExecuteInline) | (Operands::Invoke { regs, data }, ExecuteInlineRange) => {
				*pending_result = Some(RegisterValue::Unknown);
				let _ = (regs, data);
				Ok(StepOutcome::Continue)
			}
			(Operands::Invoke { .. }, ThrowVerificationError) => Err(VmError::StructuralParseError {
				class: String::new(),
				message: "throw-verification-error".to_string(),
			}),

			(operands, op) => {
				let _ = operands;
				Err(VmError::UnsupportedOpcode { mnemonic: op.name().to_string() })
			}
		}
	}

	fn run_if(&self, regs: &[String], label: &LabelId, registers: &RegistersContext, pos: usize, op: Opcode) -> VmResult<StepOutcome> {
		let a = registers.get_register(&regs[0])?;
		let b_value;
		let b = if regs.len() == 2 {
			b_value = registers.get_register(&regs[1])?.clone();
			&b_value
		} else {
			b_value = RegisterValue::concrete("0x0", "I");
			&b_value
		};
		let decided = match (a.as_int(), b.as_int()) {
			(Ok(a), Ok(b)) => Some(branch_taken(op, a, b)),
			_ => None,
		};
		let target = self.position_of(label).unwrap_or(pos + 1);
		match decided {
			Some(true) => Ok(StepOutcome::Jump(target)),
			Some(false) => Ok(StepOutcome::Continue),
			None => Ok(StepOutcome::Fork(vec![target, pos + 1])),
		}
	}

	fn run_switch(
		&self,
		reg: &str,
		label: &LabelId,
		registers: &RegistersContext,
		pos: usize,
		kind: SwitchKind,
	) -> VmResult<StepOutcome> {
		let directive_pos = match self.position_of(label) {
			Some(p) => p,
			None => return Ok(StepOutcome::Continue),
		};
		let directive = self.items.get(directive_pos + 1);
		let cases: Vec<(i64, &LabelId)> = match (kind, directive) {
			(SwitchKind::Packed, Some(MethodItem::Directive(Directive::PackedSwitch { first_key, labels }))) => {
				labels.iter().enumerate().map(|(i, l)| (*first_key + i as i64, l)).collect()
			}
			(SwitchKind::Sparse, Some(MethodItem::Directive(Directive::SparseSwitch { labels }))) => {
				labels.iter().map(|(k, l)| (*k, l)).collect()
			}
			_ => Vec::new(),
		};
		let value = registers.get_register(reg)?;
		let fallthrough = pos + 1;
		match value.as_int() {
			Ok(key) => {
				for (case_key, case_label) in &cases {
					if *case_key == key as i64 {
						return Ok(StepOutcome::Jump(self.position_of(case_label).unwrap_or(fallthrough)));
					}
				}
				Ok(StepOutcome::Continue)
			}
			Err(_) => {
				let mut targets: Vec<usize> = cases.iter().map(|(_, l)| self.position_of(l).unwrap_or(fallthrough)).collect();
				targets.push(fallthrough);
				targets.dedup();
				Ok(StepOutcome::Fork(targets))
			}
		}
	}

	fn run_invoke(
		&mut self,
		regs: &[String],
		data: &str,
		op: Opcode,
		registers: &mut RegistersContext,
		pending_result: &mut Option<RegisterValue>,
	) -> VmResult<StepOutcome> {
		let (class_descriptor, method_name, params, return_type) = parse_method_ref(data)?;
		let is_static = matches!(op, Opcode::InvokeStatic | Opcode::InvokeStaticRange);

		let mut args = Vec::new();
		for reg in regs.iter().skip(if is_static { 0 } else { 1 }) {
			args.push(registers.get_register(reg)?.clone());
		}

		if framework::is_framework_class(&class_descriptor) {
			let receiver = if is_static { None } else { Some(registers.get_register(&regs[0])?.clone()) };
			let result = framework::dispatch(&class_descriptor, &method_name, receiver.as_ref(), &args)
				.transpose()?
				.flatten();
			if method_name == "<init>" {
				if let Some(value) = result {
					registers.set_register(&regs[0], value, false)?;
				}
			} else {
				*pending_result = Some(result.unwrap_or(RegisterValue::Unknown));
			}
			return Ok(StepOutcome::Continue);
		}

		let value = self.invoker.invoke(&class_descriptor, &method_name, &params, &return_type, &args)?;
		*pending_result = Some(value);
		Ok(StepOutcome::Continue)
	}
}

#[derive(Clone, Copy)]
enum SwitchKind {
	Packed,
	Sparse,
}

/// Fires the string-value breakpoint for `value` landing in `reg`: once for
/// a plain String result, or once per element that itself decodes to a
/// String when `value` is an array (e.g. a `filled-new-array
/// [Ljava/lang/String;` result reached through `move-result-object`).
fn fire_string_observer(
	bp: &Breakpoints,
	registers: &RegistersContext,
	ins: &Instruction,
	reg: &str,
	value: &RegisterValue,
) {
	if let Ok(s) = value.as_string() {
		bp.trigger_after_string(registers, ins, reg, s);
		return;
	}
	if let Ok(array) = value.as_array() {
		let array = array.borrow();
		for i in 0..array.size() {
			if let Ok(element) = array.get(i) {
				if let Ok(s) = element.as_string() {
					bp.trigger_after_string(registers, ins, reg, s);
				}
			}
		}
	}
}

fn thrown_error(value: &RegisterValue) -> VmError {
	match value {
		RegisterValue::Object(framework::ObjectValue::Instance { class_name }) => {
			VmError::RegisterNotInitialized { name: format!("thrown:{}", class_name) }
		}
		_ => VmError::RegisterNotInitialized { name: "thrown:unknown".to_string() },
	}
}

fn unquote(data: &str) -> String {
	let trimmed = data.trim();
	if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
		trimmed[1..trimmed.len() - 1].to_string()
	} else {
		trimmed.to_string()
	}
}

fn array_element_type(data: &str) -> String {
	data.strip_prefix('[').unwrap_or(data).to_string()
}

/// Splits `Lclass;->name(params)ret` into its four parts.
fn parse_method_ref(data: &str) -> VmResult<(String, String, String, String)> {
	let (class, rest) = data.split_once("->").ok_or_else(|| invalid_ref(data))?;
	let open = rest.find('(').ok_or_else(|| invalid_ref(data))?;
	let close = rest.rfind(')').ok_or_else(|| invalid_ref(data))?;
	let name = rest[..open].to_string();
	let params = rest[open + 1..close].to_string();
	let return_type = rest[close + 1..].to_string();
	Ok((class.to_string(), name, params, return_type))
}

fn invalid_ref(data: &str) -> VmError {
	VmError::StructuralParseError { class: String::new(), message: format!("invalid method reference: {:?}", data) }
}

fn binop(
	registers: &mut RegistersContext,
	dest: &str,
	src1: &str,
	src2: &str,
	f: fn(&RegisterValue, &RegisterValue) -> RegisterValue,
) -> VmResult<StepOutcome> {
	let a = registers.get_register(src1)?.clone();
	let b = registers.get_register(src2)?.clone();
	registers.set_register(dest, f(&a, &b), false)?;
	Ok(StepOutcome::Continue)
}

fn is_if(op: Opcode) -> bool {
	use Opcode::*;
	matches!(op, IfEq | IfNe | IfLt | IfGe | IfGt | IfLe | IfEqz | IfNez | IfLtz | IfGez | IfGtz | IfLez)
}

fn branch_taken(op: Opcode, a: i32, b: i32) -> bool {
	use Opcode::*;
	match op {
		IfEq | IfEqz => a == b,
		IfNe | IfNez => a != b,
		IfLt | IfLtz => a < b,
		IfGe | IfGez => a >= b,
		IfGt | IfGtz => a > b,
		IfLe | IfLez => a <= b,
		_ => false,
	}
}

fn is_iget(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		IGET | IgetWide
			| IgetObject | IgetBoolean
			| IgetByte | IgetChar
			| IgetShort | IgetVolatile
			| IgetObjectVolatile | IgetWideVolatile
	)
}
fn is_iput(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		IPUT | IputWide
			| IputObject | IputBoolean
			| IputByte | IputChar
			| IputShort | IputVolatile
			| IputObjectVolatile | IputWideVolatile
	)
}
fn is_sget(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		SGET | SgetWide
			| SgetObject | SgetBoolean
			| SgetByte | SgetChar
			| SgetShort | SgetVolatile
			| SgetObjectVolatile | SgetWideVolatile
	)
}
fn is_sput(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		SPUT | SputWide
			| SputObject | SputBoolean
			| SputByte | SputChar
			| SputShort | SputVolatile
			| SputObjectVolatile | SputWideVolatile
	)
}
fn is_wide_field(op: Opcode) -> bool {
	use Opcode::*;
	matches!(op, IgetWide | IgetWideVolatile | SgetWide | SgetWideVolatile)
}

fn is_invoke(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		InvokeVirtual
			| InvokeSuper | InvokeDirect
			| InvokeStatic | InvokeInterface
			| InvokeVirtualRange | InvokeSuperRange
			| InvokeDirectRange | InvokeStaticRange
			| InvokeInterfaceRange | InvokeDirectEmpty
			| InvokeObjectInitRange | InvokeSuperQuick
			| InvokeSuperQuickRange | InvokePolymorphic
			| InvokePolymorphicRange | InvokeCustom
			| InvokeCustomRange
	)
}

fn is_unary(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		NegInt | NotInt
			| NegLong | NotLong
			| NegFloat | NegDouble
			| IntToLong | IntToFloat
			| IntToDouble | LongToInt
			| LongToFloat | LongToDouble
			| FloatToInt | FloatToLong
			| FloatToDouble | DoubleToInt
			| DoubleToLong | DoubleToFloat
			| IntToByte | IntToChar
			| IntToShort
	)
}

fn is_wide_unary_result(op: Opcode) -> bool {
	use Opcode::*;
	matches!(op, NegLong | NotLong | IntToLong | FloatToLong | DoubleToLong | LongToDouble | IntToDouble)
}

fn unary(op: Opcode, a: &RegisterValue) -> RegisterValue {
	use Opcode::*;
	match op {
		NegInt => ops::neg_int(a),
		NotInt => ops::not_int(a),
		NegLong => ops::neg_long(a),
		NotLong => ops::not_long(a),
		NegFloat => ops::neg_float(a),
		NegDouble => ops::neg_double(a),
		IntToLong => ops::int_to_long(a),
		IntToFloat => ops::int_to_float(a),
		IntToDouble => ops::int_to_double(a),
		LongToInt => ops::long_to_int(a),
		LongToFloat => ops::long_to_float(a),
		LongToDouble => ops::long_to_double(a),
		FloatToInt => ops::float_to_int(a),
		FloatToLong => ops::float_to_long(a),
		FloatToDouble => ops::float_to_double(a),
		DoubleToInt => ops::double_to_int(a),
		DoubleToLong => ops::double_to_long(a),
		DoubleToFloat => ops::double_to_float(a),
		IntToByte => ops::int_to_byte(a),
		IntToChar => ops::int_to_char(a),
		IntToShort => ops::int_to_short(a),
		_ => RegisterValue::Unknown,
	}
}

fn is_binary(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		AddInt | SubInt | MulInt | DivInt | RemInt | AndInt | OrInt | XorInt | ShlInt | ShrInt | UshrInt
			| AddLong | SubLong | MulLong | DivLong | RemLong | AndLong | OrLong | XorLong | ShlLong | ShrLong | UshrLong
			| AddFloat | SubFloat | MulFloat | DivFloat | RemFloat
			| AddDouble | SubDouble | MulDouble | DivDouble | RemDouble
	)
}

fn is_binary_2addr(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		AddInt2addr
			| SubInt2addr | MulInt2addr
			| DivInt2addr | RemInt2addr
			| AndInt2addr | OrInt2addr
			| XorInt2addr | ShlInt2addr
			| ShrInt2addr | UshrInt2addr
			| AddLong2addr | SubLong2addr
			| MulLong2addr | DivLong2addr
			| RemLong2addr | AndLong2addr
			| OrLong2addr | XorLong2addr
			| ShlLong2addr | ShrLong2addr
			| UshrLong2addr | AddFloat2addr
			| SubFloat2addr | MulFloat2addr
			| DivFloat2addr | RemFloat2addr
			| AddDouble2addr | SubDouble2addr
			| MulDouble2addr | DivDouble2addr
			| RemDouble2addr
	)
}

fn unaddr(op: Opcode) -> Opcode {
	use Opcode::*;
	match op {
		AddInt2addr => AddInt,
		SubInt2addr => SubInt,
		MulInt2addr => MulInt,
		DivInt2addr => DivInt,
		RemInt2addr => RemInt,
		AndInt2addr => AndInt,
		OrInt2addr => OrInt,
		XorInt2addr => XorInt,
		ShlInt2addr => ShlInt,
		ShrInt2addr => ShrInt,
		UshrInt2addr => UshrInt,
		AddLong2addr => AddLong,
		SubLong2addr => SubLong,
		MulLong2addr => MulLong,
		DivLong2addr => DivLong,
		RemLong2addr => RemLong,
		AndLong2addr => AndLong,
		OrLong2addr => OrLong,
		XorLong2addr => XorLong,
		ShlLong2addr => ShlLong,
		ShrLong2addr => ShrLong,
		UshrLong2addr => UshrLong,
		AddFloat2addr => AddFloat,
		SubFloat2addr => SubFloat,
		MulFloat2addr => MulFloat,
		DivFloat2addr => DivFloat,
		RemFloat2addr => RemFloat,
		AddDouble2addr => AddDouble,
		SubDouble2addr => SubDouble,
		MulDouble2addr => MulDouble,
		DivDouble2addr => DivDouble,
		RemDouble2addr => RemDouble,
		other => other,
	}
}

fn is_binary_lit(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		AddIntLit16 | RsubInt
			| MulIntLit16 | DivIntLit16
			| RemIntLit16 | AndIntLit16
			| OrIntLit16 | XorIntLit16
			| AddIntLit8 | RsubIntLit8
			| MulIntLit8 | DivIntLit8
			| RemIntLit8 | AndIntLit8
			| OrIntLit8 | XorIntLit8
			| ShlIntLit8 | ShrIntLit8
			| UshrIntLit8
	)
}

fn unlit(op: Opcode) -> Opcode {
	use Opcode::*;
	match op {
		AddIntLit16 | AddIntLit8 => AddInt,
		RsubInt | RsubIntLit8 => SubInt,
		MulIntLit16 | MulIntLit8 => MulInt,
		DivIntLit16 | DivIntLit8 => DivInt,
		RemIntLit16 | RemIntLit8 => RemInt,
		AndIntLit16 | AndIntLit8 => AndInt,
		OrIntLit16 | OrIntLit8 => OrInt,
		XorIntLit16 | XorIntLit8 => XorInt,
		ShlIntLit8 => ShlInt,
		ShrIntLit8 => ShrInt,
		UshrIntLit8 => UshrInt,
		other => other,
	}
}

fn is_wide_binary(op: Opcode) -> bool {
	use Opcode::*;
	matches!(
		op,
		AddLong | SubLong | MulLong | DivLong | RemLong | AndLong | OrLong | XorLong | ShlLong | ShrLong | UshrLong
	)
}

/// Most binary ops are infallible (an unresolved operand just yields
/// `Unknown`); `div`/`rem` raise a catchable `VmError::DivisionByZero`
/// instead, so they're threaded through as early returns here.
fn binary(op: Opcode, a: &RegisterValue, b: &RegisterValue) -> VmResult<RegisterValue> {
	use Opcode::*;
	Ok(match op {
		AddInt => ops::add_int(a, b),
		SubInt => ops::sub_int(a, b),
		MulInt => ops::mul_int(a, b),
		DivInt => return ops::div_int(a, b),
		RemInt => return ops::rem_int(a, b),
		AndInt => ops::and_int(a, b),
		OrInt => ops::or_int(a, b),
		XorInt => ops::xor_int(a, b),
		ShlInt => ops::shl_int(a, b),
		ShrInt => ops::shr_int(a, b),
		UshrInt => ops::ushr_int(a, b),
		AddLong => ops::add_long(a, b),
		SubLong => ops::sub_long(a, b),
		MulLong => ops::mul_long(a, b),
		DivLong => return ops::div_long(a, b),
		RemLong => return ops::rem_long(a, b),
		AndLong => ops::and_long(a, b),
		OrLong => ops::or_long(a, b),
		XorLong => ops::xor_long(a, b),
		ShlLong => ops::shl_long(a, b),
		ShrLong => ops::shr_long(a, b),
		UshrLong => ops::ushr_long(a, b),
		AddFloat => ops::add_float(a, b),
		SubFloat => ops::sub_float(a, b),
		MulFloat => ops::mul_float(a, b),
		DivFloat => ops::div_float(a, b),
		RemFloat => ops::rem_float(a, b),
		AddDouble => ops::add_double(a, b),
		SubDouble => ops::sub_double(a, b),
		MulDouble => ops::mul_double(a, b),
		DivDouble => ops::div_double(a, b),
		RemDouble => ops::rem_double(a, b),
		_ => RegisterValue::Unknown,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::smali::parser::MethodParser;
	use crate::smali::reader::Reader;

	fn run_method(src: &str) -> RegisterValue {
		let mut reader = Reader::new(src);
		let method = MethodParser::parse(&mut reader, "LTest;", false).unwrap();
		let config = VmConfig::default();
		let mut invoker = NullInvoker;
		let mut runner = InstructionsRunner::new(&method.items, &config, &mut invoker);
		let mut registers = RegistersContext::new();
		registers.declare(method.registers_count, false);
		runner.run(registers).unwrap()
	}

	#[test]
	fn adds_two_constants() {
		let value = run_method(
			".method public static add()I\n.registers 2\nconst/4 v0, 0x2\nconst/4 v1, 0x3\nadd-int/2addr v0, v1\nreturn v0\n.end method\n",
		);
		assert_eq!(value.as_int().unwrap(), 5);
	}

	#[test]
	fn self_looping_goto_terminates_instead_of_spinning() {
		let value = run_method(".method public static spin()V\n.registers 0\n:l\ngoto :l\n.end method\n");
		assert!(value.is_unknown());
	}

	#[test]
	fn conditional_branch_is_deterministic_when_concrete() {
		let value = run_method(
			".method public static pick()I\n.registers 2\nconst/4 v0, 0x1\nif-eqz v0, :else\nconst/4 v1, 0x1\nreturn v1\n:else\nconst/4 v1, 0x2\nreturn v1\n.end method\n",
		);
		assert_eq!(value.as_int().unwrap(), 1);
	}

	#[test]
	fn string_concat_via_string_builder_stub() {
		let value = run_method(
			concat!(
				".method public static build()Ljava/lang/String;\n",
				".registers 2\n",
				"new-instance v0, Ljava/lang/StringBuilder;\n",
				"invoke-direct {v0}, Ljava/lang/StringBuilder;-><init>()V\n",
				"const-string v1, \"hi\"\n",
				"invoke-virtual {v0, v1}, Ljava/lang/StringBuilder;->append(Ljava/lang/String;)Ljava/lang/StringBuilder;\n",
				"move-result-object v0\n",
				"invoke-virtual {v0}, Ljava/lang/StringBuilder;->toString()Ljava/lang/String;\n",
				"move-result-object v0\n",
				"return-object v0\n",
				".end method\n"
			),
		);
		assert_eq!(value.as_string().unwrap(), "hi");
	}

	#[test]
	fn fan_out_merges_return_values_when_undecidable() {
		let src = ".method public static pick()I\n.registers 2\nif-eqz v0, :else\nconst/4 v1, 0x1\nreturn v1\n:else\nconst/4 v1, 0x2\nreturn v1\n.end method\n";
		let mut reader = Reader::new(src);
		let method = MethodParser::parse(&mut reader, "LTest;", false).unwrap();
		let config = VmConfig::default();
		let mut invoker = NullInvoker;
		let mut runner = InstructionsRunner::new(&method.items, &config, &mut invoker);
		let mut registers = RegistersContext::new();
		registers.declare(method.registers_count, false);
		registers.set_register("v0", RegisterValue::Unknown, false).unwrap();
		let value = runner.run(registers).unwrap();
		let ambiguous = value.as_ambiguous().expect("undecidable branch should merge to Ambiguous");
		let mut ints: Vec<i64> = ambiguous.values().iter().map(|v| v.as_int().unwrap() as i64).collect();
		ints.sort();
		assert_eq!(ints, vec![1, 2]);
	}
}
