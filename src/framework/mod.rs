//! Framework class stubs: a small set of JDK classes (`java.lang.String`,
//! `java.lang.StringBuilder`, `java.lang.Math`) the interpreter understands
//! well enough to evaluate calls into them symbolically instead of treating
//! every invocation as opaque. Grounded on
//! `smalivm/framework/base_framework_class.py` and the per-class stubs
//! under `smalivm/framework/java/lang/`.
//!
//! The reference dispatches by mangling `<init>`/`<clinit>` to `_init_`/
//! `_clinit_` and reflecting on a Python method table (`getattr`); Rust has
//! no equivalent dynamic lookup, so `dispatch` below is a plain match over
//! `(class_descriptor, method_name)` pairs instead, same shape, static
//! dispatch.

pub mod math;
pub mod string;
pub mod string_builder;

use crate::error::VmResult;
use crate::value::RegisterValue;

/// The data an object reference carries beyond "an instance of some
/// class": framework stub instances hold their own interpretable state,
/// plain objects carry only their class name for `instance-of`/type
/// bookkeeping.
#[derive(Debug, Clone)]
pub enum ObjectValue {
	Instance { class_name: String },
	String(String),
	StringBuilder(String),
}

impl ObjectValue {
	pub fn class_name(&self) -> &str {
		match self {
			ObjectValue::Instance { class_name } => class_name,
			ObjectValue::String(_) => "Ljava/lang/String;",
			ObjectValue::StringBuilder(_) => "Ljava/lang/StringBuilder;",
		}
	}
}

/// The three classes this engine carries a framework stub for.
pub fn is_framework_class(class_descriptor: &str) -> bool {
	matches!(
		class_descriptor,
		"Ljava/lang/String;" | "Ljava/lang/StringBuilder;" | "Ljava/lang/Math;"
	)
}

/// Dispatches an `invoke-*` targeting a framework stub class. `receiver` is
/// `None` for a static call (`Math.random()`) and for `<init>` (the
/// instance doesn't exist yet; the constructor stub builds it).
///
/// Returns `None` when `class_descriptor` isn't a stub this engine
/// understands, so the caller can fall back to ordinary (non-framework)
/// invoke handling. A recognized call that can't be evaluated from its
/// arguments (e.g. appending an `Unknown` value) resolves to
/// `Ok(Some(RegisterValue::Unknown))`, matching the reference's
/// `UnknownValue()` fallback, rather than an error.
pub fn dispatch(
	class_descriptor: &str,
	method_name: &str,
	receiver: Option<&RegisterValue>,
	args: &[RegisterValue],
) -> Option<VmResult<Option<RegisterValue>>> {
	let method_name = mangle(method_name);
	let method_name = method_name.as_str();
	match class_descriptor {
		"Ljava/lang/String;" => Some(string::dispatch(method_name, receiver, args)),
		"Ljava/lang/StringBuilder;" => Some(string_builder::dispatch(method_name, receiver, args)),
		"Ljava/lang/Math;" => Some(math::dispatch(method_name, args)),
		_ => None,
	}
}

/// `<init>`/`<clinit>` aren't valid Rust match-string identifiers to speak
/// of conceptually; the reference mangles them the same way before its
/// `getattr` lookup, so stub modules match on `_init_`/`_clinit_`.
fn mangle(method_name: &str) -> String {
	method_name.replace('<', "_").replace('>', "_")
}
