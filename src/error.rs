use thiserror::Error;

/// One variant per row of the error taxonomy: structural failures are fatal
/// for a single class, unsupported opcodes are fatal for a single method,
/// register/value/arithmetic failures are catchable from inside an active
/// try/catch region, and class/method resolution failures are non-fatal.
/// `method_runner::MethodRunner::invoke` resolves those to `Unknown` itself
/// rather than ever letting them propagate.
#[derive(Error, Debug)]
pub enum VmError {
	#[error("structural parse error in {class}: {message}")]
	StructuralParseError { class: String, message: String },

	#[error("unsupported opcode: {mnemonic}")]
	UnsupportedOpcode { mnemonic: String },

	#[error("register {name} not found")]
	RegisterNotFound { name: String },

	#[error("register {name} not initialized")]
	RegisterNotInitialized { name: String },

	#[error("register value is not of type {expected}")]
	InvalidValueType { expected: &'static str },

	#[error("division by zero")]
	DivisionByZero,

	#[error("class {class} not found")]
	ClassNotFound { class: String },

	#[error("method {class}->{signature} not found")]
	MethodNotFound { class: String, signature: String },

	#[error("method {class}->{signature} is abstract or native")]
	AbstractOrNativeMethod { class: String, signature: String },
}

pub type VmResult<T> = Result<T, VmError>;

/// Errors that propagate out of a method run without being caught by a
/// try/catch region abort the whole method. `RegisterNotFound`,
/// `RegisterNotInitialized`, `InvalidValueType` and `DivisionByZero` are the
/// only variants the interpreter redirects to an in-scope `.catch`/
/// `.catchall`; every other variant always propagates, and the class/method
/// resolution variants never reach this check at all since they're
/// resolved to `Unknown` one layer up, in `invoke`.
impl VmError {
	pub fn is_catchable(&self) -> bool {
		matches!(
			self,
			VmError::RegisterNotFound { .. }
				| VmError::RegisterNotInitialized { .. }
				| VmError::InvalidValueType { .. }
				| VmError::DivisionByZero
		)
	}
}
