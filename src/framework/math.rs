//! `java.lang.Math` stub. Grounded on
//! `smalivm/framework/java/lang/Math.py`, which has exactly one method:
//! `random()`, returning a hex-float literal of `random.random()`.
//!
//! Open question resolution: a real run of `Math.random()` is
//! non-deterministic, so treating it as a concrete value would make two
//! runs of the same method disagree. This stub always resolves it to
//! `Unknown` rather than fabricating a number or threading a seeded RNG
//! through the interpreter.

use crate::error::VmResult;
use crate::value::RegisterValue;

pub fn dispatch(method_name: &str, _args: &[RegisterValue]) -> VmResult<Option<RegisterValue>> {
	match method_name {
		"random" => Ok(Some(RegisterValue::Unknown)),
		_ => Ok(Some(RegisterValue::Unknown)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn random_is_always_unknown() {
		let result = dispatch("random", &[]).unwrap().unwrap();
		assert!(result.is_unknown());
	}
}
