//! `Register`: a single named slot (`v0`, `p1`, ...). Wide (`J`/`D`) values
//! occupy a register pair; `pair` tracks the partner register's name so
//! `RegistersContext::set_register` can break a stale pairing when either
//! half is reassigned as a narrow value.

use crate::error::{VmError, VmResult};

use super::register_value::RegisterValue;

#[derive(Debug, Clone)]
pub struct Register {
	pub name: String,
	pub value: Option<RegisterValue>,
	pub pair: Option<String>,
}

impl Register {
	pub fn new(name: impl Into<String>) -> Self {
		Register { name: name.into(), value: None, pair: None }
	}

	/// True only once the register has been assigned a value at all; an
	/// `Unknown` or `Ambiguous` value still counts, since those are
	/// deliberate interpreter results, not the absence of one.
	pub fn has_value(&self) -> bool {
		self.value.is_some()
	}

	pub fn reset(&mut self) {
		self.value = None;
		self.pair = None;
	}
}

/// Splits a register name into its `v`/`p` prefix and numeric index.
pub fn parse_register_name(name: &str) -> VmResult<(char, u32)> {
	let mut chars = name.chars();
	let prefix = chars.next().ok_or_else(|| VmError::RegisterNotFound { name: name.to_string() })?;
	if prefix != 'v' && prefix != 'p' {
		return Err(VmError::RegisterNotFound { name: name.to_string() });
	}
	let rest: String = chars.collect();
	let index: u32 = rest.parse().map_err(|_| VmError::RegisterNotFound { name: name.to_string() })?;
	Ok((prefix, index))
}

/// The register name one slot above `name`, holding the high word of a
/// wide value stored starting at `name`.
pub fn next_register_name(name: &str) -> VmResult<String> {
	let (prefix, index) = parse_register_name(name)?;
	Ok(format!("{}{}", prefix, index + 1))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_local_and_parameter_names() {
		assert_eq!(parse_register_name("v3").unwrap(), ('v', 3));
		assert_eq!(parse_register_name("p0").unwrap(), ('p', 0));
	}

	#[test]
	fn rejects_malformed_names() {
		assert!(parse_register_name("x1").is_err());
		assert!(parse_register_name("v").is_err());
	}

	#[test]
	fn computes_pair_partner_name() {
		assert_eq!(next_register_name("v2").unwrap(), "v3");
		assert_eq!(next_register_name("p1").unwrap(), "p2");
	}
}
