//! `RegisterValue`: the tagged union tracked per register. A *concrete*
//! value is the raw smali literal text (`"0x5"`, `"0x3f800000"`,
//! `"-1L"`) plus its Dalvik type descriptor, decoded lazily by the
//! `as_*` accessors, mirroring the reference's `RegisterValue.get_int`/
//! `get_float`/`get_double`, which reinterpret the same literal text under
//! different numeric views rather than storing a pre-decoded number.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{VmError, VmResult};
use crate::framework::ObjectValue;

use super::array::Array;

pub const INT_MAX_VALUE: i64 = 0x7fff_ffff;
pub const INT_MIN_VALUE: i64 = -0x8000_0000;

#[derive(Debug, Clone)]
pub enum RegisterValue {
	/// A literal value: the smali-literal text plus its Dalvik type
	/// descriptor (`I`, `J`, `F`, `D`, `Z`, `B`, `C`, `S`).
	Concrete { literal: String, value_type: String },
	/// Value could not be determined statically.
	Unknown,
	/// A finite set of candidate values, collapsed to `Unknown` once it
	/// would exceed the configured cap.
	Ambiguous(super::ambiguous::AmbiguousValue),
	/// A fixed-size array, indexes materialized lazily.
	Array(Rc<RefCell<Array>>),
	/// An object reference: either an opaque instance of a class this
	/// engine doesn't interpret, or an initialized framework stub
	/// (`java.lang.String`, `java.lang.StringBuilder`).
	Object(ObjectValue),
}

impl RegisterValue {
	pub fn concrete(literal: impl Into<String>, value_type: impl Into<String>) -> Self {
		RegisterValue::Concrete { literal: literal.into(), value_type: value_type.into() }
	}

	pub fn is_unknown(&self) -> bool {
		matches!(self, RegisterValue::Unknown)
	}

	pub fn is_ambiguous(&self) -> bool {
		matches!(self, RegisterValue::Ambiguous(_))
	}

	pub fn is_array(&self) -> bool {
		matches!(self, RegisterValue::Array(_))
	}

	pub fn is_object(&self) -> bool {
		matches!(self, RegisterValue::Object(_))
	}

	/// A register holds a null reference when its concrete literal is the
	/// canonical null constant emitted by `const/4 vX, 0x0` into a
	/// reference-typed register.
	pub fn is_null(&self) -> bool {
		matches!(self, RegisterValue::Concrete { literal, .. } if literal == "0x0")
	}

	pub fn as_int(&self) -> VmResult<i32> {
		let text = self.literal_text("int")?;
		Ok(parse_hex_literal(text)? as i32)
	}

	pub fn as_long(&self) -> VmResult<i64> {
		let text = self.literal_text("long")?;
		parse_hex_literal(text)
	}

	pub fn as_float(&self) -> VmResult<f32> {
		let text = self.literal_text("float")?;
		if text == "nan" {
			return Ok(f32::NAN);
		}
		let text = text.strip_suffix('L').unwrap_or(text);
		if is_hex_float(text) {
			return parse_hex_float(text).map(|v| v as f32);
		}
		let bits = parse_hex_literal(text)? as u32;
		Ok(f32::from_bits(bits))
	}

	pub fn as_double(&self) -> VmResult<f64> {
		let text = self.literal_text("double")?;
		if text == "nan" {
			return Ok(f64::NAN);
		}
		let text = text.strip_suffix('L').unwrap_or(text);
		if is_hex_float(text) {
			return parse_hex_float(text);
		}
		let bits = parse_hex_literal(text)? as u64;
		Ok(f64::from_bits(bits))
	}

	pub fn as_boolean(&self) -> VmResult<bool> {
		match self.as_int()? {
			0 => Ok(false),
			1 => Ok(true),
			_ => Err(VmError::InvalidValueType { expected: "boolean" }),
		}
	}

	/// Returns the initialized `java.lang.String` backing data, if this
	/// value is a String framework stub instance.
	pub fn as_string(&self) -> VmResult<&str> {
		match self {
			RegisterValue::Object(ObjectValue::String(s)) => Ok(s.as_str()),
			_ => Err(VmError::InvalidValueType { expected: "string" }),
		}
	}

	pub fn as_array(&self) -> VmResult<&Rc<RefCell<Array>>> {
		match self {
			RegisterValue::Array(a) => Ok(a),
			_ => Err(VmError::InvalidValueType { expected: "array" }),
		}
	}

	pub fn as_ambiguous(&self) -> VmResult<&super::ambiguous::AmbiguousValue> {
		match self {
			RegisterValue::Ambiguous(a) => Ok(a),
			_ => Err(VmError::InvalidValueType { expected: "ambiguous" }),
		}
	}

	fn literal_text(&self, expected: &'static str) -> VmResult<&str> {
		match self {
			RegisterValue::Concrete { literal, .. } => Ok(literal.as_str()),
			_ => Err(VmError::InvalidValueType { expected }),
		}
	}
}

/// Parses a smali hex integer literal (`0x5`, `-0x1`, `0x7fffffffL`,
/// `0x1t`), stripping the optional long/type suffix baksmali appends.
fn parse_hex_literal(text: &str) -> VmResult<i64> {
	let trimmed = text.strip_suffix('L').or_else(|| text.strip_suffix('t')).unwrap_or(text);
	let (sign, digits) = match trimmed.strip_prefix('-') {
		Some(rest) => (-1i64, rest),
		None => (1i64, trimmed),
	};
	let digits = digits.strip_prefix("0x").unwrap_or(digits);
	let value = u64::from_str_radix(digits, 16)
		.map_err(|_| VmError::InvalidValueType { expected: "hex literal" })?;
	Ok(sign * value as i64)
}

/// Matches the reference's `^[+-]?0x[0-9a-fA-F]+\.[0-9a-fA-F]*p[+-]?\d+$`
/// hex-float detector (`const/high16`'s literal text, when emitted as a
/// C99 hex float rather than a raw bit pattern).
fn is_hex_float(text: &str) -> bool {
	let rest = text.strip_prefix('+').or_else(|| text.strip_prefix('-')).unwrap_or(text);
	let rest = match rest.strip_prefix("0x") {
		Some(r) => r,
		None => return false,
	};
	let dot = match rest.find('.') {
		Some(idx) => idx,
		None => return false,
	};
	let mantissa = &rest[..dot];
	if mantissa.is_empty() || !mantissa.chars().all(|c| c.is_ascii_hexdigit()) {
		return false;
	}
	let after_dot = &rest[dot + 1..];
	let p_idx = match after_dot.find('p') {
		Some(idx) => idx,
		None => return false,
	};
	let frac = &after_dot[..p_idx];
	if !frac.chars().all(|c| c.is_ascii_hexdigit()) {
		return false;
	}
	let exponent = &after_dot[p_idx + 1..];
	let exponent = exponent.strip_prefix('+').or_else(|| exponent.strip_prefix('-')).unwrap_or(exponent);
	!exponent.is_empty() && exponent.chars().all(|c| c.is_ascii_digit())
}

fn parse_hex_float(text: &str) -> VmResult<f64> {
	hexf_parse(text).ok_or(VmError::InvalidValueType { expected: "hex float literal" })
}

/// Minimal C99 hex-float parser (`0x1.fffffeP+127`) covering the literal
/// shapes baksmali emits; `f64::from_str` has no hex-float support.
fn hexf_parse(text: &str) -> Option<f64> {
	let (neg, rest) = match text.strip_prefix('-') {
		Some(r) => (true, r),
		None => (false, text.strip_prefix('+').unwrap_or(text)),
	};
	let rest = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X"))?;
	let p_idx = rest.to_ascii_lowercase().find('p')?;
	let (mantissa, exponent) = (&rest[..p_idx], &rest[p_idx + 1..]);
	let exponent: i32 = exponent.parse().ok()?;
	let (int_part, frac_part) = match mantissa.split_once('.') {
		Some((i, f)) => (i, f),
		None => (mantissa, ""),
	};
	let mut value = 0f64;
	for c in int_part.chars() {
		value = value * 16.0 + c.to_digit(16)? as f64;
	}
	let mut scale = 1f64 / 16.0;
	for c in frac_part.chars() {
		value += c.to_digit(16)? as f64 * scale;
		scale /= 16.0;
	}
	value *= 2f64.powi(exponent);
	Some(if neg { -value } else { value })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_int_literal() {
		let v = RegisterValue::concrete("0x5", "I");
		assert_eq!(v.as_int().unwrap(), 5);
	}

	#[test]
	fn decodes_negative_literal() {
		let v = RegisterValue::concrete("-0x1", "I");
		assert_eq!(v.as_int().unwrap(), -1);
	}

	#[test]
	fn decodes_wide_literal_with_l_suffix() {
		let v = RegisterValue::concrete("0x7fffffffffffffffL", "J");
		assert_eq!(v.as_long().unwrap(), i64::MAX);
	}

	#[test]
	fn decodes_float_from_raw_bits() {
		// 1.0f as IEEE-754 bits is 0x3f800000.
		let v = RegisterValue::concrete("0x3f800000", "F");
		assert_eq!(v.as_float().unwrap(), 1.0f32);
	}

	#[test]
	fn decodes_double_from_raw_bits() {
		// 1.0 as IEEE-754 bits is 0x3ff0000000000000.
		let v = RegisterValue::concrete("0x3ff0000000000000L", "D");
		assert_eq!(v.as_double().unwrap(), 1.0f64);
	}

	#[test]
	fn decodes_hex_float_literal() {
		let v = RegisterValue::concrete("0x1.0p0", "D");
		assert_eq!(v.as_double().unwrap(), 1.0f64);
	}

	#[test]
	fn decodes_nan_literal() {
		let v = RegisterValue::concrete("nan", "D");
		assert!(v.as_double().unwrap().is_nan());
	}

	#[test]
	fn null_reference_is_null() {
		let v = RegisterValue::concrete("0x0", "Ljava/lang/Object;");
		assert!(v.is_null());
	}

	#[test]
	fn unknown_accessor_fails() {
		let v = RegisterValue::Unknown;
		assert!(v.as_int().is_err());
	}
}
