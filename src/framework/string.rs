//! `java.lang.String` stub. Grounded on
//! `smalivm/framework/java/lang/String.py`: a tiny subset of the real
//! class's surface: construction from a `RegisterValue`, and
//! `String.format`. Anything else (charset-aware `getBytes`, locale
//! formatting) collapses to `Unknown`, matching the reference's own
//! `UnknownValue()` fallback for inputs it can't evaluate.

use crate::error::VmResult;
use crate::framework::ObjectValue;
use crate::value::RegisterValue;

pub fn dispatch(
	method_name: &str,
	_receiver: Option<&RegisterValue>,
	args: &[RegisterValue],
) -> VmResult<Option<RegisterValue>> {
	match method_name {
		"_init_" => Ok(Some(init(args))),
		"format" => Ok(Some(format(args))),
		_ => Ok(Some(RegisterValue::Unknown)),
	}
}

fn init(args: &[RegisterValue]) -> RegisterValue {
	match args.first() {
		None => RegisterValue::Unknown,
		Some(value) => match value.as_string() {
			Ok(data) => string_value(data.to_string()),
			Err(_) => RegisterValue::Unknown,
		},
	}
}

pub fn string_value(data: String) -> RegisterValue {
	RegisterValue::Object(ObjectValue::String(data))
}

fn format(args: &[RegisterValue]) -> RegisterValue {
	let format_string = match args.first() {
		Some(value) if !value.is_null() && !value.is_unknown() => match value.as_string() {
			Ok(s) => s.to_string(),
			Err(_) => return RegisterValue::Unknown,
		},
		_ => return RegisterValue::Unknown,
	};

	let mut rendered = String::new();
	let mut rest_args = args[1..].iter();
	let mut chars = format_string.chars().peekable();
	while let Some(c) = chars.next() {
		if c != '%' {
			rendered.push(c);
			continue;
		}
		// Skip over conversion flags/width/precision digits (`%05d`,
		// `%.2f`) down to the terminal conversion character; this engine
		// only needs the substituted value, not Java's exact padding rules.
		let mut spec = String::new();
		let mut conversion = None;
		while let Some(&next) = chars.peek() {
			spec.push(next);
			chars.next();
			if next.is_ascii_alphabetic() {
				conversion = Some(next);
				break;
			}
		}
		let conversion = match conversion {
			Some(c) => c,
			None => return RegisterValue::Unknown,
		};
		if conversion == '%' {
			rendered.push('%');
			continue;
		}
		let arg = match rest_args.next() {
			Some(a) => a,
			None => return RegisterValue::Unknown,
		};
		match render_arg(conversion, arg) {
			Some(text) => rendered.push_str(&text),
			None => return RegisterValue::Unknown,
		}
	}
	string_value(rendered)
}

fn render_arg(conversion: char, value: &RegisterValue) -> Option<String> {
	if value.is_unknown() {
		return None;
	}
	match conversion {
		's' | 'S' => {
			if let Ok(s) = value.as_string() {
				Some(s.to_string())
			} else if let Ok(i) = value.as_int() {
				Some(i.to_string())
			} else {
				None
			}
		}
		'd' => value.as_long().ok().map(|v| v.to_string()),
		'f' => value.as_double().ok().map(|v| format!("{:.6}", v)),
		'b' => value.as_boolean().ok().map(|v| v.to_string()),
		'x' => value.as_long().ok().map(|v| format!("{:x}", v)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn init_builds_string_from_concrete_argument() {
		let arg = string_value("hi".to_string());
		let result = init(std::slice::from_ref(&arg));
		assert_eq!(result.as_string().unwrap(), "hi");
	}

	#[test]
	fn init_with_no_args_is_unknown() {
		assert!(init(&[]).is_unknown());
	}

	#[test]
	fn format_substitutes_string_and_int() {
		let args = vec![
			string_value("%s is %d".to_string()),
			string_value("answer".to_string()),
			RegisterValue::concrete("0x2a", "I"),
		];
		let result = format(&args);
		assert_eq!(result.as_string().unwrap(), "answer is 42");
	}

	#[test]
	fn format_with_unknown_argument_is_unknown() {
		let args = vec![string_value("%d".to_string()), RegisterValue::Unknown];
		assert!(format(&args).is_unknown());
	}
}
