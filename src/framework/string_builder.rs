//! `java.lang.StringBuilder` stub. Grounded on
//! `smalivm/framework/java/lang/StringBuilder.py`: `_init_`/`append`/
//! `toString` are the only members the reference implements, so those are
//! the only three this stub answers.

use crate::error::VmResult;
use crate::framework::ObjectValue;
use crate::value::RegisterValue;

pub fn dispatch(
	method_name: &str,
	receiver: Option<&RegisterValue>,
	args: &[RegisterValue],
) -> VmResult<Option<RegisterValue>> {
	match method_name {
		"_init_" => Ok(Some(init(args))),
		"append" => Ok(Some(append(receiver, args))),
		"toString" => Ok(Some(to_string(receiver))),
		_ => Ok(Some(RegisterValue::Unknown)),
	}
}

fn builder_value(data: String) -> RegisterValue {
	RegisterValue::Object(ObjectValue::StringBuilder(data))
}

fn init(args: &[RegisterValue]) -> RegisterValue {
	let data = match args.first() {
		Some(value) => value.as_string().map(|s| s.to_string()).unwrap_or_default(),
		None => String::new(),
	};
	builder_value(data)
}

fn current_data(receiver: Option<&RegisterValue>) -> Option<String> {
	match receiver {
		Some(RegisterValue::Object(ObjectValue::StringBuilder(data))) => Some(data.clone()),
		_ => None,
	}
}

fn append(receiver: Option<&RegisterValue>, args: &[RegisterValue]) -> RegisterValue {
	let mut data = match current_data(receiver) {
		Some(d) => d,
		None => return RegisterValue::Unknown,
	};
	let value = match args.first() {
		Some(v) => v,
		None => return RegisterValue::Unknown,
	};
	if value.is_unknown() {
		return RegisterValue::Unknown;
	}
	if let Ok(s) = value.as_string() {
		data.push_str(s);
	} else if let Ok(i) = value.as_long() {
		data.push_str(&i.to_string());
	} else if let Ok(d) = value.as_double() {
		data.push_str(&d.to_string());
	} else if let Ok(b) = value.as_boolean() {
		data.push_str(&b.to_string());
	} else {
		return RegisterValue::Unknown;
	}
	builder_value(data)
}

fn to_string(receiver: Option<&RegisterValue>) -> RegisterValue {
	match current_data(receiver) {
		Some(data) => super::string::string_value(data),
		None => RegisterValue::Unknown,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn init_with_no_args_is_empty() {
		let v = init(&[]);
		assert_eq!(current_data(Some(&v)).unwrap(), "");
	}

	#[test]
	fn append_concatenates_and_returns_builder() {
		let builder = init(&[]);
		let appended = append(Some(&builder), &[super::super::string::string_value("hi".to_string())]);
		assert_eq!(current_data(Some(&appended)).unwrap(), "hi");
	}

	#[test]
	fn append_integer_stringifies_it() {
		let builder = builder_value("n=".to_string());
		let appended = append(Some(&builder), &[RegisterValue::concrete("0x5", "I")]);
		assert_eq!(current_data(Some(&appended)).unwrap(), "n=5");
	}

	#[test]
	fn to_string_wraps_in_string_stub() {
		let builder = builder_value("done".to_string());
		let result = to_string(Some(&builder));
		assert_eq!(result.as_string().unwrap(), "done");
	}

	#[test]
	fn append_unknown_value_is_unknown() {
		let builder = init(&[]);
		let appended = append(Some(&builder), &[RegisterValue::Unknown]);
		assert!(appended.is_unknown());
	}
}
