//! `.directive` lines. A method body is a sequence of labels, directives,
//! and instructions; `Directive::parse` is the dispatcher the structural
//! parser calls whenever a line starts with `.`. Debug-only directives
//! (`.prologue`, `.line`, `.local`, `.end local`, `.restart local`,
//! `.param`) carry no semantic weight for this engine and are consumed and
//! discarded; `parse` returns `Ok(None)` for them rather than a variant.

use std::collections::BTreeMap;

use super::labels::{LabelId, LabelsContext};
use super::reader::Reader;
use crate::error::{VmError, VmResult};

#[derive(Debug, Clone)]
pub struct CatchBlock {
	pub exception_type: String,
	pub start_label: LabelId,
	pub end_label: LabelId,
	pub catch_label: LabelId,
}

#[derive(Debug, Clone)]
pub enum Directive {
	Registers(u32),
	Locals(u32),
	Catch(CatchBlock),
	CatchAll(CatchBlock),
	ArrayData { values: Vec<String> },
	PackedSwitch { first_key: i64, labels: Vec<LabelId> },
	SparseSwitch { labels: BTreeMap<i64, LabelId> },
	Annotation(Annotation),
}

#[derive(Debug, Clone)]
pub enum AnnotationValue {
	Scalar(String),
	Array(Vec<String>),
	Nested(Box<Annotation>),
}

#[derive(Debug, Clone)]
pub struct Annotation {
	pub visibility: Option<String>,
	pub name: String,
	pub values: Vec<(String, AnnotationValue)>,
}

impl Directive {
	/// Parses the directive at the head of `reader`, or consumes and
	/// discards a debug-only directive and returns `None`. `reader` must be
	/// positioned on the `.xxx` line itself.
	pub fn parse(reader: &mut Reader, labels: &mut LabelsContext) -> VmResult<Option<Directive>> {
		let peeked = reader.peek().ok_or_else(|| parse_error("no directive to parse"))?;
		let mut parts = peeked.splitn(2, ' ');
		let mut name = parts.next().unwrap_or("").trim_start_matches('.').to_string();
		let rest_hint = parts.next().unwrap_or("");
		if name == "end" || name == "restart" {
			let second = rest_hint.split(' ').next().unwrap_or("");
			name = format!("{} {}", name, second);
		}

		match name.as_str() {
			"registers" => Ok(Some(Directive::Registers(parse_trailing_int(reader)?))),
			"locals" => Ok(Some(Directive::Locals(parse_trailing_int(reader)?))),
			"catch" => Ok(Some(Directive::Catch(parse_catch(reader, labels)?))),
			"catchall" => Ok(Some(Directive::CatchAll(parse_catch(reader, labels)?))),
			"array-data" => Ok(Some(Directive::ArrayData { values: parse_array_data(reader)? })),
			"packed-switch" => Ok(Some(parse_packed_switch(reader, labels)?)),
			"sparse-switch" => Ok(Some(parse_sparse_switch(reader, labels)?)),
			"annotation" => Ok(Some(Directive::Annotation(parse_annotation(reader, labels)?))),
			"prologue" | "line" | "local" | "end local" | "restart local" => {
				skip_single_line(reader);
				Ok(None)
			}
			"param" => {
				skip_param(reader, labels)?;
				Ok(None)
			}
			other => Err(VmError::StructuralParseError {
				class: String::new(),
				message: format!("invalid directive: .{}", other),
			}),
		}
	}
}

fn parse_error(message: &str) -> VmError {
	VmError::StructuralParseError { class: String::new(), message: message.to_string() }
}

fn parse_trailing_int(reader: &mut Reader) -> VmResult<u32> {
	let line = reader.next().ok_or_else(|| parse_error("missing directive line"))?;
	line.rsplit(' ')
		.next()
		.and_then(|s| s.parse().ok())
		.ok_or_else(|| parse_error(&format!("expected an integer count in {:?}", line)))
}

fn parse_catch(reader: &mut Reader, labels: &mut LabelsContext) -> VmResult<CatchBlock> {
	let line = reader.next().ok_or_else(|| parse_error("missing catch line"))?;
	let brace_open = line.find('{').ok_or_else(|| parse_error(&line))?;
	let brace_close = line.find('}').ok_or_else(|| parse_error(&line))?;
	let exception_type = line[..brace_open].trim().to_string();
	let range = &line[brace_open + 1..brace_close];
	let mut halves = range.split("..");
	let start = halves.next().ok_or_else(|| parse_error(&line))?.trim().trim_start_matches(':');
	let end = halves.next().ok_or_else(|| parse_error(&line))?.trim().trim_start_matches(':');
	let catch_label = line
		.rsplit(' ')
		.next()
		.ok_or_else(|| parse_error(&line))?
		.trim_start_matches(':');
	Ok(CatchBlock {
		exception_type,
		start_label: labels.get(start),
		end_label: labels.get(end),
		catch_label: labels.get(catch_label),
	})
}

fn parse_array_data(reader: &mut Reader) -> VmResult<Vec<String>> {
	reader.next();
	let mut values = Vec::new();
	let mut closed = false;
	for line in reader.by_ref() {
		if line == ".end array-data" {
			closed = true;
			break;
		}
		values.push(line);
	}
	if !closed {
		return Err(parse_error("array-data missing .end array-data"));
	}
	Ok(values)
}

fn parse_packed_switch(reader: &mut Reader, labels: &mut LabelsContext) -> VmResult<Directive> {
	let header = reader.next().ok_or_else(|| parse_error("missing packed-switch header"))?;
	let key_text = header.rsplit(' ').next().ok_or_else(|| parse_error(&header))?;
	let key_text = key_text.trim_start_matches("0x");
	let mut first_key =
		i64::from_str_radix(key_text, 16).map_err(|_| parse_error(&header))?;
	let mut entries = Vec::new();
	let mut closed = false;
	for line in reader.by_ref() {
		if line == ".end packed-switch" {
			closed = true;
			break;
		}
		let label_name = line.trim_start_matches(':');
		entries.push(labels.get(label_name));
	}
	if !closed {
		return Err(parse_error("packed-switch missing .end packed-switch"));
	}
	if entries.is_empty() {
		first_key = 0;
	}
	Ok(Directive::PackedSwitch { first_key, labels: entries })
}

fn parse_sparse_switch(reader: &mut Reader, labels: &mut LabelsContext) -> VmResult<Directive> {
	reader.next();
	let mut entries = BTreeMap::new();
	let mut closed = false;
	for line in reader.by_ref() {
		if line == ".end sparse-switch" {
			closed = true;
			break;
		}
		let (key_text, label_text) =
			line.split_once("->").ok_or_else(|| parse_error(&line))?;
		let key_text = key_text.trim().trim_start_matches("0x");
		let key = i64::from_str_radix(key_text, 16).map_err(|_| parse_error(&line))?;
		entries.insert(key, labels.get(label_text.trim().trim_start_matches(':')));
	}
	if !closed {
		return Err(parse_error("sparse-switch missing .end sparse-switch"));
	}
	Ok(Directive::SparseSwitch { labels: entries })
}

fn parse_annotation(reader: &mut Reader, labels: &mut LabelsContext) -> VmResult<Annotation> {
	let header = reader.next().ok_or_else(|| parse_error("missing annotation header"))?;
	let parts: Vec<&str> = header.split(' ').collect();
	let (visibility, name) = if header.starts_with(".annotation ") {
		(Some(parts.get(1).copied().unwrap_or("").to_string()), parts.get(2).copied().unwrap_or("").to_string())
	} else if header.starts_with(".subannotation ") {
		(None, parts.get(1).copied().unwrap_or("").to_string())
	} else {
		return Err(parse_error(&header));
	};

	let mut values = Vec::new();
	loop {
		let line = reader.next().ok_or_else(|| parse_error("unterminated annotation"))?;
		if line == ".end annotation" || line == ".end subannotation" || line == ".end subannotation," {
			break;
		}
		let (var_name, value_text) =
			line.split_once('=').ok_or_else(|| parse_error(&line))?;
		let var_name = var_name.trim().to_string();
		let value_text = value_text.trim();

		if value_text.starts_with(".subannotation ") {
			reader.prepend(vec![value_text.to_string()]);
			let nested = parse_annotation(reader, labels)?;
			values.push((var_name, AnnotationValue::Nested(Box::new(nested))));
		} else if value_text == "{}" {
			values.push((var_name, AnnotationValue::Array(Vec::new())));
		} else if value_text == "{" {
			let mut items = Vec::new();
			loop {
				let item = reader.next().ok_or_else(|| parse_error("unterminated annotation array"))?;
				let item = item.trim();
				if item.starts_with(".subannotation ") {
					reader.prepend(vec![item.to_string()]);
					let nested = parse_annotation(reader, labels)?;
					values.push((var_name.clone(), AnnotationValue::Nested(Box::new(nested))));
					continue;
				}
				if item == "}" {
					break;
				}
				let item = item.strip_suffix(',').unwrap_or(item);
				items.push(item.to_string());
			}
			values.push((var_name, AnnotationValue::Array(items)));
		} else {
			values.push((var_name, AnnotationValue::Scalar(value_text.to_string())));
		}
	}

	Ok(Annotation { visibility, name, values })
}

fn skip_single_line(reader: &mut Reader) {
	reader.next();
}

/// `.param` bodies may contain an inline `.annotation ... .end annotation`
/// block, or may be closed immediately by `.end param`; either way the
/// whole thing is discarded, matching the reference's debug-info handling.
fn skip_param(reader: &mut Reader, labels: &mut LabelsContext) -> VmResult<()> {
	reader.next();
	loop {
		let line = match reader.peek() {
			Some(line) => line,
			None => return Ok(()),
		};
		if line == ".end param" {
			reader.next();
			return Ok(());
		}
		if line.starts_with(".annotation ") {
			parse_annotation(reader, labels)?;
			continue;
		}
		reader.next();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(src: &str) -> Directive {
		let mut reader = Reader::new(src);
		let mut labels = LabelsContext::new();
		Directive::parse(&mut reader, &mut labels).unwrap().unwrap()
	}

	#[test]
	fn parses_registers_and_locals() {
		assert!(matches!(parse(".registers 4"), Directive::Registers(4)));
		assert!(matches!(parse(".locals 2"), Directive::Locals(2)));
	}

	#[test]
	fn parses_catch() {
		let directive = parse(".catch Ljava/lang/Exception; {:try_start_0 .. :try_end_0} :catch_0");
		match directive {
			Directive::Catch(block) => {
				assert_eq!(block.exception_type, "Ljava/lang/Exception;");
				assert_eq!(block.start_label.to_string(), ":try_start_0");
				assert_eq!(block.catch_label.to_string(), ":catch_0");
			}
			other => panic!("unexpected: {:?}", other),
		}
	}

	#[test]
	fn parses_array_data() {
		let directive = parse(".array-data 4\n0x1\n0x2\n.end array-data\n");
		match directive {
			Directive::ArrayData { values } => assert_eq!(values, vec!["0x1", "0x2"]),
			other => panic!("unexpected: {:?}", other),
		}
	}

	#[test]
	fn parses_packed_switch() {
		let directive = parse(".packed-switch 0x0\n:case_0\n:case_1\n.end packed-switch\n");
		match directive {
			Directive::PackedSwitch { first_key, labels } => {
				assert_eq!(first_key, 0);
				assert_eq!(labels.len(), 2);
			}
			other => panic!("unexpected: {:?}", other),
		}
	}

	#[test]
	fn parses_sparse_switch() {
		let directive = parse(".sparse-switch\n0x1 -> :case_a\n0x5 -> :case_b\n.end sparse-switch\n");
		match directive {
			Directive::SparseSwitch { labels } => {
				assert_eq!(labels.len(), 2);
				assert!(labels.contains_key(&1));
				assert!(labels.contains_key(&5));
			}
			other => panic!("unexpected: {:?}", other),
		}
	}

	#[test]
	fn skips_debug_directives() {
		let mut reader = Reader::new(".prologue\n.locals 1\n");
		let mut labels = LabelsContext::new();
		let result = Directive::parse(&mut reader, &mut labels).unwrap();
		assert!(result.is_none());
		let next = Directive::parse(&mut reader, &mut labels).unwrap();
		assert!(matches!(next, Some(Directive::Locals(1))));
	}

	#[test]
	fn skips_param_with_nested_annotation() {
		let mut reader = Reader::new(
			".param p1, \"x\"\n.annotation build Lfoo;\nvalue = \"a\"\n.end annotation\n.end param\n.locals 1\n",
		);
		let mut labels = LabelsContext::new();
		let result = Directive::parse(&mut reader, &mut labels).unwrap();
		assert!(result.is_none());
		let next = Directive::parse(&mut reader, &mut labels).unwrap();
		assert!(matches!(next, Some(Directive::Locals(1))));
	}
}
