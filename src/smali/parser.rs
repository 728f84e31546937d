//! Structural parsing: turns a `.smali` file's text into a `Class` with its
//! `Field`s and `Method`s. `LineParser` is the per-line dispatcher shared by
//! method-body parsing; `FieldParser`/`MethodParser`/`ClassParser` build the
//! member model on top of it.

use std::rc::Rc;

use super::directive::{Annotation, Directive};
use super::instruction::Instruction;
use super::labels::LabelsContext;
use super::members::{Class, Field, Method, MethodItem};
use super::reader::Reader;
use super::utils::parse_method_parameters;
use crate::error::{VmError, VmResult};

fn parse_error(class: &str, message: impl Into<String>) -> VmError {
	VmError::StructuralParseError { class: class.to_string(), message: message.into() }
}

/// Dispatches a single method-body line to a label, a directive, or an
/// instruction, based on its leading character.
pub struct LineParser;

impl LineParser {
	pub fn parse(
		reader: &mut Reader,
		labels: &mut LabelsContext,
	) -> VmResult<Option<MethodItem>> {
		let peeked = reader.peek().ok_or_else(|| parse_error("", "no data to parse"))?;
		if peeked.starts_with('.') {
			return Ok(Directive::parse(reader, labels)?.map(MethodItem::Directive));
		}
		if peeked.starts_with(':') {
			let label = labels.parse(&peeked);
			reader.next();
			return Ok(Some(MethodItem::Label(label)));
		}
		let instruction = Instruction::parse(reader, labels)?;
		Ok(Some(MethodItem::Instruction(instruction)))
	}
}

pub struct FieldParser;

impl FieldParser {
	/// Parses a `.field ...` block. `reader` must be positioned on the
	/// `.field` line itself; consumes through `.end field` when the field
	/// carries an inline annotation body.
	pub fn parse(reader: &mut Reader) -> VmResult<Field> {
		let line = reader.next().ok_or_else(|| parse_error("", "missing field line"))?;
		if !line.starts_with(".field ") {
			return Err(parse_error("", format!("invalid field line: {:?}", line)));
		}
		let parts: Vec<&str> = line.split(' ').collect();
		let mut flags = Vec::new();
		let mut signature_idx = 1;
		for (idx, part) in parts.iter().enumerate().skip(1) {
			if part.contains(':') {
				signature_idx = idx;
				break;
			}
			flags.push((*part).to_string());
		}
		let signature = parts[signature_idx];
		let (name, field_type) = signature
			.split_once(':')
			.ok_or_else(|| parse_error("", format!("invalid field signature: {:?}", signature)))?;
		// parts[signature_idx + 1] is the `=` token; the initial-value text
		// starts one slot after that.
		let mut initial_value = None;
		if parts.len() > signature_idx + 2 {
			let mut value = parts[signature_idx + 2..].join(" ");
			if field_type == "Ljava/lang/String;" && value.len() >= 2 {
				value = value[1..value.len() - 1].to_string();
			}
			initial_value = Some(value);
		}

		let mut annotations = Vec::new();
		loop {
			match reader.peek() {
				Some(next) if next.starts_with(".annotation") => {
					let annotation = parse_inline_annotation(reader)?;
					annotations.push(annotation);
				}
				Some(next) if next == ".end field" => {
					reader.next();
					break;
				}
				Some(_) | None => break,
			}
		}

		Ok(Field {
			name: name.to_string(),
			field_type: field_type.to_string(),
			flags,
			initial_value,
			annotations,
		})
	}
}

fn parse_inline_annotation(reader: &mut Reader) -> VmResult<Annotation> {
	let mut labels = LabelsContext::new();
	match Directive::parse(reader, &mut labels)? {
		Some(Directive::Annotation(annotation)) => Ok(annotation),
		_ => Err(parse_error("", "expected an annotation directive")),
	}
}

pub struct MethodParser;

impl MethodParser {
	/// Parses a `.method ... .end method` block. `reader` must be positioned
	/// on the `.method` line itself.
	pub fn parse(reader: &mut Reader, class_name: &str, is_virtual: bool) -> VmResult<Method> {
		let mut labels = LabelsContext::new();
		let mut name = String::new();
		let mut return_type = String::new();
		let mut parameter_types = Vec::new();
		let mut flags = Vec::new();
		let mut registers_count = 0u32;
		let mut items = Vec::new();

		loop {
			let peeked = match reader.peek() {
				Some(line) => line,
				None => return Err(parse_error(class_name, "unterminated method body")),
			};
			if peeked.starts_with(".method") {
				reader.next();
				let parts: Vec<&str> = peeked.split(' ').skip(1).collect();
				let signature = *parts.last().ok_or_else(|| parse_error(class_name, &peeked))?;
				let open = signature.find('(').ok_or_else(|| parse_error(class_name, signature))?;
				let close = signature.rfind(')').ok_or_else(|| parse_error(class_name, signature))?;
				name = signature[..open].to_string();
				return_type = signature[close + 1..].to_string();
				parameter_types = parse_method_parameters(&signature[open + 1..close]);
				flags = parts[..parts.len() - 1].iter().map(|s| s.to_string()).collect();
				continue;
			}
			if peeked == ".end method" {
				reader.next();
				break;
			}

			match LineParser::parse(reader, &mut labels)? {
				// `.registers N` already counts parameters and the instance
				// receiver; `.locals N` counts only locals, so parameter
				// slots are added on separately below.
				Some(MethodItem::Directive(Directive::Registers(count))) => {
					registers_count = count;
				}
				Some(MethodItem::Directive(Directive::Locals(count))) => {
					let is_static = flags.iter().any(|f| f == "static");
					let mut param_slots = 0u32;
					for param in &parameter_types {
						param_slots += super::utils::param_slot_count(param);
					}
					registers_count = count + param_slots + if is_static { 0 } else { 1 };
				}
				Some(item) => items.push(item),
				None => {}
			}
		}

		Ok(Method {
			name,
			parameter_types,
			return_type,
			flags,
			registers_count,
			items,
			is_virtual,
			is_direct: !is_virtual,
			class_name: class_name.to_string(),
		})
	}
}

pub struct ClassParser;

impl ClassParser {
	/// Parses an entire `.smali` file's source text into a `Class`.
	pub fn parse(source: &str) -> VmResult<Class> {
		let mut reader = Reader::new(source);
		let mut name = String::new();
		let mut flags = Vec::new();
		let mut super_name = None;
		let mut source_file = None;
		let mut implements = Vec::new();
		let mut annotations = Vec::new();
		let mut fields = Vec::new();
		let mut methods = Vec::new();
		let mut direct_section = false;
		let mut virtual_section = false;

		loop {
			let peeked = match reader.peek() {
				Some(line) => line,
				None => break,
			};

			if peeked.starts_with('#') {
				reader.next();
				match peeked.as_str() {
					"# direct methods" => direct_section = true,
					"# virtual methods" => virtual_section = true,
					other => return Err(parse_error(&name, format!("invalid comment: {}", other))),
				}
				continue;
			}
			if peeked.starts_with(".class ") {
				reader.next();
				let parts: Vec<&str> = peeked.split(' ').collect();
				name = parts.last().unwrap().to_string();
				flags = parts[1..parts.len() - 1].iter().map(|s| s.to_string()).collect();
				continue;
			}
			if peeked.starts_with(".super ") {
				reader.next();
				super_name = Some(peeked.rsplit(' ').next().unwrap().to_string());
				continue;
			}
			if peeked.starts_with(".source ") {
				reader.next();
				let raw = peeked.rsplit(' ').next().unwrap();
				source_file = Some(raw.trim_matches('"').to_string());
				continue;
			}
			if peeked.starts_with(".implements ") {
				reader.next();
				implements.push(peeked.rsplit(' ').next().unwrap().to_string());
				continue;
			}
			if peeked.starts_with(".annotation ") {
				let annotation = parse_inline_annotation(&mut reader)?;
				annotations.push(annotation);
				continue;
			}
			if peeked.starts_with(".field ") {
				let field = FieldParser::parse(&mut reader)?;
				fields.push(Rc::new(field));
				continue;
			}
			if peeked.starts_with(".method ") {
				if !direct_section && !virtual_section {
					return Err(parse_error(
						&name,
						format!("method {} must be in a direct or virtual methods section", peeked),
					));
				}
				let method = MethodParser::parse(&mut reader, &name, virtual_section)?;
				methods.push(Rc::new(method));
				continue;
			}

			return Err(parse_error(&name, format!("invalid line: {}", peeked)));
		}

		Ok(Class {
			name,
			flags,
			super_name,
			source: source_file,
			implements,
			annotations,
			fields,
			methods,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#".class public LFoo;
.super Ljava/lang/Object;
.source "Foo.java"

# direct methods
.method public constructor <init>()V
    .registers 1
    invoke-direct {p0}, Ljava/lang/Object;-><init>()V
    return-void
.end method

# virtual methods
.method public greet(Ljava/lang/String;)Ljava/lang/String;
    .locals 2
    const-string v0, "hello "
    invoke-virtual {v0, p1}, Ljava/lang/String;->concat(Ljava/lang/String;)Ljava/lang/String;
    move-result-object v1
    return-object v1
.end method
"#;

	#[test]
	fn parses_class_header() {
		let class = ClassParser::parse(SAMPLE).unwrap();
		assert_eq!(class.name, "LFoo;");
		assert_eq!(class.super_name.as_deref(), Some("Ljava/lang/Object;"));
		assert_eq!(class.source.as_deref(), Some("Foo.java"));
	}

	#[test]
	fn separates_direct_and_virtual_methods() {
		let class = ClassParser::parse(SAMPLE).unwrap();
		assert_eq!(class.methods.len(), 2);
		assert!(class.methods[0].is_direct);
		assert!(class.methods[1].is_virtual);
	}

	#[test]
	fn resolves_register_count_from_locals_and_parameters() {
		let class = ClassParser::parse(SAMPLE).unwrap();
		let greet = class.find_method_by_signature("greet(Ljava/lang/String;)Ljava/lang/String;").unwrap();
		// 2 locals + p0 (instance) + p1 (String param) = 4
		assert_eq!(greet.registers_count, 4);
	}

	#[test]
	fn rejects_method_outside_section() {
		let src = ".class public LBad;\n.super Ljava/lang/Object;\n.method public foo()V\n.registers 1\n.end method\n";
		let err = ClassParser::parse(src).unwrap_err();
		assert!(matches!(err, VmError::StructuralParseError { .. }));
	}
}
