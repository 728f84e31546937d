//! The class/field/method data model. `Class`, `Field`, `Method` are the
//! parsed, static representation of a `.smali` file; the interpreter walks
//! a `Method`'s item list at run time but never mutates these structures.

use std::rc::Rc;

use super::directive::{Annotation, Directive};
use super::instruction::Instruction;
use super::labels::LabelId;

/// A parsed method body is a flat sequence of these. `.registers`/`.locals`
/// are consumed into `Method::registers_count` and never appear here;
/// `.catch`/`.catchall`/`.array-data`/`.packed-switch`/`.sparse-switch`
/// directives and label markers stay in the sequence because the
/// interpreter seeks to them by position (exception redirect, switch/array
/// payload lookup).
#[derive(Debug, Clone)]
pub enum MethodItem {
	Instruction(Instruction),
	Label(LabelId),
	Directive(Directive),
}

#[derive(Debug, Clone)]
pub struct Field {
	pub name: String,
	pub field_type: String,
	pub flags: Vec<String>,
	pub initial_value: Option<String>,
	pub annotations: Vec<Annotation>,
}

impl Field {
	pub fn is_static(&self) -> bool {
		self.flags.iter().any(|f| f == "static")
	}

	pub fn is_final(&self) -> bool {
		self.flags.iter().any(|f| f == "final")
	}
}

#[derive(Debug, Clone)]
pub struct Method {
	pub name: String,
	pub parameter_types: Vec<String>,
	pub return_type: String,
	pub flags: Vec<String>,
	pub registers_count: u32,
	pub items: Vec<MethodItem>,
	pub is_virtual: bool,
	pub is_direct: bool,
	pub class_name: String,
}

impl Method {
	pub fn is_static(&self) -> bool {
		self.flags.iter().any(|f| f == "static")
	}

	pub fn is_abstract(&self) -> bool {
		self.flags.iter().any(|f| f == "abstract")
	}

	pub fn is_native(&self) -> bool {
		self.flags.iter().any(|f| f == "native")
	}

	pub fn signature(&self) -> String {
		format!("{}({}){}", self.name, self.parameter_types.join(""), self.return_type)
	}

	pub fn full_signature(&self) -> String {
		format!("{}->{}", self.class_name, self.signature())
	}

	/// Number of register slots the declared parameters occupy, including
	/// the implicit `p0` instance receiver for non-static methods and the
	/// extra slot wide (`J`/`D`) parameters consume.
	pub fn parameter_register_count(&self) -> u32 {
		let mut count = if self.is_static() { 0 } else { 1 };
		for param in &self.parameter_types {
			count += super::utils::param_slot_count(param);
		}
		count
	}
}

#[derive(Debug, Clone)]
pub struct Class {
	pub name: String,
	pub flags: Vec<String>,
	pub super_name: Option<String>,
	pub source: Option<String>,
	pub implements: Vec<String>,
	pub annotations: Vec<Annotation>,
	pub fields: Vec<Rc<Field>>,
	pub methods: Vec<Rc<Method>>,
}

impl Class {
	pub fn find_method(&self, name: &str, parameter_types: &[String], return_type: &str) -> Option<&Rc<Method>> {
		self.methods.iter().find(|m| {
			m.name == name && m.return_type == return_type && m.parameter_types == parameter_types
		})
	}

	pub fn find_method_by_signature(&self, signature: &str) -> Option<&Rc<Method>> {
		self.methods.iter().find(|m| m.signature() == signature)
	}

	pub fn find_field(&self, name: &str) -> Option<&Rc<Field>> {
		self.fields.iter().find(|f| f.name == name)
	}

	pub fn is_interface(&self) -> bool {
		self.flags.iter().any(|f| f == "interface")
	}
}
