//! `Problem`: a structured finding a plugin emits through the breakpoint
//! bus, serialized by an external report layer as
//! `{name, place: {type, ...}, ...evidence}`, UTF-8, pretty-printed.
//! Grounded on spec.md §6's report envelope; the data model itself has no
//! teacher counterpart (the teacher's DEX parser has no plugin/finding
//! concept), so it's built with the same `serde`/`serde_json` pair the
//! teacher already depends on.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Where a finding was observed: a whole file, a declared field, or a
/// specific instruction inside a method body.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Place {
	#[serde(rename = "file")]
	File { path: String },
	#[serde(rename = "field")]
	Field { class: String, name: String },
	#[serde(rename = "instruction")]
	Instruction { class: String, method: String, instruction: String },
}

/// A finding a plugin collects while a method runs. `evidence` is a
/// free-form key/value map (tokens, scopes, whatever the detector deemed
/// worth recording) serialized flattened alongside `name`/`place`.
#[derive(Debug, Clone)]
pub struct Problem {
	pub name: String,
	pub place: Place,
	pub evidence: BTreeMap<String, Value>,
}

impl Problem {
	pub fn new(name: impl Into<String>, place: Place) -> Self {
		Problem { name: name.into(), place, evidence: BTreeMap::new() }
	}

	pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.evidence.insert(key.into(), value.into());
		self
	}
}

/// Hand-rolled rather than derived: `evidence`'s keys need to land
/// alongside `name`/`place` at the top level of the JSON object, which
/// `#[serde(flatten)]` over a `BTreeMap<String, Value>` already does, but
/// spelling it out keeps the envelope shape (§6) visible at the call site.
impl Serialize for Problem {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		#[derive(Serialize)]
		struct Envelope<'a> {
			name: &'a str,
			place: &'a Place,
			#[serde(flatten)]
			evidence: &'a BTreeMap<String, Value>,
		}
		Envelope { name: &self.name, place: &self.place, evidence: &self.evidence }.serialize(serializer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_the_report_envelope() {
		let problem = Problem::new("hardcoded-secret", Place::Field { class: "LFoo;".to_string(), name: "apiKey".to_string() })
			.with_evidence("value", "sk-live-...");
		let json = serde_json::to_value(&problem).unwrap();
		assert_eq!(json["name"], "hardcoded-secret");
		assert_eq!(json["place"]["type"], "field");
		assert_eq!(json["place"]["class"], "LFoo;");
		assert_eq!(json["value"], "sk-live-...");
	}
}
