//! A minimal `AndroidManifest.xml` reader: enough for a plugin's
//! `on_start` to learn the package name, declared permissions, and
//! component declarations, without a general-purpose XML DOM. The engine
//! never sees binary AXML; by the time input reaches this crate the
//! manifest has already been decoded to UTF-8 text by an earlier,
//! out-of-scope pipeline stage.
//!
//! Not grounded on the teacher (manifest parsing is outside a Dalvik
//! bytecode engine's concern); modeled on the lightweight pull-style XML
//! handling delvinru-apk-info's `apk-info-xml` crate favors over a general
//! DOM, adapted here as a small hand-rolled tag/attribute scanner since that
//! crate's own source isn't part of this workspace.

use std::collections::HashMap;

use crate::error::{VmError, VmResult};

pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
	Activity,
	Service,
	Receiver,
	Provider,
}

#[derive(Debug, Clone)]
pub struct Component {
	pub kind: ComponentKind,
	pub name: String,
	pub exported: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct Manifest {
	pub package: String,
	pub permissions: Vec<String>,
	pub components: Vec<Component>,
}

impl Manifest {
	pub fn parse(source: &str) -> VmResult<Manifest> {
		let mut package = None;
		let mut permissions = Vec::new();
		let mut components = Vec::new();

		for tag in iter_tags(source) {
			match tag.name.as_str() {
				"manifest" => package = tag.attr("package").map(str::to_string),
				"uses-permission" | "uses-permission-sdk-23" => {
					if let Some(name) = tag.attr("android:name") {
						permissions.push(name.to_string());
					}
				}
				"activity" | "service" | "receiver" | "provider" => {
					let kind = match tag.name.as_str() {
						"activity" => ComponentKind::Activity,
						"service" => ComponentKind::Service,
						"receiver" => ComponentKind::Receiver,
						_ => ComponentKind::Provider,
					};
					let name = tag.attr("android:name").unwrap_or_default().to_string();
					let exported = tag.attr("android:exported").map(|v| v == "true");
					components.push(Component { kind, name, exported });
				}
				_ => {}
			}
		}

		let package = package.ok_or_else(|| VmError::StructuralParseError {
			class: "AndroidManifest.xml".to_string(),
			message: "missing <manifest package=\"...\"> declaration".to_string(),
		})?;

		Ok(Manifest { package, permissions, components })
	}

	pub fn components_of(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
		self.components.iter().filter(move |c| c.kind == kind)
	}
}

struct Tag {
	name: String,
	attrs: HashMap<String, String>,
}

impl Tag {
	fn attr(&self, key: &str) -> Option<&str> {
		self.attrs.get(key).map(|s| s.as_str())
	}
}

/// Scans `source` for opening/self-closing tags, skipping the XML
/// declaration, comments, and closing tags. Good enough for a manifest's
/// element structure; not a general XML parser (no entity decoding beyond
/// what attribute values need).
fn iter_tags(source: &str) -> Vec<Tag> {
	let mut tags = Vec::new();
	let mut i = 0usize;
	while let Some(rel) = source[i..].find('<') {
		let start = i + rel;
		if source[start..].starts_with("<?") {
			i = source[start..].find("?>").map(|e| start + e + 2).unwrap_or(source.len());
			continue;
		}
		if source[start..].starts_with("<!--") {
			i = source[start..].find("-->").map(|e| start + e + 3).unwrap_or(source.len());
			continue;
		}
		if source[start..].starts_with("</") {
			i = match source[start..].find('>') {
				Some(e) => start + e + 1,
				None => source.len(),
			};
			continue;
		}
		let end = match source[start..].find('>') {
			Some(e) => start + e,
			None => break,
		};
		let body = &source[start + 1..end];
		let body = body.strip_suffix('/').unwrap_or(body).trim();
		if let Some(tag) = parse_tag(body) {
			tags.push(tag);
		}
		i = end + 1;
	}
	tags
}

fn parse_tag(body: &str) -> Option<Tag> {
	let mut split = body.splitn(2, char::is_whitespace);
	let name = split.next()?.to_string();
	let rest = split.next().unwrap_or("");

	let chars: Vec<char> = rest.chars().collect();
	let mut attrs = HashMap::new();
	let mut i = 0usize;
	while i < chars.len() {
		while i < chars.len() && chars[i].is_whitespace() {
			i += 1;
		}
		if i >= chars.len() {
			break;
		}
		let key_start = i;
		while i < chars.len() && chars[i] != '=' && !chars[i].is_whitespace() {
			i += 1;
		}
		let key: String = chars[key_start..i].iter().collect();
		while i < chars.len() && chars[i] != '=' {
			i += 1;
		}
		if i >= chars.len() {
			break;
		}
		i += 1; // skip '='
		while i < chars.len() && chars[i].is_whitespace() {
			i += 1;
		}
		if i >= chars.len() {
			break;
		}
		let quote = chars[i];
		if quote != '"' && quote != '\'' {
			break;
		}
		i += 1;
		let value_start = i;
		while i < chars.len() && chars[i] != quote {
			i += 1;
		}
		let value: String = chars[value_start..i].iter().collect();
		i = (i + 1).min(chars.len());
		if !key.is_empty() {
			attrs.insert(key, value);
		}
	}
	Some(Tag { name, attrs })
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.app">
    <uses-permission android:name="android.permission.INTERNET"/>
    <application android:label="@string/app_name">
        <activity android:name=".MainActivity" android:exported="true"/>
        <service android:name=".SyncService" android:exported="false"/>
    </application>
</manifest>
"#;

	#[test]
	fn reads_package_name() {
		let manifest = Manifest::parse(SAMPLE).unwrap();
		assert_eq!(manifest.package, "com.example.app");
	}

	#[test]
	fn collects_permissions() {
		let manifest = Manifest::parse(SAMPLE).unwrap();
		assert_eq!(manifest.permissions, vec!["android.permission.INTERNET".to_string()]);
	}

	#[test]
	fn collects_components_by_kind() {
		let manifest = Manifest::parse(SAMPLE).unwrap();
		let activities: Vec<_> = manifest.components_of(ComponentKind::Activity).collect();
		assert_eq!(activities.len(), 1);
		assert_eq!(activities[0].name, ".MainActivity");
		assert_eq!(activities[0].exported, Some(true));
	}

	#[test]
	fn missing_package_is_an_error() {
		let err = Manifest::parse("<manifest></manifest>").unwrap_err();
		assert!(matches!(err, VmError::StructuralParseError { .. }));
	}
}
