//! Plugin interface: spec.md §6's analysis contract, in Rust form. A
//! detector implements `Plugin`, registers breakpoints against the `Vm` it's
//! handed in `on_start`, and collects `Problem` evidence as instructions
//! fire; the engine itself never interprets what a plugin finds.

use std::path::PathBuf;

use crate::manifest::Manifest;
use crate::smali::Class;
use crate::vm::Vm;

/// A decompiled APK directory plus its already-decoded manifest; the unit
/// `on_start` is handed once per analysis target.
pub struct Apk {
	pub root: PathBuf,
	pub manifest: Manifest,
}

impl Apk {
	pub fn new(root: PathBuf, manifest: Manifest) -> Self {
		Apk { root, manifest }
	}
}

/// Implemented by a detector. `on_start` fires once, before any class runs,
/// so a plugin can read `apk.manifest` and register breakpoints; `on_class`
/// fires once per non-framework class as the engine discovers it, before
/// that class's methods run, so a plugin can register per-class breakpoints
/// or note structural facts ahead of execution.
pub trait Plugin {
	fn on_start(&mut self, apk: &Apk, vm: &mut Vm) {
		let _ = (apk, vm);
	}

	fn on_class(&mut self, vm: &Vm, class: &Class) {
		let _ = (vm, class);
	}
}
