//! `Vm`: owns the class index for one analysis run: discovering `.smali`
//! files under a root directory, parsing and caching class bodies on first
//! use, and exposing the entry points a plugin or CLI drives a scan
//! through. Grounded on `smalivm/smalivm.py`'s `Vm`.
//!
//! The reference preloads by walking the directory with a thread pool sized
//! to `cpu_count()`, reading just the `.class` header line of every file; no
//! crate in this workspace's stack offers a thread pool, so this engine uses
//! `std::thread::scope` directly, splitting the file list into
//! `config.worker_pool_size` chunks, pure file I/O with nothing shared to
//! contend over, same as the reference's rationale.
//!
//! Framework stub classes (`java.lang.String`/`StringBuilder`/`Math`) never
//! reach this module: `interpreter::run_invoke` recognizes them via
//! `framework::is_framework_class` and dispatches before falling back to
//! `MethodInvoker`, so `Vm` only ever indexes and parses real `.smali`
//! sources. They therefore don't appear in `iter_class_names`/
//! `run_all_methods` either; there's no `Class`/`Method` body to run for a
//! stub, and fabricating one would misrepresent what the stub actually
//! does.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::breakpoints::Breakpoints;
use crate::config::VmConfig;
use crate::error::{VmError, VmResult};
use crate::method_runner::MethodRunner;
use crate::smali::members::{Class, Method};
use crate::smali::parser::ClassParser;
use crate::value::RegisterValue;

struct ClassCache {
	capacity: usize,
	order: VecDeque<String>,
	entries: HashMap<String, Rc<Class>>,
}

impl ClassCache {
	fn new(capacity: usize) -> Self {
		ClassCache { capacity, order: VecDeque::new(), entries: HashMap::new() }
	}

	fn get(&mut self, name: &str) -> Option<Rc<Class>> {
		let found = self.entries.get(name).cloned();
		if found.is_some() {
			self.touch(name);
		}
		found
	}

	fn touch(&mut self, name: &str) {
		if let Some(idx) = self.order.iter().position(|n| n == name) {
			self.order.remove(idx);
		}
		self.order.push_back(name.to_string());
	}

	fn insert(&mut self, name: String, class: Rc<Class>) {
		if !self.entries.contains_key(&name) && self.entries.len() >= self.capacity {
			if let Some(evicted) = self.order.pop_front() {
				self.entries.remove(&evicted);
			}
		}
		self.entries.insert(name.clone(), class);
		self.touch(&name);
	}
}

pub struct Vm {
	config: VmConfig,
	breakpoints: Breakpoints,
	class_files: HashMap<String, PathBuf>,
	cache: RefCell<ClassCache>,
}

impl Vm {
	pub fn new(config: VmConfig) -> Self {
		Vm {
			cache: RefCell::new(ClassCache::new(config.class_cache_capacity)),
			class_files: HashMap::new(),
			breakpoints: Breakpoints::new(),
			config,
		}
	}

	/// Walks `smali_dir` once, reading only the `.class ...` header line of
	/// every `*.smali` file to learn its Dalvik class name without parsing
	/// the rest, spread across a small worker pool since it's pure I/O with
	/// no shared state.
	pub fn with_smali_dir(mut self, smali_dir: &Path) -> VmResult<Self> {
		let files = collect_smali_files(smali_dir)?;
		let worker_count = self.config.worker_pool_size.max(1);
		let chunk_size = ((files.len() + worker_count - 1) / worker_count).max(1);

		let headers: Vec<(String, PathBuf)> = std::thread::scope(|scope| {
			let handles: Vec<_> = files
				.chunks(chunk_size)
				.map(|chunk| {
					scope.spawn(move || {
						chunk
							.iter()
							.filter_map(|path| read_class_header(path).map(|name| (name, path.clone())))
							.collect::<Vec<_>>()
					})
				})
				.collect();
			handles.into_iter().flat_map(|h| h.join().unwrap_or_default()).collect()
		});

		debug!(count = headers.len(), "indexed smali classes");
		for (name, path) in headers {
			self.class_files.insert(name, path);
		}
		Ok(self)
	}

	pub fn breakpoints(&self) -> &Breakpoints {
		&self.breakpoints
	}

	pub fn breakpoints_mut(&mut self) -> &mut Breakpoints {
		&mut self.breakpoints
	}

	pub fn config(&self) -> &VmConfig {
		&self.config
	}

	/// Parses and caches a class body on first lookup. Returns `Ok(None)`
	/// for a name this `Vm` has no source file for, the engine's
	/// "resolution failures degrade to `Unknown`" policy, not an error.
	pub fn load_class(&self, class_name: &str) -> VmResult<Option<Rc<Class>>> {
		if let Some(class) = self.cache.borrow_mut().get(class_name) {
			return Ok(Some(class));
		}
		let path = match self.class_files.get(class_name) {
			Some(path) => path,
			None => return Ok(None),
		};
		let source = fs::read_to_string(path)
			.map_err(|e| VmError::StructuralParseError { class: class_name.to_string(), message: e.to_string() })?;
		let class = Rc::new(ClassParser::parse(&source)?);
		self.cache.borrow_mut().insert(class_name.to_string(), class.clone());
		Ok(Some(class))
	}

	/// Invokes a method directly, outside of any in-flight interpreter run:
	/// the entry point a plugin or CLI uses to call into a loaded class.
	pub fn invoke_method(&self, method: &Method, args: &[RegisterValue]) -> VmResult<RegisterValue> {
		let mut stack = Vec::new();
		MethodRunner::new(self, &mut stack).run(method, args)
	}

	/// Runs every non-abstract, non-native method of `clazz` to completion
	/// with no arguments, discarding each return value, a sweep for side
	/// effects (breakpoint hits a plugin observes) rather than for any
	/// value produced.
	pub fn run_all_methods(&self, clazz: &Class) {
		for method in &clazz.methods {
			if method.is_abstract() || method.is_native() {
				continue;
			}
			let mut stack = Vec::new();
			if let Err(err) = MethodRunner::new(self, &mut stack).run(method, &[]) {
				warn!(method = %method.full_signature(), %err, "method run aborted");
			}
		}
	}

	pub fn class_count(&self) -> usize {
		self.class_files.len()
	}

	pub fn iter_class_names(&self) -> impl Iterator<Item = &str> {
		self.class_files.keys().map(|s| s.as_str())
	}

	/// Lazily loads and yields every indexed class, skipping names whose
	/// source failed to parse rather than aborting the whole sweep (§7:
	/// a structural parse error is fatal only for that one class).
	pub fn iter_classes(&self) -> impl Iterator<Item = Rc<Class>> + '_ {
		self.class_files.keys().filter_map(move |name| match self.load_class(name) {
			Ok(class) => class,
			Err(err) => {
				warn!(class = %name, %err, "skipping class that failed to parse");
				None
			}
		})
	}
}

fn collect_smali_files(root: &Path) -> VmResult<Vec<PathBuf>> {
	let mut out = Vec::new();
	let mut stack = vec![root.to_path_buf()];
	while let Some(dir) = stack.pop() {
		let entries = fs::read_dir(&dir)
			.map_err(|e| VmError::StructuralParseError { class: dir.display().to_string(), message: e.to_string() })?;
		for entry in entries {
			let entry = entry
				.map_err(|e| VmError::StructuralParseError { class: dir.display().to_string(), message: e.to_string() })?;
			let path = entry.path();
			if path.is_dir() {
				stack.push(path);
			} else if path.extension().map(|ext| ext == "smali").unwrap_or(false) {
				out.push(path);
			}
		}
	}
	Ok(out)
}

/// Reads just enough of a `.smali` file to learn its declared class name
/// from the `.class ... LFoo;` header line, without parsing the body.
fn read_class_header(path: &Path) -> Option<String> {
	let content = fs::read_to_string(path).ok()?;
	let first_line = content.lines().next()?;
	if !first_line.starts_with(".class ") {
		return None;
	}
	first_line.split(' ').last().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn write_class(dir: &Path, filename: &str, source: &str) {
		let path = dir.join(filename);
		let mut file = fs::File::create(path).unwrap();
		file.write_all(source.as_bytes()).unwrap();
	}

	#[test]
	fn indexes_and_loads_a_class_by_header() {
		let dir = std::env::temp_dir().join(format!("smalivm-test-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		write_class(
			&dir,
			"Foo.smali",
			".class public LFoo;\n.super Ljava/lang/Object;\n\n# direct methods\n.method public constructor <init>()V\n.registers 1\nreturn-void\n.end method\n",
		);

		let vm = Vm::new(VmConfig::default()).with_smali_dir(&dir).unwrap();
		assert_eq!(vm.class_count(), 1);
		let class = vm.load_class("LFoo;").unwrap().expect("class should be indexed");
		assert_eq!(class.name, "LFoo;");

		fs::remove_dir_all(&dir).ok();
	}

	#[test]
	fn unindexed_class_resolves_to_none() {
		let vm = Vm::new(VmConfig::default());
		assert!(vm.load_class("Lnope/Missing;").unwrap().is_none());
	}
}
