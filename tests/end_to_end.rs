//! Exercises the crate the way an external plugin would: build a `Vm` over
//! a small directory of `.smali` fixtures, invoke a method directly, and
//! drive a whole-APK sweep through `analyze`.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use smalivm::manifest::Manifest;
use smalivm::value::RegisterValue;
use smalivm::{analyze, Apk, Plugin, Vm, VmConfig};

/// Root of the literal, checked-in fixtures backing the six end-to-end
/// scenarios (as opposed to the ones above, which write their `.smali` to a
/// scratch directory per test run).
fn fixtures_dir(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn fixture_dir(name: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("smalivm-e2e-{}-{}", name, std::process::id()));
	fs::create_dir_all(&dir).unwrap();
	dir
}

fn write(dir: &Path, filename: &str, source: &str) {
	fs::write(dir.join(filename), source).unwrap();
}

const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.app">
    <application android:label="@string/app_name">
        <activity android:name=".MainActivity" android:exported="true"/>
    </application>
</manifest>
"#;

#[test]
fn invokes_a_method_and_folds_constant_arithmetic() {
	let dir = fixture_dir("arith");
	write(
		&dir,
		"Calc.smali",
		r#".class public LCalc;
.super Ljava/lang/Object;

.method public static add(II)I
    .registers 3
    add-int/2addr p0, p1
    return p0
.end method
"#,
	);

	let vm = Vm::new(VmConfig::default()).with_smali_dir(&dir).unwrap();
	let class = vm.load_class("LCalc;").unwrap().expect("class indexed");
	let method = class.find_method_by_signature("add(II)I").expect("method parsed");

	let args = vec![RegisterValue::concrete("0x2", "I"), RegisterValue::concrete("0x3", "I")];
	let result = vm.invoke_method(method, &args).unwrap();
	assert_eq!(result.as_int().unwrap(), 5);

	fs::remove_dir_all(&dir).ok();
}

#[test]
fn recursive_invoke_bottoms_out_instead_of_overflowing_the_stack() {
	let dir = fixture_dir("recurse");
	write(
		&dir,
		"Loopy.smali",
		r#".class public LLoopy;
.super Ljava/lang/Object;

.method public static spin(I)I
    .registers 1
    invoke-static {p0}, LLoopy;->spin(I)I
    move-result v0
    return v0
.end method
"#,
	);

	let vm = Vm::new(VmConfig::default()).with_smali_dir(&dir).unwrap();
	let class = vm.load_class("LLoopy;").unwrap().unwrap();
	let method = class.find_method_by_signature("spin(I)I").unwrap();

	let result = vm.invoke_method(method, &[RegisterValue::concrete("0x1", "I")]).unwrap();
	assert!(result.is_unknown());

	fs::remove_dir_all(&dir).ok();
}

#[test]
fn analyze_sweeps_every_class_and_reports_manifest_package() {
	let dir = fixture_dir("sweep");
	write(
		&dir,
		"Greeter.smali",
		r#".class public LGreeter;
.super Ljava/lang/Object;

.method public constructor <init>()V
    .registers 1
    invoke-direct {p0}, Ljava/lang/Object;-><init>()V
    return-void
.end method

.method public greet(Ljava/lang/String;)Ljava/lang/String;
    .locals 2
    const-string v0, "hello "
    invoke-virtual {v0, p1}, Ljava/lang/String;->concat(Ljava/lang/String;)Ljava/lang/String;
    move-result-object v1
    return-object v1
.end method
"#,
	);
	write(
		&dir,
		"Other.smali",
		r#".class public LOther;
.super Ljava/lang/Object;

.method public static ping()V
    .registers 0
    return-void
.end method
"#,
	);

	struct Counter {
		classes: AtomicUsize,
		package: Option<String>,
	}
	impl Plugin for Counter {
		fn on_start(&mut self, apk: &Apk, _vm: &mut Vm) {
			self.package = Some(apk.manifest.package.clone());
		}
		fn on_class(&mut self, _vm: &Vm, _class: &smalivm::smali::Class) {
			self.classes.fetch_add(1, Ordering::SeqCst);
		}
	}

	let manifest = Manifest::parse(MANIFEST).unwrap();
	let apk = Apk::new(dir.clone(), manifest);
	let mut vm = Vm::new(VmConfig::default()).with_smali_dir(&dir).unwrap();
	let mut plugin = Counter { classes: AtomicUsize::new(0), package: None };

	analyze(&apk, &mut vm, &mut plugin);

	assert_eq!(plugin.classes.load(Ordering::SeqCst), 2);
	assert_eq!(plugin.package.as_deref(), Some("com.example.app"));

	fs::remove_dir_all(&dir).ok();
}

/// Scenario 1: a hardcoded-secret-style constant fires the string observer
/// exactly once, bound to the register it landed in.
#[test]
fn const_string_fires_the_string_observer_once() {
	let dir = fixtures_dir("constant_string");
	let mut vm = Vm::new(VmConfig::default()).with_smali_dir(&dir).unwrap();

	let hits = Rc::new(RefCell::new(Vec::new()));
	let hits_clone = hits.clone();
	vm.breakpoints_mut().add_by_string_value(Rc::new(move |_ctx, _ins, reg, value| {
		hits_clone.borrow_mut().push((reg.to_string(), value.to_string()));
		None
	}));

	let class = vm.load_class("LSecret;").unwrap().unwrap();
	let method = class.find_method_by_signature("key()Ljava/lang/String;").unwrap();
	let result = vm.invoke_method(method, &[]).unwrap();

	assert_eq!(result.as_string().unwrap(), "AIzaSyTEST");
	assert_eq!(hits.borrow().as_slice(), &[("v0".to_string(), "AIzaSyTEST".to_string())]);
}

/// Scenario 2: `0x7fffffff + 0x1` wraps to the minimum signed `int` rather
/// than widening or panicking.
#[test]
fn add_int_wraps_at_the_signed_boundary() {
	let dir = fixtures_dir("int_wrap");
	let vm = Vm::new(VmConfig::default()).with_smali_dir(&dir).unwrap();
	let class = vm.load_class("LCalc;").unwrap().unwrap();
	let method = class.find_method_by_signature("wrap()I").unwrap();
	let result = vm.invoke_method(method, &[]).unwrap();
	assert_eq!(result.as_int().unwrap(), i32::MIN);
}

/// Scenario 5: an uninitialised-register read inside a `try`/`.catch` region
/// redirects to the handler instead of aborting the method.
#[test]
fn uninitialized_register_read_redirects_to_the_catch_handler() {
	let dir = fixtures_dir("exception_redirect");
	let vm = Vm::new(VmConfig::default()).with_smali_dir(&dir).unwrap();
	let class = vm.load_class("LFlaky;").unwrap().unwrap();
	let method = class.find_method_by_signature("run()I").unwrap();
	let result = vm.invoke_method(method, &[]).unwrap();
	assert_eq!(result.as_int().unwrap(), 2);
}

/// Scenario 6: a `packed-switch` over an undecidable register forks every
/// case plus the fall-through; the returned register ends up `Ambiguous`
/// over exactly the values the taken arms produced.
#[test]
fn undecidable_packed_switch_merges_to_ambiguous_across_arms() {
	let dir = fixtures_dir("switch_fanout");
	let vm = Vm::new(VmConfig::default()).with_smali_dir(&dir).unwrap();
	let class = vm.load_class("LSwitchy;").unwrap().unwrap();
	let method = class.find_method_by_signature("pick(I)I").unwrap();
	let result = vm.invoke_method(method, &[RegisterValue::Unknown]).unwrap();

	let ambiguous = result.as_ambiguous().expect("undecidable switch should merge to Ambiguous");
	let mut ints: Vec<i32> = ambiguous.values().iter().map(|v| v.as_int().unwrap()).collect();
	ints.sort();
	assert_eq!(ints, vec![1, 2, 9]);
}
