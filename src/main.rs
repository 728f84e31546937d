use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};
use tracing_subscriber::prelude::*;

use smalivm::manifest::Manifest;
use smalivm::{analyze, Apk, Plugin, Vm, VmConfig};

/// A no-op plugin: this binary is a thin driver over the library, not a
/// detector. Real findings come from plugins built against `smalivm` as a
/// dependency; running this directly just sweeps every method once and
/// reports how far it got.
struct SweepReport {
	classes_run: usize,
}

impl Plugin for SweepReport {
	fn on_class(&mut self, _vm: &Vm, _class: &smalivm::smali::Class) {
		self.classes_run += 1;
	}
}

fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer())
		.with(tracing_error::ErrorLayer::default())
		.init();

	let mut args = std::env::args().skip(1);
	let smali_dir = PathBuf::from(args.next().ok_or_else(|| color_eyre::eyre::eyre!("usage: smalivm <smali-dir> [AndroidManifest.xml]"))?);
	let manifest_path = args.next().map(PathBuf::from).unwrap_or_else(|| smali_dir.join("AndroidManifest.xml"));

	let manifest_source = std::fs::read_to_string(&manifest_path)
		.with_context(|| format!("reading {}", manifest_path.display()))?;
	let manifest = Manifest::parse(&manifest_source)?;
	let apk = Apk::new(smali_dir.clone(), manifest);

	let mut vm = Vm::new(VmConfig::default()).with_smali_dir(&smali_dir)?;
	tracing::info!(classes = vm.class_count(), package = %apk.manifest.package, "indexed smali directory");

	let mut report = SweepReport { classes_run: 0 };
	analyze(&apk, &mut vm, &mut report);
	tracing::info!(classes_run = report.classes_run, "sweep complete");

	Ok(())
}
