/// Engine-wide tunables. Defaults mirror the numeric caps named in spec §4.5,
/// §4.8 and §9; callers building a CLI or plugin harness can override any of
/// them without reaching into engine internals.
#[derive(Debug, Clone)]
pub struct VmConfig {
	/// Depth cap for speculative branch/switch fan-out exploration (§4.5,
	/// §9). Hitting the cap truncates exploration rather than erroring.
	pub max_fan_out_depth: u32,
	/// Maximum distinct alternatives an `Ambiguous` value may hold before it
	/// collapses to `Unknown` (§9).
	pub max_ambiguous_values: usize,
	/// LRU capacity of the class cache (§4.8).
	pub class_cache_capacity: usize,
	/// Worker-pool size used when pre-indexing a Smali directory and when a
	/// caller analyzes several APKs concurrently (§5). The interpreter
	/// itself is always single-threaded per method.
	pub worker_pool_size: usize,
}

impl Default for VmConfig {
	fn default() -> Self {
		Self {
			max_fan_out_depth: 10,
			max_ambiguous_values: 16,
			class_cache_capacity: 1000,
			worker_pool_size: 3,
		}
	}
}
