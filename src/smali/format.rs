//! Dalvik instruction formats. Distinct from the `Opcode` mnemonic table:
//! a `Format` describes the operand *shape* (how many registers, what kind
//! of literal/reference operand, fixed vs. range register list) shared by
//! many opcodes. Sizes are in 16-bit code units, matching the baksmali/dx
//! format catalogue; payload pseudo-instructions have no fixed size.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
	Format10x,
	Format11n,
	Format11x,
	Format12x,
	Format10t,
	Format20t,
	/// Odex-only, kept for parse completeness.
	Format20bc,
	Format22x,
	Format21t,
	Format21s,
	Format21h,
	Format21lh,
	/// Odex variant of `Format21h` used by the teacher's own parser for
	/// `const/high16`'s signed-immediate path.
	Format21ih,
	Format21c,
	Format23x,
	Format22b,
	Format22t,
	Format22s,
	Format22c,
	/// Odex-only quick field accessor, kept for parse completeness.
	Format22cs,
	Format30t,
	Format32x,
	Format31i,
	Format31c,
	Format31t,
	Format35c,
	/// Odex-only quick/super dispatch variants of `Format35c`.
	Format35ms,
	Format35mi,
	Format3rc,
	Format3rms,
	Format3rmi,
	Format45cc,
	Format4rcc,
	Format51l,
	ArrayPayload,
	PackedSwitchPayload,
	SparseSwitchPayload,
}

impl Format {
	/// Size in 16-bit code units. Payload pseudo-instructions report `-1`:
	/// their length depends on their element count, not their format.
	pub fn size(&self) -> i8 {
		use Format::*;
		match self {
			Format10x | Format11n | Format11x | Format12x | Format10t => 1,
			Format20t | Format20bc | Format22x | Format21t | Format21s | Format21h
			| Format21lh | Format21ih | Format21c | Format23x | Format22b | Format22t
			| Format22s | Format22c | Format22cs => 2,
			Format30t | Format32x | Format31i | Format31c | Format31t | Format35c
			| Format35ms | Format35mi | Format3rc | Format3rms | Format3rmi => 3,
			Format45cc | Format4rcc => 4,
			Format51l => 5,
			ArrayPayload | PackedSwitchPayload | SparseSwitchPayload => -1,
		}
	}

	pub fn is_payload(&self) -> bool {
		matches!(
			self,
			Format::ArrayPayload | Format::PackedSwitchPayload | Format::SparseSwitchPayload
		)
	}

	/// Whether this format's register operand(s) are a `{vX .. vY}` range
	/// rather than an explicit list.
	pub fn is_range(&self) -> bool {
		matches!(
			self,
			Format::Format3rc | Format::Format3rms | Format::Format3rmi | Format::Format4rcc
		)
	}
}
