//! The full Dalvik opcode mnemonic table. The teacher's `enum_values::Values`
//! derive macro is attribute-driven but, on inspection, expands to an empty
//! `impl` block (it parses `#[values(...)]` metadata and then discards it,
//! and the crate only compiles at all under the unstable
//! `proc_macro_diagnostic` feature), so metadata here is wired up with a
//! plain `macro_rules!` table instead of that derive. `enum_values` stays a
//! declared dependency for parity with the teacher's `Cargo.toml`; nothing in
//! this crate calls into it.

use bitflags::bitflags;

use super::format::Format;
use Format::*;

bitflags! {
	pub struct OpcodeFlags: u32 {
		/// The instruction can throw a runtime exception.
		const CanThrow = 0x1;
		/// Odex-only instruction; never appears in a standalone APK's smali.
		const OdexOnly = 0x2;
		/// Execution can fall through to the next instruction.
		const CanContinue = 0x4;
		/// The instruction sets the hidden move-result register.
		const SetsResult = 0x8;
		/// The instruction sets the value of its first register operand.
		const SetsRegister = 0x10;
		/// The instruction sets its first register operand to a wide value.
		const SetsWideRegister = 0x20;
		/// Odex quick field accessor (`iget-quick` family).
		const QuickFieldAccessor = 0x40;
		/// `*get-volatile`/`*put-volatile` instruction.
		const VolatileFieldAccessor = 0x80;
		/// Static `sget-*`/`sput-*` instruction.
		const StaticFieldAccessor = 0x100;
		/// Jumbo (32-bit reference index) instruction.
		const JumboOpcode = 0x200;
		/// Can initialize an uninitialized object reference (`<init>` calls).
		const CanInitializeReference = 0x400;
	}
}

impl Default for OpcodeFlags {
	fn default() -> Self {
		OpcodeFlags::empty()
	}
}

macro_rules! opcodes {
	($( $variant:ident = { name: $name:expr, format: $format:ident, flags: $flags:expr } ),* $(,)?) => {
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum Opcode {
			$( $variant ),*
		}

		impl Opcode {
			/// The mnemonic as it appears in disassembled smali text.
			pub fn name(&self) -> &'static str {
				match self {
					$( Opcode::$variant => $name ),*
				}
			}

			pub fn format(&self) -> Format {
				match self {
					$( Opcode::$variant => $format ),*
				}
			}

			pub fn flags(&self) -> OpcodeFlags {
				match self {
					$( Opcode::$variant => $flags ),*
				}
			}

			/// Looks up an opcode by its smali mnemonic text (`move-result-object`,
			/// `invoke-virtual/range`, ...). Returns `None` for an unrecognized
			/// mnemonic; the caller turns that into `VmError::UnsupportedOpcode`.
			pub fn from_name(name: &str) -> Option<Opcode> {
				match name {
					$( $name => Some(Opcode::$variant), )*
					_ => None,
				}
			}
		}
	};
}

opcodes! {
	Nop = { name: "nop", format: Format10x, flags: OpcodeFlags::CanContinue },
	MOVE = { name: "move", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MoveFrom16 = { name: "move/from16", format: Format22x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	Move16 = { name: "move/16", format: Format32x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MoveWide = { name: "move-wide", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	MoveWideFrom16 = { name: "move-wide/from16", format: Format22x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	MoveWide16 = { name: "move-wide/16", format: Format32x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	MoveObject = { name: "move-object", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MoveObjectFrom16 = { name: "move-object/from16", format: Format22x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MoveObject16 = { name: "move-object/16", format: Format32x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MoveResult = { name: "move-result", format: Format11x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MoveResultWide = { name: "move-result-wide", format: Format11x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	MoveResultObject = { name: "move-result-object", format: Format11x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MoveException = { name: "move-exception", format: Format11x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ReturnVoid = { name: "return-void", format: Format10x, flags: OpcodeFlags::empty() },
	RETURN = { name: "return", format: Format11x, flags: OpcodeFlags::empty() },
	ReturnWide = { name: "return-wide", format: Format11x, flags: OpcodeFlags::empty() },
	ReturnObject = { name: "return-object", format: Format11x, flags: OpcodeFlags::empty() },
	Const4 = { name: "const/4", format: Format11n, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	Const16 = { name: "const/16", format: Format21s, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	CONST = { name: "const", format: Format31i, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ConstHigh16 = { name: "const/high16", format: Format21ih, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ConstWide16 = { name: "const-wide/16", format: Format21s, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	ConstWide32 = { name: "const-wide/32", format: Format31i, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	ConstWide = { name: "const-wide", format: Format51l, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	ConstWideHigh16 = { name: "const-wide/high16", format: Format21lh, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	ConstString = { name: "const-string", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ConstStringJumbo = { name: "const-string/jumbo", format: Format31c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ConstClass = { name: "const-class", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MonitorEnter = { name: "monitor-enter", format: Format11x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	MonitorExit = { name: "monitor-exit", format: Format11x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	CheckCast = { name: "check-cast", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	InstanceOf = { name: "instance-of", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ArrayLength = { name: "array-length", format: Format12x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	NewInstance = { name: "new-instance", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	NewArray = { name: "new-array", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	FilledNewArray = { name: "filled-new-array", format: Format35c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	FilledNewArrayRange = { name: "filled-new-array/range", format: Format3rc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	FillArrayData = { name: "fill-array-data", format: Format31t, flags: OpcodeFlags::CanContinue },
	THROW = { name: "throw", format: Format11x, flags: OpcodeFlags::CanThrow },
	GOTO = { name: "goto", format: Format10t, flags: OpcodeFlags::empty() },
	Goto16 = { name: "goto/16", format: Format20t, flags: OpcodeFlags::empty() },
	Goto32 = { name: "goto/32", format: Format30t, flags: OpcodeFlags::empty() },
	PackedSwitch = { name: "packed-switch", format: Format31t, flags: OpcodeFlags::CanContinue },
	SparseSwitch = { name: "sparse-switch", format: Format31t, flags: OpcodeFlags::CanContinue },
	CmplFloat = { name: "cmpl-float", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	CmpgFloat = { name: "cmpg-float", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	CmplDouble = { name: "cmpl-double", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	CmpgDouble = { name: "cmpg-double", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	CmpLong = { name: "cmp-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IfEq = { name: "if-eq", format: Format22t, flags: OpcodeFlags::CanContinue },
	IfNe = { name: "if-ne", format: Format22t, flags: OpcodeFlags::CanContinue },
	IfLt = { name: "if-lt", format: Format22t, flags: OpcodeFlags::CanContinue },
	IfGe = { name: "if-ge", format: Format22t, flags: OpcodeFlags::CanContinue },
	IfGt = { name: "if-gt", format: Format22t, flags: OpcodeFlags::CanContinue },
	IfLe = { name: "if-le", format: Format22t, flags: OpcodeFlags::CanContinue },
	IfEqz = { name: "if-eqz", format: Format21t, flags: OpcodeFlags::CanContinue },
	IfNez = { name: "if-nez", format: Format21t, flags: OpcodeFlags::CanContinue },
	IfLtz = { name: "if-ltz", format: Format21t, flags: OpcodeFlags::CanContinue },
	IfGez = { name: "if-gez", format: Format21t, flags: OpcodeFlags::CanContinue },
	IfGtz = { name: "if-gtz", format: Format21t, flags: OpcodeFlags::CanContinue },
	IfLez = { name: "if-lez", format: Format21t, flags: OpcodeFlags::CanContinue },
	AGET = { name: "aget", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AgetWide = { name: "aget-wide", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	AgetObject = { name: "aget-object", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AgetBoolean = { name: "aget-boolean", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AgetByte = { name: "aget-byte", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AgetChar = { name: "aget-char", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AgetShort = { name: "aget-short", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	APUT = { name: "aput", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	AputWide = { name: "aput-wide", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	AputObject = { name: "aput-object", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	AputBoolean = { name: "aput-boolean", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	AputByte = { name: "aput-byte", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	AputChar = { name: "aput-char", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	AputShort = { name: "aput-short", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	IGET = { name: "iget", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IgetWide = { name: "iget-wide", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	IgetObject = { name: "iget-object", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IgetBoolean = { name: "iget-boolean", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IgetByte = { name: "iget-byte", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IgetChar = { name: "iget-char", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IgetShort = { name: "iget-short", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IPUT = { name: "iput", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	IputWide = { name: "iput-wide", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	IputObject = { name: "iput-object", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	IputBoolean = { name: "iput-boolean", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	IputByte = { name: "iput-byte", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	IputChar = { name: "iput-char", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	IputShort = { name: "iput-short", format: Format22c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	SGET = { name: "sget", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::StaticFieldAccessor },
	SgetWide = { name: "sget-wide", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister | OpcodeFlags::StaticFieldAccessor },
	SgetObject = { name: "sget-object", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::StaticFieldAccessor },
	SgetBoolean = { name: "sget-boolean", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::StaticFieldAccessor },
	SgetByte = { name: "sget-byte", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::StaticFieldAccessor },
	SgetChar = { name: "sget-char", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::StaticFieldAccessor },
	SgetShort = { name: "sget-short", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::StaticFieldAccessor },
	SPUT = { name: "sput", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	SputWide = { name: "sput-wide", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	SputObject = { name: "sput-object", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	SputBoolean = { name: "sput-boolean", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	SputByte = { name: "sput-byte", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	SputChar = { name: "sput-char", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	SputShort = { name: "sput-short", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	InvokeVirtual = { name: "invoke-virtual", format: Format35c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeSuper = { name: "invoke-super", format: Format35c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeDirect = { name: "invoke-direct", format: Format35c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult | OpcodeFlags::CanInitializeReference },
	InvokeStatic = { name: "invoke-static", format: Format35c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeInterface = { name: "invoke-interface", format: Format35c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeVirtualRange = { name: "invoke-virtual/range", format: Format3rc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeSuperRange = { name: "invoke-super/range", format: Format3rc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeDirectRange = { name: "invoke-direct/range", format: Format3rc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult | OpcodeFlags::CanInitializeReference },
	InvokeStaticRange = { name: "invoke-static/range", format: Format3rc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeInterfaceRange = { name: "invoke-interface/range", format: Format3rc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	NegInt = { name: "neg-int", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	NotInt = { name: "not-int", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	NegLong = { name: "neg-long", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	NotLong = { name: "not-long", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	NegFloat = { name: "neg-float", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	NegDouble = { name: "neg-double", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	IntToLong = { name: "int-to-long", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	IntToFloat = { name: "int-to-float", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IntToDouble = { name: "int-to-double", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	LongToInt = { name: "long-to-int", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	LongToFloat = { name: "long-to-float", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	LongToDouble = { name: "long-to-double", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	FloatToInt = { name: "float-to-int", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	FloatToLong = { name: "float-to-long", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	FloatToDouble = { name: "float-to-double", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	DoubleToInt = { name: "double-to-int", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	DoubleToLong = { name: "double-to-long", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	DoubleToFloat = { name: "double-to-float", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IntToByte = { name: "int-to-byte", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IntToChar = { name: "int-to-char", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IntToShort = { name: "int-to-short", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AddInt = { name: "add-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	SubInt = { name: "sub-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MulInt = { name: "mul-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	DivInt = { name: "div-int", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	RemInt = { name: "rem-int", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AndInt = { name: "and-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	OrInt = { name: "or-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	XorInt = { name: "xor-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ShlInt = { name: "shl-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ShrInt = { name: "shr-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	UshrInt = { name: "ushr-int", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AddLong = { name: "add-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	SubLong = { name: "sub-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	MulLong = { name: "mul-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	DivLong = { name: "div-long", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	RemLong = { name: "rem-long", format: Format23x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	AndLong = { name: "and-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	OrLong = { name: "or-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	XorLong = { name: "xor-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	ShlLong = { name: "shl-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	ShrLong = { name: "shr-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	UshrLong = { name: "ushr-long", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	AddFloat = { name: "add-float", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	SubFloat = { name: "sub-float", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MulFloat = { name: "mul-float", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	DivFloat = { name: "div-float", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	RemFloat = { name: "rem-float", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AddDouble = { name: "add-double", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	SubDouble = { name: "sub-double", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	MulDouble = { name: "mul-double", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	DivDouble = { name: "div-double", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	RemDouble = { name: "rem-double", format: Format23x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	AddInt2addr = { name: "add-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	SubInt2addr = { name: "sub-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MulInt2addr = { name: "mul-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	DivInt2addr = { name: "div-int/2addr", format: Format12x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	RemInt2addr = { name: "rem-int/2addr", format: Format12x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AndInt2addr = { name: "and-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	OrInt2addr = { name: "or-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	XorInt2addr = { name: "xor-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ShlInt2addr = { name: "shl-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ShrInt2addr = { name: "shr-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	UshrInt2addr = { name: "ushr-int/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AddLong2addr = { name: "add-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	SubLong2addr = { name: "sub-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	MulLong2addr = { name: "mul-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	DivLong2addr = { name: "div-long/2addr", format: Format12x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	RemLong2addr = { name: "rem-long/2addr", format: Format12x, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	AndLong2addr = { name: "and-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	OrLong2addr = { name: "or-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	XorLong2addr = { name: "xor-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	ShlLong2addr = { name: "shl-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	ShrLong2addr = { name: "shr-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	UshrLong2addr = { name: "ushr-long/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	AddFloat2addr = { name: "add-float/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	SubFloat2addr = { name: "sub-float/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MulFloat2addr = { name: "mul-float/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	DivFloat2addr = { name: "div-float/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	RemFloat2addr = { name: "rem-float/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AddDouble2addr = { name: "add-double/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	SubDouble2addr = { name: "sub-double/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	MulDouble2addr = { name: "mul-double/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	DivDouble2addr = { name: "div-double/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	RemDouble2addr = { name: "rem-double/2addr", format: Format12x, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	AddIntLit16 = { name: "add-int/lit16", format: Format22s, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	RsubInt = { name: "rsub-int", format: Format22s, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MulIntLit16 = { name: "mul-int/lit16", format: Format22s, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	DivIntLit16 = { name: "div-int/lit16", format: Format22s, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	RemIntLit16 = { name: "rem-int/lit16", format: Format22s, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AndIntLit16 = { name: "and-int/lit16", format: Format22s, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	OrIntLit16 = { name: "or-int/lit16", format: Format22s, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	XorIntLit16 = { name: "xor-int/lit16", format: Format22s, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AddIntLit8 = { name: "add-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	RsubIntLit8 = { name: "rsub-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	MulIntLit8 = { name: "mul-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	DivIntLit8 = { name: "div-int/lit8", format: Format22b, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	RemIntLit8 = { name: "rem-int/lit8", format: Format22b, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	AndIntLit8 = { name: "and-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	OrIntLit8 = { name: "or-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	XorIntLit8 = { name: "xor-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ShlIntLit8 = { name: "shl-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ShrIntLit8 = { name: "shr-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	UshrIntLit8 = { name: "ushr-int/lit8", format: Format22b, flags: OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IgetVolatile = { name: "iget-volatile", format: Format22c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IputVolatile = { name: "iput-volatile", format: Format22c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	SgetVolatile = { name: "sget-volatile", format: Format21c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::StaticFieldAccessor },
	SputVolatile = { name: "sput-volatile", format: Format21c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	IgetObjectVolatile = { name: "iget-object-volatile", format: Format22c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	IgetWideVolatile = { name: "iget-wide-volatile", format: Format22c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister },
	IputWideVolatile = { name: "iput-wide-volatile", format: Format22c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	SgetWideVolatile = { name: "sget-wide-volatile", format: Format21c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::SetsWideRegister | OpcodeFlags::StaticFieldAccessor },
	SputWideVolatile = { name: "sput-wide-volatile", format: Format21c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	ThrowVerificationError = { name: "throw-verification-error", format: Format20bc, flags: OpcodeFlags::OdexOnly | OpcodeFlags::CanThrow },
	ExecuteInline = { name: "execute-inline", format: Format35mi, flags: OpcodeFlags::OdexOnly | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	ExecuteInlineRange = { name: "execute-inline/range", format: Format3rmi, flags: OpcodeFlags::OdexOnly | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeDirectEmpty = { name: "invoke-direct-empty", format: Format35c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult | OpcodeFlags::CanInitializeReference },
	InvokeObjectInitRange = { name: "invoke-object-init/range", format: Format3rc, flags: OpcodeFlags::OdexOnly | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult | OpcodeFlags::CanInitializeReference },
	ReturnVoidNoBarrier = { name: "return-void-no-barrier", format: Format10x, flags: OpcodeFlags::OdexOnly },
	InvokeSuperQuick = { name: "invoke-super-quick", format: Format35ms, flags: OpcodeFlags::OdexOnly | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeSuperQuickRange = { name: "invoke-super-quick/range", format: Format3rms, flags: OpcodeFlags::OdexOnly | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	IputObjectVolatile = { name: "iput-object-volatile", format: Format22c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue },
	SgetObjectVolatile = { name: "sget-object-volatile", format: Format21c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister | OpcodeFlags::StaticFieldAccessor },
	SputObjectVolatile = { name: "sput-object-volatile", format: Format21c, flags: OpcodeFlags::OdexOnly | OpcodeFlags::VolatileFieldAccessor | OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::StaticFieldAccessor },
	PackedSwitchPayload = { name: "packed-switch-payload", format: PackedSwitchPayload, flags: OpcodeFlags::empty() },
	SparseSwitchPayload = { name: "sparse-switch-payload", format: SparseSwitchPayload, flags: OpcodeFlags::empty() },
	ArrayPayload = { name: "array-payload", format: ArrayPayload, flags: OpcodeFlags::empty() },
	InvokePolymorphic = { name: "invoke-polymorphic", format: Format45cc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokePolymorphicRange = { name: "invoke-polymorphic/range", format: Format4rcc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeCustom = { name: "invoke-custom", format: Format35c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	InvokeCustomRange = { name: "invoke-custom/range", format: Format3rc, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsResult },
	ConstMethodHandle = { name: "const-method-handle", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
	ConstMethodType = { name: "const-method-type", format: Format21c, flags: OpcodeFlags::CanThrow | OpcodeFlags::CanContinue | OpcodeFlags::SetsRegister },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn looks_up_by_mnemonic() {
		assert_eq!(Opcode::from_name("move-result-object"), Some(Opcode::MoveResultObject));
		assert_eq!(Opcode::from_name("invoke-virtual/range"), Some(Opcode::InvokeVirtualRange));
		assert_eq!(Opcode::from_name("not-a-real-mnemonic"), None);
	}

	#[test]
	fn reports_format_and_flags() {
		assert_eq!(Opcode::ConstString.format(), Format::Format21c);
		assert!(Opcode::ConstString.flags().contains(OpcodeFlags::CanThrow));
		assert!(Opcode::Nop.flags().contains(OpcodeFlags::CanContinue));
		assert!(!Opcode::Nop.flags().contains(OpcodeFlags::CanThrow));
	}

	#[test]
	fn every_mnemonic_round_trips_through_name() {
		for mnemonic in ["nop", "return-void", "packed-switch-payload", "invoke-polymorphic/range"] {
			let opcode = Opcode::from_name(mnemonic).expect("known mnemonic");
			assert_eq!(opcode.name(), mnemonic);
		}
	}
}
