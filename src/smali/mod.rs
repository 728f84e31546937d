//! Structural layer: lexical reading, label interning, the Dalvik
//! opcode/format tables, parsed instructions, directives, and the
//! class/field/method member model built on top of them.

pub mod directive;
pub mod format;
pub mod instruction;
pub mod labels;
pub mod members;
pub mod opcode;
pub mod parser;
pub mod reader;
pub mod utils;

pub use format::Format;
pub use instruction::{Instruction, Operands, Reg};
pub use labels::{Label, LabelId, LabelsContext};
pub use members::{Class, Field, Method};
pub use opcode::{Opcode, OpcodeFlags};
pub use reader::Reader;
