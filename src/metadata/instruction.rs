//! Decoded instructions and their operands.
//!
//! A reader hands over each method body as a list of [`RawInstruction`]s. An operand is
//! either a terminal value (a member or type reference, an immediate, a string, a local or
//! argument slot) or another instruction, e.g. the target of a branch. The usage resolver
//! is only interested in the terminal value at the end of such a chain, see
//! [`RawInstruction::terminal_operand`].
//!
//! Instructions are shared through [`Arc`] and immutable once created, so an operand chain
//! can only ever point at instructions that existed before it and can never loop.
//!
//! # Examples
//!
//! ```rust
//! use cilgraph::metadata::instruction::{RawInstruction, RawOperand};
//! use cilgraph::metadata::raw::{RawMethodRef, RawTypeRef};
//!
//! let target = RawMethodRef::new(RawTypeRef::new("Acme", "Widget"), "Run", Vec::<String>::new());
//! let call = RawInstruction::new(0x10, "call", Some(RawOperand::Method(target)));
//! let branch = RawInstruction::new(0x00, "br.s", Some(RawOperand::Instruction(call)));
//!
//! assert!(matches!(branch.terminal_operand(), Some(RawOperand::Method(_))));
//! ```

use std::{fmt, sync::Arc};

use crate::metadata::raw::{RawFieldRef, RawMethodRef, RawTypeRef};

/// Reference to a [`RawInstruction`]
pub type RawInstructionRc = Arc<RawInstruction>;

/// Immediate value embedded in an instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum Immediate {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Immediate::Int8(value) => write!(f, "{value}"),
            Immediate::UInt8(value) => write!(f, "{value}"),
            Immediate::Int16(value) => write!(f, "{value}"),
            Immediate::UInt16(value) => write!(f, "{value}"),
            Immediate::Int32(value) => write!(f, "{value}"),
            Immediate::UInt32(value) => write!(f, "{value}"),
            Immediate::Int64(value) => write!(f, "{value}"),
            Immediate::UInt64(value) => write!(f, "{value}"),
            Immediate::Float32(value) => write!(f, "{value}"),
            Immediate::Float64(value) => write!(f, "{value}"),
        }
    }
}

/// The operand of a decoded instruction.
#[derive(Debug, Clone)]
pub enum RawOperand {
    /// Another instruction (branch target or forwarded operand)
    Instruction(RawInstructionRc),
    /// A method reference (`call`, `callvirt`, `newobj`, `ldftn`, ...)
    Method(RawMethodRef),
    /// A field reference (`ldfld`, `stfld`, `ldsflda`, ...)
    Field(RawFieldRef),
    /// A type reference (`newarr`, `castclass`, `ldtoken`, ...)
    Type(RawTypeRef),
    /// Immediate value
    Immediate(Immediate),
    /// User string literal (`ldstr`)
    String(String),
    /// Local variable index
    Local(u16),
    /// Method argument index
    Argument(u16),
}

impl RawOperand {
    /// `true` if this operand forwards to another instruction
    #[must_use]
    pub fn is_instruction(&self) -> bool {
        matches!(self, RawOperand::Instruction(_))
    }
}

/// A single decoded instruction.
#[derive(Debug, Clone)]
pub struct RawInstruction {
    /// Offset of the instruction within the method body
    pub offset: u64,
    /// Human-readable instruction mnemonic (e.g. "call", "ldfld", "ret")
    pub mnemonic: &'static str,
    /// The operand, `None` for operand-less instructions
    pub operand: Option<RawOperand>,
}

impl RawInstruction {
    /// Create a new shared instruction
    #[must_use]
    pub fn new(
        offset: u64,
        mnemonic: &'static str,
        operand: Option<RawOperand>,
    ) -> RawInstructionRc {
        Arc::new(RawInstruction {
            offset,
            mnemonic,
            operand,
        })
    }

    /// Follows the operand chain to its terminal, non-instruction operand.
    ///
    /// Returns `None` if this instruction, or any instruction the chain passes through, has
    /// no operand. Chains cannot contain cycles (see the module documentation), so the walk
    /// always terminates.
    #[must_use]
    pub fn terminal_operand(&self) -> Option<&RawOperand> {
        let mut operand = self.operand.as_ref()?;
        while let RawOperand::Instruction(next) = operand {
            operand = next.operand.as_ref()?;
        }
        Some(operand)
    }
}

impl fmt::Display for RawInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IL_{:04x}: {}", self.offset, self.mnemonic)?;
        match &self.operand {
            None => Ok(()),
            Some(RawOperand::Instruction(target)) => write!(f, " IL_{:04x}", target.offset),
            Some(RawOperand::Method(method)) => write!(
                f,
                " {}::{}({})",
                method.declaring_type.name,
                method.name,
                method.params.join(", ")
            ),
            Some(RawOperand::Field(field)) => {
                write!(f, " {}::{}", field.declaring_type.name, field.name)
            }
            Some(RawOperand::Type(type_ref)) => write!(f, " {}", type_ref.name),
            Some(RawOperand::Immediate(value)) => write!(f, " {value}"),
            Some(RawOperand::String(value)) => write!(f, " {value:?}"),
            Some(RawOperand::Local(index)) => write!(f, " V_{index}"),
            Some(RawOperand::Argument(index)) => write!(f, " A_{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_ref() -> RawFieldRef {
        RawFieldRef::new(RawTypeRef::new("Acme", "Widget"), "size")
    }

    #[test]
    fn test_terminal_operand_direct() {
        let instruction = RawInstruction::new(0, "ldfld", Some(RawOperand::Field(field_ref())));
        match instruction.terminal_operand() {
            Some(RawOperand::Field(field)) => assert_eq!(field.name, "size"),
            other => panic!("unexpected operand {other:?}"),
        }
    }

    #[test]
    fn test_terminal_operand_chain() {
        let i3 = RawInstruction::new(3, "ldfld", Some(RawOperand::Field(field_ref())));
        let i2 = RawInstruction::new(2, "br.s", Some(RawOperand::Instruction(i3.clone())));
        let i1 = RawInstruction::new(1, "br.s", Some(RawOperand::Instruction(i2.clone())));

        let terminal = i1.terminal_operand().unwrap();
        assert!(!terminal.is_instruction());
        assert!(matches!(terminal, RawOperand::Field(field) if field.name == "size"));
    }

    #[test]
    fn test_terminal_operand_absent() {
        let ret = RawInstruction::new(0, "ret", None);
        assert!(ret.terminal_operand().is_none());

        let branch = RawInstruction::new(1, "br.s", Some(RawOperand::Instruction(ret)));
        assert!(branch.terminal_operand().is_none());
    }

    #[test]
    fn test_terminal_operand_primitive() {
        let five = Some(RawOperand::Immediate(Immediate::Int8(5)));
        let ldc = RawInstruction::new(0, "ldc.i4.s", five);
        assert!(matches!(
            ldc.terminal_operand(),
            Some(RawOperand::Immediate(Immediate::Int8(5)))
        ));
    }

    #[test]
    fn test_display() {
        let ldfld = RawInstruction::new(0x12, "ldfld", Some(RawOperand::Field(field_ref())));
        assert_eq!(ldfld.to_string(), "IL_0012: ldfld Widget::size");

        let ret = RawInstruction::new(0x13, "ret", None);
        assert_eq!(ret.to_string(), "IL_0013: ret");
    }
}
