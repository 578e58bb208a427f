pub mod factories;

use crate::metadata::{
    instruction::{RawInstruction, RawInstructionRc, RawOperand},
    raw::{RawFieldRef, RawMethodRef, RawTypeRef},
};

/// Builds an instruction stream with consecutive offsets
#[derive(Default)]
pub struct BodyBuilder {
    instructions: Vec<RawInstructionRc>,
    offset: u64,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, mnemonic: &'static str, operand: Option<RawOperand>) -> Self {
        self.instructions
            .push(RawInstruction::new(self.offset, mnemonic, operand));
        self.offset += 5;
        self
    }

    pub fn call(self, declaring_type: &RawTypeRef, name: &str, params: &[&str]) -> Self {
        let target = RawMethodRef::new(declaring_type.clone(), name, params.iter().copied());
        self.push("call", Some(RawOperand::Method(target)))
    }

    pub fn ldfld(self, declaring_type: &RawTypeRef, name: &str) -> Self {
        let target = RawFieldRef::new(declaring_type.clone(), name);
        self.push("ldfld", Some(RawOperand::Field(target)))
    }

    pub fn ldtoken(self, type_ref: &RawTypeRef) -> Self {
        self.push("ldtoken", Some(RawOperand::Type(type_ref.clone())))
    }

    pub fn ret(self) -> Self {
        self.push("ret", None)
    }

    pub fn build(self) -> Vec<RawInstructionRc> {
        self.instructions
    }
}
