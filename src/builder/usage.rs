//! Usage stage: type, method and field usage edges.
//!
//! Walks the instruction stream of every method with a body and resolves the terminal
//! operand of each instruction against the finished model:
//!
//! - A **method reference** records its declaring type as a type use. The call target
//!   itself is only recorded as a method use if it belongs to the calling method's own type.
//! - A **field reference** records the same-named field of the calling method's own type.
//! - A **type reference** records the type, if [`crate::BuildConfig::record_type_operands`]
//!   is set.
//!
//! References that do not resolve (members of types outside the module, members that do
//! not exist) produce no edge and are not an error.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    builder::{context::BuildContext, BuildConfig, BuildStage, StageId},
    metadata::{
        instruction::{RawInstructionRc, RawOperand},
        naming,
        raw::RawTypeDef,
    },
    model::{MethodUses, TypeIndex, TypeRc},
    Result,
};

/// Resolves the usage edges of every method
pub(crate) struct UsageStage;

/// Collect the usage edges of a method of `owner` from its instruction stream.
pub(crate) fn collect_uses(
    index: &TypeIndex,
    config: &BuildConfig,
    owner: &TypeRc,
    instructions: &[RawInstructionRc],
) -> MethodUses {
    let mut uses = MethodUses::new();

    for instruction in instructions {
        let Some(operand) = instruction.terminal_operand() else {
            continue;
        };

        match operand {
            RawOperand::Method(method_ref) => {
                let Some(target_type) = index.resolve(&method_ref.declaring_type) else {
                    trace!(%instruction, "call target outside the module");
                    continue;
                };
                uses.add_type(&target_type);

                if !Arc::ptr_eq(&target_type, owner) {
                    continue;
                }
                match target_type.find_method(&naming::method_name(method_ref)) {
                    Some(target) => {
                        uses.add_method(&target);
                    }
                    None => trace!(%instruction, "call target not found on {}", target_type),
                }
            }
            RawOperand::Field(field_ref) => match owner.find_field(&field_ref.name) {
                Some(field) => {
                    uses.add_field(&field);
                }
                None => trace!(%instruction, "field is not a member of {}", owner),
            },
            RawOperand::Type(type_ref) if config.record_type_operands => {
                match index.resolve(type_ref) {
                    Some(type_rc) => {
                        uses.add_type(&type_rc);
                    }
                    None => trace!(%instruction, "type outside the module"),
                }
            }
            _ => {}
        }
    }

    uses
}

/// Resolve and publish the edges of all methods of `type_rc`
fn resolve_type(context: &BuildContext, def: &RawTypeDef, type_rc: &TypeRc) -> Result<()> {
    let index = context.module.index();

    // Methods were created in declaration order, one per raw method
    for (position, raw_method) in def.methods.iter().enumerate() {
        let Some(instructions) = raw_method.instructions() else {
            continue;
        };

        let Some(method) = type_rc.methods.get(position) else {
            return Err(malformed_error!(
                "{} has no method at position {} ({})",
                type_rc,
                position,
                raw_method.name
            ));
        };

        method.set_uses(collect_uses(index, &context.config, type_rc, instructions))?;
    }

    Ok(())
}

impl BuildStage for UsageStage {
    fn run(&self, context: &BuildContext) -> Result<()> {
        context.for_each_type(|def, type_rc| resolve_type(context, def, type_rc))?;

        debug!(module = %context.raw.name, "usage edges resolved");
        Ok(())
    }

    fn id(&self) -> StageId {
        StageId::Usage
    }

    fn dependencies(&self) -> &'static [StageId] {
        &[StageId::Skeleton, StageId::Members]
    }
}
