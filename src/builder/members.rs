//! Member stage: fields, events and methods.
//!
//! Runs per type once the skeleton exists, so declaring types and event types can be
//! resolved against the complete type index. Fields are created before events: creating an
//! event marks the same-named field of the type as the event's backing storage.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    builder::{context::BuildContext, BuildStage, StageId},
    metadata::{
        naming::{self, TypeDeclaration},
        raw::RawTypeDef,
    },
    model::{Event, Field, Method, TypeIndex, TypeRc},
    Result,
};

/// Populates the members of every type
pub(crate) struct MemberStage;

/// Resolve a member's declaring type; types outside the module resolve to `None`
fn declaring_type(index: &TypeIndex, decl: &dyn TypeDeclaration, member: &str) -> Option<TypeRc> {
    let resolved = index.resolve(decl);
    if resolved.is_none() {
        trace!(
            member,
            declaring_type = %naming::fullname(decl),
            "declaring type is not part of the module"
        );
    }
    resolved
}

fn populate_fields(index: &TypeIndex, def: &RawTypeDef, type_rc: &TypeRc) {
    for raw_field in &def.fields {
        let declaring = declaring_type(index, &raw_field.declaring_type, &raw_field.name);
        type_rc
            .fields
            .push(Arc::new(Field::new(&raw_field.name, type_rc, declaring.as_ref())));
    }
}

fn populate_events(index: &TypeIndex, def: &RawTypeDef, type_rc: &TypeRc) {
    for raw_event in &def.events {
        // The event type is looked up by the event's own name
        let event_type = index.find_by_name(&raw_event.name);
        type_rc
            .events
            .push(Arc::new(Event::new(&raw_event.name, type_rc, event_type.as_ref())));

        for field in type_rc.fields().filter(|field| field.name == raw_event.name) {
            field.mark_event();
        }
    }
}

fn populate_methods(index: &TypeIndex, def: &RawTypeDef, type_rc: &TypeRc) {
    for raw_method in &def.methods {
        let declaring = declaring_type(index, &raw_method.declaring_type, &raw_method.name);
        type_rc.methods.push(Arc::new(Method::new(
            naming::method_name(raw_method),
            &raw_method.name,
            raw_method.is_constructor(),
            type_rc,
            declaring.as_ref(),
        )));
    }
}

impl BuildStage for MemberStage {
    fn run(&self, context: &BuildContext) -> Result<()> {
        let index = context.module.index();

        context.for_each_type(|def, type_rc| {
            populate_fields(index, def, type_rc);
            populate_events(index, def, type_rc);
            populate_methods(index, def, type_rc);
            Ok(())
        })?;

        debug!(module = %context.raw.name, "members populated");
        Ok(())
    }

    fn id(&self) -> StageId {
        StageId::Members
    }

    fn dependencies(&self) -> &'static [StageId] {
        &[StageId::Skeleton]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{skeleton::SkeletonStage, BuildConfig},
        metadata::raw::{RawEvent, RawField, RawMethod, RawModule, RawTypeRef},
        model::Module,
        test::factories::event_module,
    };

    fn run_members(raw: &RawModule) -> Arc<Module> {
        let module = Module::new(&raw.name);
        let context = BuildContext::new(raw, BuildConfig::sequential(), module.clone());
        SkeletonStage.run(&context).unwrap();
        MemberStage.run(&context).unwrap();
        module
    }

    #[test]
    fn test_event_backing_field() {
        let module = run_members(&event_module());
        let button = module.find_type("Acme.UI.Button").unwrap();

        assert_eq!(button.fields().filter(|f| f.name == "Clicked").count(), 1);
        assert_eq!(button.events().filter(|e| e.name == "Clicked").count(), 1);
        assert!(button.find_field("Clicked").unwrap().is_event());
        assert!(!button.find_field("label").unwrap().is_event());
    }

    #[test]
    fn test_event_type_by_event_name() {
        let module = run_members(&event_module());
        let button = module.find_type("Acme.UI.Button").unwrap();

        // A type named like the event exists in the module
        let clicked = button.find_event("Clicked").unwrap();
        assert_eq!(clicked.event_type().unwrap().fullname(), "Acme.UI.Clicked");

        let hovered = button.find_event("Hovered").unwrap();
        assert!(hovered.event_type().is_none());
    }

    #[test]
    fn test_members_resolve_declaring_types() {
        let widget = RawTypeDef::new("Acme", "Widget");
        let external = RawTypeRef::new("System", "Object");
        let widget = widget
            .clone()
            .with_field(RawField::new(widget.to_ref(), "size"))
            .with_field(RawField::new(external.clone(), "inherited"))
            .with_event(RawEvent::new("Resized"))
            .with_method(RawMethod::new(
                widget.to_ref(),
                "Resize",
                ["System.Int32", "System.Int32"],
            ))
            .with_method(RawMethod::constructor(widget.to_ref(), Vec::<String>::new()))
            .with_method(RawMethod::new(external, "ToString", Vec::<String>::new()));

        let module = run_members(&RawModule::new("Acme.dll").with_type(widget));
        let widget = module.find_type("Acme.Widget").unwrap();

        let size = widget.find_field("size").unwrap();
        assert!(Arc::ptr_eq(&size.declaring_type().unwrap(), &widget));
        assert!(widget.find_field("inherited").unwrap().declaring_type().is_none());

        let resize = widget.find_method("Resize(System.Int32, System.Int32)").unwrap();
        assert!(!resize.is_constructor);
        assert!(Arc::ptr_eq(&resize.declaring_type().unwrap(), &widget));

        assert!(widget.find_method(".ctor()").unwrap().is_constructor);
        assert!(widget.find_method("ToString()").unwrap().declaring_type().is_none());
        assert!(widget.find_event("Resized").unwrap().event_type().is_none());
    }
}
