//! Canned raw modules shared by the unit tests of the builder stages.

use crate::{
    metadata::raw::{RawEvent, RawField, RawMethod, RawModule, RawTypeDef, RawTypeRef},
    test::BodyBuilder,
};

/// Three types in `Acme`:
///
/// - `A` with field `count`; `a()` calls `B.b()` and `A.a2()`, reads `A.count` and
///   `B.total`; `a2()` loads a token of `C`
/// - `B` with field `total`, `b()` with a body and `Describe()` without one
/// - `C` without members
pub fn calling_module() -> RawModule {
    let a_ref = RawTypeRef::new("Acme", "A");
    let b_ref = RawTypeRef::new("Acme", "B");
    let c_ref = RawTypeRef::new("Acme", "C");

    let a = RawTypeDef::new("Acme", "A")
        .with_field(RawField::new(a_ref.clone(), "count"))
        .with_method(
            RawMethod::new(a_ref.clone(), "a", Vec::<String>::new()).with_body(
                BodyBuilder::new()
                    .call(&b_ref, "b", &[])
                    .call(&a_ref, "a2", &[])
                    .ldfld(&a_ref, "count")
                    .ldfld(&b_ref, "total")
                    .ret()
                    .build(),
            ),
        )
        .with_method(
            RawMethod::new(a_ref.clone(), "a2", Vec::<String>::new())
                .with_body(BodyBuilder::new().ldtoken(&c_ref).ret().build()),
        );

    let b = RawTypeDef::new("Acme", "B")
        .with_field(RawField::new(b_ref.clone(), "total"))
        .with_method(
            RawMethod::new(b_ref.clone(), "b", Vec::<String>::new())
                .with_body(BodyBuilder::new().ldfld(&b_ref, "total").ret().build()),
        )
        .with_method(RawMethod::new(b_ref, "Describe", Vec::<String>::new()));

    RawModule::new("Acme.dll")
        .with_type(RawTypeDef::new("", "<Module>"))
        .with_type(a)
        .with_type(b)
        .with_type(RawTypeDef::new("Acme", "C"))
}

/// `Acme.UI.Button` with the field-backed event `Clicked`, a plain event `Hovered` and a
/// field `label`; plus a type `Acme.UI.Clicked` named like the event.
pub fn event_module() -> RawModule {
    let button_ref = RawTypeRef::new("Acme.UI", "Button");

    let button = RawTypeDef::new("Acme.UI", "Button")
        .with_field(RawField::new(button_ref.clone(), "label"))
        .with_field(RawField::new(button_ref, "Clicked"))
        .with_event(RawEvent::new("Clicked"))
        .with_event(RawEvent::new("Hovered"));

    RawModule::new("Acme.UI.dll")
        .with_type(button)
        .with_type(RawTypeDef::new("Acme.UI", "Clicked"))
}

/// A type in `namespace` with `depth` levels of nested types below it
pub fn nested_chain(namespace: &str, depth: usize) -> RawTypeDef {
    let mut current = RawTypeDef::new("", format!("Level{depth}"));
    for level in (1..depth).rev() {
        current = RawTypeDef::new("", format!("Level{level}")).with_nested(current);
    }

    if depth == 0 {
        return RawTypeDef::new(namespace, "Root");
    }
    RawTypeDef::new(namespace, "Root").with_nested(current)
}
