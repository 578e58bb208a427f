//! Integration tests for failing builds.
//!
//! A build either returns a complete model or the first error it ran into. These tests
//! cover the structural violations the builder rejects and the propagation of reader
//! failures through [`ModelBuilder::build_from`].

use std::io;

use cilgraph::prelude::*;

/// A reader that fails the way a real metadata reader would
enum FailingSource {
    Missing,
    Corrupt,
}

impl MetadataSource for FailingSource {
    fn read_module(&self) -> Result<RawModule> {
        match self {
            FailingSource::Missing => {
                Err(io::Error::new(io::ErrorKind::NotFound, "Acme.dll").into())
            }
            FailingSource::Corrupt => Err(Error::Source("invalid CLI header".to_string())),
        }
    }
}

/// A type with `depth` levels of nested types below it
fn factory_nested_chain(depth: usize) -> RawTypeDef {
    let mut current = RawTypeDef::new("", format!("Level{depth}"));
    for level in (1..depth).rev() {
        current = RawTypeDef::new("", format!("Level{level}")).with_nested(current);
    }
    RawTypeDef::new("Deep", "Root").with_nested(current)
}

#[test]
fn reader_errors_propagate() {
    let builder = ModelBuilder::new();

    let result = builder.build_from(&FailingSource::Missing);
    assert!(matches!(result, Err(Error::FileError(e)) if e.kind() == io::ErrorKind::NotFound));

    let result = builder.build_from(&FailingSource::Corrupt);
    assert!(matches!(result, Err(Error::Source(message)) if message == "invalid CLI header"));
}

#[test]
fn raw_module_is_its_own_source() -> Result<()> {
    let raw = RawModule::new("Acme.dll").with_type(RawTypeDef::new("Acme", "Widget"));
    let module = ModelBuilder::new().build_from(&raw)?;
    assert_eq!(module.name, "Acme.dll");
    assert!(module.find_type("Acme.Widget").is_some());
    Ok(())
}

#[test]
fn duplicate_fullnames_abort_the_build() {
    let raw = RawModule::new("Acme.dll")
        .with_type(RawTypeDef::new("Acme", "Widget"))
        .with_type(RawTypeDef::new("Other", "Widget"))
        .with_type(RawTypeDef::new("Acme", "Widget"));

    let result = ModelBuilder::new().build(&raw);
    assert!(matches!(result, Err(Error::DuplicateType(name)) if name == "Acme.Widget"));
}

#[test]
fn same_name_in_different_namespaces_is_fine() -> Result<()> {
    let raw = RawModule::new("Acme.dll")
        .with_type(RawTypeDef::new("Acme", "Widget"))
        .with_type(RawTypeDef::new("Other", "Widget"));

    let module = ModelBuilder::new().build(&raw)?;
    assert_eq!(module.index().get_by_name("Widget").len(), 2);
    Ok(())
}

#[test]
fn nesting_depth_is_limited() -> Result<()> {
    let raw = RawModule::new("Deep.dll").with_type(factory_nested_chain(3));

    let limited = BuildConfig {
        max_nesting_depth: 2,
        ..BuildConfig::default()
    };
    let result = ModelBuilder::with_config(limited).build(&raw);
    assert!(matches!(result, Err(Error::RecursionLimit(2))));

    let module = ModelBuilder::new().build(&raw)?;
    let leaf = module
        .find_type("Deep.Root+Level1+Level2+Level3")
        .expect("deepest type");
    assert_eq!(leaf.owner().expect("owner").name, "Root+Level1+Level2");
    Ok(())
}

#[test]
fn deep_nesting_within_the_default_limit() -> Result<()> {
    let raw = RawModule::new("Deep.dll").with_type(factory_nested_chain(64));

    let module = ModelBuilder::new().build(&raw)?;
    assert_eq!(module.stats().nested_types, 64);

    let too_deep = RawModule::new("Deep.dll").with_type(factory_nested_chain(65));
    assert!(matches!(
        ModelBuilder::new().build(&too_deep),
        Err(Error::RecursionLimit(64))
    ));
    Ok(())
}

#[test]
fn nested_definition_pointing_elsewhere_is_malformed() {
    let mut outer = RawTypeDef::new("Acme", "Outer");
    let mut stray = RawTypeDef::new("", "Stray").with_nested(RawTypeDef::new("", "Leaf"));
    stray.declaring_type = Some(RawTypeRef::new("Acme", "Unrelated"));
    stray.flags = TypeAttributes::NESTED_PUBLIC;
    outer.nested_types.push(stray);

    let result = ModelBuilder::new().build(&RawModule::new("Acme.dll").with_type(outer));
    assert!(matches!(result, Err(Error::Malformed { .. })));
}
