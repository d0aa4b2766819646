//! Integration tests for the population engine

use anyhow::Result;
use fixture_core::{field, DeclaredType, ObjectValue, TypeSchema, Value};
use fixture_populator::{
    constant, randomizer_fn, FixtureError, PopulateOptions, Populator, StaticTypeResolver,
};
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for tests
fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

const SCHEMA: &str = r#"
types:
  - name: Node
    fields:
      - name: value
        type: int32
      - name: children
        type:
          type: list
          element: Node

  - name: EmailAddress
    fields:
      - name: local
        type: string
      - name: domain
        type: string

  - name: Address
    fields:
      - name: street
        type: string
      - name: city
        type: string
      - name: zip
        type: uint32

  - name: Person
    fields:
      - name: id
        type: int64
      - name: name
        type: string
      - name: nickname
        type: string
      - name: email
        type: EmailAddress
      - name: address
        type: Address
      - name: birthday
        type: date
      - name: tags
        type:
          type: list
          element: string
      - name: best_friend
        type: Person
      - name: friends
        type:
          type: list
          element: Person

  - name: Shape
    kind: abstract
    fields:
      - name: label
        type: string

  - name: Circle
    extends: Shape
    fields:
      - name: radius
        type: float64

  - name: Square
    extends: Shape
    fields:
      - name: side
        type: float64

  - name: Drawing
    fields:
      - name: shape
        type: Shape
"#;

fn schema() -> TypeSchema {
    TypeSchema::from_yaml(SCHEMA).unwrap()
}

fn elements<'a>(value: &'a Value, field: &str) -> &'a [Value] {
    value
        .get_field(field)
        .and_then(Value::as_elements)
        .unwrap_or_else(|| panic!("field '{field}' is not a container"))
}

#[test]
fn test_node_depth_and_collection_size() -> Result<()> {
    init_logging();
    let mut populator = Populator::builder(schema())
        .seed(42)
        .collection_size_range(2, 2)
        .max_randomization_depth(1)
        .build()?;

    let node = populator.populate("Node")?;
    let children = elements(&node, "children");
    assert_eq!(children.len(), 2);
    for child in children {
        assert!(elements(child, "children").is_empty());
        assert_eq!(child.get_field("value"), Some(&Value::Int32(0)));
    }
    Ok(())
}

#[test]
fn test_field_randomizer() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .randomize(field().named("id").of_type(DeclaredType::Int64), constant(42i64))?
        .build()?;

    let person = populator.populate("Person")?;
    assert_eq!(person.get_field("id"), Some(&Value::Int64(42)));
    Ok(())
}

#[test]
fn test_excluded_type_keeps_default() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .exclude_type(DeclaredType::named("EmailAddress"))
        .build()?;

    let person = populator.populate("Person")?;
    assert_eq!(person.get_field("email"), Some(&Value::Null));
    assert!(matches!(person.get_field("address"), Some(Value::Object(_))));
    Ok(())
}

#[test]
fn test_exact_collection_size() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .collection_size_range(3, 3)
        .build()?;

    let person = populator.populate("Person")?;
    assert_eq!(elements(&person, "tags").len(), 3);
    assert_eq!(elements(&person, "friends").len(), 3);
    Ok(())
}

#[test]
fn test_same_seed_same_graph() -> Result<()> {
    let mut first = Populator::builder(schema()).seed(7).build()?;
    let mut second = Populator::builder(schema()).seed(7).build()?;
    assert_eq!(first.populate("Person")?, second.populate("Person")?);
    assert_eq!(first.populate("Node")?, second.populate("Node")?);

    let mut other = Populator::builder(schema()).seed(8).build()?;
    let mut reference = Populator::builder(schema()).seed(7).build()?;
    assert_ne!(other.populate("Person")?, reference.populate("Person")?);
    Ok(())
}

#[test]
fn test_self_referential_type_terminates() -> Result<()> {
    init_logging();
    let mut populator = Populator::builder(schema()).seed(42).build()?;

    let person = populator.populate("Person")?;
    let friend = person.get_field("best_friend").and_then(Value::as_object);
    assert_eq!(friend.map(|f| f.type_name.as_str()), Some("Person"));
    Ok(())
}

#[test]
fn test_depth_limit_stops_self_reference() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .max_randomization_depth(3)
        .max_object_pool_size(0)
        .collection_size_range(1, 1)
        .build()?;

    let mut person = populator.populate("Person")?;
    let mut levels = 0;
    while let Some(friend) = person
        .get_field("best_friend")
        .filter(|friend| !friend.is_null())
        .cloned()
    {
        person = friend;
        levels += 1;
    }
    assert_eq!(levels, 3);
    Ok(())
}

#[test]
fn test_plain_type_fields_are_not_default() -> Result<()> {
    let mut populator = Populator::builder(schema()).seed(42).build()?;
    let address = populator.populate("Address")?;
    let address = address.as_object().unwrap();

    assert!(!address.get("street").unwrap().is_default_for(&DeclaredType::String));
    assert!(!address.get("city").unwrap().is_default_for(&DeclaredType::String));
    assert!(!address.get("zip").unwrap().is_default_for(&DeclaredType::UInt32));
    Ok(())
}

#[test]
fn test_field_randomizer_beats_type_randomizer() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .randomize_type(DeclaredType::String, constant("from type"))
        .randomize(
            field().named("name").in_type("Person").of_type(DeclaredType::String),
            constant("from field"),
        )?
        .build()?;

    let person = populator.populate("Person")?;
    assert_eq!(person.get_field("name"), Some(&Value::from("from field")));
    assert_eq!(person.get_field("nickname"), Some(&Value::from("from type")));
    for tag in elements(&person, "tags") {
        assert_eq!(tag, &Value::from("from type"));
    }
    Ok(())
}

#[test]
fn test_abstract_field_without_scanning() -> Result<()> {
    let mut populator = Populator::builder(schema()).seed(42).build()?;

    let drawing = populator.populate("Drawing")?;
    assert_eq!(drawing.get_field("shape"), Some(&Value::Null));

    let err = populator.populate("Shape").unwrap_err();
    assert!(matches!(err, FixtureError::ObjectGeneration { .. }));
    Ok(())
}

#[test]
fn test_abstract_field_with_scanning() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .scan_for_concrete_types(true)
        .build()?;

    let mut seen = std::collections::HashSet::new();
    for _ in 0..30 {
        let drawing = populator.populate("Drawing")?;
        let shape = drawing.get_field("shape").and_then(Value::as_object).unwrap();
        assert!(shape.get("label").is_some());
        seen.insert(shape.type_name.clone());
    }
    assert!(seen.contains("Circle"));
    assert!(seen.contains("Square"));

    let shape = populator.populate("Shape")?;
    assert!(matches!(shape, Value::Object(ref o) if o.type_name != "Shape"));
    Ok(())
}

#[test]
fn test_static_type_resolver() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .scan_for_concrete_types(true)
        .with_type_resolver(StaticTypeResolver::new().register("Shape", "Square"))
        .build()?;

    for _ in 0..5 {
        let drawing = populator.populate("Drawing")?;
        let shape = drawing.get_field("shape").and_then(Value::as_object).unwrap();
        assert_eq!(shape.type_name, "Square");
    }
    Ok(())
}

#[test]
fn test_pool_reuses_instances() -> Result<()> {
    let schema = TypeSchema::from_yaml(
        r#"
types:
  - name: Item
    fields:
      - name: sku
        type: int64
  - name: Basket
    fields:
      - name: items
        type:
          type: list
          element: Item
"#,
    )?;

    let mut pooled = Populator::builder(schema.clone())
        .seed(42)
        .max_object_pool_size(1)
        .collection_size_range(4, 4)
        .build()?;
    let basket = pooled.populate("Basket")?;
    let items = elements(&basket, "items");
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|item| item == &items[0]));

    let mut unpooled = Populator::builder(schema)
        .seed(42)
        .max_object_pool_size(0)
        .collection_size_range(4, 4)
        .build()?;
    let basket = unpooled.populate("Basket")?;
    let items = elements(&basket, "items");
    assert!(items.iter().skip(1).any(|item| item != &items[0]));
    Ok(())
}

fn count_nodes(node: &Value) -> usize {
    let children = node
        .get_field("children")
        .and_then(Value::as_elements)
        .unwrap_or_default();
    1 + children.iter().map(count_nodes).sum::<usize>()
}

#[test]
fn test_pool_bounds_tree_with_excluded_paths() -> Result<()> {
    init_logging();
    let build = || {
        Populator::builder(schema())
            .seed(42)
            .max_randomization_depth(11)
            .collection_size_range(3, 3)
            .build()
    };

    let plain = count_nodes(&build()?.populate("Node")?);
    let unrelated = count_nodes(
        &build()?.populate_with("Node", &PopulateOptions::new().exclude_path("nothing.here"))?,
    );
    assert_eq!(plain, unrelated);
    assert!(unrelated < 1000, "tree grew to {unrelated} nodes");

    let node = build()?.populate_with("Node", &PopulateOptions::new().exclude_path("children.value"))?;
    assert!(count_nodes(&node) < 1000);
    for child in elements(&node, "children") {
        assert_eq!(child.get_field("value"), Some(&Value::Int32(0)));
    }
    Ok(())
}

#[test]
fn test_override_default_initialization() -> Result<()> {
    let schema = TypeSchema::from_yaml(
        r#"
types:
  - name: Account
    fields:
      - name: currency
        type: string
        default: EUR
      - name: balance
        type: int64
"#,
    )?;

    let mut keep = Populator::builder(schema.clone()).seed(1).build()?;
    let account = keep.populate("Account")?;
    assert_eq!(account.get_field("currency"), Some(&Value::from("EUR")));

    let mut overwrite = Populator::builder(schema)
        .seed(1)
        .override_default_initialization(true)
        .min_string_length(5)
        .build()?;
    let account = overwrite.populate("Account")?;
    assert_ne!(account.get_field("currency"), Some(&Value::from("EUR")));
    Ok(())
}

#[test]
fn test_populate_existing_instance() -> Result<()> {
    let mut populator = Populator::builder(schema()).seed(42).build()?;
    let partial = ObjectValue::new("Address").with_field("city", "Paris");

    let address = populator.populate_instance(partial)?;
    assert_eq!(address.get("city"), Some(&Value::from("Paris")));
    assert!(!address.get("street").unwrap().is_default_for(&DeclaredType::String));
    Ok(())
}

#[test]
fn test_excluded_paths() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .max_randomization_depth(2)
        .build()?;
    let options = PopulateOptions::new()
        .exclude_path("address.zip")
        .exclude_path("name");

    let person = populator.populate_with("Person", &options)?;
    assert_eq!(person.get_field("name"), Some(&Value::from("")));
    let address = person.get_field("address").unwrap();
    assert_eq!(address.get_field("zip"), Some(&Value::UInt32(0)));
    assert_ne!(address.get_field("city"), Some(&Value::from("")));
    Ok(())
}

#[test]
fn test_randomizer_context_drives_values() -> Result<()> {
    let mut populator = Populator::builder(schema())
        .seed(42)
        .randomize(
            field().named("value").of_type(DeclaredType::Int32),
            randomizer_fn(|ctx| Value::Int32(ctx.rng.random_range(100..200))),
        )?
        .max_randomization_depth(2)
        .build()?;

    let node = populator.populate("Node")?;
    let value = node.get_field("value").and_then(Value::as_i64).unwrap();
    assert!((100..200).contains(&value));
    for child in elements(&node, "children") {
        let value = child.get_field("value").and_then(Value::as_i64).unwrap();
        assert!((100..200).contains(&value));
    }
    Ok(())
}

#[test]
fn test_date_range_parameter() -> Result<()> {
    let min = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let max = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let mut populator = Populator::builder(schema())
        .seed(42)
        .date_range(min, max)
        .build()?;

    for person in populator.populate_many("Person", 5) {
        match person?.get_field("birthday") {
            Some(Value::Date(date)) => assert!(*date >= min && *date <= max),
            other => panic!("Expected a date, got {other:?}"),
        }
    }
    Ok(())
}

#[derive(Debug, serde::Deserialize)]
struct Address {
    street: String,
    city: String,
    zip: u32,
}

#[test]
fn test_populate_as_rust_type() -> Result<()> {
    let mut populator = Populator::builder(schema()).seed(42).build()?;
    let address: Address = populator.populate_as("Address")?;
    assert!(!address.street.is_empty());
    assert!(!address.city.is_empty());
    let _ = address.zip;
    Ok(())
}
