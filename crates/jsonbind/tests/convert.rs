use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonbind::convert::{
    BindingFactory, CamelCase, ConversionContext, ValueView, ValueViewCapability,
};
use jsonbind::{parse_str, render, ConversionError, Value};

#[derive(Debug, Default, PartialEq)]
struct Person {
    full_name: String,
    age: i64,
    email: Option<String>,
    tags: Vec<String>,
}

fn person_context(skip_null_values: bool) -> ConversionContext {
    let factory = BindingFactory::with_naming(Arc::new(CamelCase));
    factory.register::<Person, _>("Person", |set| {
        set.required(
            "full_name",
            |p: &Person| p.full_name.clone(),
            |p, v| p.full_name = v,
        )
        .required("age", |p: &Person| p.age, |p, v| p.age = v)
        .optional("email", |p: &Person| p.email.clone(), |p, v| p.email = v)
        .required("tags", |p: &Person| p.tags.clone(), |p, v| p.tags = v)
        .instantiate_default()
    });
    ConversionContext::builder()
        .bindings(Arc::new(factory))
        .skip_null_values(skip_null_values)
        .install_defaults()
        .build()
}

fn sample_person() -> Person {
    Person {
        full_name: "Ada Lovelace".to_owned(),
        age: 36,
        email: None,
        tags: vec!["math".to_owned(), "pioneer".to_owned()],
    }
}

#[test]
fn structs_serialize_with_the_naming_policy() {
    let ctx = person_context(false);
    let tree = ctx.serialize(&sample_person()).unwrap();
    assert_eq!(
        render(&tree),
        r#"{"fullName":"Ada Lovelace","age":36,"email":null,"tags":["math","pioneer"]}"#
    );
}

#[test]
fn skip_null_values_omits_null_members() {
    let ctx = person_context(true);
    let tree = ctx.serialize(&sample_person()).unwrap();
    assert_eq!(
        render(&tree),
        r#"{"fullName":"Ada Lovelace","age":36,"tags":["math","pioneer"]}"#
    );
}

#[test]
fn structs_round_trip_through_text() {
    let ctx = person_context(false);
    let person = Person {
        email: Some("ada@example.com".to_owned()),
        ..sample_person()
    };
    let text = render(&ctx.serialize(&person).unwrap());
    let rebuilt: Person = ctx.deserialize(&parse_str(&text).unwrap()).unwrap();
    assert_eq!(rebuilt, person);
}

#[test]
fn null_members_clear_optional_slots_only() {
    let ctx = person_context(false);
    let tree = parse_str(r#"{"fullName":null,"age":null,"email":null,"tags":["x"]}"#).unwrap();
    let rebuilt: Person = ctx.deserialize(&tree).unwrap();
    // Non-null slots keep their instantiated defaults; the optional slot
    // is explicitly cleared.
    assert_eq!(rebuilt.full_name, "");
    assert_eq!(rebuilt.age, 0);
    assert_eq!(rebuilt.email, None);
    assert_eq!(rebuilt.tags, vec!["x".to_owned()]);
}

#[test]
fn skip_null_values_does_not_apply_null_members_on_input() {
    #[derive(Debug, PartialEq)]
    struct Profile {
        nickname: Option<String>,
    }
    let factory = BindingFactory::new();
    factory.register::<Profile, _>("Profile", |set| {
        set.optional(
            "nickname",
            |p: &Profile| p.nickname.clone(),
            |p, v| p.nickname = v,
        )
        .instantiate_with(|| Profile {
            nickname: Some("anonymous".to_owned()),
        })
    });
    let ctx = ConversionContext::builder()
        .bindings(Arc::new(factory))
        .skip_null_values(true)
        .install_defaults()
        .build();
    let tree = parse_str(r#"{"nickname":null}"#).unwrap();
    let rebuilt: Profile = ctx.deserialize(&tree).unwrap();
    assert_eq!(rebuilt.nickname, Some("anonymous".to_owned()));
}

#[test]
fn missing_members_leave_slots_untouched() {
    let ctx = person_context(false);
    let tree = parse_str(r#"{"age":99}"#).unwrap();
    let rebuilt: Person = ctx.deserialize(&tree).unwrap();
    assert_eq!(rebuilt.age, 99);
    assert_eq!(rebuilt.full_name, "");
    assert!(rebuilt.tags.is_empty());
}

#[derive(Default)]
struct Node {
    name: String,
    next: Option<Rc<RefCell<Node>>>,
}

fn node_context() -> ConversionContext {
    let factory = BindingFactory::new();
    factory.register::<Rc<RefCell<Node>>, _>("Node", |set| {
        set.required(
            "name",
            |n: &Rc<RefCell<Node>>| n.borrow().name.clone(),
            |n, v| n.borrow_mut().name = v,
        )
        .optional(
            "next",
            |n: &Rc<RefCell<Node>>| n.borrow().next.clone(),
            |n, v| n.borrow_mut().next = v,
        )
        .identity(|n| Rc::as_ptr(n) as usize)
        .instantiate_with(|| Rc::new(RefCell::new(Node::default())))
    });
    ConversionContext::builder()
        .bindings(Arc::new(factory))
        .stop_at_cycles(true)
        .install_defaults()
        .build()
}

#[test]
fn cyclic_graphs_terminate_with_null() {
    let a = Rc::new(RefCell::new(Node {
        name: "a".to_owned(),
        next: None,
    }));
    let b = Rc::new(RefCell::new(Node {
        name: "b".to_owned(),
        next: Some(Rc::clone(&a)),
    }));
    a.borrow_mut().next = Some(Rc::clone(&b));

    let ctx = node_context();
    let tree = ctx.serialize(&a).unwrap();
    assert_eq!(
        render(&tree),
        r#"{"name":"a","next":{"name":"b","next":null}}"#
    );

    // Break the cycle so the Rc graph can drop.
    a.borrow_mut().next = None;
}

#[test]
fn shared_but_acyclic_values_serialize_twice() {
    let shared = Rc::new(RefCell::new(Node {
        name: "shared".to_owned(),
        next: None,
    }));
    let first = Rc::new(RefCell::new(Node {
        name: "first".to_owned(),
        next: Some(Rc::clone(&shared)),
    }));

    let ctx = node_context();
    let tree = ctx
        .serialize(&vec![Rc::clone(&first), Rc::clone(&shared)])
        .unwrap();
    // The shared node is not on its own ownership path, so it appears in
    // full both times.
    assert_eq!(
        render(&tree),
        r#"[{"name":"first","next":{"name":"shared","next":null}},{"name":"shared","next":null}]"#
    );
}

#[test]
fn string_keyed_maps_round_trip() {
    let factory = BindingFactory::new();
    factory.register_map::<String, i64>();
    let ctx = ConversionContext::builder()
        .bindings(Arc::new(factory))
        .install_defaults()
        .build();

    let mut map = BTreeMap::new();
    map.insert("alpha".to_owned(), 1i64);
    map.insert("beta".to_owned(), 2i64);
    let tree = ctx.serialize(&map).unwrap();
    assert_eq!(render(&tree), r#"{"alpha":1,"beta":2}"#);
    let rebuilt: BTreeMap<String, i64> = ctx.deserialize(&tree).unwrap();
    assert_eq!(rebuilt, map);
}

#[test]
fn integer_keyed_maps_round_trip_through_member_names() {
    let factory = BindingFactory::new();
    factory.register_map::<i64, String>();
    let ctx = ConversionContext::builder()
        .bindings(Arc::new(factory))
        .install_defaults()
        .build();

    let mut map = BTreeMap::new();
    map.insert(1i64, "one".to_owned());
    map.insert(-2i64, "minus two".to_owned());
    let tree = ctx.serialize(&map).unwrap();
    assert_eq!(render(&tree), r#"{"-2":"minus two","1":"one"}"#);
    let rebuilt: BTreeMap<i64, String> = ctx.deserialize(&tree).unwrap();
    assert_eq!(rebuilt, map);
}

#[derive(Debug, Default, PartialEq)]
struct Event {
    label: String,
    at: Option<DateTime<Utc>>,
}

#[test]
fn timestamps_embed_in_structs() {
    let factory = BindingFactory::new();
    factory.register::<Event, _>("Event", |set| {
        set.required("label", |e: &Event| e.label.clone(), |e, v| e.label = v)
            .optional("at", |e: &Event| e.at, |e, v| e.at = v)
            .instantiate_default()
    });
    let ctx = ConversionContext::builder()
        .bindings(Arc::new(factory))
        .install_defaults()
        .build();

    let event = Event {
        label: "launch".to_owned(),
        at: DateTime::from_timestamp_millis(1_700_000_000_000),
    };
    let tree = ctx.serialize(&event).unwrap();
    assert_eq!(
        render(&tree),
        r#"{"label":"launch","at":"2023-11-14T22:13:20+00:00"}"#
    );
    let rebuilt: Event = ctx.deserialize(&tree).unwrap();
    assert_eq!(rebuilt, event);
}

#[derive(Clone, Default)]
struct Opaque;

#[derive(Default)]
struct Holder {
    name: String,
    gadget: Opaque,
}

#[test]
fn unconvertible_properties_are_skipped_not_fatal() {
    let factory = BindingFactory::new();
    factory.register::<Holder, _>("Holder", |set| {
        set.required("name", |h: &Holder| h.name.clone(), |h, v| h.name = v)
            .read_only("gadget", |h: &Holder| h.gadget.clone())
            .instantiate_default()
    });
    let ctx = ConversionContext::builder()
        .bindings(Arc::new(factory))
        .install_defaults()
        .build();

    let holder = Holder {
        name: "kept".to_owned(),
        gadget: Opaque,
    };
    // Opaque has no serializer, so its property is dropped while the rest
    // of the object still converts.
    let tree = ctx.serialize(&holder).unwrap();
    assert_eq!(render(&tree), r#"{"name":"kept"}"#);
}

#[test]
fn unconvertible_members_are_skipped_on_input() {
    let ctx = person_context(false);
    let tree = parse_str(r#"{"fullName":"kept","age":"not a number","tags":[true]}"#).unwrap();
    // Members whose values fail to convert are dropped; the rest of the
    // object still populates.
    let rebuilt: Person = ctx.deserialize(&tree).unwrap();
    assert_eq!(rebuilt.full_name, "kept");
    assert_eq!(rebuilt.age, 0);
    assert!(rebuilt.tags.is_empty());
}

#[derive(Debug)]
struct RawDocument(Value);

impl ValueView for RawDocument {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        if value.as_object().is_some() {
            Ok(RawDocument(value))
        } else {
            Err(ConversionError::message("expected an object document"))
        }
    }

    fn to_value(&self) -> Value {
        self.0.clone()
    }
}

#[test]
fn value_views_interpret_documents_lazily() {
    let ctx = ConversionContext::builder()
        .register(Arc::new(ValueViewCapability::<RawDocument>::new()))
        .install_defaults()
        .build();

    let tree = parse_str(r#"{"anything":["goes",1,null]}"#).unwrap();
    let document: RawDocument = ctx.deserialize(&tree).unwrap();
    assert_eq!(document.to_value(), tree);
    assert_eq!(ctx.serialize(&document).unwrap(), tree);

    let error = ctx.deserialize::<RawDocument>(&Value::from(1)).unwrap_err();
    assert_eq!(error.to_string(), "expected an object document");
}

#[test]
fn one_context_serves_many_concurrent_conversions() {
    let ctx = Arc::new(person_context(false));
    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || {
                let person = Person {
                    full_name: format!("worker-{i}"),
                    age: i,
                    email: None,
                    tags: Vec::new(),
                };
                let tree = ctx.serialize(&person).unwrap();
                let rebuilt: Person = ctx.deserialize(&tree).unwrap();
                assert_eq!(rebuilt, person);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
