//! Behavior of planned accessors, exercised through the plan evaluator.

use std::collections::BTreeMap;

use accessory::{AccessorError, Value, XmlDocument};
use accessory_define::{Attribute, Model, Struct};
use accessory_gen::eval::{EvalError, Evaluator, Returned};
use accessory_gen::options::GeneratorOptions;
use accessory_gen::planner::plan_model;
use accessory_gen::test_utils::{
    address_document, get, paint_model, person_model, plan_of, plan_with,
};

fn rejection(result: Result<Returned, EvalError>) -> String {
    match result {
        Err(EvalError::Accessor(AccessorError::InvalidArgument { message })) => message,
        other => panic!("expected an invalid argument, got {other:?}"),
    }
}

// === Person ===

#[test]
fn person_scenario() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);

    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();
    assert_eq!(get(&evaluator, &mut person, "getId", vec![]), Value::from(1));
    assert_eq!(get(&evaluator, &mut person, "getTags", vec![]), Value::List(vec![]));
    assert_eq!(
        get(&evaluator, &mut person, "getAddress", vec![Value::from(true)]),
        Value::Null
    );

    evaluator
        .call(&mut person, "setTags", vec![Value::from(vec!["a", "b"])])
        .unwrap();
    assert_eq!(get(&evaluator, &mut person, "getTags", vec![]), Value::from("a b"));

    let message = rejection(evaluator.call(&mut person, "setId", vec![Value::from("five")]));
    assert_eq!(
        message,
        "Invalid value 'five', please provide a numeric value, string given"
    );
    assert_eq!(get(&evaluator, &mut person, "getId", vec![]), Value::from(1));
}

#[test]
fn required_constructor_argument_is_enforced() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);

    assert_eq!(
        evaluator.construct(vec![]),
        Err(EvalError::MissingArgument {
            method: "new".to_string(),
            parameter: "id".to_string(),
        })
    );
}

#[test]
fn omitted_optional_arguments_keep_defaults() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);

    let person = evaluator.construct(vec![Some(Value::from(7)), None, None]).unwrap();
    let state = person.export();
    assert_eq!(state["id"], Value::from(7));
    assert_eq!(state["tags"], Value::List(vec![]));
    assert_eq!(state["address"], Value::Null);
}

#[test]
fn integer_rule_accepts_any_numeric_value() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();

    for accepted in [Value::from("12"), Value::from(3.5), Value::from("1e3")] {
        evaluator.call(&mut person, "setId", vec![accepted.clone()]).unwrap();
        assert_eq!(get(&evaluator, &mut person, "getId", vec![]), accepted);
    }

    let message = rejection(evaluator.call(&mut person, "setId", vec![Value::from(true)]));
    assert_eq!(message, "Invalid value true, please provide a numeric value, bool given");
}

// === Arrays ===

#[test]
fn add_to_appends_in_call_order() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();

    for tag in ["x", "y", "z"] {
        let returned = evaluator.call(&mut person, "addToTags", vec![Value::from(tag)]).unwrap();
        assert_eq!(returned, Returned::This);
    }
    assert_eq!(
        get(&evaluator, &mut person, "getTags", vec![]),
        Value::from(vec!["x", "y", "z"])
    );
}

#[test]
fn array_setter_stores_joined_string_and_add_to_then_fails() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();

    evaluator
        .call(&mut person, "setTags", vec![Value::from(vec!["a", "b"])])
        .unwrap();
    assert_eq!(person.export()["tags"], Value::from("a b"));

    let err = evaluator
        .call(&mut person, "addToTags", vec![Value::from("c")])
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::Accessor(AccessorError::NotASequence {
            field: "tags".to_string()
        })
    );
    assert_eq!(person.export()["tags"], Value::from("a b"));
}

#[test]
fn add_to_validates_the_item() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    evaluator.call(&mut paint, "addToShades", vec![Value::from("red")]).unwrap();
    let message = rejection(evaluator.call(&mut paint, "addToShades", vec![Value::from("pink")]));
    assert!(message.contains("'pink'"), "got: {message}");
    assert_eq!(paint.export()["shades"], Value::from(vec!["red"]));
}

#[test]
fn array_setter_checks_every_item() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    let message = rejection(evaluator.call(
        &mut paint,
        "setShades",
        vec![Value::from(vec!["red", "pink"])],
    ));
    assert_eq!(
        message,
        "Invalid value 'pink', please use one of: red, green, blue from enumeration Colour, string given"
    );
}

#[test]
fn array_setter_stores_null_for_non_sequences() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    evaluator.call(&mut paint, "setShades", vec![Value::from("pink")]).unwrap();
    assert_eq!(paint.export()["shades"], Value::Null);
}

// === Removable ===

#[test]
fn removable_field_is_unset_by_null_and_empty_list() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);

    for empty in [Value::Null, Value::List(vec![])] {
        let mut person = evaluator
            .construct_values(vec![Value::from(1), Value::from(vec!["a"])])
            .unwrap();
        evaluator.call(&mut person, "setTags", vec![empty]).unwrap();
        assert!(!person.export().contains_key("tags"));
        assert_eq!(get(&evaluator, &mut person, "getTags", vec![]), Value::Null);
    }
}

#[test]
fn removable_field_keeps_empty_strings() {
    let model = Model::new().with_struct(
        Struct::new("Note").with_attribute(Attribute::new("body", "string").removable()),
    );
    let plan = plan_of(&model, "Note");
    let evaluator = Evaluator::new(&plan);
    let mut note = evaluator.instantiate();

    evaluator.call(&mut note, "setBody", vec![Value::from("")]).unwrap();
    assert_eq!(note.export()["body"], Value::from(""));
}

#[test]
fn non_removable_field_stores_null() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();

    evaluator.call(&mut person, "setId", vec![Value::Null]).unwrap();
    assert_eq!(person.export()["id"], Value::Null);
}

#[test]
fn getter_on_missing_non_removable_field_fails() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.restore(BTreeMap::new());

    assert_eq!(
        evaluator.call(&mut person, "getId", vec![]),
        Err(EvalError::Accessor(AccessorError::UnsetField {
            field: "id".to_string()
        }))
    );
}

// === XML ===

#[test]
fn xml_documents_are_stored_serialized() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();

    evaluator
        .call(&mut person, "setAddress", vec![Value::from(address_document())])
        .unwrap();
    let stored = Value::from("<address><city>Paris</city></address>");
    assert_eq!(person.export()["address"], stored);
    assert_eq!(get(&evaluator, &mut person, "getAddress", vec![]), stored);
}

#[test]
fn xml_getter_materializes_document_in_place() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();
    evaluator
        .call(&mut person, "setAddress", vec![Value::from(address_document())])
        .unwrap();

    let document = get(&evaluator, &mut person, "getAddress", vec![Value::from(false)]);
    let Value::Xml(document) = document else {
        panic!("expected a document, got {document:?}");
    };
    assert!(document.has_content());
    assert!(matches!(person.export()["address"], Value::Xml(_)));

    // Asking for a string again serializes the stored document.
    assert_eq!(
        get(&evaluator, &mut person, "getAddress", vec![]),
        Value::from("<address><city>Paris</city></address>")
    );
}

#[test]
fn empty_xml_documents_are_stored_as_is() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();

    evaluator
        .call(&mut person, "setAddress", vec![Value::from(XmlDocument::new())])
        .unwrap();
    assert_eq!(person.export()["address"], Value::Xml(XmlDocument::new()));
}

// === Restrictions, unions and facets ===

#[test]
fn enumeration_rejects_unknown_values() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    evaluator.call(&mut paint, "setColour", vec![Value::from("green")]).unwrap();
    let message = rejection(evaluator.call(&mut paint, "setColour", vec![Value::from("pink")]));
    assert!(
        message.contains("please use one of: red, green, blue from enumeration Colour"),
        "got: {message}"
    );
    assert_eq!(paint.export()["colour"], Value::from("green"));
}

#[test]
fn union_accepts_any_member() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    evaluator.call(&mut paint, "setCode", vec![Value::from(5)]).unwrap();
    evaluator.call(&mut paint, "setCode", vec![Value::from("red")]).unwrap();
    assert_eq!(paint.export()["code"], Value::from("red"));
}

#[test]
fn union_rejection_lists_every_branch_failure() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    let message = rejection(evaluator.call(&mut paint, "setCode", vec![Value::from("purple")]));
    assert_eq!(
        message,
        "The value 'purple' (string) does not match any of the union rules: int, Colour. \
         See following errors:\
         \n - Invalid value 'purple', please provide a numeric value, string given\
         \n - Invalid value 'purple', please use one of: red, green, blue from enumeration Colour, string given"
    );
}

#[test]
fn length_and_pattern_facets_run_in_order() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    let message = rejection(evaluator.call(&mut paint, "setLabel", vec![Value::from("a")]));
    assert_eq!(
        message,
        "Invalid length of 1 for value 'a', the number of characters contained by the literal \
         must be greater than or equal to 2, string given"
    );

    let message = rejection(evaluator.call(&mut paint, "setLabel", vec![Value::from("ABC")]));
    assert_eq!(
        message,
        "Invalid value 'ABC', please provide a literal that is valid according to the pattern [a-z]+, string given"
    );

    evaluator.call(&mut paint, "setLabel", vec![Value::from("abc")]).unwrap();
}

#[test]
fn range_facets_bound_the_value() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    evaluator.call(&mut paint, "setWeight", vec![Value::from(0)]).unwrap();
    evaluator.call(&mut paint, "setWeight", vec![Value::from(99.5)]).unwrap();

    let message = rejection(evaluator.call(&mut paint, "setWeight", vec![Value::from(100)]));
    assert_eq!(
        message,
        "Invalid value 100, the value must be numerically strictly less than 100, int given"
    );
    let message = rejection(evaluator.call(&mut paint, "setWeight", vec![Value::from(-1)]));
    assert!(message.contains("greater than or equal to 0"), "got: {message}");
}

// === Choice groups ===

#[test]
fn choice_group_allows_a_single_member() {
    let plan = plan_of(&paint_model(), "Paint");
    let evaluator = Evaluator::new(&plan);
    let mut paint = evaluator.instantiate();

    evaluator.call(&mut paint, "setEmail", vec![Value::from("a@b.c")]).unwrap();
    let message = rejection(evaluator.call(&mut paint, "setPhone", vec![Value::from("123")]));
    assert_eq!(
        message,
        "The property phone can't be set to '123' (string) as the property email is already set. \
         Only one property must be set among these properties: phone, email."
    );

    // Null always passes, and clears the way for the sibling.
    evaluator.call(&mut paint, "setPhone", vec![Value::Null]).unwrap();
    evaluator.call(&mut paint, "setEmail", vec![Value::Null]).unwrap();
    evaluator.call(&mut paint, "setPhone", vec![Value::from("123")]).unwrap();
    assert_eq!(paint.export()["phone"], Value::from("123"));
}

// === Options ===

#[test]
fn disabled_validation_accepts_anything() {
    let options = GeneratorOptions::default().without_validation();
    let plan = plan_with(&person_model(), "Person", &options);
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();

    evaluator.call(&mut person, "setId", vec![Value::from("five")]).unwrap();
    assert_eq!(person.export()["id"], Value::from("five"));
}

// === Shadow slots and state restore ===

#[test]
fn unclean_names_keep_a_shadow_slot() {
    let model = Model::new().with_struct(
        Struct::new("Contact").with_attribute(Attribute::new("first-name", "string")),
    );
    let plan = plan_of(&model, "Contact");
    let evaluator = Evaluator::new(&plan);
    let mut contact = evaluator.instantiate();

    evaluator
        .call(&mut contact, "setFirst_name", vec![Value::from("Ada")])
        .unwrap();
    let state = contact.export();
    assert_eq!(state["first_name"], Value::from("Ada"));
    assert_eq!(state["first-name"], Value::from("Ada"));

    let mut restored = evaluator.restore(BTreeMap::from([(
        "first-name".to_string(),
        Value::from("Grace"),
    )]));
    assert_eq!(
        get(&evaluator, &mut restored, "getFirst_name", vec![]),
        Value::from("Grace")
    );
    assert_eq!(restored.record().shadow("first-name"), Some(&Value::from("Grace")));
}

#[test]
fn restore_round_trips_exported_state_without_guards() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator
        .construct_values(vec![Value::from(1), Value::from(vec!["a"])])
        .unwrap();
    evaluator.call(&mut person, "addToTags", vec![Value::from("b")]).unwrap_err();

    let restored = evaluator.restore(person.export());
    assert_eq!(restored, person);

    let invalid = evaluator.restore(BTreeMap::from([("id".to_string(), Value::from("five"))]));
    assert_eq!(invalid.export()["id"], Value::from("five"));
}

#[test]
fn constructor_and_restore_are_not_instance_methods() {
    let plan = plan_of(&person_model(), "Person");
    let evaluator = Evaluator::new(&plan);
    let mut person = evaluator.construct_values(vec![Value::from(1)]).unwrap();

    for name in ["new", "fromState"] {
        assert_eq!(
            evaluator.call(&mut person, name, vec![]),
            Err(EvalError::NotCallable(name.to_string()))
        );
    }
}

// === Determinism ===

#[test]
fn planning_is_deterministic() {
    let model = paint_model();
    let first = plan_model(&model, &GeneratorOptions::default());
    let second = plan_model(&model, &GeneratorOptions::default());
    assert_eq!(first.plans, second.plans);
}
