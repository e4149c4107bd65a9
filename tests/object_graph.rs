use std::cell::RefCell;
use std::rc::Rc;

use ripple_observables::{object, observer, Reactive, ReactiveFields, ReactiveObject};
use serde_json::{json, Map, Value};

fn watch(target: &ReactiveObject) -> Rc<RefCell<Vec<Value>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    target.add_observer(observer({
        let seen = seen.clone();
        move |fields: &ReactiveFields| {
            let plain: Map<String, Value> = fields
                .iter()
                .map(|(key, child)| (key.clone(), child.to_unreactive()))
                .collect();
            seen.borrow_mut().push(Value::Object(plain));
        }
    }));
    seen
}

fn count(target: &ReactiveObject) -> Rc<RefCell<usize>> {
    let counter = Rc::new(RefCell::new(0));
    target.add_observer(observer({
        let counter = counter.clone();
        move |_: &ReactiveFields| *counter.borrow_mut() += 1
    }));
    counter
}

fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn vector3_walkthrough() {
    let vector = object(json!({ "x": 0, "y": 0, "z": 0 }));
    let seen = watch(&vector);

    vector.get("x").unwrap().set(json!(1));
    vector
        .get("y")
        .unwrap()
        .as_property()
        .unwrap()
        .update(|value| *value = json!(value.as_i64().unwrap() + 2));
    let orphan = vector.delete("z").unwrap();
    vector.set_value_of("z", json!(3));

    assert_eq!(
        *seen.borrow(),
        vec![
            json!({ "x": 1, "y": 0, "z": 0 }),
            json!({ "x": 1, "y": 2, "z": 0 }),
            json!({ "x": 1, "y": 2 }),
            json!({ "x": 1, "y": 2, "z": 3 }),
        ]
    );

    // The orphaned wrapper keeps working but never reaches the parent again.
    orphan.set(json!(42));
    assert_eq!(seen.borrow().len(), 4);
    assert_eq!(orphan.to_unreactive(), json!(42));
    assert_eq!(vector.to_value(), json!({ "x": 1, "y": 2, "z": 3 }));
}

#[test]
fn deep_graphs_bubble_one_notification_per_level() {
    let state = object(json!({
        "player": {
            "vector": { "direction": { "x": 0, "y": 0 }, "length": 0 },
            "health": 100
        },
        "score": 0
    }));

    let root_count = count(&state);
    let player = state.get("player").unwrap().as_object().unwrap().clone();
    let player_count = count(&player);

    let direction = player
        .get("vector")
        .unwrap()
        .as_object()
        .unwrap()
        .get("direction")
        .unwrap();
    direction.as_object().unwrap().get("x").unwrap().set(json!(7));

    assert_eq!(*player_count.borrow(), 1);
    assert_eq!(*root_count.borrow(), 1);
    assert_eq!(state.to_value()["player"]["vector"]["direction"]["x"], json!(7));

    // A sibling scalar at the root does not touch the player subtree.
    state.get("score").unwrap().set(json!(10));
    assert_eq!(*player_count.borrow(), 1);
    assert_eq!(*root_count.borrow(), 2);
}

#[test]
fn array_children_participate_in_bubbling() {
    let state = object(json!({ "samples": [1, 2], "label": "run" }));
    let root_count = count(&state);

    let samples = state.get("samples").unwrap();
    let samples = samples.as_array().unwrap();

    let pushed = Rc::new(RefCell::new(Vec::new()));
    samples.on_push().add_observer(observer({
        let pushed = pushed.clone();
        move |items: &Vec<Value>| pushed.borrow_mut().push(items.clone())
    }));

    samples.push(vec![json!(3)]);
    let removed = samples.splice(0, Some(1), vec![]);

    assert_eq!(*pushed.borrow(), vec![vec![json!(3)]]);
    assert_eq!(removed, vec![json!(1)]);
    assert_eq!(*root_count.borrow(), 2);
    assert_eq!(state.to_value(), json!({ "samples": [2, 3], "label": "run" }));
}

#[test]
fn set_value_of_reuses_established_children() {
    let state = object(json!({ "vector": { "x": 0, "y": 0 } }));
    let vector_before = state.get("vector").unwrap().as_object().unwrap().clone();
    let root_count = count(&state);

    state.set_value_of("vector", json!({ "x": 3, "y": 4 }));

    // Same wrapper, new contents, one notification.
    assert_eq!(*root_count.borrow(), 1);
    assert_eq!(vector_before.to_value(), json!({ "x": 3, "y": 4 }));
}

#[test]
fn whole_object_set_notifies_exactly_once() {
    let state = object(json!({ "a": 1, "b": { "c": 2 }, "gone": 3 }));
    let orphan = state.get("gone").unwrap();
    let root_count = count(&state);

    state.set(as_map(json!({ "a": 10, "b": { "c": 20 }, "added": 30 })));

    assert_eq!(*root_count.borrow(), 1);
    assert_eq!(state.to_value(), json!({ "a": 10, "b": { "c": 20 }, "added": 30 }));

    // Silent removal still disconnected the dropped child.
    orphan.set(json!(99));
    assert_eq!(*root_count.borrow(), 1);
}

#[test]
fn set_with_notifying_all_notifies_every_mutated_level() {
    let state = object(json!({ "a": 1, "b": { "c": 2 }, "d": [3] }));
    let root_count = count(&state);

    state.set_with_notifying_all(as_map(json!({
        "a": 10,
        "b": { "c": 20 },
        "d": [30],
        "e": 40
    })));

    // a assigns (1), b's subtree assigns then b re-notifies (2), d assigns
    // (1), e is added (1), then the final root aggregate (1).
    assert_eq!(*root_count.borrow(), 6);
    assert_eq!(
        state.to_value(),
        json!({ "a": 10, "b": { "c": 20 }, "d": [30], "e": 40 })
    );
}

#[test]
fn observers_can_react_to_structure_they_watch() {
    // A derived field maintained from inside an observer. The reentrant
    // assignment routes through the key-set channel, which re-fires the
    // aggregate channel depth-first.
    let state = object(json!({ "celsius": 0, "fahrenheit": 32 }));

    state.on_set_value_of().add_observer(observer({
        let state = state.clone();
        move |key: &String| {
            if key == "celsius" {
                let celsius = state
                    .get("celsius")
                    .and_then(|c| c.to_unreactive().as_f64())
                    .unwrap_or(0.0);
                state.set_value_of("fahrenheit", json!(celsius * 9.0 / 5.0 + 32.0));
            }
        }
    }));

    state.set_value_of("celsius", json!(100.0));
    assert_eq!(
        state.to_value(),
        json!({ "celsius": 100.0, "fahrenheit": 212.0 })
    );
}
