//! End-to-end coverage of the builder API surface.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use latalisa_builders::{
    merge_lists, merge_sets, Builder, BuilderError, ComparatorBuilder, Dir, LazyList, ListBuilder,
    MapBuilder, SetBuilder,
};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    nickname: Option<String>,
    age: u32,
}

fn person(name: &str, nickname: Option<&str>, age: u32) -> Person {
    Person {
        name: name.to_string(),
        nickname: nickname.map(str::to_string),
        age,
    }
}

#[test]
fn comparator_chain_with_optional_keys() {
    let mut people = vec![
        person("Carla", Some("Cacá"), 30),
        person("Ana", None, 30),
        person("Bruno", Some("Bru"), 25),
    ];

    let comparator = ComparatorBuilder::new()
        .add(|p: &Person| p.nickname.clone())
        .add(|p: &Person| p.age)
        .build();
    comparator.sort(&mut people);

    let names: Vec<_> = people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
}

#[test]
fn built_comparator_ignores_later_additions() {
    let builder = ComparatorBuilder::by(|p: &Person| p.age);
    let by_age = builder.build();
    let builder = builder.add_ref(|p: &Person| p.name.as_str());

    let a = person("Zeca", None, 40);
    let b = person("Ana", None, 40);
    assert_eq!(by_age.compare(&a, &b), Ordering::Equal);
    assert_eq!(builder.build().compare(&a, &b), Ordering::Greater);
    assert_eq!(builder.len(), 2);
}

#[test]
fn reversed_and_composed_comparators() {
    let by_name = ComparatorBuilder::new()
        .add_ref(|p: &Person| p.name.as_str())
        .build();
    let by_age_desc = ComparatorBuilder::new()
        .add_dir(|p: &Person| p.age, Dir::Desc)
        .build();

    let combined = ComparatorBuilder::of([by_age_desc, by_name.clone()]).build_reversed();

    let mut people = vec![
        person("Ana", None, 20),
        person("Bia", None, 50),
        person("Caio", None, 20),
    ];
    combined.sort(&mut people);
    let names: Vec<_> = people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Caio", "Ana", "Bia"]);

    let mut sorted = people.clone();
    sorted.sort_by(by_name.as_fn());
    assert_eq!(sorted[0].name, "Ana");
}

#[test]
fn add_by_uses_supplied_key_order() {
    let case_insensitive = ComparatorBuilder::new()
        .add_by(
            |p: &Person| p.name.clone(),
            |a: &String, b: &String| a.to_lowercase().cmp(&b.to_lowercase()),
        )
        .build();

    assert_eq!(
        case_insensitive.compare(&person("ana", None, 1), &person("ANA", None, 2)),
        Ordering::Equal
    );
}

#[test]
fn collections_round_out_the_surface() {
    let mut staged = ListBuilder::of("a", ["b", "c"]).remove(&"b");
    let list = staged.insert(0, "z").map(|b| b.build_with(|v| v.join(",")));
    assert_eq!(list, Ok("z,a,c".to_string()));

    let err = ListBuilder::of(1, [2]).insert_all(5, [3]).unwrap_err();
    assert_eq!(err, BuilderError::IndexOutOfBounds { index: 5, len: 2 });
    assert_eq!(err.to_string(), "index 5 is out of bounds for length 2");

    let map: HashMap<&str, i32> = MapBuilder::new()
        .put_all([("x", 1), ("y", 2)])
        .put_if_not_null("z", None)
        .remove(&"x")
        .build();
    assert_eq!(map, HashMap::from([("y", 2)]));

    let set: HashSet<char> = SetBuilder::of('a', ['b']).add('a').build();
    assert_eq!(set.len(), 2);

    let merged = [Some(vec![1]), None, Some(vec![2, 3])]
        .into_iter()
        .fold(Vec::new(), |acc, next| merge_lists(Some(acc), next));
    assert_eq!(merged, vec![1, 2, 3]);

    let merged = merge_sets(None, Some(HashSet::from([7])));
    assert!(merged.contains(&7));
}

#[test]
fn lazy_list_is_shared_across_threads() {
    let lazy = std::sync::Arc::new(LazyList::new(|| (1..=5).collect::<Vec<u32>>()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lazy = std::sync::Arc::clone(&lazy);
            std::thread::spawn(move || lazy.iter().sum::<u32>())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 15);
    }
    assert_eq!(lazy.len(), 5);
}
