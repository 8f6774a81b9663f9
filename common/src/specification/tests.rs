use super::*;

#[derive(Debug)]
struct Item {
    kind: &'static str,
    size: i64,
}

fn kind_is(kind: &'static str) -> Specification<Item> {
    Specification::atomic(format!("kind = {}", kind), move |item: &Item| item.kind == kind)
        .with_sql("kind = ?", vec![SqlValue::from(kind)])
}

fn size_at_least(size: i64) -> Specification<Item> {
    Specification::atomic(format!("size >= {}", size), move |item: &Item| item.size >= size)
        .with_sql("size >= ?", vec![SqlValue::Integer(size)])
}

fn sample_items() -> Vec<Item> {
    vec![
        Item { kind: "Arte", size: 1 },
        Item { kind: "Arte", size: 10 },
        Item { kind: "Deporte", size: 5 },
        Item { kind: "Ciencia", size: 20 },
    ]
}

#[test]
fn test_and_matches_conjunction() {
    let a = kind_is("Arte");
    let b = size_at_least(5);
    let both = a.clone().and(b.clone());
    for item in sample_items() {
        assert_eq!(
            both.is_satisfied_by(&item),
            a.is_satisfied_by(&item) && b.is_satisfied_by(&item),
            "{:?}",
            item
        );
    }
}

#[test]
fn test_or_matches_disjunction() {
    let a = kind_is("Arte");
    let b = size_at_least(15);
    let either = a.clone().or(b.clone());
    for item in sample_items() {
        assert_eq!(
            either.is_satisfied_by(&item),
            a.is_satisfied_by(&item) || b.is_satisfied_by(&item)
        );
    }
}

#[test]
fn test_not_is_complement() {
    let a = kind_is("Deporte");
    let negated = a.clone().not();
    for item in sample_items() {
        assert_eq!(negated.is_satisfied_by(&item), !a.is_satisfied_by(&item));
    }
}

#[test]
fn test_composites_compose_further() {
    let spec = kind_is("Arte")
        .or(kind_is("Deporte"))
        .and(size_at_least(5))
        .not()
        .or(kind_is("Ciencia").and(size_at_least(100)));
    let matched: Vec<i64> = sample_items()
        .iter()
        .filter(|item| spec.is_satisfied_by(item))
        .map(|item| item.size)
        .collect();
    assert_eq!(matched, vec![1, 20]);
}

#[test]
fn test_grouping_follows_build_order() {
    // (Arte OR Deporte) AND size >= 5 differs from Arte OR (Deporte AND size >= 5)
    let grouped = kind_is("Arte").or(kind_is("Deporte")).and(size_at_least(5));
    let other = kind_is("Arte").or(kind_is("Deporte").and(size_at_least(5)));
    let small_arte = Item { kind: "Arte", size: 1 };
    assert!(!grouped.is_satisfied_by(&small_arte));
    assert!(other.is_satisfied_by(&small_arte));
    assert_eq!(grouped.to_string(), "((kind = Arte OR kind = Deporte) AND size >= 5)");
    assert_eq!(other.to_string(), "(kind = Arte OR (kind = Deporte AND size >= 5))");
}

#[test]
fn test_fold_or_accumulator() {
    let mut acc: Option<Specification<Item>> = None;
    assert!(acc.is_none());
    for kind in ["Arte", "Deporte"] {
        acc = Specification::fold_or(acc, kind_is(kind));
    }
    let spec = acc.unwrap();
    assert_eq!(spec.criteria_count(), 2);
    assert!(spec.is_satisfied_by(&Item { kind: "Arte", size: 0 }));
    assert!(spec.is_satisfied_by(&Item { kind: "Deporte", size: 0 }));
    assert!(!spec.is_satisfied_by(&Item { kind: "Ciencia", size: 0 }));
}

#[test]
fn test_fold_and_single_element_is_unwrapped() {
    let spec = Specification::fold_and(None, size_at_least(3)).unwrap();
    assert!(matches!(spec, Specification::Atomic(_)));
}

#[test]
fn test_always_matches_everything() {
    let spec = Specification::<Item>::always();
    assert!(sample_items().iter().all(|item| spec.is_satisfied_by(item)));
    assert_eq!(spec.to_sql(), Some(SqlCondition::new("1 = 1", vec![])));
}

#[test]
fn test_to_sql_keeps_bind_order() {
    let spec = kind_is("Arte")
        .or(kind_is("Danza"))
        .and(size_at_least(3).not());
    let sql = spec.to_sql().unwrap();
    assert_eq!(sql.clause, "((kind = ? OR kind = ?) AND NOT (size >= ?))");
    assert_eq!(
        sql.binds,
        vec![
            SqlValue::String("Arte".to_string()),
            SqlValue::String("Danza".to_string()),
            SqlValue::Integer(3),
        ]
    );
}

#[test]
fn test_to_sql_none_when_a_leaf_has_no_sql() {
    let opaque = Specification::atomic("odd size", |item: &Item| item.size % 2 == 1);
    assert!(kind_is("Arte").and(opaque.clone()).to_sql().is_none());
    // Still evaluable in-process
    assert!(opaque.is_satisfied_by(&Item { kind: "Arte", size: 3 }));
}

#[test]
fn test_with_sql_ignored_on_composite() {
    let spec = kind_is("Arte")
        .and(size_at_least(1))
        .with_sql("bogus", vec![]);
    assert_eq!(spec.to_sql().unwrap().clause, "(kind = ? AND size >= ?)");
}
