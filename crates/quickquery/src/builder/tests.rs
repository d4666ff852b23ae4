//! Tests for the query builder.

use super::QueryBuilder;
use crate::condition::{Condition, ConditionGroup};

#[test]
fn select_all_from_table() {
    assert_eq!(QueryBuilder::select_all("person").to_sql(), "SELECT * FROM person");
}

#[test]
fn select_specific_columns() {
    let qb = QueryBuilder::select_columns("person", &["name", "age"]);
    assert_eq!(qb.to_sql(), "SELECT name, age FROM person");
}

#[test]
fn where_and_or_number_params_in_order() {
    let qb = QueryBuilder::select_all("person")
        .where_eq("name", "John")
        .and(Condition::gte("age", 18_i32))
        .or_eq("status", "admin");

    assert_eq!(
        qb.to_sql(),
        "SELECT * FROM person WHERE name = $1 AND age >= $2 OR status = $3"
    );
    let keys: Vec<usize> = qb.index_parameters().keys().copied().collect();
    assert_eq!(keys, vec![1, 2, 3]);
}

#[test]
fn where_condition_uses_given_operator() {
    let qb = QueryBuilder::select_all("point").where_condition(Condition::lt("pos", 3.5_f64));
    assert_eq!(qb.to_sql(), "SELECT * FROM point WHERE pos < $1");
}

#[test]
fn and_group_is_parenthesized_and_rebased() {
    let group = ConditionGroup::eq("name", "Ana").or(Condition::gt("age", 30_i32));
    assert_eq!(group.to_sql(), "name = $1 OR age > $2");

    let qb = QueryBuilder::select_all("person")
        .where_eq("country", "MX")
        .and_group(group);

    assert_eq!(
        qb.to_sql(),
        "SELECT * FROM person WHERE country = $1 AND ( name = $2 OR age > $3 )"
    );
    assert_eq!(qb.param_count(), 3);
}

#[test]
fn or_group_after_group_keeps_counting() {
    let qb = QueryBuilder::select_all("person")
        .where_eq("a", 1_i32)
        .and_group(ConditionGroup::eq("b", 2_i32).or_eq("c", 3_i32))
        .or_group(ConditionGroup::eq("d", 4_i32).and_eq("e", 5_i32));

    assert_eq!(
        qb.to_sql(),
        "SELECT * FROM person WHERE a = $1 AND ( b = $2 OR c = $3 ) OR ( d = $4 AND e = $5 )"
    );
    let keys: Vec<usize> = qb.index_parameters().keys().copied().collect();
    assert_eq!(keys, vec![1, 2, 3, 4, 5]);
}

#[test]
fn order_by_directions() {
    let asc = QueryBuilder::select_all("person").order_by(&["name", "age"]);
    assert_eq!(asc.to_sql(), "SELECT * FROM person ORDER BY name, age ASC");

    let desc = QueryBuilder::select_all("person").order_by_desc(&["age"]);
    assert_eq!(desc.to_sql(), "SELECT * FROM person ORDER BY age DESC");

    let explicit = QueryBuilder::select_all("person").order_by_dir(false, &["id"]);
    assert_eq!(explicit.to_sql(), "SELECT * FROM person ORDER BY id DESC");
}

#[test]
fn append_adds_space_separated_sql() {
    let qb = QueryBuilder::select_all("person")
        .where_eq("age", 90_i32)
        .append("LIMIT 10");
    assert_eq!(qb.to_sql(), "SELECT * FROM person WHERE age = $1 LIMIT 10");
}

#[test]
fn builder_without_conditions_has_no_params() {
    let qb = QueryBuilder::new("SELECT 1");
    assert!(qb.index_parameters().is_empty());
    assert_eq!(qb.param_count(), 0);
}
