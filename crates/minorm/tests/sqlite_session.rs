#![cfg(feature = "sqlite")]

use chrono::{NaiveDate, NaiveDateTime};
use minorm::prelude::*;
use minorm::QueryErrorKind;

#[derive(Model, Debug, Clone, PartialEq)]
struct User {
    #[orm(column = "Name", tag = "PRIMARY KEY")]
    name: String,
    #[orm(column = "Age")]
    age: i32,
}

fn user(name: &str, age: i32) -> User {
    User {
        name: name.to_string(),
        age,
    }
}

fn engine_with_users() -> Engine {
    let engine = Engine::open(&EngineConfig::sqlite(":memory:")).unwrap();
    {
        let mut s = engine.new_session();
        s.model::<User>();
        s.drop_table().unwrap();
        s.create_table().unwrap();
        let inserted = s.insert(&mut [user("Tom", 18), user("Sam", 25)]).unwrap();
        assert_eq!(inserted, 2);
    }
    engine
}

#[test]
fn users_example() {
    let engine = engine_with_users();
    let mut s = engine.new_session();
    s.model::<User>();
    assert!(s.has_table().unwrap());
    assert_eq!(s.count().unwrap(), 2);

    let mut users: Vec<User> = Vec::new();
    s.order_by("Age DESC").find(&mut users).unwrap();
    assert_eq!(users, vec![user("Sam", 25), user("Tom", 18)]);

    let tom: User = s.filter("Name = ?", ["Tom"]).first().unwrap();
    assert_eq!(tom, user("Tom", 18));
}

#[test]
fn first_without_match() {
    let engine = engine_with_users();
    let mut s = engine.new_session();
    let err = s.filter("Name = ?", ["Nobody"]).first::<User>().unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn limit_and_filter() {
    let engine = engine_with_users();
    let mut s = engine.new_session();
    let mut users: Vec<User> = Vec::new();
    s.filter("Age > ?", [10]).order_by("Age").limit(1).find(&mut users).unwrap();
    assert_eq!(users, vec![user("Tom", 18)]);
}

#[test]
fn update_and_delete() {
    let engine = engine_with_users();
    let mut s = engine.new_session();
    s.model::<User>();

    assert_eq!(s.filter("Name = ?", ["Tom"]).update([("Age", 30)]).unwrap(), 1);
    let tom: User = s.filter("Name = ?", ["Tom"]).first().unwrap();
    assert_eq!(tom.age, 30);

    assert_eq!(
        s.update_flat(vec![Value::from("Age"), Value::Int(40)]).unwrap(),
        2
    );

    assert_eq!(s.filter("Name = ?", ["Sam"]).delete().unwrap(), 1);
    assert_eq!(s.count().unwrap(), 1);
}

#[test]
fn staged_filter_applies_once() {
    let engine = engine_with_users();
    let mut s = engine.new_session();
    s.model::<User>();
    assert_eq!(s.filter("Age > ?", [20]).count().unwrap(), 1);
    assert_eq!(s.count().unwrap(), 2);
}

#[test]
fn record_update_and_delete() {
    let engine = engine_with_users();
    let mut s = engine.new_session();

    let mut tom = user("Tom", 19);
    assert_eq!(s.update_record(&mut tom).unwrap(), 1);
    let stored: User = s.filter("Name = ?", ["Tom"]).first().unwrap();
    assert_eq!(stored.age, 19);

    assert_eq!(s.delete_record(&mut tom).unwrap(), 1);
    assert_eq!(s.count().unwrap(), 1);
}

#[test]
fn duplicate_primary_key_is_constraint_error() {
    let engine = engine_with_users();
    let mut s = engine.new_session();
    let err = s.insert_one(&mut user("Tom", 99)).unwrap_err();
    match err {
        Error::Query(e) => {
            assert_eq!(e.kind, QueryErrorKind::Constraint);
            assert!(e.sql.unwrap().starts_with("INSERT INTO User"));
        }
        other => panic!("expected constraint error, got {other:?}"),
    }
}

#[test]
fn raw_statements() {
    let engine = engine_with_users();
    let s = engine.new_session();
    let affected = s
        .exec(
            "INSERT INTO User (Name, Age) VALUES (?, ?)",
            &[Value::from("Kate"), Value::Int(30)],
        )
        .unwrap();
    assert_eq!(affected, 1);

    let row = s
        .query_one("SELECT count(*) FROM User WHERE Age >= ?", &[Value::Int(25)])
        .unwrap()
        .unwrap();
    assert_eq!(row.get_as::<i64>(0).unwrap(), 2);
}

#[test]
fn drop_table_then_has_table() {
    let engine = engine_with_users();
    let mut s = engine.new_session();
    s.model::<User>();
    s.drop_table().unwrap();
    assert!(!s.has_table().unwrap());
    s.drop_table().unwrap();
}

#[derive(Model, Debug, Clone, PartialEq)]
#[orm(table = "events")]
struct Event {
    #[orm(tag = "PRIMARY KEY")]
    id: i64,
    at: NaiveDateTime,
    done: bool,
    score: f64,
    #[orm(skip)]
    note: String,
}

#[test]
fn typed_columns_round_trip() {
    let engine = Engine::open(&EngineConfig::sqlite(":memory:")).unwrap();
    let mut s = engine.new_session();
    s.model::<Event>().create_table().unwrap();

    let at = NaiveDate::from_ymd_opt(2023, 7, 1)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap();
    let mut event = Event {
        id: 7,
        at,
        done: true,
        score: 0.5,
        note: "not stored".to_string(),
    };
    s.insert_one(&mut event).unwrap();

    let loaded: Event = s.first().unwrap();
    assert_eq!(loaded.id, 7);
    assert_eq!(loaded.at, at);
    assert!(loaded.done);
    assert_eq!(loaded.score, 0.5);
    assert!(loaded.note.is_empty());

    let columns = engine
        .connection()
        .describe("SELECT * FROM events LIMIT 1")
        .unwrap();
    assert_eq!(columns, ["id", "at", "done", "score"]);
}
