//! Conditions rendered from derived filter records.

#![allow(dead_code)]

use qforge::{CrudBuilder, PageQuery, Record, Value};

#[derive(Debug, Default, Record)]
#[orm(table = "user")]
struct User {
    #[orm(id)]
    id: Option<i64>,
    username: Option<String>,
    email: Option<String>,
    mobile: Option<String>,
    memo: Option<String>,
    score: Option<i32>,
    valid: Option<bool>,
}

#[derive(Default, Record)]
struct UserQuery {
    username: Option<String>,
    username_like: Option<String>,
    email_start: Option<String>,
    score_lt: Option<i32>,
    score_ge: Option<i32>,
    score_between: Option<(i32, i32)>,
    id_in: Option<Vec<i64>>,
    id_not_in: Option<Vec<i64>>,
    memo_is_null: bool,
    valid: Option<bool>,
    #[orm(page)]
    page: PageQuery,
}

#[derive(Default, Record)]
struct AccountQuery {
    #[orm(and = "(username = ? OR email = ? OR mobile = ?)")]
    account: Option<String>,
    #[orm(alias = "u")]
    score_gt: Option<i32>,
}

#[derive(Default, Record)]
struct RoleQuery {
    #[orm(subquery(select = "user_id", from = "t_user_and_role"))]
    role_id: Option<i64>,
    #[orm(subquery(op = "not in", select = "user_id", from = "t_user_and_role"))]
    role_id_in: Option<Vec<i64>>,
    #[orm(nested(
        append_where,
        level(left = "user_id", from = "t_user_and_role"),
        level(left = "role_id", from = "t_role_and_perm")
    ))]
    perm_id: Option<i64>,
}

#[derive(Default, Record)]
struct OrQuery {
    #[orm(filter)]
    either: Option<ContactQuery>,
    score_gt: Option<i32>,
}

#[derive(Default, Record)]
struct ContactQuery {
    email: Option<String>,
    mobile: Option<String>,
}

#[derive(Record)]
struct RawQuery {
    username: Value,
    score_ge: Value,
}

#[derive(Default, Record)]
struct BadQuery {
    tags: Option<Vec<String>>,
}

fn builder() -> CrudBuilder<User> {
    CrudBuilder::new()
}

#[test]
fn empty_filter_selects_everything() {
    let select = builder().build_select(&UserQuery::default()).unwrap();
    assert_eq!(select.sql(), "SELECT * FROM user");
    assert!(select.args().is_empty());
}

#[test]
fn suffix_operators() {
    let query = UserQuery {
        username: Some("test".into()),
        username_like: Some("f0rb".into()),
        email_start: Some("admin".into()),
        score_lt: Some(80),
        score_ge: Some(10),
        ..Default::default()
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(
        select.sql(),
        "SELECT * FROM user WHERE username = ? AND username LIKE ? AND email LIKE ? \
         AND score < ? AND score >= ?"
    );
    assert_eq!(
        select.args(),
        &[
            Value::from("test"),
            Value::from("%f0rb%"),
            Value::from("admin%"),
            Value::Int(80),
            Value::Int(10),
        ]
    );
}

#[test]
fn like_escapes_wildcards() {
    let query = UserQuery {
        username_like: Some("50%_off".into()),
        ..Default::default()
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(select.args(), &[Value::from("%50\\%\\_off%")]);
}

#[test]
fn collections_and_ranges() {
    let query = UserQuery {
        score_between: Some((10, 20)),
        id_in: Some(vec![1, 2, 3]),
        id_not_in: Some(vec![]),
        ..Default::default()
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(
        select.sql(),
        "SELECT * FROM user WHERE score BETWEEN ? AND ? AND id IN (?, ?, ?)"
    );
    assert_eq!(select.args().len(), 5);
    assert_eq!(select.placeholder_count(), 5);
}

#[test]
fn null_check_flag() {
    let on = UserQuery {
        memo_is_null: true,
        ..Default::default()
    };
    let select = builder().build_select(&on).unwrap();
    assert_eq!(select.sql(), "SELECT * FROM user WHERE memo IS NULL");
    assert!(select.args().is_empty());

    let off = UserQuery::default();
    assert_eq!(builder().build_select(&off).unwrap().sql(), "SELECT * FROM user");
}

#[test]
fn optional_bool_is_a_value() {
    let query = UserQuery {
        valid: Some(false),
        ..Default::default()
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(select.sql(), "SELECT * FROM user WHERE valid = ?");
    assert_eq!(select.args(), &[Value::Bool(false)]);
}

#[test]
fn paging_and_sorting() {
    let query = UserQuery {
        username: Some("test".into()),
        page: PageQuery::new()
            .with_page_number(3)
            .with_page_size(10)
            .with_sort("id,desc;username"),
        ..Default::default()
    };
    let b = builder();

    let select = b.build_select(&query).unwrap();
    assert_eq!(
        select.sql(),
        "SELECT * FROM user WHERE username = ? ORDER BY id DESC, username LIMIT 10 OFFSET 20"
    );

    let count = b.build_count(&query).unwrap();
    assert_eq!(count.sql(), "SELECT count(*) FROM user WHERE username = ?");

    let delete = b.build_delete(&query).unwrap();
    assert_eq!(delete.sql(), "DELETE FROM user WHERE username = ? LIMIT 10");
}

#[test]
fn invalid_sort_is_rejected() {
    let query = UserQuery {
        page: PageQuery::new().with_sort("id; DROP TABLE user"),
        ..Default::default()
    };
    let err = builder().build_select(&query).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn literal_and_alias() {
    let query = AccountQuery {
        account: Some("f0rb".into()),
        score_gt: Some(60),
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(
        select.sql(),
        "SELECT * FROM user WHERE (username = ? OR email = ? OR mobile = ?) AND u.score > ?"
    );
    assert_eq!(
        select.args(),
        &[
            Value::from("f0rb"),
            Value::from("f0rb"),
            Value::from("f0rb"),
            Value::Int(60),
        ]
    );
}

#[test]
fn subquery_conditions() {
    let query = RoleQuery {
        role_id: Some(1),
        role_id_in: Some(vec![1, 2]),
        ..Default::default()
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(
        select.sql(),
        "SELECT * FROM user WHERE id IN (SELECT user_id FROM t_user_and_role WHERE role_id = ?) \
         AND id NOT IN (SELECT user_id FROM t_user_and_role WHERE role_id IN (?, ?))"
    );
    assert_eq!(select.args(), &[Value::Int(1), Value::Int(1), Value::Int(2)]);
}

#[test]
fn nested_chain() {
    let query = RoleQuery {
        perm_id: Some(7),
        ..Default::default()
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(
        select.sql(),
        "SELECT * FROM user WHERE id IN (SELECT user_id FROM t_user_and_role \
         WHERE role_id IN (SELECT role_id FROM t_role_and_perm WHERE perm_id = ?))"
    );
    assert_eq!(select.args(), &[Value::Int(7)]);
}

#[test]
fn nested_filter_record() {
    let query = OrQuery {
        either: Some(ContactQuery {
            email: Some("a@b.c".into()),
            mobile: Some("123".into()),
        }),
        score_gt: Some(1),
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(
        select.sql(),
        "SELECT * FROM user WHERE (email = ? AND mobile = ?) AND score > ?"
    );

    let empty = OrQuery {
        either: Some(ContactQuery::default()),
        score_gt: None,
    };
    assert_eq!(builder().build_select(&empty).unwrap().sql(), "SELECT * FROM user");
}

#[test]
fn bad_metadata_fails_the_statement() {
    let query = BadQuery {
        tags: Some(vec!["a".into()]),
    };
    let err = builder().build_select(&query).unwrap_err();
    assert!(err.is_metadata());
}

#[test]
fn null_values_are_skipped() {
    let query = RawQuery {
        username: Value::Null,
        score_ge: Value::Int(60),
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(select.sql(), "SELECT * FROM user WHERE score >= ?");
    assert_eq!(select.args(), &[Value::Int(60)]);

    let query = RawQuery {
        username: Value::Null,
        score_ge: Value::Null,
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(select.sql(), "SELECT * FROM user");
    assert!(select.args().is_empty());
}
