//! Write statements and id lookups for derived entities.

#![allow(dead_code)]

use qforge::prelude::*;

#[derive(Debug, Default, Record)]
#[orm(table = "t_dynamic_${user}_${project}")]
struct Dynamic {
    #[orm(id)]
    id: Option<i64>,
    #[orm(transient)]
    user: Option<String>,
    #[orm(transient)]
    project: Option<String>,
    #[orm(column = "user_score")]
    score: Option<i32>,
    memo: Option<String>,
}

#[derive(Default, Record)]
struct DynamicQuery {
    user: Option<String>,
    project: Option<String>,
    score_lt: Option<i32>,
    #[orm(page)]
    page: Option<PageQuery>,
}

#[derive(Record)]
struct DynamicId {
    #[orm(id)]
    id: i64,
    user: String,
    project: String,
}

fn dynamic(id: Option<i64>, score: Option<i32>, memo: Option<&str>) -> Dynamic {
    Dynamic {
        id,
        user: Some("f0rb".into()),
        project: Some("i18n".into()),
        score,
        memo: memo.map(str::to_string),
    }
}

fn builder() -> CrudBuilder<Dynamic> {
    CrudBuilder::new()
}

#[test]
fn create_renders_table_from_first_entity() {
    let entities = [dynamic(None, Some(100), None), dynamic(None, Some(90), Some("m"))];
    let create = builder().build_create(&entities, &[]).unwrap();
    assert_eq!(
        create.sql(),
        "INSERT INTO t_dynamic_f0rb_i18n (user_score, memo) VALUES (?, ?), (?, ?)"
    );
    assert_eq!(
        create.args(),
        &[Value::Int(100), Value::Null, Value::Int(90), Value::from("m")]
    );
}

#[test]
fn create_with_upsert() {
    let create = builder()
        .build_create(&[dynamic(None, Some(1), None)], &["user_score"])
        .unwrap();
    assert_eq!(
        create.sql(),
        "INSERT INTO t_dynamic_f0rb_i18n (user_score, memo) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE user_score = VALUES(user_score)"
    );
}

#[test]
fn update_and_patch() {
    let b = builder();

    let update = b.build_update(&dynamic(Some(1), Some(100), None)).unwrap();
    assert_eq!(
        update.sql(),
        "UPDATE t_dynamic_f0rb_i18n SET user_score = ?, memo = ? WHERE id = ?"
    );
    assert_eq!(update.args(), &[Value::Int(100), Value::Null, Value::Int(1)]);

    let patch = b.build_patch_by_id(&dynamic(Some(1), None, Some("memo"))).unwrap();
    assert_eq!(patch.sql(), "UPDATE t_dynamic_f0rb_i18n SET memo = ? WHERE id = ?");
    assert_eq!(patch.args(), &[Value::from("memo"), Value::Int(1)]);

    let err = b.build_patch_by_id(&dynamic(Some(1), None, None)).unwrap_err();
    assert!(err.is_empty_patch());
}

#[test]
fn patch_by_query_skips_table_placeholders() {
    let query = DynamicQuery {
        user: Some("f0rb".into()),
        project: Some("i18n".into()),
        score_lt: Some(80),
        page: None,
    };
    let patch = builder()
        .build_patch_by_query(&dynamic(None, None, Some("memo")), &query)
        .unwrap();
    assert_eq!(
        patch.sql(),
        "UPDATE t_dynamic_f0rb_i18n SET memo = ? WHERE user_score < ?"
    );
    assert_eq!(patch.args(), &[Value::from("memo"), Value::Int(80)]);
}

#[test]
fn read_statements_with_dynamic_table() {
    let query = DynamicQuery {
        user: Some("f0rb".into()),
        project: Some("i18n".into()),
        score_lt: Some(100),
        page: Some(PageQuery::new().with_page_size(5)),
    };
    let b = builder();
    assert_eq!(
        b.build_select(&query).unwrap().sql(),
        "SELECT * FROM t_dynamic_f0rb_i18n WHERE score < ? LIMIT 5 OFFSET 0"
    );
    assert_eq!(
        b.build_select_columns(&query, &["id", "memo"]).unwrap().sql(),
        "SELECT id, memo FROM t_dynamic_f0rb_i18n WHERE score < ? LIMIT 5 OFFSET 0"
    );
    assert_eq!(
        b.build_delete(&query).unwrap().sql(),
        "DELETE FROM t_dynamic_f0rb_i18n WHERE score < ? LIMIT 5"
    );
}

#[test]
fn unsafe_table_token_fails_closed() {
    let query = DynamicQuery {
        user: Some("f0rb; DROP TABLE x".into()),
        project: Some("i18n".into()),
        ..Default::default()
    };
    let select = builder().build_select(&query).unwrap();
    assert_eq!(select.sql(), "SELECT * FROM t_dynamic_${user}_i18n");
}

#[test]
fn by_id_with_wrapper() {
    let id = DynamicId {
        id: 5,
        user: "f0rb".into(),
        project: "i18n".into(),
    };
    let b = builder();

    let select = b.build_select_by_id(&id).unwrap();
    assert_eq!(select.sql(), "SELECT * FROM t_dynamic_f0rb_i18n WHERE id = ?");
    assert_eq!(select.args(), &[Value::Int(5)]);

    let delete = b.build_delete_by_id(&id).unwrap();
    assert_eq!(delete.sql(), "DELETE FROM t_dynamic_f0rb_i18n WHERE id = ?");
}

#[test]
fn fragments_share_one_arg_list() {
    let b = builder();
    let mut args = ArgList::new();
    let query = DynamicQuery {
        user: Some("f0rb".into()),
        project: Some("i18n".into()),
        score_lt: Some(1),
        page: None,
    };
    let count = b.build_count_and_args(&query, &mut args).unwrap();
    let select = b.build_select_and_args(&query, &mut args).unwrap();
    assert_eq!(count, "SELECT count(*) FROM t_dynamic_f0rb_i18n WHERE score < ?");
    assert_eq!(select, "SELECT * FROM t_dynamic_f0rb_i18n WHERE score < ?");
    assert_eq!(args.as_slice(), &[Value::Int(1), Value::Int(1)]);
}
