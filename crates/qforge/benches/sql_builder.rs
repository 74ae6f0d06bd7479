use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qforge::{CrudBuilder, PageQuery, Record};

#[derive(Default, Record)]
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
    memo_like: Option<String>,
    id_in: Option<Vec<i64>>,
    #[orm(subquery(select = "user_id", from = "t_user_and_role"))]
    role_id: Option<i64>,
    #[orm(page)]
    page: PageQuery,
}

fn query(ids: usize) -> DynamicQuery {
    DynamicQuery {
        user: Some("f0rb".into()),
        project: Some("i18n".into()),
        score_lt: Some(100),
        memo_like: Some("50%".into()),
        id_in: Some((0..ids as i64).collect()),
        role_id: Some(1),
        page: PageQuery::new()
            .with_page_number(2)
            .with_page_size(20)
            .with_sort("id,desc;memo"),
    }
}

fn entity(n: i32) -> Dynamic {
    Dynamic {
        id: Some(i64::from(n)),
        user: Some("f0rb".into()),
        project: Some("i18n".into()),
        score: Some(n),
        memo: Some(format!("memo {n}")),
    }
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select");
    let builder = CrudBuilder::<Dynamic>::new();

    for ids in [1, 10, 100] {
        let q = query(ids);
        group.bench_with_input(BenchmarkId::from_parameter(ids), &q, |b, q| {
            b.iter(|| black_box(builder.build_select(q)));
        });
    }

    group.finish();
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/create");
    let builder = CrudBuilder::<Dynamic>::new();

    for n in [1, 10, 100] {
        let entities: Vec<Dynamic> = (0..n).map(entity).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &entities, |b, entities| {
            b.iter(|| black_box(builder.build_create(entities, &["memo"])));
        });
    }

    group.finish();
}

fn bench_patch(c: &mut Criterion) {
    let builder = CrudBuilder::<Dynamic>::new();
    let e = entity(7);
    c.bench_function("sql_builder/patch_by_id", |b| {
        b.iter(|| black_box(builder.build_patch_by_id(&e)));
    });
}

criterion_group!(benches, bench_select, bench_create, bench_patch);
criterion_main!(benches);
