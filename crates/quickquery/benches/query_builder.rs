use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quickquery::{Condition, ConditionGroup, QueryBuilder};

/// SELECT * FROM t WHERE col0 = $1 AND col1 = $2 ...
fn build_select(n: usize) -> QueryBuilder {
    let mut qb = QueryBuilder::select_all("t");
    for i in 0..n {
        let cond = Condition::new(format!("col{i}"), i as i64);
        qb = if i == 0 {
            qb.where_condition(cond)
        } else {
            qb.and(cond)
        };
    }
    qb
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/to_sql");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.to_sql()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let qb = build_select(n);
                black_box(qb.to_sql());
            });
        });
    }

    group.finish();
}

fn bench_nested_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/groups");

    for n in [2, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut qb = QueryBuilder::select_all("t").where_eq("tenant", 1_i32);
                for i in 0..n {
                    let g = ConditionGroup::eq("a", i as i32).or(Condition::gt("b", i as i32));
                    qb = qb.and_group(g);
                }
                black_box((qb.to_sql(), qb.index_parameters().len()));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_to_sql, bench_build_and_render, bench_nested_groups);
criterion_main!(benches);
