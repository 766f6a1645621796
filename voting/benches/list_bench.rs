use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slcr_voting::SortedCommitmentList;

/// Poll `id` holds `id * 10` tokens, for polls 1..=n.
fn ascending_list(n: u64) -> SortedCommitmentList {
    let mut list = SortedCommitmentList::new();
    for id in 1..=n {
        list.insert(id, u128::from(id) * 10, id - 1).unwrap();
    }
    list
}

fn hinted_insert_bench(c: &mut Criterion) {
    let list = ascending_list(1_000);

    c.bench_function("list_insert_hinted_1000", |b| {
        b.iter(|| {
            let mut list = list.clone();
            list.insert(black_box(5_000), black_box(5_005), black_box(500))
                .unwrap();
        })
    });
}

fn helper_insert_bench(c: &mut Criterion) {
    let list = ascending_list(1_000);

    c.bench_function("list_insert_via_insertion_point_1000", |b| {
        b.iter(|| {
            let mut list = list.clone();
            let prev = list.insertion_point(black_box(5_005), 5_000);
            list.insert(5_000, 5_005, prev).unwrap();
        })
    });
}

fn validate_position_bench(c: &mut Criterion) {
    let list = ascending_list(1_000);

    c.bench_function("list_validate_position", |b| {
        b.iter(|| list.validate_position(black_box(500), black_box(5_005), 5_000))
    });
}

fn in_place_update_bench(c: &mut Criterion) {
    let list = ascending_list(1_000);

    c.bench_function("list_update_tail_to_head", |b| {
        b.iter(|| {
            let mut list = list.clone();
            list.insert(black_box(1_000), 0, 0).unwrap();
        })
    });
}

criterion_group!(
    benches,
    hinted_insert_bench,
    helper_insert_bench,
    validate_position_bench,
    in_place_update_bench,
);
criterion_main!(benches);
