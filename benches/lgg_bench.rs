use criterion::*;
use lgg::{anti_unify, anti_unify_list, ho_anti_unify, HoTerm, Term};

/// A complete binary tree of `f` nodes of the given depth, whose leaves cycle
/// through `leaves`.
fn tree(depth: usize, leaves: &[&str], next: &mut usize) -> Term {
    if depth == 0 {
        let leaf = leaves[*next % leaves.len()];
        *next += 1;
        Term::constant(leaf)
    } else {
        let left = tree(depth - 1, leaves, next);
        let right = tree(depth - 1, leaves, next);
        Term::compound("f", vec![left, right])
    }
}

/// `lambda x0 .. xn. (g x0 (g x1 .. (g xn c)))`
fn nested_lambdas(depth: usize, c: &str) -> HoTerm {
    let mut body = HoTerm::constant(c);
    for i in (0..depth).rev() {
        body = HoTerm::apply_all(
            HoTerm::constant("g"),
            vec![HoTerm::var(format!("x{}", i)), body],
        );
    }
    (0..depth)
        .rev()
        .fold(body, |body, i| HoTerm::lam(format!("x{}", i), body))
}

fn criterion_benchmark(c: &mut Criterion) {
    let left = tree(12, &["a", "b", "c"], &mut 0);
    let right = tree(12, &["a", "d", "c", "e"], &mut 0);
    c.bench_function("anti_unify_tree_12", |b| {
        b.iter(|| anti_unify(black_box(&left), black_box(&right)))
    });

    let lefts: Vec<_> = (0..64).map(|i| tree(6, &["a", "b"], &mut { i })).collect();
    let rights: Vec<_> = (0..64).map(|i| tree(6, &["a", "c"], &mut { i })).collect();
    c.bench_function("anti_unify_list_64", |b| {
        b.iter(|| anti_unify_list(black_box(&lefts), black_box(&rights)))
    });

    let left = nested_lambdas(200, "a");
    let right = nested_lambdas(200, "b");
    c.bench_function("ho_anti_unify_lambdas_200", |b| {
        b.iter(|| ho_anti_unify(black_box(&left), black_box(&right)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
