mod calc_nom;
mod calc_twine;

use criterion::{black_box, criterion_group, Criterion};
use calc_nom::nom_parser;
use calc_twine::{twine_grammar, twine_parser};
use log::trace;

const EXPR: &str = "  (1 + 2.5) * 3 - 4 / (2 + -6)
  + ((((7)))) * 0.5 - 12 / 4 * 2
  + 1e2 / (3 - 1) ";

pub fn bench_nom(c: &mut Criterion) {
    c.bench_function("calc_nom", |b| b.iter(|| nom_parser(black_box(EXPR))));
}

pub fn bench_twine(c: &mut Criterion) {
    c.bench_function("calc_twine", |b| b.iter(|| twine_parser(black_box(EXPR))));
}

pub fn bench_twine_grammar(c: &mut Criterion) {
    c.bench_function("calc_twine_grammar", |b| b.iter(twine_grammar));
}

criterion_group!(benches, bench_nom, bench_twine, bench_twine_grammar);

fn main() {
    env_logger::init();
    trace!(target: "twine", "Logging enabled");
    assert_eq!(nom_parser(EXPR), twine_parser(EXPR));
    benches();
    Criterion::default().configure_from_args().final_summary();
}
