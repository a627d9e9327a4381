use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rdfdict::{StoreOptions, Term, TripleId, TripleRole, TripleStore};

/// Generate `n` triples over 20 predicates with a mix of IRIs, bnodes and literals.
fn generate(n: usize, indexed: bool) -> TripleStore {
    let mut triples = Vec::with_capacity(n);
    for t in 0..n {
        let s = if t % 5 == 0 {
            Term::BNode(format!("b{t}"))
        } else {
            Term::Iri(format!("http://example.org/s/{}", t / 3))
        };
        let p = Term::Iri(format!("http://example.org/p/{}", t % 20));
        let o = match t % 3 {
            0 => Term::Iri(format!("http://example.org/o/{t}")),
            1 => Term::Literal {
                lex: format!("value {t}"),
                dt: None,
                lang: None,
            },
            _ => Term::Literal {
                lex: format!("hello {t}"),
                dt: None,
                lang: Some("en".into()),
            },
        };
        triples.push((s, p, o));
    }
    TripleStore::from_triples(triples, StoreOptions { indexed }).unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| generate(n, true));
        });
    }
    group.finish();
}

fn bench_page_seek(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_seek");
    for indexed in [true, false] {
        let store = generate(50_000, indexed);
        let p = store
            .dictionary()
            .locate(
                &Term::Iri("http://example.org/p/7".into()),
                TripleRole::Predicate,
            )
            .unwrap();
        group.bench_with_input(
            BenchmarkId::new("indexed", indexed),
            &store,
            |b, store| {
                b.iter(|| {
                    let mut it = store.search(TripleId::new(0, p, 0));
                    let offset = 2_000u64;
                    if it.can_go_to() {
                        it.go_to(offset).unwrap();
                    } else {
                        for _ in 0..offset {
                            it.next();
                        }
                    }
                    it.take(100).count()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_page_seek);
criterion_main!(benches);
