#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use resolid_di::{Container, Provider, Registry, Token};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Barrier,
    },
    thread,
    time::{Duration, Instant},
};

const THREADS: usize = 10;
const SCALING_THREADS: [usize; 5] = [1, 2, 4, 8, 12];

fn run_bench_threads<W, F>(threads: usize, mut make_test_fn: W, iters: u64) -> Duration
where
    W: FnMut() -> F,
    F: FnMut() + Send + 'static,
{
    let barrier = Arc::new(Barrier::new(threads + 1));
    let elapsed_handles = Arc::new((0..threads).map(|_| AtomicU64::default()).collect::<Box<[_]>>());

    thread::scope(|s| {
        for i in 0..threads {
            let barrier = barrier.clone();
            let elapsed_handles = elapsed_handles.clone();
            let mut test_fn = make_test_fn();

            s.spawn(move || {
                barrier.wait();
                let start = Instant::now();
                for _ in 0..iters {
                    test_fn();
                }
                elapsed_handles[i].store(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
            });
        }

        barrier.wait();
    });

    let nanos = elapsed_handles
        .iter()
        .map(|elapsed_handle| elapsed_handle.load(Ordering::Relaxed))
        .collect::<Vec<_>>();
    Duration::from_nanos(nanos.iter().sum::<u64>() / nanos.len() as u64)
}

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA;

fn many_container(transient: bool) -> (Container, Token<A>) {
    let a = Token::<A>::of();
    let b = Token::<B>::of();
    let c = Token::<C>::of();
    let ca = Token::<CA>::of();

    let with_scope = |provider: Provider<_>| if transient { provider.transient() } else { provider };
    let container = Container::new(
        Registry::new()
            .provide(Provider::new(ca, |_| Ok(CA)))
            .provide(Provider::new(c, move |resolver| Ok(C(resolver.resolve(ca)?))))
            .provide(Provider::new(b, |_| Ok(B(2))))
            .provide(with_scope(Provider::new(a, move |resolver| {
                Ok(A(resolver.resolve(b)?, resolver.resolve(c)?))
            }))),
    );
    (container, a)
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");
    group.sample_size(30);
    group.warm_up_time(Duration::from_secs(3));

    group.bench_function(BenchmarkId::new("resolve_single", THREADS), |b| {
        struct Single;

        let single = Token::<Single>::new("SINGLE");
        let container = Container::new(Registry::new().provide(Provider::new(single, |_| Ok(Single))));

        b.iter_custom(|iters| {
            run_bench_threads(
                THREADS,
                || {
                    let container = container.clone();
                    move || {
                        container.resolve(single).unwrap();
                    }
                },
                iters.div_ceil(THREADS as u64),
            )
        });
    });

    group.bench_function(BenchmarkId::new("resolve_many", THREADS), |b| {
        let (container, a) = many_container(false);

        b.iter_custom(|iters| {
            run_bench_threads(
                THREADS,
                || {
                    let container = container.clone();
                    move || {
                        container.resolve(a).unwrap();
                    }
                },
                iters.div_ceil(THREADS as u64),
            )
        });
    });

    for thread_count in SCALING_THREADS {
        group.bench_function(BenchmarkId::new("resolve_transient_many", thread_count), |b| {
            let (container, a) = many_container(true);

            b.iter_custom(|iters| {
                run_bench_threads(
                    thread_count,
                    || {
                        let container = container.clone();
                        move || {
                            container.resolve(a).unwrap();
                        }
                    },
                    iters.div_ceil(thread_count as u64),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
