#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use resolid_di::{Container, Provider, Registry, Token};
use std::sync::Arc;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("sync_resolve_single", |b| {
        struct A;

        let a = Token::<A>::new("A");
        let container = Container::new(Registry::new().provide(Provider::new(a, |_| Ok(A))));
        b.iter(|| container.resolve(a).unwrap());
    })
    .bench_function("sync_resolve_many", |b| {
        struct A(Arc<B>, Arc<C>);
        struct B(i32);
        struct C(Arc<CA>);
        struct CA(Arc<CAA>);
        struct CAA;

        let a = Token::<A>::of();
        let b_token = Token::<B>::of();
        let c = Token::<C>::of();
        let ca = Token::<CA>::of();
        let caa = Token::<CAA>::of();

        let container = Container::new(
            Registry::new()
                .provide(Provider::new(caa, |_| Ok(CAA)))
                .provide(Provider::new(ca, move |resolver| Ok(CA(resolver.resolve(caa)?))))
                .provide(Provider::new(c, move |resolver| Ok(C(resolver.resolve(ca)?))))
                .provide(Provider::new(b_token, |_| Ok(B(2))))
                .provide(Provider::new(a, move |resolver| Ok(A(resolver.resolve(b_token)?, resolver.resolve(c)?)))),
        );
        b.iter(|| container.resolve(a).unwrap());
    })
    .bench_function("sync_resolve_transient_single", |b| {
        struct A;

        let a = Token::<A>::new("A");
        let container = Container::new(Registry::new().provide(Provider::new(a, |_| Ok(A)).transient()));
        b.iter(|| container.resolve(a).unwrap());
    })
    .bench_function("sync_resolve_transient_many", |b| {
        struct A(Arc<B>, Arc<C>);
        struct B(i32);
        struct C(Arc<CA>);
        struct CA(Arc<CAA>);
        struct CAA;

        let a = Token::<A>::of();
        let b_token = Token::<B>::of();
        let c = Token::<C>::of();
        let ca = Token::<CA>::of();
        let caa = Token::<CAA>::of();

        let container = Container::new(
            Registry::new()
                .provide(Provider::new(caa, |_| Ok(CAA)).transient())
                .provide(Provider::new(ca, move |resolver| Ok(CA(resolver.resolve(caa)?))).transient())
                .provide(Provider::new(c, move |resolver| Ok(C(resolver.resolve(ca)?))).transient())
                .provide(Provider::new(b_token, |_| Ok(B(2))).transient())
                .provide(Provider::new(a, move |resolver| Ok(A(resolver.resolve(b_token)?, resolver.resolve(c)?))).transient()),
        );
        b.iter(|| container.resolve(a).unwrap());
    })
    .bench_function("sync_resolve_lazy_cycle", |b| {
        struct A(Arc<B>);
        struct B(resolid_di::LazyHandle<A>);

        let a = Token::<A>::new("A");
        let b_token = Token::<B>::new("B");

        let registry = Registry::new()
            .provide(Provider::new(a, move |resolver| Ok(A(resolver.resolve(b_token)?))))
            .provide(Provider::new(b_token, move |resolver| Ok(B(resolver.lazy_resolve(a)?))));
        b.iter(|| Container::new(registry.clone()).resolve(a).unwrap());
    })
    .bench_function("sync_inject", |b| {
        struct A(Arc<B>);
        struct B;

        let a = Token::<A>::new("A");
        let b_token = Token::<B>::new("B");

        let container = Container::new(
            Registry::new()
                .provide(Provider::new(a, move |_| Ok(A(resolid_di::inject(b_token)?))).transient())
                .provide(Provider::new(b_token, |_| Ok(B))),
        );
        b.iter(|| container.resolve(a).unwrap());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
