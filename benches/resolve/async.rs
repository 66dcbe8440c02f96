#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use resolid_di::{Container, InstantiateErrorKind, Provider, Registry, Token};
use std::sync::Arc;
use tokio::runtime::Builder;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("async_resolve_single", |b| {
        struct A;

        let a = Token::<A>::new("A");
        let container = Container::new(
            Registry::new().provide(Provider::new_async(a, |_| async { Ok::<_, InstantiateErrorKind>(A) })),
        );
        b.to_async(Builder::new_current_thread().build().unwrap()).iter(|| {
            let container = container.clone();
            async move { container.resolve_async(a).await.unwrap() }
        });
    })
    .bench_function("async_resolve_many", |b| {
        struct A(Arc<B>, Arc<C>);
        struct B(i32);
        struct C(Arc<CA>);
        struct CA;

        let a = Token::<A>::of();
        let b_token = Token::<B>::of();
        let c = Token::<C>::of();
        let ca = Token::<CA>::of();

        let container = Container::new(
            Registry::new()
                .provide(Provider::new_async(ca, |_| async { Ok::<_, InstantiateErrorKind>(CA) }))
                .provide(Provider::new_async(c, move |resolver| async move {
                    Ok::<_, InstantiateErrorKind>(C(resolver.resolve_async(ca).await?))
                }))
                .provide(Provider::new(b_token, |_| Ok(B(2))))
                .provide(Provider::new_async(a, move |resolver| async move {
                    Ok::<_, InstantiateErrorKind>(A(resolver.resolve_async(b_token).await?, resolver.resolve_async(c).await?))
                })),
        );
        b.to_async(Builder::new_current_thread().build().unwrap()).iter(|| {
            let container = container.clone();
            async move { container.resolve_async(a).await.unwrap() }
        });
    })
    .bench_function("async_resolve_transient_many", |b| {
        struct A(Arc<B>, Arc<C>);
        struct B(i32);
        struct C;

        let a = Token::<A>::of();
        let b_token = Token::<B>::of();
        let c = Token::<C>::of();

        let container = Container::new(
            Registry::new()
                .provide(Provider::new_async(c, |_| async { Ok::<_, InstantiateErrorKind>(C) }).transient())
                .provide(Provider::new(b_token, |_| Ok(B(2))).transient())
                .provide(
                    Provider::new_async(a, move |_| async move {
                        let b = resolid_di::inject_async(b_token).await?;
                        let c = resolid_di::inject_async(c).await?;
                        Ok::<_, InstantiateErrorKind>(A(b, c))
                    })
                    .transient(),
                ),
        );
        b.to_async(Builder::new_current_thread().build().unwrap()).iter(|| {
            let container = container.clone();
            async move { container.resolve_async(a).await.unwrap() }
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
