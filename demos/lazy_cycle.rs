use resolid_di::{lazy_inject, Container, LazyHandle, Provider, Registry, Token};
use std::sync::Arc;

struct ApiService {
    auth: Arc<AuthService>,
}

impl ApiService {
    fn call(&self) -> String {
        format!("api call as {}", self.auth.user())
    }
}

struct AuthService {
    // `AuthService` needs `ApiService` only after both are constructed
    api: LazyHandle<ApiService>,
}

impl AuthService {
    fn user(&self) -> &'static str {
        "admin"
    }

    fn refresh(&self) -> String {
        self.api.value().map_or_else(|err| err.to_string(), |api| api.call())
    }
}

fn main() {
    let api = Token::<ApiService>::new("ApiService");
    let auth = Token::<AuthService>::new("AuthService");

    let container = Container::new(
        Registry::new()
            .provide(Provider::new(api, move |resolver| {
                Ok(ApiService {
                    auth: resolver.resolve(auth)?,
                })
            }))
            // A plain `resolve(api)` here would fail with a circular dependency error
            .provide(Provider::new(auth, move |_| Ok(AuthService { api: lazy_inject(api)? }))),
    );

    let api = container.resolve(api).unwrap();
    println!("{}", api.call());
    println!("{}", api.auth.refresh());
}
