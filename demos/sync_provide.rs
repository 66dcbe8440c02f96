use resolid_di::{inject, Container, InstantiateResult, Provider, Registry, Resolver, Token};
use std::sync::Arc;

// Dependency that will be alive throughout the application
#[derive(Default, Clone)]
struct Config {
    _host: &'static str,
    _port: i16,
    _user: &'static str,
    _password: &'static str,
    _db: &'static str,
}

trait UserRepo: Send + Sync {
    fn create_user(&self);
}

struct PostgresUserRepo {
    _config: Arc<Config>,
}

impl UserRepo for PostgresUserRepo {
    fn create_user(&self) {
        println!("User created");
    }
}

struct CreateUser {
    // Dependency without details about the specific implementation
    repo: Arc<dyn UserRepo>,
}

impl CreateUser {
    fn handle(&self) {
        self.repo.create_user();
    }
}

// Tokens are identities, two tokens with the same name are still different tokens
fn config_token() -> Token<Config> {
    Token::of()
}

fn user_repo_token() -> Token<Arc<dyn UserRepo>> {
    Token::of()
}

fn init_container(config: Config) -> Container {
    // We can use functions as factories instead of closures
    fn create_user(resolver: &Resolver) -> InstantiateResult<CreateUser> {
        Ok(CreateUser {
            repo: (*resolver.resolve(user_repo_token())?).clone(),
        })
    }

    Container::new(
        Registry::new()
            .provide(Provider::value(config_token(), config))
            .provide(Provider::new(user_repo_token(), |_| {
                // Factories can also pull dependencies from the ambient injection context
                let config = inject(config_token())?;
                Ok(Arc::new(PostgresUserRepo { _config: config }) as Arc<dyn UserRepo>)
            }))
            // A new interactor on every resolution
            .provide(Provider::new(Token::<CreateUser>::of(), create_user).transient()),
    )
}

fn main() {
    let container = init_container(Config::default());

    let interactor = container.resolve(Token::<CreateUser>::of()).unwrap();
    interactor.handle();

    // Singletons are shared, so we get the same config instance every time.
    // Don't worry about cloning the container because it's cheap.
    let config_1 = container.resolve(config_token()).unwrap();
    let config_2 = container.clone().resolve(config_token()).unwrap();
    assert!(Arc::ptr_eq(&config_1, &config_2));
}
