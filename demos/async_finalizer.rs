use resolid_di::{inject_async, AsyncDispose, Container, Dispose, InstantiateErrorKind, Provider, Registry, Token};
use std::sync::Arc;

// Dependency that will be alive throughout the application
#[derive(Default, Clone)]
struct Config {
    _host: &'static str,
    _port: i16,
}

struct PostgresPool {
    _config: Arc<Config>,
}

impl AsyncDispose for PostgresPool {
    async fn dispose(&self) -> anyhow::Result<()> {
        println!("Postgres pool closed");
        Ok(())
    }
}

struct UserRepo {
    pool: Arc<PostgresPool>,
}

impl UserRepo {
    fn create_user(&self) {
        let _pool = &self.pool;
        println!("User created");
    }
}

impl Dispose for UserRepo {
    fn dispose(&self) -> anyhow::Result<()> {
        println!("User repository finalized");
        Ok(())
    }
}

fn init_container(config: Config) -> Container {
    let config_token = Token::<Config>::of();
    let pool_token = Token::<PostgresPool>::of();

    let registry = Registry::new()
        .provide(Provider::value(config_token, config).with_finalizer(|_| {
            println!("Config finalized");
            Ok(())
        }))
        // Async factories can await their dependencies, the injection context follows the factory across await points.
        // Sync providers, like the config one, can be resolved by async resolution too.
        .provide(
            Provider::new_async(pool_token, move |_| async move {
                let config = inject_async(config_token).await?;
                Ok::<_, InstantiateErrorKind>(PostgresPool { _config: config })
            })
            .async_disposable(),
        )
        .provide(
            Provider::new_async(Token::<UserRepo>::of(), move |resolver| async move {
                Ok::<_, InstantiateErrorKind>(UserRepo {
                    pool: resolver.resolve_async(pool_token).await?,
                })
            })
            .disposable(),
        );
    Container::new(registry)
}

// Output:
// User created
// Config finalized
// Postgres pool closed
// User repository finalized
// Container disposed
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let container = init_container(Config::default());

    let repo = container.resolve_async(Token::<UserRepo>::of()).await.unwrap();
    repo.create_user();

    // Finalizers are called in the construction order of the cached dependencies,
    // failed finalizers don't stop disposal and are reported together
    container.dispose().await.unwrap();
    println!("Container disposed");
}
