use anyhow::Context as _;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crm::config::CrmConfig;
use crm::infra::json_store::JsonStore;
use crm::infra::store::Backend;
use crm::router::build_router;
use crm::state::AppState;
use crm::usecase::user::SeedDemoUsersUseCase;
use crm_auth_types::token::Authenticator;
use crm_core::config::Config;
use crm_core::middleware::cors_layer;
use crm_core::tracing::init_tracing;
use crm_migration::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = CrmConfig::try_from_env().context("load config from environment")?;

    let backend = match &config.database_url {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .context("connect to database")?;
            Migrator::up(&db, None).await.context("run migrations")?;
            info!("using database backend");
            Backend::Database(db)
        }
        None => {
            let store = JsonStore::open(&config.crm_data_dir).await?;
            info!(data_dir = %config.crm_data_dir.display(), "using json file backend");
            Backend::Json(store)
        }
    };

    let state = AppState {
        backend,
        authenticator: Authenticator::new(config.jwt_secret.as_str()),
    };

    if config.crm_seed_users {
        SeedDemoUsersUseCase {
            repo: state.user_repo(),
        }
        .execute()
        .await
        .context("seed demo users")?;
    }

    let cors = cors_layer(&config.crm_cors_origin).context("invalid CRM_CORS_ORIGIN")?;
    let router = build_router(state).layer(cors);

    let http_addr = format!("0.0.0.0:{}", config.crm_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("crm service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
