use anyhow::Context;
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::AsyncPgConnection;

use crate::api::configs;

pub(crate) fn instrument(conn: &mut AsyncPgConnection) {
    use diesel::connection::InstrumentationEvent;
    use diesel_async::AsyncConnection;

    conn.set_instrumentation(|event: InstrumentationEvent<'_>| match event {
        InstrumentationEvent::StartQuery { query, .. } => {
            tracing::debug!("Executing query: {}", query);
        }
        InstrumentationEvent::FinishQuery { query, error, .. } => match error {
            Some(e) => tracing::error!("Query failed: {}\nError: {:?}", query, e),
            None => tracing::debug!("Executing query succeeded: {}", query),
        },
        _ => {}
    });
}

async fn establish_instrumented(url: &str) -> ConnectionResult<AsyncPgConnection> {
    use diesel_async::AsyncConnection;

    let mut conn = AsyncPgConnection::establish(url).await?;
    instrument(&mut conn);
    Ok(conn)
}

/// Pool manager whose connections are instrumented once, when they are opened.
pub(crate) fn manager(url: String) -> AsyncDieselConnectionManager<AsyncPgConnection> {
    let mut config = ManagerConfig::default();
    config.custom_setup = Box::new(|url| Box::pin(establish_instrumented(url)));
    AsyncDieselConnectionManager::new_with_config(url, config)
}

pub async fn establish() -> anyhow::Result<AsyncPgConnection> {
    use diesel_async::AsyncConnection;

    let url = configs::get_database_url().context("databases.main.url must be set")?;

    let mut conn = AsyncPgConnection::establish(&url)
        .await
        .context("Error connecting database")?;

    if cfg!(debug_assertions) {
        instrument(&mut conn);
    }

    Ok(conn)
}

pub async fn run_migrations() -> anyhow::Result<()> {
    use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
    let conn = establish().await?;

    let mut async_wrapper: AsyncConnectionWrapper<AsyncPgConnection> =
        AsyncConnectionWrapper::from(conn);

    tokio::task::spawn_blocking(move || {
        async_wrapper
            .run_pending_migrations(MIGRATIONS)
            .map(|applied| applied.len())
            .map_err(|e| anyhow::anyhow!("Error running migrations: {}", e))
    })
    .await?
    .map(|applied| tracing::info!(applied, "migrations done"))
}
