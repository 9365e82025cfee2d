use diesel_async::{
    pooled_connection::deadpool::{BuildError, Object, Pool, PoolError},
    AsyncPgConnection,
};
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket_db_pools::{Database, Error};
use tracing::{error, info};

use crate::api::configs::{Config, StorageKind};
use crate::db::{MemoryStore, PgStore, Storage};

pub type InitError = BuildError;
pub type GetError = PoolError;
pub type Connection = AsyncPgConnection;
pub struct DBPool(Pool<Connection>);

#[rocket::async_trait]
impl rocket_db_pools::Pool for DBPool {
    type Connection = Object<Connection>;

    type Error = Error<InitError, GetError>;

    async fn init(figment: &Figment) -> Result<Self, Self::Error> {
        let url = figment.extract_inner::<String>("url").unwrap_or_default();
        let config = crate::db::connection::manager(url);
        match Pool::builder(config).build() {
            Ok(pool) => Ok(Self(pool)),
            Err(e) => Err(Error::Init(e)),
        }
    }

    async fn get(&self) -> Result<Self::Connection, Self::Error> {
        self.0.get().await.map_err(Error::Get)
    }

    async fn close(&self) {
        self.0.close()
    }
}

#[derive(Database)]
#[database("main")]
pub struct Db(DBPool);

/// Picks the store named by `Config::storage` and puts it in managed state.
pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Storage", |rocket| async {
        let kind = rocket
            .figment()
            .extract_inner::<StorageKind>("storage")
            .unwrap_or_else(|_| Config::default().storage);

        match kind {
            StorageKind::Memory => {
                info!("using in-memory storage, nothing will be persisted");
                rocket.manage(Storage::new(MemoryStore::new()))
            }
            StorageKind::Postgres => rocket
                .attach(Db::init())
                .attach(AdHoc::try_on_ignite("Postgres Storage", |rocket| async {
                    match Db::fetch(&rocket) {
                        Some(db) => {
                            let pool = db.0 .0.clone();
                            Ok(rocket.manage(Storage::new(PgStore::new(pool))))
                        }
                        None => {
                            error!("database pool is not initialized");
                            Err(rocket)
                        }
                    }
                })),
        }
    })
}
