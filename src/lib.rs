#[macro_use]
extern crate rocket;

pub mod api;
pub mod auth;
pub mod db;
pub mod session;
pub mod tags;
pub mod utils;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::fs::FileServer;
use rocket::{Build, Rocket};
use std::path::Path;
use tracing::warn;

use crate::api::configs::{self, Config, StorageKind};
use crate::api::views::Templates;
use crate::session::Sessions;

#[cfg(test)]
#[cfg(not(tarpaulin_include))]
#[ctor::ctor]
fn init() {
    crate::utils::logging::setup_console_log();
}

/// Routes, catchers and managed state on top of the given configuration.
pub fn app(figment: Figment) -> Rocket<Build> {
    use crate::api::{auth, bookmark, errors, fairings, quick_view, tag, title};

    let defaults = Config::default();
    let static_path = figment
        .extract_inner::<Option<String>>("static_path")
        .ok()
        .flatten()
        .unwrap_or_else(|| rocket::fs::relative!("static").to_string());
    let session_ttl = figment
        .extract_inner::<i64>("session_ttl")
        .unwrap_or(defaults.session_ttl);

    let mut builder = rocket::custom(figment);
    if Path::new(&static_path).is_dir() {
        builder = builder.mount("/", FileServer::from(static_path));
    } else {
        warn!(%static_path, "static directory not found, serving pages unstyled");
    }
    builder
        .manage(Templates::new())
        .manage(Sessions::new(time::Duration::seconds(session_ttl)))
        .attach(fairings::db::stage())
        .attach(title::stage())
        .attach(AdHoc::config::<Config>())
        .mount("/", auth::routes())
        .mount("/", bookmark::routes())
        .mount("/", tag::routes())
        .mount("/", quick_view::routes())
        .mount("/", title::routes())
        .register("/", errors::catchers())
}

#[cfg(not(tarpaulin_include))]
pub async fn rocket() -> anyhow::Result<Rocket<Build>> {
    let cfg_provider = configs::config_provider();
    let storage = cfg_provider
        .extract_inner::<StorageKind>("storage")
        .unwrap_or_default();
    if storage == StorageKind::Postgres {
        crate::db::connection::run_migrations().await?;
    }
    Ok(app(cfg_provider))
}
