use rocket::{
    figment::Figment,
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Config {
    pub storage: StorageKind,
    /// Directory served at `/`; the bundled `static/` when unset.
    pub static_path: Option<String>,
    pub log_dir: Option<String>,
    /// Session lifetime in seconds.
    pub session_ttl: i64,
    pub bcrypt_cost: u32,
    /// Seconds before giving up on a web page title.
    pub title_fetch_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            static_path: None,
            log_dir: None,
            session_ttl: 7 * 24 * 60 * 60,
            bcrypt_cost: 10,
            title_fetch_timeout: 10,
        }
    }
}

pub fn config_provider() -> Figment {
    use dotenvy::dotenv;
    use rocket::figment::providers::{Env, Serialized};

    dotenv().ok();

    rocket::figment::Figment::from(rocket::Config::default())
        .merge(Serialized::defaults(Config::default()))
        .merge(("databases.main", rocket_db_pools::Config::default()))
        .merge(Env::prefixed("TM_").global())
}

pub fn get_database_url() -> Option<String> {
    config_provider()
        .extract_inner::<String>("databases.main.url")
        .ok()
        .filter(|url| !url.is_empty())
}
