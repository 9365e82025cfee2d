use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use rocket::fairing::AdHoc;
use rocket::State;
use tracing::{debug, error, info};

use super::configs::Config;
use super::errors::Error;
use super::guards::Auth;
use crate::utils::FetchError;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title[^>]*>([^<]+)</title>").expect("valid regex"));

/// First `<title>` of an html document.
pub fn extract_title(html: &str) -> Option<&str> {
    TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Looks up page titles for the add-bookmark form.
pub struct TitleFetcher {
    client: reqwest::Client,
}

impl TitleFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }
        let html = self.client.get(parsed).send().await?.text().await?;
        Ok(extract_title(&html).map(String::from))
    }
}

/// Empty body when the page has no title; 404 when it cannot be fetched.
#[get("/web-page-title/<url>")]
pub async fn web_page_title(
    _auth: Auth,
    fetcher: &State<TitleFetcher>,
    url: &str,
) -> Result<String, Error> {
    match fetcher.fetch(url).await {
        Ok(title) => Ok(title.unwrap_or_default()),
        Err(e) => {
            debug!(url, error = %e, "failed to fetch page title");
            Err(Error::NotFound("Page not reachable".to_string()))
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![web_page_title]
}

pub fn stage() -> AdHoc {
    AdHoc::try_on_ignite("Title Fetcher", |rocket| async {
        let timeout = rocket
            .figment()
            .extract_inner::<u64>("title_fetch_timeout")
            .unwrap_or_else(|_| Config::default().title_fetch_timeout);
        match TitleFetcher::new(Duration::from_secs(timeout)) {
            Ok(fetcher) => {
                info!(timeout, "title fetcher ready");
                Ok(rocket.manage(fetcher))
            }
            Err(e) => {
                error!(error = %e, "failed to build http client");
                Err(rocket)
            }
        }
    })
}
