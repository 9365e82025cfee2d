pub mod auth;
pub mod bookmark;
pub mod configs;
pub mod errors;
pub mod fairings;
pub mod guards;
pub mod quick_view;
pub mod tag;
pub mod title;
pub mod views;

#[cfg(test)]
pub(crate) mod testing {
    use rocket::figment::Figment;
    use rocket::http::ContentType;
    use rocket::local::blocking::{Client, LocalResponse};

    use crate::api::configs::config_provider;

    pub fn test_figment() -> Figment {
        config_provider()
            .merge(("storage", "memory"))
            .merge(("bcrypt_cost", 4))
            .merge(("log_level", "off"))
    }

    pub fn client() -> Client {
        Client::tracked(crate::app(test_figment())).expect("valid rocket instance")
    }

    pub fn signup<'c>(client: &'c Client, username: &str, password: &str) -> LocalResponse<'c> {
        client
            .post("/signup")
            .header(ContentType::Form)
            .body(format!("username={}&password={}", username, password))
            .dispatch()
    }

    pub fn login<'c>(client: &'c Client, username: &str, password: &str) -> LocalResponse<'c> {
        client
            .post("/login")
            .header(ContentType::Form)
            .body(format!("username={}&password={}", username, password))
            .dispatch()
    }

    pub fn signup_and_login(client: &Client, username: &str) {
        signup(client, username, "secret");
        login(client, username, "secret");
    }

    pub fn logged_in_client(username: &str) -> Client {
        let client = client();
        signup_and_login(&client, username);
        client
    }

    pub fn add_bookmark<'c>(
        client: &'c Client,
        url: &str,
        description: &str,
        tags: &str,
    ) -> LocalResponse<'c> {
        client
            .post("/b/add")
            .header(ContentType::Form)
            .body(format!(
                "url={}&description={}&tags={}",
                url,
                description,
                tags.replace(' ', "+")
            ))
            .dispatch()
    }

    pub fn add_quick_view<'c>(client: &'c Client, name: &str, tags: &str) -> LocalResponse<'c> {
        client
            .post("/v/add")
            .header(ContentType::Form)
            .body(format!("name={}&tags={}", name, tags.replace(' ', "+")))
            .dispatch()
    }
}
