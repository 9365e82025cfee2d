use tagmark::api::configs;

#[rocket::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> anyhow::Result<()> {
    let log_dir = configs::config_provider()
        .extract_inner::<Option<String>>("log_dir")
        .ok()
        .flatten();
    let _guard = tagmark::utils::logging::setup_logging(log_dir.as_deref());

    let _ = tagmark::rocket().await?.launch().await?;
    Ok(())
}
