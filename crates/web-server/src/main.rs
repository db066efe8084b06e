// This main function is the entry point when running `cargo run -p web-server`.
// Its only job is to load the configuration and hand off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config()?;
    web_server::run_server(config).await
}
