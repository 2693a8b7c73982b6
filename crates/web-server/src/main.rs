use configuration::{init_tracing, load_config};

// This main function is the entry point when running `cargo run -p web-server`.
// It loads the configuration and hands over to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_config()?;
    let _guard = init_tracing(&settings.logging)?;
    web_server::run_server(settings).await
}
