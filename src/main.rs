use deskhaven::cli::DeskhavenCli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    DeskhavenCli::run().await
}
