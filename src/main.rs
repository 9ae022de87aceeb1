//! waybackprov binary entry point.
//!
//! All logic lives in the library; see [`waybackprov::cli::run`].

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    waybackprov::cli::run().await
}
