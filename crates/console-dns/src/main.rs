//! console-dns - authoritative DNS for console-dns zone catalogues

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    console_dns::run().await
}
