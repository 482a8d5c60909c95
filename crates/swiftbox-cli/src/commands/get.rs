//! get command - download an object

use super::CommandContext;
use anyhow::Result;
use std::path::Path;

pub async fn execute(ctx: &CommandContext, container: &str, object: &str, dest: &Path) -> Result<()> {
    ctx.debug(&format!("Downloading {}/{} to {:?}", container, object, dest));
    ctx.client.download_file(container, object, dest).await?;
    ctx.done("download", &format!("{}/{} to {}", container, object, dest.display()));
    Ok(())
}
