//! rm command - delete an object

use super::CommandContext;
use anyhow::Result;

pub async fn execute(ctx: &CommandContext, container: &str, object: &str) -> Result<()> {
    ctx.debug(&format!("Deleting {}/{}", container, object));
    ctx.client.delete_object(container, object).await?;
    ctx.done("delete", &format!("{}/{}", container, object));
    Ok(())
}
