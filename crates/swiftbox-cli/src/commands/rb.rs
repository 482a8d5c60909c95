//! rb command - remove container

use super::CommandContext;
use anyhow::Result;

pub async fn execute(ctx: &CommandContext, container: &str) -> Result<()> {
    ctx.debug(&format!(
        "Removing container {} ({} emptiness check)",
        container,
        ctx.client.options().emptiness_check.as_str()
    ));

    ctx.client.delete_container(container).await?;
    ctx.done("remove_container", container);
    Ok(())
}
