//! mb command - make container

use super::CommandContext;
use anyhow::Result;

pub async fn execute(ctx: &CommandContext, container: &str) -> Result<()> {
    ctx.debug(&format!("Creating container: {}", container));
    ctx.client.create_container(container).await?;
    ctx.done("make_container", container);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::OutputFormat;
    use swiftbox::ErrorKind;

    #[tokio::test]
    async fn test_mb_twice() {
        let (backend, ctx) = context(OutputFormat::Text);
        execute(&ctx, "c1").await.unwrap();
        assert_eq!(backend.container_names(), vec!["c1".to_string()]);

        let err = execute(&ctx, "c1").await.unwrap_err();
        let err = err.downcast_ref::<swiftbox::Error>().unwrap();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }
}
