//! put command - upload a local file

use super::CommandContext;
use anyhow::Result;
use std::path::Path;
use swiftbox_core::utils::object_name_from_path;

pub async fn execute(ctx: &CommandContext, container: &str, file: &Path) -> Result<()> {
    ctx.debug(&format!("Uploading {:?} to {}", file, container));
    ctx.client.upload_file(container, file).await?;

    let object = object_name_from_path(file).unwrap_or_default();
    ctx.done("upload", &format!("{} to {}/{}", file.display(), container, object));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::OutputFormat;
    use swiftbox::ErrorKind;

    #[tokio::test]
    async fn test_put() {
        let dir = tempfile::tempdir().unwrap();
        let (backend, ctx) = context(OutputFormat::Text);
        ctx.client.create_container("c1").await.unwrap();

        let file = dir.path().join("ulfile");
        std::fs::write(&file, "object strage test\n").unwrap();
        execute(&ctx, "c1", &file).await.unwrap();
        assert_eq!(backend.object_count("c1"), Some(1));

        let err = execute(&ctx, "c1", &dir.path().join("missing")).await.unwrap_err();
        let kind = err.downcast_ref::<swiftbox::Error>().map(|e| e.kind());
        assert_eq!(kind, Some(ErrorKind::CannotOpenFile));
    }
}
