//! ls command - list containers

use super::CommandContext;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct ContainerList<'a> {
    prefix: &'a str,
    containers: &'a [String],
    total: usize,
}

pub async fn execute(ctx: &CommandContext, prefix: Option<&str>) -> Result<()> {
    let prefix = prefix.unwrap_or("");
    ctx.debug(&format!("Listing containers with prefix '{}'", prefix));

    let containers = ctx.client.list_containers(prefix).await?;

    if ctx.is_json() {
        let result = ContainerList {
            prefix,
            containers: &containers,
            total: containers.len(),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for name in &containers {
            println!("{}", name.blue().bold());
        }
        ctx.info(&format!("\nTotal: {} container(s)", containers.len()));
    }

    Ok(())
}
