//! objects command - list objects in a container

use super::CommandContext;
use crate::utils::{format_datetime, format_size};
use anyhow::Result;
use serde::Serialize;
use swiftbox::ObjectInfo;

#[derive(Serialize)]
struct ObjectList<'a> {
    container: &'a str,
    objects: &'a [ObjectInfo],
    total_objects: usize,
    total_size: i64,
}

pub async fn execute(
    ctx: &CommandContext,
    container: &str,
    long: bool,
    human_readable: bool,
) -> Result<()> {
    ctx.debug(&format!("Listing objects in container '{}'", container));

    let objects = ctx.client.list_objects(container).await?;
    let total_size: i64 = objects.iter().map(|o| o.size_bytes).sum();

    if ctx.is_json() {
        let result = ObjectList {
            container,
            objects: &objects,
            total_objects: objects.len(),
            total_size,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for obj in &objects {
        if long {
            println!(
                "{} {:>12}  {}",
                format_datetime(&obj.last_modified),
                format_size(obj.size_bytes, human_readable),
                obj.name
            );
        } else {
            println!("{}", obj.name);
        }
    }

    ctx.info(&format!(
        "\nTotal: {} object(s), {}",
        objects.len(),
        format_size(total_size, human_readable)
    ));

    Ok(())
}
