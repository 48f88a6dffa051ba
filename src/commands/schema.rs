use super::read::OutputFormat;
use crate::context::Context;
use crate::datasource::schema;
use anyhow::{Context as AnyhowContext, Result};

/// Handles the 'schema' command - describes the data source attributes
pub struct SchemaCommand;

impl SchemaCommand {
    pub fn execute(ctx: &Context, format: OutputFormat) -> Result<()> {
        let attributes = schema();

        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&attributes)
                    .context("Failed to serialize schema")?;
                ctx.output.raw(&json);
            }
            OutputFormat::Text => {
                ctx.output.section("vault_secret data source");
                for attr in &attributes {
                    let mode = if attr.required { "required" } else { "computed" };
                    ctx.output.key_value(
                        attr.name,
                        &format!("{}, {} - {}", attr.attr_type, mode, attr.description),
                    );
                }
            }
        }

        Ok(())
    }
}
