use crate::context::Context;
use crate::datasource::{ResourceData, SecretDataSource};
use crate::secrets::{SecretMaterializer, SecretStore};
use anyhow::{Context as AnyhowContext, Result};
use clap::ValueEnum;
use std::sync::Arc;

/// How command results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Handles the 'read' command - materializes a secret and prints it
pub struct ReadCommand;

impl ReadCommand {
    /// Execute the read command against `store`
    pub fn execute(
        ctx: &Context,
        store: Arc<dyn SecretStore>,
        path: &str,
        format: OutputFormat,
        field: Option<&str>,
    ) -> Result<()> {
        let data_source = SecretDataSource::new(SecretMaterializer::new(store));

        let mut state = ResourceData::new(path);
        data_source
            .read(&mut state)
            .with_context(|| format!("Failed to read secret '{}'", path))?;

        if let Some(name) = field {
            let value = state
                .data
                .get(name)
                .with_context(|| format!("Field '{}' not found in secret '{}'", name, state.id))?;
            ctx.output.raw(value);
            return Ok(());
        }

        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&state)
                    .context("Failed to serialize secret")?;
                ctx.output.raw(&json);
            }
            OutputFormat::Text => Self::print_text(ctx, &state),
        }

        Ok(())
    }

    fn print_text(ctx: &Context, state: &ResourceData) {
        ctx.output.section("Secret");
        ctx.output.key_value("ID", &state.id);
        ctx.output.key_value("Path", &state.path);

        if state.data.is_empty() {
            ctx.output.blank();
            ctx.output.dimmed("No secret stored at this path");
            return;
        }

        ctx.output.section("Data");
        for (name, value) in &state.data {
            ctx.output.key_value(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::{FetchErrorKind, MockSecretStore, SecretError};
    use crate::traits::{MockOutput, OutputMessage};

    fn setup(store: MockSecretStore) -> (Context, Arc<MockOutput>, Arc<dyn SecretStore>) {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with_output(output.clone());
        let store: Arc<dyn SecretStore> = Arc::new(store);
        (ctx, output, store)
    }

    fn creds_store() -> MockSecretStore {
        MockSecretStore::new()
            .with_secret("creds/db", &[("user", "alice"), ("password", "base64:c2VjcmV0")])
    }

    #[test]
    fn test_read_text() {
        let (ctx, output, store) = setup(creds_store());

        ReadCommand::execute(&ctx, store, "/creds/db", OutputFormat::Text, None).unwrap();

        assert!(output.contains_message(&OutputMessage::KeyValue(
            "ID".to_string(),
            "path:creds/db".to_string()
        )));
        assert!(output.contains_message(&OutputMessage::KeyValue(
            "password".to_string(),
            "secret".to_string()
        )));
    }

    #[test]
    fn test_read_json() {
        let (ctx, output, store) = setup(creds_store());

        ReadCommand::execute(&ctx, store, "creds/db", OutputFormat::Json, None).unwrap();

        let raw = output.get_raw();
        assert_eq!(raw.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&raw[0]).unwrap();
        assert_eq!(parsed["id"], "path:creds/db");
        assert_eq!(parsed["data"]["user"], "alice");
        assert_eq!(parsed["data"]["password"], "secret");
    }

    #[test]
    fn test_read_single_field() {
        let (ctx, output, store) = setup(creds_store());

        ReadCommand::execute(&ctx, store, "creds/db", OutputFormat::Text, Some("password"))
            .unwrap();

        assert_eq!(output.get_raw(), vec!["secret".to_string()]);
    }

    #[test]
    fn test_read_missing_field() {
        let (ctx, _, store) = setup(creds_store());

        let err = ReadCommand::execute(&ctx, store, "creds/db", OutputFormat::Text, Some("token"))
            .unwrap_err();
        assert!(err.to_string().contains("Field 'token' not found"));
    }

    #[test]
    fn test_read_not_found_prints_empty() {
        let (ctx, output, store) = setup(MockSecretStore::new());

        ReadCommand::execute(&ctx, store, "nothing/here", OutputFormat::Text, None).unwrap();

        assert!(output.contains_message(&OutputMessage::Dimmed(
            "No secret stored at this path".to_string()
        )));
    }

    #[test]
    fn test_read_fetch_error() {
        let err = SecretError::fetch("creds/db", FetchErrorKind::Unauthorized, "unauthorized");
        let (ctx, output, store) =
            setup(MockSecretStore::new().with_response("creds/db", Err(err.clone())));

        let result = ReadCommand::execute(&ctx, store, "creds/db", OutputFormat::Json, None);

        let error = result.unwrap_err();
        assert_eq!(error.downcast_ref::<SecretError>(), Some(&err));
        assert!(output.get_raw().is_empty());
    }
}
