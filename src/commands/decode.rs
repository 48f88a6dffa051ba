use crate::context::Context;
use crate::secrets::decode_field;
use anyhow::Result;

/// Handles the 'decode' command - shows how a raw field value is exposed
pub struct DecodeCommand;

impl DecodeCommand {
    pub fn execute(ctx: &Context, value: &str) -> Result<()> {
        let decoded = decode_field(value);

        if decoded.is_malformed() {
            ctx.output
                .warning("Malformed base64 payload, showing partial decode");
        }

        ctx.output.raw(&decoded.into_value());
        Ok(())
    }
}
