pub mod decode;
pub mod read;
pub mod schema;

pub use decode::DecodeCommand;
pub use read::{OutputFormat, ReadCommand};
pub use schema::SchemaCommand;
