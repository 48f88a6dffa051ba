use crate::traits::{FileSystem, Output, RealFileSystem, TerminalOutput};
#[cfg(test)]
use crate::traits::{MockFileSystem, MockOutput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
#[derive(Clone)]
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub output: Arc<dyn Output>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            output: Arc::new(TerminalOutput),
        }
    }

    /// Create a test context around a specific mock output
    #[cfg(test)]
    pub fn test_with_output(output: Arc<MockOutput>) -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            output,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
