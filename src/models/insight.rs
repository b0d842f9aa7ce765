use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use eyre::{Context, Result};

#[cfg(test)]
use mockall::automock;

/// Supplies the domain content an insight is about (an alert, a log line,
/// a visualization). Called lazily, right before a summary is requested.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContextProvider {
    async fn context(&self) -> Result<String>;
}

pub type ArcContextProvider = Arc<dyn ContextProvider + Send + Sync>;

/// The subject an in-context popover is anchored to.
#[derive(Clone, Default)]
pub struct IncontextInsight {
    key: String,
    suggestions: Vec<String>,
    datasource_id: Option<String>,
    context_provider: Option<ArcContextProvider>,
}

impl IncontextInsight {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_datasource_id(mut self, id: Option<String>) -> Self {
        self.datasource_id = id;
        self
    }

    pub fn with_context_provider(mut self, provider: ArcContextProvider) -> Self {
        self.context_provider = Some(provider);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn datasource_id(&self) -> Option<&str> {
        self.datasource_id.as_deref()
    }

    pub fn context_provider(&self) -> Option<&ArcContextProvider> {
        self.context_provider.as_ref()
    }
}

impl Debug for IncontextInsight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncontextInsight")
            .field("key", &self.key)
            .field("suggestions", &self.suggestions)
            .field("datasource_id", &self.datasource_id)
            .field("context_provider", &self.context_provider.is_some())
            .finish()
    }
}

/// Context known up front.
pub struct StaticContext(pub String);

#[async_trait]
impl ContextProvider for StaticContext {
    async fn context(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Context read from disk each time it is requested.
pub struct FileContext {
    path: String,
}

impl FileContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContextProvider for FileContext {
    async fn context(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .wrap_err(format!("reading context file {}", self.path))
    }
}
