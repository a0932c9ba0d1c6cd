use crate::domain::model::{Category, Provider};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Deserialize;

/// Marker for "no category filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Immutable list of bookable providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    providers: Vec<Provider>,
}

impl ProviderCatalog {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// Loads a JSON array of providers. A missing file yields an empty catalog.
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let data = match storage.read_file(path).await {
            Ok(data) => data,
            Err(crate::utils::error::AssistantError::IoError(e))
                if e.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::warn!("Provider catalog '{}' not found, starting empty", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let providers: Vec<Provider> = serde_json::from_slice(&data)?;
        tracing::info!("📂 Loaded {} providers from {}", providers.len(), path);
        Ok(Self::new(providers))
    }

    pub fn all(&self) -> &[Provider] {
        &self.providers
    }

    /// Case-insensitive search over name and description, plus an optional
    /// category (`all` or empty disables the category filter). Category
    /// labels match across languages, so `Comida` also finds `Food`.
    pub fn filter(&self, query: &ProviderQuery) -> Vec<&Provider> {
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES));

        self.providers
            .iter()
            .filter(|provider| match &needle {
                Some(needle) => {
                    provider.name.to_lowercase().contains(needle)
                        || provider
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                }
                None => true,
            })
            .filter(|provider| {
                category.map_or(true, |c| Category::same(&provider.category, c))
            })
            .collect()
    }

    /// Distinct category labels in first-seen order. Labels naming the same
    /// category collapse onto the first spelling seen.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for provider in &self.providers {
            if !seen.iter().any(|label| Category::same(label, &provider.category)) {
                seen.push(provider.category.clone());
            }
        }
        seen
    }
}
