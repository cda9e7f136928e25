//! Country Repository

use super::{Entity, MemoryTable, RepoResult, Repository};
use shared::models::Country;
use std::sync::Arc;

impl Entity for Country {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone)]
pub struct CountryRepository {
    base: Arc<dyn Repository<Country>>,
}

impl Default for CountryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryRepository {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryTable::new()))
    }

    pub fn with_backend(base: Arc<dyn Repository<Country>>) -> Self {
        Self { base }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Country>> {
        self.base.find_by_id(id).await
    }

    /// Find country by two-letter ISO code (case-insensitive)
    pub async fn find_by_two_letter_iso_code(&self, code: &str) -> RepoResult<Option<Country>> {
        let code = code.trim().to_string();
        if code.is_empty() {
            return Ok(None);
        }
        let rows = self
            .base
            .find_by(&move |c: &Country| c.two_letter_iso_code.eq_ignore_ascii_case(&code))
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert(&self, country: Country) -> RepoResult<Country> {
        self.base.insert(country).await
    }
}
