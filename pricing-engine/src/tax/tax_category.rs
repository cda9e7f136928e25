//! Tax category service - CRUD with caching and change notifications

use crate::db::repository::TaxCategoryRepository;
use crate::services::cache::TAX_CATEGORIES_PREFIX;
use crate::services::{CacheService, EntityKind, EntityNotifier};
use shared::error::{AppError, AppResult};
use shared::models::{TaxCategory, TaxCategoryCreate, TaxCategoryUpdate};
use shared::util::snowflake_id;

const ALL_KEY: &str = "tax_category.all";

fn by_id_key(id: i64) -> String {
    format!("{TAX_CATEGORIES_PREFIX}id.{id}")
}

#[derive(Clone)]
pub struct TaxCategoryService {
    repo: TaxCategoryRepository,
    cache: CacheService,
    notifier: EntityNotifier,
}

impl TaxCategoryService {
    pub fn new(repo: TaxCategoryRepository, cache: CacheService, notifier: EntityNotifier) -> Self {
        Self {
            repo,
            cache,
            notifier,
        }
    }

    pub async fn get_all_tax_categories(&self) -> AppResult<Vec<TaxCategory>> {
        self.cache
            .get_or_compute(ALL_KEY, || async {
                self.repo.find_all().await.map_err(AppError::from)
            })
            .await
    }

    pub async fn get_tax_category_by_id(&self, id: i64) -> AppResult<Option<TaxCategory>> {
        self.cache
            .get_or_compute(&by_id_key(id), || async {
                self.repo.find_by_id(id).await.map_err(AppError::from)
            })
            .await
    }

    pub async fn insert_tax_category(&self, data: TaxCategoryCreate) -> AppResult<TaxCategory> {
        let category = TaxCategory {
            id: snowflake_id(),
            name: data.name.trim().to_string(),
            display_order: data.display_order.unwrap_or(0),
        };
        let category = self.repo.insert(category).await?;

        self.cache.remove_by_prefix(TAX_CATEGORIES_PREFIX);
        self.notifier.inserted(EntityKind::TaxCategory, category.id);
        Ok(category)
    }

    pub async fn update_tax_category(
        &self,
        id: i64,
        data: TaxCategoryUpdate,
    ) -> AppResult<TaxCategory> {
        let mut category = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::tax_category_not_found(id))?;

        if let Some(name) = data.name {
            category.name = name.trim().to_string();
        }
        if let Some(display_order) = data.display_order {
            category.display_order = display_order;
        }
        let category = self.repo.update(category).await?;

        self.cache.remove_by_prefix(TAX_CATEGORIES_PREFIX);
        self.notifier.updated(EntityKind::TaxCategory, id);
        Ok(category)
    }

    pub async fn delete_tax_category(&self, id: i64) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::tax_category_not_found(id));
        }

        self.cache.remove_by_prefix(TAX_CATEGORIES_PREFIX);
        self.notifier.deleted(EntityKind::TaxCategory, id);
        Ok(())
    }
}
