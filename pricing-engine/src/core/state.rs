//! 引擎状态 - 持有所有服务的单例引用
//!
//! | 字段 | 类型 | 说明 |
//! |------|------|------|
//! | config | Config | 配置项 (不可变) |
//! | db | DbService | 实体存储 |
//! | cache | CacheService | 缓存 |
//! | notifier | EntityNotifier | 实体变更通知 |
//! | tax | TaxService | 税率与含税价换算 |
//! | vat | VatService | VAT 号码校验 |
//! | tax_categories | TaxCategoryService | 税务分类 |
//! | discounts | DiscountService | 折扣 / 优惠券 / 使用记录 |
//! | discount_handler | DiscountHandlerService | 折扣选择 |

use super::Config;
use crate::db::DbService;
use crate::discounts::{DiscountAmountProvider, DiscountHandlerService, DiscountService};
use crate::services::{CacheService, EntityNotifier, GeoLookup, NoGeoLookup};
use crate::tax::{
    EuVatRules, NullVatChecker, TaxCategoryService, TaxProvider, TaxProviderRegistry, TaxService,
    VatChecker, VatService, ViesVatChecker,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct EngineState {
    pub config: Config,
    pub db: DbService,
    pub cache: CacheService,
    pub notifier: EntityNotifier,
    pub tax: TaxService,
    pub vat: VatService,
    pub tax_categories: TaxCategoryService,
    pub discounts: DiscountService,
    pub discount_handler: DiscountHandlerService,
}

impl EngineState {
    pub fn builder(config: Config) -> EngineBuilder {
        EngineBuilder::new(config)
    }
}

/// Wires collaborators into an [`EngineState`]
pub struct EngineBuilder {
    config: Config,
    db: Option<DbService>,
    tax_providers: Vec<Arc<dyn TaxProvider>>,
    discount_providers: Vec<Arc<dyn DiscountAmountProvider>>,
    vat_checker: Option<Arc<dyn VatChecker>>,
    geo: Option<Arc<dyn GeoLookup>>,
}

impl EngineBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            db: None,
            tax_providers: Vec::new(),
            discount_providers: Vec::new(),
            vat_checker: None,
            geo: None,
        }
    }

    pub fn with_db(mut self, db: DbService) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_tax_provider(mut self, provider: Arc<dyn TaxProvider>) -> Self {
        self.tax_providers.push(provider);
        self
    }

    pub fn with_discount_provider(mut self, provider: Arc<dyn DiscountAmountProvider>) -> Self {
        self.discount_providers.push(provider);
        self
    }

    pub fn with_vat_checker(mut self, checker: Arc<dyn VatChecker>) -> Self {
        self.vat_checker = Some(checker);
        self
    }

    pub fn with_geo_lookup(mut self, geo: Arc<dyn GeoLookup>) -> Self {
        self.geo = Some(geo);
        self
    }

    pub fn build(self) -> EngineState {
        let config = self.config;
        let db = self.db.unwrap_or_else(DbService::in_memory);
        let cache = CacheService::new();
        let notifier = EntityNotifier::new();
        let timeout = config.provider_timeout();

        // VIES only when remote checking is on
        let vat_checker: Arc<dyn VatChecker> = match self.vat_checker {
            Some(checker) => checker,
            None if config.tax.eu_vat_use_web_service => {
                Arc::new(ViesVatChecker::new(config.vies_url.clone()))
            }
            None => Arc::new(NullVatChecker),
        };
        let geo: Arc<dyn GeoLookup> = match self.geo {
            Some(geo) => geo,
            None => Arc::new(NoGeoLookup),
        };

        if self.tax_providers.is_empty() {
            tracing::warn!("No tax providers registered, all prices are untaxed");
        }
        let registry = Arc::new(TaxProviderRegistry::new(
            self.tax_providers,
            config.tax.active_tax_provider_system_name.clone(),
        ));
        let eu_vat = EuVatRules::new(config.tax.clone(), db.countries.clone(), geo);
        let tax = TaxService::new(registry, config.tax.clone(), eu_vat, timeout);
        let vat = VatService::new(
            vat_checker,
            config.tax.eu_vat_assume_valid,
            config.tax.eu_vat_use_web_service,
            timeout,
        );
        let tax_categories =
            TaxCategoryService::new(db.tax_categories.clone(), cache.clone(), notifier.clone());
        let discounts = DiscountService::new(&db, cache.clone(), notifier.clone());
        let discount_handler = DiscountHandlerService::new(
            discounts.clone(),
            config.catalog.clone(),
            self.discount_providers,
        );

        tracing::info!(
            store_id = config.store_id,
            environment = %config.environment,
            "Pricing engine initialized"
        );

        EngineState {
            config,
            db,
            cache,
            notifier,
            tax,
            vat,
            tax_categories,
            discounts,
            discount_handler,
        }
    }
}
