//! Discount Service
//!
//! Discount, coupon and usage-history persistence, plus full discount
//! validation (including coupon possession and usage limits).
//!
//! Every mutation invalidates the `discount.` cache prefix and publishes an
//! entity event.

use super::validation::{DiscountValidationResult, InvalidReason, check_discount};
use crate::db::DbService;
use crate::db::repository::{
    DiscountCouponRepository, DiscountRepository, DiscountUsageRepository, RepoError,
};
use crate::services::cache::{COUPONS_PREFIX, DISCOUNTS_PREFIX};
use crate::services::{CacheService, EntityKind, EntityNotifier};
use chrono::Utc;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Currency, Customer, Discount, DiscountCoupon, DiscountCreate, DiscountLimitationType,
    DiscountType, DiscountUpdate, DiscountUsageHistory,
};
use shared::util::{now_millis, snowflake_id};

/// Length of generated coupon codes
const COUPON_CODE_LENGTH: usize = 10;

fn all_key(discount_type: Option<DiscountType>) -> String {
    match discount_type {
        Some(t) => format!("{DISCOUNTS_PREFIX}all.{t:?}"),
        None => format!("{DISCOUNTS_PREFIX}all"),
    }
}

fn by_id_key(id: i64) -> String {
    format!("{DISCOUNTS_PREFIX}id.{id}")
}

/// Usage row to record when an order applies a discount
#[derive(Debug, Clone)]
pub struct DiscountUsage {
    pub discount_id: i64,
    pub customer_id: i64,
    pub order_id: i64,
    pub coupon_code: Option<String>,
}

#[derive(Clone)]
pub struct DiscountService {
    discounts: DiscountRepository,
    coupons: DiscountCouponRepository,
    usage: DiscountUsageRepository,
    cache: CacheService,
    notifier: EntityNotifier,
}

impl DiscountService {
    pub fn new(db: &DbService, cache: CacheService, notifier: EntityNotifier) -> Self {
        Self {
            discounts: db.discounts.clone(),
            coupons: db.coupons.clone(),
            usage: db.usage_history.clone(),
            cache,
            notifier,
        }
    }

    // ========== Discounts ==========

    pub async fn get_discount_by_id(&self, id: i64) -> AppResult<Option<Discount>> {
        self.cache
            .get_or_compute(&by_id_key(id), || async {
                self.discounts.find_by_id(id).await.map_err(AppError::from)
            })
            .await
    }

    /// All discounts, optionally of one type. Unless `show_hidden`, only
    /// enabled discounts inside their date window are returned.
    pub async fn get_all_discounts(
        &self,
        discount_type: Option<DiscountType>,
        show_hidden: bool,
    ) -> AppResult<Vec<Discount>> {
        let discounts: Vec<Discount> = self
            .cache
            .get_or_compute(&all_key(discount_type), || async {
                match discount_type {
                    Some(t) => self.discounts.find_by_type(t).await,
                    None => self.discounts.find_all().await,
                }
                .map_err(AppError::from)
            })
            .await?;

        if show_hidden {
            return Ok(discounts);
        }
        let now = Utc::now();
        Ok(discounts
            .into_iter()
            .filter(|d| d.is_enabled && super::validation::is_active_at(d, now))
            .collect())
    }

    /// Discounts of a type bound to any of `entity_ids`
    pub async fn get_discounts_assigned_to(
        &self,
        discount_type: DiscountType,
        entity_ids: &[i64],
    ) -> AppResult<Vec<Discount>> {
        Ok(self
            .discounts
            .find_assigned_to(discount_type, entity_ids)
            .await?)
    }

    pub async fn insert_discount(&self, data: DiscountCreate) -> AppResult<Discount> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Discount name is required"));
        }
        validate_amounts(
            data.discount_amount.unwrap_or_default(),
            data.discount_percentage.unwrap_or_default(),
        )?;

        let discount = Discount::from_create(snowflake_id(), data, now_millis());
        let discount = self.discounts.insert(discount).await?;

        self.cache.remove_by_prefix(DISCOUNTS_PREFIX);
        self.notifier.inserted(EntityKind::Discount, discount.id);
        Ok(discount)
    }

    pub async fn update_discount(&self, id: i64, data: DiscountUpdate) -> AppResult<Discount> {
        let mut discount = self
            .discounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::discount_not_found(id))?;

        discount.apply_update(data);
        if discount.name.trim().is_empty() {
            return Err(AppError::validation("Discount name is required"));
        }
        validate_amounts(discount.discount_amount, discount.discount_percentage)?;
        let discount = self.discounts.update(discount).await?;

        self.cache.remove_by_prefix(DISCOUNTS_PREFIX);
        self.notifier.updated(EntityKind::Discount, id);
        Ok(discount)
    }

    /// Delete a discount and its coupons
    pub async fn delete_discount(&self, id: i64) -> AppResult<()> {
        if !self.discounts.delete(id).await? {
            return Err(AppError::discount_not_found(id));
        }
        for coupon in self.coupons.find_by_discount(id).await? {
            self.coupons.delete(coupon.id).await?;
            self.notifier.deleted(EntityKind::DiscountCoupon, coupon.id);
        }

        self.cache.remove_by_prefix(DISCOUNTS_PREFIX);
        self.cache.remove_by_prefix(COUPONS_PREFIX);
        self.notifier.deleted(EntityKind::Discount, id);
        Ok(())
    }

    // ========== Validation ==========

    /// Full validation against the customer's stored coupon codes
    pub async fn validate_discount(
        &self,
        discount: &Discount,
        customer: &Customer,
        store_id: i64,
        currency: &Currency,
    ) -> AppResult<DiscountValidationResult> {
        self.validate_discount_with_codes(discount, customer, store_id, currency, &customer.coupon_codes)
            .await
    }

    pub async fn validate_discount_with_codes(
        &self,
        discount: &Discount,
        customer: &Customer,
        store_id: i64,
        currency: &Currency,
        coupon_codes: &[String],
    ) -> AppResult<DiscountValidationResult> {
        if let Some(reason) = check_discount(discount, store_id, currency, Utc::now()) {
            return Ok(DiscountValidationResult::invalid(reason));
        }

        let mut matched_code = None;
        if discount.requires_coupon_code {
            for code in coupon_codes {
                let used = if discount.reused { None } else { Some(false) };
                if self.exists_coupon_code(code, discount.id, used).await? {
                    matched_code = Some(code.trim().to_string());
                    break;
                }
            }
            if matched_code.is_none() {
                return Ok(DiscountValidationResult::invalid(InvalidReason::CouponRequired));
            }
        }

        if self.usage_limit_reached(discount, customer).await? {
            return Ok(DiscountValidationResult::invalid(InvalidReason::UsageLimitReached));
        }

        Ok(match matched_code {
            Some(code) => DiscountValidationResult::valid_with_coupon(code),
            None => DiscountValidationResult::valid(),
        })
    }

    async fn usage_limit_reached(&self, discount: &Discount, customer: &Customer) -> AppResult<bool> {
        let customer_id = match discount.discount_limitation {
            DiscountLimitationType::Unlimited => return Ok(false),
            DiscountLimitationType::NTimesOnly => None,
            DiscountLimitationType::NTimesPerCustomer => Some(customer.id),
        };
        let used = self
            .usage
            .find_by_discount(discount.id, customer_id, false)
            .await?
            .len();
        Ok(used >= discount.limitation_times as usize)
    }

    // ========== Coupons ==========

    pub async fn get_coupon_by_code(&self, code: &str) -> AppResult<Option<DiscountCoupon>> {
        Ok(self.coupons.find_by_code(code).await?)
    }

    pub async fn get_coupons_for_discount(&self, discount_id: i64) -> AppResult<Vec<DiscountCoupon>> {
        self.cache
            .get_or_compute(&format!("{COUPONS_PREFIX}discount.{discount_id}"), || async {
                self.coupons
                    .find_by_discount(discount_id)
                    .await
                    .map_err(AppError::from)
            })
            .await
    }

    /// Whether `code` exists for the discount; `used` narrows by state
    pub async fn exists_coupon_code(
        &self,
        code: &str,
        discount_id: i64,
        used: Option<bool>,
    ) -> AppResult<bool> {
        Ok(self
            .coupons
            .find_by_code(code)
            .await?
            .is_some_and(|c| c.discount_id == discount_id && used.is_none_or(|u| c.used == u)))
    }

    /// Random upper-case code
    pub fn generate_coupon_code(&self) -> String {
        let mut code = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        code.truncate(COUPON_CODE_LENGTH);
        code
    }

    /// Add a coupon to a discount; a generated code is used when `code` is `None`
    pub async fn insert_coupon(&self, discount_id: i64, code: Option<String>) -> AppResult<DiscountCoupon> {
        if self.discounts.find_by_id(discount_id).await?.is_none() {
            return Err(AppError::discount_not_found(discount_id));
        }
        let coupon_code = match code {
            Some(code) => code.trim().to_string(),
            None => self.generate_coupon_code(),
        };

        let coupon = DiscountCoupon {
            id: snowflake_id(),
            coupon_code,
            discount_id,
            used: false,
        };
        let coupon = self.coupons.insert(coupon).await.map_err(|e| match e {
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::DiscountCouponExists, msg)
            }
            other => other.into(),
        })?;

        self.cache.remove_by_prefix(COUPONS_PREFIX);
        self.notifier.inserted(EntityKind::DiscountCoupon, coupon.id);
        Ok(coupon)
    }

    pub async fn delete_coupon(&self, id: i64) -> AppResult<()> {
        if !self.coupons.delete(id).await? {
            return Err(AppError::new(ErrorCode::DiscountCouponNotFound));
        }
        self.cache.remove_by_prefix(COUPONS_PREFIX);
        self.notifier.deleted(EntityKind::DiscountCoupon, id);
        Ok(())
    }

    /// Flip a coupon's `used` flag. Unknown codes are ignored.
    pub async fn discount_coupon_set_as_used(&self, code: &str, used: bool) -> AppResult<()> {
        let Some(mut coupon) = self.coupons.find_by_code(code).await? else {
            tracing::debug!(code, "Coupon not found, nothing to mark");
            return Ok(());
        };
        if coupon.used == used {
            return Ok(());
        }
        coupon.used = used;
        let coupon = self.coupons.update(coupon).await?;

        self.cache.remove_by_prefix(COUPONS_PREFIX);
        self.notifier.updated(EntityKind::DiscountCoupon, coupon.id);
        Ok(())
    }

    // ========== Usage history ==========

    pub async fn get_usage_history_by_id(&self, id: i64) -> AppResult<Option<DiscountUsageHistory>> {
        Ok(self.usage.find_by_id(id).await?)
    }

    pub async fn get_usage_history_by_order(&self, order_id: i64) -> AppResult<Vec<DiscountUsageHistory>> {
        Ok(self.usage.find_by_order(order_id).await?)
    }

    pub async fn get_usage_history_by_discount(
        &self,
        discount_id: i64,
        customer_id: Option<i64>,
        include_canceled: bool,
    ) -> AppResult<Vec<DiscountUsageHistory>> {
        Ok(self
            .usage
            .find_by_discount(discount_id, customer_id, include_canceled)
            .await?)
    }

    pub async fn insert_usage_history(&self, usage: DiscountUsage) -> AppResult<DiscountUsageHistory> {
        let history = DiscountUsageHistory {
            id: snowflake_id(),
            discount_id: usage.discount_id,
            customer_id: usage.customer_id,
            order_id: usage.order_id,
            coupon_code: usage.coupon_code.map(|c| c.trim().to_string()),
            created_on_utc: Utc::now(),
            canceled: false,
        };
        let history = self.usage.insert(history).await?;

        self.notifier.inserted(EntityKind::DiscountUsageHistory, history.id);
        Ok(history)
    }

    pub async fn delete_usage_history(&self, id: i64) -> AppResult<()> {
        if !self.usage.delete(id).await? {
            return Err(AppError::new(ErrorCode::DiscountUsageNotFound));
        }
        self.notifier.deleted(EntityKind::DiscountUsageHistory, id);
        Ok(())
    }

    /// Record an applied discount on order placement: a usage row, then the
    /// coupon (if any) marked used. Two independent writes.
    pub async fn record_usage(&self, usage: DiscountUsage) -> AppResult<DiscountUsageHistory> {
        let history = self.insert_usage_history(usage).await?;
        if let Some(code) = &history.coupon_code {
            self.discount_coupon_set_as_used(code, true).await?;
        }
        Ok(history)
    }

    /// Reverse the discount usage of a cancelled order. Rows already
    /// canceled are skipped; returns how many rows changed.
    pub async fn cancel_discount(&self, order_id: i64) -> AppResult<usize> {
        let mut canceled = 0;
        for mut history in self.usage.find_by_order(order_id).await? {
            if history.canceled {
                continue;
            }
            history.canceled = true;
            let history = self.usage.update(history).await?;
            self.notifier.updated(EntityKind::DiscountUsageHistory, history.id);

            if let Some(code) = &history.coupon_code {
                self.discount_coupon_set_as_used(code, false).await?;
            }
            canceled += 1;
        }

        if canceled > 0 {
            tracing::info!(order_id, canceled, "Discount usage canceled");
        }
        Ok(canceled)
    }
}

fn validate_amounts(amount: Decimal, percentage: Decimal) -> AppResult<()> {
    if amount.is_sign_negative() {
        return Err(AppError::validation("Discount amount must not be negative"));
    }
    if percentage.is_sign_negative() || percentage > Decimal::ONE_HUNDRED {
        return Err(AppError::validation(
            "Discount percentage must be between 0 and 100",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::EntityEvent;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn make_service() -> DiscountService {
        DiscountService::new(&DbService::in_memory(), CacheService::new(), EntityNotifier::new())
    }

    fn make_create(name: &str) -> DiscountCreate {
        DiscountCreate {
            name: name.to_string(),
            discount_amount: Some(dec!(10)),
            ..Default::default()
        }
    }

    fn make_customer(id: i64, coupon_codes: &[&str]) -> Customer {
        Customer {
            id,
            coupon_codes: coupon_codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    fn eur() -> Currency {
        Currency::new(1, "Euro", "EUR")
    }

    fn make_usage(discount_id: i64, customer_id: i64, order_id: i64, coupon: Option<&str>) -> DiscountUsage {
        DiscountUsage {
            discount_id,
            customer_id,
            order_id,
            coupon_code: coupon.map(str::to_string),
        }
    }

    // ==================== CRUD ====================

    #[tokio::test]
    async fn test_discount_crud_refreshes_cache() {
        let service = make_service();
        let mut events = service.notifier.subscribe();

        let discount = service.insert_discount(make_create("Spring")).await.unwrap();
        assert_eq!(service.get_all_discounts(None, false).await.unwrap().len(), 1);

        service
            .update_discount(
                discount.id,
                DiscountUpdate {
                    is_enabled: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(service.get_all_discounts(None, false).await.unwrap().is_empty());
        assert_eq!(service.get_all_discounts(None, true).await.unwrap().len(), 1);
        assert!(!service.get_discount_by_id(discount.id).await.unwrap().unwrap().is_enabled);

        service.delete_discount(discount.id).await.unwrap();
        assert!(service.get_discount_by_id(discount.id).await.unwrap().is_none());

        assert!(matches!(events.recv().await.unwrap(), EntityEvent::Inserted { .. }));
        assert!(matches!(events.recv().await.unwrap(), EntityEvent::Updated { .. }));
        assert!(matches!(events.recv().await.unwrap(), EntityEvent::Deleted { .. }));
    }

    #[tokio::test]
    async fn test_get_all_by_type_hides_expired() {
        let service = make_service();
        service
            .insert_discount(DiscountCreate {
                discount_type: Some(DiscountType::AssignedToSkus),
                ..make_create("Sku")
            })
            .await
            .unwrap();
        service
            .insert_discount(DiscountCreate {
                end_date_utc: Some(Utc::now() - Duration::days(1)),
                ..make_create("Old")
            })
            .await
            .unwrap();

        let global = service
            .get_all_discounts(Some(DiscountType::AssignedToAllProducts), false)
            .await
            .unwrap();
        assert!(global.is_empty());
        let global_hidden = service
            .get_all_discounts(Some(DiscountType::AssignedToAllProducts), true)
            .await
            .unwrap();
        assert_eq!(global_hidden.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_input() {
        let service = make_service();
        let err = service.insert_discount(make_create(" ")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = service
            .insert_discount(DiscountCreate {
                discount_percentage: Some(dec!(120)),
                ..make_create("Too much")
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = service
            .update_discount(1, DiscountUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountNotFound);
    }

    // ==================== coupons ====================

    #[tokio::test]
    async fn test_coupon_lifecycle() {
        let service = make_service();
        let discount = service.insert_discount(make_create("Coupon")).await.unwrap();

        let generated = service.insert_coupon(discount.id, None).await.unwrap();
        assert_eq!(generated.coupon_code.len(), COUPON_CODE_LENGTH);
        let named = service
            .insert_coupon(discount.id, Some(" SPRING10 ".to_string()))
            .await
            .unwrap();
        assert_eq!(named.coupon_code, "SPRING10");
        assert_eq!(service.get_coupons_for_discount(discount.id).await.unwrap().len(), 2);

        let err = service
            .insert_coupon(discount.id, Some("spring10".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountCouponExists);

        service.discount_coupon_set_as_used("SPRING10", true).await.unwrap();
        assert!(service.exists_coupon_code("spring10", discount.id, Some(true)).await.unwrap());
        assert!(!service.exists_coupon_code("spring10", discount.id, Some(false)).await.unwrap());
        assert!(service.exists_coupon_code("spring10", discount.id, None).await.unwrap());
        assert!(!service.exists_coupon_code("spring10", discount.id + 1, None).await.unwrap());

        service.delete_coupon(generated.id).await.unwrap();
        assert_eq!(service.get_coupons_for_discount(discount.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_coupon_for_missing_discount() {
        let service = make_service();
        let err = service.insert_coupon(99, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountNotFound);
    }

    // ==================== validation ====================

    #[tokio::test]
    async fn test_coupon_gating() {
        let service = make_service();
        let discount = service
            .insert_discount(DiscountCreate {
                requires_coupon_code: Some(true),
                ..make_create("Coupon only")
            })
            .await
            .unwrap();
        service
            .insert_coupon(discount.id, Some("SPRING10".to_string()))
            .await
            .unwrap();

        let without = service
            .validate_discount(&discount, &make_customer(1, &[]), 1, &eur())
            .await
            .unwrap();
        assert!(!without.is_valid);
        assert_eq!(without.reason, Some(InvalidReason::CouponRequired));

        let wrong = service
            .validate_discount(&discount, &make_customer(1, &["WINTER"]), 1, &eur())
            .await
            .unwrap();
        assert!(!wrong.is_valid);

        let holder = make_customer(1, &["spring10"]);
        let with = service.validate_discount(&discount, &holder, 1, &eur()).await.unwrap();
        assert!(with.is_valid);
        assert_eq!(with.coupon_code.as_deref(), Some("spring10"));

        service.discount_coupon_set_as_used("SPRING10", true).await.unwrap();
        let used = service.validate_discount(&discount, &holder, 1, &eur()).await.unwrap();
        assert!(!used.is_valid);
    }

    #[tokio::test]
    async fn test_reused_coupon_stays_valid() {
        let service = make_service();
        let discount = service
            .insert_discount(DiscountCreate {
                requires_coupon_code: Some(true),
                reused: Some(true),
                ..make_create("Reusable")
            })
            .await
            .unwrap();
        service
            .insert_coupon(discount.id, Some("ALWAYS".to_string()))
            .await
            .unwrap();
        service.discount_coupon_set_as_used("ALWAYS", true).await.unwrap();

        let result = service
            .validate_discount(&discount, &make_customer(1, &["ALWAYS"]), 1, &eur())
            .await
            .unwrap();
        assert!(result.is_valid);
    }

    #[tokio::test]
    async fn test_currency_mismatch_and_expiry() {
        let service = make_service();
        let eur_only = service
            .insert_discount(DiscountCreate {
                currency_code: Some("EUR".to_string()),
                ..make_create("Euro")
            })
            .await
            .unwrap();
        let usd = Currency::new(2, "US Dollar", "USD");
        let result = service
            .validate_discount(&eur_only, &make_customer(1, &[]), 1, &usd)
            .await
            .unwrap();
        assert_eq!(result.reason, Some(InvalidReason::CurrencyMismatch));

        let expired = service
            .insert_discount(DiscountCreate {
                end_date_utc: Some(Utc::now() - Duration::hours(1)),
                ..make_create("Expired")
            })
            .await
            .unwrap();
        let result = service
            .validate_discount(&expired, &make_customer(1, &[]), 1, &eur())
            .await
            .unwrap();
        assert_eq!(result.reason, Some(InvalidReason::Expired));
    }

    #[tokio::test]
    async fn test_usage_limitations() {
        let service = make_service();
        let once_per_customer = service
            .insert_discount(DiscountCreate {
                discount_limitation: Some(DiscountLimitationType::NTimesPerCustomer),
                limitation_times: Some(1),
                ..make_create("Welcome")
            })
            .await
            .unwrap();

        service
            .record_usage(make_usage(once_per_customer.id, 1, 500, None))
            .await
            .unwrap();

        let first = make_customer(1, &[]);
        let second = make_customer(2, &[]);
        let result = service
            .validate_discount(&once_per_customer, &first, 1, &eur())
            .await
            .unwrap();
        assert_eq!(result.reason, Some(InvalidReason::UsageLimitReached));
        assert!(service
            .validate_discount(&once_per_customer, &second, 1, &eur())
            .await
            .unwrap()
            .is_valid);

        // canceled usage no longer counts
        service.cancel_discount(500).await.unwrap();
        assert!(service
            .validate_discount(&once_per_customer, &first, 1, &eur())
            .await
            .unwrap()
            .is_valid);
    }

    #[tokio::test]
    async fn test_n_times_only_counts_everyone() {
        let service = make_service();
        let twice = service
            .insert_discount(DiscountCreate {
                discount_limitation: Some(DiscountLimitationType::NTimesOnly),
                limitation_times: Some(2),
                ..make_create("Flash")
            })
            .await
            .unwrap();
        service.record_usage(make_usage(twice.id, 1, 1, None)).await.unwrap();
        assert!(service
            .validate_discount(&twice, &make_customer(3, &[]), 1, &eur())
            .await
            .unwrap()
            .is_valid);

        service.record_usage(make_usage(twice.id, 2, 2, None)).await.unwrap();
        let result = service
            .validate_discount(&twice, &make_customer(3, &[]), 1, &eur())
            .await
            .unwrap();
        assert_eq!(result.reason, Some(InvalidReason::UsageLimitReached));
    }

    // ==================== usage history ====================

    #[tokio::test]
    async fn test_cancel_reverses_usage() {
        let service = make_service();
        let discount = service
            .insert_discount(DiscountCreate {
                requires_coupon_code: Some(true),
                ..make_create("Coupon")
            })
            .await
            .unwrap();
        service
            .insert_coupon(discount.id, Some("ORDER1".to_string()))
            .await
            .unwrap();

        service
            .record_usage(make_usage(discount.id, 1, 700, Some("ORDER1")))
            .await
            .unwrap();
        assert!(service.get_coupon_by_code("ORDER1").await.unwrap().unwrap().used);

        assert_eq!(service.cancel_discount(700).await.unwrap(), 1);

        let history = service.get_usage_history_by_order(700).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].canceled);
        assert!(!service.get_coupon_by_code("ORDER1").await.unwrap().unwrap().used);
    }

    #[tokio::test]
    async fn test_cancel_twice_is_idempotent() {
        let service = make_service();
        let discount = service.insert_discount(make_create("Twice")).await.unwrap();
        service
            .insert_coupon(discount.id, Some("TWICE".to_string()))
            .await
            .unwrap();
        service
            .record_usage(make_usage(discount.id, 1, 800, Some("TWICE")))
            .await
            .unwrap();

        assert_eq!(service.cancel_discount(800).await.unwrap(), 1);
        // coupon re-used by another order in between
        service.discount_coupon_set_as_used("TWICE", true).await.unwrap();
        assert_eq!(service.cancel_discount(800).await.unwrap(), 0);
        assert!(service.get_coupon_by_code("TWICE").await.unwrap().unwrap().used);
        assert_eq!(service.cancel_discount(12345).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_usage_history_queries() {
        let service = make_service();
        let a = service.record_usage(make_usage(1, 10, 900, None)).await.unwrap();
        service.record_usage(make_usage(1, 11, 901, None)).await.unwrap();

        assert_eq!(
            service.get_usage_history_by_discount(1, None, false).await.unwrap().len(),
            2
        );
        assert_eq!(
            service.get_usage_history_by_discount(1, Some(10), false).await.unwrap().len(),
            1
        );
        assert_eq!(service.get_usage_history_by_id(a.id).await.unwrap(), Some(a.clone()));

        service.delete_usage_history(a.id).await.unwrap();
        let err = service.delete_usage_history(a.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountUsageNotFound);
    }
}
