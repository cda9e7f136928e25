//! Tax provider registry
//!
//! Holds the injected providers and picks the active one: the configured
//! system name first, otherwise the highest-priority provider authorized
//! for the store and the customer's groups.

use super::provider::TaxProvider;
use crate::core::WorkContext;
use shared::models::Customer;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct TaxProviderRegistry {
    providers: Vec<Arc<dyn TaxProvider>>,
    active_system_name: Option<String>,
}

impl std::fmt::Debug for TaxProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.system_name()).collect();
        f.debug_struct("TaxProviderRegistry")
            .field("providers", &names)
            .field("active_system_name", &self.active_system_name)
            .finish()
    }
}

impl TaxProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn TaxProvider>>, active_system_name: Option<String>) -> Self {
        Self {
            providers,
            active_system_name: active_system_name.filter(|name| !name.trim().is_empty()),
        }
    }

    /// Providers authorized for the store and customer, ascending by priority
    pub fn load_all_tax_providers(
        &self,
        customer: &Customer,
        store_id: i64,
    ) -> Vec<Arc<dyn TaxProvider>> {
        let mut providers: Vec<_> = self
            .providers
            .iter()
            .filter(|p| p.is_authorized_for_store(store_id) && p.is_authorized_for_customer(customer))
            .cloned()
            .collect();
        // stable: registration order breaks ties
        providers.sort_by_key(|p| p.priority());
        providers
    }

    pub fn load_tax_provider_by_system_name(&self, system_name: &str) -> Option<Arc<dyn TaxProvider>> {
        let system_name = system_name.trim();
        self.providers
            .iter()
            .find(|p| p.system_name().eq_ignore_ascii_case(system_name))
            .cloned()
    }

    /// `None` means "no tax": callers use a 0 rate and treat the line as taxable
    pub fn load_active_tax_provider(&self, ctx: &WorkContext) -> Option<Arc<dyn TaxProvider>> {
        self.load_active_tax_provider_for(&ctx.customer, ctx.store_id)
    }

    /// Active provider for an explicit customer, e.g. when pricing on behalf
    /// of someone other than the session customer
    pub fn load_active_tax_provider_for(
        &self,
        customer: &Customer,
        store_id: i64,
    ) -> Option<Arc<dyn TaxProvider>> {
        if let Some(name) = &self.active_system_name {
            if let Some(provider) = self.load_tax_provider_by_system_name(name) {
                return Some(provider);
            }
            tracing::warn!(system_name = %name, "Configured tax provider not found, falling back");
        }
        self.load_all_tax_providers(customer, store_id)
            .into_iter()
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::provider::{TaxRateResult, TaxRequest};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use shared::models::{Currency, CustomerGroup};

    struct NamedProvider {
        name: &'static str,
        priority: i32,
        store: Option<i64>,
        group: Option<i64>,
    }

    #[async_trait]
    impl TaxProvider for NamedProvider {
        fn system_name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn is_authorized_for_store(&self, store_id: i64) -> bool {
            self.store.is_none_or(|s| s == store_id)
        }

        fn is_authorized_for_customer(&self, customer: &Customer) -> bool {
            self.group.is_none_or(|g| customer.group_ids().any(|id| id == g))
        }

        async fn get_tax_rate(&self, _request: &TaxRequest) -> TaxRateResult {
            TaxRateResult::rate(Decimal::ZERO)
        }
    }

    fn make_provider(name: &'static str, priority: i32) -> Arc<dyn TaxProvider> {
        Arc::new(NamedProvider {
            name,
            priority,
            store: None,
            group: None,
        })
    }

    fn make_ctx(store_id: i64) -> WorkContext {
        WorkContext::new(Customer::default(), store_id, Currency::new(1, "Euro", "EUR"))
    }

    #[test]
    fn test_all_providers_ordered_by_priority() {
        let registry = TaxProviderRegistry::new(
            vec![make_provider("tax.b", 5), make_provider("tax.a", 1), make_provider("tax.c", 5)],
            None,
        );
        let names: Vec<_> = registry
            .load_all_tax_providers(&Customer::default(), 1)
            .iter()
            .map(|p| p.system_name().to_string())
            .collect();
        assert_eq!(names, vec!["tax.a", "tax.b", "tax.c"]);
    }

    #[test]
    fn test_authorization_filters() {
        let scoped: Arc<dyn TaxProvider> = Arc::new(NamedProvider {
            name: "tax.scoped",
            priority: 0,
            store: Some(2),
            group: Some(7),
        });
        let registry = TaxProviderRegistry::new(vec![scoped], None);

        let mut customer = Customer::default();
        assert!(registry.load_all_tax_providers(&customer, 2).is_empty());

        customer.customer_groups.push(CustomerGroup {
            id: 7,
            name: "Wholesale".to_string(),
            is_tax_exempt: false,
        });
        assert_eq!(registry.load_all_tax_providers(&customer, 2).len(), 1);
        assert!(registry.load_all_tax_providers(&customer, 3).is_empty());
    }

    #[test]
    fn test_lookup_by_system_name_ignores_case() {
        let registry = TaxProviderRegistry::new(vec![make_provider("Tax.FixedRate", 0)], None);
        assert!(registry.load_tax_provider_by_system_name("tax.fixedrate").is_some());
        assert!(registry.load_tax_provider_by_system_name("tax.other").is_none());
    }

    #[test]
    fn test_active_provider_by_configured_name() {
        let registry = TaxProviderRegistry::new(
            vec![make_provider("tax.a", 1), make_provider("tax.b", 9)],
            Some("TAX.B".to_string()),
        );
        let active = registry.load_active_tax_provider(&make_ctx(1)).unwrap();
        assert_eq!(active.system_name(), "tax.b");
    }

    #[test]
    fn test_active_provider_falls_back_to_priority() {
        let registry = TaxProviderRegistry::new(
            vec![make_provider("tax.b", 9), make_provider("tax.a", 1)],
            Some("tax.missing".to_string()),
        );
        let active = registry.load_active_tax_provider(&make_ctx(1)).unwrap();
        assert_eq!(active.system_name(), "tax.a");
    }

    #[test]
    fn test_active_provider_for_explicit_customer() {
        let grouped: Arc<dyn TaxProvider> = Arc::new(NamedProvider {
            name: "tax.grouped",
            priority: 0,
            store: None,
            group: Some(4),
        });
        let registry = TaxProviderRegistry::new(vec![grouped], None);
        assert!(registry.load_active_tax_provider(&make_ctx(1)).is_none());

        let member = Customer {
            customer_groups: vec![CustomerGroup {
                id: 4,
                name: "Members".to_string(),
                is_tax_exempt: false,
            }],
            ..Default::default()
        };
        let active = registry.load_active_tax_provider_for(&member, 1).unwrap();
        assert_eq!(active.system_name(), "tax.grouped");
    }

    #[test]
    fn test_no_providers() {
        let registry = TaxProviderRegistry::default();
        assert!(registry.load_active_tax_provider(&make_ctx(1)).is_none());
    }
}
