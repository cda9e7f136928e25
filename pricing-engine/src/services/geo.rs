//! IP geolocation port

use std::collections::HashMap;

/// Resolve an IP address to a two-letter country ISO code
pub trait GeoLookup: Send + Sync {
    fn lookup_country_iso_code(&self, ip_address: &str) -> Option<String>;
}

/// Lookup that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeoLookup;

impl GeoLookup for NoGeoLookup {
    fn lookup_country_iso_code(&self, _ip_address: &str) -> Option<String> {
        None
    }
}

/// Fixed IP → ISO code table, for tests and small deployments
#[derive(Debug, Clone, Default)]
pub struct StaticGeoLookup {
    entries: HashMap<String, String>,
}

impl StaticGeoLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, ip_address: impl Into<String>, iso_code: impl Into<String>) -> Self {
        self.entries.insert(ip_address.into(), iso_code.into());
        self
    }
}

impl GeoLookup for StaticGeoLookup {
    fn lookup_country_iso_code(&self, ip_address: &str) -> Option<String> {
        self.entries.get(ip_address.trim()).cloned()
    }
}
