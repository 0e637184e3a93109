//! The lead repository trait and backend selection.

use std::sync::Arc;

use async_trait::async_trait;
use leadpage_core::{AppConfig, Lead, Result, Slug};

use crate::memory::InMemoryLeadRepository;
use crate::supabase::SupabaseLeadRepository;

/// Read-only access to lead records.
///
/// `lookup` is the whole contract:
/// - `Ok(Some(lead))`: exactly one row matched, returned verbatim
/// - `Ok(None)`: no row matched (not an error)
/// - `Err(_)`: transport, query or configuration fault, never retried
///
/// Implementations perform no caching: every call reflects the backing
/// store's current contents.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Look up the lead whose slug equals `slug` exactly.
    async fn lookup(&self, slug: &Slug) -> Result<Option<Lead>>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Whether the backend has everything it needs to answer queries.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Create a lead repository based on configuration.
///
/// Selection logic:
/// 1. Database URL and key set → [`SupabaseLeadRepository`]
/// 2. Otherwise, `store.leads_file` set → [`InMemoryLeadRepository`] loaded from it
/// 3. Otherwise → an unconfigured [`SupabaseLeadRepository`] that fails closed
pub fn create_lead_repository(config: &AppConfig) -> Result<Arc<dyn LeadRepository>> {
    if config.supabase.endpoint().is_some() {
        return Ok(Arc::new(SupabaseLeadRepository::from_config(&config.supabase)?));
    }

    if let Some(path) = &config.store.leads_file {
        tracing::info!(path = %path.display(), "Serving leads from local file");
        return Ok(Arc::new(InMemoryLeadRepository::from_json_file(path)?));
    }

    tracing::warn!("No lead backend configured; every lookup will fail closed");
    Ok(Arc::new(SupabaseLeadRepository::from_config(&config.supabase)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_supabase_when_configured() {
        let mut config = AppConfig::default();
        config.supabase.url = Some("https://xyz.supabase.co".into());
        config.supabase.anon_key = Some("anon".into());

        let repo = create_lead_repository(&config).unwrap();
        assert_eq!(repo.name(), "supabase");
        assert!(repo.is_configured());
    }

    #[test]
    fn test_selects_memory_when_file_given() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("leads.json");
        std::fs::write(&path, "[]").unwrap();

        let mut config = AppConfig::default();
        config.store.leads_file = Some(path);

        let repo = create_lead_repository(&config).unwrap();
        assert_eq!(repo.name(), "memory");
    }

    #[test]
    fn test_falls_back_to_unconfigured_supabase() {
        let repo = create_lead_repository(&AppConfig::default()).unwrap();
        assert_eq!(repo.name(), "supabase");
        assert!(!repo.is_configured());
    }

    #[test]
    fn test_missing_leads_file_is_an_error() {
        let mut config = AppConfig::default();
        config.store.leads_file = Some("/nonexistent/leads.json".into());
        assert!(create_lead_repository(&config).is_err());
    }
}
