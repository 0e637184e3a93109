//! PostgREST-backed lead lookup.
//!
//! Issues one `GET {url}/rest/v1/{table}?select=*&slug=eq.{slug}&limit=2`
//! per lookup, authenticated with the anonymous key in both the `apikey`
//! and `Authorization: Bearer` headers.

use async_trait::async_trait;
use leadpage_core::{Error, Lead, Result, Slug, SupabaseConfig, SupabaseEndpoint};
use reqwest::header::ACCEPT;

use crate::repository::LeadRepository;

/// Lead repository backed by a hosted PostgREST table.
///
/// Without an endpoint the repository still constructs, and every lookup
/// returns [`Error::ConfigMissing`].
pub struct SupabaseLeadRepository {
    endpoint: Option<SupabaseEndpoint>,
    table: String,
    client: reqwest::Client,
}

impl SupabaseLeadRepository {
    /// Build a repository from the `[supabase]` section.
    pub fn from_config(config: &SupabaseConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint(),
            table: config.table.clone(),
            client,
        })
    }

    /// Build a repository for an explicit endpoint (tests, tooling).
    pub fn with_endpoint(endpoint: SupabaseEndpoint, table: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint),
            table: table.into(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, endpoint: &SupabaseEndpoint) -> String {
        format!("{}/rest/v1/{}", endpoint.url, self.table)
    }

    async fn query(&self, endpoint: &SupabaseEndpoint, slug: &Slug) -> Result<Option<Lead>> {
        let filter = format!("eq.{slug}");
        let response = self
            .client
            .get(self.table_url(endpoint))
            .query(&[("select", "*"), ("slug", filter.as_str()), ("limit", "2")])
            .header("apikey", &endpoint.anon_key)
            .bearer_auth(&endpoint.anon_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::backend_with_source("lead query failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend(format!(
                "lead query rejected (HTTP {status}): {body}"
            )));
        }

        let mut rows: Vec<Lead> = response
            .json()
            .await
            .map_err(|e| Error::backend_with_source("lead response could not be decoded", e))?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(Error::backend(format!(
                "slug '{slug}' matched {n} rows; slugs must be unique"
            ))),
        }
    }
}

#[async_trait]
impl LeadRepository for SupabaseLeadRepository {
    async fn lookup(&self, slug: &Slug) -> Result<Option<Lead>> {
        let Some(endpoint) = &self.endpoint else {
            tracing::error!(slug = %slug, "Lead lookup without database configuration");
            return Err(Error::config_missing("LEADPAGE_SUPABASE_URL / LEADPAGE_SUPABASE_ANON_KEY"));
        };

        match self.query(endpoint, slug).await {
            Ok(Some(lead)) => {
                tracing::debug!(slug = %slug, lead_id = %lead.id, "Lead found");
                Ok(Some(lead))
            }
            Ok(None) => {
                tracing::debug!(slug = %slug, "No lead for slug");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(slug = %slug, error = %e, "Error fetching lead");
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        "supabase"
    }

    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

impl std::fmt::Debug for SupabaseLeadRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseLeadRepository")
            .field("url", &self.endpoint.as_ref().map(|e| e.url.as_str()))
            .field("table", &self.table)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn endpoint() -> SupabaseEndpoint {
        SupabaseEndpoint {
            url: "https://xyz.supabase.co".into(),
            anon_key: "secret-anon-key".into(),
        }
    }

    #[test]
    fn test_table_url() {
        let repo = SupabaseLeadRepository::with_endpoint(endpoint(), "leads");
        assert_eq!(
            repo.table_url(&endpoint()),
            "https://xyz.supabase.co/rest/v1/leads"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let repo = SupabaseLeadRepository::with_endpoint(endpoint(), "leads");
        let debug = format!("{repo:?}");
        assert!(debug.contains("xyz.supabase.co"));
        assert!(!debug.contains("secret-anon-key"));
    }

    #[tokio::test]
    async fn test_unconfigured_lookup_fails_closed() {
        let repo = SupabaseLeadRepository::from_config(&SupabaseConfig::default()).unwrap();
        assert!(!repo.is_configured());

        let err = repo.lookup(&Slug::parse("demo").unwrap()).await.unwrap_err();
        assert!(matches!(err, Error::ConfigMissing { .. }));
        assert!(err.is_not_found_for_user());
    }
}
