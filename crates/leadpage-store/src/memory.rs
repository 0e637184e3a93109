//! In-memory lead repository.
//!
//! Used for local demos (seeded from a JSON file of lead rows) and as a
//! test double for the page resolver.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use leadpage_core::{Error, Lead, Result, Slug};
use tokio::sync::RwLock;

use crate::repository::LeadRepository;

/// Lead repository holding rows in a map keyed by slug.
#[derive(Debug, Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<HashMap<Slug, Lead>>,
}

impl InMemoryLeadRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository from lead rows.
    ///
    /// Fails if two rows share a slug.
    pub fn with_leads<I>(leads: I) -> Result<Self>
    where
        I: IntoIterator<Item = Lead>,
    {
        let mut map = HashMap::new();
        for lead in leads {
            let slug = lead.slug.clone();
            if map.insert(slug.clone(), lead).is_some() {
                return Err(Error::validation(format!("duplicate slug '{slug}'")));
            }
        }
        Ok(Self {
            leads: RwLock::new(map),
        })
    }

    /// Load rows from a JSON array file (the same shape PostgREST returns).
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let leads: Vec<Lead> = serde_json::from_str(&content)?;
        tracing::debug!(count = leads.len(), path = %path.display(), "Loaded leads");
        Self::with_leads(leads)
    }

    /// Insert or replace a row, standing in for the external workflow.
    pub async fn upsert(&self, lead: Lead) {
        self.leads.write().await.insert(lead.slug.clone(), lead);
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.leads.read().await.len()
    }

    /// Whether the repository is empty.
    pub async fn is_empty(&self) -> bool {
        self.leads.read().await.is_empty()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn lookup(&self, slug: &Slug) -> Result<Option<Lead>> {
        Ok(self.leads.read().await.get(slug).cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
