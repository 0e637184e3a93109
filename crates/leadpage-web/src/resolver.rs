//! Slug to page resolution.

use std::sync::Arc;

use leadpage_core::{Error, Lead, Slug, VoiceConfig};
use leadpage_store::LeadRepository;
use leadpage_widget::WidgetView;

use crate::metadata::PageMetadata;

/// Subject line of the contact link.
pub fn contact_subject(company_name: &str) -> String {
    format!("KI-Telefon-Assistentin Demo für {company_name}")
}

/// Build the `mailto:` link for a lead.
///
/// The address is kept verbatim; the subject is percent-encoded.
pub fn contact_link(lead: &Lead) -> String {
    let subject: String =
        url::form_urlencoded::byte_serialize(contact_subject(&lead.company_name).as_bytes())
            .collect::<String>()
            .replace('+', "%20");
    format!("mailto:{}?subject={subject}", lead.email)
}

/// Everything the renderer needs for a personalized page.
#[derive(Debug, Clone)]
pub struct RenderablePage {
    /// Head metadata
    pub metadata: PageMetadata,
    /// The lead
    pub lead: Lead,
    /// `mailto:` link
    pub contact_link: String,
    /// Initial widget state
    pub widget: WidgetView,
    /// Public key handed to the client-side session, if configured
    pub public_key: Option<String>,
}

/// Outcome of resolving a slug.
#[derive(Debug, Clone)]
pub enum ResolvedPage {
    /// A lead matched.
    Found(Box<RenderablePage>),
    /// No lead, or the lookup failed.
    NotFound,
}

impl ResolvedPage {
    /// Returns `true` for [`ResolvedPage::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, ResolvedPage::Found(_))
    }
}

/// Turns a slug into a page using one repository lookup.
pub struct PageResolver {
    repository: Arc<dyn LeadRepository>,
    voice: VoiceConfig,
}

impl PageResolver {
    /// Create a resolver.
    pub fn new(repository: Arc<dyn LeadRepository>, voice: VoiceConfig) -> Self {
        Self { repository, voice }
    }

    /// The repository pages are resolved against.
    pub fn repository(&self) -> &Arc<dyn LeadRepository> {
        &self.repository
    }

    /// Voice settings passed to the widget.
    pub fn voice(&self) -> &VoiceConfig {
        &self.voice
    }

    /// Resolve a slug.
    ///
    /// Lookup failures are logged and rendered as not found; nothing from a
    /// failed lookup reaches the page.
    pub async fn resolve(&self, slug: &str) -> ResolvedPage {
        let slug = match Slug::parse(slug) {
            Ok(slug) => slug,
            Err(_) => return ResolvedPage::NotFound,
        };

        match self.repository.lookup(&slug).await {
            Ok(Some(lead)) => {
                tracing::debug!(%slug, lead_id = %lead.id, "resolved lead page");
                ResolvedPage::Found(Box::new(self.page_for(lead)))
            }
            Ok(None) => {
                tracing::debug!(%slug, "no lead for slug");
                ResolvedPage::NotFound
            }
            Err(err @ Error::ConfigMissing { .. }) => {
                tracing::warn!(%slug, error = %err, "lead store not configured");
                ResolvedPage::NotFound
            }
            Err(err) => {
                tracing::error!(
                    %slug,
                    backend = self.repository.name(),
                    error = %err,
                    "lead lookup failed, serving not-found page"
                );
                ResolvedPage::NotFound
            }
        }
    }

    fn page_for(&self, lead: Lead) -> RenderablePage {
        RenderablePage {
            metadata: PageMetadata::for_lead(&lead),
            contact_link: contact_link(&lead),
            widget: WidgetView::initial(&self.voice, &lead.vapi_agent_id),
            public_key: self.voice.public_key().map(str::to_string),
            lead,
        }
    }
}

impl std::fmt::Debug for PageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageResolver")
            .field("repository", &self.repository.name())
            .field("voice_configured", &self.voice.public_key().is_some())
            .finish()
    }
}
