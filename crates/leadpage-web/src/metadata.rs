//! Page metadata for the document head.

use leadpage_core::Lead;
use serde::Serialize;

/// Title, description and Open Graph tags of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    /// `<title>`
    pub title: String,
    /// `<meta name="description">`
    pub description: String,
    /// `og:title`
    pub og_title: Option<String>,
    /// `og:description`
    pub og_description: Option<String>,
    /// `og:type`
    pub og_type: Option<&'static str>,
}

impl PageMetadata {
    /// Metadata for a lead's page.
    pub fn for_lead(lead: &Lead) -> Self {
        let company = &lead.company_name;
        Self {
            title: format!("{company} - KI-Telefon-Assistentin Demo"),
            description: format!(
                "Erleben Sie {company}'s KI-Telefon-Assistentin Sarah. Testen Sie jetzt live, wie Sarah Ihre Immobilien-Interessenten qualifiziert."
            ),
            og_title: Some(format!("{company} - KI-Telefon-Assistentin Sarah")),
            og_description: Some(format!(
                "Erleben Sie die Zukunft der Kundenqualifizierung mit {company}"
            )),
            og_type: Some("website"),
        }
    }

    /// Metadata for the not-found page.
    pub fn not_found() -> Self {
        Self {
            title: "Seite nicht gefunden".to_string(),
            description: "Die angeforderte Seite existiert nicht.".to_string(),
            og_title: None,
            og_description: None,
            og_type: None,
        }
    }
}
