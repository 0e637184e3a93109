//! Server-rendered HTML pages.
//!
//! Every value that comes from a lead row goes through [`escape_html`]
//! before it is written into markup.

use std::fmt::Write;

use leadpage_widget::{ButtonAffordance, WidgetView};

use crate::client;
use crate::metadata::PageMetadata;
use crate::resolver::RenderablePage;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

const CSS: &str = r#"
        * { box-sizing: border-box; }
        body { margin: 0; font-family: system-ui, -apple-system, sans-serif; color: #111827; background: linear-gradient(135deg, #f9fafb, #f3f4f6); min-height: 100vh; }
        header { background: #fff; border-bottom: 1px solid #e5e7eb; box-shadow: 0 1px 2px rgba(0,0,0,.05); }
        .container { max-width: 80rem; margin: 0 auto; padding: 1.5rem 2rem; }
        .brand { display: flex; align-items: center; gap: 1rem; }
        .badge { width: 3rem; height: 3rem; border-radius: .5rem; background: linear-gradient(135deg, #0ea5e9, #0284c7); color: #fff; font-weight: 700; font-size: 1.25rem; display: flex; align-items: center; justify-content: center; }
        .brand h1 { margin: 0; font-size: 1.25rem; }
        .brand p, .muted { margin: 0; color: #4b5563; font-size: .875rem; }
        .hero { text-align: center; padding: 4rem 1rem 3rem; }
        .hero h2 { font-size: 2rem; line-height: 1.25; margin: 0 auto; max-width: 48rem; }
        .accent { color: #0284c7; }
        .widget { max-width: 28rem; margin: 0 auto 4rem; background: #fff; border: 1px solid #e5e7eb; border-radius: 1rem; box-shadow: 0 10px 25px rgba(0,0,0,.1); padding: 2rem; text-align: center; }
        .widget h3 { font-size: 1.5rem; margin: 0 0 .5rem; }
        .status { padding: .75rem 1rem; border-radius: .5rem; margin: 1.5rem 0 0; font-weight: 500; }
        .status-pending { background: #fefce8; color: #ca8a04; }
        .status-live { background: #f0fdf4; color: #16a34a; }
        .status-neutral { background: #f3f4f6; color: #4b5563; }
        .status-alert { background: #fef2f2; color: #dc2626; }
        .message { background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; padding: .75rem 1rem; border-radius: .5rem; margin-top: 1rem; font-size: .875rem; }
        [hidden] { display: none !important; }
        .speaking { margin-top: 1rem; color: #16a34a; font-size: .875rem; }
        button, .button { display: block; width: 100%; margin-top: 1.5rem; padding: 1rem 1.5rem; border: 0; border-radius: .75rem; font-weight: 600; font-size: 1rem; cursor: pointer; text-decoration: none; text-align: center; }
        .button-start { background: linear-gradient(90deg, #0ea5e9, #0284c7); color: #fff; }
        .button-stop { background: #ef4444; color: #fff; }
        .button-busy, button:disabled { background: #d1d5db; color: #4b5563; cursor: not-allowed; }
        .button-secondary { background: #fff; border: 2px solid #0ea5e9; color: #0284c7; }
        .contact { margin-top: 1.5rem; font-size: .875rem; }
        .contact a { color: #0284c7; }
        .centered { max-width: 28rem; margin: 0 auto; padding: 6rem 1rem; text-align: center; }
        .centered ul { text-align: left; color: #4b5563; font-size: .875rem; }
"#;

fn document(meta: &PageMetadata, body: &str) -> String {
    let mut head = String::new();
    let _ = writeln!(
        head,
        r#"    <meta name="description" content="{}">"#,
        escape_html(&meta.description)
    );
    if let Some(title) = &meta.og_title {
        let _ = writeln!(
            head,
            r#"    <meta property="og:title" content="{}">"#,
            escape_html(title)
        );
    }
    if let Some(description) = &meta.og_description {
        let _ = writeln!(
            head,
            r#"    <meta property="og:description" content="{}">"#,
            escape_html(description)
        );
    }
    if let Some(og_type) = meta.og_type {
        let _ = writeln!(head, r#"    <meta property="og:type" content="{og_type}">"#);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="de">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
{head}    <style>{CSS}    </style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(&meta.title),
    )
}

fn button(view: &WidgetView) -> String {
    let label = view.button.label();
    match view.button {
        ButtonAffordance::Start { enabled: true } => format!(
            r#"<button type="button" class="button-start" data-role="button" data-action="start">{label}</button>"#
        ),
        ButtonAffordance::Start { enabled: false } => format!(
            r#"<button type="button" class="button-start" data-role="button" data-action="start" disabled>{label}</button>"#
        ),
        ButtonAffordance::Stop => format!(
            r#"<button type="button" class="button-stop" data-role="button" data-action="stop">{label}</button>"#
        ),
        ButtonAffordance::Busy { .. } => format!(
            r#"<button type="button" class="button-busy" data-role="button" disabled>{label}</button>"#
        ),
    }
}

/// The call widget card.
pub fn widget_card(
    view: &WidgetView,
    agent_id: &str,
    public_key: Option<&str>,
    company_name: &str,
) -> String {
    let (status_class, status_text, status_hidden) = match view.status_display {
        Some(display) => (display.tone.css_class(), display.text, ""),
        None => ("status", "", " hidden"),
    };
    let message = view.message.map(escape_html).unwrap_or_default();
    let message_hidden = if view.message.is_some() { "" } else { " hidden" };
    let speaking_hidden = if view.assistant_speaking { "" } else { " hidden" };

    format!(
        r#"<div id="call-widget" class="widget" data-agent-id="{agent}" data-public-key="{key}" data-status="{status}">
        <h3>Sprechen Sie mit Sarah</h3>
        <p class="muted">KI-Assistentin von {company}</p>
        <div class="{status_class}" data-role="status"{status_hidden}>{status_text}</div>
        <div class="message" role="alert" data-role="message"{message_hidden}>{message}</div>
        <div class="speaking" data-role="speaking"{speaking_hidden}>Sarah spricht...</div>
        {button}
    </div>"#,
        agent = escape_html(agent_id),
        key = escape_html(public_key.unwrap_or_default()),
        status = view.status,
        company = escape_html(company_name),
        button = button(view),
    )
}

/// The personalized lead page.
pub fn lead_page(page: &RenderablePage) -> String {
    let lead = &page.lead;
    let company = escape_html(&lead.company_name);
    let initial = lead
        .company_initial()
        .map(|c| escape_html(&c.to_string()))
        .unwrap_or_default();

    let body = format!(
        r#"<header>
    <div class="container brand">
        <div class="badge">{initial}</div>
        <div>
            <h1>{company}</h1>
            <p>KI-Telefon-Assistentin Demo</p>
        </div>
    </div>
</header>
<main>
    <section class="hero">
        <h2>Hallo <span class="accent">{first_name}</span>, erleben Sie, wie KI die Lead-Qualifizierung für <span class="accent">{company}</span> revolutionieren kann.</h2>
    </section>
    {widget}
    <p class="contact" style="text-align:center">
        <a href="{contact}">Kontakt aufnehmen</a>
    </p>
</main>
<script type="application/json" id="call-widget-table">{table}</script>
<script type="module">
{js}
</script>"#,
        first_name = escape_html(&lead.first_name),
        widget = widget_card(
            &page.widget,
            &lead.vapi_agent_id,
            page.public_key.as_deref(),
            &lead.company_name
        ),
        contact = escape_html(&page.contact_link),
        table = client::widget_table_json(lead.has_agent()),
        js = client::WIDGET_JS,
    );

    document(&page.metadata, &body)
}

/// The not-found page.
pub fn not_found_page() -> String {
    let meta = PageMetadata::not_found();
    let body = format!(
        r#"<main class="centered">
    <h1>{title}</h1>
    <p class="muted">{description}</p>
    <a class="button button-start" href="/">Zur Startseite</a>
</main>"#,
        title = escape_html(&meta.title),
        description = escape_html(&meta.description),
    );
    document(&meta, &body)
}

/// The generic error page.
pub fn error_page() -> String {
    let meta = PageMetadata {
        title: "Fehler beim Laden der Seite".to_string(),
        description: "Es ist ein Fehler beim Laden dieser Demo-Seite aufgetreten.".to_string(),
        og_title: None,
        og_description: None,
        og_type: None,
    };
    let body = r#"<main class="centered">
    <h1>Fehler beim Laden der Seite</h1>
    <p class="muted">Es ist ein Fehler beim Laden dieser Demo-Seite aufgetreten. Dies kann verschiedene Ursachen haben:</p>
    <ul>
        <li>Die Verbindung zur Datenbank ist unterbrochen</li>
        <li>Die angeforderten Daten sind nicht verfügbar</li>
        <li>Ein technisches Problem ist aufgetreten</li>
    </ul>
    <button type="button" class="button-start" onclick="window.location.reload()">Erneut versuchen</button>
    <a class="button button-secondary" href="/">Zur Startseite</a>
</main>"#;
    document(&meta, body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use leadpage_core::{Lead, VoiceConfig};
    use leadpage_widget::{CallStatus, WidgetSnapshot};
    use proptest::prelude::*;

    fn page(company: &str, first_name: &str, agent: &str) -> RenderablePage {
        let lead: Lead = serde_json::from_value(serde_json::json!({
            "id": "1",
            "slug": "acme-realty",
            "company_name": company,
            "first_name": first_name,
            "email": "jana@acme-realty.de",
            "vapi_agent_id": agent,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let voice = VoiceConfig {
            public_key: Some("pk_live".into()),
        };
        RenderablePage {
            metadata: PageMetadata::for_lead(&lead),
            contact_link: crate::resolver::contact_link(&lead),
            widget: WidgetView::initial(&voice, agent),
            public_key: voice.public_key.clone(),
            lead,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">O'Neil & Co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#x27;Neil &amp; Co&lt;/a&gt;"
        );
        assert_eq!(escape_html("Müller"), "Müller");
    }

    #[test]
    fn test_lead_page_content() {
        let html = lead_page(&page("Acme Realty", "Jana", "agent_123"));
        assert!(html.contains("<title>Acme Realty - KI-Telefon-Assistentin Demo</title>"));
        assert!(html.contains(r#"<div class="badge">A</div>"#));
        assert!(html.contains(r#"Hallo <span class="accent">Jana</span>"#));
        assert!(html.contains("KI-Assistentin von Acme Realty"));
        assert!(html.contains(r#"data-agent-id="agent_123""#));
        assert!(html.contains(r#"data-public-key="pk_live""#));
        assert!(html.contains(r#"data-status="idle""#));
        assert!(html.contains("Anruf starten"));
        assert!(html.contains("mailto:jana@acme-realty.de?subject="));
        assert!(html.contains(r#"<meta property="og:type" content="website">"#));
    }

    #[test]
    fn test_lead_page_escapes_lead_fields() {
        let html = lead_page(&page("<script>alert(1)</script>", "J\"ana", "a\"b"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("J&quot;ana"));
        assert!(html.contains(r#"data-agent-id="a&quot;b""#));
    }

    #[test]
    fn test_lead_page_runs_widget_script() {
        let html = lead_page(&page("Acme Realty", "Jana", "agent_123"));
        assert!(html.contains(r#"<script type="application/json" id="call-widget-table">"#));
        assert!(html.contains(r#"<script type="module">"#));
        assert!(html.contains(client::VAPI_SDK_URL));
        assert!(html.contains(r#"vapi.on(name, () => dispatch(name))"#));
        assert!(html.contains(r#"data-role="button" data-action="start""#));

        let start = html.find("id=\"call-widget-table\">").unwrap() + "id=\"call-widget-table\">".len();
        let end = start + html[start..].find("</script>").unwrap();
        let table: serde_json::Value = serde_json::from_str(&html[start..end]).unwrap();
        assert_eq!(table, client::widget_table(true));
    }

    #[test]
    fn test_idle_widget_keeps_hidden_status_and_message_slots() {
        let html = lead_page(&page("Acme Realty", "Jana", "agent_123"));
        assert!(html.contains(r#"<div class="status" data-role="status" hidden></div>"#));
        assert!(html.contains(r#"data-role="message" hidden></div>"#));
    }

    #[test]
    fn test_widget_without_agent_disables_button() {
        let html = lead_page(&page("Acme Realty", "Jana", ""));
        assert!(html.contains("data-action=\"start\" disabled"));
    }

    #[test]
    fn test_widget_card_for_error_state() {
        let view = WidgetView::initial(&VoiceConfig::default(), "agent_123");
        let html = widget_card(&view, "agent_123", None, "Acme");
        assert!(html.contains(r#"data-status="error""#));
        assert!(html.contains(r#"data-public-key="""#));
        assert!(html.contains("status-alert"));
        assert!(html.contains("VAPI-Konfiguration fehlt."));
    }

    #[test]
    fn test_widget_card_active() {
        let snapshot = WidgetSnapshot {
            status: CallStatus::Active,
            message: None,
            assistant_speaking: true,
        };
        let html = widget_card(&WidgetView::derive(&snapshot, true), "a", Some("k"), "Acme");
        assert!(html.contains("🎙️ Gespräch aktiv"));
        assert!(html.contains("Anruf beenden"));
        assert!(html.contains(r#"data-role="speaking">"#));
    }

    #[test]
    fn test_not_found_page() {
        let html = not_found_page();
        assert!(html.contains("<title>Seite nicht gefunden</title>"));
        assert!(html.contains("Die angeforderte Seite existiert nicht."));
        assert!(!html.contains("og:title"));
    }

    #[test]
    fn test_error_page_actions() {
        let html = error_page();
        assert!(html.contains("Erneut versuchen"));
        assert!(html.contains("Zur Startseite"));
    }

    proptest! {
        #[test]
        fn test_escaped_text_has_no_markup(input in ".*") {
            let escaped = escape_html(&input);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }

        #[test]
        fn test_lead_fields_survive_rendering(company in "[A-Za-z0-9 äöüß.-]{1,40}", first in "[A-Za-z]{1,20}") {
            let html = lead_page(&page(&company, &first, "agent_123"));
            let escaped_company = escape_html(&company);
            prop_assert!(html.contains(&escaped_company));
            prop_assert!(html.contains(&first));
        }
    }
}
