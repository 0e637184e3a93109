//! Personalized page rendering through the router.

use axum::http::{StatusCode, header};
use leadpage_core::VoiceConfig;
use std::sync::Arc;

use crate::common::{PUBLIC_KEY, TestHarness, acme_lead, lead};
use leadpage_store::InMemoryLeadRepository;

#[tokio::test]
async fn test_acme_realty_page() {
    let harness = TestHarness::default();
    let (status, response, html) = harness.get("/acme-realty").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert!(html.contains("<title>Acme Realty - KI-Telefon-Assistentin Demo</title>"));
    assert!(html.contains("Acme Realty"));
    assert!(html.contains("Jana"));
    assert!(html.contains(r#"data-agent-id="agent_123""#));
    assert!(html.contains(&format!(r#"data-public-key="{PUBLIC_KEY}""#)));
    assert!(html.contains("mailto:jana@acme-realty.de"));
    assert!(html.contains("Anruf starten"));
}

fn embedded_widget_table(html: &str) -> serde_json::Value {
    let open = r#"<script type="application/json" id="call-widget-table">"#;
    let start = html.find(open).unwrap() + open.len();
    let end = start + html[start..].find("</script>").unwrap();
    serde_json::from_str(&html[start..end]).unwrap()
}

#[tokio::test]
async fn test_served_widget_connects_then_goes_live() {
    let (_, _, html) = TestHarness::default().get("/acme-realty").await;
    assert!(html.contains(r#"<script type="module">"#));
    assert!(html.contains(r#"data-status="idle""#));

    let table = embedded_widget_table(&html);
    let start = &table["transitions"]["idle"]["start"];
    assert_eq!(start["effect"], "start");
    let connecting = start["status"].as_str().unwrap();
    assert_eq!(table["views"][connecting]["status_text"], "Verbinde...");

    let live = table["transitions"][connecting]["call-start"]["status"]
        .as_str()
        .unwrap();
    assert_eq!(live, "active");
    assert_eq!(table["views"][live]["status_text"], "🎙️ Gespräch aktiv");
    assert_eq!(table["views"][live]["button_label"], "Anruf beenden");
}

#[tokio::test]
async fn test_open_graph_tags() {
    let (_, _, html) = TestHarness::default().get("/acme-realty").await;
    assert!(html.contains(
        r#"<meta property="og:title" content="Acme Realty - KI-Telefon-Assistentin Sarah">"#
    ));
    assert!(html.contains(
        r#"<meta property="og:description" content="Erleben Sie die Zukunft der Kundenqualifizierung mit Acme Realty">"#
    ));
}

#[tokio::test]
async fn test_every_lead_gets_its_own_content() {
    let leads = vec![
        acme_lead(),
        lead("nordhaus", "Nordhaus Immobilien", "Lars", "agent_nord"),
        lead("sued-bau", "Süd & Bau", "Eva", "agent_sued"),
    ];
    let harness = TestHarness::with_leads(leads.clone());

    for lead in &leads {
        let (status, _, html) = harness.get(&format!("/{}", lead.slug)).await;
        assert_eq!(status, StatusCode::OK, "{}", lead.slug);
        let company = leadpage_web::render::escape_html(&lead.company_name);
        assert!(html.contains(&company), "{}", lead.slug);
        assert!(html.contains(&lead.first_name));
        assert!(html.contains(&lead.vapi_agent_id));
        assert!(html.contains(&lead.email));
    }
}

#[tokio::test]
async fn test_page_without_public_key_shows_configuration_message() {
    let repo = InMemoryLeadRepository::with_leads([acme_lead()]).unwrap();
    let harness = TestHarness::with_repository(Arc::new(repo), VoiceConfig::default());

    let (status, _, html) = harness.get("/acme-realty").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"data-status="error""#));
    assert!(html.contains("VAPI-Konfiguration fehlt. Bitte kontaktieren Sie den Support."));
}

#[tokio::test]
async fn test_demo_redirect_lands_on_demo_page() {
    let harness = TestHarness::with_leads(vec![lead("demo", "Demo GmbH", "Max", "agent_demo")]);

    let (status, response, _) = harness.get("/").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();

    let (status, _, html) = harness.get(&location).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Demo GmbH"));
}
