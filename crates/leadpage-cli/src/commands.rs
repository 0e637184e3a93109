//! Subcommand implementations.

use std::io::Write;
use std::time::Duration;

use leadpage_core::{AppConfig, ConfigManager, Error as CoreError, Slug, VoiceConfig};
use leadpage_store::{LeadRepository, create_lead_repository};
use leadpage_web::{PageMetadata, Server, contact_link};
use leadpage_widget::{
    CallStatus, CallWidgetController, MockSessionFactory, MockVoiceSession, SessionEvent,
    WidgetView,
};
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config_handlers::handle_config_command;
use crate::error::Result;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Config { action } => {
            handle_config_command(config_path, action, &mut std::io::stdout().lock())?;
        }
        Command::Serve { host, port } => {
            let mut config = AppConfig::load(config_path)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await?;
        }
        Command::Lookup { slug } => {
            let config = AppConfig::load(config_path)?;
            let repository = create_lead_repository(&config)?;
            lookup(repository.as_ref(), &slug, &mut std::io::stdout()).await?;
        }
        Command::CallDemo {
            slug,
            reset_delay_ms,
        } => {
            let config = AppConfig::load(config_path)?;
            let repository = create_lead_repository(&config)?;
            call_demo(
                repository.as_ref(),
                &config.voice,
                &slug,
                Duration::from_millis(reset_delay_ms),
                &mut std::io::stdout(),
            )
            .await?;
        }
    }
    Ok(())
}

/// Run the HTTP server until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<()> {
    config.warn_missing();
    Server::new(&config)?.serve().await?;
    Ok(())
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    lead: &'a leadpage_core::Lead,
    metadata: PageMetadata,
    contact_link: String,
}

/// Print a lead, its page metadata and contact link as JSON.
///
/// Unlike the web page, lookup failures are reported as errors.
pub async fn lookup<W: Write>(
    repository: &dyn LeadRepository,
    slug: &str,
    out: &mut W,
) -> Result<()> {
    let slug = Slug::parse(slug)?;
    let lead = repository
        .lookup(&slug)
        .await?
        .ok_or_else(|| CoreError::not_found(slug.as_str()))?;

    let output = LookupOutput {
        metadata: PageMetadata::for_lead(&lead),
        contact_link: contact_link(&lead),
        lead: &lead,
    };
    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    Ok(())
}

fn print_view<W: Write>(out: &mut W, step: &str, view: &WidgetView) -> std::io::Result<()> {
    let status_text = view.status_display.map_or("-", |d| d.text);
    write!(
        out,
        "{step:<16} {status:<10} {status_text:<20} [{button}{disabled}]",
        status = view.status.as_str(),
        button = view.button.label(),
        disabled = if view.button.is_enabled() { "" } else { ", disabled" },
    )?;
    if view.assistant_speaking {
        write!(out, " (Sarah spricht)")?;
    }
    if let Some(message) = view.message {
        write!(out, " {message}")?;
    }
    writeln!(out)
}

/// Walk a lead's call widget through one scripted call.
///
/// The vendor side is a [`MockVoiceSession`]; the controller, transitions
/// and view are the real ones.
pub async fn call_demo<W: Write>(
    repository: &dyn LeadRepository,
    voice: &VoiceConfig,
    slug: &str,
    reset_delay: Duration,
    out: &mut W,
) -> Result<()> {
    let slug = Slug::parse(slug)?;
    let lead = repository
        .lookup(&slug)
        .await?
        .ok_or_else(|| CoreError::not_found(slug.as_str()))?;

    writeln!(
        out,
        "Call demo for {} ({}), agent {}",
        lead.company_name,
        lead.slug,
        if lead.has_agent() { lead.vapi_agent_id.as_str() } else { "<none>" }
    )?;

    let session = MockVoiceSession::new();
    let widget = CallWidgetController::mount_with(
        voice,
        lead.vapi_agent_id.clone(),
        &MockSessionFactory::new(session.clone()),
        reset_delay,
    );
    print_view(out, "mounted", &widget.view())?;
    if widget.status() == CallStatus::Error {
        return Ok(());
    }

    if let Err(err) = widget.start().await {
        print_view(out, "start failed", &widget.view())?;
        return Err(err.into());
    }
    print_view(out, "start", &widget.view())?;

    session.emit(SessionEvent::CallStart);
    print_view(out, "call-start", &widget.view())?;

    session.emit(SessionEvent::SpeechStart);
    print_view(out, "speech-start", &widget.view())?;

    session.emit(SessionEvent::SpeechEnd);
    print_view(out, "speech-end", &widget.view())?;

    widget.stop();
    session.emit(SessionEvent::CallEnd);
    print_view(out, "stop", &widget.view())?;

    widget
        .wait_for_status(CallStatus::Idle, reset_delay + Duration::from_secs(1))
        .await?;
    print_view(out, "reset", &widget.view())?;

    widget.unmount();
    Ok(())
}
