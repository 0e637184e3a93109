//! Browser side of the call widget.
//!
//! The page embeds the widget's transition table and per-status view as
//! JSON, produced from [`leadpage_widget::transition`] and
//! [`WidgetView::derive`]. The inline script only looks entries up in that
//! table and performs the named effect against the vendor web SDK.

use serde_json::{Map, Value, json};

use leadpage_widget::{
    ButtonAffordance, CallStatus, Effect, InitFailure, Notice, RESET_DELAY, WidgetInput,
    WidgetSnapshot, WidgetView, transition,
};

/// ES module URL of the vendor web SDK.
pub const VAPI_SDK_URL: &str = "https://esm.sh/@vapi-ai/web@2";

/// Inputs the browser can raise, keyed by the name the script dispatches.
pub const CLIENT_INPUTS: [(&str, WidgetInput); 11] = [
    (
        "init-failed",
        WidgetInput::InitFailed(InitFailure::SessionConstruction),
    ),
    ("start", WidgetInput::StartRequested { ready: true }),
    ("start-not-ready", WidgetInput::StartRequested { ready: false }),
    ("start-failed", WidgetInput::StartFailed),
    ("stop", WidgetInput::StopRequested),
    ("call-start", WidgetInput::CallStarted),
    ("call-end", WidgetInput::CallEnded),
    ("speech-start", WidgetInput::SpeechStarted),
    ("speech-end", WidgetInput::SpeechEnded),
    ("error", WidgetInput::SessionFailed),
    ("reset", WidgetInput::ResetElapsed),
];

fn effect_name(effect: Option<Effect>) -> Value {
    match effect {
        Some(Effect::InvokeStart) => json!("start"),
        Some(Effect::InvokeStop) => json!("stop"),
        Some(Effect::ScheduleReset) => json!("reset"),
        None => Value::Null,
    }
}

fn transition_entry(status: CallStatus, input: WidgetInput) -> Value {
    let t = transition(status, input);
    let (notice, message) = match t.notice {
        Notice::Keep => ("keep", None),
        Notice::Clear => ("clear", None),
        Notice::Show(message) => ("show", Some(message)),
    };
    json!({
        "status": t.status,
        "notice": notice,
        "message": message,
        "effect": effect_name(t.effect),
        "speaking": t.speaking,
    })
}

fn view_entry(status: CallStatus, has_agent: bool) -> Value {
    let snapshot = WidgetSnapshot {
        status,
        ..WidgetSnapshot::default()
    };
    let view = WidgetView::derive(&snapshot, has_agent);
    let (class, action) = match view.button {
        ButtonAffordance::Start { .. } => ("button-start", Some("start")),
        ButtonAffordance::Stop => ("button-stop", Some("stop")),
        ButtonAffordance::Busy { .. } => ("button-busy", None),
    };
    json!({
        "status_text": view.status_display.map(|d| d.text),
        "status_class": view.status_display.map(|d| d.tone.css_class()),
        "button_label": view.button.label(),
        "button_class": class,
        "button_action": action,
        "button_enabled": view.button.is_enabled(),
    })
}

/// The table the widget script runs on.
pub fn widget_table(has_agent: bool) -> Value {
    let mut transitions = Map::new();
    let mut views = Map::new();
    for status in CallStatus::ALL {
        let row: Map<String, Value> = CLIENT_INPUTS
            .iter()
            .map(|(name, input)| ((*name).to_string(), transition_entry(status, *input)))
            .collect();
        transitions.insert(status.to_string(), Value::Object(row));
        views.insert(status.to_string(), view_entry(status, has_agent));
    }
    json!({
        "sdk_url": VAPI_SDK_URL,
        "reset_delay_ms": RESET_DELAY.as_millis() as u64,
        "transitions": transitions,
        "views": views,
    })
}

/// [`widget_table`] serialized for a `<script type="application/json">` block.
pub fn widget_table_json(has_agent: bool) -> String {
    widget_table(has_agent).to_string().replace('<', "\\u003c")
}

/// The widget script.
pub const WIDGET_JS: &str = r#"
const root = document.getElementById("call-widget");
const table = JSON.parse(document.getElementById("call-widget-table").textContent);
const agentId = root.dataset.agentId || "";
const publicKey = root.dataset.publicKey || "";
const statusEl = root.querySelector('[data-role="status"]');
const messageEl = root.querySelector('[data-role="message"]');
const speakingEl = root.querySelector('[data-role="speaking"]');
const button = root.querySelector('[data-role="button"]');

let status = root.dataset.status;
let vapi = null;
let resetTimer = null;

function render() {
    const view = table.views[status];
    root.dataset.status = status;
    statusEl.hidden = view.status_text === null;
    statusEl.className = view.status_class || "status";
    statusEl.textContent = view.status_text || "";
    messageEl.hidden = messageEl.textContent === "";
    button.className = view.button_class;
    button.textContent = view.button_label;
    button.disabled = !view.button_enabled;
    if (view.button_action) {
        button.dataset.action = view.button_action;
    } else {
        delete button.dataset.action;
    }
}

function cancelReset() {
    if (resetTimer !== null) {
        clearTimeout(resetTimer);
        resetTimer = null;
    }
}

function dispatch(input) {
    const from = status;
    const t = table.transitions[from][input];
    status = t.status;
    if (t.notice === "clear") {
        messageEl.textContent = "";
    } else if (t.notice === "show") {
        messageEl.textContent = t.message;
    }
    if (t.speaking !== null) {
        speakingEl.hidden = !t.speaking;
    }
    if (status === "connecting" && from !== "connecting") {
        cancelReset();
    }
    if (t.effect === "stop" && vapi) {
        vapi.stop();
    } else if (t.effect === "reset") {
        cancelReset();
        resetTimer = setTimeout(() => {
            resetTimer = null;
            dispatch("reset");
        }, table.reset_delay_ms);
    }
    render();
    return t;
}

async function start() {
    if (!vapi || agentId === "") {
        dispatch("start-not-ready");
        return;
    }
    if (dispatch("start").effect !== "start") {
        return;
    }
    try {
        await vapi.start(agentId);
    } catch (err) {
        console.error("failed to start call", err);
        dispatch("start-failed");
    }
}

button.addEventListener("click", () => {
    if (button.dataset.action === "start") {
        start();
    } else if (button.dataset.action === "stop") {
        dispatch("stop");
    }
});

if (publicKey !== "") {
    try {
        const { default: Vapi } = await import(table.sdk_url);
        vapi = new Vapi(publicKey);
        for (const name of ["call-start", "call-end", "speech-start", "speech-end"]) {
            vapi.on(name, () => dispatch(name));
        }
        vapi.on("error", (err) => {
            console.error("voice session error", err);
            dispatch("error");
        });
        window.addEventListener("pagehide", () => {
            cancelReset();
            vapi.stop();
        });
    } catch (err) {
        console.error("failed to initialize voice session", err);
        dispatch("init-failed");
    }
}
render();
"#;
