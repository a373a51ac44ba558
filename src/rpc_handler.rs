//! RPC method handler for the Read Later JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested. `handle_method`
//! turns a method name and its params into a [`Command`], dispatches it, and
//! renders the outcome as JSON.

use std::path::PathBuf;

use serde_json::{json, Map, Value};

use crate::app::App;
use crate::services::view_projector::favicon_url;
use crate::types::command::{keyboard_command, ActiveTab, Command, DispatchOutcome, ListView, RuntimeMessage};
use crate::types::settings::{KEY_IS_DARK_MODE, KEY_NEWEST_FIRST, KEY_SHOW_BADGE};

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

/// Reads an optional tab object: `{"url": "...", "title": "..."}`.
fn tab_param(value: Option<&Value>) -> Result<Option<ActiveTab>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| format!("invalid tab: {}", e)),
    }
}

/// Serializes a list view, adding each item's favicon.
fn view_to_json(view: &ListView) -> Result<Value, String> {
    let mut value = serde_json::to_value(view).map_err(|e| e.to_string())?;
    if let Some(items) = value.get_mut("items").and_then(Value::as_array_mut) {
        for (rendered, item) in items.iter_mut().zip(&view.items) {
            if let Some(object) = rendered.as_object_mut() {
                let favicon = favicon_url(&item.url).map_or(Value::Null, Value::String);
                object.insert("favicon".to_string(), favicon);
            }
        }
    }
    Ok(value)
}

/// Renders a dispatch outcome as a JSON result.
pub fn outcome_to_json(outcome: DispatchOutcome) -> Result<Value, String> {
    match outcome {
        DispatchOutcome::View(view) => view_to_json(&view),
        DispatchOutcome::PromptOpened { url, default_title } => {
            Ok(json!({"url": url, "defaultTitle": default_title}))
        }
        DispatchOutcome::Exported(path) => Ok(json!({"path": path.to_string_lossy()})),
        DispatchOutcome::Imported(summary) => {
            Ok(json!({"added": summary.added, "skipped": summary.skipped}))
        }
        DispatchOutcome::ThemeApplied { icons } => {
            let map: Map<String, Value> = icons
                .into_iter()
                .map(|(name, path)| (name.to_string(), Value::String(path.to_string())))
                .collect();
            Ok(json!({"icons": map}))
        }
        DispatchOutcome::Acknowledged => Ok(json!({"ok": true})),
        DispatchOutcome::Ignored => Ok(json!({"ok": true, "ignored": true})),
        DispatchOutcome::Failed(message) => Err(message),
    }
}

/// Dispatch a JSON-RPC method call to the appropriate command.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    let command = match method {
        "ping" => return Ok(json!({"pong": true})),

        // ─── Background surface ───
        "command" => {
            let name = str_param(params, "name")?;
            let tab = tab_param(params.get("tab"))?;
            keyboard_command(name, tab).ok_or_else(|| format!("unknown command: {}", name))?
        }
        "runtime.message" => {
            let message: RuntimeMessage = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid message: {}", e))?;
            let outcome = app.dispatcher.dispatch(message.into()).await;
            return Ok(json!({"success": !matches!(outcome, DispatchOutcome::Failed(_))}));
        }

        // ─── Reading list ───
        "list.view" => Command::LoadView,
        "list.open" => Command::OpenItem {
            url: str_param(params, "url")?.to_string(),
        },
        "list.remove" => Command::RemoveItem {
            url: str_param(params, "url")?.to_string(),
        },
        "list.rename" => Command::RenameItem {
            url: str_param(params, "url")?.to_string(),
            title: str_param(params, "title")?.to_string(),
        },
        "list.clear" => Command::ClearAll,
        "list.export" => Command::Export {
            dir: PathBuf::from(str_param(params, "dir")?),
        },
        "list.import" => Command::Import {
            text: str_param(params, "text")?.to_string(),
        },

        // ─── Title prompt ───
        "prompt.open" => Command::OpenTitlePrompt {
            tab: tab_param(params.get("tab"))?,
        },
        "prompt.submit" => Command::SubmitTitle {
            input: params
                .get("input")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        },
        "prompt.cancel" => Command::CancelTitle,

        // ─── View ───
        "view.sort" => Command::ToggleSort,
        "view.search" => Command::Search {
            term: str_param(params, "term")?.to_string(),
        },
        "view.toggle_search" => Command::ToggleSearch,
        "view.edit" => {
            let enabled = params
                .get("enabled")
                .and_then(|v| v.as_bool())
                .ok_or("missing enabled")?;
            if enabled {
                Command::EnterEditMode
            } else {
                Command::ExitEditMode
            }
        }

        // ─── Settings ───
        "settings.get" => {
            let settings = app.dispatcher.settings().await;
            return serde_json::to_value(settings).map_err(|e| e.to_string());
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params
                .get("value")
                .and_then(|v| v.as_bool())
                .ok_or("missing value: expected a boolean")?;
            match key {
                KEY_SHOW_BADGE => Command::SetShowBadge(value),
                KEY_IS_DARK_MODE => Command::ThemeChanged { is_dark_mode: value },
                KEY_NEWEST_FIRST => Command::SetNewestFirst(value),
                other => return Err(format!("invalid settings key: {}", other)),
            }
        }

        _ => return Err(format!("unknown method: {}", method)),
    };

    outcome_to_json(app.dispatcher.dispatch(command).await)
}
