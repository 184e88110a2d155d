use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{DomainError, QuickAction, Settings, MAX_QUICK_ACTIONS};

/// Rebuild [`Settings`] from a persisted blob, field by field.
///
/// | Field            | Accepted when         | Otherwise                    |
/// |------------------|-----------------------|------------------------------|
/// | `botName`        | JSON string           | default bot name             |
/// | `tagline`        | JSON string           | default tagline              |
/// | `welcomeMessage` | JSON string           | default welcome message      |
/// | `quickActions`   | JSON array            | default action list          |
///
/// Inside `quickActions`, entries that are not objects with string `emoji`,
/// `label` and `prompt` are dropped, and the list is cut at
/// [`MAX_QUICK_ACTIONS`]. An empty array is kept as-is. A blob that is valid
/// JSON but not an object yields the defaults; unparseable JSON is an error.
pub fn reconcile_settings(raw: &str) -> Result<Settings, DomainError> {
    let value: Value = serde_json::from_str(raw)?;
    let defaults = Settings::default();

    let Value::Object(map) = value else {
        warn!("Persisted settings are not a JSON object, using defaults");
        return Ok(defaults);
    };

    let bot_name = string_field(&map, "botName").unwrap_or_else(|| defaults.bot_name().to_string());
    let tagline = string_field(&map, "tagline").unwrap_or_else(|| defaults.tagline().to_string());
    let welcome_message = string_field(&map, "welcomeMessage")
        .unwrap_or_else(|| defaults.welcome_message().to_string());

    let quick_actions = match map.get("quickActions") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(quick_action)
            .take(MAX_QUICK_ACTIONS)
            .collect(),
        Some(other) => {
            warn!("Persisted quickActions is not an array ({other}), using defaults");
            defaults.quick_actions().to_vec()
        }
        None => defaults.quick_actions().to_vec(),
    };

    Ok(Settings::new(bot_name, tagline, welcome_message, quick_actions))
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!("Persisted setting '{key}' has unexpected type ({other}), using default");
            None
        }
        None => None,
    }
}

fn quick_action(item: &Value) -> Option<QuickAction> {
    let obj = item.as_object()?;
    let field = |key: &str| obj.get(key).and_then(Value::as_str);

    match (field("emoji"), field("label"), field("prompt")) {
        (Some(emoji), Some(label), Some(prompt)) => Some(QuickAction::new(emoji, label, prompt)),
        _ => {
            warn!("Dropping malformed persisted quick action: {item}");
            None
        }
    }
}
