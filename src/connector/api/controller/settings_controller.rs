use anyhow::{bail, Result};

use crate::cli::SettingsAction;
use crate::domain::{QuickActionField, Settings, MAX_QUICK_ACTIONS};

use super::super::Container;

pub struct SettingsController<'a> {
    container: &'a Container,
}

impl<'a> SettingsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn settings(&self, action: SettingsAction) -> Result<String> {
        let controller = self.container.chat_controller().await?;

        match action {
            SettingsAction::Show => {
                return Ok(format!(
                    "{}\n\n{}",
                    format_connection(
                        controller.credential_masked().as_deref(),
                        self.container.proxy_url()
                    ),
                    format_settings(&controller.settings())
                ));
            }
            SettingsAction::ResetKey => {
                controller.reset_credential().await?;
                return Ok("API key removed.".to_string());
            }
            SettingsAction::SetName { value } => {
                controller.update_settings(|s| s.set_bot_name(value));
            }
            SettingsAction::SetTagline { value } => {
                controller.update_settings(|s| s.set_tagline(value));
            }
            SettingsAction::SetWelcome { value } => {
                controller.update_settings(|s| s.set_welcome_message(value));
            }
            SettingsAction::AddAction => {
                if !controller.add_quick_action() {
                    return Ok(format!(
                        "Already at {MAX_QUICK_ACTIONS} quick actions; nothing added."
                    ));
                }
            }
            SettingsAction::RemoveAction { index } => {
                let removed = position(index).is_some_and(|i| controller.remove_quick_action(i));
                if !removed {
                    return Ok(format!("No quick action at position {index}; nothing removed."));
                }
            }
            SettingsAction::EditAction {
                index,
                field,
                value,
            } => {
                let Some(field) = QuickActionField::from_str(&field) else {
                    bail!("Unknown quick action field '{field}' (expected emoji, label or prompt)");
                };
                let updated =
                    position(index).is_some_and(|i| controller.update_quick_action(i, field, value));
                if !updated {
                    return Ok(format!("No quick action at position {index}; nothing changed."));
                }
            }
            SettingsAction::Reset => controller.update_settings(|s| *s = Settings::default()),
        }

        controller.save_settings().await?;
        Ok(format!(
            "Settings saved.\n\n{}",
            format_settings(&controller.settings())
        ))
    }
}

/// 1-based position from the command line to a list index.
fn position(index: usize) -> Option<usize> {
    index.checked_sub(1)
}

fn format_connection(masked_key: Option<&str>, proxy_url: &str) -> String {
    format!(
        "Key:      {}\nProxy:    {proxy_url}",
        masked_key.unwrap_or("(none)")
    )
}

pub(crate) fn format_settings(settings: &Settings) -> String {
    let mut out = format!(
        "Name:     {}\nTagline:  {}\nWelcome:  {}\n\nQuick actions ({}/{MAX_QUICK_ACTIONS}):",
        settings.bot_name(),
        settings.tagline(),
        settings.welcome_message(),
        settings.quick_actions().len(),
    );

    if settings.quick_actions().is_empty() {
        out.push_str("\n  (none)");
    }
    for (i, action) in settings.quick_actions().iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {}\n     {}",
            i + 1,
            action.display_line(),
            action.prompt()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{SessionKey, SessionStore};
    use crate::connector::{ContainerConfig, FileSessionStore};
    use tempfile::TempDir;

    async fn container(dir: &TempDir) -> Container {
        Container::new(ContainerConfig {
            data_dir: dir.path().to_string_lossy().into_owned(),
            proxy_url: "http://127.0.0.1:3999".to_string(),
            mock_provider: true,
        })
        .await
        .unwrap()
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(position(1), Some(0));
        assert_eq!(position(0), None);
    }

    #[test]
    fn formats_defaults() {
        let text = format_settings(&Settings::default());
        assert!(text.starts_with("Name:     Mr. Better Boss\n"));
        assert!(text.contains("Quick actions (6/8):"));
        assert!(text.contains("\n  1. \u{1F4CB} Estimate templates\n"));
    }

    #[test]
    fn formats_empty_action_list() {
        let settings = Settings::new("Bot", "Tag", "Hi", vec![]);
        assert!(format_settings(&settings).ends_with("Quick actions (0/8):\n  (none)"));
    }

    #[test]
    fn formats_connection_with_and_without_key() {
        assert_eq!(
            format_connection(Some("sk-ant-…abcd"), "http://127.0.0.1:3000"),
            "Key:      sk-ant-…abcd\nProxy:    http://127.0.0.1:3000"
        );
        assert!(format_connection(None, "http://x").starts_with("Key:      (none)\n"));
    }

    #[tokio::test]
    async fn show_masks_key_and_reset_key_forgets_it() {
        let dir = TempDir::new().unwrap();
        FileSessionStore::new(dir.path())
            .save(SessionKey::Credential, "sk-ant-api03-secretwxyz")
            .await
            .unwrap();
        let container = container(&dir).await;
        let controller = SettingsController::new(&container);

        let shown = controller.settings(SettingsAction::Show).await.unwrap();
        assert!(shown.starts_with("Key:      sk-ant-…wxyz\nProxy:    http://127.0.0.1:3999\n\n"));
        assert!(!shown.contains("secret"));

        let reply = controller.settings(SettingsAction::ResetKey).await.unwrap();
        assert_eq!(reply, "API key removed.");

        let shown = controller.settings(SettingsAction::Show).await.unwrap();
        assert!(shown.starts_with("Key:      (none)\n"));
        assert!(shown.contains("Name:     Mr. Better Boss\n"));
    }
}
