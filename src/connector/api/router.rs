use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{ChatSessionController, RenderController, SettingsController};

pub struct Router<'a> {
    chat_session_controller: ChatSessionController<'a>,
    settings_controller: SettingsController<'a>,
    render_controller: RenderController,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_session_controller: ChatSessionController::new(container),
            settings_controller: SettingsController::new(container),
            render_controller: RenderController::new(),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat { tool, .. } => self.chat_session_controller.chat(tool).await,
            Commands::Settings { action } => self.settings_controller.settings(action).await,
            Commands::Render => self.render_controller.render().await,
            Commands::Serve { .. } => unreachable!("serve is handled separately in main"),
        }
    }
}
