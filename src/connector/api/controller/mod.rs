pub mod chat_session_controller;
pub mod render_controller;
pub mod settings_controller;

pub use chat_session_controller::ChatSessionController;
pub use render_controller::RenderController;
pub use settings_controller::SettingsController;
