use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the chat proxy (`POST /api/chat`)
    Serve {
        /// Port to listen on (falls back to BETTERBOSS_PORT, then 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the proxy on all network interfaces
        #[arg(long)]
        public: bool,

        /// Answer with an offline echo provider instead of calling Anthropic
        #[arg(long)]
        mock_provider: bool,
    },

    /// Chat with the assistant through a running proxy
    Chat {
        /// Proxy base URL (falls back to BETTERBOSS_PROXY_URL, then http://127.0.0.1:3000)
        #[arg(long)]
        proxy_url: Option<String>,

        /// Tool context sent with every message (ESTIMATE, EMAIL, AUTOMATION, DASHBOARD, KNOWLEDGE)
        #[arg(short, long)]
        tool: Option<String>,
    },

    /// Show or edit the assistant's branding and quick actions
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Render assistant markup read from stdin as HTML
    Render,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    Show,

    SetName {
        value: String,
    },

    SetTagline {
        value: String,
    },

    SetWelcome {
        value: String,
    },

    /// Append a placeholder quick action (at most 8)
    AddAction,

    /// Remove the quick action at a 1-based position
    RemoveAction {
        index: usize,
    },

    /// Change one field (emoji, label or prompt) of a quick action
    EditAction {
        index: usize,
        field: String,
        value: String,
    },

    /// Restore the default settings
    Reset,

    /// Forget the stored API key
    ResetKey,
}
