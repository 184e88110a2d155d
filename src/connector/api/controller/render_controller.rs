use anyhow::Result;
use tokio::io::AsyncReadExt;

use crate::domain::render_markup;

pub struct RenderController;

impl RenderController {
    pub fn new() -> Self {
        Self
    }

    /// Read assistant text from stdin and return it as HTML.
    pub async fn render(&self) -> Result<String> {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(render_markup(text.trim_end_matches('\n')))
    }
}

impl Default for RenderController {
    fn default() -> Self {
        Self::new()
    }
}
