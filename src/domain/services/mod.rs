mod markup;
mod settings_reconciler;
mod system_prompt;
mod tool_context;

pub use markup::*;
pub use settings_reconciler::*;
pub use system_prompt::*;
pub use tool_context::*;
