use crate::domain::{ToolTag, Turn};

/// Prefix the last turn with `[TOOL:<tag>]` when that turn is from the user.
///
/// Earlier turns and a trailing assistant turn are left untouched.
pub fn apply_tool_tag(messages: &mut [Turn], tool: Option<&ToolTag>) {
    let Some(tool) = tool else {
        return;
    };

    if let Some(last) = messages.last_mut() {
        if last.is_user() {
            let tagged = tool.prefix(last.content());
            last.set_content(tagged);
        }
    }
}
