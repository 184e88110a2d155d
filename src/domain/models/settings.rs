use serde::{Deserialize, Serialize};

pub const MAX_QUICK_ACTIONS: usize = 8;

/// A preset button that sends a canned prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    emoji: String,
    label: String,
    prompt: String,
}

impl QuickAction {
    pub fn new(
        emoji: impl Into<String>,
        label: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            emoji: emoji.into(),
            label: label.into(),
            prompt: prompt.into(),
        }
    }

    /// The placeholder appended by "add quick action".
    pub fn placeholder() -> Self {
        Self::new("\u{1F4A1}", "New", "New prompt")
    }

    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set(&mut self, field: QuickActionField, value: impl Into<String>) {
        let value = value.into();
        match field {
            QuickActionField::Emoji => self.emoji = value,
            QuickActionField::Label => self.label = value,
            QuickActionField::Prompt => self.prompt = value,
        }
    }

    pub fn display_line(&self) -> String {
        format!("{} {}", self.emoji, self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickActionField {
    Emoji,
    Label,
    Prompt,
}

impl QuickActionField {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "emoji" => Some(Self::Emoji),
            "label" => Some(Self::Label),
            "prompt" => Some(Self::Prompt),
            _ => None,
        }
    }
}

/// Persona and quick-action configuration.
///
/// Serialized with the camelCase field names the persisted blob uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    bot_name: String,
    tagline: String,
    welcome_message: String,
    quick_actions: Vec<QuickAction>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot_name: "Mr. Better Boss".to_string(),
            tagline: "Your AI JobTread Sidebar".to_string(),
            welcome_message: "Hey there! I'm Mr. Better Boss, your AI-powered JobTread sidebar. \
                I can help with estimates, workflows, automations, client communications, and more. \
                I search the web for the latest info too. What can I help you build today?"
                .to_string(),
            quick_actions: default_quick_actions(),
        }
    }
}

pub fn default_quick_actions() -> Vec<QuickAction> {
    vec![
        QuickAction::new(
            "\u{1F4CB}",
            "Estimate templates",
            "How do I build an effective estimate template in JobTread?",
        ),
        QuickAction::new(
            "\u{2699}\u{FE0F}",
            "Automate workflows",
            "What are the best automations to set up with n8n and JobTread?",
        ),
        QuickAction::new(
            "\u{1F4E6}",
            "Setup catalog",
            "How do I set up my catalog and pricing in JobTread?",
        ),
        QuickAction::new(
            "\u{1F517}",
            "Integrations",
            "What integrations work with JobTread and how do I set them up?",
        ),
        QuickAction::new(
            "\u{1F680}",
            "Faster estimates",
            "How can I speed up my estimates to close more deals?",
        ),
        QuickAction::new(
            "\u{1F4B0}",
            "Improve close rate",
            "How can Better Boss help me improve my close rate?",
        ),
    ]
}

impl Settings {
    pub fn new(
        bot_name: impl Into<String>,
        tagline: impl Into<String>,
        welcome_message: impl Into<String>,
        quick_actions: Vec<QuickAction>,
    ) -> Self {
        let mut quick_actions = quick_actions;
        quick_actions.truncate(MAX_QUICK_ACTIONS);
        Self {
            bot_name: bot_name.into(),
            tagline: tagline.into(),
            welcome_message: welcome_message.into(),
            quick_actions,
        }
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    pub fn tagline(&self) -> &str {
        &self.tagline
    }

    pub fn welcome_message(&self) -> &str {
        &self.welcome_message
    }

    pub fn quick_actions(&self) -> &[QuickAction] {
        &self.quick_actions
    }

    pub fn quick_action(&self, index: usize) -> Option<&QuickAction> {
        self.quick_actions.get(index)
    }

    pub fn set_bot_name(&mut self, value: impl Into<String>) {
        self.bot_name = value.into();
    }

    pub fn set_tagline(&mut self, value: impl Into<String>) {
        self.tagline = value.into();
    }

    pub fn set_welcome_message(&mut self, value: impl Into<String>) {
        self.welcome_message = value.into();
    }

    pub fn can_add_quick_action(&self) -> bool {
        self.quick_actions.len() < MAX_QUICK_ACTIONS
    }

    /// Appends a placeholder action. Returns `false` once the cap is reached.
    pub fn add_quick_action(&mut self) -> bool {
        if !self.can_add_quick_action() {
            return false;
        }
        self.quick_actions.push(QuickAction::placeholder());
        true
    }

    /// Returns `false` when `index` is out of range.
    pub fn remove_quick_action(&mut self, index: usize) -> bool {
        if index >= self.quick_actions.len() {
            return false;
        }
        self.quick_actions.remove(index);
        true
    }

    /// Returns `false` when `index` is out of range.
    pub fn update_quick_action(
        &mut self,
        index: usize,
        field: QuickActionField,
        value: impl Into<String>,
    ) -> bool {
        match self.quick_actions.get_mut(index) {
            Some(action) => {
                action.set(field, value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_six_actions() {
        let settings = Settings::default();
        assert_eq!(settings.bot_name(), "Mr. Better Boss");
        assert_eq!(settings.quick_actions().len(), 6);
    }

    #[test]
    fn ninth_action_is_a_no_op() {
        let mut settings = Settings::default();
        assert!(settings.add_quick_action());
        assert!(settings.add_quick_action());
        assert_eq!(settings.quick_actions().len(), MAX_QUICK_ACTIONS);

        assert!(!settings.add_quick_action());
        assert_eq!(settings.quick_actions().len(), MAX_QUICK_ACTIONS);
        assert_eq!(settings.quick_actions()[7], QuickAction::placeholder());
    }

    #[test]
    fn removing_from_empty_list_is_a_no_op() {
        let mut settings = Settings::new("Bot", "Tag", "Hi", vec![]);
        assert!(!settings.remove_quick_action(0));
        assert!(settings.quick_actions().is_empty());
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut settings = Settings::default();
        let third = settings.quick_actions()[2].clone();
        assert!(settings.remove_quick_action(1));
        assert_eq!(settings.quick_actions()[1], third);
    }

    #[test]
    fn update_edits_single_field() {
        let mut settings = Settings::default();
        assert!(settings.update_quick_action(0, QuickActionField::Label, "Templates"));
        assert_eq!(settings.quick_actions()[0].label(), "Templates");
        assert_eq!(settings.quick_actions()[0].emoji(), "\u{1F4CB}");
        assert!(!settings.update_quick_action(42, QuickActionField::Label, "x"));
    }

    #[test]
    fn new_truncates_to_cap() {
        let actions = (0..12).map(|i| QuickAction::new("*", format!("a{i}"), "p")).collect();
        let settings = Settings::new("Bot", "Tag", "Hi", actions);
        assert_eq!(settings.quick_actions().len(), MAX_QUICK_ACTIONS);
    }

    #[test]
    fn serializes_camel_case_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json.get("botName").is_some());
        assert!(json.get("welcomeMessage").is_some());
        assert!(json.get("quickActions").unwrap().is_array());
    }
}
