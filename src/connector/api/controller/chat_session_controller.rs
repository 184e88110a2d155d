use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::domain::{Settings, ToolTag};
use crate::{ChatController, SendOutcome};

use super::super::Container;

const HELP: &str = "\
Commands:
  /N                 send quick action N
  /actions           list quick actions
  /tool TAG text     send text with a tool context (ESTIMATE, EMAIL, AUTOMATION, DASHBOARD, KNOWLEDGE)
  /clear             start a new conversation
  /reset-key         forget the stored API key
  /reset-all         forget the API key, settings and conversation
  /quit              leave";

pub struct ChatSessionController<'a> {
    container: &'a Container,
}

impl<'a> ChatSessionController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat(&self, tool: Option<String>) -> Result<String> {
        let controller = self.container.chat_controller().await?;
        let tool = tool.and_then(ToolTag::new);
        if let Some(tag) = tool.as_ref().filter(|tag| !tag.is_known()) {
            tracing::warn!("Unknown tool context '{tag}', sending it anyway");
        }

        let stdin = BufReader::new(tokio::io::stdin());
        ChatRepl::new(controller, tool, std::io::stdout())
            .run(stdin)
            .await
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Quit,
    Help,
    Actions,
    Clear,
    ResetKey,
    ResetAll,
    QuickAction(usize),
    Tool(ToolTag, String),
    Message(String),
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Self::Message(line.to_string());
        };

        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((command, ""));

        match name {
            "quit" | "exit" => Self::Quit,
            "help" => Self::Help,
            "actions" => Self::Actions,
            "clear" => Self::Clear,
            "reset-key" => Self::ResetKey,
            "reset-all" => Self::ResetAll,
            "tool" => {
                let (tag, text) = rest
                    .split_once(char::is_whitespace)
                    .map(|(tag, text)| (tag, text.trim()))
                    .unwrap_or((rest, ""));
                match ToolTag::new(tag.to_uppercase()) {
                    Some(tag) if !text.is_empty() => Self::Tool(tag, text.to_string()),
                    _ => Self::Unknown(line.to_string()),
                }
            }
            _ => match name.parse::<usize>() {
                Ok(n) if n > 0 => Self::QuickAction(n - 1),
                _ => Self::Unknown(line.to_string()),
            },
        }
    }
}

/// Line-oriented terminal front end for a [`ChatController`].
struct ChatRepl<W: Write> {
    controller: Arc<ChatController>,
    tool: Option<ToolTag>,
    out: W,
}

impl<W: Write> ChatRepl<W> {
    fn new(controller: Arc<ChatController>, tool: Option<ToolTag>, out: W) -> Self {
        Self {
            controller,
            tool,
            out,
        }
    }

    async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> Result<String> {
        let mut lines = input.lines();
        self.print_header()?;

        loop {
            if self.controller.needs_credential() {
                if let Some(error) = self.controller.error() {
                    writeln!(self.out, "! {error}")?;
                }
                write!(self.out, "Anthropic API key: ")?;
                self.out.flush()?;

                let Some(line) = lines.next_line().await? else {
                    break;
                };
                match ReplCommand::parse(&line) {
                    ReplCommand::Quit => break,
                    ReplCommand::Help => writeln!(self.out, "{HELP}")?,
                    ReplCommand::ResetAll => {
                        self.controller.reset_everything().await?;
                        writeln!(self.out, "All data cleared.")?;
                    }
                    ReplCommand::Message(key) => {
                        if self.controller.submit_credential(&key).await.is_ok() {
                            let masked = self.controller.credential_masked().unwrap_or_default();
                            writeln!(self.out, "Connected ({masked}).")?;
                        }
                    }
                    _ => writeln!(self.out, "Enter an API key first (or /help, /quit).")?,
                }
                continue;
            }

            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ReplCommand::parse(&line) {
                ReplCommand::Quit => break,
                ReplCommand::Help => writeln!(self.out, "{HELP}")?,
                ReplCommand::Actions => {
                    let settings = self.controller.settings();
                    self.print_actions(&settings)?;
                }
                ReplCommand::Clear => {
                    self.controller.clear_conversation();
                    writeln!(self.out, "Conversation cleared.\n")?;
                    writeln!(self.out, "{}", self.controller.welcome_message())?;
                }
                ReplCommand::ResetKey => {
                    self.controller.reset_credential().await?;
                    writeln!(self.out, "API key removed.")?;
                }
                ReplCommand::ResetAll => {
                    self.controller.reset_everything().await?;
                    writeln!(self.out, "All data cleared.")?;
                }
                ReplCommand::QuickAction(index) => {
                    let outcome = self.controller.send_quick_action(index).await;
                    if outcome == SendOutcome::Skipped {
                        writeln!(self.out, "No quick action {}.", index + 1)?;
                    } else {
                        self.print_reply()?;
                    }
                }
                ReplCommand::Tool(tag, text) => {
                    let outcome = self.controller.send_message(&text, Some(tag)).await;
                    self.report(outcome)?;
                }
                ReplCommand::Message(text) => {
                    self.controller.set_draft(text);
                    let outcome = self.controller.submit_draft(self.tool.clone()).await;
                    self.report(outcome)?;
                }
                ReplCommand::Unknown(line) => {
                    writeln!(self.out, "Unknown command: {line} (try /help)")?;
                }
            }
        }

        Ok("Goodbye.".to_string())
    }

    fn print_header(&mut self) -> Result<()> {
        let settings = self.controller.settings();
        writeln!(self.out, "{} | {}", settings.bot_name(), settings.tagline())?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", settings.welcome_message())?;
        writeln!(self.out)?;
        self.print_actions(&settings)?;
        writeln!(self.out, "Type /help for commands.")?;
        Ok(())
    }

    fn print_actions(&mut self, settings: &Settings) -> Result<()> {
        for (i, action) in settings.quick_actions().iter().enumerate() {
            writeln!(self.out, "  /{} {}", i + 1, action.display_line())?;
        }
        Ok(())
    }

    fn report(&mut self, outcome: SendOutcome) -> Result<()> {
        match outcome {
            SendOutcome::Skipped => Ok(()),
            _ => self.print_reply(),
        }
    }

    fn print_reply(&mut self) -> Result<()> {
        let bot_name = self.controller.settings().bot_name().to_string();
        if let Some(turn) = self.controller.turns().last().filter(|t| !t.is_user()) {
            writeln!(self.out, "{bot_name}: {}", turn.content())?;
        }
        Ok(())
    }
}
