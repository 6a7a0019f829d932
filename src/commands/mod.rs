//! `ytnotifier` command group: admin-only settings commands.

mod settings;
mod status;


use crate::state::NotifierState;
use ytnotify_core::{
    message::{IncomingMessage, OutgoingMessage, COMMAND_GROUP as GROUP},
    traits::VideoSource,
};

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub state: &'a NotifierState,
    pub source: &'a dyn VideoSource,
    pub incoming: &'a IncomingMessage,
    pub prefix: &'a str,
}

impl CommandContext<'_> {
    /// Everything after the sub-command word, trimmed.
    pub fn args(&self) -> &str {
        command_args(&self.incoming.text, self.prefix)
    }

    fn reply(&self, text: impl Into<String>) -> OutgoingMessage {
        OutgoingMessage::text(text, self.incoming.reply_target.clone())
    }
}

/// Known sub-commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    YtChannel,
    Channel,
    Message,
    Toggle,
    Test,
    Status,
}

impl Command {
    /// Parse `{prefix}ytnotifier <sub> ...`. Returns `None` for anything else;
    /// an unknown or missing sub-command maps to [`Command::Help`].
    pub fn parse(text: &str, prefix: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix(prefix)?;
        let mut words = rest.split_whitespace();
        if words.next()? != GROUP {
            return None;
        }
        let cmd = match words.next() {
            Some("ytchannel") => Self::YtChannel,
            Some("channel") => Self::Channel,
            Some("message") => Self::Message,
            Some("toggle") => Self::Toggle,
            Some("test") => Self::Test,
            Some("status") => Self::Status,
            _ => Self::Help,
        };
        Some(cmd)
    }
}

/// Text after `{prefix}ytnotifier <sub>`, with surrounding whitespace removed.
pub fn command_args<'t>(text: &'t str, prefix: &str) -> &'t str {
    let rest = text.trim().strip_prefix(prefix).unwrap_or("");
    let rest = rest.trim_start().strip_prefix(GROUP).unwrap_or("");
    let rest = rest.trim_start();
    let after_sub = rest
        .find(char::is_whitespace)
        .map(|i| &rest[i..])
        .unwrap_or("");
    after_sub.trim()
}

/// Run a command and return the reply for the invoking channel.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> OutgoingMessage {
    if ctx.incoming.guild_id.is_none() {
        return ctx.reply("This command can only be used in a server.");
    }
    if !ctx.incoming.is_admin {
        return ctx.reply("You need administrator permission to do that.");
    }

    match cmd {
        Command::Help => ctx.reply(status::help_text(ctx.prefix)),
        Command::YtChannel => settings::handle_ytchannel(ctx).await,
        Command::Channel => settings::handle_channel(ctx).await,
        Command::Message => settings::handle_message(ctx).await,
        Command::Toggle => settings::handle_toggle(ctx).await,
        Command::Test => status::handle_test(ctx).await,
        Command::Status => status::handle_status(ctx).await,
    }
}
