//! The command dispatcher.
//!
//! [`Ntc`] owns the messenger handle, the local stores, the session state
//! and the renderer. [`Ntc::dispatch`] runs exactly one handler per command.
//! Handlers check their own preconditions and print one short status line;
//! messenger failures all go through one reporter.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;

use crate::commands::{Command, DEFAULT_HISTORY, HELP_SECTIONS, Input, parse_input};
use crate::config::NtcConfig;
use crate::error::{Error, Result};
use crate::i18n::{Key, Language};
use crate::messenger::Messenger;
use crate::observability::{
    CLIENT_ERRORS, CLIENT_WRITE_FORBIDDEN, COMMAND_DURATION, COMMANDS_DISPATCHED,
    COMMANDS_UNKNOWN, LIVE_MESSAGES, MESSAGES_RENDERED,
};
use crate::render::{Renderer, typing_delay};
use crate::session::SessionState;
use crate::store::{DialogCache, DraftStore, MessageCache, Settings};
use crate::theme::{Palette, Theme, ansi};
use crate::types::{Chat, ChatKind, Dialog, Login, Message, MessageId, ProfileUpdate};
use crate::utils::text::{markdown_to_ansi, pad_to_width, strip_ansi, truncate_chars};

/// How many dialogs `list` fetches.
pub const DIALOG_FETCH_LIMIT: usize = 100;
/// How many matches `search` shows.
pub const SEARCH_LIMIT: usize = 15;

const NAME_COLUMN: usize = 32;
const HEADER_TITLE_CHARS: usize = 40;
const ANIMATED_TEXT_CHARS: usize = 100;
const HISTORY_TEXT_CHARS: usize = 80;
const SEARCH_TEXT_CHARS: usize = 70;
const DRAFT_HINT_CHARS: usize = 30;

const PRODUCT: &str = "ntc - terminal messaging client";

/// Symbols on the slot machine reels.
pub const SLOT_SYMBOLS: [&str; 9] = ["🍎", "🍊", "🍋", "🍌", "🍉", "🍇", "🍓", "7️⃣", "💎"];
const SEVEN: &str = "7️⃣";
const SLOT_PAUSE: Duration = Duration::from_millis(500);

/// What the interactive loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Result of one slot machine roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Jackpot,
    Win,
    SmallWin,
    Lose,
}

/// Judges three reels: three sevens is a jackpot, three equal symbols a
/// win, an adjacent pair a small win.
pub fn judge_slots(r1: &str, r2: &str, r3: &str) -> SlotOutcome {
    if r1 == r2 && r2 == r3 {
        if r1 == SEVEN {
            SlotOutcome::Jackpot
        } else {
            SlotOutcome::Win
        }
    } else if r1 == r2 || r2 == r3 {
        SlotOutcome::SmallWin
    } else {
        SlotOutcome::Lose
    }
}

fn roll_slots() -> [&'static str; 3] {
    let mut rng = rand::thread_rng();
    let mut reel = || SLOT_SYMBOLS.choose(&mut rng).copied().unwrap_or(SEVEN);
    [reel(), reel(), reel()]
}

/// The interactive front-end for one account.
pub struct Ntc<M: Messenger> {
    client: Arc<M>,
    config: NtcConfig,
    settings: Settings,
    theme: Theme,
    language: Language,
    drafts: DraftStore,
    cache: MessageCache,
    dialog_cache: DialogCache,
    dialogs: Vec<Dialog>,
    session: SessionState,
    renderer: Box<dyn Renderer>,
}

impl<M: Messenger> Ntc<M> {
    /// Creates the front-end, loading every store from the data directory.
    pub fn new(client: Arc<M>, config: NtcConfig, renderer: Box<dyn Renderer>) -> Self {
        let settings = Settings::load(config.settings_path());
        let dialog_cache = DialogCache::new(config.dialog_cache_path());
        Self {
            theme: settings.theme(),
            language: settings.language(),
            drafts: DraftStore::load(config.drafts_path()),
            cache: MessageCache::load(config.message_cache_path()),
            dialogs: dialog_cache.load(),
            dialog_cache,
            settings,
            session: SessionState::new(),
            client,
            config,
            renderer,
        }
    }

    pub fn client(&self) -> &Arc<M> {
        &self.client
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn cache(&self) -> &MessageCache {
        &self.cache
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn palette(&self) -> Palette {
        self.theme.palette()
    }

    fn t(&self, key: Key) -> &'static str {
        self.language.t(key)
    }

    /// The input prompt, styled for the active theme.
    pub fn prompt(&self) -> String {
        let prompt = format!("{}>{} ", self.palette().primary, ansi::RESET);
        if self.config.use_color {
            prompt
        } else {
            strip_ansi(&prompt)
        }
    }

    /// Connects the messenger and greets the account.
    pub async fn login(&mut self) -> Result<Login> {
        let login = self.client.connect().await?;
        let primary = self.palette().primary;
        if login.restored {
            let line = format!("{primary}✓{} {}", ansi::RESET, self.t(Key::Session));
            self.renderer.print_line(&line);
        } else {
            self.renderer
                .print_line(&format!("{primary}+{} First login", ansi::RESET));
        }
        let line = format!(
            "{primary}✓{} {}: {}",
            ansi::RESET,
            self.t(Key::LoggedIn),
            login.me.first_name
        );
        self.renderer.print_line(&line);
        self.renderer.print_line("");
        tracing::info!(account = %login.me.id, restored = login.restored, "logged in");
        Ok(login)
    }

    /// Prints the hint shown once when the interactive loop starts.
    pub fn greet(&mut self) {
        let line = format!(
            "{}type 'ntc --help' for commands{}",
            self.palette().secondary,
            ansi::RESET
        );
        self.renderer.print_line(&line);
        self.renderer.print_line("");
    }

    /// Parses and runs one line of interactive input.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match parse_input(line) {
            Input::Empty => Flow::Continue,
            Input::Command { name, args } => {
                self.dispatch(Command::parse(&name, args.as_deref())).await
            }
            Input::Direct { text, draft } => {
                if let Err(err) = self.send_direct(&text, draft).await {
                    self.report_error(&err);
                }
                Flow::Continue
            }
        }
    }

    /// Runs one command.
    pub async fn dispatch(&mut self, command: Command) -> Flow {
        let started = Instant::now();
        COMMANDS_DISPATCHED.click();
        tracing::debug!(command = command.name(), "dispatching");
        let result = match command {
            Command::List(limit) => self.list_chats(limit).await,
            Command::Select(number) => self.select_dialog(number).await,
            Command::Messages(limit) => self.show_messages(limit).await,
            Command::Search(query) => self.search(&query).await,
            Command::Send(text) => self.send(&text).await,
            Command::Reply { number, text } => self.reply(number, &text).await,
            Command::Forward(number) => self.forward_to_saved(number).await,
            Command::Edit { number, text } => self.edit(number, &text).await,
            Command::Delete(number) => self.delete(number).await,
            Command::React { number, emoji } => self.react(number, &emoji).await,
            Command::DownloadMedia(number) => self.download_media(number).await,
            Command::SendFile(path) => self.send_file(&path).await,
            Command::MyProfile => self.show_profile().await,
            Command::ChangeUsername(username) => self.change_username(&username).await,
            Command::ChangeName { first, last } => self.change_name(&first, &last).await,
            Command::ChangeBio(bio) => self.change_bio(&bio).await,
            Command::Theme(name) => {
                self.change_theme(&name);
                Ok(())
            }
            Command::Lang(code) => {
                self.change_language(code.as_deref());
                Ok(())
            }
            Command::Text { user, text } => self.send_to_user(&user, &text).await,
            Command::Logout => match self.logout().await {
                Ok(()) => {
                    COMMAND_DURATION.add(started.elapsed().as_secs_f64());
                    return Flow::Exit;
                }
                Err(err) => Err(err),
            },
            Command::Saved => self.saved_messages().await,
            Command::Slots => self.slots().await,
            Command::Help => {
                self.show_help();
                Ok(())
            }
            Command::About => {
                self.show_about();
                Ok(())
            }
            Command::Exit => {
                self.status(self.t(Key::Exit));
                return Flow::Exit;
            }
            Command::Invalid(usage) => {
                self.note(&usage);
                Ok(())
            }
            Command::Unknown(name) => {
                COMMANDS_UNKNOWN.click();
                self.status(&format!("unknown: --{name}"));
                Ok(())
            }
        };
        if let Err(err) = result {
            self.report_error(&err);
        }
        COMMAND_DURATION.add(started.elapsed().as_secs_f64());
        Flow::Continue
    }

    /// Renders a message that arrived while the program runs.
    ///
    /// Only messages of the selected chat are shown; they are cached, get the
    /// next message number and are followed by the draft hint and prompt.
    /// Returns whether the message was shown.
    pub fn on_new_message(&mut self, message: &Message) -> bool {
        let selected = self.session.current().map(|chat| chat.id);
        if selected != Some(message.chat_id) {
            return false;
        }
        LIVE_MESSAGES.click();
        self.cache.insert(message);
        if !message.outgoing {
            self.renderer.print_inline("\n");
        }
        self.show_animated(message);
        if let Some(draft) = self.drafts.get(message.chat_id) {
            let hint = format!(
                "{}[draft: {}...]{} ",
                ansi::DIM,
                truncate_chars(draft, DRAFT_HINT_CHARS),
                ansi::RESET
            );
            self.renderer.print_inline(&hint);
        }
        let prompt = self.prompt();
        self.renderer.print_inline(&prompt);
        true
    }

    /// Flushes the caches and closes the messenger connection.
    pub async fn shutdown(&mut self) {
        self.cache.save();
        self.drafts.save();
        if let Err(err) = self.client.disconnect().await {
            tracing::warn!(error = %err, "disconnect failed");
        }
    }

    /////////////////////////////////////////// output ///////////////////////////////////////////

    fn ok(&mut self, text: &str) {
        let line = format!("{}✓{} {text}", self.palette().primary, ansi::RESET);
        self.renderer.print_line(&line);
    }

    fn status(&mut self, text: &str) {
        let line = format!("{}{text}{}", self.palette().secondary, ansi::RESET);
        self.renderer.print_line(&line);
    }

    fn note(&mut self, text: &str) {
        self.renderer
            .print_line(&format!("{}{text}{}", ansi::GRAY, ansi::RESET));
    }

    fn spin(&mut self) {
        let primary = self.palette().primary;
        self.renderer.spin(primary);
    }

    /// Prints the status line for a failed messenger call.
    pub fn report_error(&mut self, err: &Error) {
        CLIENT_ERRORS.click();
        tracing::debug!(error = %err, "command failed");
        if err.is_write_forbidden() {
            CLIENT_WRITE_FORBIDDEN.click();
            let line = format!(
                "{}✗{} {}",
                self.palette().primary,
                ansi::RESET,
                self.t(Key::CantWrite)
            );
            self.renderer.print_line(&line);
        } else if err.is_not_modified() {
            self.note("message not modified");
        } else {
            let line = format!("✗ {}: {err}", self.t(Key::Error));
            self.status(&line);
        }
    }

    fn current_chat(&mut self) -> Option<Chat> {
        let chat = self.session.current().cloned();
        if chat.is_none() {
            self.status(self.t(Key::NoChat));
        }
        chat
    }

    /// Resolves a message number, printing why when it does not resolve.
    fn message_at(&mut self, number: usize) -> Option<MessageId> {
        match self.session.message_id(number) {
            None => {
                self.note("invalid message number");
                None
            }
            Some(id) if self.session.is_deleted(id) => {
                self.note("message not found");
                None
            }
            Some(id) => Some(id),
        }
    }

    fn status_glyph(&self, message: &Message) -> String {
        if !message.outgoing {
            return format!("{}•{}", ansi::WHITE, ansi::RESET);
        }
        let receipt = self.session.receipts().get(message.chat_id, message.id);
        let (read, readers) = match receipt {
            Some(status) => (status.read, status.readers),
            None => (message.read, message.readers.clone()),
        };
        match readers {
            Some(readers) => format!("{}✓✓[{}]{}", ansi::WHITE, readers.len(), ansi::RESET),
            None if read => format!("{}✓✓{}", ansi::WHITE, ansi::RESET),
            None => format!("{}✓{}", ansi::GRAY, ansi::RESET),
        }
    }

    fn media_label(&self, message: &Message) -> Option<String> {
        let media = message.media.as_ref()?;
        Some(format!(
            "{}[{}]{}",
            self.palette().primary,
            media.label(),
            ansi::RESET
        ))
    }

    /// `NN HH:MM status arrow sender | ` up to where the text starts.
    fn line_prefix(&self, number: usize, message: &Message) -> String {
        let palette = self.palette();
        let arrow = if message.outgoing {
            format!("{}→{}", palette.primary, ansi::RESET)
        } else {
            format!("{}←{}", palette.secondary, ansi::RESET)
        };
        let edited = if message.is_edited() {
            format!("{}[edited]{} ", ansi::GRAY, ansi::RESET)
        } else {
            String::new()
        };
        format!(
            "{number:2} {}{}{} {} {arrow} {} | {edited}",
            palette.dim,
            message.time_label(),
            ansi::RESET,
            self.status_glyph(message),
            message.sender_label(),
        )
    }

    fn history_line(&self, number: usize, message: &Message) -> String {
        let mut line = self.line_prefix(number, message);
        let label = self.media_label(message);
        if message.text.is_empty() {
            line.push_str(label.as_deref().unwrap_or_default());
        } else {
            line.push_str(&markdown_to_ansi(truncate_chars(
                &message.text,
                HISTORY_TEXT_CHARS,
            )));
            if let Some(label) = label {
                line.push(' ');
                line.push_str(&label);
            }
        }
        line
    }

    /// Numbers `message` and types it out.
    fn show_animated(&mut self, message: &Message) {
        if !message.is_displayable() {
            return;
        }
        MESSAGES_RENDERED.click();
        let number = self.session.record(message);
        let prefix = self.line_prefix(number, message);
        let label = self.media_label(message);
        self.renderer.print_inline(&prefix);
        if message.text.is_empty() {
            self.renderer.print_line(label.as_deref().unwrap_or_default());
            return;
        }
        let text = markdown_to_ansi(truncate_chars(&message.text, ANIMATED_TEXT_CHARS));
        let delay = typing_delay(message.text.chars().count());
        self.renderer.type_text(&text, delay);
        match label {
            Some(label) => self.renderer.print_line(&format!(" {label}")),
            None => self.renderer.print_line(""),
        }
    }

    fn remember_sent(&mut self, message: &Message) {
        self.cache.insert(message);
        self.show_animated(message);
    }

    ////////////////////////////////////////// handlers //////////////////////////////////////////

    async fn list_chats(&mut self, limit: Option<usize>) -> Result<()> {
        self.renderer.print_line("");
        self.status(self.t(Key::Chats));
        self.dialogs = self.client.dialogs(DIALOG_FETCH_LIMIT).await?;
        self.dialog_cache.save(&self.dialogs);

        let palette = self.palette();
        let bar = format!("{}│{}", palette.dim, ansi::RESET);
        let shown = limit.filter(|&n| n > 0).unwrap_or(self.dialogs.len());
        let mut rows = Vec::new();
        for (idx, dialog) in self.dialogs.iter().take(shown).enumerate() {
            let chat = &dialog.chat;
            let badge_color = match chat.kind {
                ChatKind::Bot => palette.primary,
                _ => palette.secondary,
            };
            let badge = format!("{badge_color}{}{}", chat.kind.badge(), ansi::RESET);
            let draft = if self.drafts.contains(chat.id) {
                format!("{}📝{}", ansi::YELLOW, ansi::RESET)
            } else {
                String::new()
            };
            let unread = if dialog.unread_count > 0 {
                format!("+{}", dialog.unread_count)
            } else {
                String::new()
            };
            let name = pad_to_width(truncate_chars(&chat.title, NAME_COLUMN), NAME_COLUMN);
            rows.push(format!(
                "{bar}  {:2}  {bar} {name} {badge} {draft} {bar} {unread:>6} {bar}",
                idx + 1
            ));
        }
        for row in rows {
            self.renderer.print_line(&row);
        }
        self.renderer.print_line("");
        Ok(())
    }

    async fn select_dialog(&mut self, number: usize) -> Result<()> {
        let chat = number
            .checked_sub(1)
            .and_then(|idx| self.dialogs.get(idx))
            .map(|dialog| dialog.chat.clone());
        match chat {
            Some(chat) => self.select_chat(chat).await,
            None => {
                self.note(self.t(Key::NotFound));
                Ok(())
            }
        }
    }

    async fn select_chat(&mut self, chat: Chat) -> Result<()> {
        self.renderer.print_line("");
        let line = format!("{}→{} {}", self.palette().primary, ansi::RESET, chat.title);
        self.renderer.print_line(&line);
        self.renderer.print_line("");
        let id = chat.id;
        self.session.select(chat);
        tracing::debug!(chat = %id, "selected chat");
        if let Some(draft) = self.drafts.get(id) {
            let line = format!("{}📝 Draft: {draft}{}", ansi::YELLOW, ansi::RESET);
            self.renderer.print_line(&line);
            self.renderer.print_line("");
        }
        self.show_messages(DEFAULT_HISTORY).await
    }

    async fn show_messages(&mut self, limit: usize) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        let header = format!(
            "{} — {}",
            self.t(Key::History),
            truncate_chars(&chat.title, HEADER_TITLE_CHARS)
        );
        self.status(&header);

        let messages = match self.client.history(chat.id, limit).await {
            Ok(mut messages) => {
                messages.reverse();
                messages
            }
            Err(err) => {
                let cached = self.cache.chat(chat.id);
                if cached.is_empty() {
                    return Err(err);
                }
                tracing::debug!(error = %err, chat = %chat.id, "showing cached history");
                self.note("(cached)");
                let skip = cached.len().saturating_sub(limit);
                cached.into_iter().skip(skip).collect()
            }
        };

        self.session.begin_display();
        for message in messages.iter().filter(|m| m.is_displayable()) {
            self.cache.insert(message);
            let number = self.session.record(message);
            let line = self.history_line(number, message);
            MESSAGES_RENDERED.click();
            self.renderer.print_line(&line);
        }
        self.renderer.print_line("");
        self.cache.save();
        Ok(())
    }

    async fn search(&mut self, query: &str) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        self.renderer.print_line("");
        self.status(&format!("search: {query}"));
        let hits = self.client.search(chat.id, query, SEARCH_LIMIT).await?;
        let dim = self.palette().dim;
        let mut found = 0;
        for message in hits.iter().filter(|m| !m.text.is_empty()) {
            found += 1;
            let line = format!(
                "  {found}. {dim}{}{} {} | {}",
                message.time_label(),
                ansi::RESET,
                message.sender_label(),
                markdown_to_ansi(truncate_chars(&message.text, SEARCH_TEXT_CHARS))
            );
            self.renderer.print_line(&line);
        }
        if found == 0 {
            self.status("no results");
        }
        self.renderer.print_line("");
        Ok(())
    }

    async fn send_direct(&mut self, text: &str, draft: bool) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        if draft {
            self.drafts.save_draft(chat.id, text);
        }
        self.send(text).await
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        self.spin();
        let sent = self.client.send_message(chat.id, text, None).await?;
        self.drafts.clear(chat.id);
        self.remember_sent(&sent);
        Ok(())
    }

    async fn reply(&mut self, number: usize, text: &str) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        let Some(target) = self.message_at(number) else {
            return Ok(());
        };
        self.spin();
        let sent = self.client.send_message(chat.id, text, Some(target)).await?;
        self.remember_sent(&sent);
        Ok(())
    }

    async fn forward_to_saved(&mut self, number: usize) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        let Some(id) = self.message_at(number) else {
            return Ok(());
        };
        if self.client.message(chat.id, id).await?.is_none() {
            self.note("message not found");
            return Ok(());
        }
        let me = self.client.me().await?;
        self.spin();
        self.client.forward_messages(chat.id, &[id], me.id).await?;
        self.ok("forwarded");
        Ok(())
    }

    async fn edit(&mut self, number: usize, text: &str) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        let Some(id) = self.message_at(number) else {
            return Ok(());
        };
        let own = self
            .client
            .message(chat.id, id)
            .await?
            .is_some_and(|message| message.outgoing);
        if !own {
            self.note("can only edit your own messages");
            return Ok(());
        }
        self.spin();
        let edited = self.client.edit_message(chat.id, id, text).await?;
        self.ok("message edited");
        self.cache.insert(&edited);
        Ok(())
    }

    async fn delete(&mut self, number: usize) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        let Some(id) = self.message_at(number) else {
            return Ok(());
        };
        let Some(message) = self.client.message(chat.id, id).await? else {
            self.note("message not found");
            return Ok(());
        };
        if !message.outgoing && chat.kind.is_multi_member() {
            let permissions = self.client.permissions(chat.id).await?;
            if !permissions.delete_messages {
                self.note("no permission to delete");
                return Ok(());
            }
        }
        self.spin();
        self.client.delete_messages(chat.id, &[id]).await?;
        self.ok("message deleted");
        self.cache.remove(chat.id, id);
        self.session.tombstone(id);
        Ok(())
    }

    async fn react(&mut self, number: usize, emoji: &str) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        let Some(id) = self.message_at(number) else {
            return Ok(());
        };
        if self.client.message(chat.id, id).await?.is_none() {
            self.note("message not found");
            return Ok(());
        }
        self.spin();
        self.client.react(chat.id, id, emoji).await?;
        self.ok(&format!("reacted with {emoji}"));
        Ok(())
    }

    async fn download_media(&mut self, number: usize) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        let Some(id) = self.session.media_id(number) else {
            self.note(self.t(Key::NotFound));
            return Ok(());
        };
        let media = self
            .client
            .message(chat.id, id)
            .await?
            .and_then(|message| message.media);
        let Some(media) = media else {
            self.note(self.t(Key::NoMedia));
            return Ok(());
        };
        let (category, _) = media.classify();
        let dir = self.config.downloads_dir(category);
        let path = self.client.download_media(chat.id, id, &dir).await?;
        let path = std::path::absolute(&path).unwrap_or(path);
        self.ok(&path.display().to_string());
        Ok(())
    }

    async fn send_file(&mut self, path: &str) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        let path = Path::new(path);
        if !path.exists() {
            self.note(self.t(Key::NotFound));
            return Ok(());
        }
        self.spin();
        let sent = self.client.send_file(chat.id, path).await?;
        self.remember_sent(&sent);
        Ok(())
    }

    async fn show_profile(&mut self) -> Result<()> {
        let me = self.client.me().await?;
        let lines = [
            String::new(),
            format!("{}profile{}", self.palette().primary, ansi::RESET),
            format!("  id: {}", me.id),
            format!("  name: {}", me.full_name()),
            format!("  user: @{}", me.username.as_deref().unwrap_or("none")),
            format!("  bio: {}", me.bio.as_deref().unwrap_or("none")),
            String::new(),
        ];
        for line in lines {
            self.renderer.print_line(&line);
        }
        Ok(())
    }

    async fn change_username(&mut self, username: &str) -> Result<()> {
        self.spin();
        self.client.update_username(username).await?;
        self.ok(&format!("username @{username}"));
        Ok(())
    }

    async fn change_name(&mut self, first: &str, last: &str) -> Result<()> {
        self.spin();
        self.client
            .update_profile(ProfileUpdate::name(first, last))
            .await?;
        self.ok("name changed");
        Ok(())
    }

    async fn change_bio(&mut self, bio: &str) -> Result<()> {
        self.spin();
        self.client.update_profile(ProfileUpdate::about(bio)).await?;
        self.ok("bio changed");
        Ok(())
    }

    fn change_theme(&mut self, name: &str) {
        match name.parse::<Theme>() {
            Ok(theme) => {
                self.theme = theme;
                self.settings.set_theme(theme);
                self.settings.save();
                self.ok(&format!("theme changed to {theme}"));
            }
            Err(_) => self.note(&format!("available themes: {}", Theme::names())),
        }
    }

    fn change_language(&mut self, code: Option<&str>) {
        let Some(code) = code else {
            for language in Language::ALL {
                let marker = if language == self.language { "*" } else { " " };
                let line = format!("  {marker} {}  {}", language.code(), language.native_name());
                self.renderer.print_line(&line);
            }
            return;
        };
        match code.parse::<Language>() {
            Ok(language) => {
                self.language = language;
                self.settings.set_language(language);
                self.settings.save();
                self.ok(&format!("language: {}", language.native_name()));
            }
            Err(message) => self.note(&message),
        }
    }

    async fn send_to_user(&mut self, user: &str, text: &str) -> Result<()> {
        let user = user.trim_start_matches('@');
        self.spin();
        let chat = self.client.resolve_username(user).await?;
        self.client.send_message(chat.id, text, None).await?;
        self.ok(&format!("sent to @{user}"));
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.spin();
        self.cache.save();
        self.drafts.save();
        self.client.log_out().await?;
        self.ok("logged out");
        tracing::info!("logged out");
        Ok(())
    }

    async fn saved_messages(&mut self) -> Result<()> {
        let me = self.client.me().await?;
        let chat = self.client.chat(me.id).await?;
        self.select_chat(chat).await
    }

    async fn slots(&mut self) -> Result<()> {
        let Some(chat) = self.current_chat() else {
            return Ok(());
        };
        self.spin();
        let sent = self.client.send_message(chat.id, "🎰", None).await?;
        if self.config.animate {
            tokio::time::sleep(SLOT_PAUSE).await;
        }
        let [r1, r2, r3] = roll_slots();
        let reels = format!("{r1}{r2}{r3}");
        let line = match judge_slots(r1, r2, r3) {
            SlotOutcome::Jackpot => {
                format!("{}jackpot! {reels}{}", self.palette().primary, ansi::RESET)
            }
            SlotOutcome::Win => format!("{}win {reels}{}", ansi::WHITE, ansi::RESET),
            SlotOutcome::SmallWin => format!("{}small win {reels}{}", ansi::GRAY, ansi::RESET),
            SlotOutcome::Lose => format!("{}lose {reels}{}", ansi::GRAY, ansi::RESET),
        };
        self.renderer.print_line(&line);
        self.cache.insert(&sent);
        self.session.record(&sent);
        Ok(())
    }

    fn show_help(&mut self) {
        let palette = self.palette();
        self.renderer.print_line("");
        self.renderer
            .print_line(&format!("{}{PRODUCT}{}", palette.primary, ansi::RESET));
        for (title, entries) in HELP_SECTIONS {
            self.renderer.print_line("");
            self.renderer
                .print_line(&format!("{}{title}{}", palette.accent, ansi::RESET));
            for entry in entries.iter() {
                let line = format!("  {:<32} {}", entry.synopsis(), entry.description);
                self.renderer.print_line(&line);
            }
        }
        self.renderer.print_line("");
    }

    fn show_about(&mut self) {
        let primary = self.palette().primary;
        let lines = [
            String::new(),
            format!("{primary}{PRODUCT}{}", ansi::RESET),
            String::new(),
            format!("version: {}", env!("CARGO_PKG_VERSION")),
            format!("theme: {}", self.theme),
            format!("language: {}", self.language.native_name()),
            String::new(),
        ];
        for line in lines {
            self.renderer.print_line(&line);
        }
    }
}
