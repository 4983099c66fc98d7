//! End-to-end tests of the ntc front-end against the in-memory messenger.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use tempfile::TempDir;
    use time::OffsetDateTime;

    use ntc::render::BufferRenderer;
    use ntc::session::poll_receipts;
    use ntc::store::{CACHED_PER_CHAT, DraftStore, MessageCache};
    use ntc::theme::Theme;
    use ntc::{
        Chat, ChatId, ChatKind, Flow, Media, MemoryMessenger, Message, MessageId, Messenger, Ntc,
        NtcConfig, Profile,
    };

    const BOB: ChatId = ChatId(7);
    const CLUB: ChatId = ChatId(8);

    struct Harness {
        app: Ntc<MemoryMessenger>,
        client: Arc<MemoryMessenger>,
        out: BufferRenderer,
        dir: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("failed to create temp dir");
            let client = Arc::new(world());
            let (app, out) = open(&client, &dir);
            Self {
                app,
                client,
                out,
                dir,
            }
        }

        fn config(&self) -> NtcConfig {
            config(&self.dir)
        }

        /// Runs `line` and returns what it printed.
        async fn run(&mut self, line: &str) -> String {
            self.out.clear();
            self.app.handle_line(line).await;
            self.out.contents()
        }

        async fn select_bob(&mut self) -> String {
            self.run("ntc -l").await;
            self.run("ntc -s 2").await
        }
    }

    fn config(dir: &TempDir) -> NtcConfig {
        NtcConfig::new()
            .with_data_dir(dir.path())
            .without_animation()
    }

    fn open(client: &Arc<MemoryMessenger>, dir: &TempDir) -> (Ntc<MemoryMessenger>, BufferRenderer) {
        let out = BufferRenderer::new();
        let app = Ntc::new(client.clone(), config(dir), Box::new(out.clone()));
        (app, out)
    }

    fn world() -> MemoryMessenger {
        let messenger = MemoryMessenger::new(Profile::new(ChatId(1), "Me"));
        messenger.add_chat(Chat::new(BOB, "Bob", ChatKind::Private), 1);
        messenger.add_chat(Chat::new(CLUB, "Club", ChatKind::Group), 0);
        let now = OffsetDateTime::now_utc();
        messenger.insert_history(Message::incoming(MessageId(0), BOB, "Bob", "hi", now));
        messenger.insert_history(Message::outgoing(MessageId(0), BOB, "hello", now));
        messenger.insert_history(Message::incoming(MessageId(0), CLUB, "Ann", "welcome", now));
        messenger
    }

    fn has_line(output: &str, expected: &str) -> bool {
        output.lines().any(|line| line.trim_end() == expected)
    }

    #[tokio::test]
    async fn test_list_shows_badges_and_unread() {
        let mut h = Harness::new();
        let out = h.run("ntc --list").await;
        let bob = out
            .lines()
            .find(|line| line.contains("Bob"))
            .expect("Bob should be listed");
        assert!(bob.contains("  2  "));
        assert!(bob.contains("+1"));
        assert!(out.lines().any(|line| line.contains("Club") && line.contains('#')));
    }

    #[tokio::test]
    async fn test_aliases_match_long_names() {
        let mut h = Harness::new();
        let short = h.run("ntc -l").await;
        let long = h.run("ntc --list").await;
        assert_eq!(short, long);

        h.run("ntc -s 2").await;
        let short = h.run("ntc -m 5").await;
        let long = h.run("ntc --msg 5").await;
        assert_eq!(short, long);
    }

    #[tokio::test]
    async fn test_select_shows_numbered_history() {
        let mut h = Harness::new();
        let out = h.select_bob().await;
        assert!(has_line(&out, "→ Bob"));
        assert!(has_line(&out, "history — Bob"));
        let lines: Vec<&str> = out.lines().filter(|line| line.contains(" | ")).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1 "));
        assert!(lines[0].ends_with("• ← Bob | hi"));
        assert!(lines[1].starts_with(" 2 "));
        assert!(lines[1].ends_with("✓ → You | hello"));
    }

    #[tokio::test]
    async fn test_invalid_dialog_number() {
        let mut h = Harness::new();
        h.run("ntc -l").await;
        let out = h.run("ntc -s 42").await;
        assert!(has_line(&out, "not found"));
        assert!(h.app.session().current().is_none());
    }

    #[tokio::test]
    async fn test_live_message_continues_numbering() {
        let mut h = Harness::new();
        h.select_bob().await;
        let live = h.client.push_incoming(BOB, "Bob", "you there?");
        h.out.clear();
        assert!(h.app.on_new_message(&live));
        assert!(h.out.contents().contains(" 3 "));
        assert_eq!(h.app.session().message_id(3), Some(live.id));

        let out = h.run("ntc -r 3 yes").await;
        assert!(out.contains("→ You | yes"));
        let sent = h.client.messages(BOB).pop().expect("reply should be stored");
        assert_eq!(sent.reply_to, Some(live.id));
    }

    #[tokio::test]
    async fn test_live_messages_of_other_chats_are_ignored() {
        let mut h = Harness::new();
        h.select_bob().await;
        let other = h.client.push_incoming(CLUB, "Ann", "psst");
        h.out.clear();
        assert!(!h.app.on_new_message(&other));
        assert!(h.out.contents().is_empty());
    }

    #[tokio::test]
    async fn test_direct_text_is_drafted_until_sent() {
        let mut h = Harness::new();
        h.select_bob().await;
        h.client.set_writable(BOB, false);

        let out = h.run("see you at six").await;
        assert!(has_line(&out, "✗ cannot write"));
        assert_eq!(h.app.drafts().get(BOB), Some("see you at six"));
        let on_disk = DraftStore::load(h.config().drafts_path());
        assert_eq!(on_disk.get(BOB), Some("see you at six"));

        let listing = h.run("ntc -l").await;
        assert!(listing.lines().any(|line| line.contains("Bob") && line.contains("📝")));
        let selected = h.run("ntc -s 2").await;
        assert!(has_line(&selected, "📝 Draft: see you at six"));

        h.client.set_writable(BOB, true);
        h.run("ntc -sd see you at six").await;
        assert!(!h.app.drafts().contains(BOB));
        let on_disk = DraftStore::load(h.config().drafts_path());
        assert!(!on_disk.contains(BOB));
    }

    #[tokio::test]
    async fn test_slash_text_is_not_drafted() {
        let mut h = Harness::new();
        h.select_bob().await;
        h.client.set_writable(BOB, false);
        h.run("/start").await;
        assert!(!h.app.drafts().contains(BOB));
    }

    #[tokio::test]
    async fn test_identical_edit_is_not_modified() {
        let mut h = Harness::new();
        h.select_bob().await;
        let out = h.run("ntc --edit 2 hello").await;
        assert!(has_line(&out, "message not modified"));

        let out = h.run("ntc --edit 2 hello!").await;
        assert!(has_line(&out, "✓ message edited"));
        let out = h.run("ntc -m").await;
        assert!(out.contains("[edited] hello!"));
    }

    #[tokio::test]
    async fn test_cannot_edit_incoming() {
        let mut h = Harness::new();
        h.select_bob().await;
        let out = h.run("ntc --edit 1 rewritten").await;
        assert!(has_line(&out, "can only edit your own messages"));
    }

    #[tokio::test]
    async fn test_deleted_numbers_stay_deleted() {
        let mut h = Harness::new();
        h.select_bob().await;
        let out = h.run("ntc -d 2").await;
        assert!(has_line(&out, "✓ message deleted"));
        assert_eq!(h.client.messages(BOB).len(), 1);

        let out = h.run("ntc -r 2 hm").await;
        assert!(has_line(&out, "message not found"));
        let out = h.run("ntc -r 9 hm").await;
        assert!(has_line(&out, "invalid message number"));
    }

    #[tokio::test]
    async fn test_group_delete_needs_permission() {
        let mut h = Harness::new();
        h.run("ntc -l").await;
        h.run("ntc -s 3").await;
        let out = h.run("ntc -d 1").await;
        assert!(has_line(&out, "no permission to delete"));
        assert_eq!(h.client.messages(CLUB).len(), 1);
    }

    #[tokio::test]
    async fn test_history_falls_back_to_cache() {
        let mut h = Harness::new();
        h.select_bob().await;
        tokio_test::assert_ok!(h.client.log_out().await);

        let out = h.run("ntc -m").await;
        assert!(has_line(&out, "(cached)"));
        assert!(out.contains("← Bob | hi"));
    }

    #[tokio::test]
    async fn test_corrupt_stores_start_empty() {
        let h = Harness::new();
        let config = h.config();
        std::fs::write(config.message_cache_path(), "{not json").expect("write cache");
        std::fs::write(config.drafts_path(), "[1, 2").expect("write drafts");
        std::fs::write(config.settings_path(), "").expect("write settings");

        let (mut app, out) = open(&h.client, &h.dir);
        assert_eq!(app.theme(), Theme::Dark);
        assert!(app.cache().chat(BOB).is_empty());
        assert_eq!(app.handle_line("ntc -l").await, Flow::Continue);
        assert!(out.contents().contains("Bob"));
    }

    #[tokio::test]
    async fn test_theme_persists() {
        let mut h = Harness::new();
        let out = h.run("ntc -th matrix").await;
        assert!(has_line(&out, "✓ theme changed to matrix"));
        let out = h.run("ntc -th neon").await;
        assert!(has_line(&out, "available themes: dark, light, purple, matrix"));

        let (app, _) = open(&h.client, &h.dir);
        assert_eq!(app.theme(), Theme::Matrix);
    }

    #[tokio::test]
    async fn test_download_uses_category_folder() {
        let mut h = Harness::new();
        h.client.push_incoming_media(
            BOB,
            "Bob",
            Media::document("application/pdf", Some("notes.pdf".to_string())),
            Bytes::from_static(b"%PDF"),
        );
        h.select_bob().await;
        assert!(h.out.contents().contains("[DOC.pdf]"));

        let out = h.run("ntc -i 1").await;
        let expected = h.dir.path().join("downloads").join("document").join("notes.pdf");
        assert_eq!(std::fs::read(&expected).expect("downloaded file"), b"%PDF");
        assert!(out.contains("notes.pdf"));

        let out = h.run("ntc -i 2").await;
        assert!(has_line(&out, "not found"));
    }

    #[tokio::test]
    async fn test_profile_commands() {
        let mut h = Harness::new();
        let out = h.run("ntc -cu ferris_fan").await;
        assert!(has_line(&out, "✓ username @ferris_fan"));
        h.run("ntc -n Ferris Crab").await;
        h.run("ntc -b likes rust").await;

        let out = h.run("ntc -mp").await;
        assert!(has_line(&out, "  name: Ferris Crab"));
        assert!(has_line(&out, "  user: @ferris_fan"));
        assert!(has_line(&out, "  bio: likes rust"));

        let out = h.run("ntc -cu 1abc").await;
        assert!(out.contains("✗ error: Validation error"));
    }

    #[tokio::test]
    async fn test_saved_and_forward() {
        let mut h = Harness::new();
        h.select_bob().await;
        let out = h.run("ntc -f 1").await;
        assert!(has_line(&out, "✓ forwarded"));

        let out = h.run("ntc -sa").await;
        assert!(has_line(&out, "→ Saved Messages"));
        assert!(out.contains("→ You | hi"));
    }

    #[tokio::test]
    async fn test_text_to_username() {
        let mut h = Harness::new();
        h.client.register_username("bob", BOB);
        let out = h.run("ntc -t @bob ping").await;
        assert!(has_line(&out, "✓ sent to @bob"));
        assert_eq!(h.client.messages(BOB).last().map(|m| m.text.as_str()), Some("ping"));

        let out = h.run("ntc -t @nobody ping").await;
        assert!(out.contains("✗ error: Not found"));
    }

    #[tokio::test]
    async fn test_logout_exits() {
        let mut h = Harness::new();
        assert_eq!(h.app.handle_line("ntc -lo").await, Flow::Exit);
        assert!(h.client.is_logged_out());
    }

    #[tokio::test]
    async fn test_receipts_follow_the_selected_chat() {
        let mut h = Harness::new();
        h.select_bob().await;
        let hello = h.app.session().message_id(2).expect("message 2");
        h.client.mark_read(BOB, hello, Some(vec!["Bob".to_string()]));

        let receipts = h.app.session().receipts().clone();
        let current = h.app.session().subscribe();
        let written = tokio_test::assert_ok!(poll_receipts(&*h.client, &receipts, &current).await);
        assert_eq!(written, 1);
        let out = h.run("ntc -m").await;
        assert!(out.contains("✓✓[1] → You | hello"));

        h.run("ntc -s 3").await;
        assert!(receipts.get(BOB, hello).is_none());
        poll_receipts(&*h.client, &receipts, &current)
            .await
            .expect("poll should succeed");
        assert!(receipts.get(BOB, hello).is_none());
    }

    #[tokio::test]
    async fn test_commands_without_a_chat() {
        let mut h = Harness::new();
        for line in ["ntc -m", "ntc -sd hi", "ntc -sr hi", "ntc -sl"] {
            let out = h.run(line).await;
            assert!(has_line(&out, "no chat"), "{line}: {out}");
        }
    }

    #[tokio::test]
    async fn test_search_lists_matches() {
        let mut h = Harness::new();
        h.select_bob().await;
        let out = h.run("ntc -sr hel").await;
        assert!(has_line(&out, "search: hel"));
        assert!(out.contains("1. "));
        assert!(out.contains("You | hello"));
        let out = h.run("ntc -sr zzz").await;
        assert!(has_line(&out, "no results"));
    }

    fn fill_bob(h: &Harness, count: usize) {
        let now = OffsetDateTime::now_utc();
        for n in 0..count {
            h.client
                .insert_history(Message::incoming(MessageId(0), BOB, "Bob", format!("m{n}"), now));
        }
    }

    fn displayed_numbers(output: &str) -> Vec<usize> {
        output
            .lines()
            .filter(|line| line.contains(" | "))
            .filter_map(|line| line.split_whitespace().next()?.parse().ok())
            .collect()
    }

    #[tokio::test]
    async fn test_wider_history_renumbers_top_down() {
        let mut h = Harness::new();
        fill_bob(&h, 18);
        let selected = h.select_bob().await;
        assert_eq!(displayed_numbers(&selected), (1..=15).collect::<Vec<_>>());

        let out = h.run("ntc -m 20").await;
        assert_eq!(displayed_numbers(&out), (1..=20).collect::<Vec<_>>());
        let oldest = h.client.messages(BOB)[0].id;
        assert_eq!(h.app.session().message_id(1), Some(oldest));
        let first = out.lines().find(|line| line.contains(" | ")).expect("a history line");
        assert!(first.ends_with("← Bob | hi"));

        let live = h.client.push_incoming(BOB, "Bob", "late");
        assert!(h.app.on_new_message(&live));
        assert_eq!(h.app.session().message_id(21), Some(live.id));
    }

    #[tokio::test]
    async fn test_message_cache_is_capped_per_chat() {
        let mut h = Harness::new();
        fill_bob(&h, CACHED_PER_CHAT + 20);
        h.select_bob().await;
        h.run(&format!("ntc -m {}", CACHED_PER_CHAT + 22)).await;
        assert_eq!(h.app.cache().chat(BOB).len(), CACHED_PER_CHAT);

        let on_disk = MessageCache::load(h.config().message_cache_path());
        let cached = on_disk.chat(BOB);
        assert_eq!(cached.len(), CACHED_PER_CHAT);
        let newest = h.client.messages(BOB).pop().expect("bob has history");
        assert_eq!(cached.last().map(|m| m.id), Some(newest.id));
    }

    #[tokio::test]
    async fn test_zero_list_limit_shows_everything() {
        let mut h = Harness::new();
        let out = h.run("ntc -l 0").await;
        assert!(out.contains("Saved Messages"));
        assert!(out.contains("Bob"));
        assert!(out.contains("Club"));
    }
}
