#[cfg(test)]
mod tests {
    use crate::panels::avatar_glyph;
    use crate::state::*;
    use crate::theme::*;
    use aihub_core::catalog::RoleCard;
    use aihub_core::store::ConversationStore;
    use aihub_types::api::{PayState, Product, UserProfile};
    use aihub_types::conversation::{ChatType, Conversation};
    use aihub_types::event::{AppEvent, ConversationEvent, NoticeLevel};
    use aihub_types::message::ChatMessage;

    fn card(id: i64, name: &str, description: &str) -> RoleCard {
        RoleCard {
            id,
            prompt_id: Some(id),
            name: name.to_string(),
            avatar: "👤".to_string(),
            description: description.to_string(),
            prompt: String::new(),
            chat_type: ChatType::from_role_name(name),
            likes: 3,
            liked: false,
        }
    }

    fn conversation_event(conv: &str, event: ConversationEvent) -> AppEvent {
        AppEvent::Conversation { conversation_id: conv.to_string(), event }
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new("gpt-4");
        assert_eq!(state.tab, Tab::Chat);
        assert_eq!(state.model, "gpt-4");
        assert!(state.chat_input.is_empty());
        assert!(state.notices.is_empty());
        assert!(!state.is_busy());
        assert!(!state.session_dirty);
    }

    #[test]
    fn test_ui_state_tracks_streaming_conversations() {
        let mut state = UiState::new("m");
        let user = ChatMessage::user("hi", None);
        let placeholder = ChatMessage::bot_placeholder(None);
        let bot_id = placeholder.id.clone();

        state.process_events(
            vec![conversation_event("c1", ConversationEvent::UserMessageAppended { user, placeholder })],
            0.0,
        );
        assert!(state.is_streaming("c1"));
        assert!(state.is_busy());

        state.process_events(
            vec![conversation_event(
                "c1",
                ConversationEvent::BotChunkReceived { message_id: bot_id.clone(), text: "x".to_string() },
            )],
            0.1,
        );
        assert!(state.is_streaming("c1"));

        state.process_events(
            vec![conversation_event("c1", ConversationEvent::BotStreamFailed { message_id: bot_id, error: "e".to_string() })],
            0.2,
        );
        assert!(!state.is_streaming("c1"));
        assert!(!state.is_busy());
    }

    fn start_streaming(state: &mut UiState, conv: &str) {
        let user = ChatMessage::user("hi", None);
        let placeholder = ChatMessage::bot_placeholder(None);
        state.process_events(
            vec![conversation_event(conv, ConversationEvent::UserMessageAppended { user, placeholder })],
            0.0,
        );
    }

    #[test]
    fn test_deleted_conversation_does_not_stay_busy() {
        let mut store = ConversationStore::new();
        let kept = store.insert_front(Conversation::new("kept", ChatType::Normal));
        let deleted = store.insert_front(Conversation::new("deleted", ChatType::Normal));

        let mut state = UiState::new("m");
        start_streaming(&mut state, &kept);
        start_streaming(&mut state, &deleted);

        // The reply of a deleted conversation never completes on the bus
        store.remove(&deleted);
        state.sync_streaming(&store);
        assert!(!state.is_streaming(&deleted));
        assert!(state.is_streaming(&kept));

        store.remove(&kept);
        state.forget_conversation(&kept);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_ui_state_notices_expire() {
        let mut state = UiState::new("m");
        state.process_events(vec![AppEvent::error("boom"), AppEvent::success("saved")], 10.0);
        assert_eq!(state.notices.len(), 2);
        assert_eq!(state.notices[0].level, NoticeLevel::Error);
        assert_eq!(state.notices[0].text, "boom");

        state.prune_notices(10.0 + NOTICE_SECONDS / 2.0);
        assert_eq!(state.notices.len(), 2);
        state.prune_notices(10.0 + NOTICE_SECONDS + 0.1);
        assert!(state.notices.is_empty());
    }

    #[test]
    fn test_ui_state_session_changed_marks_dirty() {
        let mut state = UiState::new("m");
        state.process_events(vec![AppEvent::SessionChanged], 0.0);
        assert!(state.session_dirty);
    }

    #[test]
    fn test_apply_loaded_clears_loading_flags() {
        let mut state = UiState::new("m");
        state.roles_loading = true;
        state.products_loading = true;
        state.profile_loading = true;
        state.orders_loading = true;

        state.apply_loaded(Loaded::Roles(vec![card(1, "a", "")]));
        state.apply_loaded(Loaded::Products(vec![Product {
            product_id: 1,
            product_name: "p".to_string(),
            pic: None,
            product_desc: String::new(),
            quota: 10,
            price: 9.9,
        }]));
        state.apply_loaded(Loaded::Profile(UserProfile {
            user_name: "alice".to_string(),
            avatar: String::new(),
            quota: 4,
        }));
        state.apply_loaded(Loaded::Failed(Page::Orders));
        state.apply_loaded(Loaded::AvatarUploadStarted);
        assert!(state.is_busy());
        state.apply_loaded(Loaded::AvatarUploadFinished);

        assert_eq!(state.roles.len(), 1);
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.profile.as_ref().unwrap().quota, 4);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_data() {
        let mut state = UiState::new("m");
        state.apply_loaded(Loaded::Roles(vec![card(1, "a", ""), card(2, "b", "")]));
        state.roles_loading = true;
        state.apply_loaded(Loaded::Failed(Page::Roles));
        assert_eq!(state.roles.len(), 2);
        assert!(!state.roles_loading);
    }

    #[test]
    fn test_like_revert_undoes_toggle() {
        let mut state = UiState::new("m");
        state.apply_loaded(Loaded::Roles(vec![card(7, "a", "")]));
        state.role_mut(7).unwrap().toggle_like();
        assert!(state.roles[0].liked);
        assert_eq!(state.roles[0].likes, 4);

        state.apply_loaded(Loaded::LikeReverted(7));
        assert!(!state.roles[0].liked);
        assert_eq!(state.roles[0].likes, 3);
    }

    #[test]
    fn test_login_finished() {
        let mut state = UiState::new("m");
        state.tab = Tab::Profile;
        state.logging_in = true;
        state.login_code = "abc".to_string();

        state.apply_loaded(Loaded::LoginFinished { ok: false, error: Some("bad code".to_string()) });
        assert!(!state.logging_in);
        assert_eq!(state.login_error.as_deref(), Some("bad code"));
        assert_eq!(state.login_code, "abc");

        state.apply_loaded(Loaded::LoginFinished { ok: true, error: None });
        assert!(state.login_error.is_none());
        assert!(state.login_code.is_empty());
        assert_eq!(state.tab, Tab::Chat);
    }

    #[test]
    fn test_visible_roles_follow_search() {
        let mut state = UiState::new("m");
        state.apply_loaded(Loaded::Roles(vec![
            card(1, "Java面试官", "Mock interviews"),
            card(2, "Translator", "Chinese to English"),
        ]));
        assert_eq!(state.visible_roles().len(), 2);
        state.role_search = "interview".to_string();
        let visible = state.visible_roles();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn test_selected_role_lookup() {
        let mut state = UiState::new("m");
        state.apply_loaded(Loaded::Roles(vec![card(1, "a", ""), card(2, "b", "")]));
        assert!(state.selected_role().is_none());
        state.selected_role = Some(2);
        assert_eq!(state.selected_role().unwrap().name, "b");
    }

    #[test]
    fn test_reset_after_logout() {
        let mut state = UiState::new("m");
        state.apply_loaded(Loaded::Roles(vec![card(1, "a", "")]));
        state.apply_loaded(Loaded::Orders(Vec::new()));
        state.selected_role = Some(1);
        state.tab = Tab::Profile;

        state.reset_after_logout();
        assert!(state.roles.is_empty());
        assert!(state.selected_role.is_none());
        assert!(state.profile.is_none());
        assert_eq!(state.tab, Tab::Chat);
    }

    #[test]
    fn test_nickname_edit() {
        let mut state = UiState::new("m");
        assert!(state.finish_nickname_edit().is_none());

        state.begin_nickname_edit("用户");
        assert_eq!(state.nickname_edit.as_deref(), Some("用户"));
        if let Some(name) = state.nickname_edit.as_mut() {
            *name = "  alice ".to_string();
        }
        assert_eq!(state.finish_nickname_edit().as_deref(), Some("alice"));
        assert!(state.nickname_edit.is_none());

        state.begin_nickname_edit("   ");
        assert!(state.finish_nickname_edit().is_none());

        state.begin_nickname_edit("bob");
        state.reset_after_logout();
        assert!(state.nickname_edit.is_none());
    }

    // ─── Widget helper / theme Tests ─────────────────────────

    #[test]
    fn test_avatar_glyph() {
        assert_eq!(avatar_glyph(Some("🤖"), "bot"), "🤖");
        assert_eq!(avatar_glyph(Some("http://x/a.png"), "alice"), "A");
        assert_eq!(avatar_glyph(Some("/img/a.png"), "心理"), "心");
        assert_eq!(avatar_glyph(None, ""), "?");
        assert_eq!(avatar_glyph(Some(""), "bob"), "B");
    }

    #[test]
    fn test_tabs() {
        assert_eq!(Tab::all().len(), 4);
        assert_eq!(Tab::Products.label(), "Store");
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(pay_state_color(PayState::Paid), SUCCESS);
        assert_eq!(pay_state_color(PayState::Pending), WARNING);
        assert_eq!(pay_state_color(PayState::Failed), ERROR);
        assert_eq!(notice_color(NoticeLevel::Error), ERROR);
        assert_eq!(chat_type_color(ChatType::Interview), WARNING);
    }
}
