#[cfg(test)]
mod tests {
    use crate::api::*;
    use crate::config::*;
    use crate::conversation::*;
    use crate::error::*;
    use crate::event::*;
    use crate::message::*;
    use crate::session::*;

    fn bot(id: &str, content: &str, status: MessageStatus) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            content: content.to_string(),
            sender: Sender::Bot,
            timestamp: "12:00".to_string(),
            avatar: None,
            status: Some(status),
        }
    }

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_user_message_has_no_status() {
        let msg = ChatMessage::user("Hello", None);
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.status.is_none());
        assert_eq!(msg.timestamp.len(), 5);
        assert_eq!(msg.wire_role(), WireRole::User);
    }

    #[test]
    fn test_bot_placeholder_is_loading_and_empty() {
        let msg = ChatMessage::bot_placeholder(Some("🤖".to_string()));
        assert_eq!(msg.sender, Sender::Bot);
        assert!(msg.content.is_empty());
        assert!(msg.is_loading());
        assert_eq!(msg.wire_role(), WireRole::Assistant);
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("a", None);
        let b = ChatMessage::user("a", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_user_message_serialization_skips_status() {
        let msg = ChatMessage::user("hi", None);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("status"));
        assert!(!json.contains("avatar"));
        assert!(json.contains(r#""sender":"user""#));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&MessageStatus::Loading).unwrap(), r#""loading""#);
        assert_eq!(serde_json::to_string(&MessageStatus::Success).unwrap(), r#""success""#);
        assert_eq!(serde_json::to_string(&MessageStatus::Error).unwrap(), r#""error""#);
    }

    // ─── MessageLog Tests ────────────────────────────────────

    #[test]
    fn test_message_log_keeps_append_order() {
        let mut log = MessageLog::new();
        log.push(bot("c", "3", MessageStatus::Success));
        log.push(bot("a", "1", MessageStatus::Success));
        log.push(bot("b", "2", MessageStatus::Success));

        let ids: Vec<&str> = log.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(log.last().unwrap().id, "b");
    }

    #[test]
    fn test_message_log_replace_by_id() {
        let mut log = MessageLog::new();
        log.push(bot("a", "", MessageStatus::Loading));
        log.push(bot("b", "", MessageStatus::Loading));

        assert!(log.replace(bot("a", "done", MessageStatus::Success)));
        assert!(!log.replace(bot("zzz", "x", MessageStatus::Success)));

        assert_eq!(log.len(), 2);
        assert_eq!(log.get("a").unwrap().content, "done");
        assert_eq!(log.iter().next().unwrap().id, "a");
    }

    #[test]
    fn test_message_log_push_duplicate_id_keeps_position() {
        let mut log = MessageLog::new();
        log.push(bot("a", "1", MessageStatus::Success));
        log.push(bot("b", "2", MessageStatus::Success));
        log.push(bot("a", "1b", MessageStatus::Success));

        assert_eq!(log.len(), 2);
        assert_eq!(log.to_vec()[0].content, "1b");
    }

    #[test]
    fn test_message_log_serializes_as_array() {
        let log: MessageLog = vec![
            bot("x", "first", MessageStatus::Success),
            bot("y", "second", MessageStatus::Error),
        ]
        .into();
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.starts_with('['));
        assert!(json.find("first").unwrap() < json.find("second").unwrap());

        let back: MessageLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_message_log_clear() {
        let mut log: MessageLog = vec![bot("x", "1", MessageStatus::Success)].into();
        log.clear();
        assert!(log.is_empty());
        assert!(!log.contains("x"));
    }

    // ─── Conversation Tests ──────────────────────────────────

    #[test]
    fn test_conversation_id_format() {
        let conv = Conversation::new("New chat", ChatType::Normal);
        let parts: Vec<&str> = conv.id.splitn(3, '_').collect();
        assert_eq!(parts[0], "chat");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[test]
    fn test_conversation_type_serialized_as_type() {
        let conv = Conversation::new("Counsellor", ChatType::Psychological);
        let json = serde_json::to_string(&conv).unwrap();
        assert!(json.contains(r#""type":"psychological""#));
        assert!(!json.contains("system_prompt"));
    }

    #[test]
    fn test_blank_system_prompt_is_dropped() {
        let conv = Conversation::new("t", ChatType::Normal).with_system_prompt("   ");
        assert!(conv.system_prompt.is_none());
        let conv = conv.with_system_prompt("Be brief");
        assert_eq!(conv.system_prompt.as_deref(), Some("Be brief"));
    }

    #[test]
    fn test_chat_type_from_role_name() {
        assert_eq!(ChatType::from_role_name("Java面试官"), ChatType::Interview);
        assert_eq!(ChatType::from_role_name("资深Java"), ChatType::Interview);
        assert_eq!(ChatType::from_role_name("心理咨询师"), ChatType::Psychological);
        assert_eq!(ChatType::from_role_name("翻译"), ChatType::Normal);
    }

    #[test]
    fn test_preview_truncation() {
        assert_eq!(preview_of("short"), "short");
        let long = "字".repeat(60);
        let preview = preview_of(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
        assert_eq!(preview_of(&"a".repeat(PREVIEW_CHARS)), "a".repeat(PREVIEW_CHARS));
    }

    #[test]
    fn test_conversation_deserializes_without_messages() {
        let json = r#"{"id":"chat_1_abc","title":"t","type":"interview","preview":"","time":"01:51"}"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.chat_type, ChatType::Interview);
        assert!(conv.messages.is_empty());
        assert!(conv.icon.is_none());
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_event_bot_message_id() {
        let user = ChatMessage::user("hi", None);
        let placeholder = ChatMessage::bot_placeholder(None);
        let pid = placeholder.id.clone();
        let appended = ConversationEvent::UserMessageAppended { user, placeholder };
        assert_eq!(appended.bot_message_id(), pid);

        let chunk = ConversationEvent::BotChunkReceived {
            message_id: "m1".to_string(),
            text: "x".to_string(),
        };
        assert_eq!(chunk.bot_message_id(), "m1");
    }

    #[test]
    fn test_notice_constructors() {
        match AppEvent::error("boom") {
            AppEvent::Notice { level, text } => {
                assert_eq!(level, NoticeLevel::Error);
                assert_eq!(text, "boom");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "http://124.221.174.50:80");
        assert_eq!(config.default_model, "gpt-3.5-turbo");
        assert!(config.models.contains(&"gpt-4".to_string()));
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_config_endpoint_and_assets() {
        let config = ClientConfig {
            api_base: "http://localhost:8080/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.endpoint("/api/v1/chat/completions"),
            "http://localhost:8080/api/v1/chat/completions"
        );
        assert_eq!(config.resolve_asset_url("/img/a.png"), "http://localhost:8080/img/a.png");
        assert_eq!(config.resolve_asset_url("https://cdn/x.png"), "https://cdn/x.png");
        assert_eq!(config.resolve_asset_url("🤖"), "🤖");
        assert!(is_image_reference("/img/a.png"));
        assert!(!is_image_reference("🤖"));
    }

    // ─── Envelope Tests ──────────────────────────────────────

    #[test]
    fn test_envelope_success() {
        let env: Envelope<String> =
            serde_json::from_str(r#"{"code":"0000","info":"ok","data":"tok-1"}"#).unwrap();
        assert_eq!(env.into_data().unwrap(), "tok-1");
    }

    #[test]
    fn test_envelope_failure_code() {
        let env: Envelope<String> =
            serde_json::from_str(r#"{"code":"0003","info":"bad code","data":null}"#).unwrap();
        assert_eq!(
            env.into_data().unwrap_err(),
            ChatError::Envelope { code: "0003".to_string(), info: "bad code".to_string() }
        );
    }

    #[test]
    fn test_envelope_check_ignores_null_data() {
        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code":"0000","info":"","data":null}"#).unwrap();
        assert!(env.check().is_ok());
    }

    #[test]
    fn test_role_item_deserialization() {
        let json = r#"{
            "mmu": {"id": 3, "role_name": "心理咨询师", "description": "listens", "avatar": "/a.png"},
            "prompt": {"name": "p", "content": "You are kind", "like": 4, "isLike": true, "prompt_id": 9}
        }"#;
        let item: RoleItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.mmu.id, 3);
        assert!(item.prompt.is_like);
        assert_eq!(item.prompt.prompt_id, Some(9));
    }

    #[test]
    fn test_product_camel_case() {
        let json = r#"{"productId":1,"productName":"100 quota","pic":null,"productDesc":"d","quota":100,"price":9.9}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_id, 1);
        assert_eq!(product.product_name, "100 quota");
        assert!(product.pic.is_none());
    }

    #[test]
    fn test_order_pay_state() {
        let mut order = Order {
            product_name: "p".to_string(),
            product_quota: 10,
            order_id: "o1".to_string(),
            order_time: None,
            pay_status: "等待支付".to_string(),
            total_amount: 1.0,
            pay_type: None,
            pay_time: None,
            pay_url: Some("<form></form>".to_string()),
        };
        assert_eq!(order.pay_state(), PayState::Pending);
        assert!(order.can_pay());

        order.pay_status = "支付成功".to_string();
        assert_eq!(order.pay_state(), PayState::Paid);
        assert!(!order.can_pay());

        order.pay_status = "已关闭".to_string();
        assert_eq!(order.pay_state(), PayState::Failed);

        order.pay_status = "放弃支付".to_string();
        assert_eq!(order.pay_state(), PayState::Other);
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_auth_token_requires_flag() {
        let mut auth = AuthState::signed_in("abc");
        assert_eq!(auth.token(), Some("abc"));
        auth.is_authenticated = false;
        assert_eq!(auth.token(), None);
        assert_eq!(AuthState::default().token(), None);
        assert_eq!(AuthState::signed_in("").token(), None);
    }

    #[test]
    fn test_user_cache_default_nickname() {
        let cache = UserCache::default();
        assert_eq!(cache.nickname, DEFAULT_NICKNAME);
        assert!(cache.avatar_url.is_none());
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_request_failed_display_contains_status() {
        let err = ChatError::RequestFailed { status: 500, body: "oops".to_string() };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("oops"));
    }

    #[test]
    fn test_error_from_serde() {
        let err: ChatError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ChatError::Serialization(_)));
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(ChatError::Unauthorized.is_auth_failure());
        assert!(ChatError::Unauthenticated.is_auth_failure());
        assert!(!ChatError::Timeout(10).is_auth_failure());
    }
}
