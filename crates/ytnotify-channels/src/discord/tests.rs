use super::handler::is_command;
use super::send::{build_messages, parse_channel_id, split_message, MAX_CONTENT_LEN};
use ytnotify_core::message::{Embed, OutgoingMessage};

#[test]
fn test_parse_raw_channel_id() {
    assert_eq!(parse_channel_id("123456789012345678"), Some(123456789012345678));
    assert_eq!(parse_channel_id(" 42 "), Some(42));
}

#[test]
fn test_parse_channel_mention() {
    assert_eq!(parse_channel_id("<#987654321>"), Some(987654321));
}

#[test]
fn test_parse_rejects_garbage() {
    assert_eq!(parse_channel_id(""), None);
    assert_eq!(parse_channel_id("0"), None);
    assert_eq!(parse_channel_id("general"), None);
    assert_eq!(parse_channel_id("<#>"), None);
    assert_eq!(parse_channel_id("<@123>"), None);
    assert_eq!(parse_channel_id("-5"), None);
}

#[test]
fn test_split_short_message() {
    assert_eq!(split_message("hello", MAX_CONTENT_LEN), vec!["hello"]);
    assert!(split_message("", MAX_CONTENT_LEN).is_empty());
}

#[test]
fn test_split_long_message_on_newlines() {
    let text = "line\n".repeat(1000);
    let chunks = split_message(&text, MAX_CONTENT_LEN);
    assert!(chunks.len() >= 3);
    for chunk in &chunks {
        assert!(chunk.len() <= MAX_CONTENT_LEN);
        assert!(chunk.ends_with('\n'));
    }
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_split_respects_char_boundaries() {
    let text = "é".repeat(1500);
    let chunks = split_message(&text, MAX_CONTENT_LEN);
    assert_eq!(chunks.concat(), text);
    for chunk in &chunks {
        assert!(chunk.len() <= MAX_CONTENT_LEN);
    }
}

#[test]
fn test_build_messages_counts() {
    let plain = OutgoingMessage::text("Done", Some("1".into()));
    assert_eq!(build_messages(&plain).len(), 1);

    let embed_only = OutgoingMessage {
        text: String::new(),
        embed: Some(Embed::default()),
        reply_target: Some("1".into()),
    };
    assert_eq!(build_messages(&embed_only).len(), 1);

    let long = OutgoingMessage {
        text: "x\n".repeat(1500),
        embed: Some(Embed::default()),
        reply_target: Some("1".into()),
    };
    assert_eq!(build_messages(&long).len(), 2);
}

#[test]
fn test_is_command_requires_group_word() {
    assert!(is_command("?ytnotifier toggle", "?"));
    assert!(is_command("  ?ytnotifier", "?"));
    assert!(is_command("!ytnotifier status", "!"));

    assert!(!is_command("?help", "?"));
    assert!(!is_command("???", "?"));
    assert!(!is_command("?", "?"));
    assert!(!is_command("?ytnotifiers toggle", "?"));
    assert!(!is_command("ytnotifier toggle", "?"));
    assert!(!is_command("!ytnotifier toggle", "?"));
}
