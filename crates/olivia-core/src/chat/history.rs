//! History window and turn ordering helpers.

use chrono::{DateTime, Utc};

use olivia_types::chat::ChatTurn;
use olivia_types::llm::{MessageRole, RoleText};

/// Build the role-tagged history sent with a completion request.
///
/// Takes the most recent `window - 1` turns of `prior` in chronological
/// order and appends `submitted` as the final user entry, so the result
/// never holds more than `window` entries. A window of zero is treated as
/// one (the submitted text alone).
pub fn build_history(prior: &[ChatTurn], submitted: &str, window: usize) -> Vec<RoleText> {
    let keep = window.max(1) - 1;
    let start = prior.len().saturating_sub(keep);

    let mut history: Vec<RoleText> = prior[start..]
        .iter()
        .map(|turn| RoleText::new(turn.sender.role(), turn.text.clone()))
        .collect();
    history.push(RoleText::new(MessageRole::User, submitted));
    history
}

/// Timestamp for a new turn: never earlier than the last one in the log.
pub fn next_timestamp(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match last {
        Some(last) if last > now => last,
        _ => now,
    }
}

/// Stable sort by timestamp ascending. Equal timestamps keep arrival order.
pub fn sort_by_timestamp(turns: &mut [ChatTurn]) {
    turns.sort_by_key(|turn| turn.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use olivia_types::chat::Sender;

    fn log(len: usize) -> Vec<ChatTurn> {
        let base = Utc::now();
        (0..len)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::User } else { Sender::Assistant };
                ChatTurn::new(format!("turn {i}"), sender, base + Duration::seconds(i as i64))
            })
            .collect()
    }

    #[test]
    fn short_log_is_sent_whole() {
        let history = build_history(&log(3), "next", 10);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "turn 0");
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert_eq!(history[3], RoleText::new(MessageRole::User, "next"));
    }

    #[test]
    fn long_log_is_capped_at_window() {
        let history = build_history(&log(40), "latest", 10);
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].content, "turn 31");
        assert_eq!(history[8].content, "turn 39");
        assert_eq!(history[9].content, "latest");
    }

    #[test]
    fn zero_window_sends_only_submitted_text() {
        let history = build_history(&log(5), "only", 0);
        assert_eq!(history, vec![RoleText::new(MessageRole::User, "only")]);
    }

    #[test]
    fn next_timestamp_never_goes_backwards() {
        let now = Utc::now();
        let future = now + Duration::seconds(30);
        assert_eq!(next_timestamp(None, now), now);
        assert_eq!(next_timestamp(Some(now - Duration::seconds(1)), now), now);
        assert_eq!(next_timestamp(Some(future), now), future);
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let ts = Utc::now();
        let mut turns = vec![
            ChatTurn::new("b", Sender::User, ts + Duration::seconds(1)),
            ChatTurn::new("first", Sender::User, ts),
            ChatTurn::new("second", Sender::Assistant, ts),
        ];
        sort_by_timestamp(&mut turns);
        let texts: Vec<&str> = turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "b"]);
    }
}
