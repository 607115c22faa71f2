//! Frame assembly: pairs an `event:` line with the `data:` line after it.

use super::events::{Event, SseLine, SseParseError};

/// Classify a single stream line.
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    SseLine::Comment(line.to_string())
}

/// Assembler state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AssemblerState {
    #[default]
    AwaitingType,
    AwaitingData(String),
}

/// Two-state frame assembler.
///
/// A frame is emitted only once both its `event:` and `data:` lines have
/// been seen. A later `event:` line replaces a pending type, and a `data:`
/// line without a pending type is ignored.
#[derive(Debug, Default)]
pub struct EventAssembler {
    state: AssemblerState,
}

impl EventAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AssemblerState {
        &self.state
    }

    /// Feed one logical line.
    ///
    /// Returns:
    /// - `Ok(Some(event))` - a frame completed
    /// - `Ok(None)` - line consumed, nothing to emit
    /// - `Err(error)` - a frame completed but its data was not JSON; it is
    ///   dropped and the assembler is ready for the next frame
    pub fn feed_line(&mut self, line: &str) -> Result<Option<Event>, SseParseError> {
        match parse_sse_line(line) {
            SseLine::Event(event_type) => {
                self.state = AssemblerState::AwaitingData(event_type);
                Ok(None)
            }
            SseLine::Data(data) => match std::mem::take(&mut self.state) {
                AssemblerState::AwaitingType => Ok(None),
                AssemblerState::AwaitingData(event_type) => {
                    match serde_json::from_str(&data) {
                        Ok(payload) => Ok(Some(Event::new(event_type, payload))),
                        Err(e) => Err(SseParseError::InvalidJson {
                            event_type,
                            message: e.to_string(),
                        }),
                    }
                }
            },
            SseLine::Empty | SseLine::Comment(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
    }

    #[test]
    fn test_parse_comment_line() {
        assert_eq!(
            parse_sse_line(": keep-alive"),
            SseLine::Comment("keep-alive".to_string())
        );
    }

    #[test]
    fn test_parse_event_line() {
        assert_eq!(
            parse_sse_line("event: token"),
            SseLine::Event("token".to_string())
        );
        assert_eq!(
            parse_sse_line("event:done"),
            SseLine::Event("done".to_string())
        );
        assert_eq!(
            parse_sse_line("event:   thinking  "),
            SseLine::Event("thinking".to_string())
        );
    }

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_sse_line("data: {\"text\": \"hello\"}"),
            SseLine::Data("{\"text\": \"hello\"}".to_string())
        );
        assert_eq!(
            parse_sse_line("data:{\"x\":1}"),
            SseLine::Data("{\"x\":1}".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_line() {
        assert_eq!(
            parse_sse_line("id: 7"),
            SseLine::Comment("id: 7".to_string())
        );
    }

    #[test]
    fn test_simple_frame() {
        let mut assembler = EventAssembler::new();

        assert!(assembler.feed_line("event: token").unwrap().is_none());
        assert_eq!(
            assembler.state(),
            &AssemblerState::AwaitingData("token".to_string())
        );

        let event = assembler.feed_line(r#"data: {"text": "Hi"}"#).unwrap();
        assert_eq!(event, Some(Event::new("token", json!({"text": "Hi"}))));
        assert_eq!(assembler.state(), &AssemblerState::AwaitingType);
    }

    #[test]
    fn test_data_without_type_ignored() {
        let mut assembler = EventAssembler::new();
        assert!(assembler.feed_line(r#"data: {"text": "x"}"#).unwrap().is_none());
        assert_eq!(assembler.state(), &AssemblerState::AwaitingType);
    }

    #[test]
    fn test_consecutive_event_lines_keep_second() {
        let mut assembler = EventAssembler::new();
        assembler.feed_line("event: thinking").unwrap();
        assembler.feed_line("event: token").unwrap();

        let event = assembler.feed_line(r#"data: {"text":"a"}"#).unwrap().unwrap();
        assert_eq!(event.event_type, "token");
    }

    #[test]
    fn test_blank_and_comment_lines_keep_pending_type() {
        let mut assembler = EventAssembler::new();
        assembler.feed_line("event: done").unwrap();
        assembler.feed_line("").unwrap();
        assembler.feed_line(": ping").unwrap();

        let event = assembler.feed_line("data: {}").unwrap().unwrap();
        assert!(event.is_terminal());
    }

    #[test]
    fn test_invalid_json_dropped_then_next_frame_parsed() {
        let mut assembler = EventAssembler::new();
        assembler.feed_line("event: token").unwrap();

        let result = assembler.feed_line(r#"data: {"text": "unterminated"#);
        assert!(matches!(result, Err(SseParseError::InvalidJson { .. })));
        assert_eq!(assembler.state(), &AssemblerState::AwaitingType);

        assembler.feed_line("event: token").unwrap();
        let event = assembler.feed_line(r#"data: {"text": "ok"}"#).unwrap();
        assert_eq!(event, Some(Event::new("token", json!({"text": "ok"}))));
    }
}
