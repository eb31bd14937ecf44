//! Property-based tests for sinklog using proptest

use parking_lot::Mutex;
use proptest::prelude::*;
use sinklog::core::{Tag, EMPTY_FIELD};
use sinklog::prelude::*;
use std::sync::Arc;

const KNOWN_PLACEHOLDERS: [&str; 11] = [
    "level",
    "l",
    "date",
    "time",
    "datetime",
    "name",
    "pid",
    "file_line",
    "rpc_id",
    "request_id",
    "app_id",
];

static GLOBALS: Mutex<()> = Mutex::new(());

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Debug),
        Just(Level::Info),
        Just(Level::Warn),
        Just(Level::Error),
        Just(Level::Fatal),
    ]
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Display names parse back to the same level
    #[test]
    fn test_level_str_roundtrip(level in any_level()) {
        let parsed: Level = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Level ordering matches the numeric discriminants
    #[test]
    fn test_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
        prop_assert!(Level::Unset < level1);
    }

    /// The letter form is the first character of the name
    #[test]
    fn test_level_letter(level in any_level()) {
        prop_assert_eq!(level.letter(), &level.to_str()[..1]);
    }

    /// Parsing ignores case
    #[test]
    fn test_level_parse_case_insensitive(level in any_level(), upper in any::<bool>()) {
        let input = if upper {
            level.to_str().to_uppercase()
        } else {
            level.to_str().to_lowercase()
        };
        prop_assert_eq!(input.parse::<Level>(), Ok(level));
    }
}

// ============================================================================
// Filtering Tests
// ============================================================================

proptest! {
    /// A logger emits a record exactly when its level is at or above the
    /// effective level
    #[test]
    fn test_level_filtering(threshold in any_level(), level in any_level(), message in "[a-zA-Z0-9 ]{1,32}") {
        let _guard = GLOBALS.lock();
        let sink = Arc::new(WriterSink::new(Vec::new()));
        let logger = Logger::builder()
            .level(threshold)
            .handler(StreamHandler::new(sink.clone(), "{{}}").unwrap())
            .build();

        logger.log(level, message.clone());

        let written = sink.with_writer(|buf| buf.clone());
        if level >= threshold {
            prop_assert_eq!(written, format!("{}\n", message).into_bytes());
        } else {
            prop_assert!(written.is_empty());
        }
    }
}

// ============================================================================
// Template Tests
// ============================================================================

proptest! {
    /// Literal text around the message placeholder is copied through
    #[test]
    fn test_literal_prefix_and_message(
        prefix in "[a-zA-Z0-9 :|\\[\\]#-]{0,20}",
        message in "[ -~]{0,40}",
    ) {
        let formatter = Formatter::new(&format!("{}{{{{}}}}", prefix), false).unwrap();
        let record = Record::new("p", Level::Info, message.clone());
        prop_assert_eq!(formatter.format(&record), format!("{}{}\n", prefix, message));
    }

    /// Whitespace inside the braces does not change the output
    #[test]
    fn test_placeholder_whitespace_is_ignored(
        index in 0..KNOWN_PLACEHOLDERS.len(),
        left in " {0,3}",
        right in " {0,3}",
    ) {
        let name = KNOWN_PLACEHOLDERS[index];
        let tight = Formatter::new(&format!("{{{{{}}}}} {{{{}}}}", name), false).unwrap();
        let loose = Formatter::new(&format!("{{{{{}{}{}}}}} {{{{}}}}", left, name, right), false).unwrap();

        let record = Record::new("ws", Level::Warn, "body")
            .with_rpc_id("r")
            .with_file_line("src/lib.rs", 7);
        prop_assert_eq!(tight.format(&record), loose.format(&record));
        prop_assert_eq!(tight.tags().collect::<Vec<_>>(), vec![Tag::from_name(name).unwrap(), Tag::Message]);
    }

    /// Names outside the vocabulary fail at construction
    #[test]
    fn test_unknown_placeholders_rejected(name in "[a-z_]{1,12}") {
        prop_assume!(!KNOWN_PLACEHOLDERS.contains(&name.as_str()));
        let err = Formatter::new(&format!("{{{{{}}}}}", name), false).unwrap_err();
        let is_unknown = matches!(err, LoggerError::UnknownPlaceholder { .. });
        prop_assert!(is_unknown);
    }

    /// Correlation fields print a dash when empty and the value otherwise
    #[test]
    fn test_correlation_fields(rpc_id in "[a-z0-9.]{0,8}", request_id in "[a-z0-9-]{0,8}") {
        let formatter = Formatter::new("{{rpc_id}} {{request_id}}", false).unwrap();
        let record = Record::new("c", Level::Info, "")
            .with_rpc_id(rpc_id.clone())
            .with_request_id(request_id.clone());

        let shown = |value: &str| -> String {
            if value.is_empty() { EMPTY_FIELD.to_string() } else { value.to_string() }
        };
        prop_assert_eq!(
            formatter.format(&record),
            format!("{} {}\n", shown(&rpc_id), shown(&request_id))
        );
    }

    /// Colouring wraps every tag but leaves the message and literals alone
    #[test]
    fn test_colour_leaves_message_plain(level in any_level(), message in "[a-zA-Z ]{0,20}") {
        let formatter = Formatter::new("<{{level}}> {{}}", true).unwrap();
        let record = Record::new("c", level, message.clone());
        let rendered = formatter.format(&record);

        let expected_tail = format!("\x1b[0;m> {}\n", message);
        prop_assert!(rendered.starts_with("<\x1b[0;"));
        prop_assert!(rendered.ends_with(&expected_tail));
        prop_assert!(rendered.contains(level.to_str()));
    }
}
