//! Property-based roundtrip tests.
//!
//! Uses `proptest` to generate configuration text line by line (comments,
//! section headers, key/value pairs, directives, blank runs) with random
//! spacing and line endings, then checks that:
//!
//! - `serialize(parse(text)) == text`
//! - reserializing a reparsed tree is stable
//! - `ensure_last_new_line` is idempotent and always leaves a trailing newline
//!
//! The generators stay inside the accepted grammar: values that end a line are
//! never empty, since `key =` followed by a line break is a structural error.
use cnf_core::{serialize, Document, KeyValue, Section, Whitespace};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating configuration lines
// ============================================================================

fn arb_spacer() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

fn arb_key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9_.]{0,12}"
}

fn arb_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9$/:,@._-][a-zA-Z0-9 $/:,@._=\\[\\]-]{0,24}"
}

fn arb_comment() -> impl Strategy<Value = String> {
    "[^\r\n]{0,30}".prop_map(|text| format!("#{text}"))
}

fn arb_section_header() -> impl Strategy<Value = String> {
    (arb_spacer(), "[a-zA-Z0-9_]{0,12}", "[ \t]{0,3}[a-z ]{0,6}")
        .prop_map(|(pre, name, post)| format!("[{pre}{name}{post}]"))
}

fn arb_key_value() -> impl Strategy<Value = String> {
    (
        arb_key(),
        arb_spacer(),
        arb_spacer(),
        arb_value(),
        prop::option::of(arb_comment()),
    )
        .prop_map(|(key, key_post, value_pre, value, comment)| {
            format!("{key}{key_post}={value_pre}{value}{}", comment.unwrap_or_default())
        })
}

fn arb_directive() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", prop::option::of(("[ \t]{1,2}", "[a-zA-Z0-9/._ ]{0,15}")))
        .prop_map(|(name, rest)| match rest {
            Some((spacer, args)) => format!(".{name}{spacer}{args}"),
            None => format!(".{name}"),
        })
}

fn arb_line() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_key_value(),
        2 => arb_comment(),
        2 => arb_section_header(),
        1 => arb_directive(),
        1 => arb_spacer(),
    ]
}

fn arb_line_end() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        4 => Just("\n"),
        1 => Just("\r\n"),
        1 => Just("\n\n"),
    ]
}

/// A whole file: lines joined by random terminators, optionally unterminated.
fn arb_config_text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec((arb_line(), arb_line_end()), 0..30),
        prop::option::of(arb_line()),
    )
        .prop_map(|(lines, last)| {
            let mut text = String::new();
            for (line, end) in lines {
                text.push_str(&line);
                text.push_str(end);
            }
            if let Some(last) = last {
                text.push_str(&last);
            }
            text
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn parse_then_serialize_is_identity(text in arb_config_text()) {
        let doc = Document::parse(&text).map_err(|e| TestCaseError::fail(format!("{e}")))?;
        prop_assert_eq!(serialize(&doc), text);
    }

    #[test]
    fn reserialization_is_idempotent(text in arb_config_text()) {
        let once = serialize(&Document::parse(&text).unwrap());
        let twice = serialize(&Document::parse(&once).unwrap());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn ensure_last_new_line_is_idempotent(
        text in arb_config_text(),
        newline in prop_oneof![Just("\n"), Just("\r\n")],
    ) {
        let mut doc = Document::parse(&text).unwrap();
        doc.ensure_last_new_line(newline).unwrap();
        let once = serialize(&doc);
        prop_assert!(once.ends_with(newline));
        prop_assert!(once.starts_with(&text));

        doc.ensure_last_new_line(newline).unwrap();
        prop_assert_eq!(serialize(&doc), once);
    }

    #[test]
    fn sections_never_nest(text in arb_config_text()) {
        let doc = Document::parse(&text).unwrap();
        for section in doc.sections() {
            prop_assert!(section.nodes().iter().all(|n| n.as_section().is_none()));
        }
    }

    #[test]
    fn constructed_section_serializes_its_fragments(
        name in "[a-zA-Z0-9_]{1,12}",
        pairs in prop::collection::vec((arb_key(), arb_value()), 1..8),
    ) {
        let mut doc = Document::new();
        let mut section = Section::new(name.clone());
        let mut expected = format!("[{name}]");
        for (key, value) in &pairs {
            section.append(Whitespace::new("\n").unwrap());
            section.append(KeyValue::new(key.clone(), value.clone()));
            expected.push('\n');
            expected.push_str(&format!("{key}={value}"));
        }
        doc.append(section);
        prop_assert_eq!(serialize(&doc), expected.clone());

        // The first declared key wins on lookup.
        let (first_key, first_value) = &pairs[0];
        let reparsed = Document::parse(&expected).unwrap();
        let found = reparsed.get_section(&name).and_then(|s| s.get_kvp(first_key));
        prop_assert_eq!(found.map(|kv| kv.value.as_str()), Some(first_value.as_str()));
    }
}
