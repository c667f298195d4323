use super::*;

const GANTRY: &str = r#"{"system_component":"Gantry","failure_mode":"FM1","severity":"High","priority":"High","level2":"Power Supply"}"#;
const COUCH: &str = r#"{"system_component":"Couch","failure_mode":"FM3","severity":"Low","priority":"Low","level2":"Noise"}"#;

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<unset>")
}

mod single_object {
    use super::*;

    #[test]
    fn test_single_object_after_reasoning() {
        let reply = format!("<think>PDU breaker tripped twice</think>{GANTRY}");
        let parsed = parse(&reply).unwrap();

        assert_eq!(parsed.provenance, Provenance::Single);
        let fields = &parsed.result.fields;
        assert_eq!(field(&fields.system_component), "Gantry");
        assert_eq!(field(&fields.failure_mode), "FM1");
        assert_eq!(field(&fields.severity), "High");
        assert_eq!(field(&fields.priority), "High");
        assert_eq!(field(&fields.level2), "Power Supply");
        assert_eq!(parsed.result.rationale, "PDU breaker tripped twice");
        assert!(parsed.warning().is_none());
    }

    #[test]
    fn test_rationale_is_kept_verbatim() {
        let reply = format!("<think>\nline one\nline two\n</think>\n\n{GANTRY}");
        let parsed = parse(&reply).unwrap();
        assert_eq!(parsed.result.rationale, "\nline one\nline two\n");
    }

    #[test]
    fn test_code_fence_around_object() {
        let reply = format!("<think>ok</think>\n```json\n{GANTRY}\n```");
        let parsed = parse(&reply).unwrap();
        assert_eq!(parsed.provenance, Provenance::Single);
        assert_eq!(field(&parsed.result.fields.level2), "Power Supply");
    }

    #[test]
    fn test_missing_keys_are_unset() {
        let reply = r#"<think>x</think>{"system_component":"Software"}"#;
        let parsed = parse(reply).unwrap();
        let fields = &parsed.result.fields;
        assert_eq!(field(&fields.system_component), "Software");
        assert!(fields.failure_mode.is_none());
        assert!(fields.severity.is_none());
        assert!(fields.priority.is_none());
        assert!(fields.level2.is_none());
    }

    #[test]
    fn test_null_and_non_string_values() {
        let reply = r#"{"system_component":null,"failure_mode":4,"severity":true,"level2":["Tube"]}"#;
        let parsed = parse(reply).unwrap();
        let fields = &parsed.result.fields;
        assert!(fields.system_component.is_none());
        assert_eq!(field(&fields.failure_mode), "4");
        assert_eq!(field(&fields.severity), "true");
        assert_eq!(field(&fields.level2), r#"["Tube"]"#);
    }

    #[test]
    fn test_nested_object_parses_whole() {
        let reply = r#"<think>t</think>{"system_component":"IC","extra":{"note":"tube"},"level2":"Tube"}"#;
        let parsed = parse(reply).unwrap();
        assert_eq!(parsed.provenance, Provenance::Single);
        assert_eq!(field(&parsed.result.fields.level2), "Tube");
    }

    #[test]
    fn test_no_reasoning_span() {
        let parsed = parse(GANTRY).unwrap();
        assert_eq!(parsed.result.rationale, "");
        assert_eq!(field(&parsed.result.fields.system_component), "Gantry");
    }
}

mod folding {
    use super::*;

    #[test]
    fn test_two_concatenated_objects() {
        let reply = format!("<think>reasoning</think>{GANTRY}{COUCH}");
        let parsed = parse(&reply).unwrap();

        assert_eq!(
            parsed.provenance,
            Provenance::Folded {
                parsed: 2,
                skipped: 0
            }
        );
        let fields = &parsed.result.fields;
        assert_eq!(field(&fields.system_component), "Gantry|Couch");
        assert_eq!(field(&fields.failure_mode), "FM1|FM3");
        assert_eq!(field(&fields.severity), "Low");
        assert_eq!(field(&fields.priority), "Low");
        assert_eq!(field(&fields.level2), "Noise");
        assert_eq!(parsed.result.rationale, "reasoning");
        assert!(parsed.is_folded());
    }

    #[test]
    fn test_fold_keeps_duplicates_in_order() {
        let reply = format!("{COUCH}\n{GANTRY}\n{COUCH}");
        let parsed = parse(&reply).unwrap();
        assert_eq!(
            field(&parsed.result.fields.system_component),
            "Couch|Gantry|Couch"
        );
        assert_eq!(field(&parsed.result.fields.level2), "Noise");
    }

    #[test]
    fn test_fold_with_text_between_objects() {
        let reply = format!("<think>r</think>First issue: {GANTRY}. Second issue: {COUCH}.");
        let parsed = parse(&reply).unwrap();
        assert_eq!(field(&parsed.result.fields.system_component), "Gantry|Couch");
    }

    #[test]
    fn test_unparsable_span_is_skipped() {
        let reply = format!("<think>r</think>{GANTRY}{{not json}}{COUCH}");
        let parsed = parse(&reply).unwrap();

        assert_eq!(
            parsed.provenance,
            Provenance::Folded {
                parsed: 2,
                skipped: 1
            }
        );
        assert_eq!(field(&parsed.result.fields.failure_mode), "FM1|FM3");
        assert_eq!(
            parsed.warning(),
            Some(ParseError::PartialRecovery {
                parsed: 2,
                skipped: 1
            })
        );
    }

    #[test]
    fn test_later_object_without_key_unsets_scalar_fields() {
        let reply = format!(r#"{GANTRY}{{"system_component":"Couch","failure_mode":"FM3"}}"#);
        let fields = parse(&reply).unwrap().result.fields;
        assert_eq!(field(&fields.system_component), "Gantry|Couch");
        assert_eq!(field(&fields.failure_mode), "FM1|FM3");
        assert_eq!(fields.severity, None);
        assert_eq!(fields.priority, None);
        assert_eq!(fields.level2, None);
    }

    #[test]
    fn test_missing_component_keeps_segments_aligned() {
        let reply = r#"{"failure_mode":"FM1","severity":"High"}{"system_component":"Couch","failure_mode":"FM3","severity":"Low"}"#;
        let fields = parse(reply).unwrap().result.fields;
        assert_eq!(field(&fields.system_component), "|Couch");
        assert_eq!(field(&fields.failure_mode), "FM1|FM3");
        assert_eq!(field(&fields.severity), "Low");
    }

    #[test]
    fn test_null_failure_mode_is_empty_segment() {
        let reply = format!(r#"{{"system_component":"Gantry","failure_mode":null}}{COUCH}"#);
        let fields = parse(&reply).unwrap().result.fields;
        assert_eq!(field(&fields.system_component), "Gantry|Couch");
        assert_eq!(field(&fields.failure_mode), "|FM3");
    }

    #[test]
    fn test_key_absent_from_every_object_stays_unset() {
        let reply = r#"{"system_component":"Gantry"}{"system_component":"Couch"}"#;
        let fields = parse(reply).unwrap().result.fields;
        assert_eq!(field(&fields.system_component), "Gantry|Couch");
        assert_eq!(fields.failure_mode, None);
    }

    #[test]
    fn test_single_valid_span_among_garbage() {
        let reply = format!("<think>r</think>{{oops}} {GANTRY}");
        let parsed = parse(&reply).unwrap();
        assert_eq!(
            parsed.provenance,
            Provenance::Folded {
                parsed: 1,
                skipped: 1
            }
        );
        assert_eq!(field(&parsed.result.fields.system_component), "Gantry");
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_no_braces_after_reasoning() {
        let reply = "<think>I think it is {maybe} the gantry</think>It is the gantry.";
        assert_eq!(parse(reply), Err(ParseError::NoStructuredContent));
    }

    #[test]
    fn test_empty_reply() {
        assert_eq!(parse(""), Err(ParseError::NoStructuredContent));
    }

    #[test]
    fn test_every_span_fails() {
        let reply = "<think>r</think>{bad} and {worse}";
        assert_eq!(parse(reply), Err(ParseError::NoStructuredContent));
    }

    #[test]
    fn test_unclosed_brace() {
        let reply = r#"<think>r</think>{"system_component":"Gantry""#;
        assert_eq!(parse(reply), Err(ParseError::NoStructuredContent));
    }

    #[test]
    fn test_json_array_is_not_an_object() {
        let reply = r#"<think>r</think>[1, 2, 3]"#;
        assert_eq!(parse(reply), Err(ParseError::NoStructuredContent));
    }
}

mod reasoning_span {
    use super::*;

    #[test]
    fn test_unterminated_reasoning_rationale_runs_to_end() {
        let reply = format!("<think>still thinking {GANTRY}");
        let parsed = parse(&reply).unwrap();
        assert_eq!(parsed.result.rationale, format!("still thinking {GANTRY}"));
        assert_eq!(field(&parsed.result.fields.system_component), "Gantry");
    }

    #[test]
    fn test_closer_without_opener() {
        let reply = format!("stray</think>{COUCH}");
        let parsed = parse(&reply).unwrap();
        assert_eq!(parsed.result.rationale, "");
        assert_eq!(field(&parsed.result.fields.system_component), "Couch");
    }

    #[test]
    fn test_braces_inside_reasoning_are_ignored() {
        let reply = format!(r#"<think>maybe {{"system_component":"IC"}}</think>{COUCH}"#);
        let parsed = parse(&reply).unwrap();
        assert_eq!(parsed.provenance, Provenance::Single);
        assert_eq!(field(&parsed.result.fields.system_component), "Couch");
    }

    #[test]
    fn test_last_closer_ends_the_span() {
        let reply = format!("<think>a</think>b</think>{GANTRY}");
        let parsed = parse(&reply).unwrap();
        assert_eq!(parsed.result.rationale, "a</think>b");
    }
}

#[test]
fn test_brace_spans_are_flat() {
    let spans: Vec<&str> = BraceSpans::new("{a}{b {c} d}").collect();
    assert_eq!(spans, vec!["{a}", "{b {c}"]);
}

#[test]
fn test_provenance_display() {
    assert_eq!(Provenance::Single.to_string(), "SINGLE");
    assert_eq!(
        Provenance::Folded {
            parsed: 2,
            skipped: 1
        }
        .to_string(),
        "FOLDED (parsed: 2, skipped: 1)"
    );
}
