use genfuzz::error::GenfuzzError;
use genfuzz::template::{GeneratorRegistry, TemplateEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn parse(source: &str) -> Result<TemplateEngine, GenfuzzError> {
    let registry = GeneratorRegistry::new();
    TemplateEngine::parse(source, &registry)
}

fn generate(source: &str, capacity: usize, seed: u64) -> Vec<u8> {
    let engine = parse(source).expect("template should parse");
    let mut rng = StdRng::seed_from_u64(seed);
    engine.generate(capacity, &mut rng)
}

/// Length of the written prefix; generated content never contains zero
/// bytes in these templates, so the first zero starts the padding.
fn written_len(output: &[u8]) -> usize {
    output.iter().position(|b| *b == 0).unwrap_or(output.len())
}

#[test]
fn literal_statements_pad_with_zeros() {
    let source = "literal-text \"GET \"\nliteral-text \"/ HTTP/1.1\\r\\n\"\n";
    let output = generate(source, 100, 7);

    assert_eq!(output.len(), 100);
    assert_eq!(&output[..16], b"GET / HTTP/1.1\r\n");
    assert!(output[16..].iter().all(|b| *b == 0));
}

#[test]
fn overflow_truncates_at_statement_boundary() {
    let source = "literal-text \"ABCD\"\nliteral-text \"ABCD\"\n";
    let output = generate(source, 6, 7);

    // The second statement does not fit; no partial bytes of it appear.
    assert_eq!(output, b"ABCD\0\0");
}

#[test]
fn comments_and_blank_lines_are_noops() {
    let source = "# leading comment\n\nliteral-text \"x\"\n# trailing comment\n";
    let output = generate(source, 4, 7);
    assert_eq!(output, b"x\0\0\0");
}

#[test]
fn var_declaration_then_invocation() {
    let source = "var greeting literal-text \"hi\"\ngreeting\n";
    let output = generate(source, 8, 7);
    assert_eq!(&output[..2], b"hi");
    assert!(output[2..].iter().all(|b| *b == 0));
}

#[test]
fn inner_scope_shadows_outer_binding() {
    let source = "\
var token literal-text \"outer\"
(
var token literal-text \"inner\"
token
)
token
";
    let output = generate(source, 16, 7);
    assert_eq!(&output[..10], b"innerouter");
}

#[test]
fn later_sibling_binding_is_not_visible() {
    let source = "greeting\nvar greeting literal-text \"hi\"\n";
    match parse(source) {
        Err(GenfuzzError::TemplateParse { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn forward_reference_into_enclosing_scope_is_visible() {
    let source = "\
(
greeting
)
var greeting literal-text \"hi\"
";
    let output = generate(source, 8, 7);
    assert_eq!(&output[..2], b"hi");
}

#[test]
fn repeat_group_draws_count_below_bound() {
    let source = "( * 3\nliteral-text \"ab\"\n)\n";
    for seed in 0..32 {
        let output = generate(source, 16, seed);
        let len = written_len(&output);
        assert!(len % 2 == 0 && len <= 4, "unexpected repeat output length {len}");
        assert!(output[len..].iter().all(|b| *b == 0));
    }
}

#[test]
fn random_string_respects_bounds() {
    let source = "random-string 10\n";
    for seed in 0..32 {
        let output = generate(source, 64, seed);
        let len = written_len(&output);
        assert!(len < 10, "length {len} outside [0, 10)");
        assert!(output[..len].iter().all(|b| (0x21..=0x7e).contains(b)));
    }
}

#[test]
fn random_choice_picks_one_alternative() {
    let source = "random-choice \"GET\" \"POST\"\n";
    let mut saw_get = false;
    let mut saw_post = false;
    for seed in 0..64 {
        let output = generate(source, 8, seed);
        let len = written_len(&output);
        match &output[..len] {
            b"GET" => saw_get = true,
            b"POST" => saw_post = true,
            other => panic!("unexpected choice {other:?}"),
        }
    }
    assert!(saw_get && saw_post, "both alternatives should occur");
}

#[test]
fn numeric_alternative_emits_decimal_ascii() {
    let output = generate("random-choice 42\n", 4, 7);
    assert_eq!(output, b"42\0\0");
}

#[test]
fn reference_alternative_invokes_binding() {
    let source = "\
var inner literal-text \"zz\"
var pick random-choice inner
pick
";
    let output = generate(source, 8, 7);
    assert_eq!(&output[..2], b"zz");
}

#[test]
fn parse_rejects_unmatched_delimiters() {
    assert!(matches!(
        parse("(\nliteral-text \"x\"\n"),
        Err(GenfuzzError::TemplateParse { .. })
    ));
    assert!(matches!(
        parse(")\n"),
        Err(GenfuzzError::TemplateParse { .. })
    ));
}

#[test]
fn parse_rejects_unknown_binding() {
    assert!(matches!(
        parse("nope \"x\"\n"),
        Err(GenfuzzError::TemplateParse { .. })
    ));
}

#[test]
fn parse_rejects_malformed_literal() {
    assert!(matches!(
        parse("literal-text \"abc\n"),
        Err(GenfuzzError::TemplateParse { .. })
    ));
    assert!(matches!(
        parse("literal-text \"bad\\qescape\"\n"),
        Err(GenfuzzError::TemplateParse { .. })
    ));
}

#[test]
fn parse_rejects_unknown_generator_type() {
    assert!(matches!(
        parse("var x nothing \"a\"\n"),
        Err(GenfuzzError::TemplateParse { .. })
    ));
}

#[test]
fn parse_rejects_zero_repeat_bound() {
    assert!(matches!(
        parse("( * 0\nliteral-text \"x\"\n)\n"),
        Err(GenfuzzError::TemplateParse { .. })
    ));
}

#[test]
fn parse_rejects_argument_free_literal_text() {
    assert!(matches!(
        parse("literal-text\n"),
        Err(GenfuzzError::TemplateParse { .. })
    ));
}

#[test]
fn shipped_http_template_parses_and_generates() {
    let source = std::fs::read_to_string("templates/http_request.tmpl")
        .expect("shipped template should exist");
    let output = generate(&source, 3000, 7);
    assert_eq!(output.len(), 3000);
    let len = written_len(&output);
    let head = std::str::from_utf8(&output[..len]).expect("request head should be UTF-8");
    assert!(
        head.starts_with("GET /") || head.starts_with("POST /") || head.starts_with("HEAD /"),
        "unexpected request line: {head:?}"
    );
    assert!(head.contains("HTTP/1.1\r\n"));
}
