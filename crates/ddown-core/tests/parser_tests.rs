//! Integration tests for the Ddown parser

use ddown_core::ast::{Blockquote, CodeBlock, Heading, ListBlock, Paragraph, Table};
use ddown_core::{Block, Flag, Inline, Parser, WarningKind};

fn parse(input: &str) -> ddown_core::Document {
    Parser::new().parse(input)
}

fn heading(block: &Block) -> &Heading {
    match block {
        Block::Heading(h) => h,
        other => panic!("expected heading, got {:?}", other),
    }
}

fn paragraph(block: &Block) -> &Paragraph {
    match block {
        Block::Paragraph(p) => p,
        other => panic!("expected paragraph, got {:?}", other),
    }
}

fn unordered(block: &Block) -> &ListBlock {
    match block {
        Block::UnorderedList(l) => l,
        other => panic!("expected unordered list, got {:?}", other),
    }
}

fn ordered(block: &Block) -> &ListBlock {
    match block {
        Block::OrderedList(l) => l,
        other => panic!("expected ordered list, got {:?}", other),
    }
}

fn code_block(block: &Block) -> &CodeBlock {
    match block {
        Block::CodeBlock(c) => c,
        other => panic!("expected code block, got {:?}", other),
    }
}

fn blockquote(block: &Block) -> &Blockquote {
    match block {
        Block::Blockquote(q) => q,
        other => panic!("expected blockquote, got {:?}", other),
    }
}

fn table(block: &Block) -> &Table {
    match block {
        Block::Table(t) => t,
        other => panic!("expected table, got {:?}", other),
    }
}

fn item_text(items: &[Vec<Inline>], index: usize) -> String {
    Inline::plain_text(&items[index])
}

// ============================================================================
// Heading Tests
// ============================================================================

#[test]
fn test_heading_levels_follow_underline_character() {
    for (ch, level) in [('=', 1), ('-', 2), ('~', 3), ('^', 4), ('*', 5)] {
        let input = format!("Title\n{}\n", ch.to_string().repeat(4));
        let doc = parse(&input);
        let h = heading(&doc.blocks[0]);
        assert_eq!(h.level, level, "underline {:?}", ch);
        assert_eq!(Inline::plain_text(&h.content), "Title");
    }
}

#[test]
fn test_underline_length_does_not_change_level() {
    let short = parse("Title\n===\n");
    let long = parse("Title\n==========\n");
    assert_eq!(heading(&short.blocks[0]).level, 1);
    assert_eq!(heading(&long.blocks[0]).level, 1);
}

#[test]
fn test_two_character_underline_is_not_a_heading() {
    let doc = parse("Title\n==\n");
    assert!(matches!(doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_underline_without_preceding_text_is_a_paragraph() {
    let doc = parse("----\n");
    assert!(matches!(doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_heading_takes_priority_over_list_interpretation() {
    let doc = parse("=> item\n===\n");
    let h = heading(&doc.blocks[0]);
    assert_eq!(h.level, 1);
    assert_eq!(Inline::plain_text(&h.content), "=> item");
}

#[test]
fn test_heading_terminates_preceding_paragraph() {
    let doc = parse("intro text\nSection\n===\n");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(
        Inline::plain_text(&paragraph(&doc.blocks[0]).content),
        "intro text"
    );
    assert_eq!(Inline::plain_text(&heading(&doc.blocks[1]).content), "Section");
}

#[test]
fn test_heading_attrs_from_text_line() {
    let doc = parse("Title {#intro .wide}\n=====\n");
    let h = heading(&doc.blocks[0]);
    assert_eq!(Inline::plain_text(&h.content), "Title");
    assert_eq!(h.attrs.id.as_deref(), Some("intro"));
    assert_eq!(h.attrs.classes, vec!["wide"]);
}

#[test]
fn test_heading_attrs_from_underline_line() {
    let doc = parse("Title\n===== {@ color: red; }\n");
    let h = heading(&doc.blocks[0]);
    assert_eq!(
        h.attrs.style,
        vec![("color".to_string(), "red".to_string())]
    );
}

#[test]
fn test_underline_attrs_override_text_line_attrs() {
    let doc = parse("Title {@ color: red; }\n===== {@ color: blue; }\n");
    let h = heading(&doc.blocks[0]);
    assert_eq!(
        h.attrs.style,
        vec![("color".to_string(), "blue".to_string())]
    );
}

// ============================================================================
// Paragraph Tests
// ============================================================================

#[test]
fn test_paragraph_lines_join_with_single_spaces() {
    let doc = parse("first line\nsecond line\nthird line\n");
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(
        Inline::plain_text(&paragraph(&doc.blocks[0]).content),
        "first line second line third line"
    );
}

#[test]
fn test_blank_line_separates_paragraphs() {
    let doc = parse("one\n\ntwo\n");
    assert_eq!(doc.blocks.len(), 2);
}

#[test]
fn test_paragraph_attrs_bind_to_that_paragraph_only() {
    let doc = parse("styled {@ color: red; }\n\nplain\n");
    assert_eq!(
        paragraph(&doc.blocks[0]).attrs.style,
        vec![("color".to_string(), "red".to_string())]
    );
    assert!(paragraph(&doc.blocks[1]).attrs.is_empty());
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_consecutive_unordered_markers_form_one_list() {
    let doc = parse("=> a\n=> b\n");
    let list = unordered(&doc.blocks[0]);
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(list.items.len(), 2);
    assert_eq!(item_text(&list.items, 0), "a");
    assert_eq!(item_text(&list.items, 1), "b");
}

#[test]
fn test_blank_line_splits_lists() {
    let doc = parse("=> a\n\n=> b\n");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(unordered(&doc.blocks[0]).items.len(), 1);
    assert_eq!(unordered(&doc.blocks[1]).items.len(), 1);
}

#[test]
fn test_single_item_list() {
    let doc = parse("=> only\n");
    assert_eq!(unordered(&doc.blocks[0]).items.len(), 1);
}

#[test]
fn test_ordered_list_accepts_any_integers() {
    let doc = parse("1. first\n7. second\n3. third\n");
    let list = ordered(&doc.blocks[0]);
    assert_eq!(list.items.len(), 3);
    assert_eq!(item_text(&list.items, 1), "second");
}

#[test]
fn test_marker_without_space_is_a_paragraph() {
    let doc = parse("=>no space\n");
    assert!(matches!(doc.blocks[0], Block::Paragraph(_)));
    let doc = parse("1.no space\n");
    assert!(matches!(doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_list_kind_change_splits_blocks() {
    let doc = parse("=> a\n1. b\n");
    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(doc.blocks[0], Block::UnorderedList(_)));
    assert!(matches!(doc.blocks[1], Block::OrderedList(_)));
}

#[test]
fn test_item_attrs_merge_into_list_attrs() {
    let doc = parse("=> a {.wide}\n=> b {#menu}\n");
    let list = unordered(&doc.blocks[0]);
    assert_eq!(item_text(&list.items, 0), "a");
    assert_eq!(item_text(&list.items, 1), "b");
    assert_eq!(list.attrs.classes, vec!["wide"]);
    assert_eq!(list.attrs.id.as_deref(), Some("menu"));
}

// ============================================================================
// Code Block Tests
// ============================================================================

#[test]
fn test_code_block_language_tag() {
    let doc = parse("```rust\nfn main() {}\n```\n");
    let code = code_block(&doc.blocks[0]);
    assert_eq!(code.lang.as_deref(), Some("rust"));
    assert_eq!(code.content, "fn main() {}");
}

#[test]
fn test_code_block_without_language() {
    let doc = parse("```\nplain\n```\n");
    assert_eq!(code_block(&doc.blocks[0]).lang, None);
}

#[test]
fn test_code_block_content_is_byte_exact() {
    let doc = parse("```\n  indented\n\n\ttabbed\ntrailing  \n```\n");
    assert_eq!(
        code_block(&doc.blocks[0]).content,
        "  indented\n\n\ttabbed\ntrailing  "
    );
}

#[test]
fn test_code_block_content_is_never_inline_parsed() {
    let doc = parse("```\na `span` and [a](link)\n```\n");
    assert_eq!(code_block(&doc.blocks[0]).content, "a `span` and [a](link)");
}

#[test]
fn test_unterminated_fence_extends_to_end_of_input() {
    let result = Parser::new().parse_with_recovery("```\ncode line\nmore code");
    let code = code_block(&result.document.blocks[0]);
    assert_eq!(code.content, "code line\nmore code");
    assert!(result
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::UnclosedFence));
}

#[test]
fn test_empty_code_block() {
    let doc = parse("```\n```\n");
    assert_eq!(code_block(&doc.blocks[0]).content, "");
}

// ============================================================================
// Blockquote Tests
// ============================================================================

#[test]
fn test_consecutive_quote_lines_form_one_block() {
    let doc = parse("> first\n> second\n");
    let quote = blockquote(&doc.blocks[0]);
    assert_eq!(quote.lines.len(), 2);
    assert_eq!(Inline::plain_text(&quote.lines[0]), "first");
    assert_eq!(Inline::plain_text(&quote.lines[1]), "second");
}

#[test]
fn test_quote_lines_are_inline_parsed() {
    let doc = parse("> see `code`\n");
    let quote = blockquote(&doc.blocks[0]);
    assert_eq!(quote.lines[0][1], Inline::Code("code".to_string()));
}

// ============================================================================
// Table Tests
// ============================================================================

#[test]
fn test_table_with_separator_lookahead() {
    let doc = parse("| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n");
    let t = table(&doc.blocks[0]);
    assert_eq!(t.header, vec!["a", "b"]);
    assert_eq!(t.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
}

#[test]
fn test_pipe_line_without_separator_is_a_paragraph() {
    let doc = parse("| not | a | table |\njust text\n");
    assert!(matches!(doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_table_separator_accepts_alignment_colons() {
    let doc = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
    assert!(matches!(doc.blocks[0], Block::Table(_)));
}

#[test]
fn test_non_pipe_line_ends_the_table() {
    let doc = parse("| a |\n|---|\n| 1 |\nafterword\n");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(table(&doc.blocks[0]).rows.len(), 1);
    assert!(matches!(doc.blocks[1], Block::Paragraph(_)));
}

// ============================================================================
// Directive and Global Style Tests
// ============================================================================

#[test]
fn test_dark_mode_directive_sets_flag() {
    let doc = parse("{@dark-mode}\n\nbody text\n");
    assert!(doc.has_flag(Flag::DarkMode));
    assert_eq!(doc.blocks.len(), 1);
}

#[test]
fn test_unknown_directive_is_ignored_with_warning() {
    let result = Parser::new().parse_with_recovery("{@sepia-mode}\n\ntext\n");
    assert!(result.document.flags.is_empty());
    assert_eq!(result.document.blocks.len(), 1);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::UnknownDirective));
}

#[test]
fn test_global_style_is_captured_verbatim() {
    let input = "{@global-style}\nh1 { color: red; }\np { margin: 0; }\n{@endglobal-style}\n\ntext\n";
    let doc = parse(input);
    assert_eq!(doc.global_style, "h1 { color: red; }\np { margin: 0; }");
    assert_eq!(doc.blocks.len(), 1);
}

#[test]
fn test_global_style_lines_are_not_parsed_as_body() {
    let input = "{@global-style}\nTitle\n=====\n{@endglobal-style}\n";
    let doc = parse(input);
    assert!(doc.blocks.is_empty());
    assert!(doc.global_style.contains("====="));
}

#[test]
fn test_unterminated_global_style_extends_to_end() {
    let result = Parser::new().parse_with_recovery("{@global-style}\nh1 { color: red; }\n");
    assert_eq!(result.document.global_style, "h1 { color: red; }");
    assert!(result.document.blocks.is_empty());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::UnclosedGlobalStyle));
}

#[test]
fn test_later_global_style_blocks_append() {
    let input = "{@global-style}\nh1 { color: red; }\n{@endglobal-style}\n\ntext\n\n{@global-style}\np { margin: 0; }\n{@endglobal-style}\n";
    let doc = parse(input);
    assert!(doc.global_style.contains("h1 { color: red; }"));
    assert!(doc.global_style.contains("p { margin: 0; }"));
}

// ============================================================================
// Attribute Payload Tests
// ============================================================================

#[test]
fn test_malformed_attribute_payload_is_dropped() {
    let result = Parser::new().parse_with_recovery("Title {@ color }\n=====\n");
    let doc = &result.document;
    match &doc.blocks[0] {
        Block::Heading(h) => {
            assert_eq!(Inline::plain_text(&h.content), "Title");
            assert!(h.attrs.is_empty());
        }
        other => panic!("expected heading, got {:?}", other),
    }
    assert!(result
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::MalformedAttributes));
}

#[test]
fn test_line_of_only_stripped_payload_emits_no_block() {
    let result = Parser::new().parse_with_recovery("before\n\n{@endglobal-style}\n\nafter\n");
    let doc = &result.document;
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(
        Inline::plain_text(&paragraph(&doc.blocks[0]).content),
        "before"
    );
    assert_eq!(
        Inline::plain_text(&paragraph(&doc.blocks[1]).content),
        "after"
    );
}

#[test]
fn test_non_attribute_braces_stay_literal() {
    let doc = parse("code like map[key] = {1, 2}\n");
    assert_eq!(
        Inline::plain_text(&paragraph(&doc.blocks[0]).content),
        "code like map[key] = {1, 2}"
    );
}

// ============================================================================
// Inline Formatting Tests
// ============================================================================

#[test]
fn test_inline_code_in_paragraph() {
    let doc = parse("before `code` after\n");
    let p = paragraph(&doc.blocks[0]);
    assert_eq!(
        p.content,
        vec![
            Inline::Text("before ".to_string()),
            Inline::Code("code".to_string()),
            Inline::Text(" after".to_string()),
        ]
    );
}

#[test]
fn test_link_and_image_in_paragraph() {
    let doc = parse("see [docs](https://example.com) and ![logo](img.png)\n");
    let p = paragraph(&doc.blocks[0]);
    assert!(p.content.iter().any(|s| matches!(
        s,
        Inline::Link { url, .. } if url == "https://example.com"
    )));
    assert!(p.content.iter().any(|s| matches!(
        s,
        Inline::Image { alt, url } if alt == "logo" && url == "img.png"
    )));
}

#[test]
fn test_unmatched_markers_are_literal() {
    let doc = parse("a `dangling and [half link\n");
    assert_eq!(
        Inline::plain_text(&paragraph(&doc.blocks[0]).content),
        "a `dangling and [half link"
    );
}

// ============================================================================
// Pipeline Properties
// ============================================================================

#[test]
fn test_parsing_twice_yields_deep_equal_documents() {
    let input = "\
{@dark-mode}

{@global-style}
h1 { color: red; }
{@endglobal-style}

Title {#intro}
=====

A paragraph with `code` and [a link](url).

=> one
=> two

```rust
fn main() {}
```

> quoted

| h1 | h2 |
|----|----|
| a  | b  |
";
    assert_eq!(parse(input), parse(input));
}

#[test]
fn test_mixed_document_block_order() {
    let input = "Title\n=====\n\npara\n\n=> item\n\n```\ncode\n```\n\n> quote\n";
    let doc = parse(input);
    assert_eq!(doc.blocks.len(), 5);
    assert!(matches!(doc.blocks[0], Block::Heading(_)));
    assert!(matches!(doc.blocks[1], Block::Paragraph(_)));
    assert!(matches!(doc.blocks[2], Block::UnorderedList(_)));
    assert!(matches!(doc.blocks[3], Block::CodeBlock(_)));
    assert!(matches!(doc.blocks[4], Block::Blockquote(_)));
}

#[test]
fn test_empty_and_blank_inputs() {
    assert!(parse("").blocks.is_empty());
    assert!(parse("\n\n   \n\t\n").blocks.is_empty());
}

#[test]
fn test_crlf_input() {
    let doc = parse("Title\r\n=====\r\n\r\npara\r\n");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(Inline::plain_text(&heading(&doc.blocks[0]).content), "Title");
}

#[test]
fn test_crlf_code_block_content_is_normalized() {
    let doc = parse("```\r\nfoo\r\nbar\r\n```\r\n");
    assert_eq!(code_block(&doc.blocks[0]).content, "foo\nbar");
}
