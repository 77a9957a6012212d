//! End-to-end conversion scenarios over the public API.

use delta_html_engine::{ConverterOptions, DeltaHtmlConverter, Group, GroupType, InsertContent};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn convert(ops: Vec<Value>) -> String {
    convert_with(ops, ConverterOptions::default())
}

fn convert_with(ops: Vec<Value>, options: ConverterOptions) -> String {
    DeltaHtmlConverter::new(ops, options).unwrap().convert()
}

#[test]
fn inline_formatting_inside_an_implicit_paragraph() {
    let html = convert(vec![
        json!({ "insert": "Hello " }),
        json!({ "insert": "world", "attributes": { "bold": true } }),
        json!({ "insert": "\n" }),
    ]);
    insta::assert_snapshot!(html, @"<p>Hello <strong>world</strong></p>");
}

#[test]
fn sibling_bullet_items_share_one_container() {
    let html = convert(vec![
        json!({ "insert": "item" }),
        json!({ "insert": "\n", "attributes": { "list": "bullet" } }),
        json!({ "insert": "item" }),
        json!({ "insert": "\n", "attributes": { "list": "bullet" } }),
    ]);
    insta::assert_snapshot!(html, @"<ul><li>item</li><li>item</li></ul>");
}

#[test]
fn deeper_indent_nests_as_a_child_never_a_sibling() {
    let html = convert(vec![
        json!({ "insert": "a" }),
        json!({ "insert": "\n", "attributes": { "list": "bullet" } }),
        json!({ "insert": "b" }),
        json!({ "insert": "\n", "attributes": { "list": "bullet", "indent": 1 } }),
    ]);
    insta::assert_snapshot!(html, @"<ul><li>a<ul><li>b</li></ul></li></ul>");
}

#[test]
fn adjacent_blockquotes_merge_when_enabled() {
    let quote_lines = || {
        vec![
            json!({ "insert": "one" }),
            json!({ "insert": "\n", "attributes": { "blockquote": true } }),
            json!({ "insert": "two" }),
            json!({ "insert": "\n", "attributes": { "blockquote": true } }),
        ]
    };

    let merged = convert(quote_lines());
    insta::assert_snapshot!(merged, @"<blockquote>one<br/>two</blockquote>");

    let separate = convert_with(
        quote_lines(),
        ConverterOptions {
            multi_line_blockquote: false,
            ..ConverterOptions::default()
        },
    );
    insta::assert_snapshot!(separate, @"<blockquote>one</blockquote><blockquote>two</blockquote>");
}

#[test]
fn unhooked_custom_embed_leaves_no_markup() {
    let html = convert(vec![
        json!({ "insert": "a\n" }),
        json!({ "insert": { "widget": { "id": 3 } }, "attributes": { "renderAsBlock": true } }),
        json!({ "insert": "b\n" }),
    ]);
    insta::assert_snapshot!(html, @"<p>a</p><p>b</p>");
}

#[test]
fn image_renders_self_closing_with_src() {
    let html = convert(vec![json!({ "insert": { "image": "https://example.com/pic.png" } })]);
    insta::assert_snapshot!(html, @r#"<img class="ql-image" src="https://example.com/pic.png"/>"#);
}

#[test]
fn line_boundaries_survive_with_merging_disabled() {
    let ops = vec![
        json!({ "insert": "a" }),
        json!({ "insert": "\n", "attributes": { "blockquote": true } }),
        json!({ "insert": "b" }),
        json!({ "insert": "\n", "attributes": { "blockquote": true } }),
        json!({ "insert": "c" }),
        json!({ "insert": "\n", "attributes": { "blockquote": true } }),
    ];
    let html = convert_with(
        ops,
        ConverterOptions {
            multi_line_blockquote: false,
            ..ConverterOptions::default()
        },
    );
    assert_eq!(html.matches("<blockquote>").count(), 3);
    assert_eq!(html.matches("</blockquote>").count(), 3);
}

#[test]
fn headers_merge_only_at_matching_levels() {
    let ops = || {
        vec![
            json!({ "insert": "a" }),
            json!({ "insert": "\n", "attributes": { "header": 1 } }),
            json!({ "insert": "b" }),
            json!({ "insert": "\n", "attributes": { "header": 1 } }),
            json!({ "insert": "c" }),
            json!({ "insert": "\n", "attributes": { "header": 2 } }),
        ]
    };

    let merged = convert(ops());
    insta::assert_snapshot!(merged, @"<h1>a<br/>b</h1><h2>c</h2>");

    let separate = convert_with(
        ops(),
        ConverterOptions {
            multi_line_header: false,
            ..ConverterOptions::default()
        },
    );
    insta::assert_snapshot!(separate, @"<h1>a</h1><h1>b</h1><h2>c</h2>");
}

#[test]
fn code_blocks_merge_into_one_pre() {
    let ops = || {
        vec![
            json!({ "insert": "let x = 1;" }),
            json!({ "insert": "\n", "attributes": { "code-block": true } }),
            json!({ "insert": "x < 2" }),
            json!({ "insert": "\n", "attributes": { "code-block": true } }),
        ]
    };

    assert_eq!(convert(ops()), "<pre>let x = 1;\nx &lt; 2</pre>");

    let separate = convert_with(
        ops(),
        ConverterOptions {
            multi_line_codeblock: false,
            ..ConverterOptions::default()
        },
    );
    assert_eq!(separate, "<pre>let x = 1;</pre><pre>x &lt; 2</pre>");
}

#[test]
fn grouped_ops_exposes_the_prerender_structure() {
    let converter = DeltaHtmlConverter::new(
        vec![
            json!({ "insert": "title" }),
            json!({ "insert": "\n", "attributes": { "header": 1 } }),
            json!({ "insert": "a" }),
            json!({ "insert": "\n", "attributes": { "list": "bullet" } }),
            json!({ "insert": "b" }),
            json!({ "insert": "\n", "attributes": { "list": "bullet", "indent": 1 } }),
            json!({ "insert": { "video": "https://example.com/v" } }),
            json!({ "insert": "tail" }),
        ],
        ConverterOptions::default(),
    )
    .unwrap();

    let groups = converter.grouped_ops();
    assert_eq!(groups.len(), 4);
    assert!(matches!(groups[0], Group::Block(_)));
    assert!(matches!(groups[2], Group::Media(_)));
    assert!(matches!(groups[3], Group::Inline(_)));
    match &groups[1] {
        Group::List(list) => {
            assert_eq!(list.items.len(), 1);
            let inner = list.items[0].inner_list.as_ref().unwrap();
            assert_eq!(inner.items.len(), 1);
        }
        other => panic!("expected list group, got {other:?}"),
    }

    // Grouping twice yields structurally identical trees, and rendering
    // does not disturb them.
    assert_eq!(converter.grouped_ops(), groups);
    let _ = converter.convert();
    assert_eq!(converter.grouped_ops(), groups);
}

#[test]
fn hooks_wrap_and_replace_groups() {
    let mut converter = DeltaHtmlConverter::new(
        vec![
            json!({ "insert": "a" }),
            json!({ "insert": "\n", "attributes": { "list": "bullet" } }),
            json!({ "insert": { "image": "https://example.com/i.png" } }),
            json!({ "insert": "chart: " }),
            json!({ "insert": { "chart": { "points": 4 } } }),
            json!({ "insert": "\n" }),
        ],
        ConverterOptions::default(),
    )
    .unwrap();

    converter.before_render(|group_type, _| match group_type {
        GroupType::List => Some("<nav>replaced</nav>".to_string()),
        _ => None,
    });
    converter.after_render(|group_type, html| match group_type {
        GroupType::Media => format!("<figure>{html}</figure>"),
        _ => html,
    });
    converter.render_custom_with(|op, _| match &op.content {
        InsertContent::Custom(embed) => format!("<span data-embed=\"{}\"></span>", embed.name),
        _ => String::new(),
    });

    insta::assert_snapshot!(converter.convert(), @r#"<nav>replaced</nav><figure><img class="ql-image" src="https://example.com/i.png"/></figure><p>chart: <span data-embed="chart"></span></p>"#);
}

#[test]
fn formula_flows_inline_within_its_paragraph() {
    let html = convert(vec![
        json!({ "insert": "energy: " }),
        json!({ "insert": { "formula": "e=mc^2" } }),
        json!({ "insert": "\n" }),
    ]);
    insta::assert_snapshot!(html, @r#"<p>energy: <span class="ql-formula">e=mc^2</span></p>"#);
}

#[test]
fn empty_insert_yields_an_empty_paragraph() {
    assert_eq!(convert(vec![json!({ "insert": "" })]), "<p></p>");
}

#[test]
fn blank_lines_are_preserved() {
    let html = convert(vec![json!({ "insert": "a\n\nb\n" })]);
    assert_eq!(html, "<p>a<br/><br/>b</p>");

    let split = convert_with(
        vec![json!({ "insert": "a\n\nb\n" })],
        ConverterOptions {
            multi_line_paragraph: false,
            ..ConverterOptions::default()
        },
    );
    assert_eq!(split, "<p>a</p><p><br/></p><p>b</p>");
}

#[test]
fn custom_tags_and_class_prefix_apply() {
    let html = convert_with(
        vec![
            json!({ "insert": "x", "attributes": { "size": "small" } }),
            json!({ "insert": "\n" }),
        ],
        ConverterOptions {
            paragraph_tag: "div".to_string(),
            class_prefix: "ed".to_string(),
            ..ConverterOptions::default()
        },
    );
    insta::assert_snapshot!(html, @r#"<div><span class="ed-size-small">x</span></div>"#);
}

#[test]
fn inline_styles_mode_emits_style_attributes() {
    let html = convert_with(
        vec![
            json!({ "insert": "x", "attributes": { "color": "#ff0000" } }),
            json!({ "insert": "\n", "attributes": { "align": "center" } }),
        ],
        ConverterOptions {
            inline_styles: Some(delta_html_engine::InlineStyles::default()),
            ..ConverterOptions::default()
        },
    );
    insta::assert_snapshot!(html, @r#"<p style="text-align:center"><span style="color:#ff0000">x</span></p>"#);
}

#[test]
fn mixed_document_renders_in_input_order() {
    let html = convert(vec![
        json!({ "insert": "Delta documents" }),
        json!({ "insert": "\n", "attributes": { "header": 1 } }),
        json!({ "insert": "An intro with " }),
        json!({ "insert": "bold", "attributes": { "bold": true } }),
        json!({ "insert": " and " }),
        json!({ "insert": "a link", "attributes": { "link": "https://example.com/docs" } }),
        json!({ "insert": ".\n" }),
        json!({ "insert": "first quote line" }),
        json!({ "insert": "\n", "attributes": { "blockquote": true } }),
        json!({ "insert": "second quote line" }),
        json!({ "insert": "\n", "attributes": { "blockquote": true } }),
        json!({ "insert": "item one" }),
        json!({ "insert": "\n", "attributes": { "list": "ordered" } }),
        json!({ "insert": "item two" }),
        json!({ "insert": "\n", "attributes": { "list": "ordered" } }),
        json!({ "insert": "nested" }),
        json!({ "insert": "\n", "attributes": { "list": "ordered", "indent": 1 } }),
        json!({ "insert": { "image": "https://example.com/pic.png" } }),
        json!({ "insert": "The end\n" }),
    ]);
    insta::assert_snapshot!(html, @r#"<h1>Delta documents</h1><p>An intro with <strong>bold</strong> and <a href="https://example.com/docs" target="_blank">a link</a>.</p><blockquote>first quote line<br/>second quote line</blockquote><ol><li>item one</li><li>item two<ol><li>nested</li></ol></li></ol><img class="ql-image" src="https://example.com/pic.png"/><p>The end</p>"#);
}

#[test]
fn retain_and_delete_records_are_ignored() {
    let html = DeltaHtmlConverter::from_json(
        r#"{"ops":[{"retain":3},{"insert":"kept\n"},{"delete":1}]}"#,
        ConverterOptions::default(),
    )
    .unwrap()
    .convert();
    assert_eq!(html, "<p>kept</p>");
}

#[test]
fn malformed_payloads_degrade_instead_of_failing() {
    let mut converter = DeltaHtmlConverter::new(
        vec![
            json!({ "insert": 42 }),
            json!({ "insert": "ok\n" }),
        ],
        ConverterOptions::default(),
    )
    .unwrap();
    converter.render_custom_with(|op, _| match &op.content {
        InsertContent::Custom(embed) => format!("[{}:{}]", embed.name, embed.value),
        _ => String::new(),
    });
    assert_eq!(converter.convert(), "<p>[unknown:42]ok</p>");
}
