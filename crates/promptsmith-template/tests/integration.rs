//! End-to-end tests: parse and render realistic prompt fragments.

use std::collections::HashMap;

use promptsmith_template::{parse, record, render, ParseError, Renderer, Variables};

const PANELS: &str = r#"panels:
{{#each panels}}
  - panel: {{@index_1}}
    scene: "{{scene}}"
{{#if speech}}
    speech: "{{speech}}"
{{else}}
    speech: none
{{/if}}
{{/each}}
"#;

#[test]
fn renders_panel_list() {
    let vars = Variables::new().with(
        "panels",
        vec![
            record! { "scene" => "dawn", "speech" => "hello" },
            record! { "scene" => "dusk", "speech" => "" },
        ],
    );
    let out = render(&parse(PANELS).unwrap(), &vars);
    assert_eq!(
        out,
        "panels:\n\n  - panel: 1\n    scene: \"dawn\"\n\n    speech: \"hello\"\n\n\n  - panel: 2\n    scene: \"dusk\"\n\n    speech: none\n\n\n"
    );
}

#[test]
fn header_with_optional_fields() {
    let template = "title: \"{{title}}\"\n{{#if author}}author: \"{{author}}\"\n{{/if}}{{#unless color}}color: monochrome\n{{/unless}}";
    let nodes = parse(template).unwrap();

    let full = Variables::new()
        .with("title", "Demo")
        .with("author", "Aki")
        .with("color", true);
    assert_eq!(render(&nodes, &full), "title: \"Demo\"\nauthor: \"Aki\"\n");

    let bare = Variables::new().with("title", "Demo");
    assert_eq!(render(&nodes, &bare), "title: \"Demo\"\ncolor: monochrome\n");
}

#[test]
fn partials_share_scope_and_nest() {
    let mut partials = HashMap::new();
    partials.insert(
        "character".to_string(),
        "- name: {{name}}\n{{> trait label=\"role\" value=role}}".to_string(),
    );
    partials.insert("trait".to_string(), "  {{label}}: {{value}}\n".to_string());

    let vars = Variables::new().with(
        "characters",
        vec![
            record! { "name" => "Aki", "role" => "lead" },
            record! { "name" => "Ren", "role" => "rival" },
        ],
    );
    let out = Renderer::with_partials(&partials)
        .render_str("{{#each characters}}{{> character}}{{/each}}", &vars)
        .unwrap();
    // Parameter values are literals, never variable references.
    assert_eq!(
        out,
        "- name: Aki\n  role: role\n- name: Ren\n  role: role\n"
    );
}

#[test]
fn parse_errors_carry_lines() {
    let err = parse("a: 1\nb: {{#each items}}\n  - {{name}}\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnclosedBlock {
            directive: "each",
            line: 2
        }
    );

    let err = parse("a\nb\nc {{ oops").unwrap_err();
    assert_eq!(err.line(), 3);
}

#[test]
fn raw_and_escaped_forms_match() {
    let vars = Variables::new().with("path", "C:\\img\\\"x\".png");
    let a = render(&parse("{{path}}").unwrap(), &vars);
    let b = render(&parse("{{{path}}}").unwrap(), &vars);
    assert_eq!(a, b);
    assert_eq!(a, "C:\\img\\\"x\".png");
}
