//! Property-based tests for the template engine using proptest.

use proptest::prelude::*;
use promptsmith_template::{parse, record, render, Node, Record, Variables};

// ============================================================================
// Strategies
// ============================================================================

// Text that never contains a tag opener.
fn literal_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 :\\-\n\"'#}{]{0,80}".prop_filter("no tag opener", |s| !s.contains("{{"))
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("reserved word", |s| s != "else")
}

fn item_strategy() -> impl Strategy<Value = Record> {
    ("[a-z]{0,6}", any::<bool>())
        .prop_map(|(name, on)| record! { "name" => name, "on" => on })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Text without `{{` renders to itself.
    #[test]
    fn literal_round_trip(text in literal_text()) {
        let nodes = parse(&text).unwrap();
        prop_assert_eq!(render(&nodes, &Variables::new()), text);
    }

    /// A bare variable renders exactly its bound string.
    #[test]
    fn variable_substitution(name in name_strategy(), value in "[^{}]{0,30}") {
        let template = format!("<{{{{{name}}}}}>");
        let vars = Variables::new().with(name.as_str(), value.as_str());
        prop_assert_eq!(render(&parse(&template).unwrap(), &vars), format!("<{value}>"));
    }

    /// `#unless` renders exactly when `#if` does not.
    #[test]
    fn unless_is_complement_of_if(flag in prop::option::of(any::<bool>()), text in "[a-z]{0,10}") {
        let mut vars = Variables::new();
        if let Some(flag) = flag {
            vars.set("flag", flag);
        }
        let with_if = render(&parse("{{#if flag}}A{{else}}B{{/if}}").unwrap(), &vars);
        let with_unless = render(&parse("{{#unless flag}}A{{else}}B{{/unless}}").unwrap(), &vars);
        prop_assert_ne!(&with_if, &with_unless);

        vars.set("flag", text.as_str());
        let if_text = render(&parse("{{#if flag}}A{{/if}}").unwrap(), &vars);
        let unless_text = render(&parse("{{#unless flag}}A{{/unless}}").unwrap(), &vars);
        prop_assert_eq!(format!("{if_text}{unless_text}"), "A");
    }

    /// A loop emits one rendering of its body per record and leaves the
    /// enclosing scope untouched.
    #[test]
    fn loop_isolation(items in prop::collection::vec(item_strategy(), 0..12)) {
        let vars = Variables::new()
            .with("name", "outer")
            .with("items", items.clone());
        let nodes = parse("{{#each items}}[{{@index_1}}{{name}}]{{/each}}{{name}}").unwrap();

        let expected: String = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let name = item.get("name").map(|v| v.to_output()).unwrap_or_default();
                format!("[{}{}]", i + 1, name)
            })
            .chain(std::iter::once("outer".to_string()))
            .collect();

        prop_assert_eq!(render(&nodes, &vars), expected);
    }

    /// Counting truthy flags through a conditional inside a loop.
    #[test]
    fn condition_in_loop_counts_truthy(items in prop::collection::vec(item_strategy(), 0..12)) {
        let vars = Variables::new().with("items", items.clone());
        let out = render(&parse("{{#each items}}{{#if on}}x{{/if}}{{/each}}").unwrap(), &vars);
        let truthy = items
            .iter()
            .filter(|r| r.get("on").is_some_and(|v| v.is_truthy()))
            .count();
        prop_assert_eq!(out.len(), truthy);
    }

    /// Parsing never panics, whatever the input.
    #[test]
    fn parse_never_panics(input in "\\PC{0,120}") {
        let _ = parse(&input);
    }

    /// Comments vanish no matter what they contain.
    #[test]
    fn comments_render_empty(body in "[a-z ]{0,20}") {
        let nodes = parse(&format!("a{{{{! {body} }}}}b")).unwrap();
        prop_assert!(nodes.iter().any(|n| matches!(n, Node::Comment(_))));
        prop_assert_eq!(render(&nodes, &Variables::new()), "ab");
    }
}
