use proptest::prelude::*;

use promptsmith::{escape_yaml, newlines_to_comma, prune_empty_fields};

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,8}"
}

/// A small YAML-ish document: indented keys, some with empty values.
fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (0usize..3, key(), prop_oneof!["", "\"\"", "''", "\"x\"", "1"]),
        0..12,
    )
    .prop_map(|lines| {
        lines
            .into_iter()
            .map(|(depth, key, value)| {
                let indent = "  ".repeat(depth);
                if value.is_empty() {
                    format!("{indent}{key}:")
                } else {
                    format!("{indent}{key}: {value}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

proptest! {
    #[test]
    fn escaped_text_survives_a_double_quoted_scalar(s in "[ -~]{0,40}") {
        let yaml = format!("\"{}\"", escape_yaml(&s));
        let parsed: String = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, s);
    }

    #[test]
    fn folded_text_is_one_line(s in "[a-z \n\t]{0,60}") {
        let folded = newlines_to_comma(&s);
        prop_assert!(!folded.contains('\n'));
        prop_assert!(!folded.starts_with(' '));
    }

    #[test]
    fn pruned_documents_have_no_empty_values(doc in document()) {
        let pruned = prune_empty_fields(&doc);
        for line in pruned.lines() {
            let trimmed = line.trim();
            prop_assert!(!trimmed.ends_with(": \"\"") && !trimmed.ends_with(": ''"), "{}", line);
        }
    }

    #[test]
    fn pruning_keeps_valued_leaves_in_order(doc in document()) {
        let pruned = prune_empty_fields(&doc);
        let lines: Vec<&str> = doc.lines().collect();
        let leaves = lines.iter().enumerate().filter(|(i, line)| {
            let valued = line.ends_with("\"x\"") || line.ends_with(": 1");
            let deeper_next = lines.get(i + 1).is_some_and(|next| indent(next) > indent(line));
            valued && !deeper_next
        });

        let mut remaining = pruned.lines();
        for (_, leaf) in leaves {
            prop_assert!(remaining.any(|line| line == *leaf), "lost {}", leaf);
        }
    }
}
