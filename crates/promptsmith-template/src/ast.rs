//! Node tree produced by the parser.

/// A parsed template: an ordered list of nodes.
pub type Template = Vec<Node>;

/// One node of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal output.
    Text(String),
    /// `{{name}}` substitution.
    Variable(String),
    /// `{{{name}}}` substitution. Resolves exactly like [`Node::Variable`].
    RawVariable(String),
    /// `{{#if}}` / `{{#unless}}` block.
    Condition(Condition),
    /// `{{#each}}` block.
    Loop(Loop),
    /// `{{> name key="value"}}` inclusion.
    Partial(Partial),
    /// `{{! text}}`. Never rendered.
    Comment(String),
}

/// A conditional block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Variable name or dotted path tested for truthiness.
    pub expression: String,
    /// `true` for `#unless`.
    pub negated: bool,
    pub then_branch: Vec<Node>,
    /// Present only when the block had an `{{else}}`.
    pub else_branch: Option<Vec<Node>>,
}

/// A loop over a list of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    /// Variable name or dotted path of the list.
    pub collection: String,
    pub body: Vec<Node>,
}

/// Inclusion of another named template with literal parameter overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    pub name: String,
    /// `key="value"` pairs in source order.
    pub params: Vec<(String, String)>,
}

impl Node {
    /// Shorthand for a [`Node::Text`].
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    /// Shorthand for a [`Node::Variable`].
    pub fn var(name: impl Into<String>) -> Self {
        Node::Variable(name.into())
    }

    /// Returns `true` when this node, or any node nested in it, matches `pred`.
    pub fn any(&self, pred: &impl Fn(&Node) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        match self {
            Node::Condition(c) => {
                c.then_branch.iter().any(|n| n.any(pred))
                    || c.else_branch
                        .as_ref()
                        .is_some_and(|b| b.iter().any(|n| n.any(pred)))
            }
            Node::Loop(l) => l.body.iter().any(|n| n.any(pred)),
            _ => false,
        }
    }
}

/// Collects the names of every partial referenced anywhere in `nodes`.
pub fn partial_names(nodes: &[Node]) -> Vec<&str> {
    let mut names = Vec::new();
    collect_partials(nodes, &mut names);
    names
}

fn collect_partials<'a>(nodes: &'a [Node], names: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            Node::Partial(p) => names.push(&p.name),
            Node::Condition(c) => {
                collect_partials(&c.then_branch, names);
                if let Some(else_branch) = &c.else_branch {
                    collect_partials(else_branch, names);
                }
            }
            Node::Loop(l) => collect_partials(&l.body, names),
            _ => {}
        }
    }
}
