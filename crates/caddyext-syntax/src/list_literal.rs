use std::ops::Range;

use crate::tree::{self, descendants, is_string_literal, GoNode};

const PUNCTUATION_KINDS: &[&str] = &["{", "}", ",", "comment"];

/// A package-level `var <name> = []T{ ... }` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLiteral {
    pub name: String,
    pub elements: Vec<ListElement>,
    /// Byte range of the `{ ... }` body, braces included
    pub body: Range<usize>,
    /// End offset of a `,` following the last element, if any
    pub trailing_comma: Option<usize>,
}

/// One element of a list literal, e.g. `{"gzip", gzip.Setup}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListElement {
    pub text: String,
    pub range: Range<usize>,
    /// First string literal inside the element, unquoted
    pub label: Option<String>,
    /// Package qualifier of the first `pkg.Symbol` reference inside the element
    pub qualifier: Option<String>,
}

pub(crate) fn find(root: &GoNode<'_>, name: &str) -> Option<ListLiteral> {
    let spec = descendants(root).into_iter().find(|n| {
        n.kind() == "var_spec"
            && n
                .children()
                .any(|c| c.kind() == "identifier" && c.text() == name)
    })?;
    let body = descendants(&spec)
        .into_iter()
        .find(|n| n.kind() == "literal_value")?;

    let mut elements = Vec::new();
    let mut trailing_comma = None;
    for child in body.children() {
        let kind = child.kind();
        if kind == "," {
            if !elements.is_empty() {
                trailing_comma = Some(child.range().end);
            }
            continue;
        }
        if PUNCTUATION_KINDS.iter().any(|k| kind == *k) {
            continue;
        }
        trailing_comma = None;
        elements.push(read_element(&child));
    }

    Some(ListLiteral {
        name: name.to_string(),
        elements,
        body: body.range(),
        trailing_comma,
    })
}

fn read_element(node: &GoNode<'_>) -> ListElement {
    let nodes = descendants(node);
    let label = nodes
        .iter()
        .find(|n| is_string_literal(n))
        .and_then(|n| tree::unquote(&n.text()));
    let qualifier = nodes.iter().find_map(|n| {
        let kind = n.kind();
        if kind == "selector_expression" {
            n.field("operand").map(|operand| operand.text().to_string())
        } else if kind == "qualified_type" {
            n.field("package").map(|package| package.text().to_string())
        } else {
            None
        }
    });
    ListElement {
        text: node.text().to_string(),
        range: node.range(),
        label,
        qualifier,
    }
}

/// Edit appending `element` to `list`, following the list's existing layout
pub(crate) fn append_edit(text: &str, list: &ListLiteral, element: &str) -> tree::Edit {
    let open_end = list.body.start + 1;
    let close_start = list.body.end - 1;
    match list.elements.last() {
        None => {
            let indent = tree::line_indent(text, list.body.start);
            if text[open_end..close_start].trim().is_empty() {
                tree::Edit::replace(
                    open_end..close_start,
                    format!("\n{indent}\t{element},\n{indent}"),
                )
            } else {
                tree::Edit::insert(close_start, format!("\t{element},\n{indent}"))
            }
        }
        Some(last) => match list.trailing_comma {
            Some(comma_end) => {
                let indent = tree::line_indent(text, last.range.start);
                tree::Edit::insert(
                    tree::after_line(text, comma_end),
                    format!("\n{indent}{element},"),
                )
            }
            None => tree::Edit::insert(last.range.end, format!(", {element}")),
        },
    }
}
