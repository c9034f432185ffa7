//! Small helpers over the ast-grep node API and the raw source text

use ast_grep_core::source::StrDoc;
use ast_grep_core::Node;
use ast_grep_language::Go;
use std::ops::Range;

pub(crate) type GoNode<'r> = Node<'r, StrDoc<Go>>;

const STRING_LITERAL_KINDS: &[&str] = &["interpreted_string_literal", "raw_string_literal"];

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// All nodes under `node` (inclusive) in pre-order
pub(crate) fn descendants<'r>(node: &GoNode<'r>) -> Vec<GoNode<'r>> {
    let mut out = Vec::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        let children: Vec<GoNode<'r>> = current.children().collect();
        stack.extend(children.into_iter().rev());
        out.push(current);
    }
    out
}

pub(crate) fn is_string_literal(node: &GoNode<'_>) -> bool {
    let kind = node.kind();
    STRING_LITERAL_KINDS.iter().any(|k| kind == *k)
}

/// Value of a Go string literal (interpreted or raw).
///
/// Escape sequences are decoded the way the Go compiler reads them, so the
/// result is the string the program sees. Invalid escapes yield `None`.
pub(crate) fn unquote(literal: &str) -> Option<String> {
    let literal = literal.trim();
    if let Some(raw) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Some(raw.replace('\r', ""));
    }
    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    if !body.contains('\\') {
        return Some(body.to_string());
    }

    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let escaped = chars.next()?;
        let byte = match escaped {
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'n' => b'\n',
            'r' => b'\r',
            't' => b'\t',
            'v' => 0x0b,
            '\\' => b'\\',
            '"' => b'"',
            'x' => u8::try_from(digits(&mut chars, 2, 16)?).ok()?,
            '0'..='7' => {
                let high = escaped.to_digit(8)?;
                u8::try_from(high * 64 + digits(&mut chars, 2, 8)?).ok()?
            }
            'u' | 'U' => {
                let width = if escaped == 'u' { 4 } else { 8 };
                let code = digits(&mut chars, width, 16)?;
                let mut buf = [0; 4];
                out.extend_from_slice(char::from_u32(code)?.encode_utf8(&mut buf).as_bytes());
                continue;
            }
            _ => return None,
        };
        out.push(byte);
    }
    String::from_utf8(out).ok()
}

/// Value of the next `count` digits of an escape sequence
fn digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32) -> Option<u32> {
    (0..count).try_fold(0u32, |value, _| {
        let digit = chars.next()?.to_digit(radix)?;
        value.checked_mul(radix)?.checked_add(digit)
    })
}

/// Names declared at package level: functions, types, vars and consts
pub(crate) fn declared_names(root: &GoNode<'_>) -> Vec<String> {
    let mut names = Vec::new();
    for declaration in root.children() {
        match declaration.kind().as_ref() {
            "function_declaration" => {
                names.extend(declaration.field("name").map(|n| n.text().to_string()));
            }
            "type_declaration" | "var_declaration" | "const_declaration" => {
                let specs = declaration.children().flat_map(|child| {
                    if child.kind() == "var_spec_list" {
                        child.children().collect()
                    } else {
                        vec![child]
                    }
                });
                for spec in specs {
                    match spec.kind().as_ref() {
                        "type_spec" | "type_alias" => {
                            names.extend(spec.field("name").map(|n| n.text().to_string()));
                        }
                        "var_spec" | "const_spec" => names.extend(
                            spec.children()
                                .filter(|n| n.kind() == "identifier")
                                .map(|n| n.text().to_string()),
                        ),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    names
}

/// Leading whitespace of the line containing `offset`
pub(crate) fn line_indent(text: &str, offset: usize) -> &str {
    let start = text[..offset].rfind('\n').map_or(0, |nl| nl + 1);
    let line = &text[start..];
    let width = line.len() - line.trim_start_matches(&[' ', '\t'][..]).len();
    &line[..width]
}

/// Where to insert a new line after the construct ending at `offset`.
///
/// A trailing line comment stays attached to its construct, so the insertion
/// point moves to the end of the line when only a comment follows.
pub(crate) fn after_line(text: &str, offset: usize) -> usize {
    let rest = &text[offset..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let tail = rest[..line_end].trim();
    if tail.is_empty() || tail.starts_with("//") {
        offset + line_end
    } else {
        offset
    }
}

/// A single text replacement over the source
#[derive(Debug)]
pub(crate) struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

impl Edit {
    pub fn insert(at: usize, text: String) -> Self {
        Edit {
            range: at..at,
            text,
        }
    }

    pub fn replace(range: Range<usize>, text: String) -> Self {
        Edit { range, text }
    }

    pub fn apply(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len() + self.text.len());
        out.push_str(&source[..self.range.start]);
        out.push_str(&self.text);
        out.push_str(&source[self.range.end..]);
        out
    }
}

/// Whether `name` can be used as a Go package qualifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !GO_KEYWORDS.contains(&name)
}
