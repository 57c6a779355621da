use super::AbbreviationError;
use super::parser::{Element, Node, NodeKind};

/// Upper bound for the number of rendered elements.
pub const MAX_ELEMENTS: usize = 10_000;

const INDENT: &str = "  ";

const VOID_ELEMENTS: [&str; 8] = ["area", "br", "col", "hr", "img", "input", "link", "meta"];

const INLINE_ELEMENTS: [&str; 14] = [
    "a", "abbr", "b", "code", "em", "i", "label", "q", "small", "span", "strong", "sub", "sup",
    "button",
];

/// Position within the nearest repeated ancestor, used for `$` numbering.
#[derive(Debug, Clone, Copy)]
struct Numbering {
    index: u32,
    count: u32,
}

impl Numbering {
    const SINGLE: Numbering = Numbering { index: 0, count: 1 };
}

pub(crate) fn render(nodes: &[Node]) -> Result<String, AbbreviationError> {
    let mut renderer = Renderer {
        lines: Vec::new(),
        elements: 0,
    };
    renderer.nodes(nodes, None, 0, Numbering::SINGLE)?;
    Ok(renderer.lines.join("\n"))
}

struct Renderer {
    lines: Vec<String>,
    elements: usize,
}

impl Renderer {
    fn nodes(
        &mut self,
        nodes: &[Node],
        parent: Option<&str>,
        depth: usize,
        numbering: Numbering,
    ) -> Result<(), AbbreviationError> {
        for node in nodes {
            for index in 0..node.repeat {
                let numbering = if node.repeat > 1 {
                    Numbering {
                        index,
                        count: node.repeat,
                    }
                } else {
                    numbering
                };
                match &node.kind {
                    NodeKind::Group(children) => self.nodes(children, parent, depth, numbering)?,
                    NodeKind::Element(element) => self.element(element, parent, depth, numbering)?,
                }
            }
        }
        Ok(())
    }

    fn element(
        &mut self,
        element: &Element,
        parent: Option<&str>,
        depth: usize,
        numbering: Numbering,
    ) -> Result<(), AbbreviationError> {
        self.elements += 1;
        if self.elements > MAX_ELEMENTS {
            return Err(AbbreviationError::TooLarge {
                limit: MAX_ELEMENTS,
            });
        }

        let indent = INDENT.repeat(depth);
        let text = element
            .text
            .as_deref()
            .map(|t| substitute(t, numbering))
            .transpose()?
            .unwrap_or_default();

        if element.is_text_only() {
            self.lines.push(format!("{indent}{text}"));
            return Ok(());
        }

        let tag = match &element.name {
            Some(name) => substitute(name, numbering)?,
            None => implicit_tag(parent).to_string(),
        };
        let mut open = format!("{indent}<{tag}");
        for attr in &element.attributes {
            let name = substitute(&attr.name, numbering)?;
            let value = attr
                .value
                .as_deref()
                .map(|v| substitute(v, numbering))
                .transpose()?
                .unwrap_or_default();
            open.push_str(&format!(" {name}=\"{value}\""));
        }
        open.push('>');

        if element.children.is_empty() {
            if VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str()) && text.is_empty() {
                self.lines.push(open);
            } else {
                self.lines.push(format!("{open}{text}</{tag}>"));
            }
            return Ok(());
        }

        self.lines.push(format!("{open}{text}"));
        self.nodes(&element.children, Some(tag.as_str()), depth + 1, numbering)?;
        self.lines.push(format!("{indent}</{tag}>"));
        Ok(())
    }
}

/// Tag used for an element written without a name, chosen by its parent.
fn implicit_tag(parent: Option<&str>) -> &'static str {
    let Some(parent) = parent.map(str::to_ascii_lowercase) else {
        return "div";
    };
    match parent.as_str() {
        "ul" | "ol" => "li",
        "table" | "tbody" | "thead" | "tfoot" => "tr",
        "tr" => "td",
        "select" | "optgroup" => "option",
        p if INLINE_ELEMENTS.contains(&p) => "span",
        _ => "div",
    }
}

/// Replace `$` runs with the current number.
///
/// `$$` pads to two digits, `$@3` starts counting at 3 and `$@-` counts down.
fn substitute(template: &str, numbering: Numbering) -> Result<String, AbbreviationError> {
    if !template.contains('$') {
        return Ok(template.to_string());
    }

    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '$' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let mut width: usize = 0;
        while i < chars.len() && chars[i] == '$' {
            width += 1;
            i += 1;
        }

        let mut descending = false;
        let mut base: u32 = 1;
        if chars.get(i) == Some(&'@') {
            i += 1;
            if chars.get(i) == Some(&'-') {
                descending = true;
                i += 1;
            }
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i > start {
                let digits: String = chars[start..i].iter().collect();
                base = digits
                    .parse()
                    .map_err(|_| AbbreviationError::InvalidNumbering { raw: digits })?;
            }
        }

        let offset = if descending {
            numbering.count - 1 - numbering.index
        } else {
            numbering.index
        };
        let value = u64::from(base) + u64::from(offset);
        out.push_str(&format!("{value:0width$}"));
    }

    Ok(out)
}
