use super::AbbreviationError;
use super::lexer::{Token, TokenKind};

/// Upper bound for a single `*N` multiplier.
pub const MAX_REPEAT: u32 = 1000;

/// Upper bound for element and group nesting.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    /// `None` means the tag is implied by the parent.
    pub name: Option<String>,
    pub attributes: Vec<Attribute>,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    fn add_class(&mut self, class: &str) {
        match self.attributes.iter_mut().find(|a| a.name == "class") {
            Some(Attribute {
                value: Some(existing),
                ..
            }) => {
                existing.push(' ');
                existing.push_str(class);
            }
            Some(attr) => attr.value = Some(class.to_string()),
            None => self.attributes.push(Attribute {
                name: "class".into(),
                value: Some(class.to_string()),
            }),
        }
    }

    fn set_attribute(&mut self, name: String, value: Option<String>) {
        if name == "class"
            && let Some(value) = &value
        {
            self.add_class(value);
            return;
        }
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// A bare `{text}` with nothing else renders as a text node.
    pub fn is_text_only(&self) -> bool {
        self.name.is_none()
            && self.attributes.is_empty()
            && self.children.is_empty()
            && self.text.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Element(Element),
    Group(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub repeat: u32,
}

impl Node {
    fn children_mut(&mut self) -> &mut Vec<Node> {
        match &mut self.kind {
            NodeKind::Element(element) => &mut element.children,
            NodeKind::Group(children) => children,
        }
    }
}

/// Build the element tree from a token stream.
pub(crate) fn parse(tokens: &[Token]) -> Result<Vec<Node>, AbbreviationError> {
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    parser.chain(false)
}

struct Parser<'a> {
    tokens: &'a [Token],
    cursor: usize,
    /// Open parents and groups enclosing the current item.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.cursor).map(|t| &t.kind)
    }

    fn pos(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.pos)
    }

    fn bump(&mut self) {
        self.cursor += 1;
    }

    fn descend(&mut self) -> Result<(), AbbreviationError> {
        if self.depth >= MAX_DEPTH {
            return Err(AbbreviationError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self, stack: &mut Vec<Node>) {
        if close_top(stack) {
            self.depth -= 1;
        }
    }

    fn unexpected(&self) -> AbbreviationError {
        match self.tokens.get(self.cursor) {
            Some(token) => AbbreviationError::UnexpectedToken {
                found: describe(&token.kind),
                pos: token.pos,
            },
            None => AbbreviationError::UnexpectedEnd,
        }
    }

    /// Parse items joined by `>`, `+` and `^` until end of input, or until the
    /// matching `)` when `in_group` is set.
    fn chain(&mut self, in_group: bool) -> Result<Vec<Node>, AbbreviationError> {
        // stack[0] collects top-level nodes; deeper entries are open parents.
        let mut stack = vec![Node {
            kind: NodeKind::Group(Vec::new()),
            repeat: 1,
        }];

        loop {
            let item = self.item()?;
            if let Some(top) = stack.last_mut() {
                top.children_mut().push(item);
            }

            match self.peek() {
                None if in_group => {
                    return Err(AbbreviationError::UnbalancedGroup { pos: self.pos() });
                }
                None => break,
                Some(TokenKind::Close) if in_group => {
                    self.bump();
                    break;
                }
                Some(TokenKind::Child) => {
                    let pos = self.pos();
                    self.bump();
                    let parent = stack
                        .last_mut()
                        .and_then(|top| top.children_mut().pop())
                        .ok_or(AbbreviationError::UnexpectedEnd)?;
                    if matches!(parent.kind, NodeKind::Group(_)) {
                        return Err(AbbreviationError::ChildOfGroup { pos });
                    }
                    self.descend()?;
                    stack.push(parent);
                }
                Some(TokenKind::Sibling) => self.bump(),
                Some(TokenKind::Climb) => {
                    while matches!(self.peek(), Some(TokenKind::Climb)) {
                        self.bump();
                        self.ascend(&mut stack);
                    }
                }
                Some(_) => return Err(self.unexpected()),
            }
        }

        while stack.len() > 1 {
            self.ascend(&mut stack);
        }
        match stack.pop() {
            Some(Node {
                kind: NodeKind::Group(nodes),
                ..
            }) => Ok(nodes),
            _ => Err(AbbreviationError::UnexpectedEnd),
        }
    }

    fn item(&mut self) -> Result<Node, AbbreviationError> {
        match self.peek() {
            Some(TokenKind::Open) => {
                self.bump();
                self.descend()?;
                let children = self.chain(true)?;
                self.depth -= 1;
                let repeat = self.multiplier()?;
                Ok(Node {
                    kind: NodeKind::Group(children),
                    repeat,
                })
            }
            Some(
                TokenKind::Name(_)
                | TokenKind::Dot
                | TokenKind::Hash
                | TokenKind::Attributes(_)
                | TokenKind::Text(_),
            ) => self.element(),
            _ => Err(self.unexpected()),
        }
    }

    fn element(&mut self) -> Result<Node, AbbreviationError> {
        let mut element = Element::default();

        if let Some(TokenKind::Name(name)) = self.peek() {
            element.name = Some(name.clone());
            self.bump();
        }

        loop {
            match self.peek() {
                Some(TokenKind::Dot) => {
                    self.bump();
                    let class = self.name()?;
                    element.add_class(&class);
                }
                Some(TokenKind::Hash) => {
                    self.bump();
                    let id = self.name()?;
                    element.set_attribute("id".into(), Some(id));
                }
                Some(TokenKind::Attributes(raw)) => {
                    let pos = self.pos();
                    let attributes = parse_attributes(raw, pos)?;
                    self.bump();
                    for attr in attributes {
                        element.set_attribute(attr.name, attr.value);
                    }
                }
                Some(TokenKind::Text(text)) => {
                    element.text.get_or_insert_with(String::new).push_str(text);
                    self.bump();
                }
                _ => break,
            }
        }

        let repeat = self.multiplier()?;
        Ok(Node {
            kind: NodeKind::Element(element),
            repeat,
        })
    }

    fn name(&mut self) -> Result<String, AbbreviationError> {
        match self.peek() {
            Some(TokenKind::Name(name)) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn multiplier(&mut self) -> Result<u32, AbbreviationError> {
        if !matches!(self.peek(), Some(TokenKind::Star)) {
            return Ok(1);
        }
        self.bump();
        let raw = self.name()?;
        match raw.parse::<u32>() {
            Ok(n) if (1..=MAX_REPEAT).contains(&n) => Ok(n),
            _ => Err(AbbreviationError::InvalidMultiplier { raw }),
        }
    }
}

/// Attach the innermost open parent to its own parent. Returns whether one
/// was closed; `^` past the top level is a no-op.
fn close_top(stack: &mut Vec<Node>) -> bool {
    if stack.len() < 2 {
        return false;
    }
    match stack.pop() {
        Some(node) => {
            if let Some(parent) = stack.last_mut() {
                parent.children_mut().push(node);
            }
            true
        }
        None => false,
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Name(name) => name.clone(),
        TokenKind::Dot => ".".into(),
        TokenKind::Hash => "#".into(),
        TokenKind::Child => ">".into(),
        TokenKind::Sibling => "+".into(),
        TokenKind::Climb => "^".into(),
        TokenKind::Star => "*".into(),
        TokenKind::Open => "(".into(),
        TokenKind::Close => ")".into(),
        TokenKind::Attributes(raw) => format!("[{raw}]"),
        TokenKind::Text(raw) => format!("{{{raw}}}"),
    }
}

/// Split `name=value name2="v w" flag` into attributes.
fn parse_attributes(raw: &str, pos: usize) -> Result<Vec<Attribute>, AbbreviationError> {
    let chars: Vec<char> = raw.chars().collect();
    let mut attributes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '=' {
            i += 1;
        }
        let name: String = chars[start..i].iter().collect();
        if name.is_empty() || name.starts_with(['"', '\'']) {
            return Err(AbbreviationError::InvalidAttribute { pos });
        }

        if i < chars.len() && chars[i] == '=' {
            i += 1;
            let value = match chars.get(i) {
                Some(&q) if q == '"' || q == '\'' => {
                    let close = chars[i + 1..]
                        .iter()
                        .position(|&c| c == q)
                        .map(|offset| i + 1 + offset)
                        .ok_or(AbbreviationError::InvalidAttribute { pos })?;
                    let value: String = chars[i + 1..close].iter().collect();
                    i = close + 1;
                    value
                }
                _ => {
                    let start = i;
                    while i < chars.len() && !chars[i].is_whitespace() {
                        i += 1;
                    }
                    chars[start..i].iter().collect()
                }
            };
            attributes.push(Attribute {
                name,
                value: Some(value),
            });
        } else {
            attributes.push(Attribute { name, value: None });
        }
    }

    Ok(attributes)
}
