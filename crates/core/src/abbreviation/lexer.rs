use super::AbbreviationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Element name, class or id body, or a multiplier count.
    Name(String),
    Dot,
    Hash,
    Child,
    Sibling,
    Climb,
    Star,
    Open,
    Close,
    /// Raw contents of `[...]`.
    Attributes(String),
    /// Raw contents of `{...}`.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Character offset of the token in the abbreviation.
    pub pos: usize,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '$' | '@' | '!')
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, AbbreviationError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let pos = i;
        let kind = match c {
            '.' => TokenKind::Dot,
            '#' => TokenKind::Hash,
            '>' => TokenKind::Child,
            '+' => TokenKind::Sibling,
            '^' => TokenKind::Climb,
            '*' => TokenKind::Star,
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            '[' => {
                let (body, end) = read_attributes(&chars, i)?;
                i = end;
                tokens.push(Token {
                    kind: TokenKind::Attributes(body),
                    pos,
                });
                continue;
            }
            '{' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&c| c == '}')
                    .map(|offset| i + 1 + offset)
                    .ok_or(AbbreviationError::Unterminated { open: '{', pos })?;
                let body: String = chars[i + 1..end].iter().collect();
                i = end + 1;
                tokens.push(Token {
                    kind: TokenKind::Text(body),
                    pos,
                });
                continue;
            }
            c if is_name_char(c) => {
                let start = i;
                while i < chars.len() && is_name_char(chars[i]) {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Name(chars[start..i].iter().collect()),
                    pos,
                });
                continue;
            }
            other => return Err(AbbreviationError::UnexpectedChar { ch: other, pos }),
        };
        tokens.push(Token { kind, pos });
        i += 1;
    }

    Ok(tokens)
}

/// Read `[...]` starting at `open`, honouring quoted values.
/// Returns the body and the index just past `]`.
fn read_attributes(chars: &[char], open: usize) -> Result<(String, usize), AbbreviationError> {
    let mut quote: Option<char> = None;
    let mut i = open + 1;
    while i < chars.len() {
        let c = chars[i];
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == ']' => {
                let body = chars[open + 1..i].iter().collect();
                return Ok((body, i + 1));
            }
            None => {}
        }
        i += 1;
    }
    Err(AbbreviationError::Unterminated { open: '[', pos: open })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn splits_operators_and_names() {
        assert_eq!(
            kinds("ul>li.item$*3"),
            vec![
                TokenKind::Name("ul".into()),
                TokenKind::Child,
                TokenKind::Name("li".into()),
                TokenKind::Dot,
                TokenKind::Name("item$".into()),
                TokenKind::Star,
                TokenKind::Name("3".into()),
            ]
        );
    }

    #[test]
    fn brackets_keep_quoted_closers() {
        assert_eq!(
            kinds("a[title='x]y']"),
            vec![
                TokenKind::Name("a".into()),
                TokenKind::Attributes("title='x]y'".into()),
            ]
        );
    }

    #[test]
    fn text_may_contain_operators() {
        assert_eq!(
            kinds("p{a > b + c}"),
            vec![TokenKind::Name("p".into()), TokenKind::Text("a > b + c".into())]
        );
    }

    #[test]
    fn unterminated_text_is_reported() {
        let err = tokenize("p{oops").unwrap_err();
        assert_eq!(err, AbbreviationError::Unterminated { open: '{', pos: 1 });
    }

    #[test]
    fn whitespace_outside_brackets_is_rejected() {
        let err = tokenize("div > p").unwrap_err();
        assert_eq!(err, AbbreviationError::UnexpectedChar { ch: ' ', pos: 3 });
    }
}
