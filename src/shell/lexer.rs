use miette::SourceSpan;

use super::error::CommandError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'a> {
    /// A bare run of characters, e.g. `users`, `age:int`, `-5`.
    Word(&'a str),
    /// A quoted string, quotes included, e.g. `"Sergei"`.
    Quoted(&'a str),

    Comma,
    Equal,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
    pub len: usize,
}

impl Token<'_> {
    pub fn span(&self) -> SourceSpan {
        (self.offset, self.len).into()
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Splits a command line into tokens.
///
/// Quotes are kept on quoted tokens so that literal parsing can tell
/// `"42"` (text) from `42` (integer).
pub(crate) struct Lexer<'a> {
    pub whole: &'a str,
    pub rest: &'a str,
    pub position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            whole: input,
            rest: input,
            position: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        let non_whitespace_pos = self
            .rest
            .char_indices()
            .find(|(_, ch)| !ch.is_whitespace())
            .map(|(pos, _)| pos)
            .unwrap_or(self.rest.len());

        self.advance(non_whitespace_pos);
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let taken = &self.rest[..len];
        self.position += len;
        self.rest = &self.rest[len..];
        taken
    }

    fn consume_word(&mut self) -> &'a str {
        let word_end = self
            .rest
            .find(|c: char| c.is_whitespace() || matches!(c, ',' | '=' | '(' | ')'))
            .unwrap_or(self.rest.len());

        self.advance(word_end)
    }

    fn consume_string(&mut self, closing: char) -> Result<&'a str, CommandError> {
        let start = self.position;
        let Some(close) = self.rest[1..].find(closing) else {
            let len = self.rest.len();
            self.advance(len);
            return Err(CommandError::new(
                self.whole,
                (start, len),
                format!("unterminated {closing} quote"),
            ));
        };

        Ok(self.advance(close + 2))
    }

    fn punct(&mut self, kind: TokenKind<'a>) -> Token<'a> {
        let offset = self.position;
        self.advance(1);
        Token {
            kind,
            offset,
            len: 1,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, CommandError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        let char = self.rest.chars().next()?;
        let offset = self.position;

        let token = match char {
            ',' => Ok(self.punct(TokenKind::Comma)),
            '=' => Ok(self.punct(TokenKind::Equal)),
            '(' => Ok(self.punct(TokenKind::LeftParen)),
            ')' => Ok(self.punct(TokenKind::RightParen)),
            '"' | '\'' => self.consume_string(char).map(|text| Token {
                kind: TokenKind::Quoted(text),
                offset,
                len: text.len(),
            }),
            _ => {
                let word = self.consume_word();
                Ok(Token {
                    kind: TokenKind::Word(word),
                    offset,
                    len: word.len(),
                })
            }
        };

        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        Lexer::new(input).map(|t| t.unwrap().kind).collect()
    }

    #[test]
    fn test_lexer_words() {
        assert_eq!(
            kinds("create_table users name:str age:int"),
            vec![
                TokenKind::Word("create_table"),
                TokenKind::Word("users"),
                TokenKind::Word("name:str"),
                TokenKind::Word("age:int"),
            ]
        );
    }

    #[test]
    fn test_lexer_with_spaces() {
        assert_eq!(
            kinds("   list_tables    "),
            vec![TokenKind::Word("list_tables")]
        );
        assert!(kinds("   ").is_empty());
    }

    #[test]
    fn test_lexer_insert_values() {
        assert_eq!(
            kinds(r#"insert into users values ("Sergei", 28)"#),
            vec![
                TokenKind::Word("insert"),
                TokenKind::Word("into"),
                TokenKind::Word("users"),
                TokenKind::Word("values"),
                TokenKind::LeftParen,
                TokenKind::Quoted("\"Sergei\""),
                TokenKind::Comma,
                TokenKind::Word("28"),
                TokenKind::RightParen,
            ]
        );
    }

    #[test]
    fn test_lexer_where_without_spaces() {
        assert_eq!(
            kinds("where age=28"),
            vec![
                TokenKind::Word("where"),
                TokenKind::Word("age"),
                TokenKind::Equal,
                TokenKind::Word("28"),
            ]
        );
    }

    #[test]
    fn test_lexer_quoted_keeps_inner_separators() {
        assert_eq!(
            kinds("'a, b = (c)' x"),
            vec![TokenKind::Quoted("'a, b = (c)'"), TokenKind::Word("x")]
        );
    }

    #[test]
    fn test_lexer_spans() {
        let tokens: Vec<_> = Lexer::new("info  users").map(Result::unwrap).collect();
        assert_eq!((tokens[1].offset, tokens[1].len), (6, 5));
        assert_eq!(tokens[1].end(), 11);
    }

    #[test]
    fn test_lexer_unterminated_quote() {
        let mut lexer = Lexer::new("select \"oops");
        assert!(lexer.next().unwrap().is_ok());

        let err = lexer.next().unwrap().unwrap_err();
        assert_eq!(err.message, "unterminated \" quote");
        assert!(lexer.next().is_none());
    }
}
