use std::iter::Peekable;

use super::{
    error::CommandError,
    keyword::Keyword,
    lexer::{Lexer, Token, TokenKind},
};
use crate::{
    core::types::{Value, parse_literal},
    db::filter::{Assignments, Filter},
};

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateTable { name: String, columns: Vec<String> },
    DropTable { name: String },
    ListTables,
    Insert { table: String, values: Vec<Value> },
    Select { table: String, filter: Option<Filter> },
    Update { table: String, set: Assignments, filter: Filter },
    Delete { table: String, filter: Filter },
    Info { table: String },
    Help,
    Exit,
}

impl Command {
    /// Parses a command line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        CommandParser::new(line).parse()
    }

    /// The command's keyword, e.g. `insert`.
    pub fn name(&self) -> &'static str {
        let keyword = match self {
            Command::CreateTable { .. } => Keyword::CreateTable,
            Command::DropTable { .. } => Keyword::DropTable,
            Command::ListTables => Keyword::ListTables,
            Command::Insert { .. } => Keyword::Insert,
            Command::Select { .. } => Keyword::Select,
            Command::Update { .. } => Keyword::Update,
            Command::Delete { .. } => Keyword::Delete,
            Command::Info { .. } => Keyword::Info,
            Command::Help => Keyword::Help,
            Command::Exit => Keyword::Exit,
        };
        keyword.into()
    }

    /// Whether running the command changes stored state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::CreateTable { .. }
                | Command::DropTable { .. }
                | Command::Insert { .. }
                | Command::Update { .. }
                | Command::Delete { .. }
        )
    }
}

/// Recursive descent over the token stream of a single line.
struct CommandParser<'src> {
    src: &'src str,
    lexer: Peekable<Lexer<'src>>,
}

impl<'src> CommandParser<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            lexer: Lexer::new(src).peekable(),
        }
    }

    fn parse(&mut self) -> Result<Option<Command>, CommandError> {
        let Some(token) = self.next_token().transpose()? else {
            return Ok(None);
        };

        let keyword = match token.kind {
            TokenKind::Word(word) => word.parse::<Keyword>().ok(),
            _ => None,
        };

        let command = match keyword.filter(|keyword| keyword.is_command()) {
            Some(Keyword::CreateTable) => self.parse_create_table()?,
            Some(Keyword::DropTable) => Command::DropTable {
                name: self.expect_table_name()?,
            },
            Some(Keyword::ListTables) => Command::ListTables,
            Some(Keyword::Insert) => self.parse_insert()?,
            Some(Keyword::Select) => self.parse_select()?,
            Some(Keyword::Update) => self.parse_update()?,
            Some(Keyword::Delete) => self.parse_delete()?,
            Some(Keyword::Info) => Command::Info {
                table: self.expect_table_name()?,
            },
            Some(Keyword::Help) => Command::Help,
            Some(Keyword::Exit) => Command::Exit,
            _ => {
                let name = &self.src[token.offset..token.end()];
                return Err(self
                    .error(token.span(), format!("Unknown command: {name}"))
                    .with_help("type `help` to list commands"));
            }
        };

        self.expect_end()?;
        Ok(Some(command))
    }

    fn parse_create_table(&mut self) -> Result<Command, CommandError> {
        let name = self.expect_table_name()?;

        let mut columns = Vec::new();
        while let Some(token) = self.next_token().transpose()? {
            match token.kind {
                TokenKind::Word(spec) => columns.push(spec.to_string()),
                _ => return Err(self.error(token.span(), "expected a column spec like `age:int`")),
            }
        }

        if columns.is_empty() {
            return Err(self
                .error(self.end_span(), "expected at least one column")
                .with_help("create_table <name> <column:type> ..."));
        }

        Ok(Command::CreateTable { name, columns })
    }

    fn parse_insert(&mut self) -> Result<Command, CommandError> {
        self.expect_keyword(Keyword::Into)?;
        let table = self.expect_table_name()?;
        self.expect_keyword(Keyword::Values)?;
        self.expect_token(TokenKind::LeftParen, "`(`")?;

        let mut values = Vec::new();
        if !self.consume_if(TokenKind::RightParen) {
            loop {
                values.push(self.parse_value(&[])?);

                let token = self.expect_any("`,` or `)`")?;
                match token.kind {
                    TokenKind::Comma => continue,
                    TokenKind::RightParen => break,
                    _ => return Err(self.error(token.span(), "expected `,` or `)`")),
                }
            }
        }

        Ok(Command::Insert { table, values })
    }

    fn parse_select(&mut self) -> Result<Command, CommandError> {
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_table_name()?;

        let filter = if self.consume_keyword(Keyword::Where) {
            Some(self.parse_conditions(true)?).filter(|filter| !filter.is_empty())
        } else {
            None
        };

        Ok(Command::Select { table, filter })
    }

    fn parse_update(&mut self) -> Result<Command, CommandError> {
        let table = self.expect_table_name()?;
        self.expect_keyword(Keyword::Set)?;

        let mut set = Assignments::new();
        loop {
            let (column, value) = self.parse_equality(&[Keyword::Where])?;
            set = set.set(column, value);

            if !self.consume_if(TokenKind::Comma) {
                break;
            }
        }

        self.expect_keyword(Keyword::Where)?;
        let filter = self.parse_conditions(false)?;

        Ok(Command::Update { table, set, filter })
    }

    fn parse_delete(&mut self) -> Result<Command, CommandError> {
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_table_name()?;
        self.expect_keyword(Keyword::Where)?;
        let filter = self.parse_conditions(false)?;

        Ok(Command::Delete { table, filter })
    }

    /// `col = val [and col = val]...`; may be empty only if `allow_empty`.
    fn parse_conditions(&mut self, allow_empty: bool) -> Result<Filter, CommandError> {
        let mut filter = Filter::new();

        if allow_empty && self.lexer.peek().is_none() {
            return Ok(filter);
        }

        loop {
            let (column, value) = self.parse_equality(&[Keyword::And])?;
            filter = filter.and(column, value);

            if !self.consume_keyword(Keyword::And) {
                break;
            }
        }

        Ok(filter)
    }

    fn parse_equality(&mut self, stop: &[Keyword]) -> Result<(String, Value), CommandError> {
        let token = self.expect_any("a column name")?;
        let TokenKind::Word(column) = token.kind else {
            return Err(self.error(token.span(), "expected a column name"));
        };

        self.expect_token(TokenKind::Equal, "`=`")?;
        let value = self.parse_value(stop)?;

        Ok((column.to_string(), value))
    }

    /// Reads one literal: a single quoted token, or every bare word up to a
    /// separator or a `stop` keyword. Several bare words keep the spacing
    /// they were typed with, so `Ivan Petrov` is one text value.
    fn parse_value(&mut self, stop: &[Keyword]) -> Result<Value, CommandError> {
        if let Some(Ok(Token {
            kind: TokenKind::Quoted(quoted),
            ..
        })) = self.lexer.peek()
        {
            let value = parse_literal(quoted);
            self.lexer.next();
            return Ok(value);
        }

        let mut start = None;
        let mut end = 0;

        while let Some(Ok(token)) = self.lexer.peek() {
            let is_word = match token.kind {
                TokenKind::Word(word) => !word
                    .parse::<Keyword>()
                    .is_ok_and(|keyword| stop.contains(&keyword)),
                _ => false,
            };
            if !is_word {
                break;
            }

            start.get_or_insert(token.offset);
            end = token.end();
            self.lexer.next();
        }

        if let Some(Err(_)) = self.lexer.peek() {
            self.next_token().transpose()?;
        }

        match start {
            Some(start) => Ok(parse_literal(&self.src[start..end])),
            None => {
                let span = self.peek_span();
                Err(self.error(span, "expected a value"))
            }
        }
    }

    fn next_token(&mut self) -> Option<Result<Token<'src>, CommandError>> {
        self.lexer.next()
    }

    fn expect_any(&mut self, expected: &str) -> Result<Token<'src>, CommandError> {
        match self.next_token().transpose()? {
            Some(token) => Ok(token),
            None => Err(self.error(self.end_span(), format!("expected {expected}"))),
        }
    }

    fn expect_token(&mut self, kind: TokenKind<'_>, expected: &str) -> Result<(), CommandError> {
        let token = self.expect_any(expected)?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(self.error(token.span(), format!("expected {expected}")))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), CommandError> {
        let expected = format!("`{keyword}`");
        let token = self.expect_any(&expected)?;
        match token.kind {
            TokenKind::Word(word) if word.parse::<Keyword>() == Ok(keyword) => Ok(()),
            _ => Err(self.error(token.span(), format!("expected {expected}"))),
        }
    }

    fn expect_table_name(&mut self) -> Result<String, CommandError> {
        let token = self.expect_any("a table name")?;
        match token.kind {
            TokenKind::Word(name)
                if name
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-') =>
            {
                Ok(name.to_string())
            }
            _ => Err(self
                .error(token.span(), "expected a table name")
                .with_help("table names use letters, digits, `_` and `-`")),
        }
    }

    fn expect_end(&mut self) -> Result<(), CommandError> {
        match self.next_token().transpose()? {
            None => Ok(()),
            Some(token) => Err(self.error(token.span(), "unexpected input after command")),
        }
    }

    fn consume_if(&mut self, kind: TokenKind<'_>) -> bool {
        let matched = matches!(self.lexer.peek(), Some(Ok(token)) if token.kind == kind);
        if matched {
            self.lexer.next();
        }
        matched
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = matches!(
            self.lexer.peek(),
            Some(Ok(Token { kind: TokenKind::Word(word), .. })) if word.parse::<Keyword>() == Ok(keyword)
        );
        if matched {
            self.lexer.next();
        }
        matched
    }

    fn peek_span(&mut self) -> (usize, usize) {
        match self.lexer.peek() {
            Some(Ok(token)) => (token.offset, token.len),
            _ => self.end_span(),
        }
    }

    fn end_span(&self) -> (usize, usize) {
        (self.src.len(), 0)
    }

    fn error(&self, span: impl Into<miette::SourceSpan>, message: impl Into<String>) -> CommandError {
        CommandError::new(self.src, span, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    fn parse_err(line: &str) -> CommandError {
        Command::parse(line).unwrap_err()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_create_table() {
        assert_eq!(
            parse("create_table users name:str age:int"),
            Command::CreateTable {
                name: "users".to_string(),
                columns: vec!["name:str".to_string(), "age:int".to_string()],
            }
        );

        let err = parse_err("create_table users");
        assert_eq!(err.message, "expected at least one column");
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("list_tables"), Command::ListTables);
        assert_eq!(parse("HELP"), Command::Help);
        assert_eq!(parse("exit"), Command::Exit);
        assert_eq!(
            parse("drop_table users"),
            Command::DropTable {
                name: "users".to_string()
            }
        );
        assert_eq!(
            parse("info users"),
            Command::Info {
                table: "users".to_string()
            }
        );
    }

    #[test]
    fn test_parse_insert() {
        assert_eq!(
            parse(r#"insert into users values ("Sergei", 28, true)"#),
            Command::Insert {
                table: "users".to_string(),
                values: vec![text("Sergei"), Value::Integer(28), Value::Boolean(true)],
            }
        );
    }

    #[test]
    fn test_parse_insert_multi_word_and_quoted_number() {
        assert_eq!(
            parse("insert into users values (Ivan  Petrov, '25')"),
            Command::Insert {
                table: "users".to_string(),
                values: vec![text("Ivan  Petrov"), text("25")],
            }
        );
    }

    #[test]
    fn test_quoted_value_stands_alone() {
        let err = parse_err(r#"insert into users values ("Ivan" "Petrov", 25)"#);
        assert_eq!(err.message, "expected `,` or `)`");
        assert_eq!(err.span, (33, 8).into());

        let err = parse_err(r#"insert into users values ("Ivan" x)"#);
        assert_eq!(err.message, "expected `,` or `)`");

        let err = parse_err(r#"insert into users values (Ivan "Petrov")"#);
        assert_eq!(err.message, "expected `,` or `)`");

        let err = parse_err(r#"select from users where name = "Ivan" x"#);
        assert_eq!(err.message, "unexpected input after command");
    }

    #[test]
    fn test_repeated_condition_column_is_kept() {
        let Command::Delete { filter, .. } = parse("delete from users where age = 28 and age = 25")
        else {
            panic!("expected delete");
        };
        assert_eq!(filter.iter().count(), 2);
        assert_eq!(filter.to_string(), "age = 28 and age = 25");
    }

    #[test]
    fn test_parse_insert_errors() {
        assert_eq!(parse_err("insert users values (1)").message, "expected `into`");
        assert_eq!(parse_err("insert into users values 1").message, "expected `(`");
        assert_eq!(parse_err("insert into users values (1, 2").message, "expected `,` or `)`");
        assert_eq!(parse_err("insert into users values (1,)").message, "expected a value");
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            parse("select from users"),
            Command::Select {
                table: "users".to_string(),
                filter: None,
            }
        );
        assert_eq!(
            parse("select from users where"),
            Command::Select {
                table: "users".to_string(),
                filter: None,
            }
        );
        assert_eq!(
            parse("SELECT FROM users WHERE age = 28"),
            Command::Select {
                table: "users".to_string(),
                filter: Some(Filter::new().and("age", Value::Integer(28))),
            }
        );
    }

    #[test]
    fn test_parse_select_conjunction() {
        assert_eq!(
            parse(r#"select from users where name = "Sergei" and age=28"#),
            Command::Select {
                table: "users".to_string(),
                filter: Some(
                    Filter::new()
                        .and("name", text("Sergei"))
                        .and("age", Value::Integer(28))
                ),
            }
        );
    }

    #[test]
    fn test_parse_update() {
        assert_eq!(
            parse(r#"update users set age = 29, name = "Serge" where name = "Sergei""#),
            Command::Update {
                table: "users".to_string(),
                set: Assignments::new()
                    .set("age", Value::Integer(29))
                    .set("name", text("Serge")),
                filter: Filter::new().and("name", text("Sergei")),
            }
        );

        assert_eq!(parse_err("update users set age = 29").message, "expected `where`");
        assert_eq!(parse_err("update users age = 29 where ID = 1").message, "expected `set`");
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse("delete from users where age = 25"),
            Command::Delete {
                table: "users".to_string(),
                filter: Filter::new().and("age", Value::Integer(25)),
            }
        );

        assert_eq!(parse_err("delete from users").message, "expected `where`");
        assert_eq!(parse_err("delete from users where").message, "expected a column name");
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_err("frobnicate users");
        assert_eq!(err.message, "Unknown command: frobnicate");
        assert!(err.help.is_some());

        assert_eq!(parse_err("where x = 1").message, "Unknown command: where");
    }

    #[test]
    fn test_trailing_input() {
        let err = parse_err("list_tables now");
        assert_eq!(err.message, "unexpected input after command");
        assert_eq!(err.span, (12, 3).into());
    }

    #[test]
    fn test_bad_table_name() {
        assert_eq!(parse_err("info ../etc").message, "expected a table name");
        assert_eq!(parse_err("info").message, "expected a table name");
    }

    #[test]
    fn test_unterminated_quote_in_value() {
        let err = parse_err("select from users where name = \"Ivan");
        assert_eq!(err.message, "unterminated \" quote");
    }

    #[test]
    fn test_command_metadata() {
        assert_eq!(parse("list_tables").name(), "list_tables");
        assert!(parse("delete from t where a = 1").is_mutation());
        assert!(!parse("select from t").is_mutation());
    }
}
