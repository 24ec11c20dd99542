//! DDL parser.
//!
//! Recursive descent over the lexer's tokens. Only the table DDL subset is
//! understood:
//!
//! ```text
//! CREATE [TEMPORARY] TABLE [IF NOT EXISTS] name ( definition, ... ) [options]
//! ALTER [IGNORE] TABLE name clause, ...
//! DROP [TEMPORARY] TABLE [IF EXISTS] name, ...
//! ```
//!
//! Other statements are skipped. A malformed table statement is an error.

pub mod tokens;

use tracing::{debug, trace};

use crate::ast::*;
use crate::error::{BlueprintError, BlueprintResult};

pub use tokens::{Lexeme, tokenize};

/// Keywords that open a key clause instead of a column in a CREATE body.
const KEY_CLAUSES: &[&str] = &[
    "CONSTRAINT",
    "PRIMARY KEY",
    "INDEX",
    "KEY",
    "UNIQUE",
    "UNIQUE INDEX",
    "UNIQUE KEY",
    "FULLTEXT",
    "FULLTEXT INDEX",
    "FULLTEXT KEY",
    "FOREIGN KEY",
    "CHECK",
    "SPATIAL",
];

/// Keywords after which the next word is a name.
const NAME_FOLLOWS: &[&str] = &["AFTER", "TO", "AS", "REFERENCES"];

/// Parse a DDL script into its table statements.
pub fn parse(input: &str) -> BlueprintResult<Vec<Statement>> {
    let lexemes = tokenize(input)?;
    let mut statements = vec![];

    for chunk in lexemes.split(|l| l.token.is_punct(';')) {
        if chunk.is_empty() {
            continue;
        }
        if let Some(statement) = parse_statement(&mut Cursor::new(chunk))? {
            debug!(kind = statement.kind(), table = statement.table(), "parsed statement");
            statements.push(statement);
        }
    }

    Ok(statements)
}

struct Cursor<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(lexemes: &'a [Lexeme]) -> Self {
        Self { lexemes, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Lexeme> {
        let lexeme = self.lexemes.get(self.pos)?;
        self.pos += 1;
        Some(lexeme)
    }

    fn rest(&self) -> &'a [Lexeme] {
        &self.lexemes[self.pos.min(self.lexemes.len())..]
    }

    /// Byte offset of the next token, or the end of the last one.
    fn position(&self) -> usize {
        match self.peek() {
            Some(lexeme) => lexeme.offset,
            None => self.lexemes.last().map(|l| l.end).unwrap_or_default(),
        }
    }

    fn error(&self, message: impl Into<String>) -> BlueprintError {
        BlueprintError::parse(self.position(), message)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|l| l.token.is_keyword(keyword))
    }

    fn at_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.at_keyword(k))
    }

    fn at_punct(&self, c: char) -> bool {
        self.peek().is_some_and(|l| l.token.is_punct(c))
    }

    fn peek_keyword(&self) -> Option<&'a str> {
        self.peek().and_then(|l| l.token.as_keyword())
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.at_keyword(keyword);
        if found {
            self.pos += 1;
        }
        found
    }

    fn eat_punct(&mut self, c: char) -> bool {
        let found = self.at_punct(c);
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect_keyword(&mut self, keyword: &str) -> BlueprintResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", keyword)))
        }
    }

    /// A possibly qualified name; `schema.table` yields `table`.
    fn name(&mut self) -> BlueprintResult<String> {
        let mut name = self.simple_name()?;
        while self.eat_punct('.') {
            name = self.simple_name()?;
        }
        Ok(name)
    }

    fn simple_name(&mut self) -> BlueprintResult<String> {
        match self.peek().and_then(Lexeme::name) {
            Some(name) => {
                self.pos += 1;
                Ok(name.to_string())
            }
            None => Err(self.error("expected a name")),
        }
    }

    /// The tokens inside the next balanced pair of parentheses.
    fn group(&mut self) -> BlueprintResult<&'a [Lexeme]> {
        if !self.eat_punct('(') {
            return Err(self.error("expected '('"));
        }
        let start = self.pos;
        let mut depth = 1usize;

        while let Some(lexeme) = self.advance() {
            if lexeme.token.is_punct('(') {
                depth += 1;
            } else if lexeme.token.is_punct(')') {
                depth -= 1;
                if depth == 0 {
                    return Ok(&self.lexemes[start..self.pos - 1]);
                }
            }
        }

        Err(self.error("unbalanced parentheses"))
    }
}

/// Split on commas outside parentheses, dropping empty parts.
fn split_top_level(lexemes: &[Lexeme]) -> Vec<&[Lexeme]> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;

    for (i, lexeme) in lexemes.iter().enumerate() {
        match lexeme.token {
            Token::Punct('(') => depth += 1,
            Token::Punct(')') => depth = depth.saturating_sub(1),
            Token::Punct(',') if depth == 0 => {
                parts.push(&lexemes[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&lexemes[start..]);

    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Unquoted text of a parameter, e.g. `50` or `utf8`.
fn text(lexemes: &[Lexeme]) -> String {
    let parts: Vec<String> = lexemes
        .iter()
        .map(|l| l.token.to_value().text().to_string())
        .collect();
    parts.join(" ")
}

/// SQL text of an expression, e.g. `'a' + 1`.
fn expression(lexemes: &[Lexeme]) -> String {
    let parts: Vec<String> = lexemes.iter().map(|l| l.token.to_string()).collect();
    parts.join(" ")
}

/// The rest of an ALTER clause as tokens. Keywords used as names (inside
/// parentheses, or after `AFTER`, `TO`, `AS`, `REFERENCES`) become
/// identifiers.
fn remainder(lexemes: &[Lexeme]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(lexemes.len());
    let mut depth = 0usize;
    let mut names_next = false;

    for lexeme in lexemes {
        let token = if depth > 0 || names_next {
            lexeme.as_identifier()
        } else {
            lexeme.token.clone()
        };
        match lexeme.token {
            Token::Punct('(') => depth += 1,
            Token::Punct(')') => depth = depth.saturating_sub(1),
            _ => {}
        }
        names_next = NAME_FOLLOWS.iter().any(|k| lexeme.token.is_keyword(k));
        tokens.push(token);
    }

    tokens
}

/// Like [`remainder`], with the leading token taken as a name.
fn named_remainder(lexemes: &[Lexeme]) -> Vec<Token> {
    let mut tokens = remainder(lexemes);
    if let (Some(first), Some(lexeme)) = (tokens.first_mut(), lexemes.first()) {
        *first = lexeme.as_identifier();
    }
    tokens
}

/// Like [`remainder`], for key clauses: prefix lengths inside a column
/// list (`email(191)`) are dropped.
fn key_remainder(lexemes: &[Lexeme]) -> Vec<Token> {
    let mut kept = Vec::with_capacity(lexemes.len());
    let mut depth = 0usize;

    for lexeme in lexemes {
        match lexeme.token {
            Token::Punct('(') => {
                depth += 1;
                if depth > 1 {
                    continue;
                }
            }
            Token::Punct(')') => {
                depth = depth.saturating_sub(1);
                if depth > 0 {
                    continue;
                }
            }
            _ if depth > 1 => continue,
            _ => {}
        }
        kept.push(lexeme.clone());
    }

    remainder(&kept)
}

fn parse_statement(cursor: &mut Cursor) -> BlueprintResult<Option<Statement>> {
    if cursor.eat_keyword("CREATE") {
        cursor.eat_keyword("TEMPORARY");
        if cursor.eat_keyword("TABLE") {
            return create_table(cursor).map(|c| Some(Statement::Create(c)));
        }
    } else if cursor.eat_keyword("ALTER") {
        cursor.eat_keyword("IGNORE");
        if cursor.eat_keyword("TABLE") {
            return alter_table(cursor).map(|a| Some(Statement::Alter(a)));
        }
    } else if cursor.eat_keyword("DROP") {
        cursor.eat_keyword("TEMPORARY");
        if cursor.eat_keyword("TABLE") {
            return drop_table(cursor).map(|d| Some(Statement::Drop(d)));
        }
    }

    let head: Vec<&str> = cursor.lexemes.iter().take(3).map(|l| l.raw.as_str()).collect();
    debug!(statement = %head.join(" "), "skipping statement");
    Ok(None)
}

fn create_table(cursor: &mut Cursor) -> BlueprintResult<CreateTable> {
    cursor.eat_keyword("IF NOT EXISTS");
    let table = cursor.name()?;
    let body = cursor.group()?;

    let mut fields = vec![];
    for definition in split_top_level(body) {
        if let Some(field) = create_definition(&mut Cursor::new(definition))? {
            fields.push(field);
        }
    }

    if fields.is_empty() {
        return Err(BlueprintError::parse(
            cursor.position(),
            format!("table '{}' has no definitions", table),
        ));
    }

    Ok(CreateTable { table, fields })
}

fn create_definition(cursor: &mut Cursor) -> BlueprintResult<Option<Field>> {
    if !cursor.at_any(KEY_CLAUSES) {
        return column_definition(cursor).map(Some);
    }

    let mut name = None;
    if cursor.eat_keyword("CONSTRAINT") && !cursor.at_any(KEY_CLAUSES) {
        name = Some(cursor.name()?);
    }

    Ok(key_clause(cursor)?.map(|key| Field {
        name,
        key: Some(key),
        ..Field::default()
    }))
}

fn key_clause(cursor: &mut Cursor) -> BlueprintResult<Option<Key>> {
    let Some(keyword) = cursor.peek_keyword() else {
        return Err(cursor.error("expected a key definition"));
    };
    cursor.pos += 1;

    let key_type = match keyword {
        "PRIMARY KEY" => KeyType::PrimaryKey,
        "INDEX" | "KEY" => KeyType::Index,
        "UNIQUE" | "UNIQUE INDEX" | "UNIQUE KEY" => KeyType::Unique,
        "FULLTEXT" | "FULLTEXT INDEX" | "FULLTEXT KEY" => KeyType::FullText,
        "FOREIGN KEY" => KeyType::ForeignKey,
        other => {
            debug!(clause = other, "ignoring table constraint");
            return Ok(None);
        }
    };

    let name = if cursor.at_punct('(') {
        None
    } else {
        Some(cursor.name()?)
    };

    let columns = index_columns(cursor.group()?)?;
    if columns.is_empty() {
        return Err(cursor.error(format!("{} without columns", key_type)));
    }

    let references = if key_type == KeyType::ForeignKey {
        Some(references(cursor)?)
    } else {
        None
    };

    Ok(Some(Key {
        key_type,
        name,
        columns,
        references,
    }))
}

fn index_columns(lexemes: &[Lexeme]) -> BlueprintResult<Vec<IndexColumn>> {
    split_top_level(lexemes)
        .into_iter()
        .map(|part| {
            let mut cursor = Cursor::new(part);
            let name = cursor.name()?;
            let length = if cursor.at_punct('(') {
                cursor.group()?.first().and_then(|l| l.raw.parse().ok())
            } else {
                None
            };
            Ok(IndexColumn { name, length })
        })
        .collect()
}

/// `REFERENCES table (columns) [ON DELETE action] [ON UPDATE action]`.
fn references(cursor: &mut Cursor) -> BlueprintResult<References> {
    cursor.expect_keyword("REFERENCES")?;
    let table = cursor.name()?;
    let columns = if cursor.at_punct('(') {
        index_columns(cursor.group()?)?
            .into_iter()
            .map(|c| c.name)
            .collect()
    } else {
        vec![]
    };

    let mut options = vec![];
    while let Some(event) = cursor.peek_keyword().and_then(ReferenceEvent::from_keyword) {
        cursor.pos += 1;
        let action = cursor
            .peek_keyword()
            .and_then(ReferenceAction::from_keyword)
            .ok_or_else(|| cursor.error("expected a referential action"))?;
        cursor.pos += 1;
        options.push(ReferenceOption { event, action });
    }

    Ok(References {
        table,
        columns,
        options,
    })
}

fn column_definition(cursor: &mut Cursor) -> BlueprintResult<Field> {
    let name = cursor.name()?;
    let type_name = match cursor.peek().map(|l| &l.token) {
        Some(Token::Keyword(k)) => k.clone(),
        Some(Token::Identifier(i)) => i.to_ascii_uppercase(),
        _ => return Err(cursor.error(format!("expected a type for column '{}'", name))),
    };
    cursor.pos += 1;

    let mut column_type = ColumnType::new(type_name);
    if cursor.at_punct('(') {
        column_type.parameters = split_top_level(cursor.group()?)
            .into_iter()
            .map(text)
            .collect();
    }

    let mut options = vec![];
    let mut key = None;

    while let Some(lexeme) = cursor.advance() {
        let Some(keyword) = lexeme.token.as_keyword() else {
            trace!(column = %name, token = %lexeme.raw, "ignoring column token");
            continue;
        };

        match keyword {
            "UNSIGNED" | "SIGNED" | "ZEROFILL" => {
                column_type.options.push(ColumnOption::flag(keyword));
            }
            "CHARACTER SET" | "COLLATE" => {
                let value = option_value(cursor)?;
                column_type.options.push(ColumnOption::key_value(keyword, value));
            }
            "DEFAULT" | "COMMENT" | "ON UPDATE" | "AFTER" => {
                let value = option_value(cursor)?;
                options.push(ColumnOption::key_value(keyword, value));
            }
            "PRIMARY KEY" | "KEY" => key = Some(Key::new(KeyType::PrimaryKey, &[name.as_str()])),
            "UNIQUE" | "UNIQUE KEY" => key = Some(Key::new(KeyType::Unique, &[name.as_str()])),
            "CHECK" => {
                if cursor.at_punct('(') {
                    cursor.group()?;
                }
            }
            "REFERENCES" => {
                debug!(column = %name, "ignoring inline REFERENCES");
                break;
            }
            _ => options.push(ColumnOption::flag(keyword)),
        }
    }

    Ok(Field {
        name: Some(name),
        column_type: Some(column_type),
        options,
        key,
    })
}

/// The value after `DEFAULT`, `COLLATE` and similar options.
fn option_value(cursor: &mut Cursor) -> BlueprintResult<Value> {
    if cursor.at_punct('(') {
        let inner = cursor.group()?;
        return Ok(Value::Expr(format!("({})", expression(inner))));
    }

    let Some(lexeme) = cursor.peek() else {
        return Err(cursor.error("expected a value"));
    };
    if let Token::Punct(c) = lexeme.token {
        return Err(cursor.error(format!("unexpected '{}'", c)));
    }
    cursor.pos += 1;

    Ok(match &lexeme.token {
        Token::Literal(value) => value.clone(),
        Token::Keyword(k) if k == "NULL" => Value::Null,
        _ if cursor.at_punct('(') => {
            let arguments = cursor.group()?;
            Value::Expr(format!("{}({})", lexeme.raw, expression(arguments)))
        }
        _ => Value::Expr(lexeme.raw.clone()),
    })
}

fn alter_table(cursor: &mut Cursor) -> BlueprintResult<AlterTable> {
    let table = cursor.name()?;

    let altered = split_top_level(cursor.rest())
        .into_iter()
        .map(|clause| alter_clause(&mut Cursor::new(clause)))
        .collect::<BlueprintResult<Vec<_>>>()?;

    if altered.is_empty() {
        return Err(cursor.error(format!("ALTER TABLE '{}' without clauses", table)));
    }

    Ok(AlterTable { table, altered })
}

fn alter_clause(cursor: &mut Cursor) -> BlueprintResult<AlterOperation> {
    let Some(head) = cursor.advance() else {
        return Err(cursor.error("expected an ALTER clause"));
    };
    let Some(verb) = head.token.as_keyword() else {
        // table options such as `ENGINE = InnoDB`
        return Ok(AlterOperation {
            options: vec![head.raw.to_ascii_uppercase()],
            field: None,
            unknown: remainder(cursor.rest()),
        });
    };

    let mut op = AlterOperation::new(&[verb]);
    match verb {
        "ADD" => add_clause(cursor, &mut op)?,
        "CHANGE" | "MODIFY" => {
            if cursor.eat_keyword("COLUMN") {
                op.options.push("COLUMN".into());
            }
            op.field = Some(cursor.name()?);
            op.unknown = if verb == "CHANGE" {
                named_remainder(cursor.rest())
            } else {
                remainder(cursor.rest())
            };
        }
        "DROP" => drop_clause(cursor, &mut op)?,
        "RENAME" => rename_clause(cursor, &mut op)?,
        _ => op.unknown = remainder(cursor.rest()),
    }

    Ok(op)
}

fn add_clause(cursor: &mut Cursor, op: &mut AlterOperation) -> BlueprintResult<()> {
    match cursor.peek_keyword() {
        Some("COLUMN") => {
            cursor.pos += 1;
            op.options.push("COLUMN".into());
            column_clause(cursor, op)?;
        }
        Some(keyword @ ("INDEX" | "KEY" | "CONSTRAINT")) => {
            cursor.pos += 1;
            op.options.push(keyword.to_string());
            let named = !cursor.at_punct('(') && !cursor.at_any(KEY_CLAUSES);
            if named {
                op.field = Some(cursor.name()?);
            }
            op.unknown = key_remainder(cursor.rest());
        }
        Some(keyword) if KEY_CLAUSES.contains(&keyword) => {
            op.unknown = key_remainder(cursor.rest());
        }
        _ if cursor.at_punct('(') => {
            debug!("column list in ADD is not supported");
            op.unknown = remainder(cursor.rest());
        }
        _ => column_clause(cursor, op)?,
    }
    Ok(())
}

/// A column definition: the name becomes `field` and stays at the head of
/// the token stream.
fn column_clause(cursor: &mut Cursor, op: &mut AlterOperation) -> BlueprintResult<()> {
    let rest = cursor.rest();
    op.field = Some(cursor.name()?);
    op.unknown = named_remainder(rest);
    Ok(())
}

fn drop_clause(cursor: &mut Cursor, op: &mut AlterOperation) -> BlueprintResult<()> {
    match cursor.peek_keyword() {
        Some(keyword @ ("COLUMN" | "INDEX" | "KEY")) => {
            cursor.pos += 1;
            op.options.push(keyword.to_string());
            op.field = Some(cursor.name()?);
        }
        Some(keyword @ ("FOREIGN KEY" | "PRIMARY KEY")) => {
            cursor.pos += 1;
            op.unknown = vec![Token::keyword(keyword)];
            op.unknown.extend(named_remainder(cursor.rest()));
        }
        _ => op.field = Some(cursor.name()?),
    }
    Ok(())
}

fn rename_clause(cursor: &mut Cursor, op: &mut AlterOperation) -> BlueprintResult<()> {
    match cursor.peek_keyword() {
        Some("TO") => {
            cursor.pos += 1;
            op.options.push("TO".into());
            op.unknown = named_remainder(cursor.rest());
        }
        Some("AS") => op.unknown = remainder(cursor.rest()),
        Some(keyword @ ("COLUMN" | "INDEX" | "KEY")) => {
            cursor.pos += 1;
            op.options.push(keyword.to_string());
            op.field = Some(cursor.name()?);
            op.unknown = remainder(cursor.rest());
        }
        _ => op.unknown = named_remainder(cursor.rest()),
    }
    Ok(())
}

fn drop_table(cursor: &mut Cursor) -> BlueprintResult<DropTable> {
    cursor.eat_keyword("IF EXISTS");
    let mut tables = vec![cursor.name()?];
    while cursor.eat_punct(',') {
        tables.push(cursor.name()?);
    }
    Ok(DropTable { tables })
}
