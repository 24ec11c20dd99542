//! Abstract Syntax Tree for DDL statements.
//!
//! These are the shapes the parser hands to the transpiler: CREATE, ALTER
//! and DROP TABLE statements with their columns, keys and raw ALTER clause
//! remainders. The transpiler only ever reads them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed DDL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Create(CreateTable),
    Alter(AlterTable),
    Drop(DropTable),
}

impl Statement {
    /// The table the statement is about (the first one for a multi-table DROP).
    pub fn table(&self) -> &str {
        match self {
            Statement::Create(create) => &create.table,
            Statement::Alter(alter) => &alter.table,
            Statement::Drop(drop) => drop.tables.first().map(String::as_str).unwrap_or_default(),
        }
    }

    /// Short uppercase label, used in logs and `explain` output.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Create(_) => "CREATE TABLE",
            Statement::Alter(_) => "ALTER TABLE",
            Statement::Drop(_) => "DROP TABLE",
        }
    }
}

/// `CREATE TABLE name (...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub table: String,
    pub fields: Vec<Field>,
}

/// `ALTER TABLE name clause, clause, ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTable {
    pub table: String,
    pub altered: Vec<AlterOperation>,
}

/// `DROP TABLE a, b, ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTable {
    pub tables: Vec<String>,
}

/// One entry of a CREATE TABLE body.
///
/// A column has a name and a type; a standalone key clause has only a
/// `key` (and, for `CONSTRAINT sym ...`, the constraint name in `name`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub column_type: Option<ColumnType>,
    #[serde(default)]
    pub options: Vec<ColumnOption>,
    pub key: Option<Key>,
}

impl Field {
    /// A column definition.
    pub fn column(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: Some(name.into()),
            column_type: Some(column_type),
            ..Self::default()
        }
    }

    /// A standalone key clause.
    pub fn key(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    /// Add a field-level option.
    pub fn option(mut self, option: ColumnOption) -> Self {
        self.options.push(option);
        self
    }

    /// Type-level options followed by field-level options.
    pub fn merged_options(&self) -> impl Iterator<Item = &ColumnOption> {
        self.column_type
            .iter()
            .flat_map(|t| t.options.iter())
            .chain(self.options.iter())
    }

    /// Whether the merged option set contains `name`.
    pub fn has_option(&self, name: &str) -> bool {
        self.merged_options().any(|o| o.name() == name)
    }
}

/// A column type such as `VARCHAR(50)` or `INT UNSIGNED`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnType {
    /// Uppercase type name, e.g. `DOUBLE PRECISION`.
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub options: Vec<ColumnOption>,
}

impl ColumnType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: vec![],
            options: vec![],
        }
    }

    pub fn parameters(mut self, parameters: &[&str]) -> Self {
        self.parameters = parameters.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn option(mut self, option: ColumnOption) -> Self {
        self.options.push(option);
        self
    }
}

/// Kind of a key clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    PrimaryKey,
    Index,
    Unique,
    FullText,
    ForeignKey,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::PrimaryKey => write!(f, "PRIMARY KEY"),
            KeyType::Index => write!(f, "INDEX"),
            KeyType::Unique => write!(f, "UNIQUE"),
            KeyType::FullText => write!(f, "FULLTEXT"),
            KeyType::ForeignKey => write!(f, "FOREIGN KEY"),
        }
    }
}

/// A key, index or foreign-key clause. `columns` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub name: Option<String>,
    pub columns: Vec<IndexColumn>,
    pub references: Option<References>,
}

impl Key {
    pub fn new(key_type: KeyType, columns: &[&str]) -> Self {
        Self {
            key_type,
            name: None,
            columns: columns.iter().map(|c| IndexColumn::from(*c)).collect(),
            references: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn references(mut self, references: References) -> Self {
        self.references = Some(references);
        self
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// A column inside a key clause, optionally with a prefix length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub length: Option<u32>,
}

impl From<&str> for IndexColumn {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
            length: None,
        }
    }
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct References {
    pub table: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub options: Vec<ReferenceOption>,
}

impl References {
    pub fn new(table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: table.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            options: vec![],
        }
    }

    pub fn on(mut self, event: ReferenceEvent, action: ReferenceAction) -> Self {
        self.options.push(ReferenceOption { event, action });
        self
    }
}

/// `ON DELETE CASCADE` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub event: ReferenceEvent,
    pub action: ReferenceAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceEvent {
    OnDelete,
    OnUpdate,
}

impl ReferenceEvent {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "ON DELETE" => Some(Self::OnDelete),
            "ON UPDATE" => Some(Self::OnUpdate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceAction {
    Restrict,
    Cascade,
    SetNull,
    NoAction,
    SetDefault,
}

impl ReferenceAction {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "RESTRICT" => Some(Self::Restrict),
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "NO ACTION" => Some(Self::NoAction),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }
}

/// A literal or expression value attached to an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    /// Numeric literal, kept as written.
    Number(String),
    /// String literal, unescaped content without quotes.
    String(String),
    /// Anything else, as raw SQL text (`CURRENT_TIMESTAMP`, `utf8mb4`, ...).
    Expr(String),
}

impl Value {
    /// The value's text without SQL quoting.
    pub fn text(&self) -> &str {
        match self {
            Value::Null => "NULL",
            Value::Number(s) | Value::String(s) | Value::Expr(s) => s,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Expr(e) => write!(f, "{}", e),
        }
    }
}

/// A column option: either a bare keyword or a keyword with a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnOption {
    Flag(String),
    KeyValue { name: String, value: Value },
}

impl ColumnOption {
    pub fn flag(name: impl Into<String>) -> Self {
        Self::Flag(name.into())
    }

    pub fn key_value(name: impl Into<String>, value: Value) -> Self {
        Self::KeyValue {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ColumnOption::Flag(name) | ColumnOption::KeyValue { name, .. } => name,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ColumnOption::Flag(_) => None,
            ColumnOption::KeyValue { value, .. } => Some(value),
        }
    }
}

/// A lexical token of an ALTER clause remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// Uppercase keyword; multi-word keywords (`FOREIGN KEY`) are one token.
    Keyword(String),
    Identifier(String),
    Literal(Value),
    Punct(char),
}

impl Token {
    pub fn keyword(kw: &str) -> Self {
        Self::Keyword(kw.to_string())
    }

    pub fn ident(name: &str) -> Self {
        Self::Identifier(name.to_string())
    }

    pub fn is_keyword(&self, kw: &str) -> bool {
        matches!(self, Token::Keyword(k) if k == kw)
    }

    pub fn is_punct(&self, c: char) -> bool {
        matches!(self, Token::Punct(p) if *p == c)
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Token::Keyword(k) => Some(k),
            _ => None,
        }
    }

    /// The identifier text, if this token names something.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Token::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// The token as an option value.
    pub fn to_value(&self) -> Value {
        match self {
            Token::Keyword(k) if k == "NULL" => Value::Null,
            Token::Literal(v) => v.clone(),
            other => Value::Expr(other.to_string()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(k) => write!(f, "{}", k),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Literal(v) => write!(f, "{}", v),
            Token::Punct(c) => write!(f, "{}", c),
        }
    }
}

/// One clause of an ALTER TABLE statement.
///
/// `options` holds the clause's leading keywords (`ADD`, `COLUMN`, ...),
/// `field` the column, index or constraint it targets, and `unknown` the
/// rest of the clause as typed tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterOperation {
    pub options: Vec<String>,
    pub field: Option<String>,
    #[serde(default)]
    pub unknown: Vec<Token>,
}

impl AlterOperation {
    pub fn new(options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            field: None,
            unknown: vec![],
        }
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn tokens(mut self, tokens: Vec<Token>) -> Self {
        self.unknown = tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_options_type_first() {
        let field = Field::column(
            "id",
            ColumnType::new("INT").option(ColumnOption::flag("UNSIGNED")),
        )
        .option(ColumnOption::flag("NOT NULL"));

        let names: Vec<&str> = field.merged_options().map(|o| o.name()).collect();
        assert_eq!(names, vec!["UNSIGNED", "NOT NULL"]);
        assert!(field.has_option("NOT NULL"));
        assert!(!field.has_option("AUTO_INCREMENT"));
    }

    #[test]
    fn test_token_to_value() {
        assert_eq!(Token::keyword("NULL").to_value(), Value::Null);
        assert_eq!(
            Token::Literal(Value::Number("5".into())).to_value(),
            Value::Number("5".into())
        );
        assert_eq!(
            Token::ident("CURRENT_TIMESTAMP").to_value(),
            Value::Expr("CURRENT_TIMESTAMP".into())
        );
    }

    #[test]
    fn test_value_display_escapes_quotes() {
        assert_eq!(Value::String("it's".into()).to_string(), "'it''s'");
        assert_eq!(Value::String("it's".into()).text(), "it's");
    }

    #[test]
    fn test_drop_statement_table() {
        let stmt = Statement::Drop(DropTable {
            tables: vec!["a".into(), "b".into()],
        });
        assert_eq!(stmt.table(), "a");
        assert_eq!(stmt.kind(), "DROP TABLE");
    }
}
