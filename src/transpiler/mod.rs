//! DDL → schema-builder transpiler.
//!
//! Converts parsed CREATE, ALTER and DROP TABLE statements into schema
//! builder code, producing an `up` fragment that applies the change and a
//! `down` fragment that reverts it.
//!
//! ```text
//! CREATE TABLE users (id INT UNSIGNED AUTO_INCREMENT, ...)
//!
//! up:   Schema::create('users', function (Blueprint $table) {
//!           $table->integer('id')
//!               ->unsigned()
//!               ->autoIncrement()
//!               ->nullable();
//!       });
//! down: Schema::dropIfExists('users');
//! ```
//!
//! Nothing in here fails. Unknown column types and clauses that cannot be
//! classified are skipped, and changes that cannot be reverted from the
//! statement alone get a comment in `down` instead of code.

pub mod alter;
pub mod keys;
pub mod modifiers;
pub mod types;

use serde::Serialize;
use tracing::{debug, trace};

use crate::ast::*;
use crate::definition::{DEFAULT_INDENT, Definition};

pub use alter::{AlterKind, classify, parameters};

use alter::{scan_column, token_text};
use keys::{GenericCall, KeyKind, drop_blueprint, drop_by_columns, key_blueprint, write_foreign};

const CLOSE_BLOCK: &str = "});";

/// Up and down code for one statement, or for one squashed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Migration {
    pub up: String,
    pub down: String,
}

/// Trait for converting statements to migration code.
pub trait ToMigration {
    fn to_migration(&self) -> Migration;
}

impl ToMigration for Statement {
    fn to_migration(&self) -> Migration {
        let mut transpiler = Transpiler::new();
        transpiler.handle(self);
        transpiler.finish()
    }
}

/// Single-quoted string literal, escaping `\` and `'`.
pub(crate) fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn create_table_blueprint(table: &str) -> String {
    format!("Schema::create({}, function (Blueprint $table) {{", quote(table))
}

fn alter_table_blueprint(table: &str) -> String {
    format!("Schema::table({}, function (Blueprint $table) {{", quote(table))
}

fn drop_table_blueprint(table: &str) -> String {
    format!("Schema::dropIfExists({});", quote(table))
}

fn rename_to_blueprint(table: &str) -> String {
    format!("$table->rename({});", quote(table))
}

fn rename_blueprint(kind: AlterKind, from: &str, to: &str) -> String {
    let call = match kind {
        AlterKind::RenameIndex => "renameIndex",
        _ => "renameColumn",
    };
    format!("$table->{}({}, {});", call, quote(from), quote(to))
}

fn revert_comment(operation: &str, target: &str) -> String {
    format!("// Revert manually: {} {} (previous definition unknown)", operation, target)
}

/// Name targeted by a clause: its `field`, or a leading identifier.
fn target(op: &AlterOperation, tokens: &[Token]) -> Option<String> {
    op.field
        .clone()
        .or_else(|| tokens.first().and_then(Token::as_name).map(str::to_string))
}

fn reference_options(tokens: &[Token]) -> Vec<ReferenceOption> {
    tokens
        .windows(2)
        .filter_map(|pair| {
            let event = ReferenceEvent::from_keyword(pair[0].as_keyword()?)?;
            let action = ReferenceAction::from_keyword(pair[1].as_keyword()?)?;
            Some(ReferenceOption { event, action })
        })
        .collect()
}

/// Stateful writer for a batch of statements.
///
/// Each `handle` call appends to the pending migration; `finish` hands it
/// out and starts over. Handling one statement per `finish` gives one
/// migration per statement, handling several squashes them into one.
#[derive(Debug, Clone)]
pub struct Transpiler {
    indent: usize,
    up: Definition,
    /// One finished down block per statement, in statement order.
    down: Vec<String>,
}

impl Default for Transpiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Transpiler {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    /// Emit code starting at `indent` tab stops.
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent,
            up: Definition::with_indent(indent),
            down: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    /// Discard everything written so far.
    pub fn reset(&mut self) {
        self.up = Definition::with_indent(self.indent);
        self.down.clear();
    }

    /// The pending migration. Down blocks run in reverse statement order.
    pub fn get(&self) -> Migration {
        let mut down = Definition::with_indent(self.indent);
        for block in self.down.iter().rev() {
            if !down.is_empty() {
                down.append("", true, false);
            }
            down.line(block);
        }

        Migration {
            up: self.up.get().to_string(),
            down: down.into_string(),
        }
    }

    /// Take the pending migration and reset.
    pub fn finish(&mut self) -> Migration {
        let migration = self.get();
        self.reset();
        migration
    }

    pub fn handle(&mut self, statement: &Statement) {
        match statement {
            Statement::Create(create) => self.handle_create(create),
            Statement::Alter(alter) => self.handle_alter(alter),
            Statement::Drop(drop) => self.handle_drop(drop),
        }
    }

    pub fn handle_create(&mut self, statement: &CreateTable) {
        self.separate();
        let mut down = Definition::with_indent(self.indent);

        self.up.line(&create_table_blueprint(&statement.table));
        self.up.indent();
        down.line(&drop_table_blueprint(&statement.table));

        let auto_increment: Vec<&str> = statement
            .fields
            .iter()
            .filter(|f| f.has_option("AUTO_INCREMENT"))
            .filter_map(|f| f.name.as_deref())
            .collect();

        for field in &statement.fields {
            if let (Some(name), Some(column_type)) = (&field.name, &field.column_type) {
                match types::map_type(&column_type.name, name, &column_type.parameters) {
                    Some(declaration) => {
                        let calls = modifiers::resolve(field.merged_options());
                        self.write_column(&declaration, &calls, false);
                    }
                    None => debug!(
                        table = %statement.table,
                        column = %name,
                        column_type = %column_type.name,
                        "unmapped column type, skipping column"
                    ),
                }
            }

            if let Some(key) = &field.key {
                self.write_key(field, key, &auto_increment);
            }
        }

        self.up.dedent();
        self.up.line(CLOSE_BLOCK);
        self.down.push(down.into_string());
    }

    pub fn handle_alter(&mut self, statement: &AlterTable) {
        self.separate();
        self.up.line(&alter_table_blueprint(&statement.table));
        self.up.indent();

        let mut current = statement.table.clone();
        let mut reverts: Vec<String> = vec![];

        for op in &statement.altered {
            let Some((kind, tokens)) = classify(&op.options, &op.unknown) else {
                debug!(
                    table = %statement.table,
                    options = ?op.options,
                    "unrecognized ALTER clause, skipping"
                );
                continue;
            };
            trace!(table = %statement.table, %kind, "classified ALTER clause");

            let revert = match kind {
                AlterKind::AddColumn => self.alter_column(op, tokens, false),
                AlterKind::ChangeColumn => self.alter_column(op, tokens, true),
                AlterKind::AddIndex => self.add_key(op, tokens, KeyKind::Index),
                AlterKind::AddUnique => self.add_key(op, tokens, KeyKind::Unique),
                AlterKind::AddFullText => self.add_key(op, tokens, KeyKind::FullText),
                AlterKind::AddConstraint => self.add_constraint(op, tokens),
                AlterKind::DropColumn => self.drop(op, tokens, kind, GenericCall::DropColumn),
                AlterKind::DropIndex => self.drop(op, tokens, kind, GenericCall::DropIndex),
                AlterKind::DropForeignKey => {
                    self.drop(op, tokens, kind, GenericCall::DropForeign)
                }
                AlterKind::RenameTable => self.rename_table(op, tokens, &mut current),
                AlterKind::RenameColumn | AlterKind::RenameIndex => {
                    self.rename(op, tokens, kind)
                }
            };

            match revert {
                Some(line) => reverts.push(line),
                None => debug!(table = %statement.table, %kind, "incomplete ALTER clause, skipping"),
            }
        }

        self.up.dedent();
        self.up.line(CLOSE_BLOCK);

        let mut down = Definition::with_indent(self.indent);
        down.line(&alter_table_blueprint(&current));
        down.indent();
        for line in reverts.iter().rev() {
            down.line(line);
        }
        down.dedent();
        down.line(CLOSE_BLOCK);
        self.down.push(down.into_string());
    }

    pub fn handle_drop(&mut self, statement: &DropTable) {
        self.separate();
        let mut down = Definition::with_indent(self.indent);

        for table in &statement.tables {
            self.up.line(&drop_table_blueprint(table));
            down.line(&revert_comment("DROP TABLE", table));
        }

        self.down.push(down.into_string());
    }

    /// Blank line between squashed statements.
    fn separate(&mut self) {
        if !self.up.is_empty() {
            self.up.append("", true, false);
        }
    }

    fn write_column(&mut self, declaration: &str, calls: &[String], change: bool) {
        self.up.line(declaration);
        self.up.indent();
        for call in calls {
            self.up.line(call);
        }
        if change {
            self.up.line("->change()");
        }
        self.up.push(";");
        self.up.dedent();
    }

    fn write_key(&mut self, field: &Field, key: &Key, auto_increment: &[&str]) {
        let columns = key.column_names();
        let name = key.name.as_deref().or(field.name.as_deref());

        match KeyKind::from(key.key_type) {
            KeyKind::Foreign => {
                write_foreign(&mut self.up, &columns, name, key.references.as_ref());
            }
            KeyKind::Primary => {
                if let [column] = columns.as_slice()
                    && auto_increment.contains(&column.as_str())
                {
                    trace!(%column, "primary key implied by auto increment");
                    return;
                }
                self.up.line(&key_blueprint(KeyKind::Primary, &columns, None));
                self.up.push(";");
            }
            kind => {
                self.up.line(&key_blueprint(kind, &columns, name));
                self.up.push(";");
            }
        }
    }

    /// ADD or CHANGE a column. The first token is the column's (new) name.
    fn alter_column(&mut self, op: &AlterOperation, tokens: &[Token], change: bool) -> Option<String> {
        let (name_token, rest) = tokens.split_first()?;
        let new_name = name_token.as_name()?.to_string();
        let column = op.field.clone().unwrap_or_else(|| new_name.clone());

        let clause = scan_column(rest);
        let declaration = types::map_type(clause.type_name.as_deref()?, &column, &clause.parameters)?;
        self.write_column(&declaration, &modifiers::resolve(&clause.options), change);

        if !change {
            return Some(format!(
                "{};",
                drop_blueprint(GenericCall::DropColumn, &column)
            ));
        }

        if new_name != column {
            self.up
                .line(&rename_blueprint(AlterKind::RenameColumn, &column, &new_name));
        }
        Some(revert_comment(&AlterKind::ChangeColumn.to_string(), &column))
    }

    fn add_key(&mut self, op: &AlterOperation, tokens: &[Token], kind: KeyKind) -> Option<String> {
        let name = target(op, tokens);
        let columns = parameters(tokens);
        if columns.is_empty() {
            return None;
        }

        self.up.line(&key_blueprint(kind, &columns, name.as_deref()));
        self.up.push(";");

        let call = kind.drop_call()?;
        let revert = match name {
            Some(name) => drop_blueprint(call, &name),
            None => drop_by_columns(call, &columns),
        };
        Some(format!("{};", revert))
    }

    fn add_constraint(&mut self, op: &AlterOperation, tokens: &[Token]) -> Option<String> {
        let foreign = tokens.iter().position(|t| t.is_keyword("FOREIGN KEY"))?;
        let columns = parameters(&tokens[foreign + 1..]);
        if columns.is_empty() {
            return None;
        }

        let references = tokens
            .iter()
            .position(|t| t.is_keyword("REFERENCES"))
            .map(|at| References {
                table: tokens.get(at + 1).map(token_text).unwrap_or_default(),
                columns: parameters(tokens.get(at + 2..).unwrap_or_default()),
                options: reference_options(&tokens[at..]),
            });

        write_foreign(&mut self.up, &columns, op.field.as_deref(), references.as_ref());

        let revert = match &op.field {
            Some(name) => drop_blueprint(GenericCall::DropForeign, name),
            None => drop_by_columns(GenericCall::DropForeign, &columns),
        };
        Some(format!("{};", revert))
    }

    fn drop(&mut self, op: &AlterOperation, tokens: &[Token], kind: AlterKind, call: GenericCall) -> Option<String> {
        let name = target(op, tokens)?;
        self.up.line(&drop_blueprint(call, &name));
        self.up.push(";");
        Some(revert_comment(&kind.to_string(), &name))
    }

    fn rename_table(&mut self, op: &AlterOperation, tokens: &[Token], current: &mut String) -> Option<String> {
        let new_name = target(op, tokens)?;
        self.up.line(&rename_to_blueprint(&new_name));
        let revert = rename_to_blueprint(current);
        *current = new_name;
        Some(revert)
    }

    fn rename(&mut self, op: &AlterOperation, tokens: &[Token], kind: AlterKind) -> Option<String> {
        let old_name = op.field.as_deref()?;
        let to = tokens.iter().position(|t| t.is_keyword("TO"))?;
        let new_name = tokens.get(to + 1).and_then(Token::as_name)?;

        self.up.line(&rename_blueprint(kind, old_name, new_name));
        Some(rename_blueprint(kind, new_name, old_name))
    }
}

/// One migration per statement.
pub fn transpile(statements: &[Statement], indent: usize) -> Vec<Migration> {
    let mut transpiler = Transpiler::with_indent(indent);
    statements
        .iter()
        .map(|statement| {
            transpiler.handle(statement);
            transpiler.finish()
        })
        .collect()
}

/// All statements squashed into a single migration.
pub fn transpile_squashed(statements: &[Statement], indent: usize) -> Migration {
    let mut transpiler = Transpiler::with_indent(indent);
    for statement in statements {
        transpiler.handle(statement);
    }
    transpiler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_table() -> CreateTable {
        CreateTable {
            table: "users".into(),
            fields: vec![
                Field::column(
                    "id",
                    ColumnType::new("INT").option(ColumnOption::flag("UNSIGNED")),
                )
                .option(ColumnOption::flag("AUTO_INCREMENT")),
                Field::column("name", ColumnType::new("VARCHAR").parameters(&["50"]))
                    .option(ColumnOption::flag("NOT NULL")),
            ],
        }
    }

    fn alter(op: AlterOperation) -> AlterTable {
        AlterTable {
            table: "users".into(),
            altered: vec![op],
        }
    }

    fn run_alter(op: AlterOperation) -> Migration {
        let mut t = Transpiler::with_indent(0);
        t.handle_alter(&alter(op));
        t.finish()
    }

    #[test]
    fn test_create_table() {
        let mut t = Transpiler::with_indent(0);
        t.handle_create(&users_table());
        let m = t.finish();

        assert_eq!(
            m.up,
            "Schema::create('users', function (Blueprint $table) {\n\
             \t$table->integer('id')\n\
             \t\t->unsigned()\n\
             \t\t->autoIncrement()\n\
             \t\t->nullable();\n\
             \t$table->string('name', 50);\n\
             });"
        );
        assert_eq!(m.down, "Schema::dropIfExists('users');");
    }

    #[test]
    fn test_default_indent() {
        let m = Statement::Create(users_table()).to_migration();
        assert!(m.up.contains("\n\t\t\t$table->integer('id')\n\t\t\t\t->unsigned()"));
        assert!(m.up.ends_with("\n\t\t});"));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut t = Transpiler::new();
        t.handle_create(&users_table());
        let first = t.get();
        t.reset();
        assert!(t.is_empty());
        t.handle_create(&users_table());
        assert_eq!(t.finish(), first);
    }

    #[test]
    fn test_unmapped_type_is_skipped() {
        let create = CreateTable {
            table: "docs".into(),
            fields: vec![
                Field::column("payload", ColumnType::new("JSON")),
                Field::column("title", ColumnType::new("TEXT"))
                    .option(ColumnOption::flag("NOT NULL")),
            ],
        };
        let mut t = Transpiler::with_indent(0);
        t.handle_create(&create);
        let m = t.finish();
        assert!(!m.up.contains("payload"));
        assert!(m.up.contains("\t$table->text('title');"));
    }

    #[test]
    fn test_create_keys() {
        let create = CreateTable {
            table: "posts".into(),
            fields: vec![
                Field::column("id", ColumnType::new("BIGINT"))
                    .option(ColumnOption::flag("NOT NULL"))
                    .option(ColumnOption::flag("AUTO_INCREMENT")),
                Field::column("user_id", ColumnType::new("BIGINT"))
                    .option(ColumnOption::flag("NOT NULL")),
                Field::key(Key::new(KeyType::PrimaryKey, &["id"])),
                Field::key(Key::new(KeyType::Index, &["user_id"]).named("posts_user_idx")),
                Field::key(Key::new(KeyType::Unique, &["user_id", "id"])),
                Field {
                    name: Some("posts_user_fk".into()),
                    ..Field::key(
                        Key::new(KeyType::ForeignKey, &["user_id"]).references(
                            References::new("users", &["id"])
                                .on(ReferenceEvent::OnDelete, ReferenceAction::Cascade),
                        ),
                    )
                },
            ],
        };

        let mut t = Transpiler::with_indent(0);
        t.handle_create(&create);
        let m = t.finish();

        assert_eq!(
            m.up,
            "Schema::create('posts', function (Blueprint $table) {\n\
             \t$table->bigInteger('id')\n\
             \t\t->autoIncrement();\n\
             \t$table->bigInteger('user_id');\n\
             \t$table->index('user_id', 'posts_user_idx');\n\
             \t$table->unique(['user_id', 'id'], null);\n\
             \t$table->foreign('user_id', 'posts_user_fk')\n\
             \t\t->references('id')\n\
             \t\t->on('users')->onDelete('cascade');\n\
             });"
        );
    }

    #[test]
    fn test_composite_primary_key_is_emitted() {
        let create = CreateTable {
            table: "role_user".into(),
            fields: vec![Field::key(Key::new(KeyType::PrimaryKey, &["role_id", "user_id"]))],
        };
        let mut t = Transpiler::with_indent(0);
        t.handle_create(&create);
        assert!(t.get().up.contains("\t$table->primary(['role_id', 'user_id'], null);"));
    }

    #[test]
    fn test_alter_add_column() {
        let m = run_alter(
            AlterOperation::new(&["ADD", "COLUMN"])
                .field("age")
                .tokens(vec![Token::ident("age"), Token::keyword("INT"), Token::keyword("UNSIGNED")]),
        );

        assert_eq!(
            m.up,
            "Schema::table('users', function (Blueprint $table) {\n\
             \t$table->integer('age')\n\
             \t\t->unsigned()\n\
             \t\t->nullable();\n\
             });"
        );
        assert_eq!(
            m.down,
            "Schema::table('users', function (Blueprint $table) {\n\
             \t$table->dropColumn('age');\n\
             });"
        );
    }

    #[test]
    fn test_alter_change_column_with_rename() {
        let m = run_alter(
            AlterOperation::new(&["CHANGE"]).field("name").tokens(vec![
                Token::ident("full_name"),
                Token::keyword("VARCHAR"),
                Token::Punct('('),
                Token::Literal(Value::Number("120".into())),
                Token::Punct(')'),
                Token::keyword("NOT NULL"),
            ]),
        );

        assert_eq!(
            m.up,
            "Schema::table('users', function (Blueprint $table) {\n\
             \t$table->string('name', 120)\n\
             \t\t->change();\n\
             \t$table->renameColumn('name', 'full_name');\n\
             });"
        );
        assert!(m.down.contains("// Revert manually: CHANGE COLUMN name"));
    }

    #[test]
    fn test_alter_rename_table_swaps_names() {
        let m = run_alter(
            AlterOperation::new(&["RENAME", "TO"]).tokens(vec![Token::ident("new_name")]),
        );

        assert!(m.up.contains("\t$table->rename('new_name');"));
        assert_eq!(
            m.down,
            "Schema::table('new_name', function (Blueprint $table) {\n\
             \t$table->rename('users');\n\
             });"
        );
    }

    #[test]
    fn test_alter_drop_index_reverts_with_comment() {
        let m = run_alter(AlterOperation::new(&["DROP", "INDEX"]).field("users_email_idx"));

        assert!(m.up.contains("\t$table->dropIndex('users_email_idx');"));
        let revert = m.down.lines().nth(1).unwrap();
        assert!(revert.trim_start().starts_with("//"));
        assert!(revert.contains("DROP INDEX"));
        assert!(revert.contains("users_email_idx"));
    }

    #[test]
    fn test_alter_drop_foreign_key() {
        let m = run_alter(
            AlterOperation::new(&["DROP"]).tokens(vec![Token::keyword("FOREIGN KEY"), Token::ident("fk_user")]),
        );
        assert!(m.up.contains("\t$table->dropForeign('fk_user');"));
        assert!(m.down.contains("DROP FOREIGN KEY fk_user"));
    }

    #[test]
    fn test_alter_add_unique_without_name() {
        let m = run_alter(AlterOperation::new(&["ADD"]).tokens(vec![
            Token::keyword("UNIQUE"),
            Token::Punct('('),
            Token::ident("email"),
            Token::Punct(')'),
        ]));
        assert!(m.up.contains("\t$table->unique('email', null);"));
        assert!(m.down.contains("\t$table->dropUnique(['email']);"));
    }

    #[test]
    fn test_alter_add_constraint() {
        let m = run_alter(AlterOperation::new(&["ADD", "CONSTRAINT"]).field("fk_team").tokens(vec![
            Token::keyword("FOREIGN KEY"),
            Token::Punct('('),
            Token::ident("team_id"),
            Token::Punct(')'),
            Token::keyword("REFERENCES"),
            Token::ident("teams"),
            Token::Punct('('),
            Token::ident("id"),
            Token::Punct(')'),
            Token::keyword("ON DELETE"),
            Token::keyword("SET NULL"),
        ]));

        assert_eq!(
            m.up,
            "Schema::table('users', function (Blueprint $table) {\n\
             \t$table->foreign('team_id', 'fk_team')\n\
             \t\t->references('id')\n\
             \t\t->on('teams')->onDelete('set null');\n\
             });"
        );
        assert!(m.down.contains("\t$table->dropForeign('fk_team');"));
    }

    #[test]
    fn test_alter_rename_column_and_index() {
        let m = run_alter(
            AlterOperation::new(&["RENAME", "COLUMN"])
                .field("mail")
                .tokens(vec![Token::keyword("TO"), Token::ident("email")]),
        );
        assert!(m.up.contains("\t$table->renameColumn('mail', 'email');"));
        assert!(m.down.contains("\t$table->renameColumn('email', 'mail');"));

        let m = run_alter(
            AlterOperation::new(&["RENAME", "INDEX"])
                .field("a_idx")
                .tokens(vec![Token::keyword("TO"), Token::ident("b_idx")]),
        );
        assert!(m.up.contains("\t$table->renameIndex('a_idx', 'b_idx');"));
        assert!(m.down.contains("\t$table->renameIndex('b_idx', 'a_idx');"));
    }

    #[test]
    fn test_unrecognized_clause_is_skipped() {
        let m = run_alter(AlterOperation::new(&["MODIFY"]).field("x"));
        assert_eq!(
            m.up,
            "Schema::table('users', function (Blueprint $table) {\n});"
        );
        assert_eq!(
            m.down,
            "Schema::table('users', function (Blueprint $table) {\n});"
        );
    }

    #[test]
    fn test_down_clauses_run_in_reverse() {
        let statement = AlterTable {
            table: "users".into(),
            altered: vec![
                AlterOperation::new(&["ADD"])
                    .field("a")
                    .tokens(vec![Token::ident("a"), Token::keyword("INT")]),
                AlterOperation::new(&["ADD"])
                    .field("b")
                    .tokens(vec![Token::ident("b"), Token::keyword("INT")]),
            ],
        };
        let mut t = Transpiler::with_indent(0);
        t.handle_alter(&statement);
        let down = t.finish().down;
        let b = down.find("dropColumn('b')").unwrap();
        let a = down.find("dropColumn('a')").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_drop_tables() {
        let mut t = Transpiler::with_indent(0);
        t.handle_drop(&DropTable {
            tables: vec!["a".into(), "b".into()],
        });
        let m = t.finish();
        assert_eq!(m.up, "Schema::dropIfExists('a');\nSchema::dropIfExists('b');");
        assert_eq!(
            m.down,
            "// Revert manually: DROP TABLE a (previous definition unknown)\n\
             // Revert manually: DROP TABLE b (previous definition unknown)"
        );
    }

    #[test]
    fn test_squash_reverses_down_blocks() {
        let statements = vec![
            Statement::Create(CreateTable {
                table: "a".into(),
                fields: vec![],
            }),
            Statement::Create(CreateTable {
                table: "b".into(),
                fields: vec![],
            }),
        ];
        let m = transpile_squashed(&statements, 0);
        assert_eq!(
            m.up,
            "Schema::create('a', function (Blueprint $table) {\n});\n\n\
             Schema::create('b', function (Blueprint $table) {\n});"
        );
        assert_eq!(
            m.down,
            "Schema::dropIfExists('b');\n\nSchema::dropIfExists('a');"
        );

        let each = transpile(&statements, 0);
        assert_eq!(each.len(), 2);
        assert_eq!(each[1].down, "Schema::dropIfExists('b');");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a'b\\c"), "'a\\'b\\\\c'");
    }
}
