//! Migration files.
//!
//! Wraps transpiled up/down code into timestamped migration files built
//! from a stub.
//!
//! ## Generated Files
//! ```text
//! database/migrations/
//! ├── 2026_10_16_093400_create_users_table.php
//! └── 2026_10_16_093401_update_posts_table.php
//! ```

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::ast::Statement;
use crate::error::{BlueprintError, BlueprintResult};
use crate::transpiler::{Migration, Transpiler};

const UP_PLACEHOLDERS: &[&str] = &[
    "{{ up }}",
    "{{up}}",
    "{{ definition }}",
    "{{definition}}",
    "DummyDefinition",
];
const DOWN_PLACEHOLDERS: &[&str] = &["{{ down }}", "{{down}}"];
const TABLE_PLACEHOLDERS: &[&str] = &["{{ table }}", "{{table}}"];

/// Built-in stub. Placeholders sit at the default indent of two tabs.
pub const DEFAULT_STUB: &str = "<?php

use Illuminate\\Database\\Migrations\\Migration;
use Illuminate\\Database\\Schema\\Blueprint;
use Illuminate\\Support\\Facades\\Schema;

return new class extends Migration
{
\t/**
\t * Run the migrations.
\t */
\tpublic function up(): void
\t{
\t\t{{ up }}
\t}

\t/**
\t * Reverse the migrations.
\t */
\tpublic function down(): void
\t{
\t\t{{ down }}
\t}
};
";

const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Default migration name for a statement.
pub fn migration_name(statement: &Statement) -> String {
    let name = match statement {
        Statement::Create(create) => format!("create_{}_table", create.table),
        Statement::Alter(alter) => format!("update_{}_table", alter.table),
        Statement::Drop(drop) => match drop.tables.as_slice() {
            [table] => format!("drop_{}_table", table),
            [first, ..] => format!("drop_{}_table_and_more", first),
            [] => "drop_tables".to_string(),
        },
    };
    sanitize(&name)
}

/// Lowercase, with anything outside `[a-z0-9_]` folded to `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// A migration waiting for a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMigration {
    pub name: String,
    /// Primary table, substituted for `{{ table }}`.
    pub table: String,
    pub migration: Migration,
}

/// Transpile `statements` into pending migrations: one per statement, or a
/// single one named `squash` holding all of them.
pub fn plan(statements: &[Statement], indent: usize, squash: Option<&str>) -> Vec<PendingMigration> {
    let mut transpiler = Transpiler::with_indent(indent);

    if let Some(name) = squash {
        let Some(first) = statements.first() else {
            return vec![];
        };
        for statement in statements {
            transpiler.handle(statement);
        }
        return vec![PendingMigration {
            name: sanitize(name),
            table: first.table().to_string(),
            migration: transpiler.finish(),
        }];
    }

    statements
        .iter()
        .map(|statement| {
            transpiler.handle(statement);
            PendingMigration {
                name: migration_name(statement),
                table: statement.table().to_string(),
                migration: transpiler.finish(),
            }
        })
        .collect()
}

/// A migration stub with its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stub {
    template: String,
}

impl Default for Stub {
    fn default() -> Self {
        Self {
            template: DEFAULT_STUB.to_string(),
        }
    }
}

impl Stub {
    /// A stub from its text; it must carry an up placeholder.
    pub fn new(template: impl Into<String>) -> BlueprintResult<Self> {
        let template = template.into();
        if !UP_PLACEHOLDERS.iter().any(|p| template.contains(p)) {
            return Err(BlueprintError::Template(
                "stub has no up placeholder ({{ up }}, {{ definition }} or DummyDefinition)"
                    .to_string(),
            ));
        }
        Ok(Self { template })
    }

    pub fn load(path: &Path) -> BlueprintResult<Self> {
        let template = fs::read_to_string(path)?;
        Self::new(template).map_err(|e| match e {
            BlueprintError::Template(message) => {
                BlueprintError::Template(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Fill the placeholders in one pass, so generated code is never
    /// scanned for placeholders itself.
    pub fn render(&self, table: &str, migration: &Migration) -> String {
        let substitutions: [(&[&str], &str); 3] = [
            (UP_PLACEHOLDERS, migration.up.as_str()),
            (DOWN_PLACEHOLDERS, migration.down.as_str()),
            (TABLE_PLACEHOLDERS, table),
        ];

        let mut out = String::with_capacity(self.template.len() + migration.up.len() + migration.down.len());
        let mut rest = self.template.as_str();

        'scan: while let Some(c) = rest.chars().next() {
            for (placeholders, value) in &substitutions {
                for placeholder in placeholders.iter() {
                    if let Some(after) = rest.strip_prefix(placeholder) {
                        out.push_str(value);
                        rest = after;
                        continue 'scan;
                    }
                }
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }

        out
    }
}

/// A rendered migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub file_name: String,
    pub contents: String,
}

/// Names and renders migration files, and writes them out.
#[derive(Debug, Clone)]
pub struct MigrationWriter {
    stub: Stub,
    start: NaiveDateTime,
}

impl MigrationWriter {
    /// A writer stamping files from the current local time.
    pub fn new(stub: Stub) -> Self {
        Self {
            stub,
            start: Local::now().naive_local(),
        }
    }

    pub fn starting_at(mut self, start: NaiveDateTime) -> Self {
        self.start = start;
        self
    }

    /// `<YYYY_MM_DD_HHMMSS>_<name>.php`, one second later per position so
    /// files sort in statement order.
    pub fn file_name(&self, position: usize, name: &str) -> String {
        let stamp = self.start + Duration::seconds(position as i64);
        format!("{}_{}.php", stamp.format(TIMESTAMP_FORMAT), name)
    }

    /// Render without touching the filesystem.
    pub fn render(&self, pending: &[PendingMigration]) -> Vec<MigrationFile> {
        pending
            .iter()
            .enumerate()
            .map(|(position, p)| MigrationFile {
                file_name: self.file_name(position, &p.name),
                contents: self.stub.render(&p.table, &p.migration),
            })
            .collect()
    }

    /// Write `files` into `dir`, creating it if needed.
    ///
    /// Nothing is left behind when any target already exists: existing
    /// targets are refused up front, and files written earlier in the
    /// batch are removed if a later one fails.
    pub fn write(dir: &Path, files: &[MigrationFile]) -> BlueprintResult<Vec<PathBuf>> {
        let paths: Vec<PathBuf> = files.iter().map(|f| dir.join(&f.file_name)).collect();
        if let Some(existing) = paths.iter().find(|p| p.exists()) {
            return Err(BlueprintError::Exists(existing.clone()));
        }

        fs::create_dir_all(dir)?;

        let mut written: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for (file, path) in files.iter().zip(&paths) {
            if let Err(e) = write_new(path, &file.contents) {
                for done in &written {
                    if let Err(cleanup) = fs::remove_file(done) {
                        warn!(path = %done.display(), error = %cleanup, "could not remove migration");
                    }
                }
                return Err(e);
            }
            debug!(path = %path.display(), "wrote migration");
            written.push(path.clone());
        }

        Ok(written)
    }
}

/// Create `path`, failing if it exists. A partly written file is removed.
fn write_new(path: &Path, contents: &str) -> BlueprintResult<()> {
    let mut handle = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => BlueprintError::Exists(path.to_path_buf()),
            _ => BlueprintError::Io(e),
        })?;

    if let Err(e) = handle.write_all(contents.as_bytes()) {
        drop(handle);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "could not remove migration");
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CreateTable, DropTable};
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(9, 34, 59))
            .unwrap()
    }

    fn migration(up: &str, down: &str) -> Migration {
        Migration {
            up: up.into(),
            down: down.into(),
        }
    }

    #[test]
    fn test_migration_names() {
        let create = Statement::Create(CreateTable {
            table: "Users".into(),
            fields: vec![],
        });
        assert_eq!(migration_name(&create), "create_users_table");

        let drop = Statement::Drop(DropTable {
            tables: vec!["a".into(), "b".into()],
        });
        assert_eq!(migration_name(&drop), "drop_a_table_and_more");
    }

    #[test]
    fn test_file_names_advance_per_file() {
        let writer = MigrationWriter::new(Stub::default()).starting_at(start());
        assert_eq!(writer.file_name(0, "x"), "2026_10_16_093459_x.php");
        assert_eq!(writer.file_name(1, "y"), "2026_10_16_093500_y.php");
    }

    #[test]
    fn test_stub_placeholders() {
        let stub = Stub::new("{{table}}|DummyDefinition|{{ down }}|{{ up }}").unwrap();
        assert_eq!(
            stub.render("users", &migration("U", "D")),
            "users|U|D|U"
        );
    }

    #[test]
    fn test_generated_code_is_not_rescanned() {
        let stub = Stub::new("{{ up }}").unwrap();
        assert_eq!(
            stub.render("t", &migration("'{{ down }}'", "D")),
            "'{{ down }}'"
        );
    }

    #[test]
    fn test_stub_without_up_placeholder() {
        assert!(matches!(
            Stub::new("<?php // nothing"),
            Err(BlueprintError::Template(_))
        ));
    }

    #[test]
    fn test_default_stub_layout() {
        let text = Stub::default().render("t", &migration("UP\n\t\tMORE", "DOWN"));
        assert!(text.contains("\tpublic function up(): void\n\t{\n\t\tUP\n\t\tMORE\n\t}"));
        assert!(text.contains("\t{\n\t\tDOWN\n\t}"));
    }

    #[test]
    fn test_plan_squash() {
        let statements = vec![
            Statement::Create(CreateTable {
                table: "a".into(),
                fields: vec![],
            }),
            Statement::Drop(DropTable {
                tables: vec!["b".into()],
            }),
        ];

        let each = plan(&statements, 0, None);
        assert_eq!(each.len(), 2);
        assert_eq!(each[1].name, "drop_b_table");

        let squashed = plan(&statements, 0, Some("Import Shop"));
        assert_eq!(squashed.len(), 1);
        assert_eq!(squashed[0].name, "import_shop");
        assert_eq!(squashed[0].table, "a");
        assert!(squashed[0].migration.up.contains("dropIfExists('b')"));

        assert!(plan(&[], 0, Some("x")).is_empty());
    }
}
