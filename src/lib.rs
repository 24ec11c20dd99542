//! # sql2blueprint
//!
//! > **Write the DDL once. Get the migration for free.**
//!
//! sql2blueprint turns MySQL table DDL into schema-builder migrations, with
//! an `up` that applies each change and a `down` that reverts it.
//!
//! ## Quick Example
//!
//! ```rust
//! use sql2blueprint::prelude::*;
//!
//! let statements = sql2blueprint::parse(
//!     "CREATE TABLE users (id INT UNSIGNED AUTO_INCREMENT, name VARCHAR(50) NOT NULL);",
//! )
//! .unwrap();
//!
//! let migration = statements[0].to_migration();
//! assert!(migration.up.contains("$table->string('name', 50);"));
//! assert_eq!(migration.down, "Schema::dropIfExists('users');");
//! ```
//!
//! ## Pipeline
//!
//! | Stage        | Module         | Output                    |
//! |--------------|----------------|---------------------------|
//! | Lex + parse  | [`parser`]     | [`ast::Statement`]s       |
//! | Transpile    | [`transpiler`] | up/down [`transpiler::Migration`] |
//! | Write        | [`migration`]  | timestamped migration files |

pub mod ast;
pub mod config;
pub mod definition;
pub mod error;
pub mod migration;
pub mod parser;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::definition::Definition;
    pub use crate::error::*;
    pub use crate::migration::{MigrationWriter, PendingMigration, Stub, plan};
    pub use crate::parser::parse;
    pub use crate::transpiler::{Migration, ToMigration, Transpiler};
}

/// Parse a DDL script into its table statements.
///
/// # Example
///
/// ```
/// use sql2blueprint::parse;
///
/// let statements = parse("DROP TABLE IF EXISTS sessions;").unwrap();
/// assert_eq!(statements[0].table(), "sessions");
/// ```
pub fn parse(input: &str) -> Result<Vec<ast::Statement>, error::BlueprintError> {
    parser::parse(input)
}
