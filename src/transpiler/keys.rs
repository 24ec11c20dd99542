//! Index, key and foreign-key declarations.

use crate::ast::{KeyType, ReferenceAction, ReferenceEvent, ReferenceOption, References};
use crate::definition::Definition;

use super::quote;

/// Key declaration methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Primary,
    Index,
    Unique,
    FullText,
    Foreign,
}

impl KeyKind {
    pub fn call(self) -> &'static str {
        match self {
            KeyKind::Primary => "primary",
            KeyKind::Index => "index",
            KeyKind::Unique => "unique",
            KeyKind::FullText => "fullText",
            KeyKind::Foreign => "foreign",
        }
    }

    /// The call that undoes this key, where one exists.
    pub fn drop_call(self) -> Option<GenericCall> {
        match self {
            KeyKind::Primary => None,
            KeyKind::Index => Some(GenericCall::DropIndex),
            KeyKind::Unique => Some(GenericCall::DropUnique),
            KeyKind::FullText => Some(GenericCall::DropFullText),
            KeyKind::Foreign => Some(GenericCall::DropForeign),
        }
    }
}

impl From<KeyType> for KeyKind {
    fn from(key_type: KeyType) -> Self {
        match key_type {
            KeyType::PrimaryKey => KeyKind::Primary,
            KeyType::Index => KeyKind::Index,
            KeyType::Unique => KeyKind::Unique,
            KeyType::FullText => KeyKind::FullText,
            KeyType::ForeignKey => KeyKind::Foreign,
        }
    }
}

/// Chained calls that take one name or a list of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericCall {
    References,
    DropColumn,
    DropIndex,
    DropUnique,
    DropFullText,
    DropForeign,
}

impl GenericCall {
    pub fn call(self) -> &'static str {
        match self {
            GenericCall::References => "references",
            GenericCall::DropColumn => "dropColumn",
            GenericCall::DropIndex => "dropIndex",
            GenericCall::DropUnique => "dropUnique",
            GenericCall::DropFullText => "dropFullText",
            GenericCall::DropForeign => "dropForeign",
        }
    }
}

/// `'a'` for one name, `['a', 'b']` for several.
fn names(values: &[String]) -> String {
    match values {
        [single] => quote(single),
        [] => quote(""),
        many => list(many),
    }
}

/// Always the bracketed form, even for one name.
fn list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("[{}]", quoted.join(", "))
}

/// `$table->index('col', 'name')`; an absent name renders as `null`.
pub fn key_blueprint(kind: KeyKind, columns: &[String], index_name: Option<&str>) -> String {
    let index_name = index_name.map(quote).unwrap_or_else(|| "null".to_string());
    format!("$table->{}({}, {})", kind.call(), names(columns), index_name)
}

/// `->references('id')`, `->dropColumn(['a', 'b'])`, ...
pub fn generic_blueprint(call: GenericCall, values: &[String]) -> String {
    format!("->{}({})", call.call(), names(values))
}

/// `$table->dropIndex('name')`.
pub fn drop_blueprint(call: GenericCall, target: &str) -> String {
    format!("$table{}", generic_blueprint(call, &[target.to_string()]))
}

/// Drop by column list, letting the target derive the conventional key
/// name: `$table->dropUnique(['email'])`.
pub fn drop_by_columns(call: GenericCall, columns: &[String]) -> String {
    format!("$table->{}({})", call.call(), list(columns))
}

pub fn on_blueprint(table: &str) -> String {
    format!("->on({})", quote(table))
}

/// `->onDelete('cascade')`.
pub fn reference_option(option: &ReferenceOption) -> String {
    let call = match option.event {
        ReferenceEvent::OnDelete => "onDelete",
        ReferenceEvent::OnUpdate => "onUpdate",
    };
    let action = match option.action {
        ReferenceAction::Restrict => "restrict",
        ReferenceAction::Cascade => "cascade",
        ReferenceAction::SetNull => "set null",
        ReferenceAction::NoAction => "no action",
        ReferenceAction::SetDefault => "set default",
    };
    format!("->{}({})", call, quote(action))
}

/// Write a complete foreign key: the `foreign` call, then the indented
/// `references`/`on` chain and any referential actions, then `;`.
pub fn write_foreign(
    def: &mut Definition,
    columns: &[String],
    name: Option<&str>,
    references: Option<&References>,
) {
    def.line(&key_blueprint(KeyKind::Foreign, columns, name));

    if let Some(references) = references {
        def.indent();
        if !references.columns.is_empty() {
            def.line(&generic_blueprint(GenericCall::References, &references.columns));
        }
        if !references.table.is_empty() {
            def.line(&on_blueprint(&references.table));
        }
        for option in &references.options {
            def.push(&reference_option(option));
        }
        def.dedent();
    }

    def.push(";");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(c: &[&str]) -> Vec<String> {
        c.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_and_multi_column_keys() {
        assert_eq!(
            key_blueprint(KeyKind::Index, &cols(&["email"]), Some("users_email_idx")),
            "$table->index('email', 'users_email_idx')"
        );
        assert_eq!(
            key_blueprint(KeyKind::Unique, &cols(&["a", "b"]), None),
            "$table->unique(['a', 'b'], null)"
        );
        assert_eq!(
            key_blueprint(KeyKind::Primary, &cols(&["id"]), None),
            "$table->primary('id', null)"
        );
    }

    #[test]
    fn test_generic_shapes() {
        assert_eq!(
            generic_blueprint(GenericCall::References, &cols(&["id"])),
            "->references('id')"
        );
        assert_eq!(
            generic_blueprint(GenericCall::DropColumn, &cols(&["a", "b"])),
            "->dropColumn(['a', 'b'])"
        );
        assert_eq!(
            drop_blueprint(GenericCall::DropFullText, "body_ft"),
            "$table->dropFullText('body_ft')"
        );
        assert_eq!(
            drop_by_columns(GenericCall::DropUnique, &cols(&["email"])),
            "$table->dropUnique(['email'])"
        );
    }

    #[test]
    fn test_reference_options() {
        let opt = ReferenceOption {
            event: ReferenceEvent::OnUpdate,
            action: ReferenceAction::SetNull,
        };
        assert_eq!(reference_option(&opt), "->onUpdate('set null')");
    }

    #[test]
    fn test_write_foreign_chain() {
        let refs = References::new("users", &["id"])
            .on(ReferenceEvent::OnDelete, ReferenceAction::Cascade)
            .on(ReferenceEvent::OnUpdate, ReferenceAction::NoAction);

        let mut def = Definition::with_indent(0);
        def.line("open");
        def.indent();
        write_foreign(&mut def, &cols(&["user_id"]), Some("fk_user"), Some(&refs));
        def.dedent();

        assert_eq!(
            def.get(),
            "open\n\
             \t$table->foreign('user_id', 'fk_user')\n\
             \t\t->references('id')\n\
             \t\t->on('users')->onDelete('cascade')->onUpdate('no action');"
        );
        assert_eq!(def.level(), 0);
    }

    #[test]
    fn test_write_foreign_without_references() {
        let mut def = Definition::with_indent(0);
        write_foreign(&mut def, &cols(&["a", "b"]), None, None);
        assert_eq!(def.get(), "$table->foreign(['a', 'b'], null);");
    }
}
