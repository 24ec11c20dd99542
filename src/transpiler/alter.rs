//! ALTER clause classification.
//!
//! An ALTER clause has no single discriminant: what it does follows from
//! its leading keyword set, and sometimes from the first token after it.
//! Classification is a table lookup checked in priority order.

use std::collections::BTreeSet;
use std::fmt;

use crate::ast::{ColumnOption, Token};

use super::{modifiers, types};

/// What an ALTER clause does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlterKind {
    AddColumn,
    ChangeColumn,
    AddIndex,
    AddUnique,
    AddFullText,
    AddConstraint,
    DropColumn,
    DropIndex,
    DropForeignKey,
    RenameTable,
    RenameColumn,
    RenameIndex,
}

impl fmt::Display for AlterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlterKind::AddColumn => "ADD COLUMN",
            AlterKind::ChangeColumn => "CHANGE COLUMN",
            AlterKind::AddIndex => "ADD INDEX",
            AlterKind::AddUnique => "ADD UNIQUE",
            AlterKind::AddFullText => "ADD FULLTEXT",
            AlterKind::AddConstraint => "ADD CONSTRAINT",
            AlterKind::DropColumn => "DROP COLUMN",
            AlterKind::DropIndex => "DROP INDEX",
            AlterKind::DropForeignKey => "DROP FOREIGN KEY",
            AlterKind::RenameTable => "RENAME TABLE",
            AlterKind::RenameColumn => "RENAME COLUMN",
            AlterKind::RenameIndex => "RENAME INDEX",
        };
        f.write_str(label)
    }
}

/// Overrides a rule when the clause's first token is one of `tokens`.
struct Peek {
    tokens: &'static [&'static str],
    kind: AlterKind,
    consume: bool,
}

struct Rule {
    options: &'static [&'static str],
    peeks: &'static [Peek],
    fallback: Option<AlterKind>,
}

const fn rule(options: &'static [&'static str], kind: AlterKind) -> Rule {
    Rule {
        options,
        peeks: &[],
        fallback: Some(kind),
    }
}

const ADD_PEEKS: &[Peek] = &[
    Peek {
        tokens: &["UNIQUE", "UNIQUE INDEX", "UNIQUE KEY"],
        kind: AlterKind::AddUnique,
        consume: true,
    },
    Peek {
        tokens: &["FULLTEXT", "FULLTEXT INDEX", "FULLTEXT KEY"],
        kind: AlterKind::AddFullText,
        consume: true,
    },
    Peek {
        tokens: &["FOREIGN KEY"],
        kind: AlterKind::AddConstraint,
        consume: false,
    },
];

const RULES: &[Rule] = &[
    Rule {
        options: &["ADD"],
        peeks: ADD_PEEKS,
        fallback: Some(AlterKind::AddColumn),
    },
    Rule {
        options: &["ADD", "COLUMN"],
        peeks: ADD_PEEKS,
        fallback: Some(AlterKind::AddColumn),
    },
    rule(&["CHANGE"], AlterKind::ChangeColumn),
    rule(&["CHANGE", "COLUMN"], AlterKind::ChangeColumn),
    rule(&["ADD", "INDEX"], AlterKind::AddIndex),
    rule(&["ADD", "KEY"], AlterKind::AddIndex),
    rule(&["ADD", "FULLTEXT"], AlterKind::AddFullText),
    rule(&["ADD", "CONSTRAINT"], AlterKind::AddConstraint),
    Rule {
        options: &["DROP"],
        peeks: &[Peek {
            tokens: &["FOREIGN KEY"],
            kind: AlterKind::DropForeignKey,
            consume: true,
        }],
        fallback: Some(AlterKind::DropColumn),
    },
    rule(&["DROP", "COLUMN"], AlterKind::DropColumn),
    rule(&["DROP", "INDEX"], AlterKind::DropIndex),
    rule(&["DROP", "KEY"], AlterKind::DropIndex),
    Rule {
        options: &["RENAME"],
        peeks: &[Peek {
            tokens: &["AS"],
            kind: AlterKind::RenameTable,
            consume: true,
        }],
        fallback: None,
    },
    rule(&["RENAME", "TO"], AlterKind::RenameTable),
    rule(&["RENAME", "COLUMN"], AlterKind::RenameColumn),
    rule(&["RENAME", "INDEX"], AlterKind::RenameIndex),
    rule(&["RENAME", "KEY"], AlterKind::RenameIndex),
];

/// Classify a clause by its keyword set and first token.
///
/// Returns the kind together with the token stream minus any keyword the
/// classification consumed, or `None` for a clause nothing here handles.
pub fn classify<'a>(options: &[String], tokens: &'a [Token]) -> Option<(AlterKind, &'a [Token])> {
    let options: BTreeSet<String> = options.iter().map(|o| o.to_ascii_uppercase()).collect();

    let rule = RULES.iter().find(|rule| {
        rule.options.len() == options.len() && rule.options.iter().all(|o| options.contains(*o))
    })?;

    if let Some(head) = tokens.first() {
        for peek in rule.peeks {
            if peek.tokens.iter().any(|t| head.is_keyword(t)) {
                let rest = if peek.consume { &tokens[1..] } else { tokens };
                return Some((peek.kind, rest));
            }
        }
    }

    rule.fallback.map(|kind| (kind, tokens))
}

/// Text of a token used as a parameter or a name.
pub fn token_text(token: &Token) -> String {
    token.to_value().text().to_string()
}

/// The comma-separated tokens between the first `(` and the first `)`
/// after it. Parentheses are not nested; a missing `)` yields nothing.
pub fn parameters(tokens: &[Token]) -> Vec<String> {
    let Some(open) = tokens.iter().position(|t| t.is_punct('(')) else {
        return vec![];
    };
    let Some(len) = tokens[open + 1..].iter().position(|t| t.is_punct(')')) else {
        return vec![];
    };

    tokens[open + 1..open + 1 + len]
        .iter()
        .filter(|t| !t.is_punct(','))
        .map(token_text)
        .collect()
}

/// A column definition recovered from an ADD/CHANGE clause's tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnClause {
    pub type_name: Option<String>,
    pub parameters: Vec<String>,
    pub options: Vec<ColumnOption>,
}

/// Scan the tokens following the column name, left to right. The first
/// known type sets the declaration; modifier keywords become options, and
/// value-bearing ones take the next token as their value.
pub fn scan_column(tokens: &[Token]) -> ColumnClause {
    let mut clause = ColumnClause::default();
    let mut rest = tokens;

    while let Some((head, tail)) = rest.split_first() {
        rest = tail;
        let Some(keyword) = head.as_keyword() else {
            continue;
        };

        if clause.type_name.is_none() && types::is_column_type(keyword) {
            clause.type_name = Some(keyword.to_string());
            if tail.first().is_some_and(|t| t.is_punct('(')) {
                clause.parameters = parameters(tail);
            }
        } else if let Some(modifier) = modifiers::whitelisted(keyword) {
            if !modifier.takes_value() {
                clause.options.push(ColumnOption::flag(keyword));
            } else if let Some((value, after)) = rest.split_first() {
                clause
                    .options
                    .push(ColumnOption::key_value(keyword, value.to_value()));
                rest = after;
            }
        } else if modifiers::BLACKLIST.iter().any(|m| m.option == keyword) {
            clause.options.push(ColumnOption::flag(keyword));
        }
    }

    clause
}
