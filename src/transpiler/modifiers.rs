//! Column modifier calls chained after a column declaration.
//!
//! Two policies drive emission. A whitelist modifier is emitted when its
//! SQL option is present; a blacklist modifier when its option is absent
//! (`NOT NULL` missing means the column is nullable). Whitelist calls come
//! out in table order, blacklist calls last.

use crate::ast::{ColumnOption, Value};

use super::quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Argument {
    None,
    Quoted,
    Default,
}

/// Maps one SQL column option to one modifier call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier {
    pub option: &'static str,
    pub call: &'static str,
    argument: Argument,
}

const fn modifier(option: &'static str, call: &'static str, argument: Argument) -> Modifier {
    Modifier {
        option,
        call,
        argument,
    }
}

pub const WHITELIST: &[Modifier] = &[
    modifier("UNSIGNED", "unsigned", Argument::None),
    modifier("AUTO_INCREMENT", "autoIncrement", Argument::None),
    modifier("CHARACTER SET", "charset", Argument::Quoted),
    modifier("COLLATE", "collation", Argument::Quoted),
    modifier("DEFAULT", "default", Argument::Default),
    modifier("AFTER", "after", Argument::Quoted),
];

pub const BLACKLIST: &[Modifier] = &[modifier("NOT NULL", "nullable", Argument::None)];

/// The whitelist entry for an option name.
pub fn whitelisted(option: &str) -> Option<&'static Modifier> {
    WHITELIST.iter().find(|m| m.option == option)
}

impl Modifier {
    /// Whether the SQL option carries a value (`COLLATE utf8mb4_bin`).
    pub fn takes_value(&self) -> bool {
        self.argument != Argument::None
    }

    /// Render the call. A value-bearing modifier without a value renders
    /// nothing.
    pub fn render(&self, value: Option<&Value>) -> Option<String> {
        let argument = match (self.argument, value) {
            (Argument::None, _) => String::new(),
            (Argument::Quoted, Some(v)) => quote(v.text()),
            (Argument::Default, Some(v)) => default_argument(v),
            (_, None) => return None,
        };
        Some(format!("->{}({})", self.call, argument))
    }
}

/// Numbers become string literals, `NULL` stays `NULL`, and anything else
/// passes through so the target's own coercion decides what it means.
fn default_argument(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => quote(s),
        Value::Number(n) => format!("\"{}\"", n),
        Value::Expr(e) if e.eq_ignore_ascii_case("NULL") => "NULL".to_string(),
        Value::Expr(e) if is_numeric(e) => format!("\"{}\"", e),
        Value::Expr(e) => e.clone(),
    }
}

/// Loose numeric check: optional sign, digits with an optional fraction,
/// optional exponent.
pub fn is_numeric(text: &str) -> bool {
    let text = text.trim();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits(whole) || !digits(fraction) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && digits(exp)
        }
    }
}

/// Modifier calls for a merged (type-level then field-level) option list.
pub fn resolve<'a>(options: impl IntoIterator<Item = &'a ColumnOption>) -> Vec<String> {
    let options: Vec<&ColumnOption> = options.into_iter().collect();
    let find = |name: &str| options.iter().find(|o| o.name() == name);

    let mut calls: Vec<String> = WHITELIST
        .iter()
        .filter_map(|m| find(m.option).and_then(|o| m.render(o.value())))
        .collect();

    calls.extend(
        BLACKLIST
            .iter()
            .filter(|m| find(m.option).is_none())
            .filter_map(|m| m.render(None)),
    );

    calls
}
