//! DDL lexer.
//!
//! Turns SQL text into [`Lexeme`]s: typed tokens with their original
//! spelling and byte span. Whitespace and comments are skipped, words in
//! the DDL vocabulary become uppercase keywords and multi-word keywords
//! are merged into a single token.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace1, not_line_ending, one_of, satisfy},
    combinator::{map, not, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, terminated, tuple},
};

use crate::ast::{Token, Value};
use crate::error::{BlueprintError, BlueprintResult};
use crate::transpiler::types;

/// Single words recognized as keywords, besides the column type names.
const KEYWORDS: &[&str] = &[
    "ACTION",
    "ADD",
    "AFTER",
    "ALTER",
    "AS",
    "AUTO_INCREMENT",
    "CASCADE",
    "CHANGE",
    "CHARACTER",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "COMMENT",
    "CONSTRAINT",
    "CREATE",
    "DEFAULT",
    "DELETE",
    "DROP",
    "EXISTS",
    "FIRST",
    "FOREIGN",
    "FULLTEXT",
    "IF",
    "IGNORE",
    "INDEX",
    "KEY",
    "MODIFY",
    "NO",
    "NOT",
    "NULL",
    "ON",
    "PRECISION",
    "PRIMARY",
    "REFERENCES",
    "RENAME",
    "RESTRICT",
    "SET",
    "SIGNED",
    "SPATIAL",
    "TABLE",
    "TEMPORARY",
    "TO",
    "UNIQUE",
    "UNSIGNED",
    "UPDATE",
    "ZEROFILL",
];

/// Multi-word keywords, longest first.
const COMPOUND_KEYWORDS: &[&[&str]] = &[
    &["IF", "NOT", "EXISTS"],
    &["CHARACTER", "SET"],
    &["DOUBLE", "PRECISION"],
    &["PRIMARY", "KEY"],
    &["FOREIGN", "KEY"],
    &["UNIQUE", "INDEX"],
    &["UNIQUE", "KEY"],
    &["FULLTEXT", "INDEX"],
    &["FULLTEXT", "KEY"],
    &["NOT", "NULL"],
    &["ON", "DELETE"],
    &["ON", "UPDATE"],
    &["SET", "NULL"],
    &["NO", "ACTION"],
    &["SET", "DEFAULT"],
    &["IF", "EXISTS"],
];

/// A token with the text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    /// Original spelling; unescaped content for string literals.
    pub raw: String,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Byte offset just past the last character.
    pub end: usize,
}

impl Lexeme {
    /// Text usable as a name. Keywords count, so `date` or `text` can name
    /// a column.
    pub fn name(&self) -> Option<&str> {
        match &self.token {
            Token::Identifier(name) => Some(name),
            Token::Keyword(_) => Some(&self.raw),
            Token::Literal(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The token, with keywords demoted to identifiers.
    pub fn as_identifier(&self) -> Token {
        match self.name() {
            Some(name) => Token::Identifier(name.to_string()),
            None => self.token.clone(),
        }
    }
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word) || types::is_column_type(word)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whitespace, `-- ...`, `# ...` and `/* ... */`.
fn trivia(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            multispace1,
            recognize(pair(alt((tag("--"), tag("#"))), not_line_ending)),
            recognize(tuple((tag("/*"), take_until("*/"), tag("*/")))),
        ))),
    )(input)
}

fn backquoted(input: &str) -> IResult<&str, (Token, String)> {
    map(
        delimited(char('`'), take_while(|c| c != '`'), char('`')),
        |name: &str| (Token::ident(name), name.to_string()),
    )(input)
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

/// `'...'` or `"..."`, with doubled quotes and backslash escapes.
fn quoted(input: &str) -> IResult<&str, (Token, String)> {
    let (mut rest, quote) = one_of::<_, _, Error<&str>>("'\"")(input)?;
    let unterminated = || nom::Err::Failure(Error::new(input, ErrorKind::Char));
    let mut text = String::new();

    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None => return Err(unterminated()),
            Some('\\') => {
                let escaped = chars.next().ok_or_else(unterminated)?;
                text.push(unescape(escaped));
            }
            Some(c) if c == quote => {
                let after = chars.as_str();
                match after.strip_prefix(quote) {
                    Some(doubled) => {
                        text.push(quote);
                        rest = doubled;
                        continue;
                    }
                    None => {
                        rest = after;
                        break;
                    }
                }
            }
            Some(c) => text.push(c),
        }
        rest = chars.as_str();
    }

    Ok((rest, (Token::Literal(Value::String(text.clone())), text)))
}

/// `b'0101'` or `x'0A'`, read as the number it spells. Digits that do
/// not fit the radix keep their text as a string.
fn bit_or_hex_literal(input: &str) -> IResult<&str, (Token, String)> {
    let (rest, (prefix, (_, digits))) = tuple((one_of("bBxX"), quoted))(input)?;
    let radix = if prefix.eq_ignore_ascii_case(&'b') { 2 } else { 16 };
    let raw = input[..input.len() - rest.len()].to_string();

    let value = match u128::from_str_radix(&digits, radix) {
        Ok(n) => Value::Number(n.to_string()),
        Err(_) => Value::String(digits),
    };
    Ok((rest, (Token::Literal(value), raw)))
}

fn number(input: &str) -> IResult<&str, (Token, String)> {
    map(
        terminated(
            recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit0))))),
            not(satisfy(is_word_char)),
        ),
        |n: &str| (Token::Literal(Value::Number(n.to_string())), n.to_string()),
    )(input)
}

fn word(input: &str) -> IResult<&str, (Token, String)> {
    map(take_while1(is_word_char), |w: &str| {
        let upper = w.to_ascii_uppercase();
        let token = if upper == "CHARSET" {
            Token::keyword("CHARACTER SET")
        } else if is_keyword(&upper) {
            Token::Keyword(upper)
        } else {
            Token::ident(w)
        };
        (token, w.to_string())
    })(input)
}

fn punct(input: &str) -> IResult<&str, (Token, String)> {
    map(one_of("(),;.=<>+-*/%!:@?&|~^[]{}"), |c| {
        (Token::Punct(c), c.to_string())
    })(input)
}

fn lexeme(input: &str) -> IResult<&str, (Token, String)> {
    alt((backquoted, quoted, bit_or_hex_literal, number, word, punct))(input)
}

/// Tokenize a DDL script.
pub fn tokenize(input: &str) -> BlueprintResult<Vec<Lexeme>> {
    let offset = |rest: &str| input.len() - rest.len();
    let mut lexemes = vec![];
    let mut rest = input;

    loop {
        // trivia never fails; an unterminated comment is left in place
        if let Ok((after, _)) = trivia(rest) {
            rest = after;
        }
        if rest.is_empty() {
            break;
        }
        if rest.starts_with("/*") {
            return Err(BlueprintError::parse(offset(rest), "unterminated comment"));
        }

        match lexeme(rest) {
            Ok((after, (token, raw))) => {
                lexemes.push(Lexeme {
                    token,
                    raw,
                    offset: offset(rest),
                    end: offset(after),
                });
                rest = after;
            }
            Err(_) => {
                let body = rest
                    .strip_prefix(['b', 'B', 'x', 'X'])
                    .filter(|b| b.starts_with('\''))
                    .unwrap_or(rest);
                let message = if body.starts_with(['\'', '"', '`']) {
                    "unterminated quoted text".to_string()
                } else {
                    let c = rest.chars().next().unwrap_or_default();
                    format!("unexpected character '{}'", c)
                };
                return Err(BlueprintError::parse(offset(rest), message));
            }
        }
    }

    Ok(merge_compounds(lexemes))
}

fn merge_compounds(lexemes: Vec<Lexeme>) -> Vec<Lexeme> {
    let mut merged = Vec::with_capacity(lexemes.len());
    let mut i = 0;

    while i < lexemes.len() {
        let window = &lexemes[i..];
        let compound = COMPOUND_KEYWORDS.iter().find(|words| {
            window.len() >= words.len()
                && words.iter().zip(window).all(|(w, l)| l.token.is_keyword(w))
        });

        match compound {
            Some(words) => {
                let parts = &window[..words.len()];
                let raw: Vec<&str> = parts.iter().map(|l| l.raw.as_str()).collect();
                merged.push(Lexeme {
                    token: Token::Keyword(words.join(" ")),
                    raw: raw.join(" "),
                    offset: parts[0].offset,
                    end: parts[parts.len() - 1].end,
                });
                i += words.len();
            }
            None => {
                merged.push(lexemes[i].clone());
                i += 1;
            }
        }
    }

    merged
}
