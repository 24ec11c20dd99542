//! SQL column type → column declaration call.

use super::quote;

/// One row of the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBlueprint {
    /// SQL type name, uppercase.
    pub sql: &'static str,
    /// Declaration method on the table blueprint.
    pub call: &'static str,
    /// Whether the first type parameter becomes a length argument.
    pub takes_length: bool,
}

const fn plain(sql: &'static str, call: &'static str) -> ColumnBlueprint {
    ColumnBlueprint {
        sql,
        call,
        takes_length: false,
    }
}

/// Every SQL type the transpiler knows how to declare.
pub const COLUMN_TYPES: &[ColumnBlueprint] = &[
    plain("INT", "integer"),
    plain("INTEGER", "integer"),
    plain("SMALLINT", "smallInteger"),
    plain("TINYINT", "tinyInteger"),
    plain("MEDIUMINT", "mediumInteger"),
    plain("BIGINT", "bigInteger"),
    plain("DEC", "decimal"),
    plain("FIXED", "decimal"),
    plain("NUMERIC", "decimal"),
    plain("DECIMAL", "decimal"),
    plain("FLOAT", "float"),
    plain("DOUBLE", "double"),
    plain("REAL", "double"),
    plain("DOUBLE PRECISION", "double"),
    plain("BIT", "boolean"),
    plain("BOOLEAN", "boolean"),
    plain("DATE", "date"),
    plain("DATETIME", "dateTime"),
    plain("TIMESTAMP", "timestamp"),
    plain("TIME", "time"),
    plain("YEAR", "year"),
    plain("CHAR", "char"),
    ColumnBlueprint {
        sql: "VARCHAR",
        call: "string",
        takes_length: true,
    },
    plain("BLOB", "binary"),
    plain("TINYTEXT", "tinyText"),
    plain("TEXT", "text"),
    plain("MEDIUMTEXT", "mediumText"),
    plain("LONGTEXT", "longText"),
];

/// Look up a SQL type name, case-insensitively.
pub fn lookup(type_name: &str) -> Option<&'static ColumnBlueprint> {
    COLUMN_TYPES
        .iter()
        .find(|bp| bp.sql.eq_ignore_ascii_case(type_name))
}

pub fn is_column_type(type_name: &str) -> bool {
    lookup(type_name).is_some()
}

impl ColumnBlueprint {
    /// Render `$table->call('column'[, length])`.
    ///
    /// A length that is not an unsigned integer is dropped.
    pub fn render(&self, column: &str, parameters: &[String]) -> String {
        let length = parameters
            .first()
            .filter(|_| self.takes_length)
            .and_then(|p| p.trim().parse::<u32>().ok());

        match length {
            Some(len) => format!("$table->{}({}, {})", self.call, quote(column), len),
            None => format!("$table->{}({})", self.call, quote(column)),
        }
    }
}

/// Declaration call for `column` of SQL type `type_name`, or `None` when
/// the type is outside the vocabulary and the column must be skipped.
pub fn map_type(type_name: &str, column: &str, parameters: &[String]) -> Option<String> {
    lookup(type_name).map(|bp| bp.render(column, parameters))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(p: &[&str]) -> Vec<String> {
        p.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_type_maps() {
        for bp in COLUMN_TYPES {
            let call = map_type(bp.sql, "c", &[]).unwrap();
            assert_eq!(call, format!("$table->{}('c')", bp.call));
        }
    }

    #[test]
    fn test_aliases_share_a_call() {
        assert_eq!(map_type("NUMERIC", "c", &[]), map_type("DECIMAL", "c", &[]));
        assert_eq!(map_type("FIXED", "c", &[]), map_type("DEC", "c", &[]));
        assert_eq!(map_type("REAL", "c", &[]), map_type("DOUBLE PRECISION", "c", &[]));
        assert_eq!(map_type("BIT", "c", &[]), map_type("BOOLEAN", "c", &[]));
        assert_eq!(map_type("INTEGER", "c", &[]), map_type("INT", "c", &[]));
    }

    #[test]
    fn test_varchar_length() {
        assert_eq!(
            map_type("VARCHAR", "name", &params(&["50"])).unwrap(),
            "$table->string('name', 50)"
        );
        assert_eq!(
            map_type("VARCHAR", "name", &[]).unwrap(),
            "$table->string('name')"
        );
        assert_eq!(
            map_type("VARCHAR", "name", &params(&["abc"])).unwrap(),
            "$table->string('name')"
        );
    }

    #[test]
    fn test_other_types_ignore_parameters() {
        assert_eq!(
            map_type("DECIMAL", "price", &params(&["8", "2"])).unwrap(),
            "$table->decimal('price')"
        );
        assert_eq!(
            map_type("INT", "qty", &params(&["11"])).unwrap(),
            "$table->integer('qty')"
        );
    }

    #[test]
    fn test_case_insensitive_and_unknown() {
        assert_eq!(
            map_type("smallint", "n", &[]).unwrap(),
            "$table->smallInteger('n')"
        );
        assert!(map_type("JSON", "payload", &[]).is_none());
        assert!(!is_column_type("ENUM"));
    }

    #[test]
    fn test_column_name_is_escaped() {
        assert_eq!(
            map_type("TEXT", "it's", &[]).unwrap(),
            "$table->text('it\\'s')"
        );
    }
}
