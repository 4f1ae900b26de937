//! Query scopes matching a column by the MD5 digest of its text form.

use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::ColumnTrait;

fn md5_of<C: ColumnTrait>(column: C) -> SimpleExpr {
    let text = Func::cast_as(Expr::col((column.entity_name(), column)), Alias::new("VARCHAR"));
    SimpleExpr::FunctionCall(Func::cust(Alias::new("MD5")).arg(text))
}

/// Rows whose `MD5(CAST(column AS VARCHAR))` equals `digest`. The digest is
/// bound as a parameter.
pub fn by_md5<C: ColumnTrait>(column: C, digest: &str) -> SimpleExpr {
    Expr::expr(md5_of(column)).eq(digest)
}

pub fn by_md5_not<C: ColumnTrait>(column: C, digest: &str) -> SimpleExpr {
    Expr::expr(md5_of(column)).ne(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::posts;
    use sea_orm::{DatabaseBackend, EntityTrait, QueryFilter, QueryTrait};

    const DIGEST: &str = "5d41402abc4b2a76b9719d911017c592";

    #[test]
    fn test_by_md5_renders_bound_digest() {
        let statement = posts::Entity::find()
            .filter(by_md5(posts::Column::Id, DIGEST))
            .build(DatabaseBackend::Postgres);

        assert!(statement
            .sql
            .contains(r#"MD5(CAST("posts"."id" AS VARCHAR)) = $1"#));
        assert!(!statement.sql.contains(DIGEST));
        assert_eq!(
            statement.values.map(|values| values.0),
            Some(vec![sea_orm::Value::from(DIGEST)])
        );
    }

    #[test]
    fn test_by_md5_not() {
        let injected = "x' OR '1'='1";
        let statement = posts::Entity::find()
            .filter(by_md5_not(posts::Column::Title, injected))
            .build(DatabaseBackend::Postgres);

        assert!(statement
            .sql
            .contains(r#"MD5(CAST("posts"."title" AS VARCHAR)) <> $1"#));
        assert!(!statement.sql.contains("OR '1'"));
        assert_eq!(
            statement.values.map(|values| values.0),
            Some(vec![sea_orm::Value::from(injected)])
        );
    }
}
