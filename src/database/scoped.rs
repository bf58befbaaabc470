use sqlx::{postgres::PgRow, FromRow, PgPool};

use super::manager::{DatabaseError, DbResultExt};
use super::patch::{bind_value_query_as, Patch};
use crate::auth::Scope;

/// A table whose rows are mutated by id, optionally restricted to an owner
/// column. Ownership is part of the mutating statement itself.
#[derive(Debug, Clone, Copy)]
pub struct ScopedTable {
    pub table: &'static str,
    pub owner_column: Option<&'static str>,
    pub returning: &'static str,
    pub touches_updated_at: bool,
}

impl ScopedTable {
    pub const fn owned(table: &'static str, owner_column: &'static str, returning: &'static str) -> Self {
        Self {
            table,
            owner_column: Some(owner_column),
            returning,
            touches_updated_at: true,
        }
    }

    pub const fn unowned(table: &'static str, returning: &'static str) -> Self {
        Self {
            table,
            owner_column: None,
            returning,
            touches_updated_at: true,
        }
    }

    pub const fn without_updated_at(mut self) -> Self {
        self.touches_updated_at = false;
        self
    }

    fn owner_predicate(&self, param: usize) -> String {
        match self.owner_column {
            Some(column) => format!(" AND (${p}::text IS NULL OR {c} = ${p})", p = param, c = column),
            None => String::new(),
        }
    }

    pub fn update_sql(&self, patch: &Patch) -> String {
        let n = patch.len();
        let mut assignments = patch.set_clause(1);
        if self.touches_updated_at {
            if !assignments.is_empty() {
                assignments.push_str(", ");
            }
            assignments.push_str("updated_at = NOW()");
        } else if assignments.is_empty() {
            assignments.push_str("id = id");
        }

        let id_param = n + 1;
        format!(
            "UPDATE {} SET {} WHERE id = ${}{} RETURNING {}",
            self.table,
            assignments,
            id_param,
            self.owner_predicate(id_param + 1),
            self.returning
        )
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE id = $1{}", self.table, self.owner_predicate(2))
    }

    /// Applies the patch to row `id` if it is visible in `scope`. `Ok(None)`
    /// means the row does not exist or belongs to someone else.
    pub async fn update<T>(
        &self,
        pool: &PgPool,
        operation: &'static str,
        id: i64,
        scope: &Scope,
        patch: Patch,
    ) -> Result<Option<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = self.update_sql(&patch);
        let mut q = sqlx::query_as::<_, T>(&sql);
        for value in patch.into_values() {
            q = bind_value_query_as(q, value);
        }
        q = q.bind(id);
        if self.owner_column.is_some() {
            q = q.bind(scope.owner_param().map(str::to_string));
        }
        q.fetch_optional(pool).await.during(operation)
    }

    /// Deletes row `id` if it is visible in `scope`; returns whether a row went.
    pub async fn delete(
        &self,
        pool: &PgPool,
        operation: &'static str,
        id: i64,
        scope: &Scope,
    ) -> Result<bool, DatabaseError> {
        let sql = self.delete_sql();
        let mut q = sqlx::query(&sql).bind(id);
        if self.owner_column.is_some() {
            q = q.bind(scope.owner_param().map(str::to_string));
        }
        let result = q.execute(pool).await.during(operation)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: ScopedTable = ScopedTable::owned("user_notes", "user_id", "id, title");
    const STORIES: ScopedTable = ScopedTable::unowned("ceramic_stories", "id").without_updated_at();

    #[test]
    fn update_binds_owner_after_id() {
        let patch = Patch::new().set("title", "t").set("content", "c");
        assert_eq!(
            NOTES.update_sql(&patch),
            "UPDATE user_notes SET title = $1, content = $2, updated_at = NOW() \
             WHERE id = $3 AND ($4::text IS NULL OR user_id = $4) RETURNING id, title"
        );
    }

    #[test]
    fn empty_patch_still_touches_row() {
        assert_eq!(
            NOTES.update_sql(&Patch::new()),
            "UPDATE user_notes SET updated_at = NOW() \
             WHERE id = $1 AND ($2::text IS NULL OR user_id = $2) RETURNING id, title"
        );
    }

    #[test]
    fn delete_is_a_single_scoped_statement() {
        assert_eq!(
            NOTES.delete_sql(),
            "DELETE FROM user_notes WHERE id = $1 AND ($2::text IS NULL OR user_id = $2)"
        );
        assert_eq!(STORIES.delete_sql(), "DELETE FROM ceramic_stories WHERE id = $1");
    }

    #[test]
    fn unowned_tables_skip_the_owner_bind() {
        let patch = Patch::new().set("slug", "ming");
        assert_eq!(
            STORIES.update_sql(&patch),
            "UPDATE ceramic_stories SET slug = $1 WHERE id = $2 RETURNING id"
        );
        assert_eq!(
            STORIES.update_sql(&Patch::new()),
            "UPDATE ceramic_stories SET id = id WHERE id = $1 RETURNING id"
        );
    }
}
