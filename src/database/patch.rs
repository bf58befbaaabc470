use sqlx::{
    postgres::{PgArguments, PgRow},
    query::{Query, QueryAs},
    FromRow, Postgres,
};

/// A single column value in a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i32),
    BigInt(i64),
    Bool(bool),
    TextList(Vec<String>),
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::BigInt(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::TextList(v)
    }
}

/// Ordered field mask of the columns present in an update body. Column names
/// always come from code, never from the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.fields.retain(|(c, _)| *c != column);
        self.fields.push((column, value.into()));
        self
    }

    /// Adds the column only when the body carried a value for it.
    pub fn set_opt<V: Into<FieldValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(c, _)| *c)
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    /// `c1 = $start, c2 = $start+1, ...`
    pub fn set_clause(&self, start: usize) -> String {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ${}", column, start + i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn into_values(self) -> impl Iterator<Item = FieldValue> {
        self.fields.into_iter().map(|(_, v)| v)
    }
}

pub fn bind_value_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: FieldValue,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        FieldValue::Text(s) => q.bind(s),
        FieldValue::Int(i) => q.bind(i),
        FieldValue::BigInt(i) => q.bind(i),
        FieldValue::Bool(b) => q.bind(b),
        FieldValue::TextList(list) => q.bind(list),
    }
}

pub fn bind_value_query<'q>(
    q: Query<'q, Postgres, PgArguments>,
    v: FieldValue,
) -> Query<'q, Postgres, PgArguments> {
    match v {
        FieldValue::Text(s) => q.bind(s),
        FieldValue::Int(i) => q.bind(i),
        FieldValue::BigInt(i) => q.bind(i),
        FieldValue::Bool(b) => q.bind(b),
        FieldValue::TextList(list) => q.bind(list),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_present_fields_are_set() {
        let title: Option<String> = Some("New".into());
        let content: Option<String> = None;
        let patch = Patch::new().set_opt("title", title).set_opt("content", content);
        assert_eq!(patch.columns().collect::<Vec<_>>(), vec!["title"]);
        assert_eq!(patch.set_clause(1), "title = $1");
    }

    #[test]
    fn later_values_replace_earlier_ones() {
        let patch = Patch::new().set("title", "a").set("content", "b").set("title", "c");
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.get("title"), Some(&FieldValue::Text("c".into())));
        assert_eq!(patch.set_clause(3), "content = $3, title = $4");
    }

    #[test]
    fn empty_patch() {
        let patch = Patch::new().set_opt::<i32>("display_order", None);
        assert!(patch.is_empty());
        assert_eq!(patch.set_clause(1), "");
    }
}
