/// Bind value for a lowered condition, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

/// SQL boolean expression using positional `?` placeholders together with
/// the values bound to them
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCondition {
    pub clause: String,
    pub binds: Vec<SqlValue>,
}

impl SqlCondition {
    pub fn new(clause: impl Into<String>, binds: Vec<SqlValue>) -> Self {
        Self {
            clause: clause.into(),
            binds,
        }
    }

    pub fn and(self, other: SqlCondition) -> Self {
        self.join("AND", other)
    }

    pub fn or(self, other: SqlCondition) -> Self {
        self.join("OR", other)
    }

    pub fn not(self) -> Self {
        Self {
            clause: format!("NOT ({})", self.clause),
            binds: self.binds,
        }
    }

    fn join(self, op: &str, other: SqlCondition) -> Self {
        let mut binds = self.binds;
        binds.extend(other.binds);
        Self {
            clause: format!("({} {} {})", self.clause, op, other.clause),
            binds,
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}
