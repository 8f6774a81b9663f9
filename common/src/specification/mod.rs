//! Composable boolean conditions over a single entity type
//!
//! A [`Specification`] is an immutable tree of atomic criteria joined with
//! AND, OR and NOT. Trees are built incrementally through method calls, so
//! grouping is exactly the order in which the caller combined them.
//!
//! The same tree can be evaluated in-process ([`Specification::is_satisfied_by`])
//! or lowered into another representation through a [`SpecificationVisitor`].
//! [`Specification::to_sql`] is one such lowering, used by stores that can
//! filter natively.

mod sql;

pub use sql::{SqlCondition, SqlValue};

use std::fmt;
use std::sync::Arc;

type PredicateFn<T> = dyn Fn(&T) -> bool + Send + Sync;

/// A single, non-decomposed condition
pub struct Criterion<T> {
    label: String,
    predicate: Arc<PredicateFn<T>>,
    sql: Option<SqlCondition>,
}

impl<T> Criterion<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sql(&self) -> Option<&SqlCondition> {
        self.sql.as_ref()
    }

    pub fn is_satisfied_by(&self, entity: &T) -> bool {
        (self.predicate)(entity)
    }
}

impl<T> Clone for Criterion<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: Arc::clone(&self.predicate),
            sql: self.sql.clone(),
        }
    }
}

impl<T> fmt::Debug for Criterion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("label", &self.label)
            .field("sql", &self.sql)
            .finish()
    }
}

pub enum Specification<T> {
    Atomic(Criterion<T>),
    And(Box<Specification<T>>, Box<Specification<T>>),
    Or(Box<Specification<T>>, Box<Specification<T>>),
    Not(Box<Specification<T>>),
}

impl<T> Specification<T> {
    /// Wrap a pure predicate. `label` is only used for display and logging.
    pub fn atomic<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Specification::Atomic(Criterion {
            label: label.into(),
            predicate: Arc::new(predicate),
            sql: None,
        })
    }

    /// Satisfied by every entity
    pub fn always() -> Self
    where
        T: 'static,
    {
        Self::atomic("true", |_: &T| true).with_sql("1 = 1", Vec::new())
    }

    /// Attach the SQL form of an atomic specification. Composite
    /// specifications derive theirs from their children, so this leaves
    /// them unchanged.
    pub fn with_sql(self, clause: impl Into<String>, binds: Vec<SqlValue>) -> Self {
        match self {
            Specification::Atomic(criterion) => Specification::Atomic(Criterion {
                sql: Some(SqlCondition::new(clause, binds)),
                ..criterion
            }),
            composite => composite,
        }
    }

    pub fn and(self, other: Specification<T>) -> Self {
        Specification::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Specification<T>) -> Self {
        Specification::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Specification::Not(Box::new(self))
    }

    /// Optional accumulator step: the first specification is taken as is,
    /// later ones are OR-combined onto it.
    pub fn fold_or(acc: Option<Self>, next: Self) -> Option<Self> {
        Some(match acc {
            None => next,
            Some(acc) => acc.or(next),
        })
    }

    /// Same as [`Specification::fold_or`] with AND
    pub fn fold_and(acc: Option<Self>, next: Self) -> Option<Self> {
        Some(match acc {
            None => next,
            Some(acc) => acc.and(next),
        })
    }

    pub fn is_satisfied_by(&self, entity: &T) -> bool {
        match self {
            Specification::Atomic(criterion) => criterion.is_satisfied_by(entity),
            Specification::And(left, right) => {
                left.is_satisfied_by(entity) && right.is_satisfied_by(entity)
            }
            Specification::Or(left, right) => {
                left.is_satisfied_by(entity) || right.is_satisfied_by(entity)
            }
            Specification::Not(inner) => !inner.is_satisfied_by(entity),
        }
    }

    /// Post-order fold of the tree: children are visited left to right
    /// before their parent.
    pub fn accept<V: SpecificationVisitor<T>>(&self, visitor: &mut V) -> V::Output {
        match self {
            Specification::Atomic(criterion) => visitor.visit_atomic(criterion),
            Specification::And(left, right) => {
                let left = left.accept(visitor);
                let right = right.accept(visitor);
                visitor.visit_and(left, right)
            }
            Specification::Or(left, right) => {
                let left = left.accept(visitor);
                let right = right.accept(visitor);
                visitor.visit_or(left, right)
            }
            Specification::Not(inner) => {
                let inner = inner.accept(visitor);
                visitor.visit_not(inner)
            }
        }
    }

    /// Lower the whole tree to SQL. `None` if any criterion has no SQL form.
    pub fn to_sql(&self) -> Option<SqlCondition> {
        self.accept(&mut SqlLowering)
    }

    pub fn criteria_count(&self) -> usize {
        self.accept(&mut CriteriaCounter)
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        match self {
            Specification::Atomic(criterion) => Specification::Atomic(criterion.clone()),
            Specification::And(left, right) => Specification::And(left.clone(), right.clone()),
            Specification::Or(left, right) => Specification::Or(left.clone(), right.clone()),
            Specification::Not(inner) => Specification::Not(inner.clone()),
        }
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Specification({})", self)
    }
}

impl<T> fmt::Display for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accept(&mut Renderer))
    }
}

/// Lowers a specification tree into another representation
pub trait SpecificationVisitor<T> {
    type Output;

    fn visit_atomic(&mut self, criterion: &Criterion<T>) -> Self::Output;
    fn visit_and(&mut self, left: Self::Output, right: Self::Output) -> Self::Output;
    fn visit_or(&mut self, left: Self::Output, right: Self::Output) -> Self::Output;
    fn visit_not(&mut self, inner: Self::Output) -> Self::Output;
}

struct SqlLowering;

impl<T> SpecificationVisitor<T> for SqlLowering {
    type Output = Option<SqlCondition>;

    fn visit_atomic(&mut self, criterion: &Criterion<T>) -> Self::Output {
        criterion.sql().cloned()
    }

    fn visit_and(&mut self, left: Self::Output, right: Self::Output) -> Self::Output {
        Some(left?.and(right?))
    }

    fn visit_or(&mut self, left: Self::Output, right: Self::Output) -> Self::Output {
        Some(left?.or(right?))
    }

    fn visit_not(&mut self, inner: Self::Output) -> Self::Output {
        Some(inner?.not())
    }
}

struct Renderer;

impl<T> SpecificationVisitor<T> for Renderer {
    type Output = String;

    fn visit_atomic(&mut self, criterion: &Criterion<T>) -> String {
        criterion.label().to_string()
    }

    fn visit_and(&mut self, left: String, right: String) -> String {
        format!("({} AND {})", left, right)
    }

    fn visit_or(&mut self, left: String, right: String) -> String {
        format!("({} OR {})", left, right)
    }

    fn visit_not(&mut self, inner: String) -> String {
        format!("NOT {}", inner)
    }
}

struct CriteriaCounter;

impl<T> SpecificationVisitor<T> for CriteriaCounter {
    type Output = usize;

    fn visit_atomic(&mut self, _criterion: &Criterion<T>) -> usize {
        1
    }

    fn visit_and(&mut self, left: usize, right: usize) -> usize {
        left + right
    }

    fn visit_or(&mut self, left: usize, right: usize) -> usize {
        left + right
    }

    fn visit_not(&mut self, inner: usize) -> usize {
        inner
    }
}

#[cfg(test)]
mod tests;
