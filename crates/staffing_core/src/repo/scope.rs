//! Named, composable query scopes.
//!
//! # Responsibility
//! - Describe filters and orderings over store/employee/assignment tables.
//! - Render scopes into parameterized SQL for the SQLite repositories.
//!
//! # Invariants
//! - Chained filters combine with logical AND; contradictory filters yield
//!   an empty result rather than an error.
//! - The last ordering applied wins; without one, rows come back in
//!   insertion order.
//! - Every explicit ordering falls back to insertion order for ties.

use crate::model::employee::{EmployeeId, Role};
use crate::model::store::StoreId;
use rusqlite::types::Value;

const INSERTION_ORDER: &str = "rowid ASC";

/// SQL fragment writer for one filter or ordering term.
pub(crate) trait SqlClause {
    fn write_sql(&self, sql: &mut String, binds: &mut Vec<Value>);
}

/// Filter/ordering/pagination description over one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope<F, O> {
    filters: Vec<F>,
    order: Option<O>,
    limit: Option<u32>,
    offset: u32,
}

impl<F, O> Default for Scope<F, O> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: 0,
        }
    }
}

impl<F, O> Scope<F, O> {
    /// Unfiltered scope in insertion order.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds one filter, AND-ed with existing ones.
    pub fn filter(mut self, filter: F) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replaces the ordering.
    pub fn order_by(mut self, order: O) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn filters(&self) -> &[F] {
        &self.filters
    }

    pub fn ordering(&self) -> Option<&O> {
        self.order.as_ref()
    }
}

impl<F: SqlClause, O: SqlClause> Scope<F, O> {
    /// Appends `WHERE`, `ORDER BY` and pagination clauses to `select`.
    pub(crate) fn to_sql(&self, select: &str) -> (String, Vec<Value>) {
        let mut sql = format!("{select} WHERE 1 = 1");
        let mut binds = Vec::new();

        for filter in &self.filters {
            sql.push_str(" AND ");
            filter.write_sql(&mut sql, &mut binds);
        }

        sql.push_str(" ORDER BY ");
        if let Some(order) = &self.order {
            order.write_sql(&mut sql, &mut binds);
            sql.push_str(", ");
        }
        sql.push_str(INSERTION_ORDER);

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            binds.push(Value::Integer(i64::from(limit)));
            if self.offset > 0 {
                sql.push_str(" OFFSET ?");
                binds.push(Value::Integer(i64::from(self.offset)));
            }
        } else if self.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            binds.push(Value::Integer(i64::from(self.offset)));
        }

        (sql, binds)
    }
}

/// Store filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFilter {
    Active(bool),
}

/// Store orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOrder {
    /// `name` ascending, byte-wise (not case-folded).
    Alphabetical,
}

pub type StoreScope = Scope<StoreFilter, StoreOrder>;

impl Scope<StoreFilter, StoreOrder> {
    pub fn active(self) -> Self {
        self.filter(StoreFilter::Active(true))
    }

    pub fn inactive(self) -> Self {
        self.filter(StoreFilter::Active(false))
    }

    pub fn alphabetical(self) -> Self {
        self.order_by(StoreOrder::Alphabetical)
    }
}

impl SqlClause for StoreFilter {
    fn write_sql(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::Active(active) => {
                sql.push_str("active = ?");
                binds.push(Value::Integer(i64::from(*active)));
            }
        }
    }
}

impl SqlClause for StoreOrder {
    fn write_sql(&self, sql: &mut String, _binds: &mut Vec<Value>) {
        match self {
            Self::Alphabetical => sql.push_str("name ASC"),
        }
    }
}

/// Employee filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeFilter {
    Active(bool),
    Role(Role),
    /// No assignment with an open end date.
    Unassigned,
}

/// Employee orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeOrder {
    /// `last_name` then `first_name`, ascending.
    Alphabetical,
}

pub type EmployeeScope = Scope<EmployeeFilter, EmployeeOrder>;

impl Scope<EmployeeFilter, EmployeeOrder> {
    pub fn active(self) -> Self {
        self.filter(EmployeeFilter::Active(true))
    }

    pub fn inactive(self) -> Self {
        self.filter(EmployeeFilter::Active(false))
    }

    /// Employees with the base `employee` role.
    pub fn regulars(self) -> Self {
        self.filter(EmployeeFilter::Role(Role::Employee))
    }

    pub fn managers(self) -> Self {
        self.filter(EmployeeFilter::Role(Role::Manager))
    }

    pub fn admins(self) -> Self {
        self.filter(EmployeeFilter::Role(Role::Admin))
    }

    pub fn unassigned(self) -> Self {
        self.filter(EmployeeFilter::Unassigned)
    }

    pub fn alphabetical(self) -> Self {
        self.order_by(EmployeeOrder::Alphabetical)
    }
}

impl SqlClause for EmployeeFilter {
    fn write_sql(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::Active(active) => {
                sql.push_str("active = ?");
                binds.push(Value::Integer(i64::from(*active)));
            }
            Self::Role(role) => {
                sql.push_str("role = ?");
                binds.push(Value::Integer(role.as_db()));
            }
            Self::Unassigned => sql.push_str(
                "uuid NOT IN (
                    SELECT employee_uuid FROM assignments WHERE end_date IS NULL
                )",
            ),
        }
    }
}

impl SqlClause for EmployeeOrder {
    fn write_sql(&self, sql: &mut String, _binds: &mut Vec<Value>) {
        match self {
            Self::Alphabetical => sql.push_str("last_name ASC, first_name ASC"),
        }
    }
}

/// Assignment filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentFilter {
    /// `end_date` is null.
    Current,
    /// `end_date` is set.
    Past,
    Store(StoreId),
    Employee(EmployeeId),
}

/// Assignment orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOrder {
    /// `start_date` ascending.
    Chronological,
    /// Store name ascending.
    ByStore,
}

pub type AssignmentScope = Scope<AssignmentFilter, AssignmentOrder>;

impl Scope<AssignmentFilter, AssignmentOrder> {
    pub fn current(self) -> Self {
        self.filter(AssignmentFilter::Current)
    }

    pub fn past(self) -> Self {
        self.filter(AssignmentFilter::Past)
    }

    pub fn for_store(self, store_id: StoreId) -> Self {
        self.filter(AssignmentFilter::Store(store_id))
    }

    pub fn for_employee(self, employee_id: EmployeeId) -> Self {
        self.filter(AssignmentFilter::Employee(employee_id))
    }

    pub fn chronological(self) -> Self {
        self.order_by(AssignmentOrder::Chronological)
    }

    pub fn by_store(self) -> Self {
        self.order_by(AssignmentOrder::ByStore)
    }
}

impl SqlClause for AssignmentFilter {
    fn write_sql(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::Current => sql.push_str("end_date IS NULL"),
            Self::Past => sql.push_str("end_date IS NOT NULL"),
            Self::Store(store_id) => {
                sql.push_str("store_uuid = ?");
                binds.push(Value::Text(store_id.to_string()));
            }
            Self::Employee(employee_id) => {
                sql.push_str("employee_uuid = ?");
                binds.push(Value::Text(employee_id.to_string()));
            }
        }
    }
}

impl SqlClause for AssignmentOrder {
    fn write_sql(&self, sql: &mut String, _binds: &mut Vec<Value>) {
        match self {
            Self::Chronological => sql.push_str("start_date ASC"),
            Self::ByStore => sql.push_str(
                "(SELECT s.name FROM stores s WHERE s.uuid = assignments.store_uuid) ASC",
            ),
        }
    }
}
