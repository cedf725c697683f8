//! Translation of log queries into parameterized SQL.
//!
//! This module provides:
//! - [`Statement`]: SQL text plus its ordered bind parameters
//! - [`Param`]: a single bound value
//! - [`Translator`]: compiles a [`LogQuery`] for one table and [`Dialect`]
//!
//! Present criteria become predicates in a fixed order (id, id set, level,
//! level set, message contains / not contains, context contains / not
//! contains, time lower bound, time upper bound) and are joined with `AND`.
//! Statements are assembled with `sea-query` and rendered by the backend
//! matching the dialect, so caller values only ever travel as bound
//! parameters.

use sea_query::{
    Alias, Asterisk, ColumnDef, ConditionalStatement, Expr, Func, LikeExpr,
    MysqlQueryBuilder, Order, PostgresQueryBuilder, Query, QueryStatementWriter,
    SchemaStatementBuilder, SelectStatement, SimpleExpr, SqliteQueryBuilder, Table,
    Value as SeaValue,
};

use crate::dialect::Dialect;
use crate::entry::{
    format_time, LogEntry, COLUMNS, COLUMN_CONTEXT, COLUMN_ID, COLUMN_LEVEL, COLUMN_MESSAGE,
    COLUMN_TIME,
};
use crate::error::{Result, StoreError};
use crate::query::LogQuery;

/// Alias under which count statements return their single value.
pub const COUNT_ALIAS: &str = "count";

/// Escape character for `LIKE` patterns built from caller terms.
pub const LIKE_ESCAPE: char = '!';

/// Alias of the derived table a windowed delete selects ids from.
const WINDOW_ALIAS: &str = "page";

/// Limit rendered when only an offset is given and the engine needs both.
const UNBOUNDED_LIMIT: u64 = i64::MAX.unsigned_abs();

/// Width of the id column.
const ID_LEN: u32 = 64;

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Text value.
    Text(String),
    /// Integer value (limits and offsets).
    Int(i64),
}

impl Param {
    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Param {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl PartialEq<&str> for Param {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<i64> for Param {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl TryFrom<SeaValue> for Param {
    type Error = StoreError;

    /// Converts a value collected by the statement builder.
    ///
    /// Only text and integers that fit an `i64` can be carried to an
    /// executor; anything else is a [`StoreError::Translation`] error.
    fn try_from(value: SeaValue) -> Result<Self> {
        match value {
            SeaValue::String(Some(s)) => Ok(Self::Text(s.to_string())),
            SeaValue::Char(Some(c)) => Ok(Self::Text(c.to_string())),
            SeaValue::Int(Some(n)) => Ok(Self::Int(n.into())),
            SeaValue::BigInt(Some(n)) => Ok(Self::Int(n)),
            SeaValue::Unsigned(Some(n)) => Ok(Self::Int(n.into())),
            SeaValue::BigUnsigned(Some(n)) => i64::try_from(n).map(Self::Int).map_err(|_| {
                StoreError::Translation(format!("bound integer {n} does not fit in an i64"))
            }),
            other => Err(StoreError::Translation(format!(
                "unsupported bound value: {other:?}"
            ))),
        }
    }
}

/// A rendered SQL statement and its bind parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Statement text containing only placeholders for caller values.
    pub sql: String,
    /// Values bound to the placeholders, in order.
    pub params: Vec<Param>,
}

impl Statement {
    fn new(sql: String, params: Vec<Param>) -> Self {
        Self { sql, params }
    }
}

fn col(name: &str) -> Expr {
    Expr::col(Alias::new(name))
}

/// Wraps `term` in wildcards, escaping its own wildcard characters so it
/// matches literally.
fn contains_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Builds the predicates of `query`, in their fixed order.
fn predicates(query: &LogQuery) -> Vec<SimpleExpr> {
    let mut p = Vec::new();

    if query.is_id_set() {
        p.push(col(COLUMN_ID).eq(query.id()));
    }
    if query.is_id_in_set() {
        p.push(col(COLUMN_ID).is_in(query.id_in().iter().map(String::as_str)));
    }
    if query.is_level_set() {
        p.push(col(COLUMN_LEVEL).eq(query.level()));
    }
    if query.is_level_in_set() {
        p.push(col(COLUMN_LEVEL).is_in(query.level_in().iter().map(String::as_str)));
    }
    if query.is_message_contains_set() {
        p.push(col(COLUMN_MESSAGE).like(contains_pattern(query.message_contains())));
    }
    if query.is_message_not_contains_set() {
        p.push(col(COLUMN_MESSAGE).not_like(contains_pattern(query.message_not_contains())));
    }
    if query.is_context_contains_set() {
        p.push(col(COLUMN_CONTEXT).like(contains_pattern(query.context_contains())));
    }
    if query.is_context_not_contains_set() {
        p.push(col(COLUMN_CONTEXT).not_like(contains_pattern(query.context_not_contains())));
    }
    if query.is_time_gte_set() {
        p.push(col(COLUMN_TIME).gte(query.time_gte()));
    }
    if query.is_time_lte_set() {
        p.push(col(COLUMN_TIME).lte(query.time_lte()));
    }

    p
}

/// Compiles queries into statements for one table in one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translator {
    dialect: Dialect,
    table: String,
}

impl Translator {
    /// Creates a translator targeting `table` in `dialect`.
    #[must_use]
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
        }
    }

    /// Returns the target dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the target table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    fn check_target(&self) -> Result<()> {
        if self.table.is_empty() {
            return Err(StoreError::Config(
                "translator target has no table name".to_string(),
            ));
        }
        Ok(())
    }

    fn prepare(&self, query: &LogQuery) -> Result<Vec<SimpleExpr>> {
        self.check_target()?;
        query.validate()?;
        Ok(predicates(query))
    }

    fn table_iden(&self) -> Alias {
        Alias::new(self.table.as_str())
    }

    /// Renders a statement with the backend for this dialect.
    fn build<S: QueryStatementWriter>(&self, stmt: &S) -> Result<Statement> {
        let (sql, values) = match self.dialect {
            Dialect::Sqlite => stmt.build(SqliteQueryBuilder),
            Dialect::Postgres => stmt.build(PostgresQueryBuilder),
            Dialect::MySql => stmt.build(MysqlQueryBuilder),
        };
        let params = values
            .0
            .into_iter()
            .map(Param::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Statement::new(sql, params))
    }

    /// Applies `ORDER BY` and paging, as used by select and delete.
    fn apply_window(&self, select: &mut SelectStatement, query: &LogQuery) {
        if query.is_order_by_set() {
            let order = if query.is_ascending() {
                Order::Asc
            } else {
                Order::Desc
            };
            select.order_by(Alias::new(query.order_by()), order);
        }

        // Validation guarantees both are non-negative.
        let limit = query
            .is_limit_set()
            .then(|| u64::try_from(query.limit()).unwrap_or(0));
        let offset = query
            .is_offset_set()
            .then(|| u64::try_from(query.offset()).unwrap_or(0));

        match (limit, offset) {
            (Some(limit), _) => {
                select.limit(limit);
            }
            (None, Some(_)) if self.dialect.offset_needs_limit() => {
                select.limit(UNBOUNDED_LIMIT);
            }
            (None, _) => {}
        }
        if let Some(offset) = offset {
            select.offset(offset);
        }
    }

    /// Compiles a query into a `SELECT` of every column.
    ///
    /// Ordering applies only when a sort column is set, descending unless
    /// the direction is `asc`. Limit and offset follow the ordering and are
    /// bound as integer parameters.
    ///
    /// The sort column is quoted but not checked against the table's
    /// columns. `SQLite` reads an unknown double-quoted name as a string
    /// constant, so sorting by it leaves rows unsorted rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the table name is empty, or the
    /// query's [`StoreError::Validation`] error if it is invalid.
    pub fn select(&self, query: &LogQuery) -> Result<Statement> {
        let predicates = self.prepare(query)?;

        let mut select = Query::select();
        select
            .columns(COLUMNS.iter().map(|c| Alias::new(*c)))
            .from(self.table_iden());
        for p in predicates {
            select.and_where(p);
        }
        self.apply_window(&mut select, query);

        self.build(&select)
    }

    /// Compiles a query into a `SELECT COUNT(*)`.
    ///
    /// Limit, offset and ordering are ignored: the count covers every row
    /// the filters match.
    ///
    /// # Errors
    ///
    /// Same as [`Translator::select`].
    pub fn count(&self, query: &LogQuery) -> Result<Statement> {
        let predicates = self.prepare(query)?;

        let mut select = Query::select();
        select
            .expr_as(Func::count(Expr::col(Asterisk)), Alias::new(COUNT_ALIAS))
            .from(self.table_iden());
        for p in predicates {
            select.and_where(p);
        }

        self.build(&select)
    }

    /// Compiles a query into a `DELETE`.
    ///
    /// When the query carries a limit or offset, the window is selected
    /// through an id sub-select over a derived table so every dialect can
    /// run it.
    ///
    /// # Errors
    ///
    /// Same as [`Translator::select`].
    pub fn delete(&self, query: &LogQuery) -> Result<Statement> {
        let predicates = self.prepare(query)?;

        let mut delete = Query::delete();
        delete.from_table(self.table_iden());

        if query.has_paging() {
            let mut window = Query::select();
            window.column(Alias::new(COLUMN_ID)).from(self.table_iden());
            for p in predicates {
                window.and_where(p);
            }
            self.apply_window(&mut window, query);

            let mut page = Query::select();
            page.column(Alias::new(COLUMN_ID))
                .from_subquery(window, Alias::new(WINDOW_ALIAS));
            delete.and_where(col(COLUMN_ID).in_subquery(page));
        } else {
            for p in predicates {
                delete.and_where(p);
            }
        }

        self.build(&delete)
    }

    /// Compiles an `INSERT` binding all five columns of `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the table name is empty, or
    /// [`StoreError::Validation`] if the entry has no id or no time.
    pub fn insert(&self, entry: &LogEntry) -> Result<Statement> {
        self.check_target()?;

        if entry.id().is_empty() {
            return Err(StoreError::Validation("log entry id is empty".to_string()));
        }
        let time = entry
            .time()
            .ok_or_else(|| StoreError::Validation("log entry time is unset".to_string()))?;

        let values: [SimpleExpr; 5] = [
            entry.id().into(),
            entry.level().into(),
            entry.message().into(),
            entry.context().into(),
            format_time(&time).into(),
        ];

        let mut insert = Query::insert();
        insert
            .into_table(self.table_iden())
            .columns(COLUMNS.iter().map(|c| Alias::new(*c)))
            .values(values)
            .map_err(|e| StoreError::Translation(e.to_string()))?;

        self.build(&insert)
    }

    /// Renders the statement that creates the log table if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the table name is empty.
    pub fn create_table(&self) -> Result<Statement> {
        self.check_target()?;

        let table = Table::create()
            .table(self.table_iden())
            .if_not_exists()
            .col(
                ColumnDef::new(Alias::new(COLUMN_ID))
                    .string_len(ID_LEN)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Alias::new(COLUMN_LEVEL)).text())
            .col(ColumnDef::new(Alias::new(COLUMN_MESSAGE)).text())
            .col(ColumnDef::new(Alias::new(COLUMN_CONTEXT)).text())
            .col(
                ColumnDef::new(Alias::new(COLUMN_TIME))
                    .custom(Alias::new(self.dialect.time_type()))
                    .not_null(),
            )
            .to_owned();

        let sql = match self.dialect {
            Dialect::Sqlite => table.build(SqliteQueryBuilder),
            Dialect::Postgres => table.build(PostgresQueryBuilder),
            Dialect::MySql => table.build(MysqlQueryBuilder),
        };

        Ok(Statement::new(sql, Vec::new()))
    }
}
