//! Filter, sort and paging criteria for selecting log entries.
//!
//! A [`LogQuery`] is a sparse set of optional criteria. Every criterion is
//! tracked as present or absent independently of its value, so an explicit
//! empty filter (almost always a caller mistake) can be told apart from no
//! filter at all. Validation is deferred to [`LogQuery::validate`], which the
//! translator runs before compiling the query.
//!
//! ```rust
//! use logstore::{LogLevel, LogQuery};
//!
//! let query = LogQuery::new()
//!     .with_level(LogLevel::Error)
//!     .with_message_contains("timeout")
//!     .with_order_by("time")
//!     .with_limit(20);
//!
//! assert!(query.validate().is_ok());
//! assert!(query.is_level_set());
//! assert!(!query.is_id_set());
//! assert_eq!(query.id(), "");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::format_time;
use crate::error::{Result, StoreError};

/// Ascending sort direction token.
pub const ORDER_ASC: &str = "asc";
/// Descending sort direction token.
pub const ORDER_DESC: &str = "desc";

/// Optional filter, sort and paging criteria for log entries.
///
/// An unset criterion contributes nothing; the empty query matches every
/// entry in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogQuery {
    id: Option<String>,
    id_in: Option<Vec<String>>,
    level: Option<String>,
    level_in: Option<Vec<String>>,
    message_contains: Option<String>,
    message_not_contains: Option<String>,
    context_contains: Option<String>,
    context_not_contains: Option<String>,
    time_gte: Option<String>,
    time_lte: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    order_by: Option<String>,
    order_direction: Option<String>,
}

fn collect_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl LogQuery {
    /// Creates an empty query that matches every entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every present criterion for a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] naming the first criterion that is
    /// set to an empty string, an empty set, or a negative count.
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: &str) -> Result<()> {
            Err(StoreError::Validation(format!("log query: {msg}")))
        }

        if self.id.as_deref() == Some("") {
            return invalid("id cannot be empty");
        }
        if self.id_in.as_ref().is_some_and(Vec::is_empty) {
            return invalid("id_in cannot be empty");
        }
        if self.level.as_deref() == Some("") {
            return invalid("level cannot be empty");
        }
        if self.level_in.as_ref().is_some_and(Vec::is_empty) {
            return invalid("level_in cannot be empty");
        }
        if self.message_contains.as_deref() == Some("") {
            return invalid("message_contains cannot be empty");
        }
        if self.message_not_contains.as_deref() == Some("") {
            return invalid("message_not_contains cannot be empty");
        }
        if self.context_contains.as_deref() == Some("") {
            return invalid("context_contains cannot be empty");
        }
        if self.context_not_contains.as_deref() == Some("") {
            return invalid("context_not_contains cannot be empty");
        }
        if self.limit.is_some_and(|n| n < 0) {
            return invalid("limit cannot be negative");
        }
        if self.offset.is_some_and(|n| n < 0) {
            return invalid("offset cannot be negative");
        }

        Ok(())
    }

    /// Returns true if ordering resolves to ascending.
    ///
    /// Only a direction equal to [`ORDER_ASC`] (ignoring case) is ascending;
    /// anything else, including no direction, sorts descending.
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.order_direction
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(ORDER_ASC))
    }

    /// Returns true if a limit or offset is present.
    #[must_use]
    pub const fn has_paging(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }

    // ------------------------------------------------------------------
    // id / id_in
    // ------------------------------------------------------------------

    /// Returns true if the id criterion is present.
    #[must_use]
    pub const fn is_id_set(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the id criterion, or `""` when unset.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Matches entries with exactly this id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns true if the id set criterion is present.
    #[must_use]
    pub const fn is_id_in_set(&self) -> bool {
        self.id_in.is_some()
    }

    /// Returns the id set, or an empty slice when unset.
    #[must_use]
    pub fn id_in(&self) -> &[String] {
        self.id_in.as_deref().unwrap_or_default()
    }

    /// Matches entries whose id is any of `ids`.
    #[must_use]
    pub fn with_id_in<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_in = Some(collect_strings(ids));
        self
    }

    // ------------------------------------------------------------------
    // level / level_in
    // ------------------------------------------------------------------

    /// Returns true if the level criterion is present.
    #[must_use]
    pub const fn is_level_set(&self) -> bool {
        self.level.is_some()
    }

    /// Returns the level criterion, or `""` when unset.
    #[must_use]
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or_default()
    }

    /// Matches entries at exactly this level.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Returns true if the level set criterion is present.
    #[must_use]
    pub const fn is_level_in_set(&self) -> bool {
        self.level_in.is_some()
    }

    /// Returns the level set, or an empty slice when unset.
    #[must_use]
    pub fn level_in(&self) -> &[String] {
        self.level_in.as_deref().unwrap_or_default()
    }

    /// Matches entries at any of `levels`.
    #[must_use]
    pub fn with_level_in<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.level_in = Some(collect_strings(levels));
        self
    }

    // ------------------------------------------------------------------
    // message / context substring filters
    // ------------------------------------------------------------------

    /// Returns true if the message-contains criterion is present.
    #[must_use]
    pub const fn is_message_contains_set(&self) -> bool {
        self.message_contains.is_some()
    }

    /// Returns the message-contains term, or `""` when unset.
    #[must_use]
    pub fn message_contains(&self) -> &str {
        self.message_contains.as_deref().unwrap_or_default()
    }

    /// Matches entries whose message contains `term`.
    #[must_use]
    pub fn with_message_contains(mut self, term: impl Into<String>) -> Self {
        self.message_contains = Some(term.into());
        self
    }

    /// Returns true if the message-not-contains criterion is present.
    #[must_use]
    pub const fn is_message_not_contains_set(&self) -> bool {
        self.message_not_contains.is_some()
    }

    /// Returns the message-not-contains term, or `""` when unset.
    #[must_use]
    pub fn message_not_contains(&self) -> &str {
        self.message_not_contains.as_deref().unwrap_or_default()
    }

    /// Excludes entries whose message contains `term`.
    #[must_use]
    pub fn with_message_not_contains(mut self, term: impl Into<String>) -> Self {
        self.message_not_contains = Some(term.into());
        self
    }

    /// Returns true if the context-contains criterion is present.
    #[must_use]
    pub const fn is_context_contains_set(&self) -> bool {
        self.context_contains.is_some()
    }

    /// Returns the context-contains term, or `""` when unset.
    #[must_use]
    pub fn context_contains(&self) -> &str {
        self.context_contains.as_deref().unwrap_or_default()
    }

    /// Matches entries whose context contains `term`.
    #[must_use]
    pub fn with_context_contains(mut self, term: impl Into<String>) -> Self {
        self.context_contains = Some(term.into());
        self
    }

    /// Returns true if the context-not-contains criterion is present.
    #[must_use]
    pub const fn is_context_not_contains_set(&self) -> bool {
        self.context_not_contains.is_some()
    }

    /// Returns the context-not-contains term, or `""` when unset.
    #[must_use]
    pub fn context_not_contains(&self) -> &str {
        self.context_not_contains.as_deref().unwrap_or_default()
    }

    /// Excludes entries whose context contains `term`.
    #[must_use]
    pub fn with_context_not_contains(mut self, term: impl Into<String>) -> Self {
        self.context_not_contains = Some(term.into());
        self
    }

    // ------------------------------------------------------------------
    // time bounds
    // ------------------------------------------------------------------

    /// Returns true if the lower time bound is present.
    #[must_use]
    pub const fn is_time_gte_set(&self) -> bool {
        self.time_gte.is_some()
    }

    /// Returns the lower time bound, or `""` when unset.
    #[must_use]
    pub fn time_gte(&self) -> &str {
        self.time_gte.as_deref().unwrap_or_default()
    }

    /// Matches entries at or after `time` (compared in its stored text form).
    #[must_use]
    pub fn with_time_gte(mut self, time: impl Into<String>) -> Self {
        self.time_gte = Some(time.into());
        self
    }

    /// Matches entries at or after `time`.
    #[must_use]
    pub fn with_time_gte_at(self, time: DateTime<Utc>) -> Self {
        self.with_time_gte(format_time(&time))
    }

    /// Returns true if the upper time bound is present.
    #[must_use]
    pub const fn is_time_lte_set(&self) -> bool {
        self.time_lte.is_some()
    }

    /// Returns the upper time bound, or `""` when unset.
    #[must_use]
    pub fn time_lte(&self) -> &str {
        self.time_lte.as_deref().unwrap_or_default()
    }

    /// Matches entries at or before `time` (compared in its stored text form).
    #[must_use]
    pub fn with_time_lte(mut self, time: impl Into<String>) -> Self {
        self.time_lte = Some(time.into());
        self
    }

    /// Matches entries at or before `time`.
    #[must_use]
    pub fn with_time_lte_at(self, time: DateTime<Utc>) -> Self {
        self.with_time_lte(format_time(&time))
    }

    // ------------------------------------------------------------------
    // paging
    // ------------------------------------------------------------------

    /// Returns true if a limit is present.
    #[must_use]
    pub const fn is_limit_set(&self) -> bool {
        self.limit.is_some()
    }

    /// Returns the limit, or `0` when unset.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or_default()
    }

    /// Caps the number of rows listed or deleted. Ignored by counts.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if an offset is present.
    #[must_use]
    pub const fn is_offset_set(&self) -> bool {
        self.offset.is_some()
    }

    /// Returns the offset, or `0` when unset.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or_default()
    }

    /// Skips rows before listing or deleting. Ignored by counts.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    // ------------------------------------------------------------------
    // ordering
    // ------------------------------------------------------------------

    /// Returns true if a sort column is present.
    #[must_use]
    pub const fn is_order_by_set(&self) -> bool {
        self.order_by.is_some()
    }

    /// Returns the sort column, or `""` when unset.
    #[must_use]
    pub fn order_by(&self) -> &str {
        self.order_by.as_deref().unwrap_or_default()
    }

    /// Sorts by `column`.
    #[must_use]
    pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    /// Returns true if a sort direction is present.
    #[must_use]
    pub const fn is_order_direction_set(&self) -> bool {
        self.order_direction.is_some()
    }

    /// Returns the sort direction, or `""` when unset.
    #[must_use]
    pub fn order_direction(&self) -> &str {
        self.order_direction.as_deref().unwrap_or_default()
    }

    /// Sets the sort direction ([`ORDER_ASC`] or [`ORDER_DESC`]).
    #[must_use]
    pub fn with_order_direction(mut self, direction: impl Into<String>) -> Self {
        self.order_direction = Some(direction.into());
        self
    }
}
