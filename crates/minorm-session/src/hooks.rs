//! Lifecycle hooks.
//!
//! A record type opts into any subset of eight hook points by implementing the
//! matching capability trait and reporting it through [`Hooks`]. With the
//! derive this is `#[orm(hooks(before_insert, after_query))]`; by hand it is
//! an `as_*` override returning `Some(self)`.
//!
//! `BeforeQuery` runs before any row exists, so it is a type-level hook: it
//! gets the session and may stage query parameters (for example a default
//! filter) for the SELECT about to be built.
//!
//! A hook error aborts the operation that fired it and is returned to the
//! caller; inside `Session::transaction` that rolls the unit of work back.

use minorm_core::Result;

use crate::Session;

/// The eight hook points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeQuery,
    AfterQuery,
    BeforeUpdate,
    AfterUpdate,
    BeforeDelete,
    AfterDelete,
    BeforeInsert,
    AfterInsert,
}

impl HookPoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            HookPoint::BeforeQuery => "before_query",
            HookPoint::AfterQuery => "after_query",
            HookPoint::BeforeUpdate => "before_update",
            HookPoint::AfterUpdate => "after_update",
            HookPoint::BeforeDelete => "before_delete",
            HookPoint::AfterDelete => "after_delete",
            HookPoint::BeforeInsert => "before_insert",
            HookPoint::AfterInsert => "after_insert",
        }
    }
}

/// Runs before a `find`/`first` builds its SELECT.
pub trait BeforeQuery {
    fn before_query(session: &mut Session<'_>) -> Result<()>;
}

/// Runs on each scanned record before it is handed to the caller.
pub trait AfterQuery {
    fn after_query(&mut self, session: &mut Session<'_>) -> Result<()>;
}

pub trait BeforeUpdate {
    fn before_update(&mut self, session: &mut Session<'_>) -> Result<()>;
}

pub trait AfterUpdate {
    fn after_update(&mut self, session: &mut Session<'_>) -> Result<()>;
}

pub trait BeforeDelete {
    fn before_delete(&mut self, session: &mut Session<'_>) -> Result<()>;
}

pub trait AfterDelete {
    fn after_delete(&mut self, session: &mut Session<'_>) -> Result<()>;
}

/// Runs on each record before the INSERT executes.
pub trait BeforeInsert {
    fn before_insert(&mut self, session: &mut Session<'_>) -> Result<()>;
}

/// Runs on each record after the INSERT succeeded.
pub trait AfterInsert {
    fn after_insert(&mut self, session: &mut Session<'_>) -> Result<()>;
}

/// Function pointer form of [`BeforeQuery::before_query`].
pub type BeforeQueryFn = for<'s, 'c> fn(&'s mut Session<'c>) -> Result<()>;

/// Capability table of a record type. Every accessor defaults to "not implemented".
pub trait Hooks {
    fn before_query_hook() -> Option<BeforeQueryFn> {
        None
    }

    fn as_after_query(&mut self) -> Option<&mut dyn AfterQuery> {
        None
    }

    fn as_before_update(&mut self) -> Option<&mut dyn BeforeUpdate> {
        None
    }

    fn as_after_update(&mut self) -> Option<&mut dyn AfterUpdate> {
        None
    }

    fn as_before_delete(&mut self) -> Option<&mut dyn BeforeDelete> {
        None
    }

    fn as_after_delete(&mut self) -> Option<&mut dyn AfterDelete> {
        None
    }

    fn as_before_insert(&mut self) -> Option<&mut dyn BeforeInsert> {
        None
    }

    fn as_after_insert(&mut self) -> Option<&mut dyn AfterInsert> {
        None
    }
}

impl Session<'_> {
    /// Fire the hook for `point` on `record`, if its type implements it.
    pub fn call_method<M: Hooks>(&mut self, point: HookPoint, record: &mut M) -> Result<()> {
        let outcome = match point {
            HookPoint::BeforeQuery => M::before_query_hook().map(|hook| hook(self)),
            HookPoint::AfterQuery => record.as_after_query().map(|h| h.after_query(self)),
            HookPoint::BeforeUpdate => record.as_before_update().map(|h| h.before_update(self)),
            HookPoint::AfterUpdate => record.as_after_update().map(|h| h.after_update(self)),
            HookPoint::BeforeDelete => record.as_before_delete().map(|h| h.before_delete(self)),
            HookPoint::AfterDelete => record.as_after_delete().map(|h| h.after_delete(self)),
            HookPoint::BeforeInsert => record.as_before_insert().map(|h| h.before_insert(self)),
            HookPoint::AfterInsert => record.as_after_insert().map(|h| h.after_insert(self)),
        };
        finish(point, std::any::type_name::<M>(), outcome)
    }

    /// Fire the type-level `BeforeQuery` hook of `M`, if any.
    pub fn call_before_query<M: Hooks>(&mut self) -> Result<()> {
        let outcome = M::before_query_hook().map(|hook| hook(self));
        finish(HookPoint::BeforeQuery, std::any::type_name::<M>(), outcome)
    }
}

fn finish(point: HookPoint, model: &'static str, outcome: Option<Result<()>>) -> Result<()> {
    match outcome {
        None => Ok(()),
        Some(Ok(())) => {
            tracing::trace!(hook = point.as_str(), model, "Hook ran");
            Ok(())
        }
        Some(Err(e)) => {
            tracing::warn!(hook = point.as_str(), model, error = %e, "Hook failed");
            Err(e)
        }
    }
}
