//! The connection capability builders execute through.

use crate::error::DriverError;
use crate::result::RawResult;
use crate::statement::Statement;

/// Runs statements against a server.
///
/// Implementations own the wire protocol; builders only hand over the
/// assembled [`Statement`] and interpret the [`RawResult`]. A connection is
/// shared between a session, its schemas, and every builder created from
/// them, so it must be usable through `&self` from several threads.
pub trait Connection: Send + Sync {
    /// Run one statement and report its outcome.
    fn run(&self, statement: &Statement) -> Result<RawResult, DriverError>;
}

impl<C: Connection + ?Sized> Connection for std::sync::Arc<C> {
    fn run(&self, statement: &Statement) -> Result<RawResult, DriverError> {
        (**self).run(statement)
    }
}
