//! The schema upgrade executor.
//!
//! An [`Executor`] reads the database's recorded version, validates it
//! against the revision set (see [`UpgradePlan`]), then applies each pending
//! revision in ascending order. After every revision it persists the new
//! version through the caller's version-set accessor, so a failure part way
//! through leaves the database recorded at the last revision that fully
//! succeeded.
//!
//! The executor never opens, closes, commits, or rolls back the connection.
//! Transaction scope belongs to the caller.

use crate::arguments::Arguments;
use crate::error::{BoxError, UpgradeError, UpgradeResult};
use crate::event::UpgradeEvent;
use crate::plan::{UpgradePlan, UpgradePolicy};
use crate::revision::RevisionSet;
use crate::version::{RecordedVersion, SchemaVersion, VersionPosition};

/// A database handle that can run one SQL statement at a time.
pub trait SchemaConnection {
    /// Execute a single resolved statement.
    fn execute_sql(&mut self, sql: &str) -> Result<(), BoxError>;
}

type VersionGetFn<'a, C> = Box<dyn FnMut(&mut C) -> Result<Option<SchemaVersion>, BoxError> + 'a>;
type VersionSetFn<'a, C> = Box<dyn FnMut(&SchemaVersion, &mut C) -> Result<(), BoxError> + 'a>;
type EventSinkFn<'a> = Box<dyn FnMut(&UpgradeEvent) + 'a>;

/// Everything an [`Executor`] needs for one run.
///
/// Required collaborators are taken by [`ExecutorConfig::new`]; the event
/// sink and the arguments default to a no-op sink and an empty set.
pub struct ExecutorConfig<'a, C: ?Sized> {
    connection: &'a mut C,
    revisions: &'a RevisionSet,
    policy: UpgradePolicy,
    version_get: VersionGetFn<'a, C>,
    version_set: VersionSetFn<'a, C>,
    events: EventSinkFn<'a>,
    arguments: Arguments,
}

impl<'a, C> ExecutorConfig<'a, C>
where
    C: SchemaConnection + ?Sized,
{
    /// Create a configuration with the required collaborators.
    ///
    /// `version_get` returns `None` when the database has no recorded
    /// version. `version_set` is called once per applied revision.
    pub fn new<G, S>(
        connection: &'a mut C,
        revisions: &'a RevisionSet,
        policy: UpgradePolicy,
        version_get: G,
        version_set: S,
    ) -> Self
    where
        G: FnMut(&mut C) -> Result<Option<SchemaVersion>, BoxError> + 'a,
        S: FnMut(&SchemaVersion, &mut C) -> Result<(), BoxError> + 'a,
    {
        Self {
            connection,
            revisions,
            policy,
            version_get: Box::new(version_get),
            version_set: Box::new(version_set),
            events: Box::new(|_| {}),
            arguments: Arguments::new(),
        }
    }

    /// Deliver progress events to `sink`.
    pub fn events<E>(mut self, sink: E) -> Self
    where
        E: FnMut(&UpgradeEvent) + 'a,
    {
        self.events = Box::new(sink);
        self
    }

    /// Arguments for parameterized statements.
    pub fn arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }
}

/// Drives a database from its recorded version to the latest revision.
pub struct Executor<'a, C: ?Sized> {
    config: ExecutorConfig<'a, C>,
}

impl<'a, C> Executor<'a, C>
where
    C: SchemaConnection + ?Sized,
{
    /// Create an executor for a single run.
    pub fn new(config: ExecutorConfig<'a, C>) -> Self {
        Self { config }
    }

    /// Run the upgrade to completion or to the first failure.
    ///
    /// Consumes the executor: a second run needs fresh version state, which
    /// means a fresh configuration.
    pub fn execute(self) -> UpgradeResult<()> {
        let ExecutorConfig {
            connection,
            revisions,
            policy,
            mut version_get,
            mut version_set,
            mut events,
            arguments,
        } = self.config;

        let recorded = version_get(&mut *connection)
            .map(RecordedVersion::from)
            .map_err(|source| UpgradeError::VersionRead { source })?;
        log::debug!("Recorded schema version: {recorded}");

        let plan = UpgradePlan::new(revisions, recorded, policy)?;
        if plan.is_empty() {
            log::info!("Schema is up to date at version {}", plan.start());
            return Ok(());
        }

        let mut previous = plan.start().clone();
        for revision in plan.pending() {
            let target = revision.version();
            log::info!("Upgrading schema {previous} -> {target}");
            events(&UpgradeEvent::Upgrading {
                from: previous.clone(),
                to: target.clone(),
            });

            for (index, resolved) in revision.resolved_statements(&arguments).enumerate() {
                let sql = resolved?;
                log::debug!("Revision {target}, statement {index}: {sql}");
                events(&UpgradeEvent::ExecutingSql {
                    sql: sql.to_string(),
                });
                connection
                    .execute_sql(&sql)
                    .map_err(|source| UpgradeError::SqlExecution {
                        revision: target.clone(),
                        index,
                        sql: sql.to_string(),
                        source,
                    })?;
            }

            version_set(target, &mut *connection).map_err(|source| {
                UpgradeError::VersionWrite {
                    version: target.clone(),
                    source,
                }
            })?;
            previous = VersionPosition::At(target.clone());
        }

        log::info!("Schema upgraded to version {previous}");
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
