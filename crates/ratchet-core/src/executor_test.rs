use super::*;
use crate::error::ErrorCode;
use crate::revision::Revision;
use crate::statement::Statement;

// ── Helpers ────────────────────────────────────────────────────────────

/// Records every statement it is asked to run; fails on one chosen statement.
#[derive(Default)]
struct RecordingConnection {
    executed: Vec<String>,
    fail_on: Option<String>,
}

impl SchemaConnection for RecordingConnection {
    fn execute_sql(&mut self, sql: &str) -> Result<(), BoxError> {
        if self.fail_on.as_deref() == Some(sql) {
            return Err(format!("simulated failure: {sql}").into());
        }
        self.executed.push(sql.to_string());
        Ok(())
    }
}

struct Outcome {
    result: UpgradeResult<()>,
    conn: RecordingConnection,
    events: Vec<UpgradeEvent>,
    written: Vec<SchemaVersion>,
}

fn run(
    revisions: &RevisionSet,
    recorded: Option<u64>,
    policy: UpgradePolicy,
    arguments: Arguments,
    mut conn: RecordingConnection,
) -> Outcome {
    let recorded = recorded.map(SchemaVersion::from);
    let mut events = Vec::new();
    let mut written = Vec::new();

    let result = Executor::new(
        ExecutorConfig::new(
            &mut conn,
            revisions,
            policy,
            move |_| Ok(recorded.clone()),
            |version, _| {
                written.push(version.clone());
                Ok(())
            },
        )
        .events(|event| events.push(event.clone()))
        .arguments(arguments),
    )
    .execute();

    Outcome {
        result,
        conn,
        events,
        written,
    }
}

fn run_simple(revisions: &RevisionSet, recorded: Option<u64>, policy: UpgradePolicy) -> Outcome {
    run(
        revisions,
        recorded,
        policy,
        Arguments::new(),
        RecordingConnection::default(),
    )
}

/// Revisions 0..=3, each creating one table.
fn example_revisions() -> RevisionSet {
    RevisionSet::new((0u64..=3).map(|v| {
        Revision::new(
            v,
            vec![Statement::literal(format!("create table example{v} (id integer)"))],
        )
    }))
    .unwrap()
}

fn upgrading(from: Option<u64>, to: u64) -> UpgradeEvent {
    UpgradeEvent::Upgrading {
        from: match from {
            Some(v) => VersionPosition::At(SchemaVersion::from(v)),
            None => VersionPosition::Initial,
        },
        to: SchemaVersion::from(to),
    }
}

fn executing(sql: &str) -> UpgradeEvent {
    UpgradeEvent::ExecutingSql {
        sql: sql.to_string(),
    }
}

fn versions(values: &[u64]) -> Vec<SchemaVersion> {
    values.iter().copied().map(SchemaVersion::from).collect()
}

// ── Policy gate ────────────────────────────────────────────────────────

#[test]
fn test_unset_version_fails_when_upgrades_disallowed() {
    let outcome = run_simple(
        &RevisionSet::empty(),
        None,
        UpgradePolicy::FailInsteadOfUpgrading,
    );

    let err = outcome.result.unwrap_err();
    assert_eq!(err.code(), ErrorCode::UpgradeDisallowed);
    assert!(outcome.events.is_empty());
    assert!(outcome.conn.executed.is_empty());
    assert!(outcome.written.is_empty());
}

#[test]
fn test_unset_version_fails_when_upgrades_disallowed_with_revisions() {
    let outcome = run_simple(
        &example_revisions(),
        None,
        UpgradePolicy::FailInsteadOfUpgrading,
    );

    assert_eq!(
        outcome.result.unwrap_err().code(),
        ErrorCode::UpgradeDisallowed
    );
    assert!(outcome.events.is_empty());
    assert!(outcome.conn.executed.is_empty());
}

#[test]
fn test_unset_version_with_no_revisions_is_noop() {
    let outcome = run_simple(&RevisionSet::empty(), None, UpgradePolicy::PerformUpgrades);

    outcome.result.unwrap();
    assert!(outcome.events.is_empty());
    assert!(outcome.conn.executed.is_empty());
    assert!(outcome.written.is_empty());
}

// ── Version validation ─────────────────────────────────────────────────

#[test]
fn test_version_too_new_is_unrecognized() {
    for policy in [
        UpgradePolicy::PerformUpgrades,
        UpgradePolicy::FailInsteadOfUpgrading,
    ] {
        let outcome = run_simple(&example_revisions(), Some(100), policy);

        match outcome.result.unwrap_err() {
            UpgradeError::UnrecognizedSchemaRevision { version } => {
                assert_eq!(version, SchemaVersion::from(100u64));
            }
            other => panic!("expected UnrecognizedSchemaRevision, got {other:?}"),
        }
        assert!(outcome.events.is_empty());
        assert!(outcome.conn.executed.is_empty());
    }
}

#[test]
fn test_version_in_gap_is_unrecognized() {
    let revisions = RevisionSet::new(vec![
        Revision::new(0u64, vec![Statement::literal("create table a (id integer)")]),
        Revision::new(5u64, vec![Statement::literal("create table b (id integer)")]),
    ])
    .unwrap();

    let outcome = run_simple(&revisions, Some(3), UpgradePolicy::PerformUpgrades);

    assert_eq!(
        outcome.result.unwrap_err().code(),
        ErrorCode::UnrecognizedSchemaRevision
    );
    assert!(outcome.events.is_empty());
}

#[test]
fn test_known_version_with_empty_set_is_unrecognized() {
    let outcome = run_simple(&RevisionSet::empty(), Some(0), UpgradePolicy::PerformUpgrades);
    assert_eq!(
        outcome.result.unwrap_err().code(),
        ErrorCode::UnrecognizedSchemaRevision
    );
}

// ── Applying revisions ─────────────────────────────────────────────────

#[test]
fn test_upgrade_full_from_uninitialized() {
    let outcome = run_simple(&example_revisions(), None, UpgradePolicy::PerformUpgrades);

    outcome.result.unwrap();
    assert_eq!(
        outcome.events,
        vec![
            upgrading(None, 0),
            executing("create table example0 (id integer)"),
            upgrading(Some(0), 1),
            executing("create table example1 (id integer)"),
            upgrading(Some(1), 2),
            executing("create table example2 (id integer)"),
            upgrading(Some(2), 3),
            executing("create table example3 (id integer)"),
        ]
    );
    assert_eq!(outcome.conn.executed.len(), 4);
    assert_eq!(outcome.written, versions(&[0, 1, 2, 3]));
}

#[test]
fn test_first_upgrade_event_reports_sentinel() {
    let outcome = run_simple(&example_revisions(), None, UpgradePolicy::PerformUpgrades);

    match &outcome.events[0] {
        UpgradeEvent::Upgrading { from, .. } => {
            assert_eq!(from.to_string(), "-1");
            assert_eq!(from.to_signed(), num_bigint::BigInt::from(-1));
        }
        other => panic!("expected Upgrading, got {other:?}"),
    }
}

#[test]
fn test_upgrade_partial_from_known_version() {
    let outcome = run_simple(&example_revisions(), Some(1), UpgradePolicy::PerformUpgrades);

    outcome.result.unwrap();
    assert_eq!(
        outcome.events,
        vec![
            upgrading(Some(1), 2),
            executing("create table example2 (id integer)"),
            upgrading(Some(2), 3),
            executing("create table example3 (id integer)"),
        ]
    );
    assert_eq!(
        outcome.conn.executed,
        vec![
            "create table example2 (id integer)",
            "create table example3 (id integer)",
        ]
    );
    assert_eq!(outcome.written, versions(&[2, 3]));
}

#[test]
fn test_known_version_ignores_policy() {
    let outcome = run_simple(
        &example_revisions(),
        Some(2),
        UpgradePolicy::FailInsteadOfUpgrading,
    );

    outcome.result.unwrap();
    assert_eq!(outcome.written, versions(&[3]));
}

#[test]
fn test_already_at_latest_is_noop() {
    let outcome = run_simple(&example_revisions(), Some(3), UpgradePolicy::PerformUpgrades);

    outcome.result.unwrap();
    assert!(outcome.events.is_empty());
    assert!(outcome.conn.executed.is_empty());
    assert!(outcome.written.is_empty());
}

#[test]
fn test_revisions_applied_in_ascending_order() {
    // Inserted out of order, with gaps and one version wider than u64.
    let huge = SchemaVersion::parse("36893488147419103232").unwrap();
    let revisions = RevisionSet::new(vec![
        Revision::new(huge.clone(), vec![Statement::literal("select 'huge'")]),
        Revision::new(10u64, vec![Statement::literal("select 10")]),
        Revision::new(2u64, vec![Statement::literal("select 2")]),
        Revision::new(7u64, vec![Statement::literal("select 7")]),
    ])
    .unwrap();

    let outcome = run_simple(&revisions, Some(2), UpgradePolicy::PerformUpgrades);

    outcome.result.unwrap();
    assert_eq!(
        outcome.conn.executed,
        vec!["select 7", "select 10", "select 'huge'"]
    );
    assert_eq!(
        outcome.written,
        vec![SchemaVersion::from(7u64), SchemaVersion::from(10u64), huge]
    );
}

#[test]
fn test_statements_run_in_declared_order() {
    let revisions = RevisionSet::new(vec![Revision::new(
        0u64,
        vec![
            Statement::literal("create table t (id integer)"),
            Statement::literal("insert into t values (1)"),
            Statement::literal("insert into t values (2)"),
        ],
    )])
    .unwrap();

    let outcome = run_simple(&revisions, None, UpgradePolicy::PerformUpgrades);

    outcome.result.unwrap();
    assert_eq!(
        outcome.events,
        vec![
            upgrading(None, 0),
            executing("create table t (id integer)"),
            executing("insert into t values (1)"),
            executing("insert into t values (2)"),
        ]
    );
    assert_eq!(outcome.written, versions(&[0]));
}

// ── Arguments ──────────────────────────────────────────────────────────

fn grant_revisions() -> RevisionSet {
    RevisionSet::new(vec![
        Revision::new(0u64, vec![Statement::literal("create table t (id integer)")]),
        Revision::new(
            1u64,
            vec![
                Statement::literal("create table u (id integer)"),
                Statement::parameterized("grant select on t to ${reader}"),
            ],
        ),
    ])
    .unwrap()
}

#[test]
fn test_parameterized_statement_is_resolved() {
    let outcome = run(
        &grant_revisions(),
        None,
        UpgradePolicy::PerformUpgrades,
        Arguments::new().with("reader", "app_reader"),
        RecordingConnection::default(),
    );

    outcome.result.unwrap();
    assert_eq!(
        outcome.conn.executed.last().map(String::as_str),
        Some("grant select on t to app_reader")
    );
    assert!(outcome
        .events
        .contains(&executing("grant select on t to app_reader")));
}

#[test]
fn test_missing_argument_aborts_before_execution() {
    let outcome = run_simple(&grant_revisions(), None, UpgradePolicy::PerformUpgrades);

    match outcome.result.unwrap_err() {
        UpgradeError::ArgumentMissing { name, revision } => {
            assert_eq!(name, "reader");
            assert_eq!(revision, SchemaVersion::from(1u64));
        }
        other => panic!("expected ArgumentMissing, got {other:?}"),
    }
    // Revision 1's literal ran, the grant never did, and 1 was never recorded.
    assert_eq!(
        outcome.conn.executed,
        vec!["create table t (id integer)", "create table u (id integer)"]
    );
    assert_eq!(outcome.written, versions(&[0]));
    assert_eq!(
        outcome.events.last(),
        Some(&executing("create table u (id integer)"))
    );
}

// ── Failures from collaborators ────────────────────────────────────────

#[test]
fn test_sql_failure_stops_the_run() {
    let conn = RecordingConnection {
        fail_on: Some("create table example2 (id integer)".to_string()),
        ..Default::default()
    };
    let outcome = run(
        &example_revisions(),
        None,
        UpgradePolicy::PerformUpgrades,
        Arguments::new(),
        conn,
    );

    let err = outcome.result.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SqlExecution);
    match &err {
        UpgradeError::SqlExecution {
            revision,
            index,
            sql,
            ..
        } => {
            assert_eq!(*revision, SchemaVersion::from(2u64));
            assert_eq!(*index, 0);
            assert_eq!(sql, "create table example2 (id integer)");
        }
        other => panic!("expected SqlExecution, got {other:?}"),
    }
    assert!(err.to_string().contains("simulated failure"));
    assert_eq!(outcome.written, versions(&[0, 1]));
    // The failing statement was announced before it ran; nothing after it was.
    assert_eq!(
        outcome.events.last(),
        Some(&executing("create table example2 (id integer)"))
    );
    assert_eq!(outcome.events.len(), 6);
}

#[test]
fn test_version_read_failure_propagates() {
    let revisions = example_revisions();
    let mut conn = RecordingConnection::default();
    let mut events = Vec::new();

    let result = Executor::new(
        ExecutorConfig::new(
            &mut conn,
            &revisions,
            UpgradePolicy::PerformUpgrades,
            |_| Err("version table unreadable".into()),
            |_, _| Ok(()),
        )
        .events(|event| events.push(event.clone())),
    )
    .execute();

    let err = result.unwrap_err();
    assert_eq!(err.code(), ErrorCode::VersionRead);
    assert!(err.to_string().contains("version table unreadable"));
    assert!(events.is_empty());
    assert!(conn.executed.is_empty());
}

#[test]
fn test_version_write_failure_propagates() {
    let revisions = example_revisions();
    let mut conn = RecordingConnection::default();

    let result = Executor::new(ExecutorConfig::new(
        &mut conn,
        &revisions,
        UpgradePolicy::PerformUpgrades,
        |_| Ok(None),
        |version, _| {
            if *version == SchemaVersion::from(1u64) {
                Err("disk full".into())
            } else {
                Ok(())
            }
        },
    ))
    .execute();

    match result.unwrap_err() {
        UpgradeError::VersionWrite { version, .. } => {
            assert_eq!(version, SchemaVersion::from(1u64));
        }
        other => panic!("expected VersionWrite, got {other:?}"),
    }
    // Revision 1's statements ran; revision 2 never started.
    assert_eq!(conn.executed.len(), 2);
}

#[test]
fn test_version_accessors_see_the_connection() {
    let revisions = example_revisions();
    let mut conn = RecordingConnection::default();

    Executor::new(ExecutorConfig::new(
        &mut conn,
        &revisions,
        UpgradePolicy::PerformUpgrades,
        |c: &mut RecordingConnection| {
            c.executed.push("read version".to_string());
            Ok(Some(SchemaVersion::from(2u64)))
        },
        |version, c: &mut RecordingConnection| {
            c.executed.push(format!("write version {version}"));
            Ok(())
        },
    ))
    .execute()
    .unwrap();

    assert_eq!(
        conn.executed,
        vec![
            "read version",
            "create table example3 (id integer)",
            "write version 3",
        ]
    );
}
