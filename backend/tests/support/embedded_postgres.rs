//! Embedded PostgreSQL helpers for the Diesel adapter suites.
//!
//! Every test gets its own temporary database cloned from a template that
//! already carries the crate's migrations, so suites never share rows.
//! Setting `SKIP_TEST_CLUSTER=1` turns a failed cluster start into a skip.

#![allow(
    dead_code,
    reason = "each adapter suite uses a different subset of the helpers"
)]

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use medcycle::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "medcycle_template";
const SETUP_RETRIES: usize = 5;
const SETUP_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated temporary database plus the runtime that drives the adapters.
pub struct TestDatabase {
    runtime: Runtime,
    pool: DbPool,
    url: String,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Run raw SQL outside the adapters, e.g. to plant rows the domain rejects.
    pub fn execute(&self, sql: &str) -> Result<(), String> {
        let mut client =
            Client::connect(&self.url, NoTls).map_err(|err| format_postgres_error(&err))?;
        client
            .batch_execute(sql)
            .map_err(|err| format_postgres_error(&err))
    }
}

/// Provision a database, or skip when `SKIP_TEST_CLUSTER` is set.
pub fn test_database() -> Option<TestDatabase> {
    match open_test_database() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn open_test_database() -> Result<TestDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_database(cluster, &runtime)?;
    let url = database.url().to_string();

    let config = PoolConfig::new(url.clone())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestDatabase {
        runtime,
        pool,
        url,
        _database: database,
    })
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Keep the password stable across processes that reuse one data directory.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster library spawns any threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", "medcycle_embedded_test");
        }
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) if attempt < SETUP_RETRIES => {
                eprintln!("pg-embed: attempt {attempt}/{SETUP_RETRIES} failed: {err:?}");
                std::thread::sleep(SETUP_RETRY_DELAY);
                attempt += 1;
            }
            Err(err) => return Err(format!("{err:?}")),
        }
    }
}

fn template_database_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Create the template on first use by running the crate's own migrations.
fn ensure_template_database(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(template_name)
}

fn provision_database(
    cluster: &ClusterHandle,
    runtime: &Runtime,
) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("no provisioning attempt ran");
    for attempt in 1..=SETUP_RETRIES {
        let result = ensure_template_database(cluster, runtime).and_then(|template| {
            let name = format!("test_{}", Uuid::new_v4().simple());
            cluster
                .temporary_database_from_template(name.as_str(), template.as_str())
                .map_err(|err| format!("create database from template: {err:?}"))
        });
        match result {
            Ok(database) => return Ok(database),
            Err(err) => last_error = format!("attempt {attempt}/{SETUP_RETRIES}: {err}"),
        }
        if attempt < SETUP_RETRIES {
            std::thread::sleep(SETUP_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// Render a `postgres` error with its message and SQLSTATE.
fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(constraint) = db_error.constraint() {
        summary.push_str("; constraint: ");
        summary.push_str(constraint);
    }
    summary
}
