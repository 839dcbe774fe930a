use sqlx::PgConnection;

/// A handle to an acquired database connection. Dropping the handle releases the connection.
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Provides access to the systems the application talks to (currently just the task database).
/// Business logic receives an implementation of this explicitly so it never relies on global state
/// and driven adapters can be swapped out in tests.
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    /// Acquires a database connection for the duration of the returned handle
    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}
