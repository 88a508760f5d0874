use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Upper bound on waiting for a connection. A lookup that misses the cache
/// during an outage gives up after this long and answers 503.
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(3);

/// Builds the pool. `Pool::build` checks out the initial connections, so an
/// unreachable database fails here rather than on the first query.
pub fn create_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .connection_timeout(CONNECTION_TIMEOUT)
        .build(manager)
}
