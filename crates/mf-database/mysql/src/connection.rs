use crate::repositories::RepositoryError;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncMysqlConnection;

pub type DbPool = Pool<AsyncMysqlConnection>;

/// Build the bounded connection pool shared by the pipeline and the read API
pub async fn establish_pool(database_url: &str, max_size: usize) -> Result<DbPool, RepositoryError> {
  let manager = AsyncDieselConnectionManager::<AsyncMysqlConnection>::new(database_url);
  Pool::builder(manager)
    .max_size(max_size)
    .build()
    .map_err(|e| RepositoryError::Pool(e.to_string()))
}
