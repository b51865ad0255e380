use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use crate::config::DbSettings;
use crate::domain::errors::DomainError;
use crate::errors::AppError;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Build the shared pool without connecting.
///
/// The service starts even when the database is down; requests then fail
/// their checkout after `connect_timeout` and answer 503.
pub fn create_pool(settings: &DbSettings) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(&settings.url);
    Pool::builder()
        .max_size(settings.max_size)
        .connection_timeout(settings.connect_timeout)
        .build_unchecked(manager)
}

/// The database connection of one request.
///
/// Nothing is checked out until the first [`acquire`](Self::acquire); every
/// later call returns the same connection. The connection goes back to the
/// pool on [`release`](Self::release) or when the handle is dropped.
pub struct RequestConnection {
    pool: DbPool,
    conn: Option<PooledConn>,
}

impl RequestConnection {
    pub fn new(pool: DbPool) -> Self {
        Self { pool, conn: None }
    }

    /// `None` when no connection could be obtained; the cause is logged.
    pub fn acquire(&mut self) -> Option<&mut PgConnection> {
        if self.conn.is_none() {
            match self.pool.get() {
                Ok(conn) => self.conn = Some(conn),
                Err(e) => {
                    log::error!("Could not obtain a database connection: {}", e);
                    return None;
                }
            }
        }
        self.conn.as_deref_mut()
    }

    /// [`acquire`](Self::acquire), with absence as the 503-bound error.
    pub fn get(&mut self) -> Result<&mut PgConnection, DomainError> {
        self.acquire().ok_or_else(DomainError::unavailable)
    }

    pub fn is_acquired(&self) -> bool {
        self.conn.is_some()
    }

    /// Return the connection to the pool. Safe to call more than once.
    ///
    /// A connection left inside a transaction is reported broken by the
    /// manager and discarded by the pool rather than reused.
    pub fn release(&mut self) {
        if self.conn.take().is_some() {
            log::debug!("Request connection released");
        }
    }
}

impl Drop for RequestConnection {
    fn drop(&mut self) {
        self.release();
    }
}

impl FromRequest for RequestConnection {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match req.app_data::<web::Data<DbPool>>() {
            Some(pool) => Ok(RequestConnection::new(pool.get_ref().clone())),
            None => Err(AppError::Internal(
                "Database pool is not configured".to_string(),
            )),
        })
    }
}
