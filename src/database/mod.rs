pub mod assert;

use crate::DbPool;
use actix_web::web;
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::PooledConnection;
use std::time::Duration;

pub fn get_db_conn(
    pool: &web::Data<DbPool>,
) -> anyhow::Result<PooledConnection<ConnectionManager<PgConnection>>> {
    pool.get().context("DB connection")
}

const READ_RETRY_ATTEMPTS: usize = 3;
const READ_RETRY_BASE_DELAY_MS: u64 = 100;
const READ_RETRY_MAX_DELAY_MS: u64 = 1_000;

/// Bounded retry for idempotent reads. Writes must never go through here.
/// `NotFound` is a definitive answer, not a transient failure.
pub fn retry_read<T, F>(mut op: F) -> Result<T, diesel::result::Error>
where
    F: FnMut() -> Result<T, diesel::result::Error>,
{
    let mut delay = READ_RETRY_BASE_DELAY_MS;
    let mut attempt = 0;
    loop {
        match op() {
            Ok(val) => return Ok(val),
            Err(diesel::result::Error::NotFound) => return Err(diesel::result::Error::NotFound),
            Err(err) => {
                attempt += 1;
                if attempt >= READ_RETRY_ATTEMPTS {
                    log::warn!("read retry budget exhausted: {}", err);
                    return Err(err);
                }
                std::thread::sleep(Duration::from_millis(delay));
                delay = (delay * 2).min(READ_RETRY_MAX_DELAY_MS);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::Error;

    #[test]
    fn returns_first_success() {
        let mut calls = 0;
        let res: Result<i32, _> = retry_read(|| {
            calls += 1;
            Ok(7)
        });
        assert_eq!(res.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_transient_errors_until_success() {
        let mut calls = 0;
        let res: Result<i32, _> = retry_read(|| {
            calls += 1;
            if calls < 3 {
                Err(Error::AlreadyInTransaction)
            } else {
                Ok(42)
            }
        });
        assert_eq!(res.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_budget() {
        let mut calls = 0;
        let res: Result<(), _> = retry_read(|| {
            calls += 1;
            Err(Error::AlreadyInTransaction)
        });
        assert!(res.is_err());
        assert_eq!(calls, READ_RETRY_ATTEMPTS);
    }

    #[test]
    fn not_found_is_not_retried() {
        let mut calls = 0;
        let res: Result<(), _> = retry_read(|| {
            calls += 1;
            Err(Error::NotFound)
        });
        assert!(matches!(res, Err(Error::NotFound)));
        assert_eq!(calls, 1);
    }
}
