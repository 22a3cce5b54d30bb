//! Redis-backed coordination store.

use std::sync::Mutex;

use log::debug;
use redis::{Commands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use super::CoordinationStore;
use crate::error::WorkerError;

/// A [`CoordinationStore`] speaking to the learner's Redis instance.
///
/// `INCR` gives the cross-process atomicity the worker counter relies on.
pub struct RedisStore {
    conn: Mutex<redis::Connection>,
}

impl RedisStore {
    /// Opens a blocking connection to `address`, which is `host` or
    /// `host:port`. `default_port` applies to the bare-host form. An empty
    /// password connects without AUTH.
    pub fn connect(address: &str, default_port: u16, password: &str) -> Result<Self, WorkerError> {
        let (host, port) = split_address(address, default_port)?;
        debug!("connecting to redis at {}:{}", host, port);

        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(host, port),
            redis: RedisConnectionInfo {
                password: (!password.is_empty()).then(|| password.to_string()),
                ..Default::default()
            },
        };
        let client = redis::Client::open(info).map_err(connection_error)?;
        let conn = client.get_connection().map_err(connection_error)?;
        Ok(RedisStore {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut redis::Connection) -> redis::RedisResult<T>,
    ) -> Result<T, WorkerError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| WorkerError::Connection("redis connection lock poisoned".into()))?;
        f(&mut conn).map_err(connection_error)
    }
}

impl CoordinationStore for RedisStore {
    fn incr(&self, key: &str) -> Result<i64, WorkerError> {
        self.with_conn(|c| c.incr(key, 1))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, WorkerError> {
        self.with_conn(|c| c.get(key))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), WorkerError> {
        self.with_conn(|c| c.set(key, value.to_vec()))
    }
}

fn connection_error(e: redis::RedisError) -> WorkerError {
    WorkerError::Connection(e.to_string())
}

/// Splits `host[:port]`. A bare IPv6 literal is taken as a host.
fn split_address(address: &str, default_port: u16) -> Result<(String, u16), WorkerError> {
    if address.is_empty() {
        return Err(WorkerError::InvalidConfiguration(
            "learner address is empty".into(),
        ));
    }
    match address.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => {
            let port = port.parse::<u16>().map_err(|_| {
                WorkerError::InvalidConfiguration(format!("invalid port in '{}'", address))
            })?;
            Ok((host.to_string(), port))
        }
        _ => Ok((address.to_string(), default_port)),
    }
}
