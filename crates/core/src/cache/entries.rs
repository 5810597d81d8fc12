//! Store entry operations on the SQLite cache.
//!
//! Every store is a slice of the `cache_entries` table selected by its
//! persistent name; a store exists as long as it holds rows.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use crate::Error;
use crate::storage::{CacheStorage, Response, Store, StoreStats};

#[async_trait]
impl CacheStorage for CacheDb {
    async fn keys(&self, store: Store) -> Result<Vec<String>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM cache_entries WHERE store = ?1 ORDER BY url")?;
                let rows = stmt.query_map(params![store.name()], |row| row.get::<_, String>(0))?;
                let mut keys = Vec::new();
                for key in rows {
                    keys.push(key?);
                }
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }

    async fn lookup(&self, store: Store, key: &str) -> Result<Option<Response>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT final_url, status_code, content_type, headers_json, body, fetched_at
                     FROM cache_entries WHERE store = ?1 AND url = ?2",
                )?;

                let result = stmt.query_row(params![store.name(), key], |row| {
                    Ok(Response {
                        url: row.get(0)?,
                        status: row.get(1)?,
                        content_type: row.get(2)?,
                        headers_json: row.get(3)?,
                        body: row.get(4)?,
                        fetched_at: row.get(5)?,
                    })
                });

                match result {
                    Ok(response) => Ok(Some(response)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, store: Store, key: &str, response: &Response) -> Result<(), Error> {
        let key = key.to_string();
        let response = response.clone();
        let stored_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache_entries (
                        store, url, final_url, status_code, content_type,
                        headers_json, body, fetched_at, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(store, url) DO UPDATE SET
                        final_url = excluded.final_url,
                        status_code = excluded.status_code,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        fetched_at = excluded.fetched_at,
                        stored_at = excluded.stored_at",
                    params![
                        store.name(),
                        &key,
                        &response.url,
                        response.status,
                        &response.content_type,
                        &response.headers_json,
                        &response.body,
                        &response.fetched_at,
                        &stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, store: Store, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count =
                    conn.execute("DELETE FROM cache_entries WHERE store = ?1 AND url = ?2", params![store.name(), key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_store(&self, store: Store) -> Result<bool, Error> {
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE store = ?1", params![store.name()])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn stats(&self) -> Result<Vec<StoreStats>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<StoreStats>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT COUNT(*), COALESCE(SUM(LENGTH(body)), 0) FROM cache_entries WHERE store = ?1",
                )?;
                let mut stats = Vec::with_capacity(Store::ALL.len());
                for store in Store::ALL {
                    let (entries, body_bytes) = stmt.query_row(params![store.name()], |row| {
                        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
                    })?;
                    stats.push(StoreStats { store, entries: entries as u64, body_bytes: body_bytes as u64 });
                }
                Ok(stats)
            })
            .await
            .map_err(Error::from)
    }
}
