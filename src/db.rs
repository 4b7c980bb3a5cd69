use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;

pub struct Db {
    conn: Mutex<Connection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Username {
    pub name: String,
    pub date: DateTime<Utc>,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn init_schema(&self) -> Result<()> {
        self.conn().execute_batch(
            "CREATE TABLE IF NOT EXISTS guilds (
                guild_id  INTEGER PRIMARY KEY,
                prefix    TEXT
            );

            CREATE TABLE IF NOT EXISTS usernames (
                user_id   INTEGER NOT NULL,
                name      TEXT NOT NULL,
                date      INTEGER NOT NULL,
                PRIMARY KEY (user_id, name)
            );",
        )?;
        Ok(())
    }

    pub fn guild_prefix(&self, guild_id: u64) -> Result<Option<String>> {
        let prefix = self
            .conn()
            .query_row(
                "SELECT prefix FROM guilds WHERE guild_id = ?1",
                params![guild_id as i64],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(prefix.flatten())
    }

    #[cfg(test)]
    pub fn set_guild_prefix(&self, guild_id: u64, prefix: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO guilds (guild_id, prefix) VALUES (?1, ?2)
             ON CONFLICT(guild_id) DO UPDATE SET prefix = ?2",
            params![guild_id as i64, prefix],
        )?;
        Ok(())
    }

    /// Record that `user_id` was seen as `name`. The date only moves when the
    /// user switches back to an older name.
    pub fn record_username(&self, user_id: u64, name: &str) -> Result<()> {
        self.record_username_at(user_id, name, Utc::now())
    }

    pub fn record_username_at(&self, user_id: u64, name: &str, seen: DateTime<Utc>) -> Result<()> {
        let conn = self.conn();
        let latest: Option<String> = conn
            .query_row(
                "SELECT name FROM usernames WHERE user_id = ?1 ORDER BY date DESC LIMIT 1",
                params![user_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        if latest.as_deref() == Some(name) {
            return Ok(());
        }
        conn.execute(
            "INSERT INTO usernames (user_id, name, date) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, name) DO UPDATE SET date = ?3",
            params![user_id as i64, name, seen.timestamp()],
        )?;
        Ok(())
    }

    /// All names a user has been seen with, newest first.
    pub fn usernames(&self, user_id: u64) -> Result<Vec<Username>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT name, date FROM usernames WHERE user_id = ?1 ORDER BY date DESC",
        )?;
        let names = stmt
            .query_map(params![user_id as i64], |row| {
                let secs: i64 = row.get(1)?;
                Ok(Username {
                    name: row.get(0)?,
                    date: DateTime::from_timestamp(secs, 0).unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
