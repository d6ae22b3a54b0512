use rusqlite::Connection;

pub fn initialize(conn: &Connection) {
    conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
    conn.execute_batch("PRAGMA foreign_keys=ON;").ok();

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            author_first_name TEXT NOT NULL,
            author_last_name TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            created_at TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);
        ",
    )
    .expect("Failed to initialize database");
}

/// Removes every post. Test teardown calls this between cases.
pub fn wipe(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM posts", [])
}
