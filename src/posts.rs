use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// Composite author value. Both name parts are required; a payload carrying
/// only one of them is rejected at the deserialization boundary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

/// A stored blog post. `id` and `created_at` are assigned at insert and
/// never change afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct BlogPost {
    pub id: String,
    pub author: Author,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

impl BlogPost {
    /// Display name derived from the author parts; never persisted.
    pub fn author_name(&self) -> String {
        format!("{} {}", self.author.first_name, self.author.last_name)
    }
}

/// The insertable shape of a post, before the store assigns an id.
#[derive(Clone, Debug)]
pub struct NewPost {
    pub author: Author,
    pub title: String,
    pub content: String,
}

/// Partial replacement of the mutable fields. Absent fields keep their
/// stored value; `id` is immutable.
#[derive(Clone, Debug)]
pub struct PostPatch {
    pub author: Option<Author>,
    pub title: Option<String>,
    pub content: Option<String>,
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<BlogPost> {
    Ok(BlogPost {
        id: row.get(0)?,
        author: Author {
            first_name: row.get(1)?,
            last_name: row.get(2)?,
        },
        title: row.get(3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const POST_COLUMNS: &str = "id, author_first_name, author_last_name, title, content, created_at";

pub fn insert(conn: &Connection, new: &NewPost) -> rusqlite::Result<BlogPost> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO posts (id, author_first_name, author_last_name, title, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![id, new.author.first_name, new.author.last_name, new.title, new.content, created_at],
    )?;
    Ok(BlogPost {
        id,
        author: new.author.clone(),
        title: new.title.clone(),
        content: new.content.clone(),
        created_at,
    })
}

pub fn insert_many(conn: &Connection, new_posts: &[NewPost]) -> rusqlite::Result<Vec<BlogPost>> {
    let mut inserted = Vec::with_capacity(new_posts.len());
    for new in new_posts {
        inserted.push(insert(conn, new)?);
    }
    Ok(inserted)
}

pub fn list_all(conn: &Connection) -> rusqlite::Result<Vec<BlogPost>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM posts ORDER BY created_at DESC",
        POST_COLUMNS
    ))?;
    let posts = stmt
        .query_map([], post_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(posts)
}

/// One arbitrary record, or `None` on an empty store.
pub fn find_one(conn: &Connection) -> rusqlite::Result<Option<BlogPost>> {
    conn.query_row(
        &format!("SELECT {} FROM posts LIMIT 1", POST_COLUMNS),
        [],
        post_from_row,
    )
    .optional()
}

pub fn find_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<BlogPost>> {
    conn.query_row(
        &format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS),
        [id],
        post_from_row,
    )
    .optional()
}

/// Merges the patch into the stored record. Returns `false` when no record
/// has the given id.
pub fn update_by_id(conn: &Connection, id: &str, patch: &PostPatch) -> rusqlite::Result<bool> {
    let current = match find_by_id(conn, id)? {
        Some(post) => post,
        None => return Ok(false),
    };

    let author = patch.author.as_ref().unwrap_or(&current.author);
    let title = patch.title.as_deref().unwrap_or(&current.title);
    let content = patch.content.as_deref().unwrap_or(&current.content);

    conn.execute(
        "UPDATE posts SET author_first_name = ?1, author_last_name = ?2, title = ?3, content = ?4 WHERE id = ?5",
        rusqlite::params![author.first_name, author.last_name, title, content, id],
    )?;
    Ok(true)
}

/// Idempotent in effect; a second delete of the same id removes zero rows.
pub fn delete_by_id(conn: &Connection, id: &str) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM posts WHERE id = ?1", [id])
}
