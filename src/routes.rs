use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};

use crate::posts::{self, Author, BlogPost, NewPost, PostPatch};
use crate::{DbPool, DbPoolExt};

// ─── Models ───

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

fn err(status: Status, msg: &str, code: &str) -> (Status, Json<ApiError>) {
    (status, Json(ApiError { error: msg.to_string(), code: code.to_string() }))
}

fn db_err(msg: &str) -> (Status, Json<ApiError>) {
    err(Status::InternalServerError, msg, "DB_ERROR")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub author: Author,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub created_at: String,
}

impl From<BlogPost> for PostResponse {
    fn from(post: BlogPost) -> Self {
        let author_name = post.author_name();
        PostResponse {
            id: post.id,
            author: post.author,
            title: post.title,
            content: post.content,
            author_name,
            created_at: post.created_at,
        }
    }
}

// ─── Request bodies ───

#[derive(Deserialize)]
pub struct CreatePostReq {
    pub author: Author,
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdatePostReq {
    pub id: Option<String>,
    pub author: Option<Author>,
    pub title: Option<String>,
    pub content: Option<String>,
}

// ─── Helpers ───

fn require_author(author: &Author) -> Result<Author, (Status, Json<ApiError>)> {
    let first = author.first_name.trim();
    let last = author.last_name.trim();
    if first.is_empty() || last.is_empty() {
        return Err(err(
            Status::UnprocessableEntity,
            "Author first and last name are required",
            "VALIDATION_ERROR",
        ));
    }
    Ok(Author { first_name: first.to_string(), last_name: last.to_string() })
}

// ─── Routes ───

#[get("/health")]
pub fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "version": "0.1.0"}))
}

#[get("/posts")]
pub fn list_posts(db: &State<DbPool>) -> Result<Json<Vec<PostResponse>>, (Status, Json<ApiError>)> {
    let conn = db.conn();
    let posts = posts::list_all(&conn).map_err(|e| db_err(&e.to_string()))?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[post("/posts", format = "json", data = "<req>")]
pub fn create_post(req: Json<CreatePostReq>, db: &State<DbPool>) -> Result<(Status, Json<PostResponse>), (Status, Json<ApiError>)> {
    let req = req.into_inner();
    let author = require_author(&req.author)?;
    let title = req.title.trim();
    if title.is_empty() {
        return Err(err(Status::UnprocessableEntity, "Title is required", "VALIDATION_ERROR"));
    }
    if req.content.trim().is_empty() {
        return Err(err(Status::UnprocessableEntity, "Content is required", "VALIDATION_ERROR"));
    }

    let new = NewPost { author, title: title.to_string(), content: req.content };

    let conn = db.conn();
    let post = posts::insert(&conn, &new).map_err(|e| db_err(&e.to_string()))?;
    Ok((Status::Created, Json(PostResponse::from(post))))
}

#[put("/posts/<post_id>", format = "json", data = "<req>")]
pub fn update_post(post_id: &str, req: Json<UpdatePostReq>, db: &State<DbPool>) -> Result<Status, (Status, Json<ApiError>)> {
    let req = req.into_inner();

    // A body id is optional, but a present one must match the path.
    if let Some(body_id) = req.id.as_deref() {
        if body_id != post_id {
            return Err(err(Status::BadRequest, "Request path id and body id must match", "ID_MISMATCH"));
        }
    }

    let author = match req.author.as_ref() {
        Some(a) => Some(require_author(a)?),
        None => None,
    };
    if matches!(req.title.as_deref(), Some(t) if t.trim().is_empty()) {
        return Err(err(Status::UnprocessableEntity, "Title is required", "VALIDATION_ERROR"));
    }
    if matches!(req.content.as_deref(), Some(c) if c.trim().is_empty()) {
        return Err(err(Status::UnprocessableEntity, "Content is required", "VALIDATION_ERROR"));
    }

    let patch = PostPatch {
        author,
        title: req.title.map(|t| t.trim().to_string()),
        content: req.content,
    };

    let conn = db.conn();
    let updated = posts::update_by_id(&conn, post_id, &patch).map_err(|e| db_err(&e.to_string()))?;
    if !updated {
        return Err(err(Status::NotFound, "Post not found", "NOT_FOUND"));
    }
    Ok(Status::NoContent)
}

#[delete("/posts/<post_id>")]
pub fn delete_post(post_id: &str, db: &State<DbPool>) -> Result<Status, (Status, Json<ApiError>)> {
    let conn = db.conn();
    posts::delete_by_id(&conn, post_id).map_err(|e| db_err(&e.to_string()))?;
    // 204 whether or not the id existed
    Ok(Status::NoContent)
}

// ─── Catchers ───

#[catch(404)]
pub fn not_found() -> Json<ApiError> {
    Json(ApiError { error: "Not found".to_string(), code: "NOT_FOUND".to_string() })
}

#[catch(422)]
pub fn unprocessable() -> Json<ApiError> {
    Json(ApiError { error: "Request body is missing required fields or malformed".to_string(), code: "VALIDATION_ERROR".to_string() })
}

#[catch(500)]
pub fn internal_error() -> Json<ApiError> {
    Json(ApiError { error: "Internal server error".to_string(), code: "INTERNAL_ERROR".to_string() })
}
