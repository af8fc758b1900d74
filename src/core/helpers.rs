use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use crate::models::models::Outcome;

pub fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

/// Serializes `value` the way the data file has always been laid out:
/// pretty-printed with four-space indentation.
pub fn to_json_pretty<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Replaces `path` with `bytes` in one step.
///
/// The bytes go to a temporary file in the same directory, which is synced and
/// then renamed over the target, so readers of `path` see either the old or
/// the new contents and never a truncated file. On unix the directory is
/// synced after the rename so the new entry survives a crash.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    std::fs::File::open(dir)?.sync_all()?;

    Ok(())
}

pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub fn respond<T: Serialize>(status: StatusCode, message: impl Into<String>, data: Option<T>) -> HttpResponse {
    HttpResponse::build(status).json(Outcome::ok(message, data))
}
