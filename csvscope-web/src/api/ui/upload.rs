//! Upload page handlers
//!
//! Accepts one multipart field named `file`. Anything that is not a `.csv`
//! file (by name, before and after sanitizing) is turned away in-band with
//! HTTP 200; only storage failures are errors.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Html;
use tracing::{info, warn};

use super::layout::{file_list_html, message_html, page, Page};
use crate::store::sanitize_filename;
use crate::{ApiResult, AppState};

pub const INVALID_UPLOAD_MESSAGE: &str = "Please upload a CSV file.";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully.";

/// Multipart field carrying the uploaded file
const FILE_FIELD: &str = "file";

/// An uploaded file as received
struct Upload {
    filename: String,
    content: Vec<u8>,
}

fn upload_form_html(message: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Upload</h1>
{}<form method="post" action="/upload" enctype="multipart/form-data" class="upload-form">
    <input type="file" name="{}" accept=".csv">
    <button type="submit">Upload</button>
</form>"#,
        message_html(message),
        FILE_FIELD
    );
    page(Page::Upload, &body)
}

fn confirmation_html(files: &[String]) -> String {
    let body = format!(
        r#"<h1>Upload complete</h1>
{}<h2>Uploaded files</h2>
{}<p><a href="/analyse">Analyse a file</a> or <a href="/upload">upload another</a>.</p>"#,
        message_html(Some(UPLOAD_SUCCESS_MESSAGE)),
        file_list_html(files)
    );
    page(Page::Upload, &body)
}

/// Pull the first `file` field out of the form, skipping any others
async fn read_upload(multipart: &mut Multipart) -> ApiResult<Option<Upload>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await?.to_vec();
        return Ok(Some(Upload { filename, content }));
    }
    Ok(None)
}

/// GET /upload
pub async fn upload_form() -> Html<String> {
    Html(upload_form_html(None))
}

/// POST /upload
pub async fn upload_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Html<String>> {
    // A body that is not multipart at all carries no file
    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await?,
        Err(rejection) => {
            warn!("Upload without a multipart body: {}", rejection);
            None
        }
    };

    let upload = match upload {
        Some(upload) if !upload.filename.is_empty() && upload.filename.ends_with(".csv") => upload,
        Some(upload) => {
            warn!("Rejected upload {:?}: not a CSV file", upload.filename);
            return Ok(Html(upload_form_html(Some(INVALID_UPLOAD_MESSAGE))));
        }
        None => {
            warn!("Rejected upload: no file field");
            return Ok(Html(upload_form_html(Some(INVALID_UPLOAD_MESSAGE))));
        }
    };

    // "..csv" or "%%.csv" pass the suffix check but sanitize to a non-CSV name
    let sanitized = sanitize_filename(&upload.filename);
    if sanitized.is_empty() || !sanitized.ends_with(".csv") {
        warn!(
            "Rejected upload {:?}: sanitized name {:?} is not a CSV file",
            upload.filename, sanitized
        );
        return Ok(Html(upload_form_html(Some(INVALID_UPLOAD_MESSAGE))));
    }

    let stored = state.store.save_file(&sanitized, &upload.content)?;
    info!("Uploaded {} ({} bytes)", stored, upload.content.len());

    let mut files = state.store.list_files()?;
    files.sort();
    Ok(Html(confirmation_html(&files)))
}
