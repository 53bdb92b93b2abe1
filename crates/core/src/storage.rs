//! Shot reference image storage rules: bucket, object keys, size and
//! content-type limits, and public URL mapping.

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Bucket holding shot reference images.
pub const SHOT_IMAGES_BUCKET: &str = "shot-images";

/// Key prefix for shot images inside the bucket.
pub const SHOT_IMAGE_PREFIX: &str = "shots";

/// Maximum accepted image size (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Required content-type prefix.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an upload's declared content type and size.
pub fn validate_image_upload(
    content_type: &str,
    size_bytes: u64,
    max_bytes: u64,
) -> Result<(), CoreError> {
    if !content_type.starts_with(IMAGE_CONTENT_TYPE_PREFIX) {
        return Err(CoreError::Validation(
            "Please select an image file (JPEG, PNG, etc.)".to_string(),
        ));
    }
    if size_bytes == 0 {
        return Err(CoreError::Validation("Image file is empty".to_string()));
    }
    if size_bytes > max_bytes {
        return Err(CoreError::Validation(format!(
            "Image size must be less than {} MB",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Reject keys that could escape the bucket root.
pub fn validate_object_key(key: &str) -> Result<(), CoreError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        return Err(CoreError::Validation(format!("Invalid object key '{key}'")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Keys and URLs
// ---------------------------------------------------------------------------

/// File extension from an uploaded file name, falling back to the subtype of
/// the content type (`image/png` -> `png`).
pub fn image_extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.unwrap_or_else(|| {
        content_type
            .strip_prefix(IMAGE_CONTENT_TYPE_PREFIX)
            .map(|sub| sub.split(['+', ';']).next().unwrap_or(sub))
            .filter(|sub| !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin")
            .to_string()
    })
}

/// Object key `shots/{shot_id}.{ext}`, or `shots/{unix_millis}.{ext}` when
/// the image is not yet attached to a shot.
pub fn shot_image_key(shot_id: Option<DbId>, unix_millis: i64, ext: &str) -> String {
    let stem = shot_id.map_or_else(|| unix_millis.to_string(), |id| id.to_string());
    format!("{SHOT_IMAGE_PREFIX}/{stem}.{ext}")
}

/// Public URL for an object in the shot image bucket.
pub fn public_url(base_url: &str, key: &str) -> String {
    format!(
        "{}/storage/{SHOT_IMAGES_BUCKET}/{key}",
        base_url.trim_end_matches('/')
    )
}

/// Recover the object key from a public URL this server issued. URLs on
/// another host, or outside the shot image folder, yield `None`.
pub fn key_from_public_url(base_url: &str, url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let key = path.strip_prefix(&public_url(base_url, ""))?;
    let file = key.strip_prefix(SHOT_IMAGE_PREFIX)?.strip_prefix('/')?;
    if file.contains('/') {
        return None;
    }
    validate_object_key(key).ok()?;
    Some(key.to_string())
}

/// Whether `key` is the attached image key of shot `shot_id`
/// (`shots/{shot_id}.{ext}`).
pub fn is_attached_key(key: &str, shot_id: DbId) -> bool {
    key.strip_prefix(SHOT_IMAGE_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|file| file.split_once('.'))
        .is_some_and(|(stem, _)| stem == shot_id.to_string())
}

/// Guess a content type from an object key's extension.
pub fn content_type_for_key(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
