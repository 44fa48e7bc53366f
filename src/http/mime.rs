//! Content-Type lookup by file extension.

/// Content type sent for files whose extension is missing or not in the table.
///
/// This is not a registered type; browsers usually offer to save the file.
pub const UNKNOWN_CONTENT_TYPE: &str = "x-application/x-unknown";

/// Returns the content type for a file name, based on the text after its last `.`.
///
/// The extension is matched case-insensitively.
///
/// # Example
///
/// ```
/// # use webroot::http::mime::content_type_for;
/// assert_eq!(content_type_for("index.HTML"), "text/html");
/// assert_eq!(content_type_for("README"), "x-application/x-unknown");
/// ```
pub fn content_type_for(file_name: &str) -> &'static str {
    let Some(pos) = file_name.rfind('.') else {
        return UNKNOWN_CONTENT_TYPE;
    };

    match file_name[pos + 1..].to_ascii_lowercase().as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "java" => "text/x-java",
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "class" => "application/java-vm",
        "jar" => "application/java-archive",
        "zip" => "application/zip",
        "xml" => "application/xml",
        "xhtml" => "application/xhtml+xml",
        _ => UNKNOWN_CONTENT_TYPE,
    }
}
