pub(crate) const MIME_TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub(crate) const MIME_APPLICATION_JSON: &str = "application/json";
pub(crate) const MIME_OCTET_STREAM: &str = "application/octet-stream";
