use bytes::Bytes;
use tracing::warn;

/// Plain text of an uploaded PDF. Unreadable documents yield an empty string;
/// the caller decides what an empty document means.
pub async fn extract_text(data: Bytes) -> String {
    // pdf-extract is CPU-bound and can panic on malformed input.
    let result =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            String::new()
        }
        Err(e) => {
            warn!("PDF text extraction aborted: {e}");
            String::new()
        }
    }
}
