//! Multipart upload parsing and the cheap local checks that run before any
//! upstream call: file extension, streamed size cap, extracted-text window.

use axum::extract::multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::errors::AppError;

/// Maximum accepted upload size: 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Cap on `company` and `job_title`, which are repeated in the prompt.
pub const MAX_SHORT_FIELD_BYTES: usize = 4 * 1024;
/// Cap on the optional `job_description`.
pub const MAX_JOB_DESCRIPTION_BYTES: usize = 64 * 1024;
/// Trimmed extracted text shorter than this is treated as unreadable.
pub const MIN_RESUME_CHARS: usize = 100;
/// Trimmed extracted text longer than this is not a resume.
pub const MAX_RESUME_CHARS: usize = 10_000;

/// A fully-read `POST /upload_resume` form.
#[derive(Debug)]
pub struct UploadRequest {
    pub filename: String,
    pub file: Bytes,
    pub company: String,
    pub job_title: String,
    /// Accepted for form compatibility. Not used in the prompt.
    pub job_description: Option<String>,
}

/// Byte accumulator that fails as soon as the running total passes `limit`.
pub struct CappedBuffer {
    buf: BytesMut,
    limit: usize,
}

impl CappedBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            limit,
        }
    }

    /// Appends a chunk. The chunk that crosses the limit is rejected, not stored.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), AppError> {
        if self.buf.len() + chunk.len() > self.limit {
            return Err(AppError::PayloadTooLarge);
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

pub fn validate_filename(filename: &str) -> Result<(), AppError> {
    if filename.to_ascii_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(AppError::Validation("Please upload a PDF file".to_string()))
    }
}

/// Checks the trimmed character count against [MIN_RESUME_CHARS, MAX_RESUME_CHARS]
/// and returns the trimmed text.
pub fn validate_resume_text(text: &str) -> Result<&str, AppError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < MIN_RESUME_CHARS {
        return Err(AppError::InvalidDocument(
            "The PDF file appears to be empty or unreadable".to_string(),
        ));
    }
    if len > MAX_RESUME_CHARS {
        return Err(AppError::InvalidDocument(
            "The document is too long to be a resume".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Reads the upload form. Every field is streamed chunk by chunk and abandoned
/// the moment it exceeds its cap: `MAX_UPLOAD_BYTES` for the file, a few KiB for
/// the text fields.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadRequest, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut company: Option<String> = None;
    let mut job_title: Option<String> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                validate_filename(&filename)?;
                let data = read_capped(field, MAX_UPLOAD_BYTES).await?;
                file = Some((filename, data));
            }
            "company" => {
                company = Some(read_text(field, "company", MAX_SHORT_FIELD_BYTES).await?)
            }
            "job_title" => {
                job_title = Some(read_text(field, "job_title", MAX_SHORT_FIELD_BYTES).await?)
            }
            "job_description" => {
                job_description =
                    Some(read_text(field, "job_description", MAX_JOB_DESCRIPTION_BYTES).await?)
            }
            _ => {
                // Drain unknown fields without keeping them.
                let mut field = field;
                while field.chunk().await.map_err(malformed)?.is_some() {}
            }
        }
    }

    let (filename, file) = file.ok_or_else(|| missing("file"))?;
    Ok(UploadRequest {
        filename,
        file,
        company: required_text(company, "company")?,
        job_title: required_text(job_title, "job_title")?,
        job_description: job_description.filter(|d| !d.trim().is_empty()),
    })
}

async fn read_capped(mut field: Field<'_>, limit: usize) -> Result<Bytes, AppError> {
    let mut buf = CappedBuffer::new(limit);
    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        buf.push(&chunk)?;
    }
    debug!("Upload fully read: {} bytes", buf.len());
    Ok(buf.into_bytes())
}

/// Reads a text field under `limit` bytes. Oversized or non-UTF-8 values are
/// validation errors.
async fn read_text(mut field: Field<'_>, name: &str, limit: usize) -> Result<String, AppError> {
    let mut buf = CappedBuffer::new(limit);
    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        buf.push(&chunk).map_err(|_| too_long(name, limit))?;
    }
    String::from_utf8(buf.into_bytes().to_vec())
        .map_err(|_| AppError::Validation(format!("Field '{name}' must be UTF-8 text")))
}

fn too_long(field: &str, limit: usize) -> AppError {
    AppError::Validation(format!("Field '{field}' exceeds {limit} bytes"))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("Missing required field '{field}'"))
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extension_accepted() {
        assert!(validate_filename("resume.pdf").is_ok());
        assert!(validate_filename("Resume.PDF").is_ok());
    }

    #[test]
    fn test_other_extensions_rejected() {
        for name in ["resume.docx", "resume.pdf.exe", "resume", ""] {
            assert!(
                matches!(validate_filename(name), Err(AppError::Validation(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn test_capped_buffer_accepts_exact_limit() {
        let mut buf = CappedBuffer::new(10);
        buf.push(&[0u8; 6]).unwrap();
        buf.push(&[0u8; 4]).unwrap();
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_capped_buffer_rejects_crossing_chunk_without_storing_it() {
        let mut buf = CappedBuffer::new(10);
        buf.push(&[0u8; 8]).unwrap();
        assert!(matches!(
            buf.push(&[0u8; 3]),
            Err(AppError::PayloadTooLarge)
        ));
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_capped_buffer_at_upload_limit() {
        let chunk = vec![0u8; 64 * 1024];
        let mut buf = CappedBuffer::new(MAX_UPLOAD_BYTES);
        for _ in 0..(MAX_UPLOAD_BYTES / chunk.len()) {
            buf.push(&chunk).unwrap();
        }
        assert_eq!(buf.len(), MAX_UPLOAD_BYTES);
        assert!(matches!(buf.push(&[0u8]), Err(AppError::PayloadTooLarge)));
    }

    #[test]
    fn test_text_window_bounds() {
        let at_min = "a".repeat(MIN_RESUME_CHARS);
        let at_max = "a".repeat(MAX_RESUME_CHARS);
        assert!(validate_resume_text(&at_min).is_ok());
        assert!(validate_resume_text(&at_max).is_ok());

        match validate_resume_text(&"a".repeat(MIN_RESUME_CHARS - 1)) {
            Err(AppError::InvalidDocument(msg)) => assert!(msg.contains("empty or unreadable")),
            other => panic!("unexpected {other:?}"),
        }
        match validate_resume_text(&"a".repeat(MAX_RESUME_CHARS + 1)) {
            Err(AppError::InvalidDocument(msg)) => assert!(msg.contains("too long")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_text_window_uses_trimmed_length() {
        let padded = format!("   {}\n\n\n", "a".repeat(MIN_RESUME_CHARS - 1));
        assert!(validate_resume_text(&padded).is_err());
    }

    #[test]
    fn test_text_window_counts_chars_not_bytes() {
        // 100 two-byte characters: 200 bytes, 100 chars.
        let text = "é".repeat(MIN_RESUME_CHARS);
        assert_eq!(validate_resume_text(&text).unwrap().chars().count(), 100);
    }

    #[test]
    fn test_too_long_names_field_and_limit() {
        match too_long("company", MAX_SHORT_FIELD_BYTES) {
            AppError::Validation(msg) => {
                assert!(msg.contains("company"));
                assert!(msg.contains("4096"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_required_text_rejects_blank() {
        assert!(required_text(Some("  ".into()), "company").is_err());
        assert!(required_text(None, "company").is_err());
        assert_eq!(
            required_text(Some(" Acme ".into()), "company").unwrap(),
            "Acme"
        );
    }
}
