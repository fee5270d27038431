//! POST /api/upload - multipart acknowledgment.
//!
//! The `file` part is streamed, counted and optionally spooled to a
//! temporary file that is removed once the request completes. Only its
//! metadata is reported back.

use crate::config::UploadConfig;
use crate::error::SimulatorError;
use crate::types::{json_response, BoxError, HttpResponse, Message};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::header::CONTENT_TYPE;
use hyper::{Request, StatusCode};
use multer::Multipart;
use serde::Serialize;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub const FILE_FIELD: &str = "file";

/// Reported when a file part carries no Content-Type
pub const DEFAULT_MIMETYPE: &str = "text/plain";

/// Metadata of a received file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub original_name: String,
    pub size: u64,
    pub mimetype: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadAck {
    message: &'static str,
    file_info: UploadedFile,
}

pub async fn handle_upload<B>(req: Request<B>, config: &UploadConfig) -> HttpResponse
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError> + 'static,
{
    match receive_file(req, config).await {
        Ok(Some(file)) => {
            debug!(
                "Received upload '{}' ({} bytes, {})",
                file.original_name, file.size, file.mimetype
            );
            json_response(
                StatusCode::OK,
                &UploadAck {
                    message: "File uploaded successfully",
                    file_info: file,
                },
            )
        }
        Ok(None) => json_response(StatusCode::BAD_REQUEST, &Message::new("No file uploaded")),
        Err(e) => {
            warn!("Upload rejected: {}", e);
            e.into_response()
        }
    }
}

/// Decode the multipart body and return the `file` part's metadata, if any.
///
/// Requests that are not `multipart/form-data` carry no file.
pub async fn receive_file<B>(
    req: Request<B>,
    config: &UploadConfig,
) -> Result<Option<UploadedFile>, SimulatorError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError> + 'static,
{
    let boundary = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok());
    let Some(boundary) = boundary else {
        return Ok(None);
    };

    let mut multipart = Multipart::new(req.into_body().into_data_stream(), boundary);
    let mut received: Option<UploadedFile> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(SimulatorError::Multipart)?
    {
        // parts without a filename are plain form fields; an empty
        // filename is a file input left blank
        let Some(original_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };
        let name = field.name().unwrap_or_default().to_owned();
        if name != FILE_FIELD || received.is_some() {
            return Err(SimulatorError::UnexpectedField(name));
        }

        let mimetype = field
            .content_type()
            .map(|mime| mime.essence_str().to_owned())
            .unwrap_or_else(|| DEFAULT_MIMETYPE.to_owned());

        let mut spool = if config.spool {
            Some(Spool::create(config)?)
        } else {
            None
        };

        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await.map_err(SimulatorError::Multipart)? {
            size += chunk.len() as u64;
            if config.max_file_bytes.is_some_and(|limit| size > limit) {
                return Err(SimulatorError::FileTooLarge);
            }
            if let Some(spool) = spool.as_mut() {
                spool.write(&chunk).await?;
            }
        }

        if let Some(spool) = spool {
            spool.finish().await?;
        }

        received = Some(UploadedFile {
            original_name,
            size,
            mimetype,
        });
    }

    Ok(received)
}

/// Temporary on-disk copy of an upload, deleted on drop.
struct Spool {
    file: tokio::fs::File,
    guard: NamedTempFile,
}

impl Spool {
    fn create(config: &UploadConfig) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("upload-");
        let guard = match config.spool_dir {
            Some(ref dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let file = tokio::fs::File::from_std(guard.as_file().try_clone()?);
        Ok(Self { file, guard })
    }

    async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk).await
    }

    async fn finish(mut self) -> std::io::Result<()> {
        self.file.flush().await?;
        debug!("Spooled upload to {}", self.guard.path().display());
        Ok(())
    }
}
