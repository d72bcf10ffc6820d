//! `multipart/related` bodies for Drive media uploads.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// A metadata + media body with its boundary.
pub(crate) struct RelatedBody {
    boundary: String,
    body: Bytes,
}

impl RelatedBody {
    /// Build a body from a JSON metadata part and a media part.
    pub(crate) fn new(metadata: &[u8], media_type: &str, media: &[u8]) -> Self {
        let boundary = format!("lessondrive-{}", Uuid::new_v4().simple());
        let mut body = BytesMut::with_capacity(metadata.len() + media.len() + 256);

        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.put_slice(metadata);
        body.put_slice(format!("\r\n--{boundary}\r\n").as_bytes());
        body.put_slice(format!("Content-Type: {media_type}\r\n\r\n").as_bytes());
        body.put_slice(media);
        body.put_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Self {
            boundary,
            body: body.freeze(),
        }
    }

    /// Value for the `Content-Type` header.
    pub(crate) fn content_type(&self) -> String {
        format!("multipart/related; boundary={}", self.boundary)
    }

    /// The encoded body.
    pub(crate) fn into_body(self) -> Bytes {
        self.body
    }
}
