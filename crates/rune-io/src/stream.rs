//! Byte streams handed back to the hosting layer.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};
use futures::Stream;
use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncRead;
use tokio_util::io::{ReaderStream, StreamReader};

/// Upper bound on the buffer reserved up front from a declared length.
const MAX_PREALLOCATE: usize = 1 << 20;

/// A readable resource, positioned at its first byte.
pub struct ResourceStream {
    inner: BoxStream<'static, io::Result<Bytes>>,
    content_type: Option<String>,
    content_length: Option<u64>,
    from_cache: bool,
}

impl ResourceStream {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(data: Bytes) -> Self {
        let content_length = Some(data.len() as u64);
        let inner = if data.is_empty() {
            stream::empty().boxed()
        } else {
            stream::once(async move { Ok(data) }).boxed()
        };
        Self {
            inner,
            content_type: None,
            content_length,
            from_cache: false,
        }
    }

    /// Wrap a live HTTP body. The stream keeps `client` alive until it is dropped.
    pub(crate) fn from_response(response: reqwest::Response, client: reqwest::Client) -> Self {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let content_length = response.content_length();

        let inner = response
            .bytes_stream()
            .map(move |chunk| {
                let _client = &client;
                chunk.map_err(io::Error::other)
            })
            .boxed();

        Self {
            inner,
            content_type,
            content_length,
            from_cache: false,
        }
    }

    /// Stream an open file in chunks.
    pub(crate) fn from_file(file: tokio::fs::File, len: Option<u64>) -> Self {
        Self {
            inner: ReaderStream::new(file).boxed(),
            content_type: None,
            content_length: len,
            from_cache: false,
        }
    }

    pub(crate) fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub(crate) fn mark_cached(mut self) -> Self {
        self.from_cache = true;
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Whether the bytes came from the cache rather than the network.
    pub fn is_from_cache(&self) -> bool {
        self.from_cache
    }

    /// Drain the stream into a single buffer.
    pub async fn into_bytes(mut self) -> io::Result<Bytes> {
        // The declared length comes from the server and is only a hint
        let hint = self.content_length.unwrap_or(0).min(MAX_PREALLOCATE as u64) as usize;
        let mut buf = BytesMut::with_capacity(hint);
        while let Some(chunk) = self.inner.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Adapt into an [`AsyncRead`].
    pub fn into_reader(self) -> impl AsyncRead + Send + Unpin {
        StreamReader::new(self)
    }
}

impl Stream for ResourceStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for ResourceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStream")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("from_cache", &self.from_cache)
            .finish_non_exhaustive()
    }
}
