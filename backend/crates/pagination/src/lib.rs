//! Shared opaque cursor and pagination envelope primitives for backend list
//! endpoints.
//!
//! Cursors encode an offset as URL-safe base64 over a tiny JSON payload so
//! clients treat them as opaque tokens. Endpoints fetch one row beyond the
//! requested limit and let [`Page::from_items`] decide whether a next page
//! exists.

use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Page size applied when the client does not send a limit.
pub const DEFAULT_LIMIT: u32 = 20;
/// Upper bound applied to client-supplied limits.
pub const MAX_LIMIT: u32 = 100;

/// Failures decoding a client-supplied cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The cursor was not valid URL-safe base64.
    #[error("cursor is not valid base64")]
    Encoding,
    /// The decoded cursor payload was malformed.
    #[error("cursor payload is malformed")]
    Payload,
}

#[derive(Debug, Deserialize)]
struct CursorPayload {
    o: u64,
}

/// Opaque continuation token handed to clients between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    offset: u64,
}

impl Cursor {
    /// Build a cursor pointing at an absolute row offset.
    pub const fn new(offset: u64) -> Self {
        Self { offset }
    }

    /// The absolute row offset this cursor points at.
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Encode into the opaque string form handed to clients.
    pub fn encode(&self) -> String {
        // Hand-rolled rather than serde_json::to_vec so encoding is
        // infallible; decoding still goes through serde for strictness.
        let json = format!("{{\"o\":{}}}", self.offset);
        URL_SAFE_NO_PAD.encode(json)
    }
}

impl FromStr for Cursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = URL_SAFE_NO_PAD.decode(s).map_err(|_| CursorError::Encoding)?;
        let payload: CursorPayload =
            serde_json::from_slice(&bytes).map_err(|_| CursorError::Payload)?;
        Ok(Self { offset: payload.o })
    }
}

/// Normalised pagination parameters for one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    /// Build a request from raw client input.
    ///
    /// The limit is clamped to `1..=`[`MAX_LIMIT`] and defaults to
    /// [`DEFAULT_LIMIT`]; the cursor supplies the starting offset.
    pub fn new(limit: Option<u32>, cursor: Option<Cursor>) -> Self {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = cursor.map_or(0, |cursor| cursor.offset());
        Self { limit, offset }
    }

    /// Maximum number of items to return.
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Absolute offset of the first item.
    pub const fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the continuation cursor, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page, at most the requested limit.
    pub items: Vec<T>,
    /// Encoded cursor for the next page; absent on the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A page with no items and no continuation.
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    /// Build a page from items fetched with a limit-plus-one query.
    ///
    /// When more than `request.limit()` items arrive, the overflow row is
    /// dropped and a cursor pointing at the next offset is emitted.
    pub fn from_items(mut items: Vec<T>, request: &PageRequest) -> Self {
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let next_cursor = if items.len() > limit {
            items.truncate(limit);
            Some(Cursor::new(request.offset() + u64::from(request.limit())).encode())
        } else {
            None
        };
        Self { items, next_cursor }
    }

    /// Transform the items while keeping the continuation cursor.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
