use std::fmt::{self, Debug, Formatter};
use BodyKind::{Chunked, Empty, Fixed};

/// A chunk producer: returns the next chunk of body bytes, or `None`
/// once the body is complete.
pub type ChunkFn = Box<dyn FnMut() -> Option<Vec<u8>> + Send + Sync + 'static>;

/// The plover representation of an http body.
///
/// A body is exactly one of: empty, fixed content of known length, or
/// a chunk-producing function whose total length is unknown until it
/// reports completion. Fixed and chunked bodies have disjoint
/// operations; calling one on the other is a programming error and
/// panics, per the message contract.
#[derive(Default)]
pub struct Body(BodyKind);

#[derive(Default)]
enum BodyKind {
    #[default]
    Empty,

    Fixed {
        content: Vec<u8>,
    },

    Chunked {
        produce: ChunkFn,
        done: bool,
    },
}

impl Body {
    /// constructs a zero-length body
    pub fn empty() -> Self {
        Self(Empty)
    }

    /// constructs a fixed body from bytes already in memory
    pub fn fixed(content: impl Into<Vec<u8>>) -> Self {
        Self(Fixed {
            content: content.into(),
        })
    }

    /// Constructs a chunked body from a producer function.
    ///
    /// The producer is pulled once per chunk; returning `None` marks
    /// the body complete. A producer is never pulled again after it
    /// has returned `None`.
    pub fn from_chunk_fn(
        produce: impl FnMut() -> Option<Vec<u8>> + Send + Sync + 'static,
    ) -> Self {
        Self(Chunked {
            produce: Box::new(produce),
            done: false,
        })
    }

    /// predicate for a chunked body
    pub fn is_chunked(&self) -> bool {
        matches!(self.0, Chunked { .. })
    }

    /// determine if this body represents no data
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Empty => true,
            Fixed { content } => content.is_empty(),
            Chunked { .. } => false,
        }
    }

    /// the content length of this body, if known
    pub fn len(&self) -> Option<u64> {
        match &self.0 {
            Empty => Some(0),
            Fixed { content } => Some(content.len() as u64),
            Chunked { .. } => None,
        }
    }

    /// # Borrows the fixed content of this body
    ///
    /// An empty body yields an empty slice.
    ///
    /// # Panics
    ///
    /// Panics if this body is chunked; drain it first with
    /// [`Body::gather`].
    pub fn bytes(&self) -> &[u8] {
        match &self.0 {
            Empty => b"",
            Fixed { content } => content,
            Chunked { .. } => panic!("bytes() called on a chunked body"),
        }
    }

    /// # Pulls the next chunk from a chunked body
    ///
    /// Returns `None` once the producer reports completion, and on
    /// every call thereafter.
    ///
    /// # Panics
    ///
    /// Panics if this body is not chunked.
    pub fn read_chunk(&mut self) -> Option<Vec<u8>> {
        match &mut self.0 {
            Chunked { done: true, .. } => None,
            Chunked { produce, done } => {
                let chunk = produce();
                if chunk.is_none() {
                    *done = true;
                }
                chunk
            }
            _ => panic!("read_chunk() called on a body that is not chunked"),
        }
    }

    /// Drains a chunked body into fixed content in place, then borrows
    /// it. Fixed and empty bodies are returned as-is, so this is
    /// idempotent.
    pub fn gather(&mut self) -> &[u8] {
        if let Chunked { .. } = self.0 {
            let mut content = Vec::new();
            while let Some(chunk) = self.read_chunk() {
                content.extend_from_slice(&chunk);
            }
            self.0 = Fixed { content };
        }
        self.bytes()
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Empty => f.debug_tuple("Body::Empty").finish(),
            Fixed { content } => f
                .debug_struct("Body::Fixed")
                .field("content", &String::from_utf8_lossy(content))
                .finish(),
            Chunked { done, .. } => f
                .debug_struct("Body::Chunked")
                .field("produce", &"..")
                .field("done", done)
                .finish(),
        }
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Self::fixed(s.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Self::fixed(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Body {
    fn from(content: Vec<u8>) -> Self {
        Self::fixed(content)
    }
}
