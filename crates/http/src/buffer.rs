/// A growable input buffer with a front cursor.
///
/// Consumed bytes are skipped with [`Buffer::ignore_front`] rather than
/// copied out, so the unparsed tail of a read (a pipelined follow-on
/// request, for example) survives until the next parse attempt.
#[derive(Debug, Default)]
pub struct Buffer(usize, Vec<u8>);

impl From<Vec<u8>> for Buffer {
    fn from(value: Vec<u8>) -> Self {
        Self(0, value)
    }
}

impl std::ops::Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.1[self.0..]
    }
}

impl std::ops::DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.1[self.0..]
    }
}

impl Buffer {
    /// constructs an empty buffer that can hold `capacity` bytes
    /// before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self(0, Vec::with_capacity(capacity))
    }

    /// retains only the first `n` valid bytes
    pub fn truncate(&mut self, n: usize) {
        if n == 0 {
            self.0 = 0;
            self.1.truncate(0);
        } else {
            self.1.truncate(self.0 + n);
        }
    }

    /// advances the front cursor past `n` consumed bytes
    pub fn ignore_front(&mut self, n: usize) {
        self.0 += n;
        if self.0 >= self.1.len() {
            self.1.truncate(0);
            self.0 = 0;
        }
    }

    /// the number of valid bytes
    pub fn len(&self) -> usize {
        self.1.len() - self.0
    }

    /// predicate for no valid bytes
    pub fn is_empty(&self) -> bool {
        self.1.len() == self.0
    }

    /// Extends the addressable region so a read can append up to
    /// `read_len` further bytes. Call [`Buffer::truncate`] with the
    /// valid length after the read returns.
    pub fn expand(&mut self, read_len: usize) {
        if self.1.capacity() - self.1.len() < read_len {
            self.1.reserve(read_len);
        }
        self.1.resize(self.1.capacity(), 0);
    }
}
