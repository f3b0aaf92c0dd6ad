//! Match cursor
//!
//! One cursor lives for the duration of a top-level match. Every template in
//! the tree receives the same `&mut Cursor` and moves it forward on success.
//! The offset only moves backwards through [`Cursor::rollback`] to a
//! [`Checkpoint`] taken earlier on the same cursor.

/// Saved cursor offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl Checkpoint {
    pub fn pos(self) -> usize {
        self.0
    }
}

/// Borrowed input plus a byte offset on a char boundary
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `text`
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Cursor at byte offset `pos`
    ///
    /// Returns `None` when `pos` is past the end or inside a UTF-8 sequence.
    pub fn at(text: &'a str, pos: usize) -> Option<Self> {
        text.is_char_boundary(pos).then_some(Self { text, pos })
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.text.len()
    }

    /// Consume `n` bytes
    ///
    /// Callers advance by the length of a match taken from [`Cursor::rest`],
    /// so the new offset stays on a char boundary.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.text.is_char_boundary(self.pos + n));
        self.pos += n;
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.0 <= self.pos, "rollback must not move forward");
        self.pos = checkpoint.0;
    }
}
