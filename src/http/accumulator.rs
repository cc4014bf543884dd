//! Per-connection request buffering.
//!
//! Chunks are appended in arrival order until the request is complete:
//! either the declared Content-Length worth of body has arrived, the peer
//! closed its side, or the head ended without declaring a body on a
//! connection that stays open for another request.

use bytes::{Bytes, BytesMut};

use crate::http::parser::{body_runs_to_end, declared_content_length, find_head_end};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// Head plus declared body add up to this many bytes.
    Length(usize),
    /// No length declared on a request the peer keeps open; it ends with its head.
    HeadOnly,
    /// No length declared on a closing request; the body is whatever
    /// arrives before end of stream.
    UntilEnd,
    /// The head is unusable; hand it to the parser to report why.
    Invalid,
}

#[derive(Debug, Default)]
pub struct Accumulator {
    buf: BytesMut,
    head_end: Option<usize>,
    framing: Option<Framing>,
    ended: bool,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(4096),
            ..Default::default()
        }
    }

    /// Starts from bytes left over by the previous request on the connection.
    pub fn with_leftover(leftover: BytesMut) -> Self {
        let mut acc = Self::new();
        if !leftover.is_empty() {
            acc.on_chunk(&leftover);
        }
        acc
    }

    pub fn on_chunk(&mut self, chunk: &[u8]) {
        if self.ended {
            return;
        }

        let scanned = self.buf.len();
        self.buf.extend_from_slice(chunk);

        if self.head_end.is_none() {
            // The terminator may straddle the previous chunk boundary.
            let from = scanned.saturating_sub(3);
            if let Some(end) = find_head_end(&self.buf[from..]) {
                let head_end = from + end;
                self.head_end = Some(head_end);
                self.framing = Some(frame(&self.buf[..head_end]));
            }
        }
    }

    /// Marks the end of the byte stream.
    pub fn on_end(&mut self) {
        self.ended = true;
    }

    pub fn is_complete(&self) -> bool {
        if self.ended {
            return true;
        }

        match (self.framing, self.head_end) {
            (Some(Framing::Length(total)), _) => self.buf.len() >= total,
            (Some(Framing::HeadOnly | Framing::Invalid), _) => true,
            _ => false,
        }
    }

    /// Size of head plus declared body, once the head has been seen.
    pub fn declared_total(&self) -> Option<usize> {
        match self.framing {
            Some(Framing::Length(total)) => Some(total),
            _ => None,
        }
    }

    /// True once the head is in and the body can only end with the stream.
    pub fn awaits_end(&self) -> bool {
        !self.ended && self.framing == Some(Framing::UntilEnd)
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Total bytes buffered so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Splits the buffer into the bytes of this request and any surplus that
    /// arrived after it.
    pub fn finish(mut self) -> (Bytes, BytesMut) {
        let cut = match (self.framing, self.head_end) {
            (Some(Framing::Length(total)), _) => total.min(self.buf.len()),
            (Some(Framing::HeadOnly), Some(head_end)) => head_end,
            _ => self.buf.len(),
        };

        let request = self.buf.split_to(cut).freeze();
        (request, self.buf)
    }
}

fn frame(head: &[u8]) -> Framing {
    match declared_content_length(head) {
        // A length that cannot be added to the head is never satisfiable.
        Ok(Some(len)) => head.len().checked_add(len).map_or(Framing::Invalid, Framing::Length),
        Ok(None) if body_runs_to_end(head) => Framing::UntilEnd,
        Ok(None) => Framing::HeadOnly,
        Err(_) => Framing::Invalid,
    }
}
