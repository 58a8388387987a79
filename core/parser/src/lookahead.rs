//! FILENAME: core/parser/src/lookahead.rs
//! PURPOSE: Generic lookahead buffer over a one-directional item producer.
//! CONTEXT: Used twice in the pipeline. Below the lexer it buffers positioned
//! characters, above it it buffers tokens for the parser. Items are pulled
//! lazily and only as far as the deepest peek requires.

use std::collections::VecDeque;

/// A source of items that can only move forward.
pub trait Producer {
    type Item: Clone;
    type Error;

    /// Pulls the next item. `Ok(None)` signals exhaustion.
    fn fetch(&mut self) -> Result<Option<Self::Item>, Self::Error>;

    /// The sentinel returned for every peek past the last item.
    fn end_of_input(&self) -> Self::Item;
}

/// Buffers items from a `Producer` so callers can look `k` items ahead
/// before consuming. Single pass: a consumed item is gone for good.
pub struct Lookahead<P: Producer> {
    producer: P,
    buffer: VecDeque<P::Item>,
    end_reached: bool,
    end: Option<P::Item>,
}

impl<P: Producer> Lookahead<P> {
    pub fn new(producer: P) -> Self {
        Lookahead {
            producer,
            buffer: VecDeque::new(),
            end_reached: false,
            end: None,
        }
    }

    /// Item at offset 0.
    pub fn current(&mut self) -> Result<&P::Item, P::Error> {
        self.peek(0)
    }

    /// Item at offset 1.
    pub fn next(&mut self) -> Result<&P::Item, P::Error> {
        self.peek(1)
    }

    /// Returns the item `offset` positions ahead of the cursor without
    /// consuming anything. Once the producer is exhausted every offset past
    /// the buffered items yields the same end sentinel, created on first use.
    pub fn peek(&mut self, offset: usize) -> Result<&P::Item, P::Error> {
        while self.buffer.len() <= offset && !self.end_reached {
            self.pull()?;
        }

        if offset < self.buffer.len() {
            return Ok(&self.buffer[offset]);
        }

        let producer = &self.producer;
        Ok(self.end.get_or_insert_with(|| producer.end_of_input()))
    }

    /// Returns the current item and advances by one.
    pub fn consume(&mut self) -> Result<P::Item, P::Error> {
        let item = self.current()?.clone();
        self.consume_n(1)?;
        Ok(item)
    }

    /// Advances by `count` items, stopping silently if the producer runs dry.
    pub fn consume_n(&mut self, count: usize) -> Result<(), P::Error> {
        for _ in 0..count {
            if self.buffer.pop_front().is_some() {
                continue;
            }
            if self.end_reached {
                return Ok(());
            }
            // Nothing buffered: pull one item and drop it immediately.
            self.pull()?;
            self.buffer.pop_front();
        }
        Ok(())
    }

    /// Number of items pulled from the producer but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// True once the producer has signalled exhaustion and nothing is buffered.
    pub fn is_exhausted(&self) -> bool {
        self.end_reached && self.buffer.is_empty()
    }

    pub fn producer(&self) -> &P {
        &self.producer
    }

    fn pull(&mut self) -> Result<(), P::Error> {
        match self.producer.fetch()? {
            Some(item) => self.buffer.push_back(item),
            None => self.end_reached = true,
        }
        Ok(())
    }
}
