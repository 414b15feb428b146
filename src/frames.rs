//! Lookahead window of precomputed future frames.
//!
//! The buffer is either empty (after [`FrameBuffer::invalidate`]) or holds
//! `depth` consecutive frames, oldest first. Whoever owns the live state is
//! responsible for refilling an empty buffer before reading from it.
//!
//! When the newest frame cannot be stepped without leaving the finite range
//! the buffer is stalled: it stops growing and `advance` drains the frames it
//! already has, so every valid frame still becomes current.

use crate::{
    body::Frame,
    error::{SimError, SimResult},
    integrator::step_frame,
};
use std::{collections::VecDeque, num::NonZeroUsize};

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    frames: VecDeque<Frame>,
    depth: NonZeroUsize,
    stalled: bool,
}

impl FrameBuffer {
    pub fn new(depth: NonZeroUsize) -> Self {
        Self {
            frames: VecDeque::with_capacity(depth.get()),
            depth,
            stalled: false,
        }
    }

    pub fn depth(&self) -> NonZeroUsize {
        self.depth
    }

    /// Changes the window size. The buffered frames no longer match, so the
    /// buffer is cleared.
    pub fn set_depth(&mut self, depth: NonZeroUsize) {
        self.depth = depth;
        self.invalidate();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True when the newest frame cannot be stepped any further.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Replaces the contents with up to `depth` frames following `initial`.
    ///
    /// A failed step ends the window early and stalls the buffer. It is an
    /// error only when not even the first frame after `initial` exists, and
    /// the buffer is then left empty.
    pub fn fill(&mut self, initial: &Frame, gravity: f64) -> SimResult<()> {
        self.invalidate();
        self.frames.reserve(self.depth.get());
        let mut previous = step_frame(initial, gravity)?;
        for _ in 1..self.depth.get() {
            match step_frame(&previous, gravity) {
                Ok(next) => self.frames.push_back(std::mem::replace(&mut previous, next)),
                Err(_) => {
                    self.stalled = true;
                    break;
                }
            }
        }
        self.frames.push_back(previous);
        Ok(())
    }

    /// Computes one frame past the newest, pushes it, and pops the oldest.
    ///
    /// A stalled buffer only pops, shrinking by one per call.
    pub fn advance(&mut self, gravity: f64) -> SimResult<Frame> {
        let newest = self.frames.back().ok_or(SimError::EmptyFrameBuffer)?;
        if !self.stalled {
            match step_frame(newest, gravity) {
                Ok(next) => self.frames.push_back(next),
                Err(_) => self.stalled = true,
            }
        }
        self.frames.pop_front().ok_or(SimError::EmptyFrameBuffer)
    }

    pub fn invalidate(&mut self) {
        self.frames.clear();
        self.stalled = false;
    }

    pub fn front(&self) -> Option<&Frame> {
        self.frames.front()
    }

    pub fn back(&self) -> Option<&Frame> {
        self.frames.back()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Frame> {
        self.frames.iter()
    }
}
