//! A bounded pool of reusable request body buffers.
//!
//! Buffers are handed out as [`PooledBuffer`] guards that return themselves to the pool on drop,
//! so every exit path of a request gives its buffer back. Both acquire and release are lock-free.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crossbeam_queue::ArrayQueue;

pub struct BufferPool {
    buffers: ArrayQueue<Vec<u8>>,
    buffer_capacity: usize,
}

impl BufferPool {
    /// Creates a pool keeping up to `pool_size` idle buffers. Fresh buffers are allocated with
    /// `buffer_capacity` bytes.
    pub fn new(pool_size: usize, buffer_capacity: usize) -> Self {
        BufferPool {
            buffers: ArrayQueue::new(pool_size.max(1)),
            buffer_capacity,
        }
    }

    /// Takes an idle buffer, or allocates one if the pool is empty. The buffer is empty.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buffer = self
            .buffers
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.buffer_capacity));

        PooledBuffer { pool: self, buffer }
    }

    /// Number of idle buffers.
    pub fn available(&self) -> usize {
        self.buffers.len()
    }

    fn release(&self, mut buffer: Vec<u8>) {
        buffer.clear();
        // A full pool drops the buffer.
        let _ = self.buffers.push(buffer);
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("available", &self.buffers.len())
            .field("capacity", &self.buffers.capacity())
            .field("buffer_capacity", &self.buffer_capacity)
            .finish()
    }
}

/// A buffer borrowed from a [`BufferPool`].
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buffer));
    }
}
