//! Fixed-capacity sliding window over the newest audio samples.
//!
//! The spectrum analyser always works on the most recent `capacity` samples
//! the microphone delivered.  When the window is full, incoming samples
//! overwrite the oldest data, so [`SampleWindow::snapshot`] is always the
//! tail of the stream in chronological order.

// ---------------------------------------------------------------------------
// SampleWindow
// ---------------------------------------------------------------------------

/// Overwrite-oldest window of `f32` samples feeding the FFT.
///
/// Unlike a drain-style ring buffer, taking a snapshot does not consume the
/// contents — the analyser re-reads the same window on every poll and only
/// the incoming stream advances it.
pub struct SampleWindow {
    buf: Vec<f32>,
    capacity: usize,
    /// Index of the *next* write position (wraps around `capacity`).
    write_pos: usize,
    /// Number of valid samples currently stored (≤ `capacity`).
    len: usize,
}

impl SampleWindow {
    /// Create a window holding the last `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "SampleWindow capacity must be > 0");
        Self {
            buf: vec![0.0; capacity],
            capacity,
            write_pos: 0,
            len: 0,
        }
    }

    /// Append `data`, overwriting the oldest samples on overflow.
    pub fn push_slice(&mut self, data: &[f32]) {
        for &sample in data {
            self.buf[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % self.capacity;
            if self.len < self.capacity {
                self.len += 1;
            }
        }
    }

    /// Copy the stored samples in chronological order, oldest first.
    ///
    /// The window is left untouched; repeated snapshots between pushes
    /// return identical data.
    pub fn snapshot(&self) -> Vec<f32> {
        if self.len == 0 {
            return Vec::new();
        }

        // Until the first wrap-around, valid data starts at index 0.  Once
        // full, the oldest sample sits at `write_pos`.
        let read_pos = if self.len < self.capacity {
            0
        } else {
            self.write_pos
        };

        let mut result = Vec::with_capacity(self.len);
        for i in 0..self.len {
            result.push(self.buf[(read_pos + i) % self.capacity]);
        }
        result
    }

    /// Discard all samples and reset the write position.
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Number of valid samples currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the window contains no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of samples the window can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
