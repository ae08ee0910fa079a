//! Fixed-capacity circular byte buffer
//!
//! A single-producer/single-consumer byte ring shared between an interrupt
//! handler and the foreground loop. One side only ever enqueues, the other
//! only ever dequeues:
//!
//! - The write index is owned by the producer, the read index by the
//!   consumer. Each is written by exactly one side.
//! - The occupancy count is the only field both sides modify. It is updated
//!   with an atomic read-modify-write, which on cores without native RMW
//!   instructions (Cortex-M0+) is a short masked-interrupt critical section.
//! - "Full" is `len() == N`. It is derived from the count rather than stored,
//!   so no second field is written from both sides.
//!
//! The capacity must be a power of two; indices wrap with a bit mask.

use portable_atomic::{AtomicU8, AtomicUsize, Ordering};

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: AtomicU8 = AtomicU8::new(0);

/// Circular byte buffer with capacity `N`
pub struct CircularBuffer<const N: usize> {
    slots: [AtomicU8; N],
    /// Next slot to write (producer-owned)
    write_index: AtomicUsize,
    /// Next slot to read (consumer-owned)
    read_index: AtomicUsize,
    /// Occupied slots (shared)
    len: AtomicUsize,
}

impl<const N: usize> Default for CircularBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CircularBuffer<N> {
    const VALID_CAPACITY: () = assert!(
        N > 0 && N.is_power_of_two(),
        "CircularBuffer capacity must be a non-zero power of two"
    );

    const MASK: usize = N - 1;

    /// Create an empty buffer
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        Self {
            slots: [EMPTY_SLOT; N],
            write_index: AtomicUsize::new(0),
            read_index: AtomicUsize::new(0),
            len: AtomicUsize::new(0),
        }
    }

    /// Reset to the empty state, clearing stored bytes
    pub fn init(&mut self) {
        for slot in &self.slots {
            slot.store(0, Ordering::Relaxed);
        }
        self.write_index.store(0, Ordering::Relaxed);
        self.read_index.store(0, Ordering::Relaxed);
        self.len.store(0, Ordering::Release);
    }

    /// Enqueue as many bytes as fit
    ///
    /// Stops at the first byte that does not fit and returns the number of
    /// bytes accepted. Never overwrites unread data.
    pub fn enqueue(&mut self, bytes: &[u8]) -> usize {
        self.enqueue_shared(bytes)
    }

    /// Dequeue up to `out.len()` bytes into `out`
    ///
    /// Returns the number of bytes written to `out`.
    pub fn dequeue(&mut self, out: &mut [u8]) -> usize {
        self.dequeue_shared(out)
    }

    /// Split into producer and consumer halves
    ///
    /// The halves can be handed to different execution contexts (interrupt
    /// handler and foreground). They borrow the buffer, so no third party can
    /// touch it while they exist.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let buffer: &Self = self;
        (Producer { buffer }, Consumer { buffer })
    }

    /// Number of bytes waiting to be dequeued
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Check if no bytes are waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Total number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of bytes that can be enqueued right now
    pub fn free(&self) -> usize {
        N - self.len()
    }

    fn push(&self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }

        let write = self.write_index.load(Ordering::Relaxed);
        self.slots[write].store(byte, Ordering::Relaxed);
        self.write_index
            .store((write + 1) & Self::MASK, Ordering::Relaxed);
        // Publishes the slot to the consumer
        self.len.fetch_add(1, Ordering::AcqRel);
        true
    }

    fn pop(&self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }

        let read = self.read_index.load(Ordering::Relaxed);
        let byte = self.slots[read].load(Ordering::Relaxed);
        self.read_index.store((read + 1) & Self::MASK, Ordering::Relaxed);
        // Hands the slot back to the producer
        self.len.fetch_sub(1, Ordering::AcqRel);
        Some(byte)
    }

    fn enqueue_shared(&self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if !self.push(byte) {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    fn dequeue_shared(&self, out: &mut [u8]) -> usize {
        let mut copied = 0;
        for slot in out.iter_mut() {
            match self.pop() {
                Some(byte) => *slot = byte,
                None => break,
            }
            copied += 1;
        }
        copied
    }
}

/// Enqueue half of a split [`CircularBuffer`]
pub struct Producer<'a, const N: usize> {
    buffer: &'a CircularBuffer<N>,
}

impl<'a, const N: usize> Producer<'a, N> {
    /// Enqueue as many bytes as fit, returning the number accepted
    pub fn enqueue(&mut self, bytes: &[u8]) -> usize {
        self.buffer.enqueue_shared(bytes)
    }

    /// Enqueue a single byte, returning `false` if the buffer is full
    pub fn enqueue_byte(&mut self, byte: u8) -> bool {
        self.buffer.push(byte)
    }

    /// Number of bytes waiting in the buffer
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no bytes are waiting
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.buffer.is_full()
    }

    /// Number of bytes that can be enqueued right now
    pub fn free(&self) -> usize {
        self.buffer.free()
    }
}

/// Dequeue half of a split [`CircularBuffer`]
pub struct Consumer<'a, const N: usize> {
    buffer: &'a CircularBuffer<N>,
}

impl<'a, const N: usize> Consumer<'a, N> {
    /// Dequeue up to `out.len()` bytes, returning the number copied
    pub fn dequeue(&mut self, out: &mut [u8]) -> usize {
        self.buffer.dequeue_shared(out)
    }

    /// Dequeue a single byte
    pub fn dequeue_byte(&mut self) -> Option<u8> {
        self.buffer.pop()
    }

    /// Number of bytes waiting in the buffer
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no bytes are waiting
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.buffer.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    const C: usize = 256;

    fn indices<const N: usize>(cb: &CircularBuffer<N>) -> (usize, usize) {
        (
            cb.write_index.load(Ordering::Relaxed),
            cb.read_index.load(Ordering::Relaxed),
        )
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let cb = CircularBuffer::<C>::new();
        assert!(cb.is_empty());
        assert!(!cb.is_full());
        assert_eq!(cb.len(), 0);
        assert_eq!(cb.capacity(), C);
        assert_eq!(cb.free(), C);
        assert_eq!(indices(&cb), (0, 0));
    }

    #[test]
    fn test_init_resets_state() {
        let mut cb = CircularBuffer::<C>::new();
        assert_eq!(cb.enqueue(&[b'x'; C]), C);
        let mut out = [0u8; 10];
        cb.dequeue(&mut out);

        cb.init();
        assert!(cb.is_empty());
        assert!(!cb.is_full());
        assert_eq!(indices(&cb), (0, 0));
        assert!(cb.slots.iter().all(|s| s.load(Ordering::Relaxed) == 0));
    }

    #[test]
    fn test_fill_then_dequeue_one() {
        let mut cb = CircularBuffer::<C>::new();
        assert_eq!(cb.enqueue(&[b'x'; C]), C);
        assert_eq!(cb.len(), C);
        assert!(cb.is_full());

        let mut one = [0u8; 1];
        assert_eq!(cb.dequeue(&mut one), 1);
        assert_eq!(one[0], b'x');
        assert!(!cb.is_full());
        assert_eq!(cb.len(), C - 1);
    }

    #[test]
    fn test_fifo_order() {
        let mut cb = CircularBuffer::<C>::new();
        let input = b"The quick brown fox";
        assert_eq!(cb.enqueue(input), input.len());

        let mut out = [0u8; 19];
        assert_eq!(cb.dequeue(&mut out), input.len());
        assert_eq!(&out, input);
        assert!(cb.is_empty());
    }

    #[test]
    fn test_overflow_accepts_capacity_only() {
        let mut cb = CircularBuffer::<C>::new();
        let input: Vec<u8> = (0..=C).map(|i| i as u8).collect();
        assert_eq!(input.len(), C + 1);

        assert_eq!(cb.enqueue(&input), C);
        assert!(cb.is_full());

        // A further enqueue is refused outright
        assert_eq!(cb.enqueue(&[0xEE]), 0);

        let mut out = [0u8; C + 1];
        assert_eq!(cb.dequeue(&mut out), C);
        assert_eq!(&out[..C], &input[..C]);
        assert!(cb.is_empty());
    }

    #[test]
    fn test_underflow_returns_zero() {
        let mut cb = CircularBuffer::<C>::new();
        cb.enqueue(b"ab");
        let mut out = [0u8; 2];
        cb.dequeue(&mut out);
        let before = indices(&cb);

        let mut more = [0u8; 4];
        assert_eq!(cb.dequeue(&mut more), 0);
        assert_eq!(indices(&cb), before);
        assert_eq!(cb.len(), 0);
    }

    #[test]
    fn test_empty_slices_process_nothing() {
        let mut cb = CircularBuffer::<C>::new();
        assert_eq!(cb.enqueue(&[]), 0);
        cb.enqueue(b"z");
        assert_eq!(cb.dequeue(&mut []), 0);
        assert_eq!(cb.len(), 1);
    }

    #[test]
    fn test_wraparound_reuses_freed_region() {
        let mut cb = CircularBuffer::<C>::new();
        let mut half = [0u8; C / 2];
        assert_eq!(cb.enqueue(&[0x55; C / 2]), C / 2);
        assert_eq!(cb.dequeue(&mut half), C / 2);

        let input: Vec<u8> = (0..C).map(|i| (i * 7) as u8).collect();
        assert_eq!(cb.enqueue(&input), C);
        assert!(cb.is_full());
        // Write index wrapped back onto the read index
        let (write, read) = indices(&cb);
        assert_eq!(write, read);

        let mut out = [0u8; C];
        assert_eq!(cb.dequeue(&mut out), C);
        assert_eq!(&out[..], &input[..]);
    }

    #[test]
    fn test_queries_are_idempotent() {
        let mut cb = CircularBuffer::<8>::new();
        cb.enqueue(b"abc");
        for _ in 0..5 {
            assert_eq!(cb.len(), 3);
            assert!(!cb.is_empty());
            assert!(!cb.is_full());
        }
    }

    #[test]
    fn test_split_halves_share_state() {
        let mut cb = CircularBuffer::<8>::new();
        let (mut producer, mut consumer) = cb.split();

        assert!(producer.enqueue_byte(1));
        assert_eq!(producer.enqueue(&[2, 3]), 2);
        assert_eq!(consumer.len(), 3);
        assert_eq!(producer.free(), 5);

        assert_eq!(consumer.dequeue_byte(), Some(1));
        let mut out = [0u8; 4];
        assert_eq!(consumer.dequeue(&mut out), 2);
        assert_eq!(&out[..2], &[2, 3]);
        assert!(producer.is_empty());
        assert_eq!(consumer.dequeue_byte(), None);
    }

    #[test]
    fn test_threads_move_every_byte_in_order() {
        const TOTAL: usize = 20_000;
        let mut cb = CircularBuffer::<16>::new();
        let (mut producer, mut consumer) = cb.split();

        let received = std::thread::scope(|s| {
            s.spawn(move || {
                let mut next = 0usize;
                while next < TOTAL {
                    if producer.enqueue_byte((next % 251) as u8) {
                        next += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });

            let mut received = Vec::with_capacity(TOTAL);
            while received.len() < TOTAL {
                assert!(consumer.len() <= 16);
                match consumer.dequeue_byte() {
                    Some(byte) => received.push(byte),
                    None => std::hint::spin_loop(),
                }
            }
            received
        });

        let expected: Vec<u8> = (0..TOTAL).map(|i| (i % 251) as u8).collect();
        assert_eq!(received, expected);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Enqueue(Vec<u8>),
        Dequeue(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            proptest::collection::vec(any::<u8>(), 0..40).prop_map(Op::Enqueue),
            (0usize..40).prop_map(Op::Dequeue),
        ]
    }

    proptest! {
        #[test]
        fn prop_length_tracks_accepted_minus_removed(ops in proptest::collection::vec(op_strategy(), 0..64)) {
            let mut cb = CircularBuffer::<32>::new();
            let mut model: VecDeque<u8> = VecDeque::new();
            let mut enqueued = 0usize;
            let mut dequeued = 0usize;

            for op in ops {
                match op {
                    Op::Enqueue(bytes) => {
                        let accepted = cb.enqueue(&bytes);
                        prop_assert_eq!(accepted, bytes.len().min(32 - model.len()));
                        model.extend(&bytes[..accepted]);
                        enqueued += accepted;
                    }
                    Op::Dequeue(max) => {
                        let mut out = std::vec![0u8; max];
                        let copied = cb.dequeue(&mut out);
                        prop_assert_eq!(copied, max.min(model.len()));
                        let expected: Vec<u8> = model.drain(..copied).collect();
                        prop_assert_eq!(&out[..copied], &expected[..]);
                        dequeued += copied;
                    }
                }

                prop_assert_eq!(cb.len(), enqueued - dequeued);
                prop_assert!(cb.len() <= 32);
                prop_assert_eq!(cb.is_full(), cb.len() == 32);
                prop_assert_eq!(cb.is_empty(), cb.len() == 0);
                if !cb.is_full() {
                    let (write, read) = indices(&cb);
                    prop_assert_eq!(cb.len(), write.wrapping_sub(read) & 31);
                }
            }
        }

        #[test]
        fn prop_interleaved_roles_never_lose_or_duplicate(schedule in proptest::collection::vec(any::<bool>(), 0..512)) {
            let mut cb = CircularBuffer::<16>::new();
            let (mut producer, mut consumer) = cb.split();
            let mut accepted = 0usize;
            let mut received = Vec::new();

            // true: interrupt-side enqueue of one byte, false: foreground dequeue of one byte
            for step in schedule {
                if step {
                    if producer.enqueue_byte(accepted as u8) {
                        accepted += 1;
                    }
                } else if let Some(byte) = consumer.dequeue_byte() {
                    received.push(byte);
                }
                prop_assert!(producer.len() <= 16);
                prop_assert_eq!(producer.len(), accepted - received.len());
            }
            while let Some(byte) = consumer.dequeue_byte() {
                received.push(byte);
            }

            let expected: Vec<u8> = (0..accepted).map(|i| i as u8).collect();
            prop_assert_eq!(received, expected);
        }
    }
}
