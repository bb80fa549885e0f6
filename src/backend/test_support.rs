// Deterministic stand-ins for system services in unit tests.

use crate::error::RedeemError;
use crate::models::{CodeRecord, TimestampNs};
use crate::storage::codes as code_storage;
use crate::utils::runtime::Runtime;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

static NEXT_CODE: AtomicU64 = AtomicU64::new(1);

pub fn issue_test_code(id: &str) {
    code_storage::insert_code(CodeRecord::new(id.to_string(), 1)).expect("test code insert");
}

/// Completes on the second poll, letting other joined futures run first.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub struct FakeRuntime {
    now: Cell<TimestampNs>,
    seed: u8,
    counter: Cell<u32>,
    scripted: RefCell<VecDeque<Vec<u8>>>,
    yielding: bool,
    randomness: bool,
}

impl FakeRuntime {
    pub fn new(now: TimestampNs) -> Self {
        Self::seeded(now, 0)
    }

    pub fn seeded(now: TimestampNs, seed: u8) -> Self {
        Self {
            now: Cell::new(now),
            seed,
            counter: Cell::new(0),
            scripted: RefCell::new(VecDeque::new()),
            yielding: false,
            randomness: true,
        }
    }

    /// Suspends once inside every `random_bytes` call, like an inter-canister call.
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    pub fn without_randomness(mut self) -> Self {
        self.randomness = false;
        self
    }

    /// Byte strings returned, in order, before falling back to counter bytes.
    pub fn with_scripted_bytes(self, bytes: Vec<Vec<u8>>) -> Self {
        self.scripted.borrow_mut().extend(bytes);
        self
    }

    pub fn advance(&self, delta: TimestampNs) {
        self.now.set(self.now.get() + delta);
    }

    pub fn fresh_code_id(&self) -> String {
        format!("T{:08}", NEXT_CODE.fetch_add(1, Ordering::Relaxed))
    }

    fn next_bytes(&self, num_bytes: usize) -> Vec<u8> {
        if let Some(bytes) = self.scripted.borrow_mut().pop_front() {
            return bytes;
        }
        let n = self.counter.get() + 1;
        self.counter.set(n);
        let mut bytes = vec![0u8; num_bytes];
        if let Some(first) = bytes.first_mut() {
            *first = self.seed;
        }
        for (slot, b) in bytes.iter_mut().skip(1).rev().zip(n.to_le_bytes()) {
            *slot = b;
        }
        bytes
    }
}

impl Runtime for FakeRuntime {
    fn now_ns(&self) -> TimestampNs {
        self.now.get()
    }

    async fn random_bytes(&self, num_bytes: usize) -> Result<Vec<u8>, RedeemError> {
        if self.yielding {
            YieldOnce(false).await;
        }
        if !self.randomness {
            return Err(RedeemError::RandomnessUnavailable("raw_rand rejected".to_string()));
        }
        Ok(self.next_bytes(num_bytes))
    }
}
