//! Metrics collection for the icnfwd forwarding plane.
//!
//! Lock-free counters and gauges the forwarder and the aging driver update
//! on their hot paths; an aggregate struct groups them per node.

use std::sync::atomic::{AtomicU64, Ordering};

/* ---------------------------------------------------------------- *
 * Simple Counter
 * ---------------------------------------------------------------- */

#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        let c = Counter::new();
        c.value.store(self.value.load(Ordering::Relaxed), Ordering::Relaxed);
        c
    }
}

/* ---------------------------------------------------------------- *
 * Gauge
 * ---------------------------------------------------------------- */

#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Clone for Gauge {
    fn clone(&self) -> Self {
        let g = Gauge::new();
        g.value.store(self.value.load(Ordering::Relaxed), Ordering::Relaxed);
        g
    }
}

/* ---------------------------------------------------------------- *
 * Aggregate metrics for one forwarder
 * ---------------------------------------------------------------- */

#[derive(Debug, Default, Clone)]
pub struct IcnMetrics {
    // Packet processing metrics
    pub interests_received: Counter,
    pub interests_forwarded: Counter,
    pub interests_aggregated: Counter,
    pub data_received: Counter,
    pub data_sent: Counter,
    pub nacks_received: Counter,
    pub nacks_sent: Counter,
    pub unsolicited_dropped: Counter,

    // Cache metrics
    pub cs_hits: Counter,
    pub cs_misses: Counter,
    pub cs_inserts: Counter,
    pub cs_evictions: Counter,
    pub cs_size: Gauge,

    // PIT metrics
    pub pit_inserts: Counter,
    pub pit_satisfied: Counter,
    pub pit_retransmits: Counter,
    pub pit_expirations: Counter,
    pub pit_size: Gauge,

    // FIB metrics
    pub fib_hits: Counter,
    pub fib_misses: Counter,
    pub fib_size: Gauge,
}

impl IcnMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}
