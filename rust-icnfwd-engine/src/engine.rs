//! Engine runtime: channels, dispatch and the aging driver.
//!
//! The engine owns the three tables and the queue pairs toward the link
//! layer (lower side) and the local application layer (higher side). One
//! dispatch task serializes packet processing; one timer task ages the
//! PIT and the CS. Both stop on the engine's shutdown signal.

use crate::config::ForwarderConfig;
use crate::forwarder::Forwarder;
use crate::tables::{ContentStore, CsEntry, Fib, FibEntry, Pit};
use crate::DEFAULT_QUEUE_DEPTH;
use log::{debug, info, warn};
use rust_icnfwd_common::metrics::IcnMetrics;
use rust_icnfwd_common::ndn::{Data, Name, Packet};
use rust_icnfwd_common::types::FaceId;
use rust_icnfwd_common::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A running ICN forwarding node, minus its transports.
///
/// The link layer feeds decoded packets through [`IcnEngine::ingress_sender`]
/// and drains [`IcnEngine::take_egress`]; a local application layer uses the
/// higher-side pair the same way. Whoever attaches a queue must also drain
/// it.
pub struct IcnEngine {
    config: ForwarderConfig,
    metrics: Arc<IcnMetrics>,

    cs: Arc<Mutex<ContentStore>>,
    pit: Arc<Mutex<Pit>>,
    fib: Arc<RwLock<Fib>>,
    forwarder: Arc<Forwarder>,

    from_lower_tx: mpsc::Sender<(FaceId, Packet)>,
    from_lower_rx: Option<mpsc::Receiver<(FaceId, Packet)>>,
    from_higher_tx: mpsc::Sender<(FaceId, Packet)>,
    from_higher_rx: Option<mpsc::Receiver<(FaceId, Packet)>>,

    to_lower_tx: mpsc::Sender<(FaceId, Packet)>,
    to_lower_rx: Option<mpsc::Receiver<(FaceId, Packet)>>,
    to_higher_rx: Option<mpsc::Receiver<(FaceId, Packet)>>,

    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl IcnEngine {
    pub fn new(config: ForwarderConfig) -> Self {
        let metrics = Arc::new(IcnMetrics::new());
        let cs = Arc::new(Mutex::new(ContentStore::new()));
        let pit = Arc::new(Mutex::new(Pit::new()));
        let fib = Arc::new(RwLock::new(Fib::new()));

        let (from_lower_tx, from_lower_rx) = mpsc::channel(DEFAULT_QUEUE_DEPTH);
        let (from_higher_tx, from_higher_rx) = mpsc::channel(DEFAULT_QUEUE_DEPTH);
        let (to_lower_tx, to_lower_rx) = mpsc::channel(DEFAULT_QUEUE_DEPTH);
        let (to_higher_tx, to_higher_rx) = mpsc::channel(DEFAULT_QUEUE_DEPTH);

        let forwarder = Arc::new(Forwarder::new(
            Arc::clone(&cs),
            Arc::clone(&pit),
            Arc::clone(&fib),
            config.clone(),
            Arc::clone(&metrics),
            to_lower_tx.clone(),
            Some(to_higher_tx),
        ));

        let (shutdown_tx, _) = watch::channel(false);

        Self {
            config,
            metrics,
            cs,
            pit,
            fib,
            forwarder,
            from_lower_tx,
            from_lower_rx: Some(from_lower_rx),
            from_higher_tx,
            from_higher_rx: Some(from_higher_rx),
            to_lower_tx,
            to_lower_rx: Some(to_lower_rx),
            to_higher_rx: Some(to_higher_rx),
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    /// Queue endpoint the link layer feeds decoded ingress packets into.
    pub fn ingress_sender(&self) -> mpsc::Sender<(FaceId, Packet)> {
        self.from_lower_tx.clone()
    }

    /// Queue endpoint a local application feeds packets into.
    pub fn app_sender(&self) -> mpsc::Sender<(FaceId, Packet)> {
        self.from_higher_tx.clone()
    }

    /// Egress queue toward the link layer. Yields `None` once taken.
    pub fn take_egress(&mut self) -> Option<mpsc::Receiver<(FaceId, Packet)>> {
        self.to_lower_rx.take()
    }

    /// Egress queue toward the local application layer. Yields `None` once
    /// taken.
    pub fn take_app_egress(&mut self) -> Option<mpsc::Receiver<(FaceId, Packet)>> {
        self.to_higher_rx.take()
    }

    pub fn config(&self) -> &ForwarderConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<IcnMetrics> {
        Arc::clone(&self.metrics)
    }

    /* ------------------------------------------------------------ *
     * Table management surface
     * ------------------------------------------------------------ */

    pub async fn add_route(&self, prefix: Name, face_id: FaceId, is_static: bool) {
        let mut fib = self.fib.write().await;
        fib.add(prefix, face_id, is_static);
        self.metrics.fib_size.set(fib.len() as u64);
    }

    pub async fn remove_route(&self, prefix: &Name) {
        let mut fib = self.fib.write().await;
        fib.remove(prefix);
        self.metrics.fib_size.set(fib.len() as u64);
    }

    pub async fn routes(&self) -> Vec<FibEntry> {
        self.fib.read().await.iter().cloned().collect()
    }

    pub async fn insert_content(&self, data: Data, is_static: bool) {
        let mut cs = self.cs.lock().await;
        cs.add(data, is_static);
        self.metrics.cs_inserts.increment();
        self.metrics.cs_size.set(cs.len() as u64);
    }

    pub async fn contents(&self) -> Vec<CsEntry> {
        self.cs.lock().await.iter().cloned().collect()
    }

    /* ------------------------------------------------------------ *
     * Lifecycle
     * ------------------------------------------------------------ */

    /// Spawn the dispatch and aging tasks. Fails if already started.
    pub fn start(&mut self) -> Result<()> {
        let from_lower = self
            .from_lower_rx
            .take()
            .ok_or_else(|| Error::Channel("engine already started".into()))?;
        let from_higher = self
            .from_higher_rx
            .take()
            .ok_or_else(|| Error::Channel("engine already started".into()))?;

        info!(
            "starting forwarder: cs_timeout={}s pit_timeout={}s pit_retransmits={} ageing_interval={}s",
            self.config.cs_timeout,
            self.config.pit_timeout,
            self.config.pit_retransmits,
            self.config.ageing_interval
        );

        self.tasks.push(self.spawn_dispatch(from_lower, from_higher));
        self.tasks.push(self.spawn_aging());
        Ok(())
    }

    /// Stop both tasks and wait for them to drain.
    pub async fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        debug!("engine stopped");
    }

    /// Run one aging pass over the PIT and the CS.
    pub async fn age_once(&self) {
        age_tables(
            &self.cs,
            &self.pit,
            &self.fib,
            &self.config,
            &self.metrics,
            &self.to_lower_tx,
        )
        .await;
    }

    fn spawn_dispatch(
        &self,
        mut from_lower: mpsc::Receiver<(FaceId, Packet)>,
        mut from_higher: mpsc::Receiver<(FaceId, Packet)>,
    ) -> JoinHandle<()> {
        let forwarder = Arc::clone(&self.forwarder);
        let mut shutdown = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            debug!("dispatch task running");
            loop {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    message = from_lower.recv() => match message {
                        Some((face_id, packet)) => {
                            forwarder.handle_from_lower(face_id, packet).await;
                        }
                        None => break,
                    },
                    message = from_higher.recv() => match message {
                        Some((app_id, packet)) => {
                            forwarder.handle_from_higher(app_id, packet).await;
                        }
                        None => break,
                    },
                }
            }
            debug!("dispatch task stopped");
        })
    }

    fn spawn_aging(&self) -> JoinHandle<()> {
        let cs = Arc::clone(&self.cs);
        let pit = Arc::clone(&self.pit);
        let fib = Arc::clone(&self.fib);
        let config = self.config.clone();
        let metrics = Arc::clone(&self.metrics);
        let to_lower = self.to_lower_tx.clone();
        let mut shutdown = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.ageing_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!("aging task running");
            loop {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = ticker.tick() => {
                        age_tables(&cs, &pit, &fib, &config, &metrics, &to_lower).await;
                    }
                }
            }
            debug!("aging task stopped");
        })
    }
}

/// One pass of the aging policy.
///
/// PIT entries past their timeout with an exhausted retransmit budget are
/// evicted without notification; the others get their retransmit counter
/// bumped and, when an unused route exists, the stored Interest re-emitted.
/// Re-emission is a retransmit, not a failover: `used_fib` is untouched.
/// CS entries expire unless pinned.
async fn age_tables(
    cs: &Mutex<ContentStore>,
    pit: &Mutex<Pit>,
    fib: &RwLock<Fib>,
    config: &ForwarderConfig,
    metrics: &IcnMetrics,
    to_lower: &mpsc::Sender<(FaceId, Packet)>,
) {
    let now = Instant::now();
    let pit_timeout = config.pit_timeout();

    {
        let mut pit = pit.lock().await;
        let entries = pit.drain();
        let fib = fib.read().await;
        for mut entry in entries {
            if now > entry.timestamp + pit_timeout && entry.retransmits > config.pit_retransmits {
                debug!(
                    "evicting pit entry {} after {} retransmits",
                    entry.name, entry.retransmits
                );
                metrics.pit_expirations.increment();
                continue;
            }

            entry.retransmits += 1;
            metrics.pit_retransmits.increment();
            if let Some(route) = fib.find(&entry.name, &entry.used_fib) {
                debug!("retransmitting {} via {}", entry.name, route.face_id);
                if to_lower
                    .send((route.face_id, Packet::Interest(entry.interest.clone())))
                    .await
                    .is_err()
                {
                    warn!("link layer queue closed, dropping retransmit");
                }
            }
            pit.reinsert(entry);
        }
        metrics.pit_size.set(pit.len() as u64);
    }

    {
        let mut cs = cs.lock().await;
        let evicted = cs.expire(config.cs_timeout());
        if evicted > 0 {
            debug!("aged out {} content store entries", evicted);
            metrics.cs_evictions.add(evicted as u64);
        }
        metrics.cs_size.set(cs.len() as u64);
    }
}
