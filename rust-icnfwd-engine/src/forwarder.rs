//! The forwarding state machine.
//!
//! The forwarder is stateless per packet: every decision is a function of
//! the arriving `(face, packet)` pair and the three tables. It emits zero
//! or more packets to the lower (network) side and to the higher (local
//! application) side through bounded queues.

use crate::config::ForwarderConfig;
use crate::tables::{ContentStore, Fib, Pit};
use log::{debug, info, warn};
use rust_icnfwd_common::metrics::IcnMetrics;
use rust_icnfwd_common::ndn::{Data, Interest, Nack, Packet};
use rust_icnfwd_common::types::{AppId, FaceId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};

/// ICN forwarding plane over the three tables.
///
/// The tables are shared with the aging driver and (for the FIB) the
/// management surface; the forwarder takes their locks per packet.
pub struct Forwarder {
    cs: Arc<Mutex<ContentStore>>,
    pit: Arc<Mutex<Pit>>,
    fib: Arc<RwLock<Fib>>,
    config: ForwarderConfig,
    metrics: Arc<IcnMetrics>,
    to_lower: mpsc::Sender<(FaceId, Packet)>,
    to_higher: Option<mpsc::Sender<(FaceId, Packet)>>,
}

impl Forwarder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cs: Arc<Mutex<ContentStore>>,
        pit: Arc<Mutex<Pit>>,
        fib: Arc<RwLock<Fib>>,
        config: ForwarderConfig,
        metrics: Arc<IcnMetrics>,
        to_lower: mpsc::Sender<(FaceId, Packet)>,
        to_higher: Option<mpsc::Sender<(FaceId, Packet)>>,
    ) -> Self {
        Self {
            cs,
            pit,
            fib,
            config,
            metrics,
            to_lower,
            to_higher,
        }
    }

    /// Consume one packet that arrived on a network face.
    pub async fn handle_from_lower(&self, face_id: FaceId, packet: Packet) {
        match packet {
            Packet::Interest(interest) => self.handle_interest(face_id, interest, false).await,
            Packet::Data(data) => self.handle_data(face_id, data).await,
            Packet::Nack(nack) => self.handle_nack(face_id, nack).await,
        }
    }

    /// Consume one packet handed down by a local application. PIT records
    /// created on this path carry the `local_app` marker so replies are
    /// routed back upward.
    pub async fn handle_from_higher(&self, app_id: AppId, packet: Packet) {
        match packet {
            Packet::Interest(interest) => self.handle_interest(app_id, interest, true).await,
            Packet::Data(data) => self.handle_data(app_id, data).await,
            Packet::Nack(nack) => self.handle_nack(app_id, nack).await,
        }
    }

    async fn handle_interest(&self, face_id: FaceId, interest: Interest, from_local: bool) {
        debug!("handling interest {} from {}", interest.name, face_id);
        self.metrics.interests_received.increment();

        // 1. Content Store
        let cached = {
            let mut cs = self.cs.lock().await;
            match cs.find(&interest.name) {
                Some(entry) => {
                    let data = entry.data.clone();
                    cs.update_timestamp(&interest.name);
                    self.metrics.cs_hits.increment();
                    Some(data)
                }
                None => {
                    self.metrics.cs_misses.increment();
                    None
                }
            }
        };
        if let Some(data) = cached {
            debug!("found {} in content store", data.name);
            self.metrics.data_sent.increment();
            self.reply(face_id, Packet::Data(data), from_local).await;
            return;
        }

        // 2. PIT aggregation
        {
            let mut pit = self.pit.lock().await;
            if pit.find(&interest.name).is_some() {
                debug!("found {} in PIT, aggregating", interest.name);
                pit.update_timestamp(&interest.name);
                pit.add(interest.name.clone(), face_id, interest, from_local);
                self.metrics.interests_aggregated.increment();
                return;
            }
        }

        // 3. Local application punt
        if self.config.interest_to_app {
            if let Some(to_higher) = &self.to_higher {
                {
                    let mut pit = self.pit.lock().await;
                    pit.add(interest.name.clone(), face_id, interest.clone(), from_local);
                    self.metrics.pit_inserts.increment();
                    self.metrics.pit_size.set(pit.len() as u64);
                }
                debug!("punting {} to the application layer", interest.name);
                if to_higher
                    .send((face_id, Packet::Interest(interest)))
                    .await
                    .is_err()
                {
                    warn!("application layer queue closed, dropping interest");
                }
                return;
            }
        }

        // 4. FIB
        let route = {
            let fib = self.fib.read().await;
            fib.find(&interest.name, &HashSet::new()).cloned()
        };
        match route {
            Some(route) => {
                debug!("forwarding {} to {}", interest.name, route.face_id);
                {
                    let mut pit = self.pit.lock().await;
                    pit.add(interest.name.clone(), face_id, interest.clone(), from_local);
                    pit.add_used_fib(&interest.name, route.clone());
                    self.metrics.pit_inserts.increment();
                    self.metrics.pit_size.set(pit.len() as u64);
                }
                self.metrics.fib_hits.increment();
                self.metrics.interests_forwarded.increment();
                self.send_lower(route.face_id, Packet::Interest(interest)).await;
            }
            None => {
                // 5. no route: the origin hears about it immediately
                info!("no route for {}, sending nack", interest.name);
                self.metrics.fib_misses.increment();
                self.metrics.nacks_sent.increment();
                let nack = Nack::no_route(interest);
                self.reply(face_id, Packet::Nack(nack), from_local).await;
            }
        }
    }

    async fn handle_data(&self, face_id: FaceId, data: Data) {
        debug!("handling data {} from {}", data.name, face_id);
        self.metrics.data_received.increment();

        let mut pit = self.pit.lock().await;
        let Some(entry) = pit.find(&data.name) else {
            debug!("no PIT entry for {}, dropping unsolicited data", data.name);
            self.metrics.unsolicited_dropped.increment();
            return;
        };

        // every waiter recorded at this moment hears the Data, then the
        // entry goes away; late duplicates find no entry and are dropped
        let recipients = entry.incoming.clone();
        for downstream in recipients {
            self.metrics.data_sent.increment();
            if downstream.local_app {
                self.send_higher(downstream.face_id, Packet::Data(data.clone())).await;
            } else {
                self.send_lower(downstream.face_id, Packet::Data(data.clone())).await;
            }
        }
        pit.remove(&data.name);
        self.metrics.pit_satisfied.increment();
        self.metrics.pit_size.set(pit.len() as u64);
        drop(pit);

        let mut cs = self.cs.lock().await;
        cs.add(data, false);
        self.metrics.cs_inserts.increment();
        self.metrics.cs_size.set(cs.len() as u64);
    }

    async fn handle_nack(&self, face_id: FaceId, nack: Nack) {
        debug!("handling nack {} ({}) from {}", nack.name, nack.reason, face_id);
        self.metrics.nacks_received.increment();

        let mut pit = self.pit.lock().await;
        let Some(entry) = pit.find(&nack.name) else {
            debug!("no PIT entry for nack {}, dropping", nack.name);
            self.metrics.unsolicited_dropped.increment();
            return;
        };

        let route = {
            let fib = self.fib.read().await;
            fib.find(&nack.name, &entry.used_fib).cloned()
        };

        match route {
            Some(route) => {
                info!("retrying {} on next route via {}", nack.name, route.face_id);
                let retry = entry.interest.clone();
                pit.add_used_fib(&nack.name, route.clone());
                drop(pit);
                self.metrics.fib_hits.increment();
                self.metrics.interests_forwarded.increment();
                self.send_lower(route.face_id, Packet::Interest(retry)).await;
            }
            None => {
                info!("no alternative route for {}, notifying waiters", nack.name);
                self.metrics.fib_misses.increment();
                let Some(mut entry) = pit.remove(&nack.name) else {
                    return;
                };
                if entry.incoming.iter().any(|d| d.local_app) {
                    // applications hear the failure first; the entry stays
                    // behind for the network waiters in case a Content
                    // still arrives
                    for downstream in entry.incoming.iter().filter(|d| d.local_app) {
                        self.metrics.nacks_sent.increment();
                        self.send_higher(downstream.face_id, Packet::Nack(nack.clone())).await;
                    }
                    entry.incoming.retain(|d| !d.local_app);
                    pit.reinsert(entry);
                } else {
                    for downstream in &entry.incoming {
                        self.metrics.nacks_sent.increment();
                        self.send_lower(downstream.face_id, Packet::Nack(nack.clone())).await;
                    }
                    self.metrics.pit_size.set(pit.len() as u64);
                }
            }
        }
    }

    /// Answer the origin of a packet: upward for local origins, downward
    /// for network origins.
    async fn reply(&self, face_id: FaceId, packet: Packet, from_local: bool) {
        if from_local {
            self.send_higher(face_id, packet).await;
        } else {
            self.send_lower(face_id, packet).await;
        }
    }

    async fn send_lower(&self, face_id: FaceId, packet: Packet) {
        if self.to_lower.send((face_id, packet)).await.is_err() {
            warn!("link layer queue closed, dropping packet for {}", face_id);
        }
    }

    async fn send_higher(&self, face_id: FaceId, packet: Packet) {
        match &self.to_higher {
            Some(queue) => {
                if queue.send((face_id, packet)).await.is_err() {
                    warn!("application layer queue closed, dropping packet for {}", face_id);
                }
            }
            None => warn!("no application layer attached, dropping packet for {}", face_id),
        }
    }
}
