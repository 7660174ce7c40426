//! Health snapshots: one complete refresh cycle over the registry.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::probe::{format_latency, Outcome, Prober};
use crate::registry::{ProbeTarget, Registry};

/// Categorical status of a probed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Down,
}

impl Status {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Status::Running
        } else {
            Status::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Running => "running",
            Status::Down => "down",
        }
    }
}

/// Outcome of one liveness check, tied to the target it was taken for.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub target: Arc<ProbeTarget>,
    pub reachable: bool,
    pub latency: Duration,
}

impl ProbeResult {
    pub fn new(target: Arc<ProbeTarget>, outcome: Outcome) -> Self {
        Self {
            target,
            reachable: outcome.reachable,
            latency: if outcome.reachable {
                outcome.latency
            } else {
                Duration::ZERO
            },
        }
    }

    pub fn status(&self) -> Status {
        Status::from_reachable(self.reachable)
    }
}

impl Serialize for ProbeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProbeResult", 5)?;
        state.serialize_field("name", &self.target.name)?;
        state.serialize_field("port", &self.target.port)?;
        state.serialize_field("category", &self.target.category)?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("latency", &format_latency(self.latency))?;
        state.end()
    }
}

/// Results of one refresh cycle, in registry order.
///
/// Each new snapshot fully replaces the previous one.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub results: Vec<ProbeResult>,
    /// When the cycle started (wall clock, milliseconds since the epoch).
    pub timestamp_ms: u64,
    #[serde(skip)]
    pub started_at: Instant,
}

impl HealthSnapshot {
    pub fn new(results: Vec<ProbeResult>, started_at: Instant, timestamp_ms: u64) -> Self {
        Self {
            results,
            timestamp_ms,
            started_at,
        }
    }

    /// A snapshot with no results, used before the first cycle completes.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Instant::now(), now_ms())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Count of (running, down) results.
    pub fn counts(&self) -> (usize, usize) {
        let running = self.results.iter().filter(|r| r.reachable).count();
        (running, self.results.len() - running)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Probe every target of the registry and assemble a snapshot.
///
/// Targets are probed concurrently, one task each. Results are collected
/// by awaiting the tasks in registry order, so the snapshot order never
/// depends on which probe finishes first. A probe task that panics is
/// recorded as down.
pub async fn build_snapshot(registry: &Registry, prober: Arc<dyn Prober>) -> HealthSnapshot {
    let started_at = Instant::now();
    let timestamp_ms = now_ms();

    let handles: Vec<_> = registry
        .targets()
        .iter()
        .map(|target| {
            let target = Arc::clone(target);
            let prober = Arc::clone(&prober);
            tokio::spawn(async move { prober.probe(&target).await })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (target, handle) in registry.targets().iter().zip(handles) {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(name = %target.name, error = %e, "probe task failed");
                Outcome::down()
            }
        };
        results.push(ProbeResult::new(Arc::clone(target), outcome));
    }

    let snapshot = HealthSnapshot::new(results, started_at, timestamp_ms);
    let (running, down) = snapshot.counts();
    debug!(
        running,
        down,
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        "health snapshot built"
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Category;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Replies after a per-target delay with a fixed outcome.
    struct ScriptedProber {
        script: HashMap<String, (Duration, Outcome)>,
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, target: &ProbeTarget) -> Outcome {
            let (delay, outcome) = self.script[&target.name];
            tokio::time::sleep(delay).await;
            outcome
        }
    }

    struct PanickingProber;

    #[async_trait]
    impl Prober for PanickingProber {
        async fn probe(&self, target: &ProbeTarget) -> Outcome {
            if target.name == "bad" {
                panic!("probe exploded");
            }
            Outcome::up(Duration::from_millis(1))
        }
    }

    fn registry(names: &[&str]) -> Registry {
        Registry::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| ProbeTarget::tcp(*n, 8000 + i as u16, Category::Api))
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_matches_registry_despite_reverse_completion() {
        let names = ["a", "b", "c", "d"];
        let script = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                // First target finishes last.
                let delay = Duration::from_millis(400 - 100 * i as u64);
                (n.to_string(), (delay, Outcome::up(delay)))
            })
            .collect();
        let prober: Arc<dyn Prober> = Arc::new(ScriptedProber { script });

        let snapshot = build_snapshot(&registry(&names), prober).await;

        let got: Vec<&str> = snapshot.results.iter().map(|r| r.target.name.as_str()).collect();
        assert_eq!(got, names);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probes_run_concurrently() {
        let names = ["a", "b", "c"];
        let script = names
            .iter()
            .map(|n| (n.to_string(), (Duration::from_secs(2), Outcome::down())))
            .collect();
        let prober: Arc<dyn Prober> = Arc::new(ScriptedProber { script });

        let start = tokio::time::Instant::now();
        let snapshot = build_snapshot(&registry(&names), prober).await;

        assert_eq!(snapshot.len(), 3);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_statuses_and_latency() {
        let mut script = HashMap::new();
        script.insert(
            "up".to_string(),
            (Duration::ZERO, Outcome::up(Duration::from_micros(1200))),
        );
        script.insert("down".to_string(), (Duration::ZERO, Outcome::down()));
        let prober: Arc<dyn Prober> = Arc::new(ScriptedProber { script });

        let snapshot = build_snapshot(&registry(&["up", "down"]), prober).await;

        assert_eq!(snapshot.results[0].status(), Status::Running);
        assert_eq!(snapshot.results[0].latency, Duration::from_micros(1200));
        assert_eq!(snapshot.results[1].status(), Status::Down);
        assert_eq!(snapshot.results[1].latency, Duration::ZERO);
        assert_eq!(snapshot.counts(), (1, 1));
    }

    #[tokio::test]
    async fn test_panicking_probe_is_down() {
        let prober: Arc<dyn Prober> = Arc::new(PanickingProber);

        let snapshot = build_snapshot(&registry(&["good", "bad"]), prober).await;

        assert!(snapshot.results[0].reachable);
        assert!(!snapshot.results[1].reachable);
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let prober: Arc<dyn Prober> = Arc::new(PanickingProber);
        let snapshot = build_snapshot(&Registry::default(), prober).await;
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(Status::from_reachable(true).as_str(), "running");
        assert_eq!(Status::from_reachable(false).as_str(), "down");
    }

    #[test]
    fn test_serialize_result() {
        let target = Arc::new(ProbeTarget::tcp("DB", 27018, Category::Database));
        let result = ProbeResult::new(target, Outcome::up(Duration::from_micros(1200)));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["name"], "DB");
        assert_eq!(json["port"], 27018);
        assert_eq!(json["category"], "database");
        assert_eq!(json["status"], "running");
        assert_eq!(json["latency"], "1.2ms");
    }
}
