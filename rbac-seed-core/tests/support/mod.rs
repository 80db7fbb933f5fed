//! Fakes and log capture shared by the seeding integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use rbac_seed_core::domain::TenantRef;
use rbac_seed_core::ports::{
    ConnectionCleanup, GroupSeeder, RoleSeeder, TenantRegistry,
};
use rbac_seed_core::{Result, SeedError};

pub fn tenants(names: &[&str]) -> Vec<TenantRef> {
    names.iter().copied().map(TenantRef::new).collect()
}

pub struct StaticTenantRegistry {
    tenants: Vec<TenantRef>,
    pub calls: AtomicUsize,
}

impl StaticTenantRegistry {
    pub fn new(names: &[&str]) -> Self {
        Self {
            tenants: tenants(names),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TenantRegistry for StaticTenantRegistry {
    async fn list_all_tenants(&self) -> Result<Vec<TenantRef>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tenants.clone())
    }
}

pub struct FailingTenantRegistry;

#[async_trait]
impl TenantRegistry for FailingTenantRegistry {
    async fn list_all_tenants(&self) -> Result<Vec<TenantRef>> {
        Err(SeedError::TenantRegistry("connection refused".into()))
    }
}

pub struct PanickingTenantRegistry;

#[async_trait]
impl TenantRegistry for PanickingTenantRegistry {
    async fn list_all_tenants(&self) -> Result<Vec<TenantRef>> {
        panic!("tenant table missing")
    }
}

/// Tracks how many seeding calls overlap.
#[derive(Default)]
pub struct Gauge {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Behaviour knobs shared by the recording seeders.
#[derive(Default)]
pub struct SeederScript {
    pub fail_for: HashSet<String>,
    pub panic_for: HashSet<String>,
    pub delay: Option<Duration>,
    pub gauge: Arc<Gauge>,
}

impl SeederScript {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            fail_for: names.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn panicking(names: &[&str]) -> Self {
        Self {
            panic_for: names.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    async fn play(&self, tenant: &TenantRef) -> Result<()> {
        self.gauge.enter();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.gauge.exit();

        if self.panic_for.contains(&tenant.schema_name) {
            panic!("definer crashed for {}", tenant.schema_name);
        }
        if self.fail_for.contains(&tenant.schema_name) {
            return Err(SeedError::seeding(
                tenant.schema_name.clone(),
                "role definitions unavailable",
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRoleSeeder {
    pub calls: Mutex<Vec<(String, bool)>>,
    pub script: SeederScript,
}

impl RecordingRoleSeeder {
    pub fn with_script(script: SeederScript) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script,
        }
    }

    pub async fn tenants_seeded(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .calls
            .lock()
            .await
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl RoleSeeder for RecordingRoleSeeder {
    async fn seed_roles(&self, tenant: &TenantRef, update: bool) -> Result<()> {
        self.calls
            .lock()
            .await
            .push((tenant.schema_name.clone(), update));
        self.script.play(tenant).await
    }
}

#[derive(Default)]
pub struct RecordingGroupSeeder {
    pub calls: Mutex<Vec<String>>,
    pub script: SeederScript,
}

impl RecordingGroupSeeder {
    pub fn with_script(script: SeederScript) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script,
        }
    }

    pub async fn tenants_seeded(&self) -> Vec<String> {
        let mut names = self.calls.lock().await.clone();
        names.sort();
        names
    }
}

#[async_trait]
impl GroupSeeder for RecordingGroupSeeder {
    async fn seed_group(&self, tenant: &TenantRef) -> Result<()> {
        self.calls.lock().await.push(tenant.schema_name.clone());
        self.script.play(tenant).await
    }
}

/// Message logged by [`CountingConnectionCleanup`] on every call.
pub const CLEANUP_MARKER: &str = "Closed worker connections.";

#[derive(Default)]
pub struct CountingConnectionCleanup {
    pub calls: AtomicUsize,
}

impl CountingConnectionCleanup {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionCleanup for CountingConnectionCleanup {
    async fn close_all_connections_for_current_worker(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!("{CLEANUP_MARKER}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

/// `tracing` layer that keeps every event's level and message.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<StdMutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    /// Installs the capture as the default subscriber for the current
    /// thread. Pair with the single-threaded `#[tokio::test]` runtime so
    /// spawned jobs log into the same capture.
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::registry().with(logs.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .map(|event| event.message)
            .collect()
    }

    pub fn messages_starting_with(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.message)
            .filter(|message| message.starts_with(prefix))
            .collect()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if let Ok(mut events) = self.events.lock() {
            events.push(CapturedEvent {
                level: *event.metadata().level(),
                message: visitor.0,
            });
        }
    }
}
