//! Periodic poll of the device endpoints.

mod snapshot;

use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tokio::time::{Instant, timeout};

pub use self::snapshot::{Fields, Refresh, Section, Snapshot};
use crate::prelude::*;

/// Where the coordinator fetches the sections from.
#[async_trait]
pub trait Source: Send + Sync {
    async fn fetch(&self, section: Section) -> Result<Fields>;
}

#[derive(Default)]
struct CachedSection {
    fields: Option<Fields>,

    /// `None` means «never expires».
    refresh_at: Option<Instant>,
}

impl CachedSection {
    fn is_due(&self, now: Instant) -> bool {
        self.fields.is_none() || self.refresh_at.is_some_and(|refresh_at| now >= refresh_at)
    }

    fn store(&mut self, fields: Fields, fetched_at: Instant, refresh: Refresh) {
        self.refresh_at = match refresh {
            Refresh::Every(period) => Some(fetched_at + period),
            Refresh::Once | Refresh::EveryCycle => None,
        };
        self.fields = Some(fields);
    }
}

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Overall budget of one refresh, all fetches included.
pub const REFRESH_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Builder)]
pub struct Coordinator<S> {
    source: S,

    #[builder(default = DEFAULT_INTERVAL)]
    interval: Duration,

    #[builder(skip)]
    info: CachedSection,

    #[builder(skip)]
    setup: CachedSection,

    #[builder(skip)]
    firmware: CachedSection,

    #[builder(skip)]
    snapshot: Option<Snapshot>,
}

impl<S: Source> Coordinator<S> {
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        if interval != self.interval {
            info!(?interval, "polling interval changed");
            self.interval = interval;
        }
    }

    /// Fetch the due sections and replace the snapshot.
    ///
    /// Individual fetch failures are logged and swallowed. Only exceeding
    /// [`REFRESH_TIMEOUT`] fails the update, and then the previous
    /// snapshot is kept.
    #[instrument(skip_all)]
    pub async fn refresh(&mut self) -> Result<&Snapshot> {
        let snapshot = timeout(REFRESH_TIMEOUT, self.fetch_due())
            .await
            .map_err(|_| anyhow!("timed out after {REFRESH_TIMEOUT:?}"))
            .context("failed to update the device data")?;
        Ok(self.snapshot.insert(snapshot))
    }

    async fn fetch_due(&mut self) -> Snapshot {
        let data = fetch(&self.source, Section::Data).await;

        for (section, cached) in [
            (Section::Info, &mut self.info),
            (Section::Setup, &mut self.setup),
            (Section::Firmware, &mut self.firmware),
        ] {
            let now = Instant::now();
            if !cached.is_due(now) {
                continue;
            }
            // A failed fetch leaves the stale value in place, it is retried on the next cycle.
            if let Some(fields) = fetch(&self.source, section).await {
                cached.store(fields, now, section.refresh());
            }
        }

        Snapshot {
            data,
            info: self.info.fields.clone(),
            setup: self.setup.fields.clone(),
            firmware: self.firmware.fields.clone(),
        }
    }
}

async fn fetch(source: &impl Source, section: Section) -> Option<Fields> {
    match source.fetch(section).await {
        Ok(fields) => {
            debug!(%section, n_fields = fields.len(), "fetched");
            Some(fields)
        }
        Err(error) => {
            warn!(%section, "failed to fetch: {error:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    };

    use serde_json::{Value, json};
    use tokio::time::{advance, sleep};

    use super::*;

    /// Answers with `{"section": "<name>", "n": <call number>}` and records the calls.
    #[derive(Default)]
    struct FakeSource {
        calls: Mutex<Vec<Section>>,
        is_failing: AtomicBool,
        delay_millis: AtomicU64,
    }

    impl FakeSource {
        fn n_calls(&self, section: Section) -> usize {
            self.calls.lock().unwrap().iter().filter(|called| **called == section).count()
        }
    }

    #[async_trait]
    impl Source for FakeSource {
        async fn fetch(&self, section: Section) -> Result<Fields> {
            let n = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(section);
                calls.len()
            };
            sleep(Duration::from_millis(self.delay_millis.load(Ordering::Relaxed))).await;
            ensure!(!self.is_failing.load(Ordering::Relaxed), "connection refused");
            let Value::Object(fields) = json!({ "section": section.to_string(), "n": n }) else {
                unreachable!()
            };
            Ok(fields)
        }
    }

    fn new_coordinator() -> Coordinator<FakeSource> {
        Coordinator::builder().source(FakeSource::default()).build()
    }

    #[tokio::test(start_paused = true)]
    async fn first_refresh_fetches_everything() -> Result {
        let mut coordinator = new_coordinator();
        let snapshot = coordinator.refresh().await?;
        assert!(snapshot.data.is_some());
        assert_eq!(snapshot.info.as_ref().unwrap()["section"], "info");
        assert_eq!(snapshot.setup.as_ref().unwrap()["section"], "setup");
        assert_eq!(snapshot.firmware.as_ref().unwrap()["section"], "firmware");
        assert_eq!(
            *coordinator.source.calls.lock().unwrap(),
            [Section::Data, Section::Info, Section::Setup, Section::Firmware]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn info_is_fetched_once() -> Result {
        let mut coordinator = new_coordinator();
        coordinator.refresh().await?;
        coordinator.source.is_failing.store(true, Ordering::Relaxed);
        for _ in 0..3 {
            advance(Section::FIRMWARE_REFRESH_PERIOD).await;
            let snapshot = coordinator.refresh().await?;
            assert_eq!(snapshot.info.as_ref().unwrap()["section"], "info");
        }
        assert_eq!(coordinator.source.n_calls(Section::Info), 1);
        assert_eq!(coordinator.source.n_calls(Section::Data), 4);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn data_is_fetched_every_cycle() -> Result {
        let mut coordinator = new_coordinator();
        for n in 1..=3 {
            let snapshot = coordinator.refresh().await?;
            assert_eq!(snapshot.data.as_ref().unwrap()["section"], "data");
            assert_eq!(snapshot.firmware.as_ref().unwrap()["n"], 4, "firmware is cached");
            assert_eq!(coordinator.source.n_calls(Section::Data), n);
        }
        assert_eq!(coordinator.source.n_calls(Section::Firmware), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn setup_is_refetched_after_period() -> Result {
        let mut coordinator = new_coordinator();
        coordinator.refresh().await?;

        advance(Duration::from_secs(119)).await;
        coordinator.refresh().await?;
        assert_eq!(coordinator.source.n_calls(Section::Setup), 1);

        advance(Duration::from_secs(2)).await;
        coordinator.refresh().await?;
        assert_eq!(coordinator.source.n_calls(Section::Setup), 2);
        assert_eq!(coordinator.source.n_calls(Section::Firmware), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn firmware_is_refetched_weekly() -> Result {
        let mut coordinator = new_coordinator();
        coordinator.refresh().await?;

        advance(Section::FIRMWARE_REFRESH_PERIOD - Duration::from_secs(1)).await;
        coordinator.refresh().await?;
        assert_eq!(coordinator.source.n_calls(Section::Firmware), 1);

        advance(Duration::from_secs(1)).await;
        coordinator.refresh().await?;
        assert_eq!(coordinator.source.n_calls(Section::Firmware), 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetches_are_swallowed() -> Result {
        let mut coordinator = new_coordinator();
        coordinator.refresh().await?;

        coordinator.source.is_failing.store(true, Ordering::Relaxed);
        advance(Section::SETUP_REFRESH_PERIOD).await;
        let snapshot = coordinator.refresh().await?;
        assert!(snapshot.data.is_none());
        assert_eq!(snapshot.setup.as_ref().unwrap()["n"], 3, "stale setup should be kept");

        // Stale sections are retried on every cycle until they succeed.
        coordinator.refresh().await?;
        assert_eq!(coordinator.source.n_calls(Section::Setup), 3);
        coordinator.source.is_failing.store(false, Ordering::Relaxed);
        coordinator.refresh().await?;
        coordinator.refresh().await?;
        assert_eq!(coordinator.source.n_calls(Section::Setup), 4);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn slow_refresh_fails_and_keeps_snapshot() -> Result {
        let mut coordinator = new_coordinator();
        coordinator.source.delay_millis.store(500, Ordering::Relaxed);
        coordinator.refresh().await?;
        let previous = coordinator.snapshot.clone().unwrap();

        // Only `data.jsn` is due now, so it alone has to exceed the budget.
        coordinator.source.delay_millis.store(5000, Ordering::Relaxed);
        assert!(coordinator.refresh().await.is_err());
        assert_eq!(coordinator.snapshot.unwrap().data, previous.data);
        Ok(())
    }

    #[test]
    fn set_interval_ok() {
        let mut coordinator = new_coordinator();
        assert_eq!(coordinator.interval(), Duration::from_secs(10));
        coordinator.set_interval(Duration::from_secs(30));
        assert_eq!(coordinator.interval(), Duration::from_secs(30));
    }
}
