//! Operations context for dependency injection

use snapfind_config::Config;
use snapfind_errors::Error;
use snapfind_events::{EventEmitter, EventSender};
use snapfind_net::NetClient;
use snapfind_probe::ProbeConfig;
use std::sync::Arc;

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Network client, shared with the probe tasks
    pub net: Arc<NetClient>,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// Effective configuration
    pub config: Config,
}

impl OpsCtx {
    /// Probe settings derived from the configuration
    #[must_use]
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            health_timeout: self.config.probe.health_timeout(),
            speed_test_window: self.config.probe.speed_test_window(),
            max_concurrency: self.config.probe.max_concurrency,
        }
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for the operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    net: Option<NetClient>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let net = self
            .net
            .ok_or_else(|| Error::internal("missing component: net"))?;

        let tx = self
            .tx
            .ok_or_else(|| Error::internal("missing component: event_sender"))?;

        Ok(OpsCtx {
            net: Arc::new(net),
            tx,
            config: self.config.unwrap_or_default(),
        })
    }
}
