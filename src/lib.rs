use std::{path::PathBuf, sync::Arc};

use anyhow::Context;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod api_errors;
pub mod settings;
pub mod constants;
pub mod telemetry;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{limiter, notifier, utils};

use entities::notification::Recipients;
use handlers::landing::LandingPage;
use limiter::rate_limiter::RateLimitLedger;
use notifier::NotificationTransport;
use repositories::submission_log::JsonFileSubmissionLog;
use use_cases::contact::{ContactHandler, Notifier};

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub rate_limiter: RateLimitLedger,
    pub landing_page: LandingPage,
    pub assets_dir: PathBuf,
    pub trust_x_forwarded_for: bool,
}

pub type AppContactHandler = ContactHandler<JsonFileSubmissionLog>;

impl AppState {
    /// Builds the state with the transport selected by `config`.
    pub fn new(config: &settings::AppConfig) -> anyhow::Result<Self> {
        let transport = notifier::from_config(config)
            .context("Failed to set up notification transport")?;

        Self::with_transport(config, transport)
    }

    pub fn with_transport(
        config: &settings::AppConfig,
        transport: Option<Arc<dyn NotificationTransport>>,
    ) -> anyhow::Result<Self> {
        let landing_page = LandingPage::load(config.landing_page_path.as_deref())
            .with_context(|| format!("Failed to read landing page {:?}", config.landing_page_path))?;

        let mut contact_handler =
            ContactHandler::new(JsonFileSubmissionLog::new(&config.submissions_path));

        if let Some(transport) = transport {
            tracing::info!("Notifications enabled via {}", transport.name());
            contact_handler = contact_handler.with_notifier(Notifier {
                transport,
                recipients: Recipients {
                    to: config.mail_to.clone(),
                    from: config.sender(),
                },
                timeout: config.notification_timeout(),
            });
        }

        let rate_limiter = RateLimitLedger::new(
            config.rate_limit_max_requests,
            config.rate_limit_window(),
        );

        Ok(AppState {
            contact_handler,
            rate_limiter,
            landing_page,
            assets_dir: config.assets_dir.clone(),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        })
    }
}
