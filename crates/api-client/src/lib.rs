//! Clients for the Digital Marketplace backend services
//!
//! Each service gets a façade over one shared request engine:
//!
//! - **Data API**: suppliers, services, frameworks, briefs, users and audit events
//! - **Tasks, Antivirus and Central Digital Platform**: key or token authenticated helpers
//! - **Spotlight and Cyber Essentials**: signed-query workflows, bundled by
//!   [`SpotlightApiClient`] and [`DataInsightsApiClient`]
//!
//! Clients are built from a [`ClientConfig`] and can be bound to a URL and
//! credential later through `init_app`, reading from any [`ConfigSource`].
//! A disabled client answers every call with `{}` without touching the network.
//!
//! # Example
//!
//! ```rust,no_run
//! use dm_api_client::prelude::*;
//! use dm_api_client::endpoints::data::FindServices;
//!
//! fn main() -> Result<(), ApiError> {
//!     let config = ClientConfig::new("https://api.example.gov.uk", "token")
//!         .with_user("developer@example.gov.uk");
//!     let data = DataApiClient::new(config)?;
//!
//!     for service in data.find_services_iter(FindServices::for_supplier(123)) {
//!         let service = service?;
//!         println!("{}", service["id"]);
//!     }
//!
//!     data.update_service_status("1234567890", "disabled", None, false)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_arguments)]

pub mod client;
pub mod endpoints;

pub use client::BaseClient;
pub use dm_api_core::config::{ClientConfig, ConfigSource, EnvConfig, FileConfig};
pub use dm_api_core::error::{ApiError, ApiResult};
pub use endpoints::{
    AntivirusApiClient, CentralDigitalPlatformClient, CyberEssentialsClient, DataApiClient,
    DataInsightsApiClient, SpotlightApiClient, TasksApiClient,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::BaseClient;
    pub use crate::endpoints::{
        AntivirusApiClient, CentralDigitalPlatformClient, CyberEssentialsClient, DataApiClient,
        DataInsightsApiClient, SignedWorkflowClient, SpotlightApiClient, TasksApiClient,
    };
    pub use dm_api_core::config::{ClientConfig, ConfigSource, EnvConfig, FileConfig};
    pub use dm_api_core::error::{ApiError, ApiResult};
}
