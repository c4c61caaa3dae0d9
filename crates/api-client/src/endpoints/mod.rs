//! One façade per Digital Marketplace service
//!
//! Every façade wraps a [`BaseClient`](crate::client::BaseClient) configured
//! with the service's auth strategy.
//!
//! | Module | Client | Auth |
//! |--------|--------|------|
//! | `data` | [`DataApiClient`] | bearer token |
//! | `tasks` | [`TasksApiClient`] | bearer token |
//! | `antivirus` | [`AntivirusApiClient`] | `X-Api-Key` header |
//! | `central_digital_platform` | [`CentralDigitalPlatformClient`] | `CDP-Api-Key` header |
//! | `spotlight` | [`SpotlightApiClient`] and one client per workflow | signed query |
//! | `cyber_essentials` | [`CyberEssentialsClient`] | signed query |
//! | `data_insights` | [`DataInsightsApiClient`] | signed query |

pub mod antivirus;
pub mod central_digital_platform;
pub mod cyber_essentials;
pub mod data;
pub mod data_insights;
pub mod spotlight;
pub mod tasks;

pub use antivirus::AntivirusApiClient;
pub use central_digital_platform::CentralDigitalPlatformClient;
pub use cyber_essentials::CyberEssentialsClient;
pub use data::DataApiClient;
pub use data_insights::{DataInsightsApiClient, DataInsightsOptions};
pub use spotlight::{
    FvraMultipleCheckClient, FvraSingleCheckClient, FvraWarmUpClient, SignedWorkflowClient,
    SpotlightApiClient, SpotlightDunsClient, SpotlightOptions,
};
pub use tasks::TasksApiClient;
