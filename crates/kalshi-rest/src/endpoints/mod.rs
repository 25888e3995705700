//! API endpoint groups

pub mod communications;
pub mod events;
pub mod exchange;
pub mod live_data;
pub mod markets;
pub mod order_groups;
pub mod orders;
pub mod portfolio;

pub use communications::CommunicationsEndpoints;
pub use events::EventEndpoints;
pub use exchange::ExchangeEndpoints;
pub use live_data::LiveDataEndpoints;
pub use markets::MarketEndpoints;
pub use order_groups::OrderGroupEndpoints;
pub use orders::OrderEndpoints;
pub use portfolio::PortfolioEndpoints;
