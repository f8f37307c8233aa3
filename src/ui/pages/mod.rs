pub mod market;
pub mod messages;
pub mod notifications;
pub mod sell;
pub mod settings;

pub use market::MarketPage;
pub use messages::MessagesPage;
pub use notifications::NotificationsPage;
pub use sell::SellPage;
pub use settings::SettingsPage;
