pub mod alert;
pub mod app_view;
pub mod banner;
pub mod map_panel;
pub mod search_bar;
pub mod weather_card;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use alert::{AlertModal, AlertModalProps};
pub use app_view::{AppView, AppViewProps};
pub use banner::{Banner, BannerProps};
pub use map_panel::{EMPTY_POPUP, MARKER, MapPanel, MapPanelProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use weather_card::{WeatherCard, WeatherCardProps, capitalize_words};
