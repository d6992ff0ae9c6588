//! Data layer: feed points, per-date slices, universe files, and the
//! collaborator contracts the host provides.

pub mod feed;
pub mod point;
pub mod slice;
pub mod universe;

pub use feed::{EquitySubscriber, FeedRegistrar, HistoryError, HistoryProvider, SubscribeError};
pub use point::{load_points, read_points, ParseError, WikiViews, DATA_COLUMNS};
pub use slice::DataSlice;
pub use universe::{load_universe, read_universe, UniverseFilter, UniverseRow, UNIVERSE_COLUMNS};
