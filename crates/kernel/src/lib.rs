//! Settings and shell navigation shared by every Bookshelf crate.

pub mod route;
pub mod settings;

pub use route::Route;
pub use settings::Settings;
