pub mod api;
pub mod de;
pub mod error;
pub mod source;
pub mod store;
pub mod text;
