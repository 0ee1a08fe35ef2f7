//! CLI command implementations

pub mod batch;
pub mod cache;
pub mod check;
pub mod config;
pub mod fingerprint;
pub mod mark;

pub use batch::execute as batch;
pub use cache::execute as cache;
pub use check::execute as check;
pub use config::execute as config;
pub use fingerprint::execute as fingerprint;
pub use mark::execute as mark;
