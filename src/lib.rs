//! Client for the Knowledge Forum 6 REST API
//!
//! ```rust,no_run
//! use kf6_client::Session;
//!
//! # async fn example() -> kf6_client::Result<()> {
//! let mut session = Session::login("https://kf6.ikit.org", "alice", "secret").await?;
//!
//! for community in session.communities().await? {
//!     println!("{} {}", community.id, community.title);
//! }
//!
//! let notes = session.notes_from_view("community-id", "view-id").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{Community, Link, LinkType, Note, View};
pub use session::Session;
pub use store::ContributionStore;
pub use transport::{HttpTransport, Response, Transport};
