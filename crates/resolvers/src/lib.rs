//! Live playback URL resolution for third-party streaming platforms.
//!
//! Each supported platform gets a [`PlatformResolver`] implementation that
//! fetches the channel page, pulls the OpenGraph metadata into a
//! [`ChannelRecord`] appended to the run's [`ChannelRegistry`], and produces
//! either a live playback URL or an offline outcome that callers substitute
//! with [`FALLBACK_URL`].

pub mod error;
pub mod factory;
pub mod platforms;
pub mod registry;
pub mod resolver;

mod default;
mod utils;

pub use default::default_client;
pub use error::ResolverError;
pub use factory::ResolverFactory;
pub use registry::{ChannelIdentity, ChannelRecord, ChannelRegistry};
pub use resolver::{FALLBACK_URL, PlatformResolver, Resolution, Resolver};
