//! Title sources for marquee.
//!
//! Each submodule wraps a single external source and implements the
//! [`TitleProvider`] trait; the registry queries them in priority order and
//! absorbs their failures.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition.
//! - [`tmdb`] -- TMDB REST API provider.
//! - [`imdb`] -- IMDb search-page scraper.
//! - [`rotten`] -- Rotten Tomatoes browse-grid scraper.
//! - [`registry`] -- Ordered multi-source fetch with failure absorption.

pub mod imdb;
pub mod provider;
pub mod registry;
pub mod rotten;
pub mod tmdb;

pub use imdb::ImdbProvider;
pub use provider::TitleProvider;
pub use registry::SourceRegistry;
pub use rotten::RottenProvider;
pub use tmdb::TmdbProvider;
