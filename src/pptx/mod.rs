//! Presentation-archive parsing.
//!
//! This module turns an opened OPC container into the [`Presentation`]
//! model: it locates the main part, resolves the slide list, builds the
//! theme/color-map/placeholder tables, and extracts every slide against
//! them. Entry points are [`package::open`] and [`package::from_bytes`],
//! normally reached through [`Presentation::open`] and
//! [`Presentation::from_bytes`].
//!
//! [`Presentation`]: crate::presentation::Presentation
//! [`Presentation::open`]: crate::presentation::Presentation::open
//! [`Presentation::from_bytes`]: crate::presentation::Presentation::from_bytes

pub mod background;
pub mod color;
pub mod colormap;
pub mod media;
pub mod metadata;
pub mod package;
pub mod placeholder;
pub mod shape;
pub mod slide;
pub mod text;
pub mod theme;

pub use color::{ColorContext, ColorRef};
pub use colormap::ColorMap;
pub use media::{MediaAsset, MediaRegistry};
pub use metadata::Metadata;
pub use placeholder::{PlaceholderStyle, PlaceholderTable};
pub use theme::Theme;
