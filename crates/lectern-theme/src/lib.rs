//! Themes for lectern sites.
//!
//! A [`Theme`] turns a [`PageContext`] into a complete HTML document. The
//! [`DefaultTheme`] ships templates for every slot; an [`ExtendedTheme`]
//! wraps another theme and substitutes only its layout.

pub mod context;
pub mod default;
pub mod extended;
pub mod resolve;
pub mod traits;

pub use context::{logo_asset, Attr, HeadTag, PageContext, PageLink, SidebarSection, SocialItem};
pub use default::{DefaultTheme, LAYOUT_TEMPLATE};
pub use extended::ExtendedTheme;
pub use resolve::resolve_theme;
pub use traits::{Slots, Theme, ThemeError};
