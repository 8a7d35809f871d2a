//! # Presentations
//!
//! Decks assembled from experiment and metric slides, with theming and
//! display options. Slide options override the deck's options.

mod errors;
mod options;
mod store;
mod types;

pub use errors::{PresentationError, PresentationResult};
pub use options::{PresentationOptions, ResolvedOptions};
pub use store::PresentationStore;
pub use types::{CustomTheme, Presentation, Slide, SlideType};
