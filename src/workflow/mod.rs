pub mod exclusion;
pub mod form_navigator;
pub mod listing_ctx;
pub mod listing_iterator;

pub use exclusion::ExclusionFilter;
pub use form_navigator::{FormNavigator, NavigatorSettings};
pub use listing_ctx::ListingCtx;
pub use listing_iterator::ListingIterator;
