pub mod chromium_driver;
pub mod driver;
pub mod layout;

pub use chromium_driver::ChromiumDriver;
pub use driver::{Condition, DiagnosticRef, Selector, UiDriver};
pub use layout::SiteLayout;
