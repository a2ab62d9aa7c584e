pub mod toml_loader;

pub use toml_loader::{load_layout_toml, load_profile_toml, profile_path};
