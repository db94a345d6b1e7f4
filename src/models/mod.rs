pub mod artifact;
pub mod design;
pub mod diff;
pub mod serde_helpers;
pub mod version;
