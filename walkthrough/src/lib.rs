//! walkthrough: guided product tours for web applications
//!
//! Dims the page, cuts a spotlight around a target element and shows a
//! popover per step. This crate owns the state; your UI layer renders it and
//! forwards clicks back as [`Intent`]s.
//!
//! # Example
//! ```ignore
//! use walkthrough::prelude::*;
//!
//! let engine = Engine::builder()
//!     .resolver(Arc::new(|selector: &str| dom.bounding_rect(selector)))
//!     .viewport(window.clone())
//!     .store(Arc::new(JsonFileStore::open("tours.json")?))
//!     .build();
//!
//! if !engine.is_completed("onboarding") {
//!     engine.start(TutorialConfig::from_json(ONBOARDING)?).await?;
//! }
//! ```

// Re-export everything from core
pub use walkthrough_core::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use walkthrough_core::prelude::*;
}
