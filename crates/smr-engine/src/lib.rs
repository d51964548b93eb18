//! Smart Replacement Engine
//!
//! The pure, synchronous half of smart replace. Everything in this crate is a
//! deterministic computation over in-memory values:
//!
//! - **Parse**: free-text instructions into typed [`Operation`]s
//! - **Transform**: deep, entity-aware rewriting of an [`Entry`] tree
//! - **Resolve**: named-field updates through alias groups
//! - **Score**: confidence for AI-produced replacement suggestions
//! - **Validate**: brand-style compliance of candidate text
//!
//! # Architecture
//!
//! ```text
//! command text → parser → [Operation] → scorer / validator → transform + fields → Entry'
//!                                              ↑
//!                                      BrandStyleProfile
//! ```
//!
//! # Example
//!
//! ```rust
//! use smr_engine::{deep_replace, parse};
//! use serde_json::json;
//!
//! let command = parse(r#"replace "Acme" with "Globex""#);
//! assert!(command.is_valid);
//!
//! let entry = json!({"uid": "e1", "title": "Acme quarterly report"});
//! let updated = deep_replace(&entry, "Acme", "Globex").unwrap();
//! assert_eq!(updated["title"], "Globex quarterly report");
//! assert_eq!(updated["uid"], "e1");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod compliance;
pub mod entities;
pub mod entry;
pub mod error;
pub mod fields;
pub mod operation;
pub mod parser;
pub mod scoring;
pub mod transform;

// Re-exports for convenience
pub use compliance::{
    validate, BrandStyleProfile, ComplianceValidator, ComplianceVerdict, HeuristicComplianceValidator,
};
pub use entities::{EntityKind, EntityRecognizer, HeuristicEntities, LinkMatch};
pub use entry::{collect_text, Entry, ProtectedFields};
pub use error::{ComplianceError, EngineError, ValidationError};
pub use fields::{
    apply_field_updates, apply_field_updates_with_report, FieldResolution, FieldResolver,
    FieldUpdateReport,
};
pub use operation::{Operation, ParsedCommand};
pub use parser::{parse, CommandParser};
pub use scoring::{score, MAX_SCORE, MIN_SCORE, SHORT_SUGGESTION_SCORE};
pub use transform::{deep_replace, DeepReplacer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the engine
    pub use crate::compliance::{BrandStyleProfile, ComplianceValidator, ComplianceVerdict};
    pub use crate::entry::{Entry, ProtectedFields};
    pub use crate::error::{ComplianceError, EngineError, ValidationError};
    pub use crate::operation::{Operation, ParsedCommand};
    pub use crate::transform::DeepReplacer;
    pub use crate::{apply_field_updates, deep_replace, parse, score, validate};
}
