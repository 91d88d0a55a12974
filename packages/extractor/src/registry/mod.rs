//! Holder registry for describing right holders and restriction beneficiaries.
//!
//! Every schema generation wraps a holder in a container whose element
//! children name the kind of party (`Person`, `Organization`, `individual`,
//! `legal_entity`, `public_formation`, ...). Handlers are registered per tag
//! name, so a new party kind is one handler plus one registration.

mod config;
mod core;
mod handler;
pub mod handlers;
mod types;

pub use config::create_holder_registry;
pub use core::SubjectRegistry;
pub use handler::SubjectHandler;
pub use types::{Subject, SubjectKind};
