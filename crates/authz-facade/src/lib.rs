pub mod audit;
pub mod facade;

pub use audit::{AuditError, AuditRecord, AuditSink, TracingAuditSink};
pub use facade::AuthorizationFacade;
