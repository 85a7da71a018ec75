//! Collaborator seams consumed by the scheduler and the dashboard.

pub mod identity;
pub mod plan;
pub mod templates;
pub mod transport;

pub use identity::IdentityProvider;
pub use plan::PlanSource;
pub use templates::TemplateStore;
pub use transport::SendTransport;
