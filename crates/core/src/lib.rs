pub mod auth;
pub mod codec;
pub mod config;
pub mod domain;
pub mod errors;
pub mod render;
pub mod sequence;
pub mod totals;

pub use auth::{hash_password, verify_password, AuthError, Claims, TokenService};
pub use codec::{CodecOptions, TaxDefaults};
pub use domain::client::{Client, ClientId};
pub use domain::manifest::{DeliveryManifest, ManifestId, ManifestItem, ManifestStatus};
pub use domain::proposal::{
    ChecklistField, LineItem, PaymentTerms, ProposalForm, ProposalId, ProposalRecord,
    ProposalStatus, ReferenceDocuments, TaxBlock, Transport, TransportMode,
};
pub use domain::user::{Perfil, User, UserId, UserInput};
pub use errors::{ApplicationError, DomainError};
pub use render::{DocumentArtifact, DocumentFormat, DocumentRenderer, RenderError};
pub use sequence::{next_proposal_number, next_revision, NumberingOptions};
pub use totals::{grand_total, line_total};
