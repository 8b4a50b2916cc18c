// stackup-core - Stack lifecycle logic
//
// Everything between "parsed arguments" and "remote call":
// parameter decoding, template validation, existence checks,
// create/update/delete with waiters, and the deploy policy that ties them
// together. The remote service is reached only through `api::StackApi`, so
// this crate has no SDK and no runtime of its own.

pub mod api;
pub mod deploy;
pub mod error;
pub mod inspect;
pub mod lifecycle;
pub mod parameters;
pub mod validate;

// Re-export commonly used types
pub use api::{
    StackApi, StackRequest, StackStatus, StackSummary, TemplateParameter, TemplateSummary,
    WaitTarget,
};
pub use deploy::{DeployRequest, Deployer, Outcome};
pub use error::{ApiError, ApiErrorKind, ParameterError, StackError, NO_UPDATES_MESSAGE};
pub use lifecycle::StackWaiter;
pub use parameters::{encode_parameters, parse_parameters, Parameter};
pub use validate::TemplateCheck;
