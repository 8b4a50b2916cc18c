//! Remote template validation, the gate in front of every mutation

use crate::api::{StackApi, TemplateSummary};
use crate::error::ApiError;
use tracing::{error, info};

/// Result of asking the service about a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateCheck {
    Valid(TemplateSummary),
    Rejected { reason: String },
}

impl TemplateCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, TemplateCheck::Valid(_))
    }
}

/// Validate the template at `template_url`.
///
/// A service-side rejection is reported as [`TemplateCheck::Rejected`];
/// failures that never reached the service are returned as errors.
pub async fn validate_template(
    api: &dyn StackApi,
    template_url: &str,
) -> Result<TemplateCheck, ApiError> {
    match api.validate_template(template_url).await {
        Ok(summary) => {
            info!("template parameters : {:?}", summary.parameter_keys());
            if !summary.capabilities.is_empty() {
                info!(
                    "template requires capabilities {:?}: {}",
                    summary.capabilities,
                    summary.capabilities_reason.as_deref().unwrap_or("no reason given")
                );
            }
            Ok(TemplateCheck::Valid(summary))
        }
        Err(err) if err.is_service() => {
            info!("template validation error : {}", err.message);
            error!("{}", err);
            Ok(TemplateCheck::Rejected {
                reason: err.message,
            })
        }
        Err(err) => Err(err),
    }
}
