use async_trait::async_trait;
use inquire::{Confirm, InquireError};
use weatherfav_core::{Coordinates, LocationError, LocationProvider, PermissionStatus};

/// Terminal stand-in for a device location service: permission is a yes/no
/// prompt and the position comes from flags or the configured home.
#[derive(Debug, Clone)]
pub struct PromptLocation {
    position: Option<Coordinates>,
    assume_yes: bool,
}

impl PromptLocation {
    pub fn new(position: Option<Coordinates>, assume_yes: bool) -> Self {
        Self { position, assume_yes }
    }
}

#[async_trait]
impl LocationProvider for PromptLocation {
    async fn request_foreground_permission(&self) -> Result<PermissionStatus, LocationError> {
        if self.assume_yes {
            return Ok(PermissionStatus::Granted);
        }

        let answer = tokio::task::spawn_blocking(|| {
            Confirm::new("Allow weatherfav to use your location?")
                .with_default(false)
                .prompt()
        })
        .await
        .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        permission_from_answer(answer)
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.position.ok_or_else(|| {
            LocationError::Unavailable(
                "no position known; pass --lat/--lon or set `home` in the config file".to_string(),
            )
        })
    }
}

/// A dismissed prompt counts as a refusal.
fn permission_from_answer(
    answer: Result<bool, InquireError>,
) -> Result<PermissionStatus, LocationError> {
    match answer {
        Ok(true) => Ok(PermissionStatus::Granted),
        Ok(false)
        | Err(InquireError::OperationCanceled)
        | Err(InquireError::OperationInterrupted) => Ok(PermissionStatus::Denied),
        Err(e) => Err(LocationError::Unavailable(e.to_string())),
    }
}
