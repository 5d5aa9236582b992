//! One-shot device position lookup behind a foreground permission check.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{error::LocationError, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Host location service.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    /// May wait for the user to answer a prompt.
    async fn request_foreground_permission(&self) -> Result<PermissionStatus, LocationError>;

    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    provider: Arc<dyn LocationProvider>,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self { provider }
    }

    /// Ask for permission, then take a single position reading.
    pub async fn current_coordinates(&self) -> Result<Coordinates, LocationError> {
        match self.provider.request_foreground_permission().await? {
            PermissionStatus::Granted => {}
            PermissionStatus::Denied => {
                tracing::info!("Location permission denied");
                return Err(LocationError::PermissionDenied);
            }
        }

        let position = self.provider.current_position().await?;
        if !position.is_valid() {
            return Err(LocationError::InvalidPosition);
        }

        tracing::debug!("Current position: {position}");
        Ok(position)
    }
}
