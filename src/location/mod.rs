use std::fmt;

use async_trait::async_trait;

use crate::model::Permission;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters, when the source knows it.
    pub accuracy: Option<f64>,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)?;
        if let Some(accuracy) = self.accuracy {
            write!(f, " (±{:.0} m)", accuracy)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("position unavailable")]
    Unavailable,
}

#[async_trait]
pub trait Locator: Send + Sync {
    async fn request_foreground_permission(&self) -> Result<Permission, LocationError>;
    async fn current_position(&self) -> Result<Position, LocationError>;
}

/// Position known up front. Without one, permission is never granted.
pub struct FixedLocator {
    position: Option<Position>,
}

impl FixedLocator {
    pub fn new(position: Option<Position>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn request_foreground_permission(&self) -> Result<Permission, LocationError> {
        Ok(if self.position.is_some() { Permission::Granted } else { Permission::Denied })
    }

    async fn current_position(&self) -> Result<Position, LocationError> {
        self.position.ok_or(LocationError::Unavailable)
    }
}

/// One best-effort lookup; denial and errors only end up in the log.
pub async fn locate(locator: &dyn Locator) -> Option<Position> {
    match locator.request_foreground_permission().await {
        Ok(Permission::Granted) => {}
        Ok(Permission::Denied) => {
            log::info!("location permission not granted");
            return None;
        }
        Err(e) => {
            log::error!("error on requesting location permission: {}", e);
            return None;
        }
    }
    match locator.current_position().await {
        Ok(position) => {
            log::debug!("current position: {}", position);
            Some(position)
        }
        Err(e) => {
            log::error!("error on getting location: {}", e);
            None
        }
    }
}
