pub mod credentials;
pub mod login_service;
pub mod training_path_service;

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

use crate::database::manager::DatabaseError;

pub use login_service::{LoginError, LoginService};
pub use training_path_service::{TrainingPathError, TrainingPathService};

/// Failure of a single store round-trip made by a service
#[derive(Debug, Error)]
pub enum StoreCallError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: &'static str, after: Duration },
}

/// Runs one store call under `deadline`, logging any failure against `operation`.
pub(crate) async fn store_call<T, F>(
    operation: &'static str,
    deadline: Duration,
    call: F,
) -> Result<T, StoreCallError>
where
    F: Future<Output = Result<T, DatabaseError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            error!(operation, error = %err, "store call failed");
            Err(err.into())
        }
        Err(_) => {
            error!(operation, ?deadline, "store call timed out");
            Err(StoreCallError::Timeout { operation, after: deadline })
        }
    }
}
