//! Where a list controller gets its records.

use std::future::Future;

use crate::gateway::{Gateway, GatewayError};
use crate::resources::Resource;

/// Supplies the complete collection for one resource in a single call.
pub trait ListSource<R: Resource>: Send + Sync {
    /// Fetch every record, in server order.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<R>, GatewayError>> + Send;
}

impl<R: Resource> ListSource<R> for Gateway {
    async fn fetch_all(&self) -> Result<Vec<R>, GatewayError> {
        self.fetch_collection(R::LIST_PATH, R::COLLECTION_KEY).await
    }
}
