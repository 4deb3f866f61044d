//! Order dispatch port.

use crate::domain::error::SigtraderError;
use crate::domain::order::OrderRequest;

/// Forwards orders to a broker. Retrying is the implementation's concern.
pub trait OrderPort {
    fn submit(&self, order: &OrderRequest) -> Result<(), SigtraderError>;
}
