//! Object storage service (`objectstorage` endpoint)

pub mod bucket;

use crate::api::Client;

impl Client {
    pub fn buckets(&self) -> bucket::BucketsApi<'_> {
        bucket::BucketsApi::new(self)
    }
}
