//! Batch uploads across an endpoint pool.
//!
//! Payload `i` of a batch is sent to endpoint `i mod pool.len()`. Skipped
//! payloads keep their batch position, so they never shift the endpoint of
//! the payloads after them.

use futures_util::future::join_all;
use tracing::{debug, info};

use skyhaul_protocol::CommandClass;

use crate::endpoint::{Endpoint, EndpointPool};
use crate::error::HighwayError;
use crate::payload::Payload;
use crate::session::TransferSession;

/// Pairs every payload that needs uploading with its endpoint.
///
/// Returns `(batch_index, endpoint)` for each non-skipped payload.
///
/// # Panics
///
/// Panics if `pool` is empty while at least one payload needs uploading.
pub fn plan(pool: &EndpointPool, payloads: &[Payload]) -> Vec<(usize, Endpoint)> {
    payloads
        .iter()
        .enumerate()
        .filter(|(_, p)| p.needs_upload())
        .map(|(i, _)| (i, pool.assign(i)))
        .collect()
}

/// Fans payload batches out over transfer sessions.
#[derive(Clone, Default)]
pub struct Uploader {
    session: TransferSession,
}

impl Uploader {
    pub fn new(session: TransferSession) -> Self {
        Self { session }
    }

    /// Uploads every payload of the batch concurrently and waits for all
    /// sessions to conclude.
    ///
    /// # Panics
    ///
    /// Panics if `pool` is empty while at least one payload needs uploading.
    pub async fn upload_batch(
        &self,
        account: u64,
        pool: &EndpointPool,
        payloads: &[Payload],
        command: CommandClass,
    ) {
        let assignments = plan(pool, payloads);
        if assignments.is_empty() {
            debug!(batch = payloads.len(), "nothing to upload");
            return;
        }

        info!(
            batch = payloads.len(),
            sessions = assignments.len(),
            endpoints = pool.len(),
            ?command,
            "starting highway uploads"
        );

        let sessions = assignments.into_iter().map(|(index, endpoint)| {
            self.session
                .transfer(account, endpoint, &payloads[index], command)
        });
        join_all(sessions).await;

        debug!(batch = payloads.len(), "highway uploads concluded");
    }

    /// Uploads chat images, spread over the whole endpoint pool.
    ///
    /// `addresses[i]` and `ports[i]` describe endpoint `i`.
    pub async fn upload_images(
        &self,
        account: u64,
        addresses: &[u32],
        ports: &[u16],
        images: &[Payload],
    ) -> Result<(), HighwayError> {
        let pool = EndpointPool::from_parallel(addresses, ports)?;
        self.upload_batch(account, &pool, images, CommandClass::Image)
            .await;
        Ok(())
    }

    /// Uploads a forwarded-message bundle to the first endpoint.
    ///
    /// # Panics
    ///
    /// Panics if no endpoint is given.
    pub async fn upload_group_message(
        &self,
        account: u64,
        addresses: &[u32],
        ports: &[u16],
        message: &Payload,
    ) -> Result<(), HighwayError> {
        let pool = EndpointPool::from_parallel(addresses, ports)?;
        self.session
            .transfer(account, pool.first(), message, CommandClass::GroupMessage)
            .await;
        Ok(())
    }
}
