//! The interface the hosting runtime drives
//!
//! The runtime calls [`Solver::initialize`] once, then any number of
//! [`Solver::present`] and [`Solver::clean_up`] calls, possibly concurrently
//! for different challenges.

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::challenge::ChallengeRequest;

/// A DNS-01 challenge solver
#[async_trait]
pub trait Solver: Send + Sync {
    /// Ambient configuration passed to [`Solver::initialize`]
    type ClusterConfig: Send;

    /// Constant identifier used for registration with the runtime
    fn name(&self) -> &'static str;

    /// Build clients from the ambient cluster configuration
    ///
    /// Must succeed before `present` or `clean_up` are called.
    fn initialize(
        &mut self,
        cluster: Self::ClusterConfig,
        stop: Option<oneshot::Receiver<()>>,
    ) -> Result<(), crate::Error>;

    /// Publish the TXT record for a challenge
    async fn present(&self, request: &ChallengeRequest) -> Result<(), crate::Error>;

    /// Remove the TXT record for a challenge
    async fn clean_up(&self, request: &ChallengeRequest) -> Result<(), crate::Error>;
}
