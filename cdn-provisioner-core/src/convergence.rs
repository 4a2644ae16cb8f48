//! Convergence waiter
//!
//! Polls the propagation status of the latest change on an object at a fixed
//! interval until it completes, is denied, runs out of budget, or the caller
//! cancels.

use std::time::Duration;

use cdn_provisioner_client::{ChangeStatus, RemoteObjectClient};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{CoreError, CoreResult};

/// Outcome of a convergence wait that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// The change reached every edge server.
    Converged,
    /// The budget ran out while the change was still pending. It may still
    /// complete later.
    TimedOut,
    /// The wait was cancelled by the caller.
    Cancelled,
    /// No wait was requested.
    NotAwaited,
}

impl Convergence {
    pub fn is_converged(self) -> bool {
        self == Self::Converged
    }
}

/// Poll `client.fetch_status(key)` until the change settles.
///
/// Each pending poll consumes one `interval` of the `timeout` budget; when the
/// budget is exhausted the wait ends with [`Convergence::TimedOut`] without
/// sleeping again, so `interval == timeout` gives exactly one poll.
///
/// # Errors
///
/// - [`CoreError::Denied`] with the vendor message when the change is rejected
/// - [`CoreError::UnknownStatus`] for any status outside the known contract
/// - the client error when a status fetch fails
/// - [`CoreError::Validation`] for a zero interval
pub async fn await_convergence<C>(
    client: &C,
    key: &str,
    interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
) -> CoreResult<Convergence>
where
    C: RemoteObjectClient + ?Sized,
{
    if interval.is_zero() {
        return Err(CoreError::Validation(
            "convergence poll interval must be greater than zero".to_string(),
        ));
    }

    let api = client.api();
    let mut remaining = timeout;
    let mut polls: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            log::info!("[{api}] wait for {key} cancelled after {polls} polls");
            return Ok(Convergence::Cancelled);
        }

        let report = client.fetch_status(key).await?;
        polls += 1;

        match report.status {
            ChangeStatus::Complete => {
                log::info!("[{api}] change on {key} complete after {polls} polls");
                return Ok(Convergence::Converged);
            }
            ChangeStatus::Denied => {
                log::warn!("[{api}] change on {key} denied: {}", report.message);
                return Err(CoreError::Denied {
                    message: report.message,
                });
            }
            ChangeStatus::Pending => {
                remaining = remaining.saturating_sub(interval);
                if remaining.is_zero() {
                    log::warn!(
                        "[{api}] change on {key} still pending after {polls} polls, giving up"
                    );
                    return Ok(Convergence::TimedOut);
                }
                log::debug!(
                    "[{api}] change on {key} pending, {}s of budget left",
                    remaining.as_secs()
                );
                tokio::select! {
                    () = cancel.cancelled() => {
                        log::info!("[{api}] wait for {key} cancelled after {polls} polls");
                        return Ok(Convergence::Cancelled);
                    }
                    () = tokio::time::sleep(interval) => {}
                }
            }
            ChangeStatus::Unrecognized(status) => {
                log::error!("[{api}] unknown propagation status '{status}' for {key}");
                return Err(CoreError::UnknownStatus { status });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockDomainClient, report};
    use cdn_provisioner_client::ClientError;

    const SECS_1: Duration = Duration::from_secs(1);
    const SECS_5: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn converges_after_two_pending_polls() {
        let client = MockDomainClient::new();
        client
            .push_statuses([
                ChangeStatus::Pending,
                ChangeStatus::Pending,
                ChangeStatus::Complete,
            ])
            .await;

        let start = tokio::time::Instant::now();
        let outcome = await_convergence(&client, "d", SECS_1, SECS_5, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, Convergence::Converged);
        assert!(outcome.is_converged());
        assert_eq!(client.status_polls().await, 3);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn interval_equal_to_timeout_polls_once() {
        let client = MockDomainClient::new();
        client.push_statuses(vec![ChangeStatus::Pending; 6]).await;

        let outcome = await_convergence(&client, "d", SECS_5, SECS_5, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, Convergence::TimedOut);
        assert!(!outcome.is_converged());
        assert_eq!(client.status_polls().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn denied_carries_vendor_message() {
        let client = MockDomainClient::new();
        client
            .push_statuses([ChangeStatus::Pending, ChangeStatus::Pending])
            .await;
        client
            .push_report(Ok(report(ChangeStatus::Denied, "datacenter 3131 unknown")))
            .await;

        let budget = Duration::from_secs(60);
        let err = await_convergence(&client, "d", SECS_1, budget, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            CoreError::Denied { message } if message == "datacenter 3131 unknown"
        ));
        assert_eq!(client.status_polls().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_is_a_distinct_error() {
        let client = MockDomainClient::new();
        client
            .push_statuses([ChangeStatus::Unrecognized("WEIRD".to_string())])
            .await;

        let err = await_convergence(&client, "d", SECS_1, SECS_5, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(&err, CoreError::UnknownStatus { status } if status == "WEIRD"));
        assert!(!matches!(err, CoreError::Denied { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn status_fetch_error_aborts() {
        let client = MockDomainClient::new();
        client.push_statuses([ChangeStatus::Pending]).await;
        client
            .push_report(Err(ClientError::PermissionDenied {
                api: "gtm".to_string(),
                raw_message: None,
            }))
            .await;

        let err = await_convergence(&client, "d", SECS_1, SECS_5, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err.client_error(),
            Some(ClientError::PermissionDenied { .. })
        ));
        assert_eq!(client.status_polls().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_first_poll() {
        let client = MockDomainClient::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = await_convergence(&client, "d", SECS_1, SECS_5, &cancel)
            .await
            .unwrap();
        assert_eq!(outcome, Convergence::Cancelled);
        assert_eq!(client.status_polls().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_during_sleep_stops_polling() {
        let client = MockDomainClient::new();
        client.push_statuses(vec![ChangeStatus::Pending; 10]).await;
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            trigger.cancel();
        });

        let outcome = await_convergence(&client, "d", SECS_1, Duration::from_secs(60), &cancel)
            .await
            .unwrap();
        assert_eq!(outcome, Convergence::Cancelled);
        assert_eq!(client.status_polls().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_rejected() {
        let client = MockDomainClient::new();
        let err = await_convergence(&client, "d", Duration::ZERO, SECS_5, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(client.status_polls().await, 0);
    }
}
