//! Background submissions so the UI loop never waits on the network.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::core::client::{EndpointClient, RequestFailure};
use crate::core::controller::Submission;

pub type SubmitOutcome = Result<Value, RequestFailure>;

/// Send one submission on its own task.  The outcome comes back over `tx`;
/// if the loop has already exited the send fails silently.
pub fn spawn_submission(
    tx: mpsc::UnboundedSender<SubmitOutcome>,
    client: EndpointClient,
    submission: Submission,
) {
    tokio::spawn(async move {
        let outcome = submission.send(&client).await;
        let _ = tx.send(outcome);
    });
}
