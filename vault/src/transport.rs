//! Response handling shared by the token and key calls.

use crate::error::Cause;
use reqwest::Response;
use serde::de::DeserializeOwned;

/// Turn a response into `T`, failing on non-2xx status or a bad body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, Cause> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Cause::Status {
            status,
            body: body.trim().to_string(),
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
