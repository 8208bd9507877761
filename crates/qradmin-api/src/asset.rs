// Anonymous asset download
//
// QR images and uploaded documents are served from pre-signed or public
// URLs. These requests never carry the admin token.

use tracing::debug;
use url::Url;

use crate::client::AdminClient;
use crate::error::Error;

impl AdminClient {
    /// Fetch the raw bytes behind an asset URL.
    ///
    /// Any non-2xx status is reported as [`Error::Asset`].
    pub async fn download_asset(&self, url: &Url) -> Result<Vec<u8>, Error> {
        debug!(%url, "GET asset");

        let resp = self.http().get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Asset {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        debug!(%url, len = bytes.len(), "asset downloaded");
        Ok(bytes.to_vec())
    }
}
