//! Per-track request dispatch.
//!
//! [`RequestDispatcher::dispatch`] validates the credential and the track's
//! artist and title, then registers the request with the album and hands it
//! to the transport. It never waits on the network.

use std::sync::Arc;

use tracing::{error, info};

use super::PLUGIN_NAME;
use super::domain::{DispatchError, DispatchOutcome, LookupContext, LyricRequest, Priority};
use super::traits::Transport;
use crate::album::Album;
use crate::config::{APIKEY_SETTING, CredentialStore, ServiceConfig};
use crate::metadata::{Field, SharedMetadata};

/// Issues one lyrics lookup per track.
pub struct RequestDispatcher {
    credentials: Arc<dyn CredentialStore>,
    transport: Arc<dyn Transport>,
    host: String,
    port: u16,
}

/// Values read from the credential store and the track for one request.
struct Prepared {
    apikey: String,
    artist: String,
    title: String,
}

impl RequestDispatcher {
    /// Dispatcher targeting the public Apiseeds endpoint.
    pub fn new(credentials: Arc<dyn CredentialStore>, transport: Arc<dyn Transport>) -> Self {
        Self::with_service(credentials, transport, &ServiceConfig::default())
    }

    /// Dispatcher targeting the endpoint in `service`.
    pub fn with_service(
        credentials: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
        service: &ServiceConfig,
    ) -> Self {
        Self {
            credentials,
            transport,
            host: service.host.clone(),
            port: service.port,
        }
    }

    /// Look up lyrics for the track in `metadata`.
    ///
    /// On a failed precondition nothing is sent and the album is left
    /// untouched. Otherwise the album's in-flight counter goes up by one
    /// and comes back down when the transport completes the request.
    pub fn dispatch(&self, album: &Arc<Album>, metadata: &SharedMetadata) -> DispatchOutcome {
        let prepared = match self.prepare(metadata) {
            Ok(prepared) => prepared,
            Err(e) => {
                error!("{}: {}", PLUGIN_NAME, e);
                return DispatchOutcome::Skipped(e);
            }
        };

        let request = LyricRequest::lookup(
            self.host.as_str(),
            self.port,
            prepared.artist,
            prepared.title,
            prepared.apikey,
        )
        .with_priority(Priority::High);

        let guard = album.begin_request();
        // The key stays out of the log
        info!("{}: GET {}?apikey=***", PLUGIN_NAME, request.encoded_path());

        let context = LookupContext::new(guard, Arc::clone(metadata));
        self.transport.send(request, context);
        DispatchOutcome::Dispatched
    }

    fn prepare(&self, metadata: &SharedMetadata) -> Result<Prepared, DispatchError> {
        let apikey = self
            .credentials
            .get(APIKEY_SETTING)
            .ok_or(DispatchError::MissingApiKey)?;

        // Read once, release before sending: a transport may complete inline
        let track = metadata.lock();
        let artist = track
            .get(Field::Artist)
            .ok_or(DispatchError::MissingArtist)?
            .to_string();
        let title = track
            .get(Field::Title)
            .ok_or(DispatchError::MissingTitle)?
            .to_string();

        Ok(Prepared {
            apikey,
            artist,
            title,
        })
    }
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
