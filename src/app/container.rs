use std::sync::Arc;

use crate::adapters::{HttpClipServiceAdapter, ServiceEndpoints, TracingLogAdapter};
use crate::app::{clip_requester::ClipRequester, metadata_resolver::MetadataResolver};
use crate::config_initialization::ClientSettings;
use crate::error::AppResult;
use crate::ports::{ClipServicePort, LogPort};

pub trait AppContainer: Send + Sync {
    fn metadata_resolver(&self) -> Arc<MetadataResolver>;
    fn clip_requester(&self) -> Arc<ClipRequester>;
}

pub struct DefaultAppContainer {
    metadata_resolver: Arc<MetadataResolver>,
    clip_requester: Arc<ClipRequester>,
}

impl DefaultAppContainer {
    /// Wire the HTTP and tracing adapters described by `settings`
    pub fn new(settings: &ClientSettings) -> AppResult<Self> {
        let service_port = Arc::new(HttpClipServiceAdapter::new(&ServiceEndpoints {
            base_url: settings.base_url.clone(),
            info_path: settings.info_path.clone(),
            clip_path: settings.clip_path.clone(),
            request_timeout: settings.request_timeout,
        })?);
        let log_port = Arc::new(TracingLogAdapter::new(settings.log_level));

        Ok(Self::with_ports(service_port, log_port))
    }

    /// Wire interactors around arbitrary port implementations
    pub fn with_ports(service_port: Arc<dyn ClipServicePort>, log_port: Arc<dyn LogPort>) -> Self {
        let metadata_resolver = Arc::new(MetadataResolver::new(
            Arc::clone(&service_port),
            Arc::clone(&log_port),
        ));

        let clip_requester = Arc::new(ClipRequester::new(
            Arc::clone(&service_port),
            Arc::clone(&log_port),
        ));

        Self {
            metadata_resolver,
            clip_requester,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn metadata_resolver(&self) -> Arc<MetadataResolver> {
        Arc::clone(&self.metadata_resolver)
    }

    fn clip_requester(&self) -> Arc<ClipRequester> {
        Arc::clone(&self.clip_requester)
    }
}
