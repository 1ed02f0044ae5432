use std::sync::Arc;

use crate::adapters::{AppConfig, FfprobeAdapter, LocalFsAdapter, ProcessToolAdapter};
use crate::app::{
    clean_interactor::CleanInteractor, merge_interactor::MergeInteractor,
    trim_interactor::TrimInteractor,
};
use crate::ports::{FsPort, ProbePort, ToolPort};

pub trait AppContainer: Send + Sync {
    fn trim_interactor(&self) -> Arc<TrimInteractor>;
    fn merge_interactor(&self) -> Arc<MergeInteractor>;
    fn clean_interactor(&self) -> Arc<CleanInteractor>;
}

pub struct DefaultAppContainer {
    trim_interactor: Arc<TrimInteractor>,
    merge_interactor: Arc<MergeInteractor>,
    clean_interactor: Arc<CleanInteractor>,
}

impl DefaultAppContainer {
    /// Wire process, probe and filesystem adapters from configuration
    pub fn new(config: &AppConfig) -> Self {
        let tool_port: Arc<dyn ToolPort> = Arc::new(ProcessToolAdapter::new(
            config.tools.engine_dir.clone(),
            config.tool_timeout(),
        ));
        let fs_port: Arc<dyn FsPort> = Arc::new(LocalFsAdapter::new());
        Self::with_ports(config, tool_port, fs_port)
    }

    /// Wire interactors around caller-supplied tool and filesystem ports
    pub fn with_ports(
        config: &AppConfig,
        tool_port: Arc<dyn ToolPort>,
        fs_port: Arc<dyn FsPort>,
    ) -> Self {
        let probe_port: Arc<dyn ProbePort> = Arc::new(FfprobeAdapter::new(Arc::clone(&tool_port)));
        let retry = config.retry_policy();

        let trim_interactor = Arc::new(TrimInteractor::new(
            Arc::clone(&tool_port),
            probe_port,
            Arc::clone(&fs_port),
            config.encode_settings(),
            retry,
        ));

        let merge_interactor = Arc::new(MergeInteractor::new(
            Arc::clone(&tool_port),
            Arc::clone(&fs_port),
            retry,
        ));

        let clean_interactor = Arc::new(CleanInteractor::new(tool_port, fs_port, retry));

        Self {
            trim_interactor,
            merge_interactor,
            clean_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn trim_interactor(&self) -> Arc<TrimInteractor> {
        Arc::clone(&self.trim_interactor)
    }

    fn merge_interactor(&self) -> Arc<MergeInteractor> {
        Arc::clone(&self.merge_interactor)
    }

    fn clean_interactor(&self) -> Arc<CleanInteractor> {
        Arc::clone(&self.clean_interactor)
    }
}
