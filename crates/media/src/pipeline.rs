use std::collections::VecDeque;
use std::sync::Arc;

use image::RgbaImage;
use scrubline_state::config::ThumbnailConfig;
use scrubline_state::thumbnail::{ThumbnailDescriptor, ThumbnailKey};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::decode::{decode_segment, ThumbnailImage};
use crate::error::ThumbnailError;
use crate::fetch::{SegmentFetcher, SegmentRequest, ThumbnailResolver};
use crate::track::ImageTrack;

/// What the preview should do after a pipeline result lands.
#[derive(Debug)]
pub enum PreviewUpdate {
    /// The latest request resolved; lay the preview out for it.
    Show(ThumbnailDescriptor),
    /// The latest request has nothing to show.
    Hide,
    /// The displayed image was replaced or cleared.
    ImageChanged,
    Failed(ThumbnailError),
}

enum TaskResult {
    Resolved {
        request_id: u64,
        track: ImageTrack,
        descriptor: Option<ThumbnailDescriptor>,
    },
    Fetched {
        fetch_id: u64,
        result: Result<RgbaImage, ThumbnailError>,
    },
}

/// A spawned resolve or fetch. Dropping it aborts the task.
pub struct PendingTask {
    id: u64,
    handle: JoinHandle<()>,
}

impl PendingTask {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for PendingTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Resolves, fetches, decodes and caches the preview image.
///
/// At most one resolve and one fetch are in flight. Starting either drops the
/// previous one, and results are matched against the id of the task still
/// pending, so a superseded request can never replace the displayed image.
pub struct ThumbnailPipeline {
    runtime: Handle,
    resolver: Arc<dyn ThumbnailResolver>,
    fetcher: Arc<dyn SegmentFetcher>,
    config: ThumbnailConfig,
    results_tx: mpsc::UnboundedSender<TaskResult>,
    results_rx: mpsc::UnboundedReceiver<TaskResult>,
    queued: VecDeque<PreviewUpdate>,
    next_id: u64,
    pending_resolve: Option<PendingTask>,
    pending_fetch: Option<PendingTask>,
    last_key: Option<ThumbnailKey>,
    descriptor: Option<ThumbnailDescriptor>,
    displayed: Option<ThumbnailImage>,
    fetches_started: u64,
}

impl ThumbnailPipeline {
    pub fn new(
        runtime: Handle,
        resolver: Arc<dyn ThumbnailResolver>,
        fetcher: Arc<dyn SegmentFetcher>,
        config: ThumbnailConfig,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            resolver,
            fetcher,
            config,
            results_tx,
            results_rx,
            queued: VecDeque::new(),
            next_id: 0,
            pending_resolve: None,
            pending_fetch: None,
            last_key: None,
            descriptor: None,
            displayed: None,
            fetches_started: 0,
        }
    }

    pub fn displayed(&self) -> Option<&ThumbnailImage> {
        self.displayed.as_ref()
    }

    pub fn descriptor(&self) -> Option<&ThumbnailDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// A resolve or fetch is in flight, or results are waiting to be polled.
    pub fn has_pending_work(&self) -> bool {
        self.pending_resolve.is_some() || self.pending_fetch.is_some() || !self.queued.is_empty()
    }

    pub fn fetches_started(&self) -> u64 {
        self.fetches_started
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Asks for the thumbnail of `track` at `time`, superseding any earlier request.
    pub fn request(&mut self, track: &ImageTrack, time: f64) {
        let request_id = self.next_id();
        self.pending_resolve = None;

        let resolver = Arc::clone(&self.resolver);
        let tx = self.results_tx.clone();
        let track = track.clone();
        let handle = self.runtime.spawn(async move {
            let descriptor = resolver.thumbnail(track.id, time).await;
            let _ = tx.send(TaskResult::Resolved {
                request_id,
                track,
                descriptor,
            });
        });
        self.pending_resolve = Some(PendingTask {
            id: request_id,
            handle,
        });
    }

    /// Aborts in-flight work and forgets the cached thumbnail.
    pub fn clear(&mut self) {
        self.pending_resolve = None;
        self.pending_fetch = None;
        self.last_key = None;
        self.descriptor = None;
        self.displayed = None;
        self.queued.clear();
        while self.results_rx.try_recv().is_ok() {}
    }

    /// Applies every finished task without waiting.
    pub fn poll(&mut self) -> Vec<PreviewUpdate> {
        while let Ok(result) = self.results_rx.try_recv() {
            self.apply(result);
        }
        self.queued.drain(..).collect()
    }

    /// Waits for the next update.
    pub async fn next_update(&mut self) -> Option<PreviewUpdate> {
        loop {
            if let Some(update) = self.queued.pop_front() {
                return Some(update);
            }
            let result = self.results_rx.recv().await?;
            self.apply(result);
        }
    }

    fn apply(&mut self, result: TaskResult) {
        match result {
            TaskResult::Resolved {
                request_id,
                track,
                descriptor,
            } => self.apply_resolved(request_id, &track, descriptor),
            TaskResult::Fetched { fetch_id, result } => self.apply_fetched(fetch_id, result),
        }
    }

    fn apply_resolved(
        &mut self,
        request_id: u64,
        track: &ImageTrack,
        descriptor: Option<ThumbnailDescriptor>,
    ) {
        if self.pending_resolve.as_ref().map(PendingTask::id) != Some(request_id) {
            debug!(target: "thumbnails", request_id, "dropping stale resolve");
            return;
        }
        self.pending_resolve = None;

        let Some(descriptor) = descriptor else {
            self.queued.push_back(PreviewUpdate::Hide);
            return;
        };
        let Some(key) = descriptor.key() else {
            self.queued.push_back(PreviewUpdate::Hide);
            return;
        };

        self.descriptor = Some(descriptor.clone());
        if self.last_key.as_ref() == Some(&key) {
            self.queued.push_back(PreviewUpdate::Show(descriptor));
            return;
        }

        self.last_key = Some(key.clone());
        self.pending_fetch = None;

        let multiplexed = track.is_multiplexed(&self.config)
            || descriptor.codec_hint == self.config.multiplexed_codec;
        if multiplexed || key.is_offline() {
            // Transparent until the new frame decodes.
            self.displayed = None;
            self.start_fetch(&descriptor, track, multiplexed);
        } else {
            self.displayed = Some(ThumbnailImage::Remote {
                uri: key.resource().to_owned(),
            });
        }

        self.queued.push_back(PreviewUpdate::Show(descriptor));
        self.queued.push_back(PreviewUpdate::ImageChanged);
    }

    fn start_fetch(&mut self, descriptor: &ThumbnailDescriptor, track: &ImageTrack, multiplexed: bool) {
        let fetch_id = self.next_id();
        self.fetches_started += 1;

        let request = SegmentRequest::for_thumbnail(descriptor, &self.config.retry);
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.results_tx.clone();
        let mime = track.mime_type.clone();
        debug!(target: "thumbnails", fetch_id, uri = ?descriptor.primary_uri(), "fetching thumbnail segment");

        let handle = self.runtime.spawn(async move {
            let result = match fetcher.fetch(request).await {
                Ok(bytes) => decode_segment(&bytes, &mime, multiplexed),
                Err(err) => Err(err),
            };
            let _ = tx.send(TaskResult::Fetched { fetch_id, result });
        });
        self.pending_fetch = Some(PendingTask {
            id: fetch_id,
            handle,
        });
    }

    fn apply_fetched(&mut self, fetch_id: u64, result: Result<RgbaImage, ThumbnailError>) {
        if self.pending_fetch.as_ref().map(PendingTask::id) != Some(fetch_id) {
            debug!(target: "thumbnails", fetch_id, "discarding superseded thumbnail");
            return;
        }
        self.pending_fetch = None;

        match result {
            Ok(image) => {
                self.displayed = Some(ThumbnailImage::Decoded(Arc::new(image)));
                self.queued.push_back(PreviewUpdate::ImageChanged);
            }
            Err(err) if err.is_aborted() => {
                debug!(target: "thumbnails", fetch_id, "thumbnail fetch aborted");
            }
            Err(err) => {
                warn!(target: "thumbnails", fetch_id, error = %err, "thumbnail unavailable");
                // Forget the key so hovering it again retries.
                self.last_key = None;
                self.displayed = None;
                self.queued.push_back(PreviewUpdate::Failed(err));
            }
        }
    }
}
