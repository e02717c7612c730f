// Background thumbnail loading with an id-keyed cache
//
// Thumbnails live in a side-table keyed by `ItemId`; nothing here touches the
// triage engine's item sequence or statuses, so loading can run concurrently
// with triage commands and be cancelled independently.

use crate::domain::{ItemId, MediaKind};
use image::{ImageFormat, RgbImage};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::debug;

/// Longest edge of a generated thumbnail, in pixels
pub const THUMBNAIL_MAX_PIXELS: u32 = 300;

/// Maximum number of cached thumbnails
const CACHE_SIZE: usize = 64;

/// A decoded, downscaled preview image
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    image: RgbImage,
}

impl Thumbnail {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Represents a thumbnail loading state
#[derive(Debug, Clone)]
pub enum ThumbnailState {
    /// Thumbnail is loading
    Loading,
    /// Thumbnail is ready
    Ready(Arc<Thumbnail>),
    /// The provider has no preview for this file (video, unsupported format)
    Unavailable,
    /// Thumbnail generation failed
    Error(String),
}

/// Produces a preview image for a file, or `None` if it cannot
pub trait ThumbnailProvider: Send + Sync + 'static {
    fn thumbnail(&self, path: &Path) -> io::Result<Option<Thumbnail>>;
}

/// Decodes still images with the `image` crate.
///
/// Videos and formats the crate does not know (e.g. HEIC) yield `None`.
#[derive(Debug, Clone, Copy)]
pub struct ImageThumbnailProvider {
    max_pixel_size: u32,
}

impl ImageThumbnailProvider {
    pub fn new(max_pixel_size: u32) -> Self {
        Self { max_pixel_size }
    }
}

impl Default for ImageThumbnailProvider {
    fn default() -> Self {
        Self::new(THUMBNAIL_MAX_PIXELS)
    }
}

impl ThumbnailProvider for ImageThumbnailProvider {
    fn thumbnail(&self, path: &Path) -> io::Result<Option<Thumbnail>> {
        if MediaKind::from_path(path) == MediaKind::Video {
            return Ok(None);
        }
        if ImageFormat::from_path(path).is_err() {
            return Ok(None);
        }

        let img = image::open(path)
            .map_err(|e| io::Error::other(format!("Image loading error: {}", e)))?;
        let scaled = img.thumbnail(self.max_pixel_size, self.max_pixel_size);
        Ok(Some(Thumbnail::new(scaled.to_rgb8())))
    }
}

/// Message types for the thumbnail loader
enum ThumbnailRequest {
    /// Load a thumbnail for an item
    Load {
        id: ItemId,
        path: PathBuf,
        response_tx: oneshot::Sender<ThumbnailState>,
    },
    /// Cancel any pending load for an item
    Cancel { id: ItemId },
    /// Shutdown the loader
    Shutdown,
}

/// LRU side-table from item id to thumbnail.
///
/// `None` entries remember that an item has no thumbnail so the provider is
/// not asked again.
#[derive(Debug)]
struct ThumbnailCache {
    cache: HashMap<ItemId, Option<Arc<Thumbnail>>>,
    /// Order of access for LRU eviction (most recent at end)
    access_order: Vec<ItemId>,
    max_size: usize,
}

impl ThumbnailCache {
    fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    /// Get a cached entry, updating access order
    fn get(&mut self, id: ItemId) -> Option<ThumbnailState> {
        let entry = self.cache.get(&id)?.clone();
        self.access_order.retain(|i| *i != id);
        self.access_order.push(id);
        Some(match entry {
            Some(thumbnail) => ThumbnailState::Ready(thumbnail),
            None => ThumbnailState::Unavailable,
        })
    }

    /// Insert an entry, evicting the least recently used if necessary
    fn insert(&mut self, id: ItemId, thumbnail: Option<Arc<Thumbnail>>) {
        if self.cache.contains_key(&id) {
            self.access_order.retain(|i| *i != id);
        } else if self.cache.len() >= self.max_size && !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.cache.remove(&oldest);
        }

        self.cache.insert(id, thumbnail);
        self.access_order.push(id);
    }

    #[cfg(test)]
    fn contains(&self, id: ItemId) -> bool {
        self.cache.contains_key(&id)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[cfg(test)]
    fn clear(&mut self) {
        self.cache.clear();
        self.access_order.clear();
    }
}

/// Handle for sending requests to the thumbnail loader
#[derive(Clone)]
pub struct ThumbnailLoader {
    request_tx: mpsc::Sender<ThumbnailRequest>,
    cache: Arc<Mutex<ThumbnailCache>>,
    /// Track current loading item to allow cancellation
    current_loading: Arc<Mutex<Option<ItemId>>>,
}

impl ThumbnailLoader {
    /// Create a new loader with a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(provider: Arc<dyn ThumbnailProvider>) -> Self {
        let (request_tx, request_rx) = mpsc::channel(32);
        let cache = Arc::new(Mutex::new(ThumbnailCache::new(CACHE_SIZE)));
        let current_loading = Arc::new(Mutex::new(None));

        let loader = Self {
            request_tx,
            cache: Arc::clone(&cache),
            current_loading: Arc::clone(&current_loading),
        };

        tokio::spawn(async move {
            Self::worker(request_rx, provider, cache, current_loading).await;
        });

        loader
    }

    /// Background worker that processes thumbnail requests
    async fn worker(
        mut request_rx: mpsc::Receiver<ThumbnailRequest>,
        provider: Arc<dyn ThumbnailProvider>,
        cache: Arc<Mutex<ThumbnailCache>>,
        current_loading: Arc<Mutex<Option<ItemId>>>,
    ) {
        while let Some(request) = request_rx.recv().await {
            match request {
                ThumbnailRequest::Load {
                    id,
                    path,
                    response_tx,
                } => {
                    if let Some(cached) = cache.lock().await.get(id) {
                        let _ = response_tx.send(cached);
                        continue;
                    }

                    // Requester went away (item changed) before we got to it
                    if response_tx.is_closed() {
                        continue;
                    }

                    *current_loading.lock().await = Some(id);

                    let provider = Arc::clone(&provider);
                    let result =
                        tokio::task::spawn_blocking(move || provider.thumbnail(&path)).await;

                    {
                        let mut loading = current_loading.lock().await;
                        if *loading != Some(id) {
                            // Cancelled while decoding
                            continue;
                        }
                        *loading = None;
                    }

                    let state = match result {
                        Ok(Ok(Some(thumbnail))) => {
                            let thumbnail = Arc::new(thumbnail);
                            cache.lock().await.insert(id, Some(Arc::clone(&thumbnail)));
                            ThumbnailState::Ready(thumbnail)
                        }
                        Ok(Ok(None)) => {
                            cache.lock().await.insert(id, None);
                            ThumbnailState::Unavailable
                        }
                        Ok(Err(e)) => {
                            debug!(item = %id, error = %e, "thumbnail generation failed");
                            ThumbnailState::Error(e.to_string())
                        }
                        Err(e) => ThumbnailState::Error(format!("Task panicked: {}", e)),
                    };

                    let _ = response_tx.send(state);
                }
                ThumbnailRequest::Cancel { id } => {
                    let mut loading = current_loading.lock().await;
                    if *loading == Some(id) {
                        *loading = None;
                    }
                }
                ThumbnailRequest::Shutdown => {
                    break;
                }
            }
        }
    }

    /// Request a thumbnail and wait for it (cached results return immediately)
    pub async fn request(&self, id: ItemId, path: &Path) -> ThumbnailState {
        if let Some(cached) = self.get_cached(id).await {
            return cached;
        }

        let (response_tx, response_rx) = oneshot::channel();
        let request = ThumbnailRequest::Load {
            id,
            path: path.to_path_buf(),
            response_tx,
        };

        if self.request_tx.send(request).await.is_err() {
            return ThumbnailState::Error("Thumbnail loader shut down".to_string());
        }

        match tokio::time::timeout(std::time::Duration::from_secs(5), response_rx).await {
            Ok(Ok(state)) => state,
            Ok(Err(_)) => ThumbnailState::Error("Response channel closed".to_string()),
            Err(_) => ThumbnailState::Error("Thumbnail timed out".to_string()),
        }
    }

    pub async fn get_cached(&self, id: ItemId) -> Option<ThumbnailState> {
        self.cache.lock().await.get(id)
    }

    #[cfg(test)]
    pub async fn is_cached(&self, id: ItemId) -> bool {
        self.cache.lock().await.contains(id)
    }

    /// Cancel the load currently in progress, if any
    pub async fn cancel_current(&self) {
        let id = *self.current_loading.lock().await;
        if let Some(id) = id {
            self.cancel(id).await;
        }
    }

    pub async fn cancel(&self, id: ItemId) {
        {
            let mut loading = self.current_loading.lock().await;
            if *loading == Some(id) {
                *loading = None;
            }
        }
        let _ = self.request_tx.send(ThumbnailRequest::Cancel { id }).await;
    }

    /// Stop the background task; later requests resolve to an error.
    ///
    /// Does not wait, so it can run outside the runtime.
    pub fn shutdown(&self) {
        if let Err(e) = self.request_tx.try_send(ThumbnailRequest::Shutdown) {
            debug!(error = %e, "thumbnail worker already gone or busy");
        }
    }

    #[cfg(test)]
    pub async fn cache_size(&self) -> usize {
        self.cache.lock().await.len()
    }

    #[cfg(test)]
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}

/// Synchronous wrapper for thumbnail loading in non-async contexts.
///
/// The TUI loop calls [`SyncThumbnailManager::request`] every frame; the first
/// call queues the load and later calls pick up the result without blocking.
pub struct SyncThumbnailManager {
    loader: ThumbnailLoader,
    runtime: tokio::runtime::Runtime,
    current_state: ThumbnailState,
    current_id: Option<ItemId>,
    receiver: Option<oneshot::Receiver<ThumbnailState>>,
}

impl SyncThumbnailManager {
    pub fn new(provider: Arc<dyn ThumbnailProvider>) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let loader = runtime.block_on(async { ThumbnailLoader::new(provider) });

        Ok(Self {
            loader,
            runtime,
            current_state: ThumbnailState::Loading,
            current_id: None,
            receiver: None,
        })
    }

    /// Request the thumbnail for an item, returns the current state (non-blocking)
    pub fn request(&mut self, id: ItemId, path: &Path) -> &ThumbnailState {
        if self.current_id != Some(id) {
            if self.current_id.is_some() {
                self.runtime.block_on(self.loader.cancel_current());
            }

            self.current_id = Some(id);
            self.receiver = None;

            if let Some(cached) = self.runtime.block_on(self.loader.get_cached(id)) {
                self.current_state = cached;
                return &self.current_state;
            }

            self.current_state = ThumbnailState::Loading;

            let (tx, rx) = oneshot::channel();
            let request = ThumbnailRequest::Load {
                id,
                path: path.to_path_buf(),
                response_tx: tx,
            };
            let loader = self.loader.clone();
            let _ = self
                .runtime
                .block_on(async move { loader.request_tx.send(request).await });

            self.receiver = Some(rx);
        }

        if matches!(self.current_state, ThumbnailState::Loading) {
            if let Some(ref mut rx) = self.receiver {
                match rx.try_recv() {
                    Ok(state) => {
                        self.current_state = state;
                        self.receiver = None;
                    }
                    Err(oneshot::error::TryRecvError::Empty) => {}
                    Err(oneshot::error::TryRecvError::Closed) => {
                        self.current_state = self
                            .runtime
                            .block_on(self.loader.get_cached(id))
                            .unwrap_or_else(|| {
                                ThumbnailState::Error("Thumbnail channel closed".to_string())
                            });
                        self.receiver = None;
                    }
                }
            }
        }

        &self.current_state
    }

    #[cfg(test)]
    pub fn current_state(&self) -> &ThumbnailState {
        &self.current_state
    }

    /// Forget the current item (e.g. after the cursor moved)
    pub fn reset(&mut self) {
        if self.current_id.is_some() {
            self.runtime.block_on(self.loader.cancel_current());
        }
        self.current_id = None;
        self.current_state = ThumbnailState::Loading;
        self.receiver = None;
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.runtime.block_on(self.loader.cache_size())
    }
}

impl Drop for SyncThumbnailManager {
    fn drop(&mut self) {
        self.loader.shutdown();
    }
}
