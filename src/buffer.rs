//! Stabilizes a video's output across seeks and loop restarts.
//!
//! While a video seeks, its presented frame is indeterminate and drawing it
//! directly can flash blank or stale pixels. [`FrameBuffer`] copies each new
//! frame onto an off-screen surface and keeps showing the previous one until
//! the video reports a frame at a different playback time.

use core::time::Duration;

use crate::backend::raster::RasterPosterLoader;
use crate::config::BufferConfig;
use crate::poster::{PendingPoster, PosterCallback, PosterCompletion, PosterLoader, PosterPolicy};
use crate::surface::{Image, Surface, SurfaceAllocator};
use crate::types::{ReadyState, Rect};
use crate::video::{ReadySignal, VideoSource};

/// Called with the surface right before it is overwritten, so a GPU renderer
/// can drop a texture uploaded from the old pixels.
pub type ReleaseTextureHook<S> = Box<dyn FnMut(&S)>;

enum PosterState<I> {
    Idle,
    Loading(PendingPoster<I>),
    Loaded(I),
    Failed,
}

/// Holds the last good frame of a [`VideoSource`].
pub struct FrameBuffer<V, A, L = RasterPosterLoader>
where
    A: SurfaceAllocator,
    L: PosterLoader,
{
    video: V,
    allocator: A,
    loader: L,
    surface: Option<A::Surface>,
    ready_state: ReadyState,
    ready_signal: ReadySignal,
    last_sampled_time: Option<Duration>,
    disable_seek_buffering: bool,
    poster: PosterPolicy<A::Surface>,
    poster_state: PosterState<L::Image>,
    /// Whether the current surface shows the loaded poster.
    poster_drawn: bool,
    release_texture: Option<ReleaseTextureHook<A::Surface>>,
}

impl<V, A> FrameBuffer<V, A>
where
    V: VideoSource,
    A: SurfaceAllocator,
{
    /// Buffer `video` with default options, fetching posters with [`RasterPosterLoader`].
    pub fn new(video: V, allocator: A) -> Self {
        Self::builder(video, allocator).build()
    }

    pub fn builder(video: V, allocator: A) -> FrameBufferBuilder<V, A> {
        FrameBufferBuilder {
            video,
            allocator,
            loader: RasterPosterLoader,
            config: BufferConfig::default(),
            on_poster: None,
            release_texture: None,
        }
    }
}

impl<V, A, L> FrameBuffer<V, A, L>
where
    V: VideoSource,
    A: SurfaceAllocator,
    L: PosterLoader,
{
    /// The best surface available for this tick, or `None` if nothing can be shown yet.
    ///
    /// Call once per rendered frame. Do not hold on to the returned surface
    /// past the current frame; it may be replaced by the next call.
    pub fn query(&mut self) -> Option<&A::Surface> {
        let poster_available = self.poster.is_enabled() && self.video.poster().is_some();
        if !self.ready_state().is_decodable() && !poster_available {
            tracing::trace!(ready_state = ?self.ready_state, "video not ready");
            return None;
        }

        self.ensure_surface();
        self.take_finished_poster();

        if self.video.ready_state().is_decodable() {
            self.sample_video();
        } else if poster_available {
            self.show_poster();
        }

        self.surface.as_ref().filter(|surface| !surface.size().is_empty())
    }

    /// Readiness as last observed, promoted once the source can play through.
    pub fn ready_state(&self) -> ReadyState {
        if self.ready_signal.is_fired() {
            self.ready_state.max(ReadyState::HAVE_CURRENT_DATA)
        } else {
            self.ready_state
        }
    }

    /// Playback time of the frame currently on the surface, `None` until one is drawn.
    pub fn last_sampled_time(&self) -> Option<Duration> {
        self.last_sampled_time
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    /// The surface as of the last query, without redrawing.
    pub fn surface(&self) -> Option<&A::Surface> {
        self.surface.as_ref()
    }

    fn ensure_surface(&mut self) {
        if self
            .surface
            .as_ref()
            .is_some_and(|surface| !surface.size().is_empty())
        {
            return;
        }

        let size = self.video.native_size();
        tracing::debug!(width = size.width, height = size.height, "allocating surface");
        self.surface = Some(self.allocator.allocate(size));
        // A fresh surface holds neither the sampled frame nor the poster.
        self.last_sampled_time = None;
        self.poster_drawn = false;
    }

    fn sample_video(&mut self) {
        let now = self.video.current_time();
        if !self.disable_seek_buffering && self.last_sampled_time == Some(now) {
            tracing::trace!(?now, "reusing buffered frame");
            return;
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let Some(frame) = self.video.current_frame() else {
            tracing::trace!(?now, "video has no frame, keeping buffered frame");
            return;
        };
        let staged = match surface.stage_frame(&frame) {
            Ok(staged) => staged,
            Err(err) => {
                tracing::warn!(%err, ?now, "failed to convert video frame");
                return;
            }
        };

        if let Some(release) = self.release_texture.as_mut() {
            release(&*surface);
        }

        let rect = Rect::full(surface.size());
        surface.clear(rect);
        surface.draw(staged, rect);

        tracing::trace!(?now, "sampled video frame");
        self.last_sampled_time = Some(now);
        self.poster_drawn = false;
    }

    fn take_finished_poster(&mut self) {
        let PosterState::Loading(pending) = &mut self.poster_state else {
            return;
        };
        let Some(result) = pending.try_take() else {
            return;
        };

        self.poster_state = match result {
            Ok(image) => {
                tracing::debug!("poster loaded");
                PosterState::Loaded(image)
            }
            Err(err) => {
                tracing::warn!(%err, "poster load failed");
                PosterState::Failed
            }
        };
    }

    fn show_poster(&mut self) {
        match &self.poster_state {
            PosterState::Idle => {
                let Some(reference) = self.video.poster() else {
                    return;
                };
                tracing::debug!(%reference, "loading poster");
                let (completion, pending) = PosterCompletion::channel(reference);
                self.poster_state = PosterState::Loading(pending);
                self.loader.load(reference, completion);
            }
            PosterState::Loaded(image) if !self.poster_drawn => {
                let Some(surface) = self.surface.as_mut() else {
                    return;
                };
                if surface.size().is_empty() {
                    return;
                }

                let staged = match surface.stage_image(image) {
                    Ok(staged) => staged,
                    Err(err) => {
                        tracing::warn!(%err, "failed to convert poster");
                        self.poster_state = PosterState::Failed;
                        return;
                    }
                };

                let rect = Rect::full(surface.size());
                surface.clear(rect);
                surface.draw(staged, rect);
                self.poster.notify(surface, image);
                self.poster_drawn = true;
            }
            PosterState::Loading(_) | PosterState::Loaded(_) | PosterState::Failed => {}
        }
    }
}

/// Configures a [`FrameBuffer`].
pub struct FrameBufferBuilder<V, A, L = RasterPosterLoader>
where
    A: SurfaceAllocator,
{
    video: V,
    allocator: A,
    loader: L,
    config: BufferConfig,
    on_poster: Option<PosterCallback<A::Surface>>,
    release_texture: Option<ReleaseTextureHook<A::Surface>>,
}

impl<V, A, L> FrameBufferBuilder<V, A, L>
where
    V: VideoSource,
    A: SurfaceAllocator,
    L: PosterLoader,
{
    pub fn config(mut self, config: BufferConfig) -> Self {
        self.config = config;
        self
    }

    pub fn use_poster(mut self, enabled: bool) -> Self {
        self.config.use_poster = enabled;
        self
    }

    pub fn disable_seek_buffering(mut self, disabled: bool) -> Self {
        self.config.disable_seek_buffering = disabled;
        self
    }

    /// Replace how poster images are fetched.
    pub fn poster_loader<L2: PosterLoader>(self, loader: L2) -> FrameBufferBuilder<V, A, L2> {
        FrameBufferBuilder {
            video: self.video,
            allocator: self.allocator,
            loader,
            config: self.config,
            on_poster: self.on_poster,
            release_texture: self.release_texture,
        }
    }

    /// Called after a poster is drawn. Only used when posters are enabled.
    pub fn on_poster(mut self, callback: impl FnMut(&A::Surface, &dyn Image) + 'static) -> Self {
        self.on_poster = Some(Box::new(callback));
        self
    }

    pub fn on_release_texture(mut self, hook: impl FnMut(&A::Surface) + 'static) -> Self {
        self.release_texture = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> FrameBuffer<V, A, L> {
        let ready_state = self.video.ready_state();
        let ready_signal = ReadySignal::new();
        if !ready_state.is_decodable() {
            self.video.on_can_play_through(ready_signal.clone());
        }

        FrameBuffer {
            video: self.video,
            allocator: self.allocator,
            loader: self.loader,
            surface: None,
            ready_state,
            ready_signal,
            last_sampled_time: None,
            disable_seek_buffering: self.config.disable_seek_buffering,
            poster: PosterPolicy::resolve(self.config.use_poster, self.on_poster),
            poster_state: PosterState::Idle,
            poster_drawn: false,
            release_texture: self.release_texture,
        }
    }
}
