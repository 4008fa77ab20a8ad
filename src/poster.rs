use core::fmt;

use futures::channel::oneshot;

use crate::error::{Error, Result};
use crate::surface::Image;

/// Invoked after a poster has been drawn, with the surface and the loaded image.
pub type PosterCallback<S> = Box<dyn FnMut(&S, &dyn Image)>;

/// Whether a poster image stands in for the video before it is decodable.
pub enum PosterPolicy<S> {
    Disabled,
    Enabled,
    EnabledWithCallback(PosterCallback<S>),
}

impl<S> PosterPolicy<S> {
    pub(crate) fn resolve(use_poster: bool, callback: Option<PosterCallback<S>>) -> Self {
        match (use_poster, callback) {
            (false, _) => Self::Disabled,
            (true, None) => Self::Enabled,
            (true, Some(callback)) => Self::EnabledWithCallback(callback),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub(crate) fn notify(&mut self, surface: &S, image: &dyn Image) {
        if let Self::EnabledWithCallback(callback) = self {
            callback(surface, image);
        }
    }
}

impl<S> fmt::Debug for PosterPolicy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Enabled => f.write_str("Enabled"),
            Self::EnabledWithCallback(_) => f.write_str("EnabledWithCallback(..)"),
        }
    }
}

/// Fetches and decodes poster images.
pub trait PosterLoader {
    type Image: Image;

    /// Start loading `reference`.
    ///
    /// The loader must resolve `completion` at some later point, on any thread.
    /// Dropping it unresolved is treated as a failed load.
    fn load(&self, reference: &str, completion: PosterCompletion<Self::Image>);
}

/// Resolves a single poster load.
#[derive(Debug)]
pub struct PosterCompletion<I> {
    reference: String,
    tx: oneshot::Sender<Result<I>>,
}

impl<I> PosterCompletion<I> {
    pub(crate) fn channel(reference: &str) -> (Self, PendingPoster<I>) {
        let (tx, rx) = oneshot::channel();
        let completion = Self {
            reference: reference.to_owned(),
            tx,
        };
        (completion, PendingPoster { rx })
    }

    /// The poster reference being loaded.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn resolve(self, result: Result<I>) {
        // The buffer may have been dropped in the meantime.
        let _ = self.tx.send(result);
    }
}

/// The buffer's end of an in-flight poster load.
#[derive(Debug)]
pub(crate) struct PendingPoster<I> {
    rx: oneshot::Receiver<Result<I>>,
}

impl<I> PendingPoster<I> {
    /// The load's outcome, or `None` while it is still running.
    pub(crate) fn try_take(&mut self) -> Option<Result<I>> {
        match self.rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::Canceled) => Some(Err(Error::PosterCanceled)),
        }
    }
}
