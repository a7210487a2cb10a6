use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Tracks whether the owning screen is still mounted.
///
/// Responses that arrive after [`Liveness::unmount`] are dropped instead of
/// being written into view state that nobody renders any more.
#[derive(Debug, Clone, Default)]
pub struct Liveness {
    token: CancellationToken,
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Runs `fut` unless the screen unmounts first. `None` means the result was abandoned.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if !self.is_mounted() {
            return None;
        }
        let output = tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = fut => Some(output),
        };
        output.filter(|_| self.is_mounted())
    }
}
