//! Screen-local view state.
//!
//! Every store mutates its local collection only after the server confirmed
//! the change. Failures leave the collection untouched and surface as an
//! error [`Notice`].

mod collection;
mod guard;
mod liveness;
mod notice;

pub use collection::CollectionStore;
pub use guard::{InFlight, InFlightGuard};
pub use liveness::Liveness;
pub use notice::{Notice, NoticeBoard, NoticeKind};

/// What happened to a user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The request finished. Mutations always carry a notice; loads only on failure.
    Completed(Option<Notice>),
    /// The triggering control was still disabled by an earlier request.
    Busy,
    /// The screen went away before the response arrived; nothing was applied.
    Unmounted,
}

impl Outcome {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Outcome::Completed(notice) => notice.as_ref(),
            Outcome::Busy | Outcome::Unmounted => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.notice().is_some_and(Notice::is_error)
    }
}
