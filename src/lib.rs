pub mod board;
pub mod error;
pub mod models;
pub mod report;
pub mod repository;
pub mod selection;
pub mod source;
pub mod store;
pub mod view;

pub use board::Board;
pub use error::{BoardError, Result};
pub use models::{AttendanceStatus, Counts, FilterType, Student, StudentId, ViewConfig};
pub use repository::{LoadOrigin, Loaded, Repository, SnapshotStore, StudentSource};
pub use selection::Selection;
pub use view::{derive_view, View};
