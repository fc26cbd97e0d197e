//! Arbormap Engine - Filtering, points of interest, and render reconciliation
//!
//! The engine owns the complete dataset and the current filter state,
//! recomputes the visible subset whenever a parameter or a point of interest
//! changes, and diffs that subset against what is already on screen. The
//! result is a list of declarative [`RenderInstruction`]s handed to a
//! [`Presenter`], so no rendering technology leaks into the core.

pub mod controller;
pub mod event;
pub mod filter;
pub mod poi;
pub mod presenter;
pub mod reconcile;

pub use controller::MapController;
pub use event::{EventOutcome, UiEvent};
pub use filter::{apply_filters, FilterPlan, RecordFilter};
pub use poi::{DragState, PoiStore};
pub use presenter::{LogPresenter, Presenter, RecordingPresenter, RenderInstruction};
pub use reconcile::{RenderReconciler, RenderSummary};
