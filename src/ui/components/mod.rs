//! Reusable UI pieces
//!
//! Components borrow what they render and return the user's intent instead
//! of sending commands themselves.

pub mod auth_forms;
pub mod banner;
pub mod charts;
pub mod confirm;
pub mod dashboard;
pub mod meal_card;
pub mod meal_detail;
pub mod record_button;
pub mod timeline;

pub use auth_forms::{AuthAction, LoginForm, RegisterForm, VerifyForm};
pub use banner::banner;
pub use confirm::{confirm_dialog, ConfirmResult, PendingUndo};
pub use dashboard::DashboardView;
pub use meal_card::{undo_label, MealAction, MealCard};
pub use meal_detail::{DetailAction, MealDetail};
pub use record_button::{RecordButton, RecordInput, RecordView};
pub use timeline::{Period, Timeline, TimelineAction, TimelineView};
