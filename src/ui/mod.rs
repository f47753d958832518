/// Presentation widgets
///
/// Stateless renderers driven entirely by the state the screens pass in:
/// - The image viewer with its loading/failure display (viewer.rs)
/// - Navigation arrows and the playback controls bar (controls.rs)
/// - The thumbnail strip (thumbnails.rs)
/// - Loading, error, and empty page states (feedback.rs)
/// - The toast overlay (toast.rs)
pub mod controls;
pub mod feedback;
pub mod thumbnails;
pub mod toast;
pub mod viewer;
