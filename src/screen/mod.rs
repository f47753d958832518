/// Screens module
///
/// Page shells that fetch data on entry, branch on loading/error/empty,
/// and delegate everything else to the slideshow controller or the task
/// list state:
/// - The slideshow page (slider.rs)
/// - The task manager page (tasks.rs)
/// - The credentials-missing page (login.rs)
pub mod login;
pub mod slider;
pub mod tasks;
