/// User interface module
///
/// Thin rendering layer over the session state:
/// - The three-image comparison grid (comparison.rs)
/// - Navigation, submit and jump controls (controls.rs)
/// - Blocking alert dialogs (dialogs.rs)

pub mod comparison;
pub mod controls;
pub mod dialogs;
