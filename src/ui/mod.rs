/// UI building blocks
///
/// The view is split the same way the window reads: the capture pane with
/// its action row and result panel (preview.rs), and the settings column
/// with the live request preview (controls.rs).

pub mod controls;
pub mod preview;
