/// `.cir` files are written here, relative to the working directory, unless told otherwise.
pub const DEFAULT_OUTPUT_FOLDER: &str = "generated_circuits";

/// Size of the canvas on the visualizer page.
pub const CANVAS_WIDTH: f64 = 1200.0;
pub const CANVAS_HEIGHT: f64 = 700.0;

pub const START_X: f64 = 100.0;
pub const START_Y: f64 = 150.0;
pub const COMPONENT_SPACING: f64 = 150.0;
/// Row pitch, reduced when all rows would not fit on the canvas.
pub const LAYER_SPACING: f64 = 200.0;
/// Minimum distance between the last row and the bottom edge of the canvas.
pub const BOTTOM_MARGIN: f64 = 80.0;
/// Pasted circuits kept by the visualizer; the oldest is dropped beyond this.
pub const MAX_PARSED_CIRCUITS: usize = 32;
