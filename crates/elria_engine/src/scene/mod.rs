//! Scene management system
//!
//! One scene model shared by every frontend: the console explorer, the SVG
//! renderer and the HTML exporter all read the same objects and camera.
//!
//! ## Architecture
//!
//! ```text
//! Input (SceneCommand)
//!      ↓
//! Scene (objects, camera, editor mode)
//!      ↓
//! SceneRenderer / HtmlExporter
//! ```

mod camera;
mod game_object;
mod world;

pub use camera::{Camera, CameraMove};
pub use game_object::{GameObject, ObjectKind};
pub use world::{Scene, SceneError, EditorMode, ObjectId};
