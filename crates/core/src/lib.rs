// Rendering core for the LED cube viewer.
// Owns grid configuration, view state and the active animation. No GUI toolkit
// types cross this boundary: the UI layer calls setters on `RenderCore` and
// listens for `ChangeEvent`s.

pub mod animation;
pub mod driver;
pub mod geometry;
pub mod grid;
pub mod mesh;
pub mod point_cloud;
pub mod projection;
pub mod settings;

pub use animation::{AnimationKind, AnimationMode, FacePoints};
pub use driver::{ChangeEvent, FrameClock, RenderCore, ViewState};
pub use geometry::{CellPrimitive, Frame, PrimitiveKind};
pub use grid::{Axis, BoundingExtent, DrawMode, GridConfig};
pub use mesh::FrameMesh;
pub use projection::{Frustum, Projection};
pub use settings::{MemoryStore, PersistedSettings, SettingValue, SettingsStore};
