//! Drawing the information bar.
//!
//! - **gradient**: two-color background buffers
//! - **feather**: alpha ramp that softens the photo/bar seam
//! - **layout**: bar geometry and anchor points
//! - **text**: font loading and glyph drawing
//! - **assets**: process-wide font and logo cache
//! - **compositor**: assembles the final canvas

pub mod assets;
pub mod compositor;
pub mod feather;
pub mod gradient;
pub mod layout;
pub mod text;

pub use assets::{AssetCache, FontRole};
pub use compositor::{Composite, Compositor, Layers};
pub use feather::FeatherMask;
pub use gradient::{GradientSynthesizer, Rotation};
pub use layout::{BarGeometry, TextLayout};
pub use text::Typeface;
