pub mod camera;
pub mod flight;
pub mod fly_to;
pub mod overlay;
pub mod pins;

pub use camera::*;
pub use flight::*;
pub use fly_to::*;
pub use overlay::*;
pub use pins::*;
