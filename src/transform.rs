pub mod pipe;
pub mod progress;
pub mod traits;

pub mod prelude {
    pub use super::{
        pipe::{PipeableTransform, Pipeline},
        progress::Progress,
        traits::TextureTransform,
    };
}
