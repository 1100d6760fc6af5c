use crate::{
    texture::{Shape, TextureMutSlice, TextureRef},
    transform::progress::Progress,
};

/// Core trait for applying a transform to a raster.
///
/// Transforms work in place: the raster is borrowed for the duration of
/// [TextureTransform::apply] and handed back afterwards. Lifetimes are
/// method-local so nothing is retained between calls.
pub trait TextureTransform: Sized {
    /// Apply the transform to the raster
    fn apply<'t>(
        &mut self,
        texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8>;

    /// Preparation step that can inspect data shape before transformation
    fn prepare(&mut self, shape: Shape);

    /// Apply once. Alias for [TextureTransform::prepare] followed by [TextureTransform::apply].
    fn once<'t>(
        mut self,
        texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        self.prepare(texture.shape());
        self.apply(texture, progress)
    }
}
