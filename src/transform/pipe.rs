use crate::{
    texture::{Shape, TextureMutSlice},
    transform::{progress::Progress, traits::TextureTransform},
};

/// Extension trait that enables pipeline chaining
pub trait PipeableTransform: TextureTransform {
    /// Chain this transform with another, creating a pipeline.
    ///
    /// Both stages work on the same raster, the second one sees the output of
    /// the first.
    ///
    /// # Example
    /// ```ignore
    /// // Apple II: binary dots -> composite artifacts
    /// let mut pipeline = halftone.pipe(composite);
    /// pipeline.once(texture, &Progress::none());
    /// ```
    fn pipe<T>(self, next: T) -> Pipeline<Self, T>
    where
        T: TextureTransform,
    {
        Pipeline::new(self, next)
    }
}

// Blanket implementation: all TextureTransforms are automatically pipeable
impl<T: TextureTransform> PipeableTransform for T {}

/// A pipeline that chains two in-place transforms: T1 then T2.
///
/// Progress is split evenly between the two stages.
pub struct Pipeline<T1, T2>
where
    T1: TextureTransform,
    T2: TextureTransform,
{
    t1: T1,
    t2: T2,
}

impl<T1, T2> Pipeline<T1, T2>
where
    T1: TextureTransform,
    T2: TextureTransform,
{
    pub fn new(t1: T1, t2: T2) -> Self {
        Self { t1, t2 }
    }
}

impl<T1, T2> TextureTransform for Pipeline<T1, T2>
where
    T1: TextureTransform,
    T2: TextureTransform,
{
    #[inline(always)]
    fn apply<'t>(
        &mut self,
        texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        let texture = self.t1.apply(texture, &progress.slice(0.0, 0.5));
        self.t2.apply(texture, &progress.slice(0.5, 0.5))
    }

    #[inline(always)]
    fn prepare(&mut self, shape: Shape) {
        self.t1.prepare(shape);
        self.t2.prepare(shape);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::{
        prelude::{PipeableTransform, Progress, TextureTransform},
        texture::{Shape, Texture, TextureMutSlice},
    };

    #[test]
    fn test_pipeline_cascades_apply() {
        let mut texture = Texture::<u8>::new(4, 4, 3);

        let a = IncTransform::default();
        let b = IncTransform::default();

        let mut pipeline = a.pipe(b);
        pipeline.apply(texture.as_texture_mut_slice(), &Progress::none());

        assert!(texture.as_ref().iter().all(|p| *p == 2));
    }

    #[test]
    fn test_pipeline_cascades_prepare() {
        let mut pipeline = IncTransform::default().pipe(IncTransform::default());

        pipeline.prepare((2, 2, 4));

        assert_eq!(pipeline.t1.shape, Some((2, 2, 4)));
        assert_eq!(pipeline.t2.shape, Some((2, 2, 4)));
    }

    #[test]
    fn test_pipeline_splits_progress() {
        let seen = Mutex::new(Vec::new());
        let callback = |fraction: f32| seen.lock().unwrap().push(fraction);
        let mut texture = Texture::<u8>::new(1, 1, 3);

        IncTransform::default()
            .pipe(IncTransform::default())
            .once(texture.as_texture_mut_slice(), &Progress::new(&callback));

        assert_eq!(*seen.lock().unwrap(), vec![0.5, 1.0]);
    }

    #[derive(Default)]
    struct IncTransform {
        shape: Option<Shape>,
    }

    impl TextureTransform for IncTransform {
        fn apply<'t>(
            &mut self,
            mut texture: TextureMutSlice<'t, u8>,
            progress: &Progress,
        ) -> TextureMutSlice<'t, u8> {
            texture.as_mut().iter_mut().for_each(|v| *v += 1);
            progress.report(1.0);
            texture
        }

        fn prepare(&mut self, shape: Shape) {
            self.shape = Some(shape);
        }
    }
}
