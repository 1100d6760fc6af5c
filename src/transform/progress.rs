use std::sync::atomic::{AtomicUsize, Ordering};

/// Optional progress sink handed to every transform.
///
/// Purely observational: the presence of a callback never changes the
/// output. Fractions are in `[0, 1]` relative to the whole run, a
/// [Progress::slice] maps a sub-stage onto part of that range.
#[derive(Clone, Copy)]
pub struct Progress<'a> {
    callback: Option<&'a (dyn Fn(f32) + Sync)>,
    start: f32,
    span: f32,
}

impl<'a> Progress<'a> {
    pub fn new(callback: &'a (dyn Fn(f32) + Sync)) -> Self {
        Self {
            callback: Some(callback),
            start: 0.0,
            span: 1.0,
        }
    }

    pub fn none() -> Self {
        Self {
            callback: None,
            start: 0.0,
            span: 1.0,
        }
    }

    /// Sub-range `[start, start + span]` of this progress, in local units.
    pub fn slice(&self, start: f32, span: f32) -> Progress<'a> {
        Self {
            callback: self.callback,
            start: self.start + start * self.span,
            span: span * self.span,
        }
    }

    #[inline]
    pub fn report(&self, fraction: f32) {
        if let Some(callback) = self.callback {
            callback(self.start + fraction.clamp(0.0, 1.0) * self.span);
        }
    }

    /// Counter reporting `done / total` every time a unit of work finishes.
    pub fn ticker(&self, total: usize) -> RowTicker<'_, 'a> {
        RowTicker {
            progress: self,
            done: AtomicUsize::new(0),
            total,
        }
    }
}

impl Default for Progress<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("callback", &self.callback.is_some())
            .field("start", &self.start)
            .field("span", &self.span)
            .finish()
    }
}

/// Shared row/band counter, usable from rayon workers.
pub struct RowTicker<'p, 'a> {
    progress: &'p Progress<'a>,
    done: AtomicUsize,
    total: usize,
}

impl RowTicker<'_, '_> {
    #[inline]
    pub fn tick(&self) {
        if self.progress.callback.is_none() || self.total == 0 {
            return;
        }
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress.report(done as f32 / self.total as f32);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_ticker_reaches_one() {
        let seen = Mutex::new(Vec::new());
        let callback = |fraction: f32| seen.lock().unwrap().push(fraction);
        let progress = Progress::new(&callback);

        let ticker = progress.ticker(4);
        (0..4).for_each(|_| ticker.tick());

        assert_eq!(*seen.lock().unwrap(), vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_nested_slices() {
        let seen = Mutex::new(Vec::new());
        let callback = |fraction: f32| seen.lock().unwrap().push(fraction);
        let progress = Progress::new(&callback);

        let half = progress.slice(0.5, 0.5);
        half.slice(0.5, 0.5).report(1.0);
        half.report(0.0);

        assert_eq!(*seen.lock().unwrap(), vec![1.0, 0.5]);
    }

    #[test]
    fn test_none_is_silent() {
        let progress = Progress::none();
        let ticker = progress.ticker(2);
        ticker.tick();
        progress.report(1.0);
    }
}
