/// Receives progress events while texts are being translated
///
/// `begin` announces how many texts will be sent to the provider, `tick` is
/// called once for each of them as its batch is merged.
pub trait ProgressSink: Send + Sync {
    fn begin(&self, _total: usize) {}

    fn tick(&self);
}

impl<F> ProgressSink for F
where
    F: Fn() + Send + Sync,
{
    fn tick(&self) {
        self()
    }
}

/// Progress sink that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tick(&self) {}
}
