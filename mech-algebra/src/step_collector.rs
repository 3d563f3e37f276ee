/// A type that collects the steps of an algorithm, such as the rewrites applied by the
/// simplifier or the atoms created and reused while atomizing.
///
/// [`StepCollector`] is also implemented for the unit type `()`, for callers that do not care
/// about the steps taken, and for [`Vec`], which records every step in order.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}
