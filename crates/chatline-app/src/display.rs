//! Display sink capability.

/// Output boundary for all user-visible text.
///
/// Fire-and-forget: implementations deal with their own write failures.
pub trait DisplaySink: Send {
    /// Show one line of text to the user.
    fn show(&mut self, text: &str);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn show(&mut self, text: &str) {
        (**self).show(text);
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn show(&mut self, text: &str) {
        (**self).show(text);
    }
}
