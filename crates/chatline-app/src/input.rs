//! User input capability.

use std::{future::Future, io};

use tokio::io::{AsyncBufRead, Lines};

/// Source of user input lines.
///
/// Decouples the runtime from stdin so that tests can script input.
pub trait LineSource: Send {
    /// Next line without its terminator, or `None` at end of input.
    ///
    /// Must be cancellation safe: the runtime polls it inside `select!`.
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>> + Send;
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>> + Send {
        (**self).next_line()
    }
}

impl<R> LineSource for Lines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Lines::next_line(self).await
    }
}
