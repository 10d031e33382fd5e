use std::io;

/// Supplies the next answer for a prompt.
///
/// `Ok(None)` means no more input will ever arrive (end of file, end of
/// script); callers end the session instead of asking again.
pub trait InputProvider {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

impl<P: InputProvider + ?Sized> InputProvider for &mut P {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        (**self).ask(prompt)
    }
}

impl<P: InputProvider + ?Sized> InputProvider for Box<P> {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        (**self).ask(prompt)
    }
}
