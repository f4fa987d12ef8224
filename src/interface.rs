/// How commands report progress to, and ask questions of, the user.
///
/// The CLI implements this on top of the terminal, tests implement it with a
/// scripted set of answers.
pub trait Interface {
    /// Asks a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&self, msg: &str) -> miette::Result<bool>;
    fn message(&self, msg: &str);
    fn success(&self, msg: &str);
    fn warning(&self, msg: &str);
    fn error(&self, msg: &str);
}
