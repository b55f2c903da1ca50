/// One parsed Dockerfile statement, as produced by the parser stage.
///
/// This is the boundary type between text parsing and rule evaluation:
/// - `directive` is the lower-cased instruction keyword (`run`, `from`, ...)
/// - `flags` holds `--name=value` words in source order
/// - `args` holds argument tokens in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub directive: String,
    pub flags: Vec<String>,
    pub args: Vec<String>,
}

impl Node {
    pub fn new<D, A>(directive: D, args: A) -> Self
    where
        D: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            directive: directive.into(),
            flags: Vec::new(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_flags<F>(mut self, flags: F) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }
}
